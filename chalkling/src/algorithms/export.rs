//! Variant export loop.
//!
//! Each copy is regenerated from a deep copy of the authored form, scaled
//! to the export size, rendered, scored and handed to a sink. A failing
//! copy is logged and skipped; the loop carries on with the next index.

use crate::algorithms::similarity::derive_stats;
use crate::config::EditorConfig;
use crate::error::ExportError;
use crate::model::Stats;
use crate::render::{Canvas, Painter};
use crate::Form;
use rand::Rng;

/// Receives rendered variants. The host decides how to encode and store them.
pub trait ExportSink {
    fn write(&mut self, index: u32, image: &Canvas, stats: &Stats) -> Result<(), ExportError>;
}

#[derive(Clone, Debug, PartialEq)]
pub struct ExportedVariant {
    pub index: u32,
    pub image: Canvas,
    pub stats: Stats,
    pub metadata: Vec<(String, String)>,
}

/// Keeps every variant in memory.
#[derive(Clone, Debug, Default)]
pub struct MemorySink {
    pub variants: Vec<ExportedVariant>,
}

impl ExportSink for MemorySink {
    fn write(&mut self, index: u32, image: &Canvas, stats: &Stats) -> Result<(), ExportError> {
        self.variants.push(ExportedVariant {
            index,
            image: image.clone(),
            stats: *stats,
            metadata: stats.metadata(),
        });
        Ok(())
    }
}

/// A variant encoded as a PNG file, with its stats as `Xmp.dc.*` pairs.
#[derive(Clone, Debug, PartialEq)]
pub struct EncodedVariant {
    pub index: u32,
    pub png: Vec<u8>,
    pub metadata: Vec<(String, String)>,
}

/// Encodes every variant to PNG in memory.
#[derive(Clone, Debug, Default)]
pub struct PngSink {
    pub files: Vec<EncodedVariant>,
}

impl ExportSink for PngSink {
    fn write(&mut self, index: u32, image: &Canvas, stats: &Stats) -> Result<(), ExportError> {
        let png = image.encode_png()?;
        log::debug!("encoded variant {} ({} bytes)", index, png.len());
        self.files.push(EncodedVariant { index, png, metadata: stats.metadata() });
        Ok(())
    }
}

#[derive(Debug, Default)]
pub struct ExportReport {
    pub written: Vec<u32>,
    pub failed: Vec<(u32, ExportError)>,
}

fn export_one<R: Rng + ?Sized>(
    form: &Form,
    config: &EditorConfig,
    index: u32,
    rng: &mut R,
    sink: &mut dyn ExportSink,
) -> Result<(), ExportError> {
    let mut variant = form.variant();
    variant.regenerate(rng);
    if !variant.scale(config.export_scale()) {
        log::warn!("variant {} kept at authoring scale", index);
    }
    let mut image = Canvas::new(config.export_width, config.export_height);
    let painter = Painter { steps: config.bezier_steps, background: Some(config.render_background) };
    painter.render(&variant, &mut image);
    // cosine is scale invariant, so the scaled copy scores like the unscaled one
    let stats = derive_stats(form, &variant)?;
    sink.write(index, &image, &stats)
}

/// Writes `copies` variants with indices starting at `start_index`.
pub fn export_variants<R: Rng + ?Sized>(
    form: &Form,
    config: &EditorConfig,
    copies: u32,
    start_index: u32,
    rng: &mut R,
    sink: &mut dyn ExportSink,
) -> ExportReport {
    log::info!("export started: {} copies from index {}", copies, start_index);
    let mut report = ExportReport::default();
    for i in 0..copies {
        let index = start_index.saturating_add(i);
        match export_one(form, config, index, rng, sink) {
            Ok(()) => report.written.push(index),
            Err(e) => {
                log::warn!("skipping variant {}: {} ({})", index, e, e.code());
                report.failed.push((index, e));
            }
        }
    }
    log::info!("export done: {} written, {} failed", report.written.len(), report.failed.len());
    report
}

/// First index after every numerically named file, or 0 when there is none.
pub fn next_export_index<I, S>(file_names: I) -> u32
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    file_names
        .into_iter()
        .filter_map(|name| {
            let name = name.as_ref();
            let stem = name.rsplit_once('.').map_or(name, |(s, _)| s);
            stem.parse::<u32>().ok()
        })
        .max()
        .map_or(0, |n| n.saturating_add(1))
}

/// `stem + suffix`, or `stem_1 + suffix`, `stem_2 + suffix`, … whichever is unused first.
pub fn free_form_name<S: AsRef<str>>(existing: &[S], stem: &str, suffix: &str) -> String {
    let taken = |candidate: &str| existing.iter().any(|e| e.as_ref() == candidate);
    let mut candidate = format!("{}{}", stem, suffix);
    let mut i = 0u32;
    while taken(&candidate) {
        i += 1;
        candidate = format!("{}_{}{}", stem, i, suffix);
    }
    candidate
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn export_index_skips_non_numeric_names() {
        assert_eq!(next_export_index(Vec::<String>::new()), 0);
        assert_eq!(next_export_index(["3.png", "notes.txt", "12.png", "7"]), 13);
        assert_eq!(next_export_index(["a.png", "0.png"]), 1);
    }

    #[test]
    fn free_names_count_up() {
        assert_eq!(free_form_name::<&str>(&[], "unnamed", ".json"), "unnamed.json");
        assert_eq!(
            free_form_name(&["unnamed.json", "unnamed_1.json"], "unnamed", ".json"),
            "unnamed_2.json"
        );
        assert_eq!(free_form_name(&["unnamed_1.json"], "unnamed", ".json"), "unnamed.json");
    }
}
