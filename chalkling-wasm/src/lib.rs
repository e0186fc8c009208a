use chalkling::events::Notification;
use rand::rngs::StdRng;
use std::cell::RefCell;
use std::rc::Rc;
use wasm_bindgen::prelude::*;
mod api;
mod error;
mod interop;

pub use api::{export_index_after, free_name, set_panic_hook};

#[wasm_bindgen(start)]
pub fn initialize() {
    api::set_panic_hook();
    init_logger();
}

#[cfg(feature = "debug_logs")]
fn init_logger() {
    use wasm_bindgen_console_logger::DEFAULT_LOGGER;
    // a second start (e.g. hot reload) keeps the first logger
    if log::set_logger(&DEFAULT_LOGGER).is_ok() {
        log::set_max_level(log::LevelFilter::Debug);
    }
}

#[cfg(not(feature = "debug_logs"))]
fn init_logger() {}

#[wasm_bindgen]
pub struct Editor {
    pub(crate) inner: chalkling::editor::Editor,
    pub(crate) rng: StdRng,
    pub(crate) pending: Rc<RefCell<Vec<Notification>>>,
}

impl Editor {
    pub fn rs_new(config: chalkling::config::EditorConfig) -> Editor {
        let mut inner = chalkling::editor::Editor::new(config);
        let pending = Rc::new(RefCell::new(Vec::new()));
        let queue = Rc::clone(&pending);
        inner.subscribe(move |n| {
            queue.borrow_mut().push(*n);
            false
        });
        Editor { inner, rng: chalkling::random::system_rng(), pending }
    }
    pub fn rs_geom_version(&self) -> u64 {
        self.inner.form().geom_version()
    }
}
