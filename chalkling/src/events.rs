/// Semantic change notifications emitted by the editor.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Notification {
    SelectionChanged,
    FormEdited,
    RegenerateRequested,
    FormLoaded,
}

type Listener<E> = Box<dyn FnMut(&E) -> bool>;

/// Ordered listener chain. Listeners run in registration order and the
/// first one returning `true` consumes the event.
pub struct Dispatcher<E> {
    listeners: Vec<Listener<E>>,
}

impl<E> Default for Dispatcher<E> {
    fn default() -> Self {
        Dispatcher { listeners: Vec::new() }
    }
}

impl<E> std::fmt::Debug for Dispatcher<E> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Dispatcher").field("listeners", &self.listeners.len()).finish()
    }
}

impl<E> Dispatcher<E> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn subscribe<F>(&mut self, listener: F)
    where
        F: FnMut(&E) -> bool + 'static,
    {
        self.listeners.push(Box::new(listener));
    }

    pub fn len(&self) -> usize {
        self.listeners.len()
    }

    pub fn is_empty(&self) -> bool {
        self.listeners.is_empty()
    }

    /// Returns true if some listener consumed the event.
    pub fn dispatch(&mut self, event: &E) -> bool {
        self.listeners.iter_mut().any(|l| l(event))
    }
}
