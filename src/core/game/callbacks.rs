//=========================================================================
// Callbacks
//=========================================================================
//
// Multicast hooks that let scene code tap into frame phases without the
// game instance depending on scene code.
//
//=========================================================================

//=== External Dependencies ===============================================

use std::fmt;

//=== Internal Dependencies ===============================================

use super::timer::FrameTime;

//=== Callback ============================================================

/// Ordered list of listeners receiving `&E`.
pub struct Callback<E> {
    listeners: Vec<Box<dyn FnMut(&E)>>,
}

impl<E> Callback<E> {
    /// Creates an empty callback.
    pub fn new() -> Self {
        Self {
            listeners: Vec::new(),
        }
    }

    /// Adds a listener. Listeners fire in registration order.
    pub fn register<F>(&mut self, listener: F)
    where
        F: FnMut(&E) + 'static,
    {
        self.listeners.push(Box::new(listener));
    }

    /// Calls every listener with `event`.
    pub fn invoke(&mut self, event: &E) {
        for listener in &mut self.listeners {
            listener(event);
        }
    }

    /// Calls every listener once, then removes them all.
    pub fn invoke_once(&mut self, event: &E) {
        for mut listener in std::mem::take(&mut self.listeners) {
            listener(event);
        }
    }

    /// Removes every listener.
    pub fn clear(&mut self) {
        self.listeners.clear();
    }

    pub fn len(&self) -> usize {
        self.listeners.len()
    }

    pub fn is_empty(&self) -> bool {
        self.listeners.is_empty()
    }
}

impl<E> Default for Callback<E> {
    fn default() -> Self {
        Self::new()
    }
}

impl<E> fmt::Debug for Callback<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Callback")
            .field("listeners", &self.listeners.len())
            .finish()
    }
}

//=== GameCallbacks =======================================================

/// Frame-phase hooks exposed by a game instance.
#[derive(Debug, Default)]
pub struct GameCallbacks {
    /// Cursor moved; receives the new `(x, y)` in window pixels.
    pub on_mouse_move: Callback<(f64, f64)>,

    /// Wheel scrolled; receives `(dx, dy)`.
    pub on_mouse_scroll: Callback<(f64, f64)>,

    /// Window resized; receives the new `(width, height)`.
    pub on_resize: Callback<(u32, u32)>,

    /// Every frame, paused or not, after the simulation phases.
    pub animation_update: Callback<FrameTime>,

    /// Every frame while the simulation is paused.
    pub god_update: Callback<FrameTime>,

    /// Once, after every component has been destroyed.
    pub on_finalize: Callback<()>,
}

//=========================================================================
// Unit Tests
//=========================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::rc::Rc;

    #[test]
    fn listeners_fire_in_registration_order() {
        let log = Rc::new(RefCell::new(Vec::new()));
        let mut callback = Callback::<u32>::new();

        for tag in ["a", "b"] {
            let log = Rc::clone(&log);
            callback.register(move |value| log.borrow_mut().push(format!("{tag}{value}")));
        }
        callback.invoke(&7);

        assert_eq!(*log.borrow(), vec!["a7", "b7"]);
    }

    #[test]
    fn invoke_once_empties_the_list() {
        let count = Rc::new(RefCell::new(0));
        let mut callback = Callback::<()>::new();
        let c = Rc::clone(&count);
        callback.register(move |_| *c.borrow_mut() += 1);

        callback.invoke_once(&());
        callback.invoke_once(&());

        assert_eq!(*count.borrow(), 1);
        assert!(callback.is_empty());
    }

    #[test]
    fn clear_removes_listeners() {
        let mut callback = Callback::<(f64, f64)>::new();
        callback.register(|_| {});
        assert_eq!(callback.len(), 1);

        callback.clear();

        assert!(callback.is_empty());
    }
}
