//=========================================================================
// Input Buffer
//=========================================================================
//
// Collects input between two pumps of the event loop.
//
// Discrete events (keys, buttons, scroll) keep arrival order. An exact
// repeat of the previous key or button event is dropped; back-to-back
// scroll events are summed into one. Continuous events
// (mouse motion) keep only the latest value. The buffer is drained once
// per pump into a single `PlatformEvent::Inputs`.
//
//=========================================================================

//=== Internal Dependencies ===============================================

use crate::core::input::InputEvent;

const DISCRETE_CAPACITY: usize = 128;

//=== InputBuffer =========================================================

#[derive(Debug)]
pub(crate) struct InputBuffer {
    discrete: Vec<InputEvent>,
    mouse_motion: Option<InputEvent>,
}

impl InputBuffer {
    pub(crate) fn new() -> Self {
        Self {
            discrete: Vec::with_capacity(DISCRETE_CAPACITY),
            mouse_motion: None,
        }
    }

    /// Replaces the pending continuous event.
    pub(crate) fn push_continuous(&mut self, event: InputEvent) {
        self.mouse_motion = Some(event);
    }

    /// Appends a discrete event. Scroll adds onto a preceding scroll;
    /// any other event that repeats the previous one is dropped.
    pub(crate) fn push_discrete(&mut self, event: InputEvent) {
        if let (Some(InputEvent::MouseScrolled { dx, dy }), InputEvent::MouseScrolled { dx: more_x, dy: more_y }) =
            (self.discrete.last_mut(), &event)
        {
            *dx += *more_x;
            *dy += *more_y;
            return;
        }

        if self.discrete.last() != Some(&event) {
            self.discrete.push(event);
        }
    }

    /// Takes everything collected so far as `(discrete, continuous)`.
    /// Returns `None` when nothing was collected.
    pub(crate) fn drain(&mut self) -> Option<(Vec<InputEvent>, Vec<InputEvent>)> {
        if self.is_empty() {
            return None;
        }

        let discrete = std::mem::replace(&mut self.discrete, Vec::with_capacity(DISCRETE_CAPACITY));
        let continuous = self.mouse_motion.take().into_iter().collect();
        Some((discrete, continuous))
    }

    pub(crate) fn is_empty(&self) -> bool {
        self.discrete.is_empty() && self.mouse_motion.is_none()
    }
}

//=========================================================================
// Unit Tests
//=========================================================================
