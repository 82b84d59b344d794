//=========================================================================
// Platform Bridge Interface
//=========================================================================
//
// Contract between a windowing backend and the core (events, errors and
// the `Platform` trait).
//
// Everything runs on one thread. The backend pushes `PlatformEvent`s into
// a bounded channel while `pump_events` runs; the core drains the channel
// right after. The channel is the only path from OS events to the core.
//
//=========================================================================

//=== External Dependencies ===============================================

use std::time::Duration;

use crossbeam_channel::{Sender, TrySendError};
use log::{trace, warn};
use thiserror::Error;

//=== Internal Dependencies ===============================================

use crate::core::gpu::GraphicsDevice;
use crate::core::input::InputEvent;

//=== PlatformEvent =======================================================

/// Events sent from the platform to the core.
#[derive(Debug, Clone, PartialEq)]
pub enum PlatformEvent {
    /// Input gathered since the previous pump.
    ///
    /// `discrete` keeps arrival order; `continuous` is coalesced.
    Inputs {
        discrete: Vec<InputEvent>,
        continuous: Vec<InputEvent>,
    },

    /// Drawable area changed size. `0 x 0` means minimized.
    Resized { width: u32, height: u32 },

    /// Window close requested by the user or the OS.
    WindowClosed,
}

//=== PlatformError =======================================================

/// Platform initialization and runtime errors.
#[derive(Debug, Error)]
pub enum PlatformError {
    /// Event loop creation failed (OS-level issue).
    #[error("event loop creation failed: {0}")]
    EventLoopCreation(String),

    /// The window could not be opened.
    #[error("window creation failed: {0}")]
    WindowCreation(String),

    /// No usable graphics context behind the window.
    #[error("graphics context unavailable: {0}")]
    GraphicsContext(String),

    /// Event loop execution error.
    #[error("event loop error: {0}")]
    EventLoopExecution(String),
}

//=== Platform ============================================================

/// Window and OS event source driven by the frame loop.
pub trait Platform {
    /// Processes pending OS events, forwarding them into the event channel.
    ///
    /// `timeout` bounds how long the call may wait for new events;
    /// `Some(Duration::ZERO)` never blocks.
    fn pump_events(&mut self, timeout: Option<Duration>) -> Result<(), PlatformError>;

    /// Current drawable size in physical pixels.
    fn window_size(&self) -> (u32, u32);

    /// Whether the window is minimized.
    fn is_minimized(&self) -> bool;

    /// Whether the window is still open.
    fn is_open(&self) -> bool;

    /// Asks the window to close. Takes effect on the next pump.
    fn request_close(&mut self);

    /// Shows the frame that was just rendered.
    fn present(&mut self) -> Result<(), PlatformError>;

    /// Graphics device backing the window.
    fn graphics_device(&self) -> Result<GraphicsDevice, PlatformError>;
}

//=== Forwarding ==========================================================

/// Pushes `event` into the core channel without blocking.
///
/// Producer and consumer share a thread, so a full channel cannot drain
/// while we wait; the event is dropped with a warning instead. Returns
/// `false` if the event was not delivered.
pub(crate) fn forward_event(sender: &Sender<PlatformEvent>, event: PlatformEvent) -> bool {
    match sender.try_send(event) {
        Ok(()) => true,
        Err(TrySendError::Full(event)) => {
            warn!(target: "platform", "Event channel full, dropping {:?}", event);
            false
        }
        Err(TrySendError::Disconnected(_)) => {
            trace!(target: "platform", "Event channel disconnected, event dropped");
            false
        }
    }
}

//=========================================================================
// Unit Tests
//=========================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn platform_error_display_format() {
        let err = PlatformError::WindowCreation("no display".into());
        assert_eq!(err.to_string(), "window creation failed: no display");
    }

    #[test]
    fn forward_drops_when_channel_is_full() {
        let (tx, rx) = crossbeam_channel::bounded(1);

        assert!(forward_event(&tx, PlatformEvent::WindowClosed));
        assert!(!forward_event(&tx, PlatformEvent::WindowClosed));
        assert_eq!(rx.len(), 1);

        drop(rx);
        assert!(!forward_event(&tx, PlatformEvent::WindowClosed));
    }

    #[test]
    fn platform_event_is_debug() {
        let event = PlatformEvent::Resized { width: 0, height: 0 };
        assert!(format!("{event:?}").contains("Resized"));
    }
}
