//=========================================================================
// Event Collector
//=========================================================================
//
// Core-side drain of the platform event channel.
//
// Architecture:
//   Receiver<PlatformEvent> → collect_frame() → FrameEvents
//                                                 ├─ inputs (arrival order)
//                                                 ├─ resized (latest)
//                                                 └─ closed
//
// Draining is bounded per frame so a flood of OS events cannot starve the
// simulation; anything left over is picked up next frame.
//
//=========================================================================

//=== External Dependencies ===============================================

use crossbeam_channel::{Receiver, TryRecvError};
use log::warn;

//=== Internal Dependencies ===============================================

use super::PlatformEvent;
use crate::core::input::InputEvent;

//=== FrameEvents =========================================================

/// Platform events gathered for one frame.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FrameEvents {
    /// Input events, discrete before continuous within each batch.
    pub inputs: Vec<InputEvent>,

    /// Last reported size, if the window was resized.
    pub resized: Option<(u32, u32)>,

    /// The window was closed or the platform went away.
    pub closed: bool,
}

//=== EventCollector ======================================================

/// Drains platform events with a per-frame bound.
#[derive(Debug)]
pub struct EventCollector {
    receiver: Receiver<PlatformEvent>,
}

impl EventCollector {
    /// Upper bound on channel messages handled per frame.
    pub const MAX_EVENTS_PER_FRAME: usize = 100;

    pub fn new(receiver: Receiver<PlatformEvent>) -> Self {
        Self { receiver }
    }

    /// Collects pending platform events.
    ///
    /// A disconnected channel counts as a close.
    pub fn collect_frame(&mut self) -> FrameEvents {
        let mut frame = FrameEvents::default();
        let mut drained = 0;

        while drained < Self::MAX_EVENTS_PER_FRAME {
            match self.receiver.try_recv() {
                Ok(event) => {
                    Self::handle_event(&mut frame, event);
                    drained += 1;
                }
                Err(TryRecvError::Disconnected) => {
                    frame.closed = true;
                    break;
                }
                Err(TryRecvError::Empty) => break,
            }
        }

        if drained >= Self::MAX_EVENTS_PER_FRAME {
            warn!(
                target: "platform",
                "Event queue backlog: drained {} events this frame, {} left",
                drained, self.receiver.len()
            );
        }

        frame
    }

    /// Discards everything still queued.
    pub fn discard_pending(&mut self) -> usize {
        self.receiver.try_iter().count()
    }

    fn handle_event(frame: &mut FrameEvents, event: PlatformEvent) {
        match event {
            PlatformEvent::Inputs { discrete, continuous } => {
                frame.inputs.extend(discrete);
                frame.inputs.extend(continuous);
            }
            PlatformEvent::Resized { width, height } => {
                frame.resized = Some((width, height));
            }
            PlatformEvent::WindowClosed => frame.closed = true,
        }
    }
}

//=========================================================================
// Unit Tests
//=========================================================================
