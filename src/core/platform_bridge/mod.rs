//=========================================================================
// Platform Bridge
//=========================================================================
//
// Bridges a windowing backend (winit, headless) with the core.
//
// This module defines the contract between platform implementations and
// the frame loop, so backends can be swapped without touching core code.
//
// Components:
// - `interface`: the `Platform` trait, event and error types
// - `event_collector`: core-side draining of the event channel
// - `headless`: scripted platform for tests and servers
//
//=========================================================================

//=== Module Declarations =================================================

mod event_collector;
mod headless;
mod interface;

//=== Public API ==========================================================

pub use event_collector::{EventCollector, FrameEvents};
pub use headless::HeadlessPlatform;
pub use interface::{Platform, PlatformError, PlatformEvent};
pub(crate) use interface::forward_event;
