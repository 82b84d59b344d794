//=========================================================================
// Input
//=========================================================================
//
// Backend-independent input types and the per-frame input snapshot.
//
// Architecture:
//   Platform → InputEvent (event.rs) → InputState (state.rs) → components
//
//=========================================================================

//=== Module Declarations =================================================

pub mod event;
mod state;

//=== Public API ==========================================================

pub use event::{InputEvent, KeyCode, Modifiers, MouseButton};
pub use state::InputState;
