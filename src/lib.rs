//=========================================================================
// Stagehand Library Root
//
// Actor/component runtime with a fixed-step game loop and a scene
// reset/switch lifecycle.
//
// Responsibilities:
// - Expose the engine entry point (`EngineBuilder` / `Engine`)
// - Expose the core model (actors, components, scenes) for games
// - Keep the winit backend behind the `Platform` trait
//
// Typical usage:
// ```no_run
// use stagehand::prelude::*;
//
// fn main() -> std::process::ExitCode {
//     stagehand::logging::init();
//     let mut engine = EngineBuilder::new().build().expect("engine boot");
//     engine.set_scenes(vec![/* Box<dyn Scene> */]);
//     engine.run()
// }
// ```
//
//=========================================================================

//--- Public Modules ------------------------------------------------------
//
// `core` holds the runtime model and the frame loop; `engine` the boot
// sequence, configuration and the scene run loop.
//
pub mod core;
pub mod engine;
pub mod logging;
pub mod prelude;

//--- Internal Modules ----------------------------------------------------
//
// `platform` holds the winit integration. Only the `WinitPlatform` type
// is exported, for callers that build it themselves.
//
mod platform;

//--- Public Exports ------------------------------------------------------

pub use engine::{Engine, EngineBuilder};
pub use platform::WinitPlatform;
