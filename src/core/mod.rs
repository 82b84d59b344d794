//=========================================================================
// Core Systems
//
// Everything that runs inside a scene run, independent of the windowing
// backend.
//
// Responsibilities:
// - Actors, components and their lifecycle dispatch
// - The per-run game instance and its frame loop
// - Scenes and the registry the engine selects them from
// - Input state, transforms and the resource cache
// - Seams to the outside world: platform bridge, rendering, GPU compute
//
// Notes:
// Core code never touches winit. Backends talk to it through the
// `platform_bridge` channel and the `Platform` trait only.
//
//=========================================================================

//=== Module Declarations =================================================

pub mod actor;
pub mod component;
pub mod game;
pub mod gpu;
pub mod input;
pub mod platform_bridge;
pub mod render;
pub mod resources;
pub mod scene;
pub mod transform;
