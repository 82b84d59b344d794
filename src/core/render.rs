//=========================================================================
// Render Seam
//=========================================================================
//
// What the frame loop hands to a renderer, and the components a renderer
// looks for.
//
// The pipeline owns no scene data. Each frame it receives a read-only
// view of the live actor set and discovers lights and renderables through
// the type-query API, so scenes never register anything with it.
//
//=========================================================================

//=== External Dependencies ===============================================

use glam::{Vec3, Vec4};
use log::trace;
use thiserror::Error;

//=== Internal Dependencies ===============================================

use crate::core::actor::ActorSet;
use crate::core::component::Component;
use crate::core::game::{FrameTime, WindowState};

//=== RenderError =========================================================

/// Render failures. Any of these ends the current run.
#[derive(Debug, Error)]
pub enum RenderError {
    /// The presentation surface is gone (e.g. the device was reset).
    #[error("render surface lost")]
    SurfaceLost,

    /// Backend-specific failure.
    #[error("render backend error: {0}")]
    Backend(String),
}

//=== RenderFrame =========================================================

/// Read-only view of one frame.
#[derive(Debug, Clone, Copy)]
pub struct RenderFrame<'a> {
    /// Live actors in creation order.
    pub actors: &'a ActorSet,

    /// Clear color (RGBA).
    pub sky_color: Vec4,

    /// Window size and visibility.
    pub window: WindowState,

    /// Frame timing.
    pub time: &'a FrameTime,
}

//=== RenderPipeline ======================================================

/// Renderer driven once per visible frame.
pub trait RenderPipeline {
    /// Draws `frame`. Called only while the window is not minimized.
    fn render(&mut self, frame: &RenderFrame<'_>) -> Result<(), RenderError>;

    /// Handle of the depth target, for passes that sample scene depth.
    fn depth_frame_buffer(&self) -> Option<u32> {
        None
    }

    /// The drawable size changed.
    fn resize(&mut self, _width: u32, _height: u32) {}
}

//=== NullRenderPipeline ==================================================

/// Pipeline that draws nothing but walks the scene like a real one would.
#[derive(Debug, Default)]
pub struct NullRenderPipeline {
    frames: u64,
}

impl NullRenderPipeline {
    pub fn new() -> Self {
        Self::default()
    }

    /// Frames rendered so far.
    pub fn frames(&self) -> u64 {
        self.frames
    }
}

impl RenderPipeline for NullRenderPipeline {
    fn render(&mut self, frame: &RenderFrame<'_>) -> Result<(), RenderError> {
        let lights = frame.actors.find_components::<Light>();
        let meshes = frame.actors.find_components::<MeshRenderer>();
        trace!(
            target: "render",
            "Frame {}: {} lights, {} meshes",
            frame.time.frame, lights.len(), meshes.len()
        );
        self.frames += 1;
        Ok(())
    }
}

//=== Components ==========================================================

/// Point light.
#[derive(Debug, Clone, PartialEq)]
pub struct Light {
    pub color: Vec3,
    pub intensity: f32,
}

impl Default for Light {
    fn default() -> Self {
        Self {
            color: Vec3::ONE,
            intensity: 1.0,
        }
    }
}

impl Component for Light {
    fn name(&self) -> &str {
        "Light"
    }
}

/// Draws a mesh at its actor's transform.
#[derive(Debug, Clone, PartialEq)]
pub struct MeshRenderer {
    /// Resource key of the mesh.
    pub mesh: String,

    /// Base color (RGBA).
    pub color: Vec4,

    pub cast_shadows: bool,
}

impl MeshRenderer {
    pub fn new(mesh: impl Into<String>) -> Self {
        Self {
            mesh: mesh.into(),
            color: Vec4::ONE,
            cast_shadows: true,
        }
    }
}

impl Component for MeshRenderer {
    fn name(&self) -> &str {
        "MeshRenderer"
    }
}

//=========================================================================
// Unit Tests
//=========================================================================
