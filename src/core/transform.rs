//=========================================================================
// Transform
//=========================================================================
//
// Spatial node attached to every actor.
//
// Hierarchy links are actor ids, never references or shared pointers:
// the actor arena is the only owner, a transform only names its parent
// and children. Resolving a link goes back through the arena
// (see `ActorSet::world_matrix`).
//
//=========================================================================

//=== External Dependencies ===============================================

use glam::{EulerRot, Mat4, Quat, Vec3};

//=== Internal Dependencies ===============================================

use crate::core::actor::ActorId;

//=== Detached Default ====================================================

/// Shared identity transform handed out for components without an owner.
static DETACHED: Transform = Transform::IDENTITY;

//=== Transform ===========================================================

/// Local position / rotation / scale plus hierarchy links.
///
/// Rotation is stored as Euler angles in degrees (pitch, yaw, roll around
/// X, Y, Z) and applied in Y → X → Z order.
#[derive(Debug, Clone, PartialEq)]
pub struct Transform {
    /// Local translation.
    pub position: Vec3,

    /// Local Euler rotation in degrees.
    pub rotation: Vec3,

    /// Local scale.
    pub scale: Vec3,

    parent: Option<ActorId>,
    children: Vec<ActorId>,
}

impl Transform {
    /// Identity transform with no links.
    pub const IDENTITY: Self = Self {
        position: Vec3::ZERO,
        rotation: Vec3::ZERO,
        scale: Vec3::ONE,
        parent: None,
        children: Vec::new(),
    };

    /// Creates an identity transform.
    pub fn new() -> Self {
        Self::IDENTITY
    }

    /// Returns the shared detached default.
    ///
    /// This is what a component resolves to when it is not attached to a
    /// live actor. It is immutable and has no parent or children.
    pub fn detached() -> &'static Transform {
        &DETACHED
    }

    //--- Builders ---------------------------------------------------------

    /// Sets the position (builder style).
    pub fn with_position(mut self, position: Vec3) -> Self {
        self.position = position;
        self
    }

    /// Sets the rotation in degrees (builder style).
    pub fn with_rotation(mut self, rotation: Vec3) -> Self {
        self.rotation = rotation;
        self
    }

    /// Sets the scale (builder style).
    pub fn with_scale(mut self, scale: Vec3) -> Self {
        self.scale = scale;
        self
    }

    //--- Mutation ---------------------------------------------------------

    /// Moves by `offset` in local space.
    pub fn translate(&mut self, offset: Vec3) {
        self.position += offset;
    }

    /// Adds `degrees` to the current rotation.
    pub fn rotate(&mut self, degrees: Vec3) {
        self.rotation += degrees;
    }

    //--- Queries ----------------------------------------------------------

    /// Rotation as a quaternion.
    pub fn rotation_quat(&self) -> Quat {
        Quat::from_euler(
            EulerRot::YXZ,
            self.rotation.y.to_radians(),
            self.rotation.x.to_radians(),
            self.rotation.z.to_radians(),
        )
    }

    /// Local matrix (translation · rotation · scale).
    pub fn local_matrix(&self) -> Mat4 {
        Mat4::from_scale_rotation_translation(self.scale, self.rotation_quat(), self.position)
    }

    /// Parent actor, if this transform is linked under one.
    pub fn parent(&self) -> Option<ActorId> {
        self.parent
    }

    /// Child actors in attachment order.
    pub fn children(&self) -> &[ActorId] {
        &self.children
    }

    /// Returns `true` if this is the shared detached default.
    pub fn is_detached_default(&self) -> bool {
        std::ptr::eq(self, &DETACHED)
    }

    //--- Hierarchy Links (maintained by ActorSet) -------------------------

    pub(crate) fn set_parent_link(&mut self, parent: Option<ActorId>) {
        self.parent = parent;
    }

    pub(crate) fn push_child_link(&mut self, child: ActorId) {
        if !self.children.contains(&child) {
            self.children.push(child);
        }
    }

    pub(crate) fn remove_child_link(&mut self, child: ActorId) {
        self.children.retain(|&c| c != child);
    }

    pub(crate) fn take_child_links(&mut self) -> Vec<ActorId> {
        std::mem::take(&mut self.children)
    }
}

impl Default for Transform {
    fn default() -> Self {
        Self::IDENTITY
    }
}

//=========================================================================
// Unit Tests
//=========================================================================
