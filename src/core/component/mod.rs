//=========================================================================
// Component System
//=========================================================================
//
// Polymorphic behaviour units attached to actors.
//
// Architecture:
//   Actor
//     └─ Vec<ComponentSlot>            (attachment order = dispatch order)
//          ├─ Box<dyn Component>       (user behaviour)
//          └─ enabled / owner / started / destroyed / faulted
//
// Lifecycle (driven by GameInstance):
//   attach → start (once) → update / fixed_update (per frame) → on_destroy (once)
//
//=========================================================================

//=== External Dependencies ===============================================

use std::any::Any;

//=== Module Declarations =================================================

mod context;
mod slot;

//=== Public API ==========================================================

pub use context::ComponentContext;
pub use slot::ComponentSlot;
pub(crate) use slot::{HookEnv, HookPhase};

/// Result type returned by every lifecycle hook.
///
/// Returning `Err` disables the failing component; the rest of the frame
/// carries on.
pub type HookResult = anyhow::Result<()>;

//=== AsAny ===============================================================

/// Downcasting support for component trait objects.
///
/// Implemented automatically for every `'static` type; user code never
/// implements it by hand.
pub trait AsAny: Any {
    /// Upcasts to `&dyn Any`.
    fn as_any(&self) -> &dyn Any;

    /// Upcasts to `&mut dyn Any`.
    fn as_any_mut(&mut self) -> &mut dyn Any;
}

impl<T: Any> AsAny for T {
    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
}

//=== Component Trait =====================================================

/// Behaviour attached to exactly one actor.
///
/// Every hook has a no-op default, so a type implements only what it
/// needs:
///
/// ```rust
/// use stagehand::prelude::*;
///
/// struct Spinner {
///     degrees_per_second: f32,
/// }
///
/// impl Component for Spinner {
///     fn name(&self) -> &str {
///         "Spinner"
///     }
///
///     fn update(&mut self, ctx: &mut ComponentContext<'_>) -> HookResult {
///         let step = self.degrees_per_second * ctx.time().delta as f32;
///         ctx.transform_mut().rotate(Vec3::new(0.0, step, 0.0));
///         Ok(())
///     }
/// }
/// ```
///
/// # Hook Guarantees
///
/// - `start` runs once, before the first `update` / `fixed_update`,
///   whether or not the component is enabled.
/// - `update` runs once per rendered frame while enabled.
/// - `fixed_update` runs at the fixed simulation rate while enabled.
/// - `on_destroy` runs once when the owning actor is destroyed or the run
///   ends, whether or not the component is enabled.
pub trait Component: AsAny {
    /// Human-readable label used in logs.
    fn name(&self) -> &str {
        "Component"
    }

    /// Called once after attachment, before any update.
    fn start(&mut self, _ctx: &mut ComponentContext<'_>) -> HookResult {
        Ok(())
    }

    /// Called once per rendered frame.
    fn update(&mut self, _ctx: &mut ComponentContext<'_>) -> HookResult {
        Ok(())
    }

    /// Called at the fixed simulation rate.
    fn fixed_update(&mut self, _ctx: &mut ComponentContext<'_>) -> HookResult {
        Ok(())
    }

    /// Called once when the owning actor goes away.
    fn on_destroy(&mut self, _ctx: &mut ComponentContext<'_>) -> HookResult {
        Ok(())
    }
}
