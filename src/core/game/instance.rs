//=========================================================================
// GameInstance
//=========================================================================

//=== External Dependencies ===============================================

use std::thread;
use std::time::{Duration, Instant};

use glam::Vec4;
use log::{debug, info, trace, warn};

//=== Internal Dependencies ===============================================

use super::timer::{FixedStepper, FrameTimer};
use super::{
    FrameMode, FrameTime, GameCallbacks, GameState, RunOutcome, SimulationState, WindowState,
};
use crate::core::actor::{Actor, ActorId, ActorSet, Command, Commands};
use crate::core::component::{Component, HookEnv, HookPhase};
use crate::core::input::{InputEvent, InputState, KeyCode};
use crate::core::platform_bridge::{EventCollector, FrameEvents, Platform};
use crate::core::render::{RenderFrame, RenderPipeline};
use crate::core::resources::ResourceCache;
use crate::engine::config::{EngineConfig, HotkeyConfig};
use crate::engine::{EngineControl, EngineError};

/// Rounds of command application per phase boundary. Commands issued by
/// `on_destroy` hooks of destroyed actors can cascade.
const MAX_COMMAND_ROUNDS: usize = 16;

//=== GameInstance ========================================================

/// Live actors plus everything needed to run them for one scene run.
///
/// The engine creates a fresh instance for every run, lets the active
/// scene populate it, then calls [`run`](Self::run). Components and
/// callbacks never outlive the instance.
pub struct GameInstance {
    state: GameState,
    actors: ActorSet,
    commands: Commands,

    pipeline: Box<dyn RenderPipeline>,
    resources: ResourceCache,
    callbacks: GameCallbacks,
    control: EngineControl,

    timer: FrameTimer,
    stepper: FixedStepper,
    time: FrameTime,
    frame_budget: Option<Duration>,
    simulation: SimulationState,

    input: InputState,
    hotkeys: HotkeyConfig,
    window: WindowState,
    sky_color: Vec4,
}

impl GameInstance {
    //--- Construction -----------------------------------------------------

    /// Creates an empty instance.
    ///
    /// `resources` is lent for the run; take it back with
    /// [`take_resources`](Self::take_resources).
    pub fn new(
        config: &EngineConfig,
        control: EngineControl,
        pipeline: Box<dyn RenderPipeline>,
        resources: ResourceCache,
    ) -> Self {
        let timing = &config.timing;
        let stepper = FixedStepper::new(timing.fixed_step(), timing.max_fixed_steps());
        let time = FrameTime {
            fixed_delta: stepper.step().as_secs_f64(),
            ..FrameTime::default()
        };

        Self {
            state: GameState::Initializing,
            actors: ActorSet::new(),
            commands: Commands::new(),
            pipeline,
            resources,
            callbacks: GameCallbacks::default(),
            control,
            timer: FrameTimer::new(timing.clock(), timing.max_frame_delta()),
            stepper,
            time,
            frame_budget: timing.frame_budget(),
            simulation: SimulationState::default(),
            input: InputState::new(),
            hotkeys: config.hotkeys.clone(),
            window: WindowState {
                size: (config.window.width, config.window.height),
                ..WindowState::default()
            },
            sky_color: Vec4::ZERO,
        }
    }

    /// Current lifecycle state.
    pub fn state(&self) -> GameState {
        self.state
    }

    //--- Actors -----------------------------------------------------------

    /// Creates an actor in the live set.
    pub fn create_actor(&mut self, name: impl Into<String>) -> ActorId {
        let id = self.actors.spawn(name);
        trace!(target: "game", "Actor {:?} created", id);
        id
    }

    pub fn actor(&self, id: ActorId) -> Option<&Actor> {
        self.actors.get(id)
    }

    pub fn actor_mut(&mut self, id: ActorId) -> Option<&mut Actor> {
        self.actors.get_mut(id)
    }

    /// Attaches `component` to actor `id`. Returns `None` if the actor
    /// does not exist.
    pub fn add_component<T: Component>(&mut self, id: ActorId, component: T) -> Option<&mut T> {
        self.actors.get_mut(id).map(|actor| actor.add_component(component))
    }

    /// Destroys an actor now, running `on_destroy` on each of its
    /// components first. Returns `false` for an unknown id.
    ///
    /// Children are orphaned. Commands queued by the hooks are applied at
    /// the next phase boundary.
    pub fn destroy_actor(&mut self, id: ActorId) -> bool {
        let Some(actor) = self.actors.get_mut(id) else {
            return false;
        };

        let mut env = HookEnv {
            time: &self.time,
            input: &self.input,
            control: &self.control,
            commands: &mut self.commands,
        };
        destroy_components(actor, &mut env);

        self.actors.remove(id);
        debug!(target: "game", "Actor {:?} destroyed", id);
        true
    }

    /// The live actor set.
    pub fn actors(&self) -> &ActorSet {
        &self.actors
    }

    /// The live actor set, mutable (hierarchy edits).
    pub fn actors_mut(&mut self) -> &mut ActorSet {
        &mut self.actors
    }

    /// Every `T` across all actors, in creation then attachment order.
    pub fn find_components<T: Component>(&self) -> Vec<&T> {
        self.actors.find_components::<T>()
    }

    pub fn find_components_mut<T: Component>(&mut self) -> Vec<&mut T> {
        self.actors.find_components_mut::<T>()
    }

    pub fn find_component<T: Component>(&self) -> Option<&T> {
        self.actors.find_component::<T>()
    }

    //--- Callbacks & Resources --------------------------------------------

    pub fn callbacks_mut(&mut self) -> &mut GameCallbacks {
        &mut self.callbacks
    }

    pub fn resources(&self) -> &ResourceCache {
        &self.resources
    }

    pub fn resources_mut(&mut self) -> &mut ResourceCache {
        &mut self.resources
    }

    /// Hands the lent cache back, leaving an empty one in its place.
    pub fn take_resources(&mut self) -> ResourceCache {
        std::mem::take(&mut self.resources)
    }

    //--- Window -----------------------------------------------------------

    pub fn window(&self) -> WindowState {
        self.window
    }

    pub fn window_size(&self) -> (u32, u32) {
        self.window.size
    }

    pub fn window_minimized(&self) -> bool {
        self.window.minimized
    }

    /// Depth target of the render pipeline, if it exposes one.
    pub fn depth_frame_buffer(&self) -> Option<u32> {
        self.pipeline.depth_frame_buffer()
    }

    pub fn sky_color(&self) -> Vec4 {
        self.sky_color
    }

    pub fn set_sky_color(&mut self, color: Vec4) {
        self.sky_color = color;
    }

    //--- Control & Simulation ---------------------------------------------

    /// Engine control handle shared with component hooks.
    pub fn control(&self) -> &EngineControl {
        &self.control
    }

    /// Ends this run after the current frame and rebuilds the scene.
    pub fn reset(&self) {
        self.control.reset();
    }

    pub fn set_paused(&mut self, paused: bool) {
        self.simulation.paused = paused;
    }

    pub fn is_paused(&self) -> bool {
        self.simulation.paused
    }

    /// While paused, runs exactly one update and one fixed pass next frame.
    pub fn request_step(&mut self) {
        if self.simulation.paused {
            self.simulation.step_requested = true;
        }
    }

    pub fn time(&self) -> &FrameTime {
        &self.time
    }

    pub fn input(&self) -> &InputState {
        &self.input
    }

    //=====================================================================
    // Frame Loop
    //=====================================================================

    /// Runs the frame loop until the window closes or a reset is pending,
    /// then tears every actor down.
    ///
    /// A render or platform failure ends the loop; teardown still happens
    /// before the error is returned.
    pub fn run(
        &mut self,
        platform: &mut dyn Platform,
        events: &mut EventCollector,
    ) -> Result<RunOutcome, EngineError> {
        if self.state != GameState::Initializing {
            warn!(target: "game", "run() on a {:?} game instance ignored", self.state);
            return Ok(self.outcome());
        }

        self.state = GameState::Running;
        self.window.size = platform.window_size();
        self.window.minimized = platform.is_minimized();
        info!(target: "game", "Run started with {} actors", self.actors.len());

        let result = self.main_loop(platform, events);
        self.finalize();

        let outcome = self.outcome();
        info!(
            target: "game",
            "Run ended after {} frames ({:?})",
            self.time.frame, outcome
        );
        result.map(|()| outcome)
    }

    fn main_loop(
        &mut self,
        platform: &mut dyn Platform,
        events: &mut EventCollector,
    ) -> Result<(), EngineError> {
        loop {
            let frame_start = Instant::now();

            //--- 1. Events ------------------------------------------------
            platform.pump_events(Some(Duration::ZERO))?;
            let frame_events = events.collect_frame();
            self.apply_events(frame_events, platform);
            if !self.window.open {
                break;
            }

            //--- 2. Start -------------------------------------------------
            self.dispatch(HookPhase::Start);

            //--- 3. Update ------------------------------------------------
            let delta = self.timer.tick();
            let mode = self.simulation.take_frame();
            self.time.delta = delta.as_secs_f64();

            match mode {
                FrameMode::Running => self.time.elapsed += self.time.delta,
                FrameMode::Step => self.time.elapsed += self.time.fixed_delta,
                FrameMode::Paused => {}
            }

            if mode != FrameMode::Paused {
                self.dispatch(HookPhase::Update);
            }

            //--- 4. Fixed update ------------------------------------------
            let steps = match mode {
                FrameMode::Running => {
                    self.stepper.accumulate(delta);
                    self.stepper.take_steps()
                }
                FrameMode::Step => 1,
                FrameMode::Paused => 0,
            };
            for _ in 0..steps {
                self.time.fixed_steps += 1;
                self.dispatch(HookPhase::FixedUpdate);
            }

            //--- 5. Frame callbacks ---------------------------------------
            self.callbacks.animation_update.invoke(&self.time);
            if self.simulation.paused {
                self.callbacks.god_update.invoke(&self.time);
            }

            //--- 6. Render ------------------------------------------------
            if !self.window.minimized {
                let frame = RenderFrame {
                    actors: &self.actors,
                    sky_color: self.sky_color,
                    window: self.window,
                    time: &self.time,
                };
                self.pipeline.render(&frame)?;
                platform.present()?;
            }

            self.time.frame += 1;

            //--- 7. Pacing & exit checks ----------------------------------
            if let Some(budget) = self.frame_budget {
                let spent = frame_start.elapsed();
                if spent < budget {
                    thread::sleep(budget - spent);
                }
            }

            self.window.open &= platform.is_open();
            if !self.window.open || self.control.is_reset_pending() {
                break;
            }
        }

        Ok(())
    }

    //--- Events -----------------------------------------------------------

    fn apply_events(&mut self, events: FrameEvents, platform: &mut dyn Platform) {
        self.input.begin_frame();
        self.input.process_events(&events.inputs);
        self.input.finalize_frame();

        for event in &events.inputs {
            match *event {
                InputEvent::MouseMoved { x, y } => self.callbacks.on_mouse_move.invoke(&(x, y)),
                InputEvent::MouseScrolled { dx, dy } => {
                    self.callbacks.on_mouse_scroll.invoke(&(dx, dy))
                }
                _ => {}
            }
        }

        if let Some((width, height)) = events.resized {
            debug!(target: "game", "Window resized to {}x{}", width, height);
            self.pipeline.resize(width, height);
            self.callbacks.on_resize.invoke(&(width, height));
        }

        self.window.size = platform.window_size();
        self.window.minimized = platform.is_minimized();

        self.handle_hotkeys(platform);

        if events.closed {
            info!(target: "game", "Window closed");
            self.window.open = false;
        }
        self.window.open &= platform.is_open();
    }

    fn handle_hotkeys(&mut self, platform: &mut dyn Platform) {
        let pressed = |key: Option<KeyCode>| key.is_some_and(|key| self.input.is_key_pressed(key));

        let close = pressed(self.hotkeys.close);
        let pause = pressed(self.hotkeys.pause);
        let step = pressed(self.hotkeys.step);

        if close {
            info!(target: "game", "Close hotkey pressed");
            platform.request_close();
        }
        if pause {
            self.simulation.paused = !self.simulation.paused;
            info!(
                target: "game",
                "Simulation {}",
                if self.simulation.paused { "paused" } else { "resumed" }
            );
        }
        if step {
            self.request_step();
        }
    }

    //--- Dispatch ---------------------------------------------------------

    /// Runs `phase` over every live actor in creation order, then applies
    /// the commands the hooks queued.
    fn dispatch(&mut self, phase: HookPhase) {
        let mut env = HookEnv {
            time: &self.time,
            input: &self.input,
            control: &self.control,
            commands: &mut self.commands,
        };

        for index in 0..self.actors.len() {
            let id = self.actors.ids()[index];
            let Some(actor) = self.actors.get_mut(id) else {
                continue;
            };

            let (name, transform, slots) = actor.parts_mut();
            for slot in slots.iter_mut() {
                if slot.wants(phase) {
                    slot.invoke(phase, id, name, transform, &mut env);
                }
            }
        }

        self.apply_commands();
    }

    fn apply_commands(&mut self) {
        for _ in 0..MAX_COMMAND_ROUNDS {
            if self.commands.is_empty() {
                return;
            }

            for command in self.commands.take() {
                match command {
                    Command::Spawn(blueprint) => {
                        let name = blueprint.name().to_string();
                        let id = blueprint.spawn_into(&mut self.actors);
                        debug!(target: "game", "Actor `{}` spawned as {:?}", name, id);
                    }
                    Command::Destroy(id) => {
                        if !self.destroy_actor(id) {
                            trace!(target: "game", "Destroy of unknown actor {:?} ignored", id);
                        }
                    }
                }
            }
        }

        if !self.commands.is_empty() {
            warn!(
                target: "game",
                "Dropping {} commands still queued after {} rounds",
                self.commands.len(), MAX_COMMAND_ROUNDS
            );
            self.commands.take();
        }
    }

    //--- Teardown ---------------------------------------------------------

    fn finalize(&mut self) {
        if matches!(self.state, GameState::Finalizing | GameState::Finished) {
            return;
        }
        self.state = GameState::Finalizing;

        let pending = self.commands.take();
        if !pending.is_empty() {
            debug!(target: "game", "Discarding {} commands at teardown", pending.len());
        }

        let actors = self.actors.drain();
        debug!(target: "game", "Destroying {} actors", actors.len());

        let mut env = HookEnv {
            time: &self.time,
            input: &self.input,
            control: &self.control,
            commands: &mut self.commands,
        };
        for mut actor in actors {
            destroy_components(&mut actor, &mut env);
        }
        self.commands.take();

        self.callbacks.on_finalize.invoke_once(&());
        self.state = GameState::Finished;
    }

    fn outcome(&self) -> RunOutcome {
        if self.window.open && self.control.is_reset_pending() {
            RunOutcome::ResetRequested
        } else {
            RunOutcome::Closed
        }
    }
}

impl Drop for GameInstance {
    fn drop(&mut self) {
        if self.state != GameState::Finished {
            debug!(target: "game", "Game instance dropped in {:?}, tearing down", self.state);
            self.finalize();
        }
    }
}

//--- Helpers -------------------------------------------------------------

fn destroy_components(actor: &mut Actor, env: &mut HookEnv<'_>) {
    let id = actor.id();
    let (name, transform, slots) = actor.parts_mut();
    for slot in slots.iter_mut() {
        if slot.wants(HookPhase::Destroy) {
            slot.invoke(HookPhase::Destroy, id, name, transform, env);
        }
    }
}

//=========================================================================
// Unit Tests
//=========================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::actor::ActorBlueprint;
    use crate::core::component::{ComponentContext, ComponentSlot, HookResult};
    use crate::core::input::Modifiers;
    use crate::core::platform_bridge::{HeadlessPlatform, PlatformEvent};
    use crate::core::render::{NullRenderPipeline, RenderError};
    use crossbeam_channel::bounded;
    use std::cell::RefCell;
    use std::rc::Rc;

    type Log = Rc<RefCell<Vec<String>>>;

    //--- Test Components --------------------------------------------------

    struct Recorder {
        tag: &'static str,
        log: Log,
    }

    impl Recorder {
        fn new(tag: &'static str, log: &Log) -> Self {
            Self {
                tag,
                log: Rc::clone(log),
            }
        }

        fn push(&self, hook: &str) {
            self.log.borrow_mut().push(format!("{}:{}", self.tag, hook));
        }
    }

    impl Component for Recorder {
        fn start(&mut self, _ctx: &mut ComponentContext<'_>) -> HookResult {
            self.push("start");
            Ok(())
        }

        fn update(&mut self, _ctx: &mut ComponentContext<'_>) -> HookResult {
            self.push("update");
            Ok(())
        }

        fn fixed_update(&mut self, _ctx: &mut ComponentContext<'_>) -> HookResult {
            self.push("fixed");
            Ok(())
        }

        fn on_destroy(&mut self, _ctx: &mut ComponentContext<'_>) -> HookResult {
            self.push("destroy");
            Ok(())
        }
    }

    struct Faulty;

    impl Component for Faulty {
        fn update(&mut self, _ctx: &mut ComponentContext<'_>) -> HookResult {
            anyhow::bail!("broken on purpose")
        }
    }

    /// Spawns a recorder actor on its first update.
    struct Spawner {
        log: Log,
        done: bool,
    }

    impl Component for Spawner {
        fn update(&mut self, ctx: &mut ComponentContext<'_>) -> HookResult {
            if !self.done {
                self.done = true;
                ctx.commands().spawn(
                    ActorBlueprint::new("spawned").with_component(Recorder::new("s", &self.log)),
                );
            }
            Ok(())
        }
    }

    /// Destroys its own actor on first update.
    struct SelfDestruct;

    impl Component for SelfDestruct {
        fn update(&mut self, ctx: &mut ComponentContext<'_>) -> HookResult {
            let me = ctx.actor();
            ctx.commands().destroy(me);
            Ok(())
        }
    }

    /// Requests a reset on the given update count.
    struct ResetOn {
        update: u32,
        seen: u32,
    }

    impl Component for ResetOn {
        fn update(&mut self, ctx: &mut ComponentContext<'_>) -> HookResult {
            self.seen += 1;
            if self.seen == self.update {
                ctx.control().reset();
            }
            Ok(())
        }
    }

    struct FailingPipeline;

    impl RenderPipeline for FailingPipeline {
        fn render(&mut self, _frame: &RenderFrame<'_>) -> Result<(), RenderError> {
            Err(RenderError::SurfaceLost)
        }
    }

    //--- Test Harness -----------------------------------------------------

    fn config() -> EngineConfig {
        let mut config = EngineConfig::default();
        config.timing.tps = 50.0;
        config.timing.simulated_delta = Some(0.02);
        config
    }

    fn game() -> GameInstance {
        game_with(Box::new(NullRenderPipeline::new()))
    }

    fn game_with(pipeline: Box<dyn RenderPipeline>) -> GameInstance {
        GameInstance::new(&config(), EngineControl::new(), pipeline, ResourceCache::new())
    }

    fn platform(frames: u64) -> (HeadlessPlatform, EventCollector) {
        let (tx, rx) = bounded(64);
        (HeadlessPlatform::new(tx).close_after(frames), EventCollector::new(rx))
    }

    fn run(game: &mut GameInstance, platform: &mut HeadlessPlatform, events: &mut EventCollector) -> RunOutcome {
        game.run(platform, events).unwrap()
    }

    fn key_down(key: KeyCode) -> InputEvent {
        InputEvent::KeyDown {
            key,
            modifiers: Modifiers::NONE,
        }
    }

    fn new_log() -> Log {
        Rc::new(RefCell::new(Vec::new()))
    }

    fn entries(log: &Log) -> Vec<String> {
        log.borrow().clone()
    }

    //=====================================================================
    // Lifecycle Ordering
    //=====================================================================

    #[test]
    fn start_runs_once_before_first_update_then_destroy_then_finalize() {
        let log = new_log();
        let mut game = game();
        let id = game.create_actor("a");
        game.add_component(id, Recorder::new("a", &log));
        let finalize_log = Rc::clone(&log);
        game.callbacks_mut()
            .on_finalize
            .register(move |_| finalize_log.borrow_mut().push("finalize".into()));

        let (mut platform, mut events) = platform(3);
        let outcome = run(&mut game, &mut platform, &mut events);

        assert_eq!(outcome, RunOutcome::Closed);
        assert_eq!(
            entries(&log),
            vec![
                "a:start", "a:update", "a:fixed",
                "a:update", "a:fixed",
                "a:update", "a:fixed",
                "a:destroy", "finalize",
            ]
        );
        assert_eq!(game.state(), GameState::Finished);
        assert!(game.actors().is_empty());
    }

    #[test]
    fn dispatch_follows_creation_then_attachment_order() {
        let log = new_log();
        let mut game = game();
        let first = game.create_actor("first");
        let second = game.create_actor("second");
        game.add_component(second, Recorder::new("c", &log));
        game.add_component(first, Recorder::new("a", &log));
        game.add_component(first, Recorder::new("b", &log));

        let (mut platform, mut events) = platform(1);
        run(&mut game, &mut platform, &mut events);

        let starts: Vec<_> = entries(&log).into_iter().filter(|e| e.ends_with("start")).collect();
        assert_eq!(starts, vec!["a:start", "b:start", "c:start"]);
    }

    #[test]
    fn disabled_component_gets_start_and_destroy_only() {
        let log = new_log();
        let mut game = game();
        let id = game.create_actor("a");
        game.actor_mut(id)
            .unwrap()
            .attach(ComponentSlot::new(Recorder::new("a", &log)).with_enabled(false));

        let (mut platform, mut events) = platform(3);
        run(&mut game, &mut platform, &mut events);

        assert_eq!(entries(&log), vec!["a:start", "a:destroy"]);
    }

    #[test]
    fn fixed_updates_match_simulated_time() {
        let log = new_log();
        let mut game = game();
        let id = game.create_actor("a");
        game.add_component(id, Recorder::new("a", &log));

        let (mut platform, mut events) = platform(10);
        run(&mut game, &mut platform, &mut events);

        let fixed = entries(&log).iter().filter(|e| e.ends_with("fixed")).count();
        assert_eq!(fixed, 10);
        assert_eq!(game.time().fixed_steps, 10);
        assert_eq!(game.time().frame, 10);
    }

    #[test]
    fn long_frames_at_default_timing_keep_every_fixed_step() {
        let log = new_log();
        let mut config = EngineConfig::default();
        config.timing.simulated_delta = Some(0.2);
        let mut game = GameInstance::new(
            &config,
            EngineControl::new(),
            Box::new(NullRenderPipeline::new()),
            ResourceCache::new(),
        );
        let id = game.create_actor("a");
        game.add_component(id, Recorder::new("a", &log));

        let (mut platform, mut events) = platform(5);
        run(&mut game, &mut platform, &mut events);

        let fixed = entries(&log).iter().filter(|e| e.ends_with("fixed")).count() as u64;
        let time = game.time();
        let expected = (time.elapsed / time.fixed_delta).floor() as u64;
        assert!((time.elapsed - 1.0).abs() < 1e-9);
        assert!(fixed + 1 >= expected && fixed <= expected + 1, "{fixed} vs {expected}");
        assert_eq!(time.fixed_steps, fixed);
    }

    #[test]
    fn closing_before_the_first_frame_destroys_without_starting() {
        let log = new_log();
        let mut game = game();
        let id = game.create_actor("a");
        game.add_component(id, Recorder::new("a", &log));

        let (mut platform, mut events) = platform(0);
        let outcome = run(&mut game, &mut platform, &mut events);

        assert_eq!(outcome, RunOutcome::Closed);
        assert_eq!(entries(&log), vec!["a:destroy"]);
        assert_eq!(game.time().frame, 0);
    }

    //=====================================================================
    // Failure Isolation
    //=====================================================================

    #[test]
    fn failing_component_does_not_stop_neighbours() {
        let log = new_log();
        let mut game = game();
        let id = game.create_actor("a");
        game.add_component(id, Faulty);
        game.add_component(id, Recorder::new("a", &log));

        let (mut platform, mut events) = platform(3);
        run(&mut game, &mut platform, &mut events);

        let updates = entries(&log).iter().filter(|e| e.ends_with("update")).count();
        assert_eq!(updates, 3);
    }

    #[test]
    fn render_failure_tears_down_and_returns_error() {
        let log = new_log();
        let mut game = game_with(Box::new(FailingPipeline));
        let id = game.create_actor("a");
        game.add_component(id, Recorder::new("a", &log));

        let (mut platform, mut events) = platform(3);
        let result = game.run(&mut platform, &mut events);

        assert!(matches!(result, Err(EngineError::Render(RenderError::SurfaceLost))));
        assert_eq!(entries(&log).last().map(String::as_str), Some("a:destroy"));
        assert_eq!(game.state(), GameState::Finished);
    }

    //=====================================================================
    // Deferred Commands
    //=====================================================================

    #[test]
    fn actor_spawned_mid_frame_starts_next_frame_before_update() {
        let log = new_log();
        let mut game = game();
        let id = game.create_actor("spawner");
        game.add_component(id, Spawner { log: Rc::clone(&log), done: false });

        let (mut platform, mut events) = platform(3);
        run(&mut game, &mut platform, &mut events);

        assert_eq!(
            entries(&log),
            vec!["s:start", "s:update", "s:fixed", "s:update", "s:fixed", "s:destroy"]
        );
    }

    #[test]
    fn self_destroying_actor_is_destroyed_once() {
        let log = new_log();
        let mut game = game();
        let id = game.create_actor("doomed");
        game.add_component(id, SelfDestruct);
        game.add_component(id, Recorder::new("d", &log));

        let (mut platform, mut events) = platform(3);
        run(&mut game, &mut platform, &mut events);

        assert_eq!(entries(&log), vec!["d:start", "d:update", "d:destroy"]);
    }

    #[test]
    fn destroy_actor_orphans_children() {
        let mut game = game();
        let parent = game.create_actor("parent");
        let child = game.create_actor("child");
        game.actors_mut().set_parent(child, parent);

        assert!(game.destroy_actor(parent));
        assert!(!game.destroy_actor(parent));

        assert_eq!(game.actor(child).unwrap().transform().parent(), None);
    }

    //=====================================================================
    // Reset & Close
    //=====================================================================

    #[test]
    fn reset_request_ends_run_after_current_frame() {
        let mut game = game();
        let id = game.create_actor("a");
        game.add_component(id, ResetOn { update: 2, seen: 0 });

        let (mut platform, mut events) = platform(10);
        let outcome = run(&mut game, &mut platform, &mut events);

        assert_eq!(outcome, RunOutcome::ResetRequested);
        assert_eq!(platform.frames(), 2);
    }

    #[test]
    fn window_close_wins_over_pending_reset() {
        let mut game = game();
        game.reset();
        let (tx, rx) = bounded(8);
        let mut platform = HeadlessPlatform::new(tx).schedule(0, PlatformEvent::WindowClosed);
        let mut events = EventCollector::new(rx);

        let outcome = run(&mut game, &mut platform, &mut events);

        assert_eq!(outcome, RunOutcome::Closed);
    }

    #[test]
    fn close_hotkey_stops_before_next_update() {
        let log = new_log();
        let mut game = game();
        let id = game.create_actor("a");
        game.add_component(id, Recorder::new("a", &log));
        let (tx, rx) = bounded(8);
        let mut platform = HeadlessPlatform::new(tx)
            .close_after(10)
            .schedule_input(1, key_down(KeyCode::Escape));
        let mut events = EventCollector::new(rx);

        run(&mut game, &mut platform, &mut events);

        let updates = entries(&log).iter().filter(|e| e.ends_with("update")).count();
        assert_eq!(updates, 1);
    }

    #[test]
    fn dropping_an_unfinished_instance_tears_down() {
        let log = new_log();
        let mut game = game();
        let id = game.create_actor("a");
        game.add_component(id, Recorder::new("a", &log));

        drop(game);

        assert_eq!(entries(&log), vec!["a:destroy"]);
    }

    //=====================================================================
    // Pause & Step
    //=====================================================================

    #[test]
    fn paused_simulation_runs_only_frame_callbacks() {
        let log = new_log();
        let mut game = game();
        let id = game.create_actor("a");
        game.add_component(id, Recorder::new("a", &log));
        game.set_paused(true);

        let counts = Rc::new(RefCell::new((0, 0)));
        let (anim, god) = (Rc::clone(&counts), Rc::clone(&counts));
        game.callbacks_mut().animation_update.register(move |_| anim.borrow_mut().0 += 1);
        game.callbacks_mut().god_update.register(move |_| god.borrow_mut().1 += 1);

        let (mut platform, mut events) = platform(3);
        run(&mut game, &mut platform, &mut events);

        assert_eq!(entries(&log), vec!["a:start", "a:destroy"]);
        assert_eq!(*counts.borrow(), (3, 3));
        assert_eq!(game.time().elapsed, 0.0);
    }

    #[test]
    fn step_hotkey_runs_exactly_one_update_and_fixed_pass() {
        let log = new_log();
        let mut game = game();
        let id = game.create_actor("a");
        game.add_component(id, Recorder::new("a", &log));
        let (tx, rx) = bounded(8);
        let mut platform = HeadlessPlatform::new(tx)
            .close_after(4)
            .schedule_input(0, key_down(KeyCode::KeyP))
            .schedule_input(2, key_down(KeyCode::KeyO));
        let mut events = EventCollector::new(rx);

        run(&mut game, &mut platform, &mut events);

        assert!(game.is_paused());
        assert_eq!(entries(&log), vec!["a:start", "a:update", "a:fixed", "a:destroy"]);
    }

    //=====================================================================
    // Window & Input
    //=====================================================================

    #[test]
    fn minimized_window_skips_rendering() {
        let mut game = game();
        let resized = Rc::new(RefCell::new(Vec::new()));
        let sink = Rc::clone(&resized);
        game.callbacks_mut().on_resize.register(move |size| sink.borrow_mut().push(*size));
        let (tx, rx) = bounded(8);
        let mut platform = HeadlessPlatform::new(tx)
            .close_after(3)
            .schedule(1, PlatformEvent::Resized { width: 0, height: 0 });
        let mut events = EventCollector::new(rx);

        run(&mut game, &mut platform, &mut events);

        assert_eq!(platform.presented(), 1);
        assert_eq!(*resized.borrow(), vec![(0, 0)]);
        assert!(game.window_minimized());
    }

    #[test]
    fn mouse_events_reach_callbacks_and_input_state() {
        let mut game = game();
        let moves = Rc::new(RefCell::new(Vec::new()));
        let scrolls = Rc::new(RefCell::new(Vec::new()));
        let (m, s) = (Rc::clone(&moves), Rc::clone(&scrolls));
        game.callbacks_mut().on_mouse_move.register(move |pos| m.borrow_mut().push(*pos));
        game.callbacks_mut().on_mouse_scroll.register(move |d| s.borrow_mut().push(*d));
        let (tx, rx) = bounded(8);
        let mut platform = HeadlessPlatform::new(tx)
            .close_after(1)
            .schedule_input(0, InputEvent::MouseMoved { x: 3.0, y: 4.0 })
            .schedule_input(0, InputEvent::MouseScrolled { dx: 0.0, dy: -1.0 });
        let mut events = EventCollector::new(rx);

        run(&mut game, &mut platform, &mut events);

        assert_eq!(*moves.borrow(), vec![(3.0, 4.0)]);
        assert_eq!(*scrolls.borrow(), vec![(0.0, -1.0)]);
        assert_eq!(game.input().mouse_position(), (3.0, 4.0));
    }

    #[test]
    fn window_queries_reflect_platform() {
        let mut game = game();
        let (tx, rx) = bounded(8);
        let mut platform = HeadlessPlatform::new(tx).with_size(640, 480).close_after(1);
        let mut events = EventCollector::new(rx);

        run(&mut game, &mut platform, &mut events);

        assert_eq!(game.window_size(), (640, 480));
        assert!(!game.window_minimized());
        assert_eq!(game.depth_frame_buffer(), None);
    }

    #[test]
    fn finished_instance_does_not_run_again() {
        let log = new_log();
        let mut game = game();
        let id = game.create_actor("a");
        game.add_component(id, Recorder::new("a", &log));
        let (mut platform, mut events) = platform(1);
        run(&mut game, &mut platform, &mut events);
        let before = entries(&log).len();

        run(&mut game, &mut platform, &mut events);

        assert_eq!(entries(&log).len(), before);
    }
}
