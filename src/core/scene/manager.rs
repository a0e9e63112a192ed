//=========================================================================
// Scene Manager
//=========================================================================
//
// Stack of scenes driven by a fixed-timestep loop.
//
// One iteration (top = last element of the stack):
//   1. sample the clock, clamp the elapsed time
//   2. top finished?      → pop it, push its intent if any, next iteration
//   3. top has intent?    → finish it, pop it, push the intent, next iteration
//   4. advance the top one lifecycle step
//   5. drain window events into the top (Quit clears the stack)
//   6. accumulate; run fixed updates while the top stays active
//   7. render the top and present the frame
//
// The loop returns when the stack is empty. Scenes below the top receive
// no hooks at all.
//
//=========================================================================

//=== External Dependencies ===============================================

use log::{debug, info, trace, warn};

//=== Internal Dependencies ===============================================

use super::{ManagedScene, Scene};
use crate::core::clock::{Clock, FixedTimestep, LoopConfig, SystemClock};
use crate::core::error::{EngineError, SceneResult};
use crate::core::event::Event;
use crate::core::window::Window;

//=== TickControl =========================================================

/// Outcome of the event phase of one iteration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum TickControl {
    Continue,
    Exit,
}

//=== SceneManager ========================================================

/// Owns the scene stack and runs the game loop over it.
///
/// # Example
///
/// ```rust
/// use stagecraft::prelude::*;
///
/// struct Hello;
///
/// impl Scene for Hello {
///     fn render(&mut self, ctx: &mut SceneContext, canvas: &mut Canvas) -> SceneResult {
///         canvas.clear(Color::WHITE);
///         ctx.finish();
///         Ok(())
///     }
/// }
///
/// let mut window = HeadlessWindow::new(Dimensions::new(64, 64));
/// let mut scenes = SceneManager::new();
/// scenes.push(Hello);
/// scenes.run(&mut window).unwrap();
/// assert!(scenes.is_empty());
/// ```
pub struct SceneManager<C: Clock = SystemClock> {
    stack: Vec<ManagedScene>,
    clock: C,
    timestep: FixedTimestep,
    events: Vec<Event>,
}

impl SceneManager<SystemClock> {
    /// Empty manager with the default 10 ms step and 250 ms stall guard.
    pub fn new() -> Self {
        Self::with_config(LoopConfig::default())
    }

    pub fn with_config(config: LoopConfig) -> Self {
        Self::with_clock(config, SystemClock::new())
    }
}

impl Default for SceneManager<SystemClock> {
    fn default() -> Self {
        Self::new()
    }
}

impl<C: Clock> SceneManager<C> {
    /// Empty manager sampling time from `clock`.
    ///
    /// # Panics
    ///
    /// Panics if `config.fixed_step_ms == 0`.
    pub fn with_clock(config: LoopConfig, clock: C) -> Self {
        Self {
            stack: Vec::new(),
            clock,
            timestep: FixedTimestep::new(config),
            events: Vec::new(),
        }
    }

    //--- Stack ------------------------------------------------------------

    /// Puts a scene on top of the stack. It is created on the next iteration.
    pub fn push(&mut self, scene: impl Scene + 'static) {
        self.push_managed(ManagedScene::new(scene));
    }

    pub fn push_boxed(&mut self, scene: Box<dyn Scene>) {
        self.push_managed(ManagedScene::from_boxed(scene));
    }

    fn push_managed(&mut self, scene: ManagedScene) {
        debug!("Scene {} pushed (depth {})", scene.name(), self.stack.len() + 1);
        self.stack.push(scene);
    }

    /// Removes the top scene without running any hooks.
    pub fn pop(&mut self) -> Option<ManagedScene> {
        let scene = self.stack.pop()?;
        debug!("Scene {} popped (depth {})", scene.name(), self.stack.len());
        Some(scene)
    }

    /// Finishes and removes every scene, top first.
    ///
    /// Pending intents of the removed scenes are dropped unlaunched. On error
    /// the failing scene and everything below it stay on the stack.
    pub fn clear(&mut self) -> SceneResult {
        while let Some(top) = self.stack.last_mut() {
            top.finish()?;
            self.pop();
        }
        Ok(())
    }

    pub fn len(&self) -> usize {
        self.stack.len()
    }

    pub fn is_empty(&self) -> bool {
        self.stack.is_empty()
    }

    /// The scene currently on top.
    pub fn top(&self) -> Option<&ManagedScene> {
        self.stack.last()
    }

    /// Simulation time reached so far, in milliseconds.
    pub fn simulation_time(&self) -> u64 {
        self.timestep.time()
    }

    //--- Loop -------------------------------------------------------------

    /// Runs the loop until the stack is empty.
    ///
    /// Returns immediately if it already is. Any hook error or present
    /// failure ends the loop and is returned; scenes still on the stack are
    /// left in place.
    pub fn run<W: Window + ?Sized>(&mut self, window: &mut W) -> Result<(), EngineError> {
        info!("Scene loop starting with {} scene(s)", self.stack.len());

        let mut last_tick = self.clock.ticks();
        while !self.stack.is_empty() {
            let now = self.clock.ticks();
            let elapsed = now.saturating_sub(last_tick);
            last_tick = now;

            self.iterate(window, elapsed)?;
        }

        info!("Scene stack empty, loop finished at t={}ms", self.timestep.time());
        Ok(())
    }

    /// One loop iteration given the raw time elapsed since the previous one.
    fn iterate<W: Window + ?Sized>(&mut self, window: &mut W, elapsed: u64) -> Result<(), EngineError> {
        let elapsed = self.timestep.clamp_elapsed(elapsed);

        let Some(top) = self.stack.last_mut() else {
            return Ok(());
        };
        top.bind(window.size());

        //--- Hand-off -----------------------------------------------------

        if top.is_finished() {
            self.replace_top();
            return Ok(());
        }
        if top.has_intent() {
            top.finish()?;
            self.replace_top();
            return Ok(());
        }

        //--- Lifecycle ----------------------------------------------------

        top.advance()?;

        //--- Events -------------------------------------------------------

        if self.dispatch_events(window)? == TickControl::Exit {
            return Ok(());
        }

        //--- Simulation ---------------------------------------------------

        let Some(top) = self.stack.last_mut() else {
            return Ok(());
        };
        // Polling may have resized the window.
        top.bind(window.size());

        self.timestep.accumulate(elapsed);
        while top.is_active() {
            let Some((t, dt)) = self.timestep.next_step() else {
                break;
            };
            top.update(t, dt)?;
        }

        //--- Render -------------------------------------------------------

        if top.is_active() {
            top.render(window.canvas())?;
            window.present()?;
        }

        Ok(())
    }

    /// Drains the window's event queue into the top scene.
    fn dispatch_events<W: Window + ?Sized>(&mut self, window: &mut W) -> SceneResult<TickControl> {
        self.events.clear();
        window.poll_events(&mut self.events);

        let events = std::mem::take(&mut self.events);
        let mut control = TickControl::Continue;

        for event in &events {
            if event.is_quit() {
                info!("Quit requested, clearing {} scene(s)", self.stack.len());
                self.clear()?;
                control = TickControl::Exit;
                break;
            }
            if let Some(top) = self.stack.last_mut() {
                let consumed = top.handle_event(event)?;
                trace!("{:?} consumed={}", event.kind(), consumed);
            }
        }

        self.events = events;
        Ok(control)
    }

    /// Pops the top scene and pushes its intent, if it has one.
    fn replace_top(&mut self) {
        let Some(mut outgoing) = self.pop() else {
            return;
        };
        if let Some(incoming) = outgoing.take_intent() {
            info!("Scene {} hands off to {}", outgoing.name(), incoming.name());
            self.push_managed(incoming);
        }
    }
}

impl<C: Clock> Drop for SceneManager<C> {
    fn drop(&mut self) {
        if self.stack.is_empty() {
            return;
        }
        // A hook panicked mid-transition: leave the scenes as they are.
        if std::thread::panicking() {
            warn!("Dropping {} scene(s) without teardown while panicking", self.stack.len());
            return;
        }
        debug!("Finishing {} scene(s) left on the stack", self.stack.len());
        if let Err(err) = self.clear() {
            warn!("Scene teardown failed during drop: {err}");
        }
    }
}

impl<C: Clock> std::fmt::Debug for SceneManager<C> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SceneManager")
            .field("stack", &self.stack)
            .field("timestep", &self.timestep)
            .finish_non_exhaustive()
    }
}

//=========================================================================
// Unit Tests
//=========================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::canvas::Dimensions;
    use crate::core::clock::ManualClock;
    use crate::core::error::SceneError;
    use crate::core::event::KeyCode;
    use crate::core::scene::testing::{Journal, Scripted};
    use crate::core::canvas::Canvas;
    use crate::core::error::PlatformError;
    use crate::core::scene::{SceneContext, SceneState};
    use crate::core::window::EventSource;
    use crate::platform::HeadlessWindow;
    use std::cell::RefCell;
    use std::panic::{catch_unwind, AssertUnwindSafe};
    use std::rc::Rc;

    fn manager(clock: ManualClock) -> SceneManager<ManualClock> {
        SceneManager::with_clock(LoopConfig::default(), clock)
    }

    fn window() -> HeadlessWindow {
        HeadlessWindow::new(Dimensions::new(16, 16))
    }

    //--- Basics -----------------------------------------------------------

    #[test]
    fn empty_stack_returns_immediately() {
        let mut scenes = manager(ManualClock::new());
        let mut window = window();

        scenes.run(&mut window).unwrap();
        assert_eq!(window.frames_presented(), 0);
    }

    #[test]
    fn pop_and_clear_on_empty_stack_are_noops() {
        let mut scenes = manager(ManualClock::new());
        assert!(scenes.pop().is_none());
        scenes.clear().unwrap();
        assert!(scenes.is_empty());
    }

    #[test]
    fn pop_runs_no_hooks() {
        let journal = Journal::default();
        let mut scenes = manager(ManualClock::new());
        scenes.push(Scripted::new("a", &journal));

        let popped = scenes.pop().unwrap();
        assert_eq!(popped.state(), SceneState::Destroyed);
        assert!(journal.lifecycle_of("a").is_empty());
    }

    //--- Lifecycle --------------------------------------------------------

    #[test]
    fn single_scene_full_lifecycle() {
        let journal = Journal::default();
        let mut scenes = manager(ManualClock::new());
        let mut window = window();
        scenes.push(Scripted::new("a", &journal).finish_after_renders(1));

        scenes.run(&mut window).unwrap();

        assert!(scenes.is_empty());
        assert_eq!(
            journal.lifecycle_of("a"),
            vec!["on_create", "on_start", "on_resume", "on_pause", "on_stop", "on_destroy"]
        );
        assert_eq!(journal.count("a:render"), 1);
        assert_eq!(window.frames_presented(), 1);
    }

    #[test]
    fn one_lifecycle_step_per_iteration() {
        let journal = Journal::default();
        let mut scenes = manager(ManualClock::new());
        let mut window = window();
        scenes.push(Scripted::new("a", &journal));

        let expected = [SceneState::Created, SceneState::Started, SceneState::Resumed];
        for state in expected {
            scenes.iterate(&mut window, 0).unwrap();
            assert_eq!(scenes.top().map(ManagedScene::state), Some(state));
        }
        assert_eq!(journal.count("a:render"), 1);
    }

    #[test]
    fn hook_error_ends_run() {
        let journal = Journal::default();
        let mut scenes = manager(ManualClock::new());
        let mut window = window();
        scenes.push(Scripted::new("a", &journal).fail_in("on_start"));

        let err = scenes.run(&mut window).unwrap_err();
        assert!(matches!(err, EngineError::Scene(SceneError::Message(_))));
        assert_eq!(scenes.top().map(ManagedScene::state), Some(SceneState::Created));

        drop(scenes);
        assert_eq!(journal.lifecycle_of("a"), vec!["on_create", "on_start", "on_destroy"]);
    }

    //--- Hand-off ---------------------------------------------------------

    #[test]
    fn intent_replaces_launching_scene() {
        let journal = Journal::default();
        let mut scenes = manager(ManualClock::new());
        let mut window = window();

        let successor = journal.clone();
        scenes.push(
            Scripted::new("a", &journal).launch_after_renders(1, move || {
                Box::new(Scripted::new("b", &successor).finish_after_renders(1))
            }),
        );

        for _ in 0..3 {
            scenes.iterate(&mut window, 0).unwrap();
        }
        assert!(scenes.top().is_some_and(ManagedScene::has_intent));

        scenes.iterate(&mut window, 0).unwrap();
        assert_eq!(scenes.len(), 1);
        assert_eq!(scenes.top().map(ManagedScene::name), Some("b"));

        for _ in 0..3 {
            scenes.iterate(&mut window, 0).unwrap();
        }
        assert_eq!(scenes.len(), 1);

        scenes.run(&mut window).unwrap();

        let destroyed = journal.position("a:on_destroy").unwrap();
        let created = journal.position("b:on_create").unwrap();
        assert!(destroyed < created);
        assert_eq!(journal.lifecycle_of("b").len(), 6);
    }

    #[test]
    fn finished_scene_with_intent_hands_off() {
        let journal = Journal::default();
        let successor = journal.clone();
        let mut scenes = manager(ManualClock::new());
        let mut window = window();

        scenes.push(
            Scripted::new("a", &journal)
                .launch_after_renders(1, move || {
                    Box::new(Scripted::new("b", &successor).finish_after_renders(1))
                })
                .finish_after_renders(1),
        );

        scenes.run(&mut window).unwrap();
        assert_eq!(journal.count("b:render"), 1);
        assert!(journal.position("a:on_destroy") < journal.position("b:on_create"));
    }

    #[test]
    fn scene_below_top_receives_nothing() {
        let journal = Journal::default();
        let mut scenes = manager(ManualClock::steady(10));
        let mut window = window();

        scenes.push(Scripted::new("a", &journal).finish_after_renders(2));
        for _ in 0..3 {
            scenes.iterate(&mut window, 10).unwrap();
        }

        let injector = window.injector();
        scenes.push(
            Scripted::new("b", &journal)
                .finish_after_renders(2)
                .on_render(move |_| injector.send(Event::MouseMoved { x: 1.0, y: 1.0 })),
        );
        let pushed_at = journal.entries().len();
        scenes.run(&mut window).unwrap();

        let entries = journal.entries();
        let b_done = journal.position("b:on_destroy").unwrap();
        assert!(entries[pushed_at..b_done].iter().all(|e| e.starts_with("b:")));
        assert_eq!(journal.count("b:event(MouseMoved)"), 1);
        assert_eq!(journal.count("a:render"), 2);
        assert!(journal.of("a").contains(&"on_destroy".to_owned()));
    }

    //--- Timing -----------------------------------------------------------

    #[test]
    fn updates_match_accumulated_time() {
        let journal = Journal::default();
        let deltas = [5, 10_000, 3, 18, 41, 9, 250, 7];
        let mut scenes = manager(ManualClock::scripted(deltas, 0));
        let mut window = window();
        scenes.push(Scripted::new("a", &journal).finish_after_renders(6));

        scenes.run(&mut window).unwrap();

        let clamped: u64 = deltas.iter().map(|d| (*d).min(250)).sum();
        let updates: Vec<String> = journal
            .of("a")
            .into_iter()
            .filter(|e| e.starts_with("update"))
            .collect();

        assert_eq!(updates.len() as u64, clamped / 10);
        for (n, entry) in updates.iter().enumerate() {
            assert_eq!(entry, &format!("update({},10)", n as u64 * 10));
        }
    }

    #[test]
    fn stall_yields_at_most_max_frame_delta_of_updates() {
        let journal = Journal::default();
        let mut scenes = manager(ManualClock::new());
        let mut window = window();
        scenes.push(Scripted::new("a", &journal));

        for _ in 0..3 {
            scenes.iterate(&mut window, 0).unwrap();
        }
        scenes.iterate(&mut window, 10_000).unwrap();

        assert_eq!(journal.of("a").iter().filter(|e| e.starts_with("update")).count(), 25);
        assert_eq!(scenes.simulation_time(), 250);
    }

    #[test]
    fn warm_up_time_carries_into_first_updates() {
        let journal = Journal::default();
        let mut scenes = manager(ManualClock::new());
        let mut window = window();
        scenes.push(Scripted::new("a", &journal));

        scenes.iterate(&mut window, 7).unwrap();
        scenes.iterate(&mut window, 7).unwrap();
        assert_eq!(journal.count("a:update(0,10)"), 0);

        scenes.iterate(&mut window, 7).unwrap();
        assert_eq!(journal.count("a:update(0,10)"), 1);
        assert_eq!(journal.count("a:update(10,10)"), 1);
        assert_eq!(scenes.simulation_time(), 20);
    }

    //--- Quit -------------------------------------------------------------

    #[test]
    fn quit_tears_down_whole_stack() {
        let journal = Journal::default();
        let mut scenes = manager(ManualClock::steady(10));
        let mut window = window();

        scenes.push(Scripted::new("a", &journal));
        for _ in 0..3 {
            scenes.iterate(&mut window, 10).unwrap();
        }

        let injector = window.injector();
        scenes.push(Scripted::new("b", &journal).on_render(move |n| {
            if n == 1 {
                injector.send(Event::Quit);
                injector.send(Event::key_down(KeyCode::Space));
            }
        }));

        scenes.run(&mut window).unwrap();
        assert!(scenes.is_empty());

        let tail: Vec<String> = journal
            .entries()
            .into_iter()
            .filter(|e| !e.ends_with("dropped"))
            .rev()
            .take(7)
            .collect::<Vec<_>>()
            .into_iter()
            .rev()
            .collect();
        assert_eq!(
            tail,
            vec![
                "b:render",
                "b:on_pause",
                "b:on_stop",
                "b:on_destroy",
                "a:on_pause",
                "a:on_stop",
                "a:on_destroy",
            ]
        );
        assert_eq!(journal.count("b:event(KeyDown)"), 0);
        assert_eq!(journal.count("b:render"), 1);
    }

    #[test]
    fn events_before_resume_are_dropped() {
        let journal = Journal::default();
        let mut scenes = manager(ManualClock::new());
        let mut window = window();
        scenes.push(Scripted::new("a", &journal));

        window.push_event(Event::key_down(KeyCode::KeyA));
        scenes.iterate(&mut window, 0).unwrap();
        scenes.iterate(&mut window, 0).unwrap();
        window.push_event(Event::key_down(KeyCode::KeyB));
        scenes.iterate(&mut window, 0).unwrap();

        assert_eq!(journal.count("a:event(KeyDown)"), 1);
        assert_eq!(scenes.top().map(ManagedScene::state), Some(SceneState::Resumed));
    }

    #[test]
    fn dropping_manager_finishes_remaining_scenes() {
        let journal = Journal::default();
        let mut scenes = manager(ManualClock::new());
        let mut window = window();
        scenes.push(Scripted::new("a", &journal));
        scenes.iterate(&mut window, 0).unwrap();

        drop(scenes);
        assert_eq!(journal.lifecycle_of("a"), vec!["on_create", "on_destroy"]);
    }

    #[test]
    fn panicking_hook_skips_teardown_on_drop() {
        struct Explodes(Journal);

        impl Scene for Explodes {
            fn on_pause(&mut self, _ctx: &mut SceneContext) -> SceneResult {
                self.0.record("boom:on_pause".to_owned());
                Ok(())
            }

            fn on_destroy(&mut self, _ctx: &mut SceneContext) -> SceneResult {
                self.0.record("boom:on_destroy".to_owned());
                Ok(())
            }

            fn update(&mut self, _ctx: &mut SceneContext, _t: u64, _dt: u64) -> SceneResult {
                panic!("update exploded");
            }
        }

        let journal = Journal::default();
        let scene_journal = journal.clone();
        let result = catch_unwind(AssertUnwindSafe(move || {
            let mut scenes = manager(ManualClock::steady(10));
            let mut window = window();
            scenes.push(Explodes(scene_journal));
            let _ = scenes.run(&mut window);
        }));

        assert!(result.is_err());
        assert!(journal.entries().is_empty());
    }

    //--- Resize ---------------------------------------------------------

    /// Applies a queued resize during the next poll, the way a pumped OS
    /// window does.
    struct Resizing {
        inner: HeadlessWindow,
        pending: Option<Dimensions>,
    }

    impl EventSource for Resizing {
        fn poll_events(&mut self, events: &mut Vec<Event>) {
            if let Some(size) = self.pending.take() {
                *self.inner.canvas() = Canvas::new(size);
                events.push(Event::Resized(size));
            }
            self.inner.poll_events(events);
        }
    }

    impl Window for Resizing {
        fn size(&self) -> Dimensions {
            self.inner.size()
        }

        fn canvas(&mut self) -> &mut Canvas {
            self.inner.canvas()
        }

        fn present(&mut self) -> Result<(), PlatformError> {
            self.inner.present()
        }
    }

    #[test]
    fn render_sees_size_applied_during_poll() {
        type Seen = Rc<RefCell<Vec<(Dimensions, Dimensions)>>>;

        struct SizeCheck(Seen);

        impl Scene for SizeCheck {
            fn render(&mut self, ctx: &mut SceneContext, canvas: &mut Canvas) -> SceneResult {
                self.0.borrow_mut().push((ctx.window_size(), canvas.size()));
                Ok(())
            }
        }

        let seen = Seen::default();
        let mut scenes = manager(ManualClock::new());
        let mut window = Resizing { inner: window(), pending: None };
        scenes.push(SizeCheck(Rc::clone(&seen)));

        for _ in 0..3 {
            scenes.iterate(&mut window, 0).unwrap();
        }
        window.pending = Some(Dimensions::new(32, 24));
        scenes.iterate(&mut window, 0).unwrap();

        let small = Dimensions::new(16, 16);
        let large = Dimensions::new(32, 24);
        assert_eq!(*seen.borrow(), vec![(small, small), (large, large)]);
    }
}
