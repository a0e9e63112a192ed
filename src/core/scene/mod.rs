//=========================================================================
// Scene System
//=========================================================================
//
// Scene lifecycle state machine and the stack-based scene loop.
//
// Architecture:
//   SceneManager
//     ├─ stack: Vec<ManagedScene>   (top = visible scene)
//     │    └─ ManagedScene
//     │         ├─ scene: Box<dyn Scene>   (application hooks)
//     │         ├─ state: SceneState
//     │         └─ context: SceneContext   (intent, finish request, size)
//     └─ timestep: FixedTimestep
//
// Lifecycle:
//   Destroyed → Created → Started → Resumed        (one step per iteration)
//   Resumed → Paused → Stopped → Destroyed          (finish(), one call)
//
//=========================================================================

//=== Module Declarations =================================================

mod managed;
mod manager;

#[cfg(test)]
pub(crate) mod testing;

//=== Public API ==========================================================

pub use managed::ManagedScene;
pub use manager::SceneManager;

//=== Internal Dependencies ===============================================

use super::canvas::{Canvas, Dimensions};
use super::error::SceneResult;
use super::event::Event;

//=== SceneState ==========================================================

/// Lifecycle state of a scene.
///
/// A scene starts in `Destroyed` ("not yet alive") and ends there again
/// ("fully torn down").
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum SceneState {
    Created,
    Started,
    Resumed,
    Paused,
    Stopped,
    #[default]
    Destroyed,
}

//=== SceneContext ========================================================

/// Per-scene handle passed to every hook.
///
/// Lets a running scene query its window and ask for changes that the
/// scene manager carries out: launching a successor or finishing itself.
pub struct SceneContext {
    window_size: Dimensions,
    intent: Option<Box<dyn Scene>>,
    finish_requested: bool,
}

impl SceneContext {
    pub(crate) fn new() -> Self {
        Self {
            window_size: Dimensions::default(),
            intent: None,
            finish_requested: false,
        }
    }

    //--- Window -----------------------------------------------------------

    /// Size of the window this scene is bound to.
    pub fn window_size(&self) -> Dimensions {
        self.window_size
    }

    pub(crate) fn bind(&mut self, size: Dimensions) {
        self.window_size = size;
    }

    //--- Intent -----------------------------------------------------------

    /// Nominates `scene` as this scene's successor.
    ///
    /// The scene manager finishes the current scene on its next iteration
    /// and puts `scene` in its place. Launching again before that replaces
    /// (and drops) the previous nominee.
    pub fn launch(&mut self, scene: impl Scene + 'static) {
        self.launch_boxed(Box::new(scene));
    }

    /// Like [`launch`](Self::launch) for an already boxed scene.
    pub fn launch_boxed(&mut self, scene: Box<dyn Scene>) {
        if let Some(previous) = self.intent.replace(scene) {
            log::debug!("Pending intent {} replaced before hand-off", previous.name());
        }
    }

    /// Returns `true` if a successor is waiting to be launched.
    pub fn has_intent(&self) -> bool {
        self.intent.is_some()
    }

    pub(crate) fn take_intent(&mut self) -> Option<Box<dyn Scene>> {
        self.intent.take()
    }

    //--- Finish -----------------------------------------------------------

    /// Asks for this scene to be finished.
    ///
    /// The full teardown (`on_pause`, `on_stop`, `on_destroy` as needed)
    /// runs right after the current hook returns.
    pub fn finish(&mut self) {
        self.finish_requested = true;
    }

    pub fn is_finish_requested(&self) -> bool {
        self.finish_requested
    }

    pub(crate) fn take_finish_request(&mut self) -> bool {
        std::mem::take(&mut self.finish_requested)
    }
}

impl std::fmt::Debug for SceneContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SceneContext")
            .field("window_size", &self.window_size)
            .field("intent", &self.intent.as_ref().map(|scene| scene.name()))
            .field("finish_requested", &self.finish_requested)
            .finish()
    }
}

//=== Scene Trait =========================================================

/// Application state with a lifecycle and per-frame hooks.
///
/// Every hook has a default that does nothing, so a scene only overrides
/// what it needs. Hooks are driven exclusively by the
/// [`SceneManager`]: lifecycle hooks at most once per entry into their
/// state, frame hooks only while the scene is resumed and on top.
///
/// An error returned from any hook ends [`SceneManager::run`] with that
/// error; the scene is left in the state it had before the failing hook.
///
/// # Example
///
/// ```rust
/// use stagecraft::prelude::*;
///
/// struct Title;
///
/// impl Scene for Title {
///     fn handle_event(&mut self, ctx: &mut SceneContext, event: &Event) -> SceneResult<bool> {
///         if event.pressed_key() == Some(KeyCode::Escape) {
///             ctx.finish();
///             return Ok(true);
///         }
///         Ok(false)
///     }
///
///     fn render(&mut self, _ctx: &mut SceneContext, canvas: &mut Canvas) -> SceneResult {
///         canvas.clear(Color::BLUE);
///         Ok(())
///     }
/// }
/// ```
pub trait Scene {
    /// Name used in log output.
    fn name(&self) -> &str {
        std::any::type_name::<Self>()
    }

    //--- Lifecycle Hooks --------------------------------------------------

    /// `Destroyed → Created`. Acquire resources here.
    fn on_create(&mut self, _ctx: &mut SceneContext) -> SceneResult {
        Ok(())
    }

    /// `Created | Stopped → Started`.
    fn on_start(&mut self, _ctx: &mut SceneContext) -> SceneResult {
        Ok(())
    }

    /// `Started | Paused → Resumed`.
    fn on_resume(&mut self, _ctx: &mut SceneContext) -> SceneResult {
        Ok(())
    }

    /// `Resumed → Paused`, first step of the teardown.
    fn on_pause(&mut self, _ctx: &mut SceneContext) -> SceneResult {
        Ok(())
    }

    /// `Started | Paused → Stopped`.
    fn on_stop(&mut self, _ctx: &mut SceneContext) -> SceneResult {
        Ok(())
    }

    /// `Created | Stopped → Destroyed`. Release resources here.
    fn on_destroy(&mut self, _ctx: &mut SceneContext) -> SceneResult {
        Ok(())
    }

    //--- Frame Hooks ------------------------------------------------------

    /// One fixed simulation step: `t` is the simulation time in
    /// milliseconds at the start of the step, `dt` the step length.
    fn update(&mut self, _ctx: &mut SceneContext, _t: u64, _dt: u64) -> SceneResult {
        Ok(())
    }

    /// Draws the latest simulation state. Called once per loop iteration.
    fn render(&mut self, _ctx: &mut SceneContext, _canvas: &mut Canvas) -> SceneResult {
        Ok(())
    }

    /// Handles one input or system event. Returns `true` if consumed.
    fn handle_event(&mut self, _ctx: &mut SceneContext, _event: &Event) -> SceneResult<bool> {
        Ok(false)
    }
}

//=========================================================================
// Unit Tests
//=========================================================================
