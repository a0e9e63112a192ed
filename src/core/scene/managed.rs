//=========================================================================
// Managed Scene
//=========================================================================
//
// Owns one scene and enforces its lifecycle.
//
// Transition table (advance, one step per call):
//   Destroyed         → on_create  → Created
//   Created | Stopped → on_start   → Started
//   Started | Paused  → on_resume  → Resumed
//   Resumed           → (no-op)
//
// Teardown (finish, all steps in one call):
//   Resumed → on_pause → on_stop → on_destroy
//   Started | Paused   → on_stop → on_destroy
//   Created | Stopped  →           on_destroy
//   Destroyed          → (no hooks)
//
// A finished scene never runs another hook.
//
//=========================================================================

//=== External Dependencies ===============================================

use log::{debug, trace};

//=== Internal Dependencies ===============================================

use super::{Scene, SceneContext, SceneState};
use crate::core::canvas::{Canvas, Dimensions};
use crate::core::error::SceneResult;
use crate::core::event::Event;

//=== ManagedScene ========================================================

/// A scene together with its lifecycle state and context.
pub struct ManagedScene {
    scene: Box<dyn Scene>,
    state: SceneState,
    finished: bool,
    context: SceneContext,
}

impl ManagedScene {
    //--- Construction -----------------------------------------------------

    pub fn new(scene: impl Scene + 'static) -> Self {
        Self::from_boxed(Box::new(scene))
    }

    pub fn from_boxed(scene: Box<dyn Scene>) -> Self {
        Self {
            scene,
            state: SceneState::Destroyed,
            finished: false,
            context: SceneContext::new(),
        }
    }

    //--- Queries ----------------------------------------------------------

    pub fn name(&self) -> &str {
        self.scene.name()
    }

    pub fn state(&self) -> SceneState {
        self.state
    }

    /// Returns `true` once [`finish`](Self::finish) has completed.
    pub fn is_finished(&self) -> bool {
        self.finished
    }

    pub fn has_intent(&self) -> bool {
        self.context.has_intent()
    }

    /// Resumed and not finished: the only state frame hooks run in.
    pub fn is_active(&self) -> bool {
        self.state == SceneState::Resumed && !self.finished
    }

    //--- Hand-off ---------------------------------------------------------

    /// Nominates a successor, replacing any pending one.
    pub fn launch(&mut self, scene: impl Scene + 'static) {
        self.context.launch(scene);
    }

    /// Removes the pending successor, wrapped and ready to be pushed.
    pub fn take_intent(&mut self) -> Option<ManagedScene> {
        self.context.take_intent().map(ManagedScene::from_boxed)
    }

    pub(crate) fn bind(&mut self, size: Dimensions) {
        self.context.bind(size);
    }

    //--- Lifecycle --------------------------------------------------------

    /// Moves one step toward `Resumed`.
    ///
    /// No-op when already resumed or finished.
    pub fn advance(&mut self) -> SceneResult {
        if self.finished {
            return Ok(());
        }

        let next = match self.state {
            SceneState::Destroyed => {
                self.scene.on_create(&mut self.context)?;
                SceneState::Created
            }
            SceneState::Created | SceneState::Stopped => {
                self.scene.on_start(&mut self.context)?;
                SceneState::Started
            }
            SceneState::Started | SceneState::Paused => {
                self.scene.on_resume(&mut self.context)?;
                SceneState::Resumed
            }
            SceneState::Resumed => return Ok(()),
        };

        self.enter(next);
        self.settle()
    }

    /// Runs the whole teardown chain from the current state and marks the
    /// scene finished.
    pub fn finish(&mut self) -> SceneResult {
        self.context.take_finish_request();

        if self.state == SceneState::Resumed {
            self.scene.on_pause(&mut self.context)?;
            self.enter(SceneState::Paused);
        }
        if matches!(self.state, SceneState::Started | SceneState::Paused) {
            self.scene.on_stop(&mut self.context)?;
            self.enter(SceneState::Stopped);
        }
        if matches!(self.state, SceneState::Created | SceneState::Stopped) {
            self.scene.on_destroy(&mut self.context)?;
            self.enter(SceneState::Destroyed);
        }

        self.context.take_finish_request();
        if !self.finished {
            debug!("Scene {} finished", self.name());
        }
        self.finished = true;
        Ok(())
    }

    //--- Frame Hooks ------------------------------------------------------

    /// Forwards one simulation step. Ignored unless active.
    pub fn update(&mut self, t: u64, dt: u64) -> SceneResult {
        if !self.is_active() {
            return Ok(());
        }
        self.scene.update(&mut self.context, t, dt)?;
        self.settle()
    }

    /// Forwards a render pass. Ignored unless active.
    pub fn render(&mut self, canvas: &mut Canvas) -> SceneResult {
        if !self.is_active() {
            return Ok(());
        }
        self.scene.render(&mut self.context, canvas)?;
        self.settle()
    }

    /// Forwards one event. Returns whether the scene consumed it; inactive
    /// scenes never do.
    pub fn handle_event(&mut self, event: &Event) -> SceneResult<bool> {
        if !self.is_active() {
            trace!("Scene {} not active, dropping {:?}", self.name(), event.kind());
            return Ok(false);
        }
        let consumed = self.scene.handle_event(&mut self.context, event)?;
        self.settle()?;
        Ok(consumed)
    }

    //--- Internal Helpers -------------------------------------------------

    fn enter(&mut self, state: SceneState) {
        debug!("Scene {}: {:?} → {:?}", self.scene.name(), self.state, state);
        self.state = state;
    }

    /// Carries out a finish requested from inside the hook that just ran.
    fn settle(&mut self) -> SceneResult {
        if self.context.take_finish_request() && !self.finished {
            return self.finish();
        }
        Ok(())
    }
}

impl std::fmt::Debug for ManagedScene {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ManagedScene")
            .field("name", &self.name())
            .field("state", &self.state)
            .field("finished", &self.finished)
            .field("context", &self.context)
            .finish()
    }
}

//=========================================================================
// Unit Tests
//=========================================================================
