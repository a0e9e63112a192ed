//=========================================================================
// Scene Test Doubles
//=========================================================================
//
// Recording scenes shared by the scene tests.
//
// Architecture:
//   Scripted (scripted Scene) ──record──► Journal (shared, ordered hook log)
//
//=========================================================================

//=== External Dependencies ===============================================

use std::cell::RefCell;
use std::rc::Rc;

//=== Internal Dependencies ===============================================

use super::{Scene, SceneContext};
use crate::core::canvas::{Canvas, Color};
use crate::core::error::{SceneError, SceneResult};
use crate::core::event::Event;

//=== Journal =============================================================

/// Shared, ordered log of hook calls across several scenes.
#[derive(Debug, Clone, Default)]
pub(crate) struct Journal(Rc<RefCell<Vec<String>>>);

impl Journal {
    pub(crate) fn record(&self, entry: String) {
        self.0.borrow_mut().push(entry);
    }

    pub(crate) fn entries(&self) -> Vec<String> {
        self.0.borrow().clone()
    }

    /// Entries of one scene with the `name:` prefix stripped.
    pub(crate) fn of(&self, name: &str) -> Vec<String> {
        let prefix = format!("{name}:");
        self.0
            .borrow()
            .iter()
            .filter_map(|entry| entry.strip_prefix(&prefix).map(str::to_owned))
            .collect()
    }

    /// Lifecycle hooks of one scene, frame hooks filtered out.
    pub(crate) fn lifecycle_of(&self, name: &str) -> Vec<String> {
        self.of(name)
            .into_iter()
            .filter(|entry| entry.starts_with("on_"))
            .collect()
    }

    pub(crate) fn position(&self, entry: &str) -> Option<usize> {
        self.0.borrow().iter().position(|e| e == entry)
    }

    pub(crate) fn count(&self, entry: &str) -> usize {
        self.0.borrow().iter().filter(|e| e.as_str() == entry).count()
    }
}

//=== Scripted ===============================================================

type Factory = Box<dyn FnMut() -> Box<dyn Scene>>;

/// Scene that journals every hook and can be scripted to finish, launch a
/// successor, or fail.
pub(crate) struct Scripted {
    name: &'static str,
    journal: Journal,
    renders: usize,
    updates: usize,
    finish_after_renders: Option<usize>,
    finish_after_updates: Option<usize>,
    launch_after_renders: Option<(usize, Factory)>,
    fail_in: Option<&'static str>,
    on_render: Option<Box<dyn FnMut(usize)>>,
}

impl Scripted {
    pub(crate) fn new(name: &'static str, journal: &Journal) -> Self {
        Self {
            name,
            journal: journal.clone(),
            renders: 0,
            updates: 0,
            finish_after_renders: None,
            finish_after_updates: None,
            launch_after_renders: None,
            fail_in: None,
            on_render: None,
        }
    }

    /// Calls `ctx.finish()` from the n-th `render`.
    pub(crate) fn finish_after_renders(mut self, n: usize) -> Self {
        self.finish_after_renders = Some(n);
        self
    }

    /// Calls `ctx.finish()` from the n-th `update`.
    pub(crate) fn finish_after_updates(mut self, n: usize) -> Self {
        self.finish_after_updates = Some(n);
        self
    }

    /// Launches `make()` from the n-th `render`.
    pub(crate) fn launch_after_renders(
        mut self,
        n: usize,
        make: impl FnMut() -> Box<dyn Scene> + 'static,
    ) -> Self {
        self.launch_after_renders = Some((n, Box::new(make)));
        self
    }

    /// Returns an error from the named hook.
    pub(crate) fn fail_in(mut self, hook: &'static str) -> Self {
        self.fail_in = Some(hook);
        self
    }

    /// Runs `f(render_count)` at the end of every `render`.
    pub(crate) fn on_render(mut self, f: impl FnMut(usize) + 'static) -> Self {
        self.on_render = Some(Box::new(f));
        self
    }

    fn hook(&mut self, hook: &str) -> SceneResult {
        self.journal.record(format!("{}:{}", self.name, hook));
        if self.fail_in == Some(hook) {
            return Err(SceneError::msg(format!("{} failed in {}", self.name, hook)));
        }
        Ok(())
    }
}

impl Scene for Scripted {
    fn name(&self) -> &str {
        self.name
    }

    fn on_create(&mut self, _ctx: &mut SceneContext) -> SceneResult {
        self.hook("on_create")
    }

    fn on_start(&mut self, _ctx: &mut SceneContext) -> SceneResult {
        self.hook("on_start")
    }

    fn on_resume(&mut self, _ctx: &mut SceneContext) -> SceneResult {
        self.hook("on_resume")
    }

    fn on_pause(&mut self, _ctx: &mut SceneContext) -> SceneResult {
        self.hook("on_pause")
    }

    fn on_stop(&mut self, _ctx: &mut SceneContext) -> SceneResult {
        self.hook("on_stop")
    }

    fn on_destroy(&mut self, _ctx: &mut SceneContext) -> SceneResult {
        self.hook("on_destroy")
    }

    fn update(&mut self, ctx: &mut SceneContext, t: u64, dt: u64) -> SceneResult {
        self.hook(&format!("update({t},{dt})"))?;
        self.updates += 1;
        if self.finish_after_updates == Some(self.updates) {
            ctx.finish();
        }
        Ok(())
    }

    fn render(&mut self, ctx: &mut SceneContext, canvas: &mut Canvas) -> SceneResult {
        self.hook("render")?;
        canvas.clear(Color::WHITE);
        self.renders += 1;

        if self.finish_after_renders == Some(self.renders) {
            ctx.finish();
        }
        if let Some((n, make)) = self.launch_after_renders.as_mut() {
            if *n == self.renders {
                ctx.launch_boxed(make());
            }
        }
        if let Some(f) = self.on_render.as_mut() {
            f(self.renders);
        }
        Ok(())
    }

    fn handle_event(&mut self, _ctx: &mut SceneContext, event: &Event) -> SceneResult<bool> {
        self.hook(&format!("event({:?})", event.kind()))?;
        Ok(true)
    }
}

impl Drop for Scripted {
    fn drop(&mut self) {
        self.journal.record(format!("{}:dropped", self.name));
    }
}
