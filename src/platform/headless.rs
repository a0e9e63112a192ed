//=========================================================================
// Headless Window
//=========================================================================
//
// `Window` without an OS window: a canvas plus a channel of injected events.
//
// Architecture:
//   EventInjector (clone anywhere) ──► crossbeam channel ──► HeadlessWindow
//                                                              ├─ poll_events
//                                                              └─ present (counts frames)
//
// Used by tests and for running scenes in CI or replay tools.
//
//=========================================================================

//=== External Dependencies ===============================================

use crossbeam_channel::{unbounded, Receiver, Sender};
use log::trace;

//=== Internal Dependencies ===============================================

use crate::core::canvas::{Canvas, Dimensions};
use crate::core::error::PlatformError;
use crate::core::event::Event;
use crate::core::window::{EventSource, Window};

//=== EventInjector =======================================================

/// Sending half of a [`HeadlessWindow`]'s event queue.
///
/// Injected events show up on the next `poll_events`. Sending after the
/// window is gone is silently ignored.
#[derive(Debug, Clone)]
pub struct EventInjector {
    sender: Sender<Event>,
}

impl EventInjector {
    pub fn send(&self, event: Event) {
        if self.sender.send(event).is_err() {
            trace!(target: "platform", "Headless window gone, event dropped");
        }
    }

    /// Shorthand for `send(Event::Quit)`.
    pub fn quit(&self) {
        self.send(Event::Quit);
    }
}

//=== HeadlessWindow ======================================================

/// In-memory [`Window`] for tests and offscreen runs.
#[derive(Debug)]
pub struct HeadlessWindow {
    canvas: Canvas,
    sender: Sender<Event>,
    receiver: Receiver<Event>,
    frames_presented: usize,
}

impl HeadlessWindow {
    pub fn new(size: Dimensions) -> Self {
        let (sender, receiver) = unbounded();
        Self {
            canvas: Canvas::new(size),
            sender,
            receiver,
            frames_presented: 0,
        }
    }

    /// A handle that can feed events from outside the loop (or from a scene).
    pub fn injector(&self) -> EventInjector {
        EventInjector {
            sender: self.sender.clone(),
        }
    }

    /// Queues an event for the next `poll_events`.
    pub fn push_event(&mut self, event: Event) {
        self.injector().send(event);
    }

    /// Number of successful `present` calls so far.
    pub fn frames_presented(&self) -> usize {
        self.frames_presented
    }

    /// The canvas as last rendered.
    pub fn frame(&self) -> &Canvas {
        &self.canvas
    }
}

impl EventSource for HeadlessWindow {
    fn poll_events(&mut self, events: &mut Vec<Event>) {
        events.extend(self.receiver.try_iter());
    }
}

impl Window for HeadlessWindow {
    fn size(&self) -> Dimensions {
        self.canvas.size()
    }

    fn canvas(&mut self) -> &mut Canvas {
        &mut self.canvas
    }

    fn present(&mut self) -> Result<(), PlatformError> {
        self.frames_presented += 1;
        Ok(())
    }
}

//=========================================================================
// Unit Tests
//=========================================================================
