//=========================================================================
// Stagecraft: Library Root
//
// A scene-stack game loop: scenes with an Android-style lifecycle, driven
// by a fixed-timestep simulation on top of a small window abstraction.
//
// Responsibilities:
// - Expose the engine facade (`Engine`, `EngineBuilder`)
// - Expose the scene system and its building blocks (`core`)
// - Provide the Winit/pixels window and a headless one (`platform`)
//
// Typical usage:
// ```no_run
// use stagecraft::prelude::*;
//
// struct Menu;
// impl Scene for Menu {}
//
// fn main() -> Result<(), EngineError> {
//     EngineBuilder::new()
//         .build()
//         .init(|scenes| scenes.push(Menu))
//         .run()
// }
// ```
//
//=========================================================================

//--- Public Modules ------------------------------------------------------
//
// `core` holds everything platform-independent: scenes, the loop, timing,
// events, canvas and errors.
//
// `platform` implements `core::window::Window` for real (Winit) and
// headless use.
//
pub mod core;
pub mod platform;
pub mod prelude;

//--- Internal Modules ----------------------------------------------------

mod engine;

//--- Public Exports ------------------------------------------------------

pub use engine::{Engine, EngineBuilder};
