//=========================================================================
// Stagecraft Demo
//
// Two scenes handing off to each other:
//   Menu  ── Enter ──► Bounce ── Escape ──► Menu ── Escape ──► exit
//
// Run with `RUST_LOG=debug cargo run --bin demo` to watch the lifecycle.
//
//=========================================================================

use log::info;
use stagecraft::prelude::*;

//=== Menu ================================================================

/// Title screen with a pulsing frame.
struct Menu {
    pulse: u64,
}

impl Menu {
    fn new() -> Self {
        Self { pulse: 0 }
    }
}

impl Scene for Menu {
    fn name(&self) -> &str {
        "Menu"
    }

    fn on_create(&mut self, ctx: &mut SceneContext) -> SceneResult {
        let size = ctx.window_size();
        info!("Menu ready at {}x{}; Enter to play, Escape to quit", size.width, size.height);
        Ok(())
    }

    fn update(&mut self, _ctx: &mut SceneContext, t: u64, _dt: u64) -> SceneResult {
        self.pulse = (t / 500) % 2;
        Ok(())
    }

    fn render(&mut self, ctx: &mut SceneContext, canvas: &mut Canvas) -> SceneResult {
        let size = ctx.window_size();
        canvas.clear(Color::rgb(20, 24, 48));

        let color = if self.pulse == 0 { Color::WHITE } else { Color::rgb(120, 140, 220) };
        let frame = Rect::new(
            size.width as i32 / 4,
            size.height as i32 / 3,
            size.width / 2,
            size.height / 3,
        );
        canvas.draw_rect(frame, color);
        Ok(())
    }

    fn handle_event(&mut self, ctx: &mut SceneContext, event: &Event) -> SceneResult<bool> {
        match event.pressed_key() {
            Some(KeyCode::Enter) => ctx.launch(Bounce::new(ctx.window_size())),
            Some(KeyCode::Escape) => ctx.finish(),
            _ => return Ok(false),
        }
        Ok(true)
    }
}

//=== Bounce ==============================================================

const BALL: u32 = 16;

/// A square bouncing off the window edges, in pixels per second.
struct Bounce {
    x: f32,
    y: f32,
    vx: f32,
    vy: f32,
    bounds: Dimensions,
}

impl Bounce {
    fn new(bounds: Dimensions) -> Self {
        Self {
            x: bounds.width as f32 / 2.0,
            y: bounds.height as f32 / 2.0,
            vx: 240.0,
            vy: 180.0,
            bounds,
        }
    }
}

impl Scene for Bounce {
    fn name(&self) -> &str {
        "Bounce"
    }

    fn on_resume(&mut self, ctx: &mut SceneContext) -> SceneResult {
        self.bounds = ctx.window_size();
        Ok(())
    }

    fn update(&mut self, _ctx: &mut SceneContext, _t: u64, dt: u64) -> SceneResult {
        let step = dt as f32 / 1000.0;
        let max_x = self.bounds.width.saturating_sub(BALL) as f32;
        let max_y = self.bounds.height.saturating_sub(BALL) as f32;

        self.x += self.vx * step;
        self.y += self.vy * step;

        if self.x <= 0.0 || self.x >= max_x {
            self.vx = -self.vx;
            self.x = self.x.clamp(0.0, max_x);
        }
        if self.y <= 0.0 || self.y >= max_y {
            self.vy = -self.vy;
            self.y = self.y.clamp(0.0, max_y);
        }
        Ok(())
    }

    fn render(&mut self, _ctx: &mut SceneContext, canvas: &mut Canvas) -> SceneResult {
        canvas.clear(Color::BLACK);
        canvas.fill_rect(Rect::new(self.x as i32, self.y as i32, BALL, BALL), Color::RED);
        Ok(())
    }

    fn handle_event(&mut self, ctx: &mut SceneContext, event: &Event) -> SceneResult<bool> {
        match event {
            Event::Resized(size) => {
                self.bounds = *size;
                Ok(false)
            }
            _ if event.pressed_key() == Some(KeyCode::Escape) => {
                ctx.launch(Menu::new());
                Ok(true)
            }
            _ => Ok(false),
        }
    }
}

//=== Entry Point =========================================================

fn main() -> Result<(), EngineError> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    EngineBuilder::new()
        .with_title("Stagecraft Demo")
        .with_size(640, 480)
        .build()
        .init(|scenes| scenes.push(Menu::new()))
        .run()
}
