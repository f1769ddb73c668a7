//! Cat Dash entry point
//!
//! The launcher verifies the runtime before any game state exists: the
//! tuning file's format version must match this build and a usable GPU
//! adapter must be present. Either failure reports to stderr and exits
//! non-zero. After that the winit event loop drives a fixed 60 Hz
//! simulation with vsync-capped presentation.

use std::path::Path;
use std::process::ExitCode;
use std::time::{SystemTime, UNIX_EPOCH};

use pollster::FutureExt;
use winit::{
    application::ApplicationHandler,
    event::WindowEvent,
    event_loop::{ActiveEventLoop, ControlFlow, EventLoop},
    window::WindowId,
};

use cat_dash::app::App;
use cat_dash::background::{Background, Theme};
use cat_dash::consts::*;
use cat_dash::game_loop::GameLoop;
use cat_dash::highscore::{self, HighScore};
use cat_dash::renderer::{scene, vertex::colors};
use cat_dash::sim::{GameEvent, GamePhase, GameState, tick};
use cat_dash::tuning::{TUNING_FILE, Tuning};

struct CatDashApp {
    instance: wgpu::Instance,
    app: Option<App>,
    game_loop: GameLoop,
    state: GameState,
    background: Background,
    tuning: Tuning,
    high_score: HighScore,
    /// The current run set a new record (shown on the game over screen)
    new_record: bool,
}

impl CatDashApp {
    fn new(instance: wgpu::Instance, tuning: Tuning, high_score: HighScore, seed: u64) -> Self {
        Self {
            instance,
            app: None,
            game_loop: GameLoop::new(60),
            state: GameState::new(seed, &tuning),
            background: Background::new(seed, Theme::BlueDusk),
            tuning,
            high_score,
            new_record: false,
        }
    }

    fn frame(&mut self, event_loop: &ActiveEventLoop) {
        let Some(app) = self.app.as_mut() else {
            return;
        };

        if app.input.quit {
            event_loop.exit();
            return;
        }
        if app.input.take_toggle_sound() {
            app.audio.toggle();
        }
        if app.input.take_cycle_background() {
            self.background.cycle_theme();
        }

        // Fixed-step simulation; one-shot inputs are consumed by the first
        // substep of the frame
        let state = &mut self.state;
        let background = &mut self.background;
        let tuning = &self.tuning;
        let input_state = &mut app.input;
        self.game_loop.tick(|dt| {
            let input = input_state.tick_input();
            tick(state, &input, tuning, dt);
            input_state.reset_one_shot_inputs();
            // Scenery drifts through game over, but not while paused
            if state.phase != GamePhase::Paused {
                background.update(dt);
            }
        });

        for event in self.state.drain_events() {
            if event == GameEvent::Died {
                self.new_record = self.high_score.observe(self.state.score);
            }
            if event == GameEvent::Restarted {
                self.new_record = false;
            }
            app.audio.handle_event(event);
        }

        self.draw_hud();
        self.render();

        if let Some(app) = self.app.as_ref() {
            app.window.request_redraw();
        }
    }

    fn render(&mut self) {
        let Some(app) = self.app.as_mut() else {
            return;
        };
        let vertices = scene::build(&self.state, &self.background);
        match app.render.begin_frame(&vertices) {
            Ok((output, view, mut encoder)) => {
                app.text.flush(&app.render.device, &mut encoder, &view);
                app.render.finish_frame(output, encoder);
            }
            Err(wgpu::SurfaceError::Lost) => {
                let (w, h) = app.render.size;
                app.render.resize(w, h);
            }
            Err(wgpu::SurfaceError::OutOfMemory) => {
                log::error!("Out of memory!");
            }
            Err(e) => log::warn!("Render error: {e:?}"),
        }
    }

    fn draw_hud(&mut self) {
        let Some(app) = self.app.as_mut() else {
            return;
        };
        let text = &mut app.text;
        let state = &self.state;
        let center = SCREEN_WIDTH / 2.0;

        match state.phase {
            GamePhase::Splash => {
                text.draw_centered("CAT DASH", center, SCREEN_HEIGHT / 3.0, 48.0, colors::TITLE_TEXT);
                let lines = [
                    "HELP THE CAT PAST THE OBSTACLES!",
                    "SPACE TO JUMP - DOWN TO SLIDE",
                    "F TO SHOOT (ONE SHOT PER 20 POINTS)",
                    "BALLOONS: STAY ON THE GROUND",
                    "M SOUND - B BACKGROUND - R RESTART",
                    "PRESS ANY KEY TO START",
                ];
                for (i, line) in lines.iter().enumerate() {
                    text.draw_centered(
                        line,
                        center,
                        SCREEN_HEIGHT / 2.0 + i as f32 * 40.0,
                        20.0,
                        colors::HUD_TEXT,
                    );
                }
                if self.high_score.best() > 0 {
                    text.draw_centered(
                        &format!("HIGH SCORE: {}", self.high_score.best()),
                        center,
                        SCREEN_HEIGHT / 2.0 + lines.len() as f32 * 40.0 + 20.0,
                        20.0,
                        colors::HUD_ACCENT,
                    );
                }
            }
            _ => {
                text.draw(&format!("SCORE: {}", state.score), 10.0, 30.0, 24.0, colors::HUD_TEXT);
                let high = format!("HIGH SCORE: {}", self.high_score.best());
                let width = text.measure(&high, 24.0);
                text.draw(&high, SCREEN_WIDTH - 10.0 - width, 30.0, 24.0, colors::HUD_ACCENT);
                text.draw(
                    &format!("SPEED: {:.1}", state.scroll_speed / 60.0),
                    10.0,
                    58.0,
                    20.0,
                    colors::HUD_TEXT,
                );
                text.draw(
                    &format!("SHOTS: {}", state.player.shots),
                    10.0,
                    84.0,
                    20.0,
                    colors::HUD_TEXT,
                );
                if state.combo > 1 {
                    text.draw_centered(
                        &format!("COMBO: {}X", state.combo),
                        center,
                        40.0,
                        36.0,
                        colors::COMBO_TEXT,
                    );
                }

                for popup in &state.popups {
                    let mut color = colors::COMBO_TEXT;
                    if popup.ttl < 20 {
                        color[3] = popup.ttl as f32 / 20.0;
                    }
                    text.draw_centered(&popup.text, popup.pos.x, popup.pos.y, 20.0, color);
                }

                match state.phase {
                    GamePhase::GameOver => {
                        text.draw_centered(
                            "GAME OVER!",
                            center,
                            SCREEN_HEIGHT / 3.0,
                            48.0,
                            colors::GAME_OVER_TEXT,
                        );
                        text.draw_centered(
                            &format!("FINAL SCORE: {}", state.score),
                            center,
                            SCREEN_HEIGHT / 2.0,
                            24.0,
                            colors::WHITE,
                        );
                        if self.new_record {
                            text.draw_centered(
                                "NEW HIGH SCORE!",
                                center,
                                SCREEN_HEIGHT / 2.0 + 40.0,
                                24.0,
                                colors::NEW_RECORD_TEXT,
                            );
                        }
                        text.draw_centered(
                            "PRESS R TO RESTART",
                            center,
                            SCREEN_HEIGHT / 2.0 + 80.0,
                            24.0,
                            colors::WHITE,
                        );
                    }
                    GamePhase::Paused => {
                        text.draw_centered("PAUSED", center, SCREEN_HEIGHT / 2.0, 48.0, colors::WHITE);
                    }
                    _ => {}
                }
            }
        }
    }
}

impl ApplicationHandler for CatDashApp {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.app.is_none() {
            match App::new(event_loop, &self.instance) {
                Ok(app) => {
                    app.window.request_redraw();
                    self.app = Some(app);
                }
                Err(e) => {
                    log::error!("Failed to initialize: {e}");
                    event_loop.exit();
                }
            }
        }
    }

    fn window_event(&mut self, event_loop: &ActiveEventLoop, _id: WindowId, event: WindowEvent) {
        match event {
            WindowEvent::CloseRequested => event_loop.exit(),
            WindowEvent::Resized(new_size) => {
                if let Some(app) = self.app.as_mut() {
                    app.resize(new_size);
                }
            }
            WindowEvent::RedrawRequested => self.frame(event_loop),
            other => {
                if let Some(app) = self.app.as_mut() {
                    app.handle_input(&other);
                }
            }
        }
    }
}

/// Verify the pieces that can actually mismatch at run time, before any
/// game state is constructed
fn verify_runtime(instance: &wgpu::Instance) -> Result<Tuning, String> {
    let tuning = Tuning::load(Path::new(TUNING_FILE))?;

    let adapter = instance
        .request_adapter(&wgpu::RequestAdapterOptions {
            power_preference: wgpu::PowerPreference::HighPerformance,
            compatible_surface: None,
            force_fallback_adapter: false,
        })
        .block_on()
        .map_err(|e| format!("no compatible GPU adapter: {e}"))?;
    log::info!("GPU check passed: {:?}", adapter.get_info().name);

    Ok(tuning)
}

fn launch() -> Result<(), String> {
    let instance = wgpu::Instance::new(&wgpu::InstanceDescriptor::default());
    let tuning = verify_runtime(&instance)?;

    let high_score_path = Path::new(highscore::HIGH_SCORE_FILE);
    if highscore::file_is_corrupt(high_score_path) {
        log::warn!("High score file is unreadable, starting from 0");
    }
    let high_score = HighScore::load(high_score_path);

    let seed = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis() as u64)
        .unwrap_or(0);

    let event_loop = EventLoop::new().map_err(|e| format!("Failed to create event loop: {e}"))?;
    event_loop.set_control_flow(ControlFlow::Poll);

    let mut app = CatDashApp::new(instance, tuning, high_score, seed);
    event_loop
        .run_app(&mut app)
        .map_err(|e| format!("Event loop error: {e}"))
}

fn main() -> ExitCode {
    env_logger::init();

    if std::env::args().any(|a| a == "--version" || a == "-V") {
        println!("cat-dash {}", env!("CARGO_PKG_VERSION"));
        return ExitCode::SUCCESS;
    }

    log::info!("Cat Dash starting...");
    match launch() {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            log::error!("{e}");
            eprintln!("cat-dash: {e}");
            ExitCode::FAILURE
        }
    }
}
