//! Window, renderer, input and audio wiring

use std::sync::Arc;

use pollster::FutureExt;
use winit::{event_loop::ActiveEventLoop, window::Window};

use crate::audio::AudioSystem;
use crate::consts::{SCREEN_HEIGHT, SCREEN_WIDTH};
use crate::input::InputState;
use crate::renderer::{RenderState, TextRenderer};

pub struct App {
    pub window: Arc<Window>,
    pub render: RenderState,
    pub text: TextRenderer,
    pub input: InputState,
    pub audio: AudioSystem,
}

impl App {
    pub fn new(event_loop: &ActiveEventLoop, instance: &wgpu::Instance) -> Result<Self, String> {
        let window_attributes = Window::default_attributes()
            .with_title("Cat Dash")
            .with_inner_size(winit::dpi::LogicalSize::new(SCREEN_WIDTH, SCREEN_HEIGHT))
            .with_resizable(false);

        let window = Arc::new(
            event_loop
                .create_window(window_attributes)
                .map_err(|e| format!("Failed to create window: {e}"))?,
        );

        let surface = instance
            .create_surface(window.clone())
            .map_err(|e| format!("Failed to create surface: {e}"))?;

        let adapter = instance
            .request_adapter(&wgpu::RequestAdapterOptions {
                power_preference: wgpu::PowerPreference::HighPerformance,
                compatible_surface: Some(&surface),
                force_fallback_adapter: false,
            })
            .block_on()
            .map_err(|e| format!("Failed to get adapter: {e}"))?;
        log::info!("Using adapter: {:?}", adapter.get_info().name);

        let size = window.inner_size();
        let render = RenderState::new(surface, &adapter, size.width.max(1), size.height.max(1))
            .block_on()?;
        let text = TextRenderer::new(&render.device, &render.queue, render.config.format);

        Ok(Self {
            window,
            render,
            text,
            input: InputState::new(),
            audio: AudioSystem::new(),
        })
    }

    pub fn resize(&mut self, new_size: winit::dpi::PhysicalSize<u32>) {
        self.render.resize(new_size.width, new_size.height);
    }

    pub fn handle_input(&mut self, event: &winit::event::WindowEvent) {
        use winit::event::WindowEvent;
        use winit::keyboard::PhysicalKey;

        if let WindowEvent::KeyboardInput { event, .. } = event
            && let PhysicalKey::Code(keycode) = event.physical_key
        {
            if event.state.is_pressed() {
                if !event.repeat {
                    self.input.handle_key_press(keycode);
                }
            } else {
                self.input.handle_key_release(keycode);
            }
        }
    }
}
