use crate::config;
use crate::renderer;
use crate::shading::ShadeMode;
use log::{error, info};
use std::error::Error;
use std::sync::Arc;
use std::time::Instant;
use winit::application::ApplicationHandler;
use winit::dpi::PhysicalSize;
use winit::event::{ElementState, WindowEvent};
use winit::event_loop::{ActiveEventLoop, EventLoop};
use winit::keyboard::{KeyCode, PhysicalKey};
use winit::window::Window;

pub struct App {
    window: Option<Arc<Window>>,
    renderer: Option<renderer::State>,
    mode: ShadeMode,
    frame_count: u32,
    last_title_update: Instant,
    init_error: Option<Box<dyn Error>>,
}

impl App {
    fn new() -> Self {
        Self {
            window: None,
            renderer: None,
            mode: ShadeMode::default(),
            frame_count: 0,
            last_title_update: Instant::now(),
            init_error: None,
        }
    }

    fn init_graphics(&mut self, event_loop: &ActiveEventLoop) -> Result<(), Box<dyn Error>> {
        let window_attributes = Window::default_attributes()
            .with_title(config::WINDOW_TITLE)
            .with_inner_size(PhysicalSize::new(config::WINDOW_WIDTH, config::WINDOW_HEIGHT))
            .with_resizable(true);
        let window = Arc::new(event_loop.create_window(window_attributes)?);
        self.window = Some(window.clone());

        let renderer = renderer::init(window, self.mode, config::VSYNC_ENABLED)?;
        self.renderer = Some(renderer);

        info!("Starting event loop...");
        Ok(())
    }

    fn advance_mode(&mut self) {
        self.mode = self.mode.next();
        info!("Shading mode -> {}", self.mode);
        if let Some(renderer) = self.renderer.as_mut() {
            renderer::activate(renderer, self.mode);
        }
    }

    fn update_fps_title(&mut self, window: &Window) {
        self.frame_count += 1;
        let elapsed = self.last_title_update.elapsed();
        if elapsed.as_secs_f32() >= 1.0 {
            let fps = self.frame_count as f32 / elapsed.as_secs_f32();
            window.set_title(&format!(
                "{} - {} | {:.2} FPS",
                config::WINDOW_TITLE,
                self.mode,
                fps
            ));
            self.frame_count = 0;
            self.last_title_update = Instant::now();
        }
    }
}

impl ApplicationHandler for App {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.window.is_none() {
            if let Err(e) = self.init_graphics(event_loop) {
                error!("Failed to initialize graphics: {}", e);
                self.init_error = Some(e);
                event_loop.exit();
            }
        }
    }

    fn window_event(
        &mut self,
        event_loop: &ActiveEventLoop,
        window_id: winit::window::WindowId,
        event: WindowEvent,
    ) {
        let Some(window) = self.window.clone() else {
            return;
        };
        if window.id() != window_id {
            return;
        }

        match event {
            WindowEvent::CloseRequested => {
                info!("Close requested. Shutting down.");
                event_loop.exit();
            }
            WindowEvent::Resized(new_size) => {
                if let Some(renderer) = self.renderer.as_mut() {
                    renderer::resize(renderer, new_size.width, new_size.height);
                }
            }
            WindowEvent::KeyboardInput { event: key_event, .. } => {
                if key_event.state != ElementState::Pressed {
                    return;
                }
                if let PhysicalKey::Code(KeyCode::Space) = key_event.physical_key {
                    self.advance_mode();
                }
            }
            WindowEvent::RedrawRequested => {
                self.update_fps_title(&window);
                if let Some(renderer) = self.renderer.as_mut() {
                    if let Err(e) = renderer::draw(renderer) {
                        error!("Failed to draw frame: {}", e);
                        event_loop.exit();
                    }
                }
            }
            _ => {}
        }
    }

    fn about_to_wait(&mut self, _event_loop: &ActiveEventLoop) {
        if let Some(window) = self.window.as_ref() {
            window.request_redraw();
        }
    }

    fn exiting(&mut self, _event_loop: &ActiveEventLoop) {
        if let Some(mut renderer) = self.renderer.take() {
            renderer::cleanup(&mut renderer);
        }
    }
}

pub fn run() -> Result<(), Box<dyn Error>> {
    let event_loop = EventLoop::new()?;
    let mut app = App::new();
    event_loop.run_app(&mut app)?;
    // A graphics init failure only stops the event loop; surface it here so
    // the process exits nonzero.
    if let Some(e) = app.init_error.take() {
        return Err(e);
    }
    Ok(())
}
