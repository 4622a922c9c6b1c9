use anyhow::Result;
use glam::Vec2;
use log::info;
use winit::{
    event::{Event, WindowEvent},
    event_loop::EventLoop,
    window::WindowBuilder,
};

mod core;
mod engine;
mod game;

use engine::input::InputManager;
use engine::renderer::TextureStore;
use game::splitter::{FrameControl, SandboxConfig, SandboxState};

fn main() -> Result<()> {
    // Initialize logger
    env_logger::Builder::from_default_env()
        .filter_level(log::LevelFilter::Info)
        .init();

    info!("Starting Glyph Splitter...");

    // Create event loop and window
    let event_loop = EventLoop::new()?;
    let window = WindowBuilder::new()
        .with_title("Glyph Splitter")
        .with_inner_size(winit::dpi::LogicalSize::new(1280, 720))
        .with_resizable(true)
        .build(&event_loop)?;

    info!("Window created successfully");

    let size = window.inner_size();
    let mut sandbox = SandboxState::new(
        SandboxConfig::default(),
        TextureStore::new(),
        Vec2::new(size.width as f32, size.height as f32),
    );
    sandbox.init()?;
    let mut input = InputManager::default();

    // Main event loop
    event_loop
        .run(move |event, elwt| match event {
            Event::WindowEvent { event, .. } => match event {
                WindowEvent::CloseRequested => {
                    info!("Close requested, shutting down...");
                    sandbox.shutdown();
                    elwt.exit();
                }
                WindowEvent::Resized(physical_size) => {
                    sandbox
                        .camera_mut()
                        .resize(physical_size.width as f32, physical_size.height as f32);
                }
                WindowEvent::KeyboardInput { event, .. } => {
                    input.process_keyboard_event(&event);
                }
                WindowEvent::MouseInput { state, button, .. } => {
                    input.process_mouse_button(button, state);
                }
                WindowEvent::CursorMoved { position, .. } => {
                    input.process_cursor_moved(position);
                }
                WindowEvent::MouseWheel { delta, .. } => {
                    input.process_mouse_wheel(delta);
                }
                WindowEvent::Focused(false) => {
                    input.reset();
                    sandbox.focus_lost();
                }
                _ => {}
            },
            Event::AboutToWait => {
                if sandbox.frame(&input) == FrameControl::Quit {
                    info!("Quit requested, shutting down...");
                    sandbox.shutdown();
                    elwt.exit();
                    return;
                }
                input.update();
                window.request_redraw();
            }
            _ => {}
        })
        .map_err(|e| anyhow::anyhow!("Event loop error: {}", e))?;

    Ok(())
}
