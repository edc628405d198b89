use anyhow::Context as _;
use clap::Parser;
use std::io::Write as _;
use std::sync::Arc;
use winit::{
    application::ApplicationHandler,
    event::*,
    event_loop::{ActiveEventLoop, EventLoop},
    window::{CursorGrabMode, Window, WindowId},
};

use museum_walk::camera::FirstPersonCamera;
use museum_walk::cli::Cli;
use museum_walk::collision::{CollisionOutcome, Player};
use museum_walk::config::MuseumConfig;
use museum_walk::controls::PointerLockControls;
use museum_walk::core::{Button, Clock, Controller, FpsCounter, WinitController};
use museum_walk::loaders::AssetLoader;
use museum_walk::renderer::{OverlayAction, OverlayInfo, Renderer};
use museum_walk::rooms::SceneKind;
use museum_walk::scene_manager::SceneManager;

fn init_logging() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .format(|buf, record| {
            writeln!(
                buf,
                "{} {:<5} {}: {}",
                chrono::Local::now().format("%H:%M:%S%.3f"),
                record.level(),
                record.target(),
                record.args()
            )
        })
        .init();
}

fn grab_cursor(window: &Window) {
    let grabbed = window
        .set_cursor_grab(CursorGrabMode::Locked)
        .or_else(|_| window.set_cursor_grab(CursorGrabMode::Confined));
    if let Err(e) = grabbed {
        log::warn!("Cursor grab unavailable: {}", e);
    }
    window.set_cursor_visible(false);
}

fn release_cursor(window: &Window) {
    if let Err(e) = window.set_cursor_grab(CursorGrabMode::None) {
        log::warn!("Failed to release cursor: {}", e);
    }
    window.set_cursor_visible(true);
}

struct App {
    config: MuseumConfig,
    window: Option<Arc<Window>>,
    renderer: Option<Renderer>,
    camera: FirstPersonCamera,
    controls: PointerLockControls,
    input: WinitController,
    player: Player,
    scenes: SceneManager,
    clock: Clock,
    fps: FpsCounter,
}

impl App {
    fn new(config: MuseumConfig) -> Self {
        let camera = FirstPersonCamera::new(config.spawn());
        Self {
            controls: PointerLockControls::new(config.move_speed, config.mouse_sensitivity),
            player: Player::with_size(camera.position, config.player_size()),
            scenes: SceneManager::new(AssetLoader::new(config.asset_root.clone())),
            window: None,
            renderer: None,
            camera,
            input: WinitController::new(),
            clock: Clock::new(),
            fps: FpsCounter::default(),
            config,
        }
    }

    fn switch_scene(&mut self, kind: SceneKind) {
        self.scenes.set_scene(kind);
        let aspect = self.camera.aspect;
        self.camera = FirstPersonCamera::new(self.config.spawn());
        self.camera.aspect = aspect;
        self.player.teleport(self.camera.position);
    }

    fn lock(&mut self) {
        if self.controls.lock() {
            if let Some(window) = &self.window {
                grab_cursor(window);
            }
        }
    }

    fn unlock(&mut self) {
        if self.controls.unlock() {
            if let Some(window) = &self.window {
                release_cursor(window);
            }
        }
    }

    fn handle_overlay_action(&mut self, action: OverlayAction) {
        match action {
            OverlayAction::Enter => self.lock(),
            OverlayAction::SwitchScene(kind) => self.switch_scene(kind),
        }
    }

    fn frame(&mut self, event_loop: &ActiveEventLoop) {
        let delta = self.clock.tick();
        if self.fps.tick(delta) {
            log::debug!("FPS: {:.1}", self.fps.fps());
        }

        let was_locked = self.controls.is_locked();
        let pressed = self.input.just_pressed().to_vec();
        if !was_locked && pressed.contains(&Button::Escape) {
            event_loop.exit();
            return;
        }
        if let Some(kind) = pressed
            .iter()
            .filter_map(|button| button.digit())
            .filter_map(SceneKind::from_digit)
            .last()
        {
            self.switch_scene(kind);
        }

        self.controls.apply(&self.input, &mut self.camera, delta);
        if was_locked && !self.controls.is_locked() {
            if let Some(window) = &self.window {
                release_cursor(window);
            }
        }

        if let CollisionOutcome::Blocked { restored, .. } =
            self.player.update(self.camera.position, self.scenes.colliders())
        {
            self.camera.position = restored;
        }

        self.scenes.update(delta);
        self.input.reset_deltas();

        let mut action = None;
        if let (Some(renderer), Some(window)) = (&mut self.renderer, &self.window) {
            let rooms: Vec<String> = self.scenes.room_names().map(String::from).collect();
            let info = OverlayInfo {
                fps: self.fps.fps(),
                position: self.camera.position,
                scene: self.scenes.active().unwrap_or(self.config.start_scene),
                rooms: &rooms,
                pending: self.scenes.pending_count(),
                locked: self.controls.is_locked(),
            };
            match renderer.render(window, &self.camera, self.scenes.root(), &info) {
                Ok(clicked) => action = clicked,
                Err(wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated) => {
                    renderer.resize(renderer.size());
                }
                Err(wgpu::SurfaceError::OutOfMemory) => {
                    log::error!("Out of GPU memory");
                    event_loop.exit();
                }
                Err(e) => log::warn!("Render error: {}", e),
            }
        }
        if let Some(action) = action {
            self.handle_overlay_action(action);
        }
    }
}

impl ApplicationHandler for App {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.window.is_none() {
            let window = match event_loop.create_window(
                Window::default_attributes()
                    .with_title(self.config.window.title.clone())
                    .with_inner_size(winit::dpi::LogicalSize::new(
                        self.config.window.width,
                        self.config.window.height,
                    )),
            ) {
                Ok(w) => Arc::new(w),
                Err(e) => {
                    log::error!("Failed to create window: {}", e);
                    event_loop.exit();
                    return;
                }
            };

            let renderer = match pollster::block_on(Renderer::new(window.clone(), self.config.show_ui)) {
                Ok(r) => r,
                Err(e) => {
                    log::error!("Failed to initialize renderer: {:#}", e);
                    event_loop.exit();
                    return;
                }
            };

            let size = window.inner_size();
            self.camera.set_aspect(size.width, size.height);
            self.window = Some(window);
            self.renderer = Some(renderer);

            let start = self.config.start_scene;
            self.switch_scene(start);
            self.clock.reset();
        }
    }

    fn window_event(
        &mut self,
        event_loop: &ActiveEventLoop,
        _window_id: WindowId,
        event: WindowEvent,
    ) {
        // Let egui handle the event first
        if let (Some(renderer), Some(window)) = (&mut self.renderer, &self.window) {
            if renderer.handle_event(window, &event) {
                return;
            }
        }

        self.input.process_event(&event);

        match event {
            WindowEvent::CloseRequested => event_loop.exit(),
            WindowEvent::Resized(size) => {
                if let Some(renderer) = &mut self.renderer {
                    renderer.resize(size);
                }
                self.camera.set_aspect(size.width, size.height);
            }
            WindowEvent::Focused(false) => self.unlock(),
            WindowEvent::RedrawRequested => self.frame(event_loop),
            _ => {}
        }
    }

    fn device_event(&mut self, _event_loop: &ActiveEventLoop, _device_id: DeviceId, event: DeviceEvent) {
        self.input.process_device_event(&event);
    }

    fn about_to_wait(&mut self, _event_loop: &ActiveEventLoop) {
        if let Some(window) = &self.window {
            window.request_redraw();
        }
    }
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_logging();

    let config = MuseumConfig::resolve(&cli).context("Invalid configuration")?;
    log::info!(
        "Museum Walk - assets from {}, starting in {}",
        config.asset_root.display(),
        config.start_scene
    );
    log::info!("Controls: click to look around, WASD/arrows to walk, 1-5 to switch scene, Esc to release");

    let event_loop = EventLoop::new()?;
    let mut app = App::new(config);
    event_loop.run_app(&mut app)?;

    Ok(())
}
