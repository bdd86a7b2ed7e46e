use std::sync::Arc;
use std::time::Instant;

use thiserror::Error;
use tracing::{error, info, warn};
use winit::application::ApplicationHandler;
use winit::dpi::PhysicalSize;
use winit::event::WindowEvent;
use winit::event_loop::{ActiveEventLoop, ControlFlow, EventLoop};
use winit::keyboard::KeyCode;
use winit::window::{Window, WindowAttributes, WindowId};

use crate::capture::FrameCapture;
use crate::draw2d::Draw2d;
use crate::effect::{EffectContext, EffectSet};
use crate::gpu::{GpuContext, GpuError};
use crate::input::Input;
use crate::logging::init_logging;
use crate::present_pass::PresentPass;
use crate::render_target::RenderTarget;
use crate::scene::{SceneError, SceneManager};
use crate::shape::{Color, DrawList};

const TARGET_LABEL: &str = "Scene Target";

/// Anything that stops the application from starting or running.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("event loop error: {0}")]
    EventLoop(#[from] winit::error::EventLoopError),
    #[error("failed to create window: {0}")]
    Window(#[from] winit::error::OsError),
    #[error(transparent)]
    Gpu(#[from] GpuError),
    #[error("scene setup failed: {0}")]
    Scene(#[from] SceneError),
}

/// Configuration for the application window and loop.
///
/// Use the builder pattern to customize settings:
///
/// ```ignore
/// let config = AppConfig::new()
///     .title("Transitions")
///     .size(1280, 720)
///     .background(Color::BLACK);
/// ```
#[derive(Clone, Debug)]
pub struct AppConfig {
    /// Window title displayed in the title bar.
    pub title: String,
    /// Initial window width in physical pixels.
    pub width: u32,
    /// Initial window height in physical pixels.
    pub height: u32,
    /// Color the frame is cleared to before the scene draws.
    pub background: Color,
    /// Close the window when Escape is pressed.
    pub exit_on_escape: bool,
    /// Log filter used when no environment override is set.
    pub log_level: String,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            title: "Scene Change".to_string(),
            width: 800,
            height: 600,
            background: Color::LIGHT_BLUE,
            exit_on_escape: true,
            log_level: "info".to_string(),
        }
    }
}

impl AppConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn title(mut self, title: impl Into<String>) -> Self {
        self.title = title.into();
        self
    }

    pub fn size(mut self, width: u32, height: u32) -> Self {
        self.width = width;
        self.height = height;
        self
    }

    pub fn background(mut self, color: Color) -> Self {
        self.background = color;
        self
    }

    pub fn exit_on_escape(mut self, exit: bool) -> Self {
        self.exit_on_escape = exit;
        self
    }

    pub fn log_level(mut self, level: impl Into<String>) -> Self {
        self.log_level = level.into();
        self
    }

    /// Requested surface size. Scenes lay out in surface pixels, so the
    /// window is sized in physical pixels regardless of the display scale.
    pub fn inner_size(&self) -> PhysicalSize<u32> {
        PhysicalSize::new(self.width, self.height)
    }
}

/// Open a window and run the scenes until the window closes.
///
/// `setup` registers the scenes and must leave one of them active, usually
/// with `change_scene(name, 0.0)`.
///
/// # Example
///
/// ```ignore
/// run(AppConfig::new(), |scenes| {
///     scenes.add("title", TitleScene::new);
///     scenes.change_scene("title", 0.0)
/// })?;
/// ```
pub fn run<S>(config: AppConfig, setup: S) -> Result<(), AppError>
where
    S: FnOnce(&mut SceneManager) -> Result<(), SceneError>,
{
    init_logging(&config.log_level);

    let mut scenes = SceneManager::new();
    setup(&mut scenes)?;
    if scenes.active_scene().is_none() {
        return Err(SceneError::NoActiveScene.into());
    }

    let event_loop = EventLoop::new()?;
    event_loop.set_control_flow(ControlFlow::Poll);

    let mut app = SceneChangeApp::Pending {
        config,
        scenes: Some(scenes),
    };
    event_loop.run_app(&mut app)?;

    match app {
        SceneChangeApp::Failed(err) => Err(err),
        _ => Ok(()),
    }
}

enum SceneChangeApp {
    Pending {
        config: AppConfig,
        scenes: Option<SceneManager>,
    },
    Running(Box<Running>),
    Failed(AppError),
}

struct Running {
    config: AppConfig,
    window: Arc<Window>,
    gpu: GpuContext,
    target: RenderTarget,
    draw_2d: Draw2d,
    present: PresentPass,
    capture: FrameCapture,
    draw_list: DrawList,
    scenes: SceneManager,
    effects: EffectSet,
    input: Input,
    last_frame: Instant,
}

impl Running {
    fn start(
        event_loop: &ActiveEventLoop,
        config: AppConfig,
        scenes: SceneManager,
    ) -> Result<Self, AppError> {
        let window_attrs = WindowAttributes::default()
            .with_title(&config.title)
            .with_inner_size(config.inner_size());

        let window = Arc::new(event_loop.create_window(window_attrs)?);
        let gpu = GpuContext::new(window.clone())?;
        let target = RenderTarget::new(&gpu, TARGET_LABEL);
        let draw_2d = Draw2d::new(&gpu, target.format());
        let present = PresentPass::new(&gpu);

        info!(
            title = %config.title,
            width = gpu.width(),
            height = gpu.height(),
            format = ?gpu.config.format,
            "window ready"
        );

        Ok(Self {
            config,
            window,
            gpu,
            target,
            draw_2d,
            present,
            capture: FrameCapture::new(),
            draw_list: DrawList::new(),
            scenes,
            effects: EffectSet::new(),
            input: Input::new(),
            last_frame: Instant::now(),
        })
    }

    /// Run one update-draw-overlay pass and put it on screen.
    ///
    /// Returns `false` when the application should close.
    fn frame(&mut self) -> bool {
        let now = Instant::now();
        let dt = now.duration_since(self.last_frame).as_secs_f32();
        self.last_frame = now;

        if self.config.exit_on_escape && self.input.key_pressed(KeyCode::Escape) {
            info!("escape pressed, exiting");
            return false;
        }

        self.target.ensure_size(&self.gpu, TARGET_LABEL);
        let screen = self.gpu.screen_size();

        self.draw_list.clear();
        if !self
            .scenes
            .update(&self.input, &mut self.effects, screen, dt)
        {
            return false;
        }
        self.scenes.draw(&mut self.draw_list, screen);

        // Effects draw over the scene
        self.effects.advance_all(
            dt,
            &mut EffectContext {
                screen,
                draw: &mut self.draw_list,
                capture: &mut self.capture,
            },
        );
        self.capture.retain(self.effects.live_frames());

        self.draw_2d
            .prepare(&self.gpu, &self.draw_list, &self.capture);

        match self.render() {
            Ok(()) => {}
            Err(wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated) => {
                warn!("surface lost, reconfiguring");
                self.gpu.reconfigure();
            }
            Err(wgpu::SurfaceError::OutOfMemory) => {
                error!("surface out of memory");
                return false;
            }
            Err(err) => error!(error = %err, "failed to acquire surface texture"),
        }

        self.input.begin_frame();
        true
    }

    /// Draw the frame into the off-screen target, take any requested capture,
    /// then blit to the surface.
    fn render(&mut self) -> Result<(), wgpu::SurfaceError> {
        let output = self.gpu.surface.get_current_texture()?;
        let view = output
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default());

        let mut encoder = self
            .gpu
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("Frame Encoder"),
            });

        {
            let mut render_pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("Scene Pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view: &self.target.view,
                    resolve_target: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Clear(clear_color(self.config.background)),
                        store: wgpu::StoreOp::Store,
                    },
                    depth_slice: None,
                })],
                depth_stencil_attachment: None,
                timestamp_writes: None,
                occlusion_query_set: None,
            });

            self.draw_2d.render(&mut render_pass);
        }

        self.capture
            .finish_frame(&self.gpu, &mut encoder, &self.target);
        self.present
            .render(&self.gpu, &mut encoder, &view, &self.target);

        self.gpu.queue.submit(std::iter::once(encoder.finish()));
        output.present();
        Ok(())
    }
}

/// Clear values are linear; palette colors are sRGB.
fn clear_color(color: Color) -> wgpu::Color {
    let linear = |c: f32| {
        let c = c as f64;
        if c <= 0.04045 {
            c / 12.92
        } else {
            ((c + 0.055) / 1.055).powf(2.4)
        }
    };
    wgpu::Color {
        r: linear(color.r),
        g: linear(color.g),
        b: linear(color.b),
        a: color.a as f64,
    }
}

impl ApplicationHandler for SceneChangeApp {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        let SceneChangeApp::Pending { config, scenes } = self else {
            return;
        };
        let Some(scenes) = scenes.take() else {
            return;
        };

        match Running::start(event_loop, config.clone(), scenes) {
            Ok(running) => {
                running.window.request_redraw();
                *self = SceneChangeApp::Running(Box::new(running));
            }
            Err(err) => {
                error!(error = %err, "startup failed");
                *self = SceneChangeApp::Failed(err);
                event_loop.exit();
            }
        }
    }

    fn window_event(&mut self, event_loop: &ActiveEventLoop, _id: WindowId, event: WindowEvent) {
        let SceneChangeApp::Running(app) = self else {
            return;
        };

        app.input.handle_event(&event);

        match event {
            WindowEvent::CloseRequested => {
                event_loop.exit();
            }
            WindowEvent::Resized(size) => {
                app.gpu.resize(size.width, size.height);
            }
            WindowEvent::RedrawRequested => {
                if app.frame() {
                    app.window.request_redraw();
                } else {
                    event_loop.exit();
                }
            }
            _ => {}
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn config_defaults() {
        let config = AppConfig::default();
        assert_eq!((config.width, config.height), (800, 600));
        assert_eq!(config.background, Color::LIGHT_BLUE);
        assert!(config.exit_on_escape);
        assert_eq!(config.log_level, "info");
    }

    #[test]
    fn builder_overrides() {
        let config = AppConfig::new()
            .title("t")
            .size(320, 200)
            .exit_on_escape(false)
            .log_level("debug");
        assert_eq!(config.title, "t");
        assert_eq!((config.width, config.height), (320, 200));
        assert!(!config.exit_on_escape);
        assert_eq!(config.log_level, "debug");
    }

    #[test]
    fn window_matches_scene_layout_in_physical_pixels() {
        let size = AppConfig::default().inner_size();
        assert_eq!((size.width, size.height), (800, 600));

        // Same surface at any scale factor
        let at_2x: PhysicalSize<u32> = winit::dpi::Size::from(size).to_physical(2.0);
        assert_eq!(at_2x, size);
    }

    #[test]
    fn clear_color_is_linearized() {
        let c = clear_color(Color::WHITE);
        assert!((c.r - 1.0).abs() < 1e-6);
        assert_eq!(clear_color(Color::BLACK).g, 0.0);
        assert!(clear_color(Color::rgb(0.5, 0.5, 0.5)).r < 0.25);
    }

    #[test]
    fn setup_without_active_scene_fails_before_windowing() {
        let err = run(AppConfig::default(), |_| Ok(())).unwrap_err();
        assert!(matches!(err, AppError::Scene(SceneError::NoActiveScene)));
    }
}
