use std::sync::Arc;
use std::time::Duration;

use anyhow::{bail, ensure, Result};
use cue_core::{CueColor, CueDisplay, InputLine, RigError, StopFlag, NEUTRAL};
use pixels::{Pixels, SurfaceTexture};
use tiny_skia::{Color, Pixmap};
use tracing::{debug, info, warn};
use winit::{
    application::ApplicationHandler,
    dpi::PhysicalSize,
    event::{KeyEvent, WindowEvent},
    event_loop::{ActiveEventLoop, EventLoop},
    keyboard::{KeyCode, PhysicalKey},
    platform::pump_events::{EventLoopExtPumpEvents, PumpStatus},
    window::{Fullscreen, Window, WindowId},
};

use crate::hardware::SimulatedLines;

const STARTUP_PUMPS: usize = 100;
const STARTUP_PUMP_WAIT: Duration = Duration::from_millis(20);

/// Off-screen RGBA frame filled with a single color.
pub struct Canvas {
    pixmap: Pixmap,
    current: CueColor,
}

impl Canvas {
    pub fn new(width: u32, height: u32) -> Result<Self, RigError> {
        let mut canvas = Self {
            pixmap: blank_pixmap(width, height)?,
            current: NEUTRAL,
        };
        canvas.fill(NEUTRAL);
        Ok(canvas)
    }

    pub fn fill(&mut self, color: CueColor) {
        let [r, g, b, a] = color.rgba();
        self.pixmap.fill(Color::from_rgba8(r, g, b, a));
        self.current = color;
    }

    pub fn resize(&mut self, width: u32, height: u32) -> Result<(), RigError> {
        self.pixmap = blank_pixmap(width, height)?;
        self.fill(self.current);
        Ok(())
    }

    pub fn current(&self) -> CueColor {
        self.current
    }

    pub fn size(&self) -> (u32, u32) {
        (self.pixmap.width(), self.pixmap.height())
    }

    pub fn data(&self) -> &[u8] {
        self.pixmap.data()
    }

    pub fn pixel(&self, x: u32, y: u32) -> Option<[u8; 4]> {
        self.pixmap
            .pixel(x, y)
            .map(|p| [p.red(), p.green(), p.blue(), p.alpha()])
    }
}

fn blank_pixmap(width: u32, height: u32) -> Result<Pixmap, RigError> {
    Pixmap::new(width.max(1), height.max(1))
        .ok_or_else(|| RigError::display(format!("cannot allocate {width}×{height} frame")))
}

/// Window-side state driven by winit callbacks.
struct Surface {
    window: Option<Arc<Window>>,
    pixels: Option<Pixels<'static>>,
    canvas: Option<Canvas>,
    stop: StopFlag,
    simulated: Option<Arc<SimulatedLines>>,
    error: Option<String>,
}

impl Surface {
    fn create_window_and_surface(&mut self, event_loop: &ActiveEventLoop) -> Result<()> {
        let monitor = event_loop
            .primary_monitor()
            .or_else(|| event_loop.available_monitors().next());

        let window_attributes = Window::default_attributes()
            .with_title("Cue Rig")
            .with_fullscreen(Some(Fullscreen::Borderless(monitor)))
            .with_resizable(false);

        let window = Arc::new(event_loop.create_window(window_attributes)?);
        let size = window.inner_size();
        info!(width = size.width, height = size.height, "display ready");

        let surface_texture = SurfaceTexture::new(size.width, size.height, window.clone());
        self.pixels = Some(Pixels::new(size.width, size.height, surface_texture)?);
        self.canvas = Some(Canvas::new(size.width, size.height)?);

        window.set_cursor_visible(false);
        self.window = Some(window);
        Ok(())
    }

    fn paint(&mut self, color: CueColor) -> Result<(), RigError> {
        let (Some(pixels), Some(canvas)) = (&mut self.pixels, &mut self.canvas) else {
            return Err(RigError::display("window is not open"));
        };
        canvas.fill(color);
        pixels.frame_mut().copy_from_slice(canvas.data());
        pixels
            .render()
            .map_err(|e| RigError::display(format!("render: {e}")))
    }

    fn handle_resize(&mut self, size: PhysicalSize<u32>) -> Result<(), RigError> {
        if size.width == 0 || size.height == 0 {
            return Ok(());
        }
        let (Some(pixels), Some(canvas)) = (&mut self.pixels, &mut self.canvas) else {
            return Ok(());
        };
        pixels
            .resize_surface(size.width, size.height)
            .map_err(|e| RigError::display(format!("resize surface: {e}")))?;
        pixels
            .resize_buffer(size.width, size.height)
            .map_err(|e| RigError::display(format!("resize buffer: {e}")))?;
        canvas.resize(size.width, size.height)?;
        let current = canvas.current();
        debug!(width = size.width, height = size.height, "display resized");
        self.paint(current)
    }

    fn handle_key(&mut self, event: &KeyEvent) {
        if !event.state.is_pressed() || event.repeat {
            return;
        }
        if let Some(lines) = &self.simulated {
            let line = match event.physical_key {
                PhysicalKey::Code(KeyCode::KeyS) => Some(InputLine::Sensor),
                PhysicalKey::Code(KeyCode::KeyA) => Some(InputLine::ButtonA),
                PhysicalKey::Code(KeyCode::KeyB) => Some(InputLine::ButtonB),
                _ => None,
            };
            if let Some(line) = line {
                debug!(%line, "simulated input");
                lines.latch(line);
                return;
            }
        }
        info!("key pressed, stopping");
        self.stop.request_stop();
    }

    fn record(&mut self, result: Result<(), RigError>) {
        if let Err(e) = result {
            self.error.get_or_insert_with(|| e.to_string());
        }
    }
}

impl ApplicationHandler for Surface {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.window.is_none() {
            if let Err(e) = self.create_window_and_surface(event_loop) {
                self.error = Some(format!("cannot open window: {e:#}"));
            }
        }
    }

    fn window_event(&mut self, _event_loop: &ActiveEventLoop, _id: WindowId, event: WindowEvent) {
        match event {
            WindowEvent::CloseRequested => {
                info!("window closed, stopping");
                self.stop.request_stop();
            }
            WindowEvent::KeyboardInput { event, .. } => self.handle_key(&event),
            WindowEvent::Resized(size) => {
                let result = self.handle_resize(size);
                self.record(result);
            }
            WindowEvent::RedrawRequested => {
                if let Some(current) = self.canvas.as_ref().map(Canvas::current) {
                    let result = self.paint(current);
                    self.record(result);
                }
            }
            _ => {}
        }
    }
}

/// Full-screen cue display on the primary monitor.
///
/// The window is driven by pumping winit events from the rig's own loop, so
/// there is no second thread and no redraw scheduling: every `show` renders
/// immediately.
pub struct WindowDisplay {
    event_loop: EventLoop<()>,
    surface: Surface,
}

impl WindowDisplay {
    /// Opens the window and blocks until it is ready to draw. Any key press
    /// (or closing the window) will set `stop`; with `simulated` lines the
    /// S, A and B keys latch the sensor and buttons instead.
    pub fn open(stop: StopFlag, simulated: Option<Arc<SimulatedLines>>) -> Result<Self> {
        let mut event_loop = EventLoop::new()?;
        let mut surface = Surface {
            window: None,
            pixels: None,
            canvas: None,
            stop,
            simulated,
            error: None,
        };

        for _ in 0..STARTUP_PUMPS {
            let status = event_loop.pump_app_events(Some(STARTUP_PUMP_WAIT), &mut surface);
            if let Some(e) = surface.error.take() {
                bail!(e);
            }
            if let PumpStatus::Exit(code) = status {
                bail!("event loop exited with {code} before the window opened");
            }
            if surface.pixels.is_some() {
                break;
            }
        }
        ensure!(surface.pixels.is_some(), "window did not open");

        let mut display = Self {
            event_loop,
            surface,
        };
        display.show_default()?;
        Ok(display)
    }

    fn present(&mut self, color: CueColor) -> Result<(), RigError> {
        self.surface.paint(color)?;
        self.pump_events()
    }
}

impl CueDisplay for WindowDisplay {
    fn show(&mut self, color: CueColor) -> Result<(), RigError> {
        self.present(color)
    }

    fn show_default(&mut self) -> Result<(), RigError> {
        self.present(NEUTRAL)
    }

    fn pump_events(&mut self) -> Result<(), RigError> {
        let status = self
            .event_loop
            .pump_app_events(Some(Duration::ZERO), &mut self.surface);
        if let PumpStatus::Exit(code) = status {
            warn!(code, "display event loop exited");
            self.surface.stop.request_stop();
        }
        match self.surface.error.take() {
            Some(e) => Err(RigError::Display(e)),
            None => Ok(()),
        }
    }
}

impl Drop for WindowDisplay {
    fn drop(&mut self) {
        if let Some(window) = &self.surface.window {
            window.set_cursor_visible(true);
        }
        // Pixels holds a handle to the window; let it go first.
        self.surface.pixels = None;
        debug!("display released");
    }
}
