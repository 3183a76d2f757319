//! App struct: configuration, frame loop, headless mode.
//!
//! [`App`] owns a [`Host`] and drives its frames. In the async mode the loop
//! sleeps on a `tokio::sync::Notify` until some update is scheduled, paces to
//! the next frame boundary with a `tokio::time` interval, and fires the
//! frame. The `new_headless` constructor swaps the notify source for a
//! manually-pumped one so tests control frame timing exactly.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::Notify;
use tokio::time::{interval, MissedTickBehavior};

use crate::event::Quit;
use crate::host::Host;
use crate::schedule::{CallbackFailure, FrameProbe, ManualFrames, NotifyFrames};

// ---------------------------------------------------------------------------
// AppConfig
// ---------------------------------------------------------------------------

/// Configuration for the application.
#[derive(Debug, Clone)]
pub struct AppConfig {
    /// Optional application title.
    pub title: Option<String>,
    /// Target frames per second for the update loop.
    pub fps: u32,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            title: None,
            fps: 60,
        }
    }
}

impl AppConfig {
    /// Create a new default config.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the title (builder).
    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    /// Set the target FPS (builder).
    pub fn with_fps(mut self, fps: u32) -> Self {
        self.fps = fps;
        self
    }
}

// ---------------------------------------------------------------------------
// App
// ---------------------------------------------------------------------------

/// How the app learns that a frame was requested.
enum FrameDriver {
    /// Manually pumped; the probe shows outstanding requests.
    Headless(FrameProbe),
    /// Woken through a notify handle by the scheduler.
    Notified(Arc<Notify>),
}

/// Shared handle that asks a running [`App`] loop to exit.
#[derive(Clone)]
pub struct QuitHandle {
    notify: Arc<Notify>,
}

impl QuitHandle {
    /// Request the loop to exit. Safe to call before the loop starts.
    pub fn quit(&self) {
        self.notify.notify_one();
    }
}

/// The main application struct.
///
/// Owns the host, the frame driver, and the config.
pub struct App {
    /// The host (element tree, bindings, scheduler, notices).
    pub host: Host,
    /// Application configuration.
    pub config: AppConfig,
    frames: FrameDriver,
    quit: Arc<Notify>,
    running: bool,
}

impl App {
    /// Create an app whose frames are driven by the async run loop.
    pub fn new(config: AppConfig) -> Self {
        let frames = NotifyFrames::new();
        let handle = frames.handle();
        Self {
            host: Host::new(Box::new(frames)),
            config,
            frames: FrameDriver::Notified(handle),
            quit: Arc::new(Notify::new()),
            running: true,
        }
    }

    /// Create a headless app for testing (frames pumped manually).
    pub fn new_headless() -> Self {
        let frames = ManualFrames::new();
        let probe = frames.probe();
        Self {
            host: Host::new(Box::new(frames)),
            config: AppConfig::default(),
            frames: FrameDriver::Headless(probe),
            quit: Arc::new(Notify::new()),
            running: true,
        }
    }

    /// Whether this app is headless (manually pumped).
    pub fn is_headless(&self) -> bool {
        matches!(self.frames, FrameDriver::Headless(_))
    }

    /// Whether a frame is currently requested.
    pub fn frame_requested(&self) -> bool {
        match &self.frames {
            FrameDriver::Headless(probe) => probe.is_requested(),
            // The notified driver consumes its wake-ups inside `run`.
            FrameDriver::Notified(_) => false,
        }
    }

    /// Whether the app is still running.
    pub fn is_running(&self) -> bool {
        self.running
    }

    /// Request the app to quit.
    pub fn request_quit(&mut self) {
        self.running = false;
    }

    /// A handle that can stop a running loop from elsewhere.
    pub fn quit_handle(&self) -> QuitHandle {
        QuitHandle {
            notify: Arc::clone(&self.quit),
        }
    }

    /// Fire one frame and process notices. The headless pump.
    pub fn pump(&mut self) -> Vec<CallbackFailure> {
        if let FrameDriver::Headless(probe) = &self.frames {
            probe.clear();
        }
        let failures = self.host.run_frame();
        self.handle_notices();
        failures
    }

    /// Drive frames until quit is requested.
    ///
    /// Sleeps until the scheduler requests a frame, paces to the configured
    /// FPS, fires the frame, then processes notices. Callback failures have
    /// already been reported by the host; the loop keeps running.
    pub async fn run(&mut self) {
        let FrameDriver::Notified(wake) = &self.frames else {
            // Headless apps are pumped manually.
            return;
        };
        let wake = Arc::clone(wake);
        let quit = Arc::clone(&self.quit);

        let period = Duration::from_micros(1_000_000 / u64::from(self.config.fps.max(1)));
        let mut ticker = interval(period);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

        while self.running {
            tokio::select! {
                _ = wake.notified() => {
                    ticker.tick().await;
                    let _ = self.host.run_frame();
                    self.handle_notices();
                }
                _ = quit.notified() => {
                    self.running = false;
                }
            }
        }
    }

    /// Process pending notices. Built-in `Quit` stops the loop; everything
    /// else is left to the embedding application.
    pub fn handle_notices(&mut self) {
        for envelope in self.host.notices.drain() {
            if envelope.downcast_ref::<Quit>().is_some() {
                self.running = false;
            }
        }
    }
}

// ===========================================================================
// Tests
// ===========================================================================
