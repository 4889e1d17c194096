//! Presenting a shared canvas
//!
//! At most one present runs at a time. [`Presenter::show`] refuses while
//! another present is in flight; [`Presenter::show_throttled`] spaces frames
//! by a minimum interval and folds requests that arrive meanwhile into one
//! deferred frame.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use dotmatrix_paint::Rect;
use tracing::debug;

use crate::canvas::Canvas;
use crate::config::CanvasConfig;
use crate::display::Display;
use crate::error::Result;

/// What a present request did
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PresentOutcome {
    /// The frame reached the display
    Presented,
    /// Another present was in flight; nothing was done
    Busy,
    /// Folded into the deferred frame of an in-flight throttled present
    Deferred,
}

/// Presenter settings
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PresenterConfig {
    pub min_frame_interval: Duration,
}

impl Default for PresenterConfig {
    fn default() -> Self {
        Self {
            min_frame_interval: Duration::from_millis(16),
        }
    }
}

impl From<&CanvasConfig> for PresenterConfig {
    fn from(config: &CanvasConfig) -> Self {
        Self {
            min_frame_interval: config.min_frame_interval(),
        }
    }
}

#[derive(Debug, Default)]
struct Throttle {
    in_flight: bool,
    pending: bool,
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

/// Resets the throttle if the frame loop ends without finishing normally
struct ThrottleGuard {
    throttle: Arc<Mutex<Throttle>>,
    armed: bool,
}

impl ThrottleGuard {
    /// Mark the loop finished; returns true if a deferred frame is owed
    fn settle(&mut self) -> bool {
        let mut throttle = lock(&self.throttle);
        if throttle.pending {
            throttle.pending = false;
            return true;
        }
        throttle.in_flight = false;
        self.armed = false;
        false
    }
}

impl Drop for ThrottleGuard {
    fn drop(&mut self) {
        if self.armed {
            let mut throttle = lock(&self.throttle);
            throttle.in_flight = false;
            throttle.pending = false;
        }
    }
}

/// Shared handle that presents a [`Canvas`]
pub struct Presenter<D: Display> {
    canvas: Arc<Mutex<Canvas<D>>>,
    busy: Arc<Mutex<bool>>,
    throttle: Arc<Mutex<Throttle>>,
    min_frame_interval: Duration,
}

impl<D: Display> Clone for Presenter<D> {
    fn clone(&self) -> Self {
        Self {
            canvas: Arc::clone(&self.canvas),
            busy: Arc::clone(&self.busy),
            throttle: Arc::clone(&self.throttle),
            min_frame_interval: self.min_frame_interval,
        }
    }
}

impl<D: Display> Presenter<D> {
    pub fn new(canvas: Canvas<D>, config: PresenterConfig) -> Self {
        Self {
            canvas: Arc::new(Mutex::new(canvas)),
            busy: Arc::new(Mutex::new(false)),
            throttle: Arc::new(Mutex::new(Throttle::default())),
            min_frame_interval: config.min_frame_interval,
        }
    }

    /// The shared canvas
    pub fn canvas(&self) -> Arc<Mutex<Canvas<D>>> {
        Arc::clone(&self.canvas)
    }

    /// Run `f` with exclusive access to the canvas
    pub fn with_canvas<R>(&self, f: impl FnOnce(&mut Canvas<D>) -> R) -> R {
        let mut canvas = lock(&self.canvas);
        f(&mut canvas)
    }

    pub fn is_busy(&self) -> bool {
        *lock(&self.busy)
    }

    pub fn min_frame_interval(&self) -> Duration {
        self.min_frame_interval
    }

    /// Present the whole canvas unless a present is already running
    pub fn show(&self) -> Result<PresentOutcome> {
        self.present(None)
    }

    /// Present part of the canvas unless a present is already running
    pub fn show_region(&self, region: Rect) -> Result<PresentOutcome> {
        self.present(Some(region))
    }

    fn present(&self, region: Option<Rect>) -> Result<PresentOutcome> {
        {
            let mut busy = lock(&self.busy);
            if *busy {
                debug!("present skipped, display busy");
                return Ok(PresentOutcome::Busy);
            }
            *busy = true;
        }

        let result = {
            let mut canvas = lock(&self.canvas);
            match region {
                Some(region) => canvas.show_region(region),
                None => canvas.show(),
            }
        };

        *lock(&self.busy) = false;
        result?;
        debug!(?region, "presented");
        Ok(PresentOutcome::Presented)
    }

    /// Present at most once per `min_frame_interval`
    ///
    /// The first caller presents right away. The wait and any deferred
    /// frame then run on a spawned task, so dropping the returned future
    /// does not stall later requests. Requests arriving before the interval
    /// has passed return [`PresentOutcome::Deferred`] at once and cause
    /// exactly one more frame after the wait. A present refused as busy is
    /// retried the same way.
    pub async fn show_throttled(&self) -> Result<PresentOutcome>
    where
        D: Send + 'static,
    {
        {
            let mut throttle = lock(&self.throttle);
            if throttle.in_flight {
                throttle.pending = true;
                return Ok(PresentOutcome::Deferred);
            }
            throttle.in_flight = true;
        }
        let guard = ThrottleGuard {
            throttle: Arc::clone(&self.throttle),
            armed: true,
        };
        self.present_throttled()?;

        let presenter = self.clone();
        tokio::spawn(async move { presenter.frame_loop(guard).await }).await?
    }

    async fn frame_loop(&self, mut guard: ThrottleGuard) -> Result<PresentOutcome> {
        loop {
            tokio::time::sleep(self.min_frame_interval).await;
            if !guard.settle() {
                return Ok(PresentOutcome::Presented);
            }
            debug!("presenting deferred frame");
            self.present_throttled()?;
        }
    }

    fn present_throttled(&self) -> Result<()> {
        if self.present(None)? == PresentOutcome::Busy {
            lock(&self.throttle).pending = true;
        }
        Ok(())
    }
}
