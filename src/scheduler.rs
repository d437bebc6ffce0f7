//! Fixed-tick scheduler for the motion loop.
//!
//! The step function always receives the configured tick period as `dt`,
//! not the measured wall-clock delta. A slow tick therefore simulates less
//! motion than real time elapsed; the sleep only compensates for the time
//! spent inside the step.

use std::any::Any;
use std::io;
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};

use crossbeam_channel::{Receiver, RecvTimeoutError, Sender};

use crate::error::InterceptError;

/// Starts the thread backing a tick loop.
pub trait Spawn: Send + Sync {
    fn spawn(
        &self,
        name: &str,
        body: Box<dyn FnOnce() + Send + 'static>,
    ) -> io::Result<JoinHandle<()>>;
}

/// Spawns named OS threads.
#[derive(Debug, Default, Clone, Copy)]
pub struct ThreadSpawner;

impl Spawn for ThreadSpawner {
    fn spawn(
        &self,
        name: &str,
        body: Box<dyn FnOnce() + Send + 'static>,
    ) -> io::Result<JoinHandle<()>> {
        thread::Builder::new().name(name.to_string()).spawn(body)
    }
}

#[derive(Clone)]
pub struct TickScheduler {
    period: Duration,
    spawner: Arc<dyn Spawn>,
}

impl TickScheduler {
    pub fn new(period: Duration) -> Self {
        Self {
            period,
            spawner: Arc::new(ThreadSpawner),
        }
    }

    pub fn with_spawner(mut self, spawner: Arc<dyn Spawn>) -> Self {
        self.spawner = spawner;
        self
    }

    pub fn period(&self) -> Duration {
        self.period
    }

    /// Simulation step handed to every tick, in seconds.
    pub fn dt(&self) -> f32 {
        self.period.as_secs_f32()
    }

    /// Runs `step` every period on a new thread until the handle is stopped.
    pub fn start<F>(&self, name: &str, mut step: F) -> io::Result<TickHandle>
    where
        F: FnMut(f32) + Send + 'static,
    {
        let (cancel_tx, cancel_rx) = crossbeam_channel::bounded(1);
        let period = self.period;
        let dt = self.dt();

        let thread = self.spawner.spawn(
            name,
            Box::new(move || run_ticks(period, dt, &cancel_rx, &mut step)),
        )?;

        Ok(TickHandle {
            cancel: cancel_tx,
            thread,
        })
    }
}

fn run_ticks<F: FnMut(f32)>(period: Duration, dt: f32, cancel: &Receiver<()>, step: &mut F) {
    loop {
        let start = Instant::now();
        step(dt);
        let remaining = period.saturating_sub(start.elapsed());

        // Sleeping on the cancel channel bounds teardown latency to one tick.
        match cancel.recv_timeout(remaining) {
            Err(RecvTimeoutError::Timeout) => continue,
            Ok(()) | Err(RecvTimeoutError::Disconnected) => break,
        }
    }
}

/// Owned handle to a running tick loop.
#[derive(Debug)]
pub struct TickHandle {
    cancel: Sender<()>,
    thread: JoinHandle<()>,
}

impl TickHandle {
    pub fn is_finished(&self) -> bool {
        self.thread.is_finished()
    }

    /// Requests cancellation and blocks until the loop thread has exited.
    pub fn stop(self) -> Result<(), InterceptError> {
        // A full or disconnected channel means the loop is already leaving.
        let _ = self.cancel.try_send(());
        self.thread
            .join()
            .map_err(|payload| InterceptError::TaskTeardown(panic_message(payload.as_ref())))
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(msg) = payload.downcast_ref::<&str>() {
        format!("motion loop panicked: {}", msg)
    } else if let Some(msg) = payload.downcast_ref::<String>() {
        format!("motion loop panicked: {}", msg)
    } else {
        "motion loop panicked".to_string()
    }
}
