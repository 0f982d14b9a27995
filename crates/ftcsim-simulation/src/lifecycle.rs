//! Cooperative cancellation and named worker threads.

use std::sync::Arc;
use std::thread::{self, JoinHandle};

use parking_lot::RwLock;
use tracing::{debug, error};

use crate::error::SimulationError;

/// Cancellation token polled by a loop once per iteration.
///
/// Each run gets a fresh token, so a signal meant for one run never leaks into
/// the next.
#[derive(Debug, Clone, Default)]
pub struct StopToken {
    stopped: Arc<RwLock<bool>>,
}

impl StopToken {
    /// A token that has not been stopped.
    pub fn new() -> Self {
        Self::default()
    }

    /// Raise the signal. Waits for any [`StopToken::unless_stopped`] body in
    /// flight, so none starts or finishes after this returns.
    pub fn stop(&self) {
        *self.stopped.write() = true;
    }

    /// Whether the signal has been raised.
    pub fn is_stopped(&self) -> bool {
        *self.stopped.read()
    }

    /// Run `f` only if the token has not been stopped, holding the signal off
    /// while it runs.
    pub fn unless_stopped<R>(&self, f: impl FnOnce() -> R) -> Option<R> {
        let stopped = self.stopped.read();
        if *stopped { None } else { Some(f()) }
    }
}

/// A named thread running a loop until its token is stopped.
///
/// `T` is whatever the loop hands back when it exits.
#[derive(Debug)]
pub struct Worker<T = ()> {
    name: String,
    token: StopToken,
    handle: JoinHandle<T>,
}

impl<T: Send + 'static> Worker<T> {
    /// Spawn `body` on a new thread named `name`, handing it the stop token.
    pub fn spawn<F>(name: impl Into<String>, body: F) -> Result<Self, SimulationError>
    where
        F: FnOnce(StopToken) -> T + Send + 'static,
    {
        let name = name.into();
        let token = StopToken::new();
        let handle = thread::Builder::new()
            .name(name.clone())
            .spawn({
                let token = token.clone();
                move || body(token)
            })
            .map_err(|source| SimulationError::Spawn {
                name: name.clone(),
                source,
            })?;
        debug!(worker = %name, "Worker spawned.");
        Ok(Worker {
            name,
            token,
            handle,
        })
    }

    /// Thread name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Raise the stop signal without waiting.
    pub fn signal(&self) {
        self.token.stop();
    }

    /// Signal and wait for the loop to exit. Returns its result, or `None`
    /// if the thread panicked.
    pub fn stop(self) -> Option<T> {
        self.token.stop();
        match self.handle.join() {
            Ok(result) => {
                debug!(worker = %self.name, "Worker joined.");
                Some(result)
            }
            Err(_) => {
                error!(worker = %self.name, "Worker thread panicked.");
                None
            }
        }
    }
}
