//! Trailing-edge debouncer backed by a worker thread.
//!
//! The worker exclusively owns the pending slot: at most one value and one
//! deadline. Each submission replaces the pending value and restarts the
//! window, so a burst of submissions produces a single write of the last
//! value.

use std::sync::mpsc::{self, Receiver, RecvTimeoutError, Sender};
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};
use tracing::{debug, warn};

/// Default debounce window for position writes.
pub const DEFAULT_WINDOW: Duration = Duration::from_millis(200);

enum Command<T> {
    Submit(T),
    Flush(Sender<()>),
    Shutdown,
}

/// Collapses bursts of values into one deferred call of the sink.
///
/// Dropping the writer writes any pending value before the worker exits.
pub struct DebouncedWriter<T: Send + 'static> {
    sender: Sender<Command<T>>,
    worker: Option<JoinHandle<()>>,
    window: Duration,
}

impl<T: Send + 'static> DebouncedWriter<T> {
    /// Start the worker thread.
    ///
    /// `sink` runs on the worker thread, once per settled burst.
    ///
    /// # Errors
    ///
    /// Returns the OS error if the thread cannot be spawned.
    pub fn spawn<F>(window: Duration, sink: F) -> std::io::Result<Self>
    where
        F: FnMut(T) + Send + 'static,
    {
        let (sender, receiver) = mpsc::channel();
        let worker = thread::Builder::new()
            .name("position-writer".to_string())
            .spawn(move || run_worker(receiver, window, sink))?;
        Ok(Self {
            sender,
            worker: Some(worker),
            window,
        })
    }

    /// Replace the pending value and restart the window.
    pub fn submit(&self, value: T) {
        self.send(Command::Submit(value));
    }

    /// Write the pending value now and wait until the sink has run.
    pub fn flush(&self) {
        let (ack, done) = mpsc::channel();
        if self.send(Command::Flush(ack)) {
            let _ = done.recv();
        }
    }

    /// Configured window.
    pub fn window(&self) -> Duration {
        self.window
    }

    fn send(&self, command: Command<T>) -> bool {
        let sent = self.sender.send(command).is_ok();
        if !sent {
            warn!("Position writer is gone; dropping update");
        }
        sent
    }
}

impl<T: Send + 'static> Drop for DebouncedWriter<T> {
    fn drop(&mut self) {
        self.send(Command::Shutdown);
        if let Some(worker) = self.worker.take() {
            if worker.join().is_err() {
                warn!("Position writer thread panicked");
            }
        }
    }
}

impl<T: Send + 'static> std::fmt::Debug for DebouncedWriter<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DebouncedWriter")
            .field("window", &self.window)
            .finish_non_exhaustive()
    }
}

fn run_worker<T, F>(receiver: Receiver<Command<T>>, window: Duration, mut sink: F)
where
    F: FnMut(T),
{
    let mut pending: Option<(T, Instant)> = None;

    loop {
        let deadline = pending.as_ref().map(|(_, deadline)| *deadline);
        let command = match deadline {
            Some(deadline) => {
                let wait = deadline.saturating_duration_since(Instant::now());
                match receiver.recv_timeout(wait) {
                    Ok(command) => command,
                    Err(RecvTimeoutError::Timeout) => {
                        if let Some((value, _)) = pending.take() {
                            sink(value);
                        }
                        continue;
                    }
                    Err(RecvTimeoutError::Disconnected) => Command::Shutdown,
                }
            }
            None => match receiver.recv() {
                Ok(command) => command,
                Err(_) => Command::Shutdown,
            },
        };

        match command {
            Command::Submit(value) => {
                if pending.is_some() {
                    debug!("Superseding pending position write");
                }
                pending = Some((value, Instant::now() + window));
            }
            Command::Flush(ack) => {
                if let Some((value, _)) = pending.take() {
                    sink(value);
                }
                let _ = ack.send(());
            }
            Command::Shutdown => {
                if let Some((value, _)) = pending.take() {
                    sink(value);
                }
                return;
            }
        }
    }
}
