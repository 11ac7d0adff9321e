use std::future::Future;
use std::time::Duration;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio::time::sleep;
use tracing::debug;

#[derive(Debug)]
enum Signal {
    Trigger,
    Cancel,
}

enum Window {
    Elapsed,
    Restart,
    Cancelled,
    Closed,
}

/// Trailing-edge debouncer: a burst of triggers runs the action once, after
/// the window has passed without a new trigger.
pub struct Debouncer {
    sender: mpsc::UnboundedSender<Signal>,
    handle: JoinHandle<()>,
}

impl Debouncer {
    /// Spawn the debouncing task on the current tokio runtime.
    pub fn spawn<F, Fut>(window: Duration, mut action: F) -> Self
    where
        F: FnMut() -> Fut + Send + 'static,
        Fut: Future<Output = ()> + Send + 'static,
    {
        let (sender, mut receiver) = mpsc::unbounded_channel();

        let handle = tokio::spawn(async move {
            while let Some(signal) = receiver.recv().await {
                if let Signal::Cancel = signal {
                    continue;
                }

                let fire = loop {
                    let window_end = tokio::select! {
                        _ = sleep(window) => Window::Elapsed,
                        next = receiver.recv() => match next {
                            Some(Signal::Trigger) => Window::Restart,
                            Some(Signal::Cancel) => Window::Cancelled,
                            None => Window::Closed,
                        },
                    };

                    match window_end {
                        Window::Elapsed => break true,
                        Window::Restart => continue,
                        Window::Cancelled => break false,
                        Window::Closed => return,
                    }
                };

                if fire {
                    debug!("Debounce window of {:?} elapsed, running action", window);
                    action().await;
                } else {
                    debug!("Pending debounced action cancelled");
                }
            }
        });

        Self { sender, handle }
    }

    pub fn trigger(&self) {
        // Only fails once the task is gone, and then there is nothing to run.
        let _ = self.sender.send(Signal::Trigger);
    }

    /// Drop a pending action, if any. An action already running is unaffected.
    pub fn cancel(&self) {
        let _ = self.sender.send(Signal::Cancel);
    }
}

impl Drop for Debouncer {
    fn drop(&mut self) {
        self.handle.abort();
    }
}
