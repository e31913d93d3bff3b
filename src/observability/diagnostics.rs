//! Best-effort diagnostic hook
//!
//! Receives the original request parameters and the description of the
//! resulting query before execution. Delivery is fire-and-forget: the
//! request never waits on the callback and never sees its failures.

use std::fmt;
use std::panic::{self, AssertUnwindSafe};
use std::sync::Arc;
use std::thread;

type HookFn = dyn Fn(String) + Send + Sync;

/// Shared callback invoked off the request path.
#[derive(Clone)]
pub struct DiagnosticHook {
    callback: Arc<HookFn>,
}

impl DiagnosticHook {
    /// Wrap a callback.
    pub fn new<F>(callback: F) -> Self
    where
        F: Fn(String) + Send + Sync + 'static,
    {
        Self {
            callback: Arc::new(callback),
        }
    }

    /// Dispatch `message` without blocking the caller.
    ///
    /// Inside a tokio runtime the callback runs on the blocking pool,
    /// otherwise on a short-lived thread. Spawn failures and panics are dropped.
    pub fn emit(&self, message: String) {
        let callback = Arc::clone(&self.callback);
        let job = move || {
            let _ = panic::catch_unwind(AssertUnwindSafe(|| callback(message)));
        };

        match tokio::runtime::Handle::try_current() {
            Ok(handle) => {
                drop(handle.spawn_blocking(job));
            }
            Err(_) => {
                let _ = thread::Builder::new()
                    .name("datatables-diagnostics".to_string())
                    .spawn(job);
            }
        }
    }
}

impl fmt::Debug for DiagnosticHook {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DiagnosticHook").finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::mpsc;
    use std::time::Duration;

    #[test]
    fn test_emit_delivers_message() {
        let (tx, rx) = mpsc::channel();
        let tx = std::sync::Mutex::new(tx);
        let hook = DiagnosticHook::new(move |msg| {
            let _ = tx.lock().unwrap().send(msg);
        });

        hook.emit("hello".to_string());

        let received = rx.recv_timeout(Duration::from_secs(5)).unwrap();
        assert_eq!(received, "hello");
    }

    #[test]
    fn test_panicking_callback_does_not_reach_caller() {
        let hook = DiagnosticHook::new(|_| panic!("sink exploded"));
        hook.emit("ignored".to_string());
        // reaching this line is the assertion
    }

    #[tokio::test]
    async fn test_emit_inside_runtime_uses_blocking_pool() {
        let (tx, mut rx) = tokio::sync::mpsc::unbounded_channel();
        let hook = DiagnosticHook::new(move |msg| {
            let _ = tx.send(msg);
        });

        hook.emit("from runtime".to_string());

        let received = tokio::time::timeout(Duration::from_secs(5), rx.recv())
            .await
            .unwrap();
        assert_eq!(received.as_deref(), Some("from runtime"));
    }
}
