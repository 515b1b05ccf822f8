//! Loading-indicator decorator.
//!
//! Long-running UI actions (import, export, backup, restore) wrap their
//! future in [`with_loading`] instead of patching ambient functions: the
//! indicator is shown before the operation and hidden after it settles,
//! success or failure.

use std::future::Future;

/// Collaborator that renders a busy indicator.
pub trait LoadingIndicator: Send + Sync {
    fn show(&self, message: &str);
    fn hide(&self);
}

/// Indicator that logs show/hide transitions.
#[derive(Debug, Default)]
pub struct TracingIndicator;

impl LoadingIndicator for TracingIndicator {
    fn show(&self, message: &str) {
        tracing::info!(message = %message, "Loading started");
    }

    fn hide(&self) {
        tracing::debug!("Loading finished");
    }
}

/// Run `op` with the indicator shown; hide it once the operation settles,
/// whatever the outcome.
pub async fn with_loading<T, E, F>(
    indicator: &dyn LoadingIndicator,
    message: &str,
    op: F,
) -> Result<T, E>
where
    F: Future<Output = Result<T, E>>,
{
    indicator.show(message);
    let result = op.await;
    indicator.hide();
    result
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[derive(Default)]
    struct RecordingIndicator {
        shown: AtomicUsize,
        hidden: AtomicUsize,
    }

    impl LoadingIndicator for RecordingIndicator {
        fn show(&self, _message: &str) {
            self.shown.fetch_add(1, Ordering::SeqCst);
        }

        fn hide(&self) {
            self.hidden.fetch_add(1, Ordering::SeqCst);
        }
    }

    #[tokio::test]
    async fn test_indicator_hidden_on_success() {
        let indicator = RecordingIndicator::default();
        let result: Result<i32, String> =
            with_loading(&indicator, "Importing data...", async { Ok(7) }).await;

        assert_eq!(result.unwrap(), 7);
        assert_eq!(indicator.shown.load(Ordering::SeqCst), 1);
        assert_eq!(indicator.hidden.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_indicator_hidden_on_failure() {
        let indicator = RecordingIndicator::default();
        let result: Result<(), String> = with_loading(&indicator, "Exporting data...", async {
            Err("export failed".to_string())
        })
        .await;

        assert!(result.is_err());
        assert_eq!(indicator.shown.load(Ordering::SeqCst), 1);
        assert_eq!(indicator.hidden.load(Ordering::SeqCst), 1);
    }
}
