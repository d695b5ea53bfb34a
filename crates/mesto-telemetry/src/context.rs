//! Trace identifiers scoped to one CLI command.
//!
//! # Design
//! - The identifier lives in task-local storage so the HTTP client can stamp
//!   every request without threading it through the state machine.

use std::future::Future;
use std::sync::Arc;

use tracing::Instrument;

tokio::task_local! {
    static TRACE_ID: Arc<str>;
}

/// Run `fut` with `trace_id` available to [`current_trace_id`] and recorded
/// on a `command` span.
pub async fn with_trace_context<Fut, T>(
    trace_id: impl Into<String>,
    command: &str,
    fut: Fut,
) -> T
where
    Fut: Future<Output = T>,
{
    let trace_id: Arc<str> = Arc::from(trace_id.into());
    let span = tracing::info_span!("command", name = %command, trace_id = %trace_id);
    TRACE_ID.scope(trace_id, fut.instrument(span)).await
}

/// Trace identifier of the enclosing command, if any.
#[must_use]
pub fn current_trace_id() -> Option<String> {
    TRACE_ID.try_with(ToString::to_string).ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn trace_id_is_scoped_to_the_future() {
        assert!(current_trace_id().is_none());
        let seen = with_trace_context("trace-42", "cards ls", async { current_trace_id() }).await;
        assert_eq!(seen.as_deref(), Some("trace-42"));
        assert!(current_trace_id().is_none());
    }
}
