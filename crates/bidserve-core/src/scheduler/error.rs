//! Scheduler control errors.

#[derive(Debug, thiserror::Error)]
pub enum SchedulerError {
    /// Workers are tokio tasks; `start` needs a runtime to spawn them on.
    #[error("scheduler start requires a running tokio runtime")]
    NoRuntime,
}
