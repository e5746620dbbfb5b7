use uuid::Uuid;

/// Outbound hook for collaborators newly granted access to a task.
///
/// Delivery (mail, invitations) happens outside this crate.
#[cfg_attr(test, mockall::automock)]
pub trait ShareNotifier: Send + Sync {
    fn notify(&self, task_id: Uuid, title: &str, collaborators: &[String]);
}

/// Records share events in the log only.
#[derive(Debug, Clone, Copy, Default)]
pub struct LogNotifier;

impl ShareNotifier for LogNotifier {
    fn notify(&self, task_id: Uuid, title: &str, collaborators: &[String]) {
        tracing::info!(
            task_id = %task_id,
            title,
            collaborators = ?collaborators,
            "Task shared with new collaborators"
        );
    }
}
