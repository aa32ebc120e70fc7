//! Dialogue session states

/// Where a user currently is in the add-training flow.
///
/// Each state carries the answers collected so far, so a failed duration
/// parse keeps the date and kind without extra bookkeeping. Sessions live
/// only in memory; a restart drops everyone back to `Idle`.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum DialogueState {
    /// No add flow in progress; messages go to top-level routing
    #[default]
    Idle,
    /// Waiting for the training date
    AwaitingDate,
    /// Waiting for the training kind
    AwaitingKind { date: String },
    /// Waiting for the duration in minutes
    AwaitingDuration { date: String, kind: String },
}
