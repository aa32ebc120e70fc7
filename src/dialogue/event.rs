//! Events that drive the dialogue

/// One classified inbound message, as the state machine sees it
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Event {
    /// The add action was picked from the menu; enter the flow
    StartAdd,
    /// Plain text while the flow is active. Consumed as the awaited
    /// answer, menu labels and slash commands included.
    Text(String),
    /// The explicit cancel command
    Cancel,
}
