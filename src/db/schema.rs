//! Database schema and row types

/// SQL schema for initialization
pub const SCHEMA: &str = r#"
CREATE TABLE IF NOT EXISTS trainings (
    user_id INTEGER,
    date TEXT,
    type TEXT,
    duration INTEGER
);
"#;

/// One logged workout session
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Training {
    pub user_id: i64,
    /// Date exactly as the user typed it; not validated as a calendar date
    pub date: String,
    /// Free-form activity label, stored in the `type` column
    pub kind: String,
    /// Duration in minutes
    pub duration: i64,
}

/// Aggregate totals for one user
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct TrainingStats {
    /// Number of logged sessions
    pub sessions: i64,
    /// Sum of all durations in minutes
    pub total_minutes: i64,
    /// Session count per activity label
    pub by_kind: Vec<(String, i64)>,
}
