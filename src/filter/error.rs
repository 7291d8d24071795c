/// A query that cannot be sent. Identifiers are checked before they are
/// placed in a URL path or query string.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum FilterError {
    #[error("Invalid table name {0:?}")]
    InvalidTableName(String),

    #[error("Invalid column name {0:?}")]
    InvalidColumn(String),

    #[error("{operator} {reason}")]
    InvalidOperatorData { operator: &'static str, reason: &'static str },

    #[error("Invalid limit {0}: must be non-negative")]
    InvalidLimit(i32),
}
