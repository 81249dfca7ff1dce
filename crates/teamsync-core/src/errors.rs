//! Error types for directory-to-team reconciliation

use thiserror::Error;

/// Result type for reconciliation operations
pub type Result<T> = std::result::Result<T, SyncError>;

/// Errors that can occur while resolving rules or reconciling teams
#[derive(Debug, Error)]
pub enum SyncError {
    /// A rule supplied an empty group pattern
    #[error("group pattern cannot be empty")]
    EmptyPattern,

    /// A rule supplied a group pattern that is not a valid regex
    #[error("invalid group pattern '{pattern}': {reason}")]
    InvalidPattern { pattern: String, reason: String },

    /// No directory group matched an exact-name selector
    #[error("directory group '{0}' not found")]
    GroupNotFound(String),

    /// The target team does not exist and the rule does not allow creation
    #[error("workspace team '{0}' not found")]
    TeamNotFound(String),

    /// A pattern rule with a fixed team name matched more than one group
    #[error("rule '{rule}' maps {count} matched groups onto team '{team}'")]
    DuplicateTeamTarget {
        rule: String,
        team: String,
        count: usize,
    },

    /// Every configured rule failed before any report could be produced
    #[error("all sync rules failed: {0} errors")]
    AllRulesFailed(usize),

    /// Error returned by the directory or workspace API
    #[error("API error: {0}")]
    Api(String),

    /// Invalid configuration
    #[error("invalid configuration: {0}")]
    Config(String),

    /// Serialization error
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl SyncError {
    /// Create a new API error
    pub fn api(msg: impl Into<String>) -> Self {
        SyncError::Api(msg.into())
    }

    /// Create a new configuration error
    pub fn config(msg: impl Into<String>) -> Self {
        SyncError::Config(msg.into())
    }
}
