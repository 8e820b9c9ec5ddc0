use model::repository::RepositoryError;
use model::transaction::RuleShapeError;
use thiserror::Error;
use tracing::error;

/// Error types for the compute module
#[derive(Error, Debug)]
pub enum ComputeError {
    /// A recurring rule reached the evaluator in a shape it cannot interpret.
    #[error("Invalid recurring rule {}: {reason}", describe_rule(.rule))]
    InvalidRule {
        /// Storage id of the rule, if it has one.
        rule: Option<i32>,
        reason: RuleShapeError,
    },

    /// Error from reading the owner-scoped snapshot
    #[error("Repository error: {0}")]
    Repository(#[from] RepositoryError),

    /// Error from date operations
    #[error("Date error: {0}")]
    Date(String),
}

fn describe_rule(rule: &Option<i32>) -> String {
    match rule {
        Some(id) => format!("#{}", id),
        None => "<unsaved>".to_string(),
    }
}

impl ComputeError {
    pub(crate) fn invalid_rule(rule: Option<i32>, reason: RuleShapeError) -> Self {
        let err = ComputeError::InvalidRule { rule, reason };
        error!(?err, "Rejecting recurring rule");
        err
    }
}

/// Type alias for Result with ComputeError
pub type Result<T> = std::result::Result<T, ComputeError>;
