use crate::core::{Role, SplitName};

// ---------------------------------------------------------------------------
// Sub-error types
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PairError {
    #[error("{side} turns must be user then assistant, got {first} then {second}")]
    RoleOrder {
        side: &'static str,
        first: Role,
        second: Role,
    },
    #[error("chosen and rejected must share the same user prompt")]
    PromptMismatch,
    #[error("rejected answer must be empty")]
    RejectedNotEmpty,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum MapError {
    #[error("record {index}: expected at least 2 messages, found {found}")]
    TooFewMessages { index: usize, found: usize },
    #[error("record {index}: message {position} has role {found}, expected {expected}")]
    UnexpectedRole {
        index: usize,
        position: usize,
        expected: Role,
        found: Role,
    },
    #[error("record {index}: malformed record: {reason}")]
    Malformed { index: usize, reason: String },
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DatasetError {
    #[error("unknown dataset {name:?}, expected one of: {supported}")]
    UnknownDataset { name: String, supported: String },
}

#[derive(Debug, thiserror::Error)]
pub enum SourceError {
    #[error("failed to fetch {dataset} split {split}: {reason}")]
    Fetch {
        dataset: String,
        split: SplitName,
        reason: String,
    },
    #[error("failed to decode {dataset} split {split}: {reason}")]
    Decode {
        dataset: String,
        split: SplitName,
        reason: String,
    },
    #[error("dataset {dataset} has no files for split {split}")]
    MissingSplit { dataset: String, split: SplitName },
}

// ---------------------------------------------------------------------------
// Top-level error
// ---------------------------------------------------------------------------

#[derive(Debug, thiserror::Error)]
pub enum LoadError {
    #[error(transparent)]
    Source(#[from] SourceError),
    #[error(transparent)]
    Map(#[from] MapError),
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
