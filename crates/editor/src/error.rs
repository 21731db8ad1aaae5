//! Error and warning types

/// A snapshot could not be used at all. Nothing in the scene was touched.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum SnapshotError {
    #[error("malformed scene data: {0}")]
    Malformed(String),
}

/// A snapshot was usable but something in it had to be substituted or
/// skipped
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum SnapshotWarning {
    #[error("'{entity}' has unknown geometry '{family}', loaded as a unit box")]
    UnknownGeometryFamily { entity: String, family: String },
    #[error("'{entity}' has unknown light type '{kind}', loaded as a point light")]
    UnknownLightKind { entity: String, kind: String },
    #[error("skipped {collection}[{index}]: {reason}")]
    SkippedRecord {
        collection: &'static str,
        index: usize,
        reason: String,
    },
    #[error("'{entity}' reused id {id}, assigned a fresh one")]
    DuplicateId { entity: String, id: String },
    #[error("ignored invalid '{field}': {reason}")]
    InvalidField { field: &'static str, reason: String },
}

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("storage I/O failed: {0}")]
    Io(#[from] std::io::Error),
    #[error("invalid stored data: {0}")]
    Json(#[from] serde_json::Error),
    #[error("project {0} not found")]
    NotFound(String),
    #[error("project name cannot be empty")]
    EmptyName,
}

#[derive(Debug, thiserror::Error)]
pub enum EditorError {
    /// The graphics collaborator failed to initialize; the session is read-only
    #[error("editor unavailable: {0}")]
    CollaboratorUnavailable(String),
    #[error("no entity with id {0}")]
    UnknownEntity(String),
    #[error("waiting for confirmation on {0}")]
    ConfirmationPending(String),
    #[error("nothing is selected")]
    NothingSelected,
    /// A NaN or infinite value reached an edit; nothing was recorded
    #[error("invalid number for {0}")]
    InvalidNumber(&'static str),
    #[error(transparent)]
    Snapshot(#[from] SnapshotError),
    #[error(transparent)]
    Store(#[from] StoreError),
}
