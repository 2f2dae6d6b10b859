//! Types d'erreurs pour pmolibrary

/// Erreurs de la bibliothèque musicale
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Invalid music UID: {0}")]
    InvalidUid(String),

    #[error("Unknown music kind: {0}")]
    UnknownKind(String),

    #[error("UID {uid} does not designate a {expected}")]
    KindMismatch { uid: String, expected: &'static str },

    #[error("Duplicate UID in snapshot: {0}")]
    DuplicateUid(String),

    #[error("Dangling reference to {0}")]
    DanglingReference(String),

    #[error("Snapshot I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Snapshot decoding error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Type Result spécialisé pour pmolibrary
pub type Result<T> = std::result::Result<T, Error>;
