use cdmi_domain::operations::Operation;
use std::borrow::Cow;

/// A specialized [`StoreError`] enum of this crate.
#[cdmi_derive::cdmi_error]
pub enum StoreError {
    /// The object path carries no object name.
    #[error("Malformed request{}: {message}", format_context(.context))]
    MalformedRequest { message: Cow<'static, str>, context: Option<Cow<'static, str>> },

    /// The filesystem state contradicts the request (missing container, existing object,
    /// metadata without content).
    #[error("Conflict{}: {message}", format_context(.context))]
    Conflict { message: Cow<'static, str>, context: Option<Cow<'static, str>> },

    /// The operation is deliberately not implemented by this store.
    #[error("Unsupported operation{}: {message}", format_context(.context))]
    Unsupported { message: Cow<'static, str>, context: Option<Cow<'static, str>> },

    #[error("Path traversal security violation{}: {message}", format_context(.context))]
    PathTraversalAttempt { message: Cow<'static, str>, context: Option<Cow<'static, str>> },

    #[error("I/O failure{}: {source}", format_context(.context))]
    Io { source: std::io::Error, context: Option<Cow<'static, str>> },

    /// The sidecar metadata document could not be encoded or decoded.
    #[error("Metadata format error{}: {source}", format_context(.context))]
    Format { source: serde_json::Error, context: Option<Cow<'static, str>> },
}

impl StoreError {
    pub(crate) fn conflict(message: impl Into<Cow<'static, str>>) -> Self {
        Self::Conflict { message: message.into(), context: None }
    }

    pub(crate) fn unsupported(operation: Operation) -> Self {
        Self::Unsupported {
            message: operation.name().into(),
            context: Some("Not implemented by the filesystem object store".into()),
        }
    }
}
