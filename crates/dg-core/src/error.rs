//! Error taxonomy shared by every diagram crate.

/// Broad classification of an [`Error`], used by the UI layer to decide how
/// a failure is reported.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// An operation referenced a node or edge id that does not exist.
    Reference,
    /// User-supplied input was rejected (empty title, unknown document, bad color).
    Validation,
    /// The key-value backend failed.
    Storage,
}

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("unknown node id: {id}")]
    MissingNode { id: String },

    #[error("unknown edge id: {id}")]
    MissingEdge { id: String },

    #[error("duplicate id in snapshot: {id}")]
    DuplicateId { id: String },

    #[error("a title is required to save a diagram")]
    EmptyTitle,

    #[error("no saved diagram selected")]
    NoTitleSelected,

    #[error("no saved diagram named {title:?}")]
    DocumentNotFound { title: String },

    #[error("invalid color {value:?}; expected #RGB or #RRGGBB")]
    InvalidColor { value: String },

    #[error("unknown shape {name:?}; expected circle, square, or rectangle")]
    UnknownShape { name: String },

    #[error("malformed edit: {0}")]
    MalformedEdit(String),

    #[error("malformed snapshot: {0}")]
    MalformedSnapshot(#[from] serde_json::Error),

    #[error("storage backend failed: {0}")]
    Store(String),
}

impl Error {
    pub fn missing_node(id: impl ToString) -> Self {
        Self::MissingNode { id: id.to_string() }
    }

    pub fn missing_edge(id: impl ToString) -> Self {
        Self::MissingEdge { id: id.to_string() }
    }

    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::MissingNode { .. } | Self::MissingEdge { .. } | Self::DuplicateId { .. } => {
                ErrorKind::Reference
            }
            Self::EmptyTitle
            | Self::NoTitleSelected
            | Self::DocumentNotFound { .. }
            | Self::InvalidColor { .. }
            | Self::UnknownShape { .. }
            | Self::MalformedEdit(_)
            | Self::MalformedSnapshot(_) => ErrorKind::Validation,
            Self::Store(_) => ErrorKind::Storage,
        }
    }
}

pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn kinds_follow_taxonomy() {
        assert_eq!(Error::missing_node("node_1").kind(), ErrorKind::Reference);
        assert_eq!(Error::EmptyTitle.kind(), ErrorKind::Validation);
        assert_eq!(Error::Store("quota".into()).kind(), ErrorKind::Storage);
    }

    #[test]
    fn messages_name_the_offending_id() {
        let err = Error::missing_edge("connection_7");
        assert_eq!(err.to_string(), "unknown edge id: connection_7");
    }
}
