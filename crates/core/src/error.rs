/// Failure of a top-level parse.
///
/// Rules only ever report "did not match here"; the entry points turn that
/// into this error together with the offset where matching stopped. Mapping
/// the offset to a line and column is left to the caller.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ParseError {
    #[error("{path}: no rule matched at byte offset {position}")]
    NoMatch { path: String, position: usize },
}

impl ParseError {
    pub fn no_match(path: &str, position: usize) -> Self {
        ParseError::NoMatch {
            path: path.to_owned(),
            position,
        }
    }

    pub fn path(&self) -> &str {
        match self {
            ParseError::NoMatch { path, .. } => path,
        }
    }

    /// Byte offset into the source where matching stopped.
    pub fn position(&self) -> usize {
        match self {
            ParseError::NoMatch { position, .. } => *position,
        }
    }
}
