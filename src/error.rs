use std::path::PathBuf;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum Error {
    #[error("invalid variable name {key:?}: must start with a letter or underscore, followed by letters, digits or underscores")]
    InvalidKey { key: String },

    #[error("malformed line {line}: no '=' delimiter in {content:?}")]
    MalformedLine { line: usize, content: String },

    #[error("unclosed single quote on line {line}")]
    UnterminatedQuote { line: usize },

    #[error("file not found: {}", path.display())]
    FileNotFound { path: PathBuf },

    #[error("invalid UTF-8 at byte {offset}")]
    InvalidUtf8 { offset: usize },

    #[error("IO error: {0}")]
    Io(String),
}
