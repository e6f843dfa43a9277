use std::{fmt, io, path::PathBuf};

/// Failures of the file-backed history store.
#[derive(Debug)]
pub enum HistoryError {
    /// The history directory is missing and could not be created, or the
    /// platform exposes no user-cache location at all.
    Directory { path: PathBuf, source: io::Error },

    /// No `<id>.json` exists in the history directory.
    NotFound(String),

    /// The file exists but is not a request document.
    Decode { id: String, source: serde_json::Error },

    /// The request could not be serialized; nothing was written.
    Encode(serde_json::Error),

    /// The id cannot name a file inside the history directory.
    InvalidId(String),

    Io(io::Error),
}

impl fmt::Display for HistoryError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            HistoryError::Directory { path, source } => {
                write!(f, "history directory {} is unusable: {source}", path.display())
            }
            HistoryError::NotFound(id) => write!(f, "history entry {id} not found"),
            HistoryError::Decode { id, source } => {
                write!(f, "history entry {id} is not a valid request: {source}")
            }
            HistoryError::Encode(source) => write!(f, "could not encode request: {source}"),
            HistoryError::InvalidId(id) => write!(f, "invalid history id {id:?}"),
            HistoryError::Io(source) => write!(f, "history i/o failed: {source}"),
        }
    }
}

impl std::error::Error for HistoryError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            HistoryError::Directory { source, .. } => Some(source),
            HistoryError::Decode { source, .. } => Some(source),
            HistoryError::Encode(source) => Some(source),
            HistoryError::Io(source) => Some(source),
            HistoryError::NotFound(_) | HistoryError::InvalidId(_) => None,
        }
    }
}

impl From<io::Error> for HistoryError {
    fn from(value: io::Error) -> Self {
        HistoryError::Io(value)
    }
}

/// Failures of a single send.
#[derive(Debug)]
pub enum ExecuteError {
    /// The request could not be put on the wire (bad URL, header name or value).
    InvalidRequest(String),

    /// DNS, connect, TLS or body-read failure reported by the HTTP client.
    Transport(reqwest::Error),

    /// The caller aborted the send. Not a failure: show nothing, save nothing.
    Canceled,

    /// The call succeeded but recording it in history did not.
    History(HistoryError),
}

impl ExecuteError {
    pub fn is_canceled(&self) -> bool {
        matches!(self, ExecuteError::Canceled)
    }
}

impl fmt::Display for ExecuteError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ExecuteError::InvalidRequest(msg) => write!(f, "invalid request: {msg}"),
            ExecuteError::Transport(source) => write!(f, "request failed: {source}"),
            ExecuteError::Canceled => write!(f, "request canceled"),
            ExecuteError::History(source) => write!(f, "could not record request: {source}"),
        }
    }
}

impl std::error::Error for ExecuteError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ExecuteError::Transport(source) => Some(source),
            ExecuteError::History(source) => Some(source),
            ExecuteError::InvalidRequest(_) | ExecuteError::Canceled => None,
        }
    }
}

impl From<reqwest::Error> for ExecuteError {
    fn from(value: reqwest::Error) -> Self {
        ExecuteError::Transport(value)
    }
}

impl From<HistoryError> for ExecuteError {
    fn from(value: HistoryError) -> Self {
        ExecuteError::History(value)
    }
}
