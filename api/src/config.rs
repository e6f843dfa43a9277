use std::{io, path::PathBuf};

use crate::error::HistoryError;

pub const HISTORY_DIR_NAME: &str = "myapi";

/// History rows hydrated with metadata on the first listing.
pub const DEFAULT_PAGE_SIZE: usize = 20;

pub fn default_user_agent() -> String {
    format!("MyAPI/{}", env!("CARGO_PKG_VERSION"))
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Config {
    pub history_dir: PathBuf,
    pub page_size: usize,
    pub user_agent: String,
}

impl Config {
    pub fn new(history_dir: impl Into<PathBuf>) -> Self {
        Config {
            history_dir: history_dir.into(),
            page_size: DEFAULT_PAGE_SIZE,
            user_agent: default_user_agent(),
        }
    }

    /// `<user cache dir>/myapi`, resolved once at startup.
    pub fn from_user_cache() -> Result<Self, HistoryError> {
        let cache_dir = dirs::cache_dir().ok_or_else(|| HistoryError::Directory {
            path: PathBuf::from(HISTORY_DIR_NAME),
            source: io::Error::new(io::ErrorKind::NotFound, "no user cache directory"),
        })?;
        Ok(Config::new(cache_dir.join(HISTORY_DIR_NAME)))
    }

    pub fn with_page_size(mut self, page_size: usize) -> Self {
        self.page_size = page_size;
        self
    }
}
