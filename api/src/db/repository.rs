use std::{
  fs::{self, OpenOptions},
  io::{self, Write},
  path::{Path, PathBuf},
};

use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::{
  config::Config,
  domain::{
    history::{EntryMeta, HistoryEntry, HistoryListing},
    request::Request,
  },
  error::HistoryError,
  utilities::age::relative_age,
};

/// One JSON file per request, `<id>.json`, in a single directory.
///
/// The store keeps no state besides the directory path; every call goes to
/// the filesystem, so a listing taken after a save always sees that save.
#[derive(Clone, Debug)]
pub struct HistoryStore {
  dir: PathBuf,
  page_size: usize,
}

impl HistoryStore {
  /// Creates the history directory if it is missing.
  pub fn open(config: &Config) -> Result<Self, HistoryError> {
    let store = HistoryStore {
      dir: config.history_dir.clone(),
      page_size: config.page_size,
    };
    store.ensure_dir()?;
    log::debug!("history directory {}", store.dir.display());
    Ok(store)
  }

  pub fn dir(&self) -> &Path {
    &self.dir
  }

  pub fn page_size(&self) -> usize {
    self.page_size
  }

  fn path_for(&self, id: &str) -> Result<PathBuf, HistoryError> {
    if id.is_empty() || id.starts_with('.') || id.contains(['/', '\\']) {
      return Err(HistoryError::InvalidId(id.to_string()));
    }
    Ok(self.dir.join(format!("{id}.json")))
  }

  /// Writes the request and returns its id. A request without an id gets a
  /// fresh timestamp id; one with an id overwrites its file. The directory is
  /// re-created if it vanished since `open`.
  pub fn save(&self, request: &Request) -> Result<String, HistoryError> {
    self.ensure_dir()?;

    if let Some(id) = &request.id {
      let path = self.path_for(id)?;
      let json = encode(request, id)?;
      // readers only ever see the old file or the complete new one
      let tmp = path.with_extension("json.tmp");
      if let Err(e) = fs::write(&tmp, json).and_then(|_| fs::rename(&tmp, &path)) {
        let _ = fs::remove_file(&tmp);
        return Err(e.into());
      }
      log::info!("saved request {id}");
      return Ok(id.clone());
    }

    let seconds = Utc::now().timestamp();
    let mut candidate = seconds.to_string();
    loop {
      let json = encode(request, &candidate)?;
      let path = self.path_for(&candidate)?;
      match OpenOptions::new().write(true).create_new(true).open(&path) {
        Ok(mut file) => {
          if let Err(e) = file.write_all(&json) {
            drop(file);
            let _ = fs::remove_file(&path);
            return Err(e.into());
          }
          log::info!("saved request {candidate}");
          return Ok(candidate);
        }
        Err(e) if e.kind() == io::ErrorKind::AlreadyExists => {
          let suffix = Uuid::new_v4().simple().to_string();
          candidate = format!("{seconds}-{}", &suffix[..8]);
        }
        Err(e) => return Err(e.into()),
      }
    }
  }

  fn ensure_dir(&self) -> Result<(), HistoryError> {
    fs::create_dir_all(&self.dir).map_err(|source| HistoryError::Directory {
      path: self.dir.clone(),
      source,
    })
  }

  /// Every `*.json` file, most recently modified first, with the first
  /// page of entries hydrated.
  pub fn list(&self) -> Result<HistoryListing, HistoryError> {
    let dir_entries = match fs::read_dir(&self.dir) {
      Ok(entries) => entries,
      Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(HistoryListing::default()),
      Err(e) => return Err(e.into()),
    };

    let mut entries = Vec::new();
    for dir_entry in dir_entries {
      let dir_entry = match dir_entry {
        Ok(dir_entry) => dir_entry,
        Err(e) => {
          log::warn!("could not read history directory entry: {}", e);
          continue;
        }
      };
      let path = dir_entry.path();
      if path.extension().and_then(|ext| ext.to_str()) != Some("json") {
        continue;
      }
      let Some(id) = path.file_stem().and_then(|stem| stem.to_str()) else {
        continue;
      };
      let modified = match dir_entry.metadata() {
        Ok(metadata) if metadata.is_file() => metadata.modified()?,
        Ok(_) => continue,
        Err(e) => {
          log::warn!("could not stat history entry {}: {}", id, e);
          continue;
        }
      };
      entries.push(HistoryEntry {
        id: id.to_string(),
        modified,
        meta: None,
      });
    }

    // stable, so equal mtimes keep enumeration order
    entries.sort_by(|a, b| b.modified.cmp(&a.modified));

    let mut listing = HistoryListing::new(entries);
    listing.page(self, 0, self.page_size);
    Ok(listing)
  }

  /// URL, method and relative age of one entry.
  pub fn load_metadata(&self, id: &str) -> Result<EntryMeta, HistoryError> {
    let path = self.path_for(id)?;
    let request = self.read(id, &path)?;
    let modified = fs::metadata(&path).and_then(|metadata| metadata.modified())?;
    let age = Utc::now().signed_duration_since(DateTime::<Utc>::from(modified));
    Ok(EntryMeta {
      request_url: request.url,
      method: request.method,
      age: relative_age(age),
    })
  }

  pub fn load(&self, id: &str) -> Result<Request, HistoryError> {
    let path = self.path_for(id)?;
    self.read(id, &path)
  }

  pub fn delete(&self, id: &str) -> Result<(), HistoryError> {
    let path = self.path_for(id)?;
    fs::remove_file(&path).map_err(|e| match e.kind() {
      io::ErrorKind::NotFound => HistoryError::NotFound(id.to_string()),
      _ => HistoryError::Io(e),
    })?;
    log::info!("deleted request {id}");
    Ok(())
  }

  /// Copies an entry under a fresh id, leaving the source untouched.
  pub fn clone_entry(&self, id: &str) -> Result<String, HistoryError> {
    let mut request = self.load(id)?;
    request.id = None;
    let new_id = self.save(&request)?;
    log::info!("cloned request {id} as {new_id}");
    Ok(new_id)
  }

  fn read(&self, id: &str, path: &Path) -> Result<Request, HistoryError> {
    let bytes = fs::read(path).map_err(|e| match e.kind() {
      io::ErrorKind::NotFound => HistoryError::NotFound(id.to_string()),
      _ => HistoryError::Io(e),
    })?;
    let mut request: Request =
      serde_json::from_slice(&bytes).map_err(|source| HistoryError::Decode {
        id: id.to_string(),
        source,
      })?;
    // the file name is authoritative
    request.id = Some(id.to_string());
    Ok(request)
  }
}

fn encode(request: &Request, id: &str) -> Result<Vec<u8>, HistoryError> {
  let mut snapshot = request.clone();
  snapshot.id = Some(id.to_string());
  serde_json::to_vec(&snapshot).map_err(HistoryError::Encode)
}
