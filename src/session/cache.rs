use std::error::Error;
use std::fs;
use std::io::ErrorKind;
use std::path::{ Path, PathBuf };
use std::sync::Mutex;
use log::warn;

use crate::models::chat::ChatMessage;

/// Well-known key the transcript is stored under.
pub const CACHE_KEY: &str = "messages";

/// Device-local storage for the live transcript.
///
/// Reads are permissive: an absent or unreadable entry loads as an empty
/// transcript. Writes replace the whole entry.
pub trait TranscriptCache: Send + Sync {
    fn load(&self) -> Vec<ChatMessage>;
    fn save(&self, messages: &[ChatMessage]) -> Result<(), Box<dyn Error + Send + Sync>>;
    fn remove(&self) -> Result<(), Box<dyn Error + Send + Sync>>;
}

fn decode(raw: &str, origin: &str) -> Vec<ChatMessage> {
    match serde_json::from_str::<Vec<ChatMessage>>(raw) {
        Ok(messages) => messages,
        Err(e) => {
            warn!("Ignoring malformed transcript cache in {}: {}", origin, e);
            Vec::new()
        }
    }
}

/// JSON array in `<dir>/<key>.json`.
pub struct FileCache {
    path: PathBuf,
}

impl FileCache {
    pub fn new(dir: impl AsRef<Path>, key: &str) -> Self {
        Self { path: dir.as_ref().join(format!("{}.json", key)) }
    }

    pub fn in_dir(dir: impl AsRef<Path>) -> Self {
        Self::new(dir, CACHE_KEY)
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl TranscriptCache for FileCache {
    fn load(&self) -> Vec<ChatMessage> {
        match fs::read_to_string(&self.path) {
            Ok(raw) => decode(&raw, &self.path.display().to_string()),
            Err(e) if e.kind() == ErrorKind::NotFound => Vec::new(),
            Err(e) => {
                warn!("Failed to read transcript cache {}: {}", self.path.display(), e);
                Vec::new()
            }
        }
    }

    fn save(&self, messages: &[ChatMessage]) -> Result<(), Box<dyn Error + Send + Sync>> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(&self.path, serde_json::to_string(messages)?)?;
        Ok(())
    }

    fn remove(&self) -> Result<(), Box<dyn Error + Send + Sync>> {
        match fs::remove_file(&self.path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }
}

#[derive(Default)]
pub struct MemoryCache {
    entry: Mutex<Option<String>>,
}

impl MemoryCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_raw(raw: &str) -> Self {
        Self { entry: Mutex::new(Some(raw.to_string())) }
    }
}

impl TranscriptCache for MemoryCache {
    fn load(&self) -> Vec<ChatMessage> {
        match self.entry.lock() {
            Ok(entry) =>
                entry
                    .as_deref()
                    .map(|raw| decode(raw, "memory"))
                    .unwrap_or_default(),
            Err(_) => Vec::new(),
        }
    }

    fn save(&self, messages: &[ChatMessage]) -> Result<(), Box<dyn Error + Send + Sync>> {
        let raw = serde_json::to_string(messages)?;
        *self.entry.lock().map_err(|_| "transcript cache lock poisoned")? = Some(raw);
        Ok(())
    }

    fn remove(&self) -> Result<(), Box<dyn Error + Send + Sync>> {
        *self.entry.lock().map_err(|_| "transcript cache lock poisoned")? = None;
        Ok(())
    }
}
