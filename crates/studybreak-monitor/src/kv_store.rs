use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;
use std::collections::HashMap;
use std::fs::{self, OpenOptions};
use std::io::{self, Write};
use std::path::{Path, PathBuf};

/// Directory under `$HOME` holding client state
pub const STATE_DIR: &str = ".studybreak";

/// Integer session goal in minutes
pub const SESSION_GOAL_KEY: &str = "session_goal";

/// `granted`, `denied` or `default`
pub const NOTIFICATION_PERMISSION_KEY: &str = "notification_permission";

const STATE_FILE: &str = "ui-state.json";

/// Small JSON key/value file for durable client state
#[derive(Debug, Clone)]
pub struct KvStore {
    path: PathBuf,
    data: HashMap<String, Value>,
}

impl KvStore {
    /// Open `~/.studybreak/ui-state.json`
    pub fn open_default() -> Self {
        let mut dir = dirs::home_dir().unwrap_or_else(|| PathBuf::from("."));
        dir.push(STATE_DIR);
        Self::open_in(&dir)
    }

    /// Open `ui-state.json` inside `dir`
    pub fn open_in(dir: &Path) -> Self {
        Self::open(dir.join(STATE_FILE))
    }

    /// Open a state file. A missing or unreadable file starts empty.
    pub fn open(path: PathBuf) -> Self {
        let data = match fs::read_to_string(&path) {
            Ok(content) => serde_json::from_str::<HashMap<String, Value>>(&content)
                .unwrap_or_else(|error| {
                    tracing::warn!(path = %path.display(), "Ignoring corrupt state file: {}", error);
                    HashMap::new()
                }),
            Err(_) => HashMap::new(),
        };

        Self { path, data }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Typed read. `None` when absent or not convertible to `T`.
    pub fn get<T: DeserializeOwned>(&self, key: &str) -> Option<T> {
        self.data
            .get(key)
            .and_then(|value| serde_json::from_value::<T>(value.clone()).ok())
    }

    pub fn contains(&self, key: &str) -> bool {
        self.data.contains_key(key)
    }

    /// Store a value and write the file through.
    ///
    /// On a failed write the in-memory value is rolled back so memory and disk
    /// never disagree.
    pub fn set<T: Serialize>(&mut self, key: &str, value: T) -> io::Result<()> {
        let serialized = serde_json::to_value(value).map_err(io::Error::other)?;
        let previous = self.data.insert(key.to_string(), serialized);

        if let Err(error) = self.save() {
            match previous {
                Some(previous) => self.data.insert(key.to_string(), previous),
                None => self.data.remove(key),
            };
            return Err(error);
        }
        Ok(())
    }

    /// Write to a sibling temp file, fsync, then rename over the target.
    pub fn save(&self) -> io::Result<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }

        let content = serde_json::to_string_pretty(&self.data).map_err(io::Error::other)?;
        let tmp_path = self.path.with_extension("json.tmp");
        {
            let mut file = OpenOptions::new()
                .write(true)
                .create(true)
                .truncate(true)
                .open(&tmp_path)?;
            file.write_all(content.as_bytes())?;
            file.sync_all()?;
        }
        fs::rename(tmp_path, &self.path)
    }
}
