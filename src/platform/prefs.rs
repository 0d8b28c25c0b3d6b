//! Persisted user preferences (tool, color, width, toolbar position, toggles).

use crate::draw::Color;
use anyhow::{Context, Result};
use chrono::Utc;
use fs2::FileExt;
use log::{debug, warn};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs::{self, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};

pub const KEY_TOOL: &str = "tool";
pub const KEY_COLOR: &str = "color";
pub const KEY_WIDTH: &str = "width";
pub const KEY_TOOLBAR_X: &str = "toolbar_x";
pub const KEY_TOOLBAR_Y: &str = "toolbar_y";
pub const KEY_AUTO_HIDE: &str = "auto_hide";
pub const KEY_LAUNCH_AT_LOGIN: &str = "launch_at_login";

const PREFS_FILE_NAME: &str = "preferences.json";
const CURRENT_VERSION: u32 = 1;

/// A single stored preference.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "value", rename_all = "snake_case")]
pub enum PrefValue {
    Bool(bool),
    Double(f64),
    Text(String),
    Color(Color),
}

impl PrefValue {
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            PrefValue::Bool(value) => Some(*value),
            _ => None,
        }
    }

    pub fn as_f64(&self) -> Option<f64> {
        match self {
            PrefValue::Double(value) if value.is_finite() => Some(*value),
            _ => None,
        }
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            PrefValue::Text(value) => Some(value),
            _ => None,
        }
    }

    pub fn as_color(&self) -> Option<Color> {
        match self {
            PrefValue::Color(value) => Some(*value),
            _ => None,
        }
    }
}

/// Key-value preference storage.
pub trait PreferenceStore {
    fn get(&self, key: &str) -> Option<PrefValue>;
    fn set(&mut self, key: &str, value: PrefValue) -> Result<()>;
}

/// Preferences kept in memory only.
#[derive(Debug, Default, Clone)]
pub struct MemoryPreferenceStore {
    values: BTreeMap<String, PrefValue>,
}

impl MemoryPreferenceStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl PreferenceStore for MemoryPreferenceStore {
    fn get(&self, key: &str) -> Option<PrefValue> {
        self.values.get(key).cloned()
    }

    fn set(&mut self, key: &str, value: PrefValue) -> Result<()> {
        self.values.insert(key.to_string(), value);
        Ok(())
    }
}

#[derive(Debug, Serialize, Deserialize)]
struct PrefsFile {
    version: u32,
    last_modified: String,
    #[serde(default)]
    values: BTreeMap<String, PrefValue>,
}

/// Preferences stored as JSON, rewritten atomically on every change.
#[derive(Debug)]
pub struct JsonPreferenceStore {
    path: PathBuf,
    values: BTreeMap<String, PrefValue>,
}

impl JsonPreferenceStore {
    /// Opens the store at `~/.config/overmark/preferences.json`.
    pub fn open_default() -> Result<Self> {
        let dir = crate::config::Config::config_dir()?;
        Ok(Self::open(dir.join(PREFS_FILE_NAME)))
    }

    /// Opens the store at `path`. A missing file yields an empty store; an
    /// unreadable one is logged and ignored (it is replaced on the next save).
    pub fn open(path: PathBuf) -> Self {
        let values = match read_values(&path) {
            Ok(values) => values,
            Err(err) => {
                warn!(
                    "Ignoring unreadable preferences {}: {:#}",
                    path.display(),
                    err
                );
                BTreeMap::new()
            }
        };
        Self { path, values }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn lock_file_path(&self) -> PathBuf {
        let mut name = self.path.file_name().unwrap_or_default().to_os_string();
        name.push(".lock");
        self.path.with_file_name(name)
    }

    fn save(&self) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent).with_context(|| {
                format!("failed to create preferences directory {}", parent.display())
            })?;
        }

        let lock_path = self.lock_file_path();
        let lock_file = OpenOptions::new()
            .read(true)
            .write(true)
            .create(true)
            .truncate(false)
            .open(&lock_path)
            .with_context(|| format!("failed to open preferences lock {}", lock_path.display()))?;
        lock_file
            .lock_exclusive()
            .with_context(|| format!("failed to lock preferences {}", lock_path.display()))?;

        let result = self.save_locked();

        lock_file.unlock().unwrap_or_else(|err| {
            warn!(
                "failed to unlock preferences {}: {}",
                lock_path.display(),
                err
            )
        });

        result
    }

    fn save_locked(&self) -> Result<()> {
        let payload = PrefsFile {
            version: CURRENT_VERSION,
            last_modified: Utc::now().to_rfc3339(),
            values: self.values.clone(),
        };
        let bytes =
            serde_json::to_vec_pretty(&payload).context("failed to serialise preferences")?;

        let mut tmp_name = self.path.file_name().unwrap_or_default().to_os_string();
        tmp_name.push(".tmp");
        let tmp_path = self.path.with_file_name(tmp_name);
        {
            let mut tmp_file = fs::File::create(&tmp_path).with_context(|| {
                format!("failed to open temporary preferences {}", tmp_path.display())
            })?;
            tmp_file
                .write_all(&bytes)
                .context("failed to write preferences")?;
            tmp_file
                .sync_all()
                .context("failed to sync temporary preferences")?;
        }
        fs::rename(&tmp_path, &self.path).with_context(|| {
            format!(
                "failed to move {} into place at {}",
                tmp_path.display(),
                self.path.display()
            )
        })?;

        debug!("Saved preferences to {}", self.path.display());
        Ok(())
    }
}

impl PreferenceStore for JsonPreferenceStore {
    fn get(&self, key: &str) -> Option<PrefValue> {
        self.values.get(key).cloned()
    }

    fn set(&mut self, key: &str, value: PrefValue) -> Result<()> {
        if self.values.get(key) == Some(&value) {
            return Ok(());
        }
        let previous = self.values.insert(key.to_string(), value);
        if let Err(err) = self.save() {
            // Keep memory in step with the file so the next set retries.
            match previous {
                Some(old) => self.values.insert(key.to_string(), old),
                None => self.values.remove(key),
            };
            return Err(err);
        }
        Ok(())
    }
}

fn read_values(path: &Path) -> Result<BTreeMap<String, PrefValue>> {
    if !path.exists() {
        return Ok(BTreeMap::new());
    }
    let bytes =
        fs::read(path).with_context(|| format!("failed to read preferences {}", path.display()))?;
    let file: PrefsFile =
        serde_json::from_slice(&bytes).context("failed to parse preferences json")?;
    if file.version > CURRENT_VERSION {
        warn!(
            "Preferences {} were written by a newer version ({}); reading what is understood",
            path.display(),
            file.version
        );
    }
    Ok(file.values)
}
