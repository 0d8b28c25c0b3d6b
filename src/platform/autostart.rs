//! Launch-at-login through an XDG autostart desktop entry.

use super::{LoginItem, PlatformError};
use log::{debug, info};
use std::fs;
use std::path::{Path, PathBuf};

const DESKTOP_FILE_NAME: &str = "overmark.desktop";

/// Login item backed by `~/.config/autostart/overmark.desktop`.
#[derive(Debug, Clone)]
pub struct XdgAutostart {
    path: PathBuf,
    exec: String,
}

impl XdgAutostart {
    /// Entry in the user's autostart directory that launches the running
    /// executable in daemon mode.
    pub fn new() -> Result<Self, PlatformError> {
        let dir = dirs::config_dir()
            .ok_or_else(|| {
                PlatformError::LoginItemUnavailable("could not find config directory".into())
            })?
            .join("autostart");
        let exe = std::env::current_exe().map_err(|source| PlatformError::LoginItem {
            path: PathBuf::from("/proc/self/exe"),
            source,
        })?;
        Ok(Self::with_path(
            dir.join(DESKTOP_FILE_NAME),
            format!("{} --daemon", exe.display()),
        ))
    }

    pub fn with_path(path: PathBuf, exec: String) -> Self {
        Self { path, exec }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn desktop_entry(&self) -> String {
        format!(
            "[Desktop Entry]\n\
             Type=Application\n\
             Name=Overmark\n\
             Comment=Draw annotations over the screen\n\
             Exec={}\n\
             X-GNOME-Autostart-enabled=true\n",
            self.exec
        )
    }

    fn io_error(&self, source: std::io::Error) -> PlatformError {
        PlatformError::LoginItem {
            path: self.path.clone(),
            source,
        }
    }
}

impl LoginItem for XdgAutostart {
    fn set_enabled(&mut self, enabled: bool) -> Result<(), PlatformError> {
        if enabled {
            if let Some(parent) = self.path.parent() {
                fs::create_dir_all(parent).map_err(|err| self.io_error(err))?;
            }
            fs::write(&self.path, self.desktop_entry()).map_err(|err| self.io_error(err))?;
            info!("Launch at login enabled ({})", self.path.display());
        } else if self.path.exists() {
            fs::remove_file(&self.path).map_err(|err| self.io_error(err))?;
            info!("Launch at login disabled");
        } else {
            debug!("Launch at login already disabled");
        }
        Ok(())
    }

    fn is_enabled(&self) -> bool {
        self.path.is_file()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn enabling_writes_desktop_entry() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("autostart").join(DESKTOP_FILE_NAME);
        let mut item = XdgAutostart::with_path(path.clone(), "/usr/bin/overmark --daemon".into());

        assert!(!item.is_enabled());
        item.set_enabled(true).unwrap();
        assert!(item.is_enabled());

        let contents = fs::read_to_string(&path).unwrap();
        assert!(contents.starts_with("[Desktop Entry]"));
        assert!(contents.contains("Exec=/usr/bin/overmark --daemon"));

        item.set_enabled(false).unwrap();
        assert!(!item.is_enabled());
        assert!(!path.exists());
    }

    #[test]
    fn disabling_missing_entry_is_ok() {
        let dir = tempfile::tempdir().unwrap();
        let mut item =
            XdgAutostart::with_path(dir.path().join(DESKTOP_FILE_NAME), "overmark".into());
        item.set_enabled(false).unwrap();
        assert!(!item.is_enabled());
    }

    #[test]
    fn unwritable_location_reports_path() {
        let dir = tempfile::tempdir().unwrap();
        let blocker = dir.path().join("not-a-dir");
        fs::write(&blocker, "file").unwrap();
        let path = blocker.join(DESKTOP_FILE_NAME);
        let mut item = XdgAutostart::with_path(path, "overmark".into());

        let err = item.set_enabled(true).unwrap_err();
        assert!(matches!(err, PlatformError::LoginItem { .. }));
        assert!(!item.is_enabled());
    }
}
