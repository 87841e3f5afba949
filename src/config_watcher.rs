//! File watcher for `preview.toml` hot-reload.
//!
//! Watches the config file's parent directory and hands the new file content
//! to a callback whenever the file is created or modified. Parsing and
//! validation stay with the caller, so a bad edit never tears down the
//! watcher.

use notify::{Event, EventKind, RecommendedWatcher, RecursiveMode, Watcher};
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

const APP_NAME: &str = "bezel-preview";
const CONFIG_FILE: &str = "preview.toml";

// ---------------------------------------------------------------------------
// Path helpers
// ---------------------------------------------------------------------------

/// `$XDG_CONFIG_HOME/bezel-preview/`, or `$HOME/.config/bezel-preview/`.
pub fn config_dir() -> PathBuf {
    if let Ok(xdg) = std::env::var("XDG_CONFIG_HOME") {
        return PathBuf::from(xdg).join(APP_NAME);
    }
    home_dir().join(".config").join(APP_NAME)
}

pub fn default_config_path() -> PathBuf {
    config_dir().join(CONFIG_FILE)
}

fn home_dir() -> PathBuf {
    std::env::var("HOME")
        .map(PathBuf::from)
        .unwrap_or_else(|_| PathBuf::from("/tmp"))
}

// ---------------------------------------------------------------------------
// File I/O helpers
// ---------------------------------------------------------------------------

/// Write `default_content` to `path` unless the file already exists.
pub fn ensure_default_config(path: &Path, default_content: &str) -> std::io::Result<()> {
    if path.exists() {
        return Ok(());
    }
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    std::fs::write(path, default_content)
}

pub fn load_config_text(path: &Path) -> std::io::Result<String> {
    std::fs::read_to_string(path)
}

// ---------------------------------------------------------------------------
// Watcher
// ---------------------------------------------------------------------------

/// Spawn a watcher on the parent directory of `path`.
///
/// Editors that save through a temp file and rename never touch the original
/// inode, so the directory is watched and events are filtered by filename.
pub fn spawn_watcher<F>(path: &Path, on_change: F) -> notify::Result<RecommendedWatcher>
where
    F: Fn() + Send + 'static,
{
    let target = path
        .file_name()
        .ok_or_else(|| notify::Error::generic("config path has no file name"))?
        .to_os_string();
    let parent = match path.parent() {
        Some(p) if !p.as_os_str().is_empty() => p.to_path_buf(),
        _ => PathBuf::from("."),
    };

    let mut watcher = notify::recommended_watcher(move |res: Result<Event, notify::Error>| {
        match res {
            Ok(event) => {
                if !matches!(event.kind, EventKind::Create(_) | EventKind::Modify(_)) {
                    return;
                }
                let affects_target = event
                    .paths
                    .iter()
                    .any(|p| p.file_name().is_some_and(|f| f == target));
                if affects_target {
                    on_change();
                }
            }
            Err(e) => warn!(target: "config", "watch error: {e}"),
        }
    })?;

    watcher.watch(&parent, RecursiveMode::NonRecursive)?;
    Ok(watcher)
}

/// Owns the file-system watcher for one config file.
pub struct ConfigWatcher {
    _watcher: RecommendedWatcher,
    path: PathBuf,
}

impl ConfigWatcher {
    /// Start watching `path`, calling `on_reload` with the file content on
    /// every change.
    pub fn start<F>(path: PathBuf, on_reload: F) -> notify::Result<Self>
    where
        F: Fn(String) + Send + 'static,
    {
        let watched = path.clone();
        let watcher = spawn_watcher(&path, move || match load_config_text(&watched) {
            Ok(content) => {
                debug!(target: "config", path = %watched.display(), "config file changed");
                on_reload(content);
            }
            Err(e) => warn!(target: "config", "failed to read {}: {e}", watched.display()),
        })?;

        Ok(Self {
            _watcher: watcher,
            path,
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

// ---------------------------------------------------------------------------
// Default file
// ---------------------------------------------------------------------------

/// Commented default config. Values match `PreviewConfig::default()`.
pub fn default_config_content() -> String {
    r#"# bezel-preview settings. Changes are picked up when the file is saved.
# Missing values use compiled defaults.

[layout]
min_scale = 0.1         # Scale floor; the frame overflows rather than shrinking further
toolbar_height = 48.0   # Space reserved above the frame for the toggle bar
label_height = 32.0     # Space reserved below the frame for the device label
padding = 16.0          # Window margin on every side

[startup]
device = "iphone-15-pro"
orientation = "portrait"   # or "landscape"
screen_only = false

[animation]
shrink_secs = 0.15      # Scale-down phase of a device switch
grow_secs = 0.2         # Scale-up phase
shrink_factor = 0.9     # Presentation factor at the midpoint

[window]
width = 1280.0
height = 900.0

# Extra devices are appended after the built-ins:
#
# [[devices]]
# id = "kiosk"
# class = "tablet"        # phone | tablet | desktop | watch
# logical_width = 1080.0
# logical_height = 1920.0
# pixel_ratio = 1.0
# bezel_thickness = 24.0
"#
    .to_string()
}
