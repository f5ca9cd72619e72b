use crate::config::{Settings, ThemeSetting};
use crate::events::SoundKind;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

pub const DEFAULT_THEME: &str = "typewriter";

/// Extensions the path classifier recognizes; matches what the decoder
/// supports out of the box.
const AUDIO_EXTENSIONS: &[&str] = &["wav", "mp3", "ogg", "flac"];

const THEME_FILE: &str = "themes.json";

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ThemeSounds {
    #[serde(default)]
    pub key: Option<String>,
    #[serde(default)]
    pub backspace: Option<String>,
    #[serde(default)]
    pub save: Option<String>,
}

impl ThemeSounds {
    fn sound(&self, kind: SoundKind) -> Option<&str> {
        match kind {
            SoundKind::Key => self.key.as_deref(),
            SoundKind::Backspace => self.backspace.as_deref(),
            SoundKind::Save => self.save.as_deref(),
        }
    }
}

/// Theme-name -> sounds table, loaded once and immutable afterwards.
///
/// Built-in entries are merged with an optional `themes.json` next to the
/// bundled sounds; a missing or malformed file leaves only the built-ins.
/// Relative paths (from either source) resolve against the install root, so
/// resolution does not depend on the host's working directory.
#[derive(Debug)]
pub struct ThemeTable {
    root: PathBuf,
    themes: HashMap<String, ThemeSounds>,
}

impl ThemeTable {
    pub fn load(root: impl Into<PathBuf>) -> Self {
        let root = root.into();
        let mut themes = builtin_themes();

        let theme_file = root.join(THEME_FILE);
        if theme_file.exists() {
            match load_theme_file(&theme_file) {
                Ok(extra) => {
                    for (name, sounds) in extra {
                        themes.insert(name.to_lowercase(), sounds);
                    }
                }
                Err(err) => {
                    tracing::warn!(
                        path = %theme_file.display(),
                        error = ?err,
                        "ignoring unreadable theme definition file"
                    );
                }
            }
        }

        Self { root, themes }
    }

    /// Maps a sound kind and the live settings to a concrete file path.
    ///
    /// Purely lexical: no existence check here, and no failure mode. An
    /// unknown theme or a missing per-kind entry falls back to the default
    /// theme's sound for that kind.
    pub fn resolve(&self, kind: SoundKind, settings: &Settings) -> PathBuf {
        match &settings.theme {
            Some(setting @ ThemeSetting::PerKind { .. }) => {
                match setting.override_for(kind) {
                    Some(value) => self.resolve_value(kind, value),
                    None => self.default_sound(kind),
                }
            }
            Some(ThemeSetting::Name(name)) => self.resolve_value(kind, name),
            None => match settings.legacy_sound(kind) {
                Some(value) => self.resolve_value(kind, value),
                None => self.default_sound(kind),
            },
        }
    }

    fn resolve_value(&self, kind: SoundKind, value: &str) -> PathBuf {
        if value.is_empty() {
            return self.default_sound(kind);
        }

        if looks_like_path(value) {
            return self.absolutize(value);
        }

        self.theme_sound(kind, value)
    }

    fn theme_sound(&self, kind: SoundKind, name: &str) -> PathBuf {
        let entry = self
            .themes
            .get(&name.to_lowercase())
            .and_then(|theme| theme.sound(kind));

        match entry {
            Some(value) => self.absolutize(value),
            None => self.default_sound(kind),
        }
    }

    fn default_sound(&self, kind: SoundKind) -> PathBuf {
        self.absolutize(builtin_sound(kind))
    }

    fn absolutize(&self, value: &str) -> PathBuf {
        let path = Path::new(value);
        if path.is_absolute() {
            path.to_path_buf()
        } else {
            self.root.join(path)
        }
    }

    pub fn get(&self, name: &str) -> Option<&ThemeSounds> {
        self.themes.get(&name.to_lowercase())
    }

    pub fn names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.themes.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }
}

/// Decides whether a configured string is a file path or a theme name.
///
/// A string is a path if it carries a recognized audio extension, starts with
/// a path-like token (`/`, `./`, `../`), or contains a separator anywhere.
/// Anything else is a theme name. Ambiguous values lose: a theme literally
/// named `vintage.wav` resolves as a path.
pub fn looks_like_path(value: &str) -> bool {
    if let Some(ext) = Path::new(value).extension().and_then(|e| e.to_str()) {
        if AUDIO_EXTENSIONS
            .iter()
            .any(|known| ext.eq_ignore_ascii_case(known))
        {
            return true;
        }
    }

    value.starts_with('/')
        || value.starts_with("./")
        || value.starts_with("../")
        || value.contains('/')
        || value.contains('\\')
}

fn builtin_sound(kind: SoundKind) -> &'static str {
    match kind {
        SoundKind::Key | SoundKind::Backspace => "sounds/key.wav",
        SoundKind::Save => "sounds/carriage-return.wav",
    }
}

fn builtin_themes() -> HashMap<String, ThemeSounds> {
    let mut themes = HashMap::new();
    themes.insert(
        DEFAULT_THEME.to_string(),
        ThemeSounds {
            key: Some(builtin_sound(SoundKind::Key).to_string()),
            backspace: Some(builtin_sound(SoundKind::Backspace).to_string()),
            save: Some(builtin_sound(SoundKind::Save).to_string()),
        },
    );
    themes
}

fn load_theme_file(path: &Path) -> anyhow::Result<HashMap<String, ThemeSounds>> {
    let raw = fs::read_to_string(path)?;
    Ok(serde_json::from_str(&raw)?)
}
