use crate::events::SoundKind;
use anyhow::{bail, Context};
use directories::BaseDirs;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Settings {
    #[serde(default = "default_enabled")]
    pub enabled: bool,
    #[serde(default = "default_volume")]
    pub volume: u32,
    #[serde(default, deserialize_with = "lenient_theme")]
    pub theme: Option<ThemeSetting>,
    #[serde(default)]
    pub key_sound: Option<String>,
    #[serde(default)]
    pub backspace_sound: Option<String>,
    #[serde(default)]
    pub save_sound: Option<String>,
    #[serde(default)]
    pub sounds_dir: Option<PathBuf>,
}

/// The `theme` setting accepts either a theme name or a per-kind override
/// object, mirroring the flat string form older settings files used.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ThemeSetting {
    Name(String),
    PerKind {
        #[serde(default)]
        key: Option<String>,
        #[serde(default)]
        backspace: Option<String>,
        #[serde(default)]
        save: Option<String>,
    },
}

/// A `theme` value that is neither a string nor a per-kind object must not
/// sink the whole settings load; resolution falls back to the default theme
/// instead.
fn lenient_theme<'de, D>(deserializer: D) -> Result<Option<ThemeSetting>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let value = Option::<serde_json::Value>::deserialize(deserializer)?;
    let Some(value) = value else {
        return Ok(None);
    };

    match serde_json::from_value::<ThemeSetting>(value) {
        Ok(setting) => Ok(Some(setting)),
        Err(err) => {
            tracing::warn!(error = ?err, "malformed theme setting; using default theme");
            Ok(None)
        }
    }
}

impl ThemeSetting {
    pub fn override_for(&self, kind: SoundKind) -> Option<&str> {
        match self {
            ThemeSetting::Name(_) => None,
            ThemeSetting::PerKind {
                key,
                backspace,
                save,
            } => match kind {
                SoundKind::Key => key.as_deref(),
                SoundKind::Backspace => backspace.as_deref(),
                SoundKind::Save => save.as_deref(),
            },
        }
    }
}

impl Settings {
    pub fn load() -> anyhow::Result<Self> {
        if let Some(path) = Self::project_path() {
            if path.exists() {
                return Self::load_from_path(&path);
            }
        }

        if let Ok(path) = Self::default_path() {
            if path.exists() {
                return Self::load_from_path(&path);
            }
        }

        Ok(Self::default())
    }

    pub fn load_from_path(path: &Path) -> anyhow::Result<Self> {
        let raw = fs::read_to_string(path)
            .with_context(|| format!("read settings at {}", path.display()))?;
        let settings: Settings = serde_json::from_str(&raw)
            .with_context(|| format!("parse settings at {}", path.display()))?;
        Ok(settings)
    }

    pub fn store_to_path(&self, path: &Path) -> anyhow::Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)
                .with_context(|| format!("create settings dir {}", parent.display()))?;
        }
        fs::write(path, serde_json::to_string_pretty(self)?)
            .with_context(|| format!("write settings at {}", path.display()))?;
        Ok(())
    }

    pub fn init_default() -> anyhow::Result<PathBuf> {
        let path = Self::default_path()?;
        Settings::default().store_to_path(&path)?;
        Ok(path)
    }

    pub fn default_path() -> anyhow::Result<PathBuf> {
        let base = BaseDirs::new().context("unable to resolve home directory")?;
        Ok(base.config_dir().join("keyclack").join("config.json"))
    }

    /// The path settings are persisted to: an existing settings file if one
    /// was found by `load`, otherwise the user-level config path.
    pub fn store_path() -> anyhow::Result<PathBuf> {
        if let Some(path) = Self::project_path() {
            if path.exists() {
                return Ok(path);
            }
        }
        Self::default_path()
    }

    /// Flips `enabled` in the persisted settings and returns the new value.
    pub fn toggle() -> anyhow::Result<bool> {
        let path = Self::store_path()?;
        Self::toggle_at(&path)
    }

    pub fn toggle_at(path: &Path) -> anyhow::Result<bool> {
        let mut settings = if path.exists() {
            Self::load_from_path(path)?
        } else {
            Self::default()
        };
        settings.enabled = !settings.enabled;
        settings.store_to_path(path)?;
        Ok(settings.enabled)
    }

    /// Volume 0-100 mapped to a 0.0-1.0 gain. Out-of-range values clamp
    /// rather than fail so a hand-edited settings file stays usable.
    pub fn gain(&self) -> f32 {
        self.volume.min(100) as f32 / 100.0
    }

    pub fn legacy_sound(&self, kind: SoundKind) -> Option<&str> {
        match kind {
            SoundKind::Key => self.key_sound.as_deref(),
            SoundKind::Backspace => self.backspace_sound.as_deref(),
            SoundKind::Save => self.save_sound.as_deref(),
        }
    }

    /// Root the bundled sounds and the optional theme definition file are
    /// resolved against: the `sounds_dir` setting if present, else the
    /// executable's directory, else the working directory. Tied to the
    /// install location rather than wherever the host launched us.
    pub fn install_root(&self) -> PathBuf {
        if let Some(dir) = &self.sounds_dir {
            return dir.clone();
        }

        if let Ok(exe) = std::env::current_exe() {
            if let Some(dir) = exe.parent() {
                return dir.to_path_buf();
            }
        }

        PathBuf::from(".")
    }

    pub fn validate(&self) -> anyhow::Result<()> {
        if self.volume > 100 {
            bail!("volume must be between 0 and 100");
        }

        if let Some(ThemeSetting::Name(name)) = &self.theme {
            if name.trim().is_empty() {
                bail!("theme name must not be empty");
            }
        }

        if let Some(dir) = &self.sounds_dir {
            if !dir.exists() {
                bail!("sounds_dir not found: {}", dir.display());
            }
        }

        Ok(())
    }

    fn project_path() -> Option<PathBuf> {
        Some(PathBuf::from("keyclack.json"))
    }
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            enabled: default_enabled(),
            volume: default_volume(),
            theme: None,
            key_sound: None,
            backspace_sound: None,
            save_sound: None,
            sounds_dir: None,
        }
    }
}

fn default_enabled() -> bool {
    true
}

fn default_volume() -> u32 {
    50
}
