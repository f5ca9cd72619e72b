use crate::audio::Player;
use crate::config::Settings;
use crate::events::{classify_change, ChangeRecord, Notification, SoundKind};
use crate::themes::ThemeTable;

/// Routes host notifications to the playback worker.
///
/// Settings are re-read on every event so edits to the settings file take
/// effect on the next keystroke without a restart; only the theme table and
/// the worker's gain carry state across events.
pub struct Engine {
    player: Player,
    themes: ThemeTable,
}

impl Engine {
    pub fn new(settings: &Settings) -> Self {
        let themes = ThemeTable::load(settings.install_root());
        let player = Player::spawn(settings.gain());
        Self { player, themes }
    }

    pub fn handle(&mut self, notification: Notification) {
        match notification {
            Notification::Change { changes } => self.on_change(&changes),
            Notification::Save => self.play_kind(SoundKind::Save),
            Notification::Config { affects } => self.on_config_changed(&affects),
            Notification::Toggle => {
                match self.toggle() {
                    Ok(message) => tracing::info!("{message}"),
                    Err(err) => tracing::warn!(error = ?err, "toggle failed"),
                }
            }
        }
    }

    fn on_change(&self, changes: &[ChangeRecord]) {
        if let Some(kind) = classify_change(changes) {
            self.play_kind(kind);
        }
    }

    /// Only `enabled` and `volume` feed the gain stage; changes to other
    /// keys are picked up by the per-event settings reload instead.
    fn on_config_changed(&self, affects: &[String]) {
        if !affects.iter().any(|key| key == "enabled" || key == "volume") {
            return;
        }
        self.apply_gain();
    }

    /// Flips `enabled` in the persisted settings and reports the new state.
    /// Toggling twice lands back where it started.
    pub fn toggle(&mut self) -> anyhow::Result<String> {
        let enabled = Settings::toggle()?;
        self.apply_gain();
        Ok(if enabled {
            "keyclack sounds enabled".to_string()
        } else {
            "keyclack sounds disabled".to_string()
        })
    }

    pub fn play_kind(&self, kind: SoundKind) {
        let settings = match Settings::load() {
            Ok(settings) => settings,
            Err(err) => {
                tracing::warn!(error = ?err, "settings unreadable; skipping sound");
                return;
            }
        };

        if !settings.enabled {
            tracing::trace!(?kind, "sounds disabled; skipping");
            return;
        }

        let path = self.themes.resolve(kind, &settings);
        tracing::debug!(?kind, path = %path.display(), "dispatching clip");
        if self.player.play(path).is_err() {
            tracing::warn!("playback worker is closed; dropping clip");
        }
    }

    fn apply_gain(&self) {
        if let Ok(settings) = Settings::load() {
            let _ = self.player.set_gain(settings.gain());
        }
    }

    /// Waits for dispatched clips to finish; used by the one-shot `play`
    /// command so the process does not exit mid-sound.
    pub fn wait_idle(&self) {
        self.player.wait_idle();
    }

    pub fn close(&mut self) {
        self.player.close();
    }

    pub fn themes(&self) -> &ThemeTable {
        &self.themes
    }
}
