use clap::ValueEnum;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum SoundKind {
    Key,
    Backspace,
    Save,
}

/// One text edit as reported by the host: the inserted text and the length
/// of the range it replaced.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChangeRecord {
    #[serde(default)]
    pub text: String,
    #[serde(default)]
    pub range_length: usize,
}

/// A host notification, one JSON object per line on stdin of `keyclack listen`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum Notification {
    Change {
        #[serde(default)]
        changes: Vec<ChangeRecord>,
    },
    Save,
    Config {
        #[serde(default)]
        affects: Vec<String>,
    },
    Toggle,
}

/// Classifies a change batch. Only the first record is inspected; an empty
/// batch means no sound at all.
pub fn classify_change(changes: &[ChangeRecord]) -> Option<SoundKind> {
    let first = changes.first()?;
    if first.text.is_empty() && first.range_length > 0 {
        Some(SoundKind::Backspace)
    } else {
        Some(SoundKind::Key)
    }
}
