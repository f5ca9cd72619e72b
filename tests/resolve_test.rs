use keyclack::config::{Settings, ThemeSetting};
use keyclack::events::SoundKind;
use keyclack::themes::{looks_like_path, ThemeTable, DEFAULT_THEME};
use std::path::{Path, PathBuf};

const ROOT: &str = "/opt/keyclack";

fn table() -> ThemeTable {
    ThemeTable::load(ROOT)
}

fn settings_with_theme(theme: ThemeSetting) -> Settings {
    Settings {
        theme: Some(theme),
        ..Settings::default()
    }
}

fn named(name: &str) -> Settings {
    settings_with_theme(ThemeSetting::Name(name.to_string()))
}

#[test]
fn default_settings_resolve_to_bundled_typewriter() {
    let table = table();
    let settings = Settings::default();

    assert_eq!(
        table.resolve(SoundKind::Key, &settings),
        Path::new(ROOT).join("sounds/key.wav")
    );
    assert_eq!(
        table.resolve(SoundKind::Backspace, &settings),
        Path::new(ROOT).join("sounds/key.wav")
    );
    assert_eq!(
        table.resolve(SoundKind::Save, &settings),
        Path::new(ROOT).join("sounds/carriage-return.wav")
    );
}

#[test]
fn explicit_typewriter_matches_default() {
    let table = table();
    assert_eq!(
        table.resolve(SoundKind::Key, &named(DEFAULT_THEME)),
        Path::new(ROOT).join("sounds/key.wav")
    );
}

#[test]
fn theme_lookup_is_case_insensitive() {
    let table = table();
    assert_eq!(
        table.resolve(SoundKind::Save, &named("TypeWriter")),
        Path::new(ROOT).join("sounds/carriage-return.wav")
    );
}

#[test]
fn unknown_theme_falls_back_to_default_for_every_kind() {
    let table = table();
    let settings = named("doesnotexist");
    let default = Settings::default();

    for kind in [SoundKind::Key, SoundKind::Backspace, SoundKind::Save] {
        assert_eq!(
            table.resolve(kind, &settings),
            table.resolve(kind, &default)
        );
    }
}

#[test]
fn per_kind_absolute_override_is_taken_verbatim() {
    let table = table();
    let settings = settings_with_theme(ThemeSetting::PerKind {
        key: Some("/tmp/custom.wav".to_string()),
        backspace: None,
        save: None,
    });

    assert_eq!(
        table.resolve(SoundKind::Key, &settings),
        PathBuf::from("/tmp/custom.wav")
    );
    // Kinds without an override fall back to the default theme.
    assert_eq!(
        table.resolve(SoundKind::Save, &settings),
        Path::new(ROOT).join("sounds/carriage-return.wav")
    );
}

#[test]
fn path_like_theme_value_resolves_as_path() {
    let table = table();
    // Audio extension wins over any theme named the same way.
    assert_eq!(
        table.resolve(SoundKind::Key, &named("vintage.wav")),
        Path::new(ROOT).join("vintage.wav")
    );
    assert_eq!(
        table.resolve(SoundKind::Key, &named("clips/click.ogg")),
        Path::new(ROOT).join("clips/click.ogg")
    );
}

#[test]
fn legacy_flat_settings_apply_when_theme_is_unset() {
    let table = table();
    let settings = Settings {
        key_sound: Some("/srv/legacy/key.mp3".to_string()),
        ..Settings::default()
    };

    assert_eq!(
        table.resolve(SoundKind::Key, &settings),
        PathBuf::from("/srv/legacy/key.mp3")
    );
    assert_eq!(
        table.resolve(SoundKind::Backspace, &settings),
        Path::new(ROOT).join("sounds/key.wav")
    );
}

#[test]
fn theme_setting_shadows_legacy_flat_settings() {
    let table = table();
    let settings = Settings {
        theme: Some(ThemeSetting::Name(DEFAULT_THEME.to_string())),
        key_sound: Some("/srv/legacy/key.mp3".to_string()),
        ..Settings::default()
    };

    assert_eq!(
        table.resolve(SoundKind::Key, &settings),
        Path::new(ROOT).join("sounds/key.wav")
    );
}

#[test]
fn resolution_is_idempotent() {
    let table = table();
    let settings = named("doesnotexist");
    assert_eq!(
        table.resolve(SoundKind::Save, &settings),
        table.resolve(SoundKind::Save, &settings)
    );
}

#[test]
fn theme_definition_file_adds_themes() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(
        dir.path().join("themes.json"),
        r#"{"Clacky":{"key":"clacky/key.wav","save":"/srv/clacky/ding.wav"}}"#,
    )
    .unwrap();

    let table = ThemeTable::load(dir.path());
    let settings = named("clacky");

    assert_eq!(
        table.resolve(SoundKind::Key, &settings),
        dir.path().join("clacky/key.wav")
    );
    assert_eq!(
        table.resolve(SoundKind::Save, &settings),
        PathBuf::from("/srv/clacky/ding.wav")
    );
    // Kind missing from the theme falls back to the built-in default.
    assert_eq!(
        table.resolve(SoundKind::Backspace, &settings),
        dir.path().join("sounds/key.wav")
    );
}

#[test]
fn malformed_theme_definition_file_is_ignored() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(dir.path().join("themes.json"), "not json").unwrap();

    let table = ThemeTable::load(dir.path());
    assert_eq!(
        table.resolve(SoundKind::Key, &Settings::default()),
        dir.path().join("sounds/key.wav")
    );
    assert!(table.get(DEFAULT_THEME).is_some());
}

#[test]
fn path_classifier() {
    for path in [
        "click.wav",
        "CLICK.WAV",
        "beep.mp3",
        "pop.ogg",
        "snap.flac",
        "/abs/anything",
        "./relative",
        "../up",
        "dir/file",
        "dir\\file",
    ] {
        assert!(looks_like_path(path), "{path} should classify as a path");
    }

    for name in ["typewriter", "Clacky", "soft-touch", "theme2"] {
        assert!(!looks_like_path(name), "{name} should classify as a theme name");
    }
}
