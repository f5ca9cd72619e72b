pub mod audio;
pub mod cli;
pub mod config;
pub mod engine;
pub mod events;
pub mod themes;

use anyhow::Context;
use cli::{Cli, Commands};
use config::Settings;
use engine::Engine;
use std::io::BufRead;

pub fn run(cli: Cli) -> anyhow::Result<()> {
    setup_tracing(cli.verbose);

    match cli.command {
        Commands::Listen(args) => listen(args),
        Commands::Play(args) => play(args),
        Commands::Toggle(args) => toggle(args),
        Commands::Themes(args) => themes_cmd(args),
        Commands::Config(args) => config_cmd(args),
    }
}

fn setup_tracing(verbose: bool) {
    let filter = if verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .init();
}

/// Host loop: one JSON notification per stdin line. Runs until the host
/// closes the pipe; a line that does not parse is logged and skipped, never
/// fatal.
fn listen(_args: cli::ListenArgs) -> anyhow::Result<()> {
    let settings = Settings::load().context("load settings")?;
    let mut engine = Engine::new(&settings);

    let stdin = std::io::stdin();
    for line in stdin.lock().lines() {
        let line = line.context("read notification line")?;
        let trimmed = line.trim();
        if trimmed.is_empty() {
            continue;
        }

        match serde_json::from_str(trimmed) {
            Ok(notification) => engine.handle(notification),
            Err(err) => {
                tracing::warn!(error = ?err, "unrecognized notification; skipping");
            }
        }
    }

    engine.close();
    Ok(())
}

fn play(args: cli::PlayArgs) -> anyhow::Result<()> {
    let settings = Settings::load().context("load settings")?;
    let engine = Engine::new(&settings);
    engine.play_kind(args.kind);
    engine.wait_idle();
    Ok(())
}

fn toggle(_args: cli::ToggleArgs) -> anyhow::Result<()> {
    let enabled = Settings::toggle().context("toggle settings")?;
    if enabled {
        println!("keyclack sounds enabled");
    } else {
        println!("keyclack sounds disabled");
    }
    Ok(())
}

fn themes_cmd(args: cli::ThemesArgs) -> anyhow::Result<()> {
    let settings = Settings::load().context("load settings")?;
    let table = themes::ThemeTable::load(settings.install_root());

    if args.json {
        let listing: serde_json::Map<String, serde_json::Value> = table
            .names()
            .into_iter()
            .filter_map(|name| {
                let sounds = table.get(name)?;
                Some((name.to_string(), serde_json::to_value(sounds).ok()?))
            })
            .collect();
        println!("{}", serde_json::to_string_pretty(&listing)?);
        return Ok(());
    }

    println!("Available themes:");
    for name in table.names() {
        println!("- {name}");
    }

    Ok(())
}

fn config_cmd(args: cli::ConfigArgs) -> anyhow::Result<()> {
    if args.init {
        let path = Settings::init_default()?;
        println!("Initialized settings at {}", path.display());
        return Ok(());
    }

    if args.show {
        let settings = Settings::load()?;
        println!("{}", serde_json::to_string_pretty(&settings)?);
        return Ok(());
    }

    if args.validate {
        let settings = Settings::load()?;
        settings.validate()?;
        println!("Settings OK");
        return Ok(());
    }

    let path = Settings::default_path()?;
    println!("{}", path.display());
    Ok(())
}
