use clap::{Args, Parser, Subcommand};

use crate::events::SoundKind;

#[derive(Parser, Debug)]
#[command(name = "keyclack", version, about = "Typewriter-style sound feedback for text-editing events")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    #[arg(short, long, global = true, help = "Enable verbose logging")]
    pub verbose: bool,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    Listen(ListenArgs),
    Play(PlayArgs),
    Toggle(ToggleArgs),
    Themes(ThemesArgs),
    Config(ConfigArgs),
}

#[derive(Args, Debug)]
pub struct ListenArgs {}

#[derive(Args, Debug)]
pub struct PlayArgs {
    #[arg(long, value_enum, help = "Which event sound to play")]
    pub kind: SoundKind,
}

#[derive(Args, Debug)]
pub struct ToggleArgs {}

#[derive(Args, Debug)]
pub struct ThemesArgs {
    #[arg(long, help = "Output as JSON")]
    pub json: bool,
}

#[derive(Args, Debug)]
pub struct ConfigArgs {
    #[arg(long, help = "Show current settings as JSON")]
    pub show: bool,

    #[arg(long, help = "Create default settings file")]
    pub init: bool,

    #[arg(long, help = "Validate settings")]
    pub validate: bool,
}
