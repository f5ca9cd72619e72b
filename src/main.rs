use clap::Parser;

fn main() -> anyhow::Result<()> {
    let cli = keyclack::cli::Cli::parse();
    keyclack::run(cli)
}
