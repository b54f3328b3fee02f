use clap::Parser;
use devpub::{Cli, Command, ConfigCommand};

mod logging;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    logging::initialize_logging(&cli)?;

    let vault = cli.vault.as_deref();
    match cli.command {
        Command::Publish { note } => cmd::publish::run(vault, &note).await,
        Command::Preview { note } => cmd::preview::run(vault, &note).await,
        Command::Status { note } => cmd::status::run(vault, &note).await,
        Command::MapImages { note, set } => cmd::map_images::run(vault, &note, set).await,
        Command::Config(ConfigCommand::SetKey { key }) => cmd::config::set_key(key),
        Command::Config(ConfigCommand::Show) => cmd::config::show(vault),
    }
}

mod cmd {
    pub mod config;
    pub mod map_images;
    pub mod preview;
    pub mod publish;
    pub mod resolve;
    pub mod status;
}
