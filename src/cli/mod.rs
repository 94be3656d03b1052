pub mod commands;

use clap::{Parser, Subcommand};

use crate::config::AppConfig;

#[derive(Parser)]
#[command(name = "consulting-api")]
#[command(about = "Consulting platform backend - lead intake, admin triage and portfolio content")]
#[command(version)]
pub struct Cli {
    #[arg(long, global = true, help = "Print command results as JSON")]
    pub json: bool,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand)]
pub enum Commands {
    #[command(about = "Wait for the database, migrate, seed and serve HTTP (default)")]
    Serve,

    #[command(about = "Apply pending database migrations")]
    Migrate,

    #[command(about = "Insert the admin account and sample content where missing")]
    Seed,

    #[command(about = "Print a bcrypt hash for a password")]
    HashPassword {
        #[arg(help = "Plain-text password")]
        password: String,
    },

    #[command(about = "Fold hero_tagline into hero_description.title and delete it")]
    MergeHeroEntries,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    Text,
    Json,
}

impl OutputFormat {
    pub fn from_cli(cli: &Cli) -> Self {
        if cli.json {
            OutputFormat::Json
        } else {
            OutputFormat::Text
        }
    }
}

pub async fn run(cli: Cli, config: AppConfig) -> anyhow::Result<()> {
    let output_format = OutputFormat::from_cli(&cli);

    match cli.command.unwrap_or(Commands::Serve) {
        Commands::Serve => commands::serve::handle(config).await,
        Commands::Migrate => commands::database::migrate(&config).await,
        Commands::Seed => commands::database::seed(&config, output_format).await,
        Commands::HashPassword { password } => {
            commands::password::handle(&password, config.security.bcrypt_cost, output_format).await
        }
        Commands::MergeHeroEntries => commands::database::merge_hero_entries(&config, output_format).await,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn serve_is_the_default_command() {
        let cli = Cli::parse_from(["consulting-api"]);
        assert!(cli.command.is_none());
        assert_eq!(OutputFormat::from_cli(&cli), OutputFormat::Text);
    }

    #[test]
    fn parses_subcommands_and_global_flags() {
        let cli = Cli::parse_from(["consulting-api", "hash-password", "s3cret", "--json"]);
        assert!(matches!(cli.command, Some(Commands::HashPassword { ref password }) if password == "s3cret"));
        assert_eq!(OutputFormat::from_cli(&cli), OutputFormat::Json);

        let cli = Cli::parse_from(["consulting-api", "merge-hero-entries"]);
        assert!(matches!(cli.command, Some(Commands::MergeHeroEntries)));
    }
}
