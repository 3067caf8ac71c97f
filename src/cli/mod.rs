//! Command-line interface.
//!
//! Without a subcommand the binary starts the HTTP server. Subcommands:
//! - `config check` - Validate configuration file
//! - `token decode <token>` - Print the claims inside a session token
//! - `hash-password <password>` - Print an Argon2 hash for manual seeding

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use std::path::PathBuf;

use crate::config::Config;
use crate::crypto::{decode_token, hash_password};

/// CLI arguments structure
#[derive(Parser, Debug)]
#[command(name = "ezbuild")]
#[command(author, version, about = "REST backend for the EzBuild PC-parts store", long_about = None)]
pub struct Cli {
    /// Path to configuration file
    #[arg(short, long, env = "EZBUILD_CONFIG", default_value = "ezbuild.toml")]
    pub config: PathBuf,

    /// Override log level
    #[arg(short, long)]
    pub log_level: Option<String>,

    /// Subcommand to run (if none, starts the server)
    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Available CLI subcommands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Configuration management commands
    #[command(subcommand)]
    Config(ConfigCommands),

    /// Session token helpers
    #[command(subcommand)]
    Token(TokenCommands),

    /// Hash a password the same way registration does
    HashPassword {
        /// Plain-text password
        password: String,
    },
}

/// Config subcommands
#[derive(Subcommand, Debug)]
pub enum ConfigCommands {
    /// Validate configuration file
    Check,
}

/// Token subcommands
#[derive(Subcommand, Debug)]
pub enum TokenCommands {
    /// Decode a token and print its claims as JSON
    Decode {
        /// Token returned by register or login
        token: String,
    },
}

/// Run a CLI command
pub async fn run_command(cli: &Cli) -> Result<()> {
    match &cli.command {
        Some(Commands::Config(ConfigCommands::Check)) => cmd_config_check(cli),
        Some(Commands::Token(TokenCommands::Decode { token })) => cmd_token_decode(token),
        Some(Commands::HashPassword { password }) => cmd_hash_password(password).await,
        None => {
            // No subcommand means start the server - this is handled in main.rs
            Ok(())
        }
    }
}

fn cmd_config_check(cli: &Cli) -> Result<()> {
    let config_path = &cli.config;

    println!("Checking configuration file: {}", config_path.display());
    println!();

    if !config_path.exists() {
        println!(
            "[!!] Configuration file not found: {}",
            config_path.display()
        );
        println!();
        println!("A default configuration will be used when starting the server.");
        println!("To create a custom configuration, copy ezbuild.example.toml to ezbuild.toml");
        return Ok(());
    }

    match Config::load(config_path) {
        Ok(config) => {
            println!("[OK] Configuration file is valid!");
            println!();
            println!("=== Configuration Summary ===");
            println!();
            println!("Server:");
            println!("  Host:         {}", config.server.host);
            println!("  Port:         {}", config.server.port);
            println!("  Data Dir:     {}", config.server.data_dir.display());
            println!();
            println!("Database:");
            println!("  URL:          {}", config.database_url());
            println!("  Connections:  {}", config.database.max_connections);
            println!();
            println!("Chat:");
            println!("  Model:        {}", config.chat.model);
            println!(
                "  API Key:      {}",
                if config.chat.api_key.is_some() {
                    "Set"
                } else {
                    "Not set (chat requests will fail)"
                }
            );
            println!();
            println!("CORS origins:");
            for origin in &config.cors.allowed_origins {
                println!("  {}", origin);
            }
            println!();
            println!(
                "Seeding:        {}",
                if config.seed.enabled {
                    "Enabled"
                } else {
                    "Disabled"
                }
            );
            Ok(())
        }
        Err(e) => {
            println!("[!!] Configuration file is invalid!");
            println!();
            println!("Error: {:#}", e);
            bail!("Configuration validation failed");
        }
    }
}

fn cmd_token_decode(token: &str) -> Result<()> {
    let claims = decode_token(token).context("Failed to decode token")?;
    println!("{}", serde_json::to_string_pretty(&claims)?);
    Ok(())
}

async fn cmd_hash_password(password: &str) -> Result<()> {
    let password = password.to_string();
    let hash = tokio::task::spawn_blocking(move || hash_password(&password))
        .await?
        .map_err(|e| anyhow::anyhow!("Failed to hash password: {}", e))?;
    println!("{}", hash);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::crypto::{issue_token, ClaimSet, TokenSource};
    use tokio_test::{assert_err, assert_ok};

    #[test]
    fn test_parse_subcommands() {
        let cli = Cli::try_parse_from(["ezbuild"]).unwrap();
        assert!(cli.command.is_none());
        assert_eq!(cli.config, PathBuf::from("ezbuild.toml"));

        let cli = Cli::try_parse_from(["ezbuild", "--config", "prod.toml", "config", "check"]).unwrap();
        assert_eq!(cli.config, PathBuf::from("prod.toml"));
        assert!(matches!(
            cli.command,
            Some(Commands::Config(ConfigCommands::Check))
        ));

        let cli = Cli::try_parse_from(["ezbuild", "hash-password", "demo123"]).unwrap();
        assert!(matches!(
            cli.command,
            Some(Commands::HashPassword { ref password }) if password == "demo123"
        ));
    }

    #[test]
    fn test_token_decode() {
        let token = issue_token(&ClaimSet::new(1, "A", "a@test.com", "User", TokenSource::Login)).unwrap();
        assert_ok!(cmd_token_decode(&token));
        assert_err!(cmd_token_decode("not a token"));
    }

    #[tokio::test]
    async fn test_hash_password_command() {
        assert_ok!(cmd_hash_password("demo123").await);
    }
}
