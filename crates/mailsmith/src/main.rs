//! MailSmith CLI - email-safe HTML generator.

use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing_subscriber::{fmt, EnvFilter};

mod commands;

#[derive(Parser)]
#[command(name = "mailsmith")]
#[command(about = "Generate email-safe HTML from a static site by inlining CSS")]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Enable verbose output
    #[arg(short, long)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Scaffold a new mail project in each target directory
    Setup {
        /// Target project directories
        #[arg(default_value = ".")]
        dirs: Vec<PathBuf>,
    },

    /// Build pages and convert them to inlined emails
    Build {
        /// Target project directories
        #[arg(default_value = ".")]
        dirs: Vec<PathBuf>,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new("info")
    };

    fmt().with_env_filter(filter).with_target(false).init();

    // Execute command
    match cli.command {
        Commands::Setup { dirs } => {
            commands::setup::run(&dirs)?;
        }
        Commands::Build { dirs } => {
            commands::build::run(&dirs)?;
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unknown_commands_are_rejected() {
        assert!(Cli::try_parse_from(["mailsmith", "deploy"]).is_err());
    }

    #[test]
    fn dirs_default_to_current_directory() {
        let cli = Cli::try_parse_from(["mailsmith", "build"]).unwrap();
        match cli.command {
            Commands::Build { dirs } => assert_eq!(dirs, vec![PathBuf::from(".")]),
            _ => panic!("expected build command"),
        }
    }

    #[test]
    fn accepts_multiple_directories() {
        let cli = Cli::try_parse_from(["mailsmith", "setup", "a", "b"]).unwrap();
        match cli.command {
            Commands::Setup { dirs } => {
                assert_eq!(dirs, vec![PathBuf::from("a"), PathBuf::from("b")])
            }
            _ => panic!("expected setup command"),
        }
    }
}
