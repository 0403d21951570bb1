//! Command-line interface argument parsing.
//!
//! This module handles all CLI argument parsing using clap,
//! including validation and default values.

use clap::Parser;
use std::path::PathBuf;

/// Blogforge - blog publishing backend with AI writing tools
///
/// Serves the blog, comment, bookmark, profile and admin APIs, and
/// forwards writing-assistant requests to the configured AI providers.
///
/// Examples:
///   blogforge
///   blogforge --port 8080 --database ./data/blog.db
///   blogforge --config ./blogforge.toml --verbose
///   blogforge --init-config
#[derive(Parser, Debug, Clone)]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Args {
    /// Path to configuration file
    ///
    /// If not specified, looks for blogforge.toml in the current directory
    #[arg(short, long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Interface to bind
    #[arg(long, value_name = "HOST", env = "BLOGFORGE_HOST")]
    pub host: Option<String>,

    /// Port to listen on
    #[arg(short, long, value_name = "PORT", env = "BLOGFORGE_PORT")]
    pub port: Option<u16>,

    /// SQLite database file
    #[arg(short, long, value_name = "FILE", env = "BLOGFORGE_DATABASE")]
    pub database: Option<PathBuf>,

    /// Directory served under /static (avatars are written here)
    #[arg(long, value_name = "DIR", env = "BLOGFORGE_STATIC_DIR")]
    pub static_dir: Option<PathBuf>,

    /// Password for the bootstrap admin account
    #[arg(long, value_name = "PASSWORD", env = "BLOGFORGE_ADMIN_PASSWORD", hide_env_values = true)]
    pub admin_password: Option<String>,

    /// Enable verbose logging output
    #[arg(short, long)]
    pub verbose: bool,

    /// Run in quiet mode (errors only)
    #[arg(short, long)]
    pub quiet: bool,

    /// Generate a default blogforge.toml configuration file
    #[arg(long)]
    pub init_config: bool,
}

impl Args {
    /// Parse command-line arguments.
    pub fn parse_args() -> Self {
        Self::parse()
    }

    /// Validate the parsed arguments.
    pub fn validate(&self) -> Result<(), String> {
        if self.init_config {
            return Ok(());
        }

        if self.verbose && self.quiet {
            return Err("Cannot use both --verbose and --quiet".to_string());
        }

        if self.port == Some(0) {
            return Err("Port must be between 1 and 65535".to_string());
        }

        if let Some(ref password) = self.admin_password {
            if password.trim().is_empty() {
                return Err("Admin password must not be empty".to_string());
            }
        }

        if let Some(ref config) = self.config {
            if !config.is_file() {
                return Err(format!("Config file does not exist: {}", config.display()));
            }
        }

        Ok(())
    }

    /// Returns the log level based on verbosity settings.
    pub fn log_level(&self) -> tracing::Level {
        if self.quiet {
            tracing::Level::ERROR
        } else if self.verbose {
            tracing::Level::DEBUG
        } else {
            tracing::Level::INFO
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn make_args() -> Args {
        Args {
            config: None,
            host: None,
            port: None,
            database: None,
            static_dir: None,
            admin_password: None,
            verbose: false,
            quiet: false,
            init_config: false,
        }
    }

    #[test]
    fn test_parse_flags() {
        let args = Args::try_parse_from(["blogforge", "--port", "9000", "-d", "x.db", "-v"]).unwrap();
        assert_eq!(args.port, Some(9000));
        assert_eq!(args.database, Some(PathBuf::from("x.db")));
        assert!(args.verbose);
    }

    #[test]
    fn test_validation_conflicting_options() {
        let mut args = make_args();
        args.verbose = true;
        args.quiet = true;
        assert!(args.validate().is_err());
    }

    #[test]
    fn test_validation_port_zero() {
        let mut args = make_args();
        args.port = Some(0);
        assert!(args.validate().is_err());

        args.port = Some(8000);
        assert!(args.validate().is_ok());
    }

    #[test]
    fn test_validation_missing_config_file() {
        let mut args = make_args();
        args.config = Some(PathBuf::from("/definitely/not/here.toml"));
        assert!(args.validate().is_err());
    }

    #[test]
    fn test_log_level() {
        let mut args = make_args();
        assert_eq!(args.log_level(), tracing::Level::INFO);

        args.verbose = true;
        assert_eq!(args.log_level(), tracing::Level::DEBUG);

        args.verbose = false;
        args.quiet = true;
        assert_eq!(args.log_level(), tracing::Level::ERROR);
    }

    #[test]
    fn test_merge_into_config() {
        let mut args = make_args();
        args.port = Some(9999);
        args.admin_password = Some("s3cret".to_string());

        let mut config = crate::config::Config::default();
        config.merge_with_args(&args);

        assert_eq!(config.server.port, 9999);
        assert_eq!(config.server.host, "0.0.0.0");
        assert_eq!(config.admin.password, "s3cret");
    }
}
