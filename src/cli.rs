//! Command-line interface definitions
//!
//! Provides CLI argument parsing using clap for the agent-cockpit demo
//! binary.

use std::path::PathBuf;

use clap::Parser;

use crate::types::PermissionMode;

/// Agent Cockpit - session & tool-approval coordinator for agent backends
#[derive(Parser, Debug, Clone)]
#[command(name = "agent-cockpit")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Working directory for the demo session
    #[arg(short = 'w', long, value_name = "DIR", default_value = ".")]
    pub working_dir: String,

    /// Model identifier used for cost estimation
    #[arg(short, long, value_name = "MODEL")]
    pub model: Option<String>,

    /// Initial permission mode for the demo session
    #[arg(short = 'p', long, value_name = "MODE", value_parser = parse_mode)]
    pub permission_mode: Option<PermissionMode>,

    /// Enable diagnostic mode (auto-log to temp file)
    #[arg(short, long)]
    pub diagnostic: bool,

    /// Log directory (implies diagnostic mode)
    #[arg(short = 'l', long, value_name = "DIR")]
    pub log_dir: Option<PathBuf>,

    /// Log file name (implies diagnostic mode)
    #[arg(short = 'f', long, value_name = "FILE")]
    pub log_file: Option<String>,

    /// Increase logging verbosity (-v, -vv, -vvv)
    /// Note: RUST_LOG env var takes priority over this flag
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Quiet mode (only errors)
    /// Note: RUST_LOG env var takes priority over this flag
    #[arg(short, long)]
    pub quiet: bool,
}

fn parse_mode(value: &str) -> Result<PermissionMode, String> {
    PermissionMode::parse(value)
        .ok_or_else(|| format!("unknown permission mode: {value} (expected default, plan, acceptEdits or bypassPermissions)"))
}

#[allow(clippy::derivable_impls)]
impl Default for Cli {
    fn default() -> Self {
        Self {
            working_dir: ".".to_string(),
            model: None,
            permission_mode: None,
            diagnostic: false,
            log_dir: None,
            log_file: None,
            verbose: 0,
            quiet: false,
        }
    }
}

impl Cli {
    /// Check if diagnostic mode is enabled (output to file)
    ///
    /// Returns true if `--diagnostic` is set, or if `--log-dir` or `--log-file` is specified.
    pub fn is_diagnostic(&self) -> bool {
        self.diagnostic || self.log_dir.is_some() || self.log_file.is_some()
    }

    /// Get the log level based on CLI arguments
    ///
    /// - `--quiet`: ERROR
    /// - default: INFO
    /// - `-v`: DEBUG
    /// - `-vv` or more: TRACE
    pub fn log_level(&self) -> tracing::Level {
        if self.quiet {
            tracing::Level::ERROR
        } else {
            match self.verbose {
                0 => tracing::Level::INFO,
                1 => tracing::Level::DEBUG,
                _ => tracing::Level::TRACE,
            }
        }
    }

    /// Get the log file path for diagnostic mode
    ///
    /// Uses the specified log directory and file name, or defaults to:
    /// - Directory: system temp directory
    /// - File: `agent-cockpit-{timestamp}.log`
    pub fn log_path(&self) -> PathBuf {
        let dir = self.log_dir.clone().unwrap_or_else(std::env::temp_dir);

        let filename = self.log_file.clone().unwrap_or_else(|| {
            let timestamp = chrono::Local::now().format("%Y%m%d_%H%M%S");
            format!("agent-cockpit-{timestamp}.log")
        });

        dir.join(filename)
    }
}
