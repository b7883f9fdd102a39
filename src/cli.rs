//! CLI argument parsing.
use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Global CLI arguments shared by every subcommand.
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
pub struct Args {
    #[arg(long, default_value = ".", global = true)]
    /// Project root to analyze.
    pub project: PathBuf,

    #[arg(long, default_value_t = false, global = true)]
    /// Enable debug logging.
    pub debug: bool,

    #[arg(long, default_value_t = false, global = true)]
    /// Report every detection candidate instead of failing when the
    /// platform is ambiguous. Detection only.
    pub multi: bool,

    /// Subcommand to execute.
    #[command(subcommand)]
    pub command: Command,
}

/// Migration workflow subcommands.
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Detect the visual testing platform, framework, and language.
    Detect,

    /// Detect, then propose SmartUI rewrites for every affected file.
    Migrate,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parses_detect_with_project() {
        let args =
            Args::parse_from(["snapshift", "detect", "--project", "/tmp/app"]);
        assert!(matches!(args.command, Command::Detect));
        assert_eq!(args.project, PathBuf::from("/tmp/app"));
        assert!(!args.debug);
        assert!(!args.multi);
    }

    #[test]
    fn test_parses_migrate_defaults() {
        let args = Args::parse_from(["snapshift", "migrate"]);
        assert!(matches!(args.command, Command::Migrate));
        assert_eq!(args.project, PathBuf::from("."));
    }

    #[test]
    fn test_global_flags_after_subcommand() {
        let args = Args::parse_from([
            "snapshift", "detect", "--multi", "--debug",
        ]);
        assert!(args.multi);
        assert!(args.debug);
    }
}
