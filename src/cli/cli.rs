use std::path::PathBuf;

use clap::Parser;

use crate::application::data::LogLevel;

/// Interactive in-memory file tree simulator.
#[derive(Parser, Debug, Clone)]
#[command(version, about)]
pub struct Cli {
    #[clap(long, short, default_value = "warn", value_enum)]
    pub log_level: LogLevel,

    /// Settings file; when omitted, treesim.yaml in the root directory is
    /// used if it exists
    #[clap(long, short)]
    pub config: Option<PathBuf>,

    /// Run the commands in this file instead of reading stdin
    #[clap(long, short)]
    pub script: Option<PathBuf>,

    /// The directory searched for treesim.yaml
    #[clap(long, short, default_value = ".")]
    pub root: PathBuf,
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn cli_defaults() {
        let cli = Cli::try_parse_from(["treesim"]).expect("valid arguments");
        assert_eq!(cli.log_level, LogLevel::Warn);
        assert_eq!(cli.config, None);
        assert_eq!(cli.script, None);
        assert_eq!(cli.root, PathBuf::from("."));
    }

    #[test]
    fn cli_accepts_all_flags() {
        let cli = Cli::try_parse_from([
            "treesim",
            "--log-level",
            "debug",
            "--config",
            "settings.yaml",
            "-s",
            "commands.txt",
            "-r",
            "/tmp",
        ])
        .expect("valid arguments");
        assert_eq!(cli.log_level, LogLevel::Debug);
        assert_eq!(cli.config, Some(PathBuf::from("settings.yaml")));
        assert_eq!(cli.script, Some(PathBuf::from("commands.txt")));
        assert_eq!(cli.root, PathBuf::from("/tmp"));
    }

    #[test]
    fn cli_rejects_unknown_log_level() {
        assert!(Cli::try_parse_from(["treesim", "--log-level", "loud"]).is_err());
    }
}
