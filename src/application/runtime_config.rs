use std::path::PathBuf;

use crate::cli::Cli;

#[derive(Debug, Clone)]
pub struct RuntimeConfig {
    pub config: Option<PathBuf>,
    pub script: Option<PathBuf>,
    pub root: PathBuf,
}

impl From<Cli> for RuntimeConfig {
    fn from(cli: Cli) -> Self {
        Self {
            config: cli.config,
            script: cli.script,
            root: cli.root,
        }
    }
}
