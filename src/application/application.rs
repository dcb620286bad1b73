use std::io::{self, Cursor, IsTerminal};
use std::path::PathBuf;

use snafu::Snafu;
use snafu::prelude::*;
use supports_color::Stream;
use tracing::{debug, info};

use crate::application::RuntimeConfig;
use crate::config::{ShellConfig, ShellConfigError};
use crate::shell::{Shell, ShellError};

pub struct Application;

impl Application {
    pub async fn run(runtime_config: impl Into<RuntimeConfig>) -> Result<(), ApplicationError> {
        let runtime_config: RuntimeConfig = runtime_config.into();
        let config = Self::load_config(&runtime_config)
            .await
            .context(ConfigSnafu)?;
        debug!("Loaded config: {:?}", config);

        let color = config.color && supports_color::on(Stream::Stdout).is_some();
        debug!("Colored listings: {}", color);

        let executed = match &runtime_config.script {
            Some(path) => {
                let script = compio::fs::read(path).await.context(ScriptSnafu {
                    file_path: path.clone(),
                })?;
                info!("Running script {}", path.display());
                Shell::new(&config, color, false, io::stdout().lock()).run(Cursor::new(script))
            }
            None => {
                let stdin = io::stdin();
                let interactive = stdin.is_terminal();
                Shell::new(&config, color, interactive, io::stdout().lock()).run(stdin.lock())
            }
        }
        .context(ShellRunSnafu)?;
        info!("Executed {} command(s)", executed);

        Ok(())
    }

    async fn load_config(runtime_config: &RuntimeConfig) -> Result<ShellConfig, ShellConfigError> {
        match &runtime_config.config {
            Some(path) => ShellConfig::from_path(path.clone()).await,
            None => ShellConfig::read_or_default(&runtime_config.root).await,
        }
    }
}

#[derive(Debug, Snafu)]
pub enum ApplicationError {
    #[snafu(display("Critical failure encountered during configuration stage"))]
    ConfigError { source: ShellConfigError },
    #[snafu(display("Failed to read the command script: {}", file_path.display()))]
    ScriptError {
        file_path: PathBuf,
        source: std::io::Error,
    },
    #[snafu(display("Critical failure encountered while running the shell"))]
    ShellRunError { source: ShellError },
}
