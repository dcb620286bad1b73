mod shell_config;

pub use shell_config::{ShellConfig, ShellConfigError, ShellLabels};
