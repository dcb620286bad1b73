use std::{
    borrow::Cow,
    path::{Path, PathBuf},
};

use compio::fs;
use hashlink::LinkedHashMap;
use saphyr::{LoadableYamlNode, Scalar, Yaml};
use snafu::prelude::*;
use tracing::{debug, info};

use crate::namespace::ListingLabels;

const CONFIG_FILE_NAME: &str = "treesim.yaml";

fn get_config_file_path(root: &Path) -> PathBuf {
    root.join(CONFIG_FILE_NAME)
}

/// Messages printed by the shell besides listings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShellLabels {
    pub listing: ListingLabels,
    pub no_parent: String,
    pub not_found: String,
    pub not_a_directory: String,
}

impl Default for ShellLabels {
    fn default() -> Self {
        Self {
            listing: ListingLabels::default(),
            no_parent: "No parent directory".into(),
            not_found: "not found".into(),
            not_a_directory: "is not a directory".into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShellConfig {
    /// Id given to the root; every later node counts up from here.
    pub first_id: u64,
    pub color: bool,
    pub prompt: String,
    pub labels: ShellLabels,
}

impl Default for ShellConfig {
    fn default() -> Self {
        Self {
            first_id: 0,
            color: true,
            prompt: "> ".into(),
            labels: ShellLabels::default(),
        }
    }
}

type Mapping<'input> = LinkedHashMap<Yaml<'input>, Yaml<'input>>;

impl ShellConfig {
    /// Reads `treesim.yaml` from `root`, falling back to defaults when the
    /// file does not exist.
    pub async fn read_or_default(root: &Path) -> Result<Self, ShellConfigError> {
        let path = get_config_file_path(root);
        if !path.exists() {
            info!("No {} found, using default settings", path.display());
            return Ok(Self::default());
        }
        Self::from_path(path).await
    }

    pub async fn from_path(path: PathBuf) -> Result<Self, ShellConfigError> {
        debug!("Reading config file: {}", path.display());
        let bytes = fs::read(&path).await.context(ReadSnafu {
            file_path: path.display().to_string(),
        })?;
        debug!("Successfully read config file: {} bytes", bytes.len());

        let contents = String::from_utf8(bytes).context(EncodingSnafu {
            file_path: path.display().to_string(),
        })?;
        contents.as_str().try_into()
    }

    fn apply_labels(&mut self, labels: &Mapping<'_>) -> Result<(), ShellConfigError> {
        let targets: [(&'static str, &mut String); 8] = [
            ("file", &mut self.labels.listing.file),
            ("directory", &mut self.labels.listing.directory),
            ("files_total", &mut self.labels.listing.files_total),
            ("directories_total", &mut self.labels.listing.directories_total),
            ("empty", &mut self.labels.listing.empty),
            ("no_parent", &mut self.labels.no_parent),
            ("not_found", &mut self.labels.not_found),
            ("not_a_directory", &mut self.labels.not_a_directory),
        ];
        for (key, target) in targets {
            if let Some(value) = lookup(labels, key) {
                *target = expect_string(value, key)?;
            }
        }
        Ok(())
    }
}

fn lookup<'a, 'input>(map: &'a Mapping<'input>, key: &'static str) -> Option<&'a Yaml<'input>> {
    map.get(&Yaml::Value(Scalar::String(Cow::Borrowed(key))))
}

fn expect_string(value: &Yaml<'_>, key: &'static str) -> Result<String, ShellConfigError> {
    value.as_str().map(str::to_string).context(InvalidValueSnafu {
        key,
        expected: "a string",
    })
}

impl TryFrom<&str> for ShellConfig {
    type Error = ShellConfigError;

    fn try_from(contents: &str) -> Result<Self, Self::Error> {
        let documents = Yaml::load_from_str(contents).context(ParseSnafu)?;
        let document = documents
            .first()
            .ok_or(ShellConfigError::MalformedConfig)?;
        let top_level = document
            .as_mapping()
            .ok_or(ShellConfigError::TopLevelNotMap)?;

        let mut config = ShellConfig::default();

        if let Some(value) = lookup(top_level, "first_id") {
            config.first_id = match value {
                Yaml::Value(Scalar::Integer(id)) => {
                    u64::try_from(*id).ok().context(NegativeFirstIdSnafu { value: *id })?
                }
                _ => {
                    return InvalidValueSnafu {
                        key: "first_id",
                        expected: "a non-negative integer",
                    }
                    .fail();
                }
            };
        }

        if let Some(value) = lookup(top_level, "color") {
            config.color = match value {
                Yaml::Value(Scalar::Boolean(color)) => *color,
                _ => {
                    return InvalidValueSnafu {
                        key: "color",
                        expected: "a boolean",
                    }
                    .fail();
                }
            };
        }

        if let Some(value) = lookup(top_level, "prompt") {
            config.prompt = expect_string(value, "prompt")?;
        }

        if let Some(value) = lookup(top_level, "labels") {
            let labels = value.as_mapping().ok_or(ShellConfigError::LabelsNotMap)?;
            config.apply_labels(labels)?;
        }

        debug!("Parsed config: {:?}", config);
        Ok(config)
    }
}

#[derive(Debug, Snafu)]
pub enum ShellConfigError {
    #[snafu(display("Failed to read the config file: {}", file_path))]
    ReadError {
        file_path: String,
        source: std::io::Error,
    },
    #[snafu(display("Config file is not valid UTF-8: {}", file_path))]
    EncodingError {
        file_path: String,
        source: std::string::FromUtf8Error,
    },
    #[snafu(display("Failed to parse the config file"))]
    ParseError { source: saphyr::ScanError },
    #[snafu(display("Improperly formatted config file"))]
    MalformedConfig,
    #[snafu(display("Top level of config should be a map"))]
    TopLevelNotMap,
    #[snafu(display("Labels section should be a map"))]
    LabelsNotMap,
    #[snafu(display("Config key '{}' should be {}", key, expected))]
    InvalidValue {
        key: &'static str,
        expected: &'static str,
    },
    #[snafu(display("first_id must not be negative, got {}", value))]
    NegativeFirstId { value: i64 },
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::*;
    use std::io::Write;
    use tempfile::{NamedTempFile, TempDir};

    #[compio::test]
    async fn config_returns_error_on_nonexistent_file() {
        let result = ShellConfig::from_path(Path::new("nonexistent.yaml").to_path_buf()).await;
        assert!(matches!(result, Err(ShellConfigError::ReadError { .. })));
    }

    #[compio::test]
    async fn config_reads_file_from_disk() {
        let mut temp_file = NamedTempFile::new().expect("Failed to create temp file");
        writeln!(temp_file, "first_id: 10\nprompt: \"$ \"").expect("Failed to write config");

        let config = ShellConfig::from_path(temp_file.path().to_path_buf())
            .await
            .expect("Failed to read config");

        assert_eq!(config.first_id, 10);
        assert_eq!(config.prompt, "$ ");
    }

    #[compio::test]
    async fn config_falls_back_to_defaults_without_file() {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");

        let config = ShellConfig::read_or_default(temp_dir.path())
            .await
            .expect("Defaults should be used");

        assert_eq!(config, ShellConfig::default());
    }

    #[compio::test]
    async fn config_reads_default_file_name_from_root() {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        std::fs::write(temp_dir.path().join(CONFIG_FILE_NAME), "color: false\n")
            .expect("Failed to write config");

        let config = ShellConfig::read_or_default(temp_dir.path())
            .await
            .expect("Failed to read config");

        assert!(!config.color);
    }

    #[test]
    fn config_parses_every_key() {
        let yaml = r#"
first_id: 5
color: false
prompt: "treesim> "
labels:
  file: "[Archivo]"
  directory: "[Directorio]"
  files_total: "Total de archivos"
  directories_total: "Total de directorios"
  empty: "Directorio vacio"
  no_parent: "No hay directorio anterior"
  not_found: "noSeEncontro"
  not_a_directory: "no es un directorio"
"#;
        let config: ShellConfig = yaml.try_into().expect("valid config");

        assert_eq!(config.first_id, 5);
        assert!(!config.color);
        assert_eq!(config.prompt, "treesim> ");
        assert_eq!(config.labels.listing.file, "[Archivo]");
        assert_eq!(config.labels.listing.directory, "[Directorio]");
        assert_eq!(config.labels.listing.files_total, "Total de archivos");
        assert_eq!(config.labels.listing.directories_total, "Total de directorios");
        assert_eq!(config.labels.listing.empty, "Directorio vacio");
        assert_eq!(config.labels.no_parent, "No hay directorio anterior");
        assert_eq!(config.labels.not_found, "noSeEncontro");
        assert_eq!(config.labels.not_a_directory, "no es un directorio");
    }

    #[test]
    fn config_keeps_defaults_for_missing_keys() {
        let config: ShellConfig = "labels:\n  empty: nothing here".try_into().expect("valid");

        assert_eq!(config.labels.listing.empty, "nothing here");
        assert_eq!(config.labels.listing.file, ListingLabels::default().file);
        assert_eq!(config.first_id, 0);
        assert!(config.color);
    }

    #[test]
    fn config_ignores_unknown_keys() {
        let config: ShellConfig = "other_config: value".try_into().expect("valid");
        assert_eq!(config, ShellConfig::default());
    }

    #[test]
    fn config_returns_error_on_invalid_yaml() {
        let result: Result<ShellConfig, _> = "invalid: yaml: content: [unclosed".try_into();
        assert!(matches!(result, Err(ShellConfigError::ParseError { .. })));
    }

    #[test]
    fn config_returns_error_on_empty_file() {
        let result: Result<ShellConfig, _> = "".try_into();
        assert!(matches!(result, Err(ShellConfigError::MalformedConfig)));
    }

    #[rstest]
    #[case("- item1\n- item2")]
    #[case("just a string")]
    fn config_returns_error_when_top_level_is_not_map(#[case] yaml: &str) {
        let result: Result<ShellConfig, _> = yaml.try_into();
        assert!(matches!(result, Err(ShellConfigError::TopLevelNotMap)));
    }

    #[test]
    fn config_returns_error_when_labels_is_not_map() {
        let result: Result<ShellConfig, _> = "labels:\n  - file".try_into();
        assert!(matches!(result, Err(ShellConfigError::LabelsNotMap)));
    }

    #[rstest]
    #[case("first_id: abc", "first_id")]
    #[case("first_id: 1.5", "first_id")]
    #[case("color: maybe", "color")]
    #[case("prompt: [a, b]", "prompt")]
    #[case("labels:\n  file: [x]", "file")]
    fn config_returns_error_on_wrong_value_type(#[case] yaml: &str, #[case] expected_key: &str) {
        let result: Result<ShellConfig, _> = yaml.try_into();
        match result {
            Err(ShellConfigError::InvalidValue { key, .. }) => assert_eq!(key, expected_key),
            other => panic!("Expected InvalidValue, got {other:?}"),
        }
    }

    #[test]
    fn config_returns_error_on_negative_first_id() {
        let result: Result<ShellConfig, _> = "first_id: -3".try_into();
        assert!(matches!(
            result,
            Err(ShellConfigError::NegativeFirstId { value: -3 })
        ));
    }

    #[test]
    fn config_error_display() {
        let error = ShellConfigError::InvalidValue {
            key: "color",
            expected: "a boolean",
        };
        assert_eq!(error.to_string(), "Config key 'color' should be a boolean");
    }
}
