use crate::error::{ImageTaggerError, Result};
use crate::persister::{GitIdentity, PersisterConfig};
use crate::resolver::ResolverConfig;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Name of the configuration file looked up in the working directory.
pub const CONFIG_FILE_NAME: &str = "imagetagger.toml";

/// Represents the complete configuration for image-tagger.
///
/// Contains the action inputs, the commit identity and behavior options.
#[derive(Debug, Deserialize, Serialize, Clone, Default, PartialEq)]
pub struct Config {
    #[serde(default)]
    pub inputs: InputsConfig,

    #[serde(default)]
    pub identity: GitIdentity,

    #[serde(default)]
    pub behavior: BehaviorConfig,
}

/// Action inputs that may also come from the configuration file.
///
/// Every field is optional here; required inputs are checked when the
/// configuration is turned into [Settings].
#[derive(Debug, Deserialize, Serialize, Clone, Default, PartialEq)]
pub struct InputsConfig {
    pub version_file: Option<String>,
    pub trunk_branch: Option<String>,
    pub default_trunk_version: Option<String>,
    /// Where the version record is written; defaults to `version_file`
    pub version_record: Option<String>,
}

/// Configuration for behavior customization.
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq, Default)]
pub struct BehaviorConfig {
    /// Fail the run when commit/push fail for a reason other than "nothing to commit"
    #[serde(default)]
    pub strict_git: bool,
}

/// Input values given on the command line or through `INPUT_*` variables.
///
/// Set values take precedence over the configuration file.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct InputOverrides {
    pub version_file: Option<String>,
    pub trunk_branch: Option<String>,
    pub default_trunk_version: Option<String>,
    pub version_record: Option<String>,
}

/// Validated component configs for one run
#[derive(Debug, Clone, PartialEq)]
pub struct Settings {
    pub resolver: ResolverConfig,
    pub persister: PersisterConfig,
}

impl Config {
    /// Apply command line / environment inputs on top of file values
    pub fn with_overrides(mut self, overrides: InputOverrides) -> Self {
        let inputs = &mut self.inputs;
        let pairs = [
            (&mut inputs.version_file, overrides.version_file),
            (&mut inputs.trunk_branch, overrides.trunk_branch),
            (
                &mut inputs.default_trunk_version,
                overrides.default_trunk_version,
            ),
            (&mut inputs.version_record, overrides.version_record),
        ];
        for (slot, value) in pairs {
            if let Some(value) = value.filter(|v| !v.trim().is_empty()) {
                *slot = Some(value);
            }
        }
        self
    }

    /// Validate required inputs and build the resolver and persister configs.
    ///
    /// # Returns
    /// * `Ok(Settings)` - All required inputs present
    /// * `Err(Config)` - `version-file`, `trunk-branch` or `default-trunk-version` missing
    pub fn settings(&self) -> Result<Settings> {
        let inputs = &self.inputs;
        let version_file = required(&inputs.version_file, "version-file")?;
        let trunk_branch = required(&inputs.trunk_branch, "trunk-branch")?;
        let default_trunk_version =
            required(&inputs.default_trunk_version, "default-trunk-version")?;

        let resolver = ResolverConfig::new(version_file, trunk_branch, default_trunk_version)?;

        let version_record = inputs
            .version_record
            .as_deref()
            .filter(|path| !path.trim().is_empty())
            .map(PathBuf::from)
            .unwrap_or_else(|| resolver.version_file_path.clone());

        let persister = PersisterConfig {
            version_record_path: version_record,
            identity: self.identity.clone(),
            strict_git: self.behavior.strict_git,
        };

        Ok(Settings {
            resolver,
            persister,
        })
    }
}

fn required<'a>(value: &'a Option<String>, input: &str) -> Result<&'a str> {
    value
        .as_deref()
        .filter(|v| !v.trim().is_empty())
        .ok_or_else(|| {
            ImageTaggerError::config(format!("Input required and not supplied: {}", input))
        })
}

/// Loads configuration from file or returns defaults.
///
/// Attempts to load configuration in the following order:
/// 1. Custom path provided as parameter
/// 2. `imagetagger.toml` in current directory
/// 3. `~/.config/.imagetagger.toml` in user config directory
/// 4. Default configuration if no file found
///
/// # Arguments
/// * `config_path` - Optional path to custom configuration file
///
/// # Returns
/// * `Ok(Config)` - Loaded or default configuration
/// * `Err` - If file exists but cannot be read or parsed
pub fn load_config(config_path: Option<&Path>) -> Result<Config> {
    let path = match config_path {
        Some(path) => path.to_path_buf(),
        None => match default_config_path() {
            Some(path) => path,
            None => return Ok(Config::default()),
        },
    };

    let config_str = fs::read_to_string(&path)?;
    let config: Config = toml::from_str(&config_str).map_err(|e| {
        ImageTaggerError::config(format!("cannot parse {}: {}", path.display(), e))
    })?;

    tracing::debug!("Loaded configuration from {}", path.display());
    Ok(config)
}

fn default_config_path() -> Option<PathBuf> {
    let local = Path::new(".").join(CONFIG_FILE_NAME);
    if local.exists() {
        return Some(local);
    }

    let user = dirs::config_dir()?.join(format!(".{}", CONFIG_FILE_NAME));
    user.exists().then_some(user)
}
