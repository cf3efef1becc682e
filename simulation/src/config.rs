//! Loading and rendering TOML game configuration.

use std::{fs, path::Path, path::PathBuf};

use galaxy_shooter_core::{GameConfig, InvalidConfig};
use thiserror::Error;

/// Failures raised while loading or rendering configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The configuration file could not be read.
    #[error("failed to read configuration from {}", path.display())]
    Io {
        /// File that was requested.
        path: PathBuf,
        /// Underlying I/O failure.
        #[source]
        source: std::io::Error,
    },
    /// The document is not valid TOML for a game configuration.
    #[error("failed to parse configuration toml")]
    Parse(#[from] toml::de::Error),
    /// The configuration could not be rendered as TOML.
    #[error("failed to render configuration toml")]
    Render(#[from] toml::ser::Error),
    /// The configuration parsed but cannot be simulated.
    #[error("invalid configuration: {0}")]
    Invalid(#[from] InvalidConfig),
}

/// Parses and validates a TOML document; omitted keys keep their defaults.
pub fn parse_config(contents: &str) -> Result<GameConfig, ConfigError> {
    let config: GameConfig = toml::from_str(contents)?;
    config.validate()?;
    Ok(config)
}

/// Reads, parses and validates the configuration file at `path`.
pub fn load_config(path: &Path) -> Result<GameConfig, ConfigError> {
    let contents = fs::read_to_string(path).map_err(|source| ConfigError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let config = parse_config(&contents)?;
    log::debug!("loaded configuration from {}", path.display());
    Ok(config)
}

/// Renders the configuration as a TOML document accepted by [`parse_config`].
pub fn render_config(config: &GameConfig) -> Result<String, ConfigError> {
    Ok(toml::to_string_pretty(config)?)
}
