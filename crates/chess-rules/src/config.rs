//! Game configuration loaded from TOML.
//!
//! ```toml
//! standard = false
//!
//! [promotion]
//! white = "queen"
//! black = "knight"
//! ```

use chess_core::{Color, PieceKind};
use serde::{Deserialize, Serialize};
use std::path::Path;
use thiserror::Error;

/// Errors that can occur when loading or parsing configuration.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Failed to read the configuration file from disk.
    #[error("Failed to read config file: {0}")]
    ReadError(#[from] std::io::Error),
    /// Failed to parse the configuration file as valid TOML.
    #[error("Failed to parse config: {0}")]
    ParseError(#[from] toml::de::Error),
    /// A default promotion names a kind a pawn cannot become.
    #[error("Invalid default promotion for {color}: {kind}")]
    InvalidPromotion { color: Color, kind: PieceKind },
}

/// Kinds a pawn becomes without asking, per color.
#[derive(Debug, Deserialize, Serialize, Clone, Copy, Default, PartialEq, Eq)]
pub struct PromotionDefaults {
    #[serde(default)]
    pub white: Option<PieceKind>,
    #[serde(default)]
    pub black: Option<PieceKind>,
}

impl PromotionDefaults {
    pub fn get(&self, color: Color) -> Option<PieceKind> {
        match color {
            Color::White => self.white,
            Color::Black => self.black,
        }
    }
}

/// Settings a [`Game`](crate::Game) starts from.
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq, Eq)]
pub struct GameConfig {
    /// Standard start when true, Chess960 otherwise. Defaults to true.
    #[serde(default = "default_standard")]
    pub standard: bool,
    #[serde(default)]
    pub promotion: PromotionDefaults,
}

fn default_standard() -> bool {
    true
}

impl Default for GameConfig {
    fn default() -> Self {
        GameConfig {
            standard: default_standard(),
            promotion: PromotionDefaults::default(),
        }
    }
}

impl GameConfig {
    /// Parses a configuration from TOML text.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::ParseError`] for malformed TOML and
    /// [`ConfigError::InvalidPromotion`] for a pawn or king promotion.
    pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
        let config: GameConfig = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Loads a configuration file.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::ReadError`] if the file cannot be read, or any
    /// error of [`GameConfig::from_toml_str`].
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        Self::from_toml_str(&content)
    }

    fn validate(&self) -> Result<(), ConfigError> {
        for color in Color::ALL {
            if let Some(kind) = self.promotion.get(color) {
                if !kind.is_promotion_target() {
                    return Err(ConfigError::InvalidPromotion { color, kind });
                }
            }
        }
        Ok(())
    }
}
