use config::{Config, ConfigError, File};
use serde::Deserialize;
use std::path::PathBuf;

use crate::similarity::{MatchConfig, MatchError, DEFAULT_SIMILARITY_THRESHOLD};

#[derive(Debug, Deserialize)]
pub struct Server {
    pub host: String,
    pub port: u16,
}

#[derive(Debug, Deserialize)]
pub struct Database {
    pub path: String,
    /// Insert the sample feed on startup
    pub seed: bool,
}

#[derive(Debug, Deserialize)]
pub struct Matching {
    pub similarity_threshold: f64,
    pub substring_match: bool,
}

impl Matching {
    pub fn match_config(&self) -> Result<MatchConfig, MatchError> {
        MatchConfig::new(self.similarity_threshold, self.substring_match)
    }
}

#[derive(Debug, Deserialize)]
pub struct Settings {
    pub server: Server,
    pub database: Database,
    pub matching: Matching,
}

impl Settings {
    pub fn new() -> Result<Self, ConfigError> {
        let mut builder = Config::builder();

        // 1. Try to load from settings.toml (optional for deployment)
        let config_file_name = "settings.toml";

        let current_dir_path = PathBuf::from(config_file_name);
        if current_dir_path.exists() {
            builder = builder.add_source(File::from(current_dir_path).required(false));
        }

        // Check in biso-server directory (for development)
        let dev_path = PathBuf::from("biso-server").join(config_file_name);
        if dev_path.exists() {
            builder = builder.add_source(File::from(dev_path).required(false));
        }

        builder = builder
            .set_default("server.host", "0.0.0.0")?
            .set_default("server.port", 3000)?
            .set_default("database.path", "biso.db")?
            .set_default("database.seed", true)?
            .set_default("matching.similarity_threshold", DEFAULT_SIMILARITY_THRESHOLD)?
            .set_default("matching.substring_match", true)?;

        // 2. Override with environment variables (highest priority)
        if let Ok(db_path) = std::env::var("DATABASE_PATH") {
            builder = builder.set_override("database.path", db_path)?;
        }
        if let Ok(port) = std::env::var("PORT") {
            builder = builder.set_override("server.port", port)?;
        }
        if let Ok(host) = std::env::var("HOST") {
            builder = builder.set_override("server.host", host)?;
        }
        if let Ok(threshold) = std::env::var("SIMILARITY_THRESHOLD") {
            builder = builder.set_override("matching.similarity_threshold", threshold)?;
        }
        if let Ok(substring) = std::env::var("SUBSTRING_MATCH") {
            builder = builder.set_override("matching.substring_match", substring)?;
        }

        let s = builder.build()?;
        s.try_deserialize()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_matching_section_validates_threshold() {
        let matching = Matching {
            similarity_threshold: 0.7,
            substring_match: true,
        };
        assert_eq!(matching.match_config().unwrap(), MatchConfig::default());

        let matching = Matching {
            similarity_threshold: 7.0,
            substring_match: true,
        };
        assert_eq!(
            matching.match_config(),
            Err(MatchError::InvalidThreshold(7.0))
        );
    }
}
