use serde::Deserialize;
use std::path::Path;

/// Config file read when `--config` is not given.
pub const DEFAULT_CONFIG_PATH: &str = "zipfgen.toml";

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub sampler: SamplerConfig,
    #[serde(default)]
    pub fit: FitConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SamplerConfig {
    #[serde(default = "default_items")]
    pub items: u64,
    #[serde(default = "default_skew")]
    pub skew: f64,
    #[serde(default = "default_seed")]
    pub seed: u64,
    /// Identifier of rank 0.
    #[serde(default)]
    pub base: u64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct FitConfig {
    #[serde(default = "default_significance")]
    pub significance: f64,
}

impl Config {
    pub fn load(path: &Path) -> Result<Self, Box<dyn std::error::Error>> {
        let contents = std::fs::read_to_string(path)?;
        let config: Config = toml::from_str(&contents)?;
        Ok(config)
    }

    /// Load the explicitly requested file, or fall back to
    /// [`DEFAULT_CONFIG_PATH`] and then to built-in defaults.
    ///
    /// An explicit path that cannot be loaded is an error; a broken default
    /// file is logged and ignored.
    pub fn resolve(explicit: Option<&Path>) -> Result<Self, Box<dyn std::error::Error>> {
        if let Some(path) = explicit {
            let config = Self::load(path)?;
            tracing::info!(path = %path.display(), "loaded config");
            return Ok(config);
        }

        let path = Path::new(DEFAULT_CONFIG_PATH);
        if !path.exists() {
            tracing::info!("no {DEFAULT_CONFIG_PATH} found, using defaults");
            return Ok(Config::default());
        }
        match Self::load(path) {
            Ok(config) => {
                tracing::info!("loaded config from {DEFAULT_CONFIG_PATH}");
                Ok(config)
            }
            Err(e) => {
                tracing::error!(error = %e, "failed to load {DEFAULT_CONFIG_PATH}, using defaults");
                Ok(Config::default())
            }
        }
    }
}

impl Default for SamplerConfig {
    fn default() -> Self {
        Self {
            items: default_items(),
            skew: default_skew(),
            seed: default_seed(),
            base: 0,
        }
    }
}

impl Default for FitConfig {
    fn default() -> Self {
        Self {
            significance: default_significance(),
        }
    }
}

fn default_items() -> u64 {
    1000
}
fn default_skew() -> f64 {
    skew_sampler::DEFAULT_SKEW
}
fn default_seed() -> u64 {
    42
}
fn default_significance() -> f64 {
    0.05
}
