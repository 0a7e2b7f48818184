pub mod fit;
pub mod pmf;
pub mod sample;

use crate::config::SamplerConfig;
use clap::Args;

/// Sampler parameters shared by subcommands; unset flags fall back to the
/// `[sampler]` config section.
#[derive(Args, Debug, Clone, Default)]
pub struct DomainArgs {
    /// Number of ranked items in the domain
    #[arg(long)]
    pub items: Option<u64>,

    /// Zipfian skew (theta)
    #[arg(long)]
    pub skew: Option<f64>,
}

impl DomainArgs {
    pub fn resolve(&self, config: &SamplerConfig) -> (u64, f64) {
        (
            self.items.unwrap_or(config.items),
            self.skew.unwrap_or(config.skew),
        )
    }
}
