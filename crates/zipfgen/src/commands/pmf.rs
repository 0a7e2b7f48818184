use super::DomainArgs;
use crate::config::SamplerConfig;
use clap::Args;
use skew_sampler::ZipfianSampler;
use std::io::{self, Write};

#[derive(Args, Debug, Clone)]
pub struct PmfArgs {
    #[command(flatten)]
    pub domain: DomainArgs,

    /// Number of top ranks to print
    #[arg(long, default_value_t = 10)]
    pub head: u64,

    /// Also report how many top ranks cover this much probability mass
    #[arg(long)]
    pub cdf: Option<f64>,
}

pub fn run(config: &SamplerConfig, args: &PmfArgs) -> Result<(), Box<dyn std::error::Error>> {
    let (items, skew) = args.domain.resolve(config);
    let sampler = ZipfianSampler::with_skew(items, skew)?;
    let mut out = io::stdout().lock();
    write_table(&sampler, args.head, &mut out)?;

    if let Some(p) = args.cdf {
        let covering = sampler.cumulative_distribution_items(p)?;
        tracing::info!(cdf = p, items = covering, "cumulative distribution");
        writeln!(out, "# {covering} of {items} items cover {p} of the mass")?;
    }
    Ok(())
}

/// CSV of `rank,probability,cumulative` for the first `head` ranks.
pub fn write_table<W: Write + ?Sized>(
    sampler: &ZipfianSampler,
    head: u64,
    out: &mut W,
) -> Result<(), Box<dyn std::error::Error>> {
    writeln!(out, "rank,probability,cumulative")?;
    let mut cumulative = 0.0;
    for rank in 0..head.min(sampler.item_count()) {
        let p = sampler.probability(rank)?;
        cumulative += p;
        writeln!(out, "{rank},{p:.9},{cumulative:.9}")?;
    }
    Ok(())
}
