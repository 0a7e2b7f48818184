use super::DomainArgs;
use crate::config::Config;
use clap::Args;
use serde::Serialize;
use skew_sampler::fit;
use std::num::ParseIntError;
use std::path::PathBuf;

#[derive(Args, Debug, Clone)]
pub struct FitArgs {
    /// Whitespace-separated sample file, e.g. the output of `zipfgen sample`
    pub input: PathBuf,

    #[command(flatten)]
    pub domain: DomainArgs,

    /// Reject the Zipf hypothesis below this p-value
    #[arg(long)]
    pub significance: Option<f64>,

    /// Print the report as JSON
    #[arg(long)]
    pub json: bool,
}

#[derive(Debug, Clone, Serialize)]
pub struct FitReport {
    pub samples: usize,
    pub distinct: usize,
    pub item_count: u64,
    pub skew: f64,
    pub statistic: f64,
    pub p_value: f64,
    pub significance: f64,
    pub rejected: bool,
}

impl std::fmt::Display for FitReport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(
            f,
            "samples={} distinct={} items={} skew={}",
            self.samples, self.distinct, self.item_count, self.skew
        )?;
        write!(
            f,
            "KS statistic={:.6} p-value={:.6} ({} at {})",
            self.statistic,
            self.p_value,
            if self.rejected { "rejected" } else { "not rejected" },
            self.significance
        )
    }
}

/// Returns `Ok(false)` when the samples do not fit.
pub fn run(config: &Config, args: &FitArgs) -> Result<bool, Box<dyn std::error::Error>> {
    let (items, skew) = args.domain.resolve(&config.sampler);
    let significance = args.significance.unwrap_or(config.fit.significance);

    let contents = std::fs::read_to_string(&args.input)?;
    let samples = parse_samples(&contents)?;
    tracing::info!(path = %args.input.display(), samples = samples.len(), "loaded samples");

    let report = analyze(&samples, items, skew, significance)?;
    if args.json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        println!("{report}");
    }

    if report.rejected {
        tracing::warn!(p_value = report.p_value, significance, "samples do not fit the Zipf law");
    }
    Ok(!report.rejected)
}

pub fn parse_samples(contents: &str) -> Result<Vec<u64>, ParseIntError> {
    contents.split_whitespace().map(str::parse).collect()
}

pub fn analyze(
    samples: &[u64],
    item_count: u64,
    skew: f64,
    significance: f64,
) -> Result<FitReport, skew_sampler::Error> {
    if let Some(&max) = samples.iter().max() {
        if max >= item_count {
            tracing::warn!(max, item_count, "samples fall outside the expected domain");
        }
    }

    let result = fit::test_zipfian(samples, skew, item_count)?;
    Ok(FitReport {
        samples: samples.len(),
        distinct: fit::rank_frequencies(samples).len(),
        item_count,
        skew,
        statistic: result.statistic,
        p_value: result.p_value,
        significance,
        rejected: result.rejects(significance),
    })
}
