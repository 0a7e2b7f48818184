use super::DomainArgs;
use crate::config::SamplerConfig;
use clap::{Args, ValueEnum};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use rand_distr::Zipf;
use skew_sampler::ZipfianGenerator;
use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::PathBuf;

#[derive(Copy, Clone, Debug, PartialEq, Eq, ValueEnum)]
pub enum GeneratorKind {
    /// Closed-form counter-based generator
    Ycsb,
    /// rand_distr's rejection sampler, as a reference baseline
    Rejection,
}

#[derive(Args, Debug, Clone)]
pub struct SampleArgs {
    #[command(flatten)]
    pub domain: DomainArgs,

    /// Seed for the random source
    #[arg(long)]
    pub seed: Option<u64>,

    /// Identifier written for rank 0
    #[arg(long)]
    pub base: Option<u64>,

    /// Number of samples to draw
    #[arg(long, default_value_t = 100_000)]
    pub count: u64,

    /// Grow the domain after every N samples
    #[arg(long, value_parser = clap::value_parser!(u64).range(1..))]
    pub grow_every: Option<u64>,

    /// Items added at each growth step
    #[arg(long, default_value_t = 0)]
    pub grow_by: u64,

    #[arg(long, value_enum, default_value_t = GeneratorKind::Ycsb)]
    pub generator: GeneratorKind,

    /// Output file (stdout when omitted)
    #[arg(long)]
    pub output: Option<PathBuf>,
}

/// Fully resolved sampling parameters.
#[derive(Debug, Clone, PartialEq)]
pub struct SamplePlan {
    pub items: u64,
    pub skew: f64,
    pub seed: u64,
    pub base: u64,
    pub count: u64,
    pub grow_every: Option<u64>,
    pub grow_by: u64,
}

impl SamplePlan {
    pub fn new(config: &SamplerConfig, args: &SampleArgs) -> Self {
        let (items, skew) = args.domain.resolve(config);
        Self {
            items,
            skew,
            seed: args.seed.unwrap_or(config.seed),
            base: args.base.unwrap_or(config.base),
            count: args.count,
            grow_every: args.grow_every,
            grow_by: args.grow_by,
        }
    }
}

pub fn run(config: &SamplerConfig, args: &SampleArgs) -> Result<(), Box<dyn std::error::Error>> {
    let plan = SamplePlan::new(config, args);
    tracing::info!(
        items = plan.items,
        skew = plan.skew,
        seed = plan.seed,
        count = plan.count,
        generator = ?args.generator,
        "sampling"
    );

    let mut out: Box<dyn Write> = match &args.output {
        Some(path) => Box::new(BufWriter::new(File::create(path)?)),
        None => Box::new(BufWriter::new(io::stdout().lock())),
    };

    let final_items = match args.generator {
        GeneratorKind::Ycsb => write_ycsb(&plan, &mut out)?,
        GeneratorKind::Rejection => {
            if plan.grow_every.is_some() {
                tracing::warn!("rejection generator has a fixed domain, ignoring --grow-every");
            }
            write_rejection(&plan, &mut out)?
        }
    };
    out.flush()?;

    tracing::info!(count = plan.count, items = final_items, "sampling done");
    Ok(())
}

/// Write `plan.count` identifiers from the closed-form generator, growing the
/// domain on schedule. Returns the final domain size.
pub fn write_ycsb<W: Write + ?Sized>(
    plan: &SamplePlan,
    out: &mut W,
) -> Result<u64, Box<dyn std::error::Error>> {
    let mut gen =
        ZipfianGenerator::seeded(plan.items, plan.skew, plan.seed)?.with_base(plan.base)?;
    for i in 0..plan.count {
        if let Some(every) = plan.grow_every {
            if i > 0 && i % every == 0 && plan.grow_by > 0 {
                gen.grow(plan.grow_by)?;
                tracing::debug!(
                    drawn = i,
                    items = gen.sampler().item_count(),
                    "domain grown"
                );
            }
        }
        writeln!(out, "{}", gen.next_id())?;
    }
    Ok(gen.sampler().item_count())
}

/// Write `plan.count` identifiers drawn with `rand_distr::Zipf`, shifted to
/// zero-based ranks. Returns the domain size.
pub fn write_rejection<W: Write + ?Sized>(
    plan: &SamplePlan,
    out: &mut W,
) -> Result<u64, Box<dyn std::error::Error>> {
    let dist = Zipf::new(plan.items, plan.skew)?;
    if plan.base.checked_add(plan.items - 1).is_none() {
        return Err(skew_sampler::Error::InvalidParameter(format!(
            "base {} leaves no room for {} identifiers",
            plan.base, plan.items
        ))
        .into());
    }
    let mut rng = StdRng::seed_from_u64(plan.seed);
    for _ in 0..plan.count {
        let rank = (rng.sample(dist) as u64).saturating_sub(1);
        let id = plan.base.checked_add(rank).ok_or_else(|| {
            skew_sampler::Error::InvalidParameter(format!(
                "identifier {} + {rank} overflows",
                plan.base
            ))
        })?;
        writeln!(out, "{id}")?;
    }
    Ok(plan.items)
}
