//! Skewed key-access sampling.
//!
//! [`ZipfianSampler`] draws ranks from a Zipfian distribution over a growable
//! domain using the closed-form inverse from Gray et al. (the YCSB generator).
//! [`ZipfianGenerator`] pairs a sampler with an owned random source and maps
//! ranks to identifiers, [`SharedSampler`] makes a sampler shareable across
//! threads, and [`fit`] checks sampled output against the theoretical curve.

mod error;
pub mod fit;
mod generator;
mod sampler;
mod shared;
pub mod zeta;

pub use error::{Error, Result};
pub use generator::ZipfianGenerator;
pub use sampler::{ZipfianSampler, DEFAULT_SKEW};
pub use shared::SharedSampler;
