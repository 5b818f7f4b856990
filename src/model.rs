//! Thrust data types.

use anyhow::{Result, bail};

/// Thrust measured at a single instant.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Sample {
    /// Time of the sample (s).
    pub time: f64,
    /// Thrust of the sample (N).
    pub thrust: f64,
}

impl Sample {
    pub fn new(time: f64, thrust: f64) -> Self {
        Self { time, thrust }
    }
}

/// Ordered sequence of samples with finite values and strictly increasing time.
///
/// The invariant is checked once on construction; the samples cannot be
/// mutated afterwards.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Series {
    samples: Vec<Sample>,
}

impl Series {
    /// Create a new series from samples in time order.
    ///
    /// # Errors
    /// Returns an error if any value is not finite or if time is not strictly increasing.
    pub fn new(samples: Vec<Sample>) -> Result<Self> {
        for (i_smp, smp) in samples.iter().enumerate() {
            if !smp.time.is_finite() || !smp.thrust.is_finite() {
                bail!("sample {i_smp} must have finite values, but is {smp:?}");
            }
        }
        for (i_smp, pair) in samples.windows(2).enumerate() {
            if pair[1].time <= pair[0].time {
                bail!(
                    "time must be strictly increasing, but sample {} has time {} after {}",
                    i_smp + 1,
                    pair[1].time,
                    pair[0].time
                );
            }
        }
        Ok(Self { samples })
    }

    pub fn samples(&self) -> &[Sample] {
        &self.samples
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    pub fn first(&self) -> Option<&Sample> {
        self.samples.first()
    }

    pub fn last(&self) -> Option<&Sample> {
        self.samples.last()
    }

    /// Iterate over the thrust values in time order.
    pub fn thrust(&self) -> impl Iterator<Item = f64> + '_ {
        self.samples.iter().map(|smp| smp.thrust)
    }
}

/// Sample flagged as anomalous, with its position in the original series.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Anomaly {
    /// Index of the sample in the series.
    pub index: usize,
    /// The anomalous sample.
    pub sample: Sample,
}
