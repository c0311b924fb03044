use crate::error::{PcfError, PcfResult};
use crate::pcf::normalize::normalize_shells;
use std::sync::Mutex;

/// Destination for binned pair distances.
///
/// Pair tasks only see this trait, so tests can observe exactly which pairs
/// were deposited.
pub trait PairAccumulator: Sync {
    /// Add `weight` to `bin` for the pair `(first, partner)`.
    fn deposit(
        &self,
        first: usize,
        partner: usize,
        distance: f64,
        bin: usize,
        weight: f64,
    ) -> PcfResult<()>;
}

/// Histogram shared by every pair task of a run.
///
/// One lock guards the whole array; each deposit is a read-modify-write.
#[derive(Debug)]
pub struct SharedHistogram {
    bins: Mutex<Vec<f64>>,
    len: usize,
}

impl SharedHistogram {
    pub fn new(len: usize) -> Self {
        Self {
            bins: Mutex::new(vec![0.0; len]),
            len,
        }
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Copy of the current bin values.
    pub fn snapshot(&self) -> PcfResult<Vec<f64>> {
        let bins = self.bins.lock().map_err(|_| PcfError::LockPoisoned)?;
        Ok(bins.clone())
    }

    /// Hand the accumulated values to the normalizer. Consumes the handle, so
    /// it can only happen once every task borrowing it has finished.
    pub fn into_histogram(self, bin_width: f64) -> PcfResult<Histogram> {
        let bins = self.bins.into_inner().map_err(|_| PcfError::LockPoisoned)?;
        Ok(Histogram::new(bins, bin_width))
    }
}

impl PairAccumulator for SharedHistogram {
    fn deposit(
        &self,
        first: usize,
        partner: usize,
        distance: f64,
        bin: usize,
        weight: f64,
    ) -> PcfResult<()> {
        if bin >= self.len {
            return Err(PcfError::BinOutOfRange {
                bin,
                len: self.len,
                distance,
                first,
                partner,
            });
        }
        let mut bins = self.bins.lock().map_err(|_| PcfError::LockPoisoned)?;
        bins[bin] += weight;
        Ok(())
    }
}

/// Final, exclusively owned histogram.
#[derive(Debug, Clone)]
pub struct Histogram {
    values: Vec<f64>,
    bin_width: f64,
    normalized: bool,
}

impl Histogram {
    pub fn new(values: Vec<f64>, bin_width: f64) -> Self {
        Self {
            values,
            bin_width,
            normalized: false,
        }
    }

    pub fn values(&self) -> &[f64] {
        &self.values
    }

    pub fn is_normalized(&self) -> bool {
        self.normalized
    }

    /// Divide every bin by its shell volume and return `(radius, value)` rows.
    pub fn normalize(&mut self) -> PcfResult<Vec<(f64, f64)>> {
        if self.normalized {
            return Err(PcfError::AlreadyNormalized);
        }
        let table = normalize_shells(&self.values, self.bin_width);
        for (value, (_, normalized)) in self.values.iter_mut().zip(&table) {
            *value = *normalized;
        }
        self.normalized = true;
        Ok(table)
    }
}
