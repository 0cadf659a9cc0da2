// FlowLoader - batching, shuffling, iteration over a FlowDataset
//
// Flow samples have per-dataset (and, after cropping, per-sample) sizes, so
// batches are plain `Vec<Sample>`; stacking into a framework tensor is left
// to the consumer.

use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{thread_rng, SeedableRng};

use rayon::prelude::*;

use crate::dataset::{FlowDataset, Sample};
use crate::error::{DataResult, DatasetError};

/// Configuration for the FlowLoader.
#[derive(Debug, Clone)]
pub struct LoaderConfig {
    /// Number of samples per batch.
    pub batch_size: usize,
    /// Whether to shuffle indices each epoch.
    pub shuffle: bool,
    /// Whether to drop the last incomplete batch.
    pub drop_last: bool,
    /// Number of parallel workers for sample fetching (0 = sequential).
    pub num_workers: usize,
    /// Optional random seed for reproducible shuffling.
    pub seed: Option<u64>,
}

impl Default for LoaderConfig {
    fn default() -> Self {
        Self {
            batch_size: 8,
            shuffle: true,
            drop_last: false,
            num_workers: 0,
            seed: None,
        }
    }
}

impl LoaderConfig {
    pub fn batch_size(mut self, bs: usize) -> Self {
        self.batch_size = bs;
        self
    }

    pub fn shuffle(mut self, s: bool) -> Self {
        self.shuffle = s;
        self
    }

    pub fn drop_last(mut self, d: bool) -> Self {
        self.drop_last = d;
        self
    }

    pub fn num_workers(mut self, n: usize) -> Self {
        self.num_workers = n;
        self
    }

    pub fn seed(mut self, s: u64) -> Self {
        self.seed = Some(s);
        self
    }
}

/// Iterates a FlowDataset in (optionally shuffled) batches of decoded samples.
pub struct FlowLoader<'a> {
    dataset: &'a dyn FlowDataset,
    config: LoaderConfig,
    indices: Vec<usize>,
    rng: Option<StdRng>,
}

impl<'a> FlowLoader<'a> {
    /// Create a new loader over a dataset. A zero batch size is a `Config` error.
    pub fn new(dataset: &'a dyn FlowDataset, config: LoaderConfig) -> DataResult<Self> {
        if config.batch_size == 0 {
            return Err(DatasetError::Config {
                arg: "batch_size",
                value: "0".to_string(),
                allowed: vec![">= 1"],
            });
        }
        let indices: Vec<usize> = (0..dataset.len()).collect();
        let rng = config.seed.map(StdRng::seed_from_u64);
        Ok(Self {
            dataset,
            config,
            indices,
            rng,
        })
    }

    /// The number of batches per epoch.
    pub fn num_batches(&self) -> usize {
        if self.config.drop_last {
            self.dataset.len() / self.config.batch_size
        } else {
            self.dataset.len().div_ceil(self.config.batch_size)
        }
    }

    /// Total number of samples.
    pub fn len(&self) -> usize {
        self.dataset.len()
    }

    pub fn is_empty(&self) -> bool {
        self.dataset.is_empty()
    }

    /// Current epoch order.
    pub fn indices(&self) -> &[usize] {
        &self.indices
    }

    /// Reshuffle indices (call at the start of each epoch).
    ///
    /// A seeded loader draws successive epochs from one `StdRng`, so the
    /// whole sequence of epochs is reproducible.
    pub fn reshuffle(&mut self) {
        if !self.config.shuffle {
            return;
        }
        match self.rng.as_mut() {
            Some(rng) => self.indices.shuffle(rng),
            None => self.indices.shuffle(&mut thread_rng()),
        }
    }

    /// Fetch a slice of samples, optionally in parallel via rayon.
    fn fetch_samples(&self, indices: &[usize]) -> DataResult<Vec<Sample>> {
        if self.config.num_workers > 0 && indices.len() > 1 {
            indices.par_iter().map(|&i| self.dataset.get(i)).collect()
        } else {
            indices.iter().map(|&i| self.dataset.get(i)).collect()
        }
    }

    fn batch(&self, batch_idx: usize) -> Option<DataResult<Vec<Sample>>> {
        let bs = self.config.batch_size;
        let n = self.indices.len();
        let start = batch_idx * bs;
        if start >= n || (self.config.drop_last && start + bs > n) {
            return None;
        }
        let end = (start + bs).min(n);
        Some(self.fetch_samples(&self.indices[start..end]))
    }

    /// Decode every batch of one epoch.
    pub fn epoch_batches(&mut self) -> DataResult<Vec<Vec<Sample>>> {
        self.reshuffle();
        (0..self.num_batches())
            .map(|b| self.batch(b).unwrap_or_else(|| Ok(Vec::new())))
            .collect()
    }

    /// Iterate over batches one at a time (lower memory than `epoch_batches`).
    pub fn iter_batches(&mut self) -> BatchIterator<'_, 'a> {
        self.reshuffle();
        BatchIterator {
            loader: self,
            batch_idx: 0,
        }
    }
}

/// Iterator that yields one batch at a time.
pub struct BatchIterator<'l, 'a> {
    loader: &'l FlowLoader<'a>,
    batch_idx: usize,
}

impl<'l, 'a> Iterator for BatchIterator<'l, 'a> {
    type Item = DataResult<Vec<Sample>>;

    fn next(&mut self) -> Option<Self::Item> {
        let batch = self.loader.batch(self.batch_idx)?;
        self.batch_idx += 1;
        Some(batch)
    }
}
