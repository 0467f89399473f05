use clap::Args;
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::job::TaskDescriptor;

/// Recipe for a random batch of latency and compute tasks.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Args)]
#[serde(default)]
pub struct WorkloadSpec {
    /// Number of tasks to generate
    #[clap(short = 'n', long, default_value_t = 100)]
    pub count: u64,

    /// Fraction of compute tasks in the batch, between 0 and 1
    #[clap(short = 'r', long, default_value_t = 0.0)]
    pub compute_ratio: f64,

    /// Shortest latency delay, in time units
    #[clap(long, default_value_t = 2)]
    pub min_delay: u64,

    /// Longest latency delay, in time units
    #[clap(long, default_value_t = 10)]
    pub max_delay: u64,

    /// Number of values each compute task sums
    #[clap(long, default_value_t = 10_000_000)]
    pub compute_size: u64,
}

impl Default for WorkloadSpec {
    fn default() -> Self {
        Self {
            count: 100,
            compute_ratio: 0.0,
            min_delay: 2,
            max_delay: 10,
            compute_size: 10_000_000,
        }
    }
}

impl WorkloadSpec {
    pub fn validate(&self) -> Result<()> {
        if !(0.0..=1.0).contains(&self.compute_ratio) {
            return Err(Error::InvalidWorkload("compute ratio must be within [0, 1]"));
        }
        if self.min_delay > self.max_delay {
            return Err(Error::InvalidWorkload("min delay exceeds max delay"));
        }
        Ok(())
    }

    /// Draws one descriptor per id in `0..count`; kinds and delays come from `rng`.
    pub fn generate<R: Rng>(&self, rng: &mut R) -> Result<Vec<TaskDescriptor>> {
        self.validate()?;

        let descriptors = (0..self.count)
            .map(|id| {
                if rng.random_bool(self.compute_ratio) {
                    TaskDescriptor::compute(id, self.compute_size)
                } else {
                    let delay = rng.random_range(self.min_delay..=self.max_delay);
                    TaskDescriptor::latency(id, delay as f64)
                }
            })
            .collect();
        Ok(descriptors)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::job::TaskKind;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn test_default_workload() {
        let mut rng = StdRng::seed_from_u64(1);
        let descriptors = WorkloadSpec::default().generate(&mut rng).unwrap();

        assert_eq!(descriptors.len(), 100);
        for (i, descriptor) in descriptors.iter().enumerate() {
            assert_eq!(descriptor.id, i as u64);
            match descriptor.kind {
                TaskKind::Latency { delay } => assert!((2.0..=10.0).contains(&delay)),
                TaskKind::Compute { .. } => panic!("default workload is latency only"),
            }
        }
    }

    #[test]
    fn test_compute_only() {
        let spec = WorkloadSpec {
            count: 5,
            compute_ratio: 1.0,
            compute_size: 10,
            ..Default::default()
        };
        let descriptors = spec.generate(&mut StdRng::seed_from_u64(1)).unwrap();
        assert!(descriptors
            .iter()
            .all(|d| d.kind == TaskKind::Compute { count: 10 }));
    }

    #[test]
    fn test_same_seed_same_workload() {
        let spec = WorkloadSpec {
            count: 50,
            compute_ratio: 0.5,
            ..Default::default()
        };
        let a = spec.generate(&mut StdRng::seed_from_u64(9)).unwrap();
        let b = spec.generate(&mut StdRng::seed_from_u64(9)).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_invalid_workload() {
        let spec = WorkloadSpec {
            compute_ratio: 1.5,
            ..Default::default()
        };
        assert!(matches!(
            spec.generate(&mut StdRng::seed_from_u64(1)),
            Err(Error::InvalidWorkload(_))
        ));

        let spec = WorkloadSpec {
            min_delay: 5,
            max_delay: 1,
            ..Default::default()
        };
        assert!(matches!(spec.validate(), Err(Error::InvalidWorkload(_))));
    }
}
