//! Summary statistics over trial results

/// Mean and spread of a set of per-trial average wait times
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Summary {
    pub count: usize,
    pub mean: f64,
    /// Population standard deviation (divides by `count`)
    pub std_dev: f64,
    pub min: f64,
    pub max: f64,
}

impl Summary {
    /// Summarize the samples, or `None` if there are none
    pub fn from_samples(samples: &[f64]) -> Option<Self> {
        if samples.is_empty() {
            return None;
        }

        let n = samples.len() as f64;
        let mean = samples.iter().sum::<f64>() / n;
        let variance = samples
            .iter()
            .map(|value| {
                let diff = value - mean;
                diff * diff
            })
            .sum::<f64>()
            / n;
        let min = samples.iter().copied().fold(f64::INFINITY, f64::min);
        let max = samples.iter().copied().fold(f64::NEG_INFINITY, f64::max);

        Some(Self {
            count: samples.len(),
            mean,
            std_dev: variance.sqrt(),
            min,
            max,
        })
    }

    /// Approximate 95% confidence interval of the mean (two standard errors)
    pub fn confidence_interval(&self) -> (f64, f64) {
        let half_width = 2.0 * self.std_dev / (self.count as f64).sqrt();
        (self.mean - half_width, self.mean + half_width)
    }
}
