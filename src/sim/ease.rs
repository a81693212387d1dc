//! Easing curves for precomputed tweens

/// Easing functions mapping normalized progress to eased progress
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Ease {
    /// Quadratic ease-in/out (glare fade)
    InOutQuad,
    /// Quintic ease-in/out (sweep translation)
    InOutQuint,
}

impl Ease {
    /// Apply to progress `t`, clamped to `[0, 1]`
    pub fn apply(self, t: f64) -> f64 {
        let t = t.clamp(0.0, 1.0);
        match self {
            Self::InOutQuad => {
                if t < 0.5 {
                    2.0 * t * t
                } else {
                    1.0 - (-2.0 * t + 2.0).powi(2) / 2.0
                }
            }
            Self::InOutQuint => {
                if t < 0.5 {
                    16.0 * t.powi(5)
                } else {
                    1.0 - (-2.0 * t + 2.0).powi(5) / 2.0
                }
            }
        }
    }

    /// Sample `count` values lerped from `from` to `to` over progress `i / count`.
    ///
    /// Progress covers `[0, 1)`: the first sample is `from`, the last stops just short of `to`.
    pub fn samples(self, from: f64, to: f64, count: usize) -> Vec<f64> {
        (0..count)
            .map(|i| from + (to - from) * self.apply(i as f64 / count as f64))
            .collect()
    }
}
