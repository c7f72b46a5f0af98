use crate::error::{QuadtreeError, QuadtreeResult};

#[derive(Debug, Clone)]
pub struct Config {
    /// No node is split below this depth; the root is depth 0.
    pub max_depth: u32,
    /// A leaf splits once it holds more than this many objects.
    pub split_threshold: usize,
    /// An internal node collapses once its subtree holds fewer than this.
    pub merge_threshold: usize,
    /// How far past a point the root box overshoots when it grows.
    pub expand_factor: f64,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            max_depth: 6,
            split_threshold: 10,
            merge_threshold: 5,
            expand_factor: 1.3,
        }
    }
}

impl Config {
    pub fn validate(&self) -> QuadtreeResult<()> {
        if self.split_threshold == 0 {
            return Err(QuadtreeError::InvalidConfig {
                reason: "split_threshold must be at least 1",
            });
        }
        if self.merge_threshold == 0 {
            return Err(QuadtreeError::InvalidConfig {
                reason: "merge_threshold must be at least 1",
            });
        }
        if self.merge_threshold > self.split_threshold {
            return Err(QuadtreeError::InvalidConfig {
                reason: "merge_threshold must not exceed split_threshold",
            });
        }
        if !self.expand_factor.is_finite() || self.expand_factor <= 1.0 {
            return Err(QuadtreeError::InvalidConfig {
                reason: "expand_factor must be finite and greater than 1",
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_is_valid() {
        assert!(Config::default().validate().is_ok());
    }

    #[test]
    fn rejects_inverted_thresholds() {
        let config = Config {
            split_threshold: 4,
            merge_threshold: 8,
            ..Config::default()
        };
        assert!(matches!(
            config.validate(),
            Err(QuadtreeError::InvalidConfig { .. })
        ));
    }

    #[test]
    fn rejects_shrinking_expansion() {
        for factor in [1.0, 0.5, f64::NAN, f64::INFINITY] {
            let config = Config {
                expand_factor: factor,
                ..Config::default()
            };
            assert!(config.validate().is_err(), "factor {} accepted", factor);
        }
    }

    #[test]
    fn rejects_zero_merge_threshold() {
        let config = Config {
            merge_threshold: 0,
            ..Config::default()
        };
        assert!(matches!(
            config.validate(),
            Err(QuadtreeError::InvalidConfig {
                reason: "merge_threshold must be at least 1"
            })
        ));
    }

    #[test]
    fn rejects_zero_split_threshold() {
        let config = Config {
            split_threshold: 0,
            merge_threshold: 0,
            ..Config::default()
        };
        assert!(config.validate().is_err());
    }
}
