//! Stagger offsets for animating a list of targets

/// Direction for stagger animations
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum StaggerDirection {
    /// Animate first to last
    #[default]
    Forward,
    /// Animate last to first
    Reverse,
    /// Animate from center outward
    FromCenter,
}

/// Per-target start offsets
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct StaggerConfig {
    /// Delay between each target's start (ms)
    pub each_ms: f64,
    pub direction: StaggerDirection,
    /// Optional: stop growing the offset after N items
    pub limit: Option<usize>,
}

impl StaggerConfig {
    pub fn new(each_ms: f64) -> Self {
        Self {
            each_ms: each_ms.max(0.0),
            ..Self::default()
        }
    }

    /// Stagger from last to first
    pub fn reverse(mut self) -> Self {
        self.direction = StaggerDirection::Reverse;
        self
    }

    /// Stagger from center outward
    pub fn from_center(mut self) -> Self {
        self.direction = StaggerDirection::FromCenter;
        self
    }

    pub fn limit(mut self, n: usize) -> Self {
        self.limit = Some(n);
        self
    }

    /// Start offset for target `index` out of `total`
    pub fn delay_for_index(&self, index: usize, total: usize) -> f64 {
        let effective_index = match self.direction {
            StaggerDirection::Forward => index,
            StaggerDirection::Reverse => total.saturating_sub(1).saturating_sub(index),
            StaggerDirection::FromCenter => {
                let center = total / 2;
                center.abs_diff(index)
            }
        };

        let capped_index = match self.limit {
            Some(limit) => effective_index.min(limit),
            None => effective_index,
        };

        self.each_ms * capped_index as f64
    }

    /// Largest offset over `total` targets
    pub fn max_delay(&self, total: usize) -> f64 {
        (0..total)
            .map(|i| self.delay_for_index(i, total))
            .fold(0.0, f64::max)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_forward() {
        let config = StaggerConfig::new(50.0);
        assert_eq!(config.delay_for_index(0, 5), 0.0);
        assert_eq!(config.delay_for_index(4, 5), 200.0);
        assert_eq!(config.max_delay(5), 200.0);
    }

    #[test]
    fn test_reverse() {
        let config = StaggerConfig::new(50.0).reverse();
        assert_eq!(config.delay_for_index(0, 5), 200.0);
        assert_eq!(config.delay_for_index(4, 5), 0.0);
    }

    #[test]
    fn test_from_center() {
        let config = StaggerConfig::new(50.0).from_center();
        let delays: Vec<f64> = (0..5).map(|i| config.delay_for_index(i, 5)).collect();
        assert_eq!(delays, vec![100.0, 50.0, 0.0, 50.0, 100.0]);
    }

    #[test]
    fn test_limit_caps_offset() {
        let config = StaggerConfig::new(50.0).limit(3);
        assert_eq!(config.delay_for_index(3, 10), 150.0);
        assert_eq!(config.delay_for_index(9, 10), 150.0);
    }

    #[test]
    fn test_empty_has_no_delay() {
        assert_eq!(StaggerConfig::new(30.0).max_delay(0), 0.0);
    }
}
