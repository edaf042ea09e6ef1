use crate::app_config::SummarizationConfig;

/// Maps a document's sentence count to the number of key sentences to request.
///
/// `target = clamp(round(total * percent / 100), min, max)`, rounding half up.
/// Documents shorter than `min` still report `min`; the selector simply returns
/// fewer ids in that case.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LengthPolicy {
    percent: u32,
    min: usize,
    max: usize,
}

impl Default for LengthPolicy {
    fn default() -> Self {
        Self { percent: 15, min: 7, max: 40 }
    }
}

impl LengthPolicy {
    /// `min` is raised to at least 1 and `max` to at least `min`
    pub fn new(percent: u32, min: usize, max: usize) -> Self {
        let min = min.max(1);
        Self { percent, min, max: max.max(min) }
    }

    pub fn from_config(config: &SummarizationConfig) -> Self {
        Self::new(config.key_sentence_percent, config.min_key_sentences, config.max_key_sentences)
    }

    pub fn target(&self, total_sentences: usize) -> usize {
        let scaled = (total_sentences.saturating_mul(self.percent as usize).saturating_add(50)) / 100;
        scaled.clamp(self.min, self.max)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_target_withDefaults_shouldMatchReferencePoints() {
        let policy = LengthPolicy::default();
        assert_eq!(policy.target(0), 7);
        assert_eq!(policy.target(46), 7);
        assert_eq!(policy.target(100), 15);
        assert_eq!(policy.target(300), 40);
    }

    #[test]
    fn test_target_shouldRoundHalfUp() {
        let policy = LengthPolicy::default();
        // 0.15 * 50 = 7.5
        assert_eq!(policy.target(50), 8);
        // 0.15 * 70 = 10.5
        assert_eq!(policy.target(70), 11);
        // 0.15 * 73 = 10.95
        assert_eq!(policy.target(73), 11);
    }

    #[test]
    fn test_target_shouldBeMonotonicUpToCap() {
        let policy = LengthPolicy::default();
        let mut previous = policy.target(0);
        for total in 1..=400 {
            let current = policy.target(total);
            assert!(current >= previous, "policy({}) = {} < {}", total, current, previous);
            assert!((7..=40).contains(&current));
            previous = current;
        }
    }

    #[test]
    fn test_new_withInvertedBounds_shouldNormalize() {
        let policy = LengthPolicy::new(15, 10, 5);
        assert_eq!(policy.target(0), 10);
        assert_eq!(policy.target(1000), 10);
    }

    #[test]
    fn test_fromConfig_shouldUseConfiguredValues() {
        let config = SummarizationConfig {
            key_sentence_percent: 10,
            min_key_sentences: 3,
            max_key_sentences: 5,
            ..Default::default()
        };
        let policy = LengthPolicy::from_config(&config);
        assert_eq!(policy.target(0), 3);
        assert_eq!(policy.target(40), 4);
        assert_eq!(policy.target(1000), 5);
    }

    #[test]
    fn test_target_withHugeCount_shouldNotOverflow() {
        assert_eq!(LengthPolicy::default().target(usize::MAX), 40);
    }
}
