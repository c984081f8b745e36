//! Tuning knobs for motion classification, forcing and the infinite feed.
//!
//! Good velocity thresholds vary with the device and with the scrolling
//! technology driving the list.

use crate::error::ConfigError;

#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize, serde::Serialize))]
#[cfg_attr(feature = "serde", serde(default, rename_all = "camelCase"))]
pub struct ForceConfig {
    /// |velocity| (px/ms) at or above which any item may be rewritten unseen.
    pub fast_velocity: f64,
    /// |velocity| (px/ms) at or below which the list is settling onto an item.
    pub settle_velocity: f64,
    /// |velocity| (px/ms) at or below which the list counts as not moving.
    pub still_velocity: f64,
    /// Quiet interval without samples after which a stop is declared.
    pub quiet_window_ms: f64,
    /// Upcoming items corrected ahead of the centered one.
    pub lookahead: usize,
    /// Items appended per infinite-scroll extension.
    pub batch_size: usize,
    /// Batches appended when the page starts.
    pub initial_batches: usize,
    /// Remaining content (px) below the viewport that triggers an extension.
    pub tail_margin_px: f64,
    /// Filler items reserved per target letter when a session is armed.
    pub per_letter_buffer: usize,
    /// Draw attempts before the deck accepts a near-duplicate.
    pub draw_attempts: usize,
    /// Served words remembered by the deck.
    pub history_cap: usize,
}

impl Default for ForceConfig {
    fn default() -> Self {
        Self {
            fast_velocity: 1.0,
            settle_velocity: 0.5,
            still_velocity: 0.01,
            quiet_window_ms: 150.0,
            lookahead: 20,
            batch_size: 40,
            initial_batches: 3,
            tail_margin_px: 300.0,
            per_letter_buffer: 20,
            draw_attempts: 10,
            history_cap: 50,
        }
    }
}

impl ForceConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.settle_velocity >= self.fast_velocity {
            return Err(ConfigError::ThresholdOrder {
                lower: "settleVelocity",
                upper: "fastVelocity",
            });
        }
        if self.still_velocity < 0.0 || self.still_velocity >= self.settle_velocity {
            return Err(ConfigError::ThresholdOrder {
                lower: "stillVelocity",
                upper: "settleVelocity",
            });
        }
        if self.quiet_window_ms <= 0.0 {
            return Err(ConfigError::NonPositive("quietWindowMs"));
        }
        if self.batch_size == 0 {
            return Err(ConfigError::NonPositive("batchSize"));
        }
        if self.draw_attempts == 0 {
            return Err(ConfigError::NonPositive("drawAttempts"));
        }
        Ok(())
    }

    /// Number of filler items appended when a session is armed.
    pub fn arming_backfill(&self, target_len: usize) -> usize {
        self.batch_size
            .max(target_len.saturating_mul(self.per_letter_buffer))
    }

    #[cfg(feature = "serde_json")]
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let cfg: Self = serde_json::from_str(json).map_err(|e| ConfigError::Parse(e.to_string()))?;
        cfg.validate()?;
        Ok(cfg)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_valid() {
        assert_eq!(ForceConfig::default().validate(), Ok(()));
    }

    #[test]
    fn settle_above_fast_is_rejected() {
        let cfg = ForceConfig {
            settle_velocity: 2.0,
            ..ForceConfig::default()
        };
        assert!(matches!(
            cfg.validate(),
            Err(ConfigError::ThresholdOrder { .. })
        ));
    }

    #[test]
    fn zero_window_is_rejected() {
        let cfg = ForceConfig {
            quiet_window_ms: 0.0,
            ..ForceConfig::default()
        };
        assert_eq!(cfg.validate(), Err(ConfigError::NonPositive("quietWindowMs")));
    }

    #[test]
    fn backfill_covers_word_length() {
        let cfg = ForceConfig::default();
        assert_eq!(cfg.arming_backfill(1), 40);
        assert_eq!(cfg.arming_backfill(5), 100);
    }

    #[cfg(feature = "serde_json")]
    #[test]
    fn partial_json_keeps_defaults() {
        let cfg = ForceConfig::from_json(r#"{"fastVelocity": 1.4, "lookahead": 8}"#).unwrap();
        assert_eq!(cfg.fast_velocity, 1.4);
        assert_eq!(cfg.lookahead, 8);
        assert_eq!(cfg.batch_size, 40);
    }

    #[cfg(feature = "serde_json")]
    #[test]
    fn invalid_json_is_a_parse_error() {
        assert!(matches!(
            ForceConfig::from_json("{"),
            Err(ConfigError::Parse(_))
        ));
    }
}
