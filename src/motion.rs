//! Velocity estimate, motion phases and the quiet-period stop detector.
//!
//! The classifier only ever looks at the two most recent samples. The stop
//! detector does not rely on cancellable timers: the host schedules a check
//! carrying the token of the sample that scheduled it, and the check only
//! proceeds if no newer sample arrived in between.

use crate::config::ForceConfig;

/// Discrete motion phase derived from |velocity|.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MotionPhase {
    /// Too fast to follow; every item may be rewritten.
    Fast,
    /// The eye can track the centered item; only look-ahead may change.
    Transitional,
    /// Decelerating onto the incoming item; final corrections are safe.
    Settling,
    /// Not moving (or the first sample).
    Still,
}

impl MotionPhase {
    /// Whether the centered item may be rewritten in this phase.
    pub fn allows_center_rewrite(self) -> bool {
        matches!(self, MotionPhase::Fast | MotionPhase::Settling)
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MotionSample {
    pub at_ms: f64,
    pub offset: f64,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MotionReading {
    /// Signed px/ms; positive means scrolling forward (toward the tail).
    pub velocity: f64,
    pub phase: MotionPhase,
}

impl MotionReading {
    /// +1 forward, -1 backward; a still list looks forward.
    pub fn direction(&self) -> i8 {
        if self.velocity < 0.0 { -1 } else { 1 }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Thresholds {
    pub fast: f64,
    pub settle: f64,
    pub still: f64,
}

impl From<&ForceConfig> for Thresholds {
    fn from(cfg: &ForceConfig) -> Self {
        Self {
            fast: cfg.fast_velocity,
            settle: cfg.settle_velocity,
            still: cfg.still_velocity,
        }
    }
}

impl Thresholds {
    pub fn classify(&self, velocity: f64) -> MotionPhase {
        let speed = velocity.abs();
        if speed >= self.fast {
            MotionPhase::Fast
        } else if speed > self.settle {
            MotionPhase::Transitional
        } else if speed > self.still {
            MotionPhase::Settling
        } else {
            MotionPhase::Still
        }
    }
}

#[derive(Debug, Clone)]
pub struct MotionClassifier {
    thresholds: Thresholds,
    last: Option<MotionSample>,
    velocity: f64,
}

impl MotionClassifier {
    pub fn new(thresholds: Thresholds) -> Self {
        Self {
            thresholds,
            last: None,
            velocity: 0.0,
        }
    }

    /// Feed one scroll-position sample. A non-advancing timestamp keeps the
    /// previous velocity.
    pub fn sample(&mut self, at_ms: f64, offset: f64) -> MotionReading {
        if let Some(prev) = self.last {
            let dt = at_ms - prev.at_ms;
            if dt > 0.0 {
                self.velocity = (offset - prev.offset) / dt;
            }
        }
        self.last = Some(MotionSample { at_ms, offset });
        self.reading()
    }

    pub fn reading(&self) -> MotionReading {
        MotionReading {
            velocity: self.velocity,
            phase: self.thresholds.classify(self.velocity),
        }
    }

    /// Forget motion after a stop so the next gesture starts from rest.
    pub fn settle(&mut self) {
        self.velocity = 0.0;
    }

    pub fn last_sample(&self) -> Option<MotionSample> {
        self.last
    }
}

/// Quiet-period stop detector.
///
/// Tokens are sample sequence numbers rather than timestamps: hosts with a
/// coarse clock can report several samples with the same time.
#[derive(Debug, Clone, Default)]
pub struct QuietWatchdog {
    seq: u64,
    latest: Option<u64>,
    fired: bool,
}

impl QuietWatchdog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a sample; returns the token the host passes back to `check`.
    pub fn touch(&mut self) -> u64 {
        self.seq = self.seq.wrapping_add(1);
        self.latest = Some(self.seq);
        self.fired = false;
        self.seq
    }

    /// A scheduled check fired. Declares a stop only if `token` still names
    /// the latest sample and that sample has not already produced a stop.
    pub fn check(&mut self, token: u64) -> bool {
        match self.latest {
            Some(latest) if latest == token && !self.fired => {
                self.fired = true;
                true
            }
            _ => false,
        }
    }

    pub fn is_quiet(&self) -> bool {
        self.fired || self.latest.is_none()
    }
}
