use std::time::{Duration, Instant};

use crate::types::FadeCurve;

impl FadeCurve {
    /// Eased value for linear progress `t`, clamped to `[0, 1]`.
    pub fn sample(self, t: f32) -> f32 {
        let t = t.clamp(0.0, 1.0);
        match self {
            FadeCurve::Linear => t,
            FadeCurve::Smoothstep => t * t * (3.0 - 2.0 * t),
            FadeCurve::EaseInOut if t < 0.5 => 2.0 * t * t,
            FadeCurve::EaseInOut => 1.0 - 2.0 * (1.0 - t) * (1.0 - t),
        }
    }

    /// Closest CSS `transition-timing-function` keyword.
    pub fn css_timing_function(self) -> &'static str {
        match self {
            FadeCurve::Linear => "linear",
            FadeCurve::Smoothstep => "ease",
            FadeCurve::EaseInOut => "ease-in-out",
        }
    }
}

/// An opacity change in flight, started at `start`.
#[derive(Debug, Clone, Copy)]
pub struct FadeEnvelope {
    start: Instant,
    duration: Duration,
    curve: FadeCurve,
}

impl FadeEnvelope {
    /// `None` for a zero-length transition, which is a hard cut.
    pub fn new(duration: Duration, curve: FadeCurve, now: Instant) -> Option<Self> {
        (!duration.is_zero()).then_some(Self {
            start: now,
            duration,
            curve,
        })
    }

    /// Eased progress at `now`, from 0 at the start to 1 once finished.
    pub fn progress(&self, now: Instant) -> f32 {
        let elapsed = now.saturating_duration_since(self.start);
        self.curve
            .sample(elapsed.as_secs_f32() / self.duration.as_secs_f32())
    }

    /// Value between `from` and `to` at `now`.
    pub fn blend(&self, from: f32, to: f32, now: Instant) -> f32 {
        let progress = self.progress(now);
        from * (1.0 - progress) + to * progress
    }

    pub fn is_finished(&self, now: Instant) -> bool {
        now.saturating_duration_since(self.start) >= self.duration
    }
}
