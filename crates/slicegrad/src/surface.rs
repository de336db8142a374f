use std::fmt;
use std::time::{Duration, Instant};

use serde::Serialize;

use crate::timeline::FadeEnvelope;
use crate::types::FadeCurve;

/// The two stacked layers. `Background` sits underneath `Clone`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SurfaceId {
    Background,
    Clone,
}

impl SurfaceId {
    pub const ALL: [SurfaceId; 2] = [SurfaceId::Background, SurfaceId::Clone];

    pub fn other(self) -> Self {
        match self {
            SurfaceId::Background => SurfaceId::Clone,
            SurfaceId::Clone => SurfaceId::Background,
        }
    }

    /// Opacity before anything has been written.
    pub fn initial_opacity(self) -> f32 {
        match self {
            SurfaceId::Background => 1.0,
            SurfaceId::Clone => 0.0,
        }
    }

    fn index(self) -> usize {
        match self {
            SurfaceId::Background => 0,
            SurfaceId::Clone => 1,
        }
    }
}

impl fmt::Display for SurfaceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SurfaceId::Background => f.pad("background"),
            SurfaceId::Clone => f.pad("clone"),
        }
    }
}

/// Rendering target owning both layers.
///
/// Opacity changes are fire-and-forget: implementations animate them over
/// the configured transition on their own clock.
pub trait Surfaces {
    fn set_style(&mut self, surface: SurfaceId, style: &str);
    fn set_opacity(&mut self, surface: SurfaceId, opacity: f32);
    fn set_transition(&mut self, surface: SurfaceId, duration: Duration, curve: FadeCurve);
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum SurfaceWrite {
    Style { surface: SurfaceId, style: String },
    Opacity { surface: SurfaceId, opacity: f32 },
}

#[derive(Debug, Clone)]
struct Layer {
    style: Option<String>,
    from_opacity: f32,
    target_opacity: f32,
    fade: Option<FadeEnvelope>,
    transition: Duration,
    curve: FadeCurve,
}

impl Layer {
    fn new(id: SurfaceId) -> Self {
        let opacity = id.initial_opacity();
        Self {
            style: None,
            from_opacity: opacity,
            target_opacity: opacity,
            fade: None,
            transition: Duration::ZERO,
            curve: FadeCurve::default(),
        }
    }

    fn opacity_at(&self, now: Instant) -> f32 {
        match &self.fade {
            Some(fade) => fade.blend(self.from_opacity, self.target_opacity, now),
            None => self.target_opacity,
        }
    }

    fn settle(&mut self, now: Instant) {
        if self.fade.is_some_and(|fade| fade.is_finished(now)) {
            self.fade = None;
            self.from_opacity = self.target_opacity;
        }
    }
}

/// In-memory surface pair that models the browser's opacity transition and
/// keeps a journal of every write.
#[derive(Debug, Clone)]
pub struct MemorySurfaces {
    layers: [Layer; 2],
    clock: Instant,
    journal: Vec<SurfaceWrite>,
}

impl MemorySurfaces {
    pub fn new(now: Instant) -> Self {
        Self {
            layers: [Layer::new(SurfaceId::Background), Layer::new(SurfaceId::Clone)],
            clock: now,
            journal: Vec::new(),
        }
    }

    /// Moves the internal clock; later opacity changes start fading from here.
    pub fn advance_to(&mut self, now: Instant) {
        self.clock = now;
        for layer in &mut self.layers {
            layer.settle(now);
        }
    }

    /// Whether `surface` still has an opacity fade running at the clock.
    pub fn is_fading(&self, surface: SurfaceId) -> bool {
        self.layers[surface.index()].fade.is_some()
    }

    pub fn clock(&self) -> Instant {
        self.clock
    }

    pub fn style(&self, surface: SurfaceId) -> Option<&str> {
        self.layers[surface.index()].style.as_deref()
    }

    /// Where the opacity is heading once any running fade completes.
    pub fn target_opacity(&self, surface: SurfaceId) -> f32 {
        self.layers[surface.index()].target_opacity
    }

    pub fn effective_opacity(&self, surface: SurfaceId, now: Instant) -> f32 {
        self.layers[surface.index()].opacity_at(now)
    }

    pub fn transition(&self, surface: SurfaceId) -> Duration {
        self.layers[surface.index()].transition
    }

    pub fn journal(&self) -> &[SurfaceWrite] {
        &self.journal
    }

    pub fn take_journal(&mut self) -> Vec<SurfaceWrite> {
        std::mem::take(&mut self.journal)
    }
}

impl Default for MemorySurfaces {
    fn default() -> Self {
        Self::new(Instant::now())
    }
}

impl Surfaces for MemorySurfaces {
    fn set_style(&mut self, surface: SurfaceId, style: &str) {
        self.layers[surface.index()].style = Some(style.to_string());
        self.journal.push(SurfaceWrite::Style {
            surface,
            style: style.to_string(),
        });
    }

    fn set_opacity(&mut self, surface: SurfaceId, opacity: f32) {
        let now = self.clock;
        let layer = &mut self.layers[surface.index()];
        // A fade already in flight is interrupted where it currently stands.
        layer.from_opacity = layer.opacity_at(now);
        layer.target_opacity = opacity;
        layer.fade = FadeEnvelope::new(layer.transition, layer.curve, now);
        self.journal.push(SurfaceWrite::Opacity { surface, opacity });
    }

    fn set_transition(&mut self, surface: SurfaceId, duration: Duration, curve: FadeCurve) {
        let layer = &mut self.layers[surface.index()];
        layer.transition = duration;
        layer.curve = curve;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn starts_with_background_visible() {
        let surfaces = MemorySurfaces::default();
        let now = surfaces.clock();
        assert_eq!(surfaces.effective_opacity(SurfaceId::Background, now), 1.0);
        assert_eq!(surfaces.effective_opacity(SurfaceId::Clone, now), 0.0);
        assert!(surfaces.style(SurfaceId::Background).is_none());
    }

    #[test]
    fn opacity_fades_over_transition() {
        let start = Instant::now();
        let mut surfaces = MemorySurfaces::new(start);
        surfaces.set_transition(SurfaceId::Clone, Duration::from_secs(1), FadeCurve::Linear);
        surfaces.set_opacity(SurfaceId::Clone, 1.0);

        let half = surfaces.effective_opacity(SurfaceId::Clone, start + Duration::from_millis(500));
        assert!((half - 0.5).abs() < 0.01);
        assert_eq!(
            surfaces.effective_opacity(SurfaceId::Clone, start + Duration::from_secs(2)),
            1.0
        );
        assert_eq!(surfaces.target_opacity(SurfaceId::Clone), 1.0);
    }

    #[test]
    fn interrupted_fade_resumes_from_current_level() {
        let start = Instant::now();
        let mut surfaces = MemorySurfaces::new(start);
        surfaces.set_transition(SurfaceId::Clone, Duration::from_secs(1), FadeCurve::Linear);
        surfaces.set_opacity(SurfaceId::Clone, 1.0);

        let midway = start + Duration::from_millis(500);
        surfaces.advance_to(midway);
        surfaces.set_opacity(SurfaceId::Clone, 0.0);
        let resumed = surfaces.effective_opacity(SurfaceId::Clone, midway);
        assert!((resumed - 0.5).abs() < 0.01);
    }

    #[test]
    fn finished_fades_settle_when_the_clock_advances() {
        let start = Instant::now();
        let mut surfaces = MemorySurfaces::new(start);
        surfaces.set_transition(SurfaceId::Clone, Duration::from_secs(1), FadeCurve::Linear);
        surfaces.set_opacity(SurfaceId::Clone, 1.0);

        surfaces.advance_to(start + Duration::from_millis(500));
        assert!(surfaces.is_fading(SurfaceId::Clone));

        let done = start + Duration::from_secs(1);
        surfaces.advance_to(done);
        assert!(!surfaces.is_fading(SurfaceId::Clone));
        assert_eq!(surfaces.effective_opacity(SurfaceId::Clone, done), 1.0);
    }

    #[test]
    fn without_transition_opacity_jumps() {
        let mut surfaces = MemorySurfaces::default();
        surfaces.set_opacity(SurfaceId::Background, 0.0);
        let now = surfaces.clock();
        assert_eq!(surfaces.effective_opacity(SurfaceId::Background, now), 0.0);
    }

    #[test]
    fn journal_records_writes_in_order() {
        let mut surfaces = MemorySurfaces::default();
        surfaces.set_style(SurfaceId::Clone, "red");
        surfaces.set_opacity(SurfaceId::Clone, 1.0);
        assert_eq!(
            surfaces.take_journal(),
            vec![
                SurfaceWrite::Style {
                    surface: SurfaceId::Clone,
                    style: "red".into()
                },
                SurfaceWrite::Opacity {
                    surface: SurfaceId::Clone,
                    opacity: 1.0
                },
            ]
        );
        assert!(surfaces.journal().is_empty());
    }
}
