use std::time::Duration;

use crate::surface::{SurfaceId, Surfaces};
use crate::types::FadeCurve;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    /// Nothing painted yet.
    Uninitialized,
    /// A style is live; `hidden` receives the next one.
    Steady { hidden: SurfaceId },
}

/// What a call to [`CrossfadeRenderer::apply`] did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Applied {
    /// First style written straight to the background, no fade.
    Mounted,
    /// New style faded in on `shown`.
    Faded { shown: SurfaceId, rebased: bool },
    /// Same style and splits as last time.
    Unchanged,
}

/// Alternates two stacked surfaces so style changes cross-fade instead of
/// cutting.
pub struct CrossfadeRenderer<S> {
    surfaces: S,
    phase: Phase,
    last_style: String,
    last_splits: String,
}

impl<S: Surfaces> CrossfadeRenderer<S> {
    pub fn new(mut surfaces: S, transition: Duration, curve: FadeCurve) -> Self {
        for surface in SurfaceId::ALL {
            surfaces.set_transition(surface, transition, curve);
        }
        Self {
            surfaces,
            phase: Phase::Uninitialized,
            last_style: String::new(),
            last_splits: String::new(),
        }
    }

    pub fn set_transition(&mut self, transition: Duration, curve: FadeCurve) {
        for surface in SurfaceId::ALL {
            self.surfaces.set_transition(surface, transition, curve);
        }
    }

    /// Paints `style`. `splits_key` identifies the boundary geometry; when it
    /// changes the background is rewritten directly before the usual fade.
    pub fn apply(&mut self, style: &str, splits_key: &str) -> Applied {
        let hidden = match self.phase {
            Phase::Uninitialized => {
                tracing::info!(splits = splits_key, "mounting split gradient background");
                self.surfaces.set_style(SurfaceId::Background, style);
                self.remember(style, splits_key);
                self.phase = Phase::Steady {
                    hidden: SurfaceId::Clone,
                };
                return Applied::Mounted;
            }
            Phase::Steady { hidden } => hidden,
        };

        let rebased = splits_key != self.last_splits;
        if !rebased && style == self.last_style {
            return Applied::Unchanged;
        }

        if rebased {
            tracing::debug!(splits = splits_key, "split geometry changed; rewriting background");
            self.surfaces.set_style(SurfaceId::Background, style);
        }

        let visible = hidden.other();
        tracing::debug!(%hidden, %visible, "cross-fading to new style");
        self.surfaces.set_style(hidden, style);
        self.surfaces.set_opacity(hidden, 1.0);
        self.surfaces.set_opacity(visible, 0.0);

        self.remember(style, splits_key);
        self.phase = Phase::Steady { hidden: visible };
        Applied::Faded {
            shown: hidden,
            rebased,
        }
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    /// Surface currently holding the live style, if any.
    pub fn visible(&self) -> Option<SurfaceId> {
        match self.phase {
            Phase::Uninitialized => None,
            Phase::Steady { hidden } => Some(hidden.other()),
        }
    }

    pub fn surfaces(&self) -> &S {
        &self.surfaces
    }

    pub fn surfaces_mut(&mut self) -> &mut S {
        &mut self.surfaces
    }

    fn remember(&mut self, style: &str, splits_key: &str) {
        self.last_style.clear();
        self.last_style.push_str(style);
        self.last_splits.clear();
        self.last_splits.push_str(splits_key);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::surface::{MemorySurfaces, SurfaceWrite};

    fn renderer() -> CrossfadeRenderer<MemorySurfaces> {
        CrossfadeRenderer::new(
            MemorySurfaces::default(),
            Duration::from_secs(1),
            FadeCurve::Linear,
        )
    }

    #[test]
    fn phase_tracks_the_hidden_surface() {
        let mut renderer = renderer();
        assert_eq!(renderer.phase(), Phase::Uninitialized);
        assert_eq!(renderer.visible(), None);

        renderer.apply("a", "");
        assert_eq!(
            renderer.phase(),
            Phase::Steady {
                hidden: SurfaceId::Clone
            }
        );
        renderer.apply("b", "");
        assert_eq!(
            renderer.phase(),
            Phase::Steady {
                hidden: SurfaceId::Background
            }
        );
        renderer.apply("b", "");
        assert_eq!(
            renderer.phase(),
            Phase::Steady {
                hidden: SurfaceId::Background
            }
        );
    }

    #[test]
    fn first_style_is_written_without_fade() {
        let mut renderer = renderer();
        assert_eq!(renderer.apply("a", ""), Applied::Mounted);
        assert_eq!(
            renderer.surfaces().journal(),
            &[SurfaceWrite::Style {
                surface: SurfaceId::Background,
                style: "a".into()
            }]
        );
        assert_eq!(renderer.visible(), Some(SurfaceId::Background));
    }

    #[test]
    fn second_style_fades_in_on_the_clone() {
        let mut renderer = renderer();
        renderer.apply("a", "");
        renderer.surfaces_mut().take_journal();

        assert_eq!(
            renderer.apply("b", ""),
            Applied::Faded {
                shown: SurfaceId::Clone,
                rebased: false
            }
        );
        let surfaces = renderer.surfaces();
        assert_eq!(surfaces.style(SurfaceId::Clone), Some("b"));
        assert_eq!(surfaces.style(SurfaceId::Background), Some("a"));
        assert_eq!(surfaces.target_opacity(SurfaceId::Clone), 1.0);
        assert_eq!(surfaces.target_opacity(SurfaceId::Background), 0.0);
        assert_eq!(renderer.visible(), Some(SurfaceId::Clone));
    }

    #[test]
    fn successive_styles_alternate_surfaces() {
        let mut renderer = renderer();
        renderer.apply("a", "");
        let shown: Vec<_> = ["b", "c", "d"]
            .iter()
            .map(|style| match renderer.apply(style, "") {
                Applied::Faded { shown, .. } => shown,
                other => panic!("unexpected {other:?}"),
            })
            .collect();
        assert_eq!(
            shown,
            vec![SurfaceId::Clone, SurfaceId::Background, SurfaceId::Clone]
        );
        assert_eq!(renderer.surfaces().style(SurfaceId::Clone), Some("d"));
        assert_eq!(renderer.surfaces().style(SurfaceId::Background), Some("c"));
    }

    #[test]
    fn repeated_style_is_a_no_op() {
        let mut renderer = renderer();
        renderer.apply("a", "0.5");
        renderer.surfaces_mut().take_journal();
        assert_eq!(renderer.apply("a", "0.5"), Applied::Unchanged);
        assert!(renderer.surfaces().journal().is_empty());
        assert_eq!(renderer.visible(), Some(SurfaceId::Background));
    }

    #[test]
    fn split_change_rewrites_background_then_fades() {
        let mut renderer = renderer();
        renderer.apply("a", "0.5");
        renderer.surfaces_mut().take_journal();

        assert_eq!(
            renderer.apply("a", "0.6"),
            Applied::Faded {
                shown: SurfaceId::Clone,
                rebased: true
            }
        );
        let journal = renderer.surfaces().journal();
        assert_eq!(
            journal[0],
            SurfaceWrite::Style {
                surface: SurfaceId::Background,
                style: "a".into()
            }
        );
        assert_eq!(journal.len(), 4);
    }

    #[test]
    fn steady_state_has_exactly_one_visible_surface() {
        let mut renderer = renderer();
        renderer.apply("a", "");
        renderer.apply("b", "");
        renderer.apply("c", "");
        let surfaces = renderer.surfaces();
        let visible: Vec<_> = SurfaceId::ALL
            .into_iter()
            .filter(|id| surfaces.target_opacity(*id) == 1.0)
            .collect();
        assert_eq!(visible, vec![SurfaceId::Background]);
    }
}
