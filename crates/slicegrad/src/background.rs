use crate::color::{ColorError, Gradient, GradientSpec};
use crate::crossfade::{Applied, CrossfadeRenderer};
use crate::stops::{background_style, compute_stops, Saturation, Stop, StopParams};
use crate::surface::Surfaces;
use crate::types::{BackgroundOptions, SliceLayout};

/// Normalized form of the last gradient value seen.
#[derive(Debug, Clone)]
struct GradientCache {
    source: GradientSpec,
    gradient: Gradient,
}

impl GradientCache {
    fn new(source: &GradientSpec) -> Result<Self, ColorError> {
        let gradient = source.normalize()?;
        tracing::debug!(?gradient, %source, "normalized gradient");
        Ok(Self {
            source: source.clone(),
            gradient,
        })
    }

    /// Normalizes `source` unless it equals the cached value. Returns whether
    /// it did.
    fn refresh(&mut self, source: &GradientSpec) -> Result<bool, ColorError> {
        if *source == self.source {
            return Ok(false);
        }
        *self = Self::new(source)?;
        Ok(true)
    }
}

/// A split gradient background for whatever layout hosts `S`.
///
/// Holds the style options, the normalized gradient (converted once per
/// distinct gradient value) and the cross-fade renderer.
pub struct SplitGradientBackground<S> {
    options: BackgroundOptions,
    cache: GradientCache,
    renderer: CrossfadeRenderer<S>,
}

impl<S: Surfaces> SplitGradientBackground<S> {
    pub fn new(options: BackgroundOptions, surfaces: S) -> Result<Self, ColorError> {
        let cache = GradientCache::new(&options.gradient)?;
        let renderer = CrossfadeRenderer::new(surfaces, options.transition_time, options.curve);
        Ok(Self {
            options,
            cache,
            renderer,
        })
    }

    pub fn options(&self) -> &BackgroundOptions {
        &self.options
    }

    pub fn gradient(&self) -> Gradient {
        self.cache.gradient
    }

    /// Replaces the style options. Takes effect on the next [`update`](Self::update).
    pub fn set_options(&mut self, options: BackgroundOptions) -> Result<(), ColorError> {
        self.cache.refresh(&options.gradient)?;
        if options.transition_time != self.options.transition_time
            || options.curve != self.options.curve
        {
            self.renderer
                .set_transition(options.transition_time, options.curve);
        }
        self.options = options;
        Ok(())
    }

    /// Swaps only the gradient.
    pub fn set_gradient(&mut self, gradient: GradientSpec) -> Result<(), ColorError> {
        let options = BackgroundOptions {
            gradient,
            ..self.options.clone()
        };
        self.set_options(options)
    }

    pub fn stops(&self, layout: &SliceLayout) -> Vec<Stop> {
        compute_stops(&self.cache.gradient, &self.stop_params(layout))
    }

    pub fn style(&self, layout: &SliceLayout) -> String {
        background_style(&self.cache.gradient, &self.stop_params(layout))
    }

    /// Recomputes the style for `layout` and hands it to the renderer.
    pub fn update(&mut self, layout: &SliceLayout) -> Applied {
        if layout.selected_slice() >= layout.num_slices() {
            tracing::warn!(
                selected = layout.selected_slice(),
                slices = layout.num_slices(),
                "selected slice is out of range; every slice will be desaturated"
            );
        }
        let style = self.style(layout);
        self.renderer.apply(&style, &layout.splits_key())
    }

    pub fn renderer(&self) -> &CrossfadeRenderer<S> {
        &self.renderer
    }

    pub fn surfaces(&self) -> &S {
        self.renderer.surfaces()
    }

    pub fn surfaces_mut(&mut self) -> &mut S {
        self.renderer.surfaces_mut()
    }

    fn stop_params<'a>(&self, layout: &'a SliceLayout) -> StopParams<'a> {
        StopParams {
            selected_slice: layout.selected_slice(),
            num_slices: layout.num_slices(),
            saturation: Saturation {
                saturated: self.options.saturated_percent,
                desaturated: self.options.desaturated_percent,
            },
            boundary_fuzziness: self.options.boundary_fuzziness,
            splits: layout.splits(),
        }
    }
}
