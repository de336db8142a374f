//! Split gradient backgrounds with cross-faded slice highlighting.
//!
//! A horizontal hue/lightness gradient is cut into slices. The selected slice
//! is drawn saturated, the rest desaturated, and each boundary gets a soft
//! band. Whenever the selection, the splits or the style change, the new
//! gradient fades in over the old one:
//!
//! ```text
//!   SliceLayout + BackgroundOptions
//!          │
//!          ▼
//!   compute_stops ──▶ describe ──▶ "linear-gradient(to right, hsl(..) p%, ..)"
//!                                        │
//!                                        ▼
//!                       CrossfadeRenderer::apply ──▶ Surfaces (background / clone)
//! ```
//!
//! `SplitGradientBackground` wires the pieces together. Hosts implement
//! [`Surfaces`] for whatever actually paints; [`MemorySurfaces`] models the
//! opacity transition in memory.

mod background;
mod color;
mod crossfade;
pub mod markup;
mod stops;
mod surface;
mod timeline;
mod types;

pub use background::SplitGradientBackground;
pub use color::{ColorError, Gradient, GradientSpec, HueLightness};
pub use crossfade::{Applied, CrossfadeRenderer, Phase};
pub use stops::{
    background_style, compute_stops, describe, parse_description, ParseError, Saturation, Stop,
    StopParams,
};
pub use surface::{MemorySurfaces, SurfaceId, SurfaceWrite, Surfaces};
pub use timeline::FadeEnvelope;
pub use types::{even_splits, splits_key, BackgroundOptions, FadeCurve, LayoutError, SliceLayout};
