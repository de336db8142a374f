//! Inline styles and markup for the two stacked surfaces.
//!
//! Both layers fill the parent box, sit behind sibling content and ignore
//! pointer events. Both carry the opacity transition, since a cross-fade
//! moves the outgoing layer to 0 while the incoming one rises to 1. The
//! clone starts transparent.

use std::fmt::Write as _;
use std::time::Duration;

use crate::surface::SurfaceId;
use crate::types::FadeCurve;

const ELEMENT_STYLE: &str =
    "width: 100%; height: 100%; position: absolute; z-index: -2; top: 0; pointer-events: none;";

/// Inline CSS for `surface` with an optional `background` value.
pub fn surface_css(
    surface: SurfaceId,
    background: Option<&str>,
    transition: Duration,
    curve: FadeCurve,
) -> String {
    let mut css = String::from(ELEMENT_STYLE);
    let _ = write!(css, " opacity: {};", surface.initial_opacity());
    let _ = write!(
        css,
        " transition: {} opacity {}s;",
        curve.css_timing_function(),
        transition.as_secs_f64()
    );
    if let Some(background) = background {
        let _ = write!(css, " background: {background};");
    }
    css
}

/// Both surfaces as `<div>` elements, background first.
pub fn render_html(
    background: Option<&str>,
    clone: Option<&str>,
    transition: Duration,
    curve: FadeCurve,
) -> String {
    SurfaceId::ALL
        .into_iter()
        .map(|surface| {
            let style = match surface {
                SurfaceId::Background => background,
                SurfaceId::Clone => clone,
            };
            format!(
                "<div class=\"{surface}\" style=\"{}\"></div>",
                surface_css(surface, style, transition, curve)
            )
        })
        .collect::<Vec<_>>()
        .join("\n")
}
