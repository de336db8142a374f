use std::fs;
use std::path::Path;
use std::time::{Duration, Instant};

use anyhow::{bail, Context, Result};
use gradconfig::BackgroundConfig;
use slicegrad::{
    even_splits, markup, parse_description, Applied, BackgroundOptions, MemorySurfaces,
    SliceLayout, SplitGradientBackground, Stop, SurfaceId, SurfaceWrite,
};
use tracing_subscriber::EnvFilter;

use crate::cli::{InputArgs, SimulateArgs, Step};
use crate::hit::slice_at;

pub fn initialise_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

/// Options and layout after merging the config file with CLI overrides.
pub struct Resolved {
    pub options: BackgroundOptions,
    pub layout: SliceLayout,
}

pub fn resolve(args: &InputArgs) -> Result<Resolved> {
    let config = match &args.config {
        Some(path) => load_config(path)?,
        None => BackgroundConfig::default(),
    };

    let mut options = config.options();
    if let Some(name) = &args.preset {
        options.gradient = config
            .preset(name)
            .with_context(|| format!("unknown gradient preset '{name}'"))?;
    }
    if let Some(gradient) = &args.gradient {
        options.gradient = gradient.clone();
    }
    if let Some(saturated) = args.saturated {
        options.saturated_percent = saturated;
    }
    if let Some(desaturated) = args.desaturated {
        options.desaturated_percent = desaturated;
    }
    if let Some(fuzziness) = args.fuzziness {
        options.boundary_fuzziness = fuzziness;
    }
    if let Some(seconds) = args.transition {
        if !seconds.is_finite() || seconds < 0.0 {
            bail!("--transition must be a non-negative number of seconds");
        }
        options.transition_time = Duration::from_millis((seconds * 1000.0).round() as u64);
    }
    if let Some(curve) = args.curve {
        options.curve = curve;
    }

    let num_slices = args.slices.unwrap_or(config.num_slices);
    let selected = args.select.unwrap_or(config.selected_slice);
    let splits = match &args.splits {
        Some(splits) => Some(splits.0.clone()),
        // Config splits only make sense for the slice count they were written for.
        None if num_slices == config.num_slices => config.splits.clone(),
        None => None,
    };
    let layout = SliceLayout::new(num_slices, selected, splits).context("invalid slice layout")?;

    tracing::debug!(
        slices = layout.num_slices(),
        selected = layout.selected_slice(),
        splits = %layout.splits_key(),
        gradient = %options.gradient,
        "resolved background inputs"
    );
    Ok(Resolved { options, layout })
}

fn load_config(path: &Path) -> Result<BackgroundConfig> {
    let contents = fs::read_to_string(path)
        .with_context(|| format!("failed to read config file at {}", path.display()))?;
    BackgroundConfig::from_toml_str(&contents)
        .with_context(|| format!("failed to load config file at {}", path.display()))
}

fn background(resolved: &Resolved, now: Instant) -> Result<SplitGradientBackground<MemorySurfaces>> {
    SplitGradientBackground::new(resolved.options.clone(), MemorySurfaces::new(now))
        .context("failed to normalize gradient")
}

pub fn run_style(resolved: &Resolved) -> Result<()> {
    let background = background(resolved, Instant::now())?;
    println!("{}", background.style(&resolved.layout));
    Ok(())
}

pub fn run_stops(resolved: &Resolved, json: bool) -> Result<()> {
    let background = background(resolved, Instant::now())?;
    let stops = background.stops(&resolved.layout);
    if json {
        let rendered =
            serde_json::to_string_pretty(&stops).context("failed to serialize stops to JSON")?;
        println!("{rendered}");
    } else {
        print_stops(&stops);
    }
    Ok(())
}

pub fn run_inspect(description: &str) -> Result<()> {
    let stops = parse_description(description).context("failed to parse gradient description")?;
    print_stops(&stops);
    Ok(())
}

fn print_stops(stops: &[Stop]) {
    println!(
        "{:>10} {:>10} {:>10} {:>10}",
        "position", "hue", "saturation", "lightness"
    );
    for stop in stops {
        println!(
            "{:>9.3}% {:>10.3} {:>9.3}% {:>9.3}%",
            stop.position, stop.hue, stop.saturation, stop.lightness
        );
    }
}

pub fn run_html(resolved: &Resolved) -> Result<()> {
    let mut background = background(resolved, Instant::now())?;
    background.update(&resolved.layout);
    let surfaces = background.surfaces();
    println!(
        "{}",
        markup::render_html(
            surfaces.style(SurfaceId::Background),
            surfaces.style(SurfaceId::Clone),
            resolved.options.transition_time,
            resolved.options.curve,
        )
    );
    Ok(())
}

pub fn run_pick(resolved: &Resolved, fraction: f64) -> Result<()> {
    let splits = resolved
        .layout
        .splits()
        .map(<[f64]>::to_vec)
        .unwrap_or_else(|| even_splits(resolved.layout.num_slices()));
    println!("{}", slice_at(fraction, &splits));
    Ok(())
}

pub fn run_simulate(resolved: &Resolved, args: &SimulateArgs) -> Result<()> {
    let start = Instant::now();
    let interval = Duration::from_millis(args.interval_ms);
    let sample = args
        .sample_ms
        .map(Duration::from_millis)
        .unwrap_or(resolved.options.transition_time);

    let mut background = background(resolved, start)?;
    let mut layout = resolved.layout.clone();

    let mounted = background.update(&layout);
    report_step(&mut background, 0, "initial", mounted, start + sample, sample);

    for (index, step) in args.steps.iter().enumerate() {
        let at = start + interval * (index as u32 + 1);
        background.surfaces_mut().advance_to(at);

        let label = match *step {
            Step::Select(slice) => {
                layout.select(slice);
                format!("select {slice}")
            }
            Step::MoveSplit { index, value } => {
                layout
                    .set_split(index, value)
                    .with_context(|| format!("cannot move split {index}"))?;
                format!("split {index} -> {value}")
            }
        };
        let applied = background.update(&layout);
        report_step(&mut background, index + 1, &label, applied, at + sample, sample);
    }

    Ok(())
}

fn report_step(
    background: &mut SplitGradientBackground<MemorySurfaces>,
    index: usize,
    label: &str,
    applied: Applied,
    sample_at: Instant,
    sample: Duration,
) {
    let outcome = match applied {
        Applied::Mounted => "mounted".to_string(),
        Applied::Faded { shown, rebased } if rebased => format!("rebased, fading in {shown}"),
        Applied::Faded { shown, .. } => format!("fading in {shown}"),
        Applied::Unchanged => "unchanged".to_string(),
    };
    println!("step {index}: {label} ({outcome})");

    let surfaces = background.surfaces_mut();
    for write in surfaces.take_journal() {
        match write {
            SurfaceWrite::Style { surface, style } => println!("  style   {surface:<10} {style}"),
            SurfaceWrite::Opacity { surface, opacity } => {
                println!("  opacity {surface:<10} -> {opacity}")
            }
        }
    }
    println!(
        "  at +{}ms: background={:.2} clone={:.2}",
        sample.as_millis(),
        surfaces.effective_opacity(SurfaceId::Background, sample_at),
        surfaces.effective_opacity(SurfaceId::Clone, sample_at),
    );
}
