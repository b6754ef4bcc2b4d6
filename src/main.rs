use std::path::PathBuf;

use anyhow::{ Context, Result };
use clap::Parser;
use log::{ info, LevelFilter };

use whitted_tracer::scene::SceneDescription;
use whitted_tracer::config::{ TOMLConfig, Overrides, RenderConfig };
use whitted_tracer::parallel::render;

/// Renders a scene file to an image with a recursive ray tracer.
#[derive(Parser, Debug)]
#[clap(author, version, about)]
struct Opt {
    /// Scene to render: `.json`, or anything else for the text format
    #[clap(long, default_value = "scene.txt")]
    scene: PathBuf,

    /// TOML file with camera, output and thread settings
    #[clap(long)]
    config: Option<PathBuf>,

    /// Output image; the extension picks the format (bmp, png, ppm)
    #[clap(short, long)]
    output: Option<PathBuf>,

    /// Worker threads [default: number of CPUs]
    #[clap(short = 'j', long)]
    threads: Option<usize>,

    /// Reflection depth [default: the scene's]
    #[clap(long)]
    depth: Option<usize>,

    /// Image width in pixels [default: the scene's]
    #[clap(long)]
    width: Option<usize>,

    /// Image height in pixels [default: the scene's]
    #[clap(long)]
    height: Option<usize>,

    /// One of error, warn, info, debug, trace
    #[clap(long, default_value = "info")]
    log_level: String,

    /// Load and validate everything, but don't render
    #[clap(long)]
    dry_run: bool,
}

fn parse_log_level(level: &str, default: LevelFilter) -> LevelFilter {
    match level.to_lowercase().as_str() {
        "off" => LevelFilter::Off,
        "error" => LevelFilter::Error,
        "warn" => LevelFilter::Warn,
        "info" => LevelFilter::Info,
        "debug" => LevelFilter::Debug,
        "trace" => LevelFilter::Trace,
        _ => default,
    }
}

fn main() -> Result<()> {
    let opt = Opt::parse();

    env_logger::Builder::from_default_env()
        .filter_level(parse_log_level(&opt.log_level, LevelFilter::Info))
        .init();

    let scene = SceneDescription::load(&opt.scene)
        .with_context(|| format!("failed to load scene {:?}", opt.scene))?;
    let world = scene.build()
        .with_context(|| format!("invalid scene {:?}", opt.scene))?;

    let file = match opt.config {
        Some(ref path) => TOMLConfig::load(path)
            .with_context(|| format!("failed to read config {:?}", path))?,
        None => Default::default(),
    };

    let overrides = Overrides {
        output: opt.output,
        threads: opt.threads,
        reflection_depth: opt.depth,
        width: opt.width,
        height: opt.height,
    };
    let config = RenderConfig::resolve(&file, &overrides, &scene);
    let plane = config.image_plane().context("invalid camera")?;

    if opt.dry_run {
        info!("Dry run: would render {}x{} at depth {} to {:?}",
            config.width, config.height, config.reflection_depth,
            config.output);
        return Ok(());
    }

    let canvas = render(&world, &plane, config.reflection_depth,
        config.threads);

    canvas.save(&config.output)
        .with_context(|| format!("failed to save {:?}", config.output))?;
    info!("Saved render to {:?}.", config.output);

    Ok(())
}

#[test]
fn log_levels() {
    assert_eq!(parse_log_level("DEBUG", LevelFilter::Info), LevelFilter::Debug);
    assert_eq!(parse_log_level("loud", LevelFilter::Warn), LevelFilter::Warn);
}
