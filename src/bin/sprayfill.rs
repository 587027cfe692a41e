use std::path::{Path, PathBuf};

use anyhow::Context as _;
use clap::{Parser, Subcommand, ValueEnum};
use sprayfill::{
    BandSlot, FrameRGBA, SprayConfig, SprayControl, SprayFill, VirtualScheduler, band_config,
};

#[derive(Parser, Debug)]
#[command(name = "sprayfill", version)]
struct Cli {
    /// Increase log verbosity (-v debug, -vv trace).
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Run a full sweep on a virtual clock and write the final surface as a PNG.
    Render(RenderArgs),
}

#[derive(Parser, Debug)]
struct RenderArgs {
    /// Spray configuration JSON.
    #[arg(long, conflicts_with = "preset")]
    config: Option<PathBuf>,

    /// Use one of the landing-page band presets instead of a config file.
    #[arg(long, value_enum, requires = "viewport")]
    preset: Option<PresetChoice>,

    /// Viewport width in logical pixels for `--preset`.
    #[arg(long)]
    viewport: Option<f64>,

    /// Output PNG path.
    #[arg(long)]
    out: PathBuf,

    /// Device pixel density.
    #[arg(long, default_value_t = 1.0)]
    scale: f64,

    /// Virtual frame interval in milliseconds.
    #[arg(long, default_value_t = 16.0)]
    interval_ms: f64,

    /// Also write every n-th frame into this directory.
    #[arg(long)]
    frames_dir: Option<PathBuf>,

    /// Frame stride for `--frames-dir`.
    #[arg(long, default_value_t = 1, value_parser = clap::value_parser!(u32).range(1..))]
    every: u32,

    /// Stop after this many frames even if the sweep has not finished.
    #[arg(long, default_value_t = 100_000)]
    max_frames: usize,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum PresetChoice {
    Top,
    Bottom,
}

impl From<PresetChoice> for BandSlot {
    fn from(choice: PresetChoice) -> Self {
        match choice {
            PresetChoice::Top => BandSlot::Top,
            PresetChoice::Bottom => BandSlot::Bottom,
        }
    }
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);
    match cli.cmd {
        Command::Render(args) => cmd_render(args),
    }
}

fn init_logging(verbose: u8) {
    let level = match verbose {
        0 => tracing::Level::WARN,
        1 => tracing::Level::DEBUG,
        _ => tracing::Level::TRACE,
    };
    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .init();
}

fn load_config(args: &RenderArgs) -> anyhow::Result<SprayConfig> {
    match (&args.config, args.preset, args.viewport) {
        (Some(path), _, _) => SprayConfig::from_path(path)
            .with_context(|| format!("load config '{}'", path.display())),
        (None, Some(preset), Some(viewport)) => Ok(band_config(preset.into(), viewport)),
        _ => anyhow::bail!("either --config or --preset with --viewport is required"),
    }
}

fn cmd_render(args: RenderArgs) -> anyhow::Result<()> {
    let config = load_config(&args)?;
    let mut fill = SprayFill::new(config, VirtualScheduler::new(args.interval_ms))?;
    fill.attach(args.scale)?;

    if let Some(dir) = &args.frames_dir {
        std::fs::create_dir_all(dir)
            .with_context(|| format!("create frames dir '{}'", dir.display()))?;
    }

    fill.start();
    let mut frames = 0usize;
    let mut drawn = 0usize;
    while frames < args.max_frames {
        let Some(stats) = fill.step_virtual() else {
            break;
        };
        drawn += stats.drawn;
        if let Some(dir) = &args.frames_dir
            && frames % args.every as usize == 0
            && let Some(frame) = fill.snapshot()
        {
            write_png(&dir.join(format!("frame_{frames:05}.png")), &frame)?;
        }
        frames += 1;
    }
    if fill.is_running() {
        tracing::warn!(frames, "frame limit reached before the sweep finished");
        fill.pause();
    }

    let frame = fill
        .snapshot()
        .context("surface detached before the final snapshot")?;
    write_png(&args.out, &frame)?;

    eprintln!(
        "wrote {} ({frames} frames, {drawn} droplets, {:.3}s virtual)",
        args.out.display(),
        fill.scheduler().now_ms() / 1000.0
    );
    Ok(())
}

fn write_png(path: &Path, frame: &FrameRGBA) -> anyhow::Result<()> {
    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("create output dir '{}'", parent.display()))?;
    }

    image::save_buffer_with_format(
        path,
        &frame.to_straight(),
        frame.width,
        frame.height,
        image::ColorType::Rgba8,
        image::ImageFormat::Png,
    )
    .with_context(|| format!("write png '{}'", path.display()))
}
