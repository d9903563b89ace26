use std::path::PathBuf;

use anyhow::Context as _;
use clap::{Args, Parser, Subcommand};

#[derive(Parser, Debug)]
#[command(name = "sketchlapse", version)]
struct Cli {
    /// Increase log verbosity (-v info, -vv debug, -vvv trace).
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Write a random sketch history JSON for testing.
    Generate(GenerateArgs),
    /// Render a history into an MP4 timelapse (requires `ffmpeg` on PATH).
    Render(RenderArgs),
    /// Render one frame of the timelapse as a PNG.
    Frame(FrameArgs),
}

#[derive(Args, Debug)]
struct GenerateArgs {
    /// Canvas width.
    #[arg(long, default_value_t = 200)]
    width: u32,

    /// Canvas height.
    #[arg(long, default_value_t = 200)]
    height: u32,

    /// Number of events to generate.
    #[arg(long, default_value_t = 500)]
    num_events: usize,

    /// Unix timestamp to start from (defaults to now).
    #[arg(long)]
    start_time: Option<i64>,

    /// Maximum seconds between consecutive events.
    #[arg(long, default_value_t = 10)]
    max_interval: u32,

    /// RNG seed for reproducible output.
    #[arg(long)]
    seed: Option<u64>,

    /// Output JSON path.
    #[arg(long, default_value = "sketch_history.json")]
    output: PathBuf,
}

#[derive(Args, Debug)]
struct VideoArgs {
    /// Video length in seconds.
    #[arg(long, default_value_t = 10)]
    duration: u32,

    /// Frames per second.
    #[arg(long, default_value_t = 30)]
    fps: u32,

    /// Output frame width.
    #[arg(long, default_value_t = 1920)]
    width: u32,

    /// Output frame height.
    #[arg(long, default_value_t = 1080)]
    height: u32,

    /// Stretch the canvas over the whole frame instead of letterboxing it.
    #[arg(long)]
    stretch: bool,
}

impl VideoArgs {
    fn to_opts(&self) -> sketchlapse::RenderOpts {
        sketchlapse::RenderOpts {
            duration_secs: self.duration,
            fps: self.fps,
            out_width: self.width,
            out_height: self.height,
            mode: if self.stretch {
                sketchlapse::FitMode::Stretch
            } else {
                sketchlapse::FitMode::Fit
            },
            ..sketchlapse::RenderOpts::default()
        }
    }
}

#[derive(Args, Debug)]
struct RenderArgs {
    /// Input history JSON.
    input: PathBuf,

    /// Output MP4 path.
    output: PathBuf,

    #[command(flatten)]
    video: VideoArgs,

    /// Fail instead of replacing an existing output file.
    #[arg(long)]
    no_overwrite: bool,
}

#[derive(Args, Debug)]
struct FrameArgs {
    /// Input history JSON.
    input: PathBuf,

    /// Output PNG path.
    output: PathBuf,

    /// Frame index (0-based).
    #[arg(long, default_value_t = 0)]
    frame: u64,

    #[command(flatten)]
    video: VideoArgs,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);
    match cli.cmd {
        Command::Generate(args) => cmd_generate(args),
        Command::Render(args) => cmd_render(args),
        Command::Frame(args) => cmd_frame(args),
    }
}

fn init_tracing(verbose: u8) {
    let level = match verbose {
        0 => tracing::Level::WARN,
        1 => tracing::Level::INFO,
        2 => tracing::Level::DEBUG,
        _ => tracing::Level::TRACE,
    };
    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn cmd_generate(args: GenerateArgs) -> anyhow::Result<()> {
    let opts = sketchlapse::GenerateOpts {
        width: args.width,
        height: args.height,
        num_events: args.num_events,
        start_time: args.start_time,
        max_interval: args.max_interval,
        seed: args.seed,
    };
    let log = sketchlapse::generate(&opts)?;
    log.write_to_path(&args.output)
        .with_context(|| format!("write history '{}'", args.output.display()))?;

    eprintln!("wrote {} ({} events)", args.output.display(), log.len());
    Ok(())
}

fn cmd_render(args: RenderArgs) -> anyhow::Result<()> {
    let log = sketchlapse::HistoryLog::from_path(&args.input)?;
    let opts = args.video.to_opts();

    let mut sink = sketchlapse::FfmpegSink::new(sketchlapse::FfmpegSinkOpts {
        out_path: args.output.clone(),
        overwrite: !args.no_overwrite,
    });
    let stats = sketchlapse::render_timelapse(&log, &opts, &mut sink)
        .with_context(|| format!("render timelapse '{}'", args.output.display()))?;

    eprintln!(
        "wrote {} ({} frames)",
        args.output.display(),
        stats.frames_written
    );
    Ok(())
}

fn cmd_frame(args: FrameArgs) -> anyhow::Result<()> {
    let log = sketchlapse::HistoryLog::from_path(&args.input)?;
    let opts = args.video.to_opts();
    let frame = sketchlapse::render_frame_at(&log, &opts, sketchlapse::FrameIndex(args.frame))?;

    sketchlapse::ensure_parent_dir(&args.output)
        .with_context(|| format!("create output dir for '{}'", args.output.display()))?;

    image::save_buffer_with_format(
        &args.output,
        &frame.data,
        frame.width,
        frame.height,
        image::ColorType::Rgb8,
        image::ImageFormat::Png,
    )
    .with_context(|| format!("write png '{}'", args.output.display()))?;

    eprintln!("wrote {}", args.output.display());
    Ok(())
}
