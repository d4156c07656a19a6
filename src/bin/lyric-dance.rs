use std::path::PathBuf;

use anyhow::Context as _;
use clap::{Parser, Subcommand};
use serde::Serialize;

use lyric_dance::{
    CpuCanvas, FrameLayers, RecordingCanvas, RenderSession, RenderSessionOpts, SongInput,
    composite_layers, detect_sections,
};

#[derive(Parser, Debug)]
#[command(name = "lyric-dance", version)]
struct Cli {
    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Print detected sections as JSON.
    Sections(SectionsArgs),
    /// Render a single frame as a PNG.
    Frame(FrameArgs),
    /// Render the whole song off-screen and print aggregated draw stats.
    Stats(StatsArgs),
}

#[derive(Parser, Debug)]
struct SectionsArgs {
    /// Input song JSON.
    #[arg(long = "in")]
    in_path: PathBuf,
}

#[derive(Parser, Debug)]
struct FrameArgs {
    /// Input song JSON.
    #[arg(long = "in")]
    in_path: PathBuf,

    /// Song time in seconds.
    #[arg(long)]
    time: f64,

    /// Output PNG path.
    #[arg(long)]
    out: PathBuf,

    /// Font file used for all text. Without one, text is skipped.
    #[arg(long)]
    font: Option<PathBuf>,

    /// Frame width in pixels.
    #[arg(long, default_value_t = 1280)]
    width: u32,

    /// Frame height in pixels.
    #[arg(long, default_value_t = 720)]
    height: u32,
}

#[derive(Parser, Debug)]
struct StatsArgs {
    /// Input song JSON.
    #[arg(long = "in")]
    in_path: PathBuf,

    /// Frames per second of song time.
    #[arg(long, default_value_t = 30.0)]
    fps: f64,

    /// Layer width in pixels.
    #[arg(long, default_value_t = 640.0)]
    width: f64,

    /// Layer height in pixels.
    #[arg(long, default_value_t = 360.0)]
    height: f64,
}

#[derive(Debug, Default, Serialize)]
#[serde(rename_all = "camelCase")]
struct StatsReport {
    frames: u64,
    draw_calls: u64,
    mean_draw_calls: f64,
    background_redraws: u64,
    max_particles: usize,
    mean_particles: f64,
    words: u64,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    match cli.cmd {
        Command::Sections(args) => cmd_sections(args),
        Command::Frame(args) => cmd_frame(args),
        Command::Stats(args) => cmd_stats(args),
    }
}

fn load_song(path: &std::path::Path) -> anyhow::Result<SongInput> {
    SongInput::from_path(path).with_context(|| format!("load song '{}'", path.display()))
}

fn cmd_sections(args: SectionsArgs) -> anyhow::Result<()> {
    let song = load_song(&args.in_path)?;
    let sections = detect_sections(
        &song.signature,
        &song.beat_grid,
        &song.lines,
        song.duration_sec,
    );
    let out = serde_json::to_string_pretty(&sections).context("serialize sections")?;
    println!("{out}");
    Ok(())
}

fn cmd_frame(args: FrameArgs) -> anyhow::Result<()> {
    let song = load_song(&args.in_path)?;
    let font = args
        .font
        .as_ref()
        .map(|p| std::fs::read(p).with_context(|| format!("read font '{}'", p.display())))
        .transpose()?;
    let mut background = CpuCanvas::new(args.width, args.height)?;
    let mut particles = CpuCanvas::new(args.width, args.height)?;
    let mut text = match font {
        Some(bytes) => CpuCanvas::with_font(args.width, args.height, bytes)?,
        None => CpuCanvas::new(args.width, args.height)?,
    };

    let mut session = RenderSession::new(song, RenderSessionOpts::default())?;
    let stats = session.render_frame_timed(
        args.time,
        None,
        &mut FrameLayers {
            background: &mut background,
            particles: &mut particles,
            text: &mut text,
        },
    );

    let layers = [
        background.render_to_rgba8(),
        particles.render_to_rgba8(),
        text.render_to_rgba8(),
    ];
    let refs: Vec<&[u8]> = layers.iter().map(Vec::as_slice).collect();
    let pixels = composite_layers(args.width, args.height, &refs)?;

    if let Some(parent) = args.out.parent() {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("create output dir '{}'", parent.display()))?;
    }
    image::save_buffer_with_format(
        &args.out,
        &pixels,
        args.width,
        args.height,
        image::ColorType::Rgba8,
        image::ImageFormat::Png,
    )
    .with_context(|| format!("write png '{}'", args.out.display()))?;

    eprintln!("wrote {} ({} draw calls)", args.out.display(), stats.draw_calls);
    Ok(())
}

fn cmd_stats(args: StatsArgs) -> anyhow::Result<()> {
    if !args.fps.is_finite() || args.fps <= 0.0 {
        anyhow::bail!("--fps must be > 0");
    }
    let song = load_song(&args.in_path)?;
    let total_frames = (song.duration_sec * args.fps).ceil() as u64;

    let mut background = RecordingCanvas::new(args.width, args.height);
    let mut particles = RecordingCanvas::new(args.width, args.height);
    let mut text = RecordingCanvas::new(args.width, args.height);
    let mut session = RenderSession::new(song, RenderSessionOpts::default())?;

    let mut report = StatsReport::default();
    let mut particle_sum = 0usize;
    for f in 0..total_frames {
        let stats = session.render_frame_timed(
            f as f64 / args.fps,
            None,
            &mut FrameLayers {
                background: &mut background,
                particles: &mut particles,
                text: &mut text,
            },
        );
        background.take();
        particles.take();
        text.take();

        report.frames += 1;
        report.draw_calls += stats.draw_calls;
        report.background_redraws += u64::from(stats.background_redrawn);
        report.max_particles = report.max_particles.max(stats.particles);
        report.words += stats.words as u64;
        particle_sum += stats.particles;
    }
    if report.frames > 0 {
        report.mean_draw_calls = report.draw_calls as f64 / report.frames as f64;
        report.mean_particles = particle_sum as f64 / report.frames as f64;
    }

    println!(
        "{}",
        serde_json::to_string_pretty(&report).context("serialize stats")?
    );
    Ok(())
}
