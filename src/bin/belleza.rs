use std::path::{Path, PathBuf};

use clap::{Parser, Subcommand};

#[derive(Parser, Debug)]
#[command(name = "belleza", version)]
struct Cli {
    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Export every animation frame as a numbered PNG sequence.
    Frames(FramesArgs),
    /// Export the animation as an MP4 (requires `ffmpeg` on PATH).
    Video(VideoArgs),
}

#[derive(Parser, Debug)]
struct FramesArgs {
    /// Input export-job manifest JSON.
    #[arg(long = "in")]
    in_path: PathBuf,

    /// Output directory for the PNG sequence.
    #[arg(long)]
    out: PathBuf,
}

#[derive(Parser, Debug)]
struct VideoArgs {
    /// Input export-job manifest JSON.
    #[arg(long = "in")]
    in_path: PathBuf,

    /// Output MP4 path.
    #[arg(long)]
    out: PathBuf,

    /// Override the manifest's frame rate.
    #[arg(long)]
    fps: Option<u32>,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    match cli.cmd {
        Command::Frames(args) => cmd_frames(args),
        Command::Video(args) => cmd_video(args),
    }
}

fn load_job(in_path: &Path) -> anyhow::Result<(belleza::ExportManifest, belleza::LayerStack)> {
    let manifest = belleza::ExportManifest::load(in_path)?;
    let root = in_path.parent().unwrap_or_else(|| Path::new("."));
    let stack = manifest.build_stack(root)?;
    Ok((manifest, stack))
}

fn cmd_frames(args: FramesArgs) -> anyhow::Result<()> {
    let (manifest, stack) = load_job(&args.in_path)?;

    match belleza::export_image_sequence(&stack, &manifest.canvas, Some(&args.out))? {
        belleza::ExportOutcome::Completed { frames } => {
            eprintln!("wrote {} frames to {}", frames, args.out.display());
        }
        belleza::ExportOutcome::Skipped => {}
    }
    Ok(())
}

fn cmd_video(args: VideoArgs) -> anyhow::Result<()> {
    let (manifest, stack) = load_job(&args.in_path)?;

    let fps = match args.fps {
        Some(fps) => belleza::Fps::new(fps)?,
        None => manifest.fps,
    };

    if !belleza::is_ffmpeg_on_path() {
        anyhow::bail!("ffmpeg was not found on PATH; install FFmpeg to export video");
    }

    let mut encoder = belleza::FfmpegEncoder::new();
    match belleza::export_video(&stack, &manifest.canvas, fps, Some(&args.out), &mut encoder)? {
        belleza::ExportOutcome::Completed { frames } => {
            eprintln!("encoded {} frames into {}", frames, args.out.display());
        }
        belleza::ExportOutcome::Skipped => {}
    }
    Ok(())
}
