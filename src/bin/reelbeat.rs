use std::{
    fs::File,
    io::{BufReader, Write as _},
    path::{Path, PathBuf},
};

use anyhow::Context as _;
use clap::{Parser, Subcommand, ValueEnum};

#[derive(Parser, Debug)]
#[command(name = "reelbeat", version)]
struct Cli {
    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Parse a project JSON and check the timeline invariants.
    Validate(ValidateArgs),
    /// Print metadata for a video source (requires `ffprobe` on PATH).
    Probe(ProbeArgs),
    /// Export a project to an MP4 (requires `ffmpeg` on PATH).
    Export(ExportArgs),
    /// Extract a video's audio track as a 16-bit PCM WAV.
    ExtractAudio(ExtractAudioArgs),
}

#[derive(Parser, Debug)]
struct ValidateArgs {
    /// Input project JSON.
    #[arg(long = "in")]
    in_path: PathBuf,
}

#[derive(Parser, Debug)]
struct ProbeArgs {
    /// Input video file.
    #[arg(long = "in")]
    in_path: PathBuf,
}

#[derive(Parser, Debug)]
struct ExportArgs {
    /// Input project JSON.
    #[arg(long = "in")]
    in_path: PathBuf,

    /// A-roll video path relative to the project file, overriding the
    /// project's attached source.
    #[arg(long)]
    source: Option<String>,

    /// Output MP4 path; defaults to a timestamped name next to the input.
    #[arg(long)]
    out: Option<PathBuf>,

    /// Output aspect preset.
    #[arg(long, value_enum, default_value_t = AspectChoice::Portrait)]
    aspect: AspectChoice,

    /// Overwrite the output file if it exists.
    #[arg(long)]
    overwrite: bool,
}

#[derive(Parser, Debug)]
struct ExtractAudioArgs {
    /// Input video file.
    #[arg(long = "in")]
    in_path: PathBuf,

    /// Output WAV path.
    #[arg(long)]
    out: PathBuf,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum AspectChoice {
    Portrait,
    Landscape,
    Square,
}

impl From<AspectChoice> for reelbeat::AspectPreset {
    fn from(choice: AspectChoice) -> Self {
        match choice {
            AspectChoice::Portrait => Self::Portrait,
            AspectChoice::Landscape => Self::Landscape,
            AspectChoice::Square => Self::Square,
        }
    }
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    match cli.cmd {
        Command::Validate(args) => cmd_validate(args),
        Command::Probe(args) => cmd_probe(args),
        Command::Export(args) => cmd_export(args),
        Command::ExtractAudio(args) => cmd_extract_audio(args),
    }
}

fn read_project_json(path: &Path) -> anyhow::Result<reelbeat::Project> {
    let f = File::open(path).with_context(|| format!("open project '{}'", path.display()))?;
    let r = BufReader::new(f);
    let project: reelbeat::Project =
        serde_json::from_reader(r).with_context(|| "parse project JSON")?;
    Ok(project)
}

fn cmd_validate(args: ValidateArgs) -> anyhow::Result<()> {
    let project = read_project_json(&args.in_path)?;
    project.validate()?;
    eprintln!(
        "ok: {} beats over {:.3}s",
        project.timeline.beats.len(),
        project.timeline.duration_sec
    );
    Ok(())
}

fn cmd_probe(args: ProbeArgs) -> anyhow::Result<()> {
    let info = reelbeat::probe_video(&args.in_path)?;
    println!("path:      {}", info.source_path.display());
    println!("size:      {}x{}", info.width, info.height);
    println!("fps:       {:.3} ({}/{})", info.source_fps(), info.fps_num, info.fps_den);
    println!("duration:  {:.3}s", info.duration_sec);
    println!("audio:     {}", if info.has_audio { "yes" } else { "no" });
    Ok(())
}

fn cmd_export(args: ExportArgs) -> anyhow::Result<()> {
    let mut project = read_project_json(&args.in_path)?;
    if args.source.is_some() {
        project.source_video = args.source;
    }
    project.validate()?;

    let assets_root = args
        .in_path
        .parent()
        .unwrap_or_else(|| Path::new("."))
        .to_path_buf();
    let out_path = match args.out {
        Some(out) => out,
        None => assets_root.join(reelbeat::timestamped_output_name("reel")),
    };

    let options = reelbeat::ExportOptions {
        aspect: args.aspect.into(),
        assets_root,
    };
    let cancel = reelbeat::CancelToken::new();
    let mut on_progress = |p: reelbeat::ExportProgress| {
        match p.progress {
            Some(frac) => eprint!("\r{:?} {:>5.1}%", p.phase, frac * 100.0),
            None => eprint!("\r{:?}", p.phase),
        }
        let _ = std::io::stderr().flush();
    };

    let stats = reelbeat::export_project_to_file(
        &project,
        &options,
        &out_path,
        args.overwrite,
        &mut on_progress,
        &cancel,
    )?;
    eprintln!(
        "\nwrote {} ({} frames, {} with overlays)",
        out_path.display(),
        stats.frames_total,
        stats.frames_overlaid
    );
    Ok(())
}

fn cmd_extract_audio(args: ExtractAudioArgs) -> anyhow::Result<()> {
    let wav = reelbeat::extract_wav_from_video(&args.in_path)?;
    if let Some(parent) = args.out.parent() {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("create output dir '{}'", parent.display()))?;
    }
    std::fs::write(&args.out, &wav)
        .with_context(|| format!("write wav '{}'", args.out.display()))?;
    eprintln!("wrote {}", args.out.display());
    Ok(())
}
