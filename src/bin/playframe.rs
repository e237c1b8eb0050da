use std::path::{Path, PathBuf};

use anyhow::Context as _;
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "playframe", version)]
struct Cli {
    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Print a summary of a play file.
    Inspect(InspectArgs),
    /// Print the interpolated scene at a time as JSON.
    Sample(SampleArgs),
    /// Rewrite a play file (either schema) as `play-export-v1`.
    Convert(ConvertArgs),
}

#[derive(Parser, Debug)]
struct InspectArgs {
    /// Input play JSON.
    #[arg(long = "in")]
    in_path: PathBuf,
}

#[derive(Parser, Debug)]
struct SampleArgs {
    /// Input play JSON.
    #[arg(long = "in")]
    in_path: PathBuf,

    /// Time on the 0..=100 percent scale.
    #[arg(long)]
    at: f64,
}

#[derive(Parser, Debug)]
struct ConvertArgs {
    /// Input play JSON.
    #[arg(long = "in")]
    in_path: PathBuf,

    /// Output JSON path.
    #[arg(long)]
    out: PathBuf,
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("off")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    match cli.cmd {
        Command::Inspect(args) => cmd_inspect(args),
        Command::Sample(args) => cmd_sample(args),
        Command::Convert(args) => cmd_convert(args),
    }
}

fn load_engine(path: &Path) -> anyhow::Result<(playframe::TimelineEngine, playframe::SchemaKind)> {
    let mut engine = playframe::TimelineEngine::default();
    let schema = engine
        .import_path(path)
        .with_context(|| format!("import play '{}'", path.display()))?;
    Ok((engine, schema))
}

fn cmd_inspect(args: InspectArgs) -> anyhow::Result<()> {
    let (engine, schema) = load_engine(&args.in_path)?;
    let scene = engine.scene();
    let playback = engine.playback();

    println!("name: {}", engine.info().name);
    println!("schema: {}", schema.version());
    println!("players: {}", scene.player_count());
    for id in scene.ordered_player_ids() {
        if let Some(p) = scene.player(&id) {
            println!("  {id} @ ({}, {})", p.x, p.y);
        }
    }
    if let Some(ball) = &scene.ball {
        println!("ball: {} @ ({}, {})", ball.id, ball.x, ball.y);
    }
    let keys: Vec<String> = engine
        .keyframe_times()
        .iter()
        .map(|t| playframe::encode_percent_key(*t))
        .collect();
    println!("keyframes: {} [{}]", keys.len(), keys.join(", "));
    println!(
        "playback: time={} speed={} autoplay={} loop={}s",
        playback.time_percent,
        playback.speed_multiplier,
        playback.autoplay_enabled,
        playback.loop_seconds
    );
    Ok(())
}

fn cmd_sample(args: SampleArgs) -> anyhow::Result<()> {
    if !args.at.is_finite() {
        anyhow::bail!("--at must be a finite number");
    }
    let (engine, _) = load_engine(&args.in_path)?;
    // No keyframes: fall back to the live scene.
    let scene = engine
        .sample(playframe::clamp_percent(args.at))
        .unwrap_or_else(|| engine.scene().clone());
    let json = serde_json::to_string_pretty(&scene).context("serialize sampled scene")?;
    println!("{json}");
    Ok(())
}

fn cmd_convert(args: ConvertArgs) -> anyhow::Result<()> {
    let (engine, schema) = load_engine(&args.in_path)?;
    let json = engine.export_json()?;
    if let Some(parent) = args.out.parent() {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("create output dir '{}'", parent.display()))?;
    }
    std::fs::write(&args.out, json)
        .with_context(|| format!("write play '{}'", args.out.display()))?;
    eprintln!(
        "converted {} ({}) -> {}",
        args.in_path.display(),
        schema.version(),
        args.out.display()
    );
    Ok(())
}
