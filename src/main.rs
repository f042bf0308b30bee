use std::path::PathBuf;

use anyhow::Result;
use clap::{ArgGroup, Parser};
use tracing::info;
use tracing_subscriber::EnvFilter;

use gloss_stitch::{
    config::Config,
    error::{AssemblyError, GlossError},
    gloss::split_gloss,
    pipeline::TranslationEngine,
    resolver::MissingPhrasePolicy,
    video::FfmpegToolkit,
};

#[derive(Parser)]
#[command(
    name = "gloss-stitch",
    version,
    about = "Stitch recorded sign clips into one video for a gloss",
    long_about = "Gloss-Stitch looks up a recorded clip for every token or phrase of a sign-language gloss (longest phrase first) and concatenates the clips into a single video scaled to the first clip's resolution."
)]
#[command(group(ArgGroup::new("input").required(true).args(["text", "gloss"])))]
struct Cli {
    /// Plain text; letters are uppercased and articles dropped
    #[arg(long)]
    text: Option<String>,

    /// Gloss tokens, whitespace separated (e.g. "HELLO THANK YOU")
    #[arg(long)]
    gloss: Option<String>,

    /// Dictionary CSV (overrides the configuration)
    #[arg(short, long)]
    dictionary: Option<PathBuf>,

    /// Clip directory (overrides the configuration)
    #[arg(short, long)]
    clips: Option<PathBuf>,

    /// Output video file path
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Missing phrase clip handling: drop or fallback
    #[arg(long)]
    policy: Option<MissingPhrasePolicy>,

    /// Configuration file (optional)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    let default_level = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)),
        )
        .init();

    info!("Starting Gloss-Stitch v{}", env!("CARGO_PKG_VERSION"));

    // Load configuration
    let mut config = match &cli.config {
        Some(config_path) => {
            info!("Loading configuration from {:?}", config_path);
            Config::from_file(config_path)?
        }
        None => {
            info!("Using default configuration");
            Config::default()
        }
    };

    if let Some(dictionary) = cli.dictionary {
        config.dictionary.table_path = dictionary;
    }
    if let Some(clips) = cli.clips {
        config.dictionary.clip_dir = clips;
    }
    if let Some(policy) = cli.policy {
        config.resolver.missing_phrase_policy = policy;
    }
    let output = cli.output.unwrap_or_else(|| config.assembler.output_path.clone());

    let engine = TranslationEngine::from_config(&config)?;

    let gloss = match (&cli.text, &cli.gloss) {
        (Some(text), _) => {
            println!("📝 Transcript: {}", text);
            engine.gloss_for_text(text)
        }
        (None, Some(gloss)) => split_gloss(gloss),
        (None, None) => unreachable!("clap requires --text or --gloss"),
    };
    println!("🔤 Gloss tokens: {:?}", gloss);

    // Check FFmpeg availability
    if !FfmpegToolkit::new(&config.assembler).check_available().await {
        let err = GlossError::from(AssemblyError::ToolNotFound {
            tool: config.assembler.ffmpeg_bin.clone(),
        });
        eprintln!("Error: {}", err.user_message());
        return Err(err.into());
    }

    match engine.translate_gloss(&gloss, &output).await {
        Ok(translation) => {
            println!("🎞️ Clip paths: {:?}", translation.resolution.paths);
            println!("✅ Video at {}", translation.video.path.display());
            Ok(())
        }
        Err(e) if e.is_nothing_to_assemble() => {
            println!("❌ No clips found.");
            std::process::exit(1);
        }
        Err(e) => {
            eprintln!("Error: {}", e.user_message());
            Err(e.into())
        }
    }
}
