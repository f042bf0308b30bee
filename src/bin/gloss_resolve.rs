// Dry run: resolve a gloss against the dictionary without invoking ffmpeg

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Result;
use clap::Parser;
use tracing_subscriber::EnvFilter;

use gloss_stitch::{
    gloss::split_gloss, resolver::ResolveIssue, DictionaryLoader, GlossResolver, MissingPhrasePolicy,
};

#[derive(Parser)]
#[command(name = "gloss-resolve", version, about = "Show which clips a gloss resolves to")]
struct Cli {
    /// Dictionary CSV
    #[arg(short, long)]
    dictionary: PathBuf,

    /// Clip directory
    #[arg(short, long)]
    clips: PathBuf,

    /// Missing phrase clip handling: drop or fallback
    #[arg(long, default_value = "drop")]
    policy: MissingPhrasePolicy,

    /// Print the dictionary keys in matching order
    #[arg(long)]
    list_keys: bool,

    /// Gloss tokens
    tokens: Vec<String>,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .init();

    let dictionary = DictionaryLoader::load(&cli.dictionary)?;
    println!("📚 {} keys, longest phrase {} word(s)", dictionary.len(), dictionary.max_phrase_len());

    if cli.list_keys {
        for key in dictionary.keys() {
            println!("   {}", key);
        }
    }

    let gloss = split_gloss(&cli.tokens.join(" "));
    let resolver = GlossResolver::new(Arc::new(dictionary), cli.clips, cli.policy);
    let resolution = resolver.resolve(&gloss);

    println!("🔤 Gloss tokens: {:?}", gloss);
    for path in &resolution.paths {
        println!("   ✅ {}", path.display());
    }
    for issue in &resolution.issues {
        let marker = match issue {
            ResolveIssue::UnresolvedToken { .. } => "❓",
            ResolveIssue::MissingClipFile { .. } => "⚠️",
        };
        println!("   {} {}", marker, issue);
    }

    println!(
        "🎞️ {} clip(s) from {} token(s)",
        resolution.paths.len(),
        gloss.len()
    );
    Ok(())
}
