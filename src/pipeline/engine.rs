use std::path::Path;
use std::sync::Arc;

use tracing::{debug, info};

use crate::{
    config::{Config, GlossConfig},
    dictionary::DictionaryLoader,
    error::{AssemblyError, Result},
    gloss::text_to_gloss,
    resolver::{GlossResolver, Resolution},
    video::{ClipAssembler, EncodedVideo},
};

/// Outcome of a full gloss-to-video run
#[derive(Debug, Clone)]
pub struct Translation {
    /// Uppercase tokens that were resolved
    pub gloss: Vec<String>,

    /// Clip paths and advisories from resolution
    pub resolution: Resolution,

    /// The assembled output
    pub video: EncodedVideo,
}

/// Runs the two-stage pipeline: resolve gloss tokens, then assemble clips
///
/// Stages never overlap. Resolution problems are advisory and only shrink the
/// clip list; if nothing resolves, the run fails with
/// [`AssemblyError::EmptyInput`] so callers can show a targeted message.
#[derive(Clone)]
pub struct TranslationEngine {
    resolver: GlossResolver,
    assembler: ClipAssembler,
    gloss: GlossConfig,
}

impl TranslationEngine {
    pub fn new(resolver: GlossResolver, assembler: ClipAssembler, gloss: GlossConfig) -> Self {
        Self { resolver, assembler, gloss }
    }

    /// Load the dictionary and wire the ffmpeg-backed assembler from `config`
    pub fn from_config(config: &Config) -> Result<Self> {
        config.validate()?;

        let dictionary = DictionaryLoader::load(&config.dictionary.table_path)?;
        let resolver = GlossResolver::new(
            Arc::new(dictionary),
            &config.dictionary.clip_dir,
            config.resolver.missing_phrase_policy,
        );
        let assembler = ClipAssembler::ffmpeg(config.assembler.clone());

        Ok(Self::new(resolver, assembler, config.gloss.clone()))
    }

    pub fn resolver(&self) -> &GlossResolver {
        &self.resolver
    }

    pub fn assembler(&self) -> &ClipAssembler {
        &self.assembler
    }

    /// Rule-based gloss for plain text, using the configured stopwords
    pub fn gloss_for_text(&self, text: &str) -> Vec<String> {
        text_to_gloss(text, &self.gloss.stopwords)
    }

    /// Resolve only, without touching media tools
    pub fn resolve<S: AsRef<str>>(&self, gloss: &[S]) -> Resolution {
        self.resolver.resolve(gloss)
    }

    /// Resolve `gloss` and assemble the clips into `output`
    pub async fn translate_gloss<S, P>(&self, gloss: &[S], output: P) -> Result<Translation>
    where
        S: AsRef<str>,
        P: AsRef<Path>,
    {
        let output = output.as_ref();
        let gloss: Vec<String> = gloss.iter().map(|t| t.as_ref().trim().to_uppercase()).collect();

        info!("🔤 Step 1: Resolving {} gloss token(s)...", gloss.len());
        let resolution = self.resolver.resolve(&gloss);
        debug!("Clip paths: {:?}", resolution.paths);

        if resolution.is_empty() {
            info!("   No clips resolved, nothing to assemble");
            return Err(AssemblyError::EmptyInput.into());
        }

        info!("🎬 Step 2: Assembling {} clip(s)...", resolution.paths.len());
        let video = self.assembler.assemble(&resolution.paths, output).await?;

        Ok(Translation { gloss, resolution, video })
    }

    /// Gloss plain text with [`text_to_gloss`], then translate it
    pub async fn translate_text<P: AsRef<Path>>(&self, text: &str, output: P) -> Result<Translation> {
        let gloss = self.gloss_for_text(text);
        debug!("Text gloss: {:?}", gloss);
        self.translate_gloss(&gloss, output).await
    }
}
