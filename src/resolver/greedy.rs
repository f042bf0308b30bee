use std::path::{Path, PathBuf};
use std::sync::Arc;

use tracing::{debug, info, warn};

use crate::dictionary::Dictionary;
use crate::resolver::types::{MissingPhrasePolicy, Resolution, ResolveIssue};

/// Greedy longest-match resolver from gloss tokens to clip paths
///
/// Scans left to right. At each cursor the longest multi-word key that matches
/// the upcoming tokens wins; otherwise the single token is looked up. There is
/// no backtracking: a phrase whose clip is missing still consumes its tokens
/// under [`MissingPhrasePolicy::Drop`].
#[derive(Debug, Clone)]
pub struct GlossResolver {
    dictionary: Arc<Dictionary>,
    clip_dir: PathBuf,
    policy: MissingPhrasePolicy,
}

impl GlossResolver {
    pub fn new<P: Into<PathBuf>>(
        dictionary: Arc<Dictionary>,
        clip_dir: P,
        policy: MissingPhrasePolicy,
    ) -> Self {
        Self {
            dictionary,
            clip_dir: clip_dir.into(),
            policy,
        }
    }

    pub fn dictionary(&self) -> &Dictionary {
        &self.dictionary
    }

    pub fn clip_dir(&self) -> &Path {
        &self.clip_dir
    }

    pub fn policy(&self) -> MissingPhrasePolicy {
        self.policy
    }

    /// Resolve a gloss into clip paths
    ///
    /// Never fails. Unmapped tokens and missing files are logged, recorded in
    /// [`Resolution::issues`] and produce no path.
    pub fn resolve<S: AsRef<str>>(&self, gloss: &[S]) -> Resolution {
        let tokens: Vec<String> = gloss
            .iter()
            .map(|t| t.as_ref().trim().to_uppercase())
            .collect();
        let n = tokens.len();
        let mut resolution = Resolution::default();
        let mut i = 0;

        debug!("Resolving {} gloss tokens against {} keys", n, self.dictionary.len());

        while i < n {
            if let Some((key, filename, len)) = self.dictionary.index().longest_phrase_at(&tokens, i) {
                let full = self.clip_dir.join(filename);
                if full.exists() {
                    debug!("Phrase '{}' -> {}", key, full.display());
                    resolution.paths.push(full);
                    i += len;
                    continue;
                }

                self.report(&mut resolution, ResolveIssue::MissingClipFile {
                    key: key.to_string(),
                    path: full,
                    phrase: true,
                });

                if self.policy == MissingPhrasePolicy::Drop {
                    i += len;
                    continue;
                }
            }

            self.resolve_single(&tokens[i], &mut resolution);
            i += 1;
        }

        info!(
            "Resolved {} clip(s) from {} token(s), {} issue(s)",
            resolution.paths.len(),
            n,
            resolution.issues.len()
        );
        resolution
    }

    fn resolve_single(&self, token: &str, resolution: &mut Resolution) {
        match self.dictionary.get(token) {
            Some(filename) => {
                let full = self.clip_dir.join(filename);
                if full.exists() {
                    debug!("Token '{}' -> {}", token, full.display());
                    resolution.paths.push(full);
                } else {
                    self.report(resolution, ResolveIssue::MissingClipFile {
                        key: token.to_string(),
                        path: full,
                        phrase: false,
                    });
                }
            }
            None => self.report(resolution, ResolveIssue::UnresolvedToken {
                token: token.to_string(),
            }),
        }
    }

    fn report(&self, resolution: &mut Resolution, issue: ResolveIssue) {
        warn!("{}", issue);
        resolution.issues.push(issue);
    }
}
