//! Ordered fallback across identification strategies.

use crate::core::strategy::{self, ProbeError, ProbeResult};
use crate::{BoardIdError, IdentitySource, Result, SystemRoot, MAX_STRATEGIES};
use log::{debug, info, warn};
use serde::{Deserialize, Serialize};

/// The identifier chosen for this board.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResolvedIdentity {
    /// Formatted identifier: hex for binary sources, truncated to the
    /// requested number of trailing characters.
    pub id: String,

    /// Name of the strategy that produced it.
    pub strategy: String,
}

/// Tries a fixed list of strategies in order and keeps the first success.
///
/// Strategies run one at a time and each is attempted at most once. Nothing
/// is retried and nothing is cached between runs.
#[derive(Debug, Clone)]
pub struct Resolver {
    sources: Vec<IdentitySource>,
    root: SystemRoot,
}

impl Resolver {
    /// Validates `sources` and binds them to `root`.
    ///
    /// # Errors
    ///
    /// Returns [`BoardIdError::TooManyStrategies`] for more than
    /// [`MAX_STRATEGIES`] sources, [`BoardIdError::InvalidConfig`] for an
    /// empty list or for any source that fails
    /// [`IdentitySource::validate`].
    pub fn new(sources: Vec<IdentitySource>, root: SystemRoot) -> Result<Self> {
        if sources.len() > MAX_STRATEGIES {
            return Err(BoardIdError::TooManyStrategies {
                count: sources.len(),
                max: MAX_STRATEGIES,
            });
        }
        if sources.is_empty() {
            return Err(BoardIdError::InvalidConfig(
                "No strategies configured".to_string(),
            ));
        }
        for source in &sources {
            source.validate()?;
        }
        Ok(Self { sources, root })
    }

    /// Probes each configured source against the system root.
    ///
    /// # Errors
    ///
    /// Returns [`BoardIdError::NoStrategySucceeded`] when every source fails.
    pub fn resolve(&self) -> Result<ResolvedIdentity> {
        self.resolve_with(|source| strategy::probe(source, &self.root))
    }

    /// Same as [`resolve`](Self::resolve) but with a caller-supplied probe.
    ///
    /// # Errors
    ///
    /// Returns [`BoardIdError::NoStrategySucceeded`] when every call to
    /// `probe` fails.
    pub fn resolve_with<F>(&self, mut probe: F) -> Result<ResolvedIdentity>
    where
        F: FnMut(&IdentitySource) -> ProbeResult,
    {
        for source in &self.sources {
            match probe(source) {
                Ok(raw) => {
                    let id = raw.format(source.digits);
                    info!("{}: resolved board ID", source.name);
                    return Ok(ResolvedIdentity {
                        id,
                        strategy: source.name.clone(),
                    });
                }
                Err(e) => report_failure(source, &e),
            }
        }

        Err(BoardIdError::NoStrategySucceeded {
            tried: self.sources.iter().map(|s| s.name.clone()).collect(),
        })
    }
}

fn report_failure(source: &IdentitySource, e: &ProbeError) {
    if e.is_corrupt() {
        warn!("{}: {e} (check the configured offset and size)", source.name);
    } else if let ProbeError::NotFound(_) = e {
        info!("{}: {e}", source.name);
    } else {
        debug!("{}: unavailable: {e}", source.name);
    }
}
