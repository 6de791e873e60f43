//! Batch resolution over a candidate name list.

use serde::Serialize;
use sugarloaf_common::{FailureLog, Modalities, ResolvedModality};
use tokio::time::sleep;
use tracing::{debug, info, warn};

use crate::{normalise, HttpTransport, LookupOutcome, Resolution, ResolutionClient, Transport};

/// Result of one [`BatchResolver::resolve_batch`] call.
#[derive(Debug, Clone, Default, Serialize)]
pub struct BatchResolution {
    /// Original name -> modality, for names whose SMILES lookup succeeded.
    pub resolved: Modalities,
    /// Original names whose SMILES lookup failed, in input order.
    pub failures: FailureLog,
}

impl BatchResolution {
    /// Number of names processed.
    pub fn total(&self) -> usize {
        self.resolved.len() + self.failures.len()
    }
}

/// Resolves names one at a time, in order, with a politeness delay after each.
pub struct BatchResolver<T = HttpTransport> {
    client: ResolutionClient<T>,
}

impl<T: Transport> BatchResolver<T> {
    pub fn new(client: ResolutionClient<T>) -> Self {
        Self { client }
    }

    pub fn client(&self) -> &ResolutionClient<T> {
        &self.client
    }

    /// Resolve every name.
    ///
    /// Each name is normalised before querying but recorded under its original
    /// spelling. `query_rate` is slept after every name whatever the outcome,
    /// on top of any retry backoff. Only the SMILES outcome decides success; a
    /// failed CID lookup is kept as its label.
    ///
    /// Results are keyed by name, so a name repeated in `names` is resolved
    /// again and its later result replaces the earlier one. Deduplicate first
    /// when `resolved + failures` must match the input length.
    pub async fn resolve_batch<I, S>(&self, names: I) -> BatchResolution
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut batch = BatchResolution::default();

        for name in names {
            let name = name.as_ref();
            let query = normalise(name);
            if query != name {
                debug!(name, query = %query, "Normalised compound name");
            }

            let result = self.client.resolve(&query).await;
            sleep(self.client.query_rate()).await;

            match result {
                Ok(Resolution { smiles: LookupOutcome::Value(smiles), cid }) => {
                    batch
                        .resolved
                        .insert(name.to_string(), ResolvedModality::new(smiles, cid.into_label()));
                }
                Ok(resolution) => {
                    debug!(name, outcome = %resolution.smiles, "No structure for compound");
                    batch.failures.record(name);
                }
                Err(e) => {
                    warn!(name, error = %e, "Compound lookup failed");
                    batch.failures.record(name);
                }
            }
        }

        info!(
            resolved = batch.resolved.len(),
            failed = batch.failures.len(),
            failed_names = ?batch.failures.names(),
            "Compound resolution finished"
        );
        batch
    }
}
