//! PubChem resolution client.
//!
//! Every name costs two independent round trips: one for the canonical SMILES
//! and one for the CID. Each lookup is classified on its own:
//!
//! | status | outcome |
//! |--------|---------|
//! | 200    | `Value(first line of body)` |
//! | 404    | `NotFound` |
//! | 503    | retried `max_retries` times, sleeping `query_rate * attempt` before each |
//! | other  | `Error(status)` |

use std::time::Duration;

use tokio::time::sleep;
use tracing::{debug, instrument, warn};
use url::Url;

use crate::outcome::{STATUS_NOT_FOUND, STATUS_OK, STATUS_SERVICE_UNAVAILABLE};
use crate::{
    HttpTransport, Lookup, LookupOutcome, Resolution, ResolveError, ResolverConfig, Result,
    Transport,
};

/// Client for the structure and CID lookups of a single compound name.
pub struct ResolutionClient<T = HttpTransport> {
    transport: T,
    base_url: Url,
    query_rate: Duration,
    max_retries: u32,
}

impl ResolutionClient<HttpTransport> {
    /// Client over a real HTTP transport.
    pub fn new(config: &ResolverConfig) -> Result<Self> {
        Self::with_transport(HttpTransport::new(config)?, config)
    }
}

impl<T: Transport> ResolutionClient<T> {
    pub fn with_transport(transport: T, config: &ResolverConfig) -> Result<Self> {
        let base_url = Url::parse(&config.base_url)?;
        if base_url.cannot_be_a_base() {
            return Err(ResolveError::BaseUrl(config.base_url.clone()));
        }

        Ok(Self {
            transport,
            base_url,
            query_rate: config.query_delay(),
            max_retries: config.max_retries,
        })
    }

    pub fn query_rate(&self) -> Duration {
        self.query_rate
    }

    pub fn max_retries(&self) -> u32 {
        self.max_retries
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    /// Endpoint URL for `lookup` on an already-normalised name.
    ///
    /// The name is percent-encoded as a single path segment.
    pub fn endpoint(&self, name: &str, lookup: Lookup) -> Result<Url> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|_| ResolveError::BaseUrl(self.base_url.to_string()))?
            .pop_if_empty()
            .extend(["compound", "name", name])
            .extend(lookup.path_tail());
        Ok(url)
    }

    /// Run both lookups for a normalised name.
    ///
    /// `Err` only when the SMILES lookup fails at the transport level; every
    /// HTTP status is folded into a [`LookupOutcome`]. A transport failure on
    /// the CID lookup is kept as [`LookupOutcome::Unreachable`].
    pub async fn resolve(&self, name: &str) -> Result<Resolution> {
        let smiles = self.lookup(name, Lookup::Smiles).await?;
        let cid = match self.lookup(name, Lookup::Cid).await {
            Ok(cid) => cid,
            Err(e) => {
                warn!(name, error = %e, "CID lookup failed");
                LookupOutcome::Unreachable
            }
        };
        Ok(Resolution { smiles, cid })
    }

    #[instrument(skip(self))]
    async fn lookup(&self, name: &str, lookup: Lookup) -> Result<LookupOutcome> {
        let url = self.endpoint(name, lookup)?;
        let response = self.transport.get(&url).await?;

        let outcome = match response.status {
            STATUS_OK => LookupOutcome::from_body(&response.body),
            STATUS_NOT_FOUND => LookupOutcome::NotFound,
            STATUS_SERVICE_UNAVAILABLE => self.retry_unavailable(&url).await?,
            status => LookupOutcome::Error(status),
        };

        debug!(%outcome, "Lookup finished");
        Ok(outcome)
    }

    /// Linear backoff: sleep `query_rate * attempt`, reissue, stop on the first 200.
    async fn retry_unavailable(&self, url: &Url) -> Result<LookupOutcome> {
        for attempt in 1..=self.max_retries {
            let backoff = self.query_rate * attempt;
            debug!(attempt, ?backoff, "Service unavailable, backing off");
            sleep(backoff).await;

            let response = self.transport.get(url).await?;
            if response.status == STATUS_OK {
                return Ok(LookupOutcome::from_body(&response.body));
            }
        }

        warn!(%url, retries = self.max_retries, "Service still unavailable after retries");
        Ok(LookupOutcome::ServiceUnavailable)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::RawResponse;
    use async_trait::async_trait;
    use std::collections::{HashMap, VecDeque};
    use std::sync::Mutex;
    use tokio::time::Instant;

    const SINOMENINE_SMILES: &str = "CN1CCC2=CC3=C(C=C2C1CC4=CC=CC=C4)OC(=O)C3";

    /// Replays scripted responses per URL; the last response repeats.
    #[derive(Default)]
    struct ScriptedTransport {
        scripts: Mutex<HashMap<String, VecDeque<RawResponse>>>,
        calls: Mutex<Vec<String>>,
    }

    impl ScriptedTransport {
        fn script(&self, url: &Url, responses: Vec<RawResponse>) {
            self.scripts.lock().unwrap().insert(url.to_string(), responses.into());
        }

        fn calls_to(&self, url: &Url) -> usize {
            self.calls.lock().unwrap().iter().filter(|u| *u == url.as_str()).count()
        }
    }

    #[async_trait]
    impl Transport for ScriptedTransport {
        async fn get(&self, url: &Url) -> Result<RawResponse> {
            self.calls.lock().unwrap().push(url.to_string());
            let mut scripts = self.scripts.lock().unwrap();
            let queue = scripts
                .get_mut(url.as_str())
                .ok_or_else(|| ResolveError::Transport(format!("connection refused: {url}")))?;
            if queue.len() > 1 {
                Ok(queue.pop_front().unwrap())
            } else {
                Ok(queue.front().cloned().unwrap())
            }
        }
    }

    fn client(query_rate: f64, max_retries: u32) -> ResolutionClient<ScriptedTransport> {
        let config = ResolverConfig::default()
            .with_query_rate(query_rate)
            .with_max_retries(max_retries);
        ResolutionClient::with_transport(ScriptedTransport::default(), &config).unwrap()
    }

    fn assert_slept(elapsed: Duration, expected: Duration) {
        assert!(
            elapsed >= expected && elapsed <= expected + Duration::from_millis(20),
            "expected ~{expected:?} of backoff, got {elapsed:?}"
        );
    }

    #[test]
    fn test_endpoint_layout() {
        let client = client(0.1, 3);
        assert_eq!(
            client.endpoint("Sinomenine", Lookup::Smiles).unwrap().as_str(),
            "https://pubchem.ncbi.nlm.nih.gov/rest/pug/compound/name/Sinomenine/property/CanonicalSMILES/TXT"
        );
        assert_eq!(
            client.endpoint("Sinomenine", Lookup::Cid).unwrap().as_str(),
            "https://pubchem.ncbi.nlm.nih.gov/rest/pug/compound/name/Sinomenine/cids/TXT"
        );
    }

    #[test]
    fn test_endpoint_percent_encodes_name() {
        let client = client(0.1, 3);
        let url = client.endpoint("drug form", Lookup::Cid).unwrap();
        assert!(url.as_str().contains("/name/drug%20form/cids/"), "{url}");

        let url = client.endpoint("a/b%c", Lookup::Cid).unwrap();
        assert!(url.as_str().contains("/name/a%2Fb%25c/cids/"), "{url}");
    }

    #[test]
    fn test_trailing_slash_base_url() {
        let config = ResolverConfig::default().with_base_url("http://localhost:8080/rest/pug/");
        let client = ResolutionClient::with_transport(ScriptedTransport::default(), &config).unwrap();
        assert_eq!(
            client.endpoint("x", Lookup::Cid).unwrap().as_str(),
            "http://localhost:8080/rest/pug/compound/name/x/cids/TXT"
        );
    }

    #[test]
    fn test_rejects_non_base_url() {
        let config = ResolverConfig::default().with_base_url("mailto:chem@example.org");
        let err = ResolutionClient::with_transport(ScriptedTransport::default(), &config).err();
        assert!(matches!(err, Some(ResolveError::BaseUrl(_))));
    }

    #[tokio::test(start_paused = true)]
    async fn test_resolve_success() {
        let client = client(0.25, 3);
        let smiles_url = client.endpoint("Sinomenine", Lookup::Smiles).unwrap();
        let cid_url = client.endpoint("Sinomenine", Lookup::Cid).unwrap();
        client.transport().script(&smiles_url, vec![RawResponse::new(200, format!("{SINOMENINE_SMILES}\n"))]);
        client.transport().script(&cid_url, vec![RawResponse::new(200, "5282157\n")]);

        let start = Instant::now();
        let resolution = client.resolve("Sinomenine").await.unwrap();

        assert_eq!(resolution.smiles, LookupOutcome::Value(SINOMENINE_SMILES.to_string()));
        assert_eq!(resolution.cid, LookupOutcome::Value("5282157".to_string()));
        assert_eq!(start.elapsed(), Duration::ZERO);
    }

    #[tokio::test(start_paused = true)]
    async fn test_not_found_is_not_retried() {
        let client = client(0.25, 3);
        let smiles_url = client.endpoint("nonsense", Lookup::Smiles).unwrap();
        let cid_url = client.endpoint("nonsense", Lookup::Cid).unwrap();
        client.transport().script(&smiles_url, vec![RawResponse::new(404, "")]);
        client.transport().script(&cid_url, vec![RawResponse::new(404, "")]);

        let resolution = client.resolve("nonsense").await.unwrap();

        assert_eq!(resolution.smiles, LookupOutcome::NotFound);
        assert_eq!(resolution.cid, LookupOutcome::NotFound);
        assert_eq!(client.transport().calls_to(&smiles_url), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_unexpected_status_carries_code() {
        let client = client(0.25, 3);
        let smiles_url = client.endpoint("x", Lookup::Smiles).unwrap();
        let cid_url = client.endpoint("x", Lookup::Cid).unwrap();
        client.transport().script(&smiles_url, vec![RawResponse::new(400, "PUGREST.BadRequest")]);
        client.transport().script(&cid_url, vec![RawResponse::new(500, "")]);

        let resolution = client.resolve("x").await.unwrap();

        assert_eq!(resolution.smiles, LookupOutcome::Error(400));
        assert_eq!(resolution.cid, LookupOutcome::Error(500));
        assert_eq!(client.transport().calls_to(&smiles_url), 1);
        assert_eq!(client.transport().calls_to(&cid_url), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_exhausted_retries_sleep_linearly() {
        let client = client(0.25, 3);
        let smiles_url = client.endpoint("busy", Lookup::Smiles).unwrap();
        let cid_url = client.endpoint("busy", Lookup::Cid).unwrap();
        client.transport().script(&smiles_url, vec![RawResponse::new(503, "")]);
        client.transport().script(&cid_url, vec![RawResponse::new(200, "42")]);

        let start = Instant::now();
        let resolution = client.resolve("busy").await.unwrap();

        assert_eq!(resolution.smiles, LookupOutcome::ServiceUnavailable);
        assert_eq!(resolution.cid, LookupOutcome::Value("42".to_string()));
        // initial request + 3 retries
        assert_eq!(client.transport().calls_to(&smiles_url), 4);
        // 0.25 * (1 + 2 + 3)
        assert_slept(start.elapsed(), Duration::from_millis(1500));
    }

    #[tokio::test(start_paused = true)]
    async fn test_each_lookup_retries_independently() {
        let client = client(0.25, 3);
        let smiles_url = client.endpoint("busy", Lookup::Smiles).unwrap();
        let cid_url = client.endpoint("busy", Lookup::Cid).unwrap();
        client.transport().script(&smiles_url, vec![RawResponse::new(503, "")]);
        client.transport().script(&cid_url, vec![RawResponse::new(503, "")]);

        let start = Instant::now();
        let resolution = client.resolve("busy").await.unwrap();

        assert_eq!(resolution.smiles, LookupOutcome::ServiceUnavailable);
        assert_eq!(resolution.cid, LookupOutcome::ServiceUnavailable);
        assert_slept(start.elapsed(), Duration::from_millis(3000));
    }

    #[tokio::test(start_paused = true)]
    async fn test_retry_stops_on_first_success() {
        let client = client(0.25, 3);
        let smiles_url = client.endpoint("flaky", Lookup::Smiles).unwrap();
        let cid_url = client.endpoint("flaky", Lookup::Cid).unwrap();
        client.transport().script(
            &smiles_url,
            vec![
                RawResponse::new(503, ""),
                RawResponse::new(503, ""),
                RawResponse::new(200, "CCO\n"),
            ],
        );
        client.transport().script(&cid_url, vec![RawResponse::new(200, "702")]);

        let start = Instant::now();
        let resolution = client.resolve("flaky").await.unwrap();

        assert_eq!(resolution.smiles, LookupOutcome::Value("CCO".to_string()));
        assert_eq!(client.transport().calls_to(&smiles_url), 3);
        // 0.25 * (1 + 2)
        assert_slept(start.elapsed(), Duration::from_millis(750));
    }

    #[tokio::test(start_paused = true)]
    async fn test_non_success_during_retry_keeps_retrying() {
        let client = client(0.25, 3);
        let smiles_url = client.endpoint("odd", Lookup::Smiles).unwrap();
        let cid_url = client.endpoint("odd", Lookup::Cid).unwrap();
        client.transport().script(
            &smiles_url,
            vec![
                RawResponse::new(503, ""),
                RawResponse::new(404, ""),
                RawResponse::new(200, "C"),
            ],
        );
        client.transport().script(&cid_url, vec![RawResponse::new(200, "297")]);

        let resolution = client.resolve("odd").await.unwrap();
        assert_eq!(resolution.smiles, LookupOutcome::Value("C".to_string()));
    }

    #[tokio::test(start_paused = true)]
    async fn test_zero_retries_gives_up_immediately() {
        let client = client(0.25, 0);
        let smiles_url = client.endpoint("busy", Lookup::Smiles).unwrap();
        let cid_url = client.endpoint("busy", Lookup::Cid).unwrap();
        client.transport().script(&smiles_url, vec![RawResponse::new(503, "")]);
        client.transport().script(&cid_url, vec![RawResponse::new(503, "")]);

        let start = Instant::now();
        let resolution = client.resolve("busy").await.unwrap();

        assert_eq!(resolution.smiles, LookupOutcome::ServiceUnavailable);
        assert_eq!(start.elapsed(), Duration::ZERO);
    }

    #[tokio::test(start_paused = true)]
    async fn test_cid_transport_failure_keeps_structure() {
        let client = client(0.25, 3);
        let smiles_url = client.endpoint("Ethanol", Lookup::Smiles).unwrap();
        client.transport().script(&smiles_url, vec![RawResponse::new(200, "CCO\n")]);

        let resolution = client.resolve("Ethanol").await.unwrap();

        assert_eq!(resolution.smiles, LookupOutcome::Value("CCO".to_string()));
        assert_eq!(resolution.cid, LookupOutcome::Unreachable);
        assert_eq!(resolution.cid.into_label(), "transport error");
    }

    #[tokio::test(start_paused = true)]
    async fn test_transport_failure_is_an_error() {
        let client = client(0.25, 3);
        let result = client.resolve("unscripted").await;
        assert!(matches!(result, Err(ResolveError::Transport(_))));
    }
}
