//! Sugarloaf compound resolution
//!
//! Turns noisy compound names from an experimental metadata catalog into
//! canonical SMILES strings and PubChem CIDs.
//!
//! # Pipeline
//! - [`normalise`] spells out Greek letters and strips slashes
//! - [`ResolutionClient`] runs the structure and CID lookups with linear backoff
//!   on `503 Service Unavailable`
//! - [`BatchResolver`] walks a name list in order with a politeness delay and
//!   partitions names into resolved modalities and a failure log
//! - [`catalog::read_column`] pulls the candidate names out of a Parquet catalog
//!
//! # Example
//! ```no_run
//! use sugarloaf_resolve::{BatchResolver, ResolutionClient, ResolverConfig};
//!
//! #[tokio::main]
//! async fn main() -> sugarloaf_resolve::Result<()> {
//!     let client = ResolutionClient::new(&ResolverConfig::default())?;
//!     let resolver = BatchResolver::new(client);
//!
//!     let batch = resolver.resolve_batch(["Sinomenine", "α-amanitin"]).await;
//!     println!("{} resolved, {}", batch.resolved.len(), batch.failures);
//!     Ok(())
//! }
//! ```

pub mod batch;
pub mod catalog;
pub mod client;
pub mod config;
pub mod error;
pub mod normalise;
pub mod outcome;
pub mod transport;

pub use batch::{BatchResolution, BatchResolver};
pub use client::ResolutionClient;
pub use config::ResolverConfig;
pub use error::{ResolveError, Result};
pub use normalise::normalise;
pub use outcome::{Lookup, LookupOutcome, Resolution};
pub use transport::{HttpTransport, RawResponse, Transport};
