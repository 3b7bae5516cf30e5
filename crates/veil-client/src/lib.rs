//! # veil-client — HTTP Capability Adapters
//!
//! Concrete HTTP/JSON implementations of every capability trait the veil
//! core depends on: the compressed-state indexer, the base ledger, the
//! encryption service, and the delegated execution venue.
//!
//! ## Architecture
//!
//! Each adapter wraps a `reqwest::Client` with a service-specific base
//! URL and request/response mapping, and is `Send + Sync` for sharing
//! via `Arc` across tasks. Transport failures that can heal on their
//! own (timeouts, refused connections) are retried with exponential
//! backoff under a per-adapter [`RetryPolicy`]; HTTP status handling
//! is never retried — a 4xx is an answer.
//!
//! ## Error Mapping
//!
//! Adapters speak the error vocabulary of the layer they implement:
//! compressed-state failures surface as `ResolveError::Backend`, venue
//! and encryption failures as `VenueError` variants with the endpoint
//! and response excerpt attached.

mod http;
mod retry;

pub mod compression;
pub mod delegated;
pub mod encryption;
pub mod ledger;

pub use compression::{CompressedStateConfig, HttpCompressedStateStore};
pub use delegated::{DelegatedVenueConfig, HttpDelegatedVenue};
pub use encryption::{EncryptionConfig, HttpEncryptionService};
pub use ledger::{BaseLedgerConfig, HttpBaseLedger};
pub use retry::RetryPolicy;
