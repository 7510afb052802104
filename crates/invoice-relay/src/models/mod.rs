//! Data models for provider API entities.
//!
//! Invoice records are externally defined; the typed fields cover what the
//! relay displays and filters on, and `#[serde(flatten)]` preserves the rest
//! so records are forwarded exactly as the provider returned them.

mod invoice;

pub use invoice::{CustomerRef, Invoice, QueryEnvelope, QueryResponse};
