// src/collect/types.rs
use thiserror::Error;

use crate::signal::{SourceKind, SourceRecord};

/// Why a source produced no record. Any of these degrades the aggregate to
/// "zero evidence from this source" — a single failing source never aborts
/// an aggregation run.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CollectError {
    #[error("source unreachable")]
    Unreachable,
    #[error("invalid payload: {0}")]
    Invalid(String),
    #[error("profile not found")]
    NotFound,
}

/// A source adapter. Transport, auth and pagination live outside this crate;
/// implementations here parse already-fetched raw payloads into the one
/// record shape the extractor understands.
#[async_trait::async_trait]
pub trait SignalCollector {
    async fn collect(&self, handle: &str) -> Result<SourceRecord, CollectError>;
    fn kind(&self) -> SourceKind;
}
