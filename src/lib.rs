// src/lib.rs
// Public library surface for integration tests (and potential reuse).

pub mod api;
pub mod catalog;
pub mod collect;
pub mod extract;
pub mod matcher;
pub mod metrics;
pub mod responder;
pub mod signal;

// ---- Re-exports for stable public API ----
pub use crate::api::router;
pub use crate::catalog::{CatalogError, Opportunity, OpportunityCatalog, OpportunityType};
pub use crate::extract::extract;
pub use crate::matcher::{match_opportunities, MatchResult};
pub use crate::responder::{respond, respond_turn, ChatTurn, RespondError, Sender};
pub use crate::signal::{SkillProfile, SourceKind, SourceRecord, Tier, ValidationError};
