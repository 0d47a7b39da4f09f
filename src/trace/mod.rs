//! Quality traceability: genealogy records, chain assembly, scoring

pub mod chain;
pub mod record;
pub mod score;
pub mod store;

pub use chain::{build_chain, ChainStage, SourceSection};
pub use record::{QueryTarget, TargetType, TraceabilityRecord};
pub use score::{score, TraceabilityScore};
pub use store::{MemoryRecordStore, RecordStore, RecordSummary, StoreError, YamlRecordStore};
