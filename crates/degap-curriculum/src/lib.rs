//! # degap-curriculum
//!
//! Curriculum analysis over an ordered corpus of teaching samples.
//!
//! - **Gap detection**: which structural paths each sample introduces for the
//!   first time, and which samples introduce two or more at once
//! - **Prioritization**: a deterministic order for introducing a gap's new
//!   elements one at a time
//! - **Generation specs**: the required/allowed/forbidden partition a generated
//!   candidate must respect
//! - **Validation**: checking a candidate's derived paths against its spec

pub mod gaps;
pub mod priority;
pub mod spec;
pub mod validation;

pub use gaps::{GAP_THRESHOLD, GapAnalysis, GapError, LearnedSet, SampleRecord, detect_gaps};
pub use priority::{priority_key, prioritize};
pub use spec::GenerationSpec;
pub use validation::{ValidationResult, validate_candidate, validate_paths};
