//! Generation of intermediate teaching examples.
//!
//! When a corpus sample introduces several new structural elements at once,
//! this crate asks an LLM for one example per element, validates each
//! candidate against its required/allowed/forbidden spec, and retries with
//! accumulated feedback until the candidate passes or attempts run out.
//!
//! # Architecture
//!
//! - **provider**: `LlmProvider` trait with Ollama, Anthropic and OpenAI implementations
//! - **prompt**: Prompt construction and code extraction from raw responses
//! - **pipeline**: Per-element retry loop and the per-gap degap run
//! - **report**: Run summary and token usage
//! - **progress**: Element bar and token spinner via `indicatif`

pub mod pipeline;
mod progress;
pub mod prompt;
pub mod provider;
pub mod report;

pub use pipeline::{ElementOutcome, PipelineError, RunConfig, generate_element, run_degap};
pub use provider::{LlmProvider, LlmResponse, ProviderError, available_providers, create_provider};
pub use report::{DegapReport, GeneratedElement, Outcome, SampleSummary, TokenUsage};
