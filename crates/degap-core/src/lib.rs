//! Core types shared by every degap crate.
//!
//! Provides the control-keyword vocabulary ([`vocab::Vocabulary`]), project
//! configuration, ordered corpus discovery, and the result-directory storage
//! used for generated intermediate examples.

pub mod config;
pub mod corpus;
pub mod storage;
pub mod vocab;
