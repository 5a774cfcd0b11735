// SPDX-License-Identifier: MIT

//! Compendium module - node and node type ingestion
//!
//! - [ingest] - document reader, normalizer, dispatch pipeline and reporter
//! - [mutations] - `putNodes` and `putNodeType`
//! - [commands] - the `put` and `configure` entry points

pub mod commands;
pub mod error;
pub mod ingest;
pub mod mutations;
pub mod types;

pub use error::{CompendiumError, ReadError};
