// SPDX-License-Identifier: MIT

//! compendium-cli library
//!
//! - [graphql] - GraphQL request/response types and the transport seam
//! - [compendium] - node and node type ingestion into a Compendium service

pub mod compendium;
pub mod graphql;
