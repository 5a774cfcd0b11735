// SPDX-License-Identifier: MIT

//! `put` and `configure` - read a file, then dispatch it
//!
//! The transport is only connected once the input has been read and there is
//! something to send, so a bad file or an empty one never needs an endpoint.

use crate::compendium::error::CompendiumError;
use crate::compendium::ingest::pipeline::{FailurePolicy, IngestReport, Mutation, Pipeline};
use crate::compendium::ingest::reader;
use crate::compendium::ingest::reporter::{ConsoleReporter, Reporter, Summary};
use crate::compendium::mutations::{PutNodeType, PutNodes};
use crate::graphql::{GraphQLError, Transport};
use std::io::Write;
use std::path::PathBuf;

pub const DEFAULT_NODES_FILE: &str = ".compendium.yml";
pub const DEFAULT_CONFIG_FILE: &str = ".compendium-config.yml";

#[derive(Debug, Clone)]
pub struct PutOptions {
    pub filename: PathBuf,
    /// Print the request instead of sending it
    pub dry_run: bool,
}

impl Default for PutOptions {
    fn default() -> Self {
        Self {
            filename: PathBuf::from(DEFAULT_NODES_FILE),
            dry_run: false,
        }
    }
}

#[derive(Debug, Clone)]
pub struct ConfigureOptions {
    pub filename: PathBuf,
    pub dry_run: bool,
    /// Stop at the first failed node type
    pub fail_fast: bool,
    /// Return an error when any node type failed
    pub strict: bool,
}

impl Default for ConfigureOptions {
    fn default() -> Self {
        Self {
            filename: PathBuf::from(DEFAULT_CONFIG_FILE),
            dry_run: false,
            fail_fast: false,
            strict: false,
        }
    }
}

/// Upsert every node of the file in a single `putNodes` call
pub async fn put<C, W>(
    options: &PutOptions,
    connect: C,
    out: W,
) -> Result<IngestReport, CompendiumError>
where
    C: FnOnce() -> Result<Box<dyn Transport>, GraphQLError>,
    W: Write,
{
    log::info!("putting nodes from {}", options.filename.display());
    let nodes = reader::read_nodes(&options.filename)?;

    dispatch(Pipeline::batch(), &PutNodes, &nodes, options.dry_run, connect, out).await
}

/// Upsert node types one `putNodeType` call at a time.
///
/// Failed node types are printed and skipped; the run still succeeds unless
/// `strict` is set.
pub async fn configure<C, W>(
    options: &ConfigureOptions,
    connect: C,
    out: W,
) -> Result<IngestReport, CompendiumError>
where
    C: FnOnce() -> Result<Box<dyn Transport>, GraphQLError>,
    W: Write,
{
    log::info!("configuring node types from {}", options.filename.display());
    let node_types = reader::read_node_types(&options.filename)?;

    let mut pipeline = Pipeline::per_record();
    if options.fail_fast {
        pipeline = pipeline.with_policy(FailurePolicy::AbortOnFirst);
    }

    let report = dispatch(
        pipeline,
        &PutNodeType,
        &node_types,
        options.dry_run,
        connect,
        out,
    )
    .await?;

    if options.strict && !report.is_complete() {
        return Err(CompendiumError::Incomplete {
            failed: report.failed(),
            attempted: report.attempted,
        });
    }

    Ok(report)
}

async fn dispatch<M, C, W>(
    pipeline: Pipeline,
    mutation: &M,
    records: &[M::Record],
    dry_run: bool,
    connect: C,
    out: W,
) -> Result<IngestReport, CompendiumError>
where
    M: Mutation,
    M::Output: Summary,
    C: FnOnce() -> Result<Box<dyn Transport>, GraphQLError>,
    W: Write,
{
    let mut reporter = ConsoleReporter::new(out);

    if dry_run {
        let planned = pipeline.plan(mutation, records)?;
        reporter.plan(&planned)?;
        return Ok(IngestReport::default());
    }

    if records.is_empty() {
        Reporter::<M::Output>::nothing_to_do(&mut reporter)?;
        return Ok(IngestReport::default());
    }

    let transport = connect()?;
    pipeline
        .run(transport.as_ref(), mutation, records, &mut reporter)
        .await
}
