// SPDX-License-Identifier: MIT

//! Result reporting - one line per outcome

use super::pipeline::PlannedRequest;
use crate::compendium::types::{ExecutionResult, NodeTypeResult};
use crate::graphql::GraphQLError;
use std::io::{self, Write};

/// Receives pipeline outcomes as they complete
pub trait Reporter<O> {
    fn nothing_to_do(&mut self) -> io::Result<()>;
    fn success(&mut self, output: &O) -> io::Result<()>;
    fn failure(&mut self, label: &str, error: &GraphQLError) -> io::Result<()>;
}

/// Line printed for a successful result
pub trait Summary {
    fn summary(&self) -> String;
}

impl Summary for ExecutionResult {
    fn summary(&self) -> String {
        format!("started adding nodes: {}", self.execution_arn)
    }
}

impl Summary for NodeTypeResult {
    fn summary(&self) -> String {
        format!("started adding nodeType: {} {}", self.id, self.name)
    }
}

/// Writes outcomes as plain lines, normally to stdout
pub struct ConsoleReporter<W: Write> {
    out: W,
}

impl<W: Write> ConsoleReporter<W> {
    pub fn new(out: W) -> Self {
        Self { out }
    }

    /// Print requests a dry run would have sent
    pub fn plan(&mut self, planned: &[PlannedRequest]) -> io::Result<()> {
        if planned.is_empty() {
            return writeln!(self.out, "nothing to do");
        }
        for PlannedRequest { label, request } in planned {
            let variables = serde_json::to_string_pretty(&request.variables)?;
            writeln!(
                self.out,
                "{} ({}):\n{}",
                request.operation_name().unwrap_or("request"),
                label,
                variables
            )?;
        }
        Ok(())
    }

    pub fn into_inner(self) -> W {
        self.out
    }
}

impl<W: Write, O: Summary> Reporter<O> for ConsoleReporter<W> {
    fn nothing_to_do(&mut self) -> io::Result<()> {
        writeln!(self.out, "nothing to do")
    }

    fn success(&mut self, output: &O) -> io::Result<()> {
        writeln!(self.out, "{}", output.summary())
    }

    fn failure(&mut self, label: &str, error: &GraphQLError) -> io::Result<()> {
        writeln!(self.out, "failed to put {}: {}", label, error)
    }
}
