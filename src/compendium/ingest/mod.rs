pub mod normalizer;
pub mod pipeline;
pub mod reader;
pub mod reporter;

pub use pipeline::{BatchShape, FailurePolicy, IngestReport, Mutation, Pipeline};
pub use reporter::{ConsoleReporter, Reporter};
