//! Ingestion pipeline - turns records into GraphQL mutations and dispatches them
//!
//! One engine serves both commands. A [`BatchShape`] decides how records are
//! grouped into requests, a [`FailurePolicy`] decides what a failed request
//! does to the rest of the run. Requests are sent one at a time; the next one
//! is not sent until the previous one completed.

use super::reporter::Reporter;
use crate::compendium::error::CompendiumError;
use crate::graphql::{GraphQLError, GraphQLRequest, Transport};
use serde::de::DeserializeOwned;
use serde_json::{Map, Value};

/// How records are grouped into requests
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BatchShape {
    /// All records in one request
    SingleCall,
    /// One request per record
    PerRecord,
}

/// What a failed request does to the remaining ones
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FailurePolicy {
    /// Stop and return the error
    #[default]
    AbortOnFirst,
    /// Report the failure and move on to the next request
    ContinueOnError,
}

/// A GraphQL mutation the pipeline can dispatch
pub trait Mutation {
    type Record;
    type Output: DeserializeOwned;

    /// The GraphQL document
    fn document(&self) -> &'static str;

    /// Top-level `data` field holding the result
    fn field(&self) -> &'static str;

    /// Request variables for one batch of records
    fn variables(&self, batch: &[Self::Record]) -> Result<Map<String, Value>, serde_json::Error>;

    /// Short description of a batch, used in failure messages
    fn label(&self, batch: &[Self::Record]) -> String;
}

/// A request built from one batch, not yet sent
#[derive(Debug, Clone, PartialEq)]
pub struct PlannedRequest {
    pub label: String,
    pub request: GraphQLRequest,
}

/// A request that failed under `ContinueOnError`
#[derive(Debug)]
pub struct Failure {
    pub label: String,
    pub error: GraphQLError,
}

/// Outcome of a completed run
#[derive(Debug, Default)]
pub struct IngestReport {
    pub attempted: usize,
    pub succeeded: usize,
    pub failures: Vec<Failure>,
}

impl IngestReport {
    pub fn failed(&self) -> usize {
        self.failures.len()
    }

    pub fn is_complete(&self) -> bool {
        self.failures.is_empty()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pipeline {
    pub shape: BatchShape,
    pub policy: FailurePolicy,
}

impl Pipeline {
    pub fn new(shape: BatchShape, policy: FailurePolicy) -> Self {
        Self { shape, policy }
    }

    /// All records in one request; the first failure is fatal
    pub fn batch() -> Self {
        Self::new(BatchShape::SingleCall, FailurePolicy::AbortOnFirst)
    }

    /// One request per record; failures are reported and skipped
    pub fn per_record() -> Self {
        Self::new(BatchShape::PerRecord, FailurePolicy::ContinueOnError)
    }

    pub fn with_policy(self, policy: FailurePolicy) -> Self {
        Self { policy, ..self }
    }

    /// Build every request without sending any.
    ///
    /// An empty record list plans zero requests regardless of shape.
    pub fn plan<M: Mutation>(
        &self,
        mutation: &M,
        records: &[M::Record],
    ) -> Result<Vec<PlannedRequest>, serde_json::Error> {
        if records.is_empty() {
            return Ok(Vec::new());
        }

        let batches: Vec<&[M::Record]> = match self.shape {
            BatchShape::SingleCall => vec![records],
            BatchShape::PerRecord => records.chunks(1).collect(),
        };

        batches
            .into_iter()
            .map(|batch| -> Result<PlannedRequest, serde_json::Error> {
                Ok(PlannedRequest {
                    label: mutation.label(batch),
                    request: GraphQLRequest::new(mutation.document(), mutation.variables(batch)?),
                })
            })
            .collect()
    }

    /// Plan and dispatch, reporting each outcome as it completes
    pub async fn run<M, R>(
        &self,
        transport: &dyn Transport,
        mutation: &M,
        records: &[M::Record],
        reporter: &mut R,
    ) -> Result<IngestReport, CompendiumError>
    where
        M: Mutation,
        R: Reporter<M::Output> + ?Sized,
    {
        let planned = self.plan(mutation, records)?;
        let mut report = IngestReport::default();

        if planned.is_empty() {
            reporter.nothing_to_do()?;
            return Ok(report);
        }

        log::info!(
            "dispatching {} record(s) in {} request(s)",
            records.len(),
            planned.len()
        );

        for PlannedRequest { label, request } in planned {
            report.attempted += 1;
            log::debug!(
                "{} variables: {}",
                label,
                Value::Object(request.variables.clone())
            );

            let outcome = match transport.post(&request).await {
                Ok(response) => response.into_field::<M::Output>(mutation.field()),
                Err(e) => Err(e),
            };

            match outcome {
                Ok(output) => {
                    report.succeeded += 1;
                    reporter.success(&output)?;
                }
                Err(error) => match self.policy {
                    FailurePolicy::AbortOnFirst => {
                        return Err(CompendiumError::aborted(label, error));
                    }
                    FailurePolicy::ContinueOnError => {
                        log::warn!("request for {} failed: {}", label, error);
                        reporter.failure(&label, &error)?;
                        report.failures.push(Failure { label, error });
                    }
                },
            }
        }

        Ok(report)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graphql::{GraphQLResponse, RemoteError};
    use async_trait::async_trait;
    use serde::Deserialize;
    use serde_json::json;
    use std::sync::Mutex;

    /// Echoes the `values` variable back, rejecting requests that carry a chosen value
    struct EchoTransport {
        fail_on: Vec<&'static str>,
        calls: Mutex<Vec<GraphQLRequest>>,
    }

    impl EchoTransport {
        fn new(fail_on: Vec<&'static str>) -> Self {
            Self {
                fail_on,
                calls: Mutex::new(Vec::new()),
            }
        }

        fn call_count(&self) -> usize {
            self.calls.lock().unwrap().len()
        }
    }

    #[async_trait]
    impl Transport for EchoTransport {
        async fn post(&self, request: &GraphQLRequest) -> Result<GraphQLResponse, GraphQLError> {
            self.calls.lock().unwrap().push(request.clone());
            let value = request.variables["values"].clone();
            let rejected = value
                .as_array()
                .unwrap()
                .iter()
                .any(|v| self.fail_on.iter().any(|f| v.as_str() == Some(*f)));
            if rejected {
                return Ok(GraphQLResponse {
                    data: None,
                    errors: Some(vec![RemoteError {
                        message: "rejected".to_string(),
                        error_type: None,
                        path: None,
                    }]),
                });
            }
            Ok(GraphQLResponse {
                data: Some(json!({"echo": {"values": value}})),
                errors: None,
            })
        }
    }

    #[derive(Debug, Deserialize)]
    struct Echo {
        values: Vec<String>,
    }

    struct EchoMutation;

    impl Mutation for EchoMutation {
        type Record = &'static str;
        type Output = Echo;

        fn document(&self) -> &'static str {
            "mutation echo($values: [String!]!) { echo(values: $values) { values } }"
        }

        fn field(&self) -> &'static str {
            "echo"
        }

        fn variables(
            &self,
            batch: &[Self::Record],
        ) -> Result<Map<String, Value>, serde_json::Error> {
            let mut vars = Map::new();
            vars.insert("values".to_string(), serde_json::to_value(batch)?);
            Ok(vars)
        }

        fn label(&self, batch: &[Self::Record]) -> String {
            batch.join(",")
        }
    }

    #[derive(Default)]
    struct Recorder {
        nothing: usize,
        successes: Vec<Vec<String>>,
        failures: Vec<String>,
    }

    impl Reporter<Echo> for Recorder {
        fn nothing_to_do(&mut self) -> std::io::Result<()> {
            self.nothing += 1;
            Ok(())
        }

        fn success(&mut self, output: &Echo) -> std::io::Result<()> {
            self.successes.push(output.values.clone());
            Ok(())
        }

        fn failure(&mut self, label: &str, _error: &GraphQLError) -> std::io::Result<()> {
            self.failures.push(label.to_string());
            Ok(())
        }
    }

    #[test]
    fn test_plan_single_call_groups_everything() {
        let planned = Pipeline::batch()
            .plan(&EchoMutation, &["a", "b", "c"])
            .unwrap();
        assert_eq!(planned.len(), 1);
        assert_eq!(planned[0].request.variables["values"], json!(["a", "b", "c"]));
        assert_eq!(planned[0].label, "a,b,c");
    }

    #[test]
    fn test_plan_per_record_keeps_order() {
        let planned = Pipeline::per_record()
            .plan(&EchoMutation, &["a", "b", "c"])
            .unwrap();
        let labels: Vec<&str> = planned.iter().map(|p| p.label.as_str()).collect();
        assert_eq!(labels, ["a", "b", "c"]);
    }

    #[test]
    fn test_plan_empty() {
        for pipeline in [Pipeline::batch(), Pipeline::per_record()] {
            assert!(pipeline.plan(&EchoMutation, &[]).unwrap().is_empty());
        }
    }

    #[tokio::test]
    async fn test_single_call_success() {
        let transport = EchoTransport::new(vec![]);
        let mut recorder = Recorder::default();

        let report = Pipeline::batch()
            .run(&transport, &EchoMutation, &["a", "b"], &mut recorder)
            .await
            .unwrap();

        assert_eq!(transport.call_count(), 1);
        assert_eq!(report.attempted, 1);
        assert_eq!(report.succeeded, 1);
        assert_eq!(recorder.successes, vec![vec!["a", "b"]]);
    }

    #[tokio::test]
    async fn test_single_call_failure_is_fatal() {
        let transport = EchoTransport::new(vec!["b"]);
        let mut recorder = Recorder::default();

        let err = Pipeline::batch()
            .run(&transport, &EchoMutation, &["a", "b"], &mut recorder)
            .await
            .unwrap_err();

        assert_eq!(transport.call_count(), 1);
        assert!(recorder.successes.is_empty());
        assert!(recorder.failures.is_empty());
        match err {
            CompendiumError::Aborted { label, source } => {
                assert_eq!(label, "a,b");
                assert!(matches!(source, GraphQLError::Remote(_)));
            }
            other => panic!("Expected Aborted, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_per_record_continues_past_failure() {
        let transport = EchoTransport::new(vec!["b"]);
        let mut recorder = Recorder::default();

        let report = Pipeline::per_record()
            .run(&transport, &EchoMutation, &["a", "b", "c"], &mut recorder)
            .await
            .unwrap();

        assert_eq!(transport.call_count(), 3);
        assert_eq!(report.attempted, 3);
        assert_eq!(report.succeeded, 2);
        assert_eq!(report.failed(), 1);
        assert!(!report.is_complete());
        assert_eq!(recorder.successes, vec![vec!["a"], vec!["c"]]);
        assert_eq!(recorder.failures, vec!["b"]);
    }

    #[tokio::test]
    async fn test_per_record_abort_policy_stops_early() {
        let transport = EchoTransport::new(vec!["b"]);
        let mut recorder = Recorder::default();

        let result = Pipeline::per_record()
            .with_policy(FailurePolicy::AbortOnFirst)
            .run(&transport, &EchoMutation, &["a", "b", "c"], &mut recorder)
            .await;

        assert!(result.is_err());
        assert_eq!(transport.call_count(), 2);
        assert_eq!(recorder.successes.len(), 1);
    }

    #[tokio::test]
    async fn test_empty_records_make_no_calls() {
        let transport = EchoTransport::new(vec![]);
        let mut recorder = Recorder::default();

        let report = Pipeline::per_record()
            .run(&transport, &EchoMutation, &[], &mut recorder)
            .await
            .unwrap();

        assert_eq!(transport.call_count(), 0);
        assert_eq!(report.attempted, 0);
        assert_eq!(recorder.nothing, 1);
    }

    #[test]
    fn test_default_policy_is_abort() {
        assert_eq!(FailurePolicy::default(), FailurePolicy::AbortOnFirst);
    }
}
