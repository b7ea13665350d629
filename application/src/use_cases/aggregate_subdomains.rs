//! Aggregate Subdomains use case
//!
//! Fans a domain out to every configured source function, then merges the
//! returned hostname lists into one set.

use crate::config::BehaviorConfig;
use crate::ports::progress::{NoProgress, SourceProgressNotifier};
use crate::ports::remote_invoker::{InvocationOutput, InvokeError, RemoteInvoker};
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;
use subharvest_domain::{
    AggregatedResult, DomainQuery, FailurePolicy, FunctionErrorEnvelope, InvocationPayload,
    SourceKind, SubdomainsResponse,
};
use thiserror::Error;
use tokio::task::{self, JoinSet};
use tracing::{debug, info, warn};

/// Errors that can occur during an aggregation run
#[derive(Error, Debug)]
pub enum AggregateError {
    #[error("No sources configured")]
    NoSources,

    #[error("Error calling {function} ({kind}): {message}")]
    Invocation {
        kind: SourceKind,
        function: String,
        message: String,
    },

    #[error("{kind}: {message}")]
    Source {
        kind: SourceKind,
        error_type: String,
        message: String,
    },

    #[error("Error unmarshalling {kind} response: {message}")]
    Decode { kind: SourceKind, message: String },

    #[error("Error marshalling request: {0}")]
    Encode(#[from] serde_json::Error),

    #[error("{kind}: source task failed: {message}")]
    TaskFailed { kind: SourceKind, message: String },

    #[error("All {0} sources failed")]
    AllSourcesFailed(usize),
}

/// A source and the remote function that serves it
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceTarget {
    pub kind: SourceKind,
    pub function_name: String,
}

impl SourceTarget {
    pub fn new(kind: SourceKind, function_name: impl Into<String>) -> Self {
        Self {
            kind,
            function_name: function_name.into(),
        }
    }
}

impl From<SourceKind> for SourceTarget {
    fn from(kind: SourceKind) -> Self {
        Self::new(kind, kind.default_function_name())
    }
}

/// Input for the AggregateSubdomains use case
#[derive(Debug, Clone)]
pub struct AggregateInput {
    pub query: DomainQuery,
    pub targets: Vec<SourceTarget>,
}

impl AggregateInput {
    pub fn new(query: DomainQuery, targets: Vec<SourceTarget>) -> Self {
        Self { query, targets }
    }
}

/// Use case for aggregating subdomains across sources
pub struct AggregateSubdomainsUseCase<I: RemoteInvoker + 'static> {
    invoker: Arc<I>,
    behavior: BehaviorConfig,
}

impl<I: RemoteInvoker + 'static> AggregateSubdomainsUseCase<I> {
    pub fn new(invoker: Arc<I>) -> Self {
        Self {
            invoker,
            behavior: BehaviorConfig::default(),
        }
    }

    pub fn with_behavior(mut self, behavior: BehaviorConfig) -> Self {
        self.behavior = behavior;
        self
    }

    /// Execute the use case with default (no-op) progress
    pub async fn execute(&self, input: AggregateInput) -> Result<AggregatedResult, AggregateError> {
        self.execute_with_progress(input, &NoProgress).await
    }

    /// Execute the use case with progress callbacks
    pub async fn execute_with_progress(
        &self,
        input: AggregateInput,
        progress: &dyn SourceProgressNotifier,
    ) -> Result<AggregatedResult, AggregateError> {
        if input.targets.is_empty() {
            return Err(AggregateError::NoSources);
        }

        let outcome = self.fan_out(input, progress).await;
        match &outcome {
            Ok(result) => progress.on_run_complete(result.len()),
            Err(_) => progress.on_run_failed(),
        }
        outcome
    }

    async fn fan_out(
        &self,
        input: AggregateInput,
        progress: &dyn SourceProgressNotifier,
    ) -> Result<AggregatedResult, AggregateError> {
        let policy = self.behavior.failure_policy;
        info!(
            domain = %input.query,
            sources = input.targets.len(),
            policy = %policy,
            "Starting aggregation"
        );
        progress.on_run_start(&input.query, input.targets.len());

        let payload = serde_json::to_vec(&InvocationPayload::new(input.query.as_str()))?;

        let mut join_set = JoinSet::new();
        let mut task_sources: HashMap<task::Id, SourceKind> = HashMap::new();
        for target in input.targets {
            let invoker = Arc::clone(&self.invoker);
            let payload = payload.clone();
            let timeout = self.behavior.timeout;
            let kind = target.kind;

            let handle = join_set.spawn(async move {
                let result = Self::invoke_source(&invoker, &target, payload, timeout).await;
                (target.kind, result)
            });
            task_sources.insert(handle.id(), kind);
        }

        let mut result = AggregatedResult::new(input.query);
        let mut failed = 0usize;
        let mut succeeded = 0usize;

        while let Some(joined) = join_set.join_next_with_id().await {
            let (kind, outcome) = match joined {
                Ok((_, outcome)) => outcome,
                Err(e) => {
                    let Some(kind) = task_sources.get(&e.id()).copied() else {
                        warn!("Untracked source task failed: {}", e);
                        failed += 1;
                        continue;
                    };
                    (
                        kind,
                        Err(AggregateError::TaskFailed {
                            kind,
                            message: e.to_string(),
                        }),
                    )
                }
            };

            match outcome {
                Ok(hostnames) => {
                    info!(
                        source = %kind,
                        returned = hostnames.len(),
                        "Source responded successfully"
                    );
                    progress.on_source_complete(kind, true, hostnames.len());
                    succeeded += 1;
                    result.merge(kind, hostnames);
                }
                Err(e) => {
                    warn!(source = %kind, "Source failed: {}", e);
                    progress.on_source_complete(kind, false, 0);
                    failed += 1;
                    match policy {
                        FailurePolicy::FailFast => {
                            join_set.abort_all();
                            return Err(e);
                        }
                        FailurePolicy::BestEffort => {
                            result.record_failure(kind, e.to_string());
                        }
                    }
                }
            }
        }

        if succeeded == 0 {
            return Err(AggregateError::AllSourcesFailed(failed));
        }

        let result = result.finish();
        info!(unique = result.len(), "Aggregation complete");
        Ok(result)
    }

    /// Invoke a single source function and decode what it returned
    async fn invoke_source(
        invoker: &I,
        target: &SourceTarget,
        payload: Vec<u8>,
        timeout: Option<Duration>,
    ) -> Result<Vec<String>, AggregateError> {
        debug!(
            source = %target.kind,
            function = %target.function_name,
            "Invoking source function"
        );

        let call = invoker.invoke(&target.function_name, payload);
        let output = match timeout {
            Some(limit) => match tokio::time::timeout(limit, call).await {
                Ok(output) => output,
                Err(_) => Err(InvokeError::Timeout),
            },
            None => call.await,
        }
        .map_err(|e| AggregateError::Invocation {
            kind: target.kind,
            function: target.function_name.clone(),
            message: e.to_string(),
        })?;

        decode_output(target.kind, &output)
    }
}

/// Interpret an invocation result as either hostnames or a source failure.
pub fn decode_output(
    kind: SourceKind,
    output: &InvocationOutput,
) -> Result<Vec<String>, AggregateError> {
    if output.is_function_error() {
        let envelope: FunctionErrorEnvelope =
            serde_json::from_slice(&output.payload).map_err(|e| AggregateError::Decode {
                kind,
                message: format!("unreadable error envelope: {}", e),
            })?;
        return Err(AggregateError::Source {
            kind,
            error_type: envelope.error_type,
            message: envelope.error_message,
        });
    }

    let response: SubdomainsResponse =
        serde_json::from_slice(&output.payload).map_err(|e| AggregateError::Decode {
            kind,
            message: e.to_string(),
        })?;
    Ok(response.subdomains)
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use std::sync::Mutex;

    // === Mock implementations ===

    enum Scripted {
        Hosts(Vec<&'static str>),
        FunctionError(&'static str, &'static str),
        Transport(&'static str),
        Garbage,
        Hang,
        Panic,
    }

    struct MockInvoker {
        scripts: HashMap<String, Scripted>,
        calls: Mutex<Vec<(String, Vec<u8>)>>,
    }

    impl MockInvoker {
        fn new(scripts: Vec<(SourceKind, Scripted)>) -> Arc<Self> {
            Arc::new(Self {
                scripts: scripts
                    .into_iter()
                    .map(|(k, s)| (k.default_function_name().to_string(), s))
                    .collect(),
                calls: Mutex::new(Vec::new()),
            })
        }

        fn call_count(&self) -> usize {
            self.calls.lock().unwrap().len()
        }
    }

    #[async_trait]
    impl RemoteInvoker for MockInvoker {
        async fn invoke(
            &self,
            function_name: &str,
            payload: Vec<u8>,
        ) -> Result<InvocationOutput, InvokeError> {
            self.calls
                .lock()
                .unwrap()
                .push((function_name.to_string(), payload));

            match self.scripts.get(function_name) {
                Some(Scripted::Hosts(hosts)) => Ok(InvocationOutput::success(
                    serde_json::to_vec(&serde_json::json!({ "subdomains": hosts })).unwrap(),
                )),
                Some(Scripted::FunctionError(kind, message)) => Ok(InvocationOutput::function_error(
                    "Unhandled",
                    serde_json::to_vec(&FunctionErrorEnvelope::new(*kind, *message)).unwrap(),
                )),
                Some(Scripted::Transport(message)) => Err(InvokeError::Transport(message.to_string())),
                Some(Scripted::Garbage) => Ok(InvocationOutput::success(b"<html>".to_vec())),
                Some(Scripted::Hang) => {
                    tokio::time::sleep(Duration::from_secs(3600)).await;
                    Ok(InvocationOutput::success(b"{}".to_vec()))
                }
                Some(Scripted::Panic) => panic!("handler crashed"),
                None => Err(InvokeError::UnknownFunction(function_name.to_string())),
            }
        }
    }

    fn input(kinds: &[SourceKind]) -> AggregateInput {
        AggregateInput::new(
            DomainQuery::try_new("example.com").unwrap(),
            kinds.iter().copied().map(SourceTarget::from).collect(),
        )
    }

    #[derive(Default)]
    struct RecordingProgress {
        events: Mutex<Vec<String>>,
    }

    impl SourceProgressNotifier for RecordingProgress {
        fn on_run_start(&self, _domain: &DomainQuery, total_sources: usize) {
            self.events.lock().unwrap().push(format!("start:{}", total_sources));
        }

        fn on_source_complete(&self, source: SourceKind, success: bool, _returned: usize) {
            self.events
                .lock()
                .unwrap()
                .push(format!("{}:{}", source, success));
        }

        fn on_run_complete(&self, unique: usize) {
            self.events.lock().unwrap().push(format!("complete:{}", unique));
        }

        fn on_run_failed(&self) {
            self.events.lock().unwrap().push("failed".to_string());
        }
    }

    fn best_effort() -> BehaviorConfig {
        BehaviorConfig::default().with_failure_policy(FailurePolicy::BestEffort)
    }

    // === Tests ===

    #[tokio::test]
    async fn merges_union_of_all_sources() {
        let invoker = MockInvoker::new(vec![
            (
                SourceKind::CrtSh,
                Scripted::Hosts(vec!["www.example.com", "api.example.com", "www.example.com"]),
            ),
            (
                SourceKind::AlienVault,
                Scripted::Hosts(vec!["mail.example.com", "api.example.com"]),
            ),
        ]);
        let use_case = AggregateSubdomainsUseCase::new(invoker.clone());

        let result = use_case
            .execute(input(&[SourceKind::CrtSh, SourceKind::AlienVault]))
            .await
            .unwrap();

        let hosts: Vec<_> = result.subdomains.iter().cloned().collect();
        assert_eq!(
            hosts,
            vec!["api.example.com", "mail.example.com", "www.example.com"]
        );
        assert_eq!(invoker.call_count(), 2);
        assert_eq!(result.sources.len(), 2);
    }

    #[tokio::test]
    async fn sends_domain_payload() {
        let invoker = MockInvoker::new(vec![(SourceKind::Sublist3r, Scripted::Hosts(vec![]))]);
        let use_case = AggregateSubdomainsUseCase::new(invoker.clone());

        use_case.execute(input(&[SourceKind::Sublist3r])).await.unwrap();

        let calls = invoker.calls.lock().unwrap();
        assert_eq!(calls[0].0, "Sublist3rFunction");
        let payload: InvocationPayload = serde_json::from_slice(&calls[0].1).unwrap();
        assert_eq!(payload.domain, "example.com");
    }

    #[tokio::test]
    async fn empty_results_yield_empty_set() {
        let invoker = MockInvoker::new(vec![
            (SourceKind::CrtSh, Scripted::Hosts(vec![])),
            (SourceKind::Sublist3r, Scripted::Hosts(vec![])),
        ]);
        let use_case = AggregateSubdomainsUseCase::new(invoker);

        let result = use_case
            .execute(input(&[SourceKind::CrtSh, SourceKind::Sublist3r]))
            .await
            .unwrap();
        assert!(result.is_empty());
    }

    #[tokio::test]
    async fn no_targets_is_an_error() {
        let invoker = MockInvoker::new(vec![]);
        let use_case = AggregateSubdomainsUseCase::new(invoker.clone());

        let result = use_case.execute(input(&[])).await;
        assert!(matches!(result, Err(AggregateError::NoSources)));
        assert_eq!(invoker.call_count(), 0);
    }

    #[tokio::test]
    async fn fail_fast_on_function_error() {
        let invoker = MockInvoker::new(vec![
            (SourceKind::CrtSh, Scripted::Hosts(vec!["www.example.com"])),
            (
                SourceKind::AlienVault,
                Scripted::FunctionError("ResponseError", "Invalid status code: 500"),
            ),
        ]);
        let use_case = AggregateSubdomainsUseCase::new(invoker);

        let err = use_case
            .execute(input(&[SourceKind::CrtSh, SourceKind::AlienVault]))
            .await
            .unwrap_err();

        match err {
            AggregateError::Source {
                kind,
                error_type,
                message,
            } => {
                assert_eq!(kind, SourceKind::AlienVault);
                assert_eq!(error_type, "ResponseError");
                assert_eq!(message, "Invalid status code: 500");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[tokio::test]
    async fn fail_fast_on_transport_error() {
        let invoker = MockInvoker::new(vec![(
            SourceKind::CrtSh,
            Scripted::Transport("connection reset"),
        )]);
        let use_case = AggregateSubdomainsUseCase::new(invoker);

        let err = use_case.execute(input(&[SourceKind::CrtSh])).await.unwrap_err();
        assert!(matches!(
            err,
            AggregateError::Invocation { kind: SourceKind::CrtSh, .. }
        ));
    }

    #[tokio::test]
    async fn fail_fast_does_not_wait_for_slow_sources() {
        let invoker = MockInvoker::new(vec![
            (SourceKind::Amass, Scripted::Hang),
            (SourceKind::Censys, Scripted::Transport("refused")),
        ]);
        let use_case = AggregateSubdomainsUseCase::new(invoker);

        let result = tokio::time::timeout(
            Duration::from_secs(5),
            use_case.execute(input(&[SourceKind::Amass, SourceKind::Censys])),
        )
        .await
        .expect("fail-fast run should not block on the hanging source");
        assert!(result.is_err());
    }

    #[tokio::test]
    async fn undecodable_payload_is_decode_error() {
        let invoker = MockInvoker::new(vec![(SourceKind::Sublist3r, Scripted::Garbage)]);
        let use_case = AggregateSubdomainsUseCase::new(invoker);

        let err = use_case
            .execute(input(&[SourceKind::Sublist3r]))
            .await
            .unwrap_err();
        assert!(matches!(err, AggregateError::Decode { .. }));
    }

    #[tokio::test]
    async fn best_effort_keeps_successful_sources() {
        let invoker = MockInvoker::new(vec![
            (SourceKind::CrtSh, Scripted::Hosts(vec!["www.example.com"])),
            (
                SourceKind::Censys,
                Scripted::FunctionError("CredentialError", "No API key provided"),
            ),
        ]);
        let use_case = AggregateSubdomainsUseCase::new(invoker).with_behavior(best_effort());

        let result = use_case
            .execute(input(&[SourceKind::CrtSh, SourceKind::Censys]))
            .await
            .unwrap();

        assert_eq!(result.len(), 1);
        let failures: Vec<_> = result.failures().collect();
        assert_eq!(failures.len(), 1);
        assert_eq!(failures[0].source, SourceKind::Censys);
    }

    #[tokio::test]
    async fn best_effort_fails_when_every_source_fails() {
        let invoker = MockInvoker::new(vec![
            (SourceKind::CrtSh, Scripted::Transport("down")),
            (SourceKind::Censys, Scripted::Garbage),
        ]);
        let use_case = AggregateSubdomainsUseCase::new(invoker).with_behavior(best_effort());

        let err = use_case
            .execute(input(&[SourceKind::CrtSh, SourceKind::Censys]))
            .await
            .unwrap_err();
        assert!(matches!(err, AggregateError::AllSourcesFailed(2)));
    }

    #[tokio::test]
    async fn best_effort_records_panicked_source() {
        let invoker = MockInvoker::new(vec![
            (SourceKind::CrtSh, Scripted::Hosts(vec!["www.example.com"])),
            (SourceKind::Sublist3r, Scripted::Panic),
        ]);
        let use_case = AggregateSubdomainsUseCase::new(invoker).with_behavior(best_effort());

        let result = use_case
            .execute(input(&[SourceKind::CrtSh, SourceKind::Sublist3r]))
            .await
            .unwrap();

        assert_eq!(result.len(), 1);
        assert_eq!(result.sources.len(), 2);
        let failures: Vec<_> = result.failures().collect();
        assert_eq!(failures.len(), 1);
        assert_eq!(failures[0].source, SourceKind::Sublist3r);
        assert!(
            failures[0]
                .error
                .as_deref()
                .unwrap()
                .contains("source task failed")
        );
    }

    #[tokio::test]
    async fn fail_fast_reports_panicked_source() {
        let invoker = MockInvoker::new(vec![(SourceKind::Censys, Scripted::Panic)]);
        let use_case = AggregateSubdomainsUseCase::new(invoker);

        let err = use_case.execute(input(&[SourceKind::Censys])).await.unwrap_err();
        assert!(matches!(
            err,
            AggregateError::TaskFailed { kind: SourceKind::Censys, .. }
        ));
    }

    #[tokio::test]
    async fn progress_closes_on_failed_run() {
        let invoker = MockInvoker::new(vec![(SourceKind::CrtSh, Scripted::Transport("down"))]);
        let use_case = AggregateSubdomainsUseCase::new(invoker);
        let progress = RecordingProgress::default();

        let result = use_case
            .execute_with_progress(input(&[SourceKind::CrtSh]), &progress)
            .await;

        assert!(result.is_err());
        assert_eq!(
            *progress.events.lock().unwrap(),
            vec!["start:1", "crtsh:false", "failed"]
        );
    }

    #[tokio::test]
    async fn progress_closes_when_every_source_fails() {
        let invoker = MockInvoker::new(vec![(SourceKind::CrtSh, Scripted::Panic)]);
        let use_case = AggregateSubdomainsUseCase::new(invoker).with_behavior(best_effort());
        let progress = RecordingProgress::default();

        let err = use_case
            .execute_with_progress(input(&[SourceKind::CrtSh]), &progress)
            .await
            .unwrap_err();

        assert!(matches!(err, AggregateError::AllSourcesFailed(1)));
        assert_eq!(progress.events.lock().unwrap().last().unwrap(), "failed");
    }

    #[tokio::test]
    async fn progress_completes_on_success() {
        let invoker = MockInvoker::new(vec![(SourceKind::CrtSh, Scripted::Hosts(vec!["a.example.com"]))]);
        let use_case = AggregateSubdomainsUseCase::new(invoker);
        let progress = RecordingProgress::default();

        use_case
            .execute_with_progress(input(&[SourceKind::CrtSh]), &progress)
            .await
            .unwrap();

        assert_eq!(
            *progress.events.lock().unwrap(),
            vec!["start:1", "crtsh:true", "complete:1"]
        );
    }

    #[tokio::test]
    async fn timeout_is_reported_as_invocation_failure() {
        let invoker = MockInvoker::new(vec![(SourceKind::Amass, Scripted::Hang)]);
        let behavior = BehaviorConfig {
            timeout: Some(Duration::from_millis(20)),
            ..Default::default()
        };
        let use_case = AggregateSubdomainsUseCase::new(invoker).with_behavior(behavior);

        let err = use_case.execute(input(&[SourceKind::Amass])).await.unwrap_err();
        match err {
            AggregateError::Invocation { message, .. } => {
                assert_eq!(message, "Invocation timed out")
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn decode_output_accepts_null_subdomains() {
        let output = InvocationOutput::success(br#"{"subdomains":null}"#.to_vec());
        assert!(decode_output(SourceKind::CrtSh, &output).unwrap().is_empty());
    }

    #[test]
    fn decode_output_ignores_error_fields_without_marker() {
        // Only the function-error marker signals failure.
        let output = InvocationOutput::success(
            br#"{"subdomains":["a.example.com"],"errorMessage":"stale"}"#.to_vec(),
        );
        assert_eq!(
            decode_output(SourceKind::CrtSh, &output).unwrap(),
            vec!["a.example.com"]
        );
    }
}
