use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Instant;

use tokio::sync::watch;
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

use crate::config::{BASE_URL_ENV, ServiceConfig};
use crate::errors::CheckError;
use crate::outcome::{AnalysisOutcome, OutputPanel};
use crate::request::{CheckRequest, Credential, DEFAULT_CONDITION};
use crate::service::{AnalysisService, HttpAnalysisService};

/// Handle used to request cancellation of one submission.
#[derive(Clone)]
pub struct AbortHandle {
    tx: watch::Sender<bool>,
}

impl AbortHandle {
    /// Requests cancellation.
    ///
    /// Cancellation is cooperative: the in-flight request future is dropped
    /// and the submission resolves to `AnalysisOutcome::Cancelled`.
    pub fn abort(&self) {
        let _ = self.tx.send(true);
    }

    pub fn is_aborted(&self) -> bool {
        *self.tx.borrow()
    }
}

struct SessionState {
    /// Bumped by every submission and cancellation. Results carrying an older
    /// value are dropped.
    generation: u64,
    in_flight: Option<AbortHandle>,
    outcome: AnalysisOutcome,
    output: OutputPanel,
}

struct Shared {
    state: Mutex<SessionState>,
    outcome_tx: watch::Sender<AnalysisOutcome>,
}

impl Shared {
    fn new() -> Self {
        let (outcome_tx, _) = watch::channel(AnalysisOutcome::Empty);
        Self {
            state: Mutex::new(SessionState {
                generation: 0,
                in_flight: None,
                outcome: AnalysisOutcome::Empty,
                output: OutputPanel::default(),
            }),
            outcome_tx,
        }
    }

    fn lock(&self) -> MutexGuard<'_, SessionState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn transition(&self, state: &mut SessionState, outcome: AnalysisOutcome) {
        state.output.apply(&outcome);
        state.outcome = outcome.clone();
        self.outcome_tx.send_replace(outcome);
    }

    /// Invalidates whatever is in flight without recording an outcome.
    fn supersede(&self, state: &mut SessionState) {
        state.generation = state.generation.wrapping_add(1);
        if let Some(previous) = state.in_flight.take() {
            previous.abort();
            debug!(
                event = "check.superseded",
                domain = "check",
                generation = state.generation
            );
        }
    }

    /// Records a task result if `generation` is still current.
    fn commit(&self, generation: u64, outcome: &AnalysisOutcome) -> bool {
        let mut state = self.lock();
        if state.generation != generation {
            return false;
        }
        state.in_flight = None;
        self.transition(&mut state, outcome.clone());
        true
    }

    /// Cancels the in-flight submission, if any.
    fn cancel(&self) -> bool {
        let mut state = self.lock();
        let Some(abort) = state.in_flight.take() else {
            return false;
        };
        state.generation = state.generation.wrapping_add(1);
        abort.abort();
        self.transition(&mut state, AnalysisOutcome::Cancelled);
        true
    }
}

/// Owns the lifecycle of the single outstanding analysis request.
///
/// At most one submission is current. Submitting again supersedes the
/// previous one, and only the current submission may change the outcome
/// and output. Dropping the controller cancels whatever is in flight.
pub struct AnalysisController {
    service: Arc<dyn AnalysisService>,
    config: ServiceConfig,
    condition: String,
    shared: Arc<Shared>,
}

impl AnalysisController {
    /// Starts a builder for a controller using `config`.
    pub fn builder(config: ServiceConfig) -> ControllerBuilder {
        ControllerBuilder {
            config,
            service: None,
            condition: DEFAULT_CONDITION.to_string(),
        }
    }

    /// Validates inputs and dispatches one check request.
    ///
    /// Returns `CheckError::Validation` without touching any state when the
    /// URL or credential is blank. Returns `CheckError::Config` and records
    /// `AnalysisOutcome::Misconfigured` when no base address is configured.
    /// Otherwise spawns the request on the current tokio runtime and returns
    /// a handle resolving to this submission's terminal outcome.
    pub fn submit(
        &self,
        stream_url: &str,
        credential: &Credential,
    ) -> Result<Submission, CheckError> {
        if let Err(err) = validate_inputs(stream_url, credential) {
            debug!(event = "check.validation_failed", domain = "check", error = %err);
            return Err(err);
        }

        let mut state = self.shared.lock();
        self.shared.supersede(&mut state);
        state.output.clear();

        let Some(endpoint) = self.config.check_once_url() else {
            let message = format!("{BASE_URL_ENV} not configured");
            warn!(event = "check.misconfigured", domain = "check", missing = BASE_URL_ENV);
            self.shared.transition(
                &mut state,
                AnalysisOutcome::Misconfigured {
                    message: message.clone(),
                },
            );
            return Err(CheckError::Config(message));
        };

        let generation = state.generation;
        let (abort_tx, abort_rx) = watch::channel(false);
        let abort = AbortHandle { tx: abort_tx };
        state.in_flight = Some(abort.clone());
        self.shared.transition(&mut state, AnalysisOutcome::Connecting);
        drop(state);

        let id = uuid::Uuid::new_v4();
        info!(
            event = "check.submitted",
            domain = "check",
            submission_id = %id,
            generation = generation,
            stream_host = url_host(stream_url).unwrap_or("unknown"),
            endpoint_host = url_host(&endpoint).unwrap_or("unknown")
        );

        let task = tokio::spawn(run_check(
            self.service.clone(),
            self.shared.clone(),
            CheckTask {
                id,
                generation,
                endpoint,
                request: CheckRequest::new(self.condition.clone(), stream_url),
                credential: credential.clone(),
            },
            abort_rx,
        ));

        Ok(Submission {
            id,
            abort,
            task,
        })
    }

    /// Cancels the in-flight submission. No-op when nothing is in flight.
    pub fn cancel(&self) {
        if self.shared.cancel() {
            info!(event = "check.cancelled", domain = "check");
        }
    }

    /// Current outcome.
    pub fn outcome(&self) -> AnalysisOutcome {
        self.shared.lock().outcome.clone()
    }

    /// Current output panel text.
    pub fn output(&self) -> String {
        self.shared.lock().output.as_str().to_string()
    }

    pub fn is_in_flight(&self) -> bool {
        self.shared.lock().in_flight.is_some()
    }

    /// Receiver that observes every outcome transition.
    pub fn subscribe(&self) -> watch::Receiver<AnalysisOutcome> {
        self.shared.outcome_tx.subscribe()
    }
}

impl Drop for AnalysisController {
    fn drop(&mut self) {
        if self.shared.cancel() {
            debug!(event = "check.cancelled_on_drop", domain = "check");
        }
    }
}

/// Builder for [`AnalysisController`].
pub struct ControllerBuilder {
    config: ServiceConfig,
    service: Option<Arc<dyn AnalysisService>>,
    condition: String,
}

impl ControllerBuilder {
    /// Uses a custom service instead of the default HTTP client.
    pub fn service(mut self, service: Arc<dyn AnalysisService>) -> Self {
        self.service = Some(service);
        self
    }

    /// Overrides the instruction text sent with each request.
    pub fn condition(mut self, condition: impl Into<String>) -> Self {
        self.condition = condition.into();
        self
    }

    pub fn build(self) -> Result<AnalysisController, CheckError> {
        if self.condition.trim().is_empty() {
            return Err(CheckError::Config("condition must not be empty".into()));
        }
        let service = match self.service {
            Some(service) => service,
            None => Arc::new(HttpAnalysisService::new(self.config.timeout)?),
        };
        Ok(AnalysisController {
            service,
            config: self.config,
            condition: self.condition,
            shared: Arc::new(Shared::new()),
        })
    }
}

/// Handle for one dispatched check.
pub struct Submission {
    id: uuid::Uuid,
    abort: AbortHandle,
    task: JoinHandle<AnalysisOutcome>,
}

impl Submission {
    /// Id used in log events for this submission.
    pub fn id(&self) -> uuid::Uuid {
        self.id
    }

    /// Returns a handle that cancels only this submission.
    pub fn abort_handle(&self) -> AbortHandle {
        self.abort.clone()
    }

    /// Waits for this submission's terminal outcome.
    ///
    /// A submission that was superseded or cancelled resolves to
    /// `AnalysisOutcome::Cancelled`, even if its response did arrive.
    pub async fn wait(self) -> AnalysisOutcome {
        match self.task.await {
            Ok(outcome) => outcome,
            Err(err) if err.is_cancelled() => AnalysisOutcome::Cancelled,
            Err(err) => AnalysisOutcome::TransportFailed {
                message: format!("check task failed: {err}"),
            },
        }
    }
}

struct CheckTask {
    id: uuid::Uuid,
    generation: u64,
    endpoint: String,
    request: CheckRequest,
    credential: Credential,
}

async fn run_check(
    service: Arc<dyn AnalysisService>,
    shared: Arc<Shared>,
    task: CheckTask,
    mut abort_rx: watch::Receiver<bool>,
) -> AnalysisOutcome {
    let started = Instant::now();
    let outcome = tokio::select! {
        biased;
        () = wait_for_abort(&mut abort_rx) => AnalysisOutcome::Cancelled,
        result = service.check_once(&task.endpoint, &task.request, &task.credential) => {
            match result {
                Ok(response) if response.is_success() => {
                    AnalysisOutcome::from_success_body(&response.body)
                }
                Ok(response) => AnalysisOutcome::from_rejection(response.status, &response.body),
                Err(err) => AnalysisOutcome::TransportFailed {
                    message: err.message().to_string(),
                },
            }
        }
    };
    let elapsed_ms = started.elapsed().as_millis() as u64;

    if !shared.commit(task.generation, &outcome) {
        debug!(
            event = "check.stale_result_dropped",
            domain = "check",
            submission_id = %task.id,
            generation = task.generation,
            elapsed_ms = elapsed_ms
        );
        return AnalysisOutcome::Cancelled;
    }

    match &outcome {
        AnalysisOutcome::Succeeded { body, .. } => info!(
            event = "check.succeeded",
            domain = "check",
            submission_id = %task.id,
            elapsed_ms = elapsed_ms,
            has_explanation = body.get("explanation").is_some()
        ),
        AnalysisOutcome::HttpRejected { status_code, .. } => warn!(
            event = "check.rejected",
            domain = "check",
            submission_id = %task.id,
            status = *status_code,
            elapsed_ms = elapsed_ms
        ),
        AnalysisOutcome::TransportFailed { message } => warn!(
            event = "check.transport_failed",
            domain = "check",
            submission_id = %task.id,
            error = %message,
            elapsed_ms = elapsed_ms
        ),
        AnalysisOutcome::Cancelled => info!(
            event = "check.cancelled",
            domain = "check",
            submission_id = %task.id,
            elapsed_ms = elapsed_ms
        ),
        _ => {}
    }
    outcome
}

async fn wait_for_abort(rx: &mut watch::Receiver<bool>) {
    loop {
        if *rx.borrow_and_update() {
            return;
        }
        if rx.changed().await.is_err() {
            // Every handle is gone, so nobody can abort any more.
            std::future::pending::<()>().await;
        }
    }
}

fn validate_inputs(stream_url: &str, credential: &Credential) -> Result<(), CheckError> {
    if stream_url.trim().is_empty() {
        return Err(CheckError::Validation("stream URL must not be empty".into()));
    }
    if credential.is_blank() {
        return Err(CheckError::Validation("API key must not be empty".into()));
    }
    Ok(())
}

fn url_host(url: &str) -> Option<&str> {
    let without_scheme = url.split("://").nth(1).unwrap_or(url);
    without_scheme
        .split(['/', '?'])
        .next()
        .map(str::trim)
        .filter(|host| !host.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::ServiceError;
    use crate::service::ServiceResponse;
    use std::collections::VecDeque;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use tokio::sync::oneshot;

    const BASE_URL: &str = "http://svc.test";
    const STREAM: &str = "https://www.youtube.com/live/2q0JpKkhIYk";

    enum Step {
        Respond(ServiceResponse),
        Fail(ServiceError),
        Pending,
        Gated(oneshot::Receiver<()>, ServiceResponse),
    }

    #[derive(Default)]
    struct FakeService {
        calls: AtomicUsize,
        steps: Mutex<VecDeque<Step>>,
        seen: Mutex<Vec<(String, CheckRequest, Credential)>>,
    }

    impl FakeService {
        fn with_steps(steps: Vec<Step>) -> Arc<Self> {
            Arc::new(Self {
                steps: Mutex::new(steps.into()),
                ..Self::default()
            })
        }

        fn calls(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }
    }

    #[async_trait::async_trait]
    impl AnalysisService for FakeService {
        async fn check_once(
            &self,
            endpoint: &str,
            request: &CheckRequest,
            credential: &Credential,
        ) -> Result<ServiceResponse, ServiceError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            self.seen.lock().expect("seen lock").push((
                endpoint.to_string(),
                request.clone(),
                credential.clone(),
            ));
            let step = self
                .steps
                .lock()
                .expect("steps lock")
                .pop_front()
                .unwrap_or(Step::Pending);
            match step {
                Step::Respond(response) => Ok(response),
                Step::Fail(err) => Err(err),
                Step::Pending => std::future::pending().await,
                Step::Gated(gate, response) => {
                    let _ = gate.await;
                    Ok(response)
                }
            }
        }
    }

    async fn wait_for_calls(service: &FakeService, expected: usize) {
        for _ in 0..100 {
            if service.calls() >= expected {
                return;
            }
            tokio::task::yield_now().await;
        }
        panic!("service was called {} times, expected {expected}", service.calls());
    }

    fn controller(service: Arc<FakeService>) -> AnalysisController {
        AnalysisController::builder(ServiceConfig::new(BASE_URL))
            .service(service)
            .build()
            .expect("build controller")
    }

    fn key() -> Credential {
        Credential::new("test-key")
    }

    #[tokio::test]
    async fn blank_inputs_are_rejected_without_network_or_state_change() {
        let service = FakeService::with_steps(vec![]);
        let controller = controller(service.clone());

        let err = controller
            .submit(STREAM, &Credential::new(""))
            .err()
            .expect("empty key should fail");
        assert!(matches!(err, CheckError::Validation(msg) if msg.contains("API key")));

        let err = controller
            .submit("  ", &key())
            .err()
            .expect("empty url should fail");
        assert!(matches!(err, CheckError::Validation(msg) if msg.contains("stream URL")));

        tokio::task::yield_now().await;
        assert_eq!(service.calls(), 0);
        assert_eq!(controller.outcome(), AnalysisOutcome::Empty);
        assert_eq!(controller.output(), "");
    }

    #[tokio::test]
    async fn missing_base_url_records_misconfigured_without_network() {
        let service = FakeService::with_steps(vec![]);
        let controller = AnalysisController::builder(ServiceConfig::default())
            .service(service.clone())
            .build()
            .expect("build controller");

        let err = controller
            .submit(STREAM, &key())
            .err()
            .expect("missing base url should fail");
        assert!(matches!(err, CheckError::Config(msg) if msg.contains("TRIO_BASE_URL")));

        tokio::task::yield_now().await;
        assert_eq!(service.calls(), 0);
        assert!(matches!(
            controller.outcome(),
            AnalysisOutcome::Misconfigured { .. }
        ));
        assert_eq!(controller.output(), "Error: TRIO_BASE_URL not configured");
        assert!(!controller.is_in_flight());
    }

    #[tokio::test]
    async fn explanation_becomes_output_and_request_is_well_formed() {
        let service = FakeService::with_steps(vec![Step::Respond(ServiceResponse::new(
            200,
            r#"{"explanation":"Team Blue leads 60%","event":"goal","frame_count":2}"#,
        ))]);
        let controller = controller(service.clone());

        let submission = controller.submit(STREAM, &key()).expect("submit");
        assert!(controller.is_in_flight());
        assert_eq!(controller.outcome(), AnalysisOutcome::Connecting);
        assert_eq!(controller.output(), "Connecting to API...\n");

        let outcome = submission.wait().await;
        assert!(matches!(
            &outcome,
            AnalysisOutcome::Succeeded { display_text, .. } if display_text == "Team Blue leads 60%"
        ));
        assert_eq!(controller.outcome(), outcome);
        assert_eq!(controller.output(), "Team Blue leads 60%");
        assert!(!controller.is_in_flight());

        let seen = service.seen.lock().expect("seen lock");
        let (endpoint, request, credential) = &seen[0];
        assert_eq!(endpoint, "http://svc.test/api/check-once");
        assert_eq!(request.condition, DEFAULT_CONDITION);
        assert_eq!(request.stream_url, STREAM);
        assert!(request.include_frame);
        assert_eq!(credential.expose(), "test-key");
    }

    #[tokio::test]
    async fn body_without_explanation_is_shown_pretty_printed() {
        let body = r#"{"event":"halftime","summary":"1-1","frame_count":8}"#;
        let service =
            FakeService::with_steps(vec![Step::Respond(ServiceResponse::new(200, body))]);
        let controller = controller(service);

        let outcome = controller.submit(STREAM, &key()).expect("submit").wait().await;
        let value: serde_json::Value = serde_json::from_str(body).expect("json");
        let expected = serde_json::to_string_pretty(&value).expect("pretty");
        assert!(
            matches!(&outcome, AnalysisOutcome::Succeeded { display_text, .. } if *display_text == expected)
        );
        assert_eq!(controller.output(), expected);
    }

    #[tokio::test]
    async fn http_rejection_shows_status_and_pretty_body() {
        let service = FakeService::with_steps(vec![Step::Respond(ServiceResponse::new(
            401,
            r#"{"detail":"invalid api key"}"#,
        ))]);
        let controller = controller(service);

        let outcome = controller.submit(STREAM, &key()).expect("submit").wait().await;
        assert!(matches!(
            outcome,
            AnalysisOutcome::HttpRejected {
                status_code: 401,
                ..
            }
        ));
        assert_eq!(
            controller.output(),
            "API Error: 401\n{\n  \"detail\": \"invalid api key\"\n}"
        );
    }

    #[tokio::test]
    async fn transport_failure_is_appended_to_connecting_notice() {
        let service = FakeService::with_steps(vec![Step::Fail(ServiceError::transport(
            "failed to connect: connection refused",
        ))]);
        let controller = controller(service);

        let outcome = controller.submit(STREAM, &key()).expect("submit").wait().await;
        assert_eq!(
            outcome,
            AnalysisOutcome::TransportFailed {
                message: "failed to connect: connection refused".into()
            }
        );
        assert_eq!(
            controller.output(),
            "Connecting to API...\n\nError: failed to connect: connection refused"
        );
    }

    #[tokio::test]
    async fn malformed_success_body_is_transport_failure() {
        let service = FakeService::with_steps(vec![Step::Respond(ServiceResponse::new(
            200,
            "not json at all",
        ))]);
        let controller = controller(service);

        let outcome = controller.submit(STREAM, &key()).expect("submit").wait().await;
        assert!(matches!(outcome, AnalysisOutcome::TransportFailed { .. }));
        assert!(controller.output().starts_with("Connecting to API...\n\nError: invalid JSON"));
    }

    #[tokio::test]
    async fn cancel_before_response_yields_cancelled() {
        let service = FakeService::with_steps(vec![Step::Pending]);
        let controller = controller(service.clone());

        let submission = controller.submit(STREAM, &key()).expect("submit");
        wait_for_calls(&service, 1).await;
        controller.cancel();

        assert_eq!(submission.wait().await, AnalysisOutcome::Cancelled);
        assert_eq!(controller.outcome(), AnalysisOutcome::Cancelled);
        assert_eq!(
            controller.output(),
            "Connecting to API...\n\nConnection stopped."
        );
        assert!(!controller.is_in_flight());
    }

    #[tokio::test]
    async fn cancel_wins_over_a_ready_response() {
        let service = FakeService::with_steps(vec![Step::Respond(ServiceResponse::new(
            200,
            r#"{"explanation":"too late"}"#,
        ))]);
        let controller = controller(service);

        let submission = controller.submit(STREAM, &key()).expect("submit");
        controller.cancel();

        assert_eq!(submission.wait().await, AnalysisOutcome::Cancelled);
        assert_eq!(controller.outcome(), AnalysisOutcome::Cancelled);
    }

    #[tokio::test]
    async fn cancel_is_a_no_op_when_idle_or_finished() {
        let service = FakeService::with_steps(vec![Step::Respond(ServiceResponse::new(
            200,
            r#"{"explanation":"done"}"#,
        ))]);
        let controller = controller(service);

        controller.cancel();
        assert_eq!(controller.outcome(), AnalysisOutcome::Empty);
        assert_eq!(controller.output(), "");

        controller.submit(STREAM, &key()).expect("submit").wait().await;
        controller.cancel();
        assert!(matches!(
            controller.outcome(),
            AnalysisOutcome::Succeeded { .. }
        ));
        assert_eq!(controller.output(), "done");
    }

    #[tokio::test]
    async fn newer_submission_supersedes_older_one() {
        let (release_first, gate) = oneshot::channel();
        let service = FakeService::with_steps(vec![
            Step::Gated(
                gate,
                ServiceResponse::new(200, r#"{"explanation":"stale answer"}"#),
            ),
            Step::Respond(ServiceResponse::new(200, r#"{"explanation":"fresh answer"}"#)),
        ]);
        let controller = controller(service.clone());

        let first = controller.submit(STREAM, &key()).expect("first submit");
        wait_for_calls(&service, 1).await;
        let second = controller
            .submit("https://youtu.be/other", &key())
            .expect("second submit");
        let _ = release_first.send(());

        assert_eq!(first.wait().await, AnalysisOutcome::Cancelled);
        let outcome = second.wait().await;
        assert!(matches!(
            &outcome,
            AnalysisOutcome::Succeeded { display_text, .. } if display_text == "fresh answer"
        ));
        assert_eq!(controller.outcome(), outcome);
        assert_eq!(controller.output(), "fresh answer");
    }

    #[tokio::test]
    async fn superseded_result_never_overwrites_pending_newer_submission() {
        let (release_first, gate) = oneshot::channel();
        let service = FakeService::with_steps(vec![
            Step::Gated(
                gate,
                ServiceResponse::new(200, r#"{"explanation":"stale answer"}"#),
            ),
            Step::Pending,
        ]);
        let controller = controller(service.clone());

        let first = controller.submit(STREAM, &key()).expect("first submit");
        wait_for_calls(&service, 1).await;
        let _second = controller.submit(STREAM, &key()).expect("second submit");
        let _ = release_first.send(());

        assert_eq!(first.wait().await, AnalysisOutcome::Cancelled);
        assert_eq!(controller.outcome(), AnalysisOutcome::Connecting);
        assert_eq!(controller.output(), "Connecting to API...\n");
        assert!(controller.is_in_flight());
    }

    #[tokio::test]
    async fn controllers_keep_isolated_state() {
        let service = FakeService::with_steps(vec![Step::Pending]);
        let controller = controller(service.clone());
        let first = controller.submit(STREAM, &key()).expect("submit");

        let unconfigured = AnalysisController::builder(ServiceConfig::default())
            .service(service)
            .build()
            .expect("build");
        assert!(unconfigured.submit(STREAM, &key()).is_err());
        assert!(controller.is_in_flight());

        controller.cancel();
        assert_eq!(first.wait().await, AnalysisOutcome::Cancelled);
    }

    #[tokio::test]
    async fn abort_handle_cancels_only_its_submission() {
        let service = FakeService::with_steps(vec![Step::Pending]);
        let controller = controller(service);

        let submission = controller.submit(STREAM, &key()).expect("submit");
        let abort = submission.abort_handle();
        abort.abort();
        assert!(abort.is_aborted());

        assert_eq!(submission.wait().await, AnalysisOutcome::Cancelled);
        assert_eq!(controller.outcome(), AnalysisOutcome::Cancelled);
        assert_eq!(
            controller.output(),
            "Connecting to API...\n\nConnection stopped."
        );
        assert!(!controller.is_in_flight());
    }

    #[tokio::test]
    async fn dropping_controller_cancels_in_flight_request() {
        let service = FakeService::with_steps(vec![Step::Pending]);
        let controller = controller(service);
        let updates = controller.subscribe();

        let submission = controller.submit(STREAM, &key()).expect("submit");
        drop(controller);

        assert_eq!(submission.wait().await, AnalysisOutcome::Cancelled);
        assert_eq!(*updates.borrow(), AnalysisOutcome::Cancelled);
    }

    #[tokio::test]
    async fn subscribers_observe_transitions() {
        let service = FakeService::with_steps(vec![Step::Respond(ServiceResponse::new(
            200,
            r#"{"explanation":"Red 70%"}"#,
        ))]);
        let controller = controller(service);
        let mut updates = controller.subscribe();
        assert_eq!(*updates.borrow_and_update(), AnalysisOutcome::Empty);

        let submission = controller.submit(STREAM, &key()).expect("submit");
        assert_eq!(*updates.borrow_and_update(), AnalysisOutcome::Connecting);

        submission.wait().await;
        updates.changed().await.expect("terminal update");
        assert!(matches!(
            &*updates.borrow(),
            AnalysisOutcome::Succeeded { display_text, .. } if display_text == "Red 70%"
        ));
    }

    #[test]
    fn builder_rejects_blank_condition() {
        let result = AnalysisController::builder(ServiceConfig::new(BASE_URL))
            .service(FakeService::with_steps(vec![]))
            .condition("   ")
            .build();
        assert!(matches!(result, Err(CheckError::Config(msg)) if msg.contains("condition")));
    }

    #[test]
    fn url_host_strips_scheme_path_and_query() {
        assert_eq!(url_host("https://youtu.be/abc?t=1"), Some("youtu.be"));
        assert_eq!(url_host("http://svc.test/api/check-once"), Some("svc.test"));
        assert_eq!(url_host(""), None);
    }
}
