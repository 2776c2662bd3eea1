//! Test helper utilities: a scripted recognition API and a local HTTP server
#![allow(dead_code)]

use std::collections::VecDeque;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use axum::Router;
use sampras_scan::models::api::ProcessRequest;
use sampras_scan::models::job::{ImagePayload, JobRequest, RunState, Token};
use sampras_scan::services::delay::Delay;
use sampras_scan::services::poller::PollPolicy;
use sampras_scan::services::recognition::{ApiError, RecognitionApi};
use sampras_scan::services::runner::JobRunner;
use sampras_scan::services::session::Session;
use serde_json::Value;

/// A scripted reply: a JSON body, or a transport failure.
pub type Reply = Result<Value, &'static str>;

#[derive(Default)]
struct Script {
    process: VecDeque<Reply>,
    result: VecDeque<Reply>,
    process_calls: Vec<ProcessRequest>,
    result_calls: Vec<String>,
    observed_states: Vec<RunState>,
}

/// In-memory [`RecognitionApi`] that replays canned replies in order.
///
/// Once a script runs dry every further call fails as a transport error.
#[derive(Default)]
pub struct ScriptedApi {
    script: Mutex<Script>,
    observed: Mutex<Option<Arc<Session>>>,
}

impl ScriptedApi {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn on_process(self, reply: Reply) -> Self {
        self.script.lock().unwrap().process.push_back(reply);
        self
    }

    pub fn on_result(self, reply: Reply) -> Self {
        self.script.lock().unwrap().result.push_back(reply);
        self
    }

    pub fn on_result_times(self, reply: Reply, times: usize) -> Self {
        {
            let mut script = self.script.lock().unwrap();
            for _ in 0..times {
                script.result.push_back(reply.clone());
            }
        }
        self
    }

    /// Record the session's run state each time a request is issued.
    pub fn observe(&self, session: Arc<Session>) {
        *self.observed.lock().unwrap() = Some(session);
    }

    pub fn process_calls(&self) -> Vec<ProcessRequest> {
        self.script.lock().unwrap().process_calls.clone()
    }

    pub fn result_calls(&self) -> Vec<String> {
        self.script.lock().unwrap().result_calls.clone()
    }

    pub fn observed_states(&self) -> Vec<RunState> {
        self.script.lock().unwrap().observed_states.clone()
    }

    fn record_state(&self, script: &mut Script) {
        if let Some(session) = self.observed.lock().unwrap().as_ref() {
            script.observed_states.push(session.run_state());
        }
    }
}

fn to_api(reply: Option<Reply>) -> Result<Value, ApiError> {
    match reply {
        Some(Ok(body)) => Ok(body),
        Some(Err(reason)) => Err(ApiError::Unavailable(reason.to_string())),
        None => Err(ApiError::Unavailable("script exhausted".to_string())),
    }
}

#[async_trait]
impl RecognitionApi for ScriptedApi {
    async fn process(&self, request: &ProcessRequest) -> Result<Value, ApiError> {
        let mut script = self.script.lock().unwrap();
        self.record_state(&mut script);
        script.process_calls.push(request.clone());
        let reply = script.process.pop_front();
        to_api(reply)
    }

    async fn result(&self, token: &Token) -> Result<Value, ApiError> {
        let mut script = self.script.lock().unwrap();
        self.record_state(&mut script);
        script.result_calls.push(token.as_str().to_string());
        let reply = script.result.pop_front();
        to_api(reply)
    }
}

/// Delay that returns immediately but remembers what it was asked to wait.
#[derive(Default)]
pub struct RecordingDelay {
    waits: Mutex<Vec<Duration>>,
}

impl RecordingDelay {
    pub fn waits(&self) -> Vec<Duration> {
        self.waits.lock().unwrap().clone()
    }
}

#[async_trait]
impl Delay for RecordingDelay {
    async fn wait(&self, duration: Duration) {
        self.waits.lock().unwrap().push(duration);
    }
}

/// Delay that yields to the scheduler once, so other futures get polled.
pub struct YieldingDelay;

#[async_trait]
impl Delay for YieldingDelay {
    async fn wait(&self, _duration: Duration) {
        tokio::task::yield_now().await;
    }
}

pub fn sample_job() -> JobRequest {
    JobRequest::new(
        Some(ImagePayload::from_base64("abc")),
        Some(ImagePayload::from_base64("def")),
    )
    .unwrap()
}

/// Runner wired to a scripted API with default retry policy and a recording delay.
pub fn scripted_runner(api: Arc<ScriptedApi>) -> (Arc<Session>, Arc<RecordingDelay>, JobRunner) {
    let session = Arc::new(Session::new());
    let delay = Arc::new(RecordingDelay::default());
    let runner = JobRunner::new(
        session.clone(),
        api,
        delay.clone(),
        "tester",
        PollPolicy::default(),
    );
    (session, delay, runner)
}

/// Event-log messages in insertion order.
pub fn log_messages(session: &Session) -> Vec<String> {
    session.entries().into_iter().map(|entry| entry.message).collect()
}

pub fn count_prefixed(messages: &[String], prefix: &str) -> usize {
    messages.iter().filter(|m| m.starts_with(prefix)).count()
}

/// Serve a router on an ephemeral local port and return its base URL.
pub async fn spawn_server(app: Router) -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    format!("http://{}", addr)
}

/// Wait until the session goes idle, failing the test after `limit`.
pub async fn wait_until_idle(session: &Session, limit: Duration) {
    tokio::time::timeout(limit, async {
        while session.is_in_flight() {
            tokio::time::sleep(Duration::from_millis(10)).await;
        }
    })
    .await
    .expect("job did not reach a terminal outcome in time");
}
