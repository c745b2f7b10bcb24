//! A queue-backed capability double.

use std::collections::{HashMap, VecDeque};
use std::sync::{Mutex, MutexGuard, PoisonError};

use async_trait::async_trait;
use patchwise_ai::contract::{
    AdviseRequest, ChatRequest, CorrelateRequest, Flow, NormalizeRequest, ParseScanRequest,
    PrioritizeRequest,
};
use patchwise_ai::{Capability, CapabilityError};
use serde_json::Value;

type ReplyQueues = HashMap<Flow, VecDeque<Result<Value, CapabilityError>>>;

/// One request observed by the double.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RecordedRequest {
    /// A normalize invocation
    Normalize(NormalizeRequest),
    /// A parse-scan invocation
    ParseScan(ParseScanRequest),
    /// A correlate invocation
    Correlate(CorrelateRequest),
    /// A prioritize invocation
    Prioritize(PrioritizeRequest),
    /// An advise invocation
    Advise(AdviseRequest),
    /// A chat invocation
    Chat(ChatRequest),
}

/// Capability backend that replays scripted replies.
///
/// Replies are queued per flow and consumed in order; every incoming
/// request is recorded for later inspection. A flow invoked with an empty
/// queue answers [`CapabilityError::Unavailable`], so a test fails loudly
/// when the code under test makes a call it did not script.
#[derive(Debug, Default)]
pub struct ScriptedCapability {
    replies: Mutex<ReplyQueues>,
    requests: Mutex<Vec<RecordedRequest>>,
}

impl ScriptedCapability {
    /// Create a double with no scripted replies.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue a successful reply for `flow`.
    pub fn enqueue(&self, flow: Flow, reply: Value) {
        self.lock_replies()
            .entry(flow)
            .or_default()
            .push_back(Ok(reply));
    }

    /// Queue a failure for `flow`.
    pub fn enqueue_error(&self, flow: Flow, error: CapabilityError) {
        self.lock_replies()
            .entry(flow)
            .or_default()
            .push_back(Err(error));
    }

    /// Requests observed so far, in arrival order.
    #[must_use]
    pub fn requests(&self) -> Vec<RecordedRequest> {
        self.lock_requests().clone()
    }

    /// Number of scripted replies not yet consumed.
    #[must_use]
    pub fn remaining(&self) -> usize {
        self.lock_replies().values().map(VecDeque::len).sum()
    }

    fn take(&self, flow: Flow) -> Result<Value, CapabilityError> {
        match self
            .lock_replies()
            .get_mut(&flow)
            .and_then(VecDeque::pop_front)
        {
            Some(reply) => reply,
            None => Err(CapabilityError::Unavailable {
                flow: flow.name(),
                reason: "no scripted reply queued".to_owned(),
            }),
        }
    }

    fn lock_replies(&self) -> MutexGuard<'_, ReplyQueues> {
        self.replies.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn lock_requests(&self) -> MutexGuard<'_, Vec<RecordedRequest>> {
        self.requests.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

#[async_trait]
impl Capability for ScriptedCapability {
    async fn normalize_feed(&self, request: NormalizeRequest) -> Result<Value, CapabilityError> {
        self.lock_requests()
            .push(RecordedRequest::Normalize(request));
        self.take(Flow::Normalize)
    }

    async fn parse_scan(&self, request: ParseScanRequest) -> Result<Value, CapabilityError> {
        self.lock_requests()
            .push(RecordedRequest::ParseScan(request));
        self.take(Flow::ParseScan)
    }

    async fn correlate(&self, request: CorrelateRequest) -> Result<Value, CapabilityError> {
        self.lock_requests()
            .push(RecordedRequest::Correlate(request));
        self.take(Flow::Correlate)
    }

    async fn prioritize(&self, request: PrioritizeRequest) -> Result<Value, CapabilityError> {
        self.lock_requests()
            .push(RecordedRequest::Prioritize(request));
        self.take(Flow::Prioritize)
    }

    async fn advise(&self, request: AdviseRequest) -> Result<Value, CapabilityError> {
        self.lock_requests().push(RecordedRequest::Advise(request));
        self.take(Flow::Advise)
    }

    async fn chat(&self, request: ChatRequest) -> Result<Value, CapabilityError> {
        self.lock_requests().push(RecordedRequest::Chat(request));
        self.take(Flow::Chat)
    }
}
