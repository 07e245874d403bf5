//! In-memory transport for unit tests.

use std::sync::Mutex;

use serde_json::Value;

use crate::request::RequestDescriptor;
use crate::transport::{Transport, TransportFailure, TransportResponse};

/// Canned transport outcome factory.
type Responder = Box<dyn Fn() -> Result<TransportResponse, TransportFailure> + Send + Sync>;

/// Transport that records every request and answers with a canned outcome.
pub(crate) struct RecordingTransport {
    requests: Mutex<Vec<RequestDescriptor>>,
    respond: Responder,
}

impl RecordingTransport {
    /// Answers every request with `respond()`.
    pub(crate) fn responding(
        respond: impl Fn() -> Result<TransportResponse, TransportFailure> + Send + Sync + 'static,
    ) -> Self {
        Self {
            requests: Mutex::new(Vec::new()),
            respond: Box::new(respond),
        }
    }

    /// Answers every request with HTTP 200 and `body`.
    pub(crate) fn ok(body: Value) -> Self {
        Self::responding(move || {
            Ok(TransportResponse {
                status: 200,
                status_message: String::from("OK"),
                body: Some(body.clone()),
            })
        })
    }

    /// Requests sent so far.
    pub(crate) fn requests(&self) -> Vec<RequestDescriptor> {
        self.requests
            .lock()
            .map(|requests| requests.clone())
            .unwrap_or_default()
    }

    /// The most recent request.
    pub(crate) fn last(&self) -> Option<RequestDescriptor> {
        self.requests().pop()
    }
}

impl Transport for RecordingTransport {
    async fn send(
        &self,
        request: &RequestDescriptor,
    ) -> Result<TransportResponse, TransportFailure> {
        if let Ok(mut requests) = self.requests.lock() {
            requests.push(request.clone());
        }
        (self.respond)()
    }
}
