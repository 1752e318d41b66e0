//! In-memory transport for unit tests.

use std::sync::{Arc, Mutex};

use crate::error::ApiError;
use crate::http::{HttpRequest, HttpResponse, HttpTransport};

pub(crate) fn response(status: u16, body: &str) -> HttpResponse {
    HttpResponse {
        status,
        headers: Vec::new(),
        body: body.to_string(),
    }
}

/// Answers every request with the current canned reply and records what it
/// saw. Clones share the reply and the log.
#[derive(Debug, Clone)]
pub(crate) struct RecordingTransport {
    reply: Arc<Mutex<Result<HttpResponse, ApiError>>>,
    seen: Arc<Mutex<Vec<HttpRequest>>>,
}

impl RecordingTransport {
    pub(crate) fn replying(status: u16, body: &str) -> Self {
        Self {
            reply: Arc::new(Mutex::new(Ok(response(status, body)))),
            seen: Arc::default(),
        }
    }

    pub(crate) fn failing() -> Self {
        Self {
            reply: Arc::new(Mutex::new(Err(refused()))),
            seen: Arc::default(),
        }
    }

    pub(crate) fn answer(&self, status: u16, body: &str) {
        *self.reply.lock().unwrap() = Ok(response(status, body));
    }

    pub(crate) fn fail(&self) {
        *self.reply.lock().unwrap() = Err(refused());
    }

    pub(crate) fn requests(&self) -> Vec<HttpRequest> {
        self.seen.lock().unwrap().clone()
    }
}

impl HttpTransport for RecordingTransport {
    fn execute(&self, request: &HttpRequest) -> Result<HttpResponse, ApiError> {
        self.seen.lock().unwrap().push(request.clone());
        self.reply.lock().unwrap().clone()
    }
}

fn refused() -> ApiError {
    ApiError::Transport("connection refused".to_string())
}
