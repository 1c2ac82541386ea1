//! In-memory doubles for exercising `ApiClient` and the page controllers
//! without a network.

use async_trait::async_trait;
use serde_json::Value;
use std::cell::RefCell;
use std::collections::VecDeque;
use std::rc::Rc;

use crate::error::{ClientError, Result};
use crate::navigator::Navigator;
use crate::transport::{HttpRequest, HttpResponse, Transport};

pub fn json_response(status: u16, body: Value) -> HttpResponse {
    HttpResponse {
        status,
        status_text: default_status_text(status).to_owned(),
        content_type: Some("application/json; charset=utf-8".to_owned()),
        body: body.to_string(),
    }
}

pub fn text_response(status: u16, body: &str) -> HttpResponse {
    HttpResponse {
        status,
        status_text: default_status_text(status).to_owned(),
        content_type: Some("text/plain".to_owned()),
        body: body.to_owned(),
    }
}

fn default_status_text(status: u16) -> &'static str {
    match status {
        200 => "OK",
        201 => "Created",
        400 => "Bad Request",
        401 => "Unauthorized",
        404 => "Not Found",
        500 => "Internal Server Error",
        _ => "",
    }
}

impl HttpResponse {
    pub fn with_status_text(mut self, text: &str) -> Self {
        self.status_text = text.to_owned();
        self
    }
}

struct Reply {
    outcome: Result<HttpResponse>,
    /// Times the send future yields before resolving.
    delay: u32,
}

/// Replays queued responses in order and records every request it receives.
/// Clones share the queue and the log.
#[derive(Clone, Default)]
pub struct ScriptedTransport {
    replies: Rc<RefCell<VecDeque<Reply>>>,
    requests: Rc<RefCell<Vec<HttpRequest>>>,
}

impl ScriptedTransport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&self, response: HttpResponse) {
        self.push_delayed(response, 0);
    }

    /// Queue a response that resolves only after `delay` extra polls, letting
    /// a later request overtake it.
    pub fn push_delayed(&self, response: HttpResponse, delay: u32) {
        self.replies.borrow_mut().push_back(Reply {
            outcome: Ok(response),
            delay,
        });
    }

    pub fn push_error(&self, err: ClientError) {
        self.replies.borrow_mut().push_back(Reply {
            outcome: Err(err),
            delay: 0,
        });
    }

    pub fn requests(&self) -> Vec<HttpRequest> {
        self.requests.borrow().clone()
    }

    pub fn pending(&self) -> usize {
        self.replies.borrow().len()
    }
}

#[async_trait(?Send)]
impl Transport for ScriptedTransport {
    async fn send(&self, request: HttpRequest) -> Result<HttpResponse> {
        self.requests.borrow_mut().push(request.clone());
        let reply = self.replies.borrow_mut().pop_front();
        let Some(reply) = reply else {
            return Err(ClientError::Transport(format!(
                "no scripted response for {} {}",
                request.method, request.url
            )));
        };
        for _ in 0..reply.delay {
            tokio::task::yield_now().await;
        }
        reply.outcome
    }
}

#[derive(Clone, Default)]
pub struct RecordingNavigator {
    visits: Rc<RefCell<Vec<String>>>,
}

impl RecordingNavigator {
    pub fn visits(&self) -> Vec<String> {
        self.visits.borrow().clone()
    }
}

impl Navigator for RecordingNavigator {
    fn navigate(&self, path: &str) {
        self.visits.borrow_mut().push(path.to_owned());
    }
}
