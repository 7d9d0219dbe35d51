//! Scripted transport for tests.
//!
//! Queues responses per (method, URL) and records every request it serves.
//! Unmatched requests come back as transport errors, which doubles as the
//! way to simulate a network failure: script nothing for that URL. No
//! sockets are opened.

use std::cell::RefCell;
use std::collections::{HashMap, VecDeque};

use crate::error::TransportError;
use crate::http::{HttpRequest, HttpResponse, Method, Transport};

/// An in-memory [`Transport`] driven by scripted responses.
#[derive(Default)]
pub struct MockTransport {
    routes: RefCell<HashMap<(Method, String), VecDeque<HttpResponse>>>,
    calls: RefCell<Vec<HttpRequest>>,
}

impl MockTransport {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue one response for `method` on `url`; repeated pushes to the same
    /// route are served in FIFO order.
    pub fn respond(&self, method: Method, url: impl Into<String>, status: u16, body: &str) {
        self.routes
            .borrow_mut()
            .entry((method, url.into()))
            .or_default()
            .push_back(HttpResponse {
                status,
                body: body.as_bytes().to_vec(),
            });
    }

    /// Requests served so far, in order.
    pub fn calls(&self) -> Vec<HttpRequest> {
        self.calls.borrow().clone()
    }

    /// Number of requests served for `method` on `url`.
    pub fn count(&self, method: Method, url: &str) -> usize {
        self.calls
            .borrow()
            .iter()
            .filter(|request| request.method == method && request.url == url)
            .count()
    }
}

impl Transport for MockTransport {
    fn send(&self, request: &HttpRequest) -> Result<HttpResponse, TransportError> {
        self.calls.borrow_mut().push(request.clone());
        let mut routes = self.routes.borrow_mut();
        routes
            .get_mut(&(request.method, request.url.clone()))
            .and_then(|queue| queue.pop_front())
            .ok_or_else(|| TransportError {
                url: request.url.clone(),
                message: "no scripted response".to_owned(),
            })
    }
}
