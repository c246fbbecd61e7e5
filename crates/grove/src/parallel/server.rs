// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Coordination server hosted by the process that launches the workers.
//!
//! Requests are handled on a small pool of threads; all shared state sits
//! behind one mutex, so reporter callbacks stay serialized.

use std::collections::HashMap;
use std::io::Read;
use std::net::SocketAddr;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::thread::{self, JoinHandle};

use serde::Serialize;
use serde::de::DeserializeOwned;
use tiny_http::{Header, Method, Request, Response};

use super::{
    BeforeSuiteState, RemoteAfterSuiteData, RemoteBeforeSuiteData, SuiteWillBegin, endpoint,
};
use crate::error::{Error, Result};
use crate::reporters::Reporter;
use crate::types::{SetupSummary, SpecSummary, SuiteSummary};

const HANDLER_THREADS: usize = 4;

type AliveFn = Box<dyn Fn() -> bool + Send>;

struct State {
    parallel_total: usize,
    before_suite: RemoteBeforeSuiteData,
    alive: HashMap<usize, AliveFn>,
    reporters: Vec<Box<dyn Reporter>>,
}

impl State {
    /// Workers that never registered a liveness check count as alive.
    fn node_is_alive(&self, node: usize) -> bool {
        self.alive.get(&node).is_none_or(|alive| alive())
    }

    fn before_suite_state(&self) -> RemoteBeforeSuiteData {
        let mut data = self.before_suite.clone();
        if data.state == BeforeSuiteState::Pending && !self.node_is_alive(1) {
            data.state = BeforeSuiteState::Disappeared;
        }
        data
    }

    fn after_suite_can_run(&self) -> RemoteAfterSuiteData {
        RemoteAfterSuiteData {
            can_run: (2..=self.parallel_total).all(|node| !self.node_is_alive(node)),
        }
    }
}

pub struct Server {
    http: Arc<tiny_http::Server>,
    state: Arc<Mutex<State>>,
    address: SocketAddr,
    handlers: Vec<JoinHandle<()>>,
}

impl Server {
    /// Bind to an ephemeral localhost port. Call [`Server::start`] to serve.
    pub fn new(parallel_total: usize) -> Result<Self> {
        let http = tiny_http::Server::http("127.0.0.1:0")
            .map_err(|err| Error::ServerBind(err.to_string()))?;
        let address = http
            .server_addr()
            .to_ip()
            .ok_or_else(|| Error::ServerBind("listener has no ip address".to_string()))?;

        Ok(Self {
            http: Arc::new(http),
            state: Arc::new(Mutex::new(State {
                parallel_total,
                before_suite: RemoteBeforeSuiteData::default(),
                alive: HashMap::new(),
                reporters: Vec::new(),
            })),
            address,
            handlers: Vec::new(),
        })
    }

    pub fn start(&mut self) -> Result<()> {
        for index in 0..HANDLER_THREADS {
            let http = Arc::clone(&self.http);
            let state = Arc::clone(&self.state);
            let handle = thread::Builder::new()
                .name(format!("grove-server-{index}"))
                .spawn(move || {
                    for request in http.incoming_requests() {
                        handle(&state, request);
                    }
                })?;
            self.handlers.push(handle);
        }
        tracing::debug!(address = %self.address(), "coordination server listening");
        Ok(())
    }

    /// Base URL for clients.
    pub fn address(&self) -> String {
        format!("http://{}", self.address)
    }

    /// Register how to tell whether worker `node` is still running.
    pub fn register_alive(&self, node: usize, alive: impl Fn() -> bool + Send + 'static) {
        self.lock().alive.insert(node, Box::new(alive));
    }

    /// Reporters that receive callbacks forwarded by workers.
    pub fn register_reporters(&self, reporters: Vec<Box<dyn Reporter>>) {
        self.lock().reporters.extend(reporters);
    }

    /// Stop serving and wait for the handler threads.
    pub fn close(mut self) {
        self.shutdown();
    }

    fn shutdown(&mut self) {
        for _ in &self.handlers {
            self.http.unblock();
        }
        for handle in self.handlers.drain(..) {
            let _ = handle.join();
        }
    }

    fn lock(&self) -> MutexGuard<'_, State> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl Drop for Server {
    fn drop(&mut self) {
        self.shutdown();
    }
}

fn handle(state: &Mutex<State>, mut request: Request) {
    let method = request.method().clone();
    let path = request.url().to_string();
    tracing::trace!(%method, %path, "coordination request");

    let mut body = String::new();
    if let Err(err) = request.as_reader().read_to_string(&mut body) {
        tracing::warn!(%path, error = %err, "failed to read request body");
        respond(request, Response::from_string(err.to_string()).with_status_code(400));
        return;
    }

    let mut state = state.lock().unwrap_or_else(PoisonError::into_inner);
    let response = match (&method, path.as_str()) {
        (Method::Get, endpoint::BEFORE_SUITE_STATE) => json_response(&state.before_suite_state()),
        (Method::Post, endpoint::BEFORE_SUITE_STATE) => {
            decode(&body, |data: RemoteBeforeSuiteData| state.before_suite = data)
        }
        (Method::Get, endpoint::AFTER_SUITE_CAN_RUN) => json_response(&state.after_suite_can_run()),
        (Method::Post, endpoint::SPEC_SUITE_WILL_BEGIN) => decode(&body, |begin: SuiteWillBegin| {
            for reporter in &mut state.reporters {
                reporter.spec_suite_will_begin(&begin.config, &begin.summary);
            }
        }),
        (Method::Post, endpoint::BEFORE_SUITE_DID_RUN) => decode(&body, |summary: SetupSummary| {
            for reporter in &mut state.reporters {
                reporter.before_suite_did_run(&summary);
            }
        }),
        (Method::Post, endpoint::SPEC_WILL_RUN) => decode(&body, |summary: SpecSummary| {
            for reporter in &mut state.reporters {
                reporter.spec_will_run(&summary);
            }
        }),
        (Method::Post, endpoint::SPEC_DID_COMPLETE) => decode(&body, |summary: SpecSummary| {
            for reporter in &mut state.reporters {
                reporter.spec_did_complete(&summary);
            }
        }),
        (Method::Post, endpoint::AFTER_SUITE_DID_RUN) => decode(&body, |summary: SetupSummary| {
            for reporter in &mut state.reporters {
                reporter.after_suite_did_run(&summary);
            }
        }),
        (Method::Post, endpoint::SPEC_SUITE_DID_END) => decode(&body, |summary: SuiteSummary| {
            for reporter in &mut state.reporters {
                reporter.spec_suite_did_end(&summary);
            }
        }),
        _ => Response::from_string("not found").with_status_code(404),
    };
    drop(state);

    respond(request, response);
}

type Body = Response<std::io::Cursor<Vec<u8>>>;

fn decode<T: DeserializeOwned>(body: &str, apply: impl FnOnce(T)) -> Body {
    match serde_json::from_str(body) {
        Ok(value) => {
            apply(value);
            Response::from_string("").with_status_code(200)
        }
        Err(err) => Response::from_string(err.to_string()).with_status_code(400),
    }
}

fn json_response<T: Serialize>(value: &T) -> Body {
    match serde_json::to_string(value) {
        Ok(json) => {
            let response = Response::from_string(json);
            match Header::from_bytes(&b"Content-Type"[..], &b"application/json"[..]) {
                Ok(header) => response.with_header(header),
                Err(()) => response,
            }
        }
        Err(err) => Response::from_string(err.to_string()).with_status_code(500),
    }
}

fn respond(request: Request, response: Body) {
    if let Err(err) = request.respond(response) {
        tracing::warn!(error = %err, "failed to send coordination response");
    }
}

#[cfg(test)]
#[path = "server_tests.rs"]
mod tests;
