// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Blocking HTTP client for the coordination server.

use std::time::Duration;

use serde::Serialize;
use serde::de::DeserializeOwned;

use super::{RemoteAfterSuiteData, RemoteBeforeSuiteData, endpoint};
use crate::error::{Error, Result};

const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

#[derive(Clone)]
pub struct Client {
    agent: ureq::Agent,
    host: String,
}

impl Client {
    /// `host` is the server's base URL, e.g. `http://127.0.0.1:4000`.
    pub fn new(host: impl Into<String>) -> Self {
        let agent = ureq::AgentBuilder::new().timeout(REQUEST_TIMEOUT).build();
        Self {
            agent,
            host: host.into().trim_end_matches('/').to_string(),
        }
    }

    pub fn host(&self) -> &str {
        &self.host
    }

    pub fn before_suite_state(&self) -> Result<RemoteBeforeSuiteData> {
        self.get(endpoint::BEFORE_SUITE_STATE)
    }

    pub fn post_before_suite_state(&self, data: &RemoteBeforeSuiteData) -> Result<()> {
        self.post(endpoint::BEFORE_SUITE_STATE, data)
    }

    pub fn after_suite_can_run(&self) -> Result<bool> {
        let data: RemoteAfterSuiteData = self.get(endpoint::AFTER_SUITE_CAN_RUN)?;
        Ok(data.can_run)
    }

    pub fn get<T: DeserializeOwned>(&self, path: &str) -> Result<T> {
        let url = self.url(path);
        let response = self
            .agent
            .get(&url)
            .call()
            .map_err(|err| request_error(&url, err))?;
        Ok(response.into_json()?)
    }

    pub fn post<T: Serialize>(&self, path: &str, body: &T) -> Result<()> {
        let url = self.url(path);
        self.agent
            .post(&url)
            .send_json(body)
            .map_err(|err| request_error(&url, err))?;
        Ok(())
    }

    fn url(&self, path: &str) -> String {
        format!("{}{path}", self.host)
    }
}

fn request_error(url: &str, err: ureq::Error) -> Error {
    match err {
        ureq::Error::Status(status, _) => Error::UnexpectedStatus {
            url: url.to_string(),
            status,
        },
        other => Error::Http {
            url: url.to_string(),
            source: Box::new(other),
        },
    }
}
