// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Suite-level hooks: before/after suite, plain and synchronized.
//!
//! Synchronized hooks coordinate parallel workers through the
//! coordination server. Worker 1 runs the once-only half; the other workers
//! wait on it by polling.

use std::sync::{Arc, Mutex, PoisonError};
use std::thread;
use std::time::{Duration, Instant};

use crate::code_location::CodeLocation;
use crate::config::defaults;
use crate::failer::Failer;
use crate::leaf::{Body, Deadline, LeafRunner};
use crate::parallel::{BeforeSuiteState, Client, RemoteBeforeSuiteData};
use crate::types::{Failure, NodeType, SetupSummary, SpecState};

pub type DataProducer = Arc<dyn Fn() -> Vec<u8> + Send + Sync>;
pub type DataConsumer = Arc<dyn Fn(&[u8]) + Send + Sync>;

enum Kind {
    Plain(Body),
    SynchronizedBefore {
        node1: DataProducer,
        all: DataConsumer,
    },
    SynchronizedAfter {
        all: Body,
        node1: Body,
    },
}

/// Where this worker sits in a parallel run.
#[derive(Clone, Copy)]
pub struct Placement<'a> {
    pub node: usize,
    pub total: usize,
    pub client: Option<&'a Client>,
}

impl Placement<'_> {
    pub fn single() -> Self {
        Placement {
            node: 1,
            total: 1,
            client: None,
        }
    }
}

pub struct SuiteNode {
    kind: Kind,
    node_type: NodeType,
    code_location: CodeLocation,
    timeout: Deadline,
    failer: Arc<Failer>,
    poll_interval: Duration,
}

impl SuiteNode {
    pub fn before_suite(
        body: Body,
        code_location: CodeLocation,
        timeout: impl Into<Deadline>,
        failer: Arc<Failer>,
    ) -> Self {
        Self::new(
            Kind::Plain(body),
            NodeType::BeforeSuite,
            code_location,
            timeout.into(),
            failer,
        )
    }

    pub fn after_suite(
        body: Body,
        code_location: CodeLocation,
        timeout: impl Into<Deadline>,
        failer: Arc<Failer>,
    ) -> Self {
        Self::new(
            Kind::Plain(body),
            NodeType::AfterSuite,
            code_location,
            timeout.into(),
            failer,
        )
    }

    pub fn synchronized_before_suite(
        node1: DataProducer,
        all: DataConsumer,
        code_location: CodeLocation,
        failer: Arc<Failer>,
    ) -> Self {
        Self::new(
            Kind::SynchronizedBefore { node1, all },
            NodeType::SynchronizedBeforeSuite,
            code_location,
            Deadline::Fixed(Duration::ZERO),
            failer,
        )
    }

    pub fn synchronized_after_suite(
        all: Body,
        node1: Body,
        code_location: CodeLocation,
        timeout: impl Into<Deadline>,
        failer: Arc<Failer>,
    ) -> Self {
        Self::new(
            Kind::SynchronizedAfter { all, node1 },
            NodeType::SynchronizedAfterSuite,
            code_location,
            timeout.into(),
            failer,
        )
    }

    fn new(
        kind: Kind,
        node_type: NodeType,
        code_location: CodeLocation,
        timeout: Deadline,
        failer: Arc<Failer>,
    ) -> Self {
        Self {
            kind,
            node_type,
            code_location,
            timeout,
            failer,
            poll_interval: Duration::from_millis(defaults::POLL_INTERVAL_MS),
        }
    }

    pub fn with_poll_interval(mut self, interval: Duration) -> Self {
        self.poll_interval = interval;
        self
    }

    pub fn node_type(&self) -> NodeType {
        self.node_type
    }

    pub fn code_location(&self) -> &CodeLocation {
        &self.code_location
    }

    pub fn run(&self, placement: Placement<'_>) -> SetupSummary {
        let start = Instant::now();
        let (state, failure) = match &self.kind {
            Kind::Plain(body) => self.runner(body.clone()).run(),
            Kind::SynchronizedBefore { node1, all } => self.run_before(node1, all, placement),
            Kind::SynchronizedAfter { all, node1 } => self.run_after(all, node1, placement),
        };

        SetupSummary {
            node_type: self.node_type,
            code_location: self.code_location.clone(),
            state,
            run_time: start.elapsed(),
            failure,
            captured_output: String::new(),
        }
    }

    fn runner(&self, body: Body) -> LeafRunner {
        LeafRunner::new(
            body,
            self.code_location.clone(),
            self.timeout.clone(),
            Arc::clone(&self.failer),
            self.node_type,
            None,
        )
    }

    fn run_before(
        &self,
        node1: &DataProducer,
        all: &DataConsumer,
        placement: Placement<'_>,
    ) -> (SpecState, Option<Failure>) {
        if placement.total <= 1 {
            let (state, failure, data) = self.run_producer(node1);
            if state != SpecState::Passed {
                return (state, failure);
            }
            return self.run_consumer(all, data);
        }

        let Some(client) = placement.client else {
            return self.failure("SynchronizedBeforeSuite needs a coordination host when running in parallel");
        };

        if placement.node == 1 {
            let (state, failure, data) = self.run_producer(node1);
            let remote = RemoteBeforeSuiteData {
                data: data.clone(),
                state: if state == SpecState::Passed {
                    BeforeSuiteState::Passed
                } else {
                    BeforeSuiteState::Failed
                },
            };
            if let Err(err) = client.post_before_suite_state(&remote) {
                tracing::warn!(error = %err, "failed to publish before-suite state");
                return self.failure("SynchronizedBeforeSuite failed to send data to other nodes");
            }
            if state != SpecState::Passed {
                return (state, failure);
            }
            return self.run_consumer(all, data);
        }

        let remote = self.wait_for_node1(client);
        match remote.state {
            BeforeSuiteState::Passed => self.run_consumer(all, remote.data),
            BeforeSuiteState::Failed => self.failure("SynchronizedBeforeSuite on Node 1 failed"),
            BeforeSuiteState::Disappeared | BeforeSuiteState::Pending => self.failure(
                "SynchronizedBeforeSuite on Node 1 disappeared before it could report back",
            ),
        }
    }

    fn run_after(
        &self,
        all: &Body,
        node1: &Body,
        placement: Placement<'_>,
    ) -> (SpecState, Option<Failure>) {
        let outcome = self.runner(all.clone()).run();
        if placement.node != 1 {
            return outcome;
        }

        if placement.total > 1 {
            match placement.client {
                Some(client) => self.wait_for_other_nodes(client),
                None => {
                    return self.failure(
                        "SynchronizedAfterSuite needs a coordination host when running in parallel",
                    );
                }
            }
        }

        let node1_outcome = self.runner(node1.clone()).run();
        if outcome.0 == SpecState::Passed {
            node1_outcome
        } else {
            outcome
        }
    }

    fn run_producer(&self, node1: &DataProducer) -> (SpecState, Option<Failure>, Vec<u8>) {
        let slot: Arc<Mutex<Vec<u8>>> = Arc::new(Mutex::new(Vec::new()));
        let output = Arc::clone(&slot);
        let producer = Arc::clone(node1);
        let body = Body::sync(move || {
            let data = producer();
            *output.lock().unwrap_or_else(PoisonError::into_inner) = data;
        });
        let (state, failure) = self.runner(body).run();
        let data = std::mem::take(&mut *slot.lock().unwrap_or_else(PoisonError::into_inner));
        (state, failure, data)
    }

    fn run_consumer(&self, all: &DataConsumer, data: Vec<u8>) -> (SpecState, Option<Failure>) {
        let consumer = Arc::clone(all);
        self.runner(Body::sync(move || consumer(&data))).run()
    }

    fn wait_for_node1(&self, client: &Client) -> RemoteBeforeSuiteData {
        let mut warned = false;
        loop {
            match client.before_suite_state() {
                Ok(remote) if remote.state != BeforeSuiteState::Pending => return remote,
                Ok(_) => {}
                Err(err) if !warned => {
                    tracing::warn!(error = %err, "polling before-suite state failed, retrying");
                    warned = true;
                }
                Err(_) => {}
            }
            thread::sleep(self.poll_interval);
        }
    }

    fn wait_for_other_nodes(&self, client: &Client) {
        loop {
            match client.after_suite_can_run() {
                Ok(true) => return,
                Ok(false) => {}
                Err(err) => tracing::debug!(error = %err, "polling after-suite gate failed"),
            }
            thread::sleep(self.poll_interval);
        }
    }

    fn failure(&self, message: &str) -> (SpecState, Option<Failure>) {
        (
            SpecState::Failed,
            Some(Failure {
                message: message.to_string(),
                location: self.code_location.clone(),
                forwarded_panic: None,
                node_index: None,
                node_type: self.node_type,
                node_location: self.code_location.clone(),
            }),
        )
    }
}

#[cfg(test)]
#[path = "suite_node_tests.rs"]
mod tests;
