// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]

use std::sync::atomic::{AtomicBool, Ordering};

use super::*;
use crate::parallel::Server;

const FAST_POLL: Duration = Duration::from_millis(5);

type Log = Arc<Mutex<Vec<String>>>;

fn log() -> Log {
    Arc::new(Mutex::new(Vec::new()))
}

fn entries(log: &Log) -> Vec<String> {
    log.lock().unwrap().clone()
}

fn location() -> CodeLocation {
    CodeLocation::new("suite.rs", 3)
}

fn recording_body(log: &Log, name: &str) -> Body {
    let log = Arc::clone(log);
    let name = name.to_string();
    Body::sync(move || log.lock().unwrap().push(name.clone()))
}

fn synchronized_before(log: &Log, failer: &Arc<Failer>, node1_fails: bool) -> SuiteNode {
    let node1_log = Arc::clone(log);
    let all_log = Arc::clone(log);
    let node1_failer = Arc::clone(failer);
    SuiteNode::synchronized_before_suite(
        Arc::new(move || {
            node1_log.lock().unwrap().push("node1".to_string());
            if node1_fails {
                node1_failer.fail("no database");
            }
            b"postgres://shared".to_vec()
        }),
        Arc::new(move |data: &[u8]| {
            all_log
                .lock()
                .unwrap()
                .push(format!("all:{}", String::from_utf8_lossy(data)));
        }),
        location(),
        Arc::clone(failer),
    )
    .with_poll_interval(FAST_POLL)
}

fn started_server(total: usize) -> (Server, Client) {
    let mut server = Server::new(total).unwrap();
    server.start().unwrap();
    let client = Client::new(server.address());
    (server, client)
}

#[test]
fn plain_before_suite_reports_its_outcome() {
    let failer = Arc::new(Failer::new());
    let hook_failer = Arc::clone(&failer);
    let node = SuiteNode::before_suite(
        Body::sync(move || hook_failer.fail("setup broke")),
        location(),
        Duration::ZERO,
        Arc::clone(&failer),
    );

    let summary = node.run(Placement::single());

    assert_eq!(summary.node_type, NodeType::BeforeSuite);
    assert_eq!(summary.state, SpecState::Failed);
    let failure = summary.failure.unwrap();
    assert_eq!(failure.message, "setup broke");
    assert_eq!(failure.node_index, None);
    assert_eq!(summary.code_location, location());
}

#[test]
fn single_process_passes_node1_data_to_all() {
    let log = log();
    let failer = Arc::new(Failer::new());
    let node = synchronized_before(&log, &failer, false);

    let summary = node.run(Placement::single());

    assert_eq!(summary.state, SpecState::Passed);
    assert_eq!(entries(&log), vec!["node1", "all:postgres://shared"]);
}

#[test]
fn failing_node1_skips_all() {
    let log = log();
    let failer = Arc::new(Failer::new());
    let node = synchronized_before(&log, &failer, true);

    let summary = node.run(Placement::single());

    assert_eq!(summary.state, SpecState::Failed);
    assert_eq!(summary.failure.unwrap().message, "no database");
    assert_eq!(entries(&log), vec!["node1"]);
}

#[test]
fn parallel_workers_share_node1_data() {
    let (server, client) = started_server(2);
    let log = log();
    let failer = Arc::new(Failer::new());
    let node = synchronized_before(&log, &failer, false);

    let first = node.run(Placement {
        node: 1,
        total: 2,
        client: Some(&client),
    });
    let second = node.run(Placement {
        node: 2,
        total: 2,
        client: Some(&client),
    });
    server.close();

    assert_eq!(first.state, SpecState::Passed);
    assert_eq!(second.state, SpecState::Passed);
    assert_eq!(
        entries(&log),
        vec!["node1", "all:postgres://shared", "all:postgres://shared"]
    );
}

#[test]
fn other_workers_fail_when_node1_failed() {
    let (server, client) = started_server(2);
    let log = log();
    let failer = Arc::new(Failer::new());
    let node = synchronized_before(&log, &failer, true);

    node.run(Placement {
        node: 1,
        total: 2,
        client: Some(&client),
    });
    let second = node.run(Placement {
        node: 2,
        total: 2,
        client: Some(&client),
    });
    server.close();

    assert_eq!(second.state, SpecState::Failed);
    assert_eq!(
        second.failure.unwrap().message,
        "SynchronizedBeforeSuite on Node 1 failed"
    );
    assert_eq!(entries(&log), vec!["node1"]);
}

#[test]
fn other_workers_fail_when_node1_disappeared() {
    let (server, client) = started_server(2);
    server.register_alive(1, || false);
    let log = log();
    let failer = Arc::new(Failer::new());
    let node = synchronized_before(&log, &failer, false);

    let second = node.run(Placement {
        node: 2,
        total: 2,
        client: Some(&client),
    });
    server.close();

    assert_eq!(second.state, SpecState::Failed);
    assert_eq!(
        second.failure.unwrap().message,
        "SynchronizedBeforeSuite on Node 1 disappeared before it could report back"
    );
    assert!(entries(&log).is_empty());
}

#[test]
fn node1_fails_when_server_is_unreachable() {
    let client = Client::new("http://127.0.0.1:9");
    let log = log();
    let failer = Arc::new(Failer::new());
    let node = synchronized_before(&log, &failer, false);

    let first = node.run(Placement {
        node: 1,
        total: 2,
        client: Some(&client),
    });

    assert_eq!(first.state, SpecState::Failed);
    assert_eq!(
        first.failure.unwrap().message,
        "SynchronizedBeforeSuite failed to send data to other nodes"
    );
    assert_eq!(entries(&log), vec!["node1"]);
}

#[test]
fn synchronized_after_runs_node1_half_only_on_node1() {
    let log = log();
    let failer = Arc::new(Failer::new());
    let node = SuiteNode::synchronized_after_suite(
        recording_body(&log, "all"),
        recording_body(&log, "node1"),
        location(),
        Duration::ZERO,
        Arc::clone(&failer),
    );

    let (server, client) = started_server(2);
    server.register_alive(2, || false);
    let second = node.run(Placement {
        node: 2,
        total: 2,
        client: Some(&client),
    });
    let first = node.run(Placement {
        node: 1,
        total: 2,
        client: Some(&client),
    });
    server.close();

    assert_eq!(second.state, SpecState::Passed);
    assert_eq!(first.state, SpecState::Passed);
    assert_eq!(first.node_type, NodeType::SynchronizedAfterSuite);
    assert_eq!(entries(&log), vec!["all", "all", "node1"]);
}

#[test]
fn synchronized_after_waits_for_other_workers_to_exit() {
    let log = log();
    let failer = Arc::new(Failer::new());
    let node = SuiteNode::synchronized_after_suite(
        recording_body(&log, "all"),
        recording_body(&log, "node1"),
        location(),
        Duration::ZERO,
        Arc::clone(&failer),
    )
    .with_poll_interval(FAST_POLL);

    let (server, client) = started_server(2);
    let worker2_alive = Arc::new(AtomicBool::new(true));
    let alive = Arc::clone(&worker2_alive);
    server.register_alive(2, move || alive.load(Ordering::SeqCst));

    let exiting = Arc::clone(&worker2_alive);
    let exit_later = std::thread::spawn(move || {
        std::thread::sleep(Duration::from_millis(50));
        exiting.store(false, Ordering::SeqCst);
    });

    let start = Instant::now();
    let first = node.run(Placement {
        node: 1,
        total: 2,
        client: Some(&client),
    });
    exit_later.join().unwrap();
    server.close();

    assert_eq!(first.state, SpecState::Passed);
    assert!(start.elapsed() >= Duration::from_millis(50));
    assert_eq!(entries(&log), vec!["all", "node1"]);
}

#[test]
fn all_half_failure_wins_over_node1_half() {
    let log = log();
    let failer = Arc::new(Failer::new());
    let all_failer = Arc::clone(&failer);
    let node1_failer = Arc::clone(&failer);
    let node = SuiteNode::synchronized_after_suite(
        Body::sync(move || all_failer.fail("all broke")),
        Body::sync(move || node1_failer.fail("node1 broke")),
        location(),
        Duration::ZERO,
        Arc::clone(&failer),
    );

    let summary = node.run(Placement::single());

    assert_eq!(summary.state, SpecState::Failed);
    assert_eq!(summary.failure.unwrap().message, "all broke");
}
