//! Integration tests for occupancy, escalation and alerting
//!
//! Drives the access engine, the alert evaluator and the status board
//! together the way the node's tasks do.

#![cfg(test)]

mod common;

use safehouse_core::access::{AccessControlEngine, Identity, ScanOutcome};
use safehouse_core::alerts::{AlertEvaluator, AlertKind};
use safehouse_core::presentation::{StatusBoard, MOTION_OVERLAY, STATUS_OK};
use safehouse_core::reading::{DhtStatus, FusedReading};

use common::reading;

fn id(s: &str) -> Identity {
    Identity::parse(s).unwrap()
}

#[test]
fn occupancy_toggles_per_scan() {
    let mut access = AccessControlEngine::with_roster(3, ["04 A3 2B 1C"]).unwrap();
    let tag = id("04 A3 2B 1C");

    assert_eq!(access.occupancy(), 0);
    access.scan(&tag);
    assert_eq!(access.occupancy(), 1);
    access.scan(&tag);
    assert_eq!(access.occupancy(), 0);
}

#[test]
fn exactly_one_escalation_per_three_attempts() {
    let mut access = AccessControlEngine::with_roster(3, ["04 A3 2B 1C"]).unwrap();
    let intruder = id("FF FF FF FF");

    let outcomes: Vec<_> = (0..3).map(|_| access.scan(&intruder)).collect();
    let escalations = outcomes
        .iter()
        .filter(|o| matches!(o, ScanOutcome::Escalated { .. }))
        .count();
    assert_eq!(escalations, 1);
    assert_eq!(outcomes[2], ScanOutcome::Escalated { attempts: 3 });

    assert_eq!(access.scan(&id("EE EE EE EE")), ScanOutcome::Denied { attempts: 1 });
}

#[test]
fn motion_alert_depends_on_occupancy() {
    let mut access = AccessControlEngine::with_roster(3, ["04 A3 2B 1C"]).unwrap();
    let mut alerts = AlertEvaluator::default();
    let moving = reading(22, 45, 5.0, true);

    access.scan(&id("04 A3 2B 1C"));
    for _ in 0..10 {
        assert!(alerts.evaluate(&moving, access.occupancy()).is_empty());
    }

    access.scan(&id("04 A3 2B 1C"));
    let fired = alerts.evaluate(&moving, access.occupancy());
    assert_eq!(fired.as_slice(), &[AlertKind::MotionWhenEmpty]);

    // Motion flag still set: no re-fire
    assert!(alerts.evaluate(&moving, access.occupancy()).is_empty());

    // Flag cleared after actuation, then a new detection fires again
    assert!(alerts.evaluate(&reading(22, 45, 5.0, false), 0).is_empty());
    assert_eq!(alerts.evaluate(&moving, 0).len(), 1);
}

#[test]
fn threshold_cycle_over_many_polls() {
    let mut alerts = AlertEvaluator::default();
    let humidity = [40, 84, 85, 90, 95, 88, 84, 86, 86];
    let fired: Vec<usize> = humidity
        .iter()
        .map(|&h| alerts.evaluate(&reading(20, h, 0.0, false), 1).len())
        .collect();
    assert_eq!(fired, vec![0, 0, 1, 0, 0, 0, 0, 1, 0]);
}

#[test]
fn sentinel_reading_raises_nothing() {
    let mut alerts = AlertEvaluator::default();
    let unknown = FusedReading::unknown();
    assert_eq!(unknown.dht_status, DhtStatus::Timeout);
    assert!(alerts.evaluate(&unknown, 1).is_empty());
}

#[test]
fn scan_messages_reach_the_board() {
    let mut access = AccessControlEngine::with_roster(3, ["04 A3 2B 1C"]).unwrap();
    let mut board = StatusBoard::new(5_000);

    let outcome = access.scan(&id("04 A3 2B 1C"));
    let (message, temporary) = outcome.status_message();
    board.post(message, temporary, 0);
    assert_eq!(board.status(), "Entry OK");

    let lines = board.compose(&reading(20, 40, 0.0, true), access.occupancy(), 500.0, 5_000);
    assert_eq!(lines[2].as_str(), "Inside: 1");
    assert_eq!(lines[3].as_str(), STATUS_OK);

    access.scan(&id("04 A3 2B 1C"));
    let lines = board.compose(&reading(20, 40, 0.0, true), access.occupancy(), 500.0, 6_000);
    assert_eq!(lines[3].as_str(), MOTION_OVERLAY);
}
