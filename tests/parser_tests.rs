//! Parser Tests
//!
//! Recursive descent over the token stream, leaf-variant selection, and
//! failure reporting through the diagnostics sink.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use remote_logic::{
    parse_requires, Diagnostics, ErrorSink, Logic, LogicKind,
};

fn parse_ok(source: &str) -> Arc<Logic<'_>> {
    parse_requires(source, &Diagnostics::disabled()).expect("parse should succeed")
}

#[test]
fn test_item_and_category() {
    assert!(matches!(parse_ok("|sword|").kind(), LogicKind::Item("sword")));
    assert!(matches!(
        parse_ok("|@weapons|").kind(),
        LogicKind::Category("weapons")
    ));
}

#[test]
fn test_count_variants() {
    assert!(matches!(
        parse_ok("|sword:3|").kind(),
        LogicKind::ItemCount("sword", "3")
    ));
    assert!(matches!(
        parse_ok("|@weapons:2|").kind(),
        LogicKind::CategoryCount("weapons", "2")
    ));
}

#[test]
fn test_percent_variants() {
    assert!(matches!(
        parse_ok("|coin:50%|").kind(),
        LogicKind::ItemPercent("coin", "50")
    ));
    assert!(matches!(
        parse_ok("|@gems:25%|").kind(),
        LogicKind::CategoryPercent("gems", "25")
    ));
}

#[test]
fn test_all_and_half_lower_to_numbers() {
    assert!(matches!(
        parse_ok("|@gems:ALL%|").kind(),
        LogicKind::CategoryPercent("gems", "100")
    ));
    assert!(matches!(
        parse_ok("|@gems:HALF%|").kind(),
        LogicKind::CategoryPercent("gems", "50")
    ));
    // Without the percent sign they select the count variants.
    assert!(matches!(
        parse_ok("|@gems:ALL|").kind(),
        LogicKind::CategoryCount("gems", "100")
    ));
}

#[test]
fn test_function_carries_raw_arguments() {
    let node = parse_ok("{canReachLocation(The Vault)}");
    assert!(matches!(
        node.kind(),
        LogicKind::Function("canReachLocation", "The Vault")
    ));
}

#[test]
fn test_bare_identifier_stream_is_an_item() {
    assert!(matches!(
        parse_ok("Master Sword").kind(),
        LogicKind::Item("Master Sword")
    ));
}

#[test]
fn test_parentheses_produce_grouping() {
    let node = parse_ok("(|a| AND |b|)");
    let LogicKind::Grouping(inner) = node.kind() else {
        panic!("expected a grouping");
    };
    assert!(matches!(inner.kind(), LogicKind::And(_, _)));
}

#[test]
fn test_operators_are_right_associative_and_equal_precedence() {
    // No precedence between AND and OR: `a AND b OR c` is `a AND (b OR c)`.
    let node = parse_ok("|a| AND |b| OR |c|");
    let LogicKind::And(left, right) = node.kind() else {
        panic!("expected a conjunction at the root");
    };
    assert!(matches!(left.kind(), LogicKind::Item("a")));
    assert!(matches!(right.kind(), LogicKind::Or(_, _)));
}

#[test]
fn test_canonical_display_reparses_to_the_same_dag() {
    for source in [
        "|sword|",
        "|@weapons:2|",
        "(|a| OR |b|) AND |c|",
        "{ItemValue(coins:30)} OR |wallet|",
        "|a| AND |b| AND |c|",
    ] {
        let parsed = parse_ok(source);
        let parsed_str = parsed.to_string();
        let reparsed = parse_ok(&parsed_str);
        assert_eq!(*parsed, *reparsed, "source: {source:?}");
    }
}

#[test]
fn test_failures_return_none() {
    let diagnostics = Diagnostics::disabled();
    for source in ["|unterminated", "(|a| AND |b|", "|a| |b|", "{Broken", "|a| AND"] {
        assert!(
            parse_requires(source, &diagnostics).is_none(),
            "source should fail: {source:?}"
        );
    }
}

struct RecordingSink {
    calls: AtomicUsize,
    last_description: Mutex<String>,
}

impl ErrorSink for RecordingSink {
    fn report(&self, _title: &str, description: &str, buttons: &[&str]) -> Option<usize> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        *self.last_description.lock().expect("lock") = description.to_string();
        // Button index 1 asks for the next error.
        assert!(buttons.len() > 1);
        Some(1)
    }
}

#[test]
fn test_failure_description_reconstructs_the_line() {
    let sink = Arc::new(RecordingSink {
        calls: AtomicUsize::new(0),
        last_description: Mutex::new(String::new()),
    });
    let diagnostics = Diagnostics::new(sink.clone());

    assert!(parse_requires("|a| AND", &diagnostics).is_none());
    assert_eq!(sink.calls.load(Ordering::SeqCst), 1);
    let description = sink.last_description.lock().expect("lock").clone();
    assert!(description.contains("|a| AND"), "got: {description}");
    assert!(description.contains("line 1"), "got: {description}");
}

#[test]
fn test_distinct_failures_each_reported_once() {
    let sink = Arc::new(RecordingSink {
        calls: AtomicUsize::new(0),
        last_description: Mutex::new(String::new()),
    });
    let diagnostics = Diagnostics::new(sink.clone());

    assert!(parse_requires("|a| AND", &diagnostics).is_none());
    assert!(parse_requires("|a| AND", &diagnostics).is_none());
    assert!(parse_requires("|b| OR", &diagnostics).is_none());
    assert_eq!(sink.calls.load(Ordering::SeqCst), 2);
}
