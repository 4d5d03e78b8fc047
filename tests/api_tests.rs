//! Unit tests for the handle-level facade.
//!
//! Absent handles and values must be harmless no-ops that answer with the
//! operation's failure value.

use ringqueue::{QueueChain, api};
use rstest::rstest;

fn contents(queue: Option<&ringqueue::Queue>) -> Vec<String> {
    queue
        .map(|queue| queue.iter().map(str::to_owned).collect())
        .unwrap_or_default()
}

// =============================================================================
// Absent handles
// =============================================================================

#[rstest]
fn test_absent_queue_answers_with_failure_values() {
    assert!(!api::insert_head(None, Some("a")));
    assert!(!api::insert_tail(None, Some("a")));
    assert!(api::remove_head(None, None).is_none());
    assert!(api::remove_tail(None, None).is_none());
    assert_eq!(api::size(None), 0);
    assert!(!api::delete_mid(None));
    assert!(!api::delete_dup(None));
    assert_eq!(api::ascend(None), 0);
    assert_eq!(api::descend(None), 0);
    assert_eq!(api::merge(None, false), 0);

    api::swap(None);
    api::reverse(None);
    api::reverse_k(None, 2);
    api::sort(None, true);
    api::free(None);
    api::release_element(None);
}

#[rstest]
fn test_absent_value_leaves_queue_unchanged() {
    let mut queue = api::new();
    assert!(api::insert_tail(queue.as_mut(), Some("a")));
    assert!(!api::insert_head(queue.as_mut(), None));
    assert!(!api::insert_tail(queue.as_mut(), None));
    assert_eq!(api::size(queue.as_ref()), 1);
    api::free(queue);
}

// =============================================================================
// Operations through the facade
// =============================================================================

#[rstest]
fn test_facade_round_trip() {
    let mut queue = api::new();
    for value in ["b", "a", "c"] {
        assert!(api::insert_tail(queue.as_mut(), Some(value)));
    }

    api::sort(queue.as_mut(), false);
    assert_eq!(contents(queue.as_ref()), vec!["a", "b", "c"]);

    assert!(api::delete_mid(queue.as_mut()));
    assert_eq!(contents(queue.as_ref()), vec!["a", "c"]);

    let mut buffer = [0u8; 8];
    let element = api::remove_tail(queue.as_mut(), Some(&mut buffer[..]));
    assert_eq!(element.as_deref(), Some("c"));
    assert_eq!(&buffer[..2], b"c\0");
    api::release_element(element);

    assert_eq!(api::size(queue.as_ref()), 1);
    api::free(queue);
}

#[rstest]
fn test_delete_mid_and_dup_report_failure_on_short_queues() {
    let mut queue = api::new();
    assert!(!api::delete_mid(queue.as_mut()));
    assert!(!api::delete_dup(queue.as_mut()));

    assert!(api::insert_tail(queue.as_mut(), Some("a")));
    assert!(!api::delete_dup(queue.as_mut()));

    assert!(api::insert_tail(queue.as_mut(), Some("b")));
    assert!(api::delete_dup(queue.as_mut()));
    assert_eq!(api::size(queue.as_ref()), 2);
}

#[rstest]
fn test_structural_operations() {
    let mut queue = api::new();
    for value in ["1", "2", "3", "4", "5"] {
        api::insert_tail(queue.as_mut(), Some(value));
    }

    api::swap(queue.as_mut());
    assert_eq!(contents(queue.as_ref()), vec!["2", "1", "4", "3", "5"]);

    api::reverse(queue.as_mut());
    assert_eq!(contents(queue.as_ref()), vec!["5", "3", "4", "1", "2"]);

    api::reverse_k(queue.as_mut(), 2);
    assert_eq!(contents(queue.as_ref()), vec!["3", "5", "1", "4", "2"]);

    api::sort(queue.as_mut(), true);
    assert_eq!(contents(queue.as_ref()), vec!["5", "4", "3", "2", "1"]);
}

#[rstest]
#[case(false, vec!["1", "1", "5"])]
#[case(true, vec!["5"])]
fn test_monotonic_filters(#[case] descend: bool, #[case] expected: Vec<&str>) {
    let mut queue = api::new();
    for value in ["3", "1", "4", "1", "5"] {
        api::insert_tail(queue.as_mut(), Some(value));
    }
    let size = if descend {
        api::descend(queue.as_mut())
    } else {
        api::ascend(queue.as_mut())
    };
    assert_eq!(size, expected.len());
    assert_eq!(contents(queue.as_ref()), expected);
}

#[rstest]
fn test_merge_through_facade() {
    let mut chain = QueueChain::from_queues([["1", "3"], ["2", "4"]]).unwrap();
    assert_eq!(api::merge(Some(&mut chain), true), 4);
    let first = chain.first().unwrap();
    assert_eq!(
        chain.values(first).unwrap().collect::<Vec<_>>(),
        vec!["4", "3", "2", "1"]
    );
}
