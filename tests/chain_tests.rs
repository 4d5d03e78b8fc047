//! Unit tests for QueueChain and the multi-queue merge.

use ringqueue::{Queue, QueueChain, QueueError, SortOrder};
use rstest::rstest;

fn values(chain: &QueueChain, index: usize) -> Vec<String> {
    let id = chain.contexts().nth(index).unwrap();
    chain.values(id).unwrap().map(str::to_owned).collect()
}

// =============================================================================
// Building chains
// =============================================================================

#[rstest]
fn test_new_chain_has_no_queues() {
    let chain = QueueChain::new();
    assert!(chain.is_empty());
    assert_eq!(chain.len(), 0);
    assert_eq!(chain.first(), None);
    assert!(chain.is_well_formed());
}

#[rstest]
fn test_insert_keeps_cached_size() {
    let mut chain = QueueChain::new();
    let id = chain.add_queue().unwrap();
    chain.insert_tail(id, "b").unwrap();
    chain.insert_head(id, "a").unwrap();
    chain.insert_tail(id, "c").unwrap();

    assert_eq!(chain.size(id), Ok(3));
    assert_eq!(values(&chain, 0), vec!["a", "b", "c"]);
    assert!(chain.is_well_formed());
}

#[rstest]
fn test_from_queues_preserves_order() {
    let chain = QueueChain::from_queues([vec!["x"], vec![], vec!["y", "z"]]).unwrap();
    assert_eq!(chain.len(), 3);
    assert_eq!(values(&chain, 0), vec!["x"]);
    assert!(values(&chain, 1).is_empty());
    assert_eq!(values(&chain, 2), vec!["y", "z"]);
}

// =============================================================================
// merge
// =============================================================================

#[rstest]
fn test_merge_two_sorted_queues_ascending() {
    let mut chain = QueueChain::from_queues([["1", "3"], ["2", "4"]]).unwrap();
    assert_eq!(chain.merge(SortOrder::Ascending), 4);

    let first = chain.first().unwrap();
    assert_eq!(chain.size(first), Ok(4));
    assert_eq!(values(&chain, 0), vec!["1", "2", "3", "4"]);
    assert!(values(&chain, 1).is_empty());
    assert!(chain.is_well_formed());
}

#[rstest]
fn test_merge_descending() {
    let mut chain =
        QueueChain::from_queues([vec!["9", "5", "1"], vec!["8"], vec!["7", "6"]]).unwrap();
    assert_eq!(chain.merge(SortOrder::Descending), 6);
    assert_eq!(values(&chain, 0), vec!["9", "8", "7", "6", "5", "1"]);
    for index in 1..3 {
        let id = chain.contexts().nth(index).unwrap();
        assert_eq!(chain.size(id), Ok(0));
        assert!(values(&chain, index).is_empty());
    }
    assert!(chain.is_well_formed());
}

#[rstest]
fn test_merge_into_empty_first_queue() {
    let mut chain = QueueChain::from_queues([vec![], vec!["b", "c"], vec!["a"]]).unwrap();
    assert_eq!(chain.merge(SortOrder::Ascending), 3);
    assert_eq!(values(&chain, 0), vec!["a", "b", "c"]);
}

#[rstest]
fn test_merge_single_queue_sorts_it() {
    let mut chain = QueueChain::from_queues([["c", "a", "b"]]).unwrap();
    assert_eq!(chain.merge(SortOrder::Ascending), 3);
    assert_eq!(values(&chain, 0), vec!["a", "b", "c"]);
}

#[rstest]
fn test_merge_of_empty_chain_is_zero() {
    let mut chain = QueueChain::new();
    assert_eq!(chain.merge(SortOrder::Ascending), 0);
}

#[rstest]
fn test_merge_keeps_duplicates() {
    let mut chain = QueueChain::from_queues([["a", "b"], ["a", "b"]]).unwrap();
    assert_eq!(chain.merge(SortOrder::Ascending), 4);
    assert_eq!(values(&chain, 0), vec!["a", "a", "b", "b"]);
}

#[rstest]
fn test_chain_can_be_refilled_after_merge() {
    let mut chain = QueueChain::from_queues([["b"], ["a"]]).unwrap();
    chain.merge(SortOrder::Ascending);

    let second = chain.contexts().nth(1).unwrap();
    chain.insert_tail(second, "c").unwrap();
    assert_eq!(chain.merge(SortOrder::Ascending), 3);
    assert_eq!(values(&chain, 0), vec!["a", "b", "c"]);
    assert!(chain.is_well_formed());
}

#[rstest]
fn test_unknown_context_is_reported() {
    let mut other = QueueChain::new();
    for _ in 0..3 {
        other.add_queue().unwrap();
    }
    let foreign = other.contexts().last().unwrap();

    let chain = QueueChain::new();
    assert_eq!(chain.size(foreign), Err(QueueError::UnknownContext));
}

#[rstest]
fn test_context_from_populated_chain_is_rejected() {
    let mut other = QueueChain::new();
    other.add_queue().unwrap();
    other.add_queue().unwrap();
    let foreign = other.add_queue().unwrap();

    let mut chain = QueueChain::from_queues([["a"], ["b"], ["c"]]).unwrap();
    assert!(!chain.contexts().any(|id| id == foreign));

    assert_eq!(
        chain.insert_tail(foreign, "x"),
        Err(QueueError::UnknownContext)
    );
    assert_eq!(
        chain.insert_head(foreign, "x"),
        Err(QueueError::UnknownContext)
    );
    assert_eq!(
        chain.remove_head(foreign, None),
        Err(QueueError::UnknownContext)
    );
    assert_eq!(chain.clear(foreign), Err(QueueError::UnknownContext));
    assert!(chain.take(foreign).is_err());
    assert_eq!(format!("{chain:?}"), r#"[["a"], ["b"], ["c"]]"#);
    assert!(chain.is_well_formed());
}

// =============================================================================
// Per-queue removal and hand-off
// =============================================================================

#[rstest]
fn test_removals_keep_cached_size_in_step() {
    let mut chain = QueueChain::from_queues([vec!["a", "b", "c", "d"], vec!["z"]]).unwrap();
    let id = chain.first().unwrap();

    let mut buffer = [0u8; 4];
    let head = chain.remove_head(id, Some(&mut buffer[..])).unwrap();
    assert_eq!(head.as_deref(), Some("a"));
    assert_eq!(&buffer, b"a\0\0\0");
    assert_eq!(chain.size(id), Ok(3));

    let tail = chain.remove_tail(id, None).unwrap();
    assert_eq!(tail.as_deref(), Some("d"));
    assert_eq!(chain.size(id), Ok(2));
    assert_eq!(values(&chain, 0), vec!["b", "c"]);
    assert!(chain.is_well_formed());

    chain.remove_head(id, None).unwrap();
    chain.remove_head(id, None).unwrap();
    assert_eq!(chain.remove_head(id, None), Ok(None));
    assert_eq!(chain.remove_tail(id, None), Ok(None));
    assert_eq!(chain.size(id), Ok(0));
    assert_eq!(values(&chain, 1), vec!["z"]);
    assert!(chain.is_well_formed());
}

#[rstest]
fn test_clear_empties_one_context() {
    let mut chain = QueueChain::from_queues([vec!["a", "b"], vec!["c"]]).unwrap();
    let id = chain.first().unwrap();

    assert_eq!(chain.clear(id), Ok(2));
    assert_eq!(chain.size(id), Ok(0));
    assert!(values(&chain, 0).is_empty());
    assert_eq!(values(&chain, 1), vec!["c"]);
    assert_eq!(chain.len(), 2);
    assert!(chain.is_well_formed());
}

#[rstest]
fn test_take_hands_merged_result_to_queue_api() {
    let mut chain = QueueChain::from_queues([["b", "d"], ["a", "c"]]).unwrap();
    chain.merge(SortOrder::Ascending);
    let first = chain.first().unwrap();

    let mut merged = chain.take(first).unwrap();
    assert_eq!(chain.size(first), Ok(0));
    assert!(chain.is_well_formed());

    assert_eq!(merged.size(), 4);
    assert!(merged.is_well_formed());
    merged.reverse();
    assert_eq!(merged.iter().collect::<Vec<_>>(), vec!["d", "c", "b", "a"]);
}

#[rstest]
fn test_push_queue_moves_values_in() {
    let queue: Queue = ["y", "x"].into_iter().collect();
    let mut chain = QueueChain::from_queues([["z"]]).unwrap();

    let id = chain.push_queue(queue).unwrap();
    assert_eq!(chain.len(), 2);
    assert_eq!(chain.size(id), Ok(2));
    assert_eq!(values(&chain, 1), vec!["y", "x"]);
    assert!(chain.is_well_formed());

    assert_eq!(chain.merge(SortOrder::Ascending), 3);
    assert_eq!(values(&chain, 0), vec!["x", "y", "z"]);
}

// =============================================================================
// merge stability
// =============================================================================

#[rstest]
#[case(SortOrder::Ascending, vec!["a1", "a2", "a3", "b1", "b2"])]
#[case(SortOrder::Descending, vec!["b1", "b2", "a1", "a2", "a3"])]
fn test_merge_by_keeps_chain_order_for_equal_keys(
    #[case] order: SortOrder,
    #[case] expected: Vec<&str>,
) {
    let mut chain =
        QueueChain::from_queues([vec!["b1", "a1"], vec!["a2", "b2"], vec!["a3"]]).unwrap();
    let total = chain.merge_by(order, |left, right| left[..1].cmp(&right[..1]));
    assert_eq!(total, 5);
    assert_eq!(values(&chain, 0), expected);
    assert!(chain.is_well_formed());
}

#[rstest]
fn test_debug_lists_every_queue() {
    let chain = QueueChain::from_queues([vec!["a"], vec!["b", "c"]]).unwrap();
    assert_eq!(format!("{chain:?}"), r#"[["a"], ["b", "c"]]"#);
}
