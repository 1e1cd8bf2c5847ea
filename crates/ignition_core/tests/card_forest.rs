use ignition_core::{
    Card, MemoryStore, SessionError, StoreSliceRepository, WorkspaceSession,
};
use std::collections::HashSet;

type Session<'a> = WorkspaceSession<StoreSliceRepository<&'a MemoryStore>>;

fn open(store: &MemoryStore) -> Session<'_> {
    let mut session = WorkspaceSession::new(StoreSliceRepository::new(store));
    session.load(1).unwrap();
    session
}

/// Builds `root ─┬─ a ── a1 ── a2`, `root ── b`, plus an unrelated `other` card.
fn forest(session: &mut Session<'_>) -> (String, Vec<Card>) {
    let board = session.create_board("Todo").unwrap();
    let root = session.create_card(&board.id, "root", "").unwrap();
    let a = session.create_sub_card(&root.id, "a", "").unwrap();
    let a1 = session.create_sub_card(&a.id, "a1", "").unwrap();
    let a2 = session.create_sub_card(&a1.id, "a2", "").unwrap();
    let b = session.create_sub_card(&root.id, "b", "").unwrap();
    let other = session.create_card(&board.id, "other", "details").unwrap();
    (board.id, vec![root, a, a1, a2, b, other])
}

fn ids(cards: &[Card]) -> HashSet<String> {
    cards.iter().map(|card| card.id.clone()).collect()
}

#[test]
fn delete_card_removes_exactly_card_and_descendants() {
    let store = MemoryStore::new();
    let mut session = open(&store);
    let (_, cards) = forest(&mut session);
    let (a, other) = (&cards[1], &cards[5]);

    assert_eq!(session.card_delete_impact(&a.id).unwrap(), 2);
    let removed = session.delete_card(&a.id).unwrap();
    assert_eq!(removed, 3);

    let remaining = ids(session.cards());
    let expected: HashSet<String> = [&cards[0], &cards[4], other]
        .iter()
        .map(|card| card.id.clone())
        .collect();
    assert_eq!(remaining, expected);

    let untouched = session.card(&other.id).unwrap();
    assert_eq!(untouched, other);
}

#[test]
fn reparent_onto_self_or_descendant_is_noop() {
    let store = MemoryStore::new();
    let mut session = open(&store);
    let (_, cards) = forest(&mut session);
    let before = session.cards().to_vec();
    let root = &cards[0];

    assert!(!session.reparent_card(&root.id, &root.id).unwrap());
    for descendant in &cards[1..5] {
        assert!(!session.reparent_card(&root.id, &descendant.id).unwrap());
    }
    assert!(!session.reparent_card(&cards[1].id, &cards[3].id).unwrap());

    assert_eq!(session.cards(), before.as_slice());
}

#[test]
fn reparent_keeps_board_and_moves_subtree_under_new_parent() {
    let store = MemoryStore::new();
    let mut session = open(&store);
    let (_, cards) = forest(&mut session);
    let doing = session.create_board("Doing").unwrap();
    let host = session.create_card(&doing.id, "host", "").unwrap();
    let a = &cards[1];

    assert!(session.reparent_card(&a.id, &host.id).unwrap());
    let moved = session.card(&a.id).unwrap();
    assert_eq!(moved.parent_id.as_deref(), Some(host.id.as_str()));
    assert_eq!(moved.board_id, a.board_id);

    let host_children: Vec<&str> = session
        .children_of(&host.id)
        .iter()
        .map(|card| card.id.as_str())
        .collect();
    assert_eq!(host_children, vec![a.id.as_str()]);
    assert!(session.would_create_cycle(&host.id, &cards[3].id));
}

#[test]
fn reparent_to_current_parent_reports_no_change() {
    let store = MemoryStore::new();
    let mut session = open(&store);
    let (_, cards) = forest(&mut session);
    assert!(!session.reparent_card(&cards[1].id, &cards[0].id).unwrap());
}

#[test]
fn delete_board_cascades_across_boards_through_descendants() {
    let store = MemoryStore::new();
    let mut session = open(&store);
    let (todo_id, cards) = forest(&mut session);
    let doing = session.create_board("Doing").unwrap();
    let survivor = session.create_card(&doing.id, "survivor", "").unwrap();
    let stray = session.create_card(&doing.id, "stray child", "").unwrap();
    assert!(session.reparent_card(&stray.id, &cards[5].id).unwrap());

    assert_eq!(session.board_delete_impact(&todo_id).unwrap(), 7);
    assert_eq!(session.delete_board(&todo_id).unwrap(), 7);

    assert_eq!(ids(session.cards()), ids(&[survivor]));
    assert_eq!(session.boards().len(), 1);
    assert_eq!(session.boards()[0].order, 1);
}

#[test]
fn unknown_ids_are_reported() {
    let store = MemoryStore::new();
    let mut session = open(&store);
    let (board_id, cards) = forest(&mut session);

    assert!(matches!(
        session.delete_card("card-missing"),
        Err(SessionError::CardNotFound(id)) if id == "card-missing"
    ));
    assert!(matches!(
        session.reparent_card(&cards[0].id, "card-missing"),
        Err(SessionError::CardNotFound(_))
    ));
    assert!(matches!(
        session.create_card("board-missing", "x", ""),
        Err(SessionError::BoardNotFound(_))
    ));
    assert!(session.board(&board_id).is_some());
}
