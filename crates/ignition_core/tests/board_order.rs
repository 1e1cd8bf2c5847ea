use ignition_core::{
    BoardPatch, MemoryStore, ModelValidationError, SessionError, StoreSliceRepository,
    WorkspaceSession,
};

fn titles_and_orders<R: ignition_core::SliceRepository>(
    session: &WorkspaceSession<R>,
) -> Vec<(String, i64)> {
    session
        .boards()
        .iter()
        .map(|board| (board.title.clone(), board.order))
        .collect()
}

fn pairs(expected: &[(&str, i64)]) -> Vec<(String, i64)> {
    expected
        .iter()
        .map(|(title, order)| (title.to_string(), *order))
        .collect()
}

#[test]
fn ranks_stay_dense_through_create_delete_reorder() {
    let store = MemoryStore::new();
    let mut session = WorkspaceSession::new(StoreSliceRepository::new(&store));
    session.load(1).unwrap();

    let a = session.create_board("A").unwrap();
    let b = session.create_board("B").unwrap();
    let c = session.create_board("C").unwrap();
    let d = session.create_board("D").unwrap();
    assert_eq!(
        titles_and_orders(&session),
        pairs(&[("A", 1), ("B", 2), ("C", 3), ("D", 4)])
    );

    assert!(session.reorder_board(&a.id, &c.id).unwrap());
    assert_eq!(
        titles_and_orders(&session),
        pairs(&[("B", 1), ("C", 2), ("A", 3), ("D", 4)])
    );

    session.delete_board(&c.id).unwrap();
    assert_eq!(
        titles_and_orders(&session),
        pairs(&[("B", 1), ("A", 2), ("D", 3)])
    );

    assert!(session.reorder_board(&d.id, &b.id).unwrap());
    assert_eq!(
        titles_and_orders(&session),
        pairs(&[("D", 1), ("B", 2), ("A", 3)])
    );

    let mut reopened = WorkspaceSession::new(StoreSliceRepository::new(&store));
    reopened.load(1).unwrap();
    assert_eq!(titles_and_orders(&reopened), titles_and_orders(&session));
}

#[test]
fn reorder_onto_self_is_noop() {
    let store = MemoryStore::new();
    let mut session = WorkspaceSession::new(StoreSliceRepository::new(&store));
    session.load(1).unwrap();
    let a = session.create_board("A").unwrap();
    session.create_board("B").unwrap();

    assert!(!session.reorder_board(&a.id, &a.id).unwrap());
    assert_eq!(titles_and_orders(&session), pairs(&[("A", 1), ("B", 2)]));
}

#[test]
fn update_board_keeps_rank_and_validates() {
    let store = MemoryStore::new();
    let mut session = WorkspaceSession::new(StoreSliceRepository::new(&store));
    session.load(1).unwrap();
    session.create_board("A").unwrap();
    let b = session.create_board("B").unwrap();

    let updated = session
        .update_board(
            &b.id,
            &BoardPatch {
                title: Some("  Backlog ".to_string()),
                description: Some("later".to_string()),
                color: Some("#A1B2C3".to_string()),
            },
        )
        .unwrap();
    assert_eq!(updated.title, "Backlog");
    assert_eq!(updated.color, "#a1b2c3");
    assert_eq!(updated.order, 2);

    let blank = session.update_board(
        &b.id,
        &BoardPatch {
            title: Some("   ".to_string()),
            ..BoardPatch::default()
        },
    );
    assert!(matches!(
        blank,
        Err(SessionError::Validation(ModelValidationError::BlankTitle))
    ));
    assert_eq!(session.board(&b.id).unwrap(), &updated);
}

#[test]
fn blank_board_title_is_rejected_without_mutation() {
    let store = MemoryStore::new();
    let mut session = WorkspaceSession::new(StoreSliceRepository::new(&store));
    session.load(1).unwrap();

    assert!(matches!(
        session.create_board(" \t "),
        Err(SessionError::Validation(ModelValidationError::BlankTitle))
    ));
    assert!(session.boards().is_empty());
    assert!(store.is_empty());
}

#[test]
fn mutations_require_a_loaded_workspace() {
    let store = MemoryStore::new();
    let mut session = WorkspaceSession::new(StoreSliceRepository::new(&store));

    assert!(matches!(
        session.create_board("A"),
        Err(SessionError::NoWorkspaceLoaded)
    ));
}
