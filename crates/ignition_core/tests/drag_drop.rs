use ignition_core::{
    DragDropCoordinator, DragItem, DropOutcome, DropTarget, MemoryStore, RejectReason,
    StoreSliceRepository, WorkspaceSession,
};

#[test]
fn move_card_between_boards_then_reorder_boards() {
    let store = MemoryStore::new();
    let mut session = WorkspaceSession::new(StoreSliceRepository::new(&store));
    session.load(1).unwrap();
    let mut drag = DragDropCoordinator::new();

    let todo = session.create_board("Todo").unwrap();
    let doing = session.create_board("Doing").unwrap();
    let task = session.create_card(&todo.id, "Task1", "").unwrap();

    drag.drag_start(DragItem::Card(task.id.clone()));
    let outcome = drag
        .drop_on(DropTarget::Board(doing.id.clone()), &mut session)
        .unwrap();
    assert_eq!(outcome, DropOutcome::CardMovedToBoard);
    assert_eq!(session.card(&task.id).unwrap().board_id, doing.id);
    assert!(session.cards_on_board(&todo.id).is_empty());

    drag.drag_start(DragItem::Board(doing.id.clone()));
    let outcome = drag
        .drop_on(DropTarget::Board(todo.id.clone()), &mut session)
        .unwrap();
    assert_eq!(outcome, DropOutcome::BoardReordered);
    assert_eq!(session.board(&doing.id).unwrap().order, 1);
    assert_eq!(session.board(&todo.id).unwrap().order, 2);

    let mut reopened = WorkspaceSession::new(StoreSliceRepository::new(&store));
    reopened.load(1).unwrap();
    let titles: Vec<&str> = reopened
        .boards()
        .iter()
        .map(|board| board.title.as_str())
        .collect();
    assert_eq!(titles, vec!["Doing", "Todo"]);
    assert_eq!(reopened.card(&task.id).unwrap().board_id, doing.id);
}

#[test]
fn subtree_follows_root_to_new_board() {
    let store = MemoryStore::new();
    let mut session = WorkspaceSession::new(StoreSliceRepository::new(&store));
    session.load(1).unwrap();
    let mut drag = DragDropCoordinator::new();

    let todo = session.create_board("Todo").unwrap();
    let done = session.create_board("Done").unwrap();
    let parent = session.create_card(&todo.id, "parent", "").unwrap();
    let root = session.create_sub_card(&parent.id, "root", "").unwrap();
    let child = session.create_sub_card(&root.id, "child", "").unwrap();
    let grandchild = session.create_sub_card(&child.id, "grandchild", "").unwrap();

    drag.drag_start(DragItem::Card(root.id.clone()));
    assert_eq!(
        drag.drop_on(DropTarget::Board(done.id.clone()), &mut session)
            .unwrap(),
        DropOutcome::CardMovedToBoard
    );

    let moved = session.card(&root.id).unwrap();
    assert_eq!(moved.parent_id, None);
    assert_eq!(moved.board_id, done.id);
    for id in [&child.id, &grandchild.id] {
        assert_eq!(session.card(id).unwrap().board_id, done.id);
    }
    assert_eq!(
        session.card(&child.id).unwrap().parent_id.as_deref(),
        Some(root.id.as_str())
    );
    assert_eq!(
        session.card(&grandchild.id).unwrap().parent_id.as_deref(),
        Some(child.id.as_str())
    );
    assert_eq!(session.card(&parent.id).unwrap().board_id, todo.id);
    assert!(session.children_of(&parent.id).is_empty());
}

#[test]
fn card_onto_card_reparents_and_cycles_are_rejected() {
    let store = MemoryStore::new();
    let mut session = WorkspaceSession::new(StoreSliceRepository::new(&store));
    session.load(1).unwrap();
    let mut drag = DragDropCoordinator::new();

    let todo = session.create_board("Todo").unwrap();
    let doing = session.create_board("Doing").unwrap();
    let a = session.create_card(&todo.id, "a", "").unwrap();
    let b = session.create_card(&doing.id, "b", "").unwrap();

    drag.drag_start(DragItem::Card(b.id.clone()));
    assert_eq!(
        drag.drop_on(DropTarget::Card(a.id.clone()), &mut session)
            .unwrap(),
        DropOutcome::CardReparented
    );
    let nested = session.card(&b.id).unwrap();
    assert_eq!(nested.parent_id.as_deref(), Some(a.id.as_str()));
    assert_eq!(nested.board_id, doing.id);

    let before = session.cards().to_vec();
    drag.drag_start(DragItem::Card(a.id.clone()));
    assert_eq!(
        drag.drop_on(DropTarget::Card(b.id.clone()), &mut session)
            .unwrap(),
        DropOutcome::Rejected(RejectReason::WouldCreateCycle)
    );
    drag.drag_start(DragItem::Card(a.id.clone()));
    assert_eq!(
        drag.drop_on(DropTarget::Card(a.id.clone()), &mut session)
            .unwrap(),
        DropOutcome::Rejected(RejectReason::WouldCreateCycle)
    );
    assert_eq!(session.cards(), before.as_slice());
    assert!(!drag.is_dragging());
}

#[test]
fn board_drops_on_self_or_card_do_nothing() {
    let store = MemoryStore::new();
    let mut session = WorkspaceSession::new(StoreSliceRepository::new(&store));
    session.load(1).unwrap();
    let mut drag = DragDropCoordinator::new();

    let todo = session.create_board("Todo").unwrap();
    let doing = session.create_board("Doing").unwrap();
    let card = session.create_card(&doing.id, "card", "").unwrap();

    drag.drag_start(DragItem::Board(todo.id.clone()));
    assert_eq!(
        drag.drop_on(DropTarget::Board(todo.id.clone()), &mut session)
            .unwrap(),
        DropOutcome::Rejected(RejectReason::SelfDrop)
    );
    drag.drag_start(DragItem::Board(todo.id.clone()));
    assert_eq!(
        drag.drop_on(DropTarget::Card(card.id.clone()), &mut session)
            .unwrap(),
        DropOutcome::Ignored
    );
    assert_eq!(session.board(&todo.id).unwrap().order, 1);
    assert_eq!(session.board(&doing.id).unwrap().order, 2);
}

#[test]
fn dropping_nested_card_on_own_board_detaches_it() {
    let store = MemoryStore::new();
    let mut session = WorkspaceSession::new(StoreSliceRepository::new(&store));
    session.load(1).unwrap();
    let mut drag = DragDropCoordinator::new();

    let todo = session.create_board("Todo").unwrap();
    let parent = session.create_card(&todo.id, "parent", "").unwrap();
    let child = session.create_sub_card(&parent.id, "child", "").unwrap();

    drag.drag_start(DragItem::Card(child.id.clone()));
    assert_eq!(
        drag.drop_on(DropTarget::Board(todo.id.clone()), &mut session)
            .unwrap(),
        DropOutcome::CardMovedToBoard
    );
    assert!(session.card(&child.id).unwrap().is_root());
    assert_eq!(session.cards_on_board(&todo.id).len(), 2);

    drag.drag_start(DragItem::Card(child.id.clone()));
    assert_eq!(
        drag.drop_on(DropTarget::Board(todo.id.clone()), &mut session)
            .unwrap(),
        DropOutcome::Ignored
    );
}
