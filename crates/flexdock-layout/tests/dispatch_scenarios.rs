//! End-to-end dispatch scenarios against the public API.

use flexdock_layout::{
    Action, BorderLocation, DispatchOutcome, DockLocation, IgnoreReason, Model, NodeId, NodeType,
    Rect, compute_nesting_order,
};
use serde_json::json;

fn sized_model() -> Model {
    let mut model = Model::new();
    let outcome = model.dispatch(Action::move_window("main", Rect::new(0.0, 0.0, 1000.0, 800.0)));
    assert_eq!(outcome, DispatchOutcome::Applied);
    model
}

fn add_tab(model: &mut Model, id: &str, to: &NodeId, location: DockLocation) {
    let outcome = model.dispatch(Action::add_node(
        json!({ "id": id, "name": id.to_uppercase() }),
        to.clone(),
        location,
        None,
        None,
    ));
    assert_eq!(outcome, DispatchOutcome::Applied, "adding {id}");
}

fn parent_of(model: &Model, id: &str) -> NodeId {
    model
        .node(id)
        .and_then(|node| node.parent())
        .cloned()
        .expect("attached node")
}

/// Tabset `A = [t1, t2]` with `t1` selected, and a sibling tabset `B = [b1]`.
fn two_tabsets() -> (Model, NodeId, NodeId) {
    let mut model = sized_model();
    let a = model.tabsets_in_window("main")[0].clone();
    add_tab(&mut model, "t1", &a, DockLocation::Center);
    add_tab(&mut model, "t2", &a, DockLocation::Center);
    assert!(model.dispatch(Action::select_tab("t1")).is_applied());
    add_tab(&mut model, "b1", &a, DockLocation::Right);
    let b = parent_of(&model, "b1");
    assert_ne!(a, b);
    (model, a, b)
}

#[test]
fn delete_tab_clamps_selection() {
    let (mut model, a, _) = two_tabsets();
    assert_eq!(model.node(&a).and_then(|node| node.selected()), Some(0));
    assert!(model.dispatch(Action::delete_tab("t1")).is_applied());
    let a_node = model.node(&a).expect("A survives");
    assert_eq!(a_node.children(), &[NodeId::new("t2")]);
    assert_eq!(a_node.selected(), Some(0));
    assert!(model.node("t1").is_none());
}

#[test]
fn move_last_tab_right_of_sibling_removes_emptied_tabset() {
    let (mut model, a, b) = two_tabsets();
    assert!(model.dispatch(Action::delete_tab("t1")).is_applied());
    let outcome = model.dispatch(Action::move_node("t2", b.clone(), DockLocation::Right, None, None));
    assert!(outcome.is_applied());

    assert!(model.node(&a).is_none(), "emptied tabset is tidied away");
    let root = model.root("main").expect("main root");
    let holder = parent_of(&model, "t2");
    assert_ne!(holder, b);
    assert_eq!(root.children(), &[b.clone(), holder.clone()]);
    assert_eq!(model.active_tabset("main"), Some(&holder));
    let b_rect = model.node(&b).expect("B").geometry().rect;
    let holder_rect = model.node(&holder).expect("holder").geometry().rect;
    assert!(holder_rect.x > b_rect.right());
    assert_eq!(model.validate(), Ok(()));
}

#[test]
fn move_within_tabset_reorders() {
    let mut model = sized_model();
    let tabset = model.tabsets_in_window("main")[0].clone();
    for id in ["x", "y", "z"] {
        add_tab(&mut model, id, &tabset, DockLocation::Center);
    }
    let outcome = model.dispatch(Action::move_node("x", tabset.clone(), DockLocation::Center, Some(3), None));
    assert!(outcome.is_applied());
    let order: Vec<&str> = model
        .node(&tabset)
        .expect("tabset")
        .children()
        .iter()
        .map(NodeId::as_str)
        .collect();
    assert_eq!(order, vec!["y", "z", "x"]);
    assert_eq!(model.node(&tabset).and_then(|node| node.selected()), Some(2));
}

#[test]
fn nesting_order_puts_higher_priority_outermost() {
    assert_eq!(
        compute_nesting_order(&[(BorderLocation::Top, 10), (BorderLocation::Left, 5)]),
        vec![BorderLocation::Top, BorderLocation::Left]
    );

    let mut model = sized_model();
    let top = model.border_set().get(BorderLocation::Top).clone();
    let left = model.border_set().get(BorderLocation::Left).clone();
    let bottom = model.border_set().get(BorderLocation::Bottom).clone();
    for (border, priority) in [(&top, 10), (&bottom, 7), (&left, 5)] {
        assert!(
            model
                .dispatch(Action::update_node_attributes(border.clone(), json!({ "priority": priority })))
                .is_applied()
        );
    }
    for (border, tab) in [(&top, "output"), (&left, "files")] {
        assert!(
            model
                .dispatch(Action::add_node(
                    json!({ "id": tab }),
                    border.clone(),
                    DockLocation::Center,
                    None,
                    Some(true)
                ))
                .is_applied()
        );
    }

    let top_rect = model.node(&top).expect("top").geometry().rect;
    let left_rect = model.node(&left).expect("left").geometry().rect;
    let bottom_rect = model.node(&bottom).expect("bottom").geometry().rect;
    assert_eq!(top_rect.x, 0.0);
    assert_eq!(top_rect.width, 1000.0);
    assert_eq!(left_rect.y, top_rect.bottom());
    assert_eq!(left_rect.bottom(), bottom_rect.y);
}

#[test]
fn main_window_cannot_be_removed() {
    let mut model = sized_model();
    assert_eq!(
        model.dispatch(Action::close_window("main")),
        DispatchOutcome::Ignored(IgnoreReason::Rejected)
    );
    let tabset = model.tabsets_in_window("main")[0].clone();
    add_tab(&mut model, "only", &tabset, DockLocation::Center);
    assert!(model.dispatch(Action::delete_tabset(tabset)).is_applied());

    let root = model.root("main").expect("main root survives");
    assert_eq!(root.node_type(), NodeType::Row);
    let tabsets = model.tabsets_in_window("main");
    assert_eq!(tabsets.len(), 1, "main root is refilled with an empty tabset");
    assert!(model.node(&tabsets[0]).is_some_and(|node| node.children().is_empty()));
    assert_eq!(model.validate(), Ok(()));
}

#[test]
fn window_without_tabs_is_collected() {
    let mut model = sized_model();
    let tabset = model.tabsets_in_window("main")[0].clone();
    add_tab(&mut model, "keep", &tabset, DockLocation::Center);
    add_tab(&mut model, "float", &tabset, DockLocation::Center);
    assert!(
        model
            .dispatch(Action::float_tab("float", Rect::new(50.0, 50.0, 400.0, 300.0)))
            .is_applied()
    );
    let floating = model.window_of("float").expect("floating window");
    assert!(!floating.is_main());
    assert_eq!(model.windows().count(), 2);

    assert!(model.dispatch(Action::delete_tab("float")).is_applied());
    assert!(model.window(&floating).is_none());
    assert_eq!(model.windows().count(), 1);
    assert_eq!(model.validate(), Ok(()));
}

#[test]
fn moving_last_tab_home_collects_window() {
    let mut model = sized_model();
    let tabset = model.tabsets_in_window("main")[0].clone();
    add_tab(&mut model, "keep", &tabset, DockLocation::Center);
    add_tab(&mut model, "roam", &tabset, DockLocation::Center);
    assert!(
        model
            .dispatch(Action::popout_tab("roam", Rect::new(0.0, 0.0, 300.0, 300.0)))
            .is_applied()
    );
    let popout = model.window_of("roam").expect("popout");
    assert!(
        model
            .dispatch(Action::move_node("roam", tabset.clone(), DockLocation::Center, None, None))
            .is_applied()
    );
    assert!(model.window(&popout).is_none());
    assert_eq!(model.window_of("roam").map(|id| id.is_main()), Some(true));
}

#[test]
fn dock_tabset_returns_it_to_main() {
    let mut model = sized_model();
    let tabset = model.tabsets_in_window("main")[0].clone();
    add_tab(&mut model, "keep", &tabset, DockLocation::Center);
    add_tab(&mut model, "away", &tabset, DockLocation::Right);
    let away = parent_of(&model, "away");
    assert!(
        model
            .dispatch(Action::float_tabset(away.clone(), Rect::new(0.0, 0.0, 200.0, 200.0)))
            .is_applied()
    );
    assert_eq!(model.window_of(&away).map(|id| id.is_main()), Some(false));
    assert!(model.dispatch(Action::dock_tabset(away.clone())).is_applied());
    assert_eq!(model.window_of(&away).map(|id| id.is_main()), Some(true));
    assert_eq!(model.windows().count(), 1);
    let root = model.root("main").expect("root");
    assert_eq!(root.children().last(), Some(&away));
}

#[test]
fn stale_references_leave_model_untouched() {
    let mut model = sized_model();
    let before = model.to_json();
    let actions = [
        Action::delete_tab("ghost"),
        Action::select_tab("ghost"),
        Action::rename_tab("ghost", "x"),
        Action::close_window("nowhere"),
        Action::move_window("nowhere", Rect::new(0.0, 0.0, 1.0, 1.0)),
        Action::adjust_weights("ghost", vec![1.0]),
    ];
    for action in actions {
        let outcome = model.dispatch(action);
        assert!(matches!(
            outcome,
            DispatchOutcome::Ignored(IgnoreReason::StaleNode | IgnoreReason::StaleWindow)
        ));
    }
    assert_eq!(model.to_json(), before);
}

#[test]
fn type_mismatch_is_ignored() {
    let mut model = sized_model();
    let left = model.border_set().get(BorderLocation::Left).clone();
    assert_eq!(
        model.dispatch(Action::adjust_weights(left, vec![])),
        DispatchOutcome::Ignored(IgnoreReason::TypeMismatch)
    );
}

#[test]
fn undo_and_redo_are_reserved() {
    let mut model = sized_model();
    assert_eq!(
        model.dispatch(Action::undo()),
        DispatchOutcome::Ignored(IgnoreReason::Reserved)
    );
    assert_eq!(
        model.dispatch(Action::redo()),
        DispatchOutcome::Ignored(IgnoreReason::Reserved)
    );
}

#[test]
fn actions_replay_from_their_wire_form() {
    let mut direct = sized_model();
    let mut replayed = sized_model();
    let tabset = direct.tabsets_in_window("main")[0].clone();
    let actions = vec![
        Action::add_node(json!({ "id": "a" }), tabset.clone(), DockLocation::Center, None, None),
        Action::add_node(json!({ "id": "b" }), tabset.clone(), DockLocation::Bottom, None, None),
        Action::rename_tab("a", "Alpha"),
        Action::pin_tab("b", true),
    ];
    for action in actions {
        let wire = serde_json::to_string(&action).expect("serialize action");
        let decoded: Action = serde_json::from_str(&wire).expect("deserialize action");
        assert_eq!(decoded, action);
        assert!(direct.dispatch(action).is_applied());
        assert!(replayed.dispatch(decoded).is_applied());
    }
    assert_eq!(direct.to_json(), replayed.to_json());
}
