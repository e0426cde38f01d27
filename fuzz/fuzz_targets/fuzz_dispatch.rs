#![no_main]

use arbitrary::Arbitrary;
use flexdock_layout::{
    Action, BorderLocation, DockLocation, DockState, Model, NodeId, NodeType, Rect, TabSetMode,
    WindowKind,
};
use libfuzzer_sys::fuzz_target;
use serde_json::json;

#[derive(Debug, Arbitrary)]
enum Op {
    Add { target: u8, location: u8, index: Option<u8> },
    Move { drag: u8, target: u8, location: u8, index: Option<u8> },
    Delete { node: u8 },
    Select { node: u8 },
    Float { node: u8, popout: bool },
    Dock { node: u8 },
    Maximize { node: u8 },
    Weights { node: u8, weights: Vec<u16> },
    BorderSplit { border: u8, position: i16 },
    VisibleTabs { border: u8, indices: Vec<u8> },
    Pin { node: u8, pinned: bool },
    Flyout { border: u8, tab: u8, open: bool },
    DockState { border: u8, collapsed: bool },
    Mode { node: u8, stacked: bool },
    Window { index: u8, close: bool },
    Resize { width: u16, height: u16 },
    Drop { drag: u8, x: u16, y: u16 },
}

fn location(raw: u8) -> DockLocation {
    DockLocation::ALL[usize::from(raw) % DockLocation::ALL.len()]
}

fn pick(model: &Model, raw: u8, kinds: &[NodeType]) -> NodeId {
    let mut ids: Vec<NodeId> = model
        .nodes()
        .filter(|node| kinds.contains(&node.node_type()))
        .map(|node| node.id().clone())
        .collect();
    ids.sort();
    if ids.is_empty() {
        return NodeId::new("missing");
    }
    ids[usize::from(raw) % ids.len()].clone()
}

fn border(model: &Model, raw: u8) -> NodeId {
    let location = BorderLocation::ALL[usize::from(raw) % BorderLocation::ALL.len()];
    model.border_set().get(location).clone()
}

fn to_action(model: &Model, op: Op, step: usize) -> Option<Action> {
    let tab = |raw| pick(model, raw, &[NodeType::Tab]);
    let tabset = |raw| pick(model, raw, &[NodeType::TabSet]);
    let container = |raw| pick(model, raw, &[NodeType::TabSet, NodeType::Border, NodeType::Row]);
    let action = match op {
        Op::Add { target, location: at, index } => Action::add_node(
            json!({ "name": format!("tab {step}") }),
            container(target),
            location(at),
            index.map(usize::from),
            None,
        ),
        Op::Move { drag, target, location: at, index } => Action::move_node(
            pick(model, drag, &[NodeType::Tab, NodeType::TabSet]),
            container(target),
            location(at),
            index.map(usize::from),
            None,
        ),
        Op::Delete { node } => match node % 2 {
            0 => Action::delete_tab(tab(node)),
            _ => Action::delete_tabset(tabset(node)),
        },
        Op::Select { node } => Action::select_tab(tab(node)),
        Op::Float { node, popout } => {
            let rect = Rect::new(10.0, 10.0, 320.0, 240.0);
            if popout {
                Action::popout_tab(tab(node), rect)
            } else {
                Action::float_tabset(tabset(node), rect)
            }
        }
        Op::Dock { node } => match node % 2 {
            0 => Action::dock_tab(tab(node)),
            _ => Action::dock_tabset(tabset(node)),
        },
        Op::Maximize { node } => Action::maximize_toggle(tabset(node)),
        Op::Weights { node, weights } => Action::adjust_weights(
            pick(model, node, &[NodeType::Row]),
            weights.into_iter().map(f64::from).collect(),
        ),
        Op::BorderSplit { border: raw, position } => {
            Action::adjust_border_split(border(model, raw), f64::from(position))
        }
        Op::VisibleTabs { border: raw, indices } => Action::set_visible_tabs(
            border(model, raw),
            indices.into_iter().map(usize::from).collect(),
        ),
        Op::Pin { node, pinned } => match node % 2 {
            0 => Action::pin_tab(tab(node), pinned),
            _ => Action::pin_border(border(model, node), pinned),
        },
        Op::Flyout { border: raw, tab: which, open } => {
            if open {
                Action::open_flyout(border(model, raw), tab(which))
            } else {
                Action::close_flyout(border(model, raw))
            }
        }
        Op::DockState { border: raw, collapsed } => {
            let state = if collapsed { DockState::Collapsed } else { DockState::Expanded };
            Action::set_dock_state(border(model, raw), state)
        }
        Op::Mode { node, stacked } => {
            let mode = if stacked { TabSetMode::Stacked } else { TabSetMode::Tabbed };
            Action::set_tabset_mode(tabset(node), mode)
        }
        Op::Window { index, close } => {
            let windows: Vec<_> = model.windows().map(|window| window.id().clone()).collect();
            let window = windows.get(usize::from(index) % windows.len().max(1))?.clone();
            if close {
                Action::close_window(window)
            } else {
                Action::create_window(
                    json!({
                        "type": "row",
                        "children": [{ "type": "tabset", "children": [{ "type": "tab" }] }]
                    }),
                    Rect::new(0.0, 0.0, 200.0, 200.0),
                    WindowKind::Popout,
                )
            }
        }
        Op::Resize { width, height } => Action::move_window(
            "main",
            Rect::new(0.0, 0.0, f64::from(width), f64::from(height)),
        ),
        Op::Drop { drag, x, y } => {
            let drag = pick(model, drag, &[NodeType::Tab, NodeType::TabSet]);
            let info = model.find_drop_target(&drag, "main", f64::from(x), f64::from(y))?;
            info.into_action(drag)
        }
    };
    Some(action)
}

fuzz_target!(|ops: Vec<Op>| {
    let mut model = Model::new();
    let _ = model.dispatch(Action::move_window("main", Rect::new(0.0, 0.0, 1024.0, 768.0)));

    for (step, op) in ops.into_iter().take(256).enumerate() {
        let Some(action) = to_action(&model, op, step) else {
            continue;
        };
        let before = model.to_json();
        let outcome = model.dispatch(action);
        if !outcome.is_applied() {
            assert_eq!(model.to_json(), before, "ignored action mutated the model");
        }
        if let Err(violation) = model.validate() {
            panic!("step {step}: {violation}");
        }
    }

    let saved = model.to_json();
    let reloaded = Model::from_json(&saved).expect("saved document fails to reload");
    assert_eq!(reloaded.to_json(), saved, "save/load is not stable");
});
