#![no_main]

use flexdock_layout::{Action, Model, Rect};
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    let Ok(raw) = std::str::from_utf8(data) else {
        return;
    };
    // Malformed documents must fail cleanly; accepted ones must be valid.
    let Ok(mut model) = Model::from_json_str(raw) else {
        return;
    };
    model.validate().expect("loaded model violates an invariant");

    let saved = model.to_json();
    let reloaded = Model::from_json(&saved).expect("saved document fails to reload");
    assert_eq!(reloaded.to_json(), saved, "save/load is not stable");

    let _ = model.dispatch(Action::move_window("main", Rect::new(0.0, 0.0, 1024.0, 768.0)));
    model.validate().expect("resized model violates an invariant");
});
