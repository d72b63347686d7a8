use robot_viewer::panel::{PanelInput, ParamPanel};
use winit::keyboard::KeyCode;

#[derive(Debug, Default)]
struct Knobs {
    a: f32,
    b: f32,
    changes: Vec<&'static str>,
}

fn knobs_panel(knobs: &Knobs) -> ParamPanel<Knobs> {
    let mut panel = ParamPanel::new("knobs");
    panel
        .add(knobs, "a", 0.0, 100.0, |k| k.a, |k, v| k.a = v)
        .expect("finite bounds")
        .on_change(|k: &mut Knobs| k.changes.push("a"));
    panel
        .add(knobs, "b", -1.0, 1.0, |k| k.b, |k, v| k.b = v)
        .expect("finite bounds")
        .on_change(|k: &mut Knobs| k.changes.push("b"));
    panel
}

#[test]
fn values_are_clamped_to_the_range() {
    let mut knobs = Knobs::default();
    let mut panel = knobs_panel(&knobs);
    assert!(panel.set_value(&mut knobs, 0, 250.0));
    assert_eq!(knobs.a, 100.0);
    assert!(panel.set_value(&mut knobs, 1, -3.0));
    assert_eq!(knobs.b, -1.0);
    assert_eq!(knobs.changes, vec!["a", "b"]);
}

#[test]
fn non_finite_input_is_ignored() {
    let mut knobs = Knobs {
        a: 5.0,
        ..Knobs::default()
    };
    let mut panel = knobs_panel(&knobs);
    assert!(!panel.set_value(&mut knobs, 0, f32::NAN));
    assert!(!panel.set_value(&mut knobs, 0, f32::INFINITY));
    assert_eq!(knobs.a, 5.0);
    assert!(knobs.changes.is_empty());
}

#[test]
fn unchanged_value_fires_nothing() {
    let mut knobs = Knobs::default();
    let mut panel = knobs_panel(&knobs);
    assert!(!panel.set_value(&mut knobs, 0, 0.0));
    assert!(panel.set_value(&mut knobs, 0, 1.0));
    assert!(!panel.set_value(&mut knobs, 0, 1.0));
    assert_eq!(knobs.changes, vec!["a"]);
}

#[test]
fn unknown_controllers_are_rejected() {
    let mut knobs = Knobs::default();
    let mut panel = knobs_panel(&knobs);
    assert!(!panel.set_by_name(&mut knobs, "c", 1.0));
    assert!(!panel.set_value(&mut knobs, 7, 1.0));
    assert_eq!(panel.index_of("b"), Some(1));
}

#[test]
fn reset_restores_initial_values() {
    let mut knobs = Knobs {
        a: 42.0,
        b: 0.5,
        ..Knobs::default()
    };
    let mut panel = knobs_panel(&knobs);
    panel.set_value(&mut knobs, 0, 10.0);
    knobs.changes.clear();

    assert_eq!(panel.reset(&mut knobs), 1);
    assert_eq!(knobs.a, 42.0);
    assert_eq!(knobs.b, 0.5);
    assert_eq!(knobs.changes, vec!["a"]);
    assert_eq!(panel.reset(&mut knobs), 0);
}

#[test]
fn focus_cycles_both_ways() {
    let knobs = Knobs::default();
    let mut panel = knobs_panel(&knobs);
    assert_eq!(panel.focused().map(|c| c.name()), Some("a"));
    panel.focus_next();
    assert_eq!(panel.focused().map(|c| c.name()), Some("b"));
    panel.focus_next();
    assert_eq!(panel.focus_index(), 0);
    panel.focus_prev();
    assert_eq!(panel.focused().map(|c| c.name()), Some("b"));
}

#[test]
fn keys_drive_the_focused_controller() {
    let mut knobs = Knobs::default();
    let mut panel = knobs_panel(&knobs);

    let up = PanelInput::from_key(KeyCode::ArrowUp, false).expect("mapped");
    assert!(panel.apply(&mut knobs, up));
    // step is (100 - 0) / 1000, ten steps per arrow
    assert!((knobs.a - 1.0).abs() < 1e-5);

    let page_down = PanelInput::from_key(KeyCode::PageDown, false).expect("mapped");
    assert!(panel.apply(&mut knobs, page_down));
    assert_eq!(knobs.a, 0.0);

    let tab = PanelInput::from_key(KeyCode::Tab, false).expect("mapped");
    assert!(!panel.apply(&mut knobs, tab));
    assert!(panel.apply(&mut knobs, PanelInput::Nudge(-10.0)));
    assert!((knobs.b + 0.02).abs() < 1e-6);

    let reset = PanelInput::from_key(KeyCode::KeyR, false).expect("mapped");
    assert!(panel.apply(&mut knobs, reset));
    assert_eq!(knobs.b, 0.0);
}

#[test]
fn explicit_step_overrides_the_default() {
    let mut knobs = Knobs::default();
    let mut panel = ParamPanel::new("stepped");
    panel
        .add(&knobs, "a", 0.0, 10.0, |k: &Knobs| k.a, |k, v| k.a = v)
        .expect("finite bounds")
        .with_step(0.5);
    assert!(panel.nudge(&mut knobs, 1.0));
    assert_eq!(knobs.a, 0.5);
}

#[test]
fn summary_marks_the_focused_value() {
    let knobs = Knobs {
        a: 12.0,
        ..Knobs::default()
    };
    let panel = knobs_panel(&knobs);
    assert_eq!(panel.summary(&knobs), "knobs: [a 12.0]  b 0.0");
}

#[test]
fn values_between_steps_are_kept() {
    let mut knobs = Knobs::default();
    let mut panel = knobs_panel(&knobs);
    // step is 0.1, the value is stored as given
    assert!(panel.set_value(&mut knobs, 0, 60.013));
    assert_eq!(knobs.a, 60.013);
}

#[test]
fn nan_bounds_never_reach_a_clamp() {
    let mut knobs = Knobs::default();
    let mut panel = knobs_panel(&knobs);
    assert!(
        panel
            .add(&knobs, "c", f32::NAN, 1.0, |k: &Knobs| k.a, |k, v| k.a = v)
            .is_none()
    );
    assert_eq!(panel.len(), 2);
    assert!(!panel.set_value(&mut knobs, 2, 0.5));
    assert!(knobs.changes.is_empty());
}
