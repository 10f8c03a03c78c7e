//! Editing Session Integration Tests
//!
//! Exercises the canvas editing flow end to end:
//! - Marquee and click selection
//! - Multi-select drag broadcast
//! - Clipboard lifetime across deletions
//! - Z-order commands
//! - Zoom clamping

use deck_core::{
    EditorConfig, EditorSession, Element, ElementId, ElementKind, Presentation, Rect, ShapeContent, ShapeType,
    Slide, SlideLayout, TextContent, Transform,
};
use proptest::prelude::*;

/// Build a shape element at the given position.
fn shape(id: &str, x: f32, y: f32) -> Element {
    Element::new(ElementKind::Shape(ShapeContent::filled(
        ShapeType::Ellipse,
        "#10b981",
    )))
    .with_id(id)
    .with_transform(Transform::at(x, y, 20.0, 20.0))
}

/// Open a session on a single-slide deck.
fn session_with(elements: Vec<Element>) -> EditorSession {
    let mut slide = Slide::new(SlideLayout::Blank);
    slide.elements = elements;
    EditorSession::new(Presentation::new("deck", "Editing").with_slide(slide))
}

fn transform_of(session: &EditorSession, id: &str) -> Transform {
    session
        .current_slide()
        .and_then(|s| s.element(&ElementId::from(id)))
        .map(|e| e.transform)
        .expect("element exists")
}

// ============================================================================
// Selection
// ============================================================================

#[test]
fn test_marquee_from_origin_selects_only_overlapping_element() {
    let mut session = session_with(vec![shape("near", 50.0, 50.0), shape("far", 150.0, 150.0)]);

    session.marquee_select(Rect::from_corners(0.0, 0.0, 100.0, 100.0));

    assert_eq!(session.selection(), &[ElementId::from("near")]);
}

#[test]
fn test_marquee_skips_hidden_elements() {
    let mut hidden = shape("hidden", 10.0, 10.0);
    hidden.visible = false;
    let mut session = session_with(vec![hidden, shape("shown", 30.0, 30.0)]);

    session.marquee_select(Rect::canvas());

    assert_eq!(session.selection(), &[ElementId::from("shown")]);
}

#[test]
fn test_hiding_selected_element_deselects_it() {
    let mut session = session_with(vec![shape("a", 0.0, 0.0), shape("b", 40.0, 0.0)]);
    session.select_all();
    assert_eq!(session.selection().len(), 2);

    session.set_visible(&ElementId::from("a"), false);

    assert_eq!(session.selection(), &[ElementId::from("b")]);
}

// ============================================================================
// Clipboard
// ============================================================================

#[test]
fn test_paste_after_source_deleted_is_noop() {
    let mut session = session_with(vec![shape("source", 10.0, 10.0)]);
    session.select([ElementId::from("source")]);
    assert!(session.copy());

    session.delete_selected();
    let before = session.snapshot();

    assert!(session.paste().is_none());
    assert_eq!(session.snapshot(), before);
}

#[test]
fn test_paste_to_another_slide_survives_slide_switch() {
    let mut session = session_with(vec![shape("source", 10.0, 10.0)]);
    session.select([ElementId::from("source")]);
    session.copy();

    session.add_slide(SlideLayout::Blank);
    let pasted = session.paste().expect("paste onto new slide");

    assert_eq!(session.current_slide_index(), 1);
    assert_eq!(transform_of(&session, pasted.as_str()).x, 30.0);
}

// ============================================================================
// Z-order
// ============================================================================

#[test]
fn test_bring_to_front_twice_never_noop() {
    let mut session = session_with(vec![shape("a", 0.0, 0.0), shape("b", 0.0, 0.0)]);
    let a = ElementId::from("a");

    let z0 = transform_of(&session, "a").z_index;
    let z1 = session.bring_to_front(&a).expect("first");
    let z2 = session.bring_to_front(&a).expect("second");

    assert!(z1 > z0);
    assert!(z2 > z1);
}

#[test]
fn test_render_order_follows_z_then_position() {
    let mut session = session_with(vec![
        shape("lower-right", 100.0, 100.0),
        shape("upper-left", 0.0, 0.0),
        shape("middle", 50.0, 0.0),
    ]);
    session.send_to_back(&ElementId::from("middle"));

    let order: Vec<String> = session
        .current_slide()
        .expect("slide")
        .render_order()
        .iter()
        .map(|e| e.id.to_string())
        .collect();

    assert_eq!(order, vec!["middle", "upper-left", "lower-right"]);
}

// ============================================================================
// Viewport
// ============================================================================

#[test]
fn test_zoom_clamps_to_bounds() {
    let mut session = session_with(Vec::new());
    session.set_zoom(10);
    assert_eq!(session.viewport().zoom(), 25);
    session.set_zoom(500);
    assert_eq!(session.viewport().zoom(), 200);
}

#[test]
fn test_zoom_and_pan_leave_document_untouched() {
    let mut session = session_with(vec![shape("a", 12.0, 34.0)]);
    let before = session.snapshot();

    session.wheel_zoom(7);
    session.begin_pan(deck_core::PanModifier::Space);
    session.pan_by(300.0, -120.0);
    session.end_pan();
    session.fit_to_screen(1280.0, 720.0);

    assert_eq!(session.snapshot(), before);
    assert!(!session.is_dirty());
}

#[test]
fn test_fit_to_screen_uses_configured_margin() {
    let presentation =
        Presentation::new("deck", "Editing").with_slide(Slide::new(SlideLayout::Blank));
    let mut session = EditorSession::with_config(
        presentation,
        EditorConfig {
            fit_margin: 0.5,
            ..EditorConfig::default()
        },
    );
    session.fit_to_screen(1920.0, 1080.0);
    assert_eq!(session.viewport().zoom(), 50);

    let mut default = session_with(Vec::new());
    default.fit_to_screen(1920.0, 1080.0);
    assert_eq!(default.viewport().zoom(), 90);
}

// ============================================================================
// Undo
// ============================================================================

#[test]
fn test_text_edit_undo_redo() {
    let text = Element::new(ElementKind::Text(TextContent::plain("Draft", 24.0)))
        .with_id("title")
        .with_transform(Transform::at(60.0, 40.0, 400.0, 60.0));
    let mut session = session_with(vec![text]);
    let id = ElementId::from("title");

    session.update_element(&id, |e| {
        if let ElementKind::Text(t) = &mut e.kind {
            t.content = "Final".to_string();
        }
    });
    let content = |s: &EditorSession| match &s.current_slide().and_then(|sl| sl.element(&id)).map(|e| e.kind.clone()) {
        Some(ElementKind::Text(t)) => t.content.clone(),
        _ => String::new(),
    };
    assert_eq!(content(&session), "Final");
    assert!(session.undo());
    assert_eq!(content(&session), "Draft");
    assert!(session.redo());
    assert_eq!(content(&session), "Final");
}

// ============================================================================
// Properties
// ============================================================================

proptest! {
    #[test]
    fn prop_multi_select_drag_broadcasts_same_delta(
        positions in prop::collection::vec((0.0f32..900.0, 0.0f32..500.0), 2..8),
        pick in 2usize..8,
        dx in -200.0f32..200.0,
        dy in -200.0f32..200.0,
    ) {
        let elements: Vec<Element> = positions
            .iter()
            .enumerate()
            .map(|(i, (x, y))| shape(&format!("e{i}"), *x, *y))
            .collect();
        let mut session = session_with(elements);
        let count = pick.min(positions.len());
        let selected: Vec<ElementId> = (0..count).map(|i| ElementId::from(format!("e{i}"))).collect();
        session.select(selected.clone());

        let moved = session.drag_move(&selected[count - 1], dx, dy);

        let expected = if dx == 0.0 && dy == 0.0 { 0 } else { count };
        prop_assert_eq!(moved, expected);
        for (i, (x, y)) in positions.iter().enumerate() {
            let t = transform_of(&session, &format!("e{i}"));
            if i < count {
                prop_assert_eq!(t.x, x + dx);
                prop_assert_eq!(t.y, y + dy);
            } else {
                prop_assert_eq!((t.x, t.y), (*x, *y));
            }
        }
    }

    #[test]
    fn prop_single_select_drag_never_broadcasts(
        dx in -50.0f32..50.0,
        dy in -50.0f32..50.0,
    ) {
        let mut session = session_with(vec![shape("a", 100.0, 100.0), shape("b", 300.0, 300.0)]);
        session.select([ElementId::from("a")]);

        session.drag_move(&ElementId::from("a"), dx, dy);

        let b = transform_of(&session, "b");
        prop_assert_eq!((b.x, b.y), (300.0, 300.0));
    }

    #[test]
    fn prop_zoom_always_in_range(level in any::<i32>()) {
        let mut session = session_with(Vec::new());
        session.set_zoom(level);
        prop_assert!((25..=200).contains(&session.viewport().zoom()));
    }
}
