//! Playback Integration Tests
//!
//! Covers staged reveals, slide navigation, and the tokio-driven auto-play
//! timers (run on a paused clock).

use std::time::Duration;

use deck_core::{
    Animation, AnimationKind, AutoPlayer, Element, ElementId, ElementKind, Playback,
    PlaybackConfig, Presentation, RevealInterval, Slide, SlideId, SlideLayout, Step, TextContent,
    Transform, Transition, TransitionKind,
};

fn text(id: &str) -> Element {
    Element::new(ElementKind::Text(TextContent::plain(id, 24.0)))
        .with_id(id)
        .with_transform(Transform::at(40.0, 40.0, 300.0, 50.0))
}

fn fade(id: &str, order: Option<u32>) -> Element {
    text(id).with_animation(Animation::new(AnimationKind::FadeIn), order)
}

fn deck(slides: Vec<Vec<Element>>) -> Presentation {
    let mut presentation = Presentation::new("deck", "Playback");
    for (i, elements) in slides.into_iter().enumerate() {
        let mut slide = Slide::new(SlideLayout::Blank).with_id(format!("slide-{i}"));
        slide.elements = elements;
        presentation.slides.push(slide);
    }
    presentation
}

fn ids(elements: &[Element]) -> Vec<String> {
    elements.iter().map(|e| e.id.to_string()).collect()
}

// ============================================================================
// Reveal sequencing
// ============================================================================

#[test]
fn test_explicit_orders_reveal_ascending() {
    let mut playback = Playback::new(deck(vec![vec![
        fade("A", Some(2)),
        fade("B", Some(0)),
        fade("C", Some(1)),
    ]]));

    let revealed: Vec<Step> = (0..3).map(|_| playback.advance()).collect();

    assert_eq!(
        revealed,
        vec![
            Step::Revealed(ElementId::from("B")),
            Step::Revealed(ElementId::from("C")),
            Step::Revealed(ElementId::from("A")),
        ]
    );
    assert_eq!(playback.advance(), Step::End);
}

#[test]
fn test_static_elements_visible_on_entry() {
    let mut none_anim = text("none-kind");
    none_anim.animation = Some(Animation::new(AnimationKind::None));
    let playback = Playback::new(deck(vec![vec![
        text("plain"),
        none_anim,
        fade("staged", None),
    ]]));

    assert_eq!(playback.revealed_count(), 0);
    assert_eq!(ids(&playback.visible_elements()), vec!["plain", "none-kind"]);
    assert!(!playback.is_visible(&ElementId::from("staged")));
}

#[test]
fn test_empty_cover_slide_shows_fallback() {
    let mut presentation = Presentation::new("deck", "Cover");
    presentation
        .slides
        .push(Slide::new(SlideLayout::Cover).with_titles("Launch Plan", "FY27"));
    let playback = Playback::new(presentation);

    let visible = playback.visible_elements();
    let texts: Vec<String> = visible
        .iter()
        .filter_map(|e| match &e.kind {
            ElementKind::Text(t) => Some(t.content.clone()),
            _ => None,
        })
        .collect();

    assert_eq!(texts, vec!["Launch Plan", "FY27"]);
}

#[test]
fn test_playback_is_isolated_from_later_edits() {
    let mut presentation = deck(vec![vec![text("a")]]);
    let playback = Playback::new(presentation.clone());

    presentation.slides[0].elements.clear();

    assert_eq!(playback.visible_elements().len(), 1);
}

// ============================================================================
// Auto-play timers
// ============================================================================

#[tokio::test(start_paused = true)]
async fn test_reveal_autoplay_stops_at_animated_count() {
    let player = AutoPlayer::new(
        Playback::new(deck(vec![
            vec![fade("a", Some(0)), fade("b", Some(1))],
            vec![text("next")],
        ])),
        PlaybackConfig::default(),
    )
    .expect("runtime");

    assert!(player.start_reveal(RevealInterval::OneSecond));
    assert!(!player.start_reveal(RevealInterval::OneSecond), "double start is a no-op");

    tokio::time::sleep(Duration::from_millis(1100)).await;
    assert_eq!(player.with_playback(Playback::revealed_count), 1);

    tokio::time::sleep(Duration::from_secs(5)).await;
    assert_eq!(player.with_playback(Playback::revealed_count), 2);
    assert_eq!(player.with_playback(Playback::current_slide_index), 0);
    assert!(!player.is_revealing());
}

#[tokio::test(start_paused = true)]
async fn test_manual_slide_change_cancels_reveal_autoplay() {
    let player = AutoPlayer::new(
        Playback::new(deck(vec![
            vec![text("static")],
            vec![fade("a", None), fade("b", None)],
        ])),
        PlaybackConfig::default(),
    )
    .expect("runtime");

    assert_eq!(player.advance(), Step::SlideChanged { from: 0, to: 1 });
    assert!(player.start_reveal(RevealInterval::TwoSeconds));
    assert_eq!(player.retreat(), Step::SlideChanged { from: 1, to: 0 });
    assert!(!player.is_revealing());

    tokio::time::sleep(Duration::from_secs(10)).await;
    assert_eq!(player.with_playback(Playback::current_slide_index), 0);
    assert_eq!(player.with_playback(Playback::revealed_count), 0);
}

#[tokio::test(start_paused = true)]
async fn test_slide_autoplay_stops_at_last_slide() {
    let player = AutoPlayer::new(
        Playback::new(deck(vec![vec![text("1")], vec![text("2")], vec![text("3")]])),
        PlaybackConfig::default(),
    )
    .expect("runtime");

    assert!(player.toggle_slides());
    assert!(player.is_playing_slides());

    tokio::time::sleep(Duration::from_millis(5100)).await;
    assert_eq!(player.with_playback(Playback::current_slide_index), 1);

    tokio::time::sleep(Duration::from_secs(30)).await;
    assert_eq!(player.with_playback(Playback::current_slide_index), 2);
    assert!(!player.is_playing_slides());
}

#[tokio::test(start_paused = true)]
async fn test_no_timer_fires_after_shutdown() {
    let mut presentation = deck(vec![vec![text("1")], vec![text("2")], vec![text("3")]]);
    presentation
        .transitions
        .insert(SlideId::new("slide-1"), Transition::new(TransitionKind::Fade));
    let player = AutoPlayer::new(Playback::new(presentation), PlaybackConfig::default())
        .expect("runtime");

    assert!(player.start_slides(Duration::from_secs(1)));
    tokio::time::sleep(Duration::from_millis(1100)).await;
    assert_eq!(player.with_playback(Playback::current_slide_index), 1);
    assert!(player.with_playback(|p| p.transition().is_some()));

    player.shutdown();
    tokio::time::sleep(Duration::from_secs(10)).await;

    assert_eq!(player.with_playback(Playback::current_slide_index), 1);
    assert!(
        player.with_playback(|p| p.transition().is_some()),
        "unmount timer was cancelled too"
    );
}

#[tokio::test(start_paused = true)]
async fn test_transition_unmounts_after_duration() {
    let mut presentation = deck(vec![vec![text("1")], vec![text("2")]]);
    presentation
        .transitions
        .insert(SlideId::new("slide-1"), Transition::new(TransitionKind::Zoom));
    let player = AutoPlayer::new(Playback::new(presentation), PlaybackConfig::default())
        .expect("runtime");

    player.next_slide();
    assert!(player.with_playback(|p| p.transition().is_some()));

    tokio::time::sleep(Duration::from_millis(600)).await;
    assert!(player.with_playback(|p| p.transition().is_none()));
}
