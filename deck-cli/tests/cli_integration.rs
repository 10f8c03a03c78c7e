//! CLI flows against files on disk.

use std::path::PathBuf;

use deck_cli::{load_presentation, play_through, run_export, ExportArgs};
use deck_core::{
    Animation, AnimationKind, Element, ElementKind, Presentation, ShapeContent, ShapeType, Slide,
    SlideLayout, TextContent, Transform,
};
use deck_renderer::ExportFormat;

fn sample() -> Presentation {
    let intro = Slide::new(SlideLayout::Cover)
        .with_id("intro")
        .with_titles("Launch plan", "Q4");
    let body = Slide::new(SlideLayout::Content)
        .with_id("body")
        .with_element(
            Element::new(ElementKind::Text(TextContent::plain("Always here", 24.0)))
                .with_id("static")
                .with_transform(Transform::at(40.0, 40.0, 400.0, 60.0)),
        )
        .with_element(
            Element::new(ElementKind::Shape(ShapeContent::filled(ShapeType::Rectangle, "#0ea5e9")))
                .with_id("second")
                .with_transform(Transform::at(40.0, 200.0, 200.0, 100.0))
                .with_animation(Animation::new(AnimationKind::FadeIn), Some(1)),
        )
        .with_element(
            Element::new(ElementKind::Text(TextContent::plain("First", 24.0)))
                .with_id("first")
                .with_transform(Transform::at(300.0, 200.0, 200.0, 60.0))
                .with_animation(Animation::new(AnimationKind::SlideUp), Some(0)),
        );
    Presentation::new("launch", "Launch")
        .with_slide(intro)
        .with_slide(body)
}

async fn write_sample(dir: &std::path::Path) -> PathBuf {
    let path = dir.join("launch.json");
    tokio::fs::write(&path, sample().to_json().expect("json"))
        .await
        .expect("write");
    path
}

fn export_args(input: PathBuf, out_dir: PathBuf, format: ExportFormat) -> ExportArgs {
    ExportArgs {
        input,
        format,
        out_dir,
        name: None,
        asset_dir: None,
        width: 192,
        height: 108,
        dpi: 96.0,
        report: None,
    }
}

#[tokio::test]
async fn test_export_pptx_to_directory() {
    let dir = tempfile::tempdir().expect("tempdir");
    let input = write_sample(dir.path()).await;
    let out = dir.path().join("out");

    let summary = run_export(&export_args(input, out.clone(), ExportFormat::Pptx))
        .await
        .expect("export");
    assert_eq!(summary.files, vec![out.join("launch.pptx")]);
    assert_eq!(summary.report.summary(), "exported 2/2 slides");

    let bytes = std::fs::read(&summary.files[0]).expect("read");
    assert!(bytes.starts_with(b"PK"));
}

#[tokio::test]
async fn test_export_png_names_files_per_slide() {
    let dir = tempfile::tempdir().expect("tempdir");
    let input = write_sample(dir.path()).await;
    let mut args = export_args(input, dir.path().to_path_buf(), ExportFormat::Png);
    args.name = Some("deck".to_string());
    args.report = Some(dir.path().join("report.json"));

    let summary = run_export(&args).await.expect("export");
    assert_eq!(
        summary.files,
        vec![
            dir.path().join("deck-slide-1.png"),
            dir.path().join("deck-slide-2.png")
        ]
    );

    let report = std::fs::read_to_string(dir.path().join("report.json")).expect("report");
    assert!(report.contains("\"exportedSlides\": 2"));
}

#[tokio::test]
async fn test_missing_input_is_an_error() {
    let dir = tempfile::tempdir().expect("tempdir");
    let err = load_presentation(&dir.path().join("nope.json"))
        .await
        .expect_err("missing file");
    assert!(err.to_string().contains("Failed to read"));
}

#[tokio::test]
async fn test_play_reveals_in_animation_order() {
    let dir = tempfile::tempdir().expect("tempdir");
    let input = write_sample(dir.path()).await;
    let presentation = load_presentation(&input).await.expect("load");

    let lines = play_through(presentation, 100);
    assert_eq!(
        lines,
        vec![
            "slide 1/2: 2 static, 0 to reveal",
            "slide 2/2: 1 static, 2 to reveal",
            "  reveal first",
            "  reveal second",
            "end",
        ]
    );
}
