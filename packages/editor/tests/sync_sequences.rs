//! Record → sync sequences through an [`EditSession`].

use loupe_editor::{
    EditError, EditSession, EditorConfig, ElementAddress, HeadingPreset, PreviewPort, TextEdit,
};
use pretty_assertions::assert_eq;

#[derive(Default)]
struct FakePreview {
    frames: Vec<(u64, String)>,
}

impl PreviewPort for FakePreview {
    fn push(&mut self, revision: u64, source: &str) {
        self.frames.push((revision, source.to_string()));
    }
}

fn session(source: &str) -> EditSession {
    EditSession::new(EditorConfig::default().with_source(source))
}

fn record_text(session: &mut EditSession, tag: &str, index: u32, text: &str) {
    session.record(TextEdit::new(ElementAddress::new(tag, index), text).into());
}

#[test]
fn test_single_text_sync() -> anyhow::Result<()> {
    let mut session = session("<p>Hello</p>");
    let mut preview = FakePreview::default();
    session.update_preview(&mut preview);

    record_text(&mut session, "p", 0, "Hi");
    let report = session.sync(&mut preview)?;

    assert_eq!(session.source(), "<p>Hi</p>");
    assert!(session.buffer().is_empty());
    assert_eq!(report.applied.len(), 1);
    assert_eq!(
        preview.frames,
        vec![(0, "<p>Hello</p>".to_string()), (1, "<p>Hi</p>".to_string())]
    );
    Ok(())
}

#[test]
fn test_two_paragraphs_in_place() -> anyhow::Result<()> {
    let mut session = session("<div><p>A</p><p>B</p></div>");
    let mut preview = FakePreview::default();

    record_text(&mut session, "p", 0, "X");
    record_text(&mut session, "p", 1, "Y");
    session.sync(&mut preview)?;

    assert_eq!(session.source(), "<div><p>X</p><p>Y</p></div>");
    Ok(())
}

#[test]
fn test_missing_element_is_reported_not_fatal() -> anyhow::Result<()> {
    let mut session = session("<div><span>a</span><p>b</p></div>");
    let mut preview = FakePreview::default();

    record_text(&mut session, "span", 3, "ghost");
    record_text(&mut session, "p", 0, "kept");
    let report = session.sync(&mut preview)?;

    assert_eq!(session.source(), "<div><span>a</span><p>kept</p></div>");
    assert_eq!(report.skipped.len(), 1);
    assert_eq!(
        report.skipped[0].error,
        EditError::NotFound(ElementAddress::new("span", 3))
    );
    Ok(())
}

#[test]
fn test_double_record_keeps_second_text() -> anyhow::Result<()> {
    let mut session = session("<p>Hello</p>");
    let mut preview = FakePreview::default();

    record_text(&mut session, "p", 0, "first");
    record_text(&mut session, "p", 0, "second");
    assert_eq!(session.buffer().len(), 1);

    session.sync(&mut preview)?;
    assert_eq!(session.source(), "<p>second</p>");
    Ok(())
}

#[test]
fn test_heading_next_to_text_edit() -> anyhow::Result<()> {
    let mut session = session("<article><p>Intro</p><p>Body</p></article>");
    let mut preview = FakePreview::default();

    session.select(ElementAddress::new("p", 0))?;
    session.controls_mut().bold = true;
    session.apply_heading(HeadingPreset::H1)?;
    record_text(&mut session, "p", 1, "Body text");

    let report = session.sync(&mut preview)?;
    assert!(report.skipped.is_empty());
    assert_eq!(
        session.source(),
        r##"<article><h1 style={{ backgroundColor: "#ffffff", color: "#000000", fontSize: "32px", fontWeight: "bold" }}>Intro</h1><p>Body text</p></article>"##
    );
    Ok(())
}

#[test]
fn test_later_edit_at_same_address_wins() -> anyhow::Result<()> {
    let mut session = session("<p>Intro</p>");
    let mut preview = FakePreview::default();

    session.select(ElementAddress::new("p", 0))?;
    session.apply_heading(HeadingPreset::H2)?;
    record_text(&mut session, "p", 0, "Welcome");
    assert_eq!(session.buffer().len(), 1);

    session.sync(&mut preview)?;
    assert_eq!(session.source(), "<p>Welcome</p>");
    Ok(())
}

#[test]
fn test_push_on_sync_can_be_disabled() -> anyhow::Result<()> {
    let config = EditorConfig::from_json(r#"{"initialSource":"<p>a</p>","pushOnSync":false}"#)?;
    let mut session = EditSession::new(config);
    let mut preview = FakePreview::default();

    record_text(&mut session, "p", 0, "b");
    let report = session.sync(&mut preview)?;
    assert!(!report.pushed);
    assert!(preview.frames.is_empty());
    assert_eq!(session.source(), "<p>b</p>");
    Ok(())
}

#[test]
fn test_source_replaced_by_user() {
    let mut session = session("<p>a</p>");
    session.select(ElementAddress::new("p", 0)).unwrap();
    session.set_source("<div><p>a</p></div>");

    assert_eq!(session.revision(), 1);
    assert!(session.selection().is_none());
}
