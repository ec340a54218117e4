//! # Source Edit Engine
//!
//! Applies [`PendingEdit`]s to JSX source text. Every operation re-parses the
//! text it is given; edits become byte-range patches on the original text, so
//! formatting outside the edited ranges survives untouched.
//!
//! ## Batches
//!
//! The addresses in a batch were all produced by one render of one source
//! text. They are resolved against that text up front, and each element is
//! followed by the offset of its `<` through every applied patch. A rename
//! to `h2` therefore cannot make a later `h2[1]` edit land on a different
//! element.

use loupe_parser::{
    apply_patches, find_site, parse_sites, remap_offset, Dialect, ElementAddress, ElementSite,
    SourcePatch,
};
use tracing::{debug, warn};

use crate::edits::{PendingEdit, StyleEdit};
use crate::errors::EditError;

/// Characters that change meaning inside JSX text. Line breaks collapse
/// together with the whitespace around them.
const JSX_SIGNIFICANT: &[char] = &['{', '}', '<', '>', '&', '\n', '\r'];

/// An edit that could not be applied, with the reason.
#[derive(Debug, Clone, PartialEq)]
pub struct SkippedEdit {
    pub edit: PendingEdit,
    pub error: EditError,
}

/// Result of applying a batch in best-effort mode
#[derive(Debug, Clone, PartialEq)]
pub struct BatchOutcome {
    pub source: String,
    pub applied: Vec<PendingEdit>,
    pub skipped: Vec<SkippedEdit>,
}

impl BatchOutcome {
    pub fn is_clean(&self) -> bool {
        self.skipped.is_empty()
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct SourceEditEngine {
    dialect: Dialect,
}

impl SourceEditEngine {
    pub fn new(dialect: Dialect) -> Self {
        Self { dialect }
    }

    pub fn dialect(&self) -> Dialect {
        self.dialect
    }

    pub fn enumerate(&self, source: &str) -> Result<Vec<ElementAddress>, EditError> {
        Ok(loupe_parser::enumerate(source, self.dialect)?)
    }

    /// Text the element currently displays from its direct children
    pub fn text_content(&self, source: &str, address: &ElementAddress) -> Result<String, EditError> {
        let sites = parse_sites(source, self.dialect)?;
        find_site(&sites, address)
            .map(|site| site.text_content.clone())
            .ok_or_else(|| EditError::NotFound(address.clone()))
    }

    /// Apply one edit. On any error the caller's text is unchanged.
    pub fn apply_edit(&self, source: &str, edit: &PendingEdit) -> Result<String, EditError> {
        let sites = parse_sites(source, self.dialect)?;
        let site = find_site(&sites, edit.address())
            .ok_or_else(|| EditError::NotFound(edit.address().clone()))?;

        let patches = patches_for(site, source, edit)?;
        let output = apply_patches(source, &patches)?;
        parse_sites(&output, self.dialect)?;

        debug!(address = %edit.address(), kind = edit.kind(), patches = patches.len(), "applied edit");
        Ok(output)
    }

    /// Apply `edits` in order, skipping the ones that fail.
    ///
    /// Fails as a whole only when `source` itself does not parse.
    pub fn apply_batch(&self, source: &str, edits: &[PendingEdit]) -> Result<BatchOutcome, EditError> {
        let mut sites = parse_sites(source, self.dialect)?;

        let mut anchors: Vec<Option<usize>> = edits
            .iter()
            .map(|edit| find_site(&sites, edit.address()).map(|site| site.span.start))
            .collect();

        let mut text = source.to_string();
        let mut applied = Vec::new();
        let mut skipped = Vec::new();

        for (position, edit) in edits.iter().enumerate() {
            let site = anchors[position].and_then(|anchor| sites.iter().find(|site| site.span.start == anchor));
            let Some(site) = site else {
                skip(&mut skipped, edit, EditError::NotFound(edit.address().clone()));
                continue;
            };

            let patches = match patches_for(site, &text, edit) {
                Ok(patches) => patches,
                Err(err) => {
                    skip(&mut skipped, edit, err);
                    continue;
                }
            };

            let candidate = match apply_patches(&text, &patches) {
                Ok(candidate) => candidate,
                Err(err) => {
                    skip(&mut skipped, edit, err.into());
                    continue;
                }
            };

            match parse_sites(&candidate, self.dialect) {
                Ok(next_sites) => {
                    for anchor in anchors[position + 1..].iter_mut() {
                        *anchor = anchor.and_then(|offset| remap_offset(offset, &patches));
                    }
                    debug!(address = %edit.address(), kind = edit.kind(), "applied batch edit");
                    text = candidate;
                    sites = next_sites;
                    applied.push(edit.clone());
                }
                Err(err) => skip(&mut skipped, edit, err.into()),
            }
        }

        Ok(BatchOutcome {
            source: text,
            applied,
            skipped,
        })
    }
}

fn skip(skipped: &mut Vec<SkippedEdit>, edit: &PendingEdit, error: EditError) {
    warn!(address = %edit.address(), kind = edit.kind(), error = %error, "skipping edit");
    skipped.push(SkippedEdit {
        edit: edit.clone(),
        error,
    });
}

fn patches_for(site: &ElementSite, source: &str, edit: &PendingEdit) -> Result<Vec<SourcePatch>, EditError> {
    match edit {
        PendingEdit::Text(edit) => Ok(vec![text_patch(site, source, &edit.text)]),
        PendingEdit::Style(edit) => style_patches(site, edit),
    }
}

/// Text as it should appear between the tags
fn render_text(text: &str) -> String {
    if text.contains(JSX_SIGNIFICANT) {
        // JSON string escapes are valid JS string escapes
        let literal = serde_json::to_string(text).unwrap_or_else(|_| format!("{:?}", text));
        format!("{{{}}}", literal)
    } else {
        text.to_string()
    }
}

fn text_patch(site: &ElementSite, source: &str, text: &str) -> SourcePatch {
    let rendered = render_text(text);

    match site.children_range() {
        Some(children) => SourcePatch::replace(children.start, children.end, rendered),
        None => {
            // `<br />` becomes `<br>text</br>`
            let opening = site.opening.slice(source);
            let head = opening.strip_suffix("/>").unwrap_or(opening).trim_end();
            let tail_start = site.opening.start + head.len();
            SourcePatch::replace(
                tail_start,
                site.opening.end,
                format!(">{}</{}>", rendered, site.name),
            )
        }
    }
}

fn style_patches(site: &ElementSite, edit: &StyleEdit) -> Result<Vec<SourcePatch>, EditError> {
    let expression = edit.style_expression()?;
    let target = edit.validated_target()?;

    let mut patches = vec![match &site.style {
        Some(attribute) => match attribute.value {
            Some(value) => SourcePatch::replace(value.start, value.end, expression),
            None => SourcePatch::replace(
                attribute.span.start,
                attribute.span.end,
                format!("style={}", expression),
            ),
        },
        None => SourcePatch::insert(site.attribute_insert_at, format!(" style={}", expression)),
    }];

    if let Some(target) = target.filter(|target| *target != site.name) {
        patches.push(SourcePatch::replace(site.name_span.start, site.name_span.end, target.clone()));
        if let Some(closing_name) = site.closing_name {
            patches.push(SourcePatch::replace(closing_name.start, closing_name.end, target));
        }
    }

    Ok(patches)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::edits::{Color, TextEdit};
    use pretty_assertions::assert_eq;

    fn text(tag: &str, index: u32, value: &str) -> PendingEdit {
        TextEdit::new(ElementAddress::new(tag, index), value).into()
    }

    fn style(tag: &str, index: u32) -> StyleEdit {
        StyleEdit::new(
            ElementAddress::new(tag, index),
            Color::parse("#ffffff").unwrap(),
            Color::parse("#000000").unwrap(),
            16.0,
            false,
        )
    }

    #[test]
    fn test_text_edit_replaces_children() {
        let engine = SourceEditEngine::default();
        let output = engine.apply_edit("<p>Hello</p>", &text("p", 0, "Hi")).unwrap();
        assert_eq!(output, "<p>Hi</p>");
    }

    #[test]
    fn test_text_edit_escapes_jsx_characters() {
        let engine = SourceEditEngine::default();
        let output = engine.apply_edit("<p>Hello</p>", &text("p", 0, "a < b {c}")).unwrap();
        assert_eq!(output, r#"<p>{"a < b {c}"}</p>"#);
        assert_eq!(
            engine.text_content(&output, &ElementAddress::new("p", 0)).unwrap(),
            "a < b {c}"
        );
    }

    #[test]
    fn test_text_edit_expands_self_closing() {
        let engine = SourceEditEngine::default();
        let output = engine
            .apply_edit(r#"<div><span className="x" /></div>"#, &text("span", 0, "filled"))
            .unwrap();
        assert_eq!(output, r#"<div><span className="x">filled</span></div>"#);
    }

    #[test]
    fn test_style_edit_inserts_attribute() {
        let engine = SourceEditEngine::default();
        let output = engine
            .apply_edit(r#"<p className="lead">Hi</p>"#, &style("p", 0).into())
            .unwrap();
        assert_eq!(
            output,
            r##"<p className="lead" style={{ backgroundColor: "#ffffff", color: "#000000", fontSize: "16px", fontWeight: "normal" }}>Hi</p>"##
        );
    }

    #[test]
    fn test_style_edit_replaces_whole_value() {
        let engine = SourceEditEngine::default();
        let source = r#"<p style={{ margin: 4, color: "red" }}>Hi</p>"#;
        let output = engine.apply_edit(source, &style("p", 0).into()).unwrap();
        assert_eq!(
            output,
            r##"<p style={{ backgroundColor: "#ffffff", color: "#000000", fontSize: "16px", fontWeight: "normal" }}>Hi</p>"##
        );
        assert!(!output.contains("margin"));
    }

    #[test]
    fn test_style_edit_renames_both_tags() {
        let engine = SourceEditEngine::default();
        let output = engine
            .apply_edit("<div><p>Title</p></div>", &style("p", 0).with_target_tag("h2").into())
            .unwrap();
        assert!(output.starts_with("<div><h2 style={{"));
        assert!(output.ends_with(">Title</h2></div>"));
    }

    #[test]
    fn test_rename_target_is_case_insensitive() {
        let engine = SourceEditEngine::default();
        let output = engine
            .apply_edit("<div><p>Title</p></div>", &style("p", 0).with_target_tag("H2").into())
            .unwrap();
        assert!(output.starts_with("<div><h2 style={{"));
        assert!(output.ends_with(">Title</h2></div>"));
    }

    #[test]
    fn test_invalid_target_tag() {
        let engine = SourceEditEngine::default();
        let err = engine
            .apply_edit("<p>x</p>", &style("p", 0).with_target_tag("h1 onclick").into())
            .unwrap_err();
        assert_eq!(err, EditError::InvalidTag("h1 onclick".to_string()));
    }

    #[test]
    fn test_multiline_text_is_kept_exact() {
        let engine = SourceEditEngine::default();
        let output = engine.apply_edit("<p>Hello</p>", &text("p", 0, "line one\n  line two")).unwrap();
        assert_eq!(output, r#"<p>{"line one\n  line two"}</p>"#);
        assert_eq!(
            engine.text_content(&output, &ElementAddress::new("p", 0)).unwrap(),
            "line one\n  line two"
        );
    }

    #[test]
    fn test_unparsable_source_fails_batch() {
        let engine = SourceEditEngine::default();
        let err = engine.apply_batch("<p>Hello</div>", &[text("p", 0, "Hi")]).unwrap_err();
        assert!(err.parse_error().is_some());
    }

    #[test]
    fn test_parent_text_edit_removes_child_anchor() {
        let engine = SourceEditEngine::default();
        let outcome = engine
            .apply_batch(
                "<div><span>a</span></div>",
                &[text("div", 0, "flat"), text("span", 0, "lost")],
            )
            .unwrap();
        assert_eq!(outcome.source, "<div>flat</div>");
        assert_eq!(outcome.applied.len(), 1);
        assert_eq!(outcome.skipped.len(), 1);
        assert!(outcome.skipped[0].error.is_not_found());
    }

    #[test]
    fn test_render_text() {
        assert_eq!(render_text("plain words"), "plain words");
        assert_eq!(render_text("a & b"), r#"{"a & b"}"#);
        assert_eq!(render_text("say \"hi\" {x}"), r#"{"say \"hi\" {x}"}"#);
    }
}
