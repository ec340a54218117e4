//! JSX parsing and element-site collection.
//!
//! The oxc arena lives only for the duration of [`parse_sites`]: the walk
//! copies out owned spans and text, then the tree is dropped. Callers never
//! hold a tree across edits.

use crate::address::{ElementAddress, OccurrenceCounter};
use crate::error::{ParseError, ParseResult};
use oxc_allocator::Allocator;
use oxc_ast::ast::{
    Expression, JSXAttributeItem, JSXAttributeName, JSXChild, JSXElement, JSXElementName,
};
use oxc_ast_visit::{walk, Visit};
use oxc_parser::Parser;
use oxc_span::{GetSpan, SourceType, Span};
use serde::{Deserialize, Serialize};

/// Source language flavour handed to the parser
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Dialect {
    #[default]
    Tsx,
    Jsx,
}

impl Dialect {
    pub fn source_type(self) -> SourceType {
        let base = SourceType::default().with_module(true).with_jsx(true);
        match self {
            Dialect::Tsx => base.with_typescript(true),
            Dialect::Jsx => base,
        }
    }
}

/// Half-open byte range into the parsed source
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ByteRange {
    pub start: usize,
    pub end: usize,
}

impl ByteRange {
    pub fn slice<'s>(&self, source: &'s str) -> &'s str {
        &source[self.start..self.end]
    }

    pub fn is_empty(&self) -> bool {
        self.start == self.end
    }
}

impl From<Span> for ByteRange {
    fn from(span: Span) -> Self {
        Self {
            start: span.start as usize,
            end: span.end as usize,
        }
    }
}

/// The `style` attribute of an opening tag
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AttributeSite {
    /// Whole attribute, `style={...}`
    pub span: ByteRange,
    /// Value only, `{...}` or `"..."`; `None` for a bare `style`
    pub value: Option<ByteRange>,
}

/// Owned record of one addressed element in one parse
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ElementSite {
    pub address: ElementAddress,
    /// Tag name exactly as written in the source
    pub name: String,
    pub span: ByteRange,
    pub opening: ByteRange,
    pub name_span: ByteRange,
    pub closing: Option<ByteRange>,
    pub closing_name: Option<ByteRange>,
    pub style: Option<AttributeSite>,
    /// Where a new attribute goes: after the last attribute, else after the name
    pub attribute_insert_at: usize,
    /// Direct text children (raw) and string-literal containers, concatenated
    pub text_content: String,
    pub has_element_children: bool,
}

impl ElementSite {
    pub fn is_self_closing(&self) -> bool {
        self.closing.is_none()
    }

    /// Bytes between the opening and closing tags
    pub fn children_range(&self) -> Option<ByteRange> {
        self.closing.map(|closing| ByteRange {
            start: self.opening.end,
            end: closing.start,
        })
    }

    /// No element children, so the preview may offer inline text editing
    pub fn is_leaf(&self) -> bool {
        !self.has_element_children
    }
}

/// Parse `source` and collect every addressed element in traversal order.
pub fn parse_sites(source: &str, dialect: Dialect) -> ParseResult<Vec<ElementSite>> {
    let allocator = Allocator::default();
    let ret = Parser::new(&allocator, source, dialect.source_type()).parse();

    if let Some(diagnostic) = ret.errors.first() {
        let offset = diagnostic
            .labels
            .as_ref()
            .and_then(|labels| labels.first())
            .map(|label| label.offset())
            .unwrap_or(0);
        return Err(ParseError::syntax(offset, diagnostic.to_string()));
    }
    if ret.panicked {
        return Err(ParseError::panicked(source.len()));
    }

    let mut collector = SiteCollector::new(source);
    collector.visit_program(&ret.program);

    tracing::debug!(elements = collector.sites.len(), "collected element sites");
    Ok(collector.sites)
}

/// Addresses of every element in traversal order
pub fn enumerate(source: &str, dialect: Dialect) -> ParseResult<Vec<ElementAddress>> {
    Ok(parse_sites(source, dialect)?
        .into_iter()
        .map(|site| site.address)
        .collect())
}

/// First site carrying `address`
pub fn find_site<'s>(sites: &'s [ElementSite], address: &ElementAddress) -> Option<&'s ElementSite> {
    sites.iter().find(|site| &site.address == address)
}

struct SiteCollector<'s> {
    source: &'s str,
    counter: OccurrenceCounter,
    sites: Vec<ElementSite>,
}

impl<'s> SiteCollector<'s> {
    fn new(source: &'s str) -> Self {
        Self {
            source,
            counter: OccurrenceCounter::new(),
            sites: Vec::new(),
        }
    }

    fn site_for(&mut self, element: &JSXElement<'_>, name: String) -> ElementSite {
        let opening = &element.opening_element;
        let name_span: ByteRange = opening.name.span().into();

        let mut style = None;
        for item in &opening.attributes {
            if let JSXAttributeItem::Attribute(attr) = item {
                let is_style = matches!(&attr.name, JSXAttributeName::Identifier(id) if id.name == "style");
                // React applies the last duplicate
                if is_style {
                    style = Some(AttributeSite {
                        span: attr.span.into(),
                        value: attr.value.as_ref().map(|value| value.span().into()),
                    });
                }
            }
        }

        let attribute_insert_at = opening
            .attributes
            .last()
            .map(|item| item.span().end as usize)
            .unwrap_or(name_span.end);

        let mut text_content = String::new();
        let mut has_element_children = false;
        for child in &element.children {
            match child {
                JSXChild::Text(text) => {
                    text_content.push_str(ByteRange::from(text.span).slice(self.source));
                }
                JSXChild::ExpressionContainer(container) => {
                    if let Some(Expression::StringLiteral(literal)) = container.expression.as_expression() {
                        text_content.push_str(literal.value.as_str());
                    }
                }
                JSXChild::Element(_) | JSXChild::Fragment(_) => has_element_children = true,
                JSXChild::Spread(_) => {}
            }
        }

        let closing = element.closing_element.as_ref();

        ElementSite {
            address: self.counter.next_address(&name),
            name,
            span: element.span.into(),
            opening: opening.span.into(),
            name_span,
            closing: closing.map(|c| c.span.into()),
            closing_name: closing.map(|c| c.name.span().into()),
            style,
            attribute_insert_at,
            text_content,
            has_element_children,
        }
    }
}

impl<'a, 's> Visit<'a> for SiteCollector<'s> {
    fn visit_jsx_element(&mut self, element: &JSXElement<'a>) {
        if let Some(name) = intrinsic_name(&element.opening_element.name) {
            let site = self.site_for(element, name);
            self.sites.push(site);
        }
        walk::walk_jsx_element(self, element);
    }
}

/// Name of an element that reaches the DOM as itself; `None` for components
fn intrinsic_name(name: &JSXElementName<'_>) -> Option<String> {
    match name {
        JSXElementName::Identifier(id) if !id.name.starts_with(|c: char| c.is_ascii_uppercase()) => {
            Some(id.name.to_string())
        }
        JSXElementName::NamespacedName(ns) => {
            Some(format!("{}:{}", ns.namespace.name, ns.name.name))
        }
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn addresses(source: &str) -> Vec<String> {
        enumerate(source, Dialect::Tsx)
            .unwrap()
            .iter()
            .map(|address| address.to_string())
            .collect()
    }

    #[test]
    fn test_preorder_document_order() {
        let source = r#"
            export default function App() {
                return (
                    <div>
                        <p>One</p>
                        <section><p>Two</p><span /></section>
                        <p>Three</p>
                    </div>
                );
            }
        "#;

        assert_eq!(
            addresses(source),
            vec!["div[0]", "p[0]", "section[0]", "p[1]", "span[0]", "p[2]"]
        );
    }

    #[test]
    fn test_components_and_fragments_not_counted() {
        let source = r#"
            const App = () => (
                <>
                    <Card><p>a</p></Card>
                    <ui.Button />
                    <p>b</p>
                </>
            );
        "#;

        assert_eq!(addresses(source), vec!["p[0]", "p[1]"]);
    }

    #[test]
    fn test_elements_inside_expressions_counted_in_order() {
        let source = r#"
            const List = ({ items, open }) => (
                <ul>
                    {open && <li>first</li>}
                    {items.map((item) => <li key={item}>{item}</li>)}
                </ul>
            );
        "#;

        assert_eq!(addresses(source), vec!["ul[0]", "li[0]", "li[1]"]);
    }

    #[test]
    fn test_site_spans() {
        let source = r#"const a = <p className="x" style={{ color: "red" }}>Hi</p>;"#;
        let sites = parse_sites(source, Dialect::Tsx).unwrap();
        let site = &sites[0];

        assert_eq!(site.name, "p");
        assert_eq!(site.span.slice(source), r#"<p className="x" style={{ color: "red" }}>Hi</p>"#);
        assert_eq!(site.name_span.slice(source), "p");
        assert_eq!(site.closing_name.unwrap().slice(source), "p");
        let style = site.style.as_ref().unwrap();
        assert_eq!(style.span.slice(source), r#"style={{ color: "red" }}"#);
        assert_eq!(style.value.unwrap().slice(source), r#"{{ color: "red" }}"#);
        assert_eq!(&source[site.attribute_insert_at - 1..site.attribute_insert_at], "}");
        assert_eq!(site.children_range().unwrap().slice(source), "Hi");
        assert_eq!(site.text_content, "Hi");
        assert!(site.is_leaf());
    }

    #[test]
    fn test_self_closing_site() {
        let source = "const a = <br />;";
        let sites = parse_sites(source, Dialect::Tsx).unwrap();
        assert!(sites[0].is_self_closing());
        assert!(sites[0].children_range().is_none());
        assert_eq!(sites[0].attribute_insert_at, sites[0].name_span.end);
    }

    #[test]
    fn test_text_content_reads_string_containers() {
        let source = r#"const a = <p>{"a < b"}</p>;"#;
        let sites = parse_sites(source, Dialect::Tsx).unwrap();
        assert_eq!(sites[0].text_content, "a < b");
    }

    #[test]
    fn test_duplicate_style_uses_last() {
        let source = r#"const a = <p style={{ margin: 0 }} id="x" style={{ padding: 4 }}>Hi</p>;"#;
        let sites = parse_sites(source, Dialect::Tsx).unwrap();
        let value = sites[0].style.as_ref().unwrap().value.unwrap();
        assert_eq!(value.slice(source), "{{ padding: 4 }}");
    }

    #[test]
    fn test_syntax_error() {
        let err = parse_sites("const a = <p>Hello</span>;", Dialect::Tsx).unwrap_err();
        assert!(matches!(err, ParseError::Syntax { .. }));
    }

    #[test]
    fn test_jsx_dialect_rejects_type_annotations() {
        let source = "const n: number = 1; const a = <p>{n}</p>;";
        assert!(parse_sites(source, Dialect::Tsx).is_ok());
        assert!(parse_sites(source, Dialect::Jsx).is_err());
    }
}
