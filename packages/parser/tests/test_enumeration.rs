//! Addressing properties over realistic component sources

use loupe_parser::{enumerate, parse_sites, Dialect, ElementAddress};
use std::collections::HashSet;

const COUNTER: &str = r#"
export default function Component() {
  const [count, setCount] = React.useState(0)
  return (
    <div style={{fontFamily:'sans-serif', padding: 16}}>
      <h1 style={{margin: 0, marginBottom: 12}}>Hello Renderer 👋</h1>
      <p style={{margin: 0, marginBottom: 12}}>A basic React component preview with shareable link.</p>
      <button
        onClick={() => setCount(c => c + 1)}
        style={{
          padding: '8px 12px',
          borderRadius: 8,
          color: '#fff',
        }}
      >
        Clicked {count} times
      </button>
    </div>
  )
}
"#;

#[test]
fn test_addresses_are_unique() {
    let addresses = enumerate(COUNTER, Dialect::Tsx).unwrap();
    let unique: HashSet<&ElementAddress> = addresses.iter().collect();
    assert_eq!(unique.len(), addresses.len());
    assert_eq!(addresses.len(), 4);
}

#[test]
fn test_enumeration_is_deterministic() {
    let first = enumerate(COUNTER, Dialect::Tsx).unwrap();
    let second = enumerate(COUNTER, Dialect::Tsx).unwrap();
    assert_eq!(first, second);
}

#[test]
fn test_unicode_text_spans() {
    let sites = parse_sites(COUNTER, Dialect::Tsx).unwrap();
    let heading = sites
        .iter()
        .find(|site| site.address == ElementAddress::new("h1", 0))
        .unwrap();
    assert_eq!(heading.text_content, "Hello Renderer 👋");
}

#[test]
fn test_mixed_content_is_not_leaf() {
    let sites = parse_sites(COUNTER, Dialect::Tsx).unwrap();
    let root = &sites[0];
    assert_eq!(root.address, ElementAddress::new("div", 0));
    assert!(!root.is_leaf());

    let button = sites
        .iter()
        .find(|site| site.address.tag() == "button")
        .unwrap();
    assert!(button.is_leaf());
    assert!(button.text_content.contains("Clicked"));
}

#[test]
fn test_namespaced_elements_counted() {
    let source = "const a = <div><svg:rect /><p /></div>;";
    let addresses = enumerate(source, Dialect::Jsx).unwrap();
    assert_eq!(
        addresses,
        vec![
            ElementAddress::new("div", 0),
            ElementAddress::new("svg:rect", 0),
            ElementAddress::new("p", 0),
        ]
    );
}
