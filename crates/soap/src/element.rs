//! A small owned XML tree.
//!
//! SOAP payloads are tiny, so the codec reads the whole document into
//! [`Element`]s with namespaces already resolved and lets message types pick
//! their fields out of the tree.

use std::io::Write;

use quick_xml::Writer;
use quick_xml::events::{BytesEnd, BytesStart, BytesText, Event};
use quick_xml::name::{Namespace, ResolveResult};
use quick_xml::reader::NsReader;

use crate::error::{SoapError, SoapResult};

/// Prefix bound to payload namespaces when writing.
pub const PAYLOAD_PREFIX: &str = "ns2";

/// XML Schema instance namespace, home of the `nil` attribute.
pub const XSI_NS: &str = "http://www.w3.org/2001/XMLSchema-instance";

/// One XML element with its namespace URI resolved.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Element {
    /// Namespace URI, `None` for unqualified elements
    pub namespace: Option<String>,
    /// Local name (no prefix)
    pub name: String,
    /// Concatenated character data directly inside this element
    pub text: String,
    pub children: Vec<Element>,
    /// Set by `xsi:nil="true"`: the element stands for a null value
    pub nil: bool,
}

impl Element {
    /// Create an empty element in `namespace`
    pub fn new(namespace: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            namespace: Some(namespace.into()),
            name: name.into(),
            ..Self::default()
        }
    }

    /// Create an empty element with no namespace
    pub fn unqualified(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    pub fn with_text(mut self, text: impl Into<String>) -> Self {
        self.text = text.into();
        self
    }

    /// Mark this element as an explicit null
    pub fn nil(mut self) -> Self {
        self.nil = true;
        self
    }

    pub fn with_child(mut self, child: Element) -> Self {
        self.children.push(child);
        self
    }

    /// Append a child in this element's namespace carrying `text`.
    pub fn with_text_child(self, name: &str, text: impl Into<String>) -> Self {
        let child = Element {
            namespace: self.namespace.clone(),
            name: name.to_string(),
            text: text.into(),
            children: Vec::new(),
            nil: false,
        };
        self.with_child(child)
    }

    /// First child with the given local name.
    ///
    /// Matching ignores the namespace: request payloads are accepted whether
    /// their children are qualified or not.
    pub fn child(&self, name: &str) -> Option<&Element> {
        self.children.iter().find(|c| c.name == name)
    }

    /// Check both namespace URI and local name
    pub fn is(&self, namespace: &str, name: &str) -> bool {
        self.namespace.as_deref() == Some(namespace) && self.name == name
    }

    pub fn is_empty(&self) -> bool {
        self.text.is_empty() && self.children.is_empty()
    }

    /// Parse a complete document and return its root element.
    pub fn parse(xml: &str) -> SoapResult<Self> {
        let mut reader = NsReader::from_str(xml);
        reader.trim_text(true);

        let mut stack: Vec<Element> = Vec::new();
        let mut root: Option<Element> = None;

        loop {
            let (resolved, event) = reader.read_resolved_event()?;
            match event {
                Event::Start(start) => {
                    if root.is_some() {
                        return Err(SoapError::Malformed(
                            "content after the document element".into(),
                        ));
                    }
                    let mut element = open_element(resolved, &start)?;
                    element.nil = is_nil(&reader, &start)?;
                    stack.push(element);
                }
                Event::Empty(start) => {
                    if root.is_some() {
                        return Err(SoapError::Malformed(
                            "content after the document element".into(),
                        ));
                    }
                    let mut element = open_element(resolved, &start)?;
                    element.nil = is_nil(&reader, &start)?;
                    match stack.last_mut() {
                        Some(parent) => parent.children.push(element),
                        None => root = Some(element),
                    }
                }
                Event::End(_) => {
                    // Mismatched end tags are rejected by the reader itself.
                    let element = stack
                        .pop()
                        .ok_or_else(|| SoapError::Malformed("unbalanced end tag".into()))?;
                    match stack.last_mut() {
                        Some(parent) => parent.children.push(element),
                        None => root = Some(element),
                    }
                }
                Event::Text(text) => {
                    if let Some(current) = stack.last_mut() {
                        current.text.push_str(&text.unescape()?);
                    }
                }
                Event::CData(data) => {
                    if let Some(current) = stack.last_mut() {
                        let data = data.into_inner();
                        let data = std::str::from_utf8(&data)
                            .map_err(|e| SoapError::Malformed(e.to_string()))?;
                        current.text.push_str(data);
                    }
                }
                Event::Eof => break,
                // Declarations, comments, processing instructions, doctype
                _ => {}
            }
        }

        if !stack.is_empty() {
            return Err(SoapError::Malformed("unexpected end of document".into()));
        }
        root.ok_or_else(|| SoapError::Malformed("document has no root element".into()))
    }

    /// Write this element and its subtree.
    ///
    /// `scope` is the namespace currently bound to [`PAYLOAD_PREFIX`]; a new
    /// binding is declared whenever an element's namespace differs from it.
    pub fn write_to<W: Write>(
        &self,
        writer: &mut Writer<W>,
        scope: Option<&str>,
    ) -> SoapResult<()> {
        let qname = match &self.namespace {
            Some(_) => format!("{PAYLOAD_PREFIX}:{}", self.name),
            None => self.name.clone(),
        };

        let mut start = BytesStart::new(qname.clone());
        if let Some(namespace) = self.namespace.as_deref() {
            if scope != Some(namespace) {
                let attr = format!("xmlns:{PAYLOAD_PREFIX}");
                start.push_attribute((attr.as_str(), namespace));
            }
        }
        if self.nil {
            start.push_attribute(("xmlns:xsi", XSI_NS));
            start.push_attribute(("xsi:nil", "true"));
        }

        if self.is_empty() {
            writer.write_event(Event::Empty(start))?;
            return Ok(());
        }

        writer.write_event(Event::Start(start))?;
        if !self.text.is_empty() {
            writer.write_event(Event::Text(BytesText::new(&self.text)))?;
        }
        let inner_scope = self.namespace.as_deref().or(scope);
        for child in &self.children {
            child.write_to(writer, inner_scope)?;
        }
        writer.write_event(Event::End(BytesEnd::new(qname)))?;
        Ok(())
    }
}

fn open_element(resolved: ResolveResult<'_>, start: &BytesStart<'_>) -> SoapResult<Element> {
    let local = start.local_name();
    let name = std::str::from_utf8(local.as_ref())
        .map_err(|e| SoapError::Malformed(e.to_string()))?
        .to_string();

    let namespace = match resolved {
        ResolveResult::Bound(ns) => Some(
            std::str::from_utf8(ns.as_ref())
                .map_err(|e| SoapError::Malformed(e.to_string()))?
                .to_string(),
        ),
        ResolveResult::Unbound => None,
        ResolveResult::Unknown(prefix) => {
            return Err(SoapError::Malformed(format!(
                "undeclared namespace prefix '{}' on <{}>",
                String::from_utf8_lossy(&prefix),
                name
            )));
        }
    };

    Ok(Element {
        namespace,
        name,
        text: String::new(),
        children: Vec::new(),
        nil: false,
    })
}

/// Whether `start` carries `xsi:nil="true"` (or `"1"`).
fn is_nil<R>(reader: &NsReader<R>, start: &BytesStart<'_>) -> SoapResult<bool> {
    for attr in start.attributes() {
        let attr = attr.map_err(quick_xml::Error::from)?;
        let (namespace, local) = reader.resolve_attribute(attr.key);
        let in_xsi = matches!(
            namespace,
            ResolveResult::Bound(Namespace(uri)) if uri == XSI_NS.as_bytes()
        );
        if in_xsi && local.as_ref() == b"nil" {
            let value = attr.unescape_value()?;
            return Ok(matches!(value.trim(), "true" | "1"));
        }
    }
    Ok(false)
}

#[cfg(test)]
mod tests {
    use super::*;

    const NS: &str = "urn:example";

    fn render(element: &Element) -> String {
        let mut writer = Writer::new(Vec::new());
        element.write_to(&mut writer, None).unwrap();
        String::from_utf8(writer.into_inner()).unwrap()
    }

    #[test]
    fn parse_resolves_prefixed_namespaces() {
        let xml = r#"<a:root xmlns:a="urn:example"><a:leaf>hi</a:leaf></a:root>"#;
        let root = Element::parse(xml).unwrap();

        assert!(root.is(NS, "root"));
        let leaf = root.child("leaf").unwrap();
        assert_eq!(leaf.namespace.as_deref(), Some(NS));
        assert_eq!(leaf.text, "hi");
    }

    #[test]
    fn parse_resolves_default_namespace() {
        let root = Element::parse(r#"<root xmlns="urn:example"><leaf/></root>"#).unwrap();
        assert!(root.is(NS, "root"));
        assert!(root.child("leaf").unwrap().is(NS, "leaf"));
    }

    #[test]
    fn parse_unescapes_text_and_keeps_cdata() {
        let xml = "<r><a>Fast &amp; Furious</a><b><![CDATA[<raw>]]></b></r>";
        let root = Element::parse(xml).unwrap();
        assert_eq!(root.child("a").unwrap().text, "Fast & Furious");
        assert_eq!(root.child("b").unwrap().text, "<raw>");
    }

    #[test]
    fn parse_reads_xsi_nil() {
        let root = Element::parse(
            r#"<r xmlns:i="http://www.w3.org/2001/XMLSchema-instance">
                <a i:nil="true"/><b i:nil="1"></b><c i:nil="false"/><d nil="true"/>
            </r>"#,
        )
        .unwrap();

        assert!(root.child("a").unwrap().nil);
        assert!(root.child("b").unwrap().nil);
        assert!(!root.child("c").unwrap().nil);
        // Unqualified attributes are not xsi:nil.
        assert!(!root.child("d").unwrap().nil);
    }

    #[test]
    fn write_nil_element_declares_xsi() {
        let rendered = render(&Element::unqualified("name").nil());
        assert_eq!(
            rendered,
            r#"<name xmlns:xsi="http://www.w3.org/2001/XMLSchema-instance" xsi:nil="true"/>"#
        );
        assert!(Element::parse(&rendered).unwrap().nil);
    }

    #[test]
    fn parse_rejects_undeclared_prefix() {
        let err = Element::parse("<x:root/>").unwrap_err();
        assert!(matches!(err, SoapError::Malformed(_)));
    }

    #[test]
    fn parse_rejects_unclosed_document() {
        assert!(Element::parse("<root><child></child>").is_err());
    }

    #[test]
    fn parse_rejects_mismatched_tags() {
        assert!(matches!(Element::parse("<root></other>"), Err(SoapError::Xml(_))));
    }

    #[test]
    fn parse_rejects_second_root() {
        assert!(Element::parse("<a/><b/>").is_err());
    }

    #[test]
    fn write_declares_prefix_once() {
        let element = Element::new(NS, "outer").with_text_child("inner", "x");
        assert_eq!(
            render(&element),
            r#"<ns2:outer xmlns:ns2="urn:example"><ns2:inner>x</ns2:inner></ns2:outer>"#
        );
    }

    #[test]
    fn write_empty_element_self_closes() {
        assert_eq!(render(&Element::new(NS, "empty")), r#"<ns2:empty xmlns:ns2="urn:example"/>"#);
    }

    #[test]
    fn write_escapes_text() {
        let element = Element::unqualified("t").with_text("a < b & c");
        assert_eq!(render(&element), "<t>a &lt; b &amp; c</t>");
    }
}
