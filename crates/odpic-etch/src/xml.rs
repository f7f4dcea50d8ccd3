//! Minimal element tree for docutils XML
//!
//! Sphinx's XML builder emits mixed content (`<paragraph>text <literal>x</literal>
//! tail</paragraph>`), so each element keeps the text before its first child
//! (`text`) and the text following its own end tag (`tail`). The tree is built
//! from `quick-xml` events.

use crate::diagnostics::EtchResult;
use indexmap::IndexMap;
use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;
use std::path::Path;

/// An XML element with ElementTree-style text and tail
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Element {
    /// Tag name
    pub tag: String,
    /// Attributes in document order
    pub attrs: IndexMap<String, String>,
    /// Text before the first child
    pub text: Option<String>,
    /// Child elements
    pub children: Vec<Element>,
    /// Text after this element's end tag, inside the parent
    pub tail: Option<String>,
}

impl Element {
    /// Create an empty element
    pub fn new(tag: impl Into<String>) -> Self {
        Self {
            tag: tag.into(),
            ..Default::default()
        }
    }

    fn from_start(start: &BytesStart<'_>) -> EtchResult<Self> {
        let mut element = Element::new(String::from_utf8_lossy(start.name().as_ref()));
        for attr in start.attributes() {
            let attr = attr.map_err(quick_xml::Error::from)?;
            let key = String::from_utf8_lossy(attr.key.as_ref()).into_owned();
            let value = attr.unescape_value()?.into_owned();
            element.attrs.insert(key, value);
        }
        Ok(element)
    }

    /// Attribute value
    pub fn attr(&self, name: &str) -> Option<&str> {
        self.attrs.get(name).map(String::as_str)
    }

    /// Whether the attribute is present, whatever its value
    pub fn has_attr(&self, name: &str) -> bool {
        self.attrs.contains_key(name)
    }

    /// Direct children with the given tag
    pub fn children_named<'a>(&'a self, tag: &'a str) -> impl Iterator<Item = &'a Element> + 'a {
        self.children.iter().filter(move |c| c.tag == tag)
    }

    /// First direct child with the given tag
    pub fn child(&self, tag: &str) -> Option<&Element> {
        self.children.iter().find(|c| c.tag == tag)
    }

    /// All descendants in document order, excluding `self`
    pub fn descendants(&self) -> Vec<&Element> {
        let mut out = Vec::new();
        self.collect_descendants(&mut out);
        out
    }

    fn collect_descendants<'a>(&'a self, out: &mut Vec<&'a Element>) {
        for child in &self.children {
            out.push(child);
            child.collect_descendants(out);
        }
    }

    /// Descendants with the given tag, in document order
    pub fn descendants_named(&self, tag: &str) -> Vec<&Element> {
        self.descendants()
            .into_iter()
            .filter(|e| e.tag == tag)
            .collect()
    }

    /// First descendant with the given tag
    pub fn find_descendant(&self, tag: &str) -> Option<&Element> {
        self.descendants().into_iter().find(|e| e.tag == tag)
    }

    /// Every `row` directly under a `tbody` anywhere below this element
    pub fn table_rows(&self) -> Vec<&Element> {
        self.descendants_named("tbody")
            .into_iter()
            .flat_map(|tbody| tbody.children_named("row"))
            .collect()
    }

    /// Text fragments in document order: own text, then each child's
    /// fragments followed by that child's tail. Excludes `self.tail`.
    pub fn text_parts(&self) -> Vec<&str> {
        let mut out = Vec::new();
        self.collect_text(&mut out);
        out
    }

    fn collect_text<'a>(&'a self, out: &mut Vec<&'a str>) {
        if let Some(text) = &self.text {
            out.push(text);
        }
        for child in &self.children {
            child.collect_text(out);
            if let Some(tail) = &child.tail {
                out.push(tail);
            }
        }
    }

    /// All text below this element concatenated
    pub fn text_content(&self) -> String {
        self.text_parts().concat()
    }
}

fn append_text(stack: &mut [Element], text: &str) {
    let Some(current) = stack.last_mut() else {
        // whitespace between the prolog and the root element
        return;
    };
    let slot = match current.children.last_mut() {
        Some(last) => &mut last.tail,
        None => &mut current.text,
    };
    slot.get_or_insert_with(String::new).push_str(text);
}

fn attach(stack: &mut [Element], root: &mut Option<Element>, element: Element) {
    match stack.last_mut() {
        Some(parent) => parent.children.push(element),
        None => {
            if root.is_none() {
                *root = Some(element);
            }
        }
    }
}

/// Parse an XML document into its root element.
///
/// Returns `Ok(None)` for a document without any element.
pub fn parse_str(xml: &str) -> EtchResult<Option<Element>> {
    let mut reader = Reader::from_str(xml);
    let mut stack: Vec<Element> = Vec::new();
    let mut root: Option<Element> = None;

    loop {
        match reader.read_event()? {
            Event::Start(start) => stack.push(Element::from_start(&start)?),
            Event::Empty(start) => {
                let element = Element::from_start(&start)?;
                attach(&mut stack, &mut root, element);
            }
            Event::End(_) => {
                if let Some(element) = stack.pop() {
                    attach(&mut stack, &mut root, element);
                }
            }
            Event::Text(text) => append_text(&mut stack, &text.unescape()?),
            Event::CData(data) => {
                append_text(&mut stack, &String::from_utf8_lossy(&data.into_inner()))
            }
            Event::Eof => break,
            // declarations, doctype, comments, processing instructions
            _ => {}
        }
    }

    Ok(root)
}

/// Read and parse an XML file.
pub fn parse_file(path: &Path) -> EtchResult<Option<Element>> {
    let xml = std::fs::read_to_string(path)?;
    parse_str(&xml)
}
