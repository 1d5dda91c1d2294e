//! Lenient HTML fragment parser.
//!
//! Tokenizes with quick-xml configured for HTML input: end-tag names are not
//! checked, unmatched end tags are tolerated and void elements (`<br>`,
//! `<img>`) are closed implicitly. A stack of open elements rebuilds the tree,
//! so an end tag for an ancestor closes everything opened after it.

use std::borrow::Cow;
use std::io::BufRead;

use quick_xml::events::{BytesStart, Event};
use quick_xml::reader::Reader;

use crate::entities::{convert_html_entities, decode_reference};
use crate::error::DomError;
use crate::node::{Document, Element, Node, is_void_element};

/// Wrapper tag used to give the fragment a single root.
const ROOT_TAG: &str = "dv-root";

/// Parse an HTML fragment, failing on tokenizer errors.
pub fn parse(html: &str) -> Result<Document, DomError> {
    let mut builder = TreeBuilder::new();
    feed(html, &mut builder)?;
    Ok(builder.finish())
}

/// Parse an HTML fragment, keeping whatever was built before an error.
///
/// Never fails. Tokenizer errors are logged and every element still open at
/// that point is closed.
pub fn parse_lenient(html: &str) -> Document {
    let mut builder = TreeBuilder::new();
    if let Err(err) = feed(html, &mut builder) {
        tracing::warn!(error = %err, "Recovered from malformed HTML, keeping partial tree");
    }
    builder.finish()
}

/// Plain text of an HTML fragment.
///
/// Tags are removed and entities decoded, so `"<b>A &amp; B</b>"` becomes
/// `"A & B"`.
pub fn strip_tags(html: &str) -> String {
    if !html.contains(['<', '&']) {
        return html.to_owned();
    }
    parse_lenient(html).text_content()
}

fn feed(html: &str, builder: &mut TreeBuilder) -> Result<(), DomError> {
    let html = convert_html_entities(html);
    let wrapped = format!("<{ROOT_TAG}>{html}</{ROOT_TAG}>");

    let mut reader = Reader::from_str(&wrapped);
    let config = reader.config_mut();
    config.trim_text(false);
    config.check_end_names = false;
    config.allow_unmatched_ends = true;

    read_events(&mut reader, builder)
}

fn read_events<R: BufRead>(
    reader: &mut Reader<R>,
    builder: &mut TreeBuilder,
) -> Result<(), DomError> {
    let mut buf = Vec::new();
    loop {
        match reader.read_event_into(&mut buf)? {
            Event::Start(e) => {
                let element = decode_element(reader, &e);
                if element.is_void() {
                    builder.append(Node::Element(element));
                } else if element.tag != ROOT_TAG {
                    builder.open(element);
                }
            }
            Event::Empty(e) => {
                let element = decode_element(reader, &e);
                builder.append(Node::Element(element));
            }
            Event::End(e) => {
                let tag = decode_name(reader, e.name().as_ref());
                if !is_void_element(&tag) {
                    builder.close(&tag);
                }
            }
            Event::Text(e) => {
                let text = reader.decoder().decode(&e)?;
                builder.append_text(&text);
            }
            Event::GeneralRef(e) => {
                let entity = reader.decoder().decode(&e)?;
                builder.append_text(&decode_reference(&entity));
            }
            Event::CData(e) => {
                builder.append_text(&String::from_utf8_lossy(&e));
            }
            Event::Eof => return Ok(()),
            Event::Comment(_) | Event::Decl(_) | Event::PI(_) | Event::DocType(_) => {}
        }
        buf.clear();
    }
}

fn decode_element<R: BufRead>(reader: &Reader<R>, e: &BytesStart) -> Element {
    let mut element = Element::new(decode_name(reader, e.name().as_ref()));
    for attr in e.html_attributes().flatten() {
        let key = decode_name(reader, attr.key.as_ref());
        let value = attr.unescape_value().map_or_else(
            |_| String::from_utf8_lossy(&attr.value).into_owned(),
            Cow::into_owned,
        );
        element.attrs.insert(key, value);
    }
    element
}

fn decode_name<R: BufRead>(reader: &Reader<R>, name: &[u8]) -> String {
    let name = reader
        .decoder()
        .decode(name)
        .map_or_else(|_| String::from_utf8_lossy(name).into_owned(), Cow::into_owned);
    name.to_ascii_lowercase()
}

/// Stack of open elements; index 0 is the fragment root.
struct TreeBuilder {
    stack: Vec<Element>,
}

impl TreeBuilder {
    fn new() -> Self {
        Self {
            stack: vec![Element::new(ROOT_TAG)],
        }
    }

    fn current(&mut self) -> &mut Element {
        self.stack
            .last_mut()
            .expect("tree builder always holds the root")
    }

    fn append(&mut self, node: Node) {
        self.current().children.push(node);
    }

    /// Append text, merging with a preceding text node.
    fn append_text(&mut self, text: &str) {
        if text.is_empty() {
            return;
        }
        let current = self.current();
        if let Some(Node::Text(last)) = current.children.last_mut() {
            last.push_str(text);
        } else {
            current.children.push(Node::Text(text.to_owned()));
        }
    }

    fn open(&mut self, element: Element) {
        self.stack.push(element);
    }

    /// Close the innermost open element named `tag` and everything above it.
    ///
    /// End tags with no matching open element are ignored.
    fn close(&mut self, tag: &str) {
        let Some(pos) = self.stack.iter().rposition(|e| e.tag == tag) else {
            return;
        };
        if pos == 0 {
            return;
        }
        while self.stack.len() > pos {
            self.pop();
        }
    }

    fn pop(&mut self) {
        if let Some(element) = self.stack.pop() {
            self.append(Node::Element(element));
        }
    }

    fn finish(mut self) -> Document {
        while self.stack.len() > 1 {
            self.pop();
        }
        let root = self.stack.pop().unwrap_or_default();
        Document {
            children: root.children,
        }
    }
}
