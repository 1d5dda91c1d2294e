//! Recursive tree walker.
//!
//! Converts a parsed fragment into [`RenderNode`]s. Elements are dispatched by
//! tag; paragraphs are checked for textual directives first and marker
//! `div`/`span` elements become alert, math or diagram blocks. Tags without a
//! handler are not dropped: their children are walked in place.

use std::ops::Range;

use dv_dom::{Document, Element, Node};
use dv_table::{ParseMode, parse_table_element};

use crate::alert::AlertKind;
use crate::diagram::DiagramLanguage;
use crate::directive::{ComponentMatcher, accordion_title, is_accordion_close, is_accordion_opener};
use crate::node::{InlineStyle, ListItem, RenderNode};

const ALERT_CLASS: &str = "custom-alert";
const MATH_CLASS: &str = "custom-math";
const DIAGRAM_CLASS: &str = "custom-diagram";

/// Walker settings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WalkerOptions {
    /// Language for code blocks without a language hint.
    pub default_code_language: String,
    /// Prefix of component-embed markers (`[<prefix>:<id>]`).
    pub component_prefix: String,
    /// Paragraph prefix opening an accordion.
    pub accordion_marker: String,
}

impl Default for WalkerOptions {
    fn default() -> Self {
        Self {
            default_code_language: "bash".to_owned(),
            component_prefix: "uic".to_owned(),
            accordion_marker: ":::accordion".to_owned(),
        }
    }
}

/// Converts sanitized HTML into render nodes.
#[derive(Debug, Clone)]
pub struct Walker {
    options: WalkerOptions,
    components: ComponentMatcher,
}

impl Default for Walker {
    fn default() -> Self {
        Self::new(WalkerOptions::default())
    }
}

impl Walker {
    #[must_use]
    pub fn new(options: WalkerOptions) -> Self {
        let components = ComponentMatcher::new(&options.component_prefix);
        Self {
            options,
            components,
        }
    }

    #[must_use]
    pub fn options(&self) -> &WalkerOptions {
        &self.options
    }

    /// Parse `html` and walk it.
    #[must_use]
    pub fn render(&self, html: &str) -> Vec<RenderNode> {
        self.render_document(&dv_dom::parse_lenient(html))
    }

    /// Walk an already parsed fragment.
    #[must_use]
    pub fn render_document(&self, document: &Document) -> Vec<RenderNode> {
        let mut out = Vec::new();
        self.walk_nodes(&document.children, None, &mut out);
        out
    }

    fn walk_nodes(&self, nodes: &[Node], parent: Option<&str>, out: &mut Vec<RenderNode>) {
        self.walk_range(nodes, 0..nodes.len(), parent, out);
    }

    fn walk_range(
        &self,
        nodes: &[Node],
        range: Range<usize>,
        parent: Option<&str>,
        out: &mut Vec<RenderNode>,
    ) {
        let mut index = range.start;
        while index < range.end {
            let key = child_key(parent, index);
            match &nodes[index] {
                Node::Text(text) => {
                    if !text.trim().is_empty() {
                        out.push(RenderNode::Text {
                            key,
                            text: text.clone(),
                        });
                    }
                }
                Node::Element(element) if element.tag == "p" => {
                    index = self.paragraph(element, nodes, index, range.end, parent, key, out);
                }
                Node::Element(element) => self.element(element, key, out),
            }
            index += 1;
        }
    }

    /// Handle a paragraph; returns the index of the last sibling consumed.
    #[allow(clippy::too_many_arguments)]
    fn paragraph(
        &self,
        element: &Element,
        siblings: &[Node],
        index: usize,
        end: usize,
        parent: Option<&str>,
        key: String,
        out: &mut Vec<RenderNode>,
    ) -> usize {
        let text = element.text_content();

        if let Some(title) = accordion_title(&text, &self.options.accordion_marker) {
            let (body_end, last) = self.accordion_extent(siblings, index + 1, end);
            let mut children = Vec::new();
            self.walk_range(siblings, index + 1..body_end, parent, &mut children);
            tracing::debug!(title, items = children.len(), "Accordion section");
            out.push(RenderNode::Accordion {
                key,
                title: title.to_owned(),
                children,
            });
            return last;
        }

        if let Some(id) = self.components.find(&text) {
            out.push(RenderNode::ComponentEmbed {
                key,
                id: id.to_owned(),
            });
            return index;
        }

        out.push(RenderNode::Paragraph {
            key,
            html: element.inner_html(),
        });
        index
    }

    /// Body range end and last consumed index for an accordion whose body
    /// starts at `start`.
    fn accordion_extent(&self, siblings: &[Node], start: usize, end: usize) -> (usize, usize) {
        for (offset, node) in siblings[start..end].iter().enumerate() {
            let position = start + offset;
            let text = node.text_content();
            if is_accordion_opener(&text, &self.options.accordion_marker) {
                return (position, position - 1);
            }
            let is_paragraph = node.as_element().is_some_and(|e| e.tag == "p");
            if is_paragraph && is_accordion_close(&text) {
                return (position, position);
            }
        }
        (end, end - 1)
    }

    fn element(&self, element: &Element, key: String, out: &mut Vec<RenderNode>) {
        if matches!(element.tag.as_str(), "div" | "span")
            && let Some(node) = self.marker_block(element, &key)
        {
            out.push(node);
            return;
        }

        let node = match element.tag.as_str() {
            "h1" | "h2" | "h3" | "h4" | "h5" | "h6" => heading(element, key),
            "ul" | "ol" => list(element, key),
            "a" => link(element, key),
            "img" => image(element, key),
            "blockquote" => RenderNode::Blockquote {
                key,
                html: element.inner_html(),
            },
            "table" => RenderNode::Table {
                key,
                markup: element.outer_html(),
                table: parse_table_element(element, ParseMode::Plain),
            },
            "hr" => RenderNode::Rule { key },
            "pre" => match self.code_block(element, key) {
                Some(node) => node,
                None => {
                    tracing::debug!("Skipping <pre> without <code>");
                    return;
                }
            },
            "code" => RenderNode::InlineCode {
                key,
                code: element.text_content(),
            },
            tag => match InlineStyle::from_tag(tag) {
                Some(style) => RenderNode::Inline {
                    key,
                    style,
                    html: element.inner_html(),
                },
                None => {
                    tracing::debug!(tag, "No handler for tag, walking children");
                    self.walk_nodes(&element.children, Some(&key), out);
                    return;
                }
            },
        };
        out.push(node);
    }

    /// Alert, math or diagram block for a marker element.
    fn marker_block(&self, element: &Element, key: &str) -> Option<RenderNode> {
        if element.has_class(ALERT_CLASS) {
            let value = element.attr("data-alert-type").unwrap_or_default();
            match AlertKind::parse(value) {
                Some(kind) => {
                    let mut children = Vec::new();
                    self.walk_nodes(&element.children, Some(key), &mut children);
                    return Some(RenderNode::Alert {
                        key: key.to_owned(),
                        kind,
                        children,
                    });
                }
                None => tracing::debug!(kind = value, "Unknown alert kind, walking children"),
            }
        }

        if element.has_class(MATH_CLASS)
            && let Some(formula) = element.non_empty_attr("data-formula")
        {
            return Some(RenderNode::Math {
                key: key.to_owned(),
                formula: formula.to_owned(),
                display: element.tag == "div",
            });
        }

        if element.has_class(DIAGRAM_CLASS)
            && let Some(source) = element.non_empty_attr("data-diagram")
        {
            let language = match element.non_empty_attr("data-diagram-type") {
                Some(name) => DiagramLanguage::parse(name),
                None => Some(DiagramLanguage::Mermaid),
            };
            match language {
                Some(language) => {
                    return Some(RenderNode::Diagram {
                        key: key.to_owned(),
                        language,
                        source: source.to_owned(),
                    });
                }
                None => tracing::debug!("Unknown diagram type, walking children"),
            }
        }

        None
    }

    /// Code block (or diagram fence) for a `<pre>` holding a `<code>`.
    fn code_block(&self, pre: &Element, key: String) -> Option<RenderNode> {
        let code = pre.find_first("code")?;
        let language = pre
            .non_empty_attr("data-lang")
            .or_else(|| pre.non_empty_attr("data-language"))
            .or_else(|| {
                code.classes()
                    .find_map(|class| class.strip_prefix("language-"))
                    .filter(|lang| !lang.is_empty())
            })
            .unwrap_or(self.options.default_code_language.as_str());
        let text = code.text_content().trim().to_owned();

        if let Some(diagram) = DiagramLanguage::from_fence(language) {
            return Some(RenderNode::Diagram {
                key,
                language: diagram,
                source: text,
            });
        }
        Some(RenderNode::CodeBlock {
            key,
            language: language.to_owned(),
            code: text,
        })
    }
}

/// Walk `html` with default options.
#[must_use]
pub fn render_html(html: &str) -> Vec<RenderNode> {
    Walker::default().render(html)
}

fn child_key(parent: Option<&str>, index: usize) -> String {
    match parent {
        Some(parent) => format!("{parent}-{index}"),
        None => index.to_string(),
    }
}

fn heading(element: &Element, key: String) -> RenderNode {
    let level = match element.tag.as_str() {
        "h1" => 1,
        "h2" => 2,
        "h3" => 3,
        "h4" => 4,
        "h5" => 5,
        _ => 6,
    };
    RenderNode::Heading {
        key,
        level,
        id: element.non_empty_attr("id").map(str::to_owned),
        html: element.inner_html(),
    }
}

fn list(element: &Element, key: String) -> RenderNode {
    let items = element.children_named("li").map(list_item).collect();
    RenderNode::List {
        key,
        ordered: element.tag == "ol",
        items,
    }
}

fn list_item(li: &Element) -> ListItem {
    let mut item = li.clone();
    let checked = take_leading_checkbox(&mut item.children);
    ListItem {
        html: item.inner_html().trim().to_owned(),
        checked,
    }
}

/// Remove a checkbox that is the first non-blank content of `children`,
/// looking into a leading `<p>` as loose task lists wrap items in one.
fn take_leading_checkbox(children: &mut Vec<Node>) -> Option<bool> {
    let index = children.iter().position(|node| match node {
        Node::Text(text) => !text.trim().is_empty(),
        Node::Element(_) => true,
    })?;

    let checked = match &children[index] {
        Node::Element(e) if is_checkbox(e) => Some(e.attr("checked").is_some()),
        _ => None,
    };
    if checked.is_some() {
        children.remove(index);
        return checked;
    }

    match &mut children[index] {
        Node::Element(e) if e.tag == "p" => take_leading_checkbox(&mut e.children),
        _ => None,
    }
}

fn is_checkbox(element: &Element) -> bool {
    element.tag == "input"
        && element
            .attr("type")
            .is_some_and(|t| t.eq_ignore_ascii_case("checkbox"))
}

fn link(element: &Element, key: String) -> RenderNode {
    let href = element.non_empty_attr("href").unwrap_or("#");
    RenderNode::Link {
        key,
        href: href.to_owned(),
        html: element.inner_html(),
        external: is_external(href),
    }
}

fn is_external(href: &str) -> bool {
    ["http://", "https://", "//", "mailto:"]
        .iter()
        .any(|prefix| href.starts_with(prefix))
}

fn image(element: &Element, key: String) -> RenderNode {
    RenderNode::Image {
        key,
        src: element.attr("src").unwrap_or_default().to_owned(),
        alt: element.non_empty_attr("alt").unwrap_or("Image").to_owned(),
        caption: element.non_empty_attr("title").map(str::to_owned),
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    fn text(key: &str, text: &str) -> RenderNode {
        RenderNode::Text {
            key: key.to_owned(),
            text: text.to_owned(),
        }
    }

    fn paragraph(key: &str, html: &str) -> RenderNode {
        RenderNode::Paragraph {
            key: key.to_owned(),
            html: html.to_owned(),
        }
    }

    #[test]
    fn test_paragraph_and_heading() {
        let nodes = render_html(r#"<h2 id="intro">A <code>b</code></h2><p>Hello <b>x</b></p>"#);
        assert_eq!(
            nodes,
            vec![
                RenderNode::Heading {
                    key: "0".to_owned(),
                    level: 2,
                    id: Some("intro".to_owned()),
                    html: "A <code>b</code>".to_owned(),
                },
                paragraph("1", "Hello <b>x</b>"),
            ]
        );
    }

    #[test]
    fn test_blank_text_skipped_but_counted() {
        let nodes = render_html("<p>a</p>\n<p>b</p>");
        assert_eq!(nodes, vec![paragraph("0", "a"), paragraph("2", "b")]);
    }

    #[test]
    fn test_unknown_tags_recurse() {
        let nodes = render_html("<section><span>hi</span><hr></section>");
        assert_eq!(
            nodes,
            vec![
                text("0-0-0", "hi"),
                RenderNode::Rule {
                    key: "0-1".to_owned()
                },
            ]
        );
    }

    #[test]
    fn test_text_kept_as_written() {
        let nodes = render_html("<div> spaced </div>");
        assert_eq!(nodes, vec![text("0-0", " spaced ")]);
    }

    #[test]
    fn test_component_embed_replaces_paragraph() {
        let nodes = render_html("<p>Try it: [uic:date-picker]</p><p>[uic:Bad]</p>");
        assert_eq!(
            nodes,
            vec![
                RenderNode::ComponentEmbed {
                    key: "0".to_owned(),
                    id: "date-picker".to_owned(),
                },
                paragraph("1", "[uic:Bad]"),
            ]
        );
    }

    #[test]
    fn test_custom_component_prefix() {
        let walker = Walker::new(WalkerOptions {
            component_prefix: "widget".to_owned(),
            ..WalkerOptions::default()
        });
        let nodes = walker.render("<p>[widget:chart]</p><p>[uic:chart]</p>");
        assert_eq!(nodes[0].kind(), "component_embed");
        assert_eq!(nodes[1], paragraph("1", "[uic:chart]"));
    }

    #[test]
    fn test_accordion_collects_until_close() {
        let nodes = render_html(
            "<p>:::accordion More</p><p>inside</p><hr><p>:::</p><p>after</p>",
        );
        assert_eq!(
            nodes,
            vec![
                RenderNode::Accordion {
                    key: "0".to_owned(),
                    title: "More".to_owned(),
                    children: vec![
                        paragraph("1", "inside"),
                        RenderNode::Rule { key: "2".to_owned() },
                    ],
                },
                paragraph("4", "after"),
            ]
        );
    }

    #[test]
    fn test_accordion_stops_at_next_opener() {
        let nodes = render_html("<p>:::accordion A</p><p>a</p><p>:::accordion B</p><p>b</p>");
        assert_eq!(
            nodes,
            vec![
                RenderNode::Accordion {
                    key: "0".to_owned(),
                    title: "A".to_owned(),
                    children: vec![paragraph("1", "a")],
                },
                RenderNode::Accordion {
                    key: "2".to_owned(),
                    title: "B".to_owned(),
                    children: vec![paragraph("3", "b")],
                },
            ]
        );
    }

    #[test]
    fn test_accordion_without_title_is_paragraph() {
        let nodes = render_html("<p>:::accordion</p><p>x</p>");
        assert_eq!(nodes, vec![paragraph("0", ":::accordion"), paragraph("1", "x")]);
    }

    #[test]
    fn test_accordion_inside_container() {
        let nodes = render_html("<div><p>:::accordion T</p><p>x</p></div>");
        assert_eq!(
            nodes,
            vec![RenderNode::Accordion {
                key: "0-0".to_owned(),
                title: "T".to_owned(),
                children: vec![paragraph("0-1", "x")],
            }]
        );
    }

    #[test]
    fn test_alert_walks_children() {
        let html = r#"<div class="custom-alert" data-alert-type="warning"><p>Careful</p></div>"#;
        assert_eq!(
            render_html(html),
            vec![RenderNode::Alert {
                key: "0".to_owned(),
                kind: AlertKind::Warning,
                children: vec![paragraph("0-0", "Careful")],
            }]
        );
    }

    #[test]
    fn test_unknown_alert_kind_recurses() {
        let html = r#"<div class="custom-alert" data-alert-type="danger"><p>x</p></div>"#;
        assert_eq!(render_html(html), vec![paragraph("0-0", "x")]);
    }

    #[test]
    fn test_math_modes() {
        let html = r#"<div class="custom-math" data-formula="E=mc^2"></div><p><span class="custom-math" data-formula="x"></span></p>"#;
        let nodes = render_html(html);
        assert_eq!(
            nodes[0],
            RenderNode::Math {
                key: "0".to_owned(),
                formula: "E=mc^2".to_owned(),
                display: true,
            }
        );
        // Inline math inside a paragraph stays part of the paragraph markup.
        assert_eq!(nodes[1].kind(), "paragraph");

        let inline = render_html(r#"<span class="custom-math" data-formula="x"></span>"#);
        assert_eq!(
            inline,
            vec![RenderNode::Math {
                key: "0".to_owned(),
                formula: "x".to_owned(),
                display: false,
            }]
        );
    }

    #[test]
    fn test_diagram_marker() {
        let html = r#"<div class="custom-diagram" data-diagram="graph TD"></div><div class="custom-diagram" data-diagram="@startuml" data-diagram-type="kroki-plantuml"></div>"#;
        assert_eq!(
            render_html(html),
            vec![
                RenderNode::Diagram {
                    key: "0".to_owned(),
                    language: DiagramLanguage::Mermaid,
                    source: "graph TD".to_owned(),
                },
                RenderNode::Diagram {
                    key: "1".to_owned(),
                    language: DiagramLanguage::PlantUml,
                    source: "@startuml".to_owned(),
                },
            ]
        );
    }

    #[test]
    fn test_code_block_language_fallbacks() {
        let nodes = render_html(
            "<pre data-lang=\"rust\"><code class=\"language-js\">  fn main() {}\n</code></pre>\
             <pre><code class=\"language-python\">print(1)</code></pre>\
             <pre><code>ls -la</code></pre>",
        );
        let languages: Vec<_> = nodes
            .iter()
            .map(|node| match node {
                RenderNode::CodeBlock { language, code, .. } => (language.as_str(), code.as_str()),
                other => panic!("unexpected node {other:?}"),
            })
            .collect();
        assert_eq!(
            languages,
            vec![("rust", "fn main() {}"), ("python", "print(1)"), ("bash", "ls -la")]
        );
    }

    #[test]
    fn test_pre_without_code_renders_nothing() {
        assert!(render_html("<pre>plain</pre>").is_empty());
    }

    #[test]
    fn test_mermaid_fence_becomes_diagram() {
        let nodes = render_html(
            "<pre><code class=\"language-mermaid\">graph TD\nA --&gt; B\n</code></pre>",
        );
        assert_eq!(
            nodes,
            vec![RenderNode::Diagram {
                key: "0".to_owned(),
                language: DiagramLanguage::Mermaid,
                source: "graph TD\nA --> B".to_owned(),
            }]
        );
    }

    #[test]
    fn test_inline_code_and_styles() {
        let nodes = render_html("<code>x &lt; y</code><em>soft</em><del>gone</del>");
        assert_eq!(
            nodes,
            vec![
                RenderNode::InlineCode {
                    key: "0".to_owned(),
                    code: "x < y".to_owned(),
                },
                RenderNode::Inline {
                    key: "1".to_owned(),
                    style: InlineStyle::Emphasis,
                    html: "soft".to_owned(),
                },
                RenderNode::Inline {
                    key: "2".to_owned(),
                    style: InlineStyle::Strikethrough,
                    html: "gone".to_owned(),
                },
            ]
        );
    }

    #[test]
    fn test_task_list() {
        let nodes = render_html(
            r#"<ul><li><input type="checkbox" checked disabled> Done</li><li><input type="checkbox" disabled> Todo</li><li>Plain</li></ul>"#,
        );
        assert_eq!(
            nodes,
            vec![RenderNode::List {
                key: "0".to_owned(),
                ordered: false,
                items: vec![
                    ListItem {
                        html: "Done".to_owned(),
                        checked: Some(true),
                    },
                    ListItem {
                        html: "Todo".to_owned(),
                        checked: Some(false),
                    },
                    ListItem {
                        html: "Plain".to_owned(),
                        checked: None,
                    },
                ],
            }]
        );
    }

    #[test]
    fn test_loose_task_item() {
        let nodes = render_html(r#"<ol><li><p><input type="checkbox"> Step</p></li></ol>"#);
        let RenderNode::List { ordered, items, .. } = &nodes[0] else {
            panic!("expected list");
        };
        assert!(*ordered);
        assert_eq!(items[0].checked, Some(false));
        assert_eq!(items[0].html, "<p> Step</p>");
    }

    #[test]
    fn test_links() {
        let nodes = render_html(
            r#"<a href="https://x.io">X <b>y</b></a><a href="/docs">in</a><a>none</a>"#,
        );
        let links: Vec<_> = nodes
            .iter()
            .map(|node| match node {
                RenderNode::Link { href, external, .. } => (href.as_str(), *external),
                other => panic!("unexpected node {other:?}"),
            })
            .collect();
        assert_eq!(links, vec![("https://x.io", true), ("/docs", false), ("#", false)]);
    }

    #[test]
    fn test_images() {
        let nodes = render_html(r#"<img src="a.png" title="Caption"><img alt="Logo" src="b.png">"#);
        assert_eq!(
            nodes,
            vec![
                RenderNode::Image {
                    key: "0".to_owned(),
                    src: "a.png".to_owned(),
                    alt: "Image".to_owned(),
                    caption: Some("Caption".to_owned()),
                },
                RenderNode::Image {
                    key: "1".to_owned(),
                    src: "b.png".to_owned(),
                    alt: "Logo".to_owned(),
                    caption: None,
                },
            ]
        );
    }

    #[test]
    fn test_table_is_parsed() {
        let html = "<table><thead><tr><th>Name</th></tr></thead><tbody><tr><td>Ann</td></tr></tbody></table>";
        let nodes = render_html(html);
        let RenderNode::Table { markup, table, .. } = &nodes[0] else {
            panic!("expected table");
        };
        assert_eq!(markup, html);
        assert_eq!(table.value(0, "Name"), Some("Ann"));
    }

    #[test]
    fn test_malformed_table_is_empty_model() {
        let nodes = render_html("<table><tr><td>x</td></tr></table>");
        let RenderNode::Table { table, .. } = &nodes[0] else {
            panic!("expected table");
        };
        assert!(table.is_empty());
    }

    #[test]
    fn test_blockquote() {
        let nodes = render_html("<blockquote><p>q</p></blockquote>");
        assert_eq!(
            nodes,
            vec![RenderNode::Blockquote {
                key: "0".to_owned(),
                html: "<p>q</p>".to_owned(),
            }]
        );
    }

    #[test]
    fn test_malformed_input_is_total() {
        let nodes = render_html("<div><p>unclosed");
        assert_eq!(nodes, vec![paragraph("0-0", "unclosed")]);
        assert!(render_html("").is_empty());
    }

    #[test]
    fn test_render_is_deterministic() {
        let html = "<h1>T</h1><div><p>:::accordion A</p><p>[uic:x]</p></div><ul><li>i</li></ul>";
        assert_eq!(render_html(html), render_html(html));
    }
}
