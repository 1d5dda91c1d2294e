//! Extraction of [`ParsedTable`] from `<table>` markup.
//!
//! Headers come from `thead th` in document order, rows from `tbody tr`. Each
//! row's `td` children map positionally onto the header texts. A table without
//! `thead` or `tbody` yields the empty model.

use dv_dom::{Document, Element, parse_lenient};

use crate::model::{Alignment, Header, ParseMode, ParsedTable, Record};

/// Parse the first `<table>` found in `markup`.
#[must_use]
pub fn parse_table(markup: &str, mode: ParseMode) -> ParsedTable {
    let document = parse_lenient(markup);
    match document.find_first("table") {
        Some(table) => parse_table_element(table, mode),
        None => {
            tracing::debug!("No <table> element in markup");
            ParsedTable::empty(mode)
        }
    }
}

/// Every `<table>` in `markup`, in document order.
#[must_use]
pub fn parse_tables(markup: &str, mode: ParseMode) -> Vec<ParsedTable> {
    let document = parse_lenient(markup);
    table_elements(&document)
        .into_iter()
        .map(|table| parse_table_element(table, mode))
        .collect()
}

/// Serialized markup of every `<table>` in `markup`, in document order.
#[must_use]
pub fn extract_tables(markup: &str) -> Vec<String> {
    let document = parse_lenient(markup);
    table_elements(&document)
        .into_iter()
        .map(Element::outer_html)
        .collect()
}

fn table_elements(document: &Document) -> Vec<&Element> {
    document
        .children
        .iter()
        .filter_map(dv_dom::Node::as_element)
        .flat_map(|element| {
            if element.tag == "table" {
                vec![element]
            } else {
                element.find_all("table")
            }
        })
        .collect()
}

/// Parse an already located `<table>` element.
#[must_use]
pub fn parse_table_element(table: &Element, mode: ParseMode) -> ParsedTable {
    let (Some(thead), Some(tbody)) = (table.find_first("thead"), table.find_first("tbody")) else {
        tracing::debug!("Table without thead/tbody, using empty model");
        return ParsedTable::empty(mode);
    };

    let headers: Vec<Header> = thead
        .find_all("th")
        .into_iter()
        .enumerate()
        .map(|(index, th)| Header {
            text: th.text_content().trim().to_owned(),
            index,
            alignment: cell_alignment(th),
        })
        .collect();

    log_duplicates(&headers);

    let rows = tbody
        .find_all("tr")
        .into_iter()
        .map(|tr| {
            let mut record = Record::new();
            for (header, td) in headers.iter().zip(tr.children_named("td")) {
                record.insert(header.text.clone(), cell_value(td, mode));
            }
            record
        })
        .collect();

    ParsedTable::new(headers, rows, mode)
}

fn cell_value(td: &Element, mode: ParseMode) -> String {
    match mode {
        ParseMode::Plain => td.text_content().trim().to_owned(),
        ParseMode::Rich => td.inner_html().trim().to_owned(),
    }
}

/// Alignment from the `align` attribute, else an inline `text-align`.
fn cell_alignment(cell: &Element) -> Alignment {
    if let Some(alignment) = cell.attr("align").and_then(Alignment::parse) {
        return alignment;
    }
    cell.attr("style")
        .and_then(style_text_align)
        .unwrap_or_default()
}

fn style_text_align(style: &str) -> Option<Alignment> {
    style.split(';').find_map(|declaration| {
        let (property, value) = declaration.split_once(':')?;
        if property.trim().eq_ignore_ascii_case("text-align") {
            Alignment::parse(value)
        } else {
            None
        }
    })
}

fn log_duplicates(headers: &[Header]) {
    for (i, header) in headers.iter().enumerate() {
        if headers[..i].iter().any(|h| h.text == header.text) {
            tracing::debug!(
                header = %header.text,
                index = header.index,
                "Duplicate header text, later cell wins"
            );
        }
    }
}
