// XML reader for documentation exports
//
// Builds a DocNode tree with quick-xml's pull reader. Whitespace-only text
// between elements is dropped; everything else is kept verbatim.

use crate::error::{Error, Result};
use crate::parser::ast::{DocNode, Document, Element, Position};
use quick_xml::escape::unescape;
use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;

/// Parse an XML document into a tree
pub fn parse(xml: &str) -> Result<Document> {
    let mut reader = Reader::from_str(xml);
    let mut stack: Vec<Element> = Vec::new();
    let mut root: Option<Element> = None;
    let mut text = String::new();

    loop {
        let offset = reader.buffer_position() as usize;
        let event = reader.read_event().map_err(|e| {
            let pos = Position::at_offset(xml, reader.error_position() as usize);
            Error::xml(e.to_string(), pos.line, pos.column)
        })?;

        match event {
            Event::Start(e) => {
                flush_text(&mut stack, &mut text);
                stack.push(start_element(&e, Position::at_offset(xml, offset))?);
            }
            Event::Empty(e) => {
                flush_text(&mut stack, &mut text);
                let pos = Position::at_offset(xml, offset);
                let element = start_element(&e, pos)?;
                attach(&mut stack, &mut root, element, pos)?;
            }
            Event::End(_) => {
                flush_text(&mut stack, &mut text);
                let pos = Position::at_offset(xml, offset);
                let element = stack
                    .pop()
                    .ok_or_else(|| Error::xml("unexpected end tag", pos.line, pos.column))?;
                attach(&mut stack, &mut root, element, pos)?;
            }
            Event::Text(e) => {
                let raw = String::from_utf8_lossy(&e);
                text.push_str(&decode_text(&raw, xml, offset)?);
            }
            Event::CData(e) => {
                text.push_str(&String::from_utf8_lossy(&e));
            }
            Event::GeneralRef(e) => {
                let entity = format!("&{};", String::from_utf8_lossy(&e));
                text.push_str(&decode_text(&entity, xml, offset)?);
            }
            Event::Eof => break,
            _ => {}
        }
    }

    if let Some(open) = stack.last() {
        return Err(Error::xml(
            format!("unclosed element <{}>", open.name),
            open.position.line,
            open.position.column,
        ));
    }

    root.map(|root| Document { root })
        .ok_or_else(|| Error::xml("document has no root element", 1, 1))
}

fn decode_text(raw: &str, xml: &str, offset: usize) -> Result<String> {
    unescape(raw).map(|s| s.into_owned()).map_err(|e| {
        let pos = Position::at_offset(xml, offset);
        Error::xml(e.to_string(), pos.line, pos.column)
    })
}

fn start_element(start: &BytesStart<'_>, position: Position) -> Result<Element> {
    let name = String::from_utf8_lossy(start.name().as_ref()).into_owned();
    let mut element = Element::new(name, position);

    for attr in start.attributes() {
        let attr = attr.map_err(|e| Error::xml(e.to_string(), position.line, position.column))?;
        let key = String::from_utf8_lossy(attr.key.as_ref()).into_owned();
        let raw = String::from_utf8_lossy(&attr.value);
        let value = unescape(&raw)
            .map_err(|e| Error::xml(e.to_string(), position.line, position.column))?
            .into_owned();
        element.attributes.push((key, value));
    }

    Ok(element)
}

/// Move pending text into the innermost open element
fn flush_text(stack: &mut [Element], text: &mut String) {
    if text.is_empty() {
        return;
    }
    let pending = std::mem::take(text);
    if pending.trim().is_empty() {
        return;
    }
    if let Some(parent) = stack.last_mut() {
        parent.children.push(DocNode::Text(pending));
    }
}

/// Attach a finished element to its parent, or make it the root
fn attach(
    stack: &mut [Element],
    root: &mut Option<Element>,
    element: Element,
    pos: Position,
) -> Result<()> {
    if let Some(parent) = stack.last_mut() {
        parent.children.push(DocNode::Element(element));
        return Ok(());
    }
    if root.is_some() {
        return Err(Error::xml(
            format!("second root element <{}>", element.name),
            pos.line,
            pos.column,
        ));
    }
    *root = Some(element);
    Ok(())
}
