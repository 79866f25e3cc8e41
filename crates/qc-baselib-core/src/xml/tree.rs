//! XML text to [`XmlElement`] tree.

use super::CodecError;
use crate::element::XmlElement;
use quick_xml::events::{BytesStart, Event};
use quick_xml::reader::Reader;

/// Element whose subtree keeps its text content.
const TEXT_SCOPE: &str = "DomainSpecificInfo";

/// Parses XML text into a single root element.
///
/// Text and CDATA are kept, trimmed, only inside a `DomainSpecificInfo`
/// subtree. Comments and processing instructions are dropped.
pub(crate) fn parse(xml: &str) -> Result<XmlElement, CodecError> {
    let xml = xml.strip_prefix('\u{feff}').unwrap_or(xml);
    let mut reader = Reader::from_str(xml);
    reader.config_mut().trim_text(true);

    let mut stack: Vec<XmlElement> = Vec::new();
    let mut root: Option<XmlElement> = None;

    loop {
        let event = reader
            .read_event()
            .map_err(|e| syntax(&reader, e.to_string()))?;
        match event {
            Event::Start(start) => {
                if stack.is_empty() && root.is_some() {
                    return Err(syntax(&reader, "multiple root elements"));
                }
                stack.push(element(&reader, &start)?);
            }
            Event::Empty(start) => {
                let element = element(&reader, &start)?;
                attach(&reader, &mut stack, &mut root, element)?;
            }
            Event::End(_) => {
                if let Some(element) = stack.pop() {
                    attach(&reader, &mut stack, &mut root, element)?;
                }
            }
            Event::Text(text) if in_text_scope(&stack) => {
                let text = text.unescape().map_err(|e| syntax(&reader, e.to_string()))?;
                append_text(&mut stack, &text);
            }
            Event::CData(data) if in_text_scope(&stack) => {
                let text = utf8(&reader, &data)?;
                append_text(&mut stack, text);
            }
            Event::Eof => break,
            _ => {}
        }
    }

    if let Some(open) = stack.last() {
        return Err(syntax(
            &reader,
            format!("unexpected end of document inside `{}`", open.name()),
        ));
    }
    root.ok_or_else(|| syntax(&reader, "document has no root element"))
}

fn element(reader: &Reader<&[u8]>, start: &BytesStart<'_>) -> Result<XmlElement, CodecError> {
    let qname = start.name();
    let mut element = XmlElement::new(utf8(reader, qname.as_ref())?);
    for attr in start.attributes() {
        let attr = attr.map_err(|e| syntax(reader, e.to_string()))?;
        let key = utf8(reader, attr.key.as_ref())?;
        let value = attr
            .unescape_value()
            .map_err(|e| syntax(reader, e.to_string()))?;
        element.set_attribute(key, value.into_owned());
    }
    Ok(element)
}

fn attach(
    reader: &Reader<&[u8]>,
    stack: &mut [XmlElement],
    root: &mut Option<XmlElement>,
    element: XmlElement,
) -> Result<(), CodecError> {
    if let Some(parent) = stack.last_mut() {
        parent.push_child(element);
        return Ok(());
    }
    if root.is_some() {
        return Err(syntax(reader, "multiple root elements"));
    }
    *root = Some(element);
    Ok(())
}

fn in_text_scope(stack: &[XmlElement]) -> bool {
    stack.iter().any(|e| e.name() == TEXT_SCOPE)
}

fn append_text(stack: &mut [XmlElement], text: &str) {
    if let Some(top) = stack.last_mut() {
        top.append_text(text);
    }
}

fn utf8<'a>(reader: &Reader<&[u8]>, bytes: &'a [u8]) -> Result<&'a str, CodecError> {
    std::str::from_utf8(bytes).map_err(|e| syntax(reader, e.to_string()))
}

fn syntax(reader: &Reader<&[u8]>, message: impl Into<String>) -> CodecError {
    CodecError::Syntax {
        position: u64::try_from(reader.buffer_position()).unwrap_or(u64::MAX),
        message: message.into(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builds_nested_tree() {
        let root = parse(
            r#"<?xml version="1.0" encoding="UTF-8"?>
<A x="1"><B y="&lt;2&gt;"/><C><D/></C></A>"#,
        )
        .unwrap();
        assert_eq!(root.name(), "A");
        assert_eq!(root.attribute("x"), Some("1"));
        assert_eq!(root.children().len(), 2);
        assert_eq!(root.children()[0].attribute("y"), Some("<2>"));
        assert_eq!(root.children()[1].children()[0].name(), "D");
    }

    #[test]
    fn ignores_text_and_comments() {
        let root = parse("<A><!-- note -->text<B/></A>").unwrap();
        assert_eq!(root.children().len(), 1);
        assert_eq!(root.text(), None);
    }

    #[test]
    fn keeps_text_inside_domain_specific_info() {
        let root = parse(
            "<Issue>ignored<DomainSpecificInfo name=\"N\">\n  <Note kind=\"k\">a &amp; b</Note>\n  <Raw><![CDATA[<x/>]]></Raw>\n</DomainSpecificInfo></Issue>",
        )
        .unwrap();
        assert_eq!(root.text(), None);
        let info = &root.children()[0];
        assert_eq!(info.text(), None);
        assert_eq!(info.children()[0].text(), Some("a & b"));
        assert_eq!(info.children()[1].text(), Some("<x/>"));
    }

    #[test]
    fn strips_byte_order_mark() {
        let root = parse("\u{feff}<A/>").unwrap();
        assert_eq!(root.name(), "A");
    }

    #[test]
    fn mismatched_end_tag_is_syntax_error() {
        let err = parse("<A><B></A>").unwrap_err();
        assert!(matches!(err, CodecError::Syntax { .. }));
    }

    #[test]
    fn truncated_document_is_syntax_error() {
        let err = parse("<A><B/>").unwrap_err();
        assert!(matches!(err, CodecError::Syntax { .. }));
    }

    #[test]
    fn empty_input_is_syntax_error() {
        assert!(matches!(parse("").unwrap_err(), CodecError::Syntax { .. }));
    }

    #[test]
    fn second_root_is_syntax_error() {
        assert!(matches!(
            parse("<A/><B/>").unwrap_err(),
            CodecError::Syntax { .. }
        ));
    }
}
