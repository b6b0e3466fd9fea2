//! `wsdl:types`: zero or more embedded `xs:schema` elements.
//!
//! Each nested `<schema>` is re-serialized back into XML text and handed
//! to [`crate::parser::xsd::parse_schema`] rather than parsed in place.
//! `quick_xml`'s reader has already done the hard part (tokenizing,
//! attribute unescaping); rebuilding a small, self-contained document lets
//! the schema parser run as an ordinary top-level parse without the WSDL
//! parser having to duplicate every `xs:*` dispatch rule inline.

use crate::error::{CodegenError, Result};
use crate::parser::wsdl::parser::XmlReader;
use crate::parser::xsd::parser::parse_schema;
use crate::parser::xsd::Schema;
use crate::parser::xsd::schema_attributes::local_name_str;
use quick_xml::events::{BytesStart, Event};

/// Parses the `<types>` subtree, returning every `xs:schema` found inside
/// (spec.md §4.2: "The `wsdl:types` child contains zero or more `xs:schema`
/// elements"). A schema with no `targetNamespace` of its own inherits the
/// WSDL's, per the same section.
pub fn parse_types(
    reader: &mut XmlReader<'_>,
    buf: &mut Vec<u8>,
    has_children: bool,
    wsdl_target_namespace: Option<&str>,
) -> Result<Vec<Schema>> {
    let mut schemas = Vec::new();
    if !has_children {
        return Ok(schemas);
    }

    loop {
        let event = reader
            .read_event_into(buf)
            .map_err(|e| CodegenError::WsdlParse(e.to_string()))?;
        match event {
            Event::End(e) if local_name_str_owned(&e) == "types" => break,
            Event::Eof => {
                return Err(CodegenError::WsdlParse(
                    "unexpected end of document inside wsdl:types".to_string(),
                ))
            }
            Event::Start(start) if local_name_str(&start) == "schema" => {
                let start = start.into_owned();
                let xml = reserialize_schema(reader, buf, &start)?;
                let mut schema = parse_schema(&xml)?;
                if schema.target_namespace.is_none() {
                    schema.target_namespace = wsdl_target_namespace.map(|s| s.to_string());
                }
                schemas.push(schema);
            }
            Event::Start(start) => {
                crate::parser::xsd::parser::skip_element(reader, buf, start.local_name().as_ref())?;
            }
            _ => {}
        }
        buf.clear();
    }

    Ok(schemas)
}

fn local_name_str_owned(end: &quick_xml::events::BytesEnd<'_>) -> String {
    String::from_utf8_lossy(end.local_name().as_ref()).into_owned()
}

/// Rebuilds the `<schema>...</schema>` subtree as XML text, starting from
/// its already-consumed opening tag.
fn reserialize_schema(
    reader: &mut XmlReader<'_>,
    buf: &mut Vec<u8>,
    root: &BytesStart<'static>,
) -> Result<String> {
    let mut xml = String::from("<schema");
    push_attrs(&mut xml, root)?;
    xml.push('>');

    loop {
        let event = reader
            .read_event_into(buf)
            .map_err(|e| CodegenError::WsdlParse(e.to_string()))?;
        match event {
            Event::End(e) if e.local_name().as_ref() == b"schema" => {
                xml.push_str("</schema>");
                break;
            }
            Event::Eof => {
                return Err(CodegenError::WsdlParse(
                    "unexpected end of document inside embedded xs:schema".to_string(),
                ))
            }
            Event::Start(e) => {
                xml.push('<');
                xml.push_str(&tag_name(&e));
                push_attrs(&mut xml, &e.into_owned())?;
                xml.push('>');
            }
            Event::Empty(e) => {
                xml.push('<');
                xml.push_str(&tag_name(&e));
                push_attrs(&mut xml, &e.into_owned())?;
                xml.push_str("/>");
            }
            Event::End(e) => {
                xml.push_str("</");
                xml.push_str(&String::from_utf8_lossy(e.name().as_ref()));
                xml.push('>');
            }
            Event::Text(e) => {
                let text = e
                    .unescape()
                    .map_err(|err| CodegenError::WsdlParse(err.to_string()))?;
                xml.push_str(&escape_text(&text));
            }
            Event::CData(e) => {
                xml.push_str(&String::from_utf8_lossy(e.as_ref()));
            }
            _ => {}
        }
        buf.clear();
    }

    Ok(xml)
}

fn tag_name(start: &BytesStart<'_>) -> String {
    String::from_utf8_lossy(start.name().as_ref()).into_owned()
}

fn push_attrs(xml: &mut String, start: &BytesStart<'static>) -> Result<()> {
    for attr in start.attributes() {
        let attr = attr.map_err(|e| CodegenError::WsdlParse(e.to_string()))?;
        let key = String::from_utf8_lossy(attr.key.as_ref()).into_owned();
        let value = attr
            .decode_and_unescape_value(&Default::default())
            .map_err(|e| CodegenError::WsdlParse(e.to_string()))?;
        xml.push(' ');
        xml.push_str(&key);
        xml.push_str("=\"");
        xml.push_str(&escape_attr(&value));
        xml.push('"');
    }
    Ok(())
}

fn escape_text(s: &str) -> String {
    s.replace('&', "&amp;").replace('<', "&lt;").replace('>', "&gt;")
}

fn escape_attr(s: &str) -> String {
    escape_text(s).replace('"', "&quot;")
}
