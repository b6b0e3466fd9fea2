//! Entry point and shared plumbing for the XSD parser.
//!
//! Parsing is a single forward pass over `quick_xml` events. Each node
//! parser (`element`, `complex_type`, `simple_type`, `particle`) is handed
//! the shared `Reader`/buffer and is responsible for consuming exactly its
//! own subtree: given an `Event::Start`, it must read child events until it
//! sees the matching `Event::End` before returning control to its caller.
//! `Event::Empty` carries no children and is consumed on receipt.

use crate::error::{CodegenError, Result};
use crate::parser::xsd::schema_attributes::{child_scope, get_attr, local_name_str};
use crate::parser::xsd::schema_content::parse_schema_item;
use crate::parser::xsd::{FormDefault, Schema, SchemaItem};
use crate::parser::NamespaceScope;
use quick_xml::events::Event;
use quick_xml::reader::Reader;
use std::collections::HashMap;

pub type XmlReader<'a> = Reader<&'a [u8]>;

/// Generates deterministic, collision-free names for anonymous inline
/// `complexType`/`simpleType` declarations (spec.md §4.1 "Name synthesis").
/// The first anonymous type under a given parent is named
/// `{Parent}Type`; a second one (e.g. an element reusing a name already
/// synthesized from a different parent) gets a numeric suffix so the
/// resolver never sees two declarations claiming the same `ResolvedName`.
#[derive(Debug, Default)]
pub struct AnonNames {
    used: HashMap<String, u32>,
}

impl AnonNames {
    pub fn synthesize(&mut self, parent_local_name: &str) -> String {
        let base = format!("{}Type", parent_local_name);
        let count = self.used.entry(base.clone()).or_insert(0);
        let name = if *count == 0 {
            base.clone()
        } else {
            format!("{base}{}", *count + 1)
        };
        *count += 1;
        name
    }
}

/// Threaded through every node parser: the anonymous-name synthesizer and
/// the accumulating list of top-level schema nodes (inline complex/simple
/// types get hoisted into this list under their synthesized name, per
/// spec.md §4.1).
pub struct ParseCtx<'a> {
    pub anon: &'a mut AnonNames,
    pub items: &'a mut Vec<SchemaItem>,
}

pub fn parse_schema(xml: &str) -> Result<Schema> {
    let mut reader = Reader::from_str(xml);
    reader.config_mut().trim_text(true);
    let mut buf = Vec::new();

    loop {
        match reader
            .read_event_into(&mut buf)
            .map_err(|e| CodegenError::XsdParse(e.to_string()))?
        {
            Event::Start(start) if local_name_str(&start) == "schema" => {
                let owned = start.into_owned();
                let scope = child_scope(&owned, &NamespaceScope::with_schema_defaults())?;
                return parse_schema_from_root(&mut reader, &mut buf, &owned, scope);
            }
            Event::Eof => {
                return Err(CodegenError::XsdParse(
                    "document contains no xs:schema root element".to_string(),
                ))
            }
            _ => {}
        }
        buf.clear();
    }
}

fn parse_schema_from_root(
    reader: &mut XmlReader<'_>,
    buf: &mut Vec<u8>,
    root: &quick_xml::events::BytesStart<'static>,
    scope: NamespaceScope,
) -> Result<Schema> {
    let target_namespace = get_attr(root, "targetNamespace")?;
    let element_form_default = get_attr(root, "elementFormDefault")?
        .map(|v| FormDefault::from_attr(&v))
        .unwrap_or_default();
    let attribute_form_default = get_attr(root, "attributeFormDefault")?
        .map(|v| FormDefault::from_attr(&v))
        .unwrap_or_default();

    let mut schema = Schema {
        target_namespace,
        element_form_default,
        attribute_form_default,
        items: Vec::new(),
    };
    let mut anon = AnonNames::default();

    loop {
        let event = reader
            .read_event_into(buf)
            .map_err(|e| CodegenError::XsdParse(e.to_string()))?;
        match event {
            Event::End(e) if local_name_str_owned(&e) == "schema" => break,
            Event::Eof => {
                return Err(CodegenError::XsdParse(
                    "unexpected end of document inside xs:schema".to_string(),
                ))
            }
            Event::Start(start) => {
                let start = start.into_owned();
                let child_scope = child_scope(&start, &scope)?;
                let mut ctx = ParseCtx {
                    anon: &mut anon,
                    items: &mut schema.items,
                };
                if let Some(item) = parse_schema_item(reader, buf, &start, true, &child_scope, &mut ctx)? {
                    schema.items.push(item);
                }
            }
            Event::Empty(start) => {
                let start = start.into_owned();
                let child_scope = child_scope(&start, &scope)?;
                let mut ctx = ParseCtx {
                    anon: &mut anon,
                    items: &mut schema.items,
                };
                if let Some(item) = parse_schema_item(reader, buf, &start, false, &child_scope, &mut ctx)? {
                    schema.items.push(item);
                }
            }
            _ => {}
        }
        buf.clear();
    }

    Ok(schema)
}

fn local_name_str_owned(end: &quick_xml::events::BytesEnd<'_>) -> String {
    String::from_utf8_lossy(end.local_name().as_ref()).into_owned()
}

/// Skip a subtree whose contents this parser has no rule for (an
/// `xs:annotation`, or an element kind outside §4.1's supported set).
/// `has_children` distinguishes an `Event::Start` (must read to its
/// matching `End`) from an `Event::Empty` (already fully consumed).
pub fn skip_element(reader: &mut XmlReader<'_>, buf: &mut Vec<u8>, name: &[u8]) -> Result<()> {
    reader
        .read_to_end_into(quick_xml::name::QName(name), buf)
        .map_err(|e| CodegenError::XsdParse(e.to_string()))?;
    Ok(())
}
