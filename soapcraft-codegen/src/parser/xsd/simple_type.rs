//! `xs:simpleType`: restriction (with facets, notably `enumeration` for
//! string-enum lowering), list, and union.

use crate::error::{CodegenError, Result};
use crate::parser::xsd::parser::{skip_element, AnonNames, XmlReader};
use crate::parser::xsd::schema_attributes::{get_attr, get_qname_attr, local_name_str};
use crate::parser::xsd::{Facet, SimpleTypeContent, SimpleTypeDecl};
use crate::parser::{NamespaceScope, ResolvedName, XML_SCHEMA_NS};
use quick_xml::events::{BytesStart, Event};

pub fn parse_simple_type(
    reader: &mut XmlReader<'_>,
    buf: &mut Vec<u8>,
    start: &BytesStart<'static>,
    has_children: bool,
    scope: &NamespaceScope,
    _anon: &mut AnonNames,
) -> Result<SimpleTypeDecl> {
    let name = get_attr(start, "name")?.map(ResolvedName::unqualified);
    let own_name = start.local_name().as_ref().to_vec();

    let mut content = None;
    if has_children {
        loop {
            let event = reader
                .read_event_into(buf)
                .map_err(|e| CodegenError::XsdParse(e.to_string()))?;
            match event {
                Event::End(e) if e.local_name().as_ref() == own_name.as_slice() => break,
                Event::Eof => {
                    return Err(CodegenError::XsdParse(
                        "unexpected end of document inside xs:simpleType".to_string(),
                    ))
                }
                Event::Start(child) => {
                    let child = child.into_owned();
                    content = parse_content_child(reader, buf, &child, true, scope)?.or(content);
                }
                Event::Empty(child) => {
                    let child = child.into_owned();
                    content = parse_content_child(reader, buf, &child, false, scope)?.or(content);
                }
                _ => {}
            }
            buf.clear();
        }
    }

    Ok(SimpleTypeDecl {
        name,
        content: content.unwrap_or(SimpleTypeContent::Restriction {
            base: ResolvedName::new(XML_SCHEMA_NS, "string"),
            facets: Vec::new(),
        }),
    })
}

fn parse_content_child(
    reader: &mut XmlReader<'_>,
    buf: &mut Vec<u8>,
    child: &BytesStart<'static>,
    has_children: bool,
    scope: &NamespaceScope,
) -> Result<Option<SimpleTypeContent>> {
    match local_name_str(child).as_str() {
        "restriction" => Ok(Some(parse_restriction(reader, buf, child, has_children, scope)?)),
        "list" => {
            let item_type = get_qname_attr(child, "itemType", scope)?;
            if has_children {
                // `<list><simpleType>...</simpleType></list>` (anonymous
                // item type) isn't supported; the item type must be named.
                skip_element(reader, buf, child.local_name().as_ref())?;
            }
            Ok(Some(SimpleTypeContent::List {
                item_type: item_type.unwrap_or_else(|| ResolvedName::new(XML_SCHEMA_NS, "string")),
            }))
        }
        "union" => {
            let member_types = get_attr(child, "memberTypes")?
                .map(|v| {
                    v.split_whitespace()
                        .map(|tok| crate::parser::QName::new(tok).resolve(scope))
                        .collect::<Vec<_>>()
                })
                .unwrap_or_default();
            if has_children {
                skip_element(reader, buf, child.local_name().as_ref())?;
            }
            Ok(Some(SimpleTypeContent::Union { member_types }))
        }
        "annotation" => {
            if has_children {
                skip_element(reader, buf, child.local_name().as_ref())?;
            }
            Ok(None)
        }
        other => {
            if has_children {
                skip_element(reader, buf, other.as_bytes())?;
            }
            Ok(None)
        }
    }
}

fn parse_restriction(
    reader: &mut XmlReader<'_>,
    buf: &mut Vec<u8>,
    start: &BytesStart<'static>,
    has_children: bool,
    scope: &NamespaceScope,
) -> Result<SimpleTypeContent> {
    let base = get_qname_attr(start, "base", scope)?
        .unwrap_or_else(|| ResolvedName::new(XML_SCHEMA_NS, "string"));
    let own_name = start.local_name().as_ref().to_vec();
    let mut facets = Vec::new();

    if has_children {
        loop {
            let event = reader
                .read_event_into(buf)
                .map_err(|e| CodegenError::XsdParse(e.to_string()))?;
            match event {
                Event::End(e) if e.local_name().as_ref() == own_name.as_slice() => break,
                Event::Eof => {
                    return Err(CodegenError::XsdParse(
                        "unexpected end of document inside xs:restriction".to_string(),
                    ))
                }
                Event::Start(child) => {
                    let child = child.into_owned();
                    if let Some(facet) = parse_facet(&child)? {
                        facets.push(facet);
                    }
                    skip_element(reader, buf, child.local_name().as_ref())?;
                }
                Event::Empty(child) => {
                    let child = child.into_owned();
                    if let Some(facet) = parse_facet(&child)? {
                        facets.push(facet);
                    }
                }
                _ => {}
            }
            buf.clear();
        }
    }

    Ok(SimpleTypeContent::Restriction { base, facets })
}

fn parse_facet(start: &BytesStart<'static>) -> Result<Option<Facet>> {
    let local = local_name_str(start);
    if local == "annotation" {
        return Ok(None);
    }
    let value = get_attr(start, "value")?.unwrap_or_default();
    let facet = match local.as_str() {
        "enumeration" => Facet::Enumeration(value),
        "pattern" => Facet::Pattern(value),
        "minLength" => Facet::MinLength(value.parse().unwrap_or(0)),
        "maxLength" => Facet::MaxLength(value.parse().unwrap_or(0)),
        "length" => Facet::Length(value.parse().unwrap_or(0)),
        "minInclusive" => Facet::MinInclusive(value),
        "maxInclusive" => Facet::MaxInclusive(value),
        "minExclusive" => Facet::MinExclusive(value),
        "maxExclusive" => Facet::MaxExclusive(value),
        "totalDigits" => Facet::TotalDigits(value.parse().unwrap_or(0)),
        "fractionDigits" => Facet::FractionDigits(value.parse().unwrap_or(0)),
        other => Facet::Unknown {
            name: other.to_string(),
            value,
        },
    };
    Ok(Some(facet))
}
