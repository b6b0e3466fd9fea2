//! Dispatch for the direct children of `xs:schema` (and, by reuse, of
//! `xs:attributeGroup` and the attribute list of a complex type): routes
//! each child element to its node parser and wraps the result as a
//! `SchemaItem`.

use crate::error::{CodegenError, Result};
use crate::parser::xsd::complex_type::parse_complex_type;
use crate::parser::xsd::element::parse_element_decl;
use crate::parser::xsd::parser::{skip_element, AnonNames, ParseCtx, XmlReader};
use crate::parser::xsd::particle::parse_group_decl;
use crate::parser::xsd::schema_attributes::{get_attr, get_qname_attr, local_name_str, require_attr};
use crate::parser::xsd::simple_type::parse_simple_type;
use crate::parser::xsd::{
    AttributeDecl, AttributeGroupDecl, AttributeUse, ImportDecl, ResolvedName, SchemaItem,
    XML_SCHEMA_NS,
};
use crate::parser::NamespaceScope;
use quick_xml::events::BytesStart;

pub fn parse_schema_item(
    reader: &mut XmlReader<'_>,
    buf: &mut Vec<u8>,
    start: &BytesStart<'static>,
    has_children: bool,
    scope: &NamespaceScope,
    ctx: &mut ParseCtx<'_>,
) -> Result<Option<SchemaItem>> {
    let local = local_name_str(start);
    match local.as_str() {
        "element" => {
            let decl = parse_element_decl(reader, buf, start, has_children, scope, ctx)?;
            Ok(Some(SchemaItem::Element(decl)))
        }
        "complexType" => {
            let decl = parse_complex_type(reader, buf, start, has_children, scope, ctx)?;
            Ok(Some(SchemaItem::ComplexType(decl)))
        }
        "simpleType" => {
            let decl = parse_simple_type(reader, buf, start, has_children, scope, ctx.anon)?;
            Ok(Some(SchemaItem::SimpleType(decl)))
        }
        "attribute" => {
            let decl = parse_attribute_decl(reader, buf, start, has_children, scope, ctx.anon)?;
            Ok(Some(SchemaItem::Attribute(decl)))
        }
        "group" => {
            let decl = parse_group_decl(reader, buf, start, has_children, scope, ctx)?;
            Ok(Some(SchemaItem::Group(decl)))
        }
        "attributeGroup" => {
            let decl = parse_attribute_group_decl(reader, buf, start, has_children, scope, ctx.anon)?;
            Ok(Some(SchemaItem::AttributeGroup(decl)))
        }
        "import" | "include" => {
            if has_children {
                skip_remaining(reader, buf, start)?;
            }
            Ok(Some(SchemaItem::Import(ImportDecl {
                namespace: get_attr(start, "namespace")?,
                schema_location: get_attr(start, "schemaLocation")?,
                is_include: local == "include",
            })))
        }
        "annotation" | "notation" => {
            if has_children {
                skip_remaining(reader, buf, start)?;
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

fn skip_remaining(reader: &mut XmlReader<'_>, buf: &mut Vec<u8>, start: &BytesStart<'static>) -> Result<()> {
    skip_element(reader, buf, start.local_name().as_ref())
}

/// Parses an `xs:attribute` declaration, whether it is a top-level global
/// attribute, a direct child of a `complexType`, or a member of an
/// `attributeGroup`. `ref="..."` is resolved to the referenced attribute's
/// name directly (spec.md leaves attribute groups/refs for the resolver to
/// flatten; here we only capture the lexical shape).
pub fn parse_attribute_decl(
    reader: &mut XmlReader<'_>,
    buf: &mut Vec<u8>,
    start: &BytesStart<'static>,
    has_children: bool,
    scope: &NamespaceScope,
    anon: &mut AnonNames,
) -> Result<AttributeDecl> {
    if let Some(reference) = get_qname_attr(start, "ref", scope)? {
        if has_children {
            skip_remaining(reader, buf, start)?;
        }
        return Ok(AttributeDecl {
            name: reference.clone(),
            type_ref: ResolvedName::new(XML_SCHEMA_NS, "anySimpleType"),
            use_: AttributeUse::from_attr(&get_attr(start, "use")?.unwrap_or_default()),
        });
    }

    let local_name = require_attr(start, "name", "attribute")?;
    let use_ = AttributeUse::from_attr(&get_attr(start, "use")?.unwrap_or_default());
    let type_attr = get_qname_attr(start, "type", scope)?;

    let mut inline_simple = None;
    if has_children {
        loop {
            let event = reader
                .read_event_into(buf)
                .map_err(|e| CodegenError::XsdParse(e.to_string()))?;
            match event {
                quick_xml::events::Event::End(e)
                    if e.local_name().as_ref() == start.local_name().as_ref() =>
                {
                    break
                }
                quick_xml::events::Event::Eof => {
                    return Err(CodegenError::XsdParse(
                        "unexpected end of document inside xs:attribute".to_string(),
                    ))
                }
                quick_xml::events::Event::Start(child) if local_name_str(&child) == "simpleType" => {
                    let child = child.into_owned();
                    inline_simple = Some(parse_simple_type(reader, buf, &child, true, scope, anon)?);
                }
                quick_xml::events::Event::Empty(child) if local_name_str(&child) == "simpleType" => {
                    let child = child.into_owned();
                    inline_simple = Some(parse_simple_type(reader, buf, &child, false, scope, anon)?);
                }
                quick_xml::events::Event::Start(child) => {
                    skip_element(reader, buf, child.local_name().as_ref())?;
                }
                _ => {}
            }
            buf.clear();
        }
    }

    let type_ref = type_attr
        .or_else(|| inline_simple.and_then(|s| s.name))
        .unwrap_or_else(|| ResolvedName::new(XML_SCHEMA_NS, "anySimpleType"));

    Ok(AttributeDecl {
        name: ResolvedName::unqualified(local_name),
        type_ref,
        use_,
    })
}

fn parse_attribute_group_decl(
    reader: &mut XmlReader<'_>,
    buf: &mut Vec<u8>,
    start: &BytesStart<'static>,
    has_children: bool,
    scope: &NamespaceScope,
    anon: &mut AnonNames,
) -> Result<AttributeGroupDecl> {
    let name = require_attr(start, "name", "attributeGroup")?;
    let mut attributes = Vec::new();

    if has_children {
        loop {
            let event = reader
                .read_event_into(buf)
                .map_err(|e| CodegenError::XsdParse(e.to_string()))?;
            match event {
                quick_xml::events::Event::End(e)
                    if e.local_name().as_ref() == start.local_name().as_ref() =>
                {
                    break
                }
                quick_xml::events::Event::Eof => {
                    return Err(CodegenError::XsdParse(
                        "unexpected end of document inside xs:attributeGroup".to_string(),
                    ))
                }
                quick_xml::events::Event::Start(child) if local_name_str(&child) == "attribute" => {
                    let child = child.into_owned();
                    attributes.push(parse_attribute_decl(reader, buf, &child, true, scope, anon)?);
                }
                quick_xml::events::Event::Empty(child) if local_name_str(&child) == "attribute" => {
                    let child = child.into_owned();
                    attributes.push(parse_attribute_decl(reader, buf, &child, false, scope, anon)?);
                }
                quick_xml::events::Event::Start(child) => {
                    skip_element(reader, buf, child.local_name().as_ref())?;
                }
                _ => {}
            }
            buf.clear();
        }
    }

    Ok(AttributeGroupDecl {
        name: ResolvedName::unqualified(name),
        attributes,
    })
}
