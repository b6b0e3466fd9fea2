//! `xs:complexType`: `simpleContent`/`complexContent` extension and
//! restriction, and the bare-particle case (a bare `sequence`/`choice`/
//! `all`/`group` ref with no content wrapper).

use crate::error::{CodegenError, Result};
use crate::parser::xsd::particle::parse_top_level_particle;
use crate::parser::xsd::parser::{skip_element, ParseCtx, XmlReader};
use crate::parser::xsd::schema_attributes::{get_bool_attr, get_qname_attr, local_name_str};
use crate::parser::xsd::schema_content::parse_attribute_decl;
use crate::parser::xsd::{AttributeDecl, ComplexTypeContent, ComplexTypeDecl, Derivation};
use crate::parser::{NamespaceScope, ResolvedName};
use quick_xml::events::{BytesStart, Event};

pub fn parse_complex_type(
    reader: &mut XmlReader<'_>,
    buf: &mut Vec<u8>,
    start: &BytesStart<'static>,
    has_children: bool,
    scope: &NamespaceScope,
    ctx: &mut ParseCtx<'_>,
) -> Result<ComplexTypeDecl> {
    let name = crate::parser::xsd::schema_attributes::get_attr(start, "name")?
        .map(ResolvedName::unqualified);
    let is_abstract = get_bool_attr(start, "abstract", false)?;
    let own_name = start.local_name().as_ref().to_vec();

    let mut content = ComplexTypeContent::Empty;
    let mut attributes = Vec::new();

    if has_children {
        loop {
            let event = reader
                .read_event_into(buf)
                .map_err(|e| CodegenError::XsdParse(e.to_string()))?;
            match event {
                Event::End(e) if e.local_name().as_ref() == own_name.as_slice() => break,
                Event::Eof => {
                    return Err(CodegenError::XsdParse(
                        "unexpected end of document inside xs:complexType".to_string(),
                    ))
                }
                Event::Start(child) => {
                    let child = child.into_owned();
                    let child_scope = crate::parser::xsd::schema_attributes::child_scope(&child, scope)?;
                    dispatch_body_child(
                        reader,
                        buf,
                        &child,
                        true,
                        &child_scope,
                        ctx,
                        &mut content,
                        &mut attributes,
                    )?;
                }
                Event::Empty(child) => {
                    let child = child.into_owned();
                    let child_scope = crate::parser::xsd::schema_attributes::child_scope(&child, scope)?;
                    dispatch_body_child(
                        reader,
                        buf,
                        &child,
                        false,
                        &child_scope,
                        ctx,
                        &mut content,
                        &mut attributes,
                    )?;
                }
                _ => {}
            }
            buf.clear();
        }
    }

    Ok(ComplexTypeDecl {
        name,
        content,
        attributes,
        is_abstract,
    })
}

#[allow(clippy::too_many_arguments)]
fn dispatch_body_child(
    reader: &mut XmlReader<'_>,
    buf: &mut Vec<u8>,
    child: &BytesStart<'static>,
    has_children: bool,
    scope: &NamespaceScope,
    ctx: &mut ParseCtx<'_>,
    content: &mut ComplexTypeContent,
    attributes: &mut Vec<AttributeDecl>,
) -> Result<()> {
    match local_name_str(child).as_str() {
        "simpleContent" => {
            *content = parse_simple_content(reader, buf, child, has_children, scope)?;
        }
        "complexContent" => {
            let (derived_content, derived_attrs) =
                parse_complex_content(reader, buf, child, has_children, scope, ctx)?;
            *content = derived_content;
            attributes.extend(derived_attrs);
        }
        "sequence" | "choice" | "all" | "group" => {
            let particle = parse_top_level_particle(reader, buf, child, has_children, scope, ctx)?;
            *content = ComplexTypeContent::Complex {
                base: None,
                derivation: Derivation::Restriction,
                particle,
            };
        }
        "attribute" => {
            attributes.push(parse_attribute_decl(
                reader, buf, child, has_children, scope, ctx.anon,
            )?);
        }
        "attributeGroup" => {
            // A reference to a named attribute group; flattened into the
            // owning type's attribute list only once the resolver has the
            // full schema set available (it may live in another document).
            if let Some(reference) = get_qname_attr(child, "ref", scope)? {
                attributes.push(AttributeDecl {
                    name: reference,
                    type_ref: ResolvedName::new(crate::parser::XML_SCHEMA_NS, "anySimpleType"),
                    use_: crate::parser::xsd::AttributeUse::Optional,
                });
            }
            if has_children {
                skip_element(reader, buf, child.local_name().as_ref())?;
            }
        }
        "annotation" => {
            if has_children {
                skip_element(reader, buf, child.local_name().as_ref())?;
            }
        }
        other => {
            if has_children {
                skip_element(reader, buf, other.as_bytes())?;
            }
        }
    }
    Ok(())
}

fn parse_simple_content(
    reader: &mut XmlReader<'_>,
    buf: &mut Vec<u8>,
    start: &BytesStart<'static>,
    has_children: bool,
    scope: &NamespaceScope,
) -> Result<ComplexTypeContent> {
    let own_name = start.local_name().as_ref().to_vec();
    let mut result = ComplexTypeContent::Empty;

    if has_children {
        loop {
            let event = reader
                .read_event_into(buf)
                .map_err(|e| CodegenError::XsdParse(e.to_string()))?;
            match event {
                Event::End(e) if e.local_name().as_ref() == own_name.as_slice() => break,
                Event::Eof => {
                    return Err(CodegenError::XsdParse(
                        "unexpected end of document inside xs:simpleContent".to_string(),
                    ))
                }
                Event::Start(child) | Event::Empty(child) => {
                    let child = child.into_owned();
                    let local = local_name_str(&child);
                    let derivation = match local.as_str() {
                        "extension" => Derivation::Extension,
                        "restriction" => Derivation::Restriction,
                        _ => {
                            skip_element(reader, buf, child.local_name().as_ref())?;
                            continue;
                        }
                    };
                    let base = get_qname_attr(&child, "base", scope)?
                        .unwrap_or_else(|| ResolvedName::new(crate::parser::XML_SCHEMA_NS, "string"));
                    skip_element(reader, buf, child.local_name().as_ref())?;
                    result = ComplexTypeContent::Simple { base, derivation };
                }
                _ => {}
            }
            buf.clear();
        }
    }

    Ok(result)
}

fn parse_complex_content(
    reader: &mut XmlReader<'_>,
    buf: &mut Vec<u8>,
    start: &BytesStart<'static>,
    has_children: bool,
    scope: &NamespaceScope,
    ctx: &mut ParseCtx<'_>,
) -> Result<(ComplexTypeContent, Vec<AttributeDecl>)> {
    let own_name = start.local_name().as_ref().to_vec();
    let mut content = ComplexTypeContent::Empty;
    let mut attributes = Vec::new();

    if has_children {
        loop {
            let event = reader
                .read_event_into(buf)
                .map_err(|e| CodegenError::XsdParse(e.to_string()))?;
            match event {
                Event::End(e) if e.local_name().as_ref() == own_name.as_slice() => break,
                Event::Eof => {
                    return Err(CodegenError::XsdParse(
                        "unexpected end of document inside xs:complexContent".to_string(),
                    ))
                }
                Event::Start(child) => {
                    let child = child.into_owned();
                    let local = local_name_str(&child);
                    let derivation = match local.as_str() {
                        "extension" => Derivation::Extension,
                        "restriction" => Derivation::Restriction,
                        _ => {
                            skip_element(reader, buf, child.local_name().as_ref())?;
                            buf.clear();
                            continue;
                        }
                    };
                    let base = get_qname_attr(&child, "base", scope)?;
                    let (particle, attrs) =
                        parse_derivation_body(reader, buf, &child, scope, ctx)?;
                    attributes = attrs;
                    content = ComplexTypeContent::Complex {
                        base,
                        derivation,
                        particle,
                    };
                }
                Event::Empty(_) => {}
                _ => {}
            }
            buf.clear();
        }
    }

    Ok((content, attributes))
}

fn parse_derivation_body(
    reader: &mut XmlReader<'_>,
    buf: &mut Vec<u8>,
    start: &BytesStart<'static>,
    scope: &NamespaceScope,
    ctx: &mut ParseCtx<'_>,
) -> Result<(Option<crate::parser::xsd::Particle>, Vec<AttributeDecl>)> {
    let own_name = start.local_name().as_ref().to_vec();
    let mut particle = None;
    let mut attributes = Vec::new();

    loop {
        let event = reader
            .read_event_into(buf)
            .map_err(|e| CodegenError::XsdParse(e.to_string()))?;
        match event {
            Event::End(e) if e.local_name().as_ref() == own_name.as_slice() => break,
            Event::Eof => {
                return Err(CodegenError::XsdParse(
                    "unexpected end of document inside extension/restriction".to_string(),
                ))
            }
            Event::Start(child) => {
                let child = child.into_owned();
                let child_scope = crate::parser::xsd::schema_attributes::child_scope(&child, scope)?;
                match local_name_str(&child).as_str() {
                    "sequence" | "choice" | "all" | "group" => {
                        particle = parse_top_level_particle(reader, buf, &child, true, &child_scope, ctx)?;
                    }
                    "attribute" => {
                        attributes.push(parse_attribute_decl(
                            reader, buf, &child, true, &child_scope, ctx.anon,
                        )?);
                    }
                    _ => {
                        skip_element(reader, buf, child.local_name().as_ref())?;
                    }
                }
            }
            Event::Empty(child) => {
                let child = child.into_owned();
                let child_scope = crate::parser::xsd::schema_attributes::child_scope(&child, scope)?;
                match local_name_str(&child).as_str() {
                    "sequence" | "choice" | "all" | "group" => {
                        particle = parse_top_level_particle(reader, buf, &child, false, &child_scope, ctx)?;
                    }
                    "attribute" => {
                        attributes.push(parse_attribute_decl(
                            reader, buf, &child, false, &child_scope, ctx.anon,
                        )?);
                    }
                    _ => {}
                }
            }
            _ => {}
        }
        buf.clear();
    }

    Ok((particle, attributes))
}
