//! Content-model parsing: `sequence`/`choice`/`all`, group definitions and
//! group references, and the `any` wildcard. These are the building blocks
//! of a complex type's particle tree (spec.md §3 "Particle").

use crate::error::{CodegenError, Result};
use crate::parser::xsd::element::parse_element_decl;
use crate::parser::xsd::parser::{skip_element, ParseCtx, XmlReader};
use crate::parser::xsd::schema_attributes::{
    child_scope, get_occurs, get_qname_attr, local_name_str, require_attr,
};
use crate::parser::xsd::{GroupDecl, Occurs, Particle};
use crate::parser::{NamespaceScope, ResolvedName};
use quick_xml::events::{BytesStart, Event};

/// Parses any single particle-position child (`element`, `any`, `group`
/// reference, or a nested `sequence`/`choice`/`all`).
fn parse_particle(
    reader: &mut XmlReader<'_>,
    buf: &mut Vec<u8>,
    start: &BytesStart<'static>,
    has_children: bool,
    scope: &NamespaceScope,
    ctx: &mut ParseCtx<'_>,
) -> Result<Option<Particle>> {
    let local = local_name_str(start);
    match local.as_str() {
        "element" => {
            let decl = parse_element_decl(reader, buf, start, has_children, scope, ctx)?;
            Ok(Some(Particle::Element {
                occurs: decl.occurs,
                element: Box::new(decl),
            }))
        }
        "any" => {
            let occurs = get_occurs(start)?;
            if has_children {
                skip_element(reader, buf, start.local_name().as_ref())?;
            }
            Ok(Some(Particle::Any { occurs }))
        }
        "group" => {
            // A group *reference* inside another particle's children (as
            // opposed to a top-level `xs:group name="...">` definition).
            let occurs = get_occurs(start)?;
            let name = get_qname_attr(start, "ref", scope)?.ok_or_else(|| {
                CodegenError::MissingAttribute {
                    element: "group".to_string(),
                    attribute: "ref".to_string(),
                }
            })?;
            if has_children {
                skip_element(reader, buf, start.local_name().as_ref())?;
            }
            Ok(Some(Particle::GroupRef { occurs, name }))
        }
        "sequence" => Ok(Some(parse_sequence_like(
            reader,
            buf,
            start,
            has_children,
            scope,
            ctx,
            SequenceKind::Sequence,
        )?)),
        "choice" => Ok(Some(parse_sequence_like(
            reader,
            buf,
            start,
            has_children,
            scope,
            ctx,
            SequenceKind::Choice,
        )?)),
        "all" => Ok(Some(parse_sequence_like(
            reader,
            buf,
            start,
            has_children,
            scope,
            ctx,
            SequenceKind::All,
        )?)),
        "annotation" => {
            if has_children {
                skip_element(reader, buf, start.local_name().as_ref())?;
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

#[derive(Clone, Copy)]
enum SequenceKind {
    Sequence,
    Choice,
    All,
}

fn parse_sequence_like(
    reader: &mut XmlReader<'_>,
    buf: &mut Vec<u8>,
    start: &BytesStart<'static>,
    has_children: bool,
    scope: &NamespaceScope,
    ctx: &mut ParseCtx<'_>,
    kind: SequenceKind,
) -> Result<Particle> {
    let occurs = get_occurs(start)?;
    let own_name = start.local_name().as_ref().to_vec();
    let mut children = Vec::new();

    if has_children {
        loop {
            let event = reader
                .read_event_into(buf)
                .map_err(|e| CodegenError::XsdParse(e.to_string()))?;
            match event {
                Event::End(e) if e.local_name().as_ref() == own_name.as_slice() => break,
                Event::Eof => {
                    return Err(CodegenError::XsdParse(
                        "unexpected end of document inside particle group".to_string(),
                    ))
                }
                Event::Start(child) => {
                    let child = child.into_owned();
                    let child_scope = child_scope(&child, scope)?;
                    if let Some(p) = parse_particle(reader, buf, &child, true, &child_scope, ctx)? {
                        children.push(p);
                    }
                }
                Event::Empty(child) => {
                    let child = child.into_owned();
                    let child_scope = child_scope(&child, scope)?;
                    if let Some(p) = parse_particle(reader, buf, &child, false, &child_scope, ctx)? {
                        children.push(p);
                    }
                }
                _ => {}
            }
            buf.clear();
        }
    }

    Ok(match kind {
        SequenceKind::Sequence => Particle::Sequence { occurs, children },
        SequenceKind::Choice => Particle::Choice { occurs, children },
        SequenceKind::All => Particle::All { occurs, children },
    })
}

/// A top-level `xs:group name="...">` definition: a name bound to exactly
/// one particle (its single `sequence`/`choice`/`all` child).
pub fn parse_group_decl(
    reader: &mut XmlReader<'_>,
    buf: &mut Vec<u8>,
    start: &BytesStart<'static>,
    has_children: bool,
    scope: &NamespaceScope,
    ctx: &mut ParseCtx<'_>,
) -> Result<GroupDecl> {
    let name = require_attr(start, "name", "group")?;
    let own_name = start.local_name().as_ref().to_vec();
    let mut particle = None;

    if has_children {
        loop {
            let event = reader
                .read_event_into(buf)
                .map_err(|e| CodegenError::XsdParse(e.to_string()))?;
            match event {
                Event::End(e) if e.local_name().as_ref() == own_name.as_slice() => break,
                Event::Eof => {
                    return Err(CodegenError::XsdParse(
                        "unexpected end of document inside xs:group".to_string(),
                    ))
                }
                Event::Start(child) => {
                    let child = child.into_owned();
                    let local = local_name_str(&child);
                    let child_scope = child_scope(&child, scope)?;
                    if matches!(local.as_str(), "sequence" | "choice" | "all") {
                        particle = parse_particle(reader, buf, &child, true, &child_scope, ctx)?;
                    } else if local == "annotation" {
                        skip_element(reader, buf, child.local_name().as_ref())?;
                    } else {
                        skip_element(reader, buf, child.local_name().as_ref())?;
                    }
                }
                Event::Empty(child) => {
                    skip_element(reader, buf, child.local_name().as_ref())?;
                }
                _ => {}
            }
            buf.clear();
        }
    }

    Ok(GroupDecl {
        name: ResolvedName::unqualified(name),
        particle: particle.unwrap_or(Particle::Sequence {
            occurs: Occurs::default(),
            children: Vec::new(),
        }),
    })
}

/// Parses the particle content directly inside a complex type (a bare
/// `sequence`/`choice`/`all`/`group` ref, with no `simpleContent`/
/// `complexContent` wrapper). Returns `None` if `start` isn't one of those.
pub fn parse_top_level_particle(
    reader: &mut XmlReader<'_>,
    buf: &mut Vec<u8>,
    start: &BytesStart<'static>,
    has_children: bool,
    scope: &NamespaceScope,
    ctx: &mut ParseCtx<'_>,
) -> Result<Option<Particle>> {
    parse_particle(reader, buf, start, has_children, scope, ctx)
}
