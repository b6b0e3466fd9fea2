//! `xs:element` declarations, whether top-level (global elements, usable
//! as WSDL message parts or substitution-group heads) or local to a
//! particle (direct children, `ref`, or an inline anonymous type).

use crate::error::{CodegenError, Result};
use crate::parser::xsd::complex_type::parse_complex_type;
use crate::parser::xsd::parser::{skip_element, ParseCtx, XmlReader};
use crate::parser::xsd::schema_attributes::{
    get_bool_attr, get_occurs, get_qname_attr, local_name_str, require_attr,
};
use crate::parser::xsd::simple_type::parse_simple_type;
use crate::parser::xsd::{ElementContent, ElementDecl, SchemaItem};
use crate::parser::{NamespaceScope, ResolvedName};
use quick_xml::events::{BytesStart, Event};

pub fn parse_element_decl(
    reader: &mut XmlReader<'_>,
    buf: &mut Vec<u8>,
    start: &BytesStart<'static>,
    has_children: bool,
    scope: &NamespaceScope,
    ctx: &mut ParseCtx<'_>,
) -> Result<ElementDecl> {
    let occurs = get_occurs(start)?;
    let nillable = get_bool_attr(start, "nillable", false)?;
    let is_abstract = get_bool_attr(start, "abstract", false)?;
    let substitution_group = get_qname_attr(start, "substitutionGroup", scope)?;

    if let Some(reference) = get_qname_attr(start, "ref", scope)? {
        if has_children {
            skip_element(reader, buf, start.local_name().as_ref())?;
        }
        return Ok(ElementDecl {
            name: reference.clone(),
            content: ElementContent::Ref(reference),
            nillable,
            occurs,
            is_abstract,
            substitution_group,
        });
    }

    let local_name = require_attr(start, "name", "element")?;
    let name = ResolvedName::unqualified(local_name.clone());

    if let Some(type_ref) = get_qname_attr(start, "type", scope)? {
        if has_children {
            skip_element(reader, buf, start.local_name().as_ref())?;
        }
        return Ok(ElementDecl {
            name,
            content: ElementContent::TypeRef(type_ref),
            nillable,
            occurs,
            is_abstract,
            substitution_group,
        });
    }

    let mut content = ElementContent::None;
    if has_children {
        let own_name = start.local_name().as_ref().to_vec();
        loop {
            let event = reader
                .read_event_into(buf)
                .map_err(|e| CodegenError::XsdParse(e.to_string()))?;
            match event {
                Event::End(e) if e.local_name().as_ref() == own_name.as_slice() => break,
                Event::Eof => {
                    return Err(CodegenError::XsdParse(
                        "unexpected end of document inside xs:element".to_string(),
                    ))
                }
                Event::Start(child) => {
                    let child = child.into_owned();
                    content = parse_inline_content(reader, buf, &child, true, scope, ctx, &local_name)?
                        .unwrap_or(content);
                }
                Event::Empty(child) => {
                    let child = child.into_owned();
                    content = parse_inline_content(reader, buf, &child, false, scope, ctx, &local_name)?
                        .unwrap_or(content);
                }
                _ => {}
            }
            buf.clear();
        }
    }

    Ok(ElementDecl {
        name,
        content,
        nillable,
        occurs,
        is_abstract,
        substitution_group,
    })
}

fn parse_inline_content(
    reader: &mut XmlReader<'_>,
    buf: &mut Vec<u8>,
    child: &BytesStart<'static>,
    has_children: bool,
    scope: &NamespaceScope,
    ctx: &mut ParseCtx<'_>,
    parent_local_name: &str,
) -> Result<Option<ElementContent>> {
    match local_name_str(child).as_str() {
        "complexType" => {
            let mut decl = parse_complex_type(reader, buf, child, has_children, scope, ctx)?;
            let synthesized = ResolvedName::unqualified(ctx.anon.synthesize(parent_local_name));
            decl.name = Some(synthesized.clone());
            ctx.items.push(SchemaItem::ComplexType(decl));
            Ok(Some(ElementContent::InlineComplex(synthesized)))
        }
        "simpleType" => {
            let mut decl = parse_simple_type(reader, buf, child, has_children, scope, ctx.anon)?;
            let synthesized = ResolvedName::unqualified(ctx.anon.synthesize(parent_local_name));
            decl.name = Some(synthesized.clone());
            ctx.items.push(SchemaItem::SimpleType(decl));
            Ok(Some(ElementContent::InlineSimple(synthesized)))
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

#[cfg(test)]
mod tests {
    use crate::parser::xsd::parser::parse_schema;
    use crate::parser::xsd::{ElementContent, MaxOccurs};

    #[test]
    fn parses_element_with_type_ref() {
        let xml = r#"<xs:schema xmlns:xs="http://www.w3.org/2001/XMLSchema">
                       <xs:element name="Name" type="xs:string" minOccurs="0" maxOccurs="unbounded"/>
                     </xs:schema>"#;
        let schema = parse_schema(xml).unwrap();
        let el = schema.elements().next().unwrap();
        assert_eq!(el.occurs.min, 0);
        assert_eq!(el.occurs.max, MaxOccurs::Unbounded);
        match &el.content {
            ElementContent::TypeRef(name) => assert_eq!(name.local, "string"),
            other => panic!("expected TypeRef, got {other:?}"),
        }
    }

    #[test]
    fn parses_element_with_inline_complex_type_hoists_it() {
        let xml = r#"<xs:schema xmlns:xs="http://www.w3.org/2001/XMLSchema">
                       <xs:element name="Order">
                         <xs:complexType>
                           <xs:sequence>
                             <xs:element name="Id" type="xs:int"/>
                           </xs:sequence>
                         </xs:complexType>
                       </xs:element>
                     </xs:schema>"#;
        let schema = parse_schema(xml).unwrap();
        let el = schema.elements().next().unwrap();
        let synthesized = match &el.content {
            ElementContent::InlineComplex(name) => name.clone(),
            other => panic!("expected InlineComplex, got {other:?}"),
        };
        assert_eq!(synthesized.local, "OrderType");
        assert!(schema
            .complex_types()
            .any(|ct| ct.name.as_ref() == Some(&synthesized)));
    }

    #[test]
    fn parses_element_ref() {
        let xml = r#"<xs:schema xmlns:xs="http://www.w3.org/2001/XMLSchema">
                       <xs:element ref="tns:Item" xmlns:tns="http://example.com/ns"/>
                     </xs:schema>"#;
        let schema = parse_schema(xml).unwrap();
        let el = schema.elements().next().unwrap();
        assert!(matches!(el.content, ElementContent::Ref(_)));
    }
}
