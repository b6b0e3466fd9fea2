//! `wsdl:message` / `wsdl:part`.

use crate::error::{CodegenError, Result};
use crate::parser::wsdl::parser::XmlReader;
use crate::parser::wsdl::{Message, MessagePart};
use crate::parser::xsd::parser::skip_element;
use crate::parser::xsd::schema_attributes::{get_qname_attr, local_name_str, require_attr};
use crate::parser::NamespaceScope;
use quick_xml::events::{BytesStart, Event};

pub fn parse_message(
    reader: &mut XmlReader<'_>,
    buf: &mut Vec<u8>,
    start: &BytesStart<'static>,
    has_children: bool,
    scope: &NamespaceScope,
) -> Result<Message> {
    let name = require_attr(start, "name", "message")?;
    let own_name = start.local_name().as_ref().to_vec();
    let mut parts = Vec::new();

    if has_children {
        loop {
            let event = reader
                .read_event_into(buf)
                .map_err(|e| CodegenError::WsdlParse(e.to_string()))?;
            match event {
                Event::End(e) if e.local_name().as_ref() == own_name.as_slice() => break,
                Event::Eof => {
                    return Err(CodegenError::WsdlParse(
                        "unexpected end of document inside wsdl:message".to_string(),
                    ))
                }
                Event::Empty(child) if local_name_str(&child) == "part" => {
                    parts.push(parse_part(&child.into_owned(), scope)?);
                }
                Event::Start(child) if local_name_str(&child) == "part" => {
                    let child = child.into_owned();
                    let part = parse_part(&child, scope)?;
                    skip_element(reader, buf, child.local_name().as_ref())?;
                    parts.push(part);
                }
                Event::Start(child) => {
                    skip_element(reader, buf, child.local_name().as_ref())?;
                }
                _ => {}
            }
            buf.clear();
        }
    }

    Ok(Message {
        name: crate::parser::ResolvedName::unqualified(name),
        parts,
    })
}

fn parse_part(part: &BytesStart<'static>, scope: &NamespaceScope) -> Result<MessagePart> {
    let name = require_attr(part, "name", "part")?;
    let element = get_qname_attr(part, "element", scope)?;
    let type_ = get_qname_attr(part, "type", scope)?;
    if element.is_none() && type_.is_none() {
        return Err(CodegenError::MissingAttribute {
            element: "part".to_string(),
            attribute: "element|type".to_string(),
        });
    }
    Ok(MessagePart {
        name,
        element,
        type_,
    })
}

#[cfg(test)]
mod tests {
    use crate::parser::wsdl::parser::parse_wsdl;

    #[test]
    fn parses_message_with_element_part() {
        let xml = r#"<definitions xmlns="http://schemas.xmlsoap.org/wsdl/"
                       xmlns:tns="http://example.com/ns"
                       targetNamespace="http://example.com/ns">
                       <message name="AddRequest">
                         <part name="parameters" element="tns:Add"/>
                       </message>
                     </definitions>"#;
        let desc = parse_wsdl(xml).unwrap();
        let msg = &desc.messages[0];
        assert_eq!(msg.name.local, "AddRequest");
        assert_eq!(msg.parts.len(), 1);
        assert_eq!(msg.parts[0].element.as_ref().unwrap().local, "Add");
    }

    #[test]
    fn message_part_without_element_or_type_is_an_error() {
        let xml = r#"<definitions xmlns="http://schemas.xmlsoap.org/wsdl/">
                       <message name="Bad">
                         <part name="parameters"/>
                       </message>
                     </definitions>"#;
        assert!(parse_wsdl(xml).is_err());
    }
}
