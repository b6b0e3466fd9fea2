//! `wsdl:service` / `wsdl:port` / `soap:address`.

use crate::error::{CodegenError, Result};
use crate::parser::wsdl::parser::XmlReader;
use crate::parser::wsdl::{Port, Service};
use crate::parser::xsd::parser::skip_element;
use crate::parser::xsd::schema_attributes::{child_scope, get_attr, get_qname_attr, local_name_str, require_attr};
use crate::parser::{NamespaceScope, ResolvedName};
use quick_xml::events::{BytesStart, Event};

pub fn parse_service(
    reader: &mut XmlReader<'_>,
    buf: &mut Vec<u8>,
    start: &BytesStart<'static>,
    has_children: bool,
    scope: &NamespaceScope,
) -> Result<Service> {
    let name = require_attr(start, "name", "service")?;
    let own_name = start.local_name().as_ref().to_vec();
    let mut ports = Vec::new();

    if has_children {
        loop {
            let event = reader
                .read_event_into(buf)
                .map_err(|e| CodegenError::WsdlParse(e.to_string()))?;
            match event {
                Event::End(e) if e.local_name().as_ref() == own_name.as_slice() => break,
                Event::Eof => {
                    return Err(CodegenError::WsdlParse(
                        "unexpected end of document inside wsdl:service".to_string(),
                    ))
                }
                Event::Start(child) if local_name_str(&child) == "port" => {
                    let child = child.into_owned();
                    let child_scope = child_scope(&child, scope)?;
                    ports.push(parse_port(reader, buf, &child, &child_scope)?);
                }
                Event::Start(child) => {
                    skip_element(reader, buf, child.local_name().as_ref())?;
                }
                Event::Empty(_) => {}
                _ => {}
            }
            buf.clear();
        }
    }

    Ok(Service {
        name: ResolvedName::unqualified(name),
        ports,
    })
}

fn parse_port(
    reader: &mut XmlReader<'_>,
    buf: &mut Vec<u8>,
    start: &BytesStart<'static>,
    scope: &NamespaceScope,
) -> Result<Port> {
    let name = require_attr(start, "name", "port")?;
    let binding = get_qname_attr(start, "binding", scope)?.ok_or_else(|| CodegenError::MissingAttribute {
        element: "port".to_string(),
        attribute: "binding".to_string(),
    })?;
    let own_name = start.local_name().as_ref().to_vec();
    let mut address = None;

    loop {
        let event = reader
            .read_event_into(buf)
            .map_err(|e| CodegenError::WsdlParse(e.to_string()))?;
        match event {
            Event::End(e) if e.local_name().as_ref() == own_name.as_slice() => break,
            Event::Eof => {
                return Err(CodegenError::WsdlParse(
                    "unexpected end of document inside wsdl:port".to_string(),
                ))
            }
            Event::Empty(child) => {
                if local_name_str(&child) == "address" {
                    address = get_attr(&child, "location")?;
                }
            }
            Event::Start(child) => {
                let child = child.into_owned();
                if local_name_str(&child) == "address" {
                    address = get_attr(&child, "location")?;
                }
                skip_element(reader, buf, child.local_name().as_ref())?;
            }
            _ => {}
        }
        buf.clear();
    }

    Ok(Port {
        name,
        binding,
        address,
    })
}

#[cfg(test)]
mod tests {
    use crate::parser::wsdl::parser::parse_wsdl;

    #[test]
    fn parses_service_port_and_address() {
        let xml = r#"<definitions xmlns="http://schemas.xmlsoap.org/wsdl/"
                       xmlns:soap="http://schemas.xmlsoap.org/wsdl/soap/"
                       xmlns:tns="http://example.com/ns"
                       targetNamespace="http://example.com/ns">
                       <service name="Calculator">
                         <port name="CalculatorSoap" binding="tns:CalculatorSoap">
                           <soap:address location="http://example.com/calculator.asmx"/>
                         </port>
                       </service>
                     </definitions>"#;
        let desc = parse_wsdl(xml).unwrap();
        assert_eq!(desc.endpoint_url(), Some("http://example.com/calculator.asmx"));
        assert_eq!(desc.service_name(), Some("Calculator"));
    }
}
