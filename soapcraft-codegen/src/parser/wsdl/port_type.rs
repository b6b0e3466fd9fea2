//! `wsdl:portType` / `wsdl:operation` (abstract operation signatures).

use crate::error::{CodegenError, Result};
use crate::parser::wsdl::parser::XmlReader;
use crate::parser::wsdl::{Fault, OperationStyle, PortType, PortTypeOperation};
use crate::parser::xsd::parser::skip_element;
use crate::parser::xsd::schema_attributes::{child_scope, get_qname_attr, local_name_str, require_attr};
use crate::parser::{NamespaceScope, ResolvedName};
use quick_xml::events::{BytesStart, Event};

pub fn parse_port_type(
    reader: &mut XmlReader<'_>,
    buf: &mut Vec<u8>,
    start: &BytesStart<'static>,
    has_children: bool,
    scope: &NamespaceScope,
) -> Result<PortType> {
    let name = require_attr(start, "name", "portType")?;
    let own_name = start.local_name().as_ref().to_vec();
    let mut operations = Vec::new();

    if has_children {
        loop {
            let event = reader
                .read_event_into(buf)
                .map_err(|e| CodegenError::WsdlParse(e.to_string()))?;
            match event {
                Event::End(e) if e.local_name().as_ref() == own_name.as_slice() => break,
                Event::Eof => {
                    return Err(CodegenError::WsdlParse(
                        "unexpected end of document inside wsdl:portType".to_string(),
                    ))
                }
                Event::Start(child) if local_name_str(&child) == "operation" => {
                    let child = child.into_owned();
                    let child_scope = child_scope(&child, scope)?;
                    operations.push(parse_operation(reader, buf, &child, &child_scope)?);
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

    Ok(PortType {
        name: ResolvedName::unqualified(name),
        operations,
    })
}

fn parse_operation(
    reader: &mut XmlReader<'_>,
    buf: &mut Vec<u8>,
    start: &BytesStart<'static>,
    scope: &NamespaceScope,
) -> Result<PortTypeOperation> {
    let name = require_attr(start, "name", "operation")?;
    let own_name = start.local_name().as_ref().to_vec();
    let mut input = None;
    let mut output = None;
    let mut faults = Vec::new();
    let documentation = None;

    loop {
        let event = reader
            .read_event_into(buf)
            .map_err(|e| CodegenError::WsdlParse(e.to_string()))?;
        match event {
            Event::End(e) if e.local_name().as_ref() == own_name.as_slice() => break,
            Event::Eof => {
                return Err(CodegenError::WsdlParse(
                    "unexpected end of document inside wsdl:operation".to_string(),
                ))
            }
            Event::Empty(child) => {
                let child = child.into_owned();
                apply_operation_child(&child, scope, &mut input, &mut output, &mut faults)?;
            }
            Event::Start(child) => {
                let child = child.into_owned();
                apply_operation_child(&child, scope, &mut input, &mut output, &mut faults)?;
                skip_element(reader, buf, child.local_name().as_ref())?;
            }
            _ => {}
        }
        buf.clear();
    }

    let style = if output.is_some() {
        OperationStyle::RequestResponse
    } else {
        OperationStyle::OneWay
    };

    Ok(PortTypeOperation {
        name,
        input,
        output,
        faults,
        style,
        documentation,
    })
}

fn apply_operation_child(
    child: &BytesStart<'static>,
    scope: &NamespaceScope,
    input: &mut Option<ResolvedName>,
    output: &mut Option<ResolvedName>,
    faults: &mut Vec<Fault>,
) -> Result<()> {
    match local_name_str(child).as_str() {
        "input" => {
            *input = get_qname_attr(child, "message", scope)?;
        }
        "output" => {
            *output = get_qname_attr(child, "message", scope)?;
        }
        "fault" => {
            let fault_name = require_attr(child, "name", "fault")?;
            if let Some(message) = get_qname_attr(child, "message", scope)? {
                faults.push(Fault {
                    name: fault_name,
                    message,
                });
            }
        }
        _ => {}
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use crate::parser::wsdl::parser::parse_wsdl;
    use crate::parser::wsdl::OperationStyle;

    #[test]
    fn parses_request_response_operation() {
        let xml = r#"<definitions xmlns="http://schemas.xmlsoap.org/wsdl/"
                       xmlns:tns="http://example.com/ns"
                       targetNamespace="http://example.com/ns">
                       <portType name="CalculatorSoap">
                         <operation name="Add">
                           <input message="tns:AddSoapIn"/>
                           <output message="tns:AddSoapOut"/>
                         </operation>
                       </portType>
                     </definitions>"#;
        let desc = parse_wsdl(xml).unwrap();
        let pt = &desc.port_types[0];
        assert_eq!(pt.operations.len(), 1);
        assert_eq!(pt.operations[0].style, OperationStyle::RequestResponse);
        assert_eq!(pt.operations[0].input.as_ref().unwrap().local, "AddSoapIn");
    }

    #[test]
    fn operation_with_no_output_is_one_way() {
        let xml = r#"<definitions xmlns="http://schemas.xmlsoap.org/wsdl/"
                       xmlns:tns="http://example.com/ns"
                       targetNamespace="http://example.com/ns">
                       <portType name="Notifier">
                         <operation name="Ping">
                           <input message="tns:PingIn"/>
                         </operation>
                       </portType>
                     </definitions>"#;
        let desc = parse_wsdl(xml).unwrap();
        assert_eq!(desc.port_types[0].operations[0].style, OperationStyle::OneWay);
    }
}
