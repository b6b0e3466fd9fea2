//! `wsdl:binding` / `soap:binding` / `wsdl:operation` (binding-level
//! SOAP details: style, soapAction, use).

use crate::error::{CodegenError, Result};
use crate::parser::wsdl::parser::XmlReader;
use crate::parser::wsdl::{
    Binding, BindingOperation, BindingStyle, SoapUse, SoapVersion, SOAP_11_BINDING_NS,
    SOAP_12_BINDING_NS,
};
use crate::parser::xsd::parser::skip_element;
use crate::parser::xsd::schema_attributes::{child_scope, get_attr, get_qname_attr, local_name_str, require_attr};
use crate::parser::{NamespaceScope, ResolvedName};
use quick_xml::events::{BytesStart, Event};

/// Returns `Ok(None)` when the binding's `soap:binding`/`soap12:binding`
/// extension isn't in a recognized SOAP namespace (spec.md §4.2
/// "UnsupportedBinding"): the caller records the binding's name and moves
/// on rather than failing the whole parse.
pub fn parse_binding(
    reader: &mut XmlReader<'_>,
    buf: &mut Vec<u8>,
    start: &BytesStart<'static>,
    has_children: bool,
    scope: &NamespaceScope,
) -> Result<Option<Binding>> {
    let name = require_attr(start, "name", "binding")?;
    let port_type = get_qname_attr(start, "type", scope)?.ok_or_else(|| {
        CodegenError::MissingAttribute {
            element: "binding".to_string(),
            attribute: "type".to_string(),
        }
    })?;
    let own_name = start.local_name().as_ref().to_vec();

    let mut soap_version = None;
    let mut style = BindingStyle::Document;
    let mut transport = None;
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
                        "unexpected end of document inside wsdl:binding".to_string(),
                    ))
                }
                Event::Empty(child) => {
                    let child = child.into_owned();
                    if let Some(version) = soap_binding_namespace(&child, scope) {
                        soap_version = Some(version);
                        style = get_attr(&child, "style")?
                            .map(|v| if v == "rpc" { BindingStyle::Rpc } else { BindingStyle::Document })
                            .unwrap_or(BindingStyle::Document);
                        transport = get_attr(&child, "transport")?;
                    }
                }
                Event::Start(child) if local_name_str(&child) == "operation" => {
                    let child = child.into_owned();
                    let child_scope = child_scope(&child, scope)?;
                    operations.push(parse_binding_operation(reader, buf, &child, &child_scope)?);
                }
                Event::Start(child) => {
                    if let Some(version) = soap_binding_namespace(&child, scope) {
                        soap_version = Some(version);
                        style = get_attr(&child, "style")?
                            .map(|v| if v == "rpc" { BindingStyle::Rpc } else { BindingStyle::Document })
                            .unwrap_or(BindingStyle::Document);
                        transport = get_attr(&child, "transport")?;
                    }
                    skip_element(reader, buf, child.local_name().as_ref())?;
                }
                _ => {}
            }
            buf.clear();
        }
    }

    let Some(soap_version) = soap_version else {
        return Ok(None);
    };

    Ok(Some(Binding {
        name: ResolvedName::unqualified(name),
        port_type,
        style,
        transport,
        soap_version,
        operations,
    }))
}

/// Recognizes `soap:binding`/`soap12:binding` (any prefix) by resolving
/// the tag's own prefix against `scope` and checking it against the SOAP
/// 1.1/1.2 binding extension namespaces. Anything else (e.g. `http:binding`)
/// returns `None`.
fn soap_binding_namespace(start: &BytesStart<'static>, scope: &NamespaceScope) -> Option<SoapVersion> {
    if local_name_str(start) != "binding" {
        return None;
    }
    let raw = String::from_utf8_lossy(start.name().as_ref()).into_owned();
    let ns = match raw.split_once(':') {
        Some((prefix, _)) => scope.resolve_prefix(prefix)?,
        None => scope.default_namespace()?,
    };
    match ns.as_str() {
        SOAP_11_BINDING_NS => Some(SoapVersion::Soap11),
        SOAP_12_BINDING_NS => Some(SoapVersion::Soap12),
        _ => None,
    }
}

fn parse_binding_operation(
    reader: &mut XmlReader<'_>,
    buf: &mut Vec<u8>,
    start: &BytesStart<'static>,
    scope: &NamespaceScope,
) -> Result<BindingOperation> {
    let name = require_attr(start, "name", "operation")?;
    let own_name = start.local_name().as_ref().to_vec();
    let mut soap_action = None;
    let mut input_use = SoapUse::Literal;
    let mut output_use = SoapUse::Literal;

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
                read_binding_operation_child(&child, &mut soap_action, &mut input_use, &mut output_use)?;
            }
            Event::Start(child) => {
                let child = child.into_owned();
                let local = local_name_str(&child);
                if local == "input" || local == "output" {
                    // The soap:body use lives inside input/output as a
                    // nested element; scan its immediate children.
                    scan_body_use(reader, buf, &child, &local, &mut input_use, &mut output_use)?;
                } else {
                    read_binding_operation_child(&child, &mut soap_action, &mut input_use, &mut output_use)?;
                    skip_element(reader, buf, child.local_name().as_ref())?;
                }
            }
            _ => {}
        }
        buf.clear();
    }

    if soap_action.is_none() {
        tracing_warn_missing_soap_action(&name);
    }

    Ok(BindingOperation {
        name,
        soap_action,
        input_use,
        output_use,
    })
}

fn scan_body_use(
    reader: &mut XmlReader<'_>,
    buf: &mut Vec<u8>,
    start: &BytesStart<'static>,
    which: &str,
    input_use: &mut SoapUse,
    output_use: &mut SoapUse,
) -> Result<()> {
    let own_name = start.local_name().as_ref().to_vec();
    loop {
        let event = reader
            .read_event_into(buf)
            .map_err(|e| CodegenError::WsdlParse(e.to_string()))?;
        match event {
            Event::End(e) if e.local_name().as_ref() == own_name.as_slice() => break,
            Event::Eof => {
                return Err(CodegenError::WsdlParse(
                    "unexpected end of document inside wsdl:input/output".to_string(),
                ))
            }
            Event::Empty(child) | Event::Start(child) => {
                if local_name_str(&child) == "body" {
                    let use_ = get_attr(&child, "use")?
                        .map(|v| SoapUse::from_attr(&v))
                        .unwrap_or(SoapUse::Literal);
                    if which == "input" {
                        *input_use = use_;
                    } else {
                        *output_use = use_;
                    }
                }
            }
            _ => {}
        }
        buf.clear();
    }
    Ok(())
}

fn read_binding_operation_child(
    child: &BytesStart<'static>,
    soap_action: &mut Option<String>,
    _input_use: &mut SoapUse,
    _output_use: &mut SoapUse,
) -> Result<()> {
    if local_name_str(child) == "operation" {
        *soap_action = get_attr(child, "soapAction")?;
    }
    Ok(())
}

fn tracing_warn_missing_soap_action(operation_name: &str) {
    #[cfg(feature = "tracing")]
    tracing::warn!(operation = operation_name, "binding operation has no soapAction");
    #[cfg(not(feature = "tracing"))]
    let _ = operation_name;
}

#[cfg(test)]
mod tests {
    use crate::parser::wsdl::parser::parse_wsdl;
    use crate::parser::wsdl::{BindingStyle, SoapUse, SoapVersion};

    #[test]
    fn parses_document_literal_soap11_binding() {
        let xml = r#"<definitions xmlns="http://schemas.xmlsoap.org/wsdl/"
                       xmlns:soap="http://schemas.xmlsoap.org/wsdl/soap/"
                       xmlns:tns="http://example.com/ns"
                       targetNamespace="http://example.com/ns">
                       <binding name="CalculatorSoap" type="tns:CalculatorSoap">
                         <soap:binding transport="http://schemas.xmlsoap.org/soap/http" style="document"/>
                         <operation name="Add">
                           <soap:operation soapAction="http://example.com/Add" style="document"/>
                           <input><soap:body use="literal"/></input>
                           <output><soap:body use="literal"/></output>
                         </operation>
                       </binding>
                     </definitions>"#;
        let desc = parse_wsdl(xml).unwrap();
        let binding = desc.bindings.first().unwrap();
        assert_eq!(binding.style, BindingStyle::Document);
        assert_eq!(binding.soap_version, SoapVersion::Soap11);
        assert_eq!(binding.operations[0].soap_action.as_deref(), Some("http://example.com/Add"));
        assert_eq!(binding.operations[0].input_use, SoapUse::Literal);
    }

    #[test]
    fn non_soap_binding_is_recorded_as_unsupported() {
        let xml = r#"<definitions xmlns="http://schemas.xmlsoap.org/wsdl/"
                       xmlns:http="http://schemas.xmlsoap.org/wsdl/http/"
                       xmlns:tns="http://example.com/ns"
                       targetNamespace="http://example.com/ns">
                       <binding name="CalculatorHttp" type="tns:CalculatorSoap">
                         <http:binding verb="GET"/>
                       </binding>
                     </definitions>"#;
        let desc = parse_wsdl(xml).unwrap();
        assert!(desc.bindings.is_empty());
        assert_eq!(desc.unsupported_bindings, vec!["CalculatorHttp".to_string()]);
    }
}
