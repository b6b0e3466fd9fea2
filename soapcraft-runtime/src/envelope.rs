//! SOAP envelope building and parsing.
//!
//! This module handles the construction of SOAP envelopes for both SOAP 1.1
//! and 1.2, serializing request bodies to XML and wrapping them in the
//! appropriate envelope structure (spec.md §6 "Wire protocol").

use crate::error::{SoapError, SoapResult};
use serde::Serialize;

#[cfg(feature = "tracing")]
use tracing::debug;

// Standard SOAP envelope namespace URIs as defined by W3C SOAP specification
const SOAP_11_ENVELOPE_NS: &str = "http://schemas.xmlsoap.org/soap/envelope/";
const SOAP_12_ENVELOPE_NS: &str = "http://www.w3.org/2003/05/soap-envelope";

/// SOAP protocol version
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SoapVersion {
    /// SOAP 1.1
    #[default]
    Soap11,
    /// SOAP 1.2
    Soap12,
}

/// SOAP envelope builder
pub struct SoapEnvelope;

impl SoapEnvelope {
    /// Build a SOAP envelope with the given body, no namespace on the root
    /// body element.
    pub fn build<T>(body: &T, version: SoapVersion) -> SoapResult<String>
    where
        T: Serialize,
    {
        #[cfg(feature = "tracing")]
        debug!(soap_version = ?version, "Building SOAP envelope");

        Self::build_with_namespace(body, version, None, true)
    }

    /// Build a SOAP envelope with an optional namespace on the body
    /// element. `element_form_qualified` mirrors the XSD schema's
    /// `elementFormDefault`: when false, the namespace is only declared,
    /// never applied, because the body's child elements are themselves
    /// unqualified.
    pub fn build_with_namespace<T>(
        body: &T,
        version: SoapVersion,
        namespace: Option<&str>,
        element_form_qualified: bool,
    ) -> SoapResult<String>
    where
        T: Serialize,
    {
        #[cfg(feature = "tracing")]
        debug!(soap_version = ?version, namespace = ?namespace, element_form_qualified = %element_form_qualified, "Building SOAP envelope with namespace");

        if element_form_qualified {
            return match version {
                SoapVersion::Soap11 => Self::build_soap11(body, namespace),
                SoapVersion::Soap12 => Self::build_soap12(body, namespace),
            };
        }

        // Unqualified: the body's own element carries no namespace (XSD
        // elementFormDefault="unqualified"), so `namespace` is declared on
        // the envelope root instead of being stamped onto the body
        // element itself.
        let body_xml = Self::serialize_to_xml(body)?;
        match version {
            SoapVersion::Soap11 => Ok(Self::wrap_soap11(&body_xml, namespace)),
            SoapVersion::Soap12 => Ok(Self::wrap_soap12(&body_xml, namespace)),
        }
    }

    /// Build a SOAP 1.1 envelope.
    pub fn build_soap11<T>(body: &T, namespace: Option<&str>) -> SoapResult<String>
    where
        T: Serialize,
    {
        #[cfg(feature = "tracing")]
        debug!("Serializing request body to XML");

        let body_xml = if let Some(ns) = namespace {
            Self::serialize_to_xml_with_namespace(body, ns)?
        } else {
            Self::serialize_to_xml(body)?
        };

        #[cfg(feature = "tracing")]
        debug!(body_xml_size = body_xml.len(), "Building SOAP 1.1 envelope");

        Ok(Self::wrap_soap11(&body_xml, None))
    }

    /// Build a SOAP 1.2 envelope.
    pub fn build_soap12<T>(body: &T, namespace: Option<&str>) -> SoapResult<String>
    where
        T: Serialize,
    {
        #[cfg(feature = "tracing")]
        debug!("Serializing request body to XML");

        let body_xml = if let Some(ns) = namespace {
            Self::serialize_to_xml_with_namespace(body, ns)?
        } else {
            Self::serialize_to_xml(body)?
        };

        #[cfg(feature = "tracing")]
        debug!(body_xml_size = body_xml.len(), "Building SOAP 1.2 envelope");

        Ok(Self::wrap_soap12(&body_xml, None))
    }

    /// Wraps an already-serialized body in a SOAP 1.1 envelope.
    /// `declared_namespace` is added as an extra `xmlns:tns` declaration
    /// on the envelope root without touching the body element, for the
    /// `elementFormDefault="unqualified"` path.
    fn wrap_soap11(body_xml: &str, declared_namespace: Option<&str>) -> String {
        let extra_xmlns = declared_namespace
            .map(|ns| format!(r#" xmlns:tns="{}""#, ns))
            .unwrap_or_default();
        // Build envelope manually to avoid escaping the body XML
        format!(
            r#"<?xml version="1.0" encoding="UTF-8"?><soap:Envelope xmlns:soap="{}"{extra_xmlns}><soap:Header></soap:Header><soap:Body>{}</soap:Body></soap:Envelope>"#,
            SOAP_11_ENVELOPE_NS, body_xml
        )
    }

    /// Wraps an already-serialized body in a SOAP 1.2 envelope. See
    /// [`Self::wrap_soap11`] for `declared_namespace`.
    fn wrap_soap12(body_xml: &str, declared_namespace: Option<&str>) -> String {
        let extra_xmlns = declared_namespace
            .map(|ns| format!(r#" xmlns:tns="{}""#, ns))
            .unwrap_or_default();
        format!(
            r#"<?xml version="1.0" encoding="UTF-8"?><env:Envelope xmlns:env="{}"{extra_xmlns}><env:Header></env:Header><env:Body>{}</env:Body></env:Envelope>"#,
            SOAP_12_ENVELOPE_NS, body_xml
        )
    }

    /// Serialize a value to an XML element bridge method (the `toXML`
    /// side of spec.md §9's `(toXML, fromXML)` bridge): generated types
    /// call this rather than building the envelope directly.
    pub fn serialize_to_xml<T>(value: &T) -> SoapResult<String>
    where
        T: Serialize,
    {
        quick_xml::se::to_string(value).map_err(|e| SoapError::SerializationError(e.to_string()))
    }

    /// Serialize a value to XML with a namespace on the root element
    /// (required by many SOAP services, especially .NET-based ones).
    pub fn serialize_to_xml_with_namespace<T>(value: &T, namespace: &str) -> SoapResult<String>
    where
        T: Serialize,
    {
        let xml = quick_xml::se::to_string(value)
            .map_err(|e| SoapError::SerializationError(e.to_string()))?;
        Ok(Self::add_namespace_to_root(&xml, namespace))
    }

    /// Add a namespace declaration to the root element of an XML string:
    /// `<Tag>...</Tag>` -> `<Tag xmlns="...">...</Tag>`.
    fn add_namespace_to_root(xml: &str, namespace: &str) -> String {
        if let Some(pos) = xml.find('>') {
            if pos > 0 && xml.as_bytes()[pos - 1] == b'/' {
                let insert_pos = pos - 1;
                let mut result = String::with_capacity(xml.len() + namespace.len() + 10);
                result.push_str(&xml[..insert_pos]);
                result.push_str(&format!(" xmlns=\"{}\"", namespace));
                result.push_str(&xml[insert_pos..]);
                result
            } else {
                let mut result = String::with_capacity(xml.len() + namespace.len() + 10);
                result.push_str(&xml[..pos]);
                result.push_str(&format!(" xmlns=\"{}\"", namespace));
                result.push_str(&xml[pos..]);
                result
            }
        } else {
            xml.to_string()
        }
    }

    /// Parse a SOAP response and extract/deserialize the Body content
    /// (the `fromXML` side of spec.md §9's bridge for envelopes).
    pub fn parse_response<T>(xml: &str) -> SoapResult<T>
    where
        T: for<'de> serde::Deserialize<'de>,
    {
        #[cfg(feature = "tracing")]
        debug!(response_size = xml.len(), "Parsing SOAP response");

        let body_content = Self::extract_body(xml)?;
        quick_xml::de::from_str(&body_content)
            .map_err(|e| SoapError::DeserializationError(e.to_string()))
    }

    /// Extracts the raw inner XML of `<soap:Body>`/`<env:Body>` without
    /// deserializing it, used by both [`Self::parse_response`] and
    /// [`Self::check_for_fault`] so both scan the same event stream shape.
    fn extract_body(xml: &str) -> SoapResult<String> {
        use quick_xml::events::Event;
        use quick_xml::Reader;

        let mut reader = Reader::from_str(xml);
        let mut buf = Vec::new();
        let mut in_body = false;
        let mut body_content = String::new();
        let mut depth = 0;

        loop {
            match reader.read_event_into(&mut buf) {
                Ok(Event::Start(e)) => {
                    let local_name = e.name();
                    let local_name = local_name.as_ref();

                    if local_name.ends_with(b"Body") {
                        in_body = true;
                        depth = 0;
                    } else if in_body {
                        depth += 1;
                        body_content.push_str(&render_start_tag(&e));
                    }
                }
                Ok(Event::End(e)) => {
                    let local_name = e.name();
                    let local_name = local_name.as_ref();

                    if local_name.ends_with(b"Body") && in_body && depth == 0 {
                        break;
                    } else if in_body {
                        depth -= 1;
                        let tag = String::from_utf8_lossy(e.name().as_ref()).to_string();
                        body_content.push_str("</");
                        body_content.push_str(&tag);
                        body_content.push('>');
                    }
                }
                Ok(Event::Text(e)) if in_body => {
                    body_content.push_str(&e.unescape().unwrap_or_default());
                }
                Ok(Event::CData(e)) if in_body => {
                    body_content.push_str(&String::from_utf8_lossy(e.as_ref()));
                }
                Ok(Event::Empty(e)) if in_body => {
                    body_content.push_str(&render_empty_tag(&e));
                }
                Ok(Event::Eof) => break,
                Err(e) => return Err(SoapError::XmlError(e.to_string())),
                _ => {}
            }
            buf.clear();
        }

        if body_content.is_empty() {
            return Err(SoapError::InvalidResponse(
                "No body content found in SOAP response".to_string(),
            ));
        }

        Ok(body_content)
    }

    /// Check whether a SOAP response body contains `soap:Fault` (spec.md
    /// §6/§9 "shadowing the normal deserialization path"). Runs regardless
    /// of whether the carrying HTTP status was 200 or 500 (recorded Open
    /// Question decision, see DESIGN.md).
    pub fn check_for_fault(xml: &str) -> SoapResult<()> {
        #[cfg(feature = "tracing")]
        debug!("Checking SOAP response for faults");

        use quick_xml::events::Event;
        use quick_xml::Reader;

        let mut reader = Reader::from_str(xml);
        let mut buf = Vec::new();
        let mut in_fault = false;
        let mut fault_code = String::new();
        let mut fault_string = String::new();
        let mut fault_actor: Option<String> = None;
        let mut fault_detail: Option<String> = None;
        let mut current_field: Option<&'static str> = None;

        loop {
            match reader.read_event_into(&mut buf) {
                Ok(Event::Start(e)) | Ok(Event::Empty(e)) => {
                    let local_name = e.name();
                    let local_name = local_name.as_ref();

                    if local_name.ends_with(b"Fault") {
                        in_fault = true;
                    } else if in_fault {
                        current_field = if local_name.ends_with(b"faultcode") || local_name.ends_with(b"Code") {
                            Some("code")
                        } else if local_name.ends_with(b"faultstring") || local_name.ends_with(b"Reason") {
                            Some("string")
                        } else if local_name.ends_with(b"faultactor") || local_name.ends_with(b"Role") {
                            Some("actor")
                        } else if local_name.ends_with(b"detail") || local_name.ends_with(b"Detail") {
                            Some("detail")
                        } else {
                            current_field
                        };
                    }
                }
                Ok(Event::Text(e)) => {
                    let text = e.unescape().unwrap_or_default().to_string();
                    match current_field {
                        Some("code") => fault_code = text,
                        Some("string") => fault_string = text,
                        Some("actor") => fault_actor = Some(text),
                        Some("detail") => fault_detail = Some(text),
                        _ => {}
                    }
                }
                Ok(Event::End(e)) => {
                    let local_name = e.name();
                    let local_name = local_name.as_ref();

                    if local_name.ends_with(b"Fault") {
                        return Err(SoapError::SoapFault {
                            code: fault_code,
                            message: fault_string,
                            actor: fault_actor,
                            detail: fault_detail,
                        });
                    }
                    current_field = None;
                }
                Ok(Event::Eof) => break,
                Err(e) => return Err(SoapError::XmlError(e.to_string())),
                _ => {}
            }
            buf.clear();
        }

        Ok(())
    }
}

fn render_start_tag(e: &quick_xml::events::BytesStart<'_>) -> String {
    let tag = String::from_utf8_lossy(e.name().as_ref()).to_string();
    let mut out = String::new();
    out.push('<');
    out.push_str(&tag);
    for attr in e.attributes().flatten() {
        out.push(' ');
        out.push_str(&String::from_utf8_lossy(attr.key.as_ref()));
        out.push_str("=\"");
        out.push_str(&String::from_utf8_lossy(&attr.value));
        out.push('"');
    }
    out.push('>');
    out
}

fn render_empty_tag(e: &quick_xml::events::BytesStart<'_>) -> String {
    let tag = String::from_utf8_lossy(e.name().as_ref()).to_string();
    let mut out = String::new();
    out.push('<');
    out.push_str(&tag);
    for attr in e.attributes().flatten() {
        out.push(' ');
        out.push_str(&String::from_utf8_lossy(attr.key.as_ref()));
        out.push_str("=\"");
        out.push_str(&String::from_utf8_lossy(&attr.value));
        out.push('"');
    }
    out.push_str("/>");
    out
}
