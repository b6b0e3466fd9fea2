//! The WSDL 1.1 object model: `WebServiceDescription` and its constituent
//! messages/portTypes/bindings/services (spec.md §3 "WebServiceDescription").
//!
//! As with the XSD side, parsing resolves namespace prefixes into
//! `ResolvedName`s but does not cross document boundaries or validate that
//! a reference actually lands on a declaration; that is
//! [`crate::resolver`]'s job.

pub mod binding;
pub mod definitions;
pub mod message;
pub mod parser;
pub mod port_type;
pub mod service;
pub mod types;

pub use parser::{parse_wsdl, parse_wsdl_with_imports};

use crate::parser::xsd::Schema;
use crate::parser::ResolvedName;

pub const SOAP_11_BINDING_NS: &str = "http://schemas.xmlsoap.org/wsdl/soap/";
pub const SOAP_12_BINDING_NS: &str = "http://schemas.xmlsoap.org/wsdl/soap12/";

#[derive(Debug, Clone, PartialEq)]
pub struct MessagePart {
    pub name: String,
    pub element: Option<ResolvedName>,
    pub type_: Option<ResolvedName>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Message {
    pub name: ResolvedName,
    pub parts: Vec<MessagePart>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OperationStyle {
    RequestResponse,
    OneWay,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Fault {
    pub name: String,
    pub message: ResolvedName,
}

#[derive(Debug, Clone, PartialEq)]
pub struct PortTypeOperation {
    pub name: String,
    pub input: Option<ResolvedName>,
    pub output: Option<ResolvedName>,
    pub faults: Vec<Fault>,
    pub style: OperationStyle,
    pub documentation: Option<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct PortType {
    pub name: ResolvedName,
    pub operations: Vec<PortTypeOperation>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BindingStyle {
    Document,
    Rpc,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SoapUse {
    Literal,
    Encoded,
}

impl SoapUse {
    pub fn from_attr(value: &str) -> Self {
        if value == "encoded" {
            SoapUse::Encoded
        } else {
            SoapUse::Literal
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SoapVersion {
    Soap11,
    Soap12,
}

#[derive(Debug, Clone, PartialEq)]
pub struct BindingOperation {
    pub name: String,
    pub soap_action: Option<String>,
    pub input_use: SoapUse,
    pub output_use: SoapUse,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Binding {
    pub name: ResolvedName,
    pub port_type: ResolvedName,
    pub style: BindingStyle,
    pub transport: Option<String>,
    pub soap_version: SoapVersion,
    pub operations: Vec<BindingOperation>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Port {
    pub name: String,
    pub binding: ResolvedName,
    pub address: Option<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Service {
    pub name: ResolvedName,
    pub ports: Vec<Port>,
}

/// spec.md §3 "WebServiceDescription": everything parsed out of one WSDL
/// document plus whatever was pulled in transitively by `wsdl:import`.
#[derive(Debug, Clone, Default)]
pub struct WebServiceDescription {
    pub target_namespace: Option<String>,
    pub messages: Vec<Message>,
    pub port_types: Vec<PortType>,
    pub bindings: Vec<Binding>,
    pub services: Vec<Service>,
    pub schemas: Vec<Schema>,
    /// Binding extensions recognized but not SOAP 1.1/1.2 (spec.md §4.2
    /// "UnsupportedBinding"): named here rather than silently dropped.
    pub unsupported_bindings: Vec<String>,
}

impl WebServiceDescription {
    pub fn find_message(&self, name: &ResolvedName) -> Option<&Message> {
        self.messages.iter().find(|m| &m.name == name)
    }

    pub fn find_port_type(&self, name: &ResolvedName) -> Option<&PortType> {
        self.port_types.iter().find(|p| &p.name == name)
    }

    pub fn find_binding(&self, name: &ResolvedName) -> Option<&Binding> {
        self.bindings.iter().find(|b| &b.name == name)
    }

    pub fn first_service(&self) -> Option<&Service> {
        self.services.first()
    }

    pub fn service_name(&self) -> Option<&str> {
        self.first_service().map(|s| s.name.local.as_str())
    }

    pub fn endpoint_url(&self) -> Option<&str> {
        self.first_service()?.ports.first()?.address.as_deref()
    }

    pub fn find_soap_action(&self, operation_name: &str) -> Option<&str> {
        self.bindings
            .iter()
            .flat_map(|b| &b.operations)
            .find(|op| op.name == operation_name)
            .and_then(|op| op.soap_action.as_deref())
    }

    /// Folds an imported description's tables into this one (spec.md §4.2
    /// "imported WSDLs contribute their messages/portTypes/bindings/services
    /// to the importing description's tables").
    pub fn merge(&mut self, other: WebServiceDescription) {
        self.messages.extend(other.messages);
        self.port_types.extend(other.port_types);
        self.bindings.extend(other.bindings);
        self.services.extend(other.services);
        self.schemas.extend(other.schemas);
        self.unsupported_bindings.extend(other.unsupported_bindings);
    }
}
