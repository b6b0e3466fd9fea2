//! Error types for SOAP client code generation

use crate::parser::ResolvedName;
use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Result type for code generation operations
pub type Result<T> = std::result::Result<T, CodegenError>;

/// Errors that can occur during SOAP client code generation
#[derive(Error, Debug)]
pub enum CodegenError {
    /// Failed to read a file or fetch an import
    #[error("Failed to read '{path}': {source}")]
    IoError {
        path: String,
        #[source]
        source: io::Error,
    },

    /// Failed to write a file
    #[error("Failed to write file '{path}': {source}")]
    FileWrite {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// XML parsing error
    #[error("XML parsing error: {0}")]
    XmlParse(String),

    /// WSDL parsing error
    #[error("WSDL parsing error: {0}")]
    WsdlParse(String),

    /// XSD schema parsing error
    #[error("XSD schema parsing error: {0}")]
    XsdParse(String),

    /// Missing required element in WSDL
    #[error("Missing required WSDL element: {element}")]
    MissingWsdlElement { element: String },

    /// Missing required attribute in WSDL
    #[error("Missing required attribute '{attribute}' in element '{element}'")]
    MissingAttribute { element: String, attribute: String },

    /// Invalid WSDL structure
    #[error("Invalid WSDL structure: {0}")]
    InvalidWsdl(String),

    /// Invalid XSD schema
    #[error("Invalid XSD schema: {0}")]
    InvalidSchema(String),

    /// Unsupported WSDL feature
    #[error("Unsupported WSDL feature: {feature}")]
    UnsupportedFeature { feature: String },

    /// Unsupported SOAP binding style (e.g. rpc/encoded)
    #[error("Unsupported SOAP binding style '{style}' on binding '{binding}'")]
    UnsupportedBindingStyle { binding: String, style: String },

    /// Unsupported XSD type
    #[error("Unsupported XSD type: {type_name}")]
    UnsupportedType { type_name: String },

    /// Type not found in schema
    #[error("Type '{type_name}' not found in schema")]
    TypeNotFound { type_name: String },

    /// Message not found
    #[error("Message '{message_name}' not found")]
    MessageNotFound { message_name: String },

    /// Binding not found
    #[error("Binding '{binding_name}' not found")]
    BindingNotFound { binding_name: String },

    /// Port type not found
    #[error("Port type '{port_type_name}' not found")]
    PortTypeNotFound { port_type_name: String },

    /// Missing configuration field
    #[error("Missing required configuration field: {field}")]
    MissingConfiguration { field: String },

    /// Code generation error
    #[error("Code generation failed: {0}")]
    CodeGeneration(String),

    /// Invalid identifier
    #[error("Invalid Rust identifier: '{identifier}'")]
    InvalidIdentifier { identifier: String },

    /// Namespace resolution error
    #[error("Failed to resolve namespace prefix '{prefix}'")]
    NamespaceResolution { prefix: String },

    /// Import/Include error
    #[error("Failed to process import/include from '{uri}': {reason}")]
    ImportError { uri: String, reason: String },

    /// Multiple definitions with same name and kind
    #[error("Duplicate definition: '{name}' ({kind}) is defined multiple times")]
    DuplicateDefinition { name: String, kind: String },

    /// A typeRef/MessageRef/binding/port reference that never resolved to a
    /// declaration, surfaced in a batch after a full resolution pass
    /// (spec.md §7 propagation policy: reported together, not one at a time).
    #[error("Unresolved reference to '{qname}', referenced from '{referrer}'")]
    UnresolvedReference { qname: String, referrer: String },

    /// Several unresolved references collected in one resolution pass.
    #[error("{} unresolved reference(s): {}", .0.len(), join_unresolved(.0))]
    UnresolvedReferences(Vec<(ResolvedName, String)>),

    /// The emitter was asked to render an IR node it has no rule for. This
    /// should be unreachable if the resolver accepted its input; a defect,
    /// not a recoverable condition.
    #[error("Emitter defect: cannot render IR node '{ir_node}': {reason}")]
    EmitError { ir_node: String, reason: String },

    /// Generic error with context
    #[error("{context}: {source}")]
    WithContext {
        context: String,
        #[source]
        source: Box<CodegenError>,
    },

    /// Other errors
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

fn join_unresolved(refs: &[(ResolvedName, String)]) -> String {
    refs.iter()
        .map(|(qn, referrer)| format!("{qn} (from {referrer})"))
        .collect::<Vec<_>>()
        .join(", ")
}

impl CodegenError {
    /// Add context to an error
    pub fn with_context(self, context: impl Into<String>) -> Self {
        CodegenError::WithContext {
            context: context.into(),
            source: Box::new(self),
        }
    }
}

impl From<quick_xml::Error> for CodegenError {
    fn from(err: quick_xml::Error) -> Self {
        CodegenError::XmlParse(err.to_string())
    }
}

impl From<std::str::Utf8Error> for CodegenError {
    fn from(err: std::str::Utf8Error) -> Self {
        CodegenError::XmlParse(format!("UTF-8 decoding error: {}", err))
    }
}

impl From<std::string::FromUtf8Error> for CodegenError {
    fn from(err: std::string::FromUtf8Error) -> Self {
        CodegenError::XmlParse(format!("UTF-8 decoding error: {}", err))
    }
}

// Helper macro for creating errors with context
#[macro_export]
macro_rules! codegen_err {
    ($variant:ident, $($arg:tt)*) => {
        $crate::error::CodegenError::$variant(format!($($arg)*))
    };
}
