//! XML ingestion: lexical QNames, namespace scopes, and the XSD/WSDL parsers.
//!
//! The two parsers in this module (`xsd`, `wsdl`) only ever produce
//! `ResolvedName`-keyed declarations that are later woven together by
//! [`crate::resolver`]. Nothing in this module does cross-document lookup;
//! that is [`import_resolver`]'s job.

pub mod import_resolver;
pub mod wsdl;
pub mod xsd;

pub use import_resolver::{DocumentSource, FsDocumentSource, ImportResolver};
pub use wsdl::parser::parse_wsdl;
pub use wsdl::*;
pub use xsd::parser::parse_schema;
pub use xsd::*;

use std::collections::HashMap;
use std::fmt;

/// The lexical form of a qualified name as written in a document, e.g.
/// `"tns:Foo"` or `"xs:string"`. A bare `QName` cannot be compared for
/// structural equality across documents: that requires resolving it
/// against the `NamespaceScope` in effect where it was written.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub struct QName(pub String);

impl QName {
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// The prefix in front of the first `:`, or `None` for an unprefixed name.
    pub fn prefix(&self) -> Option<&str> {
        self.0.split_once(':').map(|(p, _)| p)
    }

    /// The local part after the first `:`, or the whole lexical value if
    /// there is no prefix.
    pub fn local_name(&self) -> &str {
        match self.0.split_once(':') {
            Some((_, local)) => local,
            None => &self.0,
        }
    }

    /// Resolve the prefix against `scope`, producing the structural
    /// `(namespace-URI, local-name)` pair spec.md §3 calls `QualifiedName`.
    pub fn resolve(&self, scope: &NamespaceScope) -> ResolvedName {
        let namespace = match self.prefix() {
            Some(prefix) => scope.resolve_prefix(prefix).unwrap_or_default(),
            None => scope.default_namespace().unwrap_or_default(),
        };
        ResolvedName {
            namespace,
            local: self.local_name().to_string(),
        }
    }
}

impl From<&str> for QName {
    fn from(value: &str) -> Self {
        QName::new(value)
    }
}

impl From<String> for QName {
    fn from(value: String) -> Self {
        QName::new(value)
    }
}

impl fmt::Display for QName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// The structural `(namespace-URI, local-name)` pair. Equality is
/// structural per spec.md §3: two `ResolvedName`s are equal iff both
/// fields match, namespace `""` included.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ResolvedName {
    pub namespace: String,
    pub local: String,
}

impl ResolvedName {
    pub fn new(namespace: impl Into<String>, local: impl Into<String>) -> Self {
        Self {
            namespace: namespace.into(),
            local: local.into(),
        }
    }

    /// A name with no namespace, used for synthesized anonymous-type names
    /// before they are assigned a home namespace.
    pub fn unqualified(local: impl Into<String>) -> Self {
        Self::new(String::new(), local)
    }
}

impl fmt::Display for ResolvedName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.namespace.is_empty() {
            write!(f, "{}", self.local)
        } else {
            write!(f, "{{{}}}{}", self.namespace, self.local)
        }
    }
}

pub const XML_SCHEMA_NS: &str = "http://www.w3.org/2001/XMLSchema";
pub const XML_NS: &str = "http://www.w3.org/XML/1998/namespace";

/// The prefix -> namespace-URI bindings in scope at a point in the
/// document, plus the unprefixed default namespace. Every scope is seeded
/// with the fixed `xml` prefix; schema-rooted scopes additionally seed
/// `xs`/`xsd` so documents that rely on the conventional (but not
/// required) prefix still resolve built-ins correctly even when the
/// document itself never declares them.
#[derive(Debug, Clone, Default)]
pub struct NamespaceScope {
    prefixes: HashMap<String, String>,
    default_namespace: Option<String>,
}

impl NamespaceScope {
    pub fn new() -> Self {
        let mut prefixes = HashMap::new();
        prefixes.insert("xml".to_string(), XML_NS.to_string());
        Self {
            prefixes,
            default_namespace: None,
        }
    }

    /// A scope seeded with the conventional `xs`/`xsd` prefixes, used when
    /// parsing XSD documents that may rely on them without an explicit
    /// `xmlns:xs` declaration (non-conformant but common in the wild).
    pub fn with_schema_defaults() -> Self {
        let mut scope = Self::new();
        scope
            .prefixes
            .insert("xs".to_string(), XML_SCHEMA_NS.to_string());
        scope
            .prefixes
            .insert("xsd".to_string(), XML_SCHEMA_NS.to_string());
        scope
    }

    pub fn declare_prefix(&mut self, prefix: impl Into<String>, uri: impl Into<String>) {
        self.prefixes.insert(prefix.into(), uri.into());
    }

    pub fn declare_default(&mut self, uri: impl Into<String>) {
        self.default_namespace = Some(uri.into());
    }

    pub fn resolve_prefix(&self, prefix: &str) -> Option<String> {
        self.prefixes.get(prefix).cloned()
    }

    pub fn default_namespace(&self) -> Option<String> {
        self.default_namespace.clone()
    }

    /// Child scope that inherits everything from `self` but may add/shadow
    /// bindings declared on a nested element.
    pub fn child(&self) -> Self {
        self.clone()
    }
}
