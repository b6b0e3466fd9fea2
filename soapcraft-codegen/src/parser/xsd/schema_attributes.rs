//! Attribute and namespace-declaration helpers shared by every XSD node
//! parser: reading a plain attribute value, reading a `QName`-valued
//! attribute and resolving it against the scope in force, and extending a
//! `NamespaceScope` with the `xmlns`/`xmlns:*` declarations carried on a
//! start tag.

use crate::error::{CodegenError, Result};
use crate::parser::xsd::{MaxOccurs, Occurs};
use crate::parser::{NamespaceScope, QName, ResolvedName};
use quick_xml::events::BytesStart;

pub fn local_name_str(start: &BytesStart) -> String {
    String::from_utf8_lossy(start.local_name().as_ref()).into_owned()
}

pub fn get_attr(start: &BytesStart, name: &str) -> Result<Option<String>> {
    for attr in start.attributes() {
        let attr = attr.map_err(|e| CodegenError::XsdParse(e.to_string()))?;
        if attr.key.as_ref() == name.as_bytes() {
            let value = attr
                .decode_and_unescape_value(&Default::default())
                .map_err(|e| CodegenError::XsdParse(e.to_string()))?;
            return Ok(Some(value.into_owned()));
        }
    }
    Ok(None)
}

pub fn require_attr(start: &BytesStart, name: &str, element: &str) -> Result<String> {
    get_attr(start, name)?.ok_or_else(|| CodegenError::MissingAttribute {
        element: element.to_string(),
        attribute: name.to_string(),
    })
}

/// Build the scope visible *inside* `start`, by extending `parent` with
/// whatever `xmlns`/`xmlns:*` declarations appear on this element.
pub fn child_scope(start: &BytesStart, parent: &NamespaceScope) -> Result<NamespaceScope> {
    let mut scope = parent.child();
    for attr in start.attributes() {
        let attr = attr.map_err(|e| CodegenError::XsdParse(e.to_string()))?;
        let key = String::from_utf8_lossy(attr.key.as_ref()).into_owned();
        if key == "xmlns" {
            let value = attr
                .decode_and_unescape_value(&Default::default())
                .map_err(|e| CodegenError::XsdParse(e.to_string()))?;
            scope.declare_default(value.into_owned());
        } else if let Some(prefix) = key.strip_prefix("xmlns:") {
            let value = attr
                .decode_and_unescape_value(&Default::default())
                .map_err(|e| CodegenError::XsdParse(e.to_string()))?;
            scope.declare_prefix(prefix.to_string(), value.into_owned());
        }
    }
    Ok(scope)
}

/// Read a `QName`-valued attribute and resolve it against `scope`.
pub fn get_qname_attr(
    start: &BytesStart,
    name: &str,
    scope: &NamespaceScope,
) -> Result<Option<ResolvedName>> {
    Ok(get_attr(start, name)?.map(|value| QName::new(value).resolve(scope)))
}

pub fn get_bool_attr(start: &BytesStart, name: &str, default: bool) -> Result<bool> {
    Ok(get_attr(start, name)?
        .map(|v| v == "true" || v == "1")
        .unwrap_or(default))
}

/// `minOccurs`/`maxOccurs`, defaulting to `(1, 1)` when absent.
pub fn get_occurs(start: &BytesStart) -> Result<Occurs> {
    let min = get_attr(start, "minOccurs")?
        .and_then(|v| v.parse().ok())
        .unwrap_or(1);
    let max = get_attr(start, "maxOccurs")?
        .map(|v| MaxOccurs::from_attr(&v))
        .unwrap_or_default();
    Ok(Occurs { min, max })
}
