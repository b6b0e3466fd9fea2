//! Attribute reading for the `wsdl:definitions` root element.

use crate::error::Result;
use crate::parser::xsd::schema_attributes::get_attr;
use quick_xml::events::BytesStart;

/// Just the `targetNamespace`; the `xmlns:*` declarations on this element
/// are already folded into the scope handed to every child parser.
pub fn parse_definitions_attrs(root: &BytesStart<'static>) -> Result<Option<String>> {
    get_attr(root, "targetNamespace")
}
