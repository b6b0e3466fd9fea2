//! Renders IR nodes to Rust source text.
//!
//! Struct/enum bodies are built as `proc_macro2::TokenStream`s and
//! stringified (spec.md §2's commitment to a token-stream-based emitter);
//! the surrounding doc comments, impls and operation methods stay plain
//! `format!` templates, matching the teacher's `generator/rust_codegen.rs`
//! shape (derive-selection policy, serde-rename-on-sanitize, per-operation
//! doc comments) since that part of the teacher's code is reused almost
//! verbatim, just retargeted from a `WsdlModel`/`ComplexType` pair to an
//! `ir::IrStruct`.

use crate::error::{CodegenError, Result};
use crate::generator::type_mapper::render_field_type;
use crate::ir::{
    Cardinality, IrAlias, IrEnum, IrList, IrModule, IrNode, IrOp, IrServiceClient, IrStringEnum,
    IrStruct, TypeRef,
};
use proc_macro2::TokenStream;
use quote::{format_ident, quote};
use std::str::FromStr;

fn type_tokens(rendered: &str) -> Result<TokenStream> {
    TokenStream::from_str(rendered).map_err(|e| CodegenError::EmitError {
        ir_node: rendered.to_string(),
        reason: format!("rendered type did not parse as Rust tokens: {e}"),
    })
}

fn ident(name: &str) -> proc_macro2::Ident {
    format_ident!("{}", name)
}

/// `Debug, Clone, PartialEq` always; `Default` only when every field is
/// optional or the struct has no fields at all (teacher's
/// `generate_complex_type`: "Derives - add Default for empty types").
fn struct_derive_line(has_required_field: bool) -> String {
    if has_required_field {
        "#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]".to_string()
    } else {
        "#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]".to_string()
    }
}

pub fn generate_struct(module: &IrModule, s: &IrStruct) -> Result<String> {
    let mut out = String::new();
    out.push_str(&format!("/// Generated from XSD complex type `{}`.\n", s.name));

    let has_required_field = s
        .fields
        .iter()
        .any(|f| matches!(f.cardinality, Cardinality::RequiredSingle | Cardinality::RequiredList));
    out.push_str(&struct_derive_line(has_required_field));
    out.push('\n');

    let struct_ident = ident(&s.name);
    let mut field_tokens = Vec::new();
    for field in &s.fields {
        let field_ident = ident(&field.rust_name);
        let rendered_type = render_field_type(module, &field.type_ref, field.cardinality, field.needs_indirection);
        let ty = type_tokens(&rendered_type)?;
        if field.rust_name != field.xml_name {
            let rename = &field.xml_name;
            field_tokens.push(quote! {
                #[serde(rename = #rename)]
                pub #field_ident: #ty,
            });
        } else {
            field_tokens.push(quote! {
                pub #field_ident: #ty,
            });
        }
    }
    let body = quote! {
        pub struct #struct_ident {
            #(#field_tokens)*
        }
    };
    out.push_str(&body.to_string());
    out.push('\n');
    out.push_str(&xml_codec_bridge(&s.name));
    Ok(out)
}

pub fn generate_enum(module: &IrModule, e: &IrEnum) -> Result<String> {
    let mut out = String::new();
    out.push_str(&format!("/// Generated from XSD choice/union `{}`.\n", e.name));
    out.push_str("#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]\n");

    let enum_ident = ident(&e.name);
    let mut variant_tokens = Vec::new();
    for variant in &e.variants {
        let variant_ident = ident(&variant.name);
        match &variant.payload {
            Some(type_ref) => {
                let rendered = render_field_type(module, type_ref, Cardinality::RequiredSingle, false);
                let ty = type_tokens(&rendered)?;
                variant_tokens.push(quote! { #variant_ident(#ty), });
            }
            None => variant_tokens.push(quote! { #variant_ident, }),
        }
    }
    let body = quote! {
        pub enum #enum_ident {
            #(#variant_tokens)*
        }
    };
    out.push_str(&body.to_string());
    out.push('\n');
    out.push_str(&xml_codec_bridge(&e.name));
    Ok(out)
}

pub fn generate_string_enum(se: &IrStringEnum) -> Result<String> {
    let mut out = String::new();
    out.push_str(&format!(
        "/// Generated from XSD simple type `{}` (enumeration restriction).\n",
        se.name
    ));
    out.push_str("#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]\n");

    let enum_ident = ident(&se.name);
    let mut variant_tokens = Vec::new();
    for case in &se.cases {
        let variant_name = crate::naming::to_pascal_case(case);
        let variant_ident = ident(&variant_name);
        variant_tokens.push(quote! {
            #[serde(rename = #case)]
            #variant_ident,
        });
    }
    let body = quote! {
        pub enum #enum_ident {
            #(#variant_tokens)*
        }
    };
    out.push_str(&body.to_string());
    out.push('\n');
    out.push_str(&xml_codec_bridge(&se.name));
    Ok(out)
}

pub fn generate_alias(module: &IrModule, a: &IrAlias) -> Result<String> {
    let rendered = render_field_type(module, &a.target, Cardinality::RequiredSingle, false);
    Ok(format!(
        "/// Generated from XSD simple type `{}` (restriction, no enumeration).\npub type {} = {};\n",
        a.name, a.name, rendered
    ))
}

pub fn generate_list(module: &IrModule, l: &IrList) -> Result<String> {
    let rendered = render_field_type(module, &l.element, Cardinality::RequiredSingle, false);
    Ok(format!(
        "/// Generated from XSD `xs:list` item type `{}`.\npub type {} = Vec<{}>;\n",
        l.name, l.name, rendered
    ))
}

/// The `(toXML, fromXML)` bridge named in spec.md §9: generated code
/// speaks in nominal types, the runtime speaks in XML text. Every emitted
/// type gets the same two methods, built on the `serde`/`quick-xml`
/// derive the struct/enum already carries.
fn xml_codec_bridge(type_name: &str) -> String {
    format!(
        "impl {type_name} {{\n    /// Serializes this value to its XML element representation.\n    pub fn to_xml(&self) -> soapcraft_runtime::SoapResult<String> {{\n        soapcraft_runtime::SoapEnvelope::serialize_to_xml(self)\n    }}\n\n    /// Deserializes an XML element into this type.\n    pub fn from_xml(xml: &str) -> soapcraft_runtime::SoapResult<Self> {{\n        quick_xml::de::from_str(xml).map_err(soapcraft_runtime::SoapError::from)\n    }}\n}}\n"
    )
}

/// Generates the service client struct and one method per operation
/// (spec.md §4.5: "accepts the input struct, builds a SOAP envelope via
/// the runtime, invokes the transport with the operation's soapAction,
/// and parses the response body into the output struct"). Grounded on
/// the teacher's `generate_operation_method`, fixed to call the runtime's
/// real 5-argument `call_with_soap_action` (the teacher's generated call
/// sites only ever pass 4) per the recorded REDESIGN FLAG decision.
pub fn generate_service_client(module: &IrModule, client: &IrServiceClient) -> Result<String> {
    let mut out = String::new();
    out.push_str(&format!("/// Generated SOAP client for the `{}` service.\n", client.name));
    out.push_str("#[derive(Debug, Clone)]\n");
    out.push_str(&format!("pub struct {} {{\n", client.name));
    out.push_str("    client: soapcraft_runtime::SoapClient,\n");
    out.push_str("}\n\n");

    let target_namespace = client.target_namespace.clone().unwrap_or_default();
    out.push_str(&format!(
        "const {}_TARGET_NAMESPACE: &str = \"{}\";\n\n",
        crate::naming::to_snake_case(&client.name).to_uppercase(),
        target_namespace
    ));

    out.push_str(&format!("impl {} {{\n", client.name));
    let endpoint = client.endpoint.clone().unwrap_or_default();
    out.push_str(&format!(
        "    /// Creates a new client bound to `endpoint` (pass \"{endpoint}\" for the address recorded in the WSDL, or override it)."
    ));
    out.push_str("\n    pub fn new(endpoint: impl Into<String>) -> Self {\n");
    out.push_str("        Self {\n");
    out.push_str("            client: soapcraft_runtime::SoapClient::new(endpoint),\n");
    out.push_str("        }\n    }\n\n");

    for op in &client.operations {
        out.push_str(&generate_operation_method(module, client, op)?);
        out.push('\n');
    }
    out.push_str("}\n");
    Ok(out)
}

fn generate_operation_method(module: &IrModule, client: &IrServiceClient, op: &IrOp) -> Result<String> {
    let mut out = String::new();
    out.push_str(&format!("    /// Calls the `{}` operation.\n", op.name));
    out.push_str("    #[cfg_attr(feature = \"tracing\", tracing::instrument(skip(self, request)))]\n");

    let input_type = op
        .input
        .as_ref()
        .map(|t| render_type_ref_bare(module, t))
        .unwrap_or_else(|| "()".to_string());
    let output_type = op
        .output
        .as_ref()
        .map(|t| render_type_ref_bare(module, t))
        .unwrap_or_else(|| "()".to_string());

    let namespace_const = format!("{}_TARGET_NAMESPACE", crate::naming::to_snake_case(&client.name).to_uppercase());
    let soap_action = op
        .soap_action
        .as_deref()
        .map(|a| format!("Some(\"{a}\")"))
        .unwrap_or_else(|| "None".to_string());

    out.push_str(&format!(
        "    pub async fn {}(&self, request: {input_type}) -> soapcraft_runtime::SoapResult<{output_type}> {{\n",
        op.method_name
    ));
    out.push_str(&format!(
        "        self.client.call_with_soap_action(\"{}\", {soap_action}, Some({namespace_const}), true, &request).await\n",
        op.name
    ));
    out.push_str("    }\n");
    Ok(out)
}

fn render_type_ref_bare(module: &IrModule, type_ref: &TypeRef) -> String {
    render_field_type(module, type_ref, Cardinality::RequiredSingle, false)
}

/// Renders an entire [`IrModule`] to one Rust source file (the contents of
/// `soap_client.rs`, mirroring the teacher's `SoapClientGenerator::generate`
/// output target).
pub fn generate_client_code(module: &IrModule) -> Result<String> {
    let mut out = String::new();
    out.push_str("// @generated by soapcraft-codegen. Do not edit by hand.\n");
    out.push_str("#![allow(dead_code, clippy::all)]\n");
    out.push_str("use serde::{Deserialize, Serialize};\n\n");

    for node in &module.nodes {
        let rendered = match node {
            IrNode::Struct(s) => generate_struct(module, s)?,
            IrNode::Enum(e) => generate_enum(module, e)?,
            IrNode::Alias(a) => generate_alias(module, a)?,
            IrNode::StringEnum(se) => generate_string_enum(se)?,
            IrNode::List(l) => generate_list(module, l)?,
            IrNode::ServiceClient(c) => generate_service_client(module, c)?,
        };
        out.push_str(&rendered);
        out.push('\n');
    }

    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ir::{Cardinality, IrField, Primitive};
    use crate::resolver::DeclId;
    use std::collections::HashMap;

    fn module_with(name: &str, id: DeclId) -> IrModule {
        let mut names = HashMap::new();
        names.insert(id, name.to_string());
        IrModule {
            nodes: Vec::new(),
            names,
        }
    }

    #[test]
    fn struct_with_required_field_omits_default_derive() {
        let module = module_with("Person", DeclId(0));
        let s = IrStruct {
            decl_id: DeclId(0),
            name: "Person".to_string(),
            fields: vec![IrField {
                xml_name: "firstName".to_string(),
                rust_name: "first_name".to_string(),
                type_ref: TypeRef::Primitive(Primitive::String),
                cardinality: Cardinality::RequiredSingle,
                needs_indirection: false,
            }],
        };
        let code = generate_struct(&module, &s).unwrap();
        assert!(code.contains("pub struct Person"));
        assert!(code.contains("pub first_name : String") || code.contains("pub first_name: String"));
        assert!(!code.contains("Default"));
        assert!(code.contains("serde (rename = \"firstName\")") || code.contains("serde(rename = \"firstName\")"));
    }

    #[test]
    fn empty_struct_gets_default_derive() {
        let module = module_with("Empty", DeclId(0));
        let s = IrStruct {
            decl_id: DeclId(0),
            name: "Empty".to_string(),
            fields: Vec::new(),
        };
        let code = generate_struct(&module, &s).unwrap();
        assert!(code.contains("Default"));
    }

    #[test]
    fn string_enum_carries_rename_per_case() {
        let se = IrStringEnum {
            decl_id: DeclId(0),
            name: "Color".to_string(),
            cases: vec!["red".to_string(), "green".to_string()],
        };
        let code = generate_string_enum(&se).unwrap();
        assert!(code.contains("Red"));
        assert!(code.contains("Green"));
        assert!(code.contains("rename = \"red\""));
    }

    #[test]
    fn operation_method_passes_five_arguments() {
        let module = module_with("Calculator", DeclId(0));
        let client = IrServiceClient {
            name: "Calculator".to_string(),
            target_namespace: Some("urn:calc".to_string()),
            endpoint: Some("http://example.test/calc".to_string()),
            soap_version: crate::parser::wsdl::SoapVersion::Soap11,
            operations: vec![IrOp {
                name: "Add".to_string(),
                method_name: "add".to_string(),
                soap_action: Some("urn:calc/Add".to_string()),
                input: Some(TypeRef::Primitive(Primitive::I32)),
                output: Some(TypeRef::Primitive(Primitive::I32)),
                faults: Vec::new(),
                style: crate::parser::wsdl::OperationStyle::RequestResponse,
            }],
        };
        let code = generate_service_client(&module, &client).unwrap();
        assert!(code.contains("call_with_soap_action"));
        let call_line = code.lines().find(|l| l.contains("call_with_soap_action")).unwrap();
        assert_eq!(call_line.matches(',').count(), 4);
    }

    #[test]
    fn emitter_is_deterministic_across_independent_runs() {
        // Two independent parse -> resolve -> build -> emit passes over
        // identical input must produce byte-identical output: nothing in
        // the pipeline (name mangling, SCC ordering, field rendering) may
        // depend on iteration order that varies run to run (e.g. a
        // HashMap iterated without a stable sort).
        let xml = r#"<definitions xmlns="http://schemas.xmlsoap.org/wsdl/"
                       xmlns:xs="http://www.w3.org/2001/XMLSchema"
                       xmlns:tns="urn:det" targetNamespace="urn:det">
                       <types>
                         <xs:schema targetNamespace="urn:det" xmlns:tns="urn:det">
                           <xs:complexType name="Outer">
                             <xs:sequence>
                               <xs:element name="inner" type="tns:Inner"/>
                               <xs:element name="other" type="tns:Other"/>
                             </xs:sequence>
                           </xs:complexType>
                           <xs:complexType name="Inner">
                             <xs:sequence>
                               <xs:element name="value" type="xs:string"/>
                             </xs:sequence>
                           </xs:complexType>
                           <xs:complexType name="Other">
                             <xs:sequence>
                               <xs:element name="value" type="xs:int"/>
                             </xs:sequence>
                           </xs:complexType>
                         </xs:schema>
                       </types>
                     </definitions>"#;

        let run = || {
            let description = crate::parser::wsdl::parser::parse_wsdl(xml).unwrap();
            let resolved = crate::resolver::resolve(description).unwrap();
            let module = crate::ir::build(&resolved).unwrap();
            generate_client_code(&module).unwrap()
        };

        let first = run();
        let second = run();
        assert_eq!(first, second, "identical IR input must render byte-identical output");
    }
}
