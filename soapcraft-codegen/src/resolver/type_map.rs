//! The flat declaration arena and the `QualifiedName -> DeclId` index over
//! it (spec.md §4.3 "TypeMap").
//!
//! Declarations are never owned by each other; every cross-reference a
//! declaration carries (a `typeRef`, a `base`, a `GroupRef`) is a
//! [`DeclId`] handle into this arena rather than a nested value, so a
//! cyclic XSD type graph (spec.md §3 "the declaration graph may be
//! cyclic") never requires a self-referential Rust type during resolution
//! -- only once the emitter decides what indirection the target language
//! needs.

use crate::error::{CodegenError, Result};
use crate::parser::xsd::{AttributeGroupDecl, ComplexTypeDecl, ElementDecl, GroupDecl, SimpleTypeDecl};
use crate::parser::{ResolvedName, XML_SCHEMA_NS};
use std::collections::HashMap;

/// Stable integer handle into a [`TypeMap`]'s declaration arena.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct DeclId(pub u32);

/// The symbol space a name lives in. XSD keeps element names and type
/// names (simple or complex) in separate spaces -- `spec.md` §4.1: "of
/// different kinds (element vs type) is allowed" -- so a schema may
/// legally declare both an element and a type named `Order`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DeclKind {
    /// Top-level `xs:element`.
    Element,
    /// Top-level `xs:complexType` or `xs:simpleType` -- XSD gives both the
    /// same symbol space, so a complex and simple type cannot share a name
    /// either.
    Type,
    /// Top-level `xs:group`.
    Group,
    /// Top-level `xs:attributeGroup`.
    AttributeGroup,
}

/// One arena entry. `Primitive` is a seeded XSD built-in; the rest carry
/// the parsed declaration verbatim.
#[derive(Debug, Clone)]
pub enum Declaration {
    Primitive(ResolvedName),
    Element(ElementDecl),
    ComplexType(ComplexTypeDecl),
    SimpleType(SimpleTypeDecl),
    Group(GroupDecl),
    AttributeGroup(AttributeGroupDecl),
}

impl Declaration {
    pub fn name(&self) -> &ResolvedName {
        match self {
            Declaration::Primitive(name) => name,
            Declaration::Element(e) => &e.name,
            Declaration::ComplexType(c) => c.name.as_ref().expect(
                "top-level complexType declarations always carry a name (anonymous types are \
                 hoisted and assigned a synthesized name before reaching the resolver)",
            ),
            Declaration::SimpleType(s) => s.name.as_ref().expect(
                "top-level simpleType declarations always carry a name (anonymous types are \
                 hoisted and assigned a synthesized name before reaching the resolver)",
            ),
            Declaration::Group(g) => &g.name,
            Declaration::AttributeGroup(g) => &g.name,
        }
    }

    pub fn kind(&self) -> DeclKind {
        match self {
            Declaration::Primitive(_) | Declaration::ComplexType(_) | Declaration::SimpleType(_) => {
                DeclKind::Type
            }
            Declaration::Element(_) => DeclKind::Element,
            Declaration::Group(_) => DeclKind::Group,
            Declaration::AttributeGroup(_) => DeclKind::AttributeGroup,
        }
    }
}

/// Every XSD 1.0 built-in primitive (spec.md §4.3 step 1). Seeded under
/// the XML Schema namespace regardless of which prefix a document used to
/// spell it.
const BUILTIN_TYPES: &[&str] = &[
    "string",
    "boolean",
    "decimal",
    "float",
    "double",
    "duration",
    "dateTime",
    "time",
    "date",
    "gYearMonth",
    "gYear",
    "gMonthDay",
    "gDay",
    "gMonth",
    "hexBinary",
    "base64Binary",
    "anyURI",
    "QName",
    "NOTATION",
    "normalizedString",
    "token",
    "language",
    "Name",
    "NCName",
    "NMTOKEN",
    "NMTOKENS",
    "ID",
    "IDREF",
    "IDREFS",
    "ENTITY",
    "ENTITIES",
    "integer",
    "nonPositiveInteger",
    "negativeInteger",
    "long",
    "int",
    "short",
    "byte",
    "nonNegativeInteger",
    "unsignedLong",
    "unsignedInt",
    "unsignedShort",
    "unsignedByte",
    "positiveInteger",
    "anyType",
    "anySimpleType",
];

/// `QualifiedName -> Declaration` (spec.md §4.3 "TypeMap"), backed by a
/// flat arena so the dependency graph can hold plain integer edges.
#[derive(Debug, Default)]
pub struct TypeMap {
    decls: Vec<Declaration>,
    by_name: HashMap<(DeclKind, ResolvedName), DeclId>,
}

impl TypeMap {
    /// A map seeded with every XSD built-in primitive, nothing else.
    pub fn with_builtins() -> Self {
        let mut map = TypeMap::default();
        for local in BUILTIN_TYPES {
            let name = ResolvedName::new(XML_SCHEMA_NS, *local);
            let id = map.push(Declaration::Primitive(name.clone()));
            map.by_name.insert((DeclKind::Type, name), id);
        }
        map
    }

    fn push(&mut self, decl: Declaration) -> DeclId {
        let id = DeclId(self.decls.len() as u32);
        self.decls.push(decl);
        id
    }

    /// Insert a top-level declaration. `CodegenError::DuplicateDefinition`
    /// if a declaration of the same kind and name already exists
    /// (spec.md §4.3 step 2); this is reported immediately rather than
    /// batched, unlike unresolved references.
    pub fn insert(&mut self, decl: Declaration) -> Result<DeclId> {
        let kind = decl.kind();
        let name = decl.name().clone();
        if self.by_name.contains_key(&(kind, name.clone())) {
            return Err(CodegenError::DuplicateDefinition {
                name: name.to_string(),
                kind: format!("{kind:?}"),
            });
        }
        let id = self.push(decl);
        self.by_name.insert((kind, name), id);
        Ok(id)
    }

    pub fn lookup(&self, kind: DeclKind, name: &ResolvedName) -> Option<DeclId> {
        self.by_name.get(&(kind, name.clone())).copied()
    }

    pub fn get(&self, id: DeclId) -> &Declaration {
        &self.decls[id.0 as usize]
    }

    pub fn len(&self) -> usize {
        self.decls.len()
    }

    pub fn is_empty(&self) -> bool {
        self.decls.is_empty()
    }

    pub fn ids(&self) -> impl Iterator<Item = DeclId> {
        (0..self.decls.len() as u32).map(DeclId)
    }

    pub fn is_builtin(&self, id: DeclId) -> bool {
        matches!(self.get(id), Declaration::Primitive(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builtins_are_seeded_under_the_xml_schema_namespace() {
        let map = TypeMap::with_builtins();
        let id = map
            .lookup(DeclKind::Type, &ResolvedName::new(XML_SCHEMA_NS, "string"))
            .unwrap();
        assert!(map.is_builtin(id));
    }

    #[test]
    fn element_and_type_of_the_same_name_do_not_collide() {
        let mut map = TypeMap::with_builtins();
        let name = ResolvedName::unqualified("Order");
        map.insert(Declaration::Element(ElementDecl {
            name: name.clone(),
            content: crate::parser::xsd::ElementContent::None,
            nillable: false,
            occurs: Default::default(),
            is_abstract: false,
            substitution_group: None,
        }))
        .unwrap();
        map.insert(Declaration::ComplexType(ComplexTypeDecl {
            name: Some(name),
            ..Default::default()
        }))
        .unwrap();
        assert_eq!(map.len(), BUILTIN_TYPES.len() + 2);
    }

    #[test]
    fn duplicate_type_name_is_rejected() {
        let mut map = TypeMap::with_builtins();
        let name = ResolvedName::unqualified("Order");
        map.insert(Declaration::ComplexType(ComplexTypeDecl {
            name: Some(name.clone()),
            ..Default::default()
        }))
        .unwrap();
        let err = map
            .insert(Declaration::SimpleType(SimpleTypeDecl {
                name: Some(name),
                content: crate::parser::xsd::SimpleTypeContent::Restriction {
                    base: ResolvedName::new(XML_SCHEMA_NS, "string"),
                    facets: Vec::new(),
                },
            }))
            .unwrap_err();
        assert!(matches!(err, CodegenError::DuplicateDefinition { .. }));
    }
}
