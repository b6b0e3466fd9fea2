//! Identifier mangling shared by the Code IR Builder and the emitter
//! (spec.md §4.4 "Name mangling": "strip namespace, camel-case local-name,
//! capitalize leading letter for type names, prefix with `_` if a language
//! keyword. Collisions after mangling append a namespace-hash suffix.").
//!
//! The teacher's `generator/mod.rs` -- the file that would define
//! `to_pascal_case`/`to_snake_case`/`sanitize_identifier` -- is missing
//! from the reference copy entirely, even though `type_mapper.rs` and
//! `rust_codegen.rs` both call into it. These are reauthored here from
//! those call sites: `to_pascal_case("userName")` must read `"UserName"`,
//! `to_snake_case` the reverse, and `sanitize_identifier` must change a
//! name only when it collides with a Rust keyword or starts with a digit.

const RUST_KEYWORDS: &[&str] = &[
    "as", "break", "const", "continue", "crate", "dyn", "else", "enum", "extern", "false", "fn",
    "for", "if", "impl", "in", "let", "loop", "match", "mod", "move", "mut", "pub", "ref",
    "return", "self", "Self", "static", "struct", "super", "trait", "true", "type", "unsafe",
    "use", "where", "while", "async", "await", "abstract", "become", "box", "do", "final",
    "macro", "override", "priv", "try", "typeof", "unsized", "virtual", "yield", "union",
];

fn is_word_boundary(c: char) -> bool {
    c == '_' || c == '-' || c == '.' || c == ':' || c == ' '
}

/// `userName` / `user_name` / `UserName` -> `UserName`.
pub fn to_pascal_case(input: &str) -> String {
    let mut out = String::new();
    let mut capitalize_next = true;
    for ch in input.chars() {
        if is_word_boundary(ch) {
            capitalize_next = true;
            continue;
        }
        if capitalize_next {
            out.extend(ch.to_uppercase());
            capitalize_next = false;
        } else {
            out.push(ch);
        }
    }
    if out.is_empty() {
        "Unnamed".to_string()
    } else {
        out
    }
}

/// `userName` / `UserName` -> `user_name`.
pub fn to_snake_case(input: &str) -> String {
    let mut out = String::new();
    let mut prev_is_lower_or_digit = false;
    for ch in input.chars() {
        if is_word_boundary(ch) {
            if !out.is_empty() && !out.ends_with('_') {
                out.push('_');
            }
            prev_is_lower_or_digit = false;
            continue;
        }
        if ch.is_uppercase() {
            if prev_is_lower_or_digit {
                out.push('_');
            }
            out.extend(ch.to_lowercase());
            prev_is_lower_or_digit = false;
        } else {
            out.push(ch);
            prev_is_lower_or_digit = ch.is_lowercase() || ch.is_ascii_digit();
        }
    }
    if out.is_empty() {
        "unnamed".to_string()
    } else {
        out
    }
}

/// Escapes a mangled identifier that would otherwise collide with a Rust
/// keyword, or start with a digit (not a valid leading character).
pub fn sanitize_identifier(ident: &str) -> String {
    if ident.is_empty() {
        return "_unnamed".to_string();
    }
    let starts_with_digit = ident.chars().next().is_some_and(|c| c.is_ascii_digit());
    if starts_with_digit {
        return format!("_{ident}");
    }
    if RUST_KEYWORDS.contains(&ident) {
        return format!("_{ident}");
    }
    ident.to_string()
}

/// A short, stable suffix derived from a namespace URI, appended to a
/// mangled name that collides with one already assigned from a different
/// namespace (spec.md §4.4: "Collisions after mangling append a
/// namespace-hash suffix."). FNV-1a: simple, dependency-free, and stable
/// across runs (required for emitter determinism, spec.md §8).
pub fn namespace_hash_suffix(namespace: &str) -> String {
    let mut hash: u32 = 0x811c_9dc5;
    for byte in namespace.bytes() {
        hash ^= byte as u32;
        hash = hash.wrapping_mul(0x0100_0193);
    }
    format!("{:06x}", hash & 0x00ff_ffff)
}

/// Tracks mangled type names already handed out, so a second type whose
/// local name mangles to the same identifier (but lives in a different
/// namespace) gets a namespace-hash suffix instead of silently shadowing
/// the first.
#[derive(Debug, Default)]
pub struct NameRegistry {
    taken: std::collections::HashSet<String>,
    /// Operator-supplied namespace -> mangled-prefix overrides, set via the
    /// CLI's `--namespace uri=prefix` flag (spec.md §6) instead of the
    /// default namespace-hash suffix.
    namespace_prefixes: std::collections::HashMap<String, String>,
}

impl NameRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Like [`Self::new`], but disambiguates collisions for the given
    /// namespaces with an operator-chosen prefix instead of a hash suffix.
    pub fn with_overrides(namespace_prefixes: std::collections::HashMap<String, String>) -> Self {
        Self {
            taken: std::collections::HashSet::new(),
            namespace_prefixes,
        }
    }

    /// Registers `local_name` mangled to PascalCase under `namespace`,
    /// appending a namespace-hash suffix (or the operator's override
    /// prefix for that namespace, if one was supplied) if the plain
    /// mangling is already taken by an earlier, different-namespace type.
    pub fn register_type_name(&mut self, namespace: &str, local_name: &str) -> String {
        let base = to_pascal_case(local_name);
        if self.taken.insert(base.clone()) {
            return base;
        }
        let suffix = self
            .namespace_prefixes
            .get(namespace)
            .cloned()
            .unwrap_or_else(|| namespace_hash_suffix(namespace));
        let disambiguated = format!("{base}_{suffix}");
        self.taken.insert(disambiguated.clone());
        disambiguated
    }
}
