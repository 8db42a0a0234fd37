//! Identifier derivation for generated types, members and enum constants.

use crate::error::SchemaError;
use std::collections::HashSet;

/// Default number of disambiguating suffixes tried before giving up.
pub const DEFAULT_MAX_DISAMBIGUATION: usize = 64;

const RUST_KEYWORDS: &[&str] = &[
    "abstract", "as", "async", "await", "become", "box", "break", "const", "continue", "crate",
    "do", "dyn", "else", "enum", "extern", "false", "final", "fn", "for", "gen", "if", "impl",
    "in", "let", "loop", "macro", "match", "mod", "move", "mut", "override", "priv", "pub", "ref",
    "return", "self", "Self", "static", "struct", "super", "trait", "true", "try", "type",
    "typeof", "unsafe", "unsized", "use", "virtual", "where", "while", "yield",
];

/// Returns true if `s` is a Rust keyword.
#[must_use]
pub fn is_keyword(s: &str) -> bool {
    RUST_KEYWORDS.contains(&s)
}

/// Makes `s` usable as a Rust identifier.
///
/// Characters outside `[A-Za-z0-9_]` become `_`, a leading digit gets a `_`
/// prefix and keywords get a trailing `_`.
#[must_use]
pub fn sanitize_identifier(s: &str) -> String {
    let mut result: String = s
        .chars()
        .map(|c| if c.is_ascii_alphanumeric() || c == '_' { c } else { '_' })
        .collect();

    if result.is_empty() {
        return "_empty".to_string();
    }
    if result == "_" {
        return "__".to_string();
    }
    if result.starts_with(|c: char| c.is_ascii_digit()) {
        result.insert(0, '_');
    }
    if is_keyword(&result) {
        result.push('_');
    }
    result
}

/// Converts a property name to snake_case.
///
/// ```
/// use jsonbind_schema::naming::to_snake_case;
/// assert_eq!(to_snake_case("firstName"), "first_name");
/// assert_eq!(to_snake_case("MDEntryPx"), "md_entry_px");
/// ```
#[must_use]
pub fn to_snake_case(s: &str) -> String {
    let chars: Vec<char> = s.chars().collect();
    let mut result = String::with_capacity(s.len() + 4);

    for (i, &c) in chars.iter().enumerate() {
        if !c.is_ascii_alphanumeric() {
            if !result.is_empty() && !result.ends_with('_') {
                result.push('_');
            }
            continue;
        }
        if c.is_ascii_uppercase() && i > 0 && !result.is_empty() && !result.ends_with('_') {
            let prev = chars[i - 1];
            let next_lower = chars.get(i + 1).is_some_and(char::is_ascii_lowercase);
            if prev.is_ascii_lowercase()
                || prev.is_ascii_digit()
                || (prev.is_ascii_uppercase() && next_lower)
            {
                result.push('_');
            }
        }
        result.push(c.to_ascii_lowercase());
    }

    while result.ends_with('_') && result.len() > 1 {
        result.pop();
    }
    sanitize_identifier(&result)
}

/// Converts a name to PascalCase, treating non-alphanumerics as separators.
#[must_use]
pub fn to_pascal_case(s: &str) -> String {
    let mut result = String::with_capacity(s.len());
    let mut capitalize_next = true;

    for c in s.chars() {
        if !c.is_ascii_alphanumeric() {
            capitalize_next = true;
        } else if capitalize_next {
            result.push(c.to_ascii_uppercase());
            capitalize_next = false;
        } else {
            result.push(c);
        }
    }

    sanitize_identifier(&result)
}

/// Derives an enum constant identifier from a literal's textual form.
///
/// Strings keep their case, numbers use their JSON text (`4.0` becomes
/// `_4_0`), booleans become `True`/`False` and null becomes `Null`.
#[must_use]
pub fn enum_literal_identifier(literal: &serde_json::Value) -> String {
    match literal {
        serde_json::Value::String(s) => sanitize_identifier(s),
        serde_json::Value::Number(n) => sanitize_identifier(&n.to_string()),
        serde_json::Value::Bool(true) => "True".to_string(),
        serde_json::Value::Bool(false) => "False".to_string(),
        serde_json::Value::Null => "Null".to_string(),
        other => sanitize_identifier(&other.to_string()),
    }
}

/// Hands out identifiers that are unique within one scope.
///
/// A collision is resolved by appending `_2`, `_3`, ... up to the configured
/// maximum.
#[derive(Debug, Clone)]
pub struct NameAllocator {
    scope: String,
    used: HashSet<String>,
    max: usize,
}

impl NameAllocator {
    /// Creates an allocator for `scope`.
    #[must_use]
    pub fn new(scope: impl Into<String>, max: usize) -> Self {
        Self {
            scope: scope.into(),
            used: HashSet::new(),
            max,
        }
    }

    /// Marks a name as taken without allocating it.
    pub fn reserve(&mut self, name: impl Into<String>) {
        self.used.insert(name.into());
    }

    /// Returns true if `name` is taken.
    #[must_use]
    pub fn is_used(&self, name: &str) -> bool {
        self.used.contains(name)
    }

    /// Allocates a unique identifier derived from `base`.
    ///
    /// # Errors
    /// Returns `SchemaError::NameCollision` when every suffix is taken.
    pub fn allocate(&mut self, base: &str) -> Result<String, SchemaError> {
        let base = sanitize_identifier(base);
        if self.used.insert(base.clone()) {
            return Ok(base);
        }
        for n in 2..=self.max {
            let candidate = format!("{base}_{n}");
            if self.used.insert(candidate.clone()) {
                return Ok(candidate);
            }
        }
        Err(SchemaError::NameCollision {
            name: base,
            scope: self.scope.clone(),
            attempts: self.max,
        })
    }
}
