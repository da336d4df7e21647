//! Validated identifiers used to derive every generated artifact.
//!
//! A [`SubsystemName`] is the single source for the header path, the source
//! path and the registry directive of one scaffold, so the three can never
//! disagree.

use crate::error::ScaffoldError;
use std::borrow::Cow;
use std::fmt;

/// Prefix shared by generated file names and registry directives.
pub const FILE_PREFIX: &str = "subsys-";
pub const HEADER_EXTENSION: &str = "h";
pub const SOURCE_EXTENSION: &str = "cpp";

/// Longest accepted identifier.
pub const MAX_IDENTIFIER_LEN: usize = 64;

const CPP_KEYWORDS: &[&str] = &[
    "alignas", "alignof", "and", "and_eq", "asm", "auto", "bitand", "bitor", "bool", "break",
    "case", "catch", "char", "char8_t", "char16_t", "char32_t", "class", "compl", "concept",
    "const", "consteval", "constexpr", "constinit", "const_cast", "continue", "co_await",
    "co_return", "co_yield", "decltype", "default", "delete", "do", "double", "dynamic_cast",
    "else", "enum", "explicit", "export", "extern", "false", "float", "for", "friend", "goto",
    "if", "inline", "int", "long", "mutable", "namespace", "new", "noexcept", "not", "not_eq",
    "nullptr", "operator", "or", "or_eq", "private", "protected", "public", "register",
    "reinterpret_cast", "requires", "return", "short", "signed", "sizeof", "static",
    "static_assert", "static_cast", "struct", "switch", "template", "this", "thread_local",
    "throw", "true", "try", "typedef", "typeid", "typename", "union", "unsigned", "using",
    "virtual", "void", "volatile", "wchar_t", "while", "xor", "xor_eq",
];

/// Checks that `raw` is usable both as a C++ identifier and as a file name fragment.
///
/// # Errors
/// Returns the reason the identifier is rejected.
pub fn validate_identifier(raw: &str) -> Result<(), Cow<'static, str>> {
    let mut chars = raw.chars();
    let Some(first) = chars.next() else {
        return Err("must not be empty".into());
    };

    if raw.len() > MAX_IDENTIFIER_LEN {
        return Err(format!("must be at most {MAX_IDENTIFIER_LEN} characters").into());
    }
    if !(first.is_ascii_alphabetic() || first == '_') {
        return Err("must start with an ASCII letter or '_'".into());
    }
    if let Some(bad) = chars.find(|c| !(c.is_ascii_alphanumeric() || *c == '_')) {
        let bad = bad.escape_default();
        return Err(
            format!("contains '{bad}'; only ASCII letters, digits and '_' are allowed").into()
        );
    }
    if CPP_KEYWORDS.contains(&raw) {
        return Err("is a reserved C++ keyword".into());
    }

    Ok(())
}

/// The name of a subsystem, used verbatim in file names and generated code.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct SubsystemName(String);

impl SubsystemName {
    /// Validates `raw` and wraps it. No case folding or character rewriting happens.
    ///
    /// # Errors
    /// Returns [`ScaffoldError::InvalidName`] if `raw` is empty, too long, not an
    /// identifier, or a C++ keyword.
    pub fn parse(raw: &str) -> Result<Self, ScaffoldError> {
        validate_identifier(raw)
            .map_err(|reason| ScaffoldError::InvalidName { name: raw.to_owned(), reason })?;
        Ok(Self(raw.to_owned()))
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// `subsys-<name>.h`
    #[must_use]
    pub fn header_file(&self) -> String {
        format!("{FILE_PREFIX}{}.{HEADER_EXTENSION}", self.0)
    }

    /// `subsys-<name>.cpp`
    #[must_use]
    pub fn source_file(&self) -> String {
        format!("{FILE_PREFIX}{}.{SOURCE_EXTENSION}", self.0)
    }

    /// The registry line for this subsystem, without a line terminator.
    #[must_use]
    pub fn include_directive(&self) -> String {
        format!("#include \"{}\"", self.header_file())
    }
}

impl fmt::Display for SubsystemName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for SubsystemName {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// The inner C++ namespace under `msctl` the subsystem is generated into.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Namespace(String);

impl Namespace {
    pub const DEFAULT: &'static str = "agent";

    /// # Errors
    /// Returns [`ScaffoldError::InvalidNamespace`] if `raw` is not a valid identifier.
    pub fn parse(raw: &str) -> Result<Self, ScaffoldError> {
        validate_identifier(raw).map_err(|reason| ScaffoldError::InvalidNamespace {
            namespace: raw.to_owned(),
            reason,
        })?;
        Ok(Self(raw.to_owned()))
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Default for Namespace {
    fn default() -> Self {
        Self(Self::DEFAULT.to_owned())
    }
}

impl fmt::Display for Namespace {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
