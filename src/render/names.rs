// Member id and cross-reference name handling
//
// Member ids look like `M:Namespace.Type.Method(System.String)`: a kind code,
// a colon, then the qualified name.

use regex::Regex;
use std::borrow::Cow;
use std::sync::LazyLock;

/// Kind-code prefixes and the label each expands to
pub const KIND_PREFIXES: [(&str, &str); 5] = [
    ("F:", "Field"),
    ("P:", "Property"),
    ("T:", "Type"),
    ("E:", "Event"),
    ("M:", "Method"),
];

static KIND_CODE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[A-Z]:").expect("valid kind code pattern"));

/// Label for a two-character kind prefix such as `T:`
pub fn kind_label(prefix: &str) -> Option<&'static str> {
    KIND_PREFIXES
        .iter()
        .find(|(code, _)| *code == prefix)
        .map(|(_, label)| *label)
}

/// Kind label for a full member id, looked up by its first two characters
pub fn member_kind(id: &str) -> Option<&'static str> {
    let prefix: String = id.chars().take(2).collect();
    kind_label(&prefix)
}

/// Human-readable heading for a member id.
///
/// A `:{assembly}.` segment is collapsed to `:` wherever it occurs, then a
/// leading kind code is expanded, so `T:MyAssembly.Foo` becomes `Type Foo`
/// when the assembly is `MyAssembly`. Unmapped kind codes are left alone.
pub fn member_label(id: &str, assembly: Option<&str>) -> String {
    let stripped: Cow<'_, str> = match assembly.filter(|a| !a.is_empty()) {
        Some(assembly) => Cow::Owned(id.replace(&format!(":{}.", assembly), ":")),
        None => Cow::Borrowed(id),
    };

    KIND_CODE_RE
        .replace(&stripped, |caps: &regex::Captures<'_>| match kind_label(&caps[0]) {
            Some(label) => format!("{} ", label),
            None => caps[0].to_string(),
        })
        .into_owned()
}

/// Trailing simple name of a reference, used as link text.
///
/// `M:Foo.Bar.Baz` gives `Baz`; `Foo` gives `Foo`; empty input gives empty.
pub fn reference_name(reference: &str) -> &str {
    let name = match reference.char_indices().nth(1) {
        Some((idx, ':')) => &reference[idx + 1..],
        _ => reference,
    };
    match name.rfind('.') {
        Some(dot) => &name[dot + 1..],
        None => name,
    }
}
