// Tag rule table
//
// Maps an effective tag name to a Markdown template and the function that
// extracts its placeholder values. The renderer never special-cases a tag
// beyond choosing its effective name; everything else is data here.

use crate::error::Result;
use crate::parser::Element;
use crate::render::names::{member_label, reference_name};
use crate::render::render_children;
use std::collections::HashMap;
use std::sync::LazyLock;

/// Effective name for a `member` whose id has no known kind code
pub const NONE_TAG: &str = "none";
/// Effective name for the first `param`/`typeparam` in a run of siblings
pub const FIRST_PARAM_TAG: &str = "firstparam";
/// Effective name for `<see cref="..."/>` pointing at another page
pub const SEE_PAGE_TAG: &str = "seepage";
/// Effective name for `<see cref="!:#anchor"/>`
pub const SEE_ANCHOR_TAG: &str = "seeanchor";
/// Effective name for `<see langword="..."/>`
pub const SEE_LANGWORD_TAG: &str = "seelangword";

/// Extracts the ordered placeholder values for one element
pub type Extractor = fn(&Element, Option<&str>) -> Result<Vec<String>>;

/// A Markdown template plus its value extractor.
///
/// The extractor must return exactly as many values as the template has
/// `{N}` placeholders.
#[derive(Clone, Copy)]
pub struct TagRule {
    pub template: &'static str,
    pub extract: Extractor,
}

impl TagRule {
    const fn new(template: &'static str, extract: Extractor) -> Self {
        Self { template, extract }
    }

    /// Render an element through this rule
    pub fn apply(&self, element: &Element, assembly: Option<&str>) -> Result<String> {
        let values = (self.extract)(element, assembly)?;
        Ok(fill(self.template, &values))
    }
}

/// Process-wide rule table, keyed by effective tag name
pub static TAG_RULES: LazyLock<HashMap<&'static str, TagRule>> = LazyLock::new(build_rules);

/// Look up the rule for an effective tag name
pub fn rule_for(tag: &str) -> Option<&'static TagRule> {
    TAG_RULES.get(tag)
}

fn build_rules() -> HashMap<&'static str, TagRule> {
    let member_rule = TagRule::new("#### {0}\n\n{1}\n\n---\n", member_values);

    HashMap::from([
        ("doc", TagRule::new("# {0} #\n\n{1}\n\n", doc_values)),
        ("type", TagRule::new("## {0}\n\n{1}\n\n---\n", member_values)),
        ("field", member_rule),
        ("property", member_rule),
        ("method", member_rule),
        ("event", member_rule),
        ("summary", TagRule::new("{0}\n\n", body)),
        ("value", TagRule::new("**Value**: {0}\n\n", body)),
        ("remarks", TagRule::new("\n\n>{0}\n\n", body)),
        ("example", TagRule::new("##### Example: {0}\n\n", body)),
        ("para", TagRule::new("{0}\n\n", body)),
        (
            "code",
            TagRule::new("\n\n###### {0} code\n\n```\n{1}\n```\n\n", code_values),
        ),
        (SEE_PAGE_TAG, TagRule::new("[[{1}|{0}]]", see_page_values)),
        (SEE_ANCHOR_TAG, TagRule::new("[{1}]({0})]", see_anchor_values)),
        (
            FIRST_PARAM_TAG,
            TagRule::new(
                "|Name | Description |\n|-----|------|\n|{0}: |{1}|\n",
                named_body,
            ),
        ),
        ("param", TagRule::new("|{0}: |{1}|\n", named_body)),
        ("typeparam", TagRule::new("|{0}: |{1}|\n", named_body)),
        ("paramref", TagRule::new("`{0}`", name_only)),
        ("typeparamref", TagRule::new("`{0}`", name_only)),
        ("exception", TagRule::new("[[{0}|{0}]]: {1}\n\n", exception_values)),
        ("returns", TagRule::new("**Returns**: {0}\n\n", body)),
        ("c", TagRule::new(" `{0}` ", body)),
        (
            "inheritdoc",
            TagRule::new("*Inherits documentation from base.*\n\n", no_values),
        ),
        ("see", TagRule::new("[`{0}`]({0})", link_label)),
        (SEE_LANGWORD_TAG, TagRule::new("`{0}`", langword)),
        ("seealso", TagRule::new("**See also**: [`{0}`]({0})\n\n", link_label)),
        ("list", TagRule::new("{0}\n\n", body)),
        ("item", TagRule::new("- {0}\n", body)),
        ("listheader", TagRule::new("{0}\n", body)),
        ("term", TagRule::new("**{0}**: ", body)),
        ("description", TagRule::new("{0}", body)),
        (NONE_TAG, TagRule::new("", no_values)),
    ])
}

/// Substitute `{N}` placeholders in a single pass.
///
/// Values are inserted verbatim, so braces inside rendered text are never
/// re-expanded. Placeholders with no matching value are left as written.
pub fn fill(template: &str, values: &[String]) -> String {
    let mut out = String::with_capacity(template.len() + values.iter().map(String::len).sum::<usize>());
    let mut rest = template;

    while let Some(open) = rest.find('{') {
        out.push_str(&rest[..open]);
        let after = &rest[open + 1..];
        let digits = after.bytes().take_while(u8::is_ascii_digit).count();
        let value = (digits > 0 && after[digits..].starts_with('}'))
            .then(|| after[..digits].parse::<usize>().ok())
            .flatten()
            .and_then(|idx| values.get(idx));

        match value {
            Some(value) => {
                out.push_str(value);
                rest = &after[digits + 1..];
            }
            None => {
                out.push('{');
                rest = after;
            }
        }
    }
    out.push_str(rest);
    out
}

fn no_values(_: &Element, _: Option<&str>) -> Result<Vec<String>> {
    Ok(Vec::new())
}

fn body(el: &Element, assembly: Option<&str>) -> Result<Vec<String>> {
    Ok(vec![render_children(el, assembly)?])
}

fn attr_or_empty(el: &Element, name: &str) -> String {
    el.attr(name).unwrap_or_default().to_string()
}

/// Root element: assembly name, then the rendered members.
///
/// The assembly name read here becomes the context for everything below.
fn doc_values(el: &Element, _: Option<&str>) -> Result<Vec<String>> {
    let assembly = el
        .child("assembly")
        .and_then(|a| a.child("name"))
        .map(|n| n.text().trim().to_string())
        .unwrap_or_default();

    let members = match el.child("members") {
        Some(members) => render_children(members, Some(assembly.as_str()))?,
        None => String::new(),
    };

    Ok(vec![assembly, members])
}

fn member_values(el: &Element, assembly: Option<&str>) -> Result<Vec<String>> {
    let label = member_label(el.attr("name").unwrap_or_default(), assembly);
    Ok(vec![label, render_children(el, assembly)?])
}

fn named_body(el: &Element, assembly: Option<&str>) -> Result<Vec<String>> {
    Ok(vec![attr_or_empty(el, "name"), render_children(el, assembly)?])
}

fn name_only(el: &Element, _: Option<&str>) -> Result<Vec<String>> {
    Ok(vec![attr_or_empty(el, "name")])
}

fn langword(el: &Element, _: Option<&str>) -> Result<Vec<String>> {
    Ok(vec![attr_or_empty(el, "langword")])
}

fn exception_values(el: &Element, assembly: Option<&str>) -> Result<Vec<String>> {
    Ok(vec![attr_or_empty(el, "cref"), render_children(el, assembly)?])
}

/// Page link: target name, then link text (falls back to the target name)
fn see_page_values(el: &Element, assembly: Option<&str>) -> Result<Vec<String>> {
    let name = reference_name(el.attr("cref").unwrap_or_default()).to_string();
    let text = render_children(el, assembly)?;
    let text = if text.trim().is_empty() { name.clone() } else { text };
    Ok(vec![name, text])
}

/// Anchor link: lower-cased `#anchor`, then link text
fn see_anchor_values(el: &Element, assembly: Option<&str>) -> Result<Vec<String>> {
    let cref = el.attr("cref").unwrap_or_default();
    let anchor = cref.strip_prefix("!:").unwrap_or(cref).to_lowercase();
    Ok(vec![anchor, render_children(el, assembly)?])
}

/// Link label: last segment of `cref`, else raw `href`, else element text
fn link_label(el: &Element, _: Option<&str>) -> Result<Vec<String>> {
    let label = match (el.attr("cref"), el.attr("href")) {
        (Some(cref), _) => reference_name(cref).to_string(),
        (None, Some(href)) => href.to_string(),
        (None, None) => el.text().trim().to_string(),
    };
    Ok(vec![label])
}

fn code_values(el: &Element, _: Option<&str>) -> Result<Vec<String>> {
    Ok(vec![attr_or_empty(el, "lang"), dedent_code(&el.text())])
}

/// Shift a code sample left so its first non-blank line keeps four columns
/// of indentation.
///
/// Up to `indent - 4` leading whitespace characters are removed from every
/// line and trailing whitespace is trimmed from the result.
pub fn dedent_code(code: &str) -> String {
    let lines: Vec<&str> = code.lines().collect();
    let indent = lines
        .iter()
        .find(|line| !line.trim().is_empty())
        .map(|line| line.chars().take_while(|c| c.is_whitespace()).count())
        .unwrap_or(0);
    let strip = indent.saturating_sub(4);

    let dedented: Vec<&str> = lines
        .iter()
        .map(|line| {
            let cut = line
                .char_indices()
                .take(strip)
                .take_while(|(_, c)| c.is_whitespace())
                .last()
                .map(|(idx, c)| idx + c.len_utf8())
                .unwrap_or(0);
            &line[cut..]
        })
        .collect();

    dedented.join("\n").trim_end().to_string()
}
