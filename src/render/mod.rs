//! Markdown rendering of documentation trees.
//!
//! Each element is mapped to an effective tag name, looked up in
//! [`TAG_RULES`], and rendered through that rule's template. Children are
//! rendered first and substituted into the parent's template.

pub mod names;
pub mod tags;

pub use names::{kind_label, member_kind, member_label, reference_name};
pub use tags::{dedent_code, fill, rule_for, TagRule, TAG_RULES};

use crate::error::{Error, Result};
use crate::parser::{DocNode, Document, Element};
use regex::Regex;
use std::borrow::Cow;
use std::sync::LazyLock;
use tags::{FIRST_PARAM_TAG, NONE_TAG, SEE_ANCHOR_TAG, SEE_LANGWORD_TAG, SEE_PAGE_TAG};

static WHITESPACE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\s+").expect("valid whitespace pattern"));
static BLANK_LINES_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\n{3,}").expect("valid blank line pattern"));

/// Render a whole document to Markdown.
///
/// Runs of three or more newlines in the result are collapsed to two.
pub fn render_document(doc: &Document) -> Result<String> {
    let markdown = render_element(&doc.root, None, None)?;
    Ok(BLANK_LINES_RE.replace_all(&markdown, "\n\n").into_owned())
}

/// Render a single node.
///
/// `previous` is the nearest preceding sibling element, which decides
/// whether a parameter opens a new table.
pub fn render_node(
    node: &DocNode,
    previous: Option<&Element>,
    assembly: Option<&str>,
) -> Result<String> {
    match node {
        DocNode::Text(text) => Ok(collapse_whitespace(text)),
        DocNode::Element(el) => render_element(el, previous, assembly),
    }
}

/// Render an element through the rule for its effective tag name
pub fn render_element(
    el: &Element,
    previous: Option<&Element>,
    assembly: Option<&str>,
) -> Result<String> {
    let tag = effective_tag(el, previous);
    let rule = rule_for(&tag)
        .ok_or_else(|| Error::unknown_tag(tag.to_string(), el.position.line, el.position.column))?;
    rule.apply(el, assembly)
}

/// Render every child of `el` in order and concatenate the results
pub fn render_children(el: &Element, assembly: Option<&str>) -> Result<String> {
    let mut out = String::new();
    let mut previous: Option<&Element> = None;

    for child in &el.children {
        out.push_str(&render_node(child, previous, assembly)?);
        if let DocNode::Element(child_el) = child {
            previous = Some(child_el);
        }
    }

    Ok(out)
}

/// The rule-table key for an element
pub fn effective_tag<'a>(el: &'a Element, previous: Option<&Element>) -> Cow<'a, str> {
    if el.name == "member" {
        let tag = el
            .attr("name")
            .and_then(member_kind)
            .unwrap_or(NONE_TAG)
            .to_lowercase();
        return Cow::Owned(tag);
    }

    if el.name == "see" {
        let tag = if el.attr("langword").is_some() {
            SEE_LANGWORD_TAG
        } else {
            match (el.attr("cref"), el.attr("href")) {
                (Some(cref), _) if cref.starts_with("!:#") => SEE_ANCHOR_TAG,
                (None, Some(_)) => "see",
                _ => SEE_PAGE_TAG,
            }
        };
        return Cow::Borrowed(tag);
    }

    if el.name.ends_with("param") && previous.map_or(true, |p| p.name != "param") {
        return Cow::Borrowed(FIRST_PARAM_TAG);
    }

    Cow::Borrowed(el.name.as_str())
}

/// Turn newlines into spaces and squeeze whitespace runs to one space
pub fn collapse_whitespace(text: &str) -> String {
    let flattened = text.replace(['\r', '\n'], " ");
    WHITESPACE_RE.replace_all(&flattened, " ").into_owned()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::parse;

    fn render_xml(xml: &str) -> Result<String> {
        render_document(&parse(xml)?)
    }

    fn member_doc(body: &str) -> String {
        format!(
            r#"<?xml version="1.0"?>
<doc>
    <assembly><name>MyAssembly</name></assembly>
    <members>
        <member name="M:MyAssembly.Foo.Run(System.String)">
            {}
        </member>
    </members>
</doc>"#,
            body
        )
    }

    fn render_fragment(xml: &str) -> String {
        let doc = parse(xml).unwrap();
        render_element(&doc.root, None, Some("MyAssembly")).unwrap()
    }

    #[test]
    fn test_document_heading_and_type_member() {
        let md = render_xml(
            r#"<doc>
    <assembly><name>MyAssembly</name></assembly>
    <members>
        <member name="T:MyAssembly.Foo"><summary>A foo.</summary></member>
    </members>
</doc>"#,
        )
        .unwrap();
        assert_eq!(md, "# MyAssembly #\n\n## Type Foo\n\nA foo.\n\n---\n\n");
    }

    #[test]
    fn test_method_member_heading() {
        let md = render_xml(&member_doc("<summary>Runs.</summary>")).unwrap();
        assert!(md.contains("#### Method Foo.Run(System.String)\n\nRuns.\n\n---\n"));
    }

    #[test]
    fn test_unknown_member_kind_renders_nothing() {
        let md = render_xml(
            r#"<doc><assembly><name>A</name></assembly><members>
<member name="N:A.Stuff"><summary>ignored</summary></member>
<member><summary>also ignored</summary></member>
</members></doc>"#,
        )
        .unwrap();
        assert_eq!(md, "# A #\n\n");
    }

    #[test]
    fn test_text_whitespace_collapsed() {
        let out = render_fragment("<summary>\n    Adds   two\n    numbers.\n</summary>");
        assert_eq!(out, " Adds two numbers. \n\n");
    }

    #[test]
    fn test_no_more_than_two_newlines() {
        let md = render_xml(&member_doc(
            "<summary><para>One</para></summary><remarks><para>Two</para></remarks>",
        ))
        .unwrap();
        assert!(!md.contains("\n\n\n"));
        assert!(md.contains("One\n\n"));
        assert!(md.contains(">Two\n\n"));
    }

    #[test]
    fn test_param_table_header_once() {
        let md = render_xml(&member_doc(
            r#"<summary>Run.</summary>
            <param name="a">First</param>
            <param name="b">Second</param>
            <param name="c">Third</param>"#,
        ))
        .unwrap();

        assert_eq!(md.matches("|Name | Description |").count(), 1);
        assert!(md.contains(
            "|Name | Description |\n|-----|------|\n|a: |First|\n|b: |Second|\n|c: |Third|\n"
        ));
    }

    #[test]
    fn test_typeparam_after_summary_opens_table() {
        let out = render_fragment(
            r#"<member name="M:MyAssembly.Foo.Map"><summary>x</summary><typeparam name="T">Item</typeparam></member>"#,
        );
        assert!(out.contains("|Name | Description |\n|-----|------|\n|T: |Item|\n"));
    }

    #[test]
    fn test_typeparam_after_param_continues_table() {
        let out = render_fragment(
            r#"<member name="M:MyAssembly.Foo.Map"><param name="a">A</param><typeparam name="T">Item</typeparam></member>"#,
        );
        assert_eq!(out.matches("|Name | Description |").count(), 1);
        assert!(out.contains("|a: |A|\n|T: |Item|\n"));
    }

    #[test]
    fn test_param_after_typeparam_opens_new_table() {
        let out = render_fragment(
            r#"<member name="M:MyAssembly.Foo.Map"><typeparam name="T">Item</typeparam><param name="a">A</param></member>"#,
        );
        assert_eq!(out.matches("|Name | Description |").count(), 2);
    }

    #[test]
    fn test_code_block_dedented() {
        let out = render_fragment(
            "<code lang=\"csharp\">\n      var x = 1;\n      return x;\n    </code>",
        );
        assert_eq!(
            out,
            "\n\n###### csharp code\n\n```\n\n    var x = 1;\n    return x;\n```\n\n"
        );
    }

    #[test]
    fn test_code_without_lang() {
        let out = render_fragment("<code>x</code>");
        assert_eq!(out, "\n\n######  code\n\n```\nx\n```\n\n");
    }

    #[test]
    fn test_inline_code_and_refs() {
        let out = render_fragment(
            r#"<summary>Call <c>Run</c> with <paramref name="path"/> of <typeparamref name="T"/>.</summary>"#,
        );
        assert_eq!(out, "Call  `Run`  with `path` of `T`.\n\n");
    }

    #[test]
    fn test_see_variants() {
        assert_eq!(render_fragment(r#"<see langword="null"/>"#), "`null`");
        assert_eq!(
            render_fragment(r#"<see cref="M:MyAssembly.Foo.Bar.Baz"/>"#),
            "[[Baz|Baz]]"
        );
        assert_eq!(
            render_fragment(r#"<see cref="T:MyAssembly.Foo">the foo</see>"#),
            "[[the foo|Foo]]"
        );
        assert_eq!(
            render_fragment(r##"<see cref="!:#Section-Two">section</see>"##),
            "[section](#section-two)]"
        );
        assert_eq!(
            render_fragment(r#"<see href="https://example.com"/>"#),
            "[`https://example.com`](https://example.com)"
        );
    }

    #[test]
    fn test_seealso_label_preference() {
        assert_eq!(
            render_fragment(r#"<seealso cref="T:Lib.Other"/>"#),
            "**See also**: [`Other`](Other)\n\n"
        );
        assert_eq!(
            render_fragment(r#"<seealso href="docs.md"/>"#),
            "**See also**: [`docs.md`](docs.md)\n\n"
        );
        assert_eq!(
            render_fragment("<seealso>Guide</seealso>"),
            "**See also**: [`Guide`](Guide)\n\n"
        );
    }

    #[test]
    fn test_exception_and_returns() {
        assert_eq!(
            render_fragment(r#"<exception cref="T:System.IOException">When it fails</exception>"#),
            "[[T:System.IOException|T:System.IOException]]: When it fails\n\n"
        );
        assert_eq!(
            render_fragment("<returns>The total.</returns>"),
            "**Returns**: The total.\n\n"
        );
        assert_eq!(render_fragment("<value>Size</value>"), "**Value**: Size\n\n");
        assert_eq!(
            render_fragment("<example>Use it</example>"),
            "##### Example: Use it\n\n"
        );
    }

    #[test]
    fn test_list_rendering() {
        let out = render_fragment(
            r#"<list type="table"><listheader><term>Key</term><description>Meaning</description></listheader><item><term>a</term><description>first</description></item><item><description>second</description></item></list>"#,
        );
        assert_eq!(
            out,
            "**Key**: Meaning\n- **a**: first\n- second\n\n\n"
        );
    }

    #[test]
    fn test_unknown_tag_error_has_position() {
        let err = render_xml(&member_doc("<summary>x</summary>\n            <blink>y</blink>")).unwrap_err();
        match err {
            Error::UnknownTag { tag, line, column } => {
                assert_eq!(tag, "blink");
                assert_eq!(line, 7);
                assert_eq!(column, 13);
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_tag_names_are_case_sensitive() {
        let err = render_xml(&member_doc("<Summary>x</Summary>")).unwrap_err();
        assert!(matches!(err, Error::UnknownTag { ref tag, .. } if tag == "Summary"));
    }

    #[test]
    fn test_rendering_is_deterministic() {
        let xml = member_doc(r#"<summary>S <see cref="T:A.B"/></summary><param name="x">X</param>"#);
        assert_eq!(render_xml(&xml).unwrap(), render_xml(&xml).unwrap());
    }

    #[test]
    fn test_effective_tag_rewrites() {
        let doc = parse(r#"<m><param name="a"/><param name="b"/><typeparam name="T"/></m>"#).unwrap();
        let kids: Vec<&Element> = doc.root.elements().collect();
        assert_eq!(effective_tag(kids[0], None), FIRST_PARAM_TAG);
        assert_eq!(effective_tag(kids[1], Some(kids[0])), "param");
        assert_eq!(effective_tag(kids[2], Some(kids[1])), "typeparam");
        assert_eq!(effective_tag(kids[2], None), FIRST_PARAM_TAG);
    }

    #[test]
    fn test_collapse_whitespace() {
        assert_eq!(collapse_whitespace("a\r\n\t b"), "a b");
        assert_eq!(collapse_whitespace("  "), " ");
    }
}
