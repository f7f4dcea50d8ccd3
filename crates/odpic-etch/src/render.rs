//! Rich-text rendering of docutils paragraphs
//!
//! Converts the `paragraph` children of a node into markdown-flavoured lines
//! suitable for rustdoc comments:
//!
//! | markup                                   | output               |
//! |------------------------------------------|----------------------|
//! | `literal`                                | `` `text` ``         |
//! | `reference` with `internal`/`literal`    | ``[`text`]``         |
//! | `reference` to an external URI           | `[text](uri)`        |
//! | `strong`                                 | `**text**`           |
//! | `emphasis`, `title_reference`            | `*text*`             |
//!
//! `<` and `>` in prose become `&lt;` / `&gt;` so the text survives a
//! markdown consumer. Code spans are copied verbatim.

use crate::node::Desc;
use crate::xml::Element;

/// Escape `<` and `>` in prose text
pub fn escape_text(s: &str) -> String {
    let mut result = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '<' => result.push_str("&lt;"),
            '>' => result.push_str("&gt;"),
            _ => result.push(c),
        }
    }
    result
}

/// Render the direct `paragraph` children of `node`.
///
/// Paragraphs are separated by one empty line; every line is trimmed.
pub fn render_paragraphs(node: &Element) -> Desc {
    let mut lines = Vec::new();
    for (i, paragraph) in node.children_named("paragraph").enumerate() {
        if i > 0 {
            lines.push(String::new());
        }
        let text = render_paragraph(paragraph);
        lines.extend(split_lines(&text).into_iter().map(|line| line.trim().to_string()));
    }
    Desc::new(lines)
}

fn is_line_break(c: char) -> bool {
    matches!(
        c,
        '\n' | '\r' | '\x0b' | '\x0c' | '\x1c' | '\x1d' | '\x1e' | '\u{85}' | '\u{2028}' | '\u{2029}'
    )
}

/// Split at every line break, counting `\r\n` once.
///
/// quick-xml keeps a lone `\r` and the other Unicode breaks, which
/// `str::lines` would leave inside a line. No trailing empty line.
pub fn split_lines(text: &str) -> Vec<&str> {
    let mut lines = Vec::new();
    let mut start = 0;
    let mut chars = text.char_indices().peekable();
    while let Some((i, c)) = chars.next() {
        if !is_line_break(c) {
            continue;
        }
        lines.push(&text[start..i]);
        start = i + c.len_utf8();
        if c == '\r' {
            if let Some(&(j, '\n')) = chars.peek() {
                chars.next();
                start = j + 1;
            }
        }
    }
    if start < text.len() {
        lines.push(&text[start..]);
    }
    lines
}

/// Render one paragraph to a single (possibly multi-line) string
pub fn render_paragraph(paragraph: &Element) -> String {
    let mut out = String::new();
    if let Some(text) = &paragraph.text {
        out.push_str(&escape_text(text));
    }
    for inline in &paragraph.children {
        render_inline(&mut out, inline);
        if let Some(tail) = &inline.tail {
            out.push_str(&escape_text(tail));
        }
    }
    out
}

fn render_inline(out: &mut String, node: &Element) {
    match node.tag.as_str() {
        "reference" => {
            let internal = node.has_attr("internal");
            let quote = internal || node.has_attr("literal");
            out.push('[');
            match node.attr("reftitle") {
                Some(title) if quote && title.contains('.') => {
                    out.push('`');
                    out.push_str(title);
                    out.push('`');
                }
                _ => push_text(out, node, quote),
            }
            out.push(']');
            if !internal {
                out.push('(');
                out.push_str(node.attr("refuri").unwrap_or_default());
                out.push(')');
            }
        }
        "strong" => {
            out.push_str("**");
            push_text(out, node, false);
            out.push_str("**");
        }
        "emphasis" | "title_reference" => {
            out.push('*');
            push_text(out, node, false);
            out.push('*');
        }
        "literal" => push_text(out, node, true),
        _ => push_text(out, node, false),
    }
}

fn push_text(out: &mut String, node: &Element, quote: bool) {
    if quote {
        out.push('`');
        out.push_str(&node.text_content());
        out.push('`');
    } else {
        for part in node.text_parts() {
            out.push_str(&escape_text(part));
        }
    }
}
