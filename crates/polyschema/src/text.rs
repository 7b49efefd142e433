//! Brace matching and declaration splitting for brace-delimited notations.
//!
//! SQL, Java, C# and PlantUML share the same strategy: carve top-level blocks
//! out of the source with a recursive matcher that understands string
//! literals, then run line-oriented extraction only inside each isolated body.

use crate::extensions::AnnotationRef;
use regex::{Captures, Regex};

/// Which comment styles to strip.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommentStyle {
    /// `//` and `/* */`.
    CLike,
    /// `--` and `/* */`.
    Sql,
    /// Lines starting with `'`, and `/' '/` blocks.
    PlantUml,
}

/// Remove comments outside string literals. Newlines are kept so offsets
/// into lines stay meaningful.
pub fn strip_comments(src: &str, style: CommentStyle) -> String {
    let chars: Vec<char> = src.chars().collect();
    let mut out = String::with_capacity(src.len());
    let mut i = 0;
    let mut at_line_start = true;
    while i < chars.len() {
        let c = chars[i];
        let next = chars.get(i + 1).copied();

        let line_comment = match style {
            CommentStyle::CLike => c == '/' && next == Some('/'),
            CommentStyle::Sql => c == '-' && next == Some('-'),
            CommentStyle::PlantUml => c == '\'' && at_line_start,
        };
        let block_open = match style {
            CommentStyle::PlantUml => c == '/' && next == Some('\''),
            _ => c == '/' && next == Some('*'),
        };

        if line_comment {
            while i < chars.len() && chars[i] != '\n' {
                i += 1;
            }
            continue;
        }
        if block_open {
            let close = if style == CommentStyle::PlantUml { '\'' } else { '*' };
            i += 2;
            while i < chars.len() && !(chars[i] == close && chars.get(i + 1) == Some(&'/')) {
                if chars[i] == '\n' {
                    out.push('\n');
                }
                i += 1;
            }
            i += 2;
            continue;
        }
        if c == '"' || (c == '\'' && style != CommentStyle::PlantUml) {
            let end = skip_literal(&chars, i);
            out.extend(&chars[i..end.min(chars.len())]);
            i = end;
            at_line_start = false;
            continue;
        }

        if c == '\n' {
            at_line_start = true;
        } else if !c.is_whitespace() {
            at_line_start = false;
        }
        out.push(c);
        i += 1;
    }
    out
}

/// Index one past the closing quote of the literal starting at `start`.
fn skip_literal(chars: &[char], start: usize) -> usize {
    let quote = chars[start];
    let mut i = start + 1;
    while i < chars.len() {
        match chars[i] {
            '\\' => i += 2,
            c if c == quote => return i + 1,
            _ => i += 1,
        }
    }
    chars.len()
}

/// Byte index of the delimiter closing the one at byte index `open_at`.
///
/// Nested pairs of the same kind are matched recursively; delimiters inside
/// `"..."` or `'...'` literals are ignored.
pub fn matching_close(src: &str, open_at: usize, open: char, close: char) -> Option<usize> {
    let bytes: Vec<(usize, char)> = src[open_at..].char_indices().collect();
    let (_, first) = *bytes.first()?;
    if first != open {
        return None;
    }
    let chars: Vec<char> = bytes.iter().map(|(_, c)| *c).collect();
    let mut depth = 0usize;
    let mut i = 0;
    while i < chars.len() {
        let c = chars[i];
        if c == '"' || c == '\'' {
            i = skip_literal(&chars, i);
            continue;
        }
        if c == open {
            depth += 1;
        } else if c == close {
            depth -= 1;
            if depth == 0 {
                return Some(open_at + bytes[i].0);
            }
        }
        i += 1;
    }
    None
}

/// A top-level block: its header captures and the text between its delimiters.
#[derive(Debug)]
pub struct Block<'a> {
    pub captures: Captures<'a>,
    pub body: &'a str,
    /// Byte offset one past the closing delimiter.
    pub end: usize,
}

/// The opening delimiter at `at` has no matching close.
#[derive(Debug, Clone, Copy)]
pub struct Unbalanced {
    pub at: usize,
}

/// Carve top-level blocks whose header matches `header`.
///
/// The header regex must end at (and include) the opening delimiter.
/// Scanning resumes after each block's close, so headers nested inside a body
/// are never reported as top-level blocks.
pub fn find_blocks<'a>(
    src: &'a str,
    header: &Regex,
    open: char,
    close: char,
) -> Result<Vec<Block<'a>>, Unbalanced> {
    let mut blocks = Vec::new();
    let mut pos = 0;
    while let Some(captures) = header.captures_at(src, pos) {
        let whole = captures.get(0).map(|m| (m.start(), m.end())).unwrap_or((pos, pos));
        let open_at = whole.1 - open.len_utf8();
        let close_at =
            matching_close(src, open_at, open, close).ok_or(Unbalanced { at: whole.0 })?;
        tracing::trace!(start = whole.0, end = close_at, "block");
        blocks.push(Block {
            body: &src[whole.1..close_at],
            end: close_at + close.len_utf8(),
            captures,
        });
        pos = close_at + close.len_utf8();
    }
    Ok(blocks)
}

/// Byte index of the first delimiter without a partner: an unclosed opener,
/// or a closer with nothing open. Literals are skipped.
pub fn first_unbalanced(src: &str, open: char, close: char) -> Option<usize> {
    let mut stack = Vec::new();
    let mut quote: Option<char> = None;
    let mut escaped = false;
    for (i, c) in src.char_indices() {
        if let Some(q) = quote {
            if escaped {
                escaped = false;
            } else if c == '\\' {
                escaped = true;
            } else if c == q {
                quote = None;
            }
            continue;
        }
        if c == '"' || c == '\'' {
            quote = Some(c);
        } else if c == open {
            stack.push(i);
        } else if c == close && stack.pop().is_none() {
            return Some(i);
        }
    }
    stack.first().copied()
}

/// One declaration inside a class body.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Member {
    /// Text before the terminating `;` or the body's `{`.
    pub head: String,
    /// Inner text of a `{...}` body, trimmed.
    pub body: Option<String>,
}

/// Split a class body into declarations.
///
/// A declaration ends at a depth-0 `;` or at the close of a depth-0 `{...}`
/// block. A `{` that follows a top-level `=` is an initializer and stays in
/// the head.
pub fn split_members(body: &str) -> Vec<Member> {
    let mut members = Vec::new();
    let mut head = String::new();
    let mut depth = 0i32;
    let mut in_initializer = false;
    let mut i = 0;
    let bytes = body.as_bytes();

    while i < body.len() {
        let c = body[i..].chars().next().unwrap_or(' ');
        let width = c.len_utf8();
        match c {
            '"' | '\'' => {
                let chars: Vec<char> = body[i..].chars().collect();
                let len: usize = chars[..skip_literal(&chars, 0)].iter().map(|c| c.len_utf8()).sum();
                head.push_str(&body[i..i + len]);
                i += len;
                continue;
            }
            '(' | '[' => depth += 1,
            ')' | ']' => depth -= 1,
            // angle brackets nest only in type position; in an initializer they are operators
            '<' if !in_initializer => depth += 1,
            '>' if !in_initializer => depth -= 1,
            '=' if depth == 0 && bytes.get(i + 1) != Some(&b'>') => in_initializer = true,
            '{' if depth == 0 && !in_initializer => {
                if let Some(close) = matching_close(body, i, '{', '}') {
                    members.push(Member {
                        head: head.trim().to_string(),
                        body: Some(body[i + 1..close].trim().to_string()),
                    });
                    head.clear();
                    i = close + 1;
                    continue;
                }
            }
            '{' => depth += 1,
            '}' => depth -= 1,
            ';' if depth <= 0 => {
                let trimmed = head.trim();
                if !trimmed.is_empty() {
                    members.push(Member {
                        head: trimmed.to_string(),
                        body: None,
                    });
                }
                head.clear();
                depth = 0;
                in_initializer = false;
                i += width;
                continue;
            }
            _ => {}
        }
        head.push(c);
        i += width;
    }
    let trimmed = head.trim();
    if !trimmed.is_empty() {
        members.push(Member {
            head: trimmed.to_string(),
            body: None,
        });
    }
    members
}

/// Byte index of the first `target` outside `()`, `<>`, `[]`, `{}` and quotes.
pub fn find_top_level(s: &str, target: char) -> Option<usize> {
    let mut depth = 0i32;
    let mut quote: Option<char> = None;
    for (i, c) in s.char_indices() {
        if let Some(q) = quote {
            if c == q {
                quote = None;
            }
            continue;
        }
        match c {
            c if c == target && depth == 0 => return Some(i),
            '"' | '\'' => quote = Some(c),
            '(' | '<' | '[' | '{' => depth += 1,
            ')' | '>' | ']' | '}' => depth -= 1,
            _ => {}
        }
    }
    None
}

/// Split on `sep` outside `()`, `<>`, `[]`, `{}` and quotes.
pub fn split_top_level(s: &str, sep: char) -> Vec<String> {
    let mut parts = Vec::new();
    let mut current = String::new();
    let mut depth = 0i32;
    let mut quote: Option<char> = None;
    for c in s.chars() {
        if let Some(q) = quote {
            current.push(c);
            if c == q {
                quote = None;
            }
            continue;
        }
        match c {
            '"' | '\'' | '`' => quote = Some(c),
            '(' | '<' | '[' | '{' => depth += 1,
            ')' | '>' | ']' | '}' => depth -= 1,
            c if c == sep && depth == 0 => {
                parts.push(current.trim().to_string());
                current.clear();
                continue;
            }
            _ => {}
        }
        current.push(c);
    }
    if !current.trim().is_empty() {
        parts.push(current.trim().to_string());
    }
    parts
}

/// Peel leading Java annotations (`@Name`, `@Name(args)`) off `head`.
/// Returns the annotations and the rest of the declaration.
pub fn take_java_annotations(head: &str) -> (Vec<AnnotationRef>, &str) {
    let mut annotations = Vec::new();
    let mut rest = head.trim_start();
    while let Some(after_at) = rest.strip_prefix('@') {
        let name_len = after_at
            .find(|c: char| !(c.is_alphanumeric() || c == '_' || c == '.'))
            .unwrap_or(after_at.len());
        if name_len == 0 {
            break;
        }
        let name = after_at[..name_len].to_string();
        let mut tail = &after_at[name_len..];
        let mut arguments = None;
        let trimmed = tail.trim_start();
        if trimmed.starts_with('(') {
            let offset = tail.len() - trimmed.len();
            if let Some(close) = matching_close(tail, offset, '(', ')') {
                arguments = Some(tail[offset + 1..close].trim().to_string());
                tail = &tail[close + 1..];
            }
        }
        annotations.push(AnnotationRef { name, arguments });
        rest = tail.trim_start();
    }
    (annotations, rest)
}

/// Peel leading C# attributes (`[Key]`, `[MaxLength(50), Required]`) off `head`.
pub fn take_csharp_attributes(head: &str) -> (Vec<AnnotationRef>, &str) {
    let mut attributes = Vec::new();
    let mut rest = head.trim_start();
    while rest.starts_with('[') {
        let Some(close) = matching_close(rest, 0, '[', ']') else {
            break;
        };
        for part in split_top_level(&rest[1..close], ',') {
            let (name, arguments) = match part.find('(') {
                Some(p) if part.ends_with(')') => (
                    part[..p].trim().to_string(),
                    Some(part[p + 1..part.len() - 1].trim().to_string()),
                ),
                _ => (part.trim().to_string(), None),
            };
            if !name.is_empty() {
                attributes.push(AnnotationRef { name, arguments });
            }
        }
        rest = rest[close + 1..].trim_start();
    }
    (attributes, rest)
}

/// Element type of a collection, array or nullable type reference:
/// `List<Post>`, `Post[]` and `Post?` all give `Post`. Maps and other
/// multi-argument generics give `None`.
pub fn element_type(ty: &str) -> Option<&str> {
    let ty = ty.trim().trim_end_matches('?');
    if let Some(inner) = ty.strip_suffix("[]") {
        return Some(inner.trim());
    }
    let open = ty.find('<')?;
    let inner = ty[open + 1..].strip_suffix('>')?.trim();
    (!inner.contains(',')).then_some(inner.trim_end_matches('?'))
}

/// Base name of a type reference: `Comparable<User>` gives `Comparable`.
pub fn base_name(ty: &str) -> &str {
    ty.split('<').next().unwrap_or(ty).trim().trim_end_matches('?')
}

/// Collapse runs of whitespace into single spaces.
pub fn squash_whitespace(s: &str) -> String {
    s.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Strip one layer of identifier quoting: `` `x` ``, `"x"`, `[x]`.
pub fn unquote_ident(s: &str) -> &str {
    let s = s.trim();
    for (open, close) in [('`', '`'), ('"', '"'), ('[', ']')] {
        if s.len() >= 2 && s.starts_with(open) && s.ends_with(close) {
            return &s[1..s.len() - 1];
        }
    }
    s
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn matching_close_skips_literals() {
        let src = r#"{ a = "}"; { b } }"#;
        assert_eq!(matching_close(src, 0, '{', '}'), Some(src.len() - 1));
        assert_eq!(matching_close("{ {", 0, '{', '}'), None);
    }

    #[test]
    fn strip_comments_keeps_strings() {
        let src = "int a; // gone\nString s = \"// kept\"; /* gone */ int b;";
        let out = strip_comments(src, CommentStyle::CLike);
        assert_eq!(out, "int a; \nString s = \"// kept\";  int b;");
        let sql = strip_comments("id INT, -- key\nname TEXT", CommentStyle::Sql);
        assert_eq!(sql, "id INT, \nname TEXT");
    }

    #[test]
    fn find_blocks_only_top_level() {
        let re = Regex::new(r"class\s+(\w+)\s*\{").unwrap();
        let src = "class A { class Inner { } int x; } class B { }";
        let blocks = find_blocks(src, &re, '{', '}').unwrap();
        let names: Vec<_> = blocks.iter().map(|b| &b.captures[1]).collect();
        assert_eq!(names, ["A", "B"]);
        assert_eq!(blocks[0].body.trim(), "class Inner { } int x;");
        assert!(find_blocks("class A { ", &re, '{', '}').is_err());
    }

    #[test]
    fn first_unbalanced_finds_both_directions() {
        assert_eq!(first_unbalanced("a { b { } ", '{', '}'), Some(2));
        assert_eq!(first_unbalanced("a { } }", '{', '}'), Some(6));
        assert_eq!(first_unbalanced("a { \"}\" }", '{', '}'), None);
    }

    #[test]
    fn split_members_separates_methods_and_fields() {
        let body = "private int a = 1;\n int[] xs = {1, 2};\n public int get() { if (a) { return a; } return 0; }\n void f();";
        let members = split_members(body);
        assert_eq!(members.len(), 4);
        assert_eq!(members[0].head, "private int a = 1");
        assert_eq!(members[1].head, "int[] xs = {1, 2}");
        assert_eq!(members[2].head, "public int get()");
        assert_eq!(
            members[2].body.as_deref(),
            Some("if (a) { return a; } return 0;")
        );
        assert_eq!(members[3].head, "void f()");
    }

    #[test]
    fn split_members_comparison_in_initializer() {
        let body = "Map<String, List<Long>> m = new HashMap<>();\n int x = a < b ? 1 : 2;\n boolean y = a > b;\n int z;";
        let heads: Vec<_> = split_members(body).into_iter().map(|m| m.head).collect();
        assert_eq!(
            heads,
            [
                "Map<String, List<Long>> m = new HashMap<>()",
                "int x = a < b ? 1 : 2",
                "boolean y = a > b",
                "int z",
            ]
        );
    }

    #[test]
    fn split_top_level_respects_nesting() {
        assert_eq!(
            split_top_level("a DECIMAL(10, 2), b Map<K, V>, c 'x,y'", ','),
            ["a DECIMAL(10, 2)", "b Map<K, V>", "c 'x,y'"]
        );
    }

    #[test]
    fn find_top_level_skips_nesting() {
        assert_eq!(find_top_level("Map<K, V> m = x", '='), Some(12));
        assert_eq!(find_top_level("f(a = 1)", '='), None);
        assert_eq!(find_top_level("RED(\";\"), GREEN; int x;", ';'), Some(15));
    }

    #[test]
    fn annotations_are_peeled() {
        let (anns, rest) = take_java_annotations("@Id @Column(name = \"x\") private Long id");
        assert_eq!(anns.len(), 2);
        assert_eq!(anns[0].name, "Id");
        assert_eq!(anns[1].arguments.as_deref(), Some("name = \"x\""));
        assert_eq!(rest, "private Long id");

        let (attrs, rest) = take_csharp_attributes("[Key] [MaxLength(50), Required] public string Name");
        let names: Vec<_> = attrs.iter().map(|a| a.name.as_str()).collect();
        assert_eq!(names, ["Key", "MaxLength", "Required"]);
        assert_eq!(attrs[1].arguments.as_deref(), Some("50"));
        assert_eq!(rest, "public string Name");
    }

    #[test]
    fn type_references() {
        assert_eq!(element_type("List<Post>"), Some("Post"));
        assert_eq!(element_type("ICollection<Post?>"), Some("Post"));
        assert_eq!(element_type("Post[]"), Some("Post"));
        assert_eq!(element_type("Map<String, Post>"), None);
        assert_eq!(element_type("Post"), None);
        assert_eq!(base_name("Comparable<User>"), "Comparable");
    }

    #[test]
    fn unquote_variants() {
        assert_eq!(unquote_ident("`user`"), "user");
        assert_eq!(unquote_ident("\"user\""), "user");
        assert_eq!(unquote_ident("[user]"), "user");
        assert_eq!(unquote_ident("user"), "user");
    }
}
