//! Java source parser.
//!
//! Top-level `class`/`interface`/`enum`/`record` blocks are carved with the
//! shared brace matcher, then each body is split into declarations. Method
//! bodies are isolated before field extraction, so a parameter list is never
//! mistaken for a field.

use super::model::{ClassKind, JavaClass, JavaField, JavaMethod, JavaModel, JavaParameter};
use crate::error::ParseError;
use crate::text::{
    CommentStyle, Member, find_blocks, find_top_level, first_unbalanced, split_members,
    split_top_level, squash_whitespace, strip_comments, take_java_annotations,
};
use crate::traits::Parser;
use regex::Regex;
use std::sync::LazyLock;

const DOMAIN: &str = "java";

static PACKAGE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?m)^\s*package\s+([\w.]+)\s*;").unwrap());
static IMPORT: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?m)^\s*import\s+((?:static\s+)?[\w.*]+)\s*;").unwrap());

static TYPE_HEADER: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(concat!(
        r"((?:@[\w.]+(?:\s*\((?:[^()]|\([^()]*\))*\))?\s+)*)",
        r"((?:(?:public|protected|private|abstract|final|static|sealed|non-sealed|strictfp)\s+)*)",
        r"\b(class|interface|enum|record)\s+(\w+)\s*",
        r"(?:<((?:[^<>{]|<(?:[^<>{]|<[^<>{]*>)*>)*)>)?\s*",
        r"(?:\(([^)]*)\))?\s*",
        r"(?:extends\s+([^{]+?)\s*)?",
        r"(?:implements\s+([^{]+?)\s*)?",
        r"(?:permits\s+[^{]+?\s*)?\{",
    ))
    .unwrap()
});
static TYPE_KEYWORD: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\b(?:class|interface|enum|record)\s+\w+").unwrap());

static METHOD: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(concat!(
        r"(?s)^(?:<(?:[^<>]|<[^<>]*>)*>\s+)?",
        r"(?:(.+?)\s+)?(\w+)\s*\((.*)\)",
        r"(?:\s*throws\s+[\w.,\s]+)?$",
    ))
    .unwrap()
});

const MODIFIERS: &[&str] = &[
    "public",
    "protected",
    "private",
    "static",
    "final",
    "abstract",
    "synchronized",
    "native",
    "default",
    "transient",
    "volatile",
    "strictfp",
];

/// Parser for Java compilation units.
pub struct JavaParser;

impl Parser for JavaParser {
    type Model = JavaModel;

    fn parse(&self, text: &str) -> Result<JavaModel, ParseError> {
        let src = strip_comments(text, CommentStyle::CLike);
        if let Some(at) = first_unbalanced(&src, '{', '}') {
            return Err(ParseError::unbalanced(DOMAIN, &src[at..]));
        }

        let mut model = JavaModel {
            package: PACKAGE.captures(&src).map(|c| c[1].to_string()),
            imports: IMPORT
                .captures_iter(&src)
                .map(|c| squash_whitespace(&c[1]))
                .collect(),
            classes: Vec::new(),
        };

        let blocks = find_blocks(&src, &TYPE_HEADER, '{', '}')
            .map_err(|u| ParseError::unbalanced(DOMAIN, &src[u.at..]))?;
        for block in blocks {
            let caps = &block.captures;
            let kind = ClassKind::from_keyword(&caps[3]).unwrap_or_default();
            let mut class = JavaClass::new(&caps[4], kind);
            tracing::trace!(class = %class.name, kind = kind.keyword(), "parsing type");

            class.annotations = take_java_annotations(&caps[1]).0;
            let modifiers: Vec<&str> = caps[2].split_whitespace().collect();
            class.access_modifier = access_of(&modifiers);
            class.is_abstract = modifiers.contains(&"abstract");
            class.is_final = modifiers.contains(&"final");
            class.is_static = modifiers.contains(&"static");
            class.type_parameters = caps.get(5).map(|m| squash_whitespace(m.as_str()));
            if let Some(header) = caps.get(6) {
                class.components = parse_parameters(header.as_str());
            }
            class.extends = caps.get(7).map(|m| type_list(m.as_str())).unwrap_or_default();
            class.implements = caps.get(8).map(|m| type_list(m.as_str())).unwrap_or_default();

            let mut body = block.body;
            if kind == ClassKind::Enum {
                let split = find_top_level(body, ';').unwrap_or(body.len());
                class.enum_constants = split_top_level(&body[..split], ',')
                    .iter()
                    .filter_map(|c| enum_constant_name(c))
                    .collect();
                body = body.get(split + 1..).unwrap_or("");
            }
            for member in split_members(body) {
                parse_member(&mut class, member);
            }
            model.classes.push(class);
        }
        Ok(model)
    }
}

/// Parse Java source text.
pub fn parse_java(text: &str) -> Result<JavaModel, ParseError> {
    JavaParser.parse(text)
}

fn parse_member(class: &mut JavaClass, member: Member) {
    let (annotations, rest) = take_java_annotations(&member.head);
    let rest = rest.trim();
    if rest.is_empty() {
        return;
    }
    let eq = find_top_level(rest, '=');
    let paren = rest.find('(');
    let before_paren = &rest[..paren.unwrap_or(rest.len())];
    if TYPE_KEYWORD.is_match(before_paren) {
        tracing::debug!(class = %class.name, member = before_paren.trim(), "nested type skipped");
        return;
    }

    let is_method = match (paren, eq) {
        (Some(p), Some(e)) => p < e,
        (Some(_), None) => true,
        _ => false,
    };
    if is_method {
        match parse_method(rest, member.body) {
            Some(mut method) => {
                method.annotations = annotations;
                class.methods.push(method);
            }
            None => tracing::debug!(class = %class.name, member = rest, "unrecognized method declaration"),
        }
        return;
    }
    if member.body.is_some() {
        tracing::debug!(class = %class.name, member = rest, "initializer block skipped");
        return;
    }

    let (decl, initializer) = match eq {
        Some(e) => (rest[..e].trim(), Some(rest[e + 1..].trim().to_string())),
        None => (rest, None),
    };
    let (modifiers, tail) = take_modifiers(decl);
    let declarators = split_top_level(tail, ',');
    let Some((ty, first_name)) = declarators.first().and_then(|d| split_type_and_name(d)) else {
        tracing::debug!(class = %class.name, member = rest, "unrecognized field declaration");
        return;
    };
    let names = std::iter::once(first_name).chain(declarators.iter().skip(1).cloned());
    for name in names {
        class.fields.push(JavaField {
            name,
            ty: ty.clone(),
            access_modifier: access_of(&modifiers),
            is_static: modifiers.contains(&"static"),
            is_final: modifiers.contains(&"final"),
            annotations: annotations.clone(),
            initializer: initializer.clone(),
        });
    }
}

fn parse_method(head: &str, body: Option<String>) -> Option<JavaMethod> {
    let (modifiers, tail) = take_modifiers(head);
    let caps = METHOD.captures(tail)?;
    Some(JavaMethod {
        name: caps[2].to_string(),
        return_type: caps.get(1).map(|m| squash_whitespace(m.as_str())),
        parameters: parse_parameters(&caps[3]),
        access_modifier: access_of(&modifiers),
        is_static: modifiers.contains(&"static"),
        is_abstract: modifiers.contains(&"abstract"),
        annotations: Vec::new(),
        body,
    })
}

fn parse_parameters(list: &str) -> Vec<JavaParameter> {
    split_top_level(list, ',')
        .iter()
        .filter_map(|param| {
            let (_, rest) = take_java_annotations(param);
            let rest = rest.trim().trim_start_matches("final ").trim();
            let (ty, name) = split_type_and_name(rest)?;
            Some(JavaParameter { ty, name })
        })
        .collect()
}

/// Leading modifier keywords and the remaining declaration.
fn take_modifiers(decl: &str) -> (Vec<&'static str>, &str) {
    let mut modifiers = Vec::new();
    let mut rest = decl.trim_start();
    loop {
        let word_end = rest.find(char::is_whitespace).unwrap_or(rest.len());
        match MODIFIERS.iter().find(|m| **m == &rest[..word_end]) {
            Some(m) if word_end < rest.len() => {
                modifiers.push(*m);
                rest = rest[word_end..].trim_start();
            }
            _ => return (modifiers, rest),
        }
    }
}

fn access_of(modifiers: &[&str]) -> Option<String> {
    modifiers
        .iter()
        .find(|m| matches!(**m, "public" | "protected" | "private"))
        .map(|m| m.to_string())
}

/// Split `Map<String, Integer> counts` into type and name.
fn split_type_and_name(decl: &str) -> Option<(String, String)> {
    let decl = decl.trim();
    let split = decl.rfind(char::is_whitespace)?;
    let ty = squash_whitespace(&decl[..split]);
    let name = decl[split..].trim().to_string();
    if ty.is_empty() || !name.chars().all(|c| c.is_alphanumeric() || c == '_' || c == '$') {
        return None;
    }
    Some((ty, name))
}

fn type_list(s: &str) -> Vec<String> {
    split_top_level(s, ',')
        .iter()
        .map(|t| squash_whitespace(t))
        .filter(|t| !t.is_empty())
        .collect()
}

fn enum_constant_name(constant: &str) -> Option<String> {
    let (_, rest) = take_java_annotations(constant);
    let name: String = rest
        .trim()
        .chars()
        .take_while(|c| c.is_alphanumeric() || *c == '_')
        .collect();
    (!name.is_empty()).then_some(name)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::java::model::Annotation;

    #[test]
    fn annotated_field() {
        let model = parse_java("class User { @Id private Long id; }").unwrap();
        let field = &model.classes[0].fields[0];
        assert_eq!(field.name, "id");
        assert_eq!(field.ty, "Long");
        assert_eq!(field.access_modifier.as_deref(), Some("private"));
        assert_eq!(
            field.annotations,
            vec![Annotation {
                name: "Id".into(),
                arguments: None
            }]
        );
    }

    #[test]
    fn full_compilation_unit() {
        let src = r#"
            package com.example.model;

            import java.util.List;
            import static java.util.Objects.requireNonNull;

            /** A user. */
            @Entity
            @Table(name = "users")
            public class User extends BaseEntity implements Serializable, Comparable<User> {
                private static final long serialVersionUID = 1L;
                @Column(nullable = false)
                private String name = "anon";
                protected List<Post> posts;
                int a, b;

                public User(String name) {
                    this.name = requireNonNull(name);
                }

                public String getName() { return name; }

                @Override
                public int compareTo(User other) {
                    if (other == null) { return 1; }
                    return name.compareTo(other.name);
                }

                static class Builder { private String name; }
            }
        "#;
        let model = parse_java(src).unwrap();
        assert_eq!(model.package.as_deref(), Some("com.example.model"));
        assert_eq!(model.imports, ["java.util.List", "static java.util.Objects.requireNonNull"]);
        assert_eq!(model.classes.len(), 1);

        let user = &model.classes[0];
        assert_eq!(user.access_modifier.as_deref(), Some("public"));
        assert_eq!(user.extends, ["BaseEntity"]);
        assert_eq!(user.implements, ["Serializable", "Comparable<User>"]);
        let annotations: Vec<_> = user.annotations.iter().map(|a| a.name.as_str()).collect();
        assert_eq!(annotations, ["Entity", "Table"]);

        let fields: Vec<_> = user.fields.iter().map(|f| (f.name.as_str(), f.ty.as_str())).collect();
        assert_eq!(
            fields,
            [
                ("serialVersionUID", "long"),
                ("name", "String"),
                ("posts", "List<Post>"),
                ("a", "int"),
                ("b", "int"),
            ]
        );
        assert!(user.fields[0].is_static && user.fields[0].is_final);
        assert_eq!(user.fields[1].initializer.as_deref(), Some("\"anon\""));
        assert_eq!(user.fields[3].access_modifier, None);

        let methods: Vec<_> = user.methods.iter().map(|m| m.name.as_str()).collect();
        assert_eq!(methods, ["User", "getName", "compareTo"]);
        assert_eq!(user.methods[0].return_type, None);
        assert_eq!(user.methods[1].body.as_deref(), Some("return name;"));
        assert_eq!(user.methods[2].annotations[0].name, "Override");
        assert_eq!(
            user.methods[2].parameters,
            [JavaParameter {
                ty: "User".into(),
                name: "other".into()
            }]
        );
    }

    #[test]
    fn interface_enum_and_record() {
        let src = "
            public interface Repo<T, ID> extends Base<T> { T find(ID id); }
            enum Status { ACTIVE, DISABLED(\"x\"); private String code; }
            public record Point(int x, int y) implements Shape { }
        ";
        let model = parse_java(src).unwrap();
        let kinds: Vec<_> = model.classes.iter().map(|c| c.kind).collect();
        assert_eq!(kinds, [ClassKind::Interface, ClassKind::Enum, ClassKind::Record]);

        let repo = &model.classes[0];
        assert_eq!(repo.type_parameters.as_deref(), Some("T, ID"));
        assert_eq!(repo.extends, ["Base<T>"]);
        assert_eq!(repo.methods[0].body, None);

        let status = &model.classes[1];
        assert_eq!(status.enum_constants, ["ACTIVE", "DISABLED"]);
        assert_eq!(status.fields[0].name, "code");

        let point = &model.classes[2];
        assert_eq!(point.components.len(), 2);
        assert_eq!(point.implements, ["Shape"]);
    }

    #[test]
    fn empty_and_unbalanced() {
        assert!(parse_java("").unwrap().classes.is_empty());
        let err = parse_java("class A { void f() { }").unwrap_err();
        assert!(matches!(err, ParseError::Unbalanced { domain: "java", .. }));
        assert!(err.to_string().contains("{ void f()"));
    }
}
