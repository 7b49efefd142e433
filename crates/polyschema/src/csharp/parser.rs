//! C# source parser. Only auto-properties are read from type bodies.

use super::model::{CSharpClass, CSharpKind, CSharpModel, CSharpProperty, CSharpType};
use crate::error::ParseError;
use crate::text::{
    CommentStyle, find_blocks, first_unbalanced, split_members, split_top_level,
    squash_whitespace, strip_comments, take_csharp_attributes,
};
use crate::traits::Parser;
use regex::Regex;
use std::sync::LazyLock;

const DOMAIN: &str = "csharp";

static USING: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?m)^\s*(?:global\s+)?using\s+((?:static\s+)?[\w.]+(?:\s*=\s*[\w.<>, ]+)?)\s*;")
        .unwrap()
});
static NAMESPACE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?m)^\s*namespace\s+([\w.]+)\s*[;{]").unwrap());

static TYPE_HEADER: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(concat!(
        r"((?:\[[^\]]*\]\s*)*)",
        r"((?:(?:public|private|protected|internal|static|abstract|sealed|partial|readonly|ref|unsafe|new|file)\s+)*)",
        r"\b(class|interface|struct|enum|record(?:\s+(?:class|struct))?)\s+(\w+)\s*",
        r"(?:<([^>{]*)>)?\s*",
        r"(\([^)]*\))?\s*",
        r"(?::\s*([^{]+?))?\s*",
        r"(?:where\s+[^{]+?)?\{",
    ))
    .unwrap()
});
static ACCESSOR: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(?:((?:private|protected|internal)(?:\s+(?:protected|internal))?)\s+)?(get|set|init)$")
        .unwrap()
});

const MODIFIERS: &[&str] = &[
    "public",
    "private",
    "protected",
    "internal",
    "static",
    "virtual",
    "override",
    "abstract",
    "required",
    "new",
    "readonly",
    "sealed",
];

/// Parser for C# compilation units.
pub struct CSharpParser;

impl Parser for CSharpParser {
    type Model = CSharpModel;

    fn parse(&self, text: &str) -> Result<CSharpModel, ParseError> {
        let src = strip_comments(text, CommentStyle::CLike);
        if let Some(at) = first_unbalanced(&src, '{', '}') {
            return Err(ParseError::unbalanced(DOMAIN, &src[at..]));
        }

        let mut model = CSharpModel {
            usings: USING
                .captures_iter(&src)
                .map(|c| squash_whitespace(&c[1]))
                .collect(),
            namespace: NAMESPACE.captures(&src).map(|c| c[1].to_string()),
            classes: Vec::new(),
        };

        let blocks = find_blocks(&src, &TYPE_HEADER, '{', '}')
            .map_err(|u| ParseError::unbalanced(DOMAIN, &src[u.at..]))?;
        for block in blocks {
            let caps = &block.captures;
            let kind = CSharpKind::from_keyword(&caps[3]).unwrap_or_default();
            let mut class = CSharpClass::new(&caps[4], kind);
            tracing::trace!(class = %class.name, kind = kind.keyword(), "parsing type");

            class.attributes = take_csharp_attributes(&caps[1]).0;
            let modifiers: Vec<&str> = caps[2].split_whitespace().collect();
            class.access_modifier = access_of(&modifiers);
            class.is_static = modifiers.contains(&"static");
            class.is_abstract = modifiers.contains(&"abstract");
            class.is_sealed = modifiers.contains(&"sealed");
            class.is_partial = modifiers.contains(&"partial");
            class.type_parameters = caps.get(5).map(|m| squash_whitespace(m.as_str()));
            if let Some(params) = caps.get(6) {
                tracing::debug!(class = %class.name, parameters = params.as_str(), "primary constructor ignored");
            }
            class.base_types = caps
                .get(7)
                .map(|m| split_top_level(m.as_str(), ','))
                .unwrap_or_default();

            if kind == CSharpKind::Enum {
                class.enum_members = split_top_level(block.body, ',')
                    .iter()
                    .filter_map(|m| {
                        let (_, rest) = take_csharp_attributes(m);
                        let name = rest.split('=').next().unwrap_or(rest).trim();
                        (!name.is_empty()).then(|| name.to_string())
                    })
                    .collect();
            } else {
                parse_body(&mut class, block.body);
            }
            model.classes.push(class);
        }
        Ok(model)
    }
}

/// Parse C# source text.
pub fn parse_csharp(text: &str) -> Result<CSharpModel, ParseError> {
    CSharpParser.parse(text)
}

fn parse_body(class: &mut CSharpClass, body: &str) {
    // `= value;` after a property's accessor block belongs to that property
    let mut last_was_property = false;
    for member in split_members(body) {
        if let Some(init) = member.head.strip_prefix('=') {
            if last_was_property && member.body.is_none() {
                if let Some(property) = class.properties.last_mut() {
                    property.initializer = Some(init.trim().to_string());
                }
            }
            last_was_property = false;
            continue;
        }
        last_was_property = false;
        let Some(accessors) = member.body.as_deref() else {
            tracing::debug!(class = %class.name, member = %member.head, "field or expression member ignored");
            continue;
        };
        match parse_property(&member.head, accessors) {
            Some(property) => {
                class.properties.push(property);
                last_was_property = true;
            }
            None => {
                tracing::debug!(class = %class.name, member = %member.head, "not an auto-property, ignored")
            }
        }
    }
}

fn parse_property(head: &str, accessors: &str) -> Option<CSharpProperty> {
    let (attributes, rest) = take_csharp_attributes(head);
    if rest.contains('(') {
        return None;
    }
    let mut modifiers = Vec::new();
    let mut words: Vec<&str> = rest.split_whitespace().collect();
    while words.len() > 2 && MODIFIERS.contains(&words[0]) {
        modifiers.push(words.remove(0));
    }
    let decl = words.join(" ");
    let split = decl.rfind(' ')?;
    let name = decl[split + 1..].to_string();
    if !name.chars().all(|c| c.is_alphanumeric() || c == '_') {
        return None;
    }

    let mut property = CSharpProperty {
        name,
        ty: CSharpType::parse(&decl[..split]),
        access_modifier: access_of(&modifiers),
        is_static: modifiers.contains(&"static"),
        is_virtual: modifiers.contains(&"virtual"),
        is_required: modifiers.contains(&"required"),
        has_setter: false,
        init_only: false,
        setter_access: None,
        attributes,
        initializer: None,
    };
    let mut has_getter = false;
    for accessor in accessors.split(';').map(str::trim).filter(|a| !a.is_empty()) {
        let caps = ACCESSOR.captures(accessor)?;
        match &caps[2] {
            "get" => has_getter = true,
            setter => {
                property.has_setter = true;
                property.init_only = setter == "init";
                property.setter_access = caps.get(1).map(|m| squash_whitespace(m.as_str()));
            }
        }
    }
    has_getter.then_some(property)
}

fn access_of(modifiers: &[&str]) -> Option<String> {
    let access: Vec<&str> = modifiers
        .iter()
        .copied()
        .filter(|m| matches!(*m, "public" | "private" | "protected" | "internal"))
        .collect();
    (!access.is_empty()).then(|| access.join(" "))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn nullable_decimal_property() {
        let model = parse_csharp("public class Product { public decimal? Price { get; set; } }").unwrap();
        let price = &model.classes[0].properties[0];
        assert_eq!(price.name, "Price");
        assert_eq!(
            price.ty,
            CSharpType {
                name: "decimal".into(),
                is_nullable: true
            }
        );
        assert!(price.has_setter);
    }

    #[test]
    fn full_file() {
        let src = r##"
            using System;
            using System.Collections.Generic;

            namespace Shop.Models
            {
                [Table("orders")]
                public sealed partial class Order : EntityBase, IAuditable
                {
                    private readonly int _cache;

                    [Key]
                    public int Id { get; set; }

                    [MaxLength(50), Required]
                    public required string Number { get; init; } = "";

                    public ICollection<Line> Lines { get; private set; } = new List<Line>();

                    public string Display => $"#{Number}";

                    public decimal Total() { return 0m; }
                }

                public enum Status { Open = 1, Closed }
            }
        "##;
        let model = parse_csharp(src).unwrap();
        assert_eq!(model.usings, ["System", "System.Collections.Generic"]);
        assert_eq!(model.namespace.as_deref(), Some("Shop.Models"));
        assert_eq!(model.classes.len(), 2);

        let order = &model.classes[0];
        assert!(order.is_sealed && order.is_partial);
        assert_eq!(order.base_types, ["EntityBase", "IAuditable"]);
        assert_eq!(order.attributes[0].name, "Table");

        let names: Vec<_> = order.properties.iter().map(|p| p.name.as_str()).collect();
        assert_eq!(names, ["Id", "Number", "Lines"]);
        let number = &order.properties[1];
        assert!(number.is_required && number.init_only);
        assert_eq!(number.initializer.as_deref(), Some("\"\""));
        assert_eq!(number.attributes.len(), 2);
        let lines = &order.properties[2];
        assert_eq!(lines.setter_access.as_deref(), Some("private"));
        assert_eq!(lines.initializer.as_deref(), Some("new List<Line>()"));

        assert_eq!(model.classes[1].kind, CSharpKind::Enum);
        assert_eq!(model.classes[1].enum_members, ["Open", "Closed"]);
    }

    #[test]
    fn file_scoped_namespace_and_record() {
        let src = "namespace App;\n\npublic record Person { public string Name { get; init; } }";
        let model = parse_csharp(src).unwrap();
        assert_eq!(model.namespace.as_deref(), Some("App"));
        assert_eq!(model.classes[0].kind, CSharpKind::Record);
    }

    #[test]
    fn empty_and_unbalanced() {
        assert!(parse_csharp("").unwrap().classes.is_empty());
        let err = parse_csharp("class A { public int X { get; set; }").unwrap_err();
        assert!(matches!(err, ParseError::Unbalanced { domain: "csharp", .. }));
    }
}
