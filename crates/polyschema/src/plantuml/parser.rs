//! PlantUML class diagram parser.
//!
//! Class blocks are carved with the shared brace matcher; whatever lies
//! outside them is scanned line by line for the title and relations.

use super::model::{
    PlantUmlDiagram, PumlClass, PumlKind, PumlMember, PumlParameter, PumlRelation,
    PumlRelationKind, Visibility,
};
use crate::error::ParseError;
use crate::text::{
    CommentStyle, find_top_level, first_unbalanced, matching_close, split_top_level,
    squash_whitespace, strip_comments,
};
use crate::traits::Parser;
use regex::Regex;
use std::sync::LazyLock;

const DOMAIN: &str = "plantuml";

static HEADER: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(concat!(
        r"(?m)^[ \t]*(abstract[ \t]+class|abstract|class|interface|enum|entity)[ \t]+",
        r#"("[^"\n]+"|[\w.]+)"#,
        r"(?:[ \t]+as[ \t]+[\w.]+)?",
        r"(?:[ \t]*<<[ \t]*([^>\n]+?)[ \t]*>>)?",
        r"(?:[ \t]+extends[ \t]+([\w.]+(?:[ \t]*,[ \t]*[\w.]+)*))?",
        r"(?:[ \t]+implements[ \t]+([\w.]+(?:[ \t]*,[ \t]*[\w.]+)*))?",
        r"\s*(\{)?",
    ))
    .unwrap()
});

static TITLE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?m)^[ \t]*title[ \t]+(.+?)[ \t]*$").unwrap());

static RELATION: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(concat!(
        r#"^("[^"]+"|[\w.]+)\s*(?:"([^"]*)"\s*)?"#,
        r"(<\|--|--\|>|<\|\.\.|\.\.\|>|\*--|--\*|o--|--o|<--|-->|<\.\.|\.\.>|--|\.\.)",
        r#"\s*(?:"([^"]*)"\s*)?("[^"]+"|[\w.]+)\s*(?::\s*(.*?))?\s*$"#,
    ))
    .unwrap()
});

pub struct PlantUmlParser;

impl Parser for PlantUmlParser {
    type Model = PlantUmlDiagram;

    fn parse(&self, text: &str) -> Result<PlantUmlDiagram, ParseError> {
        let src = strip_comments(diagram_body(text), CommentStyle::PlantUml);
        if let Some(at) = first_unbalanced(&src, '{', '}') {
            return Err(ParseError::unbalanced(DOMAIN, &src[at..]));
        }

        let mut diagram = PlantUmlDiagram::default();
        let mut outside = String::new();
        let mut pos = 0;
        while let Some(caps) = HEADER.captures_at(&src, pos) {
            let Some(whole) = caps.get(0) else { break };
            outside.push_str(&src[pos..whole.start()]);
            let kind = PumlKind::from_keyword(&caps[1]).unwrap_or_default();
            let mut class = PumlClass::new(unquote(&caps[2]), kind);
            class.stereotype = caps.get(3).map(|m| m.as_str().to_string());
            tracing::trace!(class = %class.name, kind = kind.keyword(), "parsing class");

            for (group, rel_kind) in [(4, PumlRelationKind::Extension), (5, PumlRelationKind::Implementation)] {
                for parent in caps.get(group).map(|m| m.as_str()).unwrap_or("").split(',') {
                    let parent = parent.trim();
                    if !parent.is_empty() {
                        diagram.relations.push(PumlRelation::new(&class.name, parent, rel_kind));
                    }
                }
            }

            pos = match caps.get(6) {
                Some(open) => {
                    let close = matching_close(&src, open.start(), '{', '}')
                        .ok_or_else(|| ParseError::unbalanced(DOMAIN, &src[whole.start()..]))?;
                    class.members = parse_body(&src[open.end()..close], kind);
                    close + 1
                }
                None => whole.end(),
            };
            diagram.classes.push(class);
        }
        outside.push_str(&src[pos..]);

        diagram.title = TITLE.captures(&outside).map(|c| c[1].to_string());
        for line in outside.lines() {
            if let Some(relation) = parse_relation(line.trim()) {
                diagram.relations.push(relation);
            }
        }
        Ok(diagram)
    }
}

/// Parse PlantUML class diagram text.
pub fn parse_plantuml(text: &str) -> Result<PlantUmlDiagram, ParseError> {
    PlantUmlParser.parse(text)
}

/// Text between `@startuml` and `@enduml`, or all of it.
fn diagram_body(text: &str) -> &str {
    let start = text
        .find("@startuml")
        .map(|i| text[i..].find('\n').map_or(text.len(), |n| i + n + 1))
        .unwrap_or(0);
    let end = text[start..].find("@enduml").map_or(text.len(), |i| start + i);
    &text[start..end]
}

fn unquote(name: &str) -> String {
    name.trim_matches('"').to_string()
}

fn parse_body(body: &str, kind: PumlKind) -> Vec<PumlMember> {
    body.lines()
        .map(str::trim)
        .filter(|line| !line.is_empty() && !is_separator(line))
        .filter_map(|line| match kind {
            PumlKind::Enum => {
                let name = line.trim_end_matches([',', ';']).split_whitespace().next()?;
                Some(PumlMember::field(name, None))
            }
            _ => parse_member(line),
        })
        .collect()
}

fn is_separator(line: &str) -> bool {
    ["--", "==", "..", "__"].iter().any(|s| line.starts_with(s))
}

fn parse_member(line: &str) -> Option<PumlMember> {
    let mut member = PumlMember::default();
    let mut text = line.to_string();
    for (token, is_abstract) in [("{static}", false), ("{classifier}", false), ("{abstract}", true)] {
        if text.contains(token) {
            text = text.replace(token, "");
            if is_abstract {
                member.is_abstract = true;
            } else {
                member.is_static = true;
            }
        }
    }
    let mut rest = text.trim();
    if let Some(visibility) = rest.chars().next().and_then(Visibility::from_symbol) {
        member.visibility = Some(visibility);
        rest = rest[1..].trim_start();
    }
    if rest.is_empty() {
        return None;
    }

    if let Some(open) = rest.find('(') {
        let close = rest.rfind(')').filter(|c| *c > open)?;
        let (prefix, name) = split_type_and_name(&rest[..open]);
        let suffix = rest[close + 1..].trim().trim_start_matches(':').trim();
        member.name = name;
        member.ty = (!suffix.is_empty()).then(|| suffix.to_string()).or(prefix);
        member.parameters = Some(
            split_top_level(&rest[open + 1..close], ',')
                .iter()
                .map(|p| p.trim())
                .filter(|p| !p.is_empty())
                .map(parse_parameter)
                .collect(),
        );
    } else if let Some(colon) = find_top_level(rest, ':') {
        member.name = rest[..colon].trim().to_string();
        member.ty = Some(squash_whitespace(&rest[colon + 1..])).filter(|t| !t.is_empty());
    } else {
        let (ty, name) = split_type_and_name(rest);
        member.name = name;
        member.ty = ty;
    }
    Some(member)
}

/// `id : Long`, `Long id` or `id`.
fn parse_parameter(text: &str) -> PumlParameter {
    match find_top_level(text, ':') {
        Some(colon) => PumlParameter {
            name: text[..colon].trim().to_string(),
            ty: Some(text[colon + 1..].trim().to_string()).filter(|t| !t.is_empty()),
        },
        None => {
            let (ty, name) = split_type_and_name(text);
            PumlParameter { name, ty }
        }
    }
}

/// `Map<String, Long> counts` → (`Map<String, Long>`, `counts`).
fn split_type_and_name(text: &str) -> (Option<String>, String) {
    let text = text.trim();
    match text.rsplit_once(char::is_whitespace) {
        Some((ty, name)) => (Some(squash_whitespace(ty)), name.to_string()),
        None => (None, text.to_string()),
    }
}

fn parse_relation(line: &str) -> Option<PumlRelation> {
    let caps = RELATION.captures(line)?;
    let (kind, reversed) = PumlRelationKind::from_arrow(&caps[3])?;
    let left = unquote(&caps[1]);
    let right = unquote(&caps[5]);
    let left_card = caps.get(2).map(|m| m.as_str().to_string());
    let right_card = caps.get(4).map(|m| m.as_str().to_string());
    let mut relation = if reversed {
        let mut r = PumlRelation::new(right, left, kind);
        r.source_cardinality = right_card;
        r.target_cardinality = left_card;
        r
    } else {
        let mut r = PumlRelation::new(left, right, kind);
        r.source_cardinality = left_card;
        r.target_cardinality = right_card;
        r
    };
    relation.label = caps
        .get(6)
        .map(|m| m.as_str().to_string())
        .filter(|l| !l.is_empty());
    Some(relation)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_input() {
        assert_eq!(parse_plantuml("").unwrap(), PlantUmlDiagram::default());
        assert_eq!(parse_plantuml("@startuml\n@enduml\n").unwrap(), PlantUmlDiagram::default());
    }

    #[test]
    fn classes_and_members() {
        let diagram = parse_plantuml(
            "@startuml
title Shop
' comment line
abstract class Product <<Entity>> {
  -id : Long
  +String name
  {static} +count : int
  {abstract} +price(currency : String, Integer qty) : BigDecimal
}
enum Status {
  OPEN,
  CLOSED
}
interface Priced
class Empty {
}
@enduml
",
        )
        .unwrap();
        assert_eq!(diagram.title.as_deref(), Some("Shop"));
        let names: Vec<_> = diagram.classes.iter().map(|c| c.name.as_str()).collect();
        assert_eq!(names, ["Product", "Status", "Priced", "Empty"]);

        let product = &diagram.classes[0];
        assert_eq!(product.kind, PumlKind::AbstractClass);
        assert_eq!(product.stereotype.as_deref(), Some("Entity"));
        assert_eq!(product.members[0], PumlMember {
            visibility: Some(Visibility::Private),
            ..PumlMember::field("id", Some("Long"))
        });
        assert_eq!(product.members[1].ty.as_deref(), Some("String"));
        assert!(product.members[2].is_static);

        let price = &product.members[3];
        assert!(price.is_abstract);
        assert_eq!(price.ty.as_deref(), Some("BigDecimal"));
        let params = price.parameters.as_ref().unwrap();
        assert_eq!(params[0], PumlParameter { name: "currency".into(), ty: Some("String".into()) });
        assert_eq!(params[1], PumlParameter { name: "qty".into(), ty: Some("Integer".into()) });

        let constants: Vec<_> = diagram.classes[1].members.iter().map(|m| m.name.as_str()).collect();
        assert_eq!(constants, ["OPEN", "CLOSED"]);
        assert_eq!(diagram.classes[2].kind, PumlKind::Interface);
        assert!(diagram.classes[3].members.is_empty());
    }

    #[test]
    fn relations_are_normalized() {
        let diagram = parse_plantuml(
            r#"
class A extends Base implements Named
Base <|-- B
Order "1" *-- "many" Line : lines
Line --> Product
Customer "0..1" <-- "*" Order : customer
Service ..> Repository
"#,
        )
        .unwrap();
        let summary: Vec<_> = diagram
            .relations
            .iter()
            .map(|r| {
                (
                    r.source.as_str(),
                    r.kind,
                    r.target.as_str(),
                    r.source_cardinality.as_deref(),
                    r.target_cardinality.as_deref(),
                    r.label.as_deref(),
                )
            })
            .collect();
        use PumlRelationKind as K;
        assert_eq!(
            summary,
            [
                ("A", K::Extension, "Base", None, None, None),
                ("A", K::Implementation, "Named", None, None, None),
                ("B", K::Extension, "Base", None, None, None),
                ("Order", K::Composition, "Line", Some("1"), Some("many"), Some("lines")),
                ("Line", K::Association, "Product", None, None, None),
                ("Order", K::Association, "Customer", Some("*"), Some("0..1"), Some("customer")),
                ("Service", K::Dependency, "Repository", None, None, None),
            ]
        );
    }

    #[test]
    fn missing_brace_is_an_error() {
        let err = parse_plantuml("class A {\n  +x : int\n").unwrap_err();
        assert!(matches!(err, ParseError::Unbalanced { domain: "plantuml", .. }));
    }
}
