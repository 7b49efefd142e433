//! LinkML YAML parser.

use super::model::{LinkmlModel, LinkmlSchema};
use crate::error::ParseError;
use crate::traits::Parser;

const DOMAIN: &str = "linkml";

/// Accepts both the `schema:`-wrapped document and a bare LinkML schema.
pub struct LinkmlParser;

impl Parser for LinkmlParser {
    type Model = LinkmlModel;

    fn parse(&self, text: &str) -> Result<LinkmlModel, ParseError> {
        if text.trim().is_empty() {
            return Ok(LinkmlModel::default());
        }
        let yaml_err = |source| ParseError::Yaml {
            domain: DOMAIN,
            source,
        };
        let value: serde_yaml::Value = serde_yaml::from_str(text).map_err(yaml_err)?;
        let body = match value {
            serde_yaml::Value::Null => return Ok(LinkmlModel::default()),
            serde_yaml::Value::Mapping(mut map) => match map.remove("schema") {
                Some(inner @ serde_yaml::Value::Mapping(_)) => inner,
                Some(other) => {
                    map.insert("schema".into(), other);
                    serde_yaml::Value::Mapping(map)
                }
                None => serde_yaml::Value::Mapping(map),
            },
            _ => return Err(ParseError::syntax(DOMAIN, "expected a YAML mapping at the top level")),
        };
        let schema: LinkmlSchema = serde_yaml::from_value(body).map_err(yaml_err)?;
        tracing::trace!(classes = schema.classes.len(), enums = schema.enums.len(), "parsed schema");
        Ok(LinkmlModel { schema })
    }
}

/// Parse LinkML YAML text.
pub fn parse_linkml(text: &str) -> Result<LinkmlModel, ParseError> {
    LinkmlParser.parse(text)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn wrapped_form() {
        let yaml = "
schema:
  id: https://example.org/blog
  name: blog
  classes:
    User:
      attributes:
        id:
          range: integer
          identifier: true
        email:
          required: true
        posts:
          range: Post
          multivalued: true
    Post:
";
        let model = parse_linkml(yaml).unwrap();
        let schema = &model.schema;
        assert_eq!(schema.name.as_deref(), Some("blog"));
        let names: Vec<_> = schema.classes.keys().map(String::as_str).collect();
        assert_eq!(names, ["User", "Post"]);
        let user = &schema.classes["User"];
        let attrs: Vec<_> = user.attributes.keys().map(String::as_str).collect();
        assert_eq!(attrs, ["id", "email", "posts"]);
        assert_eq!(user.attributes["email"].range, None);
        assert_eq!(user.attributes["email"].required, Some(true));
        assert!(schema.classes["Post"].attributes.is_empty());
    }

    #[test]
    fn bare_form() {
        let yaml = "id: x\nname: y\nclasses:\n  A:\n    is_a: B\n    abstract: true\n  B: {}\nenums:\n  Color:\n    permissible_values:\n      RED:\n      GREEN:\n        description: go\n";
        let schema = parse_linkml(yaml).unwrap().schema;
        assert_eq!(schema.classes["A"].is_a.as_deref(), Some("B"));
        assert!(schema.classes["A"].is_abstract);
        let values: Vec<_> = schema.enums["Color"].permissible_values.keys().cloned().collect();
        assert_eq!(values, ["RED", "GREEN"]);
    }

    #[test]
    fn empty_and_invalid() {
        assert!(parse_linkml("").unwrap().schema.is_empty());
        assert!(parse_linkml("{}").unwrap().schema.is_empty());
        let err = parse_linkml("schema: [unclosed").unwrap_err();
        assert!(matches!(err, ParseError::Yaml { domain: "linkml", .. }));
        assert!(parse_linkml("just a string").is_err());
    }
}
