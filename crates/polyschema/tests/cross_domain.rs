//! Conversions between domains through the registry.

use polyschema::java::parse_java;
use polyschema::jsonschema::parse_json_schema;
use polyschema::linkml::parse_linkml;
use polyschema::plantuml::{PumlKind, PumlRelationKind, parse_plantuml};
use polyschema::sql::parse_sql;
use polyschema::{
    ConvertError, DomainKind, ParseError, RelationshipType, UniversalType, convert,
    domain_for_extension, domain_for_name,
};

const USERS_SQL: &str = "
CREATE TABLE User (
    id INT NOT NULL PRIMARY KEY,
    name VARCHAR(255)
);
CREATE TABLE Post (
    id BIGINT NOT NULL PRIMARY KEY,
    author_id INT REFERENCES User(id),
    published TIMESTAMP
);
";

#[test]
fn sql_to_java() {
    let java = convert("CREATE TABLE User (id INT, name VARCHAR(255));", "sql", "java").unwrap();
    insta::assert_snapshot!(java.trim_end(), @r"
    public class User {
        private int id;
        private String name;
    }
    ");
}

#[test]
fn sql_to_json_schema_keeps_types() {
    let json = convert(USERS_SQL, "sql", "jsonschema").unwrap();
    let schema = parse_json_schema(&json).unwrap();
    let names: Vec<_> = schema.definitions.keys().map(String::as_str).collect();
    assert_eq!(names, ["Post", "User"]);
    let post = &schema.definitions["Post"];
    let published = &post.properties["published"];
    assert_eq!(published.format.as_deref(), Some("date-time"));
    assert!(post.required.contains(&"id".to_string()));
}

#[test]
fn sql_through_every_domain_keeps_entities() {
    let source = domain_for_name("sql").unwrap().read(USERS_SQL).unwrap();
    for kind in DomainKind::ALL {
        let domain = kind.domain().unwrap();
        let text = domain.render(&source).unwrap();
        let back = domain.read(&text).unwrap();
        let mut labels: Vec<_> = back.entities.iter().map(|e| e.label.as_str()).collect();
        labels.sort_unstable();
        assert!(
            labels.contains(&"Post") && labels.contains(&"User"),
            "{kind}: {labels:?}\n{text}"
        );
    }
}

#[test]
fn java_to_sql_keeps_primary_key_and_references() {
    let java = "
        public class Author {
            @Id private Long id;
            private String name;
        }
        public class Book {
            @Id private Long id;
            private Author author;
            private List<String> tags;
        }
    ";
    let sql = convert(java, "java", "sql").unwrap();
    let diagram = parse_sql(&sql).unwrap();
    let author = &diagram.tables[0];
    assert_eq!(author.name, "Author");
    assert!(author.columns[0].primary_key);
    assert_eq!(author.columns[0].data_type.to_string(), "BIGINT");
    // Class-typed and collection fields have no column form.
    let book: Vec<_> = diagram.tables[1].columns.iter().map(|c| c.name.as_str()).collect();
    assert_eq!(book, ["id"]);
}

#[test]
fn java_to_plantuml_keeps_hierarchy() {
    let java = "
        public interface Named { String name(); }
        public abstract class Animal implements Named {
            protected int legs;
        }
        public class Dog extends Animal { }
    ";
    let puml = convert(java, "java", "plantuml").unwrap();
    let diagram = parse_plantuml(&puml).unwrap();
    let kinds: Vec<_> = diagram.classes.iter().map(|c| (c.name.as_str(), c.kind)).collect();
    assert_eq!(
        kinds,
        [
            ("Named", PumlKind::Interface),
            ("Animal", PumlKind::AbstractClass),
            ("Dog", PumlKind::Class),
        ]
    );
    let relations: Vec<_> = diagram
        .relations
        .iter()
        .map(|r| (r.source.as_str(), r.kind, r.target.as_str()))
        .collect();
    assert_eq!(
        relations,
        [
            ("Animal", PumlRelationKind::Implementation, "Named"),
            ("Dog", PumlRelationKind::Extension, "Animal"),
        ]
    );
}

#[test]
fn plantuml_to_java_keeps_methods() {
    let puml = "
@startuml
class Account {
  -balance : double
  +deposit(amount : double) : void
}
@enduml
";
    let java = convert(puml, "plantuml", "java").unwrap();
    let model = parse_java(&java).unwrap();
    let account = &model.classes[0];
    assert_eq!(account.fields[0].ty, "double");
    assert_eq!(account.fields[0].access_modifier.as_deref(), Some("private"));
    assert_eq!(account.methods[0].name, "deposit");
    assert_eq!(account.methods[0].parameters[0].ty, "double");
}

#[test]
fn linkml_to_csharp_and_back() {
    let yaml = "
id: https://example.org/shop
name: shop
default_range: string
classes:
  Order:
    attributes:
      number:
        required: true
      total:
        range: decimal
";
    let universal = domain_for_name("linkml").unwrap().read(yaml).unwrap();
    let total = universal.entity("Order").and_then(|e| e.property("total")).unwrap();
    assert_eq!(total.ty.universal_type, UniversalType::Number);

    let csharp = convert(yaml, "linkml", "csharp").unwrap();
    assert!(csharp.contains("decimal"), "{csharp}");
    let linkml = convert(&csharp, "csharp", "linkml").unwrap();
    let schema = parse_linkml(&linkml).unwrap().schema;
    let attrs: Vec<_> = schema.classes["Order"].attributes.keys().map(String::as_str).collect();
    assert_eq!(attrs.len(), 2);
}

#[test]
fn ofn_to_linkml_carries_relations() {
    let ofn = r#"{
        "iri": "https://example.org/slovník",
        "pojmy": [
            {"iri": "https://example.org/pojem/osoba", "typ": ["Pojem", "Třída"], "název": {"cs": "Osoba"}},
            {"iri": "https://example.org/pojem/vozidlo", "typ": ["Pojem", "Třída"], "název": {"cs": "Vozidlo"}},
            {
                "iri": "https://example.org/pojem/vlastník",
                "typ": ["Pojem", "Vztah"],
                "název": {"cs": "vlastník"},
                "definiční-obor": "https://example.org/pojem/vozidlo",
                "obor-hodnot": "https://example.org/pojem/osoba"
            }
        ]
    }"#;
    let universal = domain_for_name("ofn").unwrap().read(ofn).unwrap();
    let relationship = &universal.relationships[0];
    assert_eq!(
        (
            relationship.source_entity_label.as_str(),
            relationship.target_entity_label.as_str(),
            relationship.ty
        ),
        ("Vozidlo", "Osoba", RelationshipType::Association)
    );

    let linkml = domain_for_name("linkml").unwrap().render(&universal).unwrap();
    let schema = parse_linkml(&linkml).unwrap().schema;
    assert_eq!(
        schema.classes["Vozidlo"].attributes["vlastník"].range.as_deref(),
        Some("Osoba")
    );
}

#[test]
fn domain_lookup_by_extension() {
    let expected = [
        ("sql", "sql"),
        ("ddl", "sql"),
        ("java", "java"),
        ("cs", "csharp"),
        ("yaml", "linkml"),
        ("json", "jsonschema"),
        ("jsonld", "ofn"),
        ("puml", "plantuml"),
    ];
    for (ext, name) in expected {
        assert_eq!(domain_for_extension(ext).map(|d| d.name()), Some(name), "{ext}");
    }
}

#[test]
fn parse_errors_propagate() {
    let err = convert("public class User { private int id;", "java", "sql").unwrap_err();
    assert!(matches!(
        err,
        ConvertError::Parse(ParseError::Unbalanced { domain: "java", .. })
    ));

    let err = convert("{ not json", "jsonschema", "sql").unwrap_err();
    assert!(matches!(
        err,
        ConvertError::Parse(ParseError::Json { domain: "jsonschema", .. })
    ));
}
