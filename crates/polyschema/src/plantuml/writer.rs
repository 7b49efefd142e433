//! PlantUML class diagram writer.

use super::model::{PlantUmlDiagram, PumlClass, PumlMember, PumlRelation};
use crate::error::WriteError;
use crate::traits::Writer;
use std::fmt::Write;

/// Document written for an empty diagram.
pub const EMPTY_DOCUMENT: &str = "@startuml\n@enduml\n";

pub struct PlantUmlWriter;

impl Writer for PlantUmlWriter {
    type Model = PlantUmlDiagram;

    fn write(&self, diagram: &PlantUmlDiagram) -> Result<String, WriteError> {
        let mut sections = Vec::new();
        if let Some(title) = &diagram.title {
            sections.push(format!("title {title}"));
        }
        sections.extend(diagram.classes.iter().map(write_class));
        if !diagram.relations.is_empty() {
            let lines: Vec<String> = diagram.relations.iter().map(write_relation).collect();
            sections.push(lines.join("\n"));
        }
        let mut out = String::from("@startuml\n");
        if !sections.is_empty() {
            out.push_str(&sections.join("\n\n"));
            out.push('\n');
        }
        out.push_str("@enduml\n");
        Ok(out)
    }
}

pub fn write_plantuml(diagram: &PlantUmlDiagram) -> Result<String, WriteError> {
    PlantUmlWriter.write(diagram)
}

fn write_class(class: &PumlClass) -> String {
    let mut out = format!("{} {}", class.kind.keyword(), quote(&class.name));
    if let Some(stereotype) = &class.stereotype {
        let _ = write!(out, " <<{stereotype}>>");
    }
    if class.members.is_empty() {
        return out;
    }
    out.push_str(" {\n");
    for member in &class.members {
        let _ = writeln!(out, "  {}", write_member(member));
    }
    out.push('}');
    out
}

fn write_member(member: &PumlMember) -> String {
    let mut out = String::new();
    if member.is_static {
        out.push_str("{static} ");
    }
    if member.is_abstract {
        out.push_str("{abstract} ");
    }
    if let Some(visibility) = member.visibility {
        out.push(visibility.symbol());
    }
    out.push_str(&member.name);
    if let Some(parameters) = &member.parameters {
        let params: Vec<String> = parameters.iter().map(ToString::to_string).collect();
        let _ = write!(out, "({})", params.join(", "));
    }
    if let Some(ty) = &member.ty {
        let _ = write!(out, " : {ty}");
    }
    out
}

fn write_relation(relation: &PumlRelation) -> String {
    let mut out = quote(&relation.source);
    if let Some(card) = &relation.source_cardinality {
        let _ = write!(out, " \"{card}\"");
    }
    let _ = write!(out, " {}", relation.kind.arrow());
    if let Some(card) = &relation.target_cardinality {
        let _ = write!(out, " \"{card}\"");
    }
    let _ = write!(out, " {}", quote(&relation.target));
    if let Some(label) = &relation.label {
        let _ = write!(out, " : {label}");
    }
    out
}

/// Names with characters outside `[\w.]` need quotes.
fn quote(name: &str) -> String {
    if name.chars().all(|c| c.is_alphanumeric() || c == '_' || c == '.') {
        name.to_string()
    } else {
        format!("\"{name}\"")
    }
}
