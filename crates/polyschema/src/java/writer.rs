//! Java source writer.

use super::model::{Annotation, ClassKind, JavaClass, JavaField, JavaMethod, JavaModel, JavaParameter};
use crate::error::WriteError;
use crate::traits::Writer;
use std::fmt::Write;

const INDENT: &str = "    ";

pub struct JavaWriter;

impl Writer for JavaWriter {
    type Model = JavaModel;

    fn write(&self, model: &JavaModel) -> Result<String, WriteError> {
        let mut out = String::new();
        if let Some(package) = &model.package {
            let _ = writeln!(out, "package {package};\n");
        }
        for import in &model.imports {
            let _ = writeln!(out, "import {import};");
        }
        if !model.imports.is_empty() {
            out.push('\n');
        }
        let classes: Vec<String> = model.classes.iter().map(write_class).collect();
        out.push_str(&classes.join("\n"));
        Ok(out)
    }
}

/// Write a Java model as source text. The empty model is `""`.
pub fn write_java(model: &JavaModel) -> Result<String, WriteError> {
    JavaWriter.write(model)
}

fn write_annotations(out: &mut String, annotations: &[Annotation], indent: &str) {
    for annotation in annotations {
        out.push_str(indent);
        out.push('@');
        out.push_str(&annotation.name);
        if let Some(args) = &annotation.arguments {
            let _ = write!(out, "({args})");
        }
        out.push('\n');
    }
}

fn write_class(class: &JavaClass) -> String {
    let mut out = String::new();
    write_annotations(&mut out, &class.annotations, "");

    let mut header = Vec::new();
    header.extend(class.access_modifier.as_deref());
    if class.is_abstract && class.kind != ClassKind::Interface {
        header.push("abstract");
    }
    if class.is_static {
        header.push("static");
    }
    if class.is_final {
        header.push("final");
    }
    header.push(class.kind.keyword());
    out.push_str(&header.join(" "));
    let _ = write!(out, " {}", class.name);
    if let Some(params) = &class.type_parameters {
        let _ = write!(out, "<{params}>");
    }
    if class.kind == ClassKind::Record {
        let _ = write!(out, "({})", parameter_list(&class.components));
    }
    if !class.extends.is_empty() {
        let _ = write!(out, " extends {}", class.extends.join(", "));
    }
    if !class.implements.is_empty() {
        let _ = write!(out, " implements {}", class.implements.join(", "));
    }
    out.push_str(" {\n");

    let mut sections = Vec::new();
    if !class.enum_constants.is_empty() {
        let terminator = if class.fields.is_empty() && class.methods.is_empty() { "" } else { ";" };
        sections.push(format!("{INDENT}{}{terminator}\n", class.enum_constants.join(", ")));
    }
    if !class.fields.is_empty() {
        let mut fields = String::new();
        for field in &class.fields {
            write_field(&mut fields, field);
        }
        sections.push(fields);
    }
    let abstract_by_default = class.kind == ClassKind::Interface;
    for method in &class.methods {
        let mut text = String::new();
        write_method(&mut text, method, abstract_by_default);
        sections.push(text);
    }
    out.push_str(&sections.join("\n"));
    out.push_str("}\n");
    out
}

fn write_field(out: &mut String, field: &JavaField) {
    write_annotations(out, &field.annotations, INDENT);
    out.push_str(INDENT);
    if let Some(access) = &field.access_modifier {
        let _ = write!(out, "{access} ");
    }
    if field.is_static {
        out.push_str("static ");
    }
    if field.is_final {
        out.push_str("final ");
    }
    let _ = write!(out, "{} {}", field.ty, field.name);
    if let Some(init) = &field.initializer {
        let _ = write!(out, " = {init}");
    }
    out.push_str(";\n");
}

fn write_method(out: &mut String, method: &JavaMethod, abstract_by_default: bool) {
    write_annotations(out, &method.annotations, INDENT);
    out.push_str(INDENT);
    if let Some(access) = &method.access_modifier {
        let _ = write!(out, "{access} ");
    }
    if method.is_static {
        out.push_str("static ");
    }
    if method.is_abstract {
        out.push_str("abstract ");
    }
    if let Some(ret) = &method.return_type {
        let _ = write!(out, "{ret} ");
    }
    let _ = write!(out, "{}({})", method.name, parameter_list(&method.parameters));

    match &method.body {
        None if method.is_abstract || abstract_by_default => out.push_str(";\n"),
        body => {
            out.push_str(" {\n");
            for line in body.as_deref().unwrap_or_default().lines() {
                let line = line.trim();
                if !line.is_empty() {
                    let _ = writeln!(out, "{INDENT}{INDENT}{line}");
                }
            }
            let _ = writeln!(out, "{INDENT}}}");
        }
    }
}

fn parameter_list(params: &[JavaParameter]) -> String {
    params
        .iter()
        .map(|p| format!("{} {}", p.ty, p.name))
        .collect::<Vec<_>>()
        .join(", ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_model_is_empty_string() {
        assert_eq!(write_java(&JavaModel::default()).unwrap(), "");
    }

    #[test]
    fn writes_class_layout() {
        let mut user = JavaClass::new("User", ClassKind::Class);
        user.access_modifier = Some("public".into());
        user.annotations.push(Annotation {
            name: "Entity".into(),
            arguments: None,
        });
        let mut id = JavaField::new("id", "Long");
        id.access_modifier = Some("private".into());
        id.annotations.push(Annotation {
            name: "Id".into(),
            arguments: None,
        });
        user.fields.push(id);
        user.methods.push(JavaMethod {
            name: "getId".into(),
            return_type: Some("Long".into()),
            access_modifier: Some("public".into()),
            body: Some("return id;".into()),
            ..Default::default()
        });
        let model = JavaModel {
            package: Some("com.example".into()),
            imports: vec!["java.util.List".into()],
            classes: vec![user, JavaClass::new("Post", ClassKind::Class)],
        };
        insta::assert_snapshot!(write_java(&model).unwrap().trim_end(), @r"
        package com.example;

        import java.util.List;

        @Entity
        public class User {
            @Id
            private Long id;

            public Long getId() {
                return id;
            }
        }

        class Post {
        }
        ");
    }

    #[test]
    fn interface_methods_end_in_semicolon() {
        let mut repo = JavaClass::new("Repo", ClassKind::Interface);
        repo.methods.push(JavaMethod {
            name: "count".into(),
            return_type: Some("long".into()),
            ..Default::default()
        });
        let text = write_java(&JavaModel {
            classes: vec![repo],
            ..Default::default()
        })
        .unwrap();
        assert_eq!(text, "interface Repo {\n    long count();\n}\n");
    }
}
