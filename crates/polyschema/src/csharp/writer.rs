//! C# source writer: Allman braces and a file-scoped namespace.

use super::model::{Attribute, CSharpClass, CSharpKind, CSharpModel, CSharpProperty};
use crate::error::WriteError;
use crate::traits::Writer;
use std::fmt::Write;

const INDENT: &str = "    ";

pub struct CSharpWriter;

impl Writer for CSharpWriter {
    type Model = CSharpModel;

    fn write(&self, model: &CSharpModel) -> Result<String, WriteError> {
        let mut out = String::new();
        for using in &model.usings {
            let _ = writeln!(out, "using {using};");
        }
        if !model.usings.is_empty() {
            out.push('\n');
        }
        if let Some(namespace) = &model.namespace {
            let _ = writeln!(out, "namespace {namespace};\n");
        }
        let classes: Vec<String> = model.classes.iter().map(write_class).collect();
        out.push_str(&classes.join("\n"));
        Ok(out)
    }
}

/// Write a C# model as source text. The empty model is `""`.
pub fn write_csharp(model: &CSharpModel) -> Result<String, WriteError> {
    CSharpWriter.write(model)
}

fn write_attributes(out: &mut String, attributes: &[Attribute], indent: &str) {
    for attribute in attributes {
        let _ = write!(out, "{indent}[{}", attribute.name);
        if let Some(args) = &attribute.arguments {
            let _ = write!(out, "({args})");
        }
        out.push_str("]\n");
    }
}

fn write_class(class: &CSharpClass) -> String {
    let mut out = String::new();
    write_attributes(&mut out, &class.attributes, "");

    let mut header: Vec<&str> = Vec::new();
    header.extend(class.access_modifier.as_deref());
    for (set, keyword) in [
        (class.is_static, "static"),
        (class.is_abstract, "abstract"),
        (class.is_sealed, "sealed"),
        (class.is_partial, "partial"),
    ] {
        if set {
            header.push(keyword);
        }
    }
    header.push(class.kind.keyword());
    let _ = write!(out, "{} {}", header.join(" "), class.name);
    if let Some(params) = &class.type_parameters {
        let _ = write!(out, "<{params}>");
    }
    if !class.base_types.is_empty() {
        let _ = write!(out, " : {}", class.base_types.join(", "));
    }
    out.push_str("\n{\n");

    if class.kind == CSharpKind::Enum {
        let members: Vec<String> = class
            .enum_members
            .iter()
            .map(|m| format!("{INDENT}{m}"))
            .collect();
        if !members.is_empty() {
            out.push_str(&members.join(",\n"));
            out.push('\n');
        }
    } else {
        for property in &class.properties {
            write_property(&mut out, property);
        }
    }
    out.push_str("}\n");
    out
}

fn write_property(out: &mut String, property: &CSharpProperty) {
    write_attributes(out, &property.attributes, INDENT);
    out.push_str(INDENT);
    if let Some(access) = &property.access_modifier {
        let _ = write!(out, "{access} ");
    }
    for (set, keyword) in [
        (property.is_static, "static"),
        (property.is_virtual, "virtual"),
        (property.is_required, "required"),
    ] {
        if set {
            let _ = write!(out, "{keyword} ");
        }
    }
    let _ = write!(out, "{} {} {{ get; ", property.ty, property.name);
    if property.has_setter {
        if let Some(access) = &property.setter_access {
            let _ = write!(out, "{access} ");
        }
        out.push_str(if property.init_only { "init; " } else { "set; " });
    }
    out.push('}');
    if let Some(init) = &property.initializer {
        let _ = write!(out, " = {init};");
    }
    out.push('\n');
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::csharp::model::CSharpType;

    #[test]
    fn empty_model_is_empty_string() {
        assert_eq!(write_csharp(&CSharpModel::default()).unwrap(), "");
    }

    #[test]
    fn writes_allman_layout() {
        let mut product = CSharpClass::new("Product", CSharpKind::Class);
        product.access_modifier = Some("public".into());
        product.base_types = vec!["EntityBase".into()];
        let mut id = CSharpProperty::new("Id", CSharpType::parse("int"));
        id.attributes.push(Attribute {
            name: "Key".into(),
            arguments: None,
        });
        let mut name = CSharpProperty::new("Name", CSharpType::parse("string"));
        name.init_only = true;
        name.initializer = Some("\"\"".into());
        product.properties = vec![id, name, CSharpProperty::new("Price", CSharpType::parse("decimal?"))];

        let mut status = CSharpClass::new("Status", CSharpKind::Enum);
        status.enum_members = vec!["Open".into(), "Closed".into()];

        let model = CSharpModel {
            usings: vec!["System".into()],
            namespace: Some("Shop".into()),
            classes: vec![product, status],
        };
        insta::assert_snapshot!(write_csharp(&model).unwrap().trim_end(), @r#"
        using System;

        namespace Shop;

        public class Product : EntityBase
        {
            [Key]
            public int Id { get; set; }
            public string Name { get; init; } = "";
            public decimal? Price { get; set; }
        }

        enum Status
        {
            Open,
            Closed
        }
        "#);
    }
}
