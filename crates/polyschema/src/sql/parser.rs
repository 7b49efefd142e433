//! SQL DDL parser.
//!
//! Only `CREATE TABLE` statements are read; anything else in the script is
//! ignored. Column lists are carved with the shared brace matcher so that
//! `DECIMAL(10, 2)` and `CHECK (a IN (1, 2))` never split a definition.

use super::model::{Column, ColumnReference, ConstraintKind, SqlDiagram, SqlType, Table, TableConstraint};
use super::vocabulary::is_supported;
use crate::error::ParseError;
use crate::text::{CommentStyle, find_blocks, first_unbalanced, split_top_level, strip_comments, unquote_ident};
use crate::traits::Parser;
use regex::Regex;
use std::sync::LazyLock;

const DOMAIN: &str = "sql";

/// A possibly quoted identifier, optionally schema-qualified.
const IDENT: &str = r#"(?:`[^`]+`|"[^"]+"|\[[^\]]+\]|[\w.$]+)"#;

static CREATE_TABLE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(&format!(
        r"(?i)\bCREATE\s+(?:TEMPORARY\s+|TEMP\s+)?TABLE\s+(?:IF\s+NOT\s+EXISTS\s+)?({IDENT})\s*\("
    ))
    .unwrap()
});
static CREATE_TABLE_KEYWORD: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)\bCREATE\s+(?:TEMPORARY\s+|TEMP\s+)?TABLE\b").unwrap());

static COLUMN_HEAD: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(&format!(r"^({IDENT})\s+([A-Za-z_]\w*)\s*")).unwrap());
static NOT_NULL: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"(?i)^NOT\s+NULL\b").unwrap());
static NULL: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"(?i)^NULL\b").unwrap());
static DEFAULT: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"(?i)^DEFAULT\s+").unwrap());
static PRIMARY_KEY: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)^PRIMARY\s+KEY\b").unwrap());
static UNIQUE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"(?i)^UNIQUE(?:\s+KEY)?\b").unwrap());
static AUTO_INCREMENT: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)^(?:AUTO_INCREMENT|AUTOINCREMENT|IDENTITY(?:\s*\(\s*\d+\s*,\s*\d+\s*\))?)")
        .unwrap()
});
static REFERENCES: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(&format!(r"(?i)^REFERENCES\s+({IDENT})\s*(?:\(\s*({IDENT})\s*\))?")).unwrap()
});
static REFERENTIAL_ACTION: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)ON\s+(DELETE|UPDATE)\s+(SET\s+NULL|SET\s+DEFAULT|NO\s+ACTION|CASCADE|RESTRICT)")
        .unwrap()
});

static CONSTRAINT_NAME: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(&format!(r"(?is)^CONSTRAINT\s+({IDENT})\s+(.*)$")).unwrap());
static TABLE_PRIMARY_KEY: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?is)^PRIMARY\s+KEY\s*\((.*)\)$").unwrap());
static TABLE_UNIQUE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?is)^UNIQUE(?:\s+(?:KEY|INDEX))?(?:\s+\w+)?\s*\((.*)\)$").unwrap()
});
static TABLE_FOREIGN_KEY: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(&format!(
        r"(?is)^FOREIGN\s+KEY\s*\(([^)]*)\)\s*REFERENCES\s+({IDENT})\s*(?:\(([^)]*)\))?(.*)$"
    ))
    .unwrap()
});
static TABLE_CHECK: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"(?is)^CHECK\s*\((.*)\)$").unwrap());
static CONSTRAINT_START: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)^(?:CONSTRAINT|PRIMARY\s+KEY|UNIQUE|FOREIGN\s+KEY|CHECK)\b").unwrap()
});
static INDEX_START: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)^(?:KEY|INDEX|FULLTEXT|SPATIAL)\b").unwrap());

/// Parser for `CREATE TABLE` scripts.
pub struct SqlParser;

impl Parser for SqlParser {
    type Model = SqlDiagram;

    fn parse(&self, text: &str) -> Result<SqlDiagram, ParseError> {
        let src = strip_comments(text, CommentStyle::Sql);
        if let Some(at) = first_unbalanced(&src, '(', ')') {
            return Err(ParseError::unbalanced(DOMAIN, &src[at..]));
        }

        let blocks = find_blocks(&src, &CREATE_TABLE, '(', ')')
            .map_err(|u| ParseError::unbalanced(DOMAIN, &src[u.at..]))?;
        let declared = CREATE_TABLE_KEYWORD.find_iter(&src).count();
        if declared > blocks.len() {
            return Err(ParseError::syntax(
                DOMAIN,
                "CREATE TABLE statement without a column list",
            ));
        }

        let mut diagram = SqlDiagram::default();
        for block in blocks {
            let name = unquote_ident(&block.captures[1]).to_string();
            tracing::trace!(table = %name, "parsing table");
            diagram.tables.push(parse_table(name, block.body));
        }
        Ok(diagram)
    }
}

/// Parse SQL DDL text.
pub fn parse_sql(text: &str) -> Result<SqlDiagram, ParseError> {
    SqlParser.parse(text)
}

fn parse_table(name: String, body: &str) -> Table {
    let mut table = Table {
        name,
        ..Default::default()
    };
    for part in split_top_level(body, ',') {
        let part = part.trim();
        if part.is_empty() {
            continue;
        }
        if CONSTRAINT_START.is_match(part) {
            match parse_table_constraint(part) {
                Some(constraint) => table.constraints.push(constraint),
                None => tracing::warn!(
                    table = %table.name,
                    constraint = part,
                    "unparseable table constraint, skipping"
                ),
            }
        } else if INDEX_START.is_match(part) {
            tracing::debug!(table = %table.name, index = part, "index definition ignored");
        } else if let Some(column) = parse_column(&table.name, part) {
            table.columns.push(column);
        }
    }
    table
}

fn parse_column(table: &str, def: &str) -> Option<Column> {
    let Some(head) = COLUMN_HEAD.captures(def) else {
        tracing::warn!(table, column = def, "unrecognized column definition, skipping");
        return None;
    };
    let name = unquote_ident(&head[1]).to_string();
    let base = &head[2];
    let mut rest = &def[head.get(0).map_or(def.len(), |m| m.end())..];

    let mut data_type = SqlType::new(base);
    if rest.starts_with('(') {
        let close = crate::text::matching_close(rest, 0, '(', ')')?;
        data_type = SqlType::parse(&format!("{base}{}", &rest[..=close]));
        rest = &rest[close + 1..];
    }
    if !is_supported(&data_type.base) {
        tracing::warn!(table, column = %name, ty = %data_type.base, "unsupported column type, skipping");
        return None;
    }

    let mut column = Column::new(name, data_type);
    let mut rest = rest.trim_start();
    while !rest.is_empty() {
        let consumed = if let Some(m) = NOT_NULL.find(rest) {
            column.nullable = false;
            m.end()
        } else if let Some(m) = NULL.find(rest) {
            column.nullable = true;
            m.end()
        } else if let Some(m) = PRIMARY_KEY.find(rest) {
            column.primary_key = true;
            m.end()
        } else if let Some(m) = UNIQUE.find(rest) {
            column.unique = true;
            m.end()
        } else if let Some(m) = AUTO_INCREMENT.find(rest) {
            column.auto_increment = true;
            m.end()
        } else if let Some(m) = DEFAULT.find(rest) {
            let value_len = default_value_len(&rest[m.end()..]);
            column.default = Some(rest[m.end()..m.end() + value_len].to_string());
            m.end() + value_len
        } else if let Some(caps) = REFERENCES.captures(rest) {
            column.references = Some(ColumnReference {
                table: unquote_ident(&caps[1]).to_string(),
                column: caps.get(2).map(|c| unquote_ident(c.as_str()).to_string()),
                ..Default::default()
            });
            caps.get(0).map_or(rest.len(), |m| m.end())
        } else if let Some(caps) = REFERENTIAL_ACTION.captures(rest).filter(|c| c.get(0).is_some_and(|m| m.start() == 0)) {
            match column.references.as_mut() {
                Some(reference) => {
                    let (kind, action) = referential_action(&caps);
                    if kind == Action::Delete {
                        reference.on_delete = Some(action);
                    } else {
                        reference.on_update = Some(action);
                    }
                }
                None => tracing::debug!(table, column = %column.name, "referential action without REFERENCES ignored"),
            }
            caps.get(0).map_or(rest.len(), |m| m.end())
        } else {
            let token_len = rest.find(char::is_whitespace).unwrap_or(rest.len());
            tracing::debug!(table, column = %column.name, option = &rest[..token_len], "column option ignored");
            token_len
        };
        rest = rest[consumed..].trim_start();
    }
    Some(column)
}

/// Byte length of a `DEFAULT` value: a quoted literal, a parenthesized
/// expression, or a single bare token.
fn default_value_len(s: &str) -> usize {
    match s.chars().next() {
        Some(q @ ('\'' | '"')) => {
            let mut escaped = false;
            let mut chars = s.char_indices().skip(1).peekable();
            while let Some((i, c)) = chars.next() {
                if escaped {
                    escaped = false;
                } else if c == '\\' {
                    escaped = true;
                } else if c == q {
                    // a doubled quote is an escaped quote
                    if chars.next_if(|&(_, next)| next == q).is_none() {
                        return i + 1;
                    }
                }
            }
            s.len()
        }
        Some('(') => crate::text::matching_close(s, 0, '(', ')').map_or(s.len(), |c| c + 1),
        _ => {
            let mut end = s.find(char::is_whitespace).unwrap_or(s.len());
            // function call defaults such as `CURRENT_TIMESTAMP()` or `now()`
            if let Some(open) = s[..end].find('(') {
                if let Some(close) = crate::text::matching_close(s, open, '(', ')') {
                    end = end.max(close + 1);
                }
            }
            end
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Action {
    Delete,
    Update,
}

/// `ON DELETE SET  null` → (`Delete`, `SET NULL`).
fn referential_action(caps: &regex::Captures<'_>) -> (Action, String) {
    let kind = if caps[1].eq_ignore_ascii_case("DELETE") {
        Action::Delete
    } else {
        Action::Update
    };
    (kind, crate::text::squash_whitespace(&caps[2]).to_ascii_uppercase())
}

fn parse_table_constraint(def: &str) -> Option<TableConstraint> {
    let (name, body) = match CONSTRAINT_NAME.captures(def) {
        Some(caps) => (
            Some(unquote_ident(&caps[1]).to_string()),
            caps.get(2).map_or("", |m| m.as_str()).trim(),
        ),
        None => (None, def.trim()),
    };

    let kind = if let Some(caps) = TABLE_PRIMARY_KEY.captures(body) {
        ConstraintKind::PrimaryKey(column_list(&caps[1]))
    } else if let Some(caps) = TABLE_FOREIGN_KEY.captures(body) {
        let tail = caps.get(4).map_or("", |m| m.as_str());
        let mut on_delete = None;
        let mut on_update = None;
        for caps in REFERENTIAL_ACTION.captures_iter(tail) {
            match referential_action(&caps) {
                (Action::Delete, value) => on_delete = Some(value),
                (Action::Update, value) => on_update = Some(value),
            }
        }
        ConstraintKind::ForeignKey {
            columns: column_list(&caps[1]),
            ref_table: unquote_ident(&caps[2]).to_string(),
            ref_columns: caps.get(3).map(|m| column_list(m.as_str())).unwrap_or_default(),
            on_delete,
            on_update,
        }
    } else if let Some(caps) = TABLE_UNIQUE.captures(body) {
        ConstraintKind::Unique(column_list(&caps[1]))
    } else if let Some(caps) = TABLE_CHECK.captures(body) {
        ConstraintKind::Check(caps[1].trim().to_string())
    } else {
        return None;
    };
    Some(TableConstraint { name, kind })
}

fn column_list(s: &str) -> Vec<String> {
    split_top_level(s, ',')
        .iter()
        .map(|c| unquote_ident(c).to_string())
        .filter(|c| !c.is_empty())
        .collect()
}
