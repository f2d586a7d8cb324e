//! DDL import: rebuilds a [`Model`] from CREATE TABLE / ALTER TABLE text.
//!
//! The parser is a best-effort scanner over free-form, possibly noisy SQL:
//! unrecognized statements and clauses are skipped, never fatal. Two passes
//! are required because foreign keys may reference tables declared later.

use std::collections::HashMap;

use serde::Serialize;
use thiserror::Error;

use super::split::smart_split;
use crate::model::{
    Attribute, CardinalitySet, ColorScheme, Entity, IdGen, Model, Relationship,
};

#[derive(Debug, Error)]
pub enum ImportError {
    #[error("no CREATE TABLE statements found")]
    NoTablesFound,
}

/// Result of a successful import.
#[derive(Debug, Clone, Serialize)]
pub struct Import {
    pub model: Model,
    /// Recognized CREATE TABLE and ALTER TABLE foreign-key statements.
    pub statements: usize,
}

/// Grid pitch for auto-placing imported entities.
const GRID_ORIGIN_X: f64 = 100.0;
const GRID_ORIGIN_Y: f64 = 100.0;
const GRID_PITCH_X: f64 = 350.0;
const GRID_PITCH_Y: f64 = 300.0;
const GRID_COLUMNS: usize = 4;

const IMPORTED_ENTITY_NOTE: &str = "Table imported via SQL.";
const IMPORTED_REL_NOTE: &str = "Imported via SQL.";
const IMPORTED_REL_LABEL: &str = "REF";

/// Parse DDL text into a fresh model. The caller's current model is never
/// touched; on error nothing is produced, so import stays all-or-nothing.
pub fn parse_ddl(source: &str) -> Result<Import, ImportError> {
    let cleaned = strip_comments(source);
    let statements = smart_split(&cleaned, ';');

    let mut ids = IdGen::new();
    let mut entities: Vec<Entity> = Vec::new();
    // Upper-cased table name -> entity id. SQL identifiers are treated
    // case-insensitively here; duplicate names keep the last id but still
    // produce distinct entities.
    let mut name_to_id: HashMap<String, String> = HashMap::new();
    // (source table name, target table name), both as written.
    let mut pending: Vec<(String, String)> = Vec::new();
    let mut recognized = 0usize;

    // Pass 1: CREATE TABLE statements.
    for stmt in &statements {
        let Some((table_name, body)) = match_create_table(stmt) else {
            continue;
        };

        let id = ids.next_id("ent");
        name_to_id.insert(table_name.to_ascii_uppercase(), id.clone());

        let mut attributes = Vec::new();
        for clause in smart_split(body, ',') {
            parse_clause(clause, &table_name, &mut ids, &mut attributes, &mut pending);
        }

        let index = entities.len();
        let col = index % GRID_COLUMNS;
        let row = index / GRID_COLUMNS;

        entities.push(Entity {
            id,
            title: table_name.to_ascii_uppercase(),
            color_scheme: ColorScheme::Blue,
            x: GRID_ORIGIN_X + col as f64 * GRID_PITCH_X,
            y: GRID_ORIGIN_Y + row as f64 * GRID_PITCH_Y,
            attributes,
            description: Some(IMPORTED_ENTITY_NOTE.to_string()),
        });
        recognized += 1;
    }

    if entities.is_empty() {
        return Err(ImportError::NoTablesFound);
    }

    // Pass 2: ALTER TABLE ... ADD CONSTRAINT ... FOREIGN KEY.
    for stmt in &statements {
        if let Some((source_table, target_table)) = match_alter_table_fk(stmt) {
            pending.push((source_table, target_table));
            recognized += 1;
        }
    }

    // Resolve pending relationships. A foreign key always reads as
    // one-on-the-referenced-side, many-on-the-referencing-side.
    let mut relationships = Vec::new();
    for (source, target) in pending {
        let source_id = name_to_id.get(&source.to_ascii_uppercase());
        let target_id = name_to_id.get(&target.to_ascii_uppercase());
        let (Some(source_id), Some(target_id)) = (source_id, target_id) else {
            // Unknown table name: dropped, not an error
            continue;
        };
        relationships.push(Relationship {
            id: ids.next_id("rel"),
            from: target_id.clone(),
            to: source_id.clone(),
            card_from: CardinalitySet::one(),
            card_to: CardinalitySet::many(),
            label: IMPORTED_REL_LABEL.to_string(),
            description: Some(IMPORTED_REL_NOTE.to_string()),
        });
    }

    Ok(Import {
        model: Model {
            entities,
            relationships,
        },
        statements: recognized,
    })
}

/// Remove `-- ...` line comments and `/* ... */` block comments so the
/// scanner never operates on commented-out text.
fn strip_comments(source: &str) -> String {
    let mut out = String::with_capacity(source.len());
    let mut chars = source.chars().peekable();

    while let Some(c) = chars.next() {
        match c {
            '-' if chars.peek() == Some(&'-') => {
                for c in chars.by_ref() {
                    if c == '\n' {
                        out.push('\n');
                        break;
                    }
                }
            }
            '/' if chars.peek() == Some(&'*') => {
                chars.next();
                let mut prev = '\0';
                for c in chars.by_ref() {
                    if prev == '*' && c == '/' {
                        break;
                    }
                    prev = c;
                }
            }
            _ => out.push(c),
        }
    }

    out
}

/// Match `CREATE TABLE [IF NOT EXISTS] <name> ( <body> )`, returning the
/// table name and the parenthesized body. Anything trailing the close
/// paren (engine options and the like) is ignored.
fn match_create_table(stmt: &str) -> Option<(String, &str)> {
    let rest = eat_keyword(stmt, "CREATE")?;
    let rest = eat_keyword(rest, "TABLE")?;
    let rest = match eat_keyword(rest, "IF") {
        Some(r) => {
            let r = eat_keyword(r, "NOT")?;
            eat_keyword(r, "EXISTS")?
        }
        None => rest,
    };

    let (name, rest) = read_identifier(rest)?;
    let rest = rest.trim_start();
    let body = read_paren_body(rest)?;
    Some((name, body))
}

/// Match `ALTER TABLE <table> ADD CONSTRAINT ... FOREIGN KEY ...
/// REFERENCES <target>`, tolerant of arbitrary line breaks (statements are
/// already split on top-level semicolons).
fn match_alter_table_fk(stmt: &str) -> Option<(String, String)> {
    let rest = eat_keyword(stmt, "ALTER")?;
    let rest = eat_keyword(rest, "TABLE")?;
    let (table, rest) = read_identifier(rest)?;
    let rest = eat_keyword(rest, "ADD")?;
    let rest = eat_keyword(rest, "CONSTRAINT")?;
    find_word(rest, "FOREIGN KEY")?;
    let target = references_target(rest)?;
    Some((table, target))
}

/// Classify one comma-separated table-body clause.
fn parse_clause(
    clause: &str,
    table_name: &str,
    ids: &mut IdGen,
    attributes: &mut Vec<Attribute>,
    pending: &mut Vec<(String, String)>,
) {
    let upper = clause.to_ascii_uppercase();

    // Table-level foreign keys become pending relationships, no attribute.
    if upper.starts_with("FOREIGN KEY") || upper.starts_with("CONSTRAINT") {
        if let Some(target) = references_target(clause) {
            pending.push((table_name.to_string(), target));
        }
        return;
    }

    // Indexes, unique constraints and table-level primary keys are
    // acknowledged but not modeled.
    if upper.starts_with("INDEX")
        || upper.starts_with("UNIQUE")
        || (upper.starts_with("PRIMARY KEY") && clause.contains('('))
    {
        return;
    }

    // Column definition: first token is the name, the remainder the type.
    let mut tokens = clause.split_whitespace();
    let Some(raw_name) = tokens.next() else {
        return;
    };
    let remainder: Vec<&str> = tokens.collect();
    if remainder.is_empty() {
        // No discernible type: dropped silently
        return;
    }

    let name = raw_name.trim_matches(|c| c == '"' || c == '`').to_string();
    let is_key = find_word(&upper, "PRIMARY KEY").is_some();
    let mut type_text = remainder.join(" ");

    // Inline REFERENCES records a relationship and leaves the type clean.
    if let Some(pos) = find_word(&type_text, "REFERENCES") {
        if let Some(target) = references_target(&type_text[pos..]) {
            pending.push((table_name.to_string(), target));
        }
        type_text.truncate(pos);
    }

    // Constraint keywords are not part of the displayed type.
    for keyword in ["PRIMARY KEY", "NOT NULL", "NULL"] {
        while let Some(pos) = find_word(&type_text, keyword) {
            type_text.replace_range(pos..pos + keyword.len(), " ");
        }
    }
    if let Some(pos) = find_word(&type_text, "DEFAULT") {
        type_text.truncate(pos);
    }

    // Intentionally simplified type model: only the first token survives.
    let typ = type_text.split_whitespace().next().unwrap_or("").to_string();

    attributes.push(Attribute {
        id: ids.next_id("attr"),
        name,
        typ,
        is_key,
    });
}

/// Extract the table name following a `REFERENCES` keyword, if any.
fn references_target(clause: &str) -> Option<String> {
    let pos = find_word(clause, "REFERENCES")?;
    let rest = &clause[pos + "REFERENCES".len()..];
    let (target, _) = read_identifier(rest)?;
    Some(target)
}

/// Case-insensitively eat `keyword` at the start of `input` (after leading
/// whitespace), requiring a word boundary, and return the remainder.
fn eat_keyword<'a>(input: &'a str, keyword: &str) -> Option<&'a str> {
    let input = input.trim_start();
    if input.len() < keyword.len() || !input.is_char_boundary(keyword.len()) {
        return None;
    }
    let (head, rest) = input.split_at(keyword.len());
    if !head.eq_ignore_ascii_case(keyword) {
        return None;
    }
    if rest.chars().next().is_some_and(is_ident_char) {
        return None;
    }
    Some(rest)
}

/// Read an identifier, optionally wrapped in a single layer of `"` or
/// backtick quoting. Returns the unquoted name and the remainder.
fn read_identifier(input: &str) -> Option<(String, &str)> {
    let input = input.trim_start();
    let mut chars = input.char_indices();

    match chars.next() {
        Some((_, quote @ ('"' | '`'))) => {
            let inner = &input[1..];
            let end = inner.find(quote)?;
            Some((inner[..end].to_string(), &inner[end + 1..]))
        }
        Some((_, c)) if is_ident_char(c) => {
            let end = input
                .find(|c: char| !is_ident_char(c))
                .unwrap_or(input.len());
            Some((input[..end].to_string(), &input[end..]))
        }
        _ => None,
    }
}

/// Read a balanced `( ... )` body starting at `input`, returning the inside.
/// A missing close paren yields the rest of the string (best effort).
fn read_paren_body(input: &str) -> Option<&str> {
    if !input.starts_with('(') {
        return None;
    }
    let mut depth = 0u32;
    for (i, c) in input.char_indices() {
        match c {
            '(' => depth += 1,
            ')' => {
                depth -= 1;
                if depth == 0 {
                    return Some(&input[1..i]);
                }
            }
            _ => {}
        }
    }
    Some(&input[1..])
}

/// Find `word` (which may itself contain spaces) case-insensitively in
/// `haystack`, requiring word boundaries on both sides. Byte offsets are
/// stable because comparison is ASCII-only.
fn find_word(haystack: &str, word: &str) -> Option<usize> {
    let upper = haystack.to_ascii_uppercase();
    let mut start = 0;
    while let Some(pos) = upper[start..].find(word) {
        let abs = start + pos;
        let before_ok = abs == 0
            || !is_ident_char(upper[..abs].chars().next_back().unwrap_or(' '));
        let after = abs + word.len();
        let after_ok = after >= upper.len()
            || !is_ident_char(upper[after..].chars().next().unwrap_or(' '));
        if before_ok && after_ok {
            return Some(abs);
        }
        start = abs + word.len();
    }
    None
}

fn is_ident_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '_'
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::CardinalityMarker;

    #[test]
    fn test_parse_simple_table() {
        let sql = r#"
            CREATE TABLE users (
                id INT PRIMARY KEY,
                email VARCHAR(255) NOT NULL
            );
        "#;

        let import = parse_ddl(sql).unwrap();
        assert_eq!(import.statements, 1);
        assert_eq!(import.model.entities.len(), 1);

        let users = &import.model.entities[0];
        assert_eq!(users.title, "USERS");
        assert_eq!(users.attributes.len(), 2);
        assert_eq!(users.attributes[0].name, "id");
        assert_eq!(users.attributes[0].typ, "INT");
        assert!(users.attributes[0].is_key);
        assert_eq!(users.attributes[1].name, "email");
        assert_eq!(users.attributes[1].typ, "VARCHAR(255)");
        assert!(!users.attributes[1].is_key);
    }

    #[test]
    fn test_inline_references_scenario() {
        let sql = "CREATE TABLE A (id INT PRIMARY KEY, b_id INT REFERENCES B(id)); \
                   CREATE TABLE B (id INT PRIMARY KEY);";

        let import = parse_ddl(sql).unwrap();
        let model = &import.model;
        assert_eq!(model.entities.len(), 2);

        let a = &model.entities[0];
        let b = &model.entities[1];
        assert_eq!(a.title, "A");
        assert_eq!(a.attributes.len(), 2);
        assert!(a.attributes[0].is_key);
        assert_eq!(a.attributes[1].name, "b_id");
        assert_eq!(a.attributes[1].typ, "INT");
        assert_eq!(b.title, "B");
        assert_eq!(b.attributes.len(), 1);
        assert!(b.attributes[0].is_key);

        assert_eq!(model.relationships.len(), 1);
        let rel = &model.relationships[0];
        assert_eq!(rel.from, b.id);
        assert_eq!(rel.to, a.id);
        assert!(rel.card_from.includes(CardinalityMarker::One));
        assert!(rel.card_to.includes(CardinalityMarker::Many));
    }

    #[test]
    fn test_decimal_comma_stays_one_attribute() {
        let sql = "CREATE TABLE goals (target DECIMAL(10,2), deadline DATE);";
        let import = parse_ddl(sql).unwrap();
        let goals = &import.model.entities[0];
        assert_eq!(goals.attributes.len(), 2);
        assert_eq!(goals.attributes[0].typ, "DECIMAL(10,2)");
    }

    #[test]
    fn test_comments_are_ignored() {
        let sql = r#"
            -- CREATE TABLE commented_out (id INT);
            /* CREATE TABLE also_commented (id INT); */
            CREATE TABLE real_table (id INT PRIMARY KEY);
        "#;
        let import = parse_ddl(sql).unwrap();
        assert_eq!(import.model.entities.len(), 1);
        assert_eq!(import.model.entities[0].title, "REAL_TABLE");
    }

    #[test]
    fn test_table_level_foreign_key() {
        let sql = r#"
            CREATE TABLE users (id INT PRIMARY KEY);
            CREATE TABLE posts (
                id INT PRIMARY KEY,
                user_id INT,
                CONSTRAINT fk_user FOREIGN KEY (user_id) REFERENCES users(id)
            );
        "#;
        let import = parse_ddl(sql).unwrap();
        assert_eq!(import.model.entities[1].attributes.len(), 2);
        assert_eq!(import.model.relationships.len(), 1);

        let rel = &import.model.relationships[0];
        let users = &import.model.entities[0];
        let posts = &import.model.entities[1];
        assert_eq!(rel.from, users.id);
        assert_eq!(rel.to, posts.id);
    }

    #[test]
    fn test_skipped_constraint_clauses() {
        let sql = r#"
            CREATE TABLE t (
                a INT,
                b INT,
                PRIMARY KEY (a, b),
                UNIQUE (b),
                INDEX idx_a (a)
            );
        "#;
        let import = parse_ddl(sql).unwrap();
        let t = &import.model.entities[0];
        assert_eq!(t.attributes.len(), 2);
        // Table-level PK does not flag columns
        assert!(!t.attributes[0].is_key);
    }

    #[test]
    fn test_alter_table_spanning_lines() {
        let sql = r#"
            CREATE TABLE users (id INT PRIMARY KEY);
            CREATE TABLE posts (id INT PRIMARY KEY, user_id INT);
            ALTER TABLE posts ADD CONSTRAINT FK_posts_users
                FOREIGN KEY (user_id)
                REFERENCES users(id);
        "#;
        let import = parse_ddl(sql).unwrap();
        assert_eq!(import.statements, 3);
        assert_eq!(import.model.relationships.len(), 1);
    }

    #[test]
    fn test_unknown_reference_dropped() {
        let sql = "CREATE TABLE a (id INT, x INT REFERENCES nowhere(id));";
        let import = parse_ddl(sql).unwrap();
        assert!(import.model.relationships.is_empty());
        // The referencing column itself survives with a clean type
        assert_eq!(import.model.entities[0].attributes[1].typ, "INT");
    }

    #[test]
    fn test_no_tables_found() {
        assert!(matches!(
            parse_ddl("SELECT * FROM users;"),
            Err(ImportError::NoTablesFound)
        ));
        assert!(matches!(parse_ddl(""), Err(ImportError::NoTablesFound)));
    }

    #[test]
    fn test_duplicate_table_names_stay_distinct() {
        let sql = "CREATE TABLE t (a INT); CREATE TABLE t (b INT);";
        let import = parse_ddl(sql).unwrap();
        assert_eq!(import.model.entities.len(), 2);
        assert_ne!(import.model.entities[0].id, import.model.entities[1].id);
    }

    #[test]
    fn test_self_reference_allowed() {
        let sql = "CREATE TABLE emp (id INT PRIMARY KEY, boss_id INT REFERENCES emp(id));";
        let import = parse_ddl(sql).unwrap();
        let rel = &import.model.relationships[0];
        assert_eq!(rel.from, rel.to);
    }

    #[test]
    fn test_grid_auto_placement() {
        let sql = (0..5)
            .map(|i| format!("CREATE TABLE t{} (id INT);", i))
            .collect::<String>();
        let import = parse_ddl(&sql).unwrap();
        let e = &import.model.entities;

        assert_eq!((e[0].x, e[0].y), (100.0, 100.0));
        assert_eq!((e[1].x, e[1].y), (450.0, 100.0));
        assert_eq!((e[3].x, e[3].y), (1150.0, 100.0));
        // Fifth table wraps to the second row
        assert_eq!((e[4].x, e[4].y), (100.0, 400.0));
    }

    #[test]
    fn test_if_not_exists_and_quoting() {
        let sql = "CREATE TABLE IF NOT EXISTS \"My_Table\" (`col` INT DEFAULT 3 NOT NULL);";
        let import = parse_ddl(sql).unwrap();
        let t = &import.model.entities[0];
        assert_eq!(t.title, "MY_TABLE");
        assert_eq!(t.attributes[0].name, "col");
        assert_eq!(t.attributes[0].typ, "INT");
    }

    #[test]
    fn test_default_clause_stripped() {
        let sql = "CREATE TABLE t (status VARCHAR(20) DEFAULT 'open', n INT DEFAULT 0);";
        let import = parse_ddl(sql).unwrap();
        let t = &import.model.entities[0];
        assert_eq!(t.attributes[0].typ, "VARCHAR(20)");
        assert_eq!(t.attributes[1].typ, "INT");
    }

    #[test]
    fn test_column_without_type_dropped() {
        let sql = "CREATE TABLE t (id INT, orphan);";
        let import = parse_ddl(sql).unwrap();
        assert_eq!(import.model.entities[0].attributes.len(), 1);
    }
}
