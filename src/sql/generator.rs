//! DDL export: serializes a [`Model`] to CREATE TABLE / ALTER TABLE text.
//!
//! Foreign-key placement is inferred from the cardinality pair. The scheme
//! is deliberately lossy (FK columns are always named `ID_<title>`, no
//! composite keys) and must stay byte-stable for round-trip expectations.

use std::fmt::Write;

use crate::model::{Entity, Model, Relationship};

/// Fallback referenced-column name when an entity has no key attribute.
const DEFAULT_PK: &str = "ID";

/// Generate DDL for the whole model. Output is deterministic for a fixed
/// `generated_at` string; the timestamp is injected by the caller so the
/// engine itself stays pure.
pub fn generate_ddl(model: &Model, generated_at: &str) -> String {
    let mut sql = format!("-- Generated by erbridge\n-- {}\n\n", generated_at);

    for entity in &model.entities {
        write_create_table(&mut sql, entity);
    }

    sql.push_str("-- Relationships (Foreign Keys)\n");
    for rel in &model.relationships {
        let (Some(from), Some(to)) = (model.entity(&rel.from), model.entity(&rel.to)) else {
            // Dangling endpoint: precondition violation, skipped
            continue;
        };
        write_foreign_key(&mut sql, rel, from, to);
    }

    sql
}

fn write_create_table(sql: &mut String, entity: &Entity) {
    let _ = writeln!(sql, "CREATE TABLE {} (", entity.title.to_uppercase());

    let last = entity.attributes.len().saturating_sub(1);
    for (i, attr) in entity.attributes.iter().enumerate() {
        let _ = write!(sql, "    {} {}", attr.name, normalize_type(&attr.typ));
        if attr.is_key {
            sql.push_str(" PRIMARY KEY");
        }
        if i < last {
            sql.push(',');
        }
        sql.push('\n');
    }

    sql.push_str(");\n\n");
}

fn write_foreign_key(sql: &mut String, rel: &Relationship, from: &Entity, to: &Entity) {
    let many_to = rel.card_to.is_many();
    let many_from = rel.card_from.is_many();

    if many_to && many_from {
        // N:N needs a junction table the generator does not invent
        let _ = writeln!(
            sql,
            "-- N:N RELATIONSHIP BETWEEN {} AND {} REQUIRES A JUNCTION TABLE (NOT AUTO-GENERATED)\n",
            from.title, to.title
        );
    } else if many_from && !many_to {
        // Mirrored 1:N: the FK lands on the from side
        write_alter_table(sql, to, from);
    } else {
        // Classic 1:N, and 1:1 treated identically (FK on the to side)
        write_alter_table(sql, from, to);
    }
}

/// Emit the FK on `child`, referencing `parent`'s primary key.
fn write_alter_table(sql: &mut String, parent: &Entity, child: &Entity) {
    let pk = parent
        .primary_key()
        .map(|a| a.name.as_str())
        .unwrap_or(DEFAULT_PK);

    let _ = writeln!(
        sql,
        "ALTER TABLE {} ADD CONSTRAINT FK_{}_{}",
        child.title.to_uppercase(),
        child.title,
        parent.title
    );
    let _ = writeln!(
        sql,
        "    FOREIGN KEY (ID_{}) REFERENCES {}({});\n",
        parent.title,
        parent.title.to_uppercase(),
        pk
    );
}

fn normalize_type(typ: &str) -> String {
    let upper = typ.to_uppercase();
    if upper == "INT" {
        "INTEGER".to_string()
    } else {
        upper
    }
}
