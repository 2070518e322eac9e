//! Schema verifier boundary.
//!
//! A verifier is attached to a context once a database declaration has been
//! read. The processing core only asks it which tables and views exist and
//! which columns they expose; validating SQL against them is the verifier's
//! own business.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;

/// Whether a schema describes a table or a view.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SchemaKind {
    /// A table backed by an entity.
    Entity,
    /// A database view.
    View,
}

/// A known table or view and its columns.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TableSchema {
    /// Table or view name.
    pub name: String,
    /// Entity or view.
    pub kind: SchemaKind,
    /// Column names in declaration order.
    pub columns: Vec<String>,
}

impl TableSchema {
    /// Creates an entity table schema.
    #[must_use]
    pub fn entity(name: impl Into<String>, columns: impl IntoIterator<Item = impl Into<String>>) -> Self {
        Self {
            name: name.into(),
            kind: SchemaKind::Entity,
            columns: columns.into_iter().map(Into::into).collect(),
        }
    }

    /// Creates a view schema.
    #[must_use]
    pub fn view(name: impl Into<String>, columns: impl IntoIterator<Item = impl Into<String>>) -> Self {
        Self {
            name: name.into(),
            kind: SchemaKind::View,
            columns: columns.into_iter().map(Into::into).collect(),
        }
    }

    /// Returns true if the table exposes `column`.
    #[must_use]
    pub fn has_column(&self, column: &str) -> bool {
        self.columns.iter().any(|c| c == column)
    }
}

/// Exposes the schema a database declaration defines.
pub trait SchemaVerifier: fmt::Debug + Send + Sync {
    /// Returns every known entity table and view.
    fn entities_and_views(&self) -> Vec<TableSchema>;

    /// Returns the schema of one table or view.
    fn table(&self, name: &str) -> Option<TableSchema> {
        self.entities_and_views()
            .into_iter()
            .find(|t| t.name.eq_ignore_ascii_case(name))
    }
}

/// A verifier over a fixed list of schemas.
#[derive(Debug, Clone, Default)]
pub struct StaticSchemaVerifier {
    tables: Vec<TableSchema>,
    index: HashMap<String, usize>,
}

impl StaticSchemaVerifier {
    /// Creates a verifier over `tables`.
    #[must_use]
    pub fn new(tables: impl IntoIterator<Item = TableSchema>) -> Self {
        let tables: Vec<TableSchema> = tables.into_iter().collect();
        let index = tables
            .iter()
            .enumerate()
            .map(|(i, t)| (t.name.to_ascii_lowercase(), i))
            .collect();
        Self { tables, index }
    }
}

impl SchemaVerifier for StaticSchemaVerifier {
    fn entities_and_views(&self) -> Vec<TableSchema> {
        self.tables.clone()
    }

    fn table(&self, name: &str) -> Option<TableSchema> {
        self.index
            .get(&name.to_ascii_lowercase())
            .map(|&i| self.tables[i].clone())
    }
}
