//! Query rewrite strategies.

use super::{Projection, SelectQuery};
use crate::verifier::SchemaVerifier;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fmt;
use std::sync::Arc;

/// Which rewrite a strategy performs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RewriteKind {
    /// Queries are left as written.
    NoOp,
    /// Result columns nobody reads are dropped.
    RemoveUnusedColumns,
    /// Star projections are replaced by the columns actually read.
    ExpandProjection,
}

impl fmt::Display for RewriteKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::NoOp => "no-op",
            Self::RemoveUnusedColumns => "remove-unused-columns",
            Self::ExpandProjection => "expand-projection",
        };
        f.write_str(name)
    }
}

/// The output of a rewrite.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RewrittenQuery {
    /// SQL to generate.
    pub sql: String,
    /// Whether the SQL differs from the original query.
    pub rewritten: bool,
}

impl RewrittenQuery {
    fn unchanged(query: &SelectQuery) -> Self {
        Self {
            sql: query.to_sql(),
            rewritten: false,
        }
    }

    fn changed(sql: String) -> Self {
        Self {
            sql,
            rewritten: true,
        }
    }
}

/// A query rewrite strategy.
///
/// `consumed` is the set of result column names the generated code reads.
#[derive(Debug, Clone)]
pub enum QueryRewriter {
    /// Leaves queries unchanged.
    NoOp,
    /// Wraps queries so only consumed columns are returned.
    RemoveUnusedColumns {
        /// Schema used to enumerate star projections.
        schema: Arc<dyn SchemaVerifier>,
    },
    /// Expands star projections into the consumed columns.
    ExpandProjection {
        /// Schema used to enumerate star projections.
        schema: Arc<dyn SchemaVerifier>,
    },
}

impl QueryRewriter {
    /// Returns the kind of rewrite.
    #[must_use]
    pub fn kind(&self) -> RewriteKind {
        match self {
            Self::NoOp => RewriteKind::NoOp,
            Self::RemoveUnusedColumns { .. } => RewriteKind::RemoveUnusedColumns,
            Self::ExpandProjection { .. } => RewriteKind::ExpandProjection,
        }
    }

    /// Returns the schema the strategy consults, if any.
    #[must_use]
    pub fn schema(&self) -> Option<&Arc<dyn SchemaVerifier>> {
        match self {
            Self::NoOp => None,
            Self::RemoveUnusedColumns { schema } | Self::ExpandProjection { schema } => Some(schema),
        }
    }

    /// Rewrites `query` for a result that reads `consumed` columns.
    ///
    /// Queries the strategy cannot reason about, such as stars over unknown
    /// tables, are returned unchanged.
    #[must_use]
    pub fn rewrite(&self, query: &SelectQuery, consumed: &[String]) -> RewrittenQuery {
        if consumed.is_empty() {
            return RewrittenQuery::unchanged(query);
        }
        match self {
            Self::NoOp => RewrittenQuery::unchanged(query),
            Self::RemoveUnusedColumns { schema } => remove_unused(schema.as_ref(), query, consumed),
            Self::ExpandProjection { schema } => expand(schema.as_ref(), query, consumed),
        }
    }
}

fn remove_unused(
    schema: &dyn SchemaVerifier,
    query: &SelectQuery,
    consumed: &[String],
) -> RewrittenQuery {
    let Some(result_columns) = result_columns(schema, query) else {
        return RewrittenQuery::unchanged(query);
    };

    let wanted: HashSet<&str> = consumed.iter().map(String::as_str).collect();
    let mut seen = HashSet::new();
    let kept: Vec<&str> = result_columns
        .iter()
        .map(String::as_str)
        .filter(|c| wanted.contains(c) && seen.insert(*c))
        .collect();

    if kept.is_empty() || kept.len() == result_columns.len() {
        return RewrittenQuery::unchanged(query);
    }

    let columns = kept
        .iter()
        .map(|c| format!("`{c}`"))
        .collect::<Vec<_>>()
        .join(", ");
    RewrittenQuery::changed(format!("SELECT {columns} FROM ({})", query.to_sql()))
}

fn expand(schema: &dyn SchemaVerifier, query: &SelectQuery, consumed: &[String]) -> RewrittenQuery {
    let wanted: HashSet<&str> = consumed.iter().map(String::as_str).collect();
    let mut changed = false;
    let mut projection = Vec::with_capacity(query.projection.len());

    let items: Vec<Projection> = if query.projection.is_empty() {
        vec![Projection::Star]
    } else {
        query.projection.clone()
    };

    for item in items {
        let tables: Vec<&str> = match &item {
            Projection::Star => query.from.iter().map(String::as_str).collect(),
            Projection::TableStar { table } => vec![table.as_str()],
            Projection::Column { .. } => {
                projection.push(item);
                continue;
            }
        };

        match expand_tables(schema, &tables, &wanted) {
            Some(columns) if !columns.is_empty() => {
                projection.extend(columns);
                changed = true;
            }
            _ => projection.push(item),
        }
    }

    if !changed {
        return RewrittenQuery::unchanged(query);
    }

    let expanded = SelectQuery {
        projection,
        ..query.clone()
    };
    RewrittenQuery::changed(expanded.to_sql())
}

fn expand_tables(
    schema: &dyn SchemaVerifier,
    tables: &[&str],
    wanted: &HashSet<&str>,
) -> Option<Vec<Projection>> {
    let mut columns = Vec::new();
    for table in tables {
        let known = schema.table(table)?;
        columns.extend(
            known
                .columns
                .iter()
                .filter(|c| wanted.contains(c.as_str()))
                .map(|c| Projection::qualified(*table, c.clone())),
        );
    }
    Some(columns)
}

fn result_columns(schema: &dyn SchemaVerifier, query: &SelectQuery) -> Option<Vec<String>> {
    let star = [Projection::Star];
    let items: &[Projection] = if query.projection.is_empty() {
        &star
    } else {
        &query.projection
    };

    let mut columns = Vec::new();
    for item in items {
        match item {
            Projection::Star => {
                for table in &query.from {
                    columns.extend(schema.table(table)?.columns);
                }
            }
            Projection::TableStar { table } => columns.extend(schema.table(table)?.columns),
            Projection::Column { name, .. } => columns.push(name.clone()),
        }
    }
    Some(columns)
}
