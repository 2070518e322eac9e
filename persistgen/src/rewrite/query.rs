//! A structured select statement.

use serde::{Deserialize, Serialize};
use std::fmt;

/// One item of a select list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Projection {
    /// `*`
    Star,
    /// `table.*`
    TableStar {
        /// The table whose columns are selected.
        table: String,
    },
    /// A single, possibly qualified, column.
    Column {
        /// Qualifying table, if any.
        #[serde(skip_serializing_if = "Option::is_none")]
        table: Option<String>,
        /// Column name.
        name: String,
    },
}

impl Projection {
    /// Creates an unqualified column projection.
    #[must_use]
    pub fn column(name: impl Into<String>) -> Self {
        Self::Column {
            table: None,
            name: name.into(),
        }
    }

    /// Creates a qualified column projection.
    #[must_use]
    pub fn qualified(table: impl Into<String>, name: impl Into<String>) -> Self {
        Self::Column {
            table: Some(table.into()),
            name: name.into(),
        }
    }

    /// Creates a `table.*` projection.
    #[must_use]
    pub fn table_star(table: impl Into<String>) -> Self {
        Self::TableStar {
            table: table.into(),
        }
    }
}

impl fmt::Display for Projection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Star => f.write_str("*"),
            Self::TableStar { table } => write!(f, "`{table}`.*"),
            Self::Column {
                table: Some(table),
                name,
            } => write!(f, "`{table}`.`{name}`"),
            Self::Column { table: None, name } => write!(f, "`{name}`"),
        }
    }
}

/// A `SELECT <projection> FROM <tables> <tail>` statement.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SelectQuery {
    /// The select list. Empty renders as `*`.
    pub projection: Vec<Projection>,
    /// Tables in the `FROM` clause.
    pub from: Vec<String>,
    /// Everything after the `FROM` clause, verbatim.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tail: Option<String>,
}

impl SelectQuery {
    /// Creates `SELECT * FROM table`.
    #[must_use]
    pub fn star(table: impl Into<String>) -> Self {
        Self {
            projection: vec![Projection::Star],
            from: vec![table.into()],
            tail: None,
        }
    }

    /// Creates a query over `table` with an empty select list.
    #[must_use]
    pub fn from_table(table: impl Into<String>) -> Self {
        Self {
            projection: Vec::new(),
            from: vec![table.into()],
            tail: None,
        }
    }

    /// Appends a select list item.
    #[must_use]
    pub fn project(mut self, projection: Projection) -> Self {
        self.projection.push(projection);
        self
    }

    /// Adds a table to the `FROM` clause.
    #[must_use]
    pub fn join(mut self, table: impl Into<String>) -> Self {
        self.from.push(table.into());
        self
    }

    /// Sets the clause following `FROM`.
    #[must_use]
    pub fn with_tail(mut self, tail: impl Into<String>) -> Self {
        self.tail = Some(tail.into());
        self
    }

    /// Renders the statement.
    #[must_use]
    pub fn to_sql(&self) -> String {
        let projection = if self.projection.is_empty() {
            "*".to_string()
        } else {
            self.projection
                .iter()
                .map(ToString::to_string)
                .collect::<Vec<_>>()
                .join(", ")
        };
        let from = self
            .from
            .iter()
            .map(|t| format!("`{t}`"))
            .collect::<Vec<_>>()
            .join(", ");

        match self.tail.as_deref() {
            Some(tail) if !tail.trim().is_empty() => {
                format!("SELECT {projection} FROM {from} {}", tail.trim())
            }
            _ => format!("SELECT {projection} FROM {from}"),
        }
    }
}

impl fmt::Display for SelectQuery {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_sql())
    }
}
