use crate::Value;
use std::sync::Arc;

/// Outcome of an INSERT, UPDATE or DELETE.
#[derive(Default, Debug, Clone, Copy, PartialEq, Eq)]
pub struct RowsAffected {
    pub rows_affected: u64,
    /// Key generated by an `AUTO_INCREMENT` column, when the server reports one.
    pub last_affected_id: Option<i64>,
}

/// Column labels of a result set, shared by all of its rows.
pub type RowNames = Arc<[String]>;
pub type Row = Box<[Value]>;

/// A fetched row, `values[i]` belongs to the column `labels[i]`.
#[derive(Debug, Clone)]
pub struct RowLabeled {
    pub labels: RowNames,
    pub values: Row,
}

impl RowLabeled {
    pub fn new(labels: RowNames, values: Row) -> Self {
        Self { labels, values }
    }

    /// Value of the column called `name`, `None` when the row does not carry it.
    pub fn get_column(&self, name: &str) -> Option<&Value> {
        let index = self.labels.iter().position(|v| v == name)?;
        self.values.get(index)
    }

    /// First value of the row, the result of an aggregate.
    pub fn into_first(self) -> Option<Value> {
        Vec::from(self.values).into_iter().next()
    }
}
