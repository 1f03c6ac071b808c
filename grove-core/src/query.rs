use crate::{ArgumentError, Error, Result, Value};
use std::str::FromStr;

/// Comparison operator of a `WHERE` clause.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub enum Comparator {
    #[default]
    Equal,
    NotEqual,
    GreaterThan,
    LessThan,
}

impl Comparator {
    pub fn as_sql(&self) -> &'static str {
        match self {
            Comparator::Equal => "=",
            Comparator::NotEqual => "!=",
            Comparator::GreaterThan => ">",
            Comparator::LessThan => "<",
        }
    }
}

impl FromStr for Comparator {
    type Err = Error;
    fn from_str(value: &str) -> Result<Self> {
        Ok(match value.trim().to_ascii_lowercase().as_str() {
            "=" | "equal" => Comparator::Equal,
            "!=" | "not-equal" => Comparator::NotEqual,
            ">" | "greater-than" => Comparator::GreaterThan,
            "<" | "less-than" => Comparator::LessThan,
            _ => {
                return Err(ArgumentError::new(format!(
                    "Unsupported comparator `{}`, use one of `=`, `!=`, `>`, `<`",
                    value
                ))
                .into());
            }
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Order {
    Ascending,
    Descending,
}

impl Order {
    pub fn as_sql(&self) -> &'static str {
        match self {
            Order::Ascending => "ASC",
            Order::Descending => "DESC",
        }
    }
}

/// Ordering and limit directive appended to a select.
///
/// A limit of zero means no limit.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct Limiter {
    pub limit: u32,
    pub order_by: Option<(String, Order)>,
}

impl Limiter {
    pub fn new(limit: u32) -> Self {
        Self {
            limit,
            order_by: None,
        }
    }
    pub fn order_by(mut self, field: impl Into<String>, order: Order) -> Self {
        self.order_by = Some((field.into(), order));
        self
    }
}

/// Columns returned by a select.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub enum Projection<'a> {
    #[default]
    All,
    Columns(&'a [&'a str]),
}

impl<'a> Projection<'a> {
    /// The column filter applied when decoding, `None` means every column.
    pub fn columns(&self) -> Option<&'a [&'a str]> {
        match self {
            Projection::All => None,
            Projection::Columns(columns) => Some(columns),
        }
    }
}

/// Conditional mode of a statement.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub enum Conditional<'a> {
    #[default]
    None,
    /// `WHERE <primary> = @param1`
    ByPrimary,
    /// `WHERE field OP @param1 AND ...`
    Where(&'a [&'a str], Comparator),
    /// `WHERE field IS NULL`, on the first field only.
    WhereNull(&'a [&'a str]),
}

impl Conditional<'_> {
    /// Number of parameters the clause binds.
    pub fn parameters(&self) -> usize {
        match self {
            Conditional::None | Conditional::WhereNull(..) => 0,
            Conditional::ByPrimary => 1,
            Conditional::Where(fields, ..) => fields.len(),
        }
    }
}

#[derive(Debug, Default, Clone, PartialEq)]
pub struct Select<'a> {
    pub projection: Projection<'a>,
    pub conditional: Conditional<'a>,
    pub values: Vec<Value>,
    pub limit: Option<Limiter>,
}

impl<'a> Select<'a> {
    pub fn new() -> Self {
        Default::default()
    }
    pub fn columns(mut self, columns: &'a [&'a str]) -> Self {
        self.projection = Projection::Columns(columns);
        self
    }
    pub fn by_primary(mut self, primary: Value) -> Self {
        self.conditional = Conditional::ByPrimary;
        self.values = vec![primary];
        self
    }
    pub fn filter(mut self, fields: &'a [&'a str], values: Vec<Value>, comparator: Comparator) -> Self {
        self.conditional = Conditional::Where(fields, comparator);
        self.values = values;
        self
    }
    pub fn filter_null(mut self, fields: &'a [&'a str]) -> Self {
        self.conditional = Conditional::WhereNull(fields);
        self.values = Vec::new();
        self
    }
    pub fn limit(mut self, limit: Option<Limiter>) -> Self {
        self.limit = limit;
        self
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Aggregation {
    /// Result aliased `Count`.
    Count,
    /// Result aliased `Sum`.
    Sum,
}

impl Aggregation {
    pub fn function(&self) -> &'static str {
        match self {
            Aggregation::Count => "COUNT",
            Aggregation::Sum => "SUM",
        }
    }
    pub fn alias(&self) -> &'static str {
        match self {
            Aggregation::Count => "Count",
            Aggregation::Sum => "Sum",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Aggregate<'a> {
    pub aggregation: Aggregation,
    /// Aggregated column, `None` counts rows.
    pub column: Option<&'a str>,
    pub conditional: Conditional<'a>,
    pub values: Vec<Value>,
}

impl<'a> Aggregate<'a> {
    pub fn count(column: Option<&'a str>) -> Self {
        Self {
            aggregation: Aggregation::Count,
            column,
            conditional: Conditional::None,
            values: Vec::new(),
        }
    }
    pub fn sum(column: &'a str) -> Self {
        Self {
            aggregation: Aggregation::Sum,
            column: Some(column),
            conditional: Conditional::None,
            values: Vec::new(),
        }
    }
    pub fn filter(mut self, fields: &'a [&'a str], values: Vec<Value>, comparator: Comparator) -> Self {
        self.conditional = Conditional::Where(fields, comparator);
        self.values = values;
        self
    }
    pub fn filter_null(mut self, fields: &'a [&'a str]) -> Self {
        self.conditional = Conditional::WhereNull(fields);
        self.values = Vec::new();
        self
    }
}
