#![allow(dead_code)]

use grove::{
    Configuration, Connection, Driver, Error, ExecutionError, Result, RowLabeled, RowsAffected,
    Value,
    stream::{self, Stream},
};
use grove_mysql::MySQLSqlWriter;
use std::{
    cmp::Ordering,
    collections::{HashMap, VecDeque},
    sync::{
        Arc, Mutex,
        atomic::{AtomicBool, Ordering as AtomicOrdering},
    },
};

/// In-memory stand-in for a MySQL server, understanding exactly the statements the
/// engine writes and answering with the same error codes.
#[derive(Default)]
pub struct MockServer {
    tables: Mutex<HashMap<String, Table>>,
    statements: Mutex<Vec<String>>,
    /// Replies handed to the next inserts in place of storing a row.
    insert_replies: Mutex<VecDeque<RowsAffected>>,
    pub offline: AtomicBool,
    /// CREATE and ALTER report success without touching the schema.
    pub ignore_ddl: AtomicBool,
}

#[derive(Default, Clone)]
struct Table {
    columns: Vec<String>,
    primary: Option<String>,
    rows: Vec<Vec<(String, Value)>>,
    next_id: i64,
}

enum Reply {
    Rows(Vec<RowLabeled>),
    Affected(RowsAffected),
}

fn server_error(code: u16, message: String) -> Error {
    ExecutionError::new(code, message).into()
}

fn missing_table(table: &str) -> Error {
    server_error(1146, format!("Table 'shop.{}' doesn't exist", table))
}

fn unknown_column(column: &str) -> Error {
    server_error(1054, format!("Unknown column '{}' in 'field list'", column))
}

/// Backtick quoted identifiers, in order of appearance.
fn identifiers(sql: &str) -> Vec<String> {
    sql.split('`')
        .skip(1)
        .step_by(2)
        .map(ToOwned::to_owned)
        .collect()
}

fn parameter(text: &str, params: &[Value]) -> Value {
    text.trim()
        .strip_prefix("@param")
        .and_then(|v| v.parse::<usize>().ok())
        .and_then(|v| params.get(v - 1))
        .cloned()
        .unwrap_or_default()
}

fn compare(left: &Value, right: &Value) -> Option<Ordering> {
    if left.is_null() || right.is_null() {
        return None;
    }
    match (left.as_float(), right.as_float()) {
        (Some(l), Some(r)) => l.partial_cmp(&r),
        _ => Some(left.to_string().cmp(&right.to_string())),
    }
}

fn cell<'a>(row: &'a [(String, Value)], column: &str) -> Option<&'a Value> {
    row.iter().find(|(k, _)| k == column).map(|(_, v)| v)
}

/// Literal written by the engine for the primary of an update or a delete.
fn matches_literal(row: &[(String, Value)], column: &str, literal: &str) -> bool {
    let literal = literal.trim().trim_end_matches(';').trim_matches('\'');
    cell(row, column).is_some_and(|v| !v.is_null() && v.to_string().trim_matches('\'') == literal)
}

fn filter(condition: &str, params: &[Value], row: &[(String, Value)]) -> bool {
    condition.split(" AND ").all(|term| {
        let column = identifiers(term).into_iter().next().unwrap_or_default();
        let value = cell(row, &column).cloned().unwrap_or_default();
        if term.ends_with("IS NULL") {
            return value.is_null();
        }
        let rest = term.rsplit('`').next().unwrap_or_default().trim();
        let (operator, placeholder) = rest.split_once(' ').unwrap_or_default();
        let ordering = compare(&value, &parameter(placeholder, params));
        match operator {
            "=" => ordering == Some(Ordering::Equal),
            "!=" => ordering.is_some_and(|v| v != Ordering::Equal),
            ">" => ordering == Some(Ordering::Greater),
            "<" => ordering == Some(Ordering::Less),
            _ => false,
        }
    })
}

impl MockServer {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn statements(&self) -> Vec<String> {
        self.statements.lock().unwrap().clone()
    }

    pub fn count(&self, prefix: &str) -> usize {
        self.statements
            .lock()
            .unwrap()
            .iter()
            .filter(|v| v.starts_with(prefix))
            .count()
    }

    pub fn clear_statements(&self) {
        self.statements.lock().unwrap().clear();
    }

    pub fn columns(&self, table: &str) -> Option<Vec<String>> {
        self.tables
            .lock()
            .unwrap()
            .get(table)
            .map(|v| v.columns.clone())
    }

    pub fn row_count(&self, table: &str) -> usize {
        self.tables
            .lock()
            .unwrap()
            .get(table)
            .map_or(0, |v| v.rows.len())
    }

    /// Creates a table behind the back of the engine.
    pub fn seed_table(&self, table: &str, columns: &[&str], primary: Option<&str>) {
        self.tables.lock().unwrap().insert(
            table.to_owned(),
            Table {
                columns: columns.iter().map(|v| v.to_string()).collect(),
                primary: primary.map(ToOwned::to_owned),
                rows: Vec::new(),
                next_id: 0,
            },
        );
    }

    pub fn drop_behind(&self, table: &str) {
        self.tables.lock().unwrap().remove(table);
    }

    pub fn script_insert(&self, reply: RowsAffected) {
        self.insert_replies.lock().unwrap().push_back(reply);
    }

    fn run(&self, sql: &str, params: &[Value]) -> Result<Reply> {
        self.statements.lock().unwrap().push(sql.to_owned());
        let mut tables = self.tables.lock().unwrap();
        let ids = identifiers(sql);
        if self.ignore_ddl.load(AtomicOrdering::Relaxed)
            && (sql.starts_with("CREATE TABLE ") || sql.starts_with("ALTER TABLE "))
        {
            return Ok(Reply::Affected(RowsAffected::default()));
        }
        if sql.starts_with("CREATE TABLE ") {
            let table = ids[0].clone();
            if tables.contains_key(&table) {
                return Err(server_error(
                    1050,
                    format!("Table '{}' already exists", table),
                ));
            }
            let (definition, primary) = match sql.split_once(", PRIMARY KEY (") {
                Some((definition, primary)) => (definition, identifiers(primary).pop()),
                None => (sql, None),
            };
            let columns = identifiers(definition).into_iter().skip(1).collect();
            tables.insert(
                table,
                Table {
                    columns,
                    primary,
                    ..Default::default()
                },
            );
            return Ok(Reply::Affected(RowsAffected::default()));
        }
        if sql.starts_with("ALTER TABLE ") {
            let table = tables.get_mut(&ids[0]).ok_or_else(|| missing_table(&ids[0]))?;
            if table.columns.contains(&ids[1]) {
                return Err(server_error(
                    1060,
                    format!("Duplicate column name '{}'", ids[1]),
                ));
            }
            table.columns.push(ids[1].clone());
            return Ok(Reply::Affected(RowsAffected::default()));
        }
        if sql.starts_with("DROP TABLE IF EXISTS ") {
            tables.remove(&ids[0]);
            return Ok(Reply::Affected(RowsAffected::default()));
        }
        if let Some(rest) = sql.strip_prefix("INSERT INTO ") {
            let table = tables.get_mut(&ids[1]).ok_or_else(|| missing_table(&ids[1]))?;
            let (head, _) = rest.split_once(") VALUES").unwrap_or_default();
            let columns = identifiers(head).into_iter().skip(2).collect::<Vec<_>>();
            if let Some(column) = columns.iter().find(|v| !table.columns.contains(v)) {
                return Err(unknown_column(column));
            }
            if let Some(reply) = self.insert_replies.lock().unwrap().pop_front() {
                return Ok(Reply::Affected(reply));
            }
            let mut row = columns
                .iter()
                .cloned()
                .zip(params.iter().cloned())
                .collect::<Vec<_>>();
            if let Some(primary) = table.primary.clone() {
                if let Some(value) = cell(&row, &primary).cloned() {
                    if let Some(existing) = table.rows.iter_mut().find(|v| {
                        cell(v, &primary).and_then(|v| compare(v, &value)) == Some(Ordering::Equal)
                    }) {
                        for (column, value) in row {
                            match existing.iter_mut().find(|(k, _)| *k == column) {
                                Some(cell) => cell.1 = value,
                                None => existing.push((column, value)),
                            }
                        }
                        return Ok(Reply::Affected(RowsAffected {
                            rows_affected: 2,
                            last_affected_id: None,
                        }));
                    }
                    table.next_id = table.next_id.max(value.as_integer().unwrap_or(0) as i64);
                    table.rows.push(row);
                    return Ok(Reply::Affected(RowsAffected {
                        rows_affected: 1,
                        last_affected_id: None,
                    }));
                }
                table.next_id += 1;
                row.insert(0, (primary, Value::Int64(Some(table.next_id))));
                table.rows.push(row);
                return Ok(Reply::Affected(RowsAffected {
                    rows_affected: 1,
                    last_affected_id: Some(table.next_id),
                }));
            }
            table.rows.push(row);
            return Ok(Reply::Affected(RowsAffected {
                rows_affected: 1,
                last_affected_id: None,
            }));
        }
        if sql.starts_with("UPDATE ") {
            let table = tables.get_mut(&ids[1]).ok_or_else(|| missing_table(&ids[1]))?;
            let (assignments, condition) = sql.split_once(" WHERE ").unwrap_or_default();
            let columns = identifiers(assignments).into_iter().skip(2).collect::<Vec<_>>();
            if let Some(column) = columns.iter().find(|v| !table.columns.contains(v)) {
                return Err(unknown_column(column));
            }
            let primary = identifiers(condition).pop().unwrap_or_default();
            let literal = condition.rsplit("= ").next().unwrap_or_default();
            let mut rows_affected = 0;
            for row in table
                .rows
                .iter_mut()
                .filter(|v| matches_literal(v, &primary, literal))
            {
                for (column, value) in columns.iter().zip(params) {
                    match row.iter_mut().find(|(k, _)| k == column) {
                        Some(cell) => cell.1 = value.clone(),
                        None => row.push((column.clone(), value.clone())),
                    }
                }
                rows_affected += 1;
            }
            return Ok(Reply::Affected(RowsAffected {
                rows_affected,
                last_affected_id: None,
            }));
        }
        if sql.starts_with("DELETE FROM ") {
            let table = tables.get_mut(&ids[1]).ok_or_else(|| missing_table(&ids[1]))?;
            let (_, condition) = sql.split_once(" WHERE ").unwrap_or_default();
            let primary = identifiers(condition).pop().unwrap_or_default();
            let literal = condition.rsplit("= ").next().unwrap_or_default();
            let before = table.rows.len();
            table.rows.retain(|v| !matches_literal(v, &primary, literal));
            return Ok(Reply::Affected(RowsAffected {
                rows_affected: (before - table.rows.len()) as u64,
                last_affected_id: None,
            }));
        }
        if let Some(rest) = sql.strip_prefix("SELECT ") {
            let (projection, source) = rest.split_once(" FROM ").unwrap_or_default();
            let source_ids = identifiers(source);
            let table = tables
                .get(&source_ids[1])
                .ok_or_else(|| missing_table(&source_ids[1]))?;
            let projected = identifiers(projection);
            if let Some(column) = projected
                .iter()
                .filter(|v| !matches!(v.as_str(), "Count" | "Sum"))
                .find(|v| !table.columns.contains(v))
            {
                return Err(unknown_column(column));
            }
            if projection == "1" || source.ends_with(" LIMIT 0;") {
                return Ok(Reply::Rows(Vec::new()));
            }
            let source = source.trim_end_matches(';');
            let (source, limit) = match source.split_once(" LIMIT ") {
                Some((source, limit)) => (source, limit.parse::<usize>().ok()),
                None => (source, None),
            };
            let (source, order) = match source.split_once(" ORDER BY ") {
                Some((source, order)) => (source, Some(order)),
                None => (source, None),
            };
            let mut rows = match source.split_once(" WHERE ") {
                Some((_, condition)) => table
                    .rows
                    .iter()
                    .filter(|v| filter(condition, params, v))
                    .collect::<Vec<_>>(),
                None => table.rows.iter().collect(),
            };
            if let Some(order) = order {
                let column = identifiers(order).pop().unwrap_or_default();
                rows.sort_by(|a, b| {
                    let ordering = compare(
                        &cell(a, &column).cloned().unwrap_or_default(),
                        &cell(b, &column).cloned().unwrap_or_default(),
                    )
                    .unwrap_or(Ordering::Equal);
                    if order.ends_with("DESC") {
                        ordering.reverse()
                    } else {
                        ordering
                    }
                });
            }
            if let Some(limit) = limit {
                rows.truncate(limit);
            }
            for (function, alias) in [("COUNT(", "Count"), ("SUM(", "Sum")] {
                if !projection.starts_with(function) {
                    continue;
                }
                let column = projected.first().filter(|v| !matches!(v.as_str(), "Count"));
                let counted = rows
                    .iter()
                    .filter(|row| column.is_none_or(|c| cell(row, c).is_some_and(|v| !v.is_null())))
                    .count();
                let result = if alias == "Count" {
                    Value::Int64(Some(counted as i64))
                } else if counted == 0 {
                    Value::Null
                } else {
                    let column = column.map(String::as_str).unwrap_or_default();
                    Value::Float64(Some(
                        rows.iter()
                            .filter_map(|row| cell(row, column).and_then(Value::as_float))
                            .sum(),
                    ))
                };
                return Ok(Reply::Rows(vec![RowLabeled::new(
                    [alias.to_owned()].into(),
                    [result].into(),
                )]));
            }
            let labels: Arc<[String]> = if projection == "*" {
                table.columns.clone().into()
            } else {
                projected.into()
            };
            let result = rows
                .into_iter()
                .map(|row| {
                    let values = labels
                        .iter()
                        .map(|v| cell(row, v).cloned().unwrap_or_default())
                        .collect();
                    RowLabeled::new(labels.clone(), values)
                })
                .collect();
            return Ok(Reply::Rows(result));
        }
        Err(Error::msg(format!("Statement not understood: {}", sql)))
    }
}

#[derive(Clone)]
pub struct MockDriver {
    pub server: Arc<MockServer>,
}

impl MockDriver {
    pub fn new(server: Arc<MockServer>) -> Self {
        Self { server }
    }
}

pub struct MockConnection {
    server: Arc<MockServer>,
}

impl Driver for MockDriver {
    type Connection = MockConnection;
    type SqlWriter = MySQLSqlWriter;

    const NAME: &'static str = "mock";

    fn sql_writer(&self) -> Self::SqlWriter {
        MySQLSqlWriter::default()
    }

    async fn connect(&self, _config: &Configuration) -> Result<MockConnection> {
        if self.server.offline.load(AtomicOrdering::Relaxed) {
            return Err(Error::msg("Connection refused"));
        }
        Ok(MockConnection {
            server: self.server.clone(),
        })
    }
}

impl Connection for MockConnection {
    fn fetch(
        &mut self,
        sql: String,
        params: Vec<Value>,
    ) -> impl Stream<Item = Result<RowLabeled>> + Send + '_ {
        let items: Vec<Result<RowLabeled>> = match self.server.run(&sql, &params) {
            Ok(Reply::Rows(rows)) => rows.into_iter().map(Ok).collect(),
            Ok(Reply::Affected(..)) => Vec::new(),
            Err(e) => vec![Err(e)],
        };
        stream::iter(items)
    }

    async fn execute(&mut self, sql: String, params: Vec<Value>) -> Result<RowsAffected> {
        match self.server.run(&sql, &params)? {
            Reply::Affected(affected) => Ok(affected),
            Reply::Rows(..) => Ok(RowsAffected::default()),
        }
    }

    async fn disconnect(self) -> Result<()> {
        Ok(())
    }
}
