use crate::{
    Aggregate, ArgumentError, ColumnDescriptor, Conditional, EntityDescriptor, Limiter,
    Projection, Record, RecordItem, Result, Select, Value, find_primary_column, separated_by,
};
use std::fmt::Write;

macro_rules! write_integer {
    ($out:ident, $value:expr) => {{
        let mut buffer = itoa::Buffer::new();
        $out.push_str(buffer.format($value));
    }};
}
macro_rules! write_float {
    ($this:ident, $out:ident, $value:expr) => {{
        let mut buffer = ryu::Buffer::new();
        if $value.is_finite() {
            $out.push_str(buffer.format($value));
        } else {
            $this.write_value_string($out, buffer.format($value));
        }
    }};
}

/// Renders statements as text.
///
/// Values are bound through `@paramN` placeholders, numbered from one in the order the
/// values are handed to the driver. Identifiers come only from entity descriptors, every
/// caller supplied name is checked against the descriptor before being written.
///
/// The provided methods produce ANSI SQL, drivers override the dialect specific pieces.
pub trait SqlWriter: Send + Sync {
    fn write_escaped(&self, out: &mut String, value: &str, search: char, replace: &str) {
        let mut position = 0;
        for (i, c) in value.char_indices() {
            if c == search {
                out.push_str(&value[position..i]);
                out.push_str(replace);
                position = i + c.len_utf8();
            }
        }
        out.push_str(&value[position..]);
    }

    fn write_identifier_quoted(&self, out: &mut String, value: &str) {
        out.push('"');
        self.write_escaped(out, value, '"', r#""""#);
        out.push('"');
    }

    /// Table qualified by the database name, if any.
    fn write_table_ref(&self, out: &mut String, database: &str, table: &str) {
        if !database.is_empty() {
            self.write_identifier_quoted(out, database);
            out.push('.');
        }
        self.write_identifier_quoted(out, table);
    }

    fn write_parameter(&self, out: &mut String, index: usize) {
        let _ = write!(out, "@param{}", index);
    }

    fn write_value(&self, out: &mut String, value: &Value) {
        match value {
            Value::Null
            | Value::Boolean(None)
            | Value::Int8(None)
            | Value::Int16(None)
            | Value::Int32(None)
            | Value::Int64(None)
            | Value::UInt8(None)
            | Value::UInt16(None)
            | Value::UInt32(None)
            | Value::UInt64(None)
            | Value::Float32(None)
            | Value::Float64(None)
            | Value::Varchar(None)
            | Value::Blob(None) => self.write_value_none(out),
            Value::Boolean(Some(v)) => self.write_value_bool(out, *v),
            Value::Int8(Some(v)) => write_integer!(out, *v),
            Value::Int16(Some(v)) => write_integer!(out, *v),
            Value::Int32(Some(v)) => write_integer!(out, *v),
            Value::Int64(Some(v)) => write_integer!(out, *v),
            Value::UInt8(Some(v)) => write_integer!(out, *v),
            Value::UInt16(Some(v)) => write_integer!(out, *v),
            Value::UInt32(Some(v)) => write_integer!(out, *v),
            Value::UInt64(Some(v)) => write_integer!(out, *v),
            Value::Float32(Some(v)) => write_float!(self, out, *v),
            Value::Float64(Some(v)) => write_float!(self, out, *v),
            Value::Varchar(Some(v)) => self.write_value_string(out, v),
            Value::Blob(Some(v)) => self.write_value_blob(out, v.as_ref()),
        }
    }

    fn write_value_none(&self, out: &mut String) {
        out.push_str("NULL")
    }

    fn write_value_bool(&self, out: &mut String, value: bool) {
        out.push_str(["FALSE", "TRUE"][value as usize])
    }

    fn write_value_string(&self, out: &mut String, value: &str) {
        out.push('\'');
        self.write_escaped(out, value, '\'', "''");
        out.push('\'');
    }

    fn write_value_blob(&self, out: &mut String, value: &[u8]) {
        out.push_str("X'");
        for b in value {
            let _ = write!(out, "{:02X}", b);
        }
        out.push('\'');
    }

    /// Keyword making an integer primary generate its own values.
    fn write_auto_increment(&self, out: &mut String) {
        out.push_str(" GENERATED BY DEFAULT AS IDENTITY");
    }

    /// Clause turning an insert into an upsert, the items are bound from `@param1` on.
    fn write_upsert_fragment(&self, out: &mut String, record: &Record, items: &[&RecordItem]) {
        let Some(primary) = record.descriptor().primary() else {
            return;
        };
        out.push_str(" ON CONFLICT (");
        self.write_identifier_quoted(out, primary.name);
        out.push_str(") DO UPDATE SET ");
        self.write_assignments(out, items.iter().copied());
    }

    /// `col = @paramN` pairs joined by commas, numbered from one.
    fn write_assignments<'a>(&self, out: &mut String, items: impl Iterator<Item = &'a RecordItem>) {
        let mut index = 0;
        separated_by(
            out,
            items,
            |out, item| {
                index += 1;
                self.write_identifier_quoted(out, item.column);
                out.push_str(" = ");
                self.write_parameter(out, index);
            },
            ", ",
        );
    }

    fn write_conditional(
        &self,
        out: &mut String,
        descriptor: &EntityDescriptor,
        conditional: &Conditional,
        parameters: usize,
    ) -> Result<()> {
        if conditional.parameters() != parameters {
            return Err(ArgumentError::new(format!(
                "The condition expects {} value(s) but {} were given",
                conditional.parameters(),
                parameters
            ))
            .into());
        }
        match conditional {
            Conditional::None => {}
            Conditional::ByPrimary => {
                out.push_str(" WHERE ");
                self.write_identifier_quoted(out, find_primary_column(descriptor)?.name);
                out.push_str(" = ");
                self.write_parameter(out, 1);
            }
            Conditional::Where(fields, comparator) => {
                if fields.is_empty() {
                    return Err(ArgumentError::new("A where clause needs at least one field").into());
                }
                for field in fields.iter() {
                    descriptor.require_column(field)?;
                }
                out.push_str(" WHERE ");
                let mut index = 0;
                separated_by(
                    out,
                    fields.iter(),
                    |out, field| {
                        index += 1;
                        self.write_identifier_quoted(out, field);
                        out.push(' ');
                        out.push_str(comparator.as_sql());
                        out.push(' ');
                        self.write_parameter(out, index);
                    },
                    " AND ",
                );
            }
            Conditional::WhereNull(fields) => {
                let Some(field) = fields.first() else {
                    return Err(ArgumentError::new("A null check needs a field").into());
                };
                descriptor.require_column(field)?;
                out.push_str(" WHERE ");
                self.write_identifier_quoted(out, field);
                out.push_str(" IS NULL");
            }
        }
        Ok(())
    }

    fn write_limit(&self, out: &mut String, descriptor: &EntityDescriptor, limiter: &Limiter) -> Result<()> {
        if let Some((field, order)) = &limiter.order_by {
            descriptor.require_column(field)?;
            out.push_str(" ORDER BY ");
            self.write_identifier_quoted(out, field);
            out.push(' ');
            out.push_str(order.as_sql());
        }
        if limiter.limit > 0 {
            out.push_str(" LIMIT ");
            write_integer!(out, limiter.limit);
        }
        Ok(())
    }

    fn write_select(
        &self,
        out: &mut String,
        database: &str,
        descriptor: &EntityDescriptor,
        select: &Select,
    ) -> Result<()> {
        out.push_str("SELECT ");
        match select.projection {
            Projection::All => out.push('*'),
            Projection::Columns(columns) => {
                if columns.is_empty() {
                    return Err(ArgumentError::new("No column to select").into());
                }
                for column in columns {
                    descriptor.require_column(column)?;
                }
                separated_by(
                    out,
                    columns.iter(),
                    |out, v| self.write_identifier_quoted(out, v),
                    ", ",
                );
            }
        }
        out.push_str(" FROM ");
        self.write_table_ref(out, database, descriptor.table_name());
        self.write_conditional(out, descriptor, &select.conditional, select.values.len())?;
        if let Some(limiter) = &select.limit {
            self.write_limit(out, descriptor, limiter)?;
        }
        out.push(';');
        Ok(())
    }

    fn write_aggregate(
        &self,
        out: &mut String,
        database: &str,
        descriptor: &EntityDescriptor,
        aggregate: &Aggregate,
    ) -> Result<()> {
        out.push_str("SELECT ");
        out.push_str(aggregate.aggregation.function());
        out.push('(');
        match aggregate.column {
            Some(column) => {
                descriptor.require_column(column)?;
                self.write_identifier_quoted(out, column);
            }
            None => out.push('*'),
        }
        out.push_str(") AS ");
        self.write_identifier_quoted(out, aggregate.aggregation.alias());
        out.push_str(" FROM ");
        self.write_table_ref(out, database, descriptor.table_name());
        self.write_conditional(
            out,
            descriptor,
            &aggregate.conditional,
            aggregate.values.len(),
        )?;
        out.push(';');
        Ok(())
    }

    /// Insert of the items holding a value, they are bound in record order.
    fn write_insert(&self, out: &mut String, database: &str, record: &Record) {
        let items = record.insert_items().collect::<Vec<_>>();
        out.push_str("INSERT INTO ");
        self.write_table_ref(out, database, record.table());
        out.push_str(" (");
        separated_by(
            out,
            items.iter(),
            |out, v| self.write_identifier_quoted(out, v.column),
            ", ",
        );
        out.push_str(") VALUES (");
        separated_by(
            out,
            1..=items.len(),
            |out, v| self.write_parameter(out, v),
            ", ",
        );
        out.push(')');
        if !items.is_empty() {
            self.write_upsert_fragment(out, record, &items);
        }
        out.push(';');
    }

    /// Update scoped by the literal primary value of the record.
    ///
    /// Every item is rewritten, or only the one whose field matches `field`.
    fn write_update(
        &self,
        out: &mut String,
        database: &str,
        record: &Record,
        field: Option<&str>,
    ) -> Result<()> {
        let primary = find_primary_column(record.descriptor())?;
        out.push_str("UPDATE ");
        self.write_table_ref(out, database, record.table());
        out.push_str(" SET ");
        match field {
            None => self.write_assignments(out, record.items.iter()),
            Some(field) => {
                let Some(item) = record.matching_field(field) else {
                    return Err(ArgumentError::new(format!(
                        "Table `{}` has no field matching `{}`",
                        record.table(),
                        field
                    ))
                    .into());
                };
                self.write_assignments(out, std::iter::once(item));
            }
        }
        out.push_str(" WHERE ");
        self.write_identifier_quoted(out, primary.name);
        out.push_str(" = ");
        self.write_value(out, &record.primary_value());
        out.push(';');
        Ok(())
    }

    fn write_delete(&self, out: &mut String, database: &str, record: &Record) -> Result<()> {
        let primary = find_primary_column(record.descriptor())?;
        out.push_str("DELETE FROM ");
        self.write_table_ref(out, database, record.table());
        out.push_str(" WHERE ");
        self.write_identifier_quoted(out, primary.name);
        out.push_str(" = ");
        self.write_value(out, &record.primary_value());
        out.push(';');
        Ok(())
    }

    fn write_column_definition(&self, out: &mut String, column: &ColumnDescriptor) {
        self.write_identifier_quoted(out, column.name);
        out.push(' ');
        out.push_str(column.sql_type());
        if !column.nullable || column.primary {
            out.push_str(" NOT NULL");
        }
        if column.primary && column.kind.is_some_and(|v| v.is_integer()) {
            self.write_auto_increment(out);
        }
    }

    fn write_create_table(&self, out: &mut String, descriptor: &EntityDescriptor) {
        out.push_str("CREATE TABLE ");
        self.write_identifier_quoted(out, descriptor.table_name());
        out.push_str(" (");
        separated_by(
            out,
            descriptor.scalar_columns(),
            |out, v| self.write_column_definition(out, v),
            ", ",
        );
        if let Some(primary) = descriptor.primary() {
            out.push_str(", PRIMARY KEY (");
            self.write_identifier_quoted(out, primary.name);
            out.push(')');
        }
        out.push_str(");");
    }

    fn write_add_column(&self, out: &mut String, descriptor: &EntityDescriptor, column: &ColumnDescriptor) {
        out.push_str("ALTER TABLE ");
        self.write_identifier_quoted(out, descriptor.table_name());
        out.push_str(" ADD COLUMN ");
        self.write_identifier_quoted(out, column.name);
        out.push(' ');
        out.push_str(column.sql_type());
        if !column.nullable {
            out.push_str(" NOT NULL");
        }
        out.push(';');
    }

    fn write_drop_table(&self, out: &mut String, descriptor: &EntityDescriptor) {
        out.push_str("DROP TABLE IF EXISTS ");
        self.write_identifier_quoted(out, descriptor.table_name());
        out.push(';');
    }

    /// Minimal read failing when the table does not exist.
    fn write_table_probe(&self, out: &mut String, database: &str, table: &str) {
        out.push_str("SELECT 1 FROM ");
        self.write_table_ref(out, database, table);
        out.push_str(" LIMIT 1;");
    }

    /// Read of no rows failing when the column does not exist.
    fn write_column_probe(&self, out: &mut String, database: &str, table: &str, column: &str) {
        out.push_str("SELECT ");
        self.write_identifier_quoted(out, column);
        out.push_str(" FROM ");
        self.write_table_ref(out, database, table);
        out.push_str(" LIMIT 0;");
    }
}

#[derive(Default)]
pub struct GenericSqlWriter;
impl GenericSqlWriter {
    pub fn new() -> Self {
        Self {}
    }
}
impl SqlWriter for GenericSqlWriter {}
