use crate::{
    AsValue, ColumnDescriptor, Entity, EntityDescriptor, Link, NotFoundError, Record, Result,
    RowLabeled, Value, is_selected,
};
use anyhow::Context;

/// Flattens the entity into its own record followed by the records of its embedded
/// entities, depth first and parent before children.
pub fn encode<E: Entity>(entity: &E) -> Result<Vec<Record>> {
    let mut out = Vec::new();
    encode_into(entity, None, &mut out)?;
    Ok(out)
}

/// Appends the records of `entity` to `out`, `link` ties them to an already encoded parent.
pub fn encode_into<E: Entity>(entity: &E, link: Option<Link>, out: &mut Vec<Record>) -> Result<()> {
    let descriptor = E::descriptor()?;
    let mut record = Record::new(descriptor, link);
    for (column, value) in descriptor.scalar_columns().zip(entity.row()) {
        record.push(column, value);
    }
    let index = out.len();
    out.push(record);
    entity.encode_related(index, out)
}

/// Storage representation of a field value: booleans become small integers.
pub fn coerce(value: Value) -> Value {
    match value {
        Value::Boolean(v) => Value::Int16(v.map(|v| v as i16)),
        v => v,
    }
}

/// Builds an entity from a row, only the columns in `columns` are read when given.
pub fn decode<E: Entity>(columns: Option<&[&str]>, row: &RowLabeled) -> Result<E> {
    E::from_row(row, columns)
}

/// Converts a stored value into a field, NULL becomes the default of the field type.
pub fn decode_value<T: AsValue + Default>(value: Value) -> Result<T> {
    if value.is_null() {
        return Ok(T::default());
    }
    T::try_from_value(value)
}

/// Reads one column of the row into a field.
///
/// Columns filtered out by the projection, or missing from the row, give the default.
pub fn decode_column<T: AsValue + Default>(
    row: &RowLabeled,
    column: &str,
    columns: Option<&[&str]>,
) -> Result<T> {
    if !is_selected(columns, column) {
        return Ok(T::default());
    }
    let Some(value) = row.get_column(column) else {
        return Ok(T::default());
    };
    decode_value(value.clone()).with_context(|| format!("While decoding column `{}`", column))
}

/// Copies the primary and foreign key values of the record back into the entity.
pub fn absorb_record<E: Entity>(entity: &mut E, record: Option<&Record>) -> Result<()> {
    let Some(record) = record else {
        return Ok(());
    };
    let foreign_key = record.link.map(|v| v.foreign_key);
    for item in &record.items {
        if (item.primary || Some(item.column) == foreign_key) && !item.value.is_null() {
            entity.set_column(item.column, item.value.clone())?;
        }
    }
    Ok(())
}

pub fn find_primary_column(descriptor: &EntityDescriptor) -> Result<&ColumnDescriptor> {
    descriptor.primary().ok_or_else(|| {
        NotFoundError::PrimaryColumn {
            entity: descriptor.entity,
        }
        .into()
    })
}
