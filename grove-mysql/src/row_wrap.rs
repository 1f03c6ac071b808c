use crate::ValueWrap;
use grove_core::{Row, RowLabeled, RowNames};
use mysql_async::FromRowError;

pub(crate) struct RowWrap(pub(crate) RowLabeled);

impl mysql_async::prelude::FromRow for RowWrap {
    fn from_row_opt(mut row: mysql_async::Row) -> Result<Self, FromRowError>
    where
        Self: Sized,
    {
        let columns = row.columns();
        let names: RowNames = columns.iter().map(|v| v.name_str().into_owned()).collect();
        let mut values = Vec::with_capacity(columns.len());
        for (i, column) in columns.iter().enumerate() {
            let Some(value) = row.take::<mysql_async::Value, _>(i) else {
                return Err(FromRowError(row));
            };
            values.push(ValueWrap::decode(value, column).0);
        }
        let values: Row = values.into_boxed_slice();
        Ok(RowWrap(RowLabeled::new(names, values)))
    }
}
