use grove_core::{Error, Value};
use mysql_async::consts::ColumnType;

pub(crate) struct ValueWrap(pub(crate) Value);

impl From<Value> for ValueWrap {
    fn from(value: Value) -> Self {
        Self(value)
    }
}
impl From<ValueWrap> for Value {
    fn from(value: ValueWrap) -> Self {
        value.0
    }
}

impl ValueWrap {
    /// Decodes a cell, the column metadata tells text apart from binary data.
    pub(crate) fn decode(value: mysql_async::Value, column: &mysql_async::Column) -> Self {
        type MySQLValue = mysql_async::Value;
        Self(match value {
            MySQLValue::NULL => Value::Null,
            MySQLValue::Int(v) => Value::Int64(Some(v)),
            MySQLValue::UInt(v) => Value::UInt64(Some(v)),
            MySQLValue::Float(v) => Value::Float32(Some(v)),
            MySQLValue::Double(v) => Value::Float64(Some(v)),
            MySQLValue::Bytes(v) => {
                let numeric = matches!(
                    column.column_type(),
                    ColumnType::MYSQL_TYPE_DECIMAL | ColumnType::MYSQL_TYPE_NEWDECIMAL
                );
                if !numeric && column.character_set() == BINARY_CHARSET {
                    Value::Blob(Some(v.into()))
                } else {
                    match String::from_utf8(v) {
                        Ok(v) => Value::Varchar(Some(v)),
                        Err(e) => Value::Blob(Some(e.into_bytes().into())),
                    }
                }
            }
            MySQLValue::Date(year, month, day, hour, minute, second, micro) => {
                let mut text = format!(
                    "{:04}-{:02}-{:02} {:02}:{:02}:{:02}",
                    year, month, day, hour, minute, second
                );
                if micro > 0 {
                    text.push_str(&format!(".{:06}", micro));
                }
                Value::Varchar(Some(text))
            }
            MySQLValue::Time(negative, days, hours, minutes, seconds, micro) => {
                let hours = days * 24 + hours as u32;
                let mut text = format!(
                    "{}{:02}:{:02}:{:02}",
                    if negative { "-" } else { "" },
                    hours,
                    minutes,
                    seconds
                );
                if micro > 0 {
                    text.push_str(&format!(".{:06}", micro));
                }
                Value::Varchar(Some(text))
            }
        })
    }
}

/// Collation id of binary strings and of every non textual column.
const BINARY_CHARSET: u16 = 63;

impl TryFrom<ValueWrap> for mysql_async::Value {
    type Error = Error;

    fn try_from(value: ValueWrap) -> Result<Self, Self::Error> {
        type MySQLValue = mysql_async::Value;
        Ok(match value.0 {
            _ if value.0.is_null() => MySQLValue::NULL,
            Value::Boolean(Some(v)) => MySQLValue::from(v),
            Value::Int8(Some(v)) => MySQLValue::from(v),
            Value::Int16(Some(v)) => MySQLValue::from(v),
            Value::Int32(Some(v)) => MySQLValue::from(v),
            Value::Int64(Some(v)) => MySQLValue::from(v),
            Value::UInt8(Some(v)) => MySQLValue::from(v),
            Value::UInt16(Some(v)) => MySQLValue::from(v),
            Value::UInt32(Some(v)) => MySQLValue::from(v),
            Value::UInt64(Some(v)) => MySQLValue::from(v),
            Value::Float32(Some(v)) => MySQLValue::from(v),
            Value::Float64(Some(v)) => MySQLValue::from(v),
            Value::Varchar(Some(v)) => MySQLValue::from(v),
            Value::Blob(Some(v)) => MySQLValue::Bytes(v.into_vec()),
            v => {
                return Err(Error::msg(format!(
                    "grove::Value variant `{:?}` is not supported by MySQL",
                    v
                )));
            }
        })
    }
}
