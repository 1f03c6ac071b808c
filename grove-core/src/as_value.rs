use crate::{ConversionError, Result, Value, format_time_span, parse_time_span};
use std::any;
use time::Duration;

/// Conversion between native Rust types and the dynamically typed [`Value`].
///
/// It backs both directions of the entity mapping: field values become statement
/// parameters through [`AsValue::as_value`], and row cells come back through
/// [`AsValue::try_from_value`].
///
/// # Conversion rules
/// - The canonical variant of the type is always accepted.
/// - Numbers are accepted from any other numeric width after a range check, from
///   booleans, and from numeric text.
/// - Anything else is a [`ConversionError`], callers must not swallow it.
///
/// # Examples
/// ```rust
/// use grove_core::{AsValue, Value};
/// let v = 42i32.as_value();
/// assert!(matches!(v, Value::Int32(Some(42))));
/// let n: i64 = AsValue::try_from_value(v).unwrap();
/// assert_eq!(n, 42);
/// ```
pub trait AsValue {
    /// The NULL value having the shape of this type.
    fn as_empty_value() -> Value;
    /// Convert into the owned [`Value`] representation.
    fn as_value(self) -> Value;
    /// Attempt to convert a dynamic [`Value`] into `Self`.
    fn try_from_value(value: Value) -> Result<Self>
    where
        Self: Sized;
    /// Lenient conversion used when the field is optional: types that have a notion
    /// of "unparsable means absent" return `Ok(None)` instead of failing.
    fn try_from_value_or_absent(value: Value) -> Result<Option<Self>>
    where
        Self: Sized,
    {
        Self::try_from_value(value).map(Some)
    }
}

impl<T: AsValue> From<T> for Value {
    fn from(value: T) -> Self {
        value.as_value()
    }
}

impl From<&str> for Value {
    fn from(value: &str) -> Self {
        Value::Varchar(Some(value.into()))
    }
}

fn mismatch<T>(value: &Value) -> crate::Error {
    ConversionError::new(value, any::type_name::<T>()).into()
}

macro_rules! impl_as_value_integer {
    ($source:ty, $destination:path) => {
        impl AsValue for $source {
            fn as_empty_value() -> Value {
                $destination(None)
            }
            fn as_value(self) -> Value {
                $destination(Some(self))
            }
            fn try_from_value(value: Value) -> Result<Self> {
                let integer = match &value {
                    Value::Boolean(Some(v)) => Some(*v as i128),
                    Value::Float32(Some(v)) if v.fract() == 0.0 => Some(*v as i128),
                    Value::Float64(Some(v)) if v.fract() == 0.0 => Some(*v as i128),
                    Value::Varchar(Some(v)) => {
                        let v = v.trim();
                        v.parse::<i128>().ok().or_else(|| {
                            v.parse::<f64>()
                                .ok()
                                .filter(|v| v.fract() == 0.0)
                                .map(|v| v as i128)
                        })
                    }
                    _ => value.as_integer(),
                };
                integer
                    .and_then(|v| <$source>::try_from(v).ok())
                    .ok_or_else(|| mismatch::<Self>(&value))
            }
        }
    };
}

impl_as_value_integer!(i8, Value::Int8);
impl_as_value_integer!(i16, Value::Int16);
impl_as_value_integer!(i32, Value::Int32);
impl_as_value_integer!(i64, Value::Int64);
impl_as_value_integer!(u8, Value::UInt8);
impl_as_value_integer!(u16, Value::UInt16);
impl_as_value_integer!(u32, Value::UInt32);
impl_as_value_integer!(u64, Value::UInt64);

macro_rules! impl_as_value_float {
    ($source:ty, $destination:path) => {
        impl AsValue for $source {
            fn as_empty_value() -> Value {
                $destination(None)
            }
            fn as_value(self) -> Value {
                $destination(Some(self))
            }
            fn try_from_value(value: Value) -> Result<Self> {
                let float = match &value {
                    Value::Boolean(Some(v)) => Some(*v as u8 as f64),
                    Value::Varchar(Some(v)) => v.trim().parse::<f64>().ok(),
                    _ => value.as_float(),
                };
                float
                    .map(|v| v as $source)
                    .ok_or_else(|| mismatch::<Self>(&value))
            }
        }
    };
}

impl_as_value_float!(f32, Value::Float32);
impl_as_value_float!(f64, Value::Float64);

impl AsValue for bool {
    fn as_empty_value() -> Value {
        Value::Boolean(None)
    }
    fn as_value(self) -> Value {
        Value::Boolean(Some(self))
    }
    fn try_from_value(value: Value) -> Result<Self> {
        match &value {
            Value::Boolean(Some(v)) => Ok(*v),
            Value::Varchar(Some(v)) => match v.trim().to_ascii_lowercase().as_str() {
                "true" | "1" => Ok(true),
                "false" | "0" => Ok(false),
                _ => Err(mismatch::<Self>(&value)),
            },
            _ => value
                .as_integer()
                .map(|v| v != 0)
                .ok_or_else(|| mismatch::<Self>(&value)),
        }
    }
}

impl AsValue for String {
    fn as_empty_value() -> Value {
        Value::Varchar(None)
    }
    fn as_value(self) -> Value {
        Value::Varchar(Some(self))
    }
    fn try_from_value(value: Value) -> Result<Self> {
        match value {
            Value::Varchar(Some(v)) => Ok(v),
            Value::Blob(Some(v)) => String::from_utf8(v.into_vec())
                .map_err(|e| mismatch::<Self>(&Value::Blob(Some(e.into_bytes().into())))),
            Value::Boolean(Some(v)) => Ok(v.to_string()),
            Value::Float32(Some(v)) => Ok(v.to_string()),
            Value::Float64(Some(v)) => Ok(v.to_string()),
            _ => value
                .as_integer()
                .map(|v| v.to_string())
                .ok_or_else(|| mismatch::<Self>(&value)),
        }
    }
}

impl AsValue for Vec<u8> {
    fn as_empty_value() -> Value {
        Value::Blob(None)
    }
    fn as_value(self) -> Value {
        Value::Blob(Some(self.into_boxed_slice()))
    }
    fn try_from_value(value: Value) -> Result<Self> {
        match value {
            Value::Blob(Some(v)) => Ok(v.into_vec()),
            Value::Varchar(Some(v)) => Ok(v.into_bytes()),
            _ => Err(mismatch::<Self>(&value)),
        }
    }
}

impl AsValue for Duration {
    fn as_empty_value() -> Value {
        Value::Varchar(None)
    }
    fn as_value(self) -> Value {
        Value::Varchar(Some(format_time_span(&self)))
    }
    fn try_from_value(value: Value) -> Result<Self> {
        Ok(Self::try_from_value_or_absent(value)?.unwrap_or(Duration::ZERO))
    }
    fn try_from_value_or_absent(value: Value) -> Result<Option<Self>> {
        Ok(match value {
            Value::Varchar(Some(v)) => parse_time_span(&v),
            Value::Blob(Some(v)) => std::str::from_utf8(&v).ok().and_then(parse_time_span),
            _ => None,
        })
    }
}

impl<T: AsValue> AsValue for Option<T> {
    fn as_empty_value() -> Value {
        T::as_empty_value()
    }
    fn as_value(self) -> Value {
        match self {
            Some(v) => v.as_value(),
            None => T::as_empty_value(),
        }
    }
    fn try_from_value(value: Value) -> Result<Self> {
        if value.is_null() {
            return Ok(None);
        }
        T::try_from_value_or_absent(value)
    }
}
