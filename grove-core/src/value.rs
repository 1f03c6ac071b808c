use std::fmt::{self, Display};

/// Dynamically typed cell exchanged with the driver.
///
/// Every variant carries an `Option` so that a NULL keeps the shape of the column it came from.
#[derive(Default, Debug, Clone)]
pub enum Value {
    #[default]
    Null,
    Boolean(Option<bool>),
    Int8(Option<i8>),
    Int16(Option<i16>),
    Int32(Option<i32>),
    Int64(Option<i64>),
    UInt8(Option<u8>),
    UInt16(Option<u16>),
    UInt32(Option<u32>),
    UInt64(Option<u64>),
    Float32(Option<f32>),
    Float64(Option<f64>),
    Varchar(Option<String>),
    Blob(Option<Box<[u8]>>),
}

impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::Boolean(l), Self::Boolean(r)) => l == r,
            (Self::Int8(l), Self::Int8(r)) => l == r,
            (Self::Int16(l), Self::Int16(r)) => l == r,
            (Self::Int32(l), Self::Int32(r)) => l == r,
            (Self::Int64(l), Self::Int64(r)) => l == r,
            (Self::UInt8(l), Self::UInt8(r)) => l == r,
            (Self::UInt16(l), Self::UInt16(r)) => l == r,
            (Self::UInt32(l), Self::UInt32(r)) => l == r,
            (Self::UInt64(l), Self::UInt64(r)) => l == r,
            (Self::Float32(l), Self::Float32(r)) => l == r,
            (Self::Float64(l), Self::Float64(r)) => l == r,
            (Self::Varchar(l), Self::Varchar(r)) => l == r,
            (Self::Blob(l), Self::Blob(r)) => l == r,
            _ => self.is_null() && other.is_null(),
        }
    }
}

impl Value {
    pub fn is_null(&self) -> bool {
        match self {
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
            | Value::Blob(None) => true,
            _ => false,
        }
    }

    /// The integer carried by this value, if it holds one.
    pub fn as_integer(&self) -> Option<i128> {
        Some(match self {
            Value::Int8(Some(v)) => *v as _,
            Value::Int16(Some(v)) => *v as _,
            Value::Int32(Some(v)) => *v as _,
            Value::Int64(Some(v)) => *v as _,
            Value::UInt8(Some(v)) => *v as _,
            Value::UInt16(Some(v)) => *v as _,
            Value::UInt32(Some(v)) => *v as _,
            Value::UInt64(Some(v)) => *v as _,
            _ => return None,
        })
    }

    /// The floating point number carried by this value, integers are widened.
    pub fn as_float(&self) -> Option<f64> {
        match self {
            Value::Float32(Some(v)) => Some(*v as _),
            Value::Float64(Some(v)) => Some(*v),
            _ => self.as_integer().map(|v| v as _),
        }
    }
}

impl Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            _ if self.is_null() => f.write_str("NULL"),
            Value::Boolean(Some(v)) => write!(f, "{v}"),
            Value::Float32(Some(v)) => write!(f, "{v}"),
            Value::Float64(Some(v)) => write!(f, "{v}"),
            Value::Varchar(Some(v)) => write!(f, "'{v}'"),
            Value::Blob(Some(v)) => write!(f, "<{} bytes>", v.len()),
            _ => match self.as_integer() {
                Some(v) => write!(f, "{v}"),
                None => write!(f, "{:?}", self),
            },
        }
    }
}
