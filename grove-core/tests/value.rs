#[cfg(test)]
mod tests {
    use grove_core::{AsValue, ConversionError, Value, decode_value};
    use time::Duration;

    #[test]
    fn value_null() {
        assert_eq!(Value::Null, Value::Null);
        assert_eq!(Value::Int32(None), Value::Varchar(None));
        assert_ne!(Value::Float32(Some(1.0)), Value::Null);
        assert!(Value::Blob(None).is_null());
        assert!(!Value::Varchar(Some("".into())).is_null());
    }

    #[test]
    fn value_bool() {
        let val: Value = true.into();
        assert_eq!(val, Value::Boolean(Some(true)));
        assert_ne!(val, Value::Varchar(Some("true".into())));
        assert_eq!(bool::try_from_value(val).unwrap(), true);
        assert_eq!(bool::try_from_value(Value::Int16(Some(1))).unwrap(), true);
        assert_eq!(bool::try_from_value(Value::UInt64(Some(0))).unwrap(), false);
        assert_eq!(bool::try_from_value("false".into()).unwrap(), false);
        assert_eq!(bool::try_from_value("1".into()).unwrap(), true);
        assert!(bool::try_from_value("yes".into()).is_err());
        assert!(bool::try_from_value(Value::Float32(Some(0.5))).is_err());
    }

    #[test]
    fn value_integers() {
        let val: Value = 127i8.into();
        assert_eq!(val, Value::Int8(Some(127)));
        assert_ne!(val, Value::Int16(Some(127)));
        assert_eq!(i64::try_from_value(val).unwrap(), 127);
        assert_eq!(i8::try_from_value(Value::UInt8(Some(99))).unwrap(), 99);
        assert!(i8::try_from_value(Value::UInt8(Some(200))).is_err());
        assert!(u32::try_from_value(Value::Int32(Some(-1))).is_err());
        assert_eq!(u16::try_from_value(Value::Boolean(Some(true))).unwrap(), 1);
        assert_eq!(i32::try_from_value(Value::Float64(Some(12.0))).unwrap(), 12);
        assert!(i32::try_from_value(Value::Float64(Some(12.5))).is_err());
        assert_eq!(i32::try_from_value(" 42 ".into()).unwrap(), 42);
        assert_eq!(i64::try_from_value("7.0".into()).unwrap(), 7);
        assert!(i64::try_from_value("seven".into()).is_err());
        assert_eq!(
            u64::try_from_value(Value::Int64(Some(i64::MAX))).unwrap(),
            i64::MAX as u64
        );
    }

    #[test]
    fn value_floats() {
        let val: Value = 1.5f64.into();
        assert_eq!(val, Value::Float64(Some(1.5)));
        assert_eq!(f32::try_from_value(val).unwrap(), 1.5);
        assert_eq!(f64::try_from_value(Value::Int32(Some(-3))).unwrap(), -3.0);
        assert_eq!(f64::try_from_value("2.25".into()).unwrap(), 2.25);
        assert!(f64::try_from_value(Value::Blob(Some([1u8].into()))).is_err());
    }

    #[test]
    fn value_string() {
        let val: Value = "hello".into();
        assert_eq!(val, Value::Varchar(Some("hello".into())));
        assert_eq!(String::try_from_value(val).unwrap(), "hello");
        assert_eq!(String::try_from_value(Value::Int64(Some(-5))).unwrap(), "-5");
        assert_eq!(
            String::try_from_value(Value::Blob(Some(b"bytes".to_vec().into()))).unwrap(),
            "bytes"
        );
        assert!(String::try_from_value(Value::Blob(Some([0xff, 0xfe].into()))).is_err());
    }

    #[test]
    fn value_blob() {
        let val: Value = vec![1u8, 2, 3].into();
        assert_eq!(val, Value::Blob(Some([1, 2, 3].into())));
        assert_eq!(Vec::<u8>::try_from_value(val).unwrap(), vec![1, 2, 3]);
        assert_eq!(Vec::<u8>::try_from_value("ab".into()).unwrap(), b"ab".to_vec());
        assert!(Vec::<u8>::try_from_value(Value::Int8(Some(1))).is_err());
    }

    #[test]
    fn value_option() {
        assert_eq!(Option::<i32>::None.as_value(), Value::Int32(None));
        assert_eq!(Some(3i32).as_value(), Value::Int32(Some(3)));
        assert_eq!(Option::<i32>::try_from_value(Value::Null).unwrap(), None);
        assert_eq!(
            Option::<i32>::try_from_value(Value::Int64(Some(3))).unwrap(),
            Some(3)
        );
        assert!(Option::<i8>::try_from_value(Value::Int64(Some(300))).is_err());
    }

    #[test]
    fn value_time_span() {
        let span = Duration::hours(26) + Duration::minutes(3);
        let val = span.as_value();
        assert_eq!(val, Value::Varchar(Some("1.02:03:00".into())));
        assert_eq!(Duration::try_from_value(val).unwrap(), span);
        assert_eq!(
            Option::<Duration>::try_from_value("not a span".into()).unwrap(),
            None
        );
        assert_eq!(
            Duration::try_from_value("not a span".into()).unwrap(),
            Duration::ZERO
        );
        assert_eq!(Option::<Duration>::try_from_value(Value::Null).unwrap(), None);
    }

    #[test]
    fn conversion_error() {
        let error = i8::try_from_value("x".into()).unwrap_err();
        let conversion = error
            .downcast_ref::<ConversionError>()
            .expect("Should be a conversion error");
        assert_eq!(conversion.expected, "i8");
    }

    #[test]
    fn decode_null_as_default() {
        assert_eq!(decode_value::<i32>(Value::Int32(None)).unwrap(), 0);
        assert_eq!(decode_value::<String>(Value::Null).unwrap(), "");
        assert_eq!(decode_value::<bool>(Value::Int16(Some(1))).unwrap(), true);
        assert_eq!(decode_value::<Option<u8>>(Value::UInt8(None)).unwrap(), None);
    }

    #[test]
    fn display() {
        assert_eq!(Value::Null.to_string(), "NULL");
        assert_eq!(Value::Int64(Some(-4)).to_string(), "-4");
        assert_eq!(Value::Varchar(Some("a".into())).to_string(), "'a'");
        assert_eq!(Value::Blob(Some([0u8; 3].into())).to_string(), "<3 bytes>");
    }
}
