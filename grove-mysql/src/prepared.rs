use grove_core::{ArgumentError, Result, Value};

/// Rewrites `@paramN` placeholders into the positional `?` of the MySQL protocol.
///
/// Every placeholder becomes one positional parameter, so a value referenced twice is bound
/// twice. Placeholders inside quoted text or quoted identifiers are left alone.
pub fn bind_positional(sql: &str, params: Vec<Value>) -> Result<(String, Vec<Value>)> {
    const PLACEHOLDER: &str = "@param";
    let mut out = String::with_capacity(sql.len());
    let mut bound = Vec::with_capacity(params.len());
    let mut quote: Option<char> = None;
    let mut escaped = false;
    let mut rest = sql;
    while let Some(c) = rest.chars().next() {
        if let Some(q) = quote {
            out.push(c);
            rest = &rest[c.len_utf8()..];
            if escaped {
                escaped = false;
            } else if c == '\\' && q != '`' {
                escaped = true;
            } else if c == q {
                quote = None;
            }
            continue;
        }
        if matches!(c, '\'' | '"' | '`') {
            quote = Some(c);
            out.push(c);
            rest = &rest[1..];
            continue;
        }
        if let Some(tail) = rest.strip_prefix(PLACEHOLDER) {
            let digits = tail.bytes().take_while(u8::is_ascii_digit).count();
            if digits > 0 {
                let index: usize = tail[..digits].parse()?;
                let Some(value) = index.checked_sub(1).and_then(|i| params.get(i)) else {
                    return Err(ArgumentError::new(format!(
                        "Placeholder {}{} has no value, {} were given",
                        PLACEHOLDER,
                        index,
                        params.len()
                    ))
                    .into());
                };
                bound.push(value.clone());
                out.push('?');
                rest = &tail[digits..];
                continue;
            }
        }
        out.push(c);
        rest = &rest[c.len_utf8()..];
    }
    Ok((out, bound))
}
