pub fn separated_by<T, F>(
    out: &mut String,
    values: impl IntoIterator<Item = T>,
    mut f: F,
    separator: &str,
) where
    F: FnMut(&mut String, T),
{
    let mut len = out.len();
    for v in values {
        if out.len() > len {
            out.push_str(separator);
        }
        len = out.len();
        f(out, v);
    }
}

pub fn consume_while<'s>(input: &mut &'s str, predicate: impl FnMut(&char) -> bool) -> &'s str {
    let len: usize = input
        .chars()
        .take_while(predicate)
        .map(char::len_utf8)
        .sum();
    if len == 0 {
        return "";
    }
    let result = &input[..len];
    *input = &input[len..];
    result
}

/// True when `column` is selected by the optional projection filter.
pub fn is_selected(columns: Option<&[&str]>, column: &str) -> bool {
    columns.is_none_or(|columns| columns.contains(&column))
}

/// Longest prefix of `value` not exceeding `len` bytes that ends on a char boundary.
pub fn truncate_str(value: &str, mut len: usize) -> &str {
    if len >= value.len() {
        return value;
    }
    while !value.is_char_boundary(len) {
        len -= 1;
    }
    &value[..len]
}

#[macro_export]
macro_rules! truncate_long {
    ($query:expr) => {
        format_args!(
            "{}{}",
            $crate::truncate_str(&$query, 497).trim_end(),
            if $query.len() > 497 { "..." } else { "" },
        )
    };
}

/// Diagnostic output, emitted only when both logging and verbose mode are enabled.
#[macro_export]
macro_rules! log_verbose {
    ($config:expr, $($arg:tt)+) => {
        if $config.logs_enabled && $config.verbose {
            $crate::log::debug!($($arg)+);
        }
    };
}

/// Fault output, emitted whenever logging is enabled.
#[macro_export]
macro_rules! log_error {
    ($config:expr, $error:expr) => {
        if $config.logs_enabled {
            $crate::log::error!("{:#}", $error);
        }
    };
}
