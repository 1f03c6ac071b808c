use grove_core::{Record, RecordItem, SqlWriter};

#[derive(Default)]
pub struct MySQLSqlWriter {}

impl SqlWriter for MySQLSqlWriter {
    fn write_identifier_quoted(&self, out: &mut String, value: &str) {
        out.push('`');
        self.write_escaped(out, value, '`', "``");
        out.push('`');
    }

    fn write_value_bool(&self, out: &mut String, value: bool) {
        out.push(['0', '1'][value as usize]);
    }

    fn write_value_string(&self, out: &mut String, value: &str) {
        out.push('\'');
        for c in value.chars() {
            match c {
                '\'' => out.push_str("''"),
                '\\' => out.push_str("\\\\"),
                '\0' => out.push_str("\\0"),
                c => out.push(c),
            }
        }
        out.push('\'');
    }

    fn write_auto_increment(&self, out: &mut String) {
        out.push_str(" AUTO_INCREMENT");
    }

    fn write_upsert_fragment(&self, out: &mut String, _record: &Record, items: &[&RecordItem]) {
        out.push_str(" ON DUPLICATE KEY UPDATE ");
        self.write_assignments(out, items.iter().copied());
    }
}
