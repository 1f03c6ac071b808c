use crate::{ColumnDescriptor, EntityDescriptor, SqlKind, Value, coerce};

/// One column of a [`Record`], ready to be bound.
#[derive(Debug, Clone, PartialEq)]
pub struct RecordItem {
    pub column: &'static str,
    pub field: &'static str,
    pub value: Value,
    pub kind: SqlKind,
    pub primary: bool,
}

/// Position of a child record relative to the record of its owner.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Link {
    /// Index of the parent record in the encoded sequence.
    pub parent: usize,
    /// Column of this record receiving the parent's primary value.
    pub foreign_key: &'static str,
}

/// Flattened row representation of one entity snapshot.
///
/// Encoding an entity produces its own record followed by the records of its embedded
/// entities, depth first. The position in that sequence identifies the owning instance
/// when generated ids are written back.
#[derive(Debug, Clone)]
pub struct Record {
    descriptor: &'static EntityDescriptor,
    pub items: Vec<RecordItem>,
    pub link: Option<Link>,
    /// Statement text, assigned when the record is about to be executed.
    pub command: Option<String>,
}

impl Record {
    pub fn new(descriptor: &'static EntityDescriptor, link: Option<Link>) -> Self {
        Self {
            descriptor,
            items: Vec::with_capacity(descriptor.columns.len()),
            link,
            command: None,
        }
    }

    pub fn descriptor(&self) -> &'static EntityDescriptor {
        self.descriptor
    }

    pub fn table(&self) -> &'static str {
        self.descriptor.table_name()
    }

    /// Appends the value of a scalar column, relations are ignored.
    pub fn push(&mut self, column: &'static ColumnDescriptor, value: Value) {
        let Some(kind) = column.kind else {
            return;
        };
        self.items.push(RecordItem {
            column: column.name,
            field: column.field,
            value: coerce(value),
            kind,
            primary: column.primary,
        });
    }

    pub fn item(&self, column: &str) -> Option<&RecordItem> {
        self.items.iter().find(|v| v.column == column)
    }

    pub fn primary(&self) -> Option<&RecordItem> {
        self.items.iter().find(|v| v.primary)
    }

    pub fn primary_value(&self) -> Value {
        self.primary().map(|v| v.value.clone()).unwrap_or_default()
    }

    pub fn set_value(&mut self, column: &str, value: Value) -> bool {
        match self.items.iter_mut().find(|v| v.column == column) {
            Some(item) => {
                item.value = coerce(value);
                true
            }
            None => false,
        }
    }

    pub fn set_primary(&mut self, value: Value) -> bool {
        match self.items.iter_mut().find(|v| v.primary) {
            Some(item) => {
                item.value = value;
                true
            }
            None => false,
        }
    }

    /// First item whose field name contains `fragment`.
    pub fn matching_field(&self, fragment: &str) -> Option<&RecordItem> {
        self.items.iter().find(|v| v.field.contains(fragment))
    }

    /// Items written by an insert: every column holding a value.
    pub fn insert_items(&self) -> impl Iterator<Item = &RecordItem> + Clone {
        self.items.iter().filter(|v| !v.value.is_null())
    }

    pub fn command(&self) -> &str {
        self.command.as_deref().unwrap_or_default()
    }
}
