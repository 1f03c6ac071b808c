use crate::{ArgumentError, EntityDescriptor, Error, Result};
use proc_macro2::TokenStream;
use quote::{ToTokens, TokenStreamExt, quote};
use std::str::FromStr;

/// Logical kind of a scalar column, it determines the SQL type used in the DDL.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SqlKind {
    Int12,
    Bool,
    Enum,
    Varchar60,
    Varchar120,
    Text,
    Blob,
    MediumBlob,
    LongBlob,
    VarBinary,
    Double,
}

impl SqlKind {
    pub const ALL: [SqlKind; 11] = [
        SqlKind::Int12,
        SqlKind::Bool,
        SqlKind::Enum,
        SqlKind::Varchar60,
        SqlKind::Varchar120,
        SqlKind::Text,
        SqlKind::Blob,
        SqlKind::MediumBlob,
        SqlKind::LongBlob,
        SqlKind::VarBinary,
        SqlKind::Double,
    ];

    pub fn sql_type(&self) -> &'static str {
        match self {
            SqlKind::Int12 => "INT(12)",
            SqlKind::Bool | SqlKind::Enum => "TINYINT(4)",
            SqlKind::Varchar60 => "VARCHAR(60)",
            SqlKind::Varchar120 => "VARCHAR(120)",
            SqlKind::Text => "TEXT",
            SqlKind::Blob => "BLOB",
            SqlKind::MediumBlob => "MEDIUMBLOB",
            SqlKind::LongBlob => "LONGBLOB",
            SqlKind::VarBinary => "VARBINARY(32768)",
            SqlKind::Double => "DOUBLE",
        }
    }

    /// Booleans and enum-backed values are stored as small integers.
    pub fn is_small_integer(&self) -> bool {
        matches!(self, SqlKind::Bool | SqlKind::Enum)
    }

    pub fn is_integer(&self) -> bool {
        matches!(self, SqlKind::Int12 | SqlKind::Bool | SqlKind::Enum)
    }

    pub fn name(&self) -> &'static str {
        match self {
            SqlKind::Int12 => "Int12",
            SqlKind::Bool => "Bool",
            SqlKind::Enum => "Enum",
            SqlKind::Varchar60 => "Varchar60",
            SqlKind::Varchar120 => "Varchar120",
            SqlKind::Text => "Text",
            SqlKind::Blob => "Blob",
            SqlKind::MediumBlob => "MediumBlob",
            SqlKind::LongBlob => "LongBlob",
            SqlKind::VarBinary => "VarBinary",
            SqlKind::Double => "Double",
        }
    }
}

impl FromStr for SqlKind {
    type Err = Error;
    fn from_str(value: &str) -> Result<Self> {
        SqlKind::ALL
            .into_iter()
            .find(|kind| kind.name().eq_ignore_ascii_case(value))
            .ok_or_else(|| {
                ArgumentError::new(format!(
                    "Unknown column kind `{}`, expected one of: {}",
                    value,
                    SqlKind::ALL.map(|v| v.name()).join(", ")
                ))
                .into()
            })
    }
}

impl ToTokens for SqlKind {
    fn to_tokens(&self, tokens: &mut TokenStream) {
        let kind = quote::format_ident!("{}", self.name());
        tokens.append_all(quote!(::grove::SqlKind::#kind));
    }
}

/// Whether a field is stored inline or resolved through a secondary query.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub enum RelationKind {
    #[default]
    None,
    /// A single related entity.
    EmbeddedTable,
    /// A list of related entities.
    EmbeddedList,
}

impl ToTokens for RelationKind {
    fn to_tokens(&self, tokens: &mut TokenStream) {
        tokens.append_all(match self {
            RelationKind::None => quote!(::grove::RelationKind::None),
            RelationKind::EmbeddedTable => quote!(::grove::RelationKind::EmbeddedTable),
            RelationKind::EmbeddedList => quote!(::grove::RelationKind::EmbeddedList),
        });
    }
}

/// Declarative specification of one mapped field.
#[derive(Debug)]
pub struct ColumnDescriptor {
    /// Column name, for relations the field name.
    pub name: &'static str,
    /// Name of the Rust field.
    pub field: &'static str,
    /// Logical kind, `None` for relations.
    pub kind: Option<SqlKind>,
    pub nullable: bool,
    pub primary: bool,
    pub relation: RelationKind,
    /// Column of the related table holding the parent's primary value.
    pub foreign_key: &'static str,
    /// Descriptor of the related entity, resolved lazily so that types can refer to each other.
    pub related: Option<fn() -> Result<&'static EntityDescriptor>>,
}

impl ColumnDescriptor {
    pub fn is_relation(&self) -> bool {
        self.relation != RelationKind::None
    }

    /// SQL type string, empty for relations.
    pub fn sql_type(&self) -> &'static str {
        self.kind.map(|v| v.sql_type()).unwrap_or_default()
    }

    /// Table name of the related entity.
    pub fn related_table(&self) -> Option<&'static str> {
        self.related
            .and_then(|related| related().ok())
            .and_then(|v| v.table)
    }
}
