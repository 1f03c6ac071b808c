use convert_case::{Case, Casing};
use grove_core::{RelationKind, SqlKind};
use quote::ToTokens;
use syn::{
    Field, GenericArgument, Ident, LitStr, PathArguments, Type, parse::ParseBuffer,
};

/// Mapping of one struct field, as declared by its `#[grove(..)]` attribute.
pub(crate) struct ColumnMetadata {
    pub(crate) ident: Ident,
    pub(crate) ty: Type,
    pub(crate) name: String,
    pub(crate) kind: Option<SqlKind>,
    pub(crate) nullable: bool,
    pub(crate) primary: bool,
    pub(crate) relation: RelationKind,
    pub(crate) foreign_key: String,
}

impl ColumnMetadata {
    pub(crate) fn is_relation(&self) -> bool {
        self.relation != RelationKind::None
    }
}

/// Last path segment of a type, with its generic arguments.
fn last_segment(ty: &Type) -> Option<(String, Option<&Type>)> {
    let Type::Path(path) = ty else {
        return None;
    };
    let segment = path.path.segments.last()?;
    let argument = match &segment.arguments {
        PathArguments::AngleBracketed(v) => v.args.iter().find_map(|v| match v {
            GenericArgument::Type(v) => Some(v),
            _ => None,
        }),
        _ => None,
    };
    Some((segment.ident.to_string(), argument))
}

/// Kind of the common field types, `Option` is looked through.
fn infer_kind(ty: &Type) -> Option<SqlKind> {
    let (name, argument) = last_segment(ty)?;
    Some(match name.as_str() {
        "Option" => return infer_kind(argument?),
        "i8" | "i16" | "i32" | "i64" | "u8" | "u16" | "u32" | "u64" => SqlKind::Int12,
        "bool" => SqlKind::Bool,
        "f32" | "f64" => SqlKind::Double,
        "String" => SqlKind::Varchar120,
        "Duration" => SqlKind::Varchar60,
        "Vec" if matches!(last_segment(argument?), Some((v, ..)) if v == "u8") => SqlKind::Blob,
        _ => return None,
    })
}

/// Reads the mapping of a field, `None` when the field is not mapped.
pub(crate) fn decode_column(field: &Field) -> Option<ColumnMetadata> {
    let attr = field.attrs.iter().find(|v| v.meta.path().is_ident("grove"))?;
    let ident = field
        .ident
        .clone()
        .expect("Entity fields are expected to have a name");
    let mut metadata = ColumnMetadata {
        name: ident.to_string().to_case(Case::Snake),
        ident,
        ty: field.ty.clone(),
        kind: None,
        nullable: true,
        primary: false,
        relation: RelationKind::None,
        foreign_key: String::new(),
    };
    let Ok(list) = attr.meta.require_list() else {
        panic!("Error while parsing `grove`, use it like: `#[grove(attribute = value, ...)]`");
    };
    let _ = list.parse_nested_meta(|arg| {
        if arg.path.is_ident("name") {
            let Ok(v) = arg.value().and_then(ParseBuffer::parse::<LitStr>) else {
                panic!("Error while parsing `name`, use it like: `#[grove(name = \"my_column\")]`");
            };
            metadata.name = v.value();
        } else if arg.path.is_ident("kind") {
            let Ok(v) = arg.value().and_then(ParseBuffer::parse::<Ident>) else {
                panic!("Error while parsing `kind`, use it like: `#[grove(kind = Varchar120)]`");
            };
            match v.to_string().parse::<SqlKind>() {
                Ok(kind) => metadata.kind = Some(kind),
                Err(e) => panic!("{:#}", e),
            }
        } else if arg.path.is_ident("primary_key") {
            let Err(..) = arg.value() else {
                // value() is Err for Meta::Path
                panic!("Error while parsing `primary_key`, use it like: `#[grove(primary_key)]`");
            };
            metadata.primary = true;
        } else if arg.path.is_ident("not_null") {
            let Err(..) = arg.value() else {
                panic!("Error while parsing `not_null`, use it like: `#[grove(not_null)]`");
            };
            metadata.nullable = false;
        } else if arg.path.is_ident("embedded_list") || arg.path.is_ident("embedded_table") {
            let list = arg.path.is_ident("embedded_list");
            let Ok(v) = arg.value().and_then(ParseBuffer::parse::<LitStr>) else {
                panic!(
                    "Error while parsing `{0}`, use it like: `#[grove({0} = \"foreign_key_column\")]`",
                    arg.path.to_token_stream()
                );
            };
            let (container, expected) = if list {
                (RelationKind::EmbeddedList, "Vec")
            } else {
                (RelationKind::EmbeddedTable, "Option")
            };
            if !matches!(last_segment(&field.ty), Some((v, Some(..))) if v == expected) {
                panic!(
                    "Field `{}` is declared with `{}`, its type must be `{}<..>`",
                    metadata.ident,
                    arg.path.to_token_stream(),
                    expected
                );
            }
            metadata.relation = container;
            metadata.foreign_key = v.value();
        } else {
            panic!(
                "Unknown attribute `{}` inside grove macro",
                arg.path.to_token_stream()
            );
        }
        Ok(())
    });
    if metadata.is_relation() {
        if metadata.primary || metadata.kind.is_some() {
            panic!(
                "Relation field `{}` cannot declare `kind` or `primary_key`",
                metadata.ident
            );
        }
        metadata.name = metadata.ident.to_string();
        return Some(metadata);
    }
    if metadata.kind.is_none() {
        metadata.kind = infer_kind(&field.ty);
    }
    if metadata.kind.is_none() {
        panic!(
            "Cannot infer the kind of column `{}`, declare it like: `#[grove(kind = Varchar120)]`",
            metadata.name
        );
    }
    Some(metadata)
}
