use convert_case::{Case, Casing};
use syn::{ItemStruct, LitStr, Meta};

/// Table declared by `#[table_name("..")]`, a bare `#[table_name]` uses the snake-cased type name.
pub(crate) fn table_name(item: &ItemStruct) -> Option<String> {
    let default_table_name = item.ident.to_string().to_case(Case::Snake);
    item.attrs.iter().find_map(|attr| {
        if !attr.meta.path().is_ident("table_name") {
            return None;
        }
        if let Meta::Path(..) = attr.meta {
            return Some(default_table_name.clone());
        }
        let Ok(v) = attr
            .meta
            .require_list()
            .and_then(|v| v.parse_args::<LitStr>())
        else {
            panic!(
                "Error while parsing `table_name`, use it like #[table_name(\"{}\")] or #[table_name]",
                &default_table_name
            );
        };
        Some(v.value())
    })
}

pub(crate) fn has_lifecycle(item: &ItemStruct) -> bool {
    item.attrs.iter().any(|attr| {
        if !attr.meta.path().is_ident("lifecycle") {
            return false;
        }
        let Meta::Path(..) = attr.meta else {
            panic!("Error while parsing `lifecycle`, use it like #[lifecycle]");
        };
        true
    })
}
