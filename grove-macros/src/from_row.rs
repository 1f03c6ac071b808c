use crate::decode_column::ColumnMetadata;
use proc_macro2::TokenStream;
use quote::quote;
use syn::ItemStruct;

/// Body of `Entity::from_row`: mapped columns are decoded, every other field gets its default.
pub(crate) fn from_row(item: &ItemStruct, columns: &[ColumnMetadata]) -> TokenStream {
    let decoded = columns.iter().filter(|c| !c.is_relation()).map(|c| {
        let ident = &c.ident;
        let name = &c.name;
        quote!(#ident: ::grove::decode_column(row, #name, columns)?)
    });
    let remaining = item
        .fields
        .iter()
        .filter_map(|field| field.ident.as_ref())
        .filter(|ident| {
            columns
                .iter()
                .all(|c| c.is_relation() || c.ident != **ident)
        })
        .map(|ident| quote!(#ident: ::std::default::Default::default()));
    quote! {
        Ok(Self {
            #(#decoded,)*
            #(#remaining,)*
        })
    }
}

/// Body of `Entity::set_column`.
pub(crate) fn set_column(columns: &[ColumnMetadata]) -> TokenStream {
    let arms = columns.iter().filter(|c| !c.is_relation()).map(|c| {
        let ident = &c.ident;
        let name = &c.name;
        quote!(#name => self.#ident = ::grove::decode_value(value)?)
    });
    quote! {
        match column {
            #(#arms,)*
            _ => {}
        }
        Ok(())
    }
}
