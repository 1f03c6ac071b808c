use crate::decode_column::ColumnMetadata;
use proc_macro2::TokenStream;
use quote::quote;

pub(crate) fn encode_column_def(metadata: &ColumnMetadata) -> TokenStream {
    let name = &metadata.name;
    let field = metadata.ident.to_string();
    let kind = metadata
        .kind
        .map_or(quote!(None), |v| quote!(Some(#v)));
    let nullable = &metadata.nullable;
    let primary = &metadata.primary;
    let relation = &metadata.relation;
    let foreign_key = &metadata.foreign_key;
    let related = if metadata.is_relation() {
        let ty = &metadata.ty;
        quote! {
            Some(<<#ty as ::grove::Relation>::Target as ::grove::Entity>::descriptor)
        }
    } else {
        quote!(None)
    };
    quote! {
        ::grove::ColumnDescriptor {
            name: #name,
            field: #field,
            kind: #kind,
            nullable: #nullable,
            primary: #primary,
            relation: #relation,
            foreign_key: #foreign_key,
            related: #related,
        }
    }
}
