mod decode_column;
mod encode_column_def;
mod from_row;
mod table_name;
mod value_enum;

use decode_column::{ColumnMetadata, decode_column};
use encode_column_def::encode_column_def;
use from_row::{from_row, set_column};
use proc_macro::TokenStream;
use quote::quote;
use syn::{Fields, ItemEnum, ItemStruct, parse_macro_input};
use table_name::{has_lifecycle, table_name};
use value_enum::value_enum;

#[proc_macro_derive(Entity, attributes(table_name, grove, lifecycle))]
pub fn derive_entity(input: TokenStream) -> TokenStream {
    let item: ItemStruct = parse_macro_input!(input as ItemStruct);
    if !matches!(item.fields, Fields::Named(..)) {
        panic!("Entity can only be derived on structs with named fields");
    }
    let name = &item.ident;
    let entity_name = name.to_string();
    let table = table_name(&item).map_or(quote!(None), |v| quote!(Some(#v)));
    let columns: Vec<ColumnMetadata> = item.fields.iter().filter_map(decode_column).collect();
    let mut primaries = columns.iter().filter(|c| c.primary);
    let primary = primaries.next();
    if let Some(other) = primaries.next() {
        panic!(
            "Only one column can be the primary key of `{}`, found `{}` and `{}`",
            name,
            primary.map(|v| v.name.as_str()).unwrap_or_default(),
            other.name
        );
    }
    let column_defs = columns.iter().map(encode_column_def);
    let scalars = columns
        .iter()
        .filter(|c| !c.is_relation())
        .map(|c| &c.ident);
    let primary_value = primary.map_or(quote!(::grove::Value::Null), |c| {
        let ident = &c.ident;
        quote!(::grove::AsValue::as_value(::std::clone::Clone::clone(&self.#ident)))
    });
    let relations = columns.iter().filter(|c| c.is_relation());
    let encode_related = relations.clone().map(|c| {
        let ident = &c.ident;
        let foreign_key = &c.foreign_key;
        quote! {
            for entity in ::grove::Relation::entities(&self.#ident) {
                ::grove::encode_into(
                    entity,
                    Some(::grove::Link {
                        parent,
                        foreign_key: #foreign_key,
                    }),
                    out,
                )?;
            }
        }
    });
    let absorb_related = relations.clone().map(|c| {
        let ident = &c.ident;
        quote! {
            for entity in ::grove::Relation::entities_mut(&mut self.#ident) {
                ::grove::Entity::absorb(entity, records)?;
            }
        }
    });
    let resolve_related = relations.map(|c| {
        let ident = &c.ident;
        let field = &c.name;
        let foreign_key = &c.foreign_key;
        quote! {
            database
                .resolve_relation(&mut self.#ident, #field, #foreign_key, &parent, columns)
                .await?;
        }
    });
    let from_row = from_row(&item, &columns);
    let set_column = set_column(&columns);
    let lifecycle = if has_lifecycle(&item) {
        quote! {
            fn on_event(&self, event: ::grove::Event) {
                ::grove::Lifecycle::on_event(self, event)
            }
            fn on_select(event: ::grove::SelectEvent) {
                <Self as ::grove::Lifecycle>::on_select(event)
            }
        }
    } else {
        quote!()
    };
    quote! {
        impl ::grove::Entity for #name {
            fn descriptor() -> ::grove::Result<&'static ::grove::EntityDescriptor> {
                static DESCRIPTOR: ::std::sync::LazyLock<::grove::EntityDescriptor> =
                    ::std::sync::LazyLock::new(|| ::grove::EntityDescriptor {
                        entity: #entity_name,
                        table: #table,
                        columns: vec![#(#column_defs),*].into_boxed_slice(),
                    });
                ::std::sync::LazyLock::force(&DESCRIPTOR).checked()
            }

            fn row(&self) -> Vec<::grove::Value> {
                vec![#(::grove::AsValue::as_value(::std::clone::Clone::clone(&self.#scalars))),*]
            }

            fn primary_value(&self) -> ::grove::Value {
                #primary_value
            }

            #[allow(unused_variables)]
            fn set_column(&mut self, column: &str, value: ::grove::Value) -> ::grove::Result<()> {
                #set_column
            }

            fn from_row(
                row: &::grove::RowLabeled,
                columns: Option<&[&str]>,
            ) -> ::grove::Result<Self> {
                #from_row
            }

            #[allow(unused_variables)]
            fn encode_related(
                &self,
                parent: usize,
                out: &mut Vec<::grove::Record>,
            ) -> ::grove::Result<()> {
                #(#encode_related)*
                Ok(())
            }

            fn absorb<'r>(
                &mut self,
                records: &mut dyn Iterator<Item = &'r ::grove::Record>,
            ) -> ::grove::Result<()> {
                ::grove::absorb_record(self, records.next())?;
                #(#absorb_related)*
                Ok(())
            }

            #[allow(unused_variables)]
            fn resolve_related<'a, D: ::grove::Driver>(
                &'a mut self,
                database: &'a ::grove::Database<D>,
                columns: Option<&'a [&'a str]>,
            ) -> ::grove::future::BoxFuture<'a, ::grove::Result<()>> {
                Box::pin(async move {
                    let parent = ::grove::Entity::primary_value(self);
                    #(#resolve_related)*
                    ::grove::Result::<()>::Ok(())
                })
            }

            #lifecycle
        }
    }
    .into()
}

#[proc_macro_derive(ValueEnum)]
pub fn derive_value_enum(input: TokenStream) -> TokenStream {
    let item: ItemEnum = parse_macro_input!(input as ItemEnum);
    value_enum(&item).into()
}
