use proc_macro2::TokenStream;
use quote::quote;
use syn::{Fields, ItemEnum};

/// Maps a fieldless enum to its discriminant, stored as a small integer.
pub(crate) fn value_enum(item: &ItemEnum) -> TokenStream {
    let name = &item.ident;
    let variants = item.variants.iter().map(|v| {
        if !matches!(v.fields, Fields::Unit) {
            panic!(
                "ValueEnum can only be derived on enums without fields, `{}::{}` has some",
                name, v.ident
            );
        }
        let variant = &v.ident;
        quote! {
            if discriminant == #name::#variant as i16 {
                return Ok(#name::#variant);
            }
        }
    });
    quote! {
        impl ::grove::AsValue for #name {
            fn as_empty_value() -> ::grove::Value {
                ::grove::Value::Int16(None)
            }
            fn as_value(self) -> ::grove::Value {
                ::grove::Value::Int16(Some(self as i16))
            }
            fn try_from_value(value: ::grove::Value) -> ::grove::Result<Self> {
                let discriminant = <i16 as ::grove::AsValue>::try_from_value(value.clone())?;
                #(#variants)*
                Err(::grove::ConversionError::new(&value, ::std::any::type_name::<Self>()).into())
            }
        }
    }
}
