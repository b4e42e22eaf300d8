use crate::component::{expand_component, register_component_alias};
use proc_macro::TokenStream;
use quote::quote;
use syn::{parse_macro_input, DeriveInput, Error, Item};

mod attributes;
mod component;

#[proc_macro_derive(
    Component,
    attributes(configuration, component_scan, bean, named, inject)
)]
pub fn generate_component(input: TokenStream) -> TokenStream {
    let input = parse_macro_input!(input as DeriveInput);
    expand_component(&input)
        .unwrap_or_else(Error::into_compile_error)
        .into()
}

#[proc_macro_attribute]
pub fn component_alias(args: TokenStream, input: TokenStream) -> TokenStream {
    if !args.is_empty() {
        return Error::new(
            proc_macro2::Span::call_site(),
            "component_alias does not accept arguments!",
        )
        .into_compile_error()
        .into();
    }

    let item = parse_macro_input!(input as Item);
    let registration = register_component_alias(&item).unwrap_or_else(Error::into_compile_error);

    (quote! {
        #item
        #registration
    })
    .into()
}
