use proc_macro::TokenStream;
use quote::quote;
use syn::{DeriveInput, parse_macro_input};

pub fn derive_component(input: TokenStream) -> TokenStream {
    // Parse the input tokens into a syntax tree
    let ast = parse_macro_input!(input as DeriveInput);

    // Get the type name we are annotating, along with any generics it carries.
    let name = &ast.ident;
    let (impl_generics, type_generics, where_clause) = ast.generics.split_for_impl();

    // Use ::ember_engine::ecs::Component which works both inside and outside the crate.
    // Inside the crate, this works because of `extern crate self as ember_engine;` in lib.rs
    // Outside the crate, this naturally resolves to the ember_engine dependency.
    TokenStream::from(quote! {
        impl #impl_generics ::ember_engine::ecs::Component for #name #type_generics #where_clause {
        }
    })
}
