use proc_macro::TokenStream;
use quote::quote;
use syn::{Data, DeriveInput, Fields, Ident, parse_macro_input, spanned::Spanned};

/// Derive `System` for a struct that embeds a `Members` value.
///
/// The field is the one marked `#[members]`, or the field literally named `members` when no
/// field is marked.
pub fn derive_system(input: TokenStream) -> TokenStream {
    let ast = parse_macro_input!(input as DeriveInput);
    let name = &ast.ident;
    let (impl_generics, type_generics, where_clause) = ast.generics.split_for_impl();

    let field = match members_field(&ast) {
        Ok(field) => field,
        Err(error) => return error.to_compile_error().into(),
    };

    TokenStream::from(quote! {
        impl #impl_generics ::ember_engine::ecs::System for #name #type_generics #where_clause {
            #[inline]
            fn members(&self) -> &::ember_engine::ecs::system::Members {
                &self.#field
            }

            #[inline]
            fn members_mut(&mut self) -> &mut ::ember_engine::ecs::system::Members {
                &mut self.#field
            }
        }
    })
}

/// Locate the field holding the system's members.
fn members_field(ast: &DeriveInput) -> syn::Result<Ident> {
    let Data::Struct(data) = &ast.data else {
        return Err(syn::Error::new(
            ast.span(),
            "System can only be derived for structs",
        ));
    };
    let Fields::Named(fields) = &data.fields else {
        return Err(syn::Error::new(
            data.fields.span(),
            "System requires a struct with named fields",
        ));
    };

    let marked = fields
        .named
        .iter()
        .find(|field| field.attrs.iter().any(|attr| attr.path().is_ident("members")));
    let by_name = fields
        .named
        .iter()
        .find(|field| field.ident.as_ref().is_some_and(|ident| ident == "members"));

    marked
        .or(by_name)
        .and_then(|field| field.ident.clone())
        .ok_or_else(|| {
            syn::Error::new(
                ast.ident.span(),
                "System requires a field marked #[members] (or named `members`)",
            )
        })
}
