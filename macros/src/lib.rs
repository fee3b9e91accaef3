//! Derive macros for `ramwatch-core`.
//!
//! `#[derive(EpisodeState)]` implements `ramwatch_core::state::EpisodeState`
//! for a struct with named fields. Fields are written and read in
//! declaration order, which makes the declaration order the persisted
//! format: reordering fields is a format change.

use proc_macro::TokenStream;
use proc_macro2::TokenStream as TokenStream2;
use quote::{format_ident, quote};
use syn::{Data, DeriveInput, Fields, parse_macro_input};

#[proc_macro_derive(EpisodeState)]
pub fn derive_episode_state(input: TokenStream) -> TokenStream {
    let input = parse_macro_input!(input as DeriveInput);
    expand(&input)
        .unwrap_or_else(syn::Error::into_compile_error)
        .into()
}

fn expand(input: &DeriveInput) -> syn::Result<TokenStream2> {
    let fields = match &input.data {
        Data::Struct(data) => match &data.fields {
            Fields::Named(named) => &named.named,
            _ => {
                return Err(syn::Error::new_spanned(
                    &input.ident,
                    "EpisodeState requires a struct with named fields",
                ));
            }
        },
        _ => {
            return Err(syn::Error::new_spanned(
                &input.ident,
                "EpisodeState can only be derived for structs",
            ));
        }
    };

    let name = &input.ident;
    let (impl_generics, ty_generics, where_clause) = input.generics.split_for_impl();
    let idents: Vec<_> = fields.iter().filter_map(|f| f.ident.as_ref()).collect();

    let puts = idents.iter().map(|ident| {
        quote! {
            ::ramwatch_core::state::StateField::put(&self.#ident, writer);
        }
    });

    // Decode into locals first so a truncated stream leaves `self` untouched.
    // Locals are prefixed so a field named `reader` cannot shadow the argument.
    let locals: Vec<_> = idents.iter().map(|ident| format_ident!("__{}", ident)).collect();
    let gets = locals.iter().map(|local| {
        quote! {
            let #local = ::ramwatch_core::state::StateField::get(reader)?;
        }
    });
    let assigns = idents.iter().zip(&locals).map(|(ident, local)| {
        quote! {
            self.#ident = #local;
        }
    });

    Ok(quote! {
        impl #impl_generics ::ramwatch_core::state::EpisodeState for #name #ty_generics #where_clause {
            fn save(&self, writer: &mut ::ramwatch_core::state::StateWriter) {
                #(#puts)*
            }

            fn load(
                &mut self,
                reader: &mut ::ramwatch_core::state::StateReader<'_>,
            ) -> ::core::result::Result<(), ::ramwatch_core::state::StateError> {
                #(#gets)*
                #(#assigns)*
                ::core::result::Result::Ok(())
            }
        }
    })
}
