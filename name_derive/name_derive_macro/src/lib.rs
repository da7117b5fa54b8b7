use proc_macro::TokenStream;
use quote::quote;
use syn::{parse_macro_input, Data, DeriveInput, Fields};

#[proc_macro_derive(ReflectName)]
pub fn derive_name(input: TokenStream) -> TokenStream {
    let input = parse_macro_input!(input as DeriveInput);
    let name = &input.ident;
    let name_str = name.to_string();
    let (impl_generics, type_generics, where_clause) = input.generics.split_for_impl();

    let expanded = quote! {
        impl #impl_generics ::name_derive::NameReflectable for #name #type_generics #where_clause {
            fn reflect_name() -> &'static str {
                #name_str
            }
        }
    };

    TokenStream::from(expanded)
}

#[proc_macro_derive(ReflectVariant)]
pub fn derive_variant(input: TokenStream) -> TokenStream {
    let input = parse_macro_input!(input as DeriveInput);
    let name = &input.ident;
    let (impl_generics, type_generics, where_clause) = input.generics.split_for_impl();

    let data = match &input.data {
        Data::Enum(data) => data,
        _ => {
            return syn::Error::new_spanned(name, "ReflectVariant can only be derived for enums")
                .to_compile_error()
                .into()
        }
    };

    let arms = data.variants.iter().map(|variant| {
        let variant_ident = &variant.ident;
        let variant_str = variant_ident.to_string();
        match &variant.fields {
            Fields::Unit => quote! { Self::#variant_ident => #variant_str },
            Fields::Unnamed(_) => quote! { Self::#variant_ident(..) => #variant_str },
            Fields::Named(_) => quote! { Self::#variant_ident { .. } => #variant_str },
        }
    });

    let expanded = quote! {
        impl #impl_generics ::name_derive::VariantReflectable for #name #type_generics #where_clause {
            fn variant_name(&self) -> &'static str {
                match self {
                    #(#arms,)*
                }
            }
        }
    };

    TokenStream::from(expanded)
}
