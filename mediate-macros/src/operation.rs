//! `#[derive(Operation)]` implementation.

use proc_macro::TokenStream;
use quote::quote;
use syn::{DeriveInput, LitStr, Type, parse_macro_input};

/// Arguments collected from `#[operation(...)]`.
#[derive(Default)]
struct OperationArgs {
    output: Option<Type>,
    name: Option<LitStr>,
}

impl OperationArgs {
    fn from_input(input: &DeriveInput) -> syn::Result<Self> {
        let mut args = OperationArgs::default();

        for attr in input.attrs.iter().filter(|a| a.path().is_ident("operation")) {
            attr.parse_nested_meta(|meta| {
                if meta.path.is_ident("output") {
                    args.output = Some(meta.value()?.parse()?);
                    Ok(())
                } else if meta.path.is_ident("name") {
                    args.name = Some(meta.value()?.parse()?);
                    Ok(())
                } else {
                    Err(meta.error("unknown operation attribute, expected `output` or `name`"))
                }
            })?;
        }

        Ok(args)
    }
}

pub fn derive_operation_impl(input: TokenStream) -> TokenStream {
    let input = parse_macro_input!(input as DeriveInput);
    expand(&input)
        .unwrap_or_else(syn::Error::into_compile_error)
        .into()
}

fn expand(input: &DeriveInput) -> syn::Result<proc_macro2::TokenStream> {
    let args = OperationArgs::from_input(input)?;
    let Some(output) = args.output else {
        return Err(syn::Error::new_spanned(
            &input.ident,
            "missing `#[operation(output = Type)]` attribute",
        ));
    };

    let ident = &input.ident;
    let name = args
        .name
        .unwrap_or_else(|| LitStr::new(&snake_case(&ident.to_string()), ident.span()));
    let (impl_generics, ty_generics, where_clause) = input.generics.split_for_impl();

    Ok(quote! {
        impl #impl_generics ::mediate::Operation for #ident #ty_generics #where_clause {
            const NAME: &'static str = #name;
            type Output = #output;
        }
    })
}

/// `FindUserById` -> `find_user_by_id`. Acronym runs stay together.
fn snake_case(ident: &str) -> String {
    let chars: Vec<char> = ident.chars().collect();
    let mut out = String::with_capacity(ident.len() + 4);

    for (i, &c) in chars.iter().enumerate() {
        if c.is_uppercase() {
            let prev = i.checked_sub(1).map(|p| chars[p]);
            let next = chars.get(i + 1);
            let boundary = match prev {
                None | Some('_') => false,
                Some(p) if p.is_lowercase() || p.is_ascii_digit() => true,
                Some(p) => p.is_uppercase() && next.is_some_and(|n| n.is_lowercase()),
            };
            if boundary {
                out.push('_');
            }
            out.extend(c.to_lowercase());
        } else {
            out.push(c);
        }
    }

    out
}
