use proc_macro::TokenStream;
use quote::quote;
use syn::{parse_macro_input, Data, DeriveInput, Fields, Lit, LitStr, Meta};

/// Derive macro that lists the CSV columns of a record struct, in declaration order.
///
/// For each field, extracts:
/// - Column name (the `#[serde(rename = "...")]` value, falling back to the field name)
/// - Description (from doc comments)
///
/// Generates an implementation of `CsvColumns`, which must be in scope at the
/// derive site together with `Column`.
#[proc_macro_derive(CsvColumns, attributes(serde))]
pub fn derive_csv_columns(input: TokenStream) -> TokenStream {
    let input = parse_macro_input!(input as DeriveInput);
    match expand(&input) {
        Ok(tokens) => tokens.into(),
        Err(err) => err.to_compile_error().into(),
    }
}

fn expand(input: &DeriveInput) -> syn::Result<proc_macro2::TokenStream> {
    let name = &input.ident;

    let fields = match &input.data {
        Data::Struct(data) => match &data.fields {
            Fields::Named(fields) => &fields.named,
            _ => {
                return Err(syn::Error::new_spanned(
                    name,
                    "CsvColumns requires a struct with named fields",
                ))
            }
        },
        _ => return Err(syn::Error::new_spanned(name, "CsvColumns only supports structs")),
    };

    let mut columns = Vec::with_capacity(fields.len());
    for field in fields {
        let Some(ident) = field.ident.as_ref() else {
            continue;
        };
        let column = serde_rename(&field.attrs)?.unwrap_or_else(|| ident.to_string());
        let description = doc_comment(&field.attrs);
        columns.push(quote! {
            Column {
                name: #column,
                description: #description,
            }
        });
    }

    Ok(quote! {
        impl CsvColumns for #name {
            fn columns() -> &'static [Column] {
                static COLUMNS: &[Column] = &[
                    #(#columns),*
                ];
                COLUMNS
            }
        }
    })
}

/// Finds `rename = "..."` inside `#[serde(...)]`, ignoring any other serde options.
fn serde_rename(attrs: &[syn::Attribute]) -> syn::Result<Option<String>> {
    let mut rename = None;
    for attr in attrs.iter().filter(|a| a.path().is_ident("serde")) {
        attr.parse_nested_meta(|meta| {
            if meta.path.is_ident("rename") {
                let value: LitStr = meta.value()?.parse()?;
                rename = Some(value.value());
            } else if meta.input.peek(syn::Token![=]) {
                // skip the value of options we don't care about
                let _: syn::Expr = meta.value()?.parse()?;
            }
            Ok(())
        })?;
    }
    Ok(rename)
}

fn doc_comment(attrs: &[syn::Attribute]) -> String {
    attrs
        .iter()
        .filter(|attr| attr.path().is_ident("doc"))
        .filter_map(|attr| match &attr.meta {
            Meta::NameValue(meta) => match &meta.value {
                syn::Expr::Lit(syn::ExprLit {
                    lit: Lit::Str(doc), ..
                }) => Some(doc.value().trim().to_string()),
                _ => None,
            },
            _ => None,
        })
        .collect::<Vec<_>>()
        .join(" ")
}
