//! Procedural macros for sandbox tool definitions.
//!
//! `#[tool]` leaves the annotated function untouched and emits a sibling
//! module of the same name whose `host_function()` returns a
//! `sandbox_tools::HostFunction` describing it: parameter names and type
//! labels come from the Rust signature, the documentation from doc comments.
//!
//! ```ignore
//! /// Greet someone.
//! #[tool(defaults(name = "world"))]
//! fn greet(name: String) -> String {
//!     format!("Hello, {name}!")
//! }
//!
//! sandbox.register(greet::host_function())?;
//! ```

use proc_macro::TokenStream;
use proc_macro2::TokenStream as TokenStream2;
use quote::{format_ident, quote};
use syn::ext::IdentExt;
use syn::parse::{Parse, ParseStream};
use syn::punctuated::Punctuated;
use syn::{
    Expr, FnArg, GenericArgument, Ident, ItemFn, Lit, LitStr, Meta, Pat, PathArguments,
    ReturnType, Token, Type, parenthesized, parse_macro_input,
};

/// Declares a sandbox tool from a free function.
///
/// Accepted arguments, all optional:
///
/// - `name = "..."`: tool name, defaults to the function identifier.
/// - `returns = "..."`: return label, defaults to one derived from the Rust type.
/// - `defaults(param = expr, ...)`: default values, each `expr` is any
///   `serde_json::json!` input.
///
/// `Option<T>` parameters default to `None` when every later parameter also
/// has a default.
#[proc_macro_attribute]
pub fn tool(attr: TokenStream, item: TokenStream) -> TokenStream {
    let args = parse_macro_input!(attr as ToolArgs);
    let function = parse_macro_input!(item as ItemFn);

    match expand(&args, &function) {
        Ok(binding) => quote!(#function #binding).into(),
        Err(err) => {
            let err = err.to_compile_error();
            quote!(#function #err).into()
        }
    }
}

#[derive(Default)]
struct ToolArgs {
    name: Option<LitStr>,
    returns: Option<LitStr>,
    defaults: Vec<(Ident, Expr)>,
}

impl Parse for ToolArgs {
    fn parse(input: ParseStream) -> syn::Result<Self> {
        let mut args = ToolArgs::default();

        while !input.is_empty() {
            let key: Ident = input.parse()?;
            if key == "name" {
                input.parse::<Token![=]>()?;
                args.name = Some(input.parse()?);
            } else if key == "returns" {
                input.parse::<Token![=]>()?;
                args.returns = Some(input.parse()?);
            } else if key == "defaults" {
                let content;
                parenthesized!(content in input);
                let pairs = Punctuated::<DefaultPair, Token![,]>::parse_terminated(&content)?;
                args.defaults
                    .extend(pairs.into_iter().map(|pair| (pair.name, pair.value)));
            } else {
                return Err(syn::Error::new(
                    key.span(),
                    "expected `name`, `returns`, or `defaults(...)`",
                ));
            }

            if !input.is_empty() {
                input.parse::<Token![,]>()?;
            }
        }

        Ok(args)
    }
}

struct DefaultPair {
    name: Ident,
    value: Expr,
}

impl Parse for DefaultPair {
    fn parse(input: ParseStream) -> syn::Result<Self> {
        let name = input.call(Ident::parse_any)?;
        input.parse::<Token![=]>()?;
        let value = input.parse()?;
        Ok(Self { name, value })
    }
}

struct Param<'a> {
    ident: &'a Ident,
    name: String,
    ty: &'a Type,
}

fn expand(args: &ToolArgs, function: &ItemFn) -> syn::Result<TokenStream2> {
    let sig = &function.sig;
    if let Some(asyncness) = &sig.asyncness {
        return Err(syn::Error::new_spanned(asyncness, "sandbox tools must be synchronous"));
    }
    if !sig.generics.params.is_empty() {
        return Err(syn::Error::new_spanned(&sig.generics, "sandbox tools cannot be generic"));
    }

    let mut params = Vec::with_capacity(sig.inputs.len());
    for input in &sig.inputs {
        match input {
            FnArg::Receiver(receiver) => {
                return Err(syn::Error::new_spanned(
                    receiver,
                    "sandbox tools must be free functions",
                ));
            }
            FnArg::Typed(typed) => match typed.pat.as_ref() {
                Pat::Ident(pat) => params.push(Param {
                    ident: &pat.ident,
                    name: pat.ident.unraw().to_string(),
                    ty: &typed.ty,
                }),
                other => {
                    return Err(syn::Error::new_spanned(
                        other,
                        "tool parameters must be plain identifiers",
                    ));
                }
            },
        }
    }

    for (name, _) in &args.defaults {
        if !params.iter().any(|param| *name == param.name) {
            return Err(syn::Error::new_spanned(name, "no parameter with this name"));
        }
    }

    let defaults = resolve_defaults(args, &params);
    let specs = params.iter().zip(&defaults).map(|(param, default)| {
        let name = &param.name;
        let label = type_label(param.ty);
        let default = default.as_ref().map(|value| {
            quote!(.default(::sandbox_tools::macro_support::serde_json::json!(#value)))
        });
        quote! {
            .param(::sandbox_tools::ParamSpec::new(#name).type_label(#label) #default)
        }
    });

    let extracts = params.iter().map(|param| {
        let ident = param.ident;
        let name = &param.name;
        let owned = owned_type(param.ty);
        quote!(let #ident: #owned = __args.extract(#name)?;)
    });
    let call_args = params.iter().map(|param| {
        let ident = param.ident;
        if matches!(param.ty, Type::Reference(_)) {
            quote!(&#ident)
        } else {
            quote!(#ident)
        }
    });

    let (return_label, convert) = match &sig.output {
        ReturnType::Default => (None, quote!(::sandbox_tools::macro_support::into_value(__output))),
        ReturnType::Type(_, ty) => match result_ok_type(ty) {
            Some(ok) => (
                Some(type_label(ok)),
                quote!(::sandbox_tools::macro_support::from_result(__output)),
            ),
            None => (
                Some(type_label(ty)),
                quote!(::sandbox_tools::macro_support::into_value(__output)),
            ),
        },
    };
    let return_label = args.returns.as_ref().map(LitStr::value).or(return_label);
    let returns = return_label.map(|label| quote!(.returns(#label)));
    let doc = doc_text(function).map(|doc| quote!(.doc(#doc)));

    let ident = &sig.ident;
    let vis = &function.vis;
    let tool_name = args
        .name
        .as_ref()
        .map_or_else(|| ident.unraw().to_string(), LitStr::value);
    let module_doc = format!("Sandbox tool binding for [`{ident}`](fn@{ident}).");
    let unused = params.is_empty().then(|| quote!(let _ = __args;));
    let fn_ident = format_ident!("host_function");

    Ok(quote! {
        #[doc = #module_doc]
        #vis mod #ident {
            /// Host function declaration for registering with a sandbox.
            #[must_use]
            pub fn #fn_ident() -> ::sandbox_tools::HostFunction {
                ::sandbox_tools::HostFunction::builder(#tool_name)
                    #(#specs)*
                    #returns
                    #doc
                    .build(|__args: &::sandbox_tools::KeywordArgs| {
                        #unused
                        #(#extracts)*
                        let __output = super::#ident(#(#call_args),*);
                        #convert
                    })
            }
        }
    })
}

/// Explicit defaults win; trailing `Option<T>` parameters default to `None`.
fn resolve_defaults(args: &ToolArgs, params: &[Param<'_>]) -> Vec<Option<TokenStream2>> {
    let mut defaults: Vec<Option<TokenStream2>> = params
        .iter()
        .map(|param| {
            args.defaults
                .iter()
                .find(|(name, _)| *name == param.name)
                .map(|(_, value)| quote!(#value))
        })
        .collect();

    for index in (0..params.len()).rev() {
        if defaults[index].is_some() {
            continue;
        }
        if option_inner(params[index].ty).is_some() {
            defaults[index] = Some(quote!(null));
        } else {
            break;
        }
    }

    defaults
}

fn doc_text(function: &ItemFn) -> Option<String> {
    let lines: Vec<String> = function
        .attrs
        .iter()
        .filter(|attr| attr.path().is_ident("doc"))
        .filter_map(|attr| match &attr.meta {
            Meta::NameValue(meta) => match &meta.value {
                Expr::Lit(expr) => match &expr.lit {
                    Lit::Str(text) => Some(text.value().trim().to_owned()),
                    _ => None,
                },
                _ => None,
            },
            _ => None,
        })
        .filter(|line| !line.is_empty())
        .collect();

    (!lines.is_empty()).then(|| lines.join(" "))
}

fn last_segment(ty: &Type) -> Option<&syn::PathSegment> {
    match ty {
        Type::Path(path) if path.qself.is_none() => path.path.segments.last(),
        _ => None,
    }
}

fn generic_args(segment: &syn::PathSegment) -> Vec<&Type> {
    match &segment.arguments {
        PathArguments::AngleBracketed(args) => args
            .args
            .iter()
            .filter_map(|arg| match arg {
                GenericArgument::Type(ty) => Some(ty),
                _ => None,
            })
            .collect(),
        _ => Vec::new(),
    }
}

fn option_inner(ty: &Type) -> Option<&Type> {
    let segment = last_segment(ty)?;
    if segment.ident != "Option" {
        return None;
    }
    generic_args(segment).into_iter().next()
}

fn result_ok_type(ty: &Type) -> Option<&Type> {
    let segment = last_segment(ty)?;
    if segment.ident != "Result" {
        return None;
    }
    generic_args(segment).into_iter().next()
}

/// The owned type a borrowed parameter is deserialized into.
fn owned_type(ty: &Type) -> TokenStream2 {
    match ty {
        Type::Reference(reference) => match reference.elem.as_ref() {
            Type::Path(path) if path.path.is_ident("str") => quote!(::std::string::String),
            Type::Slice(slice) => {
                let elem = &slice.elem;
                quote!(::std::vec::Vec<#elem>)
            }
            elem => quote!(#elem),
        },
        other => quote!(#other),
    }
}

/// Python-flavoured label for a Rust type.
fn type_label(ty: &Type) -> String {
    match ty {
        Type::Reference(reference) => type_label(&reference.elem),
        Type::Slice(slice) => format!("list[{}]", type_label(&slice.elem)),
        Type::Array(array) => format!("list[{}]", type_label(&array.elem)),
        Type::Tuple(tuple) if tuple.elems.is_empty() => "None".to_owned(),
        Type::Tuple(tuple) => {
            let items: Vec<String> = tuple.elems.iter().map(type_label).collect();
            format!("tuple[{}]", items.join(", "))
        }
        Type::Path(_) => path_label(ty),
        _ => "any".to_owned(),
    }
}

fn path_label(ty: &Type) -> String {
    let Some(segment) = last_segment(ty) else {
        return "any".to_owned();
    };
    let args = generic_args(segment);
    let inner = |index: usize| args.get(index).map_or_else(|| "any".to_owned(), |ty| type_label(ty));

    match segment.ident.to_string().as_str() {
        "i8" | "i16" | "i32" | "i64" | "i128" | "isize" | "u8" | "u16" | "u32" | "u64"
        | "u128" | "usize" => "int".to_owned(),
        "f32" | "f64" => "float".to_owned(),
        "String" | "str" | "char" => "str".to_owned(),
        "bool" => "bool".to_owned(),
        "Value" => "any".to_owned(),
        "Option" => format!("{} | None", inner(0)),
        "Vec" | "VecDeque" => format!("list[{}]", inner(0)),
        "HashSet" | "BTreeSet" => format!("set[{}]", inner(0)),
        "HashMap" | "BTreeMap" | "IndexMap" => format!("dict[{}, {}]", inner(0), inner(1)),
        "Map" => "dict".to_owned(),
        other => other.to_owned(),
    }
}
