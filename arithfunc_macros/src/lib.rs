use proc_macro::TokenStream;
use quote::quote;
use syn::{parse_macro_input, FnArg, ItemFn, LitStr, Pat, PatType, ReturnType, Type};

fn is_f64(ty: &Type) -> bool {
    match ty {
        Type::Path(type_path) => type_path.qself.is_none() && type_path.path.is_ident("f64"),
        _ => false,
    }
}

/// Turns a plain numeric function into a constructor for a registrable `Function`.
///
/// ```ignore
/// #[arith_fn]
/// fn hypot(a: f64, b: f64) -> f64 {
///     a.hypot(b)
/// }
///
/// registry.insert(hypot())?;
/// ```
///
/// Every parameter must be an `f64` and the return type must be `f64`. The arity is taken
/// from the parameter list. The registered name defaults to the function name and can be
/// overridden with `#[arith_fn(name = "...")]`. The expansion refers to `Function`
/// unqualified, so it has to be in scope at the call site.
#[proc_macro_attribute]
pub fn arith_fn(attr: TokenStream, item: TokenStream) -> TokenStream {
    let mut name: Option<LitStr> = None;
    let name_parser = syn::meta::parser(|meta| {
        if meta.path.is_ident("name") {
            name = Some(meta.value()?.parse()?);
            Ok(())
        } else {
            Err(meta.error("unsupported arith_fn property"))
        }
    });
    parse_macro_input!(attr with name_parser);

    let input = parse_macro_input!(item as ItemFn);
    match expand(&input, name) {
        Ok(tokens) => tokens.into(),
        Err(err) => err.to_compile_error().into(),
    }
}

fn expand(input: &ItemFn, name: Option<LitStr>) -> syn::Result<proc_macro2::TokenStream> {
    let fn_name = &input.sig.ident;
    let fn_vis = &input.vis;
    let fn_attrs = &input.attrs;
    let fn_body = &input.block;

    match &input.sig.output {
        ReturnType::Type(_, ty) if is_f64(ty) => {}
        _ => {
            return Err(syn::Error::new_spanned(
                &input.sig,
                format!("{} must return f64", fn_name),
            ))
        }
    }

    let mut arg_extractions = Vec::new();
    for (i, arg) in input.sig.inputs.iter().enumerate() {
        let FnArg::Typed(PatType { pat, ty, .. }) = arg else {
            return Err(syn::Error::new_spanned(arg, "arith_fn cannot take self"));
        };
        if !matches!(**pat, Pat::Ident(_)) {
            return Err(syn::Error::new_spanned(pat, "unsupported argument pattern"));
        }
        if !is_f64(ty) {
            return Err(syn::Error::new_spanned(
                ty,
                format!("argument {} of {} must be f64", i, fn_name),
            ));
        }

        arg_extractions.push(quote! {
            let #pat: f64 = args[#i];
        });
    }

    let arity = arg_extractions.len();
    if arity == 0 {
        return Err(syn::Error::new_spanned(
            &input.sig,
            format!("{} must take at least one argument", fn_name),
        ));
    }

    let name = name.unwrap_or_else(|| LitStr::new(&fn_name.to_string(), fn_name.span()));

    Ok(quote! {
        #(#fn_attrs)*
        #fn_vis fn #fn_name() -> Function {
            Function::new(#name, #arity, |args: &[f64]| -> f64 {
                debug_assert_eq!(args.len(), #arity);
                #(#arg_extractions)*
                #fn_body
            })
        }
    })
}
