use proc_macro::{self, TokenStream};
use proc_macro2::Span;
use quote::quote;
use syn::{
    parse::Parser, parse_macro_input, parse_quote, punctuated::Punctuated, FnArg, Ident, ItemFn,
    LitStr, PatType, Token, Type,
};

/// Declare a structural operation shared by every record type.
///
/// The annotated function takes the receiving record as its first argument,
/// followed by one `&Value` per required argument. If the last argument is a
/// `&[Value]` slice the builtin is variadic and receives whatever arguments
/// remain. Every name listed in the attribute dispatches to the same function.
#[proc_macro_attribute]
pub fn builtin(names: TokenStream, item: TokenStream) -> TokenStream {
    let names = match Punctuated::<LitStr, Token![,]>::parse_terminated.parse(names) {
        Ok(names) => names.into_iter().collect::<Vec<_>>(),
        Err(err) => return err.to_compile_error().into(),
    };
    let builtin = parse_macro_input!(item as ItemFn);

    let impl_name = builtin.sig.ident.clone();
    let wrapper_name = Ident::new(&format!("{impl_name}_wrapper"), Span::call_site());
    let const_name = Ident::new(
        &format!("{}_BUILTIN", impl_name.to_string().to_uppercase()),
        Span::call_site(),
    );

    let is_variadic = builtin.sig.inputs.last().is_some_and(is_slice);

    // The receiver is not counted.
    let num_args = if is_variadic {
        builtin.sig.inputs.len().saturating_sub(2)
    } else {
        builtin.sig.inputs.len().saturating_sub(1)
    };
    let arg_indices: Vec<_> = (0..num_args).collect();

    let wrapper: ItemFn = if !is_variadic {
        parse_quote! {
            #[allow(unused_variables)]
            fn #wrapper_name(
                record: &mut crate::records::Record,
                args: &[crate::value::Value],
            ) -> Result<crate::value::Value, crate::exceptions::Condition> {
                #impl_name(
                    record,
                    #( &args[#arg_indices], )*
                )
            }
        }
    } else {
        parse_quote! {
            fn #wrapper_name(
                record: &mut crate::records::Record,
                args: &[crate::value::Value],
            ) -> Result<crate::value::Value, crate::exceptions::Condition> {
                #impl_name(
                    record,
                    #( &args[#arg_indices], )*
                    &args[#num_args..]
                )
            }
        }
    };

    quote! {
        #builtin

        #wrapper

        pub(crate) const #const_name: crate::builtins::Builtin = crate::builtins::Builtin::new(
            &[#( #names ),*],
            #num_args,
            #is_variadic,
            #wrapper_name,
        );
    }
    .into()
}

fn is_slice(arg: &FnArg) -> bool {
    if let FnArg::Typed(PatType { ty, .. }) = arg {
        if let Type::Reference(reference) = ty.as_ref() {
            return matches!(reference.elem.as_ref(), Type::Slice(_));
        }
    }
    false
}
