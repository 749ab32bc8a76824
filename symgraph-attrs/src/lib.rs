mod error_kind;

use error_kind::ErrorKindTarget;
use proc_macro::TokenStream;
use quote::quote;
use syn::parse_macro_input;

/// Derives the `ErrorKind` trait for the given struct.
///
/// The information of the error can be customized using the `error` attribute by adding the
/// corresponding tags to it:
///
/// ```ignore
/// use symgraph_attrs::ErrorKind;
/// use symgraph_error::ErrorKind;
///
/// #[derive(Debug, ErrorKind)]
/// #[error(message = "unexpected end of expression", labels = ["expected more input here"])]
/// pub struct Foo;
/// ```
///
/// The following tags are available:
///
/// | Tag       | Description                                                                 |
/// | --------- | --------------------------------------------------------------------------- |
/// | `message` | The message displayed at the top of the error when it is displayed.         |
/// | `labels`  | An iterable of label texts, paired in order with the spans of the error.    |
/// | `help`    | Optional help text for the error, describing how the user can fix it.       |
///
/// Each tag accepts an expression evaluating to a [`String`] (or an iterable of them for
/// `labels`). For structs with named fields, the expression is evaluated with the members of the
/// struct in scope, so they can be used in the expression (tuple structs are not supported).
#[proc_macro_derive(ErrorKind, attributes(error))]
pub fn error_kind(item: TokenStream) -> TokenStream {
    let target = parse_macro_input!(item as ErrorKindTarget);
    let name = &target.name;
    quote! {
        impl ErrorKind for #name {
            fn as_any(&self) -> &dyn std::any::Any {
                self
            }
            #target
        }
    }.into()
}
