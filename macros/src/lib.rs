//! Proc macros for kindling: the `mother!` tree declaration macro.
//!
//! This crate is not meant to be used directly. Enable the `macros` feature on `kindling`.

use proc_macro::TokenStream;

mod mother_macro;

/// Declare a widget tree.
///
/// Expands to a `kindling::mother::Mother` built with the `Spec`, `Call`
/// and `Node` builders.
///
/// # Syntax
///
/// - `name: Ctor(args...)` declares a node; the parentheses may be omitted
/// - `name: stub` declares a node to be built later with `Fire::build_stub`
/// - `=> method(args...)` sets the layout directive
/// - `post [method(args...), ...]` adds post-construction calls
/// - `{ ... }` holds the children
///
/// Arguments are Rust expressions, positional or `key = expr`. Entries are
/// separated by `;` or `,`.
///
/// # Example
///
/// ```ignore
/// use kindling::prelude::*;
///
/// let mother = mother! {
///     panel: Frame(text = "Left") => pack(side = "left") {
///         choice: OptionMenu(varspec("opt"), "a", "b") => grid(row = 0, column = 0);
///         notes: Text("scrolly") => grid(row = 1, column = 0) post [insert("end", "hi")];
///         later: stub => grid(row = 2, column = 0);
///     }
/// };
/// ```
#[proc_macro]
pub fn mother(input: TokenStream) -> TokenStream {
    mother_macro::mother_impl(input.into())
        .unwrap_or_else(|err| err.to_compile_error())
        .into()
}
