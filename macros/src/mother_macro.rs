//! `mother!` macro: parse a declarative tree and generate kindling builder code.

use proc_macro2::TokenStream;
use quote::quote;
use syn::parse::{Parse, ParseStream};
use syn::punctuated::Punctuated;
use syn::{braced, bracketed, parenthesized, Expr, Ident, LitStr, Result, Token};

// ---------------------------------------------------------------------------
// AST types
// ---------------------------------------------------------------------------

/// One argument inside parentheses: `expr` or `key = expr`.
pub(crate) enum Argument {
    Positional(Expr),
    Keyword(Ident, Expr),
}

impl std::fmt::Debug for Argument {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Argument::Positional(expr) => {
                f.debug_tuple("Positional").field(&quote!(#expr).to_string()).finish()
            }
            Argument::Keyword(key, expr) => f
                .debug_tuple("Keyword")
                .field(&key.to_string())
                .field(&quote!(#expr).to_string())
                .finish(),
        }
    }
}

/// `method(args...)`: a constructor, a layout directive or a post step.
#[derive(Debug)]
pub(crate) struct Invocation {
    pub name: Ident,
    pub args: Vec<Argument>,
}

/// `name: Ctor(args) => layout(args) post [step(args), ...] { children }`.
#[derive(Debug)]
pub(crate) struct Entry {
    pub name: Ident,
    /// `None` for `stub`.
    pub kind: Option<Invocation>,
    pub layout: Option<Invocation>,
    pub post: Vec<Invocation>,
    pub children: Vec<Entry>,
}

/// The whole macro input.
#[derive(Debug)]
pub(crate) struct MotherInput {
    pub entries: Vec<Entry>,
}

// ---------------------------------------------------------------------------
// Parsing
// ---------------------------------------------------------------------------

impl Parse for MotherInput {
    fn parse(input: ParseStream) -> Result<Self> {
        Ok(MotherInput {
            entries: parse_entries(input)?,
        })
    }
}

/// Entries separated by `;` or `,`, trailing separator allowed.
fn parse_entries(input: ParseStream) -> Result<Vec<Entry>> {
    let mut entries = Vec::new();
    while !input.is_empty() {
        entries.push(input.parse()?);
        if input.peek(Token![;]) {
            input.parse::<Token![;]>()?;
        } else if input.peek(Token![,]) {
            input.parse::<Token![,]>()?;
        } else if !input.is_empty() {
            // A braced child block ends an entry on its own.
            if entries.last().is_some_and(|e: &Entry| e.children.is_empty()) {
                return Err(input.error("expected `;` or `,` between entries"));
            }
        }
    }
    Ok(entries)
}

impl Parse for Entry {
    fn parse(input: ParseStream) -> Result<Self> {
        let name: Ident = input.parse()?;
        input.parse::<Token![:]>()?;

        let kind = if peek_word(input, "stub") && !input.peek2(syn::token::Paren) {
            input.parse::<Ident>()?;
            None
        } else {
            Some(parse_invocation(input, true)?)
        };

        let layout = if input.peek(Token![=>]) {
            input.parse::<Token![=>]>()?;
            Some(parse_invocation(input, false)?)
        } else {
            None
        };

        let mut post = Vec::new();
        if peek_word(input, "post") {
            input.parse::<Ident>()?;
            let content;
            bracketed!(content in input);
            let steps: Punctuated<Invocation, Token![,]> =
                content.parse_terminated(parse_step, Token![,])?;
            post.extend(steps);
        }

        let children = if input.peek(syn::token::Brace) {
            let content;
            braced!(content in input);
            parse_entries(&content)?
        } else {
            Vec::new()
        };

        Ok(Entry {
            name,
            kind,
            layout,
            post,
            children,
        })
    }
}

fn peek_word(input: ParseStream, word: &str) -> bool {
    input.fork().parse::<Ident>().is_ok_and(|ident| ident == word)
}

fn parse_step(input: ParseStream) -> Result<Invocation> {
    parse_invocation(input, false)
}

/// `name(args...)`. For constructors the parentheses may be omitted.
fn parse_invocation(input: ParseStream, parens_optional: bool) -> Result<Invocation> {
    let name: Ident = input.parse()?;
    if parens_optional && !input.peek(syn::token::Paren) {
        return Ok(Invocation {
            name,
            args: Vec::new(),
        });
    }
    let content;
    parenthesized!(content in input);
    let args: Punctuated<Argument, Token![,]> = content.parse_terminated(Argument::parse, Token![,])?;
    Ok(Invocation {
        name,
        args: args.into_iter().collect(),
    })
}

impl Parse for Argument {
    fn parse(input: ParseStream) -> Result<Self> {
        if input.peek(Ident) && input.peek2(Token![=]) && !input.peek2(Token![==]) {
            let key: Ident = input.parse()?;
            input.parse::<Token![=]>()?;
            let value: Expr = input.parse()?;
            return Ok(Argument::Keyword(key, value));
        }
        Ok(Argument::Positional(input.parse()?))
    }
}

// ---------------------------------------------------------------------------
// Code generation
// ---------------------------------------------------------------------------

fn generate_arguments(args: &[Argument]) -> Vec<TokenStream> {
    args.iter()
        .map(|arg| match arg {
            Argument::Positional(expr) => quote! { .arg(#expr) },
            Argument::Keyword(key, expr) => {
                let key = LitStr::new(&key.to_string(), key.span());
                quote! { .kwarg(#key, #expr) }
            }
        })
        .collect()
}

fn generate_call(call: &Invocation) -> TokenStream {
    let method = LitStr::new(&call.name.to_string(), call.name.span());
    let args = generate_arguments(&call.args);
    quote! { ::kindling::mother::Call::new(#method) #(#args)* }
}

fn generate_entry(entry: &Entry) -> TokenStream {
    let spec = match &entry.kind {
        Some(kind) => {
            let ctor = LitStr::new(&kind.name.to_string(), kind.name.span());
            let args = generate_arguments(&kind.args);
            quote! { ::kindling::mother::Spec::new(#ctor) #(#args)* }
        }
        None => quote! { ::kindling::mother::Spec::stub() },
    };

    let mut calls = Vec::new();
    if let Some(layout) = &entry.layout {
        let layout = generate_call(layout);
        calls.push(quote! { .layout(#layout) });
    }
    for step in &entry.post {
        let step = generate_call(step);
        calls.push(quote! { .post(#step) });
    }
    for child in &entry.children {
        let name = LitStr::new(&child.name.to_string(), child.name.span());
        let node = generate_entry(child);
        calls.push(quote! { .child(#name, #node) });
    }

    quote! {
        ::kindling::mother::Node::new(#spec) #(#calls)*
    }
}

/// Entry point: generate a `Mother` expression.
pub(crate) fn mother_impl(input: TokenStream) -> Result<TokenStream> {
    let parsed: MotherInput = syn::parse2(input)?;

    let inserts: Vec<TokenStream> = parsed
        .entries
        .iter()
        .map(|entry| {
            let name = entry.name.to_string();
            let node = generate_entry(entry);
            quote! {
                __mother.insert(::std::string::String::from(#name), #node);
            }
        })
        .collect();

    Ok(quote! {
        {
            let mut __mother = ::kindling::mother::Mother::new();
            #(#inserts)*
            __mother
        }
    })
}

// ===========================================================================
// Tests
// ===========================================================================
