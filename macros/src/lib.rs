//! Derive macros for the seat map editor
//!
//! # Available Macros
//!
//! - `#[derive(Action)]` - Generates classification helpers for action enums
//!
//! # Example
//!
//! ```ignore
//! use seatmap_macros::Action;
//!
//! #[derive(Action, Clone, Debug)]
//! enum EditorAction {
//!     #[mutation]
//!     AddNextRow,
//!
//!     #[selection]
//!     SelectRow { row_id: RowId, multi_select: bool },
//! }
//!
//! // Generated methods:
//! assert!(EditorAction::AddNextRow.is_mutation());
//! assert_eq!(EditorAction::AddNextRow.name(), "AddNextRow");
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

use proc_macro::TokenStream;
use proc_macro2::TokenStream as TokenStream2;
use quote::quote;
use syn::{Attribute, Data, DeriveInput, Fields, Ident, parse_macro_input};

const CATEGORIES: [&str; 3] = ["mutation", "selection", "session"];

/// Derive macro for Action enums
///
/// Generates helper methods for action enums:
/// - `is_mutation()` - Returns true if this variant changes the map
/// - `is_selection()` - Returns true if this variant only changes the selection
/// - `is_session()` - Returns true if this variant only changes session state
///   (drag snapshots and the like)
/// - `name()` - Returns the variant name, for logs and metric labels
///
/// It also implements `seatmap_core::reducer::Action`, so generic runtimes
/// can label spans and metrics without knowing the concrete enum.
///
/// # Attributes
///
/// - `#[mutation]` - Mark a variant as a map mutation
/// - `#[selection]` - Mark a variant as a selection change
/// - `#[session]` - Mark a variant as a session-only change
///
/// # Panics
///
/// This macro will produce a compile error (not a runtime panic) if:
/// - Applied to a non-enum type
/// - A variant carries more than one category attribute
///
/// # Example
///
/// ```ignore
/// #[derive(Action, Clone, Debug)]
/// enum EditorAction {
///     #[mutation]
///     DeleteRow { row_id: RowId },
///
///     #[selection]
///     ClearSelection,
///
///     #[session]
///     BeginDrag,
/// }
///
/// let action = EditorAction::DeleteRow { row_id: "r1".into() };
/// assert!(action.is_mutation());
/// assert!(!action.is_selection());
/// ```
#[proc_macro_derive(Action, attributes(mutation, selection, session))]
pub fn derive_action(input: TokenStream) -> TokenStream {
    let input = parse_macro_input!(input as DeriveInput);
    let name = &input.ident;

    let Data::Enum(data_enum) = &input.data else {
        return syn::Error::new_spanned(input, "#[derive(Action)] can only be used on enums")
            .to_compile_error()
            .into();
    };

    let mut mutation_arms = Vec::new();
    let mut selection_arms = Vec::new();
    let mut session_arms = Vec::new();
    let mut name_arms = Vec::new();

    for variant in &data_enum.variants {
        let tags: Vec<&str> = CATEGORIES
            .into_iter()
            .filter(|category| has_attribute(&variant.attrs, category))
            .collect();

        if tags.len() > 1 {
            return syn::Error::new_spanned(
                variant,
                "Variant can carry only one of #[mutation], #[selection] or #[session]",
            )
            .to_compile_error()
            .into();
        }

        let pattern = variant_pattern(&variant.ident, &variant.fields);
        let variant_name = variant.ident.to_string();
        name_arms.push(quote! { #pattern => #variant_name, });

        match tags.first() {
            Some(&"mutation") => mutation_arms.push(quote! { #pattern => true, }),
            Some(&"selection") => selection_arms.push(quote! { #pattern => true, }),
            Some(&"session") => session_arms.push(quote! { #pattern => true, }),
            _ => {}
        }
    }

    let expanded = quote! {
        impl #name {
            /// Returns true if this action changes the map
            #[must_use]
            #[allow(unreachable_patterns)]
            pub const fn is_mutation(&self) -> bool {
                match self {
                    #(#mutation_arms)*
                    _ => false,
                }
            }

            /// Returns true if this action only changes the selection
            #[must_use]
            #[allow(unreachable_patterns)]
            pub const fn is_selection(&self) -> bool {
                match self {
                    #(#selection_arms)*
                    _ => false,
                }
            }

            /// Returns true if this action only changes session state
            #[must_use]
            #[allow(unreachable_patterns)]
            pub const fn is_session(&self) -> bool {
                match self {
                    #(#session_arms)*
                    _ => false,
                }
            }

            /// Returns the variant name
            #[must_use]
            pub const fn name(&self) -> &'static str {
                match self {
                    #(#name_arms)*
                }
            }
        }

        impl ::seatmap_core::reducer::Action for #name {
            fn name(&self) -> &'static str {
                Self::name(self)
            }

            fn kind(&self) -> &'static str {
                if Self::is_mutation(self) {
                    "mutation"
                } else if Self::is_selection(self) {
                    "selection"
                } else if Self::is_session(self) {
                    "session"
                } else {
                    "other"
                }
            }
        }
    };

    TokenStream::from(expanded)
}

/// Match pattern ignoring the variant's fields
fn variant_pattern(variant: &Ident, fields: &Fields) -> TokenStream2 {
    match fields {
        Fields::Named(_) => quote! { Self::#variant { .. } },
        Fields::Unnamed(_) => quote! { Self::#variant(..) },
        Fields::Unit => quote! { Self::#variant },
    }
}

/// Helper function to check if an attribute list contains a specific attribute
fn has_attribute(attrs: &[Attribute], name: &str) -> bool {
    attrs.iter().any(|attr| attr.path().is_ident(name))
}
