//! Core domain entities representing the business data model.
//!
//! # Entity Types
//!
//! - [`Link`] - A stored short link with its target(s) and attributes
//! - [`Target`] - Single destination or weighted rotation set
//! - [`RedirectKind`] - HTTP redirect flavour (301/302/307/308)
//!
//! # Design Pattern
//!
//! Write paths use separate structs:
//! - `LinkFields`, `LinkFieldsPatch` - Raw authoring input, not yet validated
//! - `NewLink`, `LinkPatch` - Validated input handed to repositories

pub mod link;

pub use link::{
    Link, LinkAttributes, LinkFields, LinkFieldsPatch, LinkPatch, NewLink, RedirectKind,
    RotationVariant, Target, VariantFields,
};
