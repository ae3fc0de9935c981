//! Domain layer containing the dialog model and its rules.
//!
//! # Module Organization
//!
//! - `foundation` - Shared domain primitives (IDs, timestamps, errors)
//! - `dialog` - Questions, sentences, conversations and the recursion guard

pub mod dialog;
pub mod foundation;
