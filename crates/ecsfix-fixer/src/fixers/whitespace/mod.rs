//! Whitespace fixers
//!
//! These fixers handle trailing whitespace and the whitespace in front of
//! namespace declarations.

mod no_leading_namespace_whitespace;
mod no_trailing_whitespace;

pub use no_leading_namespace_whitespace::NoLeadingNamespaceWhitespaceFixer;
pub use no_trailing_whitespace::NoTrailingWhitespaceFixer;
