//! Read-only analyses over a [`crate::Tokens`] collection

mod arguments;
mod comments;

pub use arguments::{ArgumentInfo, ArgumentsAnalyzer};
pub use comments::{CommentType, CommentsAnalyzer};
