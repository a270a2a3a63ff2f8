//! Comment fixers

mod no_empty_comment;
mod single_line_comment_style;

pub use no_empty_comment::NoEmptyCommentFixer;
pub use single_line_comment_style::SingleLineCommentStyleFixer;
