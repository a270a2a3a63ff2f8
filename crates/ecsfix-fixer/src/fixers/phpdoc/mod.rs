//! PHPDoc fixers
//!
//! These fixers work on `/** ... */` doc comments through the line-oriented
//! [`ecsfix_core::doc::DocBlock`] view.

mod phpdoc_add_missing_param_annotation;
mod phpdoc_to_comment;

pub use phpdoc_add_missing_param_annotation::PhpdocAddMissingParamAnnotationFixer;
pub use phpdoc_to_comment::PhpdocToCommentFixer;
