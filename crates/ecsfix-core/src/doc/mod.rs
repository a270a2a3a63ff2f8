//! Doc comment views: line-oriented docblocks and Doctrine-style
//! annotation tokens

mod annotation;
mod docblock;

pub use annotation::{AnnotationToken, AnnotationTokens, DocTokenKind};
pub use docblock::{Annotation, DocBlock, Line};
