//! ecsfix-core: lossless PHP token stream for ecsfix
//!
//! This crate owns everything fixers read and mutate:
//!
//! - A lossless lexer (`Tokens::from_code` reproduces the input byte for byte)
//! - Transformer passes assigning context-dependent kinds (return-by-reference
//!   `&`, attribute, array and destructuring brackets)
//! - The mutable [`Tokens`] collection with block matching, meaningful-token
//!   navigation and O(1) kind probes
//! - Analyzers for comments and argument lists
//! - Doc comment views: [`doc::DocBlock`] lines and Doctrine-style
//!   [`doc::AnnotationTokens`]
//!
//! # Example
//!
//! ```
//! use ecsfix_core::{BlockType, Tokens};
//!
//! let tokens = Tokens::from_code("<?php f($a, [1, 2]);").unwrap();
//! let open = tokens.iter().position(|t| t.equals("(")).unwrap();
//! let close = tokens.find_block_end(BlockType::Parenthesis, open).unwrap();
//! assert_eq!(tokens.next_meaningful_token(close).map(|i| tokens[i].content()), Some(";"));
//! assert_eq!(tokens.generate_code(), "<?php f($a, [1, 2]);");
//! ```

pub mod analyzer;
pub mod doc;
pub mod error;
pub mod lexer;
pub mod token;
pub mod tokens;
pub mod transformer;

pub use error::{LexError, TokensError};
pub use token::{Token, TokenKind};
pub use tokens::{BlockType, Tokens};
pub use transformer::{Transformer, Transformers};
