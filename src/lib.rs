//! # Retrolog
//!
//! A backward-chaining logic resolution engine in Rust.
//!
//! ## Features
//!
//! - First-order terms with unification and lazy, backtracking resolution
//! - Fair interleaving across disjunctive alternatives
//! - Pre-built axioms for Peano naturals and cons lists
//!
//! ## Example
//!
//! ```rust
//! use retrolog::{KnowledgeBase, Term};
//!
//! let kb = KnowledgeBase::new(vec![
//!     Term::fact("link", vec![Term::lit(0), Term::lit(1)]),
//!     Term::fact("link", vec![Term::lit(1), Term::lit(2)]),
//! ])
//! .unwrap();
//!
//! let query = Term::fact("link", vec![Term::var("x"), Term::var("y")]);
//! for answer in kb.ask(&query).unwrap() {
//!     println!("x = {}", answer.get("x").unwrap());
//! }
//! ```

/// Lazy answer sequences.
pub mod answer;
/// Substitution maps.
pub mod bindings;
/// Pre-built axiom libraries.
pub mod builtins;
/// Error types.
pub mod error;
/// The knowledge base.
pub mod knowledge;
/// Unification and the resolution engine.
pub mod solve;
/// The term model.
pub mod term;
/// Search observation hooks.
pub mod trace;

pub use answer::AnswerSet;
pub use bindings::Bindings;
pub use error::Error;
pub use knowledge::KnowledgeBase;
pub use solve::unify;
pub use term::{Term, Value};
pub use trace::Tracer;
