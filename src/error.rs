use thiserror::Error;

use crate::term::Term;

/// Errors surfaced by knowledge-base construction and queries.
///
/// Unification failure and clause exhaustion are not errors: they are
/// ordinary control flow, reported as an empty or ended
/// [`AnswerSet`](crate::AnswerSet).
#[derive(Debug, Clone, Eq, PartialEq, Error)]
pub enum Error {
    /// The term cannot be stored in a knowledge base: only compound facts,
    /// rules and literals classify as knowledge.
    #[error("cannot use '{0}' as knowledge")]
    InvalidKnowledge(Term),
    /// The term cannot be asked as a query: a bare variable or a bare rule
    /// has no answer-set semantics.
    #[error("cannot use '{0}' as a query")]
    InvalidQuery(Term),
}
