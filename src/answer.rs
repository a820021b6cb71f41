use std::fmt;

use indexmap::IndexSet;

use crate::bindings::Bindings;
use crate::solve::Search;

/// The lazy sequence of answers to a query: one substitution per proof,
/// pulled on demand.
///
/// Answers are forward-only and single-pass. Each pulled substitution is
/// fully dereferenced and restricted to the variables that appear in the
/// caller's query, hiding the internally renamed helper variables.
pub struct AnswerSet {
    search: Search,
    variables: IndexSet<String>,
    lookahead: Option<Bindings>,
}

impl AnswerSet {
    pub(crate) fn new(search: Search, variables: IndexSet<String>) -> Self {
        Self {
            search,
            variables,
            lookahead: None,
        }
    }

    fn pull(&mut self) -> Option<Bindings> {
        let raw = self.search.poll()?;
        let reified = raw.reified();
        Some(reified.retained(|name| self.variables.contains(name)))
    }

    /// Returns the next answer without consuming it.
    ///
    /// Peeking triggers at most one underlying search step; the result is
    /// buffered until actually consumed by `next`.
    pub fn peek(&mut self) -> Option<&Bindings> {
        if self.lookahead.is_none() {
            self.lookahead = self.pull();
        }
        self.lookahead.as_ref()
    }

    /// Returns whether at least one more answer exists.
    pub fn has_next(&mut self) -> bool {
        self.peek().is_some()
    }
}

impl Iterator for AnswerSet {
    type Item = Bindings;

    fn next(&mut self) -> Option<Bindings> {
        match self.lookahead.take() {
            Some(buffered) => Some(buffered),
            None => self.pull(),
        }
    }
}

impl fmt::Debug for AnswerSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AnswerSet")
            .field("variables", &self.variables)
            .field("lookahead", &self.lookahead)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use crate::knowledge::KnowledgeBase;
    use crate::term::Term;

    fn links() -> KnowledgeBase {
        KnowledgeBase::new(vec![
            Term::fact("<", vec![Term::lit(0), Term::lit(1)]),
            Term::fact("<", vec![Term::lit(1), Term::lit(2)]),
            Term::fact("<", vec![Term::lit(2), Term::lit(3)]),
        ])
        .unwrap()
    }

    #[test]
    fn test_peek_does_not_consume() {
        let kb = links();
        let query = Term::fact("<", vec![Term::lit(0), Term::var("x")]);
        let mut answers = kb.ask(&query).unwrap();
        let peeked = answers.peek().cloned();
        assert!(peeked.is_some());
        assert_eq!(answers.next(), peeked);
        assert!(!answers.has_next());
    }

    #[test]
    fn test_answers_hide_clause_variables() {
        let kb = KnowledgeBase::new(vec![
            Term::fact("play", vec![Term::atom("mia")]),
            Term::rule(
                "happy",
                vec![Term::var("p")],
                Term::fact("play", vec![Term::var("p")]),
            ),
        ])
        .unwrap();
        let query = Term::fact("happy", vec![Term::var("who")]);
        let answers: Vec<_> = kb.ask(&query).unwrap().collect();
        assert_eq!(answers.len(), 1);
        // Only the query's own variable is visible, fully dereferenced.
        assert_eq!(answers[0].len(), 1);
        assert_eq!(answers[0].get("who"), Some(&Term::atom("mia")));
    }

    #[test]
    fn test_exhausted_answer_set_stays_exhausted() {
        let kb = links();
        let query = Term::fact("<", vec![Term::lit(0), Term::lit(3)]);
        let mut answers = kb.ask(&query).unwrap();
        assert_eq!(answers.next(), None);
        assert_eq!(answers.next(), None);
        assert!(!answers.has_next());
    }
}
