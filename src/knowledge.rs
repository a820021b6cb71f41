use std::fmt;
use std::ops::Add;
use std::rc::Rc;

use indexmap::{IndexMap, IndexSet};
use log::debug;

use crate::answer::AnswerSet;
use crate::bindings::Bindings;
use crate::error::Error;
use crate::solve::{Realizer, Search, SharedTracer};
use crate::term::Term;
use crate::trace::Tracer;

/// An indexed store of facts, rules and bare literals, the material a query
/// is resolved against.
///
/// Facts and rules are grouped by functor name; within a group, insertion
/// order is preserved and is the order in which clauses are tried during
/// resolution. A knowledge base is immutable once built; [`Add`] produces
/// merged copies without touching the operands.
#[derive(Debug, Clone, Default)]
pub struct KnowledgeBase {
    /// Clause groups, keyed by functor name.
    predicates: IndexMap<String, Vec<Term>>,
    /// The isolated literals.
    literals: IndexSet<Term>,
}

impl KnowledgeBase {
    /// Builds a knowledge base from an ordered collection of terms.
    ///
    /// Compound facts and rules are grouped under their functor name,
    /// literals are collected into a set.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidKnowledge`] for any bare variable,
    /// conjunction or disjunction in `knowledge`.
    pub fn new(knowledge: Vec<Term>) -> Result<Self, Error> {
        let mut predicates: IndexMap<String, Vec<Term>> = IndexMap::new();
        let mut literals = IndexSet::new();
        for term in knowledge {
            match &term {
                Term::Compound { name, .. } | Term::Rule { name, .. } => {
                    predicates.entry(name.clone()).or_default().push(term);
                }
                Term::Literal(_) => {
                    literals.insert(term);
                }
                Term::Variable(_) | Term::Conjunction(..) | Term::Disjunction(..) => {
                    return Err(Error::InvalidKnowledge(term));
                }
            }
        }
        Ok(Self {
            predicates,
            literals,
        })
    }

    /// The number of clauses and literals in the knowledge base.
    #[must_use]
    pub fn len(&self) -> usize {
        self.predicates.values().map(Vec::len).sum::<usize>() + self.literals.len()
    }

    /// Returns whether the knowledge base holds no clause and no literal.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.predicates.is_empty() && self.literals.is_empty()
    }

    /// Iterates over every clause, predicate groups first (each in insertion
    /// order), then the literals.
    pub fn iter(&self) -> impl Iterator<Item = &Term> {
        self.predicates
            .values()
            .flatten()
            .chain(self.literals.iter())
    }

    /// The clause group stored under `name`, in resolution order.
    pub(crate) fn clauses_for(&self, name: &str) -> &[Term] {
        self.predicates
            .get(name)
            .map_or(&[] as &[Term], Vec::as_slice)
    }

    /// The set of bare literals.
    pub(crate) fn literal_set(&self) -> &IndexSet<Term> {
        &self.literals
    }

    /// Returns a copy of the knowledge base where every clause variable
    /// whose name is in `variables` carries one more freshness marker.
    ///
    /// Renaming is applied across every predicate group, not merely a
    /// matched clause: this is what keeps a variable bound at one recursion
    /// depth from aliasing a same-named variable reintroduced deeper in the
    /// proof.
    #[must_use]
    pub fn renaming(&self, variables: &IndexSet<String>) -> Self {
        let predicates = self
            .predicates
            .iter()
            .map(|(name, clauses)| {
                (
                    name.clone(),
                    clauses
                        .iter()
                        .map(|clause| clause.renamed(variables))
                        .collect(),
                )
            })
            .collect();
        Self {
            predicates,
            literals: self.literals.clone(),
        }
    }

    /// Lazily enumerates every substitution of the query's variables that
    /// makes `query` provable.
    ///
    /// The knowledge base is renamed against the query's own variables
    /// before any resolution starts, so the caller's variables can never be
    /// captured by clause variables.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidQuery`] when `query` is a bare variable or a
    /// bare rule.
    pub fn ask(&self, query: &Term) -> Result<AnswerSet, Error> {
        self.ask_with(query, None)
    }

    /// Same as [`KnowledgeBase::ask`], with a [`Tracer`] observing the
    /// search. The tracer never alters resolution results.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidQuery`] when `query` is a bare variable or a
    /// bare rule.
    pub fn ask_traced(&self, query: &Term, tracer: Rc<dyn Tracer>) -> Result<AnswerSet, Error> {
        self.ask_with(query, Some(tracer))
    }

    fn ask_with(&self, query: &Term, tracer: Option<SharedTracer>) -> Result<AnswerSet, Error> {
        if matches!(query, Term::Variable(_) | Term::Rule { .. }) {
            return Err(Error::InvalidQuery(query.clone()));
        }
        debug!("asking {query}");
        let variables = query.variables();
        let knowledge = Rc::new(self.renaming(&variables));
        let realizers: Vec<Realizer> = query
            .goal_alternatives()
            .into_iter()
            .map(|alternative| {
                Realizer::new(
                    alternative.into_iter().collect(),
                    Rc::clone(&knowledge),
                    Bindings::new(),
                    tracer.clone(),
                )
            })
            .collect();
        Ok(AnswerSet::new(
            Search::from_realizers(realizers),
            variables,
        ))
    }
}

impl Add for &KnowledgeBase {
    type Output = KnowledgeBase;

    /// Unions two knowledge bases: the left operand's clauses first, then
    /// any right-operand clause not already structurally present; literal
    /// sets are unioned. Neither operand is mutated.
    fn add(self, rhs: &KnowledgeBase) -> KnowledgeBase {
        let mut predicates: IndexMap<String, Vec<Term>> = IndexMap::new();
        for (name, clauses) in &self.predicates {
            predicates.insert(name.clone(), clauses.clone());
        }
        for (name, clauses) in &rhs.predicates {
            let group = predicates.entry(name.clone()).or_default();
            for clause in clauses {
                if !group.contains(clause) {
                    group.push(clause.clone());
                }
            }
        }
        let literals = self
            .literals
            .iter()
            .chain(rhs.literals.iter())
            .cloned()
            .collect();
        KnowledgeBase {
            predicates,
            literals,
        }
    }
}

impl Add for KnowledgeBase {
    type Output = KnowledgeBase;

    fn add(self, rhs: KnowledgeBase) -> KnowledgeBase {
        &self + &rhs
    }
}

impl fmt::Display for KnowledgeBase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[")?;
        for (i, term) in self.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{term}")?;
        }
        write!(f, "]")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fact_rule_kb(var: &str, extra_literal: i64) -> KnowledgeBase {
        KnowledgeBase::new(vec![
            Term::fact("foo", vec![Term::atom("bar")]),
            Term::rule(
                "foo",
                vec![Term::var(var)],
                Term::fact("foo", vec![Term::var(var)]),
            ),
            Term::lit(12),
            Term::lit(extra_literal),
        ])
        .unwrap()
    }

    #[test]
    fn test_construction_classifies_terms() {
        let kb = fact_rule_kb("x", 13);
        assert_eq!(kb.len(), 4);
        assert_eq!(kb.clauses_for("foo").len(), 2);
        assert_eq!(kb.literal_set().len(), 2);
    }

    #[test]
    fn test_construction_rejects_bare_variables() {
        let err = KnowledgeBase::new(vec![Term::var("x")]).unwrap_err();
        assert_eq!(err, Error::InvalidKnowledge(Term::var("x")));
    }

    #[test]
    fn test_construction_rejects_connectives() {
        let conjunction = Term::atom("a").and(Term::atom("b"));
        assert!(matches!(
            KnowledgeBase::new(vec![Term::atom("ok"), conjunction]),
            Err(Error::InvalidKnowledge(_))
        ));
        let disjunction = Term::atom("a").or(Term::atom("b"));
        assert!(matches!(
            KnowledgeBase::new(vec![disjunction]),
            Err(Error::InvalidKnowledge(_))
        ));
    }

    #[test]
    fn test_construction_accepts_facts_rules_and_literals() {
        assert!(KnowledgeBase::new(vec![
            Term::fact("f", vec![Term::var("x")]),
            Term::rule("g", vec![Term::var("x")], Term::fact("f", vec![Term::var("x")])),
            Term::lit("atom"),
        ])
        .is_ok());
    }

    #[test]
    fn test_union_deduplicates_and_keeps_left_order() {
        let merged = &fact_rule_kb("x", 13) + &fact_rule_kb("y", 14);
        let clauses: Vec<&Term> = merged.iter().collect();
        assert!(clauses.contains(&&Term::fact("foo", vec![Term::atom("bar")])));
        assert!(clauses.contains(&&Term::rule(
            "foo",
            vec![Term::var("x")],
            Term::fact("foo", vec![Term::var("x")]),
        )));
        assert!(clauses.contains(&&Term::rule(
            "foo",
            vec![Term::var("y")],
            Term::fact("foo", vec![Term::var("y")]),
        )));
        assert!(clauses.contains(&&Term::lit(12)));
        assert!(clauses.contains(&&Term::lit(13)));
        assert!(clauses.contains(&&Term::lit(14)));
        // Shared clauses and literals appear exactly once.
        let shared_fact = Term::fact("foo", vec![Term::atom("bar")]);
        assert_eq!(clauses.iter().filter(|t| ***t == shared_fact).count(), 1);
        assert_eq!(clauses.iter().filter(|t| ***t == Term::lit(12)).count(), 1);
    }

    #[test]
    fn test_union_is_commutative_on_content() {
        let kb1 = fact_rule_kb("x", 13);
        let kb2 = fact_rule_kb("y", 14);
        let left: std::collections::HashSet<Term> = (&kb1 + &kb2).iter().cloned().collect();
        let right: std::collections::HashSet<Term> = (&kb2 + &kb1).iter().cloned().collect();
        assert_eq!(left, right);
    }

    #[test]
    fn test_union_is_idempotent() {
        let kb = KnowledgeBase::new(vec![
            Term::fact("foo", vec![Term::atom("bar")]),
            Term::fact("foo", vec![Term::atom("baz")]),
            Term::lit(12),
        ])
        .unwrap();
        let doubled = &kb + &kb;
        assert_eq!(doubled.len(), kb.len());
        let query = Term::fact("foo", vec![Term::var("z")]);
        let answers: Vec<Bindings> = doubled.ask(&query).unwrap().collect();
        let baseline: Vec<Bindings> = kb.ask(&query).unwrap().collect();
        assert_eq!(answers, baseline);
    }

    #[test]
    fn test_union_does_not_mutate_operands() {
        let kb1 = fact_rule_kb("x", 13);
        let kb2 = fact_rule_kb("y", 14);
        let before = (kb1.len(), kb2.len());
        let _ = &kb1 + &kb2;
        assert_eq!((kb1.len(), kb2.len()), before);
    }

    #[test]
    fn test_renaming_rewrites_every_group() {
        let kb = fact_rule_kb("x", 13);
        let vars: IndexSet<String> = ["x".to_string()].into_iter().collect();
        let renamed = kb.renaming(&vars);
        assert!(renamed.clauses_for("foo").contains(&Term::rule(
            "foo",
            vec![Term::var("x'")],
            Term::fact("foo", vec![Term::var("x'")]),
        )));
        // Literals carry no variables and are shared as-is.
        assert_eq!(renamed.literal_set(), kb.literal_set());
    }

    #[test]
    fn test_ask_rejects_bare_variables_and_rules() {
        let kb = fact_rule_kb("x", 13);
        assert_eq!(
            kb.ask(&Term::var("x")).unwrap_err(),
            Error::InvalidQuery(Term::var("x"))
        );
        let rule = Term::rule("r", vec![], Term::atom("b"));
        assert_eq!(kb.ask(&rule).unwrap_err(), Error::InvalidQuery(rule));
    }

    #[test]
    fn test_display_lists_clauses_then_literals() {
        let kb = KnowledgeBase::new(vec![
            Term::fact("f", vec![Term::lit(1)]),
            Term::lit(2),
        ])
        .unwrap();
        assert_eq!(kb.to_string(), "[f[1], 2]");
    }
}
