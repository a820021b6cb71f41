use std::fmt;
use std::rc::Rc;

use log::trace;
use smallvec::SmallVec;

use crate::bindings::Bindings;
use crate::knowledge::KnowledgeBase;
use crate::term::{Term, UNIFY_FUNCTOR};
use crate::trace::Tracer;

/// An ordered goal sequence owned by a realizer.
pub(crate) type Goals = SmallVec<[Term; 4]>;

/// A tracer shared across a realizer tree.
pub(crate) type SharedTracer = Rc<dyn Tracer>;

/// Computes the most general substitution making `goal` and `fact`
/// syntactically equal under `bindings`, or `None` when they cannot unify.
///
/// Both sides are shallow-walked first. Equal terms unify unchanged; an
/// unbound variable on either side is bound to the other walked side; two
/// literals unify iff their payloads are equal; two compounds with equal
/// name and arity unify their arguments pairwise, left to right, threading
/// the substitution and failing on the first mismatch. Everything else
/// fails.
///
/// No occurs-check is performed: binding a variable to a term containing
/// itself is permitted and can make later dereferencing diverge.
#[must_use]
pub fn unify(goal: &Term, fact: &Term, bindings: &Bindings) -> Option<Bindings> {
    let lhs = bindings.shallow_walk(goal);
    let rhs = bindings.shallow_walk(fact);
    if lhs == rhs {
        return Some(bindings.clone());
    }
    match (lhs, rhs) {
        (Term::Variable(name), other) | (other, Term::Variable(name)) => {
            // Shallow-walking left only unbound variables exposed.
            Some(bindings.bound(name, other))
        }
        (
            Term::Compound {
                name: goal_name,
                args: goal_args,
            },
            Term::Compound {
                name: fact_name,
                args: fact_args,
            },
        ) if goal_name == fact_name && goal_args.len() == fact_args.len() => {
            let mut result = bindings.clone();
            for (goal_arg, fact_arg) in goal_args.iter().zip(&fact_args) {
                result = unify(goal_arg, fact_arg, &result)?;
            }
            Some(result)
        }
        _ => None,
    }
}

/// A search node: either a sequential realizer or an alternator fanning out
/// over disjunctive alternatives.
pub(crate) enum Search {
    Realizer(Box<Realizer>),
    Alternator(Alternator),
}

impl Search {
    /// Wraps a set of alternative realizers, avoiding the alternator when
    /// there is a single alternative.
    pub(crate) fn from_realizers(mut realizers: Vec<Realizer>) -> Search {
        if realizers.len() == 1 {
            if let Some(only) = realizers.pop() {
                return Search::Realizer(Box::new(only));
            }
        }
        Search::Alternator(Alternator::new(realizers))
    }

    pub(crate) fn poll(&mut self) -> Option<Bindings> {
        match self {
            Search::Realizer(realizer) => realizer.poll(),
            Search::Alternator(alternator) => alternator.poll(),
        }
    }
}

impl fmt::Debug for Search {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Search::Realizer(realizer) => realizer.fmt(f),
            Search::Alternator(alternator) => alternator.fmt(f),
        }
    }
}

/// The sequential realizer: proves an ordered goal list depth-first against
/// a knowledge base, producing one complete substitution per successful
/// proof.
///
/// Each `poll` resumes exactly where the previous one left off, via the
/// saved clause cursor and the optional child search. Dropping an exhausted
/// child is the backtracking step.
pub(crate) struct Realizer {
    /// The goals to realize, first goal driving the clause scan.
    goals: Goals,
    /// The knowledge base, shared with sibling realizers.
    knowledge: Rc<KnowledgeBase>,
    /// Bindings inherited from the enclosing proof; they win on merge.
    parent: Bindings,
    /// Candidate clauses for the first goal, in insertion order.
    clauses: Vec<Term>,
    /// Scan position; clauses before it are never revisited.
    cursor: usize,
    /// Active child search over the remainder of the sequence, if any.
    child: Option<Box<Search>>,
    /// Whether the direct-unification goal was already attempted.
    unify_tried: bool,
    tracer: Option<SharedTracer>,
}

impl Realizer {
    pub(crate) fn new(
        goals: Goals,
        knowledge: Rc<KnowledgeBase>,
        parent: Bindings,
        tracer: Option<SharedTracer>,
    ) -> Self {
        debug_assert!(!goals.is_empty());
        let clauses = match goals.first() {
            Some(Term::Compound { name, .. } | Term::Rule { name, .. }) => {
                knowledge.clauses_for(name).to_vec()
            }
            Some(Term::Literal(_)) => knowledge.literal_set().iter().cloned().collect(),
            _ => Vec::new(),
        };
        Self {
            goals,
            knowledge,
            parent,
            clauses,
            cursor: 0,
            child: None,
            unify_tried: false,
            tracer,
        }
    }

    /// Pulls the next complete substitution proving the goal sequence, or
    /// `None` when this level is exhausted for now.
    pub(crate) fn poll(&mut self) -> Option<Bindings> {
        // Exhaust the already-opened proof subtree before trying clauses.
        if let Some(child) = self.child.as_mut() {
            if let Some(result) = child.poll() {
                return Some(result.merged(&self.parent));
            }
            trace!("backtracking out of {}", self.goals[0]);
            if let Some(tracer) = &self.tracer {
                tracer.backtracked();
            }
            self.child = None;
        }

        let goal = self.goals[0].clone();
        trace!("realizing {goal}");
        if let Some(tracer) = &self.tracer {
            tracer.attempting_goal(&goal);
        }

        if let Some(result) = self.poll_direct_unification(&goal) {
            return Some(result);
        }

        // Scan the remaining candidate clauses in insertion order.
        while self.cursor < self.clauses.len() {
            let clause = self.clauses[self.cursor].clone();
            self.cursor += 1;
            trace!("trying {clause}");
            if let Some(tracer) = &self.tracer {
                tracer.trying_clause(&clause);
            }
            let polled = match (&goal, &clause) {
                (Term::Literal(goal_value), Term::Literal(clause_value)) => {
                    if goal_value == clause_value {
                        self.poll_literal_match()
                    } else {
                        None
                    }
                }
                (Term::Compound { .. }, Term::Compound { .. }) => {
                    unify(&goal, &clause, &Bindings::new())
                        .and_then(|result| self.poll_fact_match(result))
                }
                (Term::Compound { .. }, Term::Rule { name, args, body }) => {
                    let head = Term::Compound {
                        name: name.clone(),
                        args: args.clone(),
                    };
                    unify(&goal, &head, &Bindings::new())
                        .and_then(|result| self.poll_rule_match(&clause, body, result))
                }
                // Kind mismatch: skip this clause, keep scanning.
                _ => None,
            };
            if let Some(result) = polled {
                return Some(result);
            }
        }
        None
    }

    /// Resolves the built-in `rl.~=~` goal, which has exactly one candidate:
    /// the unification of its own two arguments.
    fn poll_direct_unification(&mut self, goal: &Term) -> Option<Bindings> {
        let args = match goal {
            Term::Compound { name, args } if name == UNIFY_FUNCTOR => args,
            _ => return None,
        };
        if self.unify_tried {
            return None;
        }
        self.unify_tried = true;
        debug_assert_eq!(args.len(), 2);
        let result = unify(&args[0], &args[1], &Bindings::new())?;
        if self.goals.len() > 1 {
            self.poll_fact_match(result)
        } else {
            Some(result.merged(&self.parent))
        }
    }

    /// A stored literal matched a literal goal: no bindings are produced,
    /// the remaining goals are proved as-is.
    fn poll_literal_match(&mut self) -> Option<Bindings> {
        if self.goals.len() == 1 {
            return Some(self.parent.clone());
        }
        let rest: Goals = self.goals[1..].iter().cloned().collect();
        let sub = Realizer::new(
            rest,
            Rc::clone(&self.knowledge),
            Bindings::new(),
            self.tracer.clone(),
        );
        self.open_child(Search::Realizer(Box::new(sub)))
    }

    /// A fact (or the direct-unification goal) produced `result`: substitute
    /// it into the remaining goals and prove them under it.
    fn poll_fact_match(&mut self, result: Bindings) -> Option<Bindings> {
        if self.goals.len() == 1 {
            return Some(result.merged(&self.parent));
        }
        let rest: Goals = self.goals[1..]
            .iter()
            .map(|g| result.deep_walk(g))
            .collect();
        let sub = Realizer::new(
            rest,
            Rc::clone(&self.knowledge),
            result,
            self.tracer.clone(),
        );
        self.open_child(Search::Realizer(Box::new(sub)))
    }

    /// A rule head matched the goal: recurse into the body's alternatives.
    fn poll_rule_match(&mut self, clause: &Term, body: &Term, result: Bindings) -> Option<Bindings> {
        let rest: Vec<Term> = self.goals[1..]
            .iter()
            .map(|g| result.deep_walk(g))
            .collect();
        // Rename every variable of the matched rule throughout the knowledge
        // base used for the recursive proof. Without this, a variable bound
        // at this depth would alias a same-named variable reintroduced when
        // the rule is matched again deeper in the proof.
        let sub_knowledge = Rc::new(self.knowledge.renaming(&clause.variables()));
        let realizers: Vec<Realizer> = body
            .goal_alternatives()
            .into_iter()
            .map(|alternative| {
                let goals: Goals = alternative
                    .iter()
                    .map(|g| result.deep_walk(g))
                    .chain(rest.iter().cloned())
                    .collect();
                Realizer::new(
                    goals,
                    Rc::clone(&sub_knowledge),
                    result.clone(),
                    self.tracer.clone(),
                )
            })
            .collect();
        self.open_child(Search::from_realizers(realizers))
    }

    /// Installs `search` as the active child and returns its first result,
    /// merged with the parent bindings. The child stays installed even when
    /// it yields nothing, mirroring the resume-from-child protocol.
    fn open_child(&mut self, mut search: Search) -> Option<Bindings> {
        let first = search.poll();
        self.child = Some(Box::new(search));
        first.map(|branch| branch.merged(&self.parent))
    }
}

impl fmt::Debug for Realizer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Realizer")
            .field("goals", &self.goals)
            .field("parent", &self.parent)
            .field("cursor", &self.cursor)
            .field("child", &self.child)
            .finish_non_exhaustive()
    }
}

/// Fairly interleaves several realizers representing disjunctive
/// alternatives, round-robin, rather than exhausting one before starting
/// the next.
pub(crate) struct Alternator {
    realizers: Vec<Realizer>,
    index: usize,
}

impl Alternator {
    pub(crate) fn new(realizers: Vec<Realizer>) -> Self {
        Self {
            realizers,
            index: 0,
        }
    }

    /// Asks the child at the rotation index for a result; a child that
    /// yields nothing is permanently dropped from rotation without
    /// double-advancing the index.
    pub(crate) fn poll(&mut self) -> Option<Bindings> {
        while !self.realizers.is_empty() {
            match self.realizers[self.index].poll() {
                Some(result) => {
                    self.index = (self.index + 1) % self.realizers.len();
                    return Some(result);
                }
                None => {
                    self.realizers.remove(self.index);
                    if !self.realizers.is_empty() {
                        self.index %= self.realizers.len();
                    }
                }
            }
        }
        None
    }
}

impl fmt::Debug for Alternator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Alternator")
            .field("alternatives", &self.realizers.len())
            .field("index", &self.index)
            .finish()
    }
}
