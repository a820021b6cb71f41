//! Pre-built axiom libraries for Peano natural numbers and cons lists.
//!
//! These are ordinary knowledge-base content expressed through the core
//! term API, not engine internals. Every function returns freshly built
//! terms; there is no process-wide state.

/// Peano natural numbers: generators, relation and arithmetic predicates,
/// and the axioms making them provable.
pub mod nat {
    use crate::term::Term;

    /// The zero constant.
    #[must_use]
    pub fn zero() -> Term {
        Term::lit("nat::0")
    }

    /// The successor of `n`.
    #[must_use]
    pub fn succ(n: Term) -> Term {
        debug_assert!(is_nat(&n), "'{n}' is not a builtin natural number");
        Term::fact("nat::succ", vec![n])
    }

    fn relation(name: &str, lhs: Term, rhs: Term) -> Term {
        debug_assert!(is_nat(&lhs), "'{lhs}' is not a builtin natural number");
        debug_assert!(is_nat(&rhs), "'{rhs}' is not a builtin natural number");
        Term::fact(name, vec![lhs, rhs])
    }

    fn operation(name: &str, lhs: Term, rhs: Term, res: Term) -> Term {
        debug_assert!(is_nat(&lhs), "'{lhs}' is not a builtin natural number");
        debug_assert!(is_nat(&rhs), "'{rhs}' is not a builtin natural number");
        debug_assert!(is_nat(&res), "'{res}' is not a builtin natural number");
        Term::fact(name, vec![lhs, rhs, res])
    }

    /// The goal `lhs > rhs`.
    #[must_use]
    pub fn greater(lhs: Term, rhs: Term) -> Term {
        relation("nat::>", lhs, rhs)
    }

    /// The goal `lhs >= rhs`.
    #[must_use]
    pub fn greater_or_equal(lhs: Term, rhs: Term) -> Term {
        relation("nat::>=", lhs, rhs)
    }

    /// The goal `lhs < rhs`.
    #[must_use]
    pub fn smaller(lhs: Term, rhs: Term) -> Term {
        relation("nat::<", lhs, rhs)
    }

    /// The goal `lhs <= rhs`.
    #[must_use]
    pub fn smaller_or_equal(lhs: Term, rhs: Term) -> Term {
        relation("nat::<=", lhs, rhs)
    }

    /// The goal `lhs + rhs = res`.
    #[must_use]
    pub fn add(lhs: Term, rhs: Term, res: Term) -> Term {
        operation("nat::+", lhs, rhs, res)
    }

    /// The goal `lhs - rhs = res`.
    #[must_use]
    pub fn sub(lhs: Term, rhs: Term, res: Term) -> Term {
        operation("nat::-", lhs, rhs, res)
    }

    /// The goal `lhs * rhs = res`.
    #[must_use]
    pub fn mul(lhs: Term, rhs: Term, res: Term) -> Term {
        operation("nat::*", lhs, rhs, res)
    }

    /// The goal `lhs / rhs = res` (integer division).
    #[must_use]
    pub fn div(lhs: Term, rhs: Term, res: Term) -> Term {
        operation("nat::/", lhs, rhs, res)
    }

    /// The goal `lhs % rhs = res`.
    #[must_use]
    pub fn rem(lhs: Term, rhs: Term, res: Term) -> Term {
        operation("nat::%", lhs, rhs, res)
    }

    /// Axioms for the ordering relations `>`, `>=`, `<`, `<=`.
    #[must_use]
    pub fn relation_axioms() -> Vec<Term> {
        let x = Term::var("x");
        let y = Term::var("y");
        vec![
            Term::fact("nat::>", vec![succ(x.clone()), zero()]),
            Term::rule(
                "nat::>",
                vec![succ(x.clone()), succ(y.clone())],
                greater(x.clone(), y.clone()),
            ),
            Term::fact("nat::>=", vec![x.clone(), x.clone()]),
            Term::rule(
                "nat::>=",
                vec![x.clone(), y.clone()],
                greater(x.clone(), y.clone()),
            ),
            Term::fact("nat::<", vec![zero(), succ(x.clone())]),
            Term::rule(
                "nat::<",
                vec![succ(x.clone()), succ(y.clone())],
                smaller(x.clone(), y.clone()),
            ),
            Term::fact("nat::<=", vec![x.clone(), x.clone()]),
            Term::rule("nat::<=", vec![x.clone(), y.clone()], smaller(x, y)),
        ]
    }

    /// Axioms for `+`, `-`, `*`, `/` and `%`, including the ordering
    /// relations they build upon.
    #[must_use]
    pub fn arithmetic_axioms() -> Vec<Term> {
        let v = Term::var("v");
        let w = Term::var("w");
        let x = Term::var("x");
        let y = Term::var("y");
        let z = Term::var("z");
        let mut axioms = relation_axioms();
        axioms.extend(vec![
            Term::fact("nat::+", vec![zero(), y.clone(), y.clone()]),
            Term::rule(
                "nat::+",
                vec![succ(x.clone()), y.clone(), z.clone()],
                add(x.clone(), succ(y.clone()), z.clone()),
            ),
            Term::fact("nat::-", vec![x.clone(), zero(), x.clone()]),
            Term::rule(
                "nat::-",
                vec![succ(x.clone()), succ(y.clone()), z.clone()],
                sub(x.clone(), y.clone(), z.clone()),
            ),
            Term::fact("nat::*", vec![zero(), y.clone(), zero()]),
            Term::rule(
                "nat::*",
                vec![succ(x.clone()), y.clone(), z.clone()],
                mul(x.clone(), y.clone(), w.clone()).and(add(w.clone(), y.clone(), z.clone())),
            ),
            Term::rule(
                "nat::/",
                vec![x.clone(), y.clone(), zero()],
                smaller(x.clone(), y.clone()),
            ),
            Term::rule(
                "nat::/",
                vec![x.clone(), succ(y.clone()), succ(z.clone())],
                sub(x.clone(), succ(y.clone()), w.clone())
                    .and(div(w.clone(), succ(y.clone()), z.clone())),
            ),
            Term::rule(
                "nat::%",
                vec![x.clone(), succ(y.clone()), z.clone()],
                div(x.clone(), succ(y.clone()), w.clone())
                    .and(mul(succ(y), w, v.clone()))
                    .and(sub(x, v, z)),
            ),
        ]);
        axioms
    }

    /// All natural-number axioms.
    #[must_use]
    pub fn axioms() -> Vec<Term> {
        arithmetic_axioms()
    }

    /// The Peano representation of `n`.
    #[must_use]
    pub fn from_usize(n: usize) -> Term {
        let mut term = zero();
        for _ in 0..n {
            term = succ(term);
        }
        term
    }

    /// Converts a ground Peano term back to an integer, or `None` when the
    /// term is not a ground natural number.
    #[must_use]
    pub fn to_usize(term: &Term) -> Option<usize> {
        let mut current = term;
        let mut count = 0usize;
        loop {
            if *current == zero() {
                return Some(count);
            }
            match current {
                Term::Compound { name, args } if name == "nat::succ" && args.len() == 1 => {
                    count += 1;
                    current = &args[0];
                }
                _ => return None,
            }
        }
    }

    /// Returns whether `term` has the shape of a builtin natural number
    /// (variables are allowed as tails).
    #[must_use]
    pub fn is_nat(term: &Term) -> bool {
        match term {
            Term::Variable(_) => true,
            Term::Compound { name, args } if name == "nat::succ" => {
                args.len() == 1 && is_nat(&args[0])
            }
            _ => *term == zero(),
        }
    }
}

/// Cons lists: generators, predicates over membership, length and
/// concatenation, and the axioms making them provable.
pub mod list {
    use crate::term::Term;

    /// The empty list.
    #[must_use]
    pub fn empty() -> Term {
        Term::lit("list::empty")
    }

    /// The list with `head` prepended to `tail`.
    #[must_use]
    pub fn cons(head: Term, tail: Term) -> Term {
        debug_assert!(is_list(&tail), "'{tail}' is not a builtin list");
        Term::fact("list::cons", vec![head, tail])
    }

    /// The goal `count(list) = count`.
    #[must_use]
    pub fn count(list: Term, count: Term) -> Term {
        debug_assert!(is_list(&list), "'{list}' is not a builtin list");
        Term::fact("list::count", vec![list, count])
    }

    /// The goal `element ∈ list`.
    #[must_use]
    pub fn contains(list: Term, element: Term) -> Term {
        debug_assert!(is_list(&list), "'{list}' is not a builtin list");
        Term::fact("list::contains", vec![list, element])
    }

    /// The goal `lhs ++ rhs = res`.
    #[must_use]
    pub fn concat(lhs: Term, rhs: Term, res: Term) -> Term {
        debug_assert!(is_list(&lhs), "'{lhs}' is not a builtin list");
        debug_assert!(is_list(&rhs), "'{rhs}' is not a builtin list");
        debug_assert!(is_list(&res), "'{res}' is not a builtin list");
        Term::fact("list::concat", vec![lhs, rhs, res])
    }

    /// Axioms for `list::count`, counting in builtin naturals.
    #[must_use]
    pub fn count_axioms() -> Vec<Term> {
        let a = Term::var("a");
        let b = Term::var("b");
        let c = Term::var("c");
        vec![
            Term::fact("list::count", vec![empty(), super::nat::zero()]),
            Term::rule(
                "list::count",
                vec![cons(a, b.clone()), super::nat::succ(c.clone())],
                Term::fact("list::count", vec![b, c]),
            ),
        ]
    }

    /// Axioms for `list::contains`.
    #[must_use]
    pub fn contains_axioms() -> Vec<Term> {
        let a = Term::var("a");
        let b = Term::var("b");
        let c = Term::var("c");
        vec![
            Term::fact("list::contains", vec![cons(a.clone(), b.clone()), a.clone()]),
            Term::rule(
                "list::contains",
                vec![cons(a, b.clone()), c.clone()],
                Term::fact("list::contains", vec![b, c]),
            ),
        ]
    }

    /// Axioms for `list::concat`.
    #[must_use]
    pub fn concat_axioms() -> Vec<Term> {
        let a = Term::var("a");
        let b = Term::var("b");
        let c = Term::var("c");
        let d = Term::var("d");
        vec![
            Term::fact("list::concat", vec![empty(), a.clone(), a.clone()]),
            Term::fact("list::concat", vec![a.clone(), empty(), a.clone()]),
            Term::rule(
                "list::concat",
                vec![
                    cons(a.clone(), b.clone()),
                    c.clone(),
                    cons(a, d.clone()),
                ],
                Term::fact("list::concat", vec![b, c, d]),
            ),
        ]
    }

    /// All list axioms.
    #[must_use]
    pub fn axioms() -> Vec<Term> {
        let mut axioms = count_axioms();
        axioms.extend(contains_axioms());
        axioms.extend(concat_axioms());
        axioms
    }

    /// Builds a cons list from the given elements.
    #[must_use]
    pub fn from_terms(elements: Vec<Term>) -> Term {
        let mut list = empty();
        for element in elements.into_iter().rev() {
            list = cons(element, list);
        }
        list
    }

    /// Returns whether `term` has the shape of a builtin list (variables
    /// are allowed as tails).
    #[must_use]
    pub fn is_list(term: &Term) -> bool {
        match term {
            Term::Variable(_) => true,
            Term::Compound { name, args } if name == "list::cons" => {
                args.len() == 2 && is_list(&args[1])
            }
            _ => *term == empty(),
        }
    }
}
