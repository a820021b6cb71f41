use std::fmt;

use indexmap::IndexSet;

/// Functor name reserved for the built-in direct-unification goal, see
/// [`Term::unified_with`].
pub(crate) const UNIFY_FUNCTOR: &str = "rl.~=~";

/// Marker appended to a variable name when it is renamed for hygiene.
///
/// Renaming appends one marker per recursion level, so a user variable whose
/// name already ends in `'` can in principle collide with a renamed one after
/// enough levels. This is a known caveat of the freshness scheme.
pub(crate) const FRESH_MARKER: char = '\'';

/// The payload of a [`Term::Literal`], compared by value equality.
#[derive(Debug, Clone, Eq, PartialEq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Value {
    /// A signed integer constant.
    Int(i64),
    /// A string constant.
    Str(String),
    /// A boolean constant.
    Bool(bool),
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Int(i) => write!(f, "{i}"),
            Value::Str(s) => write!(f, "{s}"),
            Value::Bool(b) => write!(f, "{b}"),
        }
    }
}

impl From<i64> for Value {
    fn from(value: i64) -> Self {
        Value::Int(value)
    }
}

impl From<&str> for Value {
    fn from(value: &str) -> Self {
        Value::Str(value.to_string())
    }
}

impl From<String> for Value {
    fn from(value: String) -> Self {
        Value::Str(value)
    }
}

impl From<bool> for Value {
    fn from(value: bool) -> Self {
        Value::Bool(value)
    }
}

/// A first-order term: the single algebraic value from which queries, facts,
/// rules and whole knowledge bases are built.
///
/// Equality and hashing are deep and structural, which makes terms usable as
/// set members and lets merged knowledge bases deduplicate clauses.
#[derive(Debug, Clone, Eq, PartialEq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Term {
    /// A logic variable, identified purely by name. Scoping is managed by
    /// renaming, never by reference identity.
    Variable(String),
    /// An opaque constant, compared by value equality.
    Literal(Value),
    /// A functor application (fact pattern). Zero arguments makes an atom.
    Compound {
        /// The functor name (e.g. `"link"`).
        name: String,
        /// The ordered arguments.
        args: Vec<Term>,
    },
    /// A clause whose head is `name` applied to `args`, provable by proving
    /// `body`.
    Rule {
        /// The head functor name.
        name: String,
        /// The ordered head arguments.
        args: Vec<Term>,
        /// The body goal.
        body: Box<Term>,
    },
    /// Both operands must be provable.
    Conjunction(Box<Term>, Box<Term>),
    /// Either operand must be provable.
    Disjunction(Box<Term>, Box<Term>),
}

impl Term {
    /// Creates a variable term.
    pub fn var(name: impl Into<String>) -> Term {
        Term::Variable(name.into())
    }

    /// Creates a literal term from any payload convertible to [`Value`].
    pub fn lit(value: impl Into<Value>) -> Term {
        Term::Literal(value.into())
    }

    /// Creates an atom, i.e. a compound term with no arguments.
    pub fn atom(name: impl Into<String>) -> Term {
        Term::Compound {
            name: name.into(),
            args: Vec::new(),
        }
    }

    /// Creates a compound term (fact pattern).
    pub fn fact(name: impl Into<String>, args: Vec<Term>) -> Term {
        Term::Compound {
            name: name.into(),
            args,
        }
    }

    /// Creates a rule whose head is `name` applied to `args`.
    pub fn rule(name: impl Into<String>, args: Vec<Term>, body: Term) -> Term {
        Term::Rule {
            name: name.into(),
            args,
            body: Box::new(body),
        }
    }

    /// Conjunction of `self` and `rhs`.
    #[must_use]
    pub fn and(self, rhs: Term) -> Term {
        Term::Conjunction(Box::new(self), Box::new(rhs))
    }

    /// Disjunction of `self` and `rhs`.
    #[must_use]
    pub fn or(self, rhs: Term) -> Term {
        Term::Disjunction(Box::new(self), Box::new(rhs))
    }

    /// A goal that succeeds when `self` unifies with `rhs`.
    ///
    /// This builds the internal two-argument direct-unification goal, which
    /// the realizer resolves without consulting the knowledge base.
    #[must_use]
    pub fn unified_with(self, rhs: Term) -> Term {
        Term::fact(UNIFY_FUNCTOR, vec![self, rhs])
    }

    /// Returns the literal payload if this term is a [`Term::Literal`].
    #[must_use]
    pub fn extract_value(&self) -> Option<&Value> {
        match self {
            Term::Literal(value) => Some(value),
            _ => None,
        }
    }

    /// Rewrites the term into disjunctive normal form, distributing
    /// conjunction over disjunction until no conjunction has a disjunction
    /// as either operand.
    #[must_use]
    pub fn dnf(&self) -> Term {
        match self {
            Term::Conjunction(lhs, rhs) => match (lhs.dnf(), rhs.dnf()) {
                (a, Term::Disjunction(b, c)) => a.clone().and(*b).dnf().or(a.and(*c).dnf()),
                (Term::Disjunction(a, b), c) => {
                    (*a).and(c.clone()).dnf().or((*b).and(c).dnf())
                }
                (a, b) => a.and(b),
            },
            Term::Disjunction(lhs, rhs) => lhs.dnf().or(rhs.dnf()),
            _ => self.clone(),
        }
    }

    /// Decomposes the term into its proof alternatives: one ordered goal
    /// sequence per top-level DNF disjunct.
    ///
    /// A term that is neither conjunction nor disjunction yields a single
    /// alternative holding a single goal.
    #[must_use]
    pub fn goal_alternatives(&self) -> Vec<Vec<Term>> {
        match self.dnf() {
            Term::Conjunction(lhs, rhs) => {
                // After DNF rewriting neither operand contains a disjunction,
                // so each side contributes exactly one sequence.
                let mut sequence = lhs.goal_alternatives().swap_remove(0);
                sequence.extend(rhs.goal_alternatives().swap_remove(0));
                vec![sequence]
            }
            Term::Disjunction(lhs, rhs) => {
                let mut alternatives = lhs.goal_alternatives();
                alternatives.extend(rhs.goal_alternatives());
                alternatives
            }
            other => vec![vec![other]],
        }
    }

    /// Collects the names of all variables occurring in the term, in first
    /// occurrence order.
    #[must_use]
    pub fn variables(&self) -> IndexSet<String> {
        let mut names = IndexSet::new();
        self.collect_variables(&mut names);
        names
    }

    fn collect_variables(&self, names: &mut IndexSet<String>) {
        match self {
            Term::Variable(name) => {
                names.insert(name.clone());
            }
            Term::Literal(_) => {}
            Term::Compound { args, .. } => {
                for arg in args {
                    arg.collect_variables(names);
                }
            }
            Term::Rule { args, body, .. } => {
                for arg in args {
                    arg.collect_variables(names);
                }
                body.collect_variables(names);
            }
            Term::Conjunction(lhs, rhs) | Term::Disjunction(lhs, rhs) => {
                lhs.collect_variables(names);
                rhs.collect_variables(names);
            }
        }
    }

    /// Returns a copy of the term where every variable whose name is in
    /// `variables` carries one more freshness marker.
    #[must_use]
    pub fn renamed(&self, variables: &IndexSet<String>) -> Term {
        match self {
            Term::Variable(name) if variables.contains(name) => {
                let mut fresh = name.clone();
                fresh.push(FRESH_MARKER);
                Term::Variable(fresh)
            }
            Term::Variable(_) | Term::Literal(_) => self.clone(),
            Term::Compound { name, args } => Term::Compound {
                name: name.clone(),
                args: args.iter().map(|arg| arg.renamed(variables)).collect(),
            },
            Term::Rule { name, args, body } => Term::Rule {
                name: name.clone(),
                args: args.iter().map(|arg| arg.renamed(variables)).collect(),
                body: Box::new(body.renamed(variables)),
            },
            Term::Conjunction(lhs, rhs) => {
                lhs.renamed(variables).and(rhs.renamed(variables))
            }
            Term::Disjunction(lhs, rhs) => lhs.renamed(variables).or(rhs.renamed(variables)),
        }
    }
}

fn fmt_application(f: &mut fmt::Formatter<'_>, name: &str, args: &[Term]) -> fmt::Result {
    if args.is_empty() {
        return write!(f, "{name}");
    }
    write!(f, "{name}[")?;
    for (i, arg) in args.iter().enumerate() {
        if i > 0 {
            write!(f, ", ")?;
        }
        write!(f, "{arg}")?;
    }
    write!(f, "]")
}

impl fmt::Display for Term {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Term::Variable(name) => write!(f, "${name}"),
            Term::Literal(value) => write!(f, "{value}"),
            Term::Compound { name, args } => fmt_application(f, name, args),
            Term::Rule { name, args, body } => {
                write!(f, "(")?;
                fmt_application(f, name, args)?;
                write!(f, " ⊢ {body})")
            }
            Term::Conjunction(lhs, rhs) => write!(f, "({lhs} ∧ {rhs})"),
            Term::Disjunction(lhs, rhs) => write!(f, "({lhs} ∨ {rhs})"),
        }
    }
}
