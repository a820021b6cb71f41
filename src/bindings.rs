use std::fmt;

use indexmap::IndexMap;

use crate::term::Term;

/// A substitution: a mapping from variable names to terms, representing
/// partial progress toward a proof.
///
/// Bindings are extended immutably: [`Bindings::bound`] and
/// [`Bindings::merged`] return new maps and leave the receiver untouched,
/// which is what lets the realizer backtrack by simply dropping a child
/// search.
#[derive(Debug, Clone, Default, Eq, PartialEq)]
pub struct Bindings(IndexMap<String, Term>);

impl Bindings {
    /// Creates an empty substitution.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the term bound to `name`, if any.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&Term> {
        self.0.get(name)
    }

    /// Returns the number of bound variables.
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Returns whether no variable is bound.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Iterates over the `(name, term)` entries in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&String, &Term)> {
        self.0.iter()
    }

    /// Returns a copy of the substitution with `name` bound to `term`,
    /// overriding any previous binding for `name`.
    #[must_use]
    pub fn bound(&self, name: impl Into<String>, term: Term) -> Self {
        let mut result = self.0.clone();
        result.insert(name.into(), term);
        Self(result)
    }

    /// Returns a copy of the substitution extended with every entry of
    /// `other`. On conflicting names, `other`'s binding wins.
    #[must_use]
    pub fn merged(&self, other: &Bindings) -> Self {
        let mut result = self.0.clone();
        for (name, term) in &other.0 {
            result.insert(name.clone(), term.clone());
        }
        Self(result)
    }

    /// Follows one chain of variable-to-variable bindings until reaching a
    /// non-variable term or an unbound variable.
    #[must_use]
    pub fn shallow_walk(&self, term: &Term) -> Term {
        match term {
            Term::Variable(name) => match self.0.get(name) {
                Some(bound) => self.shallow_walk(bound),
                None => term.clone(),
            },
            _ => term.clone(),
        }
    }

    /// Fully dereferences a term, rewriting every variable it contains,
    /// including inside compounds and connectives.
    ///
    /// Deep-walking is idempotent. With a circular binding (no occurs-check
    /// is performed during unification) it does not terminate.
    #[must_use]
    pub fn deep_walk(&self, term: &Term) -> Term {
        match self.shallow_walk(term) {
            Term::Compound { name, args } => Term::Compound {
                name,
                args: args.iter().map(|arg| self.deep_walk(arg)).collect(),
            },
            Term::Conjunction(lhs, rhs) => self.deep_walk(&lhs).and(self.deep_walk(&rhs)),
            Term::Disjunction(lhs, rhs) => self.deep_walk(&lhs).or(self.deep_walk(&rhs)),
            walked => walked,
        }
    }

    /// Returns the substitution with every entry deep-walked.
    #[must_use]
    pub fn reified(&self) -> Self {
        Self(
            self.0
                .iter()
                .map(|(name, term)| (name.clone(), self.deep_walk(term)))
                .collect(),
        )
    }

    /// Returns a copy restricted to the variables for which `keep` holds.
    #[must_use]
    pub(crate) fn retained(&self, mut keep: impl FnMut(&str) -> bool) -> Self {
        Self(
            self.0
                .iter()
                .filter(|(name, _)| keep(name))
                .map(|(name, term)| (name.clone(), term.clone()))
                .collect(),
        )
    }
}

impl FromIterator<(String, Term)> for Bindings {
    fn from_iter<T: IntoIterator<Item = (String, Term)>>(iter: T) -> Self {
        Self(iter.into_iter().collect())
    }
}

impl<'a, const N: usize> From<[(&'a str, Term); N]> for Bindings {
    fn from(entries: [(&'a str, Term); N]) -> Self {
        entries
            .into_iter()
            .map(|(name, term)| (name.to_string(), term))
            .collect()
    }
}

impl IntoIterator for Bindings {
    type Item = (String, Term);
    type IntoIter = indexmap::map::IntoIter<String, Term>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}

impl fmt::Display for Bindings {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{{")?;
        for (i, (name, term)) in self.0.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "${name} = {term}")?;
        }
        write!(f, "}}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn chain() -> Bindings {
        Bindings::from([
            ("w", Term::atom("a")),
            ("x", Term::var("y")),
            ("y", Term::var("z")),
            ("z", Term::fact("t", vec![Term::var("w")])),
        ])
    }

    #[test]
    fn test_shallow_walk_chases_variable_chains() {
        let bindings = chain();
        assert_eq!(bindings.shallow_walk(&Term::atom("u")), Term::atom("u"));
        let expected = Term::fact("t", vec![Term::var("w")]);
        assert_eq!(bindings.shallow_walk(&Term::var("z")), expected);
        assert_eq!(bindings.shallow_walk(&Term::var("y")), expected);
        assert_eq!(bindings.shallow_walk(&Term::var("x")), expected);
    }

    #[test]
    fn test_shallow_walk_leaves_unbound_variables() {
        let bindings = chain();
        assert_eq!(bindings.shallow_walk(&Term::var("free")), Term::var("free"));
    }

    #[test]
    fn test_deep_walk_rewrites_subterms() {
        let bindings = chain();
        let expected = Term::fact("t", vec![Term::atom("a")]);
        assert_eq!(bindings.deep_walk(&Term::atom("u")), Term::atom("u"));
        assert_eq!(bindings.deep_walk(&Term::var("z")), expected);
        assert_eq!(bindings.deep_walk(&Term::var("y")), expected);
        assert_eq!(bindings.deep_walk(&Term::var("x")), expected);
    }

    #[test]
    fn test_deep_walk_is_idempotent() {
        let bindings = chain();
        let goal = Term::fact("f", vec![Term::var("x"), Term::var("free")])
            .and(Term::var("w").or(Term::lit(0)));
        let once = bindings.deep_walk(&goal);
        assert_eq!(bindings.deep_walk(&once), once);
    }

    #[test]
    fn test_reified_dereferences_every_entry() {
        let reified = chain().reified();
        let expected = Term::fact("t", vec![Term::atom("a")]);
        assert_eq!(reified.get("w"), Some(&Term::atom("a")));
        assert_eq!(reified.get("x"), Some(&expected));
        assert_eq!(reified.get("y"), Some(&expected));
        assert_eq!(reified.get("z"), Some(&expected));
    }

    #[test]
    fn test_bound_overrides_without_mutation() {
        let bindings = Bindings::from([("x", Term::var("y"))]);
        assert_eq!(
            bindings.bound("v", Term::atom("b")).get("v"),
            Some(&Term::atom("b"))
        );
        assert_eq!(
            bindings.bound("x", Term::atom("b")).get("x"),
            Some(&Term::atom("b"))
        );
        // The original map is unchanged.
        assert_eq!(bindings.get("x"), Some(&Term::var("y")));
    }

    #[test]
    fn test_merged_prefers_the_right_operand() {
        let bindings = Bindings::from([("x", Term::var("y"))]);
        let merged = bindings.merged(&Bindings::from([("x", Term::var("z"))]));
        assert_eq!(merged.get("x"), Some(&Term::var("z")));
        let extended = bindings.merged(&Bindings::from([("y", Term::var("z"))]));
        assert_eq!(extended.get("y"), Some(&Term::var("z")));
        assert_eq!(extended.get("x"), Some(&Term::var("y")));
    }

    #[test]
    fn test_display() {
        let bindings = Bindings::from([("x", Term::lit(1)), ("y", Term::atom("a"))]);
        assert_eq!(bindings.to_string(), "{$x = 1, $y = a}");
    }
}
