//! Operator registry.
//!
//! Operators are looked up by name (`$and`, `$equal`, ...) and stored as tagged
//! function values, so adding or overriding one is an insert into a map rather
//! than a change to the evaluator. A process-wide default registry backs
//! [`crate::matches`]; hosts that want isolation build their own [`Registry`]
//! and call [`Registry::matches`].

use bson::{Bson, Document as BsonDocument};
use parking_lot::RwLock;
use std::collections::HashMap;
use std::fmt;
use std::sync::{Arc, LazyLock};

use crate::errors::MatchError;

/// Recursion capability handed to combinators: `(operator, body, object)`.
pub type Evaluate<'a> = dyn Fn(&str, &Bson, &BsonDocument) -> Result<bool, MatchError> + 'a;

/// Leaf predicate: `(field, operand, object)`.
pub type PredicateFn =
    Arc<dyn Fn(&str, &Bson, &BsonDocument) -> Result<bool, MatchError> + Send + Sync>;

/// Combinator: `(key, value, object, evaluate)`.
pub type CombinatorFn = Arc<
    dyn Fn(&str, &Bson, &BsonDocument, &Evaluate<'_>) -> Result<bool, MatchError> + Send + Sync,
>;

/// How the per-clause results of a body are folded into one boolean.
///
/// Both folds yield `true` for an empty body.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Fold {
    All,
    Any,
}

impl Fold {
    /// Fold `outcomes`; an empty sequence is `true` under either rule.
    pub fn combine<I: IntoIterator<Item = bool>>(self, outcomes: I) -> bool {
        let mut seen = false;
        let mut all = true;
        let mut any = false;
        for o in outcomes {
            seen = true;
            all &= o;
            any |= o;
        }
        match self {
            Self::All => all,
            Self::Any => !seen || any,
        }
    }
}

#[derive(Clone)]
pub enum Operator {
    Predicate(PredicateFn),
    Combinator { fold: Fold, func: CombinatorFn },
}

impl Operator {
    pub fn predicate<F>(f: F) -> Self
    where
        F: Fn(&str, &Bson, &BsonDocument) -> Result<bool, MatchError> + Send + Sync + 'static,
    {
        Self::Predicate(Arc::new(f))
    }

    pub fn combinator<F>(fold: Fold, f: F) -> Self
    where
        F: Fn(&str, &Bson, &BsonDocument, &Evaluate<'_>) -> Result<bool, MatchError>
            + Send
            + Sync
            + 'static,
    {
        Self::Combinator { fold, func: Arc::new(f) }
    }

    /// Leaf predicates always AND their clauses together.
    #[must_use]
    pub const fn fold(&self) -> Fold {
        match self {
            Self::Predicate(_) => Fold::All,
            Self::Combinator { fold, .. } => *fold,
        }
    }

    #[must_use]
    pub const fn is_combinator(&self) -> bool {
        matches!(self, Self::Combinator { .. })
    }
}

impl fmt::Debug for Operator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Predicate(_) => f.write_str("Predicate(..)"),
            Self::Combinator { fold, .. } => write!(f, "Combinator({fold:?})"),
        }
    }
}

#[derive(Clone, Default)]
pub struct Registry {
    ops: HashMap<String, Operator>,
}

impl Registry {
    /// A registry with no operators at all.
    #[must_use]
    pub fn empty() -> Self {
        Self::default()
    }

    /// A registry holding the built-in combinators and leaf predicates.
    #[must_use]
    pub fn builtin() -> Self {
        let mut reg = Self::empty();
        for (name, op) in super::operators::builtin() {
            reg.register(name, op);
        }
        reg
    }

    /// Insert or override an operator. Returns the entry it replaced.
    pub fn register(&mut self, name: impl Into<String>, op: Operator) -> Option<Operator> {
        let name = name.into();
        if !name.starts_with('$') {
            log::warn!(target: "docmatch::eval", "operator {name} registered without a leading '$'");
        }
        log::debug!(target: "docmatch::eval", "register operator {name} as {op:?}");
        self.ops.insert(name, op)
    }

    /// Builder-style [`Registry::register`].
    #[must_use]
    pub fn with(mut self, name: impl Into<String>, op: Operator) -> Self {
        self.register(name, op);
        self
    }

    pub fn unregister(&mut self, name: &str) -> Option<Operator> {
        self.ops.remove(name)
    }

    #[must_use]
    pub fn get(&self, name: &str) -> Option<&Operator> {
        self.ops.get(name)
    }

    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.ops.contains_key(name)
    }

    /// Registered operator names, sorted.
    #[must_use]
    pub fn names(&self) -> Vec<String> {
        let mut out: Vec<String> = self.ops.keys().cloned().collect();
        out.sort();
        out
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.ops.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.ops.is_empty()
    }

    /// Evaluate `query` against `object` using this registry.
    ///
    /// # Errors
    /// See [`crate::matches`].
    pub fn matches(&self, query: &BsonDocument, object: &BsonDocument) -> Result<bool, MatchError> {
        super::eval::matches_with(self, query, object)
    }
}

impl fmt::Debug for Registry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Registry").field("operators", &self.names()).finish()
    }
}

static DEFAULT: LazyLock<RwLock<Arc<Registry>>> =
    LazyLock::new(|| RwLock::new(Arc::new(Registry::builtin())));

/// Snapshot of the process-wide registry. Later registrations do not affect it.
pub fn global() -> Arc<Registry> {
    Arc::clone(&DEFAULT.read())
}

/// Register an operator in the process-wide registry. Meant for a setup phase;
/// in-flight matches keep the snapshot they started with.
pub fn register(name: impl Into<String>, op: Operator) -> Option<Operator> {
    let mut g = DEFAULT.write();
    Arc::make_mut(&mut g).register(name, op)
}

/// Remove an operator from the process-wide registry.
pub fn unregister(name: &str) -> Option<Operator> {
    let mut g = DEFAULT.write();
    Arc::make_mut(&mut g).unregister(name)
}

/// Restore the process-wide registry to the built-in operators.
pub fn reset() {
    *DEFAULT.write() = Arc::new(Registry::builtin());
}

/// Names known to the process-wide registry, sorted.
pub fn list() -> Vec<String> {
    global().names()
}
