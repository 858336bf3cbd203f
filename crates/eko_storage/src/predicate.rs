//! Declarative entity filters over component types and property values.

use std::collections::BTreeMap;
use std::sync::Arc;

use eko_foundation::Value;

/// A conjunction of component clauses.
///
/// Each clause names a component type and the property values it must hold.
/// A clause with no properties only requires the component to be present.
///
/// ```
/// use eko_storage::Predicate;
///
/// let full_cups = Predicate::new()
///     .has("container")
///     .with("liquid", "name", "wine");
/// assert_eq!(full_cups.len(), 2);
/// ```
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Predicate {
    clauses: BTreeMap<Arc<str>, BTreeMap<Arc<str>, Value>>,
}

impl Predicate {
    /// Creates a predicate every entity satisfies.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Requires a component of `ty` to be present.
    #[must_use]
    pub fn has(mut self, ty: impl Into<Arc<str>>) -> Self {
        self.clauses.entry(ty.into()).or_default();
        self
    }

    /// Requires component `ty` to hold `value` under `key`.
    #[must_use]
    pub fn with(
        mut self,
        ty: impl Into<Arc<str>>,
        key: impl Into<Arc<str>>,
        value: impl Into<Value>,
    ) -> Self {
        self.clauses
            .entry(ty.into())
            .or_default()
            .insert(key.into(), value.into());
        self
    }

    /// Iterates clauses in type order.
    pub fn clauses(&self) -> impl Iterator<Item = (&str, &BTreeMap<Arc<str>, Value>)> + '_ {
        self.clauses.iter().map(|(ty, props)| (ty.as_ref(), props))
    }

    /// Number of component clauses.
    #[must_use]
    pub fn len(&self) -> usize {
        self.clauses.len()
    }

    /// True if the predicate has no clauses.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.clauses.is_empty()
    }
}

impl<T, K, V, P> FromIterator<(T, P)> for Predicate
where
    T: Into<Arc<str>>,
    K: Into<Arc<str>>,
    V: Into<Value>,
    P: IntoIterator<Item = (K, V)>,
{
    fn from_iter<I: IntoIterator<Item = (T, P)>>(iter: I) -> Self {
        let mut predicate = Self::new();
        for (ty, props) in iter {
            let ty = ty.into();
            predicate = predicate.has(ty.clone());
            for (key, value) in props {
                predicate = predicate.with(ty.clone(), key, value);
            }
        }
        predicate
    }
}
