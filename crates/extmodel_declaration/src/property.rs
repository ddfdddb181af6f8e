//! Typed, kind-keyed model properties.
//!
//! Every property type declares a stable [`ModelProperty::KIND`] identifier.
//! A node stores at most one value per kind; adding a value of a kind that is
//! already present replaces it. Consumers can query by type with
//! [`ModelProperties::get`] or by identifier with
//! [`ModelProperties::contains_kind`].

use std::any::Any;
use std::collections::HashMap;
use std::fmt;

/// A typed fact attached to a declaration.
///
/// Two property types must not share a `KIND`: lookups by type would miss.
pub trait ModelProperty: Any + fmt::Debug + Send + Sync {
    /// Stable identifier of this property kind.
    const KIND: &'static str;
}

/// Object-safe view of a property.
trait StoredProperty: Any + fmt::Debug + Send + Sync {
    fn as_any(&self) -> &dyn Any;
    fn as_any_mut(&mut self) -> &mut dyn Any;
}

impl<P: ModelProperty> StoredProperty for P {
    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
}

/// Property registry of a single node.
#[derive(Default)]
pub struct ModelProperties {
    entries: HashMap<&'static str, Box<dyn StoredProperty>>,
}

impl ModelProperties {
    /// Creates an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Stores `property` under its kind.
    ///
    /// Returns true if a previous value of the same kind was replaced.
    pub fn add<P: ModelProperty>(&mut self, property: P) -> bool {
        self.entries.insert(P::KIND, Box::new(property)).is_some()
    }

    /// Returns the property of type `P`, if present.
    #[must_use]
    pub fn get<P: ModelProperty>(&self) -> Option<&P> {
        self.entries
            .get(P::KIND)
            .and_then(|p| p.as_any().downcast_ref::<P>())
    }

    /// Returns the property of type `P` mutably, if present.
    pub fn get_mut<P: ModelProperty>(&mut self) -> Option<&mut P> {
        self.entries
            .get_mut(P::KIND)
            .and_then(|p| p.as_any_mut().downcast_mut::<P>())
    }

    /// Returns true if a property of type `P` is present.
    #[must_use]
    pub fn contains<P: ModelProperty>(&self) -> bool {
        self.get::<P>().is_some()
    }

    /// Returns true if a property with the given kind identifier is present.
    #[must_use]
    pub fn contains_kind(&self, kind: &str) -> bool {
        self.entries.contains_key(kind)
    }

    /// Returns the kind identifiers present, sorted.
    #[must_use]
    pub fn kinds(&self) -> Vec<&'static str> {
        let mut kinds: Vec<_> = self.entries.keys().copied().collect();
        kinds.sort_unstable();
        kinds
    }

    /// Returns the number of properties.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns true if no property is present.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl fmt::Debug for ModelProperties {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut map = f.debug_map();
        for kind in self.kinds() {
            map.entry(&kind, &self.entries[kind]);
        }
        map.finish()
    }
}
