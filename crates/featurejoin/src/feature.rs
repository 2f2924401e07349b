use std::fmt;

use ahash::AHashMap;
use geo::{Coord, Geometry};

use crate::value::PropertyValue;

/// Stable identity assigned to a `Feature` when it enters a collection.
///
/// Two entries with the same id are the same feature, regardless of whether
/// their geometry or properties happen to compare equal.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct FeatureId(pub u32);

impl fmt::Display for FeatureId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "FeatureId({})", self.0)
    }
}

/// Insertion-ordered map from field name to value.
#[derive(Clone, Debug, Default)]
pub struct Properties {
    keys: Vec<String>,
    values: Vec<PropertyValue>,
    index: AHashMap<String, usize>, // key -> position in `keys`/`values`
}

impl Properties {
    pub fn new() -> Self { Self::default() }

    #[inline] pub fn len(&self) -> usize { self.keys.len() }

    #[inline] pub fn is_empty(&self) -> bool { self.keys.is_empty() }

    #[inline] pub fn contains_key(&self, key: &str) -> bool { self.index.contains_key(key) }

    #[inline]
    pub fn get(&self, key: &str) -> Option<&PropertyValue> {
        self.index.get(key).map(|&i| &self.values[i])
    }

    #[inline]
    pub fn get_mut(&mut self, key: &str) -> Option<&mut PropertyValue> {
        self.index.get(key).map(|&i| &mut self.values[i])
    }

    /// Insert or overwrite `key`.  An existing key keeps its original position.
    /// Returns the previous value, if any.
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<PropertyValue>) -> Option<PropertyValue> {
        let key = key.into();
        let value = value.into();
        match self.index.get(&key) {
            Some(&i) => Some(std::mem::replace(&mut self.values[i], value)),
            None => {
                self.index.insert(key.clone(), self.keys.len());
                self.keys.push(key);
                self.values.push(value);
                None
            }
        }
    }

    /// Remove `key`, shifting later keys down to keep their relative order.
    pub fn remove(&mut self, key: &str) -> Option<PropertyValue> {
        let i = self.index.remove(key)?;
        self.keys.remove(i);
        let value = self.values.remove(i);
        for pos in self.index.values_mut() {
            if *pos > i { *pos -= 1; }
        }
        Some(value)
    }

    /// Keys in insertion order.
    #[inline] pub fn keys(&self) -> impl Iterator<Item = &str> + '_ { self.keys.iter().map(String::as_str) }

    /// `(key, value)` pairs in insertion order.
    #[inline]
    pub fn iter(&self) -> impl Iterator<Item = (&str, &PropertyValue)> + '_ {
        self.keys.iter().map(String::as_str).zip(self.values.iter())
    }

    /// Mutable access to every value, in insertion order.
    #[inline]
    pub fn values_mut(&mut self) -> impl Iterator<Item = &mut PropertyValue> + '_ {
        self.values.iter_mut()
    }
}

impl PartialEq for Properties {
    fn eq(&self, other: &Self) -> bool {
        self.keys == other.keys && self.values == other.values
    }
}

impl<K: Into<String>, V: Into<PropertyValue>> FromIterator<(K, V)> for Properties {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut properties = Self::new();
        for (key, value) in iter {
            properties.insert(key, value);
        }
        properties
    }
}

/// A geometry tagged with a record of named properties.
#[derive(Clone, Debug)]
pub struct Feature {
    pub id: FeatureId,
    pub geometry: Geometry<f64>,
    pub properties: Properties,
}

impl Feature {
    pub fn new(id: FeatureId, geometry: Geometry<f64>, properties: Properties) -> Self {
        Self { id, geometry, properties }
    }

    #[inline] pub fn is_point(&self) -> bool { matches!(self.geometry, Geometry::Point(_)) }

    /// Coordinates of a point geometry, `None` for every other kind.
    #[inline]
    pub fn point_coords(&self) -> Option<Coord<f64>> {
        match &self.geometry {
            Geometry::Point(point) => Some(point.0),
            _ => None,
        }
    }
}
