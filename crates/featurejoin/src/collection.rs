use ahash::AHashSet;
use geo::Geometry;

use crate::feature::{Feature, FeatureId, Properties};
use crate::value::PropertyValue;

/// An owned set of features.
///
/// Ids handed out by `insert` are contiguous from `0`; features added with
/// `push` keep whatever id they carry, so the same feature may appear more
/// than once until `dedup` is applied.
#[derive(Clone, Debug, Default)]
pub struct FeatureCollection {
    features: Vec<Feature>,
    next_id: u32,
}

impl FeatureCollection {
    pub fn new() -> Self { Self::default() }

    pub fn with_capacity(capacity: usize) -> Self {
        Self { features: Vec::with_capacity(capacity), next_id: 0 }
    }

    #[inline] pub fn len(&self) -> usize { self.features.len() }

    #[inline] pub fn is_empty(&self) -> bool { self.features.is_empty() }

    #[inline] pub fn features(&self) -> &[Feature] { &self.features }

    #[inline] pub(crate) fn features_mut(&mut self) -> &mut [Feature] { &mut self.features }

    #[inline] pub fn iter(&self) -> impl Iterator<Item = &Feature> + '_ { self.features.iter() }

    #[inline] pub fn iter_mut(&mut self) -> impl Iterator<Item = &mut Feature> + '_ { self.features.iter_mut() }

    #[inline] pub fn into_features(self) -> Vec<Feature> { self.features }

    /// First feature with the given id.
    pub fn get(&self, id: FeatureId) -> Option<&Feature> {
        self.features.iter().find(|feature| feature.id == id)
    }

    /// Add a new feature and assign it a fresh id.
    pub fn insert(&mut self, geometry: Geometry<f64>, properties: Properties) -> FeatureId {
        let id = FeatureId(self.next_id);
        self.next_id += 1;
        self.features.push(Feature::new(id, geometry, properties));
        id
    }

    /// Add an already-identified feature.
    pub fn push(&mut self, feature: Feature) {
        self.next_id = self.next_id.max(feature.id.0.saturating_add(1));
        self.features.push(feature);
    }

    /// Keep only the first entry for every `FeatureId`.
    ///
    /// Identity is the id alone; geometry and properties are never compared.
    pub fn dedup(mut self) -> Self {
        let before = self.features.len();
        let mut seen = AHashSet::with_capacity(before);
        self.features.retain(|feature| seen.insert(feature.id));

        let removed = before - self.features.len();
        if removed > 0 {
            tracing::debug!(removed, remaining = self.features.len(), "dropped duplicate feature references");
        }
        self
    }

    /// Give every feature an explicit entry for each of `fields`.
    ///
    /// Absent and falsy values become `Null`; anything else is left alone.
    pub fn seed_fields<S: AsRef<str>>(&mut self, fields: &[S]) {
        for feature in &mut self.features {
            for field in fields {
                let field = field.as_ref();
                if feature.properties.get(field).is_none_or(PropertyValue::is_falsy) {
                    feature.properties.insert(field, PropertyValue::Null);
                }
            }
        }
    }
}

impl FromIterator<Feature> for FeatureCollection {
    fn from_iter<I: IntoIterator<Item = Feature>>(iter: I) -> Self {
        let mut collection = Self::new();
        for feature in iter {
            collection.push(feature);
        }
        collection
    }
}

impl<'a> IntoIterator for &'a FeatureCollection {
    type Item = &'a Feature;
    type IntoIter = std::slice::Iter<'a, Feature>;

    fn into_iter(self) -> Self::IntoIter { self.features.iter() }
}

#[cfg(test)]
mod tests {
    use geo::point;

    use super::*;

    fn props(pairs: &[(&str, &str)]) -> Properties {
        pairs.iter().copied().collect()
    }

    #[test]
    fn insert_assigns_contiguous_ids() {
        let mut fc = FeatureCollection::new();
        let a = fc.insert(point!(x: 0., y: 0.).into(), Properties::new());
        let b = fc.insert(point!(x: 1., y: 1.).into(), Properties::new());
        assert_eq!((a, b), (FeatureId(0), FeatureId(1)));
        assert_eq!(fc.len(), 2);
    }

    #[test]
    fn push_advances_next_id() {
        let mut fc = FeatureCollection::new();
        fc.push(Feature::new(FeatureId(5), point!(x: 0., y: 0.).into(), Properties::new()));
        let id = fc.insert(point!(x: 0., y: 0.).into(), Properties::new());
        assert_eq!(id, FeatureId(6));
    }

    #[test]
    fn dedup_removes_repeated_ids_only() {
        let mut fc = FeatureCollection::new();
        let id = fc.insert(point!(x: 0., y: 0.).into(), props(&[("name", "a")]));
        let twin = fc.get(id).cloned().unwrap();
        fc.push(twin);
        // structurally identical, but a distinct feature
        fc.insert(point!(x: 0., y: 0.).into(), props(&[("name", "a")]));

        let fc = fc.dedup();
        assert_eq!(fc.len(), 2);
        assert_eq!(fc.iter().map(|f| f.id).collect::<Vec<_>>(), vec![FeatureId(0), FeatureId(1)]);
    }

    #[test]
    fn dedup_keeps_first_occurrence() {
        let mut fc = FeatureCollection::new();
        fc.push(Feature::new(FeatureId(0), point!(x: 0., y: 0.).into(), props(&[("v", "first")])));
        fc.push(Feature::new(FeatureId(0), point!(x: 0., y: 0.).into(), props(&[("v", "second")])));
        let fc = fc.dedup();
        assert_eq!(fc.len(), 1);
        assert_eq!(fc.features()[0].properties.get("v"), Some(&PropertyValue::scalar("first")));
    }

    #[test]
    fn seed_fields_nulls_absent_and_empty() {
        let mut fc = FeatureCollection::new();
        fc.insert(point!(x: 0., y: 0.).into(), props(&[("GEOID", ""), ("name", "x")]));
        fc.insert(point!(x: 0., y: 0.).into(), props(&[("GEOID", "17")]));
        fc.seed_fields(&["GEOID", "TRACT"]);

        let first = &fc.features()[0].properties;
        assert_eq!(first.get("GEOID"), Some(&PropertyValue::Null));
        assert_eq!(first.get("TRACT"), Some(&PropertyValue::Null));
        assert_eq!(first.keys().collect::<Vec<_>>(), vec!["GEOID", "name", "TRACT"]);

        let second = &fc.features()[1].properties;
        assert_eq!(second.get("GEOID"), Some(&PropertyValue::scalar("17")));
        assert_eq!(second.get("TRACT"), Some(&PropertyValue::Null));
    }
}
