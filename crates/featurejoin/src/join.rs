use thiserror::Error;

use crate::collection::FeatureCollection;
use crate::merge::{MergePolicy, NullValues};
use crate::relation::RelationOracle;

/// Errors reported by `spatial_join`.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum JoinError {
    #[error("no fields configured for the join")]
    NoFields,
    #[error("field name at position {0} is blank")]
    BlankField(usize),
}

/// Parameters of a single join.
#[derive(Clone, Debug)]
pub struct JoinOptions {
    /// Fields to merge, in output order.
    pub fields: Vec<String>,
    /// Copy data from the point side into the polygon side instead.
    pub reverse: bool,
    pub nulls: NullValues,
}

impl JoinOptions {
    pub fn new<S: Into<String>>(fields: impl IntoIterator<Item = S>) -> Self {
        Self {
            fields: fields.into_iter().map(Into::into).collect(),
            reverse: false,
            nulls: NullValues::default(),
        }
    }

    pub fn with_reverse(mut self, reverse: bool) -> Self {
        self.reverse = reverse;
        self
    }

    pub fn with_nulls(mut self, nulls: NullValues) -> Self {
        self.nulls = nulls;
        self
    }

    /// Check that there is at least one field and that none are blank.
    pub fn validate(&self) -> Result<(), JoinError> {
        if self.fields.is_empty() {
            return Err(JoinError::NoFields);
        }
        if let Some(pos) = self.fields.iter().position(|f| f.trim().is_empty()) {
            return Err(JoinError::BlankField(pos));
        }
        Ok(())
    }
}

/// Result of `spatial_join`.
#[derive(Debug)]
pub struct JoinOutcome {
    /// The receiving collection with merged properties.
    pub collection: FeatureCollection,
    /// Non-fatal problems encountered during the join.
    pub errors: Vec<JoinError>,
    /// Number of related (subject, candidate) pairs.
    pub matches: usize,
}

/// Join `polygons` into `points` (or the reverse), merging `options.fields`
/// across every related pair.
///
/// Subjects are always taken from `points` and candidates from `polygons`;
/// `options.reverse` only changes which side receives the merged values and
/// which collection is returned.  Every pair is tested: O(P × Q × F).
pub fn spatial_join<O: RelationOracle + ?Sized>(
    points: FeatureCollection,
    polygons: FeatureCollection,
    options: &JoinOptions,
    oracle: &O,
) -> Result<JoinOutcome, JoinError> {
    options.validate()?;

    let mut points = points.dedup();
    let mut polygons = polygons.dedup();
    points.seed_fields(&options.fields);
    polygons.seed_fields(&options.fields);

    tracing::info!(
        points = points.len(),
        polygons = polygons.len(),
        fields = ?options.fields,
        reverse = options.reverse,
        "starting spatial join"
    );

    let policy = MergePolicy::new(options.nulls);
    let mut matches = 0;

    for subject in points.features_mut() {
        for candidate in polygons.features_mut() {
            if !oracle.related(&subject.geometry, &candidate.geometry) {
                continue;
            }
            matches += 1;
            tracing::trace!(subject = %subject.id, candidate = %candidate.id, "related");

            let (receiver, source) = if options.reverse {
                (&mut candidate.properties, &subject.properties)
            } else {
                (&mut subject.properties, &candidate.properties)
            };
            policy.merge(receiver, source, &options.fields);
        }
    }

    tracing::debug!(matches, "spatial join finished");

    Ok(JoinOutcome {
        collection: if options.reverse { polygons } else { points },
        errors: Vec::new(),
        matches,
    })
}

#[cfg(test)]
mod tests {
    use geo::{point, polygon, Geometry};

    use super::*;
    use crate::feature::Properties;
    use crate::relation::GeoOracle;
    use crate::value::PropertyValue;

    fn square(x0: f64, y0: f64, size: f64) -> Geometry<f64> {
        polygon![
            (x: x0, y: y0),
            (x: x0 + size, y: y0),
            (x: x0 + size, y: y0 + size),
            (x: x0, y: y0 + size)
        ].into()
    }

    fn props(pairs: &[(&str, &str)]) -> Properties {
        pairs.iter().copied().collect()
    }

    #[test]
    fn empty_field_list_is_rejected() {
        let options = JoinOptions::new(Vec::<String>::new());
        let err = spatial_join(FeatureCollection::new(), FeatureCollection::new(), &options, &GeoOracle).unwrap_err();
        assert_eq!(err, JoinError::NoFields);
    }

    #[test]
    fn blank_field_is_rejected() {
        let options = JoinOptions::new(["GEOID", " "]);
        assert_eq!(options.validate(), Err(JoinError::BlankField(1)));
    }

    #[test]
    fn point_receives_containing_polygon_value() {
        let mut points = FeatureCollection::new();
        points.insert(point!(x: 1., y: 1.).into(), Properties::new());
        let mut polygons = FeatureCollection::new();
        polygons.insert(square(0., 0., 2.), props(&[("GEOID", "A")]));
        polygons.insert(square(5., 5., 2.), props(&[("GEOID", "B")]));

        let outcome = spatial_join(points, polygons, &JoinOptions::new(["GEOID"]), &GeoOracle).unwrap();
        assert!(outcome.errors.is_empty());
        assert_eq!(outcome.matches, 1);
        let result = outcome.collection.features();
        assert_eq!(result.len(), 1);
        assert_eq!(result[0].properties.get("GEOID"), Some(&PropertyValue::scalar("A")));
    }

    #[test]
    fn reverse_returns_polygon_side() {
        let mut points = FeatureCollection::new();
        points.insert(point!(x: 1., y: 1.).into(), props(&[("Name", "X")]));
        let mut polygons = FeatureCollection::new();
        polygons.insert(square(0., 0., 2.), Properties::new());

        let options = JoinOptions::new(["Name"]).with_reverse(true);
        let outcome = spatial_join(points, polygons, &options, &GeoOracle).unwrap();
        let result = outcome.collection.features();
        assert_eq!(result.len(), 1);
        assert!(!result[0].is_point());
        assert_eq!(result[0].properties.get("Name"), Some(&PropertyValue::scalar("X")));
    }

    #[test]
    fn oracle_sees_point_side_as_subject() {
        let mut points = FeatureCollection::new();
        points.insert(point!(x: 0., y: 0.).into(), Properties::new());
        let mut polygons = FeatureCollection::new();
        polygons.insert(square(0., 0., 1.), props(&[("GEOID", "A")]));

        let oracle = |subject: &Geometry<f64>, candidate: &Geometry<f64>| {
            matches!(subject, Geometry::Point(_)) && matches!(candidate, Geometry::Polygon(_))
        };
        for reverse in [false, true] {
            let options = JoinOptions::new(["GEOID"]).with_reverse(reverse);
            let outcome = spatial_join(points.clone(), polygons.clone(), &options, &oracle).unwrap();
            assert_eq!(outcome.matches, 1);
        }
    }

    #[test]
    fn geometries_are_untouched() {
        let mut points = FeatureCollection::new();
        points.insert(point!(x: 1., y: 1.).into(), Properties::new());
        let mut polygons = FeatureCollection::new();
        polygons.insert(square(0., 0., 2.), props(&[("GEOID", "A")]));

        let outcome = spatial_join(points, polygons, &JoinOptions::new(["GEOID"]), &GeoOracle).unwrap();
        assert_eq!(outcome.collection.features()[0].geometry, Geometry::Point(point!(x: 1., y: 1.)));
    }
}
