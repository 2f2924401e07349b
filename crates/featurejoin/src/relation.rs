use geo::{Contains, Geometry, Intersects};

/// Decides whether two geometries are spatially related.
pub trait RelationOracle {
    fn related(&self, subject: &Geometry<f64>, candidate: &Geometry<f64>) -> bool;
}

/// Default oracle backed by the `geo` predicates.
///
/// A point subject is related when the candidate contains it (boundary
/// handling is whatever `geo::Contains` defines); any other subject is
/// related when it intersects the candidate.
#[derive(Clone, Copy, Debug, Default)]
pub struct GeoOracle;

impl RelationOracle for GeoOracle {
    fn related(&self, subject: &Geometry<f64>, candidate: &Geometry<f64>) -> bool {
        match subject {
            Geometry::Point(point) => candidate.contains(point),
            _ => subject.intersects(candidate),
        }
    }
}

impl<F> RelationOracle for F where F: Fn(&Geometry<f64>, &Geometry<f64>) -> bool {
    fn related(&self, subject: &Geometry<f64>, candidate: &Geometry<f64>) -> bool {
        self(subject, candidate)
    }
}
