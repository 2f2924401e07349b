//! Exhaustive spatial join between two feature collections.
//!
//! Every subject on the point side is tested against every candidate on the
//! polygon side; related pairs merge the configured fields from one side into
//! the other as duplicate-free, comma-joined values.
pub mod collection;
pub mod feature;
pub mod join;
pub mod merge;
pub mod relation;
pub mod value;

pub use collection::FeatureCollection;
pub use feature::{Feature, FeatureId, Properties};
pub use join::{spatial_join, JoinError, JoinOptions, JoinOutcome};
pub use merge::{MergePolicy, NullValues};
pub use relation::{GeoOracle, RelationOracle};
pub use value::{PropertyValue, DELIMITER};
