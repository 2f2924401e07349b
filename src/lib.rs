#![doc = "wktlink public API"]
pub mod cli;
pub mod commands;
pub mod io;
pub mod logging;
mod common;

#[doc(inline)]
pub use featurejoin::{
    spatial_join, FeatureCollection, GeoOracle, JoinOptions, JoinOutcome, NullValues, PropertyValue,
};
