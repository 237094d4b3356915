// * Geographic resolution: gazetteer tables, the entity recognizer boundary,
// * and the entity-to-location resolution scan.

pub mod recognizer;
pub mod resolver;
pub mod tables;

pub use recognizer::{Entity, EntityLabel, EntityRecognizer, GazetteerRecognizer};
pub use resolver::{resolve_locations, LocationResolution};
