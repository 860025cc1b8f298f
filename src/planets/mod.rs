pub mod ingest;
pub mod service;
pub mod source;
pub mod tags;
pub mod validation;

pub use ingest::{CandidatePlanet, IngestReport, reconcile};
pub use source::SwapiClient;
pub use tags::{join_ingested, join_tags, merge_tags, parse_tags};
pub use validation::FieldErrors;
