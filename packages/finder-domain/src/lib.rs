pub mod catalog;
pub mod classify;
pub mod filter;
pub mod location;
pub mod program;
pub mod synonyms;

pub use catalog::{CatalogError, CommonQuery, Detections, ReferenceCatalog, TriggerGroup};
pub use classify::{Classification, QueryClassifier, Resolution, Stage};
pub use filter::{ALWAYS_INCLUDED_AREAS, SearchFilter};
pub use location::{Location, extract_location};
pub use program::{ProgramCard, ProgramRecord, format_cards, truncate_description};
