//! Record routing: classify, extract, and place each record into the channel
//! its configuration-derived topology assigns.

pub mod enrich;
mod error;
mod router;

pub use enrich::Enrichment;
pub use error::{RecordError, RouteError};
pub use router::{Disposition, RoutedBatch, Router};
