pub mod coerce;
pub mod error;
pub mod normalize;
pub mod reader;
pub mod value;

pub use coerce::coerce_trips;
pub use error::{IngestError, Result};
pub use normalize::{NormalizedFrame, normalize_schema};
pub use reader::{IngestedFile, ingest_trip_file, read_trip_frame};
pub use value::{any_to_datetime, any_to_f64, any_to_i64, any_to_text, parse_f64, parse_i64};
