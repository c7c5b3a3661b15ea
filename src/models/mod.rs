pub mod record;
pub mod record_kind;
pub mod timeline;

pub use record::{
    ActivityDetails, ActivityEdge, GeoPoint, LocationRecord, NaturalKey, TimeSpan, VisitDetails,
};
pub use record_kind::{RecordKind, RecordSource};
