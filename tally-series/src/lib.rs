mod record;
mod service;
mod summary;

pub use record::{RecordError, Sample, TimestampMs};
pub use service::{SampleStore, Service};
pub use summary::Summary;
