pub mod normalizer;
pub mod record_matcher;
pub mod report_writer;

pub use normalizer::normalize;
pub use record_matcher::{resolve_record, RecordCache};
pub use report_writer::{ReportPaths, ReportWriter};
