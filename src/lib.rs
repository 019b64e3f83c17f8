pub mod annotate;
pub mod config;
pub mod error;
pub mod extract;
pub(crate) mod parser;
pub mod reader;
pub mod record;
pub mod stats;
pub mod types;
pub mod writer;

pub use annotate::Annotator;
pub use error::{Error, Result};
pub use reader::{Input, VcfRecords};
pub use record::{Record, VcfRecord};
pub use stats::Statistic;
pub use writer::VcfWriter;
