use std::path::PathBuf;

use crate::annotate::Annotator;
use crate::error::Result;
use crate::reader::Input;
use crate::stats::Statistic;

/// Validated settings for one run.
#[derive(Debug, Clone)]
pub struct Config {
    pub annotator: Annotator,
    pub input: Input,
}

impl Config {
    /// `statistic` defaults to the mean; an input of `None` or `-` reads stdin.
    pub fn new(
        field: Option<String>,
        info_id: Option<String>,
        statistic: Option<&str>,
        input: Option<PathBuf>,
    ) -> Result<Self> {
        let statistic = statistic.map(Statistic::parse).transpose()?.unwrap_or_default();
        let annotator = Annotator::new(
            field.unwrap_or_default(),
            info_id.unwrap_or_default(),
            statistic,
        )?;
        Ok(Config {
            annotator,
            input: Input::from_arg(input),
        })
    }
}
