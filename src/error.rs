use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

/// Everything that can abort a run. None of these are recoverable: a record
/// that fails is never written and the stream is not resumed.
#[derive(Debug, Error)]
pub enum Error {
    #[error("cannot open VCF input {source_name}: {reason}")]
    Open { source_name: String, reason: String },

    #[error("configuration error: {0}")]
    Config(String),

    #[error(
        "cannot handle sample fields with multiple values: {field} of sample {sample} \
         at {chrom}:{pos} has {count} values"
    )]
    MultiValueField {
        field: String,
        sample: String,
        chrom: String,
        pos: u64,
        count: usize,
    },

    #[error("no sample carries a value for {field} at {chrom}:{pos}, statistic is undefined")]
    EmptyStatistic {
        field: String,
        chrom: String,
        pos: u64,
    },

    #[error("value {value:?} of {field} in sample {sample} is not a number")]
    NumericParse {
        field: String,
        sample: String,
        value: String,
    },

    #[error("unknown statistic {0:?} (expected one of mean, median, min, max)")]
    UnknownStatistic(String),

    #[error("malformed record at line {line}: {msg}")]
    MalformedRecord { line: usize, msg: String },

    #[error("header can no longer be modified once records have been read")]
    HeaderFinalized,

    #[error("{0}")]
    HeaderState(&'static str),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl Error {
    pub(crate) fn open<S: Into<String>, M: ToString>(source_name: S, reason: M) -> Self {
        Error::Open {
            source_name: source_name.into(),
            reason: reason.to_string(),
        }
    }

    pub(crate) fn malformed<M: Into<String>>(line: usize, msg: M) -> Self {
        Error::MalformedRecord {
            line,
            msg: msg.into(),
        }
    }
}
