use std::io::{self, BufRead, BufReader, Read};
use std::path::{Path, PathBuf};

use log::{debug, info, warn};

use crate::error::{Error, Result};
use crate::parser;
use crate::record::VcfRecord;
use crate::types::{Header, SharedHeader};

/// Where the VCF text comes from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Input {
    Path(PathBuf),
    Stdin,
}

impl Input {
    /// `-` is read as standard input.
    pub fn from_arg<P: AsRef<Path>>(path: Option<P>) -> Self {
        match path {
            Some(p) if p.as_ref() != Path::new("-") => Input::Path(p.as_ref().to_path_buf()),
            _ => Input::Stdin,
        }
    }

    fn name(&self) -> String {
        match self {
            Input::Path(p) => p.display().to_string(),
            Input::Stdin => "<stdin>".to_owned(),
        }
    }
}

/// Streaming VCF reader: parses the header eagerly on construction, then
/// yields one record per data line.
pub struct VcfRecords<R: Read> {
    header: SharedHeader,
    line_buf: String,
    line_no: usize,
    records_read: bool,
    inner: BufReader<R>,
}

impl<R: Read> VcfRecords<R> {
    pub fn header(&self) -> &Header {
        self.header.as_ref()
    }

    /// Appends a meta line (e.g. an `##INFO` declaration) to the header.
    ///
    /// Records share the header, so this is only possible before the first
    /// record has been read.
    pub fn add_declaration(&mut self, line: &str) -> Result<()> {
        if self.records_read {
            return Err(Error::HeaderFinalized);
        }
        let header = SharedHeader::get_mut(&mut self.header).ok_or(Error::HeaderFinalized)?;
        header
            .push_meta(line)
            .map_err(|reason| Error::Config(format!("invalid header line {:?}: {}", line, reason)))
    }
}

impl VcfRecords<Box<dyn Read>> {
    /// Opens a file or standard input; gzip/bgzip input is detected and
    /// decompressed transparently.
    pub fn open(input: Input) -> Result<Self> {
        let name = input.name();
        let (reader, format) = match &input {
            Input::Path(path) => niffler::from_path(path),
            Input::Stdin => niffler::get_reader(Box::new(io::stdin())),
        }
        .map_err(|e| Error::open(name.as_str(), e))?;
        debug!("reading {} ({:?})", name, format);
        Self::with_name(reader, &name)
    }

    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Self> {
        Self::open(Input::Path(path.as_ref().to_path_buf()))
    }
}

impl<R: Read> VcfRecords<R> {
    pub fn new(reader: R) -> Result<Self> {
        Self::with_name(reader, "<reader>")
    }

    fn with_name(reader: R, name: &str) -> Result<Self> {
        let mut inner = BufReader::new(reader);
        let mut header = Header::default();
        let mut line_buf = String::new();
        let mut line_no = 0;
        loop {
            line_buf.clear();
            let n = inner
                .read_line(&mut line_buf)
                .map_err(|e| Error::open(name, e))?;
            if n == 0 {
                return Err(Error::open(name, "no #CHROM line before end of input"));
            }
            line_no += 1;
            let line = line_buf.trim_end_matches(&['\n', '\r'][..]);
            if line.starts_with("##") {
                header
                    .push_meta(line)
                    .map_err(|reason| Error::open(name, format!("line {}: {}", line_no, reason)))?;
            } else if line.starts_with('#') {
                let (samples, format_column) = parser::column_line(line)
                    .map_err(|reason| Error::open(name, format!("line {}: {}", line_no, reason)))?;
                header.samples = samples;
                header.format_column = format_column;
                break;
            } else {
                return Err(Error::open(
                    name,
                    format!("line {}: expected a header line starting with #", line_no),
                ));
            }
        }
        if header.file_format().is_none() {
            warn!("{}: header has no ##fileformat line", name);
        }
        info!(
            "{}: {} header lines, {} samples",
            name,
            header.lines().len(),
            header.samples().len()
        );

        Ok(Self {
            header: SharedHeader::new(header),
            line_buf,
            line_no,
            records_read: false,
            inner,
        })
    }

    fn read_record(&mut self) -> Option<Result<VcfRecord>> {
        loop {
            self.line_buf.clear();
            match self.inner.read_line(&mut self.line_buf) {
                Ok(0) => return None,
                Ok(_) => {}
                Err(e) => return Some(Err(e.into())),
            }
            self.line_no += 1;
            let line = self.line_buf.trim_end_matches(&['\n', '\r'][..]);
            if line.is_empty() {
                continue;
            }
            let line_no = self.line_no;
            self.records_read = true;
            let record = parser::record_line(line)
                .map_err(|msg| Error::malformed(line_no, msg))
                .and_then(|fields| VcfRecord::from_fields(fields, self.header.clone(), line_no));
            return Some(record);
        }
    }
}

impl<R: Read> Iterator for VcfRecords<R> {
    type Item = Result<VcfRecord>;

    fn next(&mut self) -> Option<Self::Item> {
        self.read_record()
    }
}
