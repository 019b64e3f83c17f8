use std::io::{BufWriter, Write};

use crate::error::{Error, Result};
use crate::record::VcfRecord;
use crate::types::Header;

/// Buffered VCF text writer. The header must be written exactly once, before
/// any record.
pub struct VcfWriter<W: Write> {
    inner: BufWriter<W>,
    header_written: bool,
    records_written: usize,
}

impl<W: Write> VcfWriter<W> {
    pub fn new(inner: W) -> Self {
        Self {
            inner: BufWriter::new(inner),
            header_written: false,
            records_written: 0,
        }
    }

    pub fn write_header(&mut self, header: &Header) -> Result<()> {
        if self.header_written {
            return Err(Error::HeaderState("VCF header already written"));
        }
        writeln!(self.inner, "{}", header)?;
        self.header_written = true;
        Ok(())
    }

    pub fn write(&mut self, record: &VcfRecord) -> Result<()> {
        if !self.header_written {
            return Err(Error::HeaderState("VCF header must be written before records"));
        }
        writeln!(self.inner, "{}", record)?;
        self.records_written += 1;
        Ok(())
    }

    pub fn records_written(&self) -> usize {
        self.records_written
    }

    pub fn flush(&mut self) -> Result<()> {
        self.inner.flush()?;
        Ok(())
    }

    /// Flushes and returns the underlying writer.
    pub fn into_inner(self) -> Result<W> {
        self.inner.into_inner().map_err(|e| e.into_error().into())
    }
}
