//! Summarises a per-sample FORMAT field into a site-level INFO field.

use std::io::{Read, Write};

use log::{debug, info};

use crate::error::{Error, Result};
use crate::extract::extract;
use crate::reader::VcfRecords;
use crate::record::{Record, VcfRecord};
use crate::stats::Statistic;
use crate::writer::VcfWriter;

#[derive(Debug, Clone)]
pub struct Annotator {
    field: String,
    info_id: String,
    statistic: Statistic,
}

impl Annotator {
    pub fn new<F: Into<String>, I: Into<String>>(
        field: F,
        info_id: I,
        statistic: Statistic,
    ) -> Result<Self> {
        let (field, info_id) = (field.into(), info_id.into());
        if field.is_empty() || info_id.is_empty() {
            return Err(Error::Config(
                "both a sample field and an info field are required".to_owned(),
            ));
        }
        if !is_info_key(&info_id) {
            return Err(Error::Config(format!(
                "{:?} is not a valid INFO key: expected [A-Za-z_][0-9A-Za-z_.]*",
                info_id
            )));
        }
        Ok(Self {
            field,
            info_id,
            statistic,
        })
    }

    pub fn field(&self) -> &str {
        &self.field
    }

    pub fn info_id(&self) -> &str {
        &self.info_id
    }

    pub fn statistic(&self) -> Statistic {
        self.statistic
    }

    /// The `##INFO` line announcing the new annotation.
    pub fn declaration(&self) -> String {
        format!(
            "##INFO=<ID={},Number=1,Type=Float,Description=\"Summary statistic generated by {} of per-sample values of {}\">",
            self.info_id, self.statistic, self.field
        )
    }

    /// Adds [`declaration`](Self::declaration) to the header of `records`.
    pub fn declare<R: Read>(&self, records: &mut VcfRecords<R>) -> Result<()> {
        records.add_declaration(&self.declaration())
    }

    /// Computes the statistic for one record and stores it under the INFO id.
    pub fn annotate(&self, record: &mut VcfRecord) -> Result<f64> {
        let mut values = extract(record, &self.field)?;
        let value = self
            .statistic
            .reduce(&mut values)
            .ok_or_else(|| Error::EmptyStatistic {
                field: self.field.clone(),
                chrom: record.chrom().to_owned(),
                pos: record.pos(),
            })?;
        apply(record, &self.info_id, value);
        Ok(value)
    }
}

fn is_info_key(id: &str) -> bool {
    let mut chars = id.chars();
    matches!(chars.next(), Some(c) if c.is_ascii_alphabetic() || c == '_')
        && chars.all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '.')
}

/// Overwrites INFO `id` with the single value `value`.
pub fn apply(record: &mut VcfRecord, id: &str, value: f64) {
    record.set_info(id, vec![format_value(value)]);
}

/// Shortest decimal text that parses back to the same `f64`.
pub fn format_value(value: f64) -> String {
    value.to_string()
}

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct Summary {
    pub records: usize,
}

/// Declares the annotation, writes the header and then annotates and writes
/// every record in turn. The first error aborts the run; the record that
/// caused it is not written.
pub fn run<R: Read, W: Write>(
    mut records: VcfRecords<R>,
    writer: &mut VcfWriter<W>,
    annotator: &Annotator,
) -> Result<Summary> {
    annotator.declare(&mut records)?;
    writer.write_header(records.header())?;
    info!(
        "annotating {} with the {} of {}",
        annotator.info_id(),
        annotator.statistic(),
        annotator.field()
    );

    for record in records {
        let mut record = record?;
        let value = annotator.annotate(&mut record)?;
        debug!("{}:{} {}={}", record.chrom(), record.pos(), annotator.info_id(), value);
        writer.write(&record)?;
    }
    writer.flush()?;
    let summary = Summary {
        records: writer.records_written(),
    };
    info!("annotated {} records", summary.records);
    Ok(summary)
}
