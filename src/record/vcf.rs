use std::fmt;

use indexmap::IndexMap;
use itertools::Itertools;
use log::warn;

use crate::error::{Error, Result};
use crate::parser::RecordFields;
use crate::record::Record;
use crate::types::{Header, Sample, SharedHeader, MISSING};

/// FORMAT key to the values of one sample, in FORMAT order.
pub type SampleFields = IndexMap<String, Vec<String>>;

/// One data line of a VCF file, owned and mutable.
///
/// Fixed columns other than POS are kept as the text they were read from, so
/// a record that is not modified serializes back to the same line.
#[derive(Debug, Clone)]
pub struct VcfRecord {
    pub(crate) chrom: String,
    pub(crate) pos: u64,
    pub(crate) id: String,
    pub(crate) ref_allele: String,
    pub(crate) alt_alleles: Vec<String>,
    pub(crate) qual: String,
    pub(crate) filters: Vec<String>,
    pub(crate) info: IndexMap<String, Vec<String>>,
    pub(crate) format: Option<Vec<String>>,
    // positional, same order as `header.samples`
    pub(crate) samples: Vec<SampleFields>,
    pub(crate) header: SharedHeader,
}

fn owned(values: &[&str]) -> Vec<String> {
    values.iter().map(|v| v.to_string()).collect()
}

impl VcfRecord {
    pub(crate) fn from_fields(
        fields: RecordFields<'_>,
        header: SharedHeader,
        line: usize,
    ) -> Result<Self> {
        let n_samples = header.samples().len();
        if fields.samples.len() != n_samples {
            return Err(Error::malformed(
                line,
                format!(
                    "expected {} sample columns, found {}",
                    n_samples,
                    fields.samples.len()
                ),
            ));
        }
        let format = fields.format;
        let samples = fields
            .samples
            .into_iter()
            .map(|values| {
                if format.is_empty() {
                    // without FORMAT keys a sample can only be missing
                    return if values.concat().iter().all(|v| v.is_empty() || *v == MISSING) {
                        Ok(SampleFields::new())
                    } else {
                        Err(Error::malformed(line, "sample data without FORMAT keys"))
                    };
                }
                if values.len() > format.len() {
                    return Err(Error::malformed(
                        line,
                        format!(
                            "sample has {} subfields but FORMAT declares {}",
                            values.len(),
                            format.len()
                        ),
                    ));
                }
                Ok(format
                    .iter()
                    .zip(values.iter())
                    .map(|(key, values)| (key.to_string(), owned(values)))
                    .collect())
            })
            .collect::<Result<Vec<_>>>()?;
        let format = if fields.has_format {
            Some(owned(&format))
        } else {
            None
        };

        let mut info = IndexMap::with_capacity(fields.info.len());
        for (key, values) in fields.info {
            if info.insert(key.to_owned(), owned(&values)).is_some() {
                warn!(
                    "line {}: INFO key {} repeated at {}:{}, keeping the last value",
                    line, key, fields.chrom, fields.pos
                );
            }
        }

        Ok(VcfRecord {
            chrom: fields.chrom.to_owned(),
            pos: fields.pos,
            id: fields.id.to_owned(),
            ref_allele: fields.ref_allele.to_owned(),
            alt_alleles: owned(&fields.alt_alleles),
            qual: fields.qual.to_owned(),
            filters: owned(&fields.filters),
            info,
            format,
            samples,
            header,
        })
    }

    pub fn header(&self) -> &Header {
        self.header.as_ref()
    }

    /// Iterates over `(sample name, FORMAT data)` in header order.
    pub fn samples(&self) -> impl Iterator<Item = (&Sample, &SampleFields)> {
        self.header.samples().iter().zip(self.samples.iter())
    }

    /// Replaces the values of an INFO key. An existing key keeps its
    /// position, a new key is appended after all others.
    pub fn set_info<K: Into<String>>(&mut self, key: K, values: Vec<String>) {
        self.info.insert(key.into(), values);
    }

    fn write_sample(&self, f: &mut fmt::Formatter<'_>, sample: &SampleFields) -> fmt::Result {
        let keys = self.format.as_deref().unwrap_or(&[]);
        // trailing subfields that were omitted on input stay omitted
        let last = keys.iter().rposition(|k| sample.contains_key(k));
        match last {
            None => f.write_str(MISSING),
            Some(last) => {
                let values = keys[..=last]
                    .iter()
                    .map(|k| match sample.get(k) {
                        Some(v) => v.join(","),
                        None => MISSING.to_owned(),
                    })
                    .join(":");
                f.write_str(&values)
            }
        }
    }
}

fn join_or_missing(values: &[String], separator: &str) -> String {
    if values.is_empty() {
        MISSING.to_owned()
    } else {
        values.join(separator)
    }
}

impl fmt::Display for VcfRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let info = if self.info.is_empty() {
            MISSING.to_owned()
        } else {
            self.info
                .iter()
                .map(|(key, values)| {
                    if values.is_empty() {
                        key.clone()
                    } else {
                        format!("{}={}", key, values.join(","))
                    }
                })
                .join(";")
        };
        write!(
            f,
            "{}\t{}\t{}\t{}\t{}\t{}\t{}\t{}",
            self.chrom,
            self.pos,
            self.id,
            self.ref_allele,
            join_or_missing(&self.alt_alleles, ","),
            self.qual,
            join_or_missing(&self.filters, ";"),
            info
        )?;
        if let Some(format) = &self.format {
            write!(f, "\t{}", join_or_missing(format, ":"))?;
            for sample in &self.samples {
                f.write_str("\t")?;
                self.write_sample(f, sample)?;
            }
        }
        Ok(())
    }
}

impl Record for VcfRecord {
    fn chrom(&self) -> &str {
        &self.chrom
    }

    /// 1-based, as written in the file.
    fn pos(&self) -> u64 {
        self.pos
    }

    fn id(&self) -> &str {
        &self.id
    }

    fn ref_allele(&self) -> &str {
        &self.ref_allele
    }

    fn alt_alleles(&self) -> &[String] {
        &self.alt_alleles
    }

    /// `None` if QUAL is missing (`.`) or not a number.
    fn qual(&self) -> Option<f32> {
        if self.qual == MISSING {
            None
        } else {
            self.qual.parse().ok()
        }
    }

    fn filters(&self) -> Vec<&str> {
        self.filters.iter().map(String::as_str).collect()
    }

    fn info(&self, tag: &str) -> Option<&[String]> {
        self.info.get(tag).map(Vec::as_slice)
    }

    /// For a given FORMAT tag, the values of every sample in header order;
    /// `None` for samples that do not carry the tag.
    fn format(&self, tag: &str) -> Option<Vec<Option<&[String]>>> {
        if !self.format.as_ref()?.iter().any(|k| k == tag) {
            return None;
        }
        Some(
            self.samples
                .iter()
                .map(|sample| sample.get(tag).map(Vec::as_slice))
                .collect(),
        )
    }
}
