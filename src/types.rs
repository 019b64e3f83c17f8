use std::collections::HashMap;
use std::convert::TryFrom;
use std::fmt;
use std::str::FromStr;

use getset::Getters;
use indexmap::IndexMap;
use itertools::Itertools;
use multimap::MultiMap;
use strum::{Display, EnumString};

use crate::parser;

pub(crate) const MISSING: &str = ".";

/// The eight mandatory columns of the `#CHROM` line, in order.
pub(crate) const FIXED_COLUMNS: [&str; 8] =
    ["CHROM", "POS", "ID", "REF", "ALT", "QUAL", "FILTER", "INFO"];
pub(crate) const FORMAT_COLUMN: &str = "FORMAT";

pub type Sample = String;
pub type HeaderKey<'a> = &'a str;

/// Handle through which records refer back to the header they were read with.
#[cfg(not(feature = "sync"))]
pub type SharedHeader = std::rc::Rc<Header>;
#[cfg(feature = "sync")]
pub type SharedHeader = std::sync::Arc<Header>;

/// Parsed VCF header.
///
/// Meta lines are kept verbatim (`lines`) so that the header is written back
/// exactly as it was read; the typed views (`meta`, `info`, `format`,
/// `contigs`) are derived from them.
#[derive(Debug, Clone, Default, Getters)]
#[getset(get = "pub")]
pub struct Header {
    pub(crate) lines: Vec<String>,
    pub(crate) meta: MultiMap<String, HeaderValue>,
    pub(crate) info: IndexMap<String, HeaderInfo>,
    pub(crate) format: IndexMap<String, HeaderFormat>,
    pub(crate) contigs: Vec<HeaderContig>,
    pub(crate) samples: Vec<Sample>,
    #[getset(skip)]
    pub(crate) format_column: bool,
}

impl Header {
    /// Parses a single `##key=value` line and appends it, keeping the raw text.
    /// No de-duplication is done for keys that are already declared.
    pub(crate) fn push_meta(&mut self, line: &str) -> Result<(), String> {
        let (key, value) = parser::meta_line(line)?;
        match &value {
            HeaderValue::Info(info) => {
                self.info.insert(info.id.clone(), info.clone());
            }
            HeaderValue::Format(format) => {
                self.format.insert(format.id.clone(), format.clone());
            }
            HeaderValue::Contig(contig) => self.contigs.push(contig.clone()),
            _ => {}
        }
        self.meta.insert(key, value);
        self.lines.push(line.to_owned());
        Ok(())
    }

    /// Value of the `##fileformat` line, if present.
    pub fn file_format(&self) -> Option<&str> {
        match self.meta.get("fileformat") {
            Some(HeaderValue::String(s)) => Some(s.as_str()),
            _ => None,
        }
    }
}

impl fmt::Display for Header {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for line in &self.lines {
            writeln!(f, "{}", line)?;
        }
        write!(f, "#{}", FIXED_COLUMNS.iter().join("\t"))?;
        if self.format_column || !self.samples.is_empty() {
            write!(f, "\t{}", FORMAT_COLUMN)?;
        }
        for sample in &self.samples {
            write!(f, "\t{}", sample)?;
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Eq, PartialEq, EnumString, Display)]
pub enum InfoType {
    Integer,
    Float,
    Flag,
    Character,
    String,
}

#[derive(Debug, Eq, PartialEq, Copy, Clone)]
pub enum InfoNumber {
    Count(usize),
    Alleles,
    AlternateAlleles,
    Genotypes,
    Unknown,
}

impl fmt::Display for InfoNumber {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            InfoNumber::Count(n) => write!(f, "{}", n),
            InfoNumber::Alleles => f.write_str("R"),
            InfoNumber::AlternateAlleles => f.write_str("A"),
            InfoNumber::Genotypes => f.write_str("G"),
            InfoNumber::Unknown => f.write_str(MISSING),
        }
    }
}

#[derive(Debug, Clone)]
pub enum HeaderValue {
    String(String),
    Info(HeaderInfo),
    Filter(HeaderFilter),
    Format(HeaderFormat),
    Contig(HeaderContig),
    /// Any other `##KEY=<...>` line, e.g. ALT or SAMPLE.
    Structured(IndexMap<String, String>),
}

type Fields<'a> = HashMap<&'a str, &'a str>;

fn mandatory<'a>(h: &mut Fields<'a>, key: &str) -> Result<&'a str, String> {
    h.remove(key).ok_or_else(|| format!("{} is mandatory", key))
}

fn number_and_type(h: &mut Fields<'_>) -> Result<(InfoNumber, InfoType), String> {
    let number = parser::info_number(mandatory(h, "Number")?)?;
    let kind = mandatory(h, "Type")?;
    let kind = InfoType::from_str(kind).map_err(|_| format!("unknown Type {}", kind))?;
    Ok((number, kind))
}

#[derive(Debug, Getters, Clone)]
#[getset(get = "pub")]
pub struct HeaderInfo {
    pub(crate) id: String,
    number: InfoNumber,
    kind: InfoType,
    description: String,
    // may be empty
    source: String,
    // may be empty
    version: String,
    additional: IndexMap<String, String>,
}

impl<'a> TryFrom<Vec<(&'a str, &'a str)>> for HeaderInfo {
    type Error = String;

    fn try_from(data: Vec<(&'a str, &'a str)>) -> Result<Self, Self::Error> {
        let order = data.iter().map(|(k, _)| *k).collect_vec();
        let mut h: Fields<'a> = data.into_iter().collect();
        let id = mandatory(&mut h, "ID")?.into();
        let (number, kind) = number_and_type(&mut h)?;
        let description = mandatory(&mut h, "Description")?.into();
        let source = h.remove("Source").unwrap_or("").into();
        let version = h.remove("Version").unwrap_or("").into();
        let additional = order
            .into_iter()
            .filter_map(|k| h.remove(k).map(|v| (k.to_owned(), v.to_owned())))
            .collect();
        Ok(HeaderInfo {
            id,
            number,
            kind,
            description,
            source,
            version,
            additional,
        })
    }
}

#[derive(Debug, Getters, Clone)]
#[getset(get = "pub")]
pub struct HeaderFormat {
    pub(crate) id: String,
    number: InfoNumber,
    kind: InfoType,
    description: String,
}

impl<'a> TryFrom<Vec<(&'a str, &'a str)>> for HeaderFormat {
    type Error = String;

    fn try_from(data: Vec<(&'a str, &'a str)>) -> Result<Self, Self::Error> {
        let mut h: Fields<'a> = data.into_iter().collect();
        let id = mandatory(&mut h, "ID")?.into();
        let (number, kind) = number_and_type(&mut h)?;
        Ok(HeaderFormat {
            id,
            number,
            kind,
            description: mandatory(&mut h, "Description")?.into(),
        })
    }
}

#[derive(Debug, Getters, Clone)]
#[getset(get = "pub")]
pub struct HeaderContig {
    pub(crate) id: String,
    length: Option<usize>,
    additional: IndexMap<String, String>,
}

impl<'a> TryFrom<Vec<(&'a str, &'a str)>> for HeaderContig {
    type Error = String;

    fn try_from(data: Vec<(&'a str, &'a str)>) -> Result<Self, Self::Error> {
        let mut id = None;
        let mut length = None;
        let mut additional = IndexMap::new();
        for (k, v) in data {
            match k {
                "ID" => id = Some(v.to_owned()),
                "length" => length = v.parse().ok(),
                _ => {
                    additional.insert(k.to_owned(), v.to_owned());
                }
            }
        }
        Ok(HeaderContig {
            id: id.ok_or("ID is mandatory")?,
            length,
            additional,
        })
    }
}

#[derive(Debug, Getters, Clone)]
#[getset(get = "pub")]
pub struct HeaderFilter {
    pub(crate) id: String,
    description: String,
}

impl<'a> TryFrom<Vec<(&'a str, &'a str)>> for HeaderFilter {
    type Error = String;

    fn try_from(data: Vec<(&'a str, &'a str)>) -> Result<Self, Self::Error> {
        let mut h: Fields<'a> = data.into_iter().collect();
        Ok(HeaderFilter {
            id: mandatory(&mut h, "ID")?.into(),
            // FILTER descriptions are required by the format but commonly dropped
            description: h.remove("Description").unwrap_or("").into(),
        })
    }
}
