use std::convert::TryFrom;

use itertools::Itertools;
use nom::branch::alt;
use nom::bytes::complete::{escaped, is_not, tag, take_till};
use nom::character::complete::{char, digit1, none_of, one_of};
use nom::combinator::{all_consuming, map, map_res, opt, rest};
use nom::multi::{separated_list0, separated_list1};
use nom::sequence::{delimited, pair, preceded, separated_pair};
use nom::IResult;

use crate::types::{
    HeaderContig, HeaderFilter, HeaderFormat, HeaderInfo, HeaderKey, HeaderValue, InfoNumber,
    Sample, FIXED_COLUMNS, FORMAT_COLUMN, MISSING,
};

fn describe<E: std::fmt::Debug>(e: nom::Err<E>) -> String {
    match e {
        nom::Err::Incomplete(_) => "unexpected end of input".to_owned(),
        nom::Err::Error(e) | nom::Err::Failure(e) => format!("{:?}", e),
    }
}

pub(crate) fn info_number(input: &str) -> Result<InfoNumber, String> {
    let count = map(map_res(digit1, str::parse::<usize>), InfoNumber::Count);
    let symbol = map(one_of("ARG."), |c| match c {
        'A' => InfoNumber::AlternateAlleles,
        'R' => InfoNumber::Alleles,
        'G' => InfoNumber::Genotypes,
        _ => InfoNumber::Unknown,
    });
    let r: IResult<&str, InfoNumber> = all_consuming(alt((count, symbol)))(input);
    r.map(|(_, number)| number)
        .map_err(|_| format!("Unknown Number type {}", input))
}

/// A double-quoted header value; returns the text between the quotes, escapes left intact.
fn string(input: &str) -> IResult<&str, &str> {
    let (input, value) = delimited(
        char('"'),
        opt(escaped(none_of("\\\""), '\\', one_of("\\\""))),
        char('"'),
    )(input)?;
    Ok((input, value.unwrap_or("")))
}

fn keys_and_values(input: &str) -> IResult<&str, Vec<(&str, &str)>> {
    fn key_value(input: &str) -> IResult<&str, (&str, &str)> {
        separated_pair(
            is_not("<,=>"),
            char('='),
            alt((string, take_till(|c| c == ',' || c == '>'))),
        )(input)
    }
    separated_list0(char(','), key_value)(input)
}

fn header_entry(input: &str) -> IResult<&str, (HeaderKey, &str)> {
    preceded(tag("##"), separated_pair(is_not("="), char('='), rest))(input)
}

/// Parses one `##key=value` meta line into its key and typed value.
pub(crate) fn meta_line(line: &str) -> Result<(String, HeaderValue), String> {
    let (_, (key, value)) = header_entry(line).map_err(|_| format!("not a meta line: {}", line))?;
    if !value.starts_with('<') {
        return Ok((key.to_owned(), HeaderValue::String(value.to_owned())));
    }
    let (_, data) = all_consuming(delimited(char('<'), keys_and_values, char('>')))(value)
        .map_err(|e| format!("malformed ##{} line: {}", key, describe(e)))?;
    let value = match key {
        "INFO" => HeaderValue::Info(HeaderInfo::try_from(data)?),
        "FORMAT" => HeaderValue::Format(HeaderFormat::try_from(data)?),
        "FILTER" => HeaderValue::Filter(HeaderFilter::try_from(data)?),
        "contig" => HeaderValue::Contig(HeaderContig::try_from(data)?),
        _ => HeaderValue::Structured(
            data.into_iter()
                .map(|(k, v)| (k.to_owned(), v.to_owned()))
                .collect(),
        ),
    };
    Ok((key.to_owned(), value))
}

fn tab_separated(input: &str) -> IResult<&str, Vec<&str>> {
    separated_list1(char('\t'), take_till(|c| c == '\t'))(input)
}

/// Parses the `#CHROM` line. Returns the sample names and whether a FORMAT
/// column is present.
pub(crate) fn column_line(line: &str) -> Result<(Vec<Sample>, bool), String> {
    let (_, columns) = preceded(char('#'), tab_separated)(line)
        .map_err(|_| "missing #CHROM column line".to_owned())?;
    if columns.len() < FIXED_COLUMNS.len()
        || columns.iter().zip(FIXED_COLUMNS.iter()).any(|(c, f)| c != f)
    {
        return Err(format!(
            "column line must start with #{}",
            FIXED_COLUMNS.iter().join("\t")
        ));
    }
    let rest = &columns[FIXED_COLUMNS.len()..];
    match rest.split_first() {
        None => Ok((vec![], false)),
        Some((&FORMAT_COLUMN, samples)) => {
            let samples = samples.iter().map(|s| s.to_string()).collect_vec();
            if let Some(dup) = samples.iter().duplicates().next() {
                return Err(format!("duplicate sample name {}", dup));
            }
            Ok((samples, true))
        }
        Some((other, _)) => Err(format!("expected FORMAT column, found {}", other)),
    }
}

/// Borrowed view of one data line, split into its columns.
#[derive(Debug)]
pub(crate) struct RecordFields<'a> {
    pub(crate) chrom: &'a str,
    pub(crate) pos: u64,
    pub(crate) id: &'a str,
    pub(crate) ref_allele: &'a str,
    pub(crate) alt_alleles: Vec<&'a str>,
    pub(crate) qual: &'a str,
    pub(crate) filters: Vec<&'a str>,
    pub(crate) info: Vec<(&'a str, Vec<&'a str>)>,
    pub(crate) has_format: bool,
    pub(crate) format: Vec<&'a str>,
    pub(crate) samples: Vec<Vec<Vec<&'a str>>>,
}

fn list<'a>(separator: char, input: &'a str) -> Vec<&'a str> {
    if input == MISSING || input.is_empty() {
        vec![]
    } else {
        input.split(separator).collect()
    }
}

fn info_pairs(input: &str) -> IResult<&str, Vec<(&str, Vec<&str>)>> {
    fn info_pair(input: &str) -> IResult<&str, (&str, Vec<&str>)> {
        let (input, (key, values)) =
            pair(is_not("=;"), opt(preceded(char('='), take_till(|c| c == ';'))))(input)?;
        let values = values.map(|v| v.split(',').collect()).unwrap_or_default();
        Ok((input, (key, values)))
    }
    // empty segments (`AC=1;`, `AC=1;;DP=3`) are skipped
    let (input, pairs) = separated_list0(char(';'), opt(info_pair))(input)?;
    Ok((input, pairs.into_iter().flatten().collect()))
}

fn sample_values(input: &str) -> Vec<Vec<&str>> {
    input.split(':').map(|v| v.split(',').collect()).collect()
}

pub(crate) fn record_line(line: &str) -> Result<RecordFields<'_>, String> {
    let (_, columns) = all_consuming(tab_separated)(line).map_err(describe)?;
    if columns.len() < FIXED_COLUMNS.len() {
        return Err(format!(
            "expected at least {} columns, found {}",
            FIXED_COLUMNS.len(),
            columns.len()
        ));
    }
    let pos: IResult<&str, u64> = all_consuming(map_res(digit1, str::parse::<u64>))(columns[1]);
    let (_, pos) = pos.map_err(|_| format!("invalid POS {:?}", columns[1]))?;
    let info = if columns[7] == MISSING {
        vec![]
    } else {
        all_consuming(info_pairs)(columns[7])
            .map_err(|_| format!("invalid INFO column {:?}", columns[7]))?
            .1
    };
    let (format, samples) = match columns.get(8) {
        Some(format) => (
            list(':', format),
            columns[9..].iter().map(|s| sample_values(s)).collect(),
        ),
        None => (vec![], vec![]),
    };
    Ok(RecordFields {
        chrom: columns[0],
        pos,
        id: columns[2],
        ref_allele: columns[3],
        alt_alleles: list(',', columns[4]),
        qual: columns[5],
        filters: list(';', columns[6]),
        info,
        has_format: columns.len() > FIXED_COLUMNS.len(),
        format,
        samples,
    })
}
