use crate::error::{Error, Result};
use crate::record::{Record, VcfRecord};
use crate::types::MISSING;

/// Collects the numeric value of `field` from every sample of `record`, in
/// header order.
///
/// Samples without the field, or with the missing value `.`, are skipped.
/// A sample holding more than one value, or a value that is not a number,
/// is an error.
pub fn extract(record: &VcfRecord, field: &str) -> Result<Vec<f64>> {
    let mut values = Vec::with_capacity(record.samples.len());
    for (sample, fields) in record.samples() {
        let raw = match fields.get(field) {
            Some(raw) => raw,
            None => continue,
        };
        match raw.as_slice() {
            [] => continue,
            [value] if value == MISSING => continue,
            [value] => {
                let value = value.parse::<f64>().map_err(|_| Error::NumericParse {
                    field: field.to_owned(),
                    sample: sample.clone(),
                    value: value.clone(),
                })?;
                values.push(value);
            }
            _ => {
                return Err(Error::MultiValueField {
                    field: field.to_owned(),
                    sample: sample.clone(),
                    chrom: record.chrom().to_owned(),
                    pos: record.pos(),
                    count: raw.len(),
                })
            }
        }
    }
    Ok(values)
}
