//! Reducers from the per-sample values of one record to a single number.

use std::cmp::Ordering;
use std::str::FromStr;

use strum::{Display, EnumIter, EnumString};

use crate::error::{Error, Result};

#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumString, EnumIter, Display)]
pub enum Statistic {
    #[strum(to_string = "mean", serialize = "average")]
    Mean,
    #[strum(to_string = "median")]
    Median,
    #[strum(to_string = "min")]
    Min,
    #[strum(to_string = "max")]
    Max,
}

impl Default for Statistic {
    fn default() -> Self {
        Statistic::Mean
    }
}

impl Statistic {
    pub fn parse(name: &str) -> Result<Self> {
        Statistic::from_str(name).map_err(|_| Error::UnknownStatistic(name.to_owned()))
    }

    /// `None` iff `values` is empty. `values` may be reordered.
    pub fn reduce(self, values: &mut [f64]) -> Option<f64> {
        match self {
            Statistic::Mean => mean(values),
            Statistic::Median => median(values),
            Statistic::Min => min(values),
            Statistic::Max => max(values),
        }
    }
}

pub fn mean(values: &[f64]) -> Option<f64> {
    if values.is_empty() {
        return None;
    }
    let sum: f64 = values.iter().sum();
    Some(sum / values.len() as f64)
}

/// Element of 0-based rank `n / 2`. For an even count that is the upper of the
/// two central values; they are never averaged.
pub fn median(values: &mut [f64]) -> Option<f64> {
    if values.is_empty() {
        return None;
    }
    let n = values.len() / 2;
    let (_, nth, _) = values.select_nth_unstable_by(n, cmp);
    Some(*nth)
}

pub fn min(values: &[f64]) -> Option<f64> {
    values.iter().copied().min_by(cmp)
}

pub fn max(values: &[f64]) -> Option<f64> {
    values.iter().copied().max_by(cmp)
}

fn cmp(a: &f64, b: &f64) -> Ordering {
    a.partial_cmp(b).unwrap_or(Ordering::Equal)
}

#[cfg(test)]
mod test {
    use super::*;
    use strum::IntoEnumIterator;

    #[test]
    fn test_parse() {
        assert_eq!(Statistic::parse("mean").unwrap(), Statistic::Mean);
        assert_eq!(Statistic::parse("average").unwrap(), Statistic::Mean);
        assert_eq!(Statistic::parse("median").unwrap(), Statistic::Median);
        assert_eq!(Statistic::parse("min").unwrap(), Statistic::Min);
        assert_eq!(Statistic::parse("max").unwrap(), Statistic::Max);
        assert!(matches!(
            Statistic::parse("mode"),
            Err(Error::UnknownStatistic(name)) if name == "mode"
        ));
        assert_eq!(Statistic::default(), Statistic::Mean);
    }

    #[test]
    fn test_display_roundtrips() {
        for statistic in Statistic::iter() {
            assert_eq!(Statistic::parse(&statistic.to_string()).unwrap(), statistic);
        }
        assert_eq!(Statistic::Mean.to_string(), "mean");
    }

    #[test]
    fn test_mean() {
        assert_eq!(mean(&[2.0, 4.0]), Some(3.0));
        assert_eq!(mean(&[1.0, 2.0, 4.0]), Some(7.0 / 3.0));
        assert_eq!(mean(&[-5.0]), Some(-5.0));
    }

    #[test]
    fn test_median_odd() {
        assert_eq!(median(&mut [30.0, 10.0, 20.0]), Some(20.0));
    }

    #[test]
    fn test_median_even_takes_rank_half() {
        assert_eq!(median(&mut [40.0, 10.0, 30.0, 20.0]), Some(30.0));
        assert_eq!(median(&mut [1.0, 2.0]), Some(2.0));
    }

    #[test]
    fn test_median_matches_full_sort() {
        let values = [7.5, -1.0, 3.0, 3.0, 12.0, 0.25, 9.0, -4.5];
        for len in 1..=values.len() {
            let mut sorted = values[..len].to_vec();
            sorted.sort_by(cmp);
            let mut scratch = values[..len].to_vec();
            assert_eq!(median(&mut scratch), Some(sorted[len / 2]));
        }
    }

    #[test]
    fn test_min_max() {
        let values = [3.0, -2.5, 8.0, 0.0];
        assert_eq!(min(&values), Some(-2.5));
        assert_eq!(max(&values), Some(8.0));
    }

    #[test]
    fn test_empty_is_none() {
        for statistic in Statistic::iter() {
            assert_eq!(statistic.reduce(&mut []), None);
        }
    }
}
