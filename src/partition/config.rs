//! Configuration for schedule partitioning.

use chrono::{Days, Months, NaiveDate};

/// Controls the horizon the partitioner covers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PartitionConfig {
    /// Length of the horizon in calendar months, counted from the
    /// reference date.
    pub horizon_months: u32,
}

impl PartitionConfig {
    /// Last day of the horizon: `reference + horizon_months − 1 day`.
    ///
    /// Saturates at the last representable date.
    pub fn horizon_end(&self, reference: NaiveDate) -> NaiveDate {
        reference
            .checked_add_months(Months::new(self.horizon_months))
            .and_then(|d| d.checked_sub_days(Days::new(1)))
            .unwrap_or(NaiveDate::MAX)
    }
}

impl Default for PartitionConfig {
    fn default() -> Self {
        Self { horizon_months: 12 }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn d(text: &str) -> NaiveDate {
        NaiveDate::parse_from_str(text, "%Y-%m-%d").unwrap()
    }

    #[test]
    fn default_horizon_is_one_year() {
        let cfg = PartitionConfig::default();
        assert_eq!(cfg.horizon_months, 12);
        assert_eq!(cfg.horizon_end(d("2018-04-01")), d("2019-03-31"));
    }

    #[test]
    fn horizon_across_leap_day() {
        let cfg = PartitionConfig::default();
        assert_eq!(cfg.horizon_end(d("2016-02-29")), d("2017-02-27"));
        assert_eq!(cfg.horizon_end(d("2016-01-01")), d("2016-12-31"));
    }

    #[test]
    fn custom_horizon() {
        let cfg = PartitionConfig { horizon_months: 3 };
        assert_eq!(cfg.horizon_end(d("2018-04-01")), d("2018-06-30"));
    }

    #[test]
    fn horizon_saturates() {
        let cfg = PartitionConfig::default();
        assert_eq!(cfg.horizon_end(NaiveDate::MAX), NaiveDate::MAX);
    }
}
