use chrono::{DateTime, Datelike, FixedOffset, Utc};

pub const DEFAULT_ACCRUAL_EPOCH: &str = "2024-07-07T00:00:00+08:00";

const SECONDS_PER_YEAR: f64 = 365.0 * 24.0 * 60.0 * 60.0;

/// Salary accrues continuously from a fixed instant; the stored deposit is
/// the balance at that instant.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AccrualClock {
    epoch: DateTime<FixedOffset>,
}

impl AccrualClock {
    pub fn new(epoch: DateTime<FixedOffset>) -> Self {
        Self { epoch }
    }

    pub fn parse(rfc3339: &str) -> Result<Self, chrono::ParseError> {
        DateTime::parse_from_rfc3339(rfc3339).map(Self::new)
    }

    pub fn epoch(&self) -> DateTime<FixedOffset> {
        self.epoch
    }

    /// Calendar year of the epoch in its own offset; the first simulated year.
    pub fn start_year(&self) -> i32 {
        self.epoch.year()
    }

    pub fn elapsed_seconds(&self, now: DateTime<Utc>) -> f64 {
        let elapsed = now.signed_duration_since(self.epoch.with_timezone(&Utc));
        (elapsed.num_milliseconds() as f64 / 1000.0).max(0.0)
    }

    pub fn current_principal(&self, deposit: f64, annual_income: f64, now: DateTime<Utc>) -> f64 {
        deposit + salary_per_second(annual_income) * self.elapsed_seconds(now)
    }
}

pub fn salary_per_second(annual_income: f64) -> f64 {
    annual_income / SECONDS_PER_YEAR
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn clock() -> AccrualClock {
        AccrualClock::parse(DEFAULT_ACCRUAL_EPOCH).expect("valid epoch")
    }

    #[test]
    fn default_epoch_starts_in_2024() {
        let clock = clock();
        assert_eq!(clock.start_year(), 2024);
        assert_eq!(
            clock.epoch().with_timezone(&Utc),
            Utc.with_ymd_and_hms(2024, 7, 6, 16, 0, 0).unwrap()
        );
    }

    #[test]
    fn start_year_uses_epoch_offset() {
        let clock = AccrualClock::parse("2025-01-01T00:30:00+08:00").expect("valid epoch");
        assert_eq!(clock.start_year(), 2025);
    }

    #[test]
    fn salary_per_second_spreads_income_over_365_days() {
        assert!((salary_per_second(31_536_000.0) - 1.0).abs() < 1e-12);
        assert_eq!(salary_per_second(0.0), 0.0);
    }

    #[test]
    fn elapsed_seconds_is_clamped_before_epoch() {
        let clock = clock();
        let before = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
        assert_eq!(clock.elapsed_seconds(before), 0.0);
        assert_eq!(clock.current_principal(100_000.0, 120_000.0, before), 100_000.0);
    }

    #[test]
    fn principal_grows_with_elapsed_time() {
        let clock = clock();
        let one_day_later = Utc.with_ymd_and_hms(2024, 7, 7, 16, 0, 0).unwrap();
        assert_eq!(clock.elapsed_seconds(one_day_later), 86_400.0);

        let principal = clock.current_principal(1_000.0, 365_000.0, one_day_later);
        assert!((principal - 2_000.0).abs() < 1e-6, "got {principal}");
    }

    #[test]
    fn parse_rejects_malformed_epoch() {
        assert!(AccrualClock::parse("next tuesday").is_err());
    }
}
