use std::path::PathBuf;

use anyhow::Context;
use clap::Args;

use crate::core::{AccrualClock, DEFAULT_ACCRUAL_EPOCH, IncomeOverride, IncomeSchedule};
use crate::store::JsonFileStore;

/// Process-wide options shared by every subcommand.
#[derive(Args, Debug, Clone)]
pub struct GlobalArgs {
    #[arg(
        long,
        global = true,
        env = "CARROT_CONFIG",
        help = "Profile JSON file, defaults to <config dir>/carrot/config.json"
    )]
    pub config: Option<PathBuf>,
    #[arg(
        long,
        global = true,
        env = "CARROT_ACCRUAL_EPOCH",
        default_value = DEFAULT_ACCRUAL_EPOCH,
        help = "RFC 3339 instant the stored deposit refers to"
    )]
    pub accrual_epoch: String,
    #[arg(
        long = "income-override",
        global = true,
        value_parser = parse_income_override,
        help = "Fixed income from a year on, as YEAR:AMOUNT (repeatable); replaces the default 2035:50000"
    )]
    pub income_overrides: Vec<IncomeOverride>,
    #[arg(
        long,
        global = true,
        conflicts_with = "income_overrides",
        help = "Always use the configured income"
    )]
    pub no_income_policy: bool,
}

#[derive(Debug, Clone)]
pub struct Settings {
    pub config_path: PathBuf,
    pub clock: AccrualClock,
    pub schedule: IncomeSchedule,
}

impl Settings {
    pub fn from_args(args: &GlobalArgs) -> anyhow::Result<Self> {
        let clock = AccrualClock::parse(&args.accrual_epoch)
            .with_context(|| format!("invalid --accrual-epoch {:?}", args.accrual_epoch))?;

        let schedule = if args.no_income_policy {
            IncomeSchedule::none()
        } else if args.income_overrides.is_empty() {
            IncomeSchedule::default()
        } else {
            IncomeSchedule::new(args.income_overrides.clone())
        };

        Ok(Self {
            config_path: args
                .config
                .clone()
                .unwrap_or_else(JsonFileStore::default_path),
            clock,
            schedule,
        })
    }
}

fn parse_income_override(raw: &str) -> Result<IncomeOverride, String> {
    let (year, amount) = raw
        .split_once(':')
        .ok_or_else(|| format!("expected YEAR:AMOUNT, got {raw:?}"))?;
    let effective_year = year
        .trim()
        .parse::<i32>()
        .map_err(|e| format!("invalid year {year:?}: {e}"))?;
    let fixed_income = amount
        .trim()
        .parse::<f64>()
        .map_err(|e| format!("invalid amount {amount:?}: {e}"))?;
    if !fixed_income.is_finite() {
        return Err(format!("amount must be finite, got {amount:?}"));
    }
    Ok(IncomeOverride {
        effective_year,
        fixed_income,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{POLICY_CUTOFF_YEAR, POLICY_FIXED_INCOME};

    fn args() -> GlobalArgs {
        GlobalArgs {
            config: Some(PathBuf::from("/tmp/carrot-test.json")),
            accrual_epoch: DEFAULT_ACCRUAL_EPOCH.to_string(),
            income_overrides: Vec::new(),
            no_income_policy: false,
        }
    }

    #[test]
    fn parse_income_override_accepts_year_and_amount() {
        let parsed = parse_income_override("2040: 30000.5").expect("valid");
        assert_eq!(parsed.effective_year, 2040);
        assert_eq!(parsed.fixed_income, 30_000.5);
    }

    #[test]
    fn parse_income_override_rejects_malformed_input() {
        assert!(parse_income_override("2040").is_err());
        assert!(parse_income_override("soon:100").is_err());
        assert!(parse_income_override("2040:lots").is_err());
        assert!(parse_income_override("2040:inf").is_err());
    }

    #[test]
    fn settings_default_to_cutoff_policy() {
        let settings = Settings::from_args(&args()).expect("valid settings");
        assert_eq!(settings.clock.start_year(), 2024);
        assert_eq!(settings.config_path, PathBuf::from("/tmp/carrot-test.json"));
        assert_eq!(
            settings.schedule.overrides(),
            &[IncomeOverride {
                effective_year: POLICY_CUTOFF_YEAR,
                fixed_income: POLICY_FIXED_INCOME,
            }]
        );
    }

    #[test]
    fn settings_honour_schedule_flags() {
        let mut custom = args();
        custom.income_overrides = vec![IncomeOverride {
            effective_year: 2050,
            fixed_income: 1.0,
        }];
        let settings = Settings::from_args(&custom).expect("valid settings");
        assert_eq!(settings.schedule.overrides()[0].effective_year, 2050);

        let mut disabled = args();
        disabled.no_income_policy = true;
        let settings = Settings::from_args(&disabled).expect("valid settings");
        assert!(settings.schedule.overrides().is_empty());
    }

    #[test]
    fn settings_reject_bad_epoch() {
        let mut bad = args();
        bad.accrual_epoch = "2024-07-07".to_string();
        let err = Settings::from_args(&bad).expect_err("must reject");
        assert!(err.to_string().contains("--accrual-epoch"));
    }
}
