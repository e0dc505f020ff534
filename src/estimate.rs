//! Glue between a stored [`Profile`], caller overrides and the pure core.

use chrono::{DateTime, Utc};
use clap::Args;
use serde::{Deserialize, Serialize};

use crate::core::{
    AccrualClock, IncomeSchedule, LifeStyle, Profile, SimulationInput, YearTraceRow,
    format_abbr_money, format_money, format_years, run_yearly_trace, salary_per_second,
    supported_years,
};

/// Profile fields a caller may replace for one run or persist.
#[derive(Args, Debug, Clone, Default, PartialEq)]
pub struct ProfileOverrides {
    #[arg(long, help = "Savings at the accrual epoch")]
    pub deposit: Option<f64>,
    #[arg(long, help = "Annual income")]
    pub annual_income: Option<f64>,
    #[arg(long, help = "Yearly living cost of the active life style")]
    pub year_cost: Option<f64>,
    #[arg(long, help = "Annual interest rate in percent, e.g. 4")]
    pub interest_rate: Option<f64>,
    #[arg(long, help = "Annual inflation rate in percent, e.g. 2.229")]
    pub inflation_rate: Option<f64>,
    #[arg(long, help = "Description of the active life style")]
    pub desc: Option<String>,
}

impl ProfileOverrides {
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }

    pub fn apply(&self, profile: &mut Profile) {
        if let Some(deposit) = self.deposit {
            profile.deposit = deposit;
        }
        if let Some(annual_income) = self.annual_income {
            profile.annual_income = annual_income;
        }

        let mut life_style = profile.active_life_style();
        if let Some(desc) = &self.desc {
            life_style.desc = desc.clone();
        }
        if let Some(year_cost) = self.year_cost {
            life_style.year_cost = year_cost;
        }
        if self.interest_rate.is_some() {
            life_style.interest_rate = self.interest_rate;
        }
        if self.inflation_rate.is_some() {
            life_style.inflation_rate = self.inflation_rate;
        }
        profile.set_active_life_style(life_style);
    }
}

#[derive(Args, Debug, Clone, Default)]
pub struct EstimateOverrides {
    #[command(flatten)]
    pub profile: ProfileOverrides,
    #[arg(long, help = "First simulated year, defaults to the accrual epoch's year")]
    pub start_year: Option<i32>,
    #[arg(
        long,
        help = "Use the deposit as-is instead of adding salary accrued since the epoch"
    )]
    pub no_accrual: bool,
}

/// Flat wire form of [`EstimateOverrides`] for query strings and JSON bodies.
#[derive(Debug, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct EstimatePayload {
    pub deposit: Option<f64>,
    pub annual_income: Option<f64>,
    pub year_cost: Option<f64>,
    pub interest_rate: Option<f64>,
    pub inflation_rate: Option<f64>,
    pub desc: Option<String>,
    pub start_year: Option<i32>,
    pub no_accrual: bool,
}

impl From<EstimatePayload> for EstimateOverrides {
    fn from(payload: EstimatePayload) -> Self {
        Self {
            profile: ProfileOverrides {
                deposit: payload.deposit,
                annual_income: payload.annual_income,
                year_cost: payload.year_cost,
                interest_rate: payload.interest_rate,
                inflation_rate: payload.inflation_rate,
                desc: payload.desc,
            },
            start_year: payload.start_year,
            no_accrual: payload.no_accrual,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct EstimateRequest {
    pub deposit: f64,
    pub annual_income: f64,
    pub life_style: LifeStyle,
    pub start_year: i32,
    pub accrue: bool,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Estimate {
    pub start_year: i32,
    pub current_deposit: f64,
    pub salary_per_second: f64,
    pub support_years: f64,
    pub deposit_display: String,
    pub deposit_abbr_display: String,
    pub support_years_display: String,
    pub life_style: LifeStyle,
    pub years: Vec<YearTraceRow>,
}

pub fn validate_profile(profile: &Profile) -> Result<(), String> {
    if !profile.deposit.is_finite() || profile.deposit < 0.0 {
        return Err("deposit must be a finite amount >= 0".to_string());
    }
    if !profile.annual_income.is_finite() || profile.annual_income < 0.0 {
        return Err("annualIncome must be a finite amount >= 0".to_string());
    }
    for life_style in &profile.life_styles {
        validate_life_style(life_style)?;
    }
    Ok(())
}

fn validate_life_style(life_style: &LifeStyle) -> Result<(), String> {
    if !life_style.year_cost.is_finite() || life_style.year_cost < 0.0 {
        return Err("yearCost must be a finite amount >= 0".to_string());
    }
    for (name, rate) in [
        ("interestRate", life_style.interest_percent()),
        ("inflationRate", life_style.inflation_percent()),
    ] {
        if !rate.is_finite() || rate <= -100.0 {
            return Err(format!("{name} must be a finite percentage > -100"));
        }
    }
    Ok(())
}

pub fn build_request(
    profile: &Profile,
    overrides: &EstimateOverrides,
    clock: &AccrualClock,
) -> Result<EstimateRequest, String> {
    let mut profile = profile.clone();
    overrides.profile.apply(&mut profile);
    validate_profile(&profile)?;

    Ok(EstimateRequest {
        deposit: profile.deposit,
        annual_income: profile.annual_income,
        life_style: profile.active_life_style(),
        start_year: overrides.start_year.unwrap_or_else(|| clock.start_year()),
        accrue: !overrides.no_accrual,
    })
}

pub fn build_estimate(
    request: &EstimateRequest,
    clock: &AccrualClock,
    schedule: &IncomeSchedule,
    now: DateTime<Utc>,
) -> Estimate {
    let current_deposit = if request.accrue {
        clock.current_principal(request.deposit, request.annual_income, now)
    } else {
        request.deposit
    };
    let input = SimulationInput::from_life_style(
        current_deposit,
        request.annual_income,
        &request.life_style,
        request.start_year,
    );

    let support_years = supported_years(&input, schedule);
    let years = if input.annual_cost > 0.0 {
        run_yearly_trace(&input, schedule)
    } else {
        Vec::new()
    };

    Estimate {
        start_year: request.start_year,
        current_deposit,
        salary_per_second: salary_per_second(request.annual_income),
        support_years,
        deposit_display: format_money(current_deposit),
        deposit_abbr_display: format_abbr_money(current_deposit),
        support_years_display: format_years(support_years),
        life_style: request.life_style.clone(),
        years,
    }
}
