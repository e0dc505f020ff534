use serde::{Deserialize, Serialize};

pub const DEFAULT_DEPOSIT: f64 = 100_000.0;
pub const DEFAULT_ANNUAL_INCOME: f64 = 120_000.0;
pub const DEFAULT_YEAR_COST: f64 = 60_000.0;
pub const DEFAULT_INTEREST_PERCENT: f64 = 4.0;
pub const DEFAULT_INFLATION_PERCENT: f64 = 2.229;
pub const DEFAULT_LIFE_STYLE_DESC: &str = "Standard lifestyle";

/// Year from which income is pinned to [`POLICY_FIXED_INCOME`].
pub const POLICY_CUTOFF_YEAR: i32 = 2035;
pub const POLICY_FIXED_INCOME: f64 = 50_000.0;

/// Numbers fed into one depletion run. Rates are fractions (0.04 == 4%).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SimulationInput {
    pub principal: f64,
    pub annual_income: f64,
    pub annual_cost: f64,
    pub interest_rate: f64,
    pub inflation_rate: f64,
    pub start_year: i32,
}

impl SimulationInput {
    pub fn from_life_style(
        principal: f64,
        annual_income: f64,
        life_style: &LifeStyle,
        start_year: i32,
    ) -> Self {
        Self {
            principal,
            annual_income,
            annual_cost: life_style.year_cost,
            interest_rate: life_style.interest_fraction(),
            inflation_rate: life_style.inflation_fraction(),
            start_year,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IncomeOverride {
    pub effective_year: i32,
    pub fixed_income: f64,
}

/// Years from which the configured income is replaced by a fixed amount.
///
/// Overrides are kept sorted by `effective_year`; the latest one that has
/// taken effect wins.
#[derive(Debug, Clone, PartialEq)]
pub struct IncomeSchedule {
    overrides: Vec<IncomeOverride>,
}

impl IncomeSchedule {
    pub fn new(mut overrides: Vec<IncomeOverride>) -> Self {
        overrides.sort_by_key(|o| o.effective_year);
        Self { overrides }
    }

    pub fn none() -> Self {
        Self {
            overrides: Vec::new(),
        }
    }

    pub fn overrides(&self) -> &[IncomeOverride] {
        &self.overrides
    }

    pub fn income_for(&self, year: i32, configured: f64) -> f64 {
        self.overrides
            .iter()
            .rev()
            .find(|o| year >= o.effective_year)
            .map_or(configured, |o| o.fixed_income)
    }
}

impl Default for IncomeSchedule {
    fn default() -> Self {
        Self::new(vec![IncomeOverride {
            effective_year: POLICY_CUTOFF_YEAR,
            fixed_income: POLICY_FIXED_INCOME,
        }])
    }
}

/// A spending profile. Rates are stored as percentages.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LifeStyle {
    #[serde(default)]
    pub desc: String,
    pub year_cost: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub interest_rate: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub inflation_rate: Option<f64>,
}

impl LifeStyle {
    pub fn interest_percent(&self) -> f64 {
        self.interest_rate.unwrap_or(DEFAULT_INTEREST_PERCENT)
    }

    pub fn inflation_percent(&self) -> f64 {
        self.inflation_rate.unwrap_or(DEFAULT_INFLATION_PERCENT)
    }

    pub fn interest_fraction(&self) -> f64 {
        self.interest_percent() / 100.0
    }

    pub fn inflation_fraction(&self) -> f64 {
        self.inflation_percent() / 100.0
    }
}

impl Default for LifeStyle {
    fn default() -> Self {
        Self {
            desc: DEFAULT_LIFE_STYLE_DESC.to_string(),
            year_cost: DEFAULT_YEAR_COST,
            interest_rate: Some(DEFAULT_INTEREST_PERCENT),
            inflation_rate: Some(DEFAULT_INFLATION_PERCENT),
        }
    }
}

/// Persisted user settings: `{"deposit", "annualIncome", "lifeStyles"}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Profile {
    pub deposit: f64,
    pub annual_income: f64,
    pub life_styles: Vec<LifeStyle>,
}

impl Profile {
    pub fn active_life_style(&self) -> LifeStyle {
        self.life_styles.first().cloned().unwrap_or_default()
    }

    /// Replaces the active (first) life style, keeping any others.
    pub fn set_active_life_style(&mut self, life_style: LifeStyle) {
        match self.life_styles.first_mut() {
            Some(active) => *active = life_style,
            None => self.life_styles.push(life_style),
        }
    }
}

impl Default for Profile {
    fn default() -> Self {
        Self {
            deposit: DEFAULT_DEPOSIT,
            annual_income: DEFAULT_ANNUAL_INCOME,
            life_styles: vec![LifeStyle::default()],
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct YearTraceRow {
    pub year: i32,
    pub income: f64,
    pub cost: f64,
    pub start_balance: f64,
    pub end_balance: f64,
    pub years_elapsed: f64,
}
