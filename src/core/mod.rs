mod accrual;
mod engine;
mod format;
mod types;

pub use accrual::{AccrualClock, DEFAULT_ACCRUAL_EPOCH, salary_per_second};
pub use engine::{
    MAX_SIMULATED_YEARS, run_yearly_trace, simulate_years, simulate_years_with_schedule,
    supported_years,
};
pub use format::{changed_positions, format_abbr_money, format_money, format_years, to_fixed};
pub use types::{
    IncomeOverride, IncomeSchedule, LifeStyle, POLICY_CUTOFF_YEAR, POLICY_FIXED_INCOME, Profile,
    SimulationInput, YearTraceRow,
};
