use super::types::{IncomeSchedule, SimulationInput, YearTraceRow};

/// Hard stop for the forward projection; a balance that survives this many
/// years is reported as exactly this many.
pub const MAX_SIMULATED_YEARS: u32 = 200;

/// Years (fractional) until the balance is exhausted, using the default
/// income schedule.
pub fn simulate_years(input: &SimulationInput) -> f64 {
    simulate_years_with_schedule(input, &IncomeSchedule::default())
}

pub fn simulate_years_with_schedule(input: &SimulationInput, schedule: &IncomeSchedule) -> f64 {
    project_balance(input, schedule, |_| {})
}

/// Guarded entry point for hosting code: a non-positive yearly cost never
/// depletes anything, so it is reported as 0 years without simulating.
pub fn supported_years(input: &SimulationInput, schedule: &IncomeSchedule) -> f64 {
    if input.annual_cost.is_nan() || input.annual_cost <= 0.0 {
        return 0.0;
    }
    simulate_years_with_schedule(input, schedule)
}

/// Same projection as [`simulate_years_with_schedule`], keeping one row per
/// simulated year. The final row of a depleted run has a negative
/// `end_balance` and carries the prorated total in `years_elapsed`.
pub fn run_yearly_trace(input: &SimulationInput, schedule: &IncomeSchedule) -> Vec<YearTraceRow> {
    let mut rows = Vec::new();
    project_balance(input, schedule, |row| rows.push(row));
    rows
}

fn project_balance(
    input: &SimulationInput,
    schedule: &IncomeSchedule,
    mut on_year: impl FnMut(YearTraceRow),
) -> f64 {
    let mut years = 0.0;
    let mut completed = 0;
    let mut money = input.principal;
    let mut cost = input.annual_cost;
    let mut year = input.start_year;

    while money > 0.0 && completed < MAX_SIMULATED_YEARS {
        let start_balance = money;
        let income = schedule.income_for(year, input.annual_income);

        money += income;
        money *= 1.0 + input.interest_rate;
        money -= cost;

        if money < 0.0 {
            // Final year: the shortfall relative to that year's cost.
            years += money / -cost;
            on_year(YearTraceRow {
                year,
                income,
                cost,
                start_balance,
                end_balance: money,
                years_elapsed: years,
            });
            break;
        }

        years += 1.0;
        completed += 1;
        on_year(YearTraceRow {
            year,
            income,
            cost,
            start_balance,
            end_balance: money,
            years_elapsed: years,
        });

        cost *= 1.0 + input.inflation_rate;
        year = year.saturating_add(1);
    }

    years
}
