use tracing::debug;

use super::error::{BreakevenError, BreakevenResult};
use super::types::{
    AdjustedBenefit, BreakevenReport, CumulativeSeries, FULL_RETIREMENT_AGE, Parameters, Strategy,
};

const MONTHS_PER_YEAR: u32 = 12;
const TIER_ONE_MONTHS: i64 = 36;
const TIER_ONE_REDUCTION_PER_MONTH: f64 = 5.0 / 9.0 / 100.0;
const TIER_TWO_REDUCTION_PER_MONTH: f64 = 5.0 / 12.0 / 100.0;
const DELAYED_CREDIT_PER_MONTH: f64 = 2.0 / 3.0 / 100.0;

pub fn compute_breakeven(params: &Parameters) -> BreakevenResult<BreakevenReport> {
    if params.early_age >= params.late_age {
        return Err(BreakevenError::AgeOrder {
            early_age: params.early_age,
            late_age: params.late_age,
        });
    }

    let start_age = params.start_age();
    let [early_benefit, late_benefit] = Strategy::ALL.map(|strategy| {
        let claiming_age = params.claiming_age(strategy);
        AdjustedBenefit {
            claiming_age,
            monthly_amount: adjust_benefit(params.benefit_at_fra, claiming_age),
        }
    });
    debug!(
        early_age = params.early_age,
        early_monthly = early_benefit.monthly_amount,
        late_age = params.late_age,
        late_monthly = late_benefit.monthly_amount,
        "adjusted benefits"
    );

    let series = CumulativeSeries {
        start_age,
        early: accumulate(
            early_benefit.monthly_amount,
            params.early_age,
            start_age,
            params.max_age,
            params.annual_return_rate,
        ),
        late: accumulate(
            late_benefit.monthly_amount,
            params.late_age,
            start_age,
            params.max_age,
            params.annual_return_rate,
        ),
    };

    let breakeven_age = detect(&series.early, &series.late, params.early_age, params.late_age);
    debug!(?breakeven_age, max_age = params.max_age, "breakeven scan finished");

    Ok(BreakevenReport {
        parameters: *params,
        early_benefit,
        late_benefit,
        series,
        breakeven_age,
    })
}

/// Monthly benefit payable when claiming at `claiming_age`, given the
/// benefit at full retirement age.
pub fn adjust_benefit(benefit_fra: f64, claiming_age: u32) -> f64 {
    let fra_months = i64::from(FULL_RETIREMENT_AGE * MONTHS_PER_YEAR);
    let claiming_months = i64::from(claiming_age) * i64::from(MONTHS_PER_YEAR);
    let months_diff = claiming_months - fra_months;

    if months_diff < 0 {
        let reduction = if months_diff >= -TIER_ONE_MONTHS {
            months_diff as f64 * TIER_ONE_REDUCTION_PER_MONTH
        } else {
            (-TIER_ONE_MONTHS as f64 * TIER_ONE_REDUCTION_PER_MONTH)
                + ((months_diff + TIER_ONE_MONTHS) as f64 * TIER_TWO_REDUCTION_PER_MONTH)
        };
        benefit_fra * (1.0 + reduction)
    } else if months_diff > 0 {
        let increase = months_diff as f64 * DELAYED_CREDIT_PER_MONTH;
        benefit_fra * (1.0 + increase)
    } else {
        benefit_fra
    }
}

pub fn monthly_return(annual_return: f64) -> f64 {
    (1.0 + annual_return).powf(1.0 / f64::from(MONTHS_PER_YEAR)) - 1.0
}

/// Year-end cumulative values from `start_age` to `max_age` inclusive.
/// Years before `claiming_age` report 0.
pub fn accumulate(
    adjusted_benefit: f64,
    claiming_age: u32,
    start_age: u32,
    max_age: u32,
    annual_return: f64,
) -> Vec<f64> {
    if max_age < start_age {
        return Vec::new();
    }

    let growth = 1.0 + monthly_return(annual_return);
    let mut cumulative = 0.0;
    let mut values = Vec::with_capacity((max_age - start_age + 1) as usize);
    for age in start_age..=max_age {
        if age < claiming_age {
            values.push(0.0);
            continue;
        }
        for _ in 0..MONTHS_PER_YEAR {
            cumulative += adjusted_benefit;
            cumulative *= growth;
        }
        values.push(cumulative);
    }
    values
}

/// First age from `late_age` onward at which the late series strictly
/// exceeds the early one. Both series start at `min(early_age, late_age)`.
pub fn detect(early: &[f64], late: &[f64], early_age: u32, late_age: u32) -> Option<u32> {
    let start_age = early_age.min(late_age);
    let first = late_age.abs_diff(early_age) as usize;
    let len = early.len().min(late.len());

    (first..len)
        .find(|&idx| late[idx] > early[idx])
        .map(|idx| start_age + idx as u32)
}
