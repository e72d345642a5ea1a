mod engine;
mod error;
mod types;

pub use engine::{accumulate, adjust_benefit, compute_breakeven, detect, monthly_return};
pub use error::{BreakevenError, BreakevenResult};
pub use types::{
    AdjustedBenefit, BreakevenReport, CumulativeSeries, FULL_RETIREMENT_AGE, Parameters,
    SeriesPoint, Strategy,
};
