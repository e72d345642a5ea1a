use serde::Serialize;

/// Full retirement age, in years.
pub const FULL_RETIREMENT_AGE: u32 = 67;

#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Strategy {
    Early,
    Late,
}

impl Strategy {
    pub const ALL: [Strategy; 2] = [Strategy::Early, Strategy::Late];
}

#[derive(Copy, Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Parameters {
    pub benefit_at_fra: f64,
    pub annual_return_rate: f64,
    pub early_age: u32,
    pub late_age: u32,
    pub max_age: u32,
}

impl Parameters {
    pub fn claiming_age(&self, strategy: Strategy) -> u32 {
        match strategy {
            Strategy::Early => self.early_age,
            Strategy::Late => self.late_age,
        }
    }

    /// First age on the shared series axis.
    pub fn start_age(&self) -> u32 {
        self.early_age.min(self.late_age)
    }

    pub fn label(&self, strategy: Strategy) -> String {
        format!("Claim at {}", self.claiming_age(strategy))
    }

    pub fn column_header(&self, strategy: Strategy) -> String {
        format!("Cumulative Benefit (Age {})", self.claiming_age(strategy))
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AdjustedBenefit {
    pub claiming_age: u32,
    pub monthly_amount: f64,
}

/// Yearly cumulative values for both strategies on a shared age axis.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CumulativeSeries {
    pub start_age: u32,
    pub early: Vec<f64>,
    pub late: Vec<f64>,
}

#[derive(Copy, Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SeriesPoint {
    pub age: u32,
    pub early: f64,
    pub late: f64,
}

impl CumulativeSeries {
    pub fn len(&self) -> usize {
        self.early.len().min(self.late.len())
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn values(&self, strategy: Strategy) -> &[f64] {
        match strategy {
            Strategy::Early => &self.early,
            Strategy::Late => &self.late,
        }
    }

    pub fn ages(&self) -> Vec<u32> {
        (0..self.len() as u32).map(|i| self.start_age + i).collect()
    }

    pub fn value_at(&self, strategy: Strategy, age: u32) -> Option<f64> {
        let idx = age.checked_sub(self.start_age)? as usize;
        self.values(strategy).get(idx).copied()
    }

    pub fn points(&self) -> impl Iterator<Item = SeriesPoint> + '_ {
        self.early
            .iter()
            .zip(&self.late)
            .enumerate()
            .map(|(i, (&early, &late))| SeriesPoint {
                age: self.start_age + i as u32,
                early,
                late,
            })
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BreakevenReport {
    pub parameters: Parameters,
    pub early_benefit: AdjustedBenefit,
    pub late_benefit: AdjustedBenefit,
    pub series: CumulativeSeries,
    pub breakeven_age: Option<u32>,
}

impl BreakevenReport {
    pub fn benefit(&self, strategy: Strategy) -> AdjustedBenefit {
        match strategy {
            Strategy::Early => self.early_benefit,
            Strategy::Late => self.late_benefit,
        }
    }

    pub fn summary(&self) -> String {
        match self.breakeven_age {
            Some(age) => format!("The breakeven age is approximately: {age}"),
            None => "Breakeven not reached by the maximum age considered.".to_string(),
        }
    }
}
