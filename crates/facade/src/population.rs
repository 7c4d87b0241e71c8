//! Synthetic census population for demos and end-to-end tests.

use rand::distributions::WeightedIndex;
use rand::Rng;
use rand_distr::{Distribution, LogNormal, Normal};

use census_dp_core::{AxisLabels, CountTable, DpError, Result};

use crate::tabulate::{crosstab, Categorical};

/// Occupation categories with their sampling weights.
pub const OCCUPATIONS: [(&str, f64); 5] = [
    ("service", 0.35),
    ("professional", 0.30),
    ("trades", 0.20),
    ("agriculture", 0.12),
    ("military", 0.03),
];

/// Sex categories.
pub const SEXES: [&str; 2] = ["female", "male"];

/// Age bands used for tabulation.
pub const AGE_BANDS: [&str; 4] = ["18-29", "30-44", "45-64", "65+"];

const AGE_MEAN: f64 = 42.0;
const AGE_STD: f64 = 13.0;
const AGE_RANGE: (f64, f64) = (18.0, 90.0);

const INCOME_LOG_MEAN: f64 = 10.6;
const INCOME_LOG_STD: f64 = 0.55;
const INCOME_RANGE: (f64, f64) = (5_000.0, 400_000.0);
const MAX_REJECTIONS: usize = 64;

/// One synthetic person.
#[derive(Clone, Debug, PartialEq)]
pub struct Person {
    /// Occupation category.
    pub occupation: &'static str,
    /// Sex category.
    pub sex: &'static str,
    /// Age in whole years.
    pub age: u32,
    /// Annual income.
    pub income: f64,
}

impl Person {
    /// Age band label for this person.
    pub fn age_band(&self) -> &'static str {
        match self.age {
            0..=29 => AGE_BANDS[0],
            30..=44 => AGE_BANDS[1],
            45..=64 => AGE_BANDS[2],
            _ => AGE_BANDS[3],
        }
    }
}

impl Categorical for Person {
    fn category(&self, axis: &str) -> Option<&str> {
        match axis {
            "occupation" => Some(self.occupation),
            "sex" => Some(self.sex),
            "age_band" => Some(self.age_band()),
            _ => None,
        }
    }
}

/// Draw `n` people.
///
/// Occupation is categorical, sex uniform, age normal and clipped to
/// 18..=90, income log-normal truncated to its range by rejection.
pub fn synthetic_census<R: Rng + ?Sized>(n: usize, rng: &mut R) -> Result<Vec<Person>> {
    let occupation = WeightedIndex::new(OCCUPATIONS.iter().map(|(_, w)| *w))
        .map_err(|e| DpError::invalid(format!("occupation weights: {e}")))?;
    let age = Normal::new(AGE_MEAN, AGE_STD)
        .map_err(|e| DpError::invalid(format!("age distribution: {e}")))?;
    let income = LogNormal::new(INCOME_LOG_MEAN, INCOME_LOG_STD)
        .map_err(|e| DpError::invalid(format!("income distribution: {e}")))?;

    let people = (0..n)
        .map(|_| Person {
            occupation: OCCUPATIONS[occupation.sample(rng)].0,
            sex: SEXES[usize::from(rng.gen_bool(0.5))],
            age: age.sample(rng).round().clamp(AGE_RANGE.0, AGE_RANGE.1) as u32,
            income: truncated(&income, INCOME_RANGE, rng),
        })
        .collect();
    Ok(people)
}

fn truncated<D, R>(dist: &D, (lo, hi): (f64, f64), rng: &mut R) -> f64
where
    D: Distribution<f64>,
    R: Rng + ?Sized,
{
    for _ in 0..MAX_REJECTIONS {
        let v = dist.sample(rng);
        if (lo..=hi).contains(&v) {
            return v;
        }
    }
    // Rejection only fails with negligible probability; fall back to clipping.
    dist.sample(rng).clamp(lo, hi)
}

/// Occupation × sex axes.
pub fn occupation_by_sex() -> Vec<AxisLabels> {
    vec![
        AxisLabels::new("occupation", OCCUPATIONS.iter().map(|(name, _)| *name)),
        AxisLabels::new("sex", SEXES),
    ]
}

/// Age band × sex axes.
pub fn age_band_by_sex() -> Vec<AxisLabels> {
    vec![AxisLabels::new("age_band", AGE_BANDS), AxisLabels::new("sex", SEXES)]
}

/// Occupation × sex table of a population.
pub fn census_table(people: &[Person]) -> Result<CountTable> {
    crosstab(people, occupation_by_sex())
}
