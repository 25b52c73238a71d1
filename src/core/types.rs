use serde::{Deserialize, Serialize};

use super::error::CalcError;

/// Upper limit on `years * payments_per_year` for a single schedule.
pub const MAX_TOTAL_PERIODS: u32 = 10_000;

/// A finite amount strictly greater than zero.
#[derive(Copy, Clone, Debug, PartialEq, PartialOrd, Serialize, Deserialize)]
#[serde(try_from = "f64", into = "f64")]
pub struct PositiveAmount(f64);

impl PositiveAmount {
    pub fn get(self) -> f64 {
        self.0
    }
}

impl TryFrom<f64> for PositiveAmount {
    type Error = CalcError;

    fn try_from(value: f64) -> Result<Self, Self::Error> {
        if value.is_finite() && value > 0.0 {
            Ok(Self(value))
        } else {
            Err(CalcError::invalid(format!(
                "slab upper bound must be a positive number, got {value}"
            )))
        }
    }
}

impl From<PositiveAmount> for f64 {
    fn from(value: PositiveAmount) -> Self {
        value.0
    }
}

/// One slab of a progressive tax table. `upper_bound: None` is the open-ended
/// top slab.
#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct TaxSlab {
    #[serde(rename = "upto", alias = "upper_bound", default)]
    pub upper_bound: Option<PositiveAmount>,
    #[serde(default)]
    pub rate: f64,
}

impl TaxSlab {
    pub fn bounded(upper_bound: f64, rate: f64) -> Result<Self, CalcError> {
        Ok(Self {
            upper_bound: Some(PositiveAmount::try_from(upper_bound)?),
            rate,
        })
    }

    pub fn unbounded(rate: f64) -> Self {
        Self {
            upper_bound: None,
            rate,
        }
    }

    pub fn cap(&self) -> f64 {
        self.upper_bound.map_or(f64::INFINITY, PositiveAmount::get)
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Serialize)]
pub struct TaxBand {
    pub band_from: f64,
    pub band_to: Option<f64>,
    pub taxable: f64,
    pub rate: f64,
    pub tax: f64,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct TaxComputation {
    pub tax_due: f64,
    pub breakdown: Vec<TaxBand>,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct TaxAssessment {
    pub tax_due: f64,
    pub breakdown: Vec<TaxBand>,
    pub annual_income: f64,
    pub deductions: f64,
    pub taxable_income: f64,
    pub effective_rate_pct: f64,
}

#[derive(Copy, Clone, Debug, PartialEq)]
pub struct LoanTerms {
    pub principal: f64,
    pub annual_rate_pct: f64,
    pub years: f64,
    pub payments_per_year: u32,
}

impl LoanTerms {
    pub fn validate(&self) -> Result<(), CalcError> {
        if !self.principal.is_finite() || self.principal <= 0.0 {
            return Err(CalcError::invalid("principal must be > 0"));
        }
        if !self.annual_rate_pct.is_finite() || self.annual_rate_pct < 0.0 {
            return Err(CalcError::invalid("annual_rate_pct must be >= 0"));
        }
        if !self.years.is_finite() || self.years <= 0.0 {
            return Err(CalcError::invalid("years must be > 0"));
        }
        if self.payments_per_year == 0 {
            return Err(CalcError::invalid("payments_per_year must be >= 1"));
        }

        let periods = self.years * f64::from(self.payments_per_year);
        if periods.round_ties_even() < 1.0 {
            return Err(CalcError::invalid(
                "loan term must cover at least one payment period",
            ));
        }
        if periods.round_ties_even() > f64::from(MAX_TOTAL_PERIODS) {
            return Err(CalcError::invalid(format!(
                "loan term must not exceed {MAX_TOTAL_PERIODS} payment periods"
            )));
        }
        Ok(())
    }

    /// Scheduled number of payments, `years * payments_per_year` rounded
    /// half to even.
    pub fn total_periods(&self) -> u32 {
        (self.years * f64::from(self.payments_per_year)).round_ties_even() as u32
    }

    pub fn period_rate(&self) -> f64 {
        self.annual_rate_pct / 100.0 / f64::from(self.payments_per_year)
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Serialize)]
pub struct ScheduleEntry {
    pub period: u32,
    pub payment: f64,
    pub principal_paid: f64,
    pub interest_paid: f64,
    pub remaining_balance: f64,
}

/// `payment` is the last payment actually made. When the final period is
/// clamped to the outstanding balance it can differ from the nominal
/// annuity payment by a few cents.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct AmortizationSchedule {
    pub periods: u32,
    pub payment: f64,
    pub total_interest: f64,
    pub schedule: Vec<ScheduleEntry>,
}

#[derive(Copy, Clone, Debug, PartialEq)]
pub struct PrepayScenario {
    pub loan: LoanTerms,
    pub extra_monthly: f64,
    pub invest_rate_pct: f64,
    /// Accepted for interface compatibility; no calculation reads it yet.
    pub inflation_pct: f64,
}

impl PrepayScenario {
    pub fn validate(&self) -> Result<(), CalcError> {
        self.loan.validate()?;
        for (name, value) in [
            ("extra_monthly", self.extra_monthly),
            ("invest_rate_pct", self.invest_rate_pct),
            ("inflation_pct", self.inflation_pct),
        ] {
            if !value.is_finite() || value < 0.0 {
                return Err(CalcError::invalid(format!("{name} must be >= 0")));
            }
        }
        Ok(())
    }
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct ExtraPaymentSummary {
    pub payment: f64,
    pub payoff_periods: u32,
    pub total_interest: f64,
    pub schedule_sample: Vec<ScheduleEntry>,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct PrepayComparison {
    pub base: AmortizationSchedule,
    pub with_extra: ExtraPaymentSummary,
    pub payoff_months_equivalent: f64,
    pub interest_saved: f64,
    pub invest_future_value_of_extra: f64,
    pub advice: &'static str,
}
