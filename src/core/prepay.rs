use super::amortization::amortization_schedule;
use super::error::CalcError;
use super::round_dp;
use super::types::{ExtraPaymentSummary, PrepayComparison, PrepayScenario, ScheduleEntry};

pub const PREPAY_ADVICE: &str = "Prepay if interest_saved (after tax) > expected after-tax investment return and you value guaranteed saving; invest if you prefer liquidity and higher expected returns.";

/// Number of leading periods of the accelerated schedule included in a comparison.
pub const SCHEDULE_SAMPLE_LEN: usize = 6;

/// Balances at or below this are treated as paid off.
const PAID_OFF_EPSILON: f64 = 0.0001;

/// The accelerated schedule is abandoned after this many multiples of the
/// original term.
const MAX_TERM_MULTIPLE: f64 = 5.0;

#[derive(Debug, Clone, PartialEq)]
struct FixedPaymentRun {
    periods: u32,
    final_payment: f64,
    total_interest: f64,
    sample: Vec<ScheduleEntry>,
}

/// Compares paying `extra_monthly` on top of the scheduled payment against
/// investing the same amount every month for the original term.
pub fn compare_prepay_vs_invest(scenario: &PrepayScenario) -> Result<PrepayComparison, CalcError> {
    scenario.validate()?;
    let loan = &scenario.loan;
    let base = amortization_schedule(loan);

    let periods_per_month = f64::from(loan.payments_per_year) / 12.0;
    let scaled_extra = scenario.extra_monthly * periods_per_month;
    let max_periods = (loan.years * f64::from(loan.payments_per_year) * MAX_TERM_MULTIPLE) as u32;

    let run = run_fixed_payment(
        loan.principal,
        loan.period_rate(),
        base.payment + scaled_extra,
        max_periods,
    )?;
    tracing::debug!(
        base_periods = base.periods,
        payoff_periods = run.periods,
        "accelerated schedule converged"
    );

    let months = (loan.years * 12.0) as u32;
    let invest_future_value =
        future_value_of_monthly_series(scenario.extra_monthly, scenario.invest_rate_pct, months);
    let interest_saved = base.total_interest - run.total_interest;

    Ok(PrepayComparison {
        with_extra: ExtraPaymentSummary {
            payment: round_dp(run.final_payment, 2),
            payoff_periods: run.periods,
            total_interest: round_dp(run.total_interest, 2),
            schedule_sample: run.sample,
        },
        base,
        payoff_months_equivalent: round_dp(f64::from(run.periods) / periods_per_month, 1),
        interest_saved: round_dp(interest_saved, 2),
        invest_future_value_of_extra: round_dp(invest_future_value, 2),
        advice: PREPAY_ADVICE,
    })
}

/// Future value of depositing `monthly` at the end of each month for
/// `months` months, compounding monthly at `annual_rate_pct`.
pub fn future_value_of_monthly_series(monthly: f64, annual_rate_pct: f64, months: u32) -> f64 {
    let monthly_rate = annual_rate_pct / 100.0 / 12.0;
    if monthly_rate == 0.0 {
        return monthly * f64::from(months);
    }
    let growth = (f64::from(months) * monthly_rate.ln_1p()).exp_m1() / monthly_rate;
    if growth.is_finite() {
        monthly * growth
    } else {
        monthly * f64::from(months)
    }
}

/// Runs a constant `payment` against the balance until it is retired.
///
/// Fails with `InsufficientPayment` as soon as a period's interest swallows
/// the payment, and with `DidNotConverge` if `max_periods` pass with balance
/// left. The comparison always pays at least the base annuity payment, which
/// retires the loan within its own term, so the second error is a backstop
/// for callers passing arbitrary payments.
fn run_fixed_payment(
    principal: f64,
    period_rate: f64,
    mut payment: f64,
    max_periods: u32,
) -> Result<FixedPaymentRun, CalcError> {
    let mut balance = principal;
    let mut total_interest = 0.0;
    let mut periods = 0;
    let mut sample = Vec::with_capacity(SCHEDULE_SAMPLE_LEN);

    while balance > PAID_OFF_EPSILON && periods < max_periods {
        periods += 1;
        let interest = balance * period_rate;
        let mut principal_paid = payment - interest;
        if principal_paid <= 0.0 {
            return Err(CalcError::InsufficientPayment);
        }
        if principal_paid > balance {
            principal_paid = balance;
            payment = principal_paid + interest;
        }

        balance -= principal_paid;
        total_interest += interest;
        if sample.len() < SCHEDULE_SAMPLE_LEN {
            sample.push(ScheduleEntry {
                period: periods,
                payment: round_dp(payment, 2),
                principal_paid: round_dp(principal_paid, 2),
                interest_paid: round_dp(interest, 2),
                remaining_balance: round_dp(balance.max(0.0), 2),
            });
        }
    }

    if balance > PAID_OFF_EPSILON {
        return Err(CalcError::DidNotConverge {
            periods: max_periods,
        });
    }

    Ok(FixedPaymentRun {
        periods,
        final_payment: payment,
        total_interest,
        sample,
    })
}
