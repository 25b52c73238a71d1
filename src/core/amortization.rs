use super::round_dp;
use super::types::{AmortizationSchedule, LoanTerms, ScheduleEntry};

/// Fixed annuity payment that retires `principal` over `periods` payments.
///
/// `1 - (1 + r)^-n` is evaluated as `-expm1(-n * ln_1p(r))` so rates too
/// small to register against `1.0` still give a finite payment. When even
/// that underflows the payment falls back to the zero-rate split.
pub fn annuity_payment(principal: f64, period_rate: f64, periods: u32) -> f64 {
    if periods == 0 {
        return principal;
    }
    let n = f64::from(periods);
    if period_rate == 0.0 {
        return principal / n;
    }

    let discount = -(-n * period_rate.ln_1p()).exp_m1();
    if !discount.is_normal() || discount <= 0.0 {
        return principal / n;
    }
    principal * period_rate / discount
}

/// Builds the full fixed-payment schedule for `terms`.
///
/// Terms are expected to have passed [`LoanTerms::validate`]. The last
/// period pays off exactly the outstanding balance, so the returned
/// `payment` may differ from [`annuity_payment`] by that final adjustment.
pub fn amortization_schedule(terms: &LoanTerms) -> AmortizationSchedule {
    let periods = terms.total_periods();
    let rp = terms.period_rate();
    let mut payment = annuity_payment(terms.principal, rp, periods);

    let mut balance = terms.principal;
    let mut total_interest = 0.0;
    let mut schedule = Vec::with_capacity(periods as usize);

    for period in 1..=periods {
        let (interest, mut principal_paid) = if rp == 0.0 {
            (0.0, payment)
        } else {
            let interest = balance * rp;
            (interest, payment - interest)
        };
        if principal_paid > balance {
            principal_paid = balance;
            payment = principal_paid + interest;
        }

        // 10dp keeps float noise from leaving a phantom balance.
        balance = round_dp(balance - principal_paid, 10);
        total_interest += interest;
        schedule.push(ScheduleEntry {
            period,
            payment: round_dp(payment, 2),
            principal_paid: round_dp(principal_paid, 2),
            interest_paid: round_dp(interest, 2),
            remaining_balance: round_dp(balance.max(0.0), 2),
        });

        if balance <= 0.0 {
            break;
        }
    }

    AmortizationSchedule {
        periods,
        payment: round_dp(payment, 2),
        total_interest: round_dp(total_interest, 2),
        schedule,
    }
}
