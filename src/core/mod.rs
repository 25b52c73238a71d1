mod amortization;
mod error;
mod prepay;
mod quiz;
mod tax;
mod types;

pub use amortization::{amortization_schedule, annuity_payment};
pub use error::CalcError;
pub use prepay::{
    PREPAY_ADVICE, SCHEDULE_SAMPLE_LEN, compare_prepay_vs_invest, future_value_of_monthly_series,
};
pub use quiz::{PublicQuestion, QUIZ, QuestionFeedback, QuizQuestion, QuizScore, public_questions, score_quiz};
pub use tax::{assess_income_tax, compute_progressive_tax, default_slabs, validate_slabs};
pub use types::{
    AmortizationSchedule, ExtraPaymentSummary, LoanTerms, MAX_TOTAL_PERIODS, PositiveAmount,
    PrepayComparison, PrepayScenario, ScheduleEntry, TaxAssessment, TaxBand, TaxComputation,
    TaxSlab,
};

/// Rounds to `places` decimal places, ties to even.
///
/// A product that only looks like a tie after the multiply is rounded toward
/// the side the exact product lies on, so `2.675` still rounds to `2.67`.
pub(crate) fn round_dp(value: f64, places: i32) -> f64 {
    let factor = 10f64.powi(places);
    let scaled = value * factor;
    let error = value.mul_add(factor, -scaled);
    let rounded = if (scaled - scaled.trunc()).abs() == 0.5 && error != 0.0 {
        if error > 0.0 { scaled.ceil() } else { scaled.floor() }
    } else {
        scaled.round_ties_even()
    };
    rounded / factor
}
