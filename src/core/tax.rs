use super::error::CalcError;
use super::round_dp;
use super::types::{TaxAssessment, TaxBand, TaxComputation, TaxSlab};

/// Sample four-tier table used when a request brings no slabs of its own.
pub fn default_slabs() -> Vec<TaxSlab> {
    vec![
        TaxSlab::bounded(250_000.0, 0.0).expect("positive bound"),
        TaxSlab::bounded(500_000.0, 0.05).expect("positive bound"),
        TaxSlab::bounded(1_000_000.0, 0.20).expect("positive bound"),
        TaxSlab::unbounded(0.30),
    ]
}

/// Rates must be fractions. Bound ordering is left to the caller.
pub fn validate_slabs(slabs: &[TaxSlab]) -> Result<(), CalcError> {
    for (idx, slab) in slabs.iter().enumerate() {
        if !slab.rate.is_finite() || !(0.0..=1.0).contains(&slab.rate) {
            return Err(CalcError::invalid(format!(
                "slabs[{idx}].rate must be between 0 and 1"
            )));
        }
    }
    Ok(())
}

/// Walks the slabs in order, taxing each band of `taxable_income` at its
/// slab's rate. Stops at the first slab that exhausts the income, so later
/// slabs never show up in the breakdown.
pub fn compute_progressive_tax(taxable_income: f64, slabs: &[TaxSlab]) -> TaxComputation {
    let mut remaining = taxable_income;
    let mut prev_cap = 0.0;
    let mut tax = 0.0;
    let mut breakdown = Vec::with_capacity(slabs.len());

    for slab in slabs {
        let cap = slab.cap();
        let band = (cap - prev_cap).min(remaining).max(0.0);
        let band_tax = band * slab.rate;
        breakdown.push(TaxBand {
            band_from: prev_cap,
            band_to: slab.upper_bound.map(|bound| bound.get()),
            taxable: round_dp(band, 2),
            rate: slab.rate,
            tax: round_dp(band_tax, 2),
        });

        tax += band_tax;
        remaining -= band;
        prev_cap = cap;
        if remaining <= 0.0 {
            break;
        }
    }

    TaxComputation {
        tax_due: round_dp(tax, 2),
        breakdown,
    }
}

pub fn assess_income_tax(annual_income: f64, deductions: f64, slabs: &[TaxSlab]) -> TaxAssessment {
    let taxable = (annual_income - deductions).max(0.0);
    let TaxComputation { tax_due, breakdown } = compute_progressive_tax(taxable, slabs);
    let effective_rate_pct = if annual_income > 0.0 {
        round_dp(tax_due / annual_income * 100.0, 2)
    } else {
        0.0
    };

    TaxAssessment {
        tax_due,
        breakdown,
        annual_income,
        deductions,
        taxable_income: round_dp(taxable, 2),
        effective_rate_pct,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::{prop_assert, proptest};

    const EPS: f64 = 1e-6;

    fn assert_approx(actual: f64, expected: f64) {
        assert!(
            (actual - expected).abs() <= EPS,
            "expected {expected}, got {actual}"
        );
    }

    #[test]
    fn default_table_taxes_600k_at_32500() {
        let result = compute_progressive_tax(600_000.0, &default_slabs());

        assert_approx(result.tax_due, 32_500.0);
        assert_eq!(result.breakdown.len(), 3);
        assert_approx(result.breakdown[0].tax, 0.0);
        assert_approx(result.breakdown[1].band_from, 250_000.0);
        assert_approx(result.breakdown[1].tax, 12_500.0);
        assert_approx(result.breakdown[2].taxable, 100_000.0);
        assert_approx(result.breakdown[2].tax, 20_000.0);
        assert_eq!(result.breakdown[2].band_to, Some(1_000_000.0));
    }

    #[test]
    fn income_above_every_bound_reaches_open_slab() {
        let result = compute_progressive_tax(1_200_000.0, &default_slabs());

        assert_eq!(result.breakdown.len(), 4);
        let top = result.breakdown[3];
        assert_approx(top.band_from, 1_000_000.0);
        assert_eq!(top.band_to, None);
        assert_approx(top.taxable, 200_000.0);
        assert_approx(top.tax, 60_000.0);
        assert_approx(result.tax_due, 12_500.0 + 100_000.0 + 60_000.0);
    }

    #[test]
    fn zero_income_stops_after_first_slab() {
        let result = compute_progressive_tax(0.0, &default_slabs());

        assert_approx(result.tax_due, 0.0);
        assert_eq!(result.breakdown.len(), 1);
        assert_approx(result.breakdown[0].taxable, 0.0);
    }

    #[test]
    fn empty_table_owes_nothing() {
        let result = compute_progressive_tax(50_000.0, &[]);
        assert_approx(result.tax_due, 0.0);
        assert!(result.breakdown.is_empty());
    }

    #[test]
    fn income_beyond_bounded_table_is_left_untaxed() {
        let slabs = vec![TaxSlab::bounded(10_000.0, 0.1).unwrap()];
        let result = compute_progressive_tax(25_000.0, &slabs);

        assert_eq!(result.breakdown.len(), 1);
        assert_approx(result.breakdown[0].taxable, 10_000.0);
        assert_approx(result.tax_due, 1_000.0);
    }

    #[test]
    fn assessment_clamps_taxable_income_and_reports_effective_rate() {
        let assessment = assess_income_tax(650_000.0, 50_000.0, &default_slabs());
        assert_approx(assessment.taxable_income, 600_000.0);
        assert_approx(assessment.tax_due, 32_500.0);
        assert_approx(assessment.effective_rate_pct, 5.0);

        let over_deducted = assess_income_tax(10_000.0, 40_000.0, &default_slabs());
        assert_approx(over_deducted.taxable_income, 0.0);
        assert_approx(over_deducted.tax_due, 0.0);
        assert_approx(over_deducted.effective_rate_pct, 0.0);
    }

    #[test]
    fn zero_income_has_zero_effective_rate() {
        let assessment = assess_income_tax(0.0, 0.0, &default_slabs());
        assert_approx(assessment.effective_rate_pct, 0.0);
    }

    #[test]
    fn validate_slabs_rejects_rates_outside_unit_interval() {
        let slabs = vec![TaxSlab::bounded(1_000.0, 0.1).unwrap(), TaxSlab::unbounded(1.5)];
        let err = validate_slabs(&slabs).expect_err("rate above 1 must fail");
        assert!(err.to_string().contains("slabs[1].rate"));
        assert!(validate_slabs(&default_slabs()).is_ok());
    }

    #[test]
    fn slab_bound_must_be_positive() {
        assert!(TaxSlab::bounded(0.0, 0.1).is_err());
        assert!(TaxSlab::bounded(-5.0, 0.1).is_err());
        assert!(serde_json::from_str::<TaxSlab>(r#"{"upto": -1, "rate": 0.1}"#).is_err());
    }

    #[test]
    fn slab_deserializes_null_bound_as_open_ended() {
        let slab: TaxSlab = serde_json::from_str(r#"{"upto": null, "rate": 0.3}"#).unwrap();
        assert_eq!(slab.upper_bound, None);
        assert!(slab.cap().is_infinite());

        let slab: TaxSlab = serde_json::from_str(r#"{"upper_bound": 500, "rate": 0.1}"#).unwrap();
        assert_eq!(slab.upper_bound.map(|b| b.get()), Some(500.0));
    }

    proptest! {
        #![proptest_config(proptest::test_runner::Config::with_cases(64))]

        #[test]
        fn prop_breakdown_sums_match_totals(
            income_cents in 0u64..500_000_000,
            widths in proptest::collection::vec(1u32..400_000, 0..6),
            rates_bp in proptest::collection::vec(0u32..=10_000, 6),
            open_top in proptest::bool::ANY,
        ) {
            let income = income_cents as f64 / 100.0;
            let mut slabs = Vec::new();
            let mut bound = 0.0;
            for (idx, width) in widths.iter().enumerate() {
                bound += f64::from(*width);
                slabs.push(TaxSlab::bounded(bound, f64::from(rates_bp[idx]) / 10_000.0).unwrap());
            }
            if open_top {
                slabs.push(TaxSlab::unbounded(f64::from(rates_bp[5]) / 10_000.0));
            }

            let result = compute_progressive_tax(income, &slabs);
            let tol = 0.01 * (result.breakdown.len() as f64 + 1.0);

            let taxed: f64 = result.breakdown.iter().map(|b| b.taxable).sum();
            let last_cap = result
                .breakdown
                .last()
                .map_or(0.0, |b| b.band_to.unwrap_or(f64::INFINITY));
            prop_assert!((taxed - income.min(last_cap)).abs() <= tol);

            let band_tax: f64 = result.breakdown.iter().map(|b| b.tax).sum();
            prop_assert!((band_tax - result.tax_due).abs() <= tol);
            prop_assert!(result.tax_due >= 0.0);
        }
    }
}
