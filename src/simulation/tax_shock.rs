use chrono::Datelike;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::decimal::{Money, Rate};
use crate::errors::{Result, SimulationError};
use crate::records::ExpenseSnapshot;

/// one expense re-priced under the simulated tax rate
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExpenseAdjustment {
    pub expense_id: Uuid,
    pub original_amount: Money,
    pub recomputed_amount: Money,
    /// recomputed minus original; negative means cheaper under the new rate
    pub delta: Money,
}

/// aggregate tax-shock outcome for one calendar month of expenses
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TaxShockReport {
    pub adjustments: Vec<ExpenseAdjustment>,
    /// signed sum of the per-expense deltas
    pub total_delta: Money,
}

/// re-derive a month's spending under a hypothetical consumption-tax rate
///
/// Each amount is stripped back to its pre-tax base under the current
/// rate, then re-priced under the simulated rate. Expenses are matched
/// by month-of-year only, with no year filter; this mirrors the
/// single-month selector the report feeds.
pub fn simulate_tax_shock(
    expenses: &[ExpenseSnapshot],
    current_rate: Rate,
    simulated_rate: Rate,
    month: u32,
) -> Result<TaxShockReport> {
    if !(1..=12).contains(&month) {
        return Err(SimulationError::InvalidField {
            field: "month",
            message: format!("expected a calendar month in 1..=12, got {month}"),
        });
    }

    let current_factor = Decimal::ONE + current_rate.as_decimal();
    if current_factor <= Decimal::ZERO {
        return Err(SimulationError::InvalidField {
            field: "current_rate",
            message: format!("tax factor 1 + {current_rate} has no pre-tax base"),
        });
    }
    let simulated_factor = Decimal::ONE + simulated_rate.as_decimal();

    let mut adjustments = Vec::new();
    let mut total_delta = Money::ZERO;

    for expense in expenses.iter().filter(|e| e.date.month() == month) {
        let pre_tax = expense
            .amount
            .as_decimal()
            .checked_div(current_factor)
            .ok_or_else(|| SimulationError::Arithmetic {
                message: format!("pre-tax base of {} at {current_rate}", expense.amount),
            })?;
        let recomputed = Money::from_decimal(pre_tax * simulated_factor);
        let delta = recomputed - expense.amount;

        total_delta += delta;
        adjustments.push(ExpenseAdjustment {
            expense_id: expense.id,
            original_amount: expense.amount,
            recomputed_amount: recomputed,
            delta,
        });
    }

    Ok(TaxShockReport {
        adjustments,
        total_delta,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};
    use rust_decimal_macros::dec;

    fn expense(amount: Decimal, year: i32, month: u32) -> ExpenseSnapshot {
        ExpenseSnapshot {
            id: Uuid::new_v4(),
            amount: Money::from_decimal(amount),
            date: Utc.with_ymd_and_hms(year, month, 14, 0, 0, 0).unwrap(),
        }
    }

    #[test]
    fn test_vat_hike_scenario() {
        // 1000 recorded at 17%, re-priced at 18%: 1000/1.17*1.18 - 1000
        let expenses = vec![expense(dec!(600), 2025, 3), expense(dec!(400), 2025, 3)];

        let report = simulate_tax_shock(
            &expenses,
            Rate::from_percent(dec!(17)),
            Rate::from_percent(dec!(18)),
            3,
        )
        .unwrap();

        assert_eq!(report.adjustments.len(), 2);
        let diff = (report.total_delta.as_decimal() - dec!(8.55)).abs();
        assert!(diff < dec!(0.01), "total delta {} out of band", report.total_delta);
    }

    #[test]
    fn test_rate_cut_is_negative() {
        let expenses = vec![expense(dec!(1170), 2025, 7)];

        let report = simulate_tax_shock(
            &expenses,
            Rate::from_percent(dec!(17)),
            Rate::from_percent(dec!(15)),
            7,
        )
        .unwrap();

        // 1170/1.17 = 1000 pre-tax, re-priced to 1150
        assert!(report.total_delta.is_negative());
        let diff = (report.total_delta.as_decimal() - dec!(-20)).abs();
        assert!(diff < dec!(0.01));
        assert_eq!(
            report.adjustments[0].recomputed_amount.rounded(),
            Money::from_major(1_150)
        );
    }

    #[test]
    fn test_month_filter_ignores_year() {
        // the month selector matches across years on purpose
        let expenses = vec![
            expense(dec!(100), 2024, 5),
            expense(dec!(100), 2025, 5),
            expense(dec!(100), 2025, 6),
        ];

        let report = simulate_tax_shock(
            &expenses,
            Rate::from_percent(dec!(17)),
            Rate::from_percent(dec!(18)),
            5,
        )
        .unwrap();

        assert_eq!(report.adjustments.len(), 2);
    }

    #[test]
    fn test_unchanged_rate_is_a_no_op() {
        let expenses = vec![expense(dec!(250), 2025, 9)];

        let report = simulate_tax_shock(
            &expenses,
            Rate::from_percent(dec!(17)),
            Rate::from_percent(dec!(17)),
            9,
        )
        .unwrap();

        assert_eq!(report.total_delta, Money::ZERO);
        assert_eq!(report.adjustments[0].recomputed_amount, Money::from_decimal(dec!(250)));
    }

    #[test]
    fn test_out_of_range_month_rejected() {
        let result = simulate_tax_shock(
            &[],
            Rate::from_percent(dec!(17)),
            Rate::from_percent(dec!(18)),
            13,
        );
        assert!(matches!(
            result,
            Err(SimulationError::InvalidField { field: "month", .. })
        ));
    }

    #[test]
    fn test_degenerate_current_rate_rejected() {
        // -100% leaves no pre-tax base to divide by
        let result = simulate_tax_shock(
            &[expense(dec!(100), 2025, 2)],
            Rate::from_percent(dec!(-100)),
            Rate::from_percent(dec!(18)),
            2,
        );
        assert!(matches!(
            result,
            Err(SimulationError::InvalidField { field: "current_rate", .. })
        ));
    }

    #[test]
    fn test_empty_month_yields_empty_report() {
        let expenses = vec![expense(dec!(100), 2025, 4)];

        let report = simulate_tax_shock(
            &expenses,
            Rate::from_percent(dec!(17)),
            Rate::from_percent(dec!(18)),
            11,
        )
        .unwrap();

        assert!(report.adjustments.is_empty());
        assert_eq!(report.total_delta, Money::ZERO);
    }
}
