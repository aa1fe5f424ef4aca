pub mod projector;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::decimal::{Money, Rate};
use crate::errors::{Result, SimulationError};

pub use projector::{project, ProjectedSchedule};

/// one simulated month of a repayment schedule
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScheduleEntry {
    /// 1-based position on the original term timeline
    pub month_index: u32,
    pub total_payment: Money,
    pub principal_portion: Money,
    pub interest_portion: Money,
    /// balance left after this payment
    pub remaining_principal: Money,
}

impl ScheduleEntry {
    /// presentation copy with currency rounded to 2 decimal places
    pub fn rounded(&self) -> Self {
        Self {
            month_index: self.month_index,
            total_payment: self.total_payment.rounded(),
            principal_portion: self.principal_portion.rounded(),
            interest_portion: self.interest_portion.rounded(),
            remaining_principal: self.remaining_principal.rounded(),
        }
    }
}

/// constant monthly installment via the annuity formula
///
/// P * r(1+r)^n / ((1+r)^n - 1), with r the monthly rate. A zero rate
/// degenerates to P / n; handled explicitly, never a zero divisor.
pub fn monthly_installment(principal: Money, annual_rate: Rate, months: u32) -> Result<Money> {
    if months == 0 {
        return Err(SimulationError::ContractViolation {
            message: "installment requires at least one month".to_string(),
        });
    }

    let r = annual_rate.monthly_rate().as_decimal();

    if r.is_zero() {
        return Ok(principal / Decimal::from(months));
    }

    // (1 + r)^n by iteration, full precision
    let mut compound = Decimal::ONE;
    let base = Decimal::ONE + r;
    for _ in 0..months {
        compound *= base;
    }

    let numerator = principal.as_decimal() * r * compound;
    let installment = numerator
        .checked_div(compound - Decimal::ONE)
        .ok_or_else(|| SimulationError::Arithmetic {
            message: format!("annuity formula degenerate at rate {annual_rate}"),
        })?;

    Ok(Money::from_decimal(installment))
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_installment_known_value() {
        // 120000 at 9% over 120 months is a little over 1520
        let emi = monthly_installment(
            Money::from_major(120_000),
            Rate::from_percent(dec!(9)),
            120,
        )
        .unwrap();

        let diff = (emi.as_decimal() - dec!(1520.11)).abs();
        assert!(diff < dec!(0.01), "installment {emi} out of band");
    }

    #[test]
    fn test_zero_rate_degenerates_to_linear() {
        let emi = monthly_installment(Money::from_major(12_000), Rate::ZERO, 120).unwrap();
        assert_eq!(emi, Money::from_major(100));
    }

    #[test]
    fn test_zero_months_is_contract_violation() {
        let result = monthly_installment(Money::from_major(1_000), Rate::from_percent(dec!(5)), 0);
        assert!(matches!(
            result,
            Err(SimulationError::ContractViolation { .. })
        ));
    }

    #[test]
    fn test_rounded_entry_keeps_index() {
        let entry = ScheduleEntry {
            month_index: 13,
            total_payment: Money::from_decimal(dec!(1520.11849326)),
            principal_portion: Money::from_decimal(dec!(620.11849326)),
            interest_portion: Money::from_decimal(dec!(900)),
            remaining_principal: Money::from_decimal(dec!(119379.88150674)),
        };

        let rounded = entry.rounded();
        assert_eq!(rounded.month_index, 13);
        assert_eq!(rounded.total_payment.to_string(), "1520.12");
        assert_eq!(rounded.remaining_principal.to_string(), "119379.88");
    }
}
