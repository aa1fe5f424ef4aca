use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::decimal::{Money, Rate};
use crate::errors::Result;
use crate::records::{Loan, RepaymentMethod};
use crate::schedule::monthly_installment;

/// days per scheduled month
///
/// A fixed engine-wide policy: elapsed time is measured in 30-day
/// months everywhere, so reconstruction and projection stay on the
/// same timeline. Calendar-month drift near term boundaries is
/// accepted, not corrected.
const DAYS_PER_MONTH: i64 = 30;

/// elapsed-time position of a loan as of a given instant
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoanPosition {
    pub remaining_principal: Money,
    pub months_paid: u32,
    pub remaining_months: u32,
}

impl LoanPosition {
    /// fully repaid, nothing left to project
    pub fn is_settled(&self) -> bool {
        self.remaining_months == 0
    }
}

/// reconstruct how much principal remains today
///
/// Replays the original schedule forward at the loan's original
/// effective rate; no hypothetical adjustment is applied here. A loan
/// past its term reconstructs to a settled position, never an error.
pub fn reconstruct(loan: &Loan, as_of: DateTime<Utc>, prime_reference: Rate) -> Result<LoanPosition> {
    loan.validate()?;

    let elapsed_days = (as_of - loan.start_date).num_days();
    let elapsed_months = if elapsed_days <= 0 {
        0
    } else {
        elapsed_days / DAYS_PER_MONTH
    };
    let months_paid = elapsed_months.min(i64::from(loan.term_months)) as u32;
    let remaining_months = loan.term_months - months_paid;

    if remaining_months == 0 {
        return Ok(LoanPosition {
            remaining_principal: Money::ZERO,
            months_paid,
            remaining_months: 0,
        });
    }

    let remaining_principal = match loan.method {
        RepaymentMethod::EqualInstallment => {
            replay_installments(loan, months_paid, loan.original_rate(prime_reference))?
        }
        RepaymentMethod::EqualPrincipal => {
            // constant principal share makes the closed form exact
            let share = loan.principal.as_decimal() / Decimal::from(loan.term_months);
            let repaid = Money::from_decimal(share * Decimal::from(months_paid));
            (loan.principal - repaid).max(Money::ZERO)
        }
    };

    Ok(LoanPosition {
        remaining_principal,
        months_paid,
        remaining_months,
    })
}

/// replay the elapsed equal-installment months against the balance
///
/// Iterative on purpose. O(months_paid) is fine at household term
/// lengths; a closed form exists if that ever changes.
fn replay_installments(loan: &Loan, months_paid: u32, original_rate: Rate) -> Result<Money> {
    let installment = monthly_installment(loan.principal, original_rate, loan.term_months)?;
    let monthly_rate = original_rate.monthly_rate().as_decimal();

    let mut balance = loan.principal;
    for _ in 0..months_paid {
        let interest = Money::from_decimal(balance.as_decimal() * monthly_rate);
        balance = (balance - (installment - interest)).max(Money::ZERO);
    }

    Ok(balance)
}
