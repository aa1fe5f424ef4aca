use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::decimal::{Money, Rate};
use crate::errors::{Result, SimulationError};
use crate::records::RepaymentMethod;
use crate::schedule::{monthly_installment, ScheduleEntry};

/// projected repayment schedule for the remaining term of a loan
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProjectedSchedule {
    /// payment due in the first projected month
    pub monthly_payment: Money,
    pub entries: Vec<ScheduleEntry>,
    pub total_interest: Money,
    pub total_payment: Money,
}

impl ProjectedSchedule {
    /// presentation copy with currency rounded to 2 decimal places
    pub fn rounded(&self) -> Self {
        Self {
            monthly_payment: self.monthly_payment.rounded(),
            entries: self.entries.iter().map(ScheduleEntry::rounded).collect(),
            total_interest: self.total_interest.rounded(),
            total_payment: self.total_payment.rounded(),
        }
    }
}

/// project the remaining schedule month by month
///
/// Entry numbering continues from `start_month_index` so projected
/// schedules stay addressable on the original term timeline. Callers
/// must screen out fully repaid loans first; a zero remaining term
/// here is a contract violation, not a terminal state.
pub fn project(
    remaining_principal: Money,
    remaining_months: u32,
    annual_rate: Rate,
    start_month_index: u32,
    method: RepaymentMethod,
) -> Result<ProjectedSchedule> {
    if remaining_months == 0 {
        return Err(SimulationError::ContractViolation {
            message: "projection requires at least one remaining month".to_string(),
        });
    }
    if remaining_principal.is_negative() {
        return Err(SimulationError::InvalidField {
            field: "remaining_principal",
            message: format!("must not be negative, got {remaining_principal}"),
        });
    }

    let entries = match method {
        RepaymentMethod::EqualInstallment => project_equal_installment(
            remaining_principal,
            remaining_months,
            annual_rate,
            start_month_index,
        )?,
        RepaymentMethod::EqualPrincipal => project_equal_principal(
            remaining_principal,
            remaining_months,
            annual_rate,
            start_month_index,
        ),
    };

    let total_interest = entries
        .iter()
        .map(|e| e.interest_portion)
        .fold(Money::ZERO, |acc, x| acc + x);

    let total_payment = entries
        .iter()
        .map(|e| e.total_payment)
        .fold(Money::ZERO, |acc, x| acc + x);

    let monthly_payment = entries
        .first()
        .map(|e| e.total_payment)
        .unwrap_or(Money::ZERO);

    Ok(ProjectedSchedule {
        monthly_payment,
        entries,
        total_interest,
        total_payment,
    })
}

/// constant total payment, interest recomputed from the running balance
fn project_equal_installment(
    principal: Money,
    months: u32,
    annual_rate: Rate,
    start_month_index: u32,
) -> Result<Vec<ScheduleEntry>> {
    let installment = monthly_installment(principal, annual_rate, months)?;
    let monthly_rate = annual_rate.monthly_rate().as_decimal();

    let mut entries = Vec::with_capacity(months as usize);
    let mut balance = principal;

    for i in 0..months {
        let interest = Money::from_decimal(balance.as_decimal() * monthly_rate);
        let is_last = i + 1 == months;

        // final entry retires the balance exactly
        let (principal_portion, total_payment) = if is_last {
            (balance, balance + interest)
        } else {
            (installment - interest, installment)
        };

        balance = (balance - principal_portion).max(Money::ZERO);

        entries.push(ScheduleEntry {
            month_index: start_month_index + i,
            total_payment,
            principal_portion,
            interest_portion: interest,
            remaining_principal: balance,
        });
    }

    Ok(entries)
}

/// constant principal portion, total payment declines with the balance
fn project_equal_principal(
    principal: Money,
    months: u32,
    annual_rate: Rate,
    start_month_index: u32,
) -> Vec<ScheduleEntry> {
    let principal_share = principal / Decimal::from(months);
    let monthly_rate = annual_rate.monthly_rate().as_decimal();

    let mut entries = Vec::with_capacity(months as usize);
    let mut balance = principal;

    for i in 0..months {
        let interest = Money::from_decimal(balance.as_decimal() * monthly_rate);
        let is_last = i + 1 == months;

        // final entry absorbs the division residue
        let principal_portion = if is_last { balance } else { principal_share };

        balance = (balance - principal_portion).max(Money::ZERO);

        entries.push(ScheduleEntry {
            month_index: start_month_index + i,
            total_payment: principal_portion + interest,
            principal_portion,
            interest_portion: interest,
            remaining_principal: balance,
        });
    }

    entries
}
