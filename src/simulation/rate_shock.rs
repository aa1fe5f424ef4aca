use chrono::{DateTime, Utc};
use hourglass_rs::SafeTimeProvider;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::config::EngineConfig;
use crate::decimal::{Money, Rate};
use crate::errors::Result;
use crate::records::{Loan, LoanId, LoanKind};
use crate::schedule::{project, ScheduleEntry};
use crate::simulation::reconstruct::reconstruct;

/// outcome of a rate shock for one prime-indexed loan
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RateShockResult {
    pub loan_id: LoanId,
    pub new_monthly_payment: Money,
    pub schedule: Vec<ScheduleEntry>,
    pub remaining_months: u32,
    /// recorded payment minus the shocked payment; positive means savings
    pub monthly_delta: Money,
    /// monthly delta carried across the remaining term
    pub lifetime_delta: Money,
}

impl RateShockResult {
    /// presentation copy with currency rounded to 2 decimal places
    pub fn rounded(&self) -> Self {
        Self {
            loan_id: self.loan_id,
            new_monthly_payment: self.new_monthly_payment.rounded(),
            schedule: self.schedule.iter().map(ScheduleEntry::rounded).collect(),
            remaining_months: self.remaining_months,
            monthly_delta: self.monthly_delta.rounded(),
            lifetime_delta: self.lifetime_delta.rounded(),
        }
    }
}

/// answers "what if the reference rate moved by X today" across a loan set
///
/// Reconstruction always runs at the loan's original effective rate;
/// only the forward projection sees the adjustment. Input loans are
/// never mutated.
pub struct RateShockSimulator {
    config: EngineConfig,
}

impl RateShockSimulator {
    pub fn new(config: EngineConfig) -> Self {
        Self { config }
    }

    /// simulate against the injected clock's current instant
    pub fn simulate(
        &self,
        loans: &[Loan],
        adjustment: Rate,
        time: &SafeTimeProvider,
    ) -> Result<Vec<RateShockResult>> {
        self.simulate_as_of(loans, adjustment, time.now())
    }

    /// simulate against an explicit as-of instant
    ///
    /// Non-prime loans are omitted from the output entirely, not
    /// zeroed. The adjustment may be negative or zero; zero reproduces
    /// the unchanged effective-rate schedule.
    pub fn simulate_as_of(
        &self,
        loans: &[Loan],
        adjustment: Rate,
        as_of: DateTime<Utc>,
    ) -> Result<Vec<RateShockResult>> {
        let mut results = Vec::new();
        for loan in loans {
            loan.validate()?;
            if loan.kind != LoanKind::Prime {
                continue;
            }
            results.push(self.shock_loan(loan, adjustment, as_of)?);
        }
        Ok(results)
    }

    fn shock_loan(
        &self,
        loan: &Loan,
        adjustment: Rate,
        as_of: DateTime<Utc>,
    ) -> Result<RateShockResult> {
        let reference = self.config.prime_reference_rate;
        let position = reconstruct(loan, as_of, reference)?;

        if position.is_settled() {
            // terminal state: nothing left to pay under any rate
            return Ok(RateShockResult {
                loan_id: loan.id,
                new_monthly_payment: Money::ZERO,
                schedule: Vec::new(),
                remaining_months: 0,
                monthly_delta: loan.monthly_pay,
                lifetime_delta: Money::ZERO,
            });
        }

        let shocked = loan.shocked_rate(reference, adjustment);
        let projection = project(
            position.remaining_principal,
            position.remaining_months,
            shocked,
            position.months_paid + 1,
            loan.method,
        )?;

        let monthly_delta = loan.monthly_pay - projection.monthly_payment;
        let lifetime_delta = Money::from_decimal(
            monthly_delta.as_decimal() * Decimal::from(position.remaining_months),
        );

        Ok(RateShockResult {
            loan_id: loan.id,
            new_monthly_payment: projection.monthly_payment,
            schedule: projection.entries,
            remaining_months: position.remaining_months,
            monthly_delta,
            lifetime_delta,
        })
    }
}
