use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::decimal::{Money, Rate};
use crate::errors::{Result, SimulationError};

/// unique identifier for a loan record
pub type LoanId = Uuid;

/// amortization method for a loan
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RepaymentMethod {
    /// constant total payment, principal/interest split shifts over time ("spitzer")
    EqualInstallment,
    /// constant principal portion, total payment decreases over time
    EqualPrincipal,
}

/// rate indexation of a loan
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LoanKind {
    /// indexed to the shared prime reference rate
    Prime,
    /// fixed spread only, excluded from rate-shock simulation
    Fixed,
}

/// loan record supplied by the external document store, read-only input
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Loan {
    pub id: LoanId,
    /// original borrowed amount
    pub principal: Money,
    /// the loan's fixed annual rate component
    pub base_rate: Rate,
    /// original number of scheduled payments
    pub term_months: u32,
    /// when the first payment period began
    pub start_date: DateTime<Utc>,
    pub method: RepaymentMethod,
    pub kind: LoanKind,
    /// originally recorded monthly payment, display comparison only
    pub monthly_pay: Money,
}

impl Loan {
    /// validate the record before any calculation touches it
    pub fn validate(&self) -> Result<()> {
        if self.principal.is_zero() || self.principal.is_negative() {
            return Err(SimulationError::InvalidField {
                field: "principal",
                message: format!("must be positive, got {}", self.principal),
            });
        }
        if self.term_months == 0 {
            return Err(SimulationError::InvalidField {
                field: "term_months",
                message: "must be positive, got 0".to_string(),
            });
        }
        if self.base_rate.is_negative() {
            return Err(SimulationError::InvalidField {
                field: "base_rate",
                message: format!("must not be negative, got {}", self.base_rate),
            });
        }
        if self.monthly_pay.is_negative() {
            return Err(SimulationError::InvalidField {
                field: "monthly_pay",
                message: format!("must not be negative, got {}", self.monthly_pay),
            });
        }
        Ok(())
    }

    /// annual rate the loan carries today
    ///
    /// Prime loans ride the shared reference rate on top of their own
    /// spread; fixed loans carry the spread alone.
    pub fn original_rate(&self, prime_reference: Rate) -> Rate {
        match self.kind {
            LoanKind::Prime => self.base_rate + prime_reference,
            LoanKind::Fixed => self.base_rate,
        }
    }

    /// annual rate under a hypothetical reference-rate move
    pub fn shocked_rate(&self, prime_reference: Rate, adjustment: Rate) -> Rate {
        self.original_rate(prime_reference) + adjustment
    }

    /// parse a loan from its document-store JSON form
    pub fn from_document(doc: &str) -> Result<Self> {
        serde_json::from_str(doc).map_err(|e| SimulationError::MalformedDocument {
            message: e.to_string(),
        })
    }

    /// serialize back to the document-store JSON form
    pub fn to_document(&self) -> Result<String> {
        serde_json::to_string(self).map_err(|e| SimulationError::MalformedDocument {
            message: e.to_string(),
        })
    }
}

/// expense record supplied by the external document store, read-only input
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExpenseSnapshot {
    pub id: Uuid,
    /// recorded amount, tax inclusive
    pub amount: Money,
    pub date: DateTime<Utc>,
}

impl ExpenseSnapshot {
    /// parse an expense from its document-store JSON form
    pub fn from_document(doc: &str) -> Result<Self> {
        serde_json::from_str(doc).map_err(|e| SimulationError::MalformedDocument {
            message: e.to_string(),
        })
    }

    /// serialize back to the document-store JSON form
    pub fn to_document(&self) -> Result<String> {
        serde_json::to_string(self).map_err(|e| SimulationError::MalformedDocument {
            message: e.to_string(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use rust_decimal_macros::dec;

    fn sample_loan() -> Loan {
        Loan {
            id: Uuid::new_v4(),
            principal: Money::from_major(120_000),
            base_rate: Rate::from_percent(dec!(3)),
            term_months: 120,
            start_date: Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap(),
            method: RepaymentMethod::EqualInstallment,
            kind: LoanKind::Prime,
            monthly_pay: Money::from_decimal(dec!(1520.11)),
        }
    }

    #[test]
    fn test_valid_loan_passes() {
        assert!(sample_loan().validate().is_ok());
    }

    #[test]
    fn test_validation_names_offending_field() {
        let mut loan = sample_loan();
        loan.principal = Money::ZERO;
        match loan.validate() {
            Err(SimulationError::InvalidField { field, .. }) => assert_eq!(field, "principal"),
            other => panic!("expected InvalidField, got {other:?}"),
        }

        let mut loan = sample_loan();
        loan.term_months = 0;
        match loan.validate() {
            Err(SimulationError::InvalidField { field, .. }) => assert_eq!(field, "term_months"),
            other => panic!("expected InvalidField, got {other:?}"),
        }

        let mut loan = sample_loan();
        loan.base_rate = Rate::from_percent(dec!(-1));
        match loan.validate() {
            Err(SimulationError::InvalidField { field, .. }) => assert_eq!(field, "base_rate"),
            other => panic!("expected InvalidField, got {other:?}"),
        }
    }

    #[test]
    fn test_zero_base_rate_is_valid() {
        let mut loan = sample_loan();
        loan.base_rate = Rate::ZERO;
        assert!(loan.validate().is_ok());
    }

    #[test]
    fn test_original_rate_by_kind() {
        let reference = Rate::from_percent(dec!(6));

        let prime = sample_loan();
        assert_eq!(prime.original_rate(reference).as_percent(), dec!(9));

        let mut fixed = sample_loan();
        fixed.kind = LoanKind::Fixed;
        assert_eq!(fixed.original_rate(reference).as_percent(), dec!(3));
    }

    #[test]
    fn test_shocked_rate_includes_adjustment() {
        let loan = sample_loan();
        let shocked = loan.shocked_rate(Rate::from_percent(dec!(6)), Rate::from_percent(dec!(1.5)));
        assert_eq!(shocked.as_percent(), dec!(10.5));
    }

    #[test]
    fn test_loan_document_round_trip() {
        let loan = sample_loan();
        let doc = loan.to_document().unwrap();
        let parsed = Loan::from_document(&doc).unwrap();
        assert_eq!(parsed, loan);
    }

    #[test]
    fn test_malformed_document_is_reported() {
        let result = Loan::from_document("{\"principal\": \"not-a-loan\"}");
        assert!(matches!(
            result,
            Err(SimulationError::MalformedDocument { .. })
        ));
    }

    #[test]
    fn test_expense_document_round_trip() {
        let expense = ExpenseSnapshot {
            id: Uuid::new_v4(),
            amount: Money::from_decimal(dec!(117.00)),
            date: Utc.with_ymd_and_hms(2025, 3, 14, 0, 0, 0).unwrap(),
        };
        let doc = expense.to_document().unwrap();
        assert_eq!(ExpenseSnapshot::from_document(&doc).unwrap(), expense);
    }
}
