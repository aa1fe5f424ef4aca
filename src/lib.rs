pub mod config;
pub mod decimal;
pub mod errors;
pub mod records;
pub mod schedule;
pub mod simulation;

// re-export key types
pub use config::EngineConfig;
pub use decimal::{Money, Rate};
pub use errors::{Result, SimulationError};
pub use records::{ExpenseSnapshot, Loan, LoanId, LoanKind, RepaymentMethod};
pub use schedule::{monthly_installment, project, ProjectedSchedule, ScheduleEntry};
pub use simulation::{
    reconstruct, simulate_tax_shock, ExpenseAdjustment, LoanPosition, RateShockResult,
    RateShockSimulator, TaxShockReport,
};

// re-export external dependencies that users will need
pub use chrono;
pub use hourglass_rs::{SafeTimeProvider, TimeSource};
pub use rust_decimal::Decimal;
pub use uuid::Uuid;
