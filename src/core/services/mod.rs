pub mod debt_service;
pub mod guardian_service;
pub mod payment_service;
pub mod student_service;
pub mod summary_service;
pub mod transaction_service;
pub mod wallet_service;

pub use debt_service::DebtService;
pub use guardian_service::GuardianService;
pub use payment_service::PaymentService;
pub use student_service::StudentService;
pub use summary_service::SummaryService;
pub use transaction_service::TransactionService;
pub use wallet_service::WalletService;

use crate::errors::SchoolError;

pub type ServiceResult<T> = Result<T, ServiceError>;

#[derive(Debug, thiserror::Error)]
pub enum ServiceError {
    #[error(transparent)]
    School(#[from] SchoolError),
    #[error("Guardian not found: {0}")]
    GuardianNotFound(String),
    #[error("Student not found: {0}")]
    StudentNotFound(String),
    #[error("Branch not found: {0}")]
    BranchNotFound(String),
    #[error("Category not found: {0}")]
    CategoryNotFound(String),
    #[error("Invalid {field}: {message}")]
    Validation {
        field: &'static str,
        message: String,
    },
}

impl ServiceError {
    pub(crate) fn validation(field: &'static str, message: impl Into<String>) -> Self {
        ServiceError::Validation {
            field,
            message: message.into(),
        }
    }
}
