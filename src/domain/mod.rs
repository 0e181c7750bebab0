//! School domain models: branches, guardians and their wallets, students and
//! their billing history, and the cash-flow ledger.

pub mod branch;
pub mod category;
pub mod common;
pub mod guardian;
pub mod notification;
pub mod promise;
pub mod student;
pub mod transaction;

pub use branch::{Branch, BranchFilter, ALL_BRANCHES};
pub use category::{TransactionCategory, TUITION_CATEGORY_ID};
pub use common::{find_by_id, Displayable, Identifiable, MonthRef, NamedEntity};
pub use guardian::{EntryCategory, EntryKind, Guardian, LedgerEntry, NewGuardian, Wallet};
pub use notification::{Notification, NotificationKind};
pub use promise::PaymentPromise;
pub use student::{
    BalletLevel, Costume, NewCostume, NewStudent, PaymentRecord, PaymentRecordStatus,
    PaymentStatus, Scholarship, ScholarshipKind, Student, StudentStatus,
};
pub use transaction::{NewTransaction, Transaction, TransactionKind};

// Re-export common dependencies so consumers can rely on this module as a façade.
pub use chrono;
pub use serde;
pub use uuid;
