use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::common::{Displayable, Identifiable, NamedEntity};

/// Financially responsible party for one or more students.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Guardian {
    pub id: String,
    pub name: String,
    pub phone: String,
    pub email: String,
    pub cpf: String,
    pub relationship: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,
    #[serde(default)]
    pub student_ids: Vec<String>,
    #[serde(default)]
    pub wallet: Wallet,
}

impl Guardian {
    pub fn from_new(id: impl Into<String>, data: NewGuardian) -> Self {
        Self {
            id: id.into(),
            name: data.name,
            phone: data.phone,
            email: data.email,
            cpf: data.cpf,
            relationship: data.relationship,
            address: data.address,
            student_ids: Vec::new(),
            wallet: Wallet::default(),
        }
    }

    /// Initials shown next to guardian names, e.g. `MS` for "Maria Silva".
    pub fn initials(&self) -> String {
        self.name
            .split_whitespace()
            .filter_map(|part| part.chars().next())
            .take(2)
            .flat_map(char::to_uppercase)
            .collect()
    }
}

impl Identifiable for Guardian {
    fn id(&self) -> &str {
        &self.id
    }
}

impl NamedEntity for Guardian {
    fn name(&self) -> &str {
        &self.name
    }
}

impl Displayable for Guardian {
    fn display_label(&self) -> String {
        format!("{} ({})", self.name, self.relationship)
    }
}

/// Input accepted by the add-guardian reducer.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct NewGuardian {
    pub name: String,
    pub phone: String,
    pub email: String,
    pub cpf: String,
    pub relationship: String,
    #[serde(default)]
    pub address: Option<String>,
}

/// Running debt account. A positive balance is money owed by the guardian.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct Wallet {
    pub balance: f64,
    #[serde(default)]
    pub ledger: Vec<LedgerEntry>,
}

impl Wallet {
    pub fn is_in_credit(&self) -> bool {
        self.balance < 0.0
    }
}

/// Immutable record of one balance-affecting event.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct LedgerEntry {
    pub id: Uuid,
    pub date: NaiveDate,
    pub description: String,
    pub amount: f64,
    #[serde(rename = "type")]
    pub kind: EntryKind,
    pub category: EntryCategory,
}

impl LedgerEntry {
    pub fn new(
        kind: EntryKind,
        amount: f64,
        category: EntryCategory,
        description: impl Into<String>,
        date: NaiveDate,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            date,
            description: description.into(),
            amount,
            kind,
            category,
        }
    }

    /// Effect of the entry on the wallet balance.
    pub fn signed_amount(&self) -> f64 {
        match self.kind {
            EntryKind::Debit => self.amount,
            EntryKind::Credit => -self.amount,
        }
    }
}

/// Debits increase the owed amount, credits decrease it.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum EntryKind {
    Debit,
    Credit,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum EntryCategory {
    Tuition,
    Costume,
    Material,
    Other,
}

impl EntryCategory {
    pub fn label(&self) -> &'static str {
        match self {
            EntryCategory::Tuition => "Mensalidades",
            EntryCategory::Costume => "Figurino",
            EntryCategory::Material => "Material",
            EntryCategory::Other => "Outros",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn initials_take_first_two_words() {
        let guardian = Guardian::from_new(
            "grd-1",
            NewGuardian {
                name: "maria clara silva".into(),
                ..NewGuardian::default()
            },
        );
        assert_eq!(guardian.initials(), "MC");
        assert!(guardian.student_ids.is_empty());
        assert_eq!(guardian.wallet.balance, 0.0);
    }

    #[test]
    fn ledger_entry_serializes_kind_as_type() {
        let date = NaiveDate::from_ymd_opt(2024, 5, 1).unwrap();
        let entry = LedgerEntry::new(
            EntryKind::Credit,
            40.0,
            EntryCategory::Other,
            "Pagamento",
            date,
        );
        let json = serde_json::to_value(&entry).unwrap();
        assert_eq!(json["type"], "credit");
        assert_eq!(json["category"], "other");
        assert_eq!(entry.signed_amount(), -40.0);
    }
}
