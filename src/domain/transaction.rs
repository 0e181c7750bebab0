use std::{fmt, str::FromStr};

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Cash-flow event recorded against a branch.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Transaction {
    pub id: Uuid,
    pub date: NaiveDate,
    pub description: String,
    pub amount: f64,
    #[serde(rename = "type")]
    pub kind: TransactionKind,
    pub category_id: String,
    pub branch_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub student_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub guardian_id: Option<String>,
}

impl Transaction {
    pub fn from_new(data: NewTransaction) -> Self {
        Self {
            id: Uuid::new_v4(),
            date: data.date,
            description: data.description,
            amount: data.amount,
            kind: data.kind,
            category_id: data.category_id,
            branch_id: data.branch_id,
            student_id: data.student_id,
            guardian_id: data.guardian_id,
        }
    }

    pub fn is_revenue(&self) -> bool {
        self.kind == TransactionKind::Receita
    }

    pub fn is_expense(&self) -> bool {
        self.kind == TransactionKind::Despesa
    }
}

/// Input accepted by the add-transaction reducer.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewTransaction {
    pub date: NaiveDate,
    pub description: String,
    pub amount: f64,
    pub kind: TransactionKind,
    pub category_id: String,
    pub branch_id: String,
    #[serde(default)]
    pub student_id: Option<String>,
    #[serde(default)]
    pub guardian_id: Option<String>,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum TransactionKind {
    Receita,
    Despesa,
}

impl TransactionKind {
    pub fn label(&self) -> &'static str {
        match self {
            TransactionKind::Receita => "receita",
            TransactionKind::Despesa => "despesa",
        }
    }
}

impl fmt::Display for TransactionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for TransactionKind {
    type Err = String;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        match raw.trim().to_lowercase().as_str() {
            "receita" | "revenue" | "income" => Ok(TransactionKind::Receita),
            "despesa" | "expense" => Ok(TransactionKind::Despesa),
            other => Err(format!("unknown transaction type `{other}`")),
        }
    }
}
