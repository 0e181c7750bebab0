use std::fmt;

use serde::{Deserialize, Serialize};

use super::common::{Identifiable, NamedEntity};

/// Identifier reserved for the "every branch" selector.
pub const ALL_BRANCHES: &str = "all";

/// A physical school location.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Branch {
    pub id: String,
    pub name: String,
    pub address: String,
    pub phone: String,
}

impl Branch {
    pub fn new(
        id: impl Into<String>,
        name: impl Into<String>,
        address: impl Into<String>,
        phone: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            address: address.into(),
            phone: phone.into(),
        }
    }
}

impl Identifiable for Branch {
    fn id(&self) -> &str {
        &self.id
    }
}

impl NamedEntity for Branch {
    fn name(&self) -> &str {
        &self.name
    }
}

/// Branch selector applied to student and transaction views.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum BranchFilter {
    #[default]
    All,
    Only(String),
}

impl BranchFilter {
    pub fn parse(raw: &str) -> Self {
        let trimmed = raw.trim();
        if trimmed.is_empty() || trimmed.eq_ignore_ascii_case(ALL_BRANCHES) {
            BranchFilter::All
        } else {
            BranchFilter::Only(trimmed.to_string())
        }
    }

    pub fn matches(&self, branch_id: &str) -> bool {
        match self {
            BranchFilter::All => true,
            BranchFilter::Only(id) => id == branch_id,
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            BranchFilter::All => ALL_BRANCHES,
            BranchFilter::Only(id) => id,
        }
    }
}

impl fmt::Display for BranchFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl From<String> for BranchFilter {
    fn from(value: String) -> Self {
        BranchFilter::parse(&value)
    }
}

impl From<BranchFilter> for String {
    fn from(value: BranchFilter) -> Self {
        value.as_str().to_string()
    }
}
