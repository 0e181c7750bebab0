use std::{fmt, str::FromStr};

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::common::{Displayable, Identifiable, MonthRef, NamedEntity};

/// Enrolled dance student.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Student {
    pub id: String,
    pub name: String,
    pub birth_date: NaiveDate,
    pub age: i32,
    pub phone: String,
    pub email: String,
    pub level: BalletLevel,
    pub class: String,
    pub branch_id: String,
    pub enrollment_date: NaiveDate,
    pub status: StudentStatus,
    pub monthly_fee: f64,
    pub guardian_id: String,
    #[serde(default)]
    pub payment_history: Vec<PaymentRecord>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub scholarship: Option<Scholarship>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub costume: Option<Costume>,
}

impl Student {
    pub fn is_active(&self) -> bool {
        self.status == StudentStatus::Ativo
    }

    pub fn payment_for(&self, month: MonthRef) -> Option<&PaymentRecord> {
        self.payment_history
            .iter()
            .find(|record| record.reference == month)
    }

    /// Costume plan, only when one was actually purchased.
    pub fn purchased_costume(&self) -> Option<&Costume> {
        self.costume.as_ref().filter(|costume| costume.purchased)
    }
}

impl Identifiable for Student {
    fn id(&self) -> &str {
        &self.id
    }
}

impl NamedEntity for Student {
    fn name(&self) -> &str {
        &self.name
    }
}

impl Displayable for Student {
    fn display_label(&self) -> String {
        format!("{} - {} ({})", self.name, self.level, self.class)
    }
}

/// Input accepted by the add-student reducer.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewStudent {
    pub name: String,
    pub birth_date: NaiveDate,
    #[serde(default)]
    pub phone: String,
    #[serde(default)]
    pub email: String,
    pub level: BalletLevel,
    pub class: String,
    pub branch_id: String,
    pub monthly_fee: f64,
    pub guardian_id: String,
    #[serde(default)]
    pub scholarship: Option<Scholarship>,
    #[serde(default)]
    pub costume: Option<NewCostume>,
}

/// Costume purchase requested at enrollment time; nothing is paid yet.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct NewCostume {
    pub purchased: bool,
    pub total_amount: f64,
    pub installments: u32,
}

impl From<NewCostume> for Costume {
    fn from(value: NewCostume) -> Self {
        Costume {
            purchased: value.purchased,
            total_amount: value.total_amount,
            installments: value.installments,
            paid_amount: 0.0,
        }
    }
}

/// Installment-billed wardrobe purchase.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct Costume {
    pub purchased: bool,
    pub total_amount: f64,
    pub installments: u32,
    pub paid_amount: f64,
}

impl Costume {
    /// Amount billed per installment; zero when no installments are set.
    pub fn per_month(&self) -> f64 {
        if self.installments == 0 {
            0.0
        } else {
            self.total_amount / f64::from(self.installments)
        }
    }

    /// Whether month index `index` (0-based from enrollment) carries an installment.
    pub fn bills_month(&self, index: u32) -> bool {
        self.purchased && index < self.installments
    }

    /// Cumulative amount expected to be paid once month `index` is settled.
    pub fn expected_paid_through(&self, index: u32) -> f64 {
        self.per_month() * f64::from(index + 1)
    }

    pub fn is_paid_through(&self, index: u32) -> bool {
        self.paid_amount >= self.expected_paid_through(index)
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct Scholarship {
    pub kind: ScholarshipKind,
    pub value: f64,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum ScholarshipKind {
    Percentage,
    Fixed,
}

/// One month of tuition billing.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PaymentRecord {
    pub id: Uuid,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date: Option<NaiveDate>,
    pub amount: f64,
    pub status: PaymentRecordStatus,
    pub reference: MonthRef,
}

impl PaymentRecord {
    pub fn is_paid(&self) -> bool {
        self.status == PaymentRecordStatus::Pago
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum PaymentRecordStatus {
    Pago,
    Pendente,
    Atrasado,
}

impl PaymentRecordStatus {
    pub fn label(&self) -> &'static str {
        match self {
            PaymentRecordStatus::Pago => "pago",
            PaymentRecordStatus::Pendente => "pendente",
            PaymentRecordStatus::Atrasado => "atrasado",
        }
    }
}

/// Current billing standing of a student.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum PaymentStatus {
    EmDia,
    Pendente,
    Atrasado,
}

impl PaymentStatus {
    pub fn label(&self) -> &'static str {
        match self {
            PaymentStatus::EmDia => "em_dia",
            PaymentStatus::Pendente => "pendente",
            PaymentStatus::Atrasado => "atrasado",
        }
    }
}

impl From<PaymentRecordStatus> for PaymentStatus {
    fn from(value: PaymentRecordStatus) -> Self {
        match value {
            PaymentRecordStatus::Pago => PaymentStatus::EmDia,
            PaymentRecordStatus::Pendente => PaymentStatus::Pendente,
            PaymentRecordStatus::Atrasado => PaymentStatus::Atrasado,
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum StudentStatus {
    Ativo,
    Inativo,
    Trancado,
}

impl StudentStatus {
    pub fn label(&self) -> &'static str {
        match self {
            StudentStatus::Ativo => "ativo",
            StudentStatus::Inativo => "inativo",
            StudentStatus::Trancado => "trancado",
        }
    }
}

impl FromStr for StudentStatus {
    type Err = String;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        match raw.trim().to_lowercase().as_str() {
            "ativo" => Ok(StudentStatus::Ativo),
            "inativo" => Ok(StudentStatus::Inativo),
            "trancado" => Ok(StudentStatus::Trancado),
            other => Err(format!("unknown student status `{other}`")),
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum BalletLevel {
    #[serde(rename = "Baby Class")]
    BabyClass,
    Iniciante,
    #[serde(rename = "Preparatório")]
    Preparatorio,
    #[serde(rename = "Intermediário")]
    Intermediario,
    #[serde(rename = "Avançado")]
    Avancado,
    Pontas,
}

impl BalletLevel {
    pub const ALL: [BalletLevel; 6] = [
        BalletLevel::BabyClass,
        BalletLevel::Iniciante,
        BalletLevel::Preparatorio,
        BalletLevel::Intermediario,
        BalletLevel::Avancado,
        BalletLevel::Pontas,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            BalletLevel::BabyClass => "Baby Class",
            BalletLevel::Iniciante => "Iniciante",
            BalletLevel::Preparatorio => "Preparatório",
            BalletLevel::Intermediario => "Intermediário",
            BalletLevel::Avancado => "Avançado",
            BalletLevel::Pontas => "Pontas",
        }
    }

    pub fn classes(&self) -> [&'static str; 2] {
        match self {
            BalletLevel::BabyClass => ["Baby A", "Baby B"],
            BalletLevel::Iniciante => ["Iniciante I", "Iniciante II"],
            BalletLevel::Preparatorio => ["Prep A", "Prep B"],
            BalletLevel::Intermediario => ["Inter I", "Inter II"],
            BalletLevel::Avancado => ["Avançado A", "Avançado B"],
            BalletLevel::Pontas => ["Pontas I", "Pontas II"],
        }
    }

    /// Standard tuition for the level.
    pub fn monthly_fee(&self) -> f64 {
        match self {
            BalletLevel::BabyClass => 70.0,
            BalletLevel::Iniciante => 100.0,
            BalletLevel::Preparatorio => 150.0,
            BalletLevel::Intermediario => 200.0,
            BalletLevel::Avancado => 250.0,
            BalletLevel::Pontas => 300.0,
        }
    }

    /// Inclusive birth-year window used by the data generator.
    pub fn birth_years(&self) -> (i32, i32) {
        match self {
            BalletLevel::BabyClass => (2019, 2021),
            BalletLevel::Iniciante => (2015, 2018),
            BalletLevel::Preparatorio => (2012, 2016),
            BalletLevel::Intermediario => (2008, 2014),
            BalletLevel::Avancado => (2004, 2012),
            BalletLevel::Pontas => (2000, 2010),
        }
    }
}

impl fmt::Display for BalletLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for BalletLevel {
    type Err = String;

    /// Accepts the display label or an ASCII slug (`baby`, `preparatorio`, ...).
    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        let needle = raw.trim().to_lowercase();
        BalletLevel::ALL
            .into_iter()
            .find(|level| {
                let label = level.label().to_lowercase();
                label == needle || fold_accents(&label) == fold_accents(&needle)
                    || (needle == "baby" && *level == BalletLevel::BabyClass)
            })
            .ok_or_else(|| format!("unknown level `{}`", raw.trim()))
    }
}

fn fold_accents(text: &str) -> String {
    text.chars()
        .map(|ch| match ch {
            'á' | 'â' | 'ã' | 'à' => 'a',
            'é' | 'ê' => 'e',
            'í' => 'i',
            'ó' | 'ô' | 'õ' => 'o',
            'ú' => 'u',
            'ç' => 'c',
            other => other,
        })
        .filter(|ch| !ch.is_whitespace())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn record_status_maps_to_payment_status() {
        assert_eq!(
            PaymentStatus::from(PaymentRecordStatus::Pago),
            PaymentStatus::EmDia
        );
        assert_eq!(
            PaymentStatus::from(PaymentRecordStatus::Pendente),
            PaymentStatus::Pendente
        );
        assert_eq!(
            PaymentStatus::from(PaymentRecordStatus::Atrasado),
            PaymentStatus::Atrasado
        );
    }

    #[test]
    fn costume_threshold_is_cumulative() {
        let costume = Costume {
            purchased: true,
            total_amount: 300.0,
            installments: 3,
            paid_amount: 200.0,
        };
        assert_eq!(costume.expected_paid_through(1), 200.0);
        assert!(costume.is_paid_through(1));
        assert!(!costume.is_paid_through(2));
        assert!(costume.bills_month(2));
        assert!(!costume.bills_month(3));
    }

    #[test]
    fn costume_without_installments_bills_nothing() {
        let costume = Costume {
            purchased: true,
            total_amount: 300.0,
            installments: 0,
            paid_amount: 0.0,
        };
        assert_eq!(costume.per_month(), 0.0);
        assert!(!costume.bills_month(0));
    }

    #[test]
    fn level_parses_labels_and_slugs() {
        assert_eq!("Avançado".parse::<BalletLevel>(), Ok(BalletLevel::Avancado));
        assert_eq!("avancado".parse::<BalletLevel>(), Ok(BalletLevel::Avancado));
        assert_eq!("baby".parse::<BalletLevel>(), Ok(BalletLevel::BabyClass));
        assert_eq!("babyclass".parse::<BalletLevel>(), Ok(BalletLevel::BabyClass));
        assert!("jazz".parse::<BalletLevel>().is_err());
    }

    #[test]
    fn payment_status_serializes_as_snake_case() {
        let json = serde_json::to_string(&PaymentStatus::EmDia).unwrap();
        assert_eq!(json, "\"em_dia\"");
    }
}
