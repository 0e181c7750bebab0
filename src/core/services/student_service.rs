//! Enrollment form validation, student construction and list filters.

use chrono::{Datelike, NaiveDate};

use crate::core::services::{ServiceError, ServiceResult};
use crate::domain::{
    BalletLevel, Branch, Costume, Guardian, NewStudent, ScholarshipKind, Student, StudentStatus,
};

const NAME_MIN_CHARS: usize = 2;
const MIN_MONTHLY_FEE: f64 = 1.0;
pub const MAX_COSTUME_INSTALLMENTS: u32 = 3;

/// Filters offered by the students page.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StudentFilter {
    pub search: Option<String>,
    pub level: Option<BalletLevel>,
    pub status: Option<StudentStatus>,
}

pub struct StudentService;

impl StudentService {
    pub fn validate(mut data: NewStudent, branches: &[Branch]) -> ServiceResult<NewStudent> {
        data.name = data.name.trim().to_string();
        data.class = data.class.trim().to_string();

        if data.name.chars().count() < NAME_MIN_CHARS {
            return Err(ServiceError::validation(
                "name",
                format!("must have at least {NAME_MIN_CHARS} characters"),
            ));
        }
        if data.class.is_empty() {
            return Err(ServiceError::validation("class", "is required"));
        }
        if !data.monthly_fee.is_finite() || data.monthly_fee < MIN_MONTHLY_FEE {
            return Err(ServiceError::validation(
                "monthly_fee",
                format!("must be at least {MIN_MONTHLY_FEE}"),
            ));
        }
        if !branches.iter().any(|branch| branch.id == data.branch_id) {
            return Err(ServiceError::BranchNotFound(data.branch_id.clone()));
        }

        if let Some(scholarship) = data.scholarship {
            let in_range = match scholarship.kind {
                ScholarshipKind::Percentage => (0.0..=100.0).contains(&scholarship.value),
                ScholarshipKind::Fixed => scholarship.value >= 0.0,
            };
            if !in_range {
                return Err(ServiceError::validation("scholarship", "value out of range"));
            }
        }

        if let Some(costume) = data.costume.filter(|costume| costume.purchased) {
            if !(1..=MAX_COSTUME_INSTALLMENTS).contains(&costume.installments) {
                return Err(ServiceError::validation(
                    "costume.installments",
                    format!("must be between 1 and {MAX_COSTUME_INSTALLMENTS}"),
                ));
            }
            if !costume.total_amount.is_finite() || costume.total_amount <= 0.0 {
                return Err(ServiceError::validation(
                    "costume.total_amount",
                    "must be a positive amount",
                ));
            }
        }
        Ok(data)
    }

    /// Builds a freshly enrolled student: active, enrolled `today`, no
    /// billing history yet and nothing paid on the costume.
    pub fn enroll(id: impl Into<String>, data: NewStudent, today: NaiveDate) -> Student {
        Student {
            id: id.into(),
            age: Self::age_on(data.birth_date, today),
            name: data.name,
            birth_date: data.birth_date,
            phone: data.phone,
            email: data.email,
            level: data.level,
            class: data.class,
            branch_id: data.branch_id,
            enrollment_date: today,
            status: StudentStatus::Ativo,
            monthly_fee: data.monthly_fee,
            guardian_id: data.guardian_id,
            payment_history: Vec::new(),
            scholarship: data.scholarship,
            costume: data.costume.map(Costume::from),
        }
    }

    /// Age by calendar year difference, as shown on enrollment cards.
    pub fn age_on(birth_date: NaiveDate, today: NaiveDate) -> i32 {
        today.year() - birth_date.year()
    }

    /// Applies `filter`; the text search also looks at the guardian's name.
    pub fn filter<'a>(
        students: impl IntoIterator<Item = &'a Student>,
        guardians: &[Guardian],
        filter: &StudentFilter,
    ) -> Vec<&'a Student> {
        let needle = filter
            .search
            .as_deref()
            .map(|query| query.trim().to_lowercase())
            .filter(|query| !query.is_empty());

        students
            .into_iter()
            .filter(|student| filter.level.map_or(true, |level| student.level == level))
            .filter(|student| filter.status.map_or(true, |status| student.status == status))
            .filter(|student| match &needle {
                None => true,
                Some(needle) => {
                    student.name.to_lowercase().contains(needle)
                        || student.email.to_lowercase().contains(needle)
                        || guardians
                            .iter()
                            .find(|guardian| guardian.id == student.guardian_id)
                            .map_or(false, |guardian| {
                                guardian.name.to_lowercase().contains(needle)
                            })
                }
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{NewCostume, NewGuardian, Scholarship};

    fn ymd(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn branches() -> Vec<Branch> {
        vec![Branch::new("centro", "Unidade Centro", "Rua A", "(11) 0000-0000")]
    }

    fn form() -> NewStudent {
        NewStudent {
            name: "Beatriz Alves".into(),
            birth_date: ymd(2014, 6, 1),
            phone: String::new(),
            email: "bia@email.com".into(),
            level: BalletLevel::Preparatorio,
            class: "Prep A".into(),
            branch_id: "centro".into(),
            monthly_fee: 150.0,
            guardian_id: "grd-1".into(),
            scholarship: None,
            costume: None,
        }
    }

    #[test]
    fn enroll_sets_defaults() {
        let data = StudentService::validate(form(), &branches()).unwrap();
        let student = StudentService::enroll("std-1", data, ymd(2024, 3, 5));
        assert_eq!(student.age, 10);
        assert_eq!(student.enrollment_date, ymd(2024, 3, 5));
        assert_eq!(student.status, StudentStatus::Ativo);
        assert!(student.payment_history.is_empty());
    }

    #[test]
    fn costume_rules_apply_only_when_purchased() {
        let mut data = form();
        data.costume = Some(NewCostume {
            purchased: false,
            total_amount: 0.0,
            installments: 0,
        });
        assert!(StudentService::validate(data.clone(), &branches()).is_ok());

        data.costume = Some(NewCostume {
            purchased: true,
            total_amount: 200.0,
            installments: 4,
        });
        let err = StudentService::validate(data.clone(), &branches()).unwrap_err();
        assert!(matches!(
            err,
            ServiceError::Validation { field: "costume.installments", .. }
        ));

        data.costume = Some(NewCostume {
            purchased: true,
            total_amount: 0.0,
            installments: 2,
        });
        assert!(StudentService::validate(data, &branches()).is_err());
    }

    #[test]
    fn fee_branch_and_scholarship_are_checked() {
        let mut data = form();
        data.monthly_fee = 0.5;
        assert!(StudentService::validate(data, &branches()).is_err());

        let mut data = form();
        data.branch_id = "zona-oeste".into();
        assert!(matches!(
            StudentService::validate(data, &branches()),
            Err(ServiceError::BranchNotFound(_))
        ));

        let mut data = form();
        data.scholarship = Some(Scholarship {
            kind: ScholarshipKind::Percentage,
            value: 120.0,
        });
        assert!(StudentService::validate(data, &branches()).is_err());
    }

    #[test]
    fn search_reaches_guardian_name() {
        let guardian = Guardian::from_new(
            "grd-1",
            NewGuardian {
                name: "Helena Prado".into(),
                ..NewGuardian::default()
            },
        );
        let student = StudentService::enroll("std-1", form(), ymd(2024, 1, 1));
        let students = vec![student];
        let guardians = vec![guardian];

        let by_guardian = StudentFilter {
            search: Some("prado".into()),
            ..StudentFilter::default()
        };
        assert_eq!(StudentService::filter(&students, &guardians, &by_guardian).len(), 1);

        let wrong_level = StudentFilter {
            level: Some(BalletLevel::Pontas),
            ..StudentFilter::default()
        };
        assert!(StudentService::filter(&students, &guardians, &wrong_level).is_empty());

        let inactive = StudentFilter {
            status: Some(StudentStatus::Inativo),
            ..StudentFilter::default()
        };
        assert!(StudentService::filter(&students, &guardians, &inactive).is_empty());
    }
}
