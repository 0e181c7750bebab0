//! Guardian form validation and lookup.

use crate::core::services::{ServiceError, ServiceResult};
use crate::domain::{Guardian, NewGuardian};

const NAME_MIN_CHARS: usize = 2;
const PHONE_MIN_CHARS: usize = 10;
const CPF_MIN_CHARS: usize = 11;

pub struct GuardianService;

impl GuardianService {
    /// Applies the registration form rules and returns the trimmed form.
    pub fn validate(mut data: NewGuardian) -> ServiceResult<NewGuardian> {
        data.name = data.name.trim().to_string();
        data.phone = data.phone.trim().to_string();
        data.email = data.email.trim().to_string();
        data.cpf = data.cpf.trim().to_string();
        data.relationship = data.relationship.trim().to_string();
        data.address = data
            .address
            .map(|address| address.trim().to_string())
            .filter(|address| !address.is_empty());

        if data.name.chars().count() < NAME_MIN_CHARS {
            return Err(ServiceError::validation(
                "name",
                format!("must have at least {NAME_MIN_CHARS} characters"),
            ));
        }
        if data.phone.chars().count() < PHONE_MIN_CHARS {
            return Err(ServiceError::validation(
                "phone",
                format!("must have at least {PHONE_MIN_CHARS} characters"),
            ));
        }
        if !is_plausible_email(&data.email) {
            return Err(ServiceError::validation("email", "is not a valid address"));
        }
        if data.cpf.chars().count() < CPF_MIN_CHARS {
            return Err(ServiceError::validation(
                "cpf",
                format!("must have at least {CPF_MIN_CHARS} characters"),
            ));
        }
        if data.relationship.is_empty() {
            return Err(ServiceError::validation("relationship", "is required"));
        }
        Ok(data)
    }

    /// Case-insensitive match on name, email or CPF. An empty query matches all.
    pub fn search<'a>(
        guardians: impl IntoIterator<Item = &'a Guardian>,
        query: &str,
    ) -> Vec<&'a Guardian> {
        let needle = query.trim().to_lowercase();
        guardians
            .into_iter()
            .filter(|guardian| {
                needle.is_empty()
                    || guardian.name.to_lowercase().contains(&needle)
                    || guardian.email.to_lowercase().contains(&needle)
                    || guardian.cpf.contains(&needle)
            })
            .collect()
    }
}

/// `local@domain.tld` shape: an `@` with a dot somewhere after it.
fn is_plausible_email(email: &str) -> bool {
    match email.split_once('@') {
        Some((local, domain)) => {
            !local.is_empty()
                && !email.contains(char::is_whitespace)
                && domain
                    .find('.')
                    .map_or(false, |dot| dot > 0 && dot + 1 < domain.len())
        }
        None => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn form() -> NewGuardian {
        NewGuardian {
            name: " Ana Souza ".into(),
            phone: "(11) 98765-4321".into(),
            email: "ana@email.com".into(),
            cpf: "123.456.789-00".into(),
            relationship: "Mãe".into(),
            address: Some("  ".into()),
        }
    }

    #[test]
    fn accepts_and_trims_a_complete_form() {
        let data = GuardianService::validate(form()).unwrap();
        assert_eq!(data.name, "Ana Souza");
        assert!(data.address.is_none());
    }

    #[test]
    fn rejects_each_broken_field() {
        let cases: [(&str, fn(&mut NewGuardian)); 5] = [
            ("name", |g| g.name = "A".into()),
            ("phone", |g| g.phone = "1234".into()),
            ("email", |g| g.email = "ana@email".into()),
            ("cpf", |g| g.cpf = "123".into()),
            ("relationship", |g| g.relationship = " ".into()),
        ];
        for (expected, breaker) in cases {
            let mut data = form();
            breaker(&mut data);
            match GuardianService::validate(data) {
                Err(ServiceError::Validation { field, .. }) => assert_eq!(field, expected),
                other => panic!("expected {expected} validation error, got {other:?}"),
            }
        }
    }

    #[test]
    fn email_shape() {
        assert!(is_plausible_email("a@b.co"));
        assert!(!is_plausible_email("@b.co"));
        assert!(!is_plausible_email("a@.co"));
        assert!(!is_plausible_email("a@bco."));
        assert!(!is_plausible_email("a b@c.com"));
    }

    #[test]
    fn search_matches_name_email_and_cpf() {
        let ana = Guardian::from_new("grd-1", GuardianService::validate(form()).unwrap());
        let mut other = form();
        other.name = "Carlos Lima".into();
        other.email = "carlos@escola.com".into();
        other.cpf = "987.654.321-00".into();
        let carlos = Guardian::from_new("grd-2", GuardianService::validate(other).unwrap());
        let all = vec![ana, carlos];

        assert_eq!(GuardianService::search(&all, "ANA")[0].id, "grd-1");
        assert_eq!(GuardianService::search(&all, "escola")[0].id, "grd-2");
        assert_eq!(GuardianService::search(&all, "987.654")[0].id, "grd-2");
        assert_eq!(GuardianService::search(&all, "").len(), 2);
    }
}
