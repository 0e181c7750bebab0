//! Staff members allowed into the back office.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::{AuthError, AuthResult};

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum StaffRole {
    Admin,
    Secretaria,
    Professor,
}

impl StaffRole {
    pub fn label(&self) -> &'static str {
        match self {
            StaffRole::Admin => "admin",
            StaffRole::Secretaria => "secretaria",
            StaffRole::Professor => "professor",
        }
    }

    pub fn parse(raw: &str) -> Option<Self> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "admin" | "administrador" => Some(StaffRole::Admin),
            "secretaria" | "secretary" => Some(StaffRole::Secretaria),
            "professor" | "professora" | "teacher" => Some(StaffRole::Professor),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct StaffMember {
    pub id: String,
    pub name: String,
    pub email: String,
    pub role: StaffRole,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct StaffDirectory {
    members: Vec<StaffMember>,
}

impl StaffDirectory {
    /// Directory with the built-in administrator account.
    pub fn seeded() -> Self {
        Self {
            members: vec![StaffMember {
                id: "staff-admin".into(),
                name: "Administrador".into(),
                email: "admin@balletmanager.com".into(),
                role: StaffRole::Admin,
            }],
        }
    }

    pub fn members(&self) -> &[StaffMember] {
        &self.members
    }

    pub fn contains_email(&self, email: &str) -> bool {
        self.members
            .iter()
            .any(|member| member.email.eq_ignore_ascii_case(email.trim()))
    }

    pub fn add(&mut self, name: &str, email: &str, role: StaffRole) -> AuthResult<&StaffMember> {
        let (name, email) = (name.trim(), email.trim());
        if name.is_empty() || email.is_empty() {
            return Err(AuthError::MissingCredentials);
        }
        if self.contains_email(email) {
            return Err(AuthError::DuplicateEmail(email.to_string()));
        }
        self.members.push(StaffMember {
            id: format!("staff-{}", Uuid::new_v4().simple()),
            name: name.to_string(),
            email: email.to_string(),
            role,
        });
        let index = self.members.len() - 1;
        Ok(&self.members[index])
    }

    /// Removes a member by id or email. `acting_email` cannot remove itself.
    pub fn remove(&mut self, key: &str, acting_email: Option<&str>) -> AuthResult<StaffMember> {
        let key = key.trim();
        let index = self
            .members
            .iter()
            .position(|member| member.id == key || member.email.eq_ignore_ascii_case(key))
            .ok_or_else(|| AuthError::UnknownMember(key.to_string()))?;
        if acting_email.map_or(false, |acting| {
            self.members[index].email.eq_ignore_ascii_case(acting)
        }) {
            return Err(AuthError::SelfRemoval);
        }
        Ok(self.members.remove(index))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn duplicate_email_is_case_insensitive() {
        let mut directory = StaffDirectory::seeded();
        let err = directory
            .add("Outra", "ADMIN@balletmanager.com", StaffRole::Secretaria)
            .unwrap_err();
        assert!(matches!(err, AuthError::DuplicateEmail(_)));
        assert_eq!(directory.members().len(), 1);
    }

    #[test]
    fn cannot_remove_own_account() {
        let mut directory = StaffDirectory::seeded();
        let id = directory
            .add("Paula", "paula@escola.com", StaffRole::Professor)
            .unwrap()
            .id
            .clone();
        assert!(matches!(
            directory.remove("paula@escola.com", Some("paula@escola.com")),
            Err(AuthError::SelfRemoval)
        ));
        let removed = directory.remove(&id, Some("admin@balletmanager.com")).unwrap();
        assert_eq!(removed.name, "Paula");
        assert!(matches!(
            directory.remove(&id, None),
            Err(AuthError::UnknownMember(_))
        ));
    }
}
