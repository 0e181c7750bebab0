//! Demo sign-in: any non-empty credentials open a session, which is kept
//! on disk so the next run starts signed in.

pub mod access;
pub mod session;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::info;
use uuid::Uuid;

use crate::errors::SchoolError;

pub use access::{StaffDirectory, StaffMember, StaffRole};
pub use session::SessionStore;

const NAME_MIN_CHARS: usize = 2;
const PASSWORD_MIN_CHARS: usize = 6;

pub type AuthResult<T> = Result<T, AuthError>;

#[derive(Debug, Error)]
pub enum AuthError {
    #[error("Email and password are required")]
    MissingCredentials,
    #[error("Invalid {field}: {message}")]
    Validation {
        field: &'static str,
        message: String,
    },
    #[error("Email already registered: {0}")]
    DuplicateEmail(String),
    #[error("You cannot remove your own account")]
    SelfRemoval,
    #[error("Staff member not found: {0}")]
    UnknownMember(String),
    #[error("Not signed in")]
    NotSignedIn,
    #[error(transparent)]
    Storage(#[from] SchoolError),
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct User {
    pub id: String,
    pub email: String,
    pub name: String,
}

impl User {
    fn new(email: &str, name: &str) -> Self {
        Self {
            id: format!("user-{}", Uuid::new_v4().simple()),
            email: email.to_string(),
            name: name.to_string(),
        }
    }
}

/// Session state plus the staff access list.
pub struct AuthStore {
    session: SessionStore,
    user: Option<User>,
    staff: StaffDirectory,
}

impl AuthStore {
    /// Opens the store and rehydrates any persisted session.
    pub fn open(session: SessionStore) -> AuthResult<Self> {
        let user = session.load()?;
        if let Some(user) = &user {
            info!(email = %user.email, "Session restored");
        }
        Ok(Self {
            session,
            user,
            staff: StaffDirectory::seeded(),
        })
    }

    pub fn current_user(&self) -> Option<&User> {
        self.user.as_ref()
    }

    pub fn is_authenticated(&self) -> bool {
        self.user.is_some()
    }

    /// Signs in with any non-empty email and password. The display name is
    /// the local part of the email.
    pub fn login(&mut self, email: &str, password: &str) -> AuthResult<&User> {
        let email = email.trim();
        if email.is_empty() || password.is_empty() {
            return Err(AuthError::MissingCredentials);
        }
        let name = email.split('@').next().unwrap_or(email);
        let user = User::new(email, name);
        self.begin(user)
    }

    /// Creates a staff account and signs into it.
    pub fn register(&mut self, name: &str, email: &str, password: &str) -> AuthResult<&User> {
        let (name, email) = (name.trim(), email.trim());
        if name.is_empty() || email.is_empty() || password.is_empty() {
            return Err(AuthError::MissingCredentials);
        }
        if name.chars().count() < NAME_MIN_CHARS {
            return Err(AuthError::Validation {
                field: "name",
                message: format!("must have at least {NAME_MIN_CHARS} characters"),
            });
        }
        if password.chars().count() < PASSWORD_MIN_CHARS {
            return Err(AuthError::Validation {
                field: "password",
                message: format!("must have at least {PASSWORD_MIN_CHARS} characters"),
            });
        }
        self.staff.add(name, email, StaffRole::Secretaria)?;
        self.begin(User::new(email, name))
    }

    pub fn logout(&mut self) -> AuthResult<()> {
        if let Some(user) = self.user.take() {
            info!(email = %user.email, "Signed out");
        }
        self.session.clear()?;
        Ok(())
    }

    pub fn staff(&self) -> &StaffDirectory {
        &self.staff
    }

    pub fn add_staff(&mut self, name: &str, email: &str, role: StaffRole) -> AuthResult<&StaffMember> {
        self.staff.add(name, email, role)
    }

    /// Removes a staff member; the signed-in user cannot remove themself.
    pub fn remove_staff(&mut self, key: &str) -> AuthResult<StaffMember> {
        let acting = self.user.as_ref().map(|user| user.email.as_str());
        self.staff.remove(key, acting)
    }

    fn begin(&mut self, user: User) -> AuthResult<&User> {
        self.session.save(&user)?;
        info!(email = %user.email, "Signed in");
        Ok(self.user.insert(user))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn store(dir: &tempfile::TempDir) -> AuthStore {
        AuthStore::open(SessionStore::with_path(dir.path().join("session.json"))).unwrap()
    }

    #[test]
    fn login_accepts_any_non_empty_credentials() {
        let dir = tempfile::tempdir().unwrap();
        let mut auth = store(&dir);
        assert!(matches!(auth.login("", "x"), Err(AuthError::MissingCredentials)));
        assert!(matches!(auth.login("a@b.com", ""), Err(AuthError::MissingCredentials)));

        let user = auth.login("diretora@escola.com", "1").unwrap();
        assert_eq!(user.name, "diretora");
        assert!(auth.is_authenticated());
    }

    #[test]
    fn session_survives_reopen_until_logout() {
        let dir = tempfile::tempdir().unwrap();
        store(&dir).login("ana@escola.com", "secret").unwrap();

        let mut reopened = store(&dir);
        assert_eq!(reopened.current_user().unwrap().email, "ana@escola.com");
        reopened.logout().unwrap();
        assert!(!store(&dir).is_authenticated());
    }

    #[test]
    fn register_rejects_duplicates_and_short_passwords() {
        let dir = tempfile::tempdir().unwrap();
        let mut auth = store(&dir);
        assert!(matches!(
            auth.register("Nova", "admin@balletmanager.com", "segredo1"),
            Err(AuthError::DuplicateEmail(_))
        ));
        assert!(matches!(
            auth.register("Nova", "nova@escola.com", "123"),
            Err(AuthError::Validation { field: "password", .. })
        ));
        let user = auth.register("Nova", "nova@escola.com", "segredo1").unwrap();
        assert_eq!(user.name, "Nova");
        assert!(auth.staff().contains_email("nova@escola.com"));
        assert!(matches!(auth.remove_staff("nova@escola.com"), Err(AuthError::SelfRemoval)));
    }
}
