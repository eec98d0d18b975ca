//! Signed-in user session.
//!
//! A session exists from a successful login until logout. It lives in
//! `AppState` for command handlers and is dual-written to the local store
//! so a restarted app resumes signed in. Role is a closed enum — an
//! unrecognized role string from the backend is rejected at the login
//! boundary instead of silently falling back to a default.

use rusqlite::Connection;
use serde::{Deserialize, Serialize};

use crate::db::repository::kv;
use crate::db::StoreError;

/// Account role. Gates which dashboard panels a user sees.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    Individual,
    Doctor,
    Admin,
    Employee,
}

impl Role {
    /// Staff roles share the admin dashboard panels.
    pub fn is_staff(&self) -> bool {
        matches!(self, Self::Admin | Self::Employee)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Individual => "individual",
            Self::Doctor => "doctor",
            Self::Admin => "admin",
            Self::Employee => "employee",
        }
    }
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for Role {
    type Err = SessionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "individual" => Ok(Self::Individual),
            "doctor" => Ok(Self::Doctor),
            "admin" => Ok(Self::Admin),
            "employee" => Ok(Self::Employee),
            other => Err(SessionError::UnknownRole(other.to_string())),
        }
    }
}

/// Which greeting the dashboard shows for this login.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WelcomeKind {
    /// First login on this machine for this account.
    First,
    /// The account has signed in here before.
    Back,
}

impl WelcomeKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::First => "first",
            Self::Back => "back",
        }
    }

    pub fn parse(s: &str) -> Self {
        match s {
            "back" => Self::Back,
            _ => Self::First,
        }
    }
}

/// The signed-in user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserSession {
    pub name: String,
    pub role: Role,
    pub email: String,
}

impl UserSession {
    /// Dashboard greeting. Doctors are always addressed with their title;
    /// everyone else gets "Welcome back" once the account has visited.
    pub fn welcome_message(&self, kind: WelcomeKind) -> String {
        match self.role {
            Role::Doctor => format!("Welcome, Dr. {}", self.name),
            _ => match kind {
                WelcomeKind::Back => format!("Welcome back, {}", self.name),
                WelcomeKind::First => format!("Welcome, {}", self.name),
            },
        }
    }
}

/// Errors from session parsing/persistence.
#[derive(Debug, thiserror::Error)]
pub enum SessionError {
    #[error("Unknown role: {0}")]
    UnknownRole(String),
    #[error("Store error: {0}")]
    Store(#[from] StoreError),
}

/// Persist a session to the store (login).
pub fn persist(conn: &Connection, session: &UserSession) -> Result<(), StoreError> {
    kv::set_value(conn, kv::KEY_USER_NAME, &session.name)?;
    kv::set_value(conn, kv::KEY_USER_ROLE, session.role.as_str())?;
    kv::set_value(conn, kv::KEY_USER_EMAIL, &session.email)?;
    Ok(())
}

/// Load the persisted session, if any. The display-name row is the session
/// marker: without it there is no session, whatever else is present.
pub fn load(conn: &Connection) -> Result<Option<UserSession>, SessionError> {
    let Some(name) = kv::get_value(conn, kv::KEY_USER_NAME)? else {
        return Ok(None);
    };
    let role = kv::get_value(conn, kv::KEY_USER_ROLE)?
        .unwrap_or_else(|| "individual".to_string())
        .parse()?;
    let email = kv::get_value(conn, kv::KEY_USER_EMAIL)?.unwrap_or_default();
    Ok(Some(UserSession { name, role, email }))
}

/// Record the welcome kind for this login and flip the per-account
/// visited marker for the next one.
pub fn mark_visit(conn: &Connection, email: &str) -> Result<WelcomeKind, StoreError> {
    let marker = kv::visited_key(email);
    let kind = if kv::get_value(conn, &marker)?.is_some() {
        WelcomeKind::Back
    } else {
        kv::set_value(conn, &marker, "true")?;
        WelcomeKind::First
    };
    kv::set_value(conn, kv::KEY_WELCOME_TYPE, kind.as_str())?;
    Ok(kind)
}

/// The welcome kind recorded at the last login.
pub fn welcome_kind(conn: &Connection) -> Result<WelcomeKind, StoreError> {
    Ok(kv::get_value(conn, kv::KEY_WELCOME_TYPE)?
        .map(|v| WelcomeKind::parse(&v))
        .unwrap_or(WelcomeKind::First))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::sqlite::open_memory_store;

    fn asha() -> UserSession {
        UserSession {
            name: "Asha".into(),
            role: Role::Individual,
            email: "asha@example.in".into(),
        }
    }

    #[test]
    fn role_round_trip() {
        for role in [Role::Individual, Role::Doctor, Role::Admin, Role::Employee] {
            assert_eq!(role.as_str().parse::<Role>().unwrap(), role);
        }
    }

    #[test]
    fn role_parse_is_case_insensitive() {
        assert_eq!("Doctor".parse::<Role>().unwrap(), Role::Doctor);
        assert_eq!(" ADMIN ".parse::<Role>().unwrap(), Role::Admin);
    }

    #[test]
    fn unknown_role_is_rejected() {
        let err = "superuser".parse::<Role>().unwrap_err();
        assert!(matches!(err, SessionError::UnknownRole(_)));
    }

    #[test]
    fn staff_roles() {
        assert!(Role::Admin.is_staff());
        assert!(Role::Employee.is_staff());
        assert!(!Role::Doctor.is_staff());
        assert!(!Role::Individual.is_staff());
    }

    #[test]
    fn welcome_messages() {
        let user = asha();
        assert_eq!(user.welcome_message(WelcomeKind::First), "Welcome, Asha");
        assert_eq!(user.welcome_message(WelcomeKind::Back), "Welcome back, Asha");

        let doc = UserSession {
            name: "Meera".into(),
            role: Role::Doctor,
            email: "meera@example.in".into(),
        };
        // Doctors keep their title whatever the visit count
        assert_eq!(doc.welcome_message(WelcomeKind::First), "Welcome, Dr. Meera");
        assert_eq!(doc.welcome_message(WelcomeKind::Back), "Welcome, Dr. Meera");
    }

    #[test]
    fn persist_and_load_round_trip() {
        let conn = open_memory_store().unwrap();
        persist(&conn, &asha()).unwrap();
        let loaded = load(&conn).unwrap().unwrap();
        assert_eq!(loaded, asha());
    }

    #[test]
    fn no_name_row_means_no_session() {
        let conn = open_memory_store().unwrap();
        assert!(load(&conn).unwrap().is_none());
    }

    #[test]
    fn first_visit_then_back() {
        let conn = open_memory_store().unwrap();
        assert_eq!(
            mark_visit(&conn, "asha@example.in").unwrap(),
            WelcomeKind::First
        );
        assert_eq!(
            mark_visit(&conn, "asha@example.in").unwrap(),
            WelcomeKind::Back
        );
        // A different account on the same machine starts fresh
        assert_eq!(
            mark_visit(&conn, "ravi@example.in").unwrap(),
            WelcomeKind::First
        );
        assert_eq!(welcome_kind(&conn).unwrap(), WelcomeKind::First);
    }
}
