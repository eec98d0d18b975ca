//! Login / register / logout IPC commands.
//!
//! Login is the only Anonymous → Authenticated transition: a successful
//! backend response writes name/role/email to the store and `AppState`.
//! Logout wipes the entire local store and drops the session.

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tauri::State;

use crate::backend::RegisterRequest;
use crate::core_state::AppState;
use crate::schedule;
use crate::session::{self, Role, UserSession, WelcomeKind};
use crate::submit_gate::FormKind;

/// Password charset: alphanumerics plus the accepted specials.
const PASSWORD_SPECIALS: &str = "!@#$%^&*";

/// Password policy: at least 8 characters, at least one digit, at least
/// one special, nothing outside the allowed charset.
pub fn password_is_strong(password: &str) -> bool {
    let charset =
        regex::Regex::new(r"^[a-zA-Z0-9!@#$%^&*]{8,}$").expect("static pattern");
    charset.is_match(password)
        && password.chars().any(|c| c.is_ascii_digit())
        && password.chars().any(|c| PASSWORD_SPECIALS.contains(c))
}

/// Registration form as submitted by the frontend.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegisterForm {
    pub name: String,
    pub email: String,
    pub password: String,
    pub confirm_password: String,
    pub role: String,
    #[serde(default)]
    pub hospital_id: Option<String>,
    #[serde(default)]
    pub specialization: Option<String>,
    #[serde(default)]
    pub hospital_name: Option<String>,
    #[serde(default)]
    pub address: Option<String>,
    #[serde(default)]
    pub start_time: Option<String>,
    #[serde(default)]
    pub end_time: Option<String>,
}

/// What the dashboard needs right after login.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginOutcome {
    pub user: UserSession,
    pub welcome: WelcomeKind,
    pub welcome_message: String,
}

pub(crate) fn register_inner(state: &AppState, form: RegisterForm) -> Result<(), String> {
    let Some(guard) = state.gate().try_begin(FormKind::Register) else {
        return Err("Registration already in progress".into());
    };

    if !password_is_strong(&form.password) {
        let reason =
            "Password must be at least 8 characters, include a number and a special character";
        guard.fail(reason);
        return Err(reason.into());
    }
    if form.password != form.confirm_password {
        guard.fail("Passwords don't match");
        return Err("Passwords don't match".into());
    }

    let role: Role = match form.role.parse() {
        Ok(role) => role,
        Err(e) => {
            guard.fail(&e.to_string());
            return Err(e.to_string());
        }
    };

    if role != Role::Individual && form.hospital_id.as_deref().unwrap_or("").trim().is_empty() {
        guard.fail("Hospital ID is required");
        return Err("Hospital ID is required".into());
    }

    // Doctors register their availability as a "start - end" range.
    let timings = (role == Role::Doctor).then(|| {
        schedule::timing_range(
            form.start_time.as_deref().unwrap_or("09:00 AM"),
            form.end_time.as_deref().unwrap_or("05:00 PM"),
        )
    });

    let request = RegisterRequest {
        name: form.name,
        email: form.email,
        password: form.password,
        role: role.as_str().to_string(),
        hospital_id: (role != Role::Individual).then_some(form.hospital_id).flatten(),
        specialization: (role == Role::Doctor).then_some(form.specialization).flatten(),
        hospital_name: (role == Role::Doctor).then_some(form.hospital_name).flatten(),
        address: (role == Role::Doctor).then_some(form.address).flatten(),
        timings,
    };

    match state.backend().register(&request) {
        Ok(()) => {
            guard.succeed();
            Ok(())
        }
        Err(e) => {
            let msg = e.to_string();
            guard.fail(&msg);
            Err(msg)
        }
    }
}

pub(crate) fn login_inner(
    state: &AppState,
    email: String,
    password: String,
) -> Result<LoginOutcome, String> {
    let Some(guard) = state.gate().try_begin(FormKind::Login) else {
        return Err("Login already in progress".into());
    };

    let payload = match state.backend().login(&email, &password) {
        Ok(payload) => payload,
        Err(e) => {
            let msg = e.to_string();
            guard.fail(&msg);
            return Err(msg);
        }
    };

    let role: Role = match payload.role.as_deref().unwrap_or("individual").parse() {
        Ok(role) => role,
        Err(e) => {
            let msg = e.to_string();
            guard.fail(&msg);
            return Err(msg);
        }
    };

    let user = UserSession {
        name: payload.name,
        role,
        email: payload.email,
    };

    let outcome = (|| -> Result<LoginOutcome, String> {
        let conn = state.open_store().map_err(|e| e.to_string())?;
        session::persist(&conn, &user).map_err(|e| e.to_string())?;
        let welcome = session::mark_visit(&conn, &user.email).map_err(|e| e.to_string())?;
        state.set_session(user.clone()).map_err(|e| e.to_string())?;
        Ok(LoginOutcome {
            welcome_message: user.welcome_message(welcome),
            user,
            welcome,
        })
    })();

    match &outcome {
        Ok(_) => guard.succeed(),
        Err(msg) => guard.fail(msg),
    }
    outcome
}

pub(crate) fn logout_inner(state: &AppState) -> Result<(), String> {
    let conn = state.open_store().map_err(|e| e.to_string())?;
    crate::db::repository::clear_store(&conn).map_err(|e| e.to_string())?;
    state.clear_session().map_err(|e| e.to_string())?;
    tracing::info!("Signed out, local store cleared");
    Ok(())
}

/// Register a new account. On success the user still has to log in.
#[tauri::command]
pub fn register(form: RegisterForm, state: State<'_, Arc<AppState>>) -> Result<(), String> {
    register_inner(&state, form)
}

/// Authenticate against the backend and open a session.
#[tauri::command]
pub fn login(
    email: String,
    password: String,
    state: State<'_, Arc<AppState>>,
) -> Result<LoginOutcome, String> {
    login_inner(&state, email, password)
}

/// Clear the session and the entire local store, returning the app to the
/// public landing state.
#[tauri::command]
pub fn logout(state: State<'_, Arc<AppState>>) -> Result<(), String> {
    logout_inner(&state)
}

/// The signed-in user, if any — the frontend's route guard reads this and
/// redirects to the landing route on `None`.
#[tauri::command]
pub fn session_status(state: State<'_, Arc<AppState>>) -> Option<UserSession> {
    state.current_session()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::{MockBackend, UserPayload};
    use crate::core_state::CoreError;

    fn temp_state(backend: MockBackend) -> (tempfile::TempDir, AppState) {
        let dir = tempfile::tempdir().unwrap();
        let state = AppState::with_backend(dir.path().join("client.db"), Box::new(backend));
        (dir, state)
    }

    fn asha_payload() -> UserPayload {
        UserPayload {
            name: "Asha".into(),
            role: Some("individual".into()),
            email: "asha@example.in".into(),
        }
    }

    fn register_form() -> RegisterForm {
        RegisterForm {
            name: "Asha".into(),
            email: "asha@example.in".into(),
            password: "secret12!".into(),
            confirm_password: "secret12!".into(),
            role: "individual".into(),
            hospital_id: None,
            specialization: None,
            hospital_name: None,
            address: None,
            start_time: None,
            end_time: None,
        }
    }

    // ── password policy ─────────────────────────────────────

    #[test]
    fn strong_passwords_pass() {
        assert!(password_is_strong("secret12!"));
        assert!(password_is_strong("Aa1!Aa1!"));
    }

    #[test]
    fn weak_passwords_fail() {
        assert!(!password_is_strong("short1!"));
        assert!(!password_is_strong("nodigits!!"));
        assert!(!password_is_strong("nospecial12"));
        assert!(!password_is_strong("has spaces 1!"));
    }

    // ── login ───────────────────────────────────────────────

    #[test]
    fn login_persists_session_and_greets_first_timer() {
        let (_dir, state) = temp_state(MockBackend::new().with_login(asha_payload()));

        let outcome = login_inner(&state, "asha@example.in".into(), "pw".into()).unwrap();
        assert_eq!(outcome.welcome, WelcomeKind::First);
        assert_eq!(outcome.welcome_message, "Welcome, Asha");
        assert_eq!(state.require_session().unwrap().name, "Asha");

        let conn = state.open_store().unwrap();
        assert_eq!(
            session::load(&conn).unwrap().unwrap().email,
            "asha@example.in"
        );
    }

    #[test]
    fn second_login_greets_returning_user() {
        let (_dir, state) = temp_state(MockBackend::new().with_login(asha_payload()));

        login_inner(&state, "asha@example.in".into(), "pw".into()).unwrap();
        let outcome = login_inner(&state, "asha@example.in".into(), "pw".into()).unwrap();
        assert_eq!(outcome.welcome, WelcomeKind::Back);
        assert_eq!(outcome.welcome_message, "Welcome back, Asha");
    }

    #[test]
    fn login_rejection_surfaces_server_message() {
        let (_dir, state) = temp_state(MockBackend::new().rejecting("Wrong password"));
        let err = login_inner(&state, "asha@example.in".into(), "pw".into()).unwrap_err();
        assert_eq!(err, "Wrong password");
        assert!(state.current_session().is_none());
    }

    #[test]
    fn login_with_unknown_role_is_rejected() {
        let payload = UserPayload {
            role: Some("superuser".into()),
            ..asha_payload()
        };
        let (_dir, state) = temp_state(MockBackend::new().with_login(payload));
        let err = login_inner(&state, "asha@example.in".into(), "pw".into()).unwrap_err();
        assert!(err.contains("Unknown role"));
        assert!(state.current_session().is_none());
    }

    #[test]
    fn login_without_role_defaults_to_individual() {
        let payload = UserPayload {
            role: None,
            ..asha_payload()
        };
        let (_dir, state) = temp_state(MockBackend::new().with_login(payload));
        login_inner(&state, "asha@example.in".into(), "pw".into()).unwrap();
        assert_eq!(state.require_session().unwrap().role, Role::Individual);
    }

    // ── logout ──────────────────────────────────────────────

    #[test]
    fn logout_clears_session_and_store() {
        let (_dir, state) = temp_state(MockBackend::new().with_login(asha_payload()));
        login_inner(&state, "asha@example.in".into(), "pw".into()).unwrap();

        logout_inner(&state).unwrap();

        assert!(state.current_session().is_none());
        assert!(matches!(
            state.require_session().unwrap_err(),
            CoreError::NotAuthenticated
        ));
        let conn = state.open_store().unwrap();
        assert!(session::load(&conn).unwrap().is_none());
        // The visited marker is gone too: next login is "first" again
        assert!(
            crate::db::repository::kv::get_value(&conn, &crate::db::repository::kv::visited_key("asha@example.in"))
                .unwrap()
                .is_none()
        );
    }

    // ── register ────────────────────────────────────────────

    #[test]
    fn register_individual_succeeds() {
        let (_dir, state) = temp_state(MockBackend::new());
        assert!(register_inner(&state, register_form()).is_ok());
    }

    #[test]
    fn register_weak_password_aborts_before_network() {
        let (_dir, state) = temp_state(MockBackend::new().rejecting("must not be called"));
        let mut form = register_form();
        form.password = "weak".into();
        form.confirm_password = "weak".into();
        let err = register_inner(&state, form).unwrap_err();
        assert!(err.contains("at least 8 characters"));
    }

    #[test]
    fn register_mismatched_passwords_abort() {
        let (_dir, state) = temp_state(MockBackend::new());
        let mut form = register_form();
        form.confirm_password = "different12!".into();
        assert_eq!(
            register_inner(&state, form).unwrap_err(),
            "Passwords don't match"
        );
    }

    #[test]
    fn register_staff_requires_hospital_id() {
        let (_dir, state) = temp_state(MockBackend::new());
        let mut form = register_form();
        form.role = "employee".into();
        assert_eq!(
            register_inner(&state, form).unwrap_err(),
            "Hospital ID is required"
        );
    }

    #[test]
    fn register_doctor_joins_timings() {
        let (_dir, state) = temp_state(MockBackend::new());
        let mut form = register_form();
        form.role = "doctor".into();
        form.hospital_id = Some("H-204".into());
        form.specialization = Some("Cardiologist".into());
        form.hospital_name = Some("City Care".into());
        form.address = Some("MG Road".into());
        form.start_time = Some("10:00 AM".into());
        form.end_time = Some("06:30 PM".into());
        assert!(register_inner(&state, form).is_ok());
    }
}
