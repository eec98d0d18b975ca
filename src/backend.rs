//! HTTP client for the AyurSync backend.
//!
//! Every piece of business logic — auth, disease codes, symptom inference,
//! the doctor registry, appointment persistence, dashboard aggregates —
//! lives behind this JSON API. The client is a thin wrapper: no retry, no
//! caching, one fixed base URL. `BackendApi` is the seam commands depend
//! on; tests swap in `MockBackend`.

use std::sync::Mutex;

use serde::{Deserialize, Serialize};

use crate::config;

/// Default request timeout in seconds.
const DEFAULT_TIMEOUT_SECS: u64 = 30;

// ═══════════════════════════════════════════════════════════
// Wire types
// ═══════════════════════════════════════════════════════════

/// Registration payload. Doctor-only fields stay off the wire for other
/// roles; hospital id is sent for every non-individual role.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegisterRequest {
    pub name: String,
    pub email: String,
    pub password: String,
    pub role: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hospital_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub specialization: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hospital_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub timings: Option<String>,
}

/// The user object returned by a successful login.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserPayload {
    pub name: String,
    #[serde(default)]
    pub role: Option<String>,
    pub email: String,
}

/// A doctor record from the registry.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Doctor {
    #[serde(default)]
    pub id: i64,
    pub name: String,
    #[serde(default)]
    pub specialization: String,
    #[serde(default)]
    pub hospital_name: String,
    #[serde(default)]
    pub address: String,
    #[serde(default)]
    pub timings: String,
    #[serde(default)]
    pub rating: Option<String>,
    #[serde(default)]
    pub reviews: Option<u32>,
    #[serde(default)]
    pub email: Option<String>,
}

/// The single upcoming appointment for a non-staff user, as sent by the
/// backend. Date/time may be absent on partially populated payloads.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ActiveAppointment {
    pub doctor: String,
    #[serde(default)]
    pub disease: Option<String>,
    #[serde(default)]
    pub date: Option<String>,
    #[serde(default)]
    pub time: Option<String>,
}

/// A completed appointment shown in records/history.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PastAppointment {
    pub doctor_name: String,
    #[serde(default)]
    pub disease: Option<String>,
    #[serde(default)]
    pub date: String,
}

/// An appointment row in the admin list / doctor queue.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QueueAppointment {
    #[serde(default)]
    pub id: i64,
    pub patient_name: String,
    #[serde(default)]
    pub status: Option<String>,
}

/// A patient record summary (staff views).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PatientRecord {
    pub patient: String,
    #[serde(default)]
    pub detail: Option<String>,
}

/// Backend-reported system health.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SystemHealth {
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub uptime: Option<String>,
    #[serde(default)]
    pub database: Option<String>,
}

/// Doctor outcome counters.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EfficacyStats {
    #[serde(default)]
    pub success: u32,
    #[serde(default)]
    pub missed: u32,
}

/// The wholesale per-role stats payload. Everything is optional — the
/// backend fills only the sections the role needs.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DashboardStats {
    #[serde(default)]
    pub active_doctors_list: Option<Vec<Doctor>>,
    #[serde(default)]
    pub active_appointment: Option<ActiveAppointment>,
    #[serde(default)]
    pub past_appointments: Option<Vec<PastAppointment>>,
    #[serde(default)]
    pub total_app_count: Option<u32>,
    #[serde(default)]
    pub all_appointments: Option<Vec<QueueAppointment>>,
    #[serde(default)]
    pub patient_records: Option<Vec<PatientRecord>>,
    #[serde(default)]
    pub system_health: Option<SystemHealth>,
    #[serde(default)]
    pub doctor_active_appts: Option<Vec<QueueAppointment>>,
    #[serde(default)]
    pub efficacy_stats: Option<EfficacyStats>,
}

/// Appointment booking payload.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BookingRequest {
    pub patient_name: String,
    pub user_email: String,
    pub dob: String,
    pub age: String,
    pub doctor_name: String,
    pub hospital_name: String,
    pub date: String,
    pub time: String,
    pub disease: String,
    pub phone: String,
}

/// Locally edited doctor profile pushed to the backend.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProfileUpdateRequest {
    pub name: String,
    pub specialization: String,
    pub hospital_name: String,
    pub address: String,
    pub timings: String,
}

/// Disease code pair.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DiseaseCodes {
    #[serde(default)]
    pub icd11: Option<String>,
    #[serde(default)]
    pub namaste: Option<String>,
}

/// Recommendation bundle for a disease.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CarePlan {
    #[serde(default)]
    pub symptoms: Vec<String>,
    #[serde(default)]
    pub diet: Vec<String>,
    #[serde(default)]
    pub exercise: Vec<String>,
    #[serde(default)]
    pub yoga: Vec<String>,
}

/// Disease search result.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DiseaseInfo {
    pub name: String,
    #[serde(default)]
    pub codes: DiseaseCodes,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub care_plan: CarePlan,
    #[serde(default)]
    pub specialist: Option<String>,
}

/// Symptom analysis result.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisResult {
    pub disease: String,
    pub risk: String,
    pub specialty: String,
    pub advice: String,
}

// ── Response envelopes ──────────────────────────────────────

#[derive(Deserialize)]
struct AckResponse {
    success: bool,
    #[serde(default)]
    message: Option<String>,
}

#[derive(Deserialize)]
struct LoginResponse {
    success: bool,
    #[serde(default)]
    user: Option<UserPayload>,
    #[serde(default)]
    message: Option<String>,
}

#[derive(Deserialize)]
struct StatsResponse {
    success: bool,
    #[serde(default)]
    stats: Option<DashboardStats>,
    #[serde(default)]
    message: Option<String>,
}

#[derive(Deserialize)]
#[serde(bound(deserialize = "T: serde::Deserialize<'de>"))]
struct DataResponse<T> {
    success: bool,
    #[serde(default)]
    data: Option<T>,
    #[serde(default)]
    message: Option<String>,
}

// ═══════════════════════════════════════════════════════════
// Errors
// ═══════════════════════════════════════════════════════════

/// Errors from backend calls.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("Cannot reach backend at {0}")]
    Connection(String),
    #[error("Request timed out after {0}s")]
    Timeout(u64),
    #[error("Backend returned HTTP {status}: {body}")]
    Http { status: u16, body: String },
    #[error("Failed to parse backend response: {0}")]
    Parsing(String),
    #[error("{0}")]
    Rejected(String),
}

fn rejected(message: Option<String>, fallback: &str) -> ApiError {
    ApiError::Rejected(message.unwrap_or_else(|| fallback.to_string()))
}

// ═══════════════════════════════════════════════════════════
// BackendApi — the seam commands depend on
// ═══════════════════════════════════════════════════════════

pub trait BackendApi: Send + Sync {
    fn register(&self, req: &RegisterRequest) -> Result<(), ApiError>;
    fn login(&self, email: &str, password: &str) -> Result<UserPayload, ApiError>;
    fn dashboard_stats(&self, role: &str, email: &str) -> Result<DashboardStats, ApiError>;
    fn update_appointment_status(&self, id: i64, status: &str) -> Result<(), ApiError>;
    fn update_doctor_profile(&self, req: &ProfileUpdateRequest) -> Result<(), ApiError>;
    fn list_doctors(&self) -> Result<Vec<Doctor>, ApiError>;
    fn book_appointment(&self, req: &BookingRequest) -> Result<(), ApiError>;
    fn search_disease(&self, query: &str) -> Result<DiseaseInfo, ApiError>;
    fn analyze_symptoms(&self, symptoms: &str) -> Result<AnalysisResult, ApiError>;
}

/// Forwarding impl so shared handles (`Arc<MockBackend>` in tests) can be
/// installed where a `BackendApi` is expected.
impl<T: BackendApi> BackendApi for std::sync::Arc<T> {
    fn register(&self, req: &RegisterRequest) -> Result<(), ApiError> {
        (**self).register(req)
    }
    fn login(&self, email: &str, password: &str) -> Result<UserPayload, ApiError> {
        (**self).login(email, password)
    }
    fn dashboard_stats(&self, role: &str, email: &str) -> Result<DashboardStats, ApiError> {
        (**self).dashboard_stats(role, email)
    }
    fn update_appointment_status(&self, id: i64, status: &str) -> Result<(), ApiError> {
        (**self).update_appointment_status(id, status)
    }
    fn update_doctor_profile(&self, req: &ProfileUpdateRequest) -> Result<(), ApiError> {
        (**self).update_doctor_profile(req)
    }
    fn list_doctors(&self) -> Result<Vec<Doctor>, ApiError> {
        (**self).list_doctors()
    }
    fn book_appointment(&self, req: &BookingRequest) -> Result<(), ApiError> {
        (**self).book_appointment(req)
    }
    fn search_disease(&self, query: &str) -> Result<DiseaseInfo, ApiError> {
        (**self).search_disease(query)
    }
    fn analyze_symptoms(&self, symptoms: &str) -> Result<AnalysisResult, ApiError> {
        (**self).analyze_symptoms(symptoms)
    }
}

// ═══════════════════════════════════════════════════════════
// BackendClient — reqwest implementation
// ═══════════════════════════════════════════════════════════

/// HTTP client for the live backend.
pub struct BackendClient {
    base_url: String,
    client: reqwest::blocking::Client,
    timeout_secs: u64,
}

impl BackendClient {
    /// Create a client against the given origin.
    pub fn new(base_url: &str, timeout_secs: u64) -> Self {
        let client = reqwest::blocking::Client::builder()
            .timeout(std::time::Duration::from_secs(timeout_secs))
            .build()
            .expect("Failed to create HTTP client");

        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            client,
            timeout_secs,
        }
    }

    /// Client against the configured origin (`AYURSYNC_API_URL` override).
    pub fn from_config() -> Self {
        Self::new(&config::api_base_url(), DEFAULT_TIMEOUT_SECS)
    }

    fn map_transport_error(&self, e: reqwest::Error) -> ApiError {
        if e.is_connect() {
            ApiError::Connection(self.base_url.clone())
        } else if e.is_timeout() {
            ApiError::Timeout(self.timeout_secs)
        } else {
            ApiError::Http {
                status: e.status().map(|s| s.as_u16()).unwrap_or(0),
                body: e.to_string(),
            }
        }
    }

    fn post<B: Serialize, R: serde::de::DeserializeOwned>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<R, ApiError> {
        let url = format!("{}{path}", self.base_url);
        let response = self
            .client
            .post(&url)
            .json(body)
            .send()
            .map_err(|e| self.map_transport_error(e))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().unwrap_or_default();
            return Err(ApiError::Http {
                status: status.as_u16(),
                body,
            });
        }

        response.json().map_err(|e| ApiError::Parsing(e.to_string()))
    }

    fn get<R: serde::de::DeserializeOwned>(&self, path: &str) -> Result<R, ApiError> {
        let url = format!("{}{path}", self.base_url);
        let response = self
            .client
            .get(&url)
            .send()
            .map_err(|e| self.map_transport_error(e))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().unwrap_or_default();
            return Err(ApiError::Http {
                status: status.as_u16(),
                body,
            });
        }

        response.json().map_err(|e| ApiError::Parsing(e.to_string()))
    }
}

impl BackendApi for BackendClient {
    fn register(&self, req: &RegisterRequest) -> Result<(), ApiError> {
        let ack: AckResponse = self.post("/api/register", req)?;
        if !ack.success {
            return Err(rejected(ack.message, "Registration failed"));
        }
        Ok(())
    }

    fn login(&self, email: &str, password: &str) -> Result<UserPayload, ApiError> {
        let body = serde_json::json!({ "email": email, "password": password });
        let resp: LoginResponse = self.post("/api/login", &body)?;
        if !resp.success {
            return Err(rejected(resp.message, "Invalid credentials"));
        }
        resp.user
            .ok_or_else(|| ApiError::Parsing("login response missing user".into()))
    }

    fn dashboard_stats(&self, role: &str, email: &str) -> Result<DashboardStats, ApiError> {
        let body = serde_json::json!({ "role": role, "email": email });
        let resp: StatsResponse = self.post("/api/dashboard-stats", &body)?;
        if !resp.success {
            return Err(rejected(resp.message, "Could not load dashboard"));
        }
        Ok(resp.stats.unwrap_or_default())
    }

    fn update_appointment_status(&self, id: i64, status: &str) -> Result<(), ApiError> {
        let body = serde_json::json!({ "id": id, "status": status });
        let ack: AckResponse = self.post("/api/update-appointment-status", &body)?;
        if !ack.success {
            return Err(rejected(ack.message, "Error updating status"));
        }
        Ok(())
    }

    fn update_doctor_profile(&self, req: &ProfileUpdateRequest) -> Result<(), ApiError> {
        let ack: AckResponse = self.post("/api/update-doctor-profile", req)?;
        if !ack.success {
            return Err(rejected(ack.message, "Profile update failed"));
        }
        Ok(())
    }

    fn list_doctors(&self) -> Result<Vec<Doctor>, ApiError> {
        self.get("/api/doctors")
    }

    fn book_appointment(&self, req: &BookingRequest) -> Result<(), ApiError> {
        let ack: AckResponse = self.post("/api/book-appointment", req)?;
        if !ack.success {
            return Err(rejected(ack.message, "Booking failed"));
        }
        Ok(())
    }

    fn search_disease(&self, query: &str) -> Result<DiseaseInfo, ApiError> {
        let body = serde_json::json!({ "query": query });
        let resp: DataResponse<DiseaseInfo> = self.post("/api/search-disease", &body)?;
        if !resp.success {
            return Err(rejected(resp.message, "Disease not found"));
        }
        resp.data
            .ok_or_else(|| ApiError::Parsing("search response missing data".into()))
    }

    fn analyze_symptoms(&self, symptoms: &str) -> Result<AnalysisResult, ApiError> {
        let body = serde_json::json!({ "symptoms": symptoms });
        let resp: DataResponse<AnalysisResult> = self.post("/api/analyze-symptoms", &body)?;
        if !resp.success {
            return Err(rejected(resp.message, "Analysis failed"));
        }
        resp.data
            .ok_or_else(|| ApiError::Parsing("analysis response missing data".into()))
    }
}

// ═══════════════════════════════════════════════════════════
// MockBackend — for tests
// ═══════════════════════════════════════════════════════════

/// Configurable in-memory backend for tests. Records bookings and status
/// updates so assertions can inspect what was sent.
#[derive(Default)]
pub struct MockBackend {
    pub login_user: Option<UserPayload>,
    pub doctors: Vec<Doctor>,
    pub stats: DashboardStats,
    pub disease: Option<DiseaseInfo>,
    pub analysis: Option<AnalysisResult>,
    pub reject_message: Option<String>,
    pub bookings: Mutex<Vec<BookingRequest>>,
    pub status_updates: Mutex<Vec<(i64, String)>>,
    pub profile_updates: Mutex<Vec<ProfileUpdateRequest>>,
}

impl MockBackend {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_login(mut self, user: UserPayload) -> Self {
        self.login_user = Some(user);
        self
    }

    pub fn with_doctors(mut self, doctors: Vec<Doctor>) -> Self {
        self.doctors = doctors;
        self
    }

    pub fn with_stats(mut self, stats: DashboardStats) -> Self {
        self.stats = stats;
        self
    }

    pub fn rejecting(mut self, message: &str) -> Self {
        self.reject_message = Some(message.to_string());
        self
    }

    fn check_reject(&self) -> Result<(), ApiError> {
        match &self.reject_message {
            Some(msg) => Err(ApiError::Rejected(msg.clone())),
            None => Ok(()),
        }
    }
}

impl BackendApi for MockBackend {
    fn register(&self, _req: &RegisterRequest) -> Result<(), ApiError> {
        self.check_reject()
    }

    fn login(&self, _email: &str, _password: &str) -> Result<UserPayload, ApiError> {
        self.check_reject()?;
        self.login_user
            .clone()
            .ok_or_else(|| ApiError::Rejected("Invalid credentials".into()))
    }

    fn dashboard_stats(&self, _role: &str, _email: &str) -> Result<DashboardStats, ApiError> {
        self.check_reject()?;
        Ok(self.stats.clone())
    }

    fn update_appointment_status(&self, id: i64, status: &str) -> Result<(), ApiError> {
        self.check_reject()?;
        self.status_updates
            .lock()
            .expect("mock lock")
            .push((id, status.to_string()));
        Ok(())
    }

    fn update_doctor_profile(&self, req: &ProfileUpdateRequest) -> Result<(), ApiError> {
        self.check_reject()?;
        self.profile_updates
            .lock()
            .expect("mock lock")
            .push(req.clone());
        Ok(())
    }

    fn list_doctors(&self) -> Result<Vec<Doctor>, ApiError> {
        self.check_reject()?;
        Ok(self.doctors.clone())
    }

    fn book_appointment(&self, req: &BookingRequest) -> Result<(), ApiError> {
        self.check_reject()?;
        self.bookings.lock().expect("mock lock").push(req.clone());
        Ok(())
    }

    fn search_disease(&self, _query: &str) -> Result<DiseaseInfo, ApiError> {
        self.check_reject()?;
        self.disease
            .clone()
            .ok_or_else(|| ApiError::Rejected("Disease not found".into()))
    }

    fn analyze_symptoms(&self, _symptoms: &str) -> Result<AnalysisResult, ApiError> {
        self.check_reject()?;
        self.analysis
            .clone()
            .ok_or_else(|| ApiError::Rejected("Analysis failed".into()))
    }
}
