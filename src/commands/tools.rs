//! Disease-search and symptom-analyzer IPC commands.

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tauri::State;

use crate::backend::{AnalysisResult, DiseaseInfo};
use crate::core_state::AppState;
use crate::sanitize;
use crate::specialist;

/// A disease lookup with the locally resolved specialist.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DiseaseSearchView {
    pub info: DiseaseInfo,
    /// Who to see for this — drives "Find {specialist} Near Me".
    pub specialist: String,
}

pub(crate) fn search_disease_inner(
    state: &AppState,
    query: String,
) -> Result<DiseaseSearchView, String> {
    state.require_session().map_err(|e| e.to_string())?;
    let query = query.trim();
    if query.is_empty() {
        return Err("Enter a disease name to search".into());
    }

    let mut info = state
        .backend()
        .search_disease(query)
        .map_err(|e| e.to_string())?;

    // Server strings are rendered by the webview; strip any markup first.
    info.name = sanitize::display_text(&info.name);
    info.description = sanitize::display_text(&info.description);

    let specialist = specialist::specialist_for(&info.name).to_string();
    Ok(DiseaseSearchView { info, specialist })
}

pub(crate) fn analyze_symptoms_inner(
    state: &AppState,
    symptoms: String,
) -> Result<AnalysisResult, String> {
    state.require_session().map_err(|e| e.to_string())?;
    if symptoms.trim().is_empty() {
        return Err("Describe your symptoms first".into());
    }

    let mut result = state
        .backend()
        .analyze_symptoms(symptoms.trim())
        .map_err(|e| e.to_string())?;
    result.disease = sanitize::display_text(&result.disease);
    result.advice = sanitize::display_text(&result.advice);
    Ok(result)
}

/// Look up a disease: codes, description, care plan, specialist.
#[tauri::command]
pub fn search_disease(
    query: String,
    state: State<'_, Arc<AppState>>,
) -> Result<DiseaseSearchView, String> {
    search_disease_inner(&state, query)
}

/// Run the symptom analyzer on a free-text description.
#[tauri::command]
pub fn analyze_symptoms(
    symptoms: String,
    state: State<'_, Arc<AppState>>,
) -> Result<AnalysisResult, String> {
    analyze_symptoms_inner(&state, symptoms)
}
