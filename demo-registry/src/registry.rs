//! The protected collaborator: a small in-memory clinic registry.
//!
//! Regions and specialties are fixed lookup tables; clinics are
//! mutable records carrying a region and a set of specialties. All
//! routes require a session, and writes additionally pass the
//! anti-forgery guard.

use std::collections::BTreeMap;
use std::sync::{
    Arc, RwLock,
    atomic::{AtomicU32, Ordering},
};

use axum::{
    Extension, Json, Router,
    extract::Path,
    http::StatusCode,
    middleware::from_fn,
    routing::get,
};
use serde::{Deserialize, Serialize};
use serde_json::{Value, json};

use registry_auth_axum::{AuthUser, csrf_protect, is_authenticated_401};

#[derive(Debug, Clone, Serialize)]
pub(crate) struct Region {
    id: u32,
    name: &'static str,
}

#[derive(Debug, Clone, Serialize)]
pub(crate) struct Specialty {
    id: u32,
    name: &'static str,
}

#[derive(Debug, Clone, Serialize)]
pub(crate) struct Clinic {
    id: u32,
    name: String,
    region_id: u32,
    specialty_ids: Vec<u32>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct ClinicPayload {
    name: String,
    region_id: u32,
    #[serde(default)]
    specialty_ids: Vec<u32>,
}

pub(crate) struct RegistryState {
    clinics: RwLock<BTreeMap<u32, Clinic>>,
    next_id: AtomicU32,
    regions: Vec<Region>,
    specialties: Vec<Specialty>,
}

impl RegistryState {
    pub(crate) fn new() -> Arc<Self> {
        Arc::new(Self {
            clinics: RwLock::new(BTreeMap::new()),
            next_id: AtomicU32::new(1),
            regions: vec![
                Region { id: 1, name: "Norte" },
                Region { id: 2, name: "Nordeste" },
                Region { id: 3, name: "Centro-Oeste" },
                Region { id: 4, name: "Sudeste" },
                Region { id: 5, name: "Sul" },
            ],
            specialties: vec![
                Specialty { id: 1, name: "Cardiologia" },
                Specialty { id: 2, name: "Dermatologia" },
                Specialty { id: 3, name: "Ortopedia" },
                Specialty { id: 4, name: "Pediatria" },
            ],
        })
    }
}

pub(crate) fn router(state: Arc<RegistryState>) -> Router {
    Router::new()
        .route("/clinics", get(list_clinics).post(create_clinic))
        .route(
            "/clinics/{id}",
            get(get_clinic).put(update_clinic).delete(delete_clinic),
        )
        .route("/regions", get(list_regions))
        .route("/specialties", get(list_specialties))
        .layer(from_fn(is_authenticated_401))
        .layer(from_fn(csrf_protect))
        .layer(Extension(state))
}

fn not_found() -> (StatusCode, Json<Value>) {
    (StatusCode::NOT_FOUND, Json(json!({ "message": "Not found" })))
}

fn poisoned() -> (StatusCode, Json<Value>) {
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        Json(json!({ "message": "Server error" })),
    )
}

async fn list_clinics(
    Extension(state): Extension<Arc<RegistryState>>,
) -> Result<Json<Vec<Clinic>>, (StatusCode, Json<Value>)> {
    let clinics = state.clinics.read().map_err(|_| poisoned())?;
    Ok(Json(clinics.values().cloned().collect()))
}

async fn create_clinic(
    Extension(state): Extension<Arc<RegistryState>>,
    // Inserted by is_authenticated_401
    Extension(user): Extension<AuthUser>,
    Json(payload): Json<ClinicPayload>,
) -> Result<(StatusCode, Json<Clinic>), (StatusCode, Json<Value>)> {
    let clinic = Clinic {
        id: state.next_id.fetch_add(1, Ordering::SeqCst),
        name: payload.name,
        region_id: payload.region_id,
        specialty_ids: payload.specialty_ids,
    };
    tracing::info!("User {} created clinic {}", user.id, clinic.id);

    let mut clinics = state.clinics.write().map_err(|_| poisoned())?;
    clinics.insert(clinic.id, clinic.clone());
    Ok((StatusCode::CREATED, Json(clinic)))
}

async fn get_clinic(
    Extension(state): Extension<Arc<RegistryState>>,
    Path(id): Path<u32>,
) -> Result<Json<Clinic>, (StatusCode, Json<Value>)> {
    let clinics = state.clinics.read().map_err(|_| poisoned())?;
    clinics.get(&id).cloned().map(Json).ok_or_else(not_found)
}

async fn update_clinic(
    Extension(state): Extension<Arc<RegistryState>>,
    Path(id): Path<u32>,
    Json(payload): Json<ClinicPayload>,
) -> Result<Json<Clinic>, (StatusCode, Json<Value>)> {
    let mut clinics = state.clinics.write().map_err(|_| poisoned())?;
    let clinic = clinics.get_mut(&id).ok_or_else(not_found)?;
    clinic.name = payload.name;
    clinic.region_id = payload.region_id;
    clinic.specialty_ids = payload.specialty_ids;
    Ok(Json(clinic.clone()))
}

async fn delete_clinic(
    Extension(state): Extension<Arc<RegistryState>>,
    Path(id): Path<u32>,
) -> Result<StatusCode, (StatusCode, Json<Value>)> {
    let mut clinics = state.clinics.write().map_err(|_| poisoned())?;
    clinics.remove(&id).map(|_| StatusCode::NO_CONTENT).ok_or_else(not_found)
}

async fn list_regions(Extension(state): Extension<Arc<RegistryState>>) -> Json<Vec<Region>> {
    Json(state.regions.clone())
}

async fn list_specialties(
    Extension(state): Extension<Arc<RegistryState>>,
) -> Json<Vec<Specialty>> {
    Json(state.specialties.clone())
}

