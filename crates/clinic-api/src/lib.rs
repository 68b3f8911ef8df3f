//! REST boundary for the clinic records core.
//!
//! Routes use a `/v1/{entity}` layout:
//!
//! | Method | Path | Body |
//! |---|---|---|
//! | GET | `/v1/{entity}/{id}` | entity or `null` |
//! | GET | `/v1/{entity}/all?page&pagesize&orderby&searchtext` | `{count, items}` |
//! | POST | `/v1/{entity}` | result envelope |
//! | PUT | `/v1/{entity}/{id}` | result envelope |
//! | DELETE | `/v1/{entity}/{id}` | result envelope |
//! | GET | `/v1/consulta/paciente/{id}?...` | `{count, items}` |
//!
//! `{entity}` is `paciente` or `consulta`. Domain errors answer `400`.

mod auth;
pub mod config;
pub mod error;
pub mod handlers;

pub use auth::API_KEY_HEADER;

use std::sync::Arc;

use axum::{middleware, routing::get, routing::post, Router};
use clinic_core::{Consultation, ConsultationService, Database, Patient, PatientService};
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use handlers::{consultations_of_patient, create, delete, get_one, health, list, update};

/// Shared state handed to every handler.
#[derive(Clone)]
pub struct AppState {
    pub patients: PatientService,
    pub consultations: ConsultationService,
    pub api_key: Option<Arc<str>>,
}

impl AppState {
    pub fn new(db: Arc<Database>, api_key: Option<String>) -> Self {
        Self {
            patients: PatientService::new(db.clone()),
            consultations: ConsultationService::new(db),
            api_key: api_key.map(Arc::from),
        }
    }
}

/// Build the full router.
pub fn app(state: AppState) -> Router {
    let v1 = Router::new()
        .route("/v1/paciente", post(create::<Patient>))
        .route("/v1/paciente/all", get(list::<Patient>))
        .route(
            "/v1/paciente/:id",
            get(get_one::<Patient>)
                .put(update::<Patient>)
                .delete(delete::<Patient>),
        )
        .route("/v1/consulta", post(create::<Consultation>))
        .route("/v1/consulta/all", get(list::<Consultation>))
        .route("/v1/consulta/paciente/:id", get(consultations_of_patient))
        .route(
            "/v1/consulta/:id",
            get(get_one::<Consultation>)
                .put(update::<Consultation>)
                .delete(delete::<Consultation>),
        )
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            auth::require_api_key,
        ));

    Router::new()
        .route("/health", get(health))
        .merge(v1)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}
