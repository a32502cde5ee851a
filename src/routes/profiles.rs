use actix_web::{web, HttpResponse, Responder};

use crate::core::{ProfileService, ServiceError};
use crate::models::{CreateProfileRequest, DeleteResponse, HealthResponse, ListProfilesQuery, UpdateProfileRequest};

/// Application state shared across all handlers
#[derive(Clone)]
pub struct AppState {
    pub service: ProfileService,
}

/// Configure all profile routes
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg
        .route("/health", web::get().to(health_check))
        .route("/profiles", web::post().to(create_profile))
        .route("/profiles", web::get().to(list_profiles))
        .route("/profiles/{id}", web::get().to(get_profile))
        .route("/profiles/{id}", web::put().to(update_profile))
        .route("/profiles/{id}", web::delete().to(delete_profile))
        .route("/profiles/{id}/matches", web::get().to(find_matches));
}

/// Health check endpoint
async fn health_check(state: web::Data<AppState>) -> impl Responder {
    let healthy = state.service.health_check().await;
    let status = if healthy { "healthy" } else { "degraded" };

    HttpResponse::Ok().json(HealthResponse {
        status: status.to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        timestamp: chrono::Utc::now(),
    })
}

/// Register a profile
///
/// POST /api/v1/profiles
///
/// Request body:
/// ```json
/// {
///   "name": "Ana",
///   "age": 29,
///   "gender": "female",
///   "email": "ana@example.com",
///   "city": "Paris",
///   "interests": ["chess", "hiking"]
/// }
/// ```
/// `interests` may also be a single comma-delimited string.
async fn create_profile(
    state: web::Data<AppState>,
    req: web::Json<CreateProfileRequest>,
) -> Result<HttpResponse, ServiceError> {
    let profile = state.service.create_profile(req.into_inner()).await?;
    Ok(HttpResponse::Ok().json(profile))
}

/// GET /api/v1/profiles?skip={skip}&limit={limit}
async fn list_profiles(
    state: web::Data<AppState>,
    query: web::Query<ListProfilesQuery>,
) -> Result<HttpResponse, ServiceError> {
    let profiles = state.service.list_profiles(query.skip, query.limit).await?;
    Ok(HttpResponse::Ok().json(profiles))
}

async fn get_profile(
    state: web::Data<AppState>,
    path: web::Path<i64>,
) -> Result<HttpResponse, ServiceError> {
    let profile = state.service.get_profile(path.into_inner()).await?;
    Ok(HttpResponse::Ok().json(profile))
}

/// Partial update: only the supplied fields are validated and overwritten
async fn update_profile(
    state: web::Data<AppState>,
    path: web::Path<i64>,
    req: web::Json<UpdateProfileRequest>,
) -> Result<HttpResponse, ServiceError> {
    let profile = state
        .service
        .update_profile(path.into_inner(), req.into_inner())
        .await?;
    Ok(HttpResponse::Ok().json(profile))
}

async fn delete_profile(
    state: web::Data<AppState>,
    path: web::Path<i64>,
) -> Result<HttpResponse, ServiceError> {
    state.service.delete_profile(path.into_inner()).await?;
    Ok(HttpResponse::Ok().json(DeleteResponse {
        message: "Profile deleted successfully".to_string(),
    }))
}

/// Find matches endpoint
///
/// GET /api/v1/profiles/{id}/matches
async fn find_matches(
    state: web::Data<AppState>,
    path: web::Path<i64>,
) -> Result<HttpResponse, ServiceError> {
    let user_id = path.into_inner();
    tracing::info!("Finding matches for profile: {}", user_id);

    let matches = state.service.find_matches(user_id).await?;
    Ok(HttpResponse::Ok().json(matches))
}
