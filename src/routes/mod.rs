// Route exports
pub mod errors;
pub mod profiles;

use actix_web::web;

pub use errors::{handle_json_payload_error, handle_path_error, handle_query_payload_error, JsonError};
pub use profiles::AppState;

pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api/v1")
            .configure(profiles::configure),
    );
}

/// Extractor configs shared by the server and the HTTP tests
pub fn configure_extractors(cfg: &mut web::ServiceConfig) {
    cfg.app_data(web::JsonConfig::default().error_handler(handle_json_payload_error))
        .app_data(web::QueryConfig::default().error_handler(handle_query_payload_error))
        .app_data(web::PathConfig::default().error_handler(handle_path_error));
}
