pub mod auth;
pub mod health;
pub mod items;

use actix_web::HttpResponse;
use foldernote_types::ApiResponse;

use crate::tree::StoreError;

/// Map a store error to its HTTP status with an `{ success: false, error }` body
pub(crate) fn store_error_response(context: &str, e: &StoreError) -> HttpResponse {
    let body = ApiResponse::<()>::err(e.to_string());
    match e {
        StoreError::Conflict(_) => HttpResponse::Conflict().json(body),
        StoreError::NotFound(_) => HttpResponse::NotFound().json(body),
        StoreError::InvalidInput(_) => HttpResponse::BadRequest().json(body),
        StoreError::InvalidCredentials => HttpResponse::Unauthorized().json(body),
        StoreError::Persistence(_) => {
            log::error!("{}: {}", context, e);
            HttpResponse::InternalServerError().json(ApiResponse::<()>::err("Internal Server Error"))
        }
    }
}
