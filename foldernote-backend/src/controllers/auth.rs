use actix_web::{web, HttpResponse, Responder};
use foldernote_types::{AccountInfo, ApiResponse, SigninRequest, SigninResult, SignupRequest};

use super::store_error_response;
use crate::tree::StoreError;
use crate::AppState;

/// Register a new account
async fn signup(data: web::Data<AppState>, body: web::Json<SignupRequest>) -> impl Responder {
    match data.accounts.signup(
        &body.name,
        &body.email,
        &body.password,
        body.user_id.as_deref(),
    ) {
        Ok(account) => HttpResponse::Created().json(ApiResponse::ok_with_message(
            AccountInfo::from(account),
            "User created successfully",
        )),
        // Existing clients expect 400 for a taken email
        Err(StoreError::Conflict(msg)) => {
            HttpResponse::BadRequest().json(ApiResponse::<()>::err(msg))
        }
        Err(e) => store_error_response("Signup failed", &e),
    }
}

/// Check credentials and return the account they belong to
async fn signin(data: web::Data<AppState>, body: web::Json<SigninRequest>) -> impl Responder {
    match data.accounts.signin(&body.email, &body.password) {
        Ok(account) => HttpResponse::Ok().json(ApiResponse::ok_with_message(
            SigninResult {
                user_signed_in: true,
                account: account.into(),
            },
            "Signin successful",
        )),
        Err(e) => store_error_response("Signin failed", &e),
    }
}

pub fn config(cfg: &mut web::ServiceConfig) {
    cfg.route("/signup", web::post().to(signup))
        .route("/signin", web::post().to(signin));
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::Database;
    use actix_web::{http::StatusCode, test, App};
    use serde_json::{json, Value};
    use std::sync::Arc;
    use tempfile::tempdir;

    #[actix_web::test]
    async fn test_signup_signin_flow() {
        let dir = tempdir().unwrap();
        let db_path = dir.path().join("test.db");
        let db = Arc::new(Database::new(db_path.to_str().unwrap(), 2, 5000).unwrap());
        let app = test::init_service(
            App::new()
                .app_data(web::Data::new(AppState::new(db)))
                .configure(config),
        )
        .await;

        let signup_body = json!({
            "name": "Ada", "email": "ada@example.com", "password": "pw", "userId": "u-ada"
        });
        let req = test::TestRequest::post().uri("/signup").set_json(&signup_body).to_request();
        assert_eq!(test::call_service(&app, req).await.status(), StatusCode::CREATED);

        let req = test::TestRequest::post().uri("/signup").set_json(&signup_body).to_request();
        assert_eq!(test::call_service(&app, req).await.status(), StatusCode::BAD_REQUEST);

        let req = test::TestRequest::post()
            .uri("/signin")
            .set_json(json!({ "email": "ada@example.com", "password": "pw" }))
            .to_request();
        let resp: Value = test::call_and_read_body_json(&app, req).await;
        assert_eq!(resp["data"]["userSignedIn"], true);
        assert_eq!(resp["data"]["account"]["userId"], "u-ada");

        let req = test::TestRequest::post()
            .uri("/signin")
            .set_json(json!({ "email": "ada@example.com", "password": "nope" }))
            .to_request();
        assert_eq!(test::call_service(&app, req).await.status(), StatusCode::UNAUTHORIZED);
    }
}
