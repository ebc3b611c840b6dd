//! Folder and note REST API.
//!
//! Point lookups state their addressing scheme in the path: `/note/entry/{id}`
//! for top-level entries, `/note/folder/{folderCustomId}/{customId}` for
//! notes inside a folder.

use actix_web::{web, HttpResponse, Responder};
use foldernote_types::{
    ApiResponse, CreateItemRequest, MutationResult, UpdateContentRequest,
};

use super::store_error_response;
use crate::models::{AddressKind, ItemKind};
use crate::tree::MutationOutcome;
use crate::AppState;

fn created_message(kind: ItemKind) -> &'static str {
    match kind {
        ItemKind::Folder => "Folder created successfully",
        ItemKind::StandaloneNote => "Note created successfully",
        ItemKind::NestedNote => "Note created successfully inside the folder",
    }
}

fn mutation_response(outcome: MutationOutcome, message: &str) -> HttpResponse {
    HttpResponse::Ok().json(ApiResponse::ok_with_message(
        MutationResult {
            outcome: outcome.into(),
        },
        message,
    ))
}

/// Create a folder, a standalone note, or a note inside a folder
async fn create_item(
    data: web::Data<AppState>,
    body: web::Json<CreateItemRequest>,
) -> impl Responder {
    let kind = ItemKind::from(body.file_type);

    match data.tree.create(
        kind,
        &body.user_id,
        &body.title,
        &body.custom_id,
        body.content.as_deref(),
        body.belongs_to_folder_id.as_deref(),
    ) {
        Ok(item) => HttpResponse::Ok().json(ApiResponse::ok_with_message(item, created_message(kind))),
        Err(e) => store_error_response("Failed to create item", &e),
    }
}

/// List every top-level folder and note of an account
async fn list_items(data: web::Data<AppState>, path: web::Path<String>) -> impl Responder {
    let account_id = path.into_inner();

    match data.tree.list_by_account(&account_id) {
        Ok(entries) => HttpResponse::Ok().json(entries),
        Err(e) => store_error_response("Failed to list items", &e),
    }
}

/// Get a folder or standalone note by system id
async fn get_entry(data: web::Data<AppState>, path: web::Path<String>) -> impl Responder {
    let id = path.into_inner();

    match data.tree.get_item("", &id, AddressKind::BySystemId) {
        Ok(item) => HttpResponse::Ok().json(item),
        Err(e) => store_error_response("Failed to get entry", &e),
    }
}

/// Get a note inside a folder
async fn get_nested_note(
    data: web::Data<AppState>,
    path: web::Path<(String, String)>,
) -> impl Responder {
    let (folder_custom_id, custom_id) = path.into_inner();

    match data
        .tree
        .get_item(&custom_id, &folder_custom_id, AddressKind::ByFolderCustomId)
    {
        Ok(item) => HttpResponse::Ok().json(item),
        Err(e) => store_error_response("Failed to get note", &e),
    }
}

/// Overwrite the content of a standalone note (`isSingleNote = true`, parent is
/// its system id) or of a note inside the folder whose custom id is the parent
async fn update_content(
    data: web::Data<AppState>,
    path: web::Path<(String, String, bool)>,
    body: web::Json<UpdateContentRequest>,
) -> impl Responder {
    let (parent_id, custom_id, is_single_note) = path.into_inner();

    match data
        .tree
        .update_content(&parent_id, &custom_id, !is_single_note, &body.content_to_update)
    {
        Ok(MutationOutcome::Applied) => mutation_response(MutationOutcome::Applied, "updated"),
        Ok(MutationOutcome::TargetMissing) => HttpResponse::NotFound().json(ApiResponse::<()>::err(
            format!("Nothing to update at {}/{}", parent_id, custom_id),
        )),
        Err(e) => store_error_response("Failed to update content", &e),
    }
}

/// Delete a top-level entry by system id, or one note from a folder.
/// Repeating a delete is not an error; the outcome says whether anything went.
async fn delete_item(
    data: web::Data<AppState>,
    path: web::Path<(String, String, bool)>,
) -> impl Responder {
    let (parent_id, custom_id, is_single_note) = path.into_inner();

    match data.tree.delete(&parent_id, &custom_id, is_single_note) {
        Ok(outcome) => mutation_response(outcome, "deleted"),
        Err(e) => store_error_response("Failed to delete item", &e),
    }
}

/// Delete a folder and its notes by the folder's custom id
async fn delete_folder(data: web::Data<AppState>, path: web::Path<String>) -> impl Responder {
    let custom_id = path.into_inner();

    match data.tree.delete_folder(&custom_id) {
        Ok(outcome) => mutation_response(outcome, "deleted"),
        Err(e) => store_error_response("Failed to delete folder", &e),
    }
}

pub fn config(cfg: &mut web::ServiceConfig) {
    cfg.route("/createFilesAndFolders", web::post().to(create_item))
        .route("/allFilesAndFolders/{account_id}", web::get().to(list_items))
        .route("/note/entry/{id}", web::get().to(get_entry))
        .route(
            "/note/folder/{folder_custom_id}/{custom_id}",
            web::get().to(get_nested_note),
        )
        .route(
            "/updateContent/{parent_id}/{custom_id}/{is_single_note}",
            web::put().to(update_content),
        )
        .route(
            "/delete/{parent_id}/{custom_id}/{is_single_note}",
            web::delete().to(delete_item),
        )
        .route("/deleteFolder/{custom_id}", web::delete().to(delete_folder));
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::Database;
    use actix_web::{http::StatusCode, test, App};
    use serde_json::{json, Value};
    use std::sync::Arc;
    use tempfile::tempdir;

    fn app_state(dir: &tempfile::TempDir) -> web::Data<AppState> {
        let db_path = dir.path().join("test.db");
        let db = Arc::new(Database::new(db_path.to_str().unwrap(), 2, 5000).unwrap());
        web::Data::new(AppState::new(db))
    }

    #[actix_web::test]
    async fn test_create_and_fetch_folder_tree() {
        let dir = tempdir().unwrap();
        let app = test::init_service(
            App::new().app_data(app_state(&dir)).configure(config),
        )
        .await;

        let req = test::TestRequest::post()
            .uri("/createFilesAndFolders")
            .set_json(json!({
                "fileType": "folder", "userId": "u1", "title": "Work", "customId": "f-1"
            }))
            .to_request();
        let resp: Value = test::call_and_read_body_json(&app, req).await;
        assert_eq!(resp["message"], "Folder created successfully");
        let folder_id = resp["data"]["id"].as_str().unwrap().to_string();

        let req = test::TestRequest::post()
            .uri("/createFilesAndFolders")
            .set_json(json!({
                "fileType": "noteInsideFolder", "userId": "u1", "title": "T",
                "customId": "n-1", "content": "hello", "belongsToFolderId": "f-1"
            }))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::OK);

        let req = test::TestRequest::get().uri("/note/folder/f-1/n-1").to_request();
        let note: Value = test::call_and_read_body_json(&app, req).await;
        assert_eq!(note["title"], "T");
        assert_eq!(note["content"], "hello");

        let req = test::TestRequest::get()
            .uri(&format!("/note/entry/{}", folder_id))
            .to_request();
        let folder: Value = test::call_and_read_body_json(&app, req).await;
        assert_eq!(folder["kind"], "folder");
        assert_eq!(folder["notes"].as_array().unwrap().len(), 1);

        let req = test::TestRequest::get().uri("/allFilesAndFolders/u1").to_request();
        let all: Value = test::call_and_read_body_json(&app, req).await;
        assert_eq!(all.as_array().unwrap().len(), 1);
    }

    #[actix_web::test]
    async fn test_duplicate_title_is_409() {
        let dir = tempdir().unwrap();
        let app = test::init_service(
            App::new().app_data(app_state(&dir)).configure(config),
        )
        .await;

        let body = json!({
            "fileType": "singleNote", "userId": "u1", "title": "Todo", "customId": "s-1"
        });
        let req = test::TestRequest::post()
            .uri("/createFilesAndFolders")
            .set_json(&body)
            .to_request();
        assert_eq!(test::call_service(&app, req).await.status(), StatusCode::OK);

        let req = test::TestRequest::post()
            .uri("/createFilesAndFolders")
            .set_json(&body)
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::CONFLICT);
        let resp: Value = test::read_body_json(resp).await;
        assert_eq!(resp["error"], "Note with this name already exists");
    }

    #[actix_web::test]
    async fn test_update_and_delete_nested_note() {
        let dir = tempdir().unwrap();
        let state = app_state(&dir);
        state
            .tree
            .create(ItemKind::Folder, "u1", "Work", "f-1", None, None)
            .unwrap();
        state
            .tree
            .create(ItemKind::NestedNote, "u1", "T", "n-1", None, Some("f-1"))
            .unwrap();
        let app = test::init_service(App::new().app_data(state.clone()).configure(config)).await;

        let req = test::TestRequest::put()
            .uri("/updateContent/f-1/n-1/false")
            .set_json(json!({ "contentToUpdate": "edited" }))
            .to_request();
        assert_eq!(test::call_service(&app, req).await.status(), StatusCode::OK);

        let req = test::TestRequest::put()
            .uri("/updateContent/f-1/ghost/false")
            .set_json(json!({ "contentToUpdate": "edited" }))
            .to_request();
        assert_eq!(test::call_service(&app, req).await.status(), StatusCode::NOT_FOUND);

        let req = test::TestRequest::delete().uri("/delete/f-1/n-1/false").to_request();
        let resp: Value = test::call_and_read_body_json(&app, req).await;
        assert_eq!(resp["data"]["outcome"], "applied");

        let req = test::TestRequest::delete().uri("/delete/f-1/n-1/false").to_request();
        let resp: Value = test::call_and_read_body_json(&app, req).await;
        assert_eq!(resp["success"], true);
        assert_eq!(resp["data"]["outcome"], "target_missing");

        let req = test::TestRequest::get().uri("/note/folder/f-1/n-1").to_request();
        assert_eq!(test::call_service(&app, req).await.status(), StatusCode::NOT_FOUND);
    }

    #[actix_web::test]
    async fn test_delete_folder_route() {
        let dir = tempdir().unwrap();
        let state = app_state(&dir);
        state
            .tree
            .create(ItemKind::Folder, "u1", "Work", "f-1", None, None)
            .unwrap();
        let app = test::init_service(App::new().app_data(state.clone()).configure(config)).await;

        let req = test::TestRequest::delete().uri("/deleteFolder/f-1").to_request();
        let resp: Value = test::call_and_read_body_json(&app, req).await;
        assert_eq!(resp["data"]["outcome"], "applied");

        assert!(state.tree.list_by_account("u1").unwrap().is_empty());
    }

    #[actix_web::test]
    async fn test_nested_note_without_folder_is_404() {
        let dir = tempdir().unwrap();
        let app = test::init_service(
            App::new().app_data(app_state(&dir)).configure(config),
        )
        .await;

        let req = test::TestRequest::post()
            .uri("/createFilesAndFolders")
            .set_json(json!({
                "fileType": "noteInsideFolder", "userId": "u1", "title": "T",
                "customId": "n-1", "belongsToFolderId": "missing"
            }))
            .to_request();
        assert_eq!(test::call_service(&app, req).await.status(), StatusCode::NOT_FOUND);
    }
}
