//! Shared request/response types for the foldernote HTTP API and its clients.

use serde::{Deserialize, Serialize};

// =====================================================
// Request Types
// =====================================================

/// What kind of item a create request produces
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum FileType {
    Folder,
    SingleNote,
    NoteInsideFolder,
}

/// Create a folder, a standalone note, or a note inside a folder
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateItemRequest {
    pub file_type: FileType,
    /// Owning account, as issued by signup/signin
    pub user_id: String,
    pub title: String,
    pub custom_id: String,
    #[serde(default)]
    pub content: Option<String>,
    /// Folder `customId` the note goes into (noteInsideFolder only)
    #[serde(default)]
    pub belongs_to_folder_id: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateContentRequest {
    pub content_to_update: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SignupRequest {
    pub name: String,
    pub email: String,
    pub password: String,
    /// Caller-chosen account id; generated when absent
    #[serde(default)]
    pub user_id: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SigninRequest {
    pub email: String,
    pub password: String,
}

// =====================================================
// Response Types
// =====================================================

#[derive(Debug, Serialize, Deserialize)]
pub struct ApiResponse<T: Serialize> {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl<T: Serialize> ApiResponse<T> {
    pub fn ok(data: T) -> Self {
        Self {
            success: true,
            message: None,
            data: Some(data),
            error: None,
        }
    }

    pub fn ok_with_message(data: T, message: impl Into<String>) -> Self {
        Self {
            success: true,
            message: Some(message.into()),
            data: Some(data),
            error: None,
        }
    }

    pub fn err(msg: impl Into<String>) -> Self {
        Self {
            success: false,
            message: None,
            data: None,
            error: Some(msg.into()),
        }
    }
}

/// Result of an update or delete: whether the addressed target existed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MutationOutcomeKind {
    Applied,
    TargetMissing,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MutationResult {
    pub outcome: MutationOutcomeKind,
}

/// Account as exposed over the API (never carries the password)
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AccountInfo {
    pub user_id: String,
    pub name: String,
    pub email: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SigninResult {
    pub user_signed_in: bool,
    pub account: AccountInfo,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_request_uses_original_field_names() {
        let req: CreateItemRequest = serde_json::from_str(
            r#"{"fileType":"noteInsideFolder","userId":"u1","title":"T","customId":"n1","belongsToFolderId":"f1"}"#,
        )
        .unwrap();
        assert_eq!(req.file_type, FileType::NoteInsideFolder);
        assert_eq!(req.belongs_to_folder_id.as_deref(), Some("f1"));
        assert!(req.content.is_none());
    }

    #[test]
    fn test_err_response_omits_data() {
        let resp: ApiResponse<()> = ApiResponse::err("nope");
        let json = serde_json::to_value(&resp).unwrap();
        assert_eq!(json["success"], false);
        assert_eq!(json["error"], "nope");
        assert!(json.get("data").is_none());
    }
}
