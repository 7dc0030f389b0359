use serde::{Deserialize, Serialize};
use std::fmt;

use super::REDACTED;

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct NewNameAuditInfo {
    pub new_name: String,
    pub remaining_times: i64,
    pub new_name_audit_state: i64,
    pub reason: String,
    pub advice: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct NewIntroAuditInfo {
    pub new_intro: String,
    pub remaining_times: i64,
    pub new_intro_audit_state: i64,
    pub reason: String,
    pub advice: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct NewIconAuditInfo {
    pub new_icon: String,
    pub remaining_times: i64,
    pub new_icon_audit_state: i64,
    pub reason: String,
    pub advice: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct AppCategoriesAuditInfo {
    pub app_category: String,
    pub app_category_name: String,
    pub app_category_audit_state: i64,
    pub reason: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct SubjectAuditInfo {
    pub subject_number: String,
    pub subject_name: String,
    pub subject_type: i64,
    pub subject_audit_state: i64,
    pub reason: String,
}

/// Profile of an authorized micro app, including pending audits.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct AppInfo {
    pub app_id: String,
    pub app_type: i64,
    pub app_state: i64,
    pub app_name: String,
    pub new_name_audit_info: Option<NewNameAuditInfo>,
    pub app_intro: String,
    pub new_intro_audit_info: Option<NewIntroAuditInfo>,
    pub app_icon: String,
    #[serde(alias = "new_i_con_audit_info")]
    pub new_icon_audit_info: Option<NewIconAuditInfo>,
    pub app_categories_audit_info: Option<AppCategoriesAuditInfo>,
    pub subject_audit_info: Option<SubjectAuditInfo>,
}

/// Which build a QR code should open.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum QrcodeVersion {
    /// Released build
    #[default]
    Current,
    /// Build under review
    Audit,
    /// Test build
    Latest,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct QrcodeRequest {
    pub version: QrcodeVersion,
    /// Page to open; the home page when absent
    #[serde(skip_serializing_if = "Option::is_none")]
    pub path: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ModifyAppNameRequest {
    pub new_name: String,
    /// Address returned by the picture material upload
    #[serde(skip_serializing_if = "Option::is_none")]
    pub material_file_path: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ModifyAppIntroRequest {
    pub new_intro: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ModifyAppIconRequest {
    pub new_icon_path: String,
}

/// How a domain list in the request is applied.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum DomainAction {
    Add,
    Delete,
    /// Replace the whole list
    Set,
    /// Read the current list; the domain fields are ignored
    #[default]
    Get,
}

/// Update the request/socket/upload/download allow-lists.
///
/// Empty lists with [`DomainAction::Add`] add every domain configured on the
/// third-party platform.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ModifyServerDomainRequest {
    pub action: DomainAction,
    pub request: Vec<String>,
    pub socket: Vec<String>,
    pub upload: Vec<String>,
    pub download: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct ServerDomain {
    pub request: Vec<String>,
    pub socket: Vec<String>,
    pub upload: Vec<String>,
    pub download: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ModifyWebviewDomainRequest {
    pub action: DomainAction,
    pub webview: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct WebviewDomain {
    pub webview: Vec<String>,
}

/// Result of exchanging a login code.
#[derive(Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct Session {
    pub session_key: String,
    pub openid: String,
    pub anonymous_openid: String,
}

impl fmt::Debug for Session {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Session")
            .field("session_key", &REDACTED)
            .field("openid", &self.openid)
            .field("anonymous_openid", &self.anonymous_openid)
            .finish()
    }
}
