use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Commit a template as the authorized app's test build.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct UploadPackageRequest {
    pub template_id: i64,
    pub user_desc: String,
    pub user_version: String,
    /// `ext.json` contents, as a JSON string
    pub ext_json: String,
}

/// Host apps the package can be submitted to.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct PackageAuditHosts {
    pub host_names: Vec<String>,
    pub released_host_names: Vec<String>,
}

/// Submit the test build for review on the listed host apps.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CommitAuditRequest {
    pub host_names: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct RollbackInfo {
    pub can_rollback: bool,
    pub last_version: String,
}

/// Fields shared by every build slot.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct VersionCommon {
    pub categories: Vec<String>,
    /// Unix seconds
    pub ctime: i64,
    pub developer_avatar: String,
    pub developer_id: String,
    pub developer_name: String,
    pub summary: String,
    pub version: String,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct AuditVersion {
    #[serde(flatten)]
    pub common: VersionCommon,
    #[serde(rename = "approvedApps")]
    pub approved_apps: Vec<i64>,
    #[serde(rename = "attachInfo")]
    pub attach_info: Option<Value>,
    pub has_publish: i64,
    pub is_illegal_version: bool,
    pub reason: String,
    pub reason_detail: Option<Value>,
    pub status: i64,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct CurrentVersion {
    #[serde(flatten)]
    pub common: VersionCommon,
    #[serde(rename = "approvedApps")]
    pub approved_apps: Vec<i64>,
    #[serde(rename = "attachInfo")]
    pub attach_info: Option<Value>,
    pub has_down: i64,
    #[serde(rename = "notApprovedApps")]
    pub not_approved_apps: Vec<String>,
    pub reason: String,
    pub reason_detail: Option<Value>,
    pub rollback: Option<RollbackInfo>,
    pub last_version: String,
    pub uid: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct LatestVersion {
    #[serde(flatten)]
    pub common: VersionCommon,
    pub has_audit: i64,
    pub screen_shot: String,
}

/// Test, review and released builds; a slot is absent when there is no such build.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct PackageVersions {
    pub audit: Option<AuditVersion>,
    pub current: Option<CurrentVersion>,
    pub latest: Option<LatestVersion>,
}
