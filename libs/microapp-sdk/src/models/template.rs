use serde::{Deserialize, Serialize};

/// A persistent code template owned by the third-party application.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct Template {
    pub template_id: i64,
    pub user_version: String,
    pub user_desc: String,
    /// Unix seconds
    pub create_time: i64,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct Templates {
    pub template_list: Vec<Template>,
}

/// A temporary draft uploaded from the developer tools.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct Draft {
    pub draft_id: i64,
    pub user_version: String,
    pub user_desc: String,
    /// Unix seconds
    pub create_time: i64,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct Drafts {
    pub draft_list: Vec<Draft>,
}

/// Promote a draft to a template. At most 200 templates per application.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct AddTemplateRequest {
    pub draft_id: i64,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct DeleteTemplateRequest {
    pub template_id: i64,
}
