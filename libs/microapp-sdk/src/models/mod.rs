//! Request and response payloads, grouped the way the platform documents them.

mod app;
mod auth;
mod material;
mod package;
mod template;

pub use app::{
    AppCategoriesAuditInfo, AppInfo, DomainAction, ModifyAppIconRequest, ModifyAppIntroRequest,
    ModifyAppNameRequest, ModifyServerDomainRequest, ModifyWebviewDomainRequest,
    NewIconAuditInfo, NewIntroAuditInfo, NewNameAuditInfo, QrcodeRequest, QrcodeVersion,
    ServerDomain, Session, SubjectAuditInfo, WebviewDomain,
};
pub use auth::{
    AuthorizationCode, AuthorizePermission, ComponentAccessToken, CreatePreAuthCodeRequest,
    GRANT_TYPE_AUTHORIZATION_CODE, GRANT_TYPE_REFRESH_TOKEN, OAuthToken, PreAuthCode,
    RefreshedOAuthToken,
};
pub use material::UploadPicMaterialRequest;
pub use package::{
    AuditVersion, CommitAuditRequest, CurrentVersion, LatestVersion, PackageAuditHosts,
    PackageVersions, RollbackInfo, UploadPackageRequest, VersionCommon,
};
pub use template::{AddTemplateRequest, DeleteTemplateRequest, Draft, Drafts, Template, Templates};

const REDACTED: &str = "[REDACTED]";
