use microapp_http::{ApiRequest, CallContext, Client, HttpError, ResponseMeta};
use serde::Serialize;
use tokio::io::AsyncWrite;
use tracing::instrument;

use super::fetch;
use crate::models::{
    AppInfo, CommitAuditRequest, ModifyAppIconRequest, ModifyAppIntroRequest,
    ModifyAppNameRequest, ModifyServerDomainRequest, ModifyWebviewDomainRequest,
    PackageAuditHosts, PackageVersions, QrcodeRequest, ServerDomain, Session,
    UploadPackageRequest, WebviewDomain,
};

/// Profile, domain and code management of one authorized micro app.
///
/// Every call is authenticated with the third-party `component_appid` and the
/// app's `authorizer_access_token`.
#[derive(Debug, Clone, Copy)]
pub struct MicroAppService<'a> {
    client: &'a Client,
}

impl<'a> MicroAppService<'a> {
    pub(super) fn new(client: &'a Client) -> Self {
        Self { client }
    }

    fn authorized(
        request: ApiRequest,
        component_appid: &str,
        authorizer_access_token: &str,
    ) -> Result<ApiRequest, HttpError> {
        request.query(&[
            ("component_appid", component_appid),
            ("authorizer_access_token", authorizer_access_token),
        ])
    }

    fn authorized_json<B: Serialize + ?Sized>(
        path: &str,
        component_appid: &str,
        authorizer_access_token: &str,
        body: &B,
    ) -> Result<ApiRequest, HttpError> {
        Self::authorized(ApiRequest::post(path), component_appid, authorizer_access_token)?
            .json(body)
    }

    /// # Errors
    /// Any transport error.
    #[instrument(skip_all, fields(component_appid = %component_appid))]
    pub async fn get_app_info(
        &self,
        ctx: &CallContext,
        component_appid: &str,
        authorizer_access_token: &str,
    ) -> Result<AppInfo, HttpError> {
        let request = Self::authorized(
            ApiRequest::get("v1/microapp/app/info"),
            component_appid,
            authorizer_access_token,
        )?;
        fetch(self.client, ctx, request).await
    }

    /// Write the QR code image for the requested build into `sink`.
    ///
    /// # Errors
    /// Any transport error, or `HttpError::Io` from the sink.
    #[instrument(skip_all, fields(component_appid = %component_appid))]
    pub async fn download_qrcode<W>(
        &self,
        ctx: &CallContext,
        component_appid: &str,
        authorizer_access_token: &str,
        body: &QrcodeRequest,
        sink: &mut W,
    ) -> Result<ResponseMeta, HttpError>
    where
        W: AsyncWrite + Unpin + ?Sized,
    {
        let request = Self::authorized_json(
            "v1/microapp/app/qrcode",
            component_appid,
            authorizer_access_token,
            body,
        )?;
        self.client.send_raw(ctx, request, sink).await
    }

    /// Succeeds when `app_name` is available.
    ///
    /// # Errors
    /// `HttpError::Api` when the name is taken or not allowed.
    #[instrument(skip_all, fields(component_appid = %component_appid, app_name = %app_name))]
    pub async fn check_app_name(
        &self,
        ctx: &CallContext,
        component_appid: &str,
        authorizer_access_token: &str,
        app_name: &str,
    ) -> Result<ResponseMeta, HttpError> {
        let request = Self::authorized(
            ApiRequest::get("v1/microapp/app/check_app_name"),
            component_appid,
            authorizer_access_token,
        )?
        .query(&[("app_name", app_name)])?;
        self.client.send_empty(ctx, request).await
    }

    /// # Errors
    /// Any transport error.
    #[instrument(skip_all, fields(component_appid = %component_appid))]
    pub async fn modify_app_name(
        &self,
        ctx: &CallContext,
        component_appid: &str,
        authorizer_access_token: &str,
        body: &ModifyAppNameRequest,
    ) -> Result<ResponseMeta, HttpError> {
        let request = Self::authorized_json(
            "v1/microapp/app/modify_app_name",
            component_appid,
            authorizer_access_token,
            body,
        )?;
        self.client.send_empty(ctx, request).await
    }

    /// # Errors
    /// Any transport error.
    #[instrument(skip_all, fields(component_appid = %component_appid))]
    pub async fn modify_app_intro(
        &self,
        ctx: &CallContext,
        component_appid: &str,
        authorizer_access_token: &str,
        body: &ModifyAppIntroRequest,
    ) -> Result<ResponseMeta, HttpError> {
        let request = Self::authorized_json(
            "v1/microapp/app/modify_app_intro",
            component_appid,
            authorizer_access_token,
            body,
        )?;
        self.client.send_empty(ctx, request).await
    }

    /// `new_icon_path` is an address returned by the picture material upload.
    ///
    /// # Errors
    /// Any transport error.
    #[instrument(skip_all, fields(component_appid = %component_appid))]
    pub async fn modify_app_icon(
        &self,
        ctx: &CallContext,
        component_appid: &str,
        authorizer_access_token: &str,
        body: &ModifyAppIconRequest,
    ) -> Result<ResponseMeta, HttpError> {
        let request = Self::authorized_json(
            "v1/microapp/app/modify_app_icon",
            component_appid,
            authorizer_access_token,
            body,
        )?;
        self.client.send_empty(ctx, request).await
    }

    /// Apply `body.action` and return the resulting server domain lists.
    ///
    /// # Errors
    /// Any transport error.
    #[instrument(skip_all, fields(component_appid = %component_appid, action = ?body.action))]
    pub async fn modify_server_domain(
        &self,
        ctx: &CallContext,
        component_appid: &str,
        authorizer_access_token: &str,
        body: &ModifyServerDomainRequest,
    ) -> Result<ServerDomain, HttpError> {
        let request = Self::authorized_json(
            "v1/microapp/app/modify_server_domain",
            component_appid,
            authorizer_access_token,
            body,
        )?;
        fetch(self.client, ctx, request).await
    }

    /// Apply `body.action` and return the resulting webview domain list.
    ///
    /// # Errors
    /// Any transport error.
    #[instrument(skip_all, fields(component_appid = %component_appid, action = ?body.action))]
    pub async fn modify_webview_domain(
        &self,
        ctx: &CallContext,
        component_appid: &str,
        authorizer_access_token: &str,
        body: &ModifyWebviewDomainRequest,
    ) -> Result<WebviewDomain, HttpError> {
        let request = Self::authorized_json(
            "v1/microapp/app/modify_webview_domain",
            component_appid,
            authorizer_access_token,
            body,
        )?;
        fetch(self.client, ctx, request).await
    }

    /// Exchange a login `code` (or an `anonymous_code`) for the user's session.
    ///
    /// # Errors
    /// Any transport error.
    #[instrument(skip_all, fields(component_appid = %component_appid))]
    pub async fn code2session(
        &self,
        ctx: &CallContext,
        component_appid: &str,
        authorizer_access_token: &str,
        code: &str,
        anonymous_code: Option<&str>,
    ) -> Result<Session, HttpError> {
        let mut request = Self::authorized(
            ApiRequest::get("v1/microapp/code2session"),
            component_appid,
            authorizer_access_token,
        )?
        .query(&[("code", code)])?;
        if let Some(anonymous_code) = anonymous_code {
            request = request.query(&[("anonymous_code", anonymous_code)])?;
        }
        fetch(self.client, ctx, request).await
    }

    /// Commit a template as the app's test build.
    ///
    /// # Errors
    /// Any transport error.
    #[instrument(skip_all, fields(component_appid = %component_appid, template_id = body.template_id))]
    pub async fn upload_package(
        &self,
        ctx: &CallContext,
        component_appid: &str,
        authorizer_access_token: &str,
        body: &UploadPackageRequest,
    ) -> Result<ResponseMeta, HttpError> {
        let request = Self::authorized_json(
            "v1/microapp/package/upload",
            component_appid,
            authorizer_access_token,
            body,
        )?;
        self.client.send_empty(ctx, request).await
    }

    /// Host apps the test build can be submitted to.
    ///
    /// # Errors
    /// Any transport error.
    #[instrument(skip_all, fields(component_appid = %component_appid))]
    pub async fn get_package_audit_hosts(
        &self,
        ctx: &CallContext,
        component_appid: &str,
        authorizer_access_token: &str,
    ) -> Result<PackageAuditHosts, HttpError> {
        let request = Self::authorized(
            ApiRequest::get("v1/microapp/package/audit_hosts"),
            component_appid,
            authorizer_access_token,
        )?;
        fetch(self.client, ctx, request).await
    }

    /// Submit the test build for review.
    ///
    /// # Errors
    /// Any transport error.
    #[instrument(skip_all, fields(component_appid = %component_appid))]
    pub async fn commit_audit_package(
        &self,
        ctx: &CallContext,
        component_appid: &str,
        authorizer_access_token: &str,
        body: &CommitAuditRequest,
    ) -> Result<ResponseMeta, HttpError> {
        let request = Self::authorized_json(
            "v2/microapp/package/audit",
            component_appid,
            authorizer_access_token,
            body,
        )?;
        self.client.send_empty(ctx, request).await
    }

    /// Release the approved build.
    ///
    /// # Errors
    /// Any transport error.
    #[instrument(skip_all, fields(component_appid = %component_appid))]
    pub async fn release_package(
        &self,
        ctx: &CallContext,
        component_appid: &str,
        authorizer_access_token: &str,
    ) -> Result<ResponseMeta, HttpError> {
        let request = Self::authorized(
            ApiRequest::post("v2/microapp/package/release"),
            component_appid,
            authorizer_access_token,
        )?;
        self.client.send_empty(ctx, request).await
    }

    /// Roll the released build back to the previous one. May take a while.
    ///
    /// # Errors
    /// Any transport error.
    #[instrument(skip_all, fields(component_appid = %component_appid))]
    pub async fn rollback_package(
        &self,
        ctx: &CallContext,
        component_appid: &str,
        authorizer_access_token: &str,
    ) -> Result<ResponseMeta, HttpError> {
        let request = Self::authorized(
            ApiRequest::post("v2/microapp/package/rollback"),
            component_appid,
            authorizer_access_token,
        )?;
        self.client.send_empty(ctx, request).await
    }

    /// # Errors
    /// Any transport error.
    #[instrument(skip_all, fields(component_appid = %component_appid))]
    pub async fn get_package_versions(
        &self,
        ctx: &CallContext,
        component_appid: &str,
        authorizer_access_token: &str,
    ) -> Result<PackageVersions, HttpError> {
        let request = Self::authorized(
            ApiRequest::get("v1/microapp/package/versions"),
            component_appid,
            authorizer_access_token,
        )?;
        fetch(self.client, ctx, request).await
    }
}
