use microapp_http::{ApiRequest, CallContext, Client, HttpError, ResponseMeta};
use tokio::io::AsyncWrite;
use tracing::instrument;

use super::fetch;
use crate::models::{
    AddTemplateRequest, AuthorizationCode, ComponentAccessToken, CreatePreAuthCodeRequest,
    DeleteTemplateRequest, Drafts, GRANT_TYPE_AUTHORIZATION_CODE, GRANT_TYPE_REFRESH_TOKEN,
    OAuthToken, PreAuthCode, RefreshedOAuthToken, Templates, UploadPicMaterialRequest,
};

/// Authorization flow, code templates and materials of the third-party application.
#[derive(Debug, Clone, Copy)]
pub struct ThirdPartyService<'a> {
    client: &'a Client,
}

impl<'a> ThirdPartyService<'a> {
    pub(super) fn new(client: &'a Client) -> Self {
        Self { client }
    }

    fn component(
        path: &str,
        component_appid: &str,
        component_access_token: &str,
    ) -> Result<ApiRequest, HttpError> {
        ApiRequest::get(path).query(&[
            ("component_appid", component_appid),
            ("component_access_token", component_access_token),
        ])
    }

    /// Exchange the app secret and the latest pushed ticket for a component token.
    ///
    /// # Errors
    /// Any transport error; `HttpError::Api` when the platform rejects the credentials.
    #[instrument(skip_all, fields(component_appid = %component_appid))]
    pub async fn get_component_access_token(
        &self,
        ctx: &CallContext,
        component_appid: &str,
        component_appsecret: &str,
        component_ticket: &str,
    ) -> Result<ComponentAccessToken, HttpError> {
        let request = ApiRequest::get("v1/auth/tp/token").query(&[
            ("component_appid", component_appid),
            ("component_appsecret", component_appsecret),
            ("component_ticket", component_ticket),
        ])?;
        fetch(self.client, ctx, request).await
    }

    /// Create the pre-auth code used to build the authorization page link.
    ///
    /// # Errors
    /// Any transport error.
    #[instrument(skip_all, fields(component_appid = %component_appid))]
    pub async fn create_pre_auth_code(
        &self,
        ctx: &CallContext,
        component_appid: &str,
        component_access_token: &str,
        body: &CreatePreAuthCodeRequest,
    ) -> Result<PreAuthCode, HttpError> {
        let request = ApiRequest::post("v2/auth/pre_auth_code")
            .query(&[
                ("component_access_token", component_access_token),
                ("component_appid", component_appid),
            ])?
            .json(body)?;
        fetch(self.client, ctx, request).await
    }

    /// Exchange an authorization code for the authorizer's tokens.
    ///
    /// # Errors
    /// Any transport error.
    #[instrument(skip_all, fields(component_appid = %component_appid))]
    pub async fn get_oauth_token(
        &self,
        ctx: &CallContext,
        component_appid: &str,
        component_access_token: &str,
        authorization_code: &str,
    ) -> Result<OAuthToken, HttpError> {
        let request = Self::component("v1/oauth/token", component_appid, component_access_token)?
            .query(&[
                ("authorization_code", authorization_code),
                ("grant_type", GRANT_TYPE_AUTHORIZATION_CODE),
            ])?;
        fetch(self.client, ctx, request).await
    }

    /// Trade a refresh token for a new token pair. The old refresh token stops working.
    ///
    /// # Errors
    /// Any transport error.
    #[instrument(skip_all, fields(component_appid = %component_appid))]
    pub async fn refresh_oauth_token(
        &self,
        ctx: &CallContext,
        component_appid: &str,
        component_access_token: &str,
        authorizer_refresh_token: &str,
    ) -> Result<RefreshedOAuthToken, HttpError> {
        let request = Self::component("v1/oauth/token", component_appid, component_access_token)?
            .query(&[
                ("authorizer_refresh_token", authorizer_refresh_token),
                ("grant_type", GRANT_TYPE_REFRESH_TOKEN),
            ])?;
        fetch(self.client, ctx, request).await
    }

    /// Recover the authorization code of an app whose authorization push was missed.
    ///
    /// # Errors
    /// Any transport error.
    #[instrument(skip_all, fields(component_appid = %component_appid, authorization_appid = %authorization_appid))]
    pub async fn retrieve_authorization_code(
        &self,
        ctx: &CallContext,
        component_appid: &str,
        component_access_token: &str,
        authorization_appid: &str,
    ) -> Result<AuthorizationCode, HttpError> {
        let request =
            Self::component("v1/oauth/retrieve", component_appid, component_access_token)?
                .query(&[("authorization_appid", authorization_appid)])?;
        fetch(self.client, ctx, request).await
    }

    /// # Errors
    /// Any transport error.
    #[instrument(skip_all, fields(component_appid = %component_appid))]
    pub async fn get_templates(
        &self,
        ctx: &CallContext,
        component_appid: &str,
        component_access_token: &str,
    ) -> Result<Templates, HttpError> {
        let request = Self::component(
            "v1/tp/template/get_tpl_list",
            component_appid,
            component_access_token,
        )?;
        fetch(self.client, ctx, request).await
    }

    /// # Errors
    /// Any transport error.
    #[instrument(skip_all, fields(component_appid = %component_appid))]
    pub async fn get_drafts(
        &self,
        ctx: &CallContext,
        component_appid: &str,
        component_access_token: &str,
    ) -> Result<Drafts, HttpError> {
        let request = Self::component(
            "v1/tp/template/get_draft_list",
            component_appid,
            component_access_token,
        )?;
        fetch(self.client, ctx, request).await
    }

    /// Promote a draft to a persistent template.
    ///
    /// # Errors
    /// Any transport error.
    #[instrument(skip_all, fields(component_appid = %component_appid, draft_id = body.draft_id))]
    pub async fn add_template(
        &self,
        ctx: &CallContext,
        component_appid: &str,
        component_access_token: &str,
        body: &AddTemplateRequest,
    ) -> Result<ResponseMeta, HttpError> {
        let request = ApiRequest::post("v1/tp/template/add_tpl")
            .query(&[
                ("component_appid", component_appid),
                ("component_access_token", component_access_token),
            ])?
            .json(body)?;
        self.client.send_empty(ctx, request).await
    }

    /// # Errors
    /// Any transport error.
    #[instrument(skip_all, fields(component_appid = %component_appid, template_id = body.template_id))]
    pub async fn delete_template(
        &self,
        ctx: &CallContext,
        component_appid: &str,
        component_access_token: &str,
        body: &DeleteTemplateRequest,
    ) -> Result<ResponseMeta, HttpError> {
        let request = ApiRequest::post("v1/tp/template/del_tpl")
            .query(&[
                ("component_appid", component_appid),
                ("component_access_token", component_access_token),
            ])?
            .json(body)?;
        self.client.send_empty(ctx, request).await
    }

    /// Upload a picture and return the address to reference it by.
    ///
    /// # Errors
    /// Any transport error.
    #[instrument(skip_all, fields(component_appid = %component_appid, material_type = body.material_type))]
    pub async fn upload_pic_material(
        &self,
        ctx: &CallContext,
        component_appid: &str,
        component_access_token: &str,
        body: &UploadPicMaterialRequest,
    ) -> Result<String, HttpError> {
        let request = ApiRequest::post("v1/tp/upload_pic_material")
            .query(&[
                ("component_appid", component_appid),
                ("component_access_token", component_access_token),
            ])?
            .form(body);
        fetch(self.client, ctx, request).await
    }

    /// Stream the domain verification file into `sink`.
    ///
    /// # Errors
    /// Any transport error, or `HttpError::Io` from the sink.
    #[instrument(skip_all, fields(component_appid = %component_appid))]
    pub async fn download_webview_file<W>(
        &self,
        ctx: &CallContext,
        component_appid: &str,
        component_access_token: &str,
        sink: &mut W,
    ) -> Result<ResponseMeta, HttpError>
    where
        W: AsyncWrite + Unpin + ?Sized,
    {
        let request = Self::component(
            "v1/tp/download/webview_file",
            component_appid,
            component_access_token,
        )?;
        self.client.send_raw(ctx, request, sink).await
    }
}
