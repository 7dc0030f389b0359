//! Third-party endpoints against a mock platform: paths, query strings,
//! bodies and payload decoding.

use httpmock::prelude::*;
use microapp_http::{CallContext, ClientBuilder, FilePart, HttpClientConfig, HttpError};
use microapp_sdk::OpenApi;
use microapp_sdk::models::{
    AddTemplateRequest, CreatePreAuthCodeRequest, DeleteTemplateRequest, UploadPicMaterialRequest,
};
use serde_json::json;

fn api_for(server: &MockServer) -> OpenApi {
    let client = ClientBuilder::with_config(HttpClientConfig::for_testing(format!(
        "{}/openapi/",
        server.base_url()
    )))
    .build()
    .unwrap();
    OpenApi::with_client(client)
}

#[tokio::test]
async fn component_access_token_sends_credentials_in_query() {
    let server = MockServer::start();
    let mock = server.mock(|when, then| {
        when.method(GET)
            .path("/openapi/v1/auth/tp/token")
            .query_param("component_appid", "tt-component")
            .query_param("component_appsecret", "s3cret")
            .query_param("component_ticket", "ticket@@abc");
        then.status(200)
            .json_body(json!({"component_access_token": "cat-1", "expires_in": 7200}));
    });

    let token = api_for(&server)
        .third_party()
        .get_component_access_token(&CallContext::new(), "tt-component", "s3cret", "ticket@@abc")
        .await
        .unwrap();

    mock.assert();
    assert_eq!(token.component_access_token, "cat-1");
    assert_eq!(token.expires_in, 7200);
}

#[tokio::test]
async fn pre_auth_code_posts_share_settings() {
    let server = MockServer::start();
    let mock = server.mock(|when, then| {
        when.method(POST)
            .path("/openapi/v2/auth/pre_auth_code")
            .query_param("component_appid", "tt-component")
            .query_param("component_access_token", "cat-1")
            .json_body(json!({"share_ratio": 10, "share_amount": 0}));
        then.status(200).json_body(json!({
            "errno": 0,
            "message": "success",
            "data": {"pre_auth_code": "pac-9", "expires_in": 600}
        }));
    });

    let code = api_for(&server)
        .third_party()
        .create_pre_auth_code(
            &CallContext::new(),
            "tt-component",
            "cat-1",
            &CreatePreAuthCodeRequest {
                share_ratio: 10,
                share_amount: 0,
            },
        )
        .await
        .unwrap();

    mock.assert();
    assert_eq!(code.pre_auth_code, "pac-9");
    assert_eq!(code.expires_in, 600);
}

#[tokio::test]
async fn oauth_token_and_refresh_use_their_grant_types() {
    let server = MockServer::start();
    let exchange = server.mock(|when, then| {
        when.method(GET)
            .path("/openapi/v1/oauth/token")
            .query_param("authorization_code", "auth-code")
            .query_param("grant_type", "app_to_tp_authorization_code");
        then.status(200).json_body(json!({
            "authorizer_access_token": "aat",
            "authorizer_refresh_token": "art",
            "expires_in": 7200,
            "authorizer_appid": "tt-app",
            "authorize_permission": [{"id": 1, "category": "basic", "description": "info"}]
        }));
    });
    let refresh = server.mock(|when, then| {
        when.method(GET)
            .path("/openapi/v1/oauth/token")
            .query_param("authorizer_refresh_token", "art")
            .query_param("grant_type", "app_to_tp_refresh_token");
        then.status(200).json_body(json!({
            "authorizer_access_token": "aat-2",
            "authorizer_refresh_token": "art-2",
            "expires_in": 7200
        }));
    });

    let api = api_for(&server);
    let ctx = CallContext::new();
    let token = api
        .third_party()
        .get_oauth_token(&ctx, "tt-component", "cat-1", "auth-code")
        .await
        .unwrap();
    let refreshed = api
        .third_party()
        .refresh_oauth_token(&ctx, "tt-component", "cat-1", &token.authorizer_refresh_token)
        .await
        .unwrap();

    exchange.assert();
    refresh.assert();
    assert_eq!(token.authorizer_appid, "tt-app");
    assert_eq!(token.authorize_permission.len(), 1);
    assert_eq!(refreshed.authorizer_access_token, "aat-2");
}

#[tokio::test]
async fn retrieve_authorization_code() {
    let server = MockServer::start();
    let mock = server.mock(|when, then| {
        when.method(GET)
            .path("/openapi/v1/oauth/retrieve")
            .query_param("authorization_appid", "tt-app");
        then.status(200)
            .json_body(json!({"authorization_code": "code-2", "expires_in": 3600}));
    });

    let code = api_for(&server)
        .third_party()
        .retrieve_authorization_code(&CallContext::new(), "tt-component", "cat-1", "tt-app")
        .await
        .unwrap();

    mock.assert();
    assert_eq!(code.authorization_code, "code-2");
}

#[tokio::test]
async fn templates_and_drafts_decode_lists() {
    let server = MockServer::start();
    server.mock(|when, then| {
        when.method(GET).path("/openapi/v1/tp/template/get_tpl_list");
        then.status(200).json_body(json!({
            "errno": 0,
            "message": "success",
            "data": {"template_list": [
                {"template_id": 11, "user_version": "1.0.0", "user_desc": "first", "create_time": 1_700_000_000}
            ]}
        }));
    });
    server.mock(|when, then| {
        when.method(GET).path("/openapi/v1/tp/template/get_draft_list");
        then.status(200)
            .json_body(json!({"errno": 0, "message": "success", "data": {"draft_list": []}}));
    });

    let api = api_for(&server);
    let ctx = CallContext::new();
    let templates = api
        .third_party()
        .get_templates(&ctx, "tt-component", "cat-1")
        .await
        .unwrap();
    let drafts = api
        .third_party()
        .get_drafts(&ctx, "tt-component", "cat-1")
        .await
        .unwrap();

    assert_eq!(templates.template_list.len(), 1);
    assert_eq!(templates.template_list[0].template_id, 11);
    assert_eq!(templates.template_list[0].create_time, 1_700_000_000);
    assert!(drafts.draft_list.is_empty());
}

#[tokio::test]
async fn add_and_delete_template_keep_query_parameters_in_order() {
    let server = MockServer::start();
    let add = server.mock(|when, then| {
        when.method(POST)
            .path("/openapi/v1/tp/template/add_tpl")
            .query_param("component_appid", "tt-component")
            .query_param("component_access_token", "cat-1")
            .json_body(json!({"draft_id": 5}));
        then.status(200).json_body(json!({"errno": 0, "message": "success"}));
    });
    let delete = server.mock(|when, then| {
        when.method(POST)
            .path("/openapi/v1/tp/template/del_tpl")
            .query_param("component_appid", "tt-component")
            .json_body(json!({"template_id": 11}));
        then.status(200)
            .json_body(json!({"errno": 40010, "message": "template not found"}));
    });

    let api = api_for(&server);
    let ctx = CallContext::new();
    api.third_party()
        .add_template(&ctx, "tt-component", "cat-1", &AddTemplateRequest { draft_id: 5 })
        .await
        .unwrap();
    let err = api
        .third_party()
        .delete_template(
            &ctx,
            "tt-component",
            "cat-1",
            &DeleteTemplateRequest { template_id: 11 },
        )
        .await
        .unwrap_err();

    add.assert();
    delete.assert();
    let api_err = err.api_error().unwrap();
    assert_eq!(api_err.errno, 40010);
    assert_eq!(api_err.request_body.as_ref(), br#"{"template_id":11}"#);
}

#[tokio::test]
async fn upload_pic_material_sends_multipart_and_returns_address() {
    let server = MockServer::start();
    let mock = server.mock(|when, then| {
        when.method(POST)
            .path("/openapi/v1/tp/upload_pic_material")
            .header_exists("content-type")
            .body_includes("name=\"material_type\"")
            .body_includes("filename=\"icon.png\"");
        then.status(200).json_body(json!({
            "errno": 0,
            "message": "success",
            "data": "https://cdn.example/material/icon.png"
        }));
    });

    let request = UploadPicMaterialRequest {
        material_type: 2,
        material_file: FilePart::new("icon.png", &b"\x89PNG\r\n"[..]),
    };
    let address = api_for(&server)
        .third_party()
        .upload_pic_material(&CallContext::new(), "tt-component", "cat-1", &request)
        .await
        .unwrap();

    mock.assert();
    assert_eq!(address, "https://cdn.example/material/icon.png");
}

#[tokio::test]
async fn webview_file_is_copied_verbatim() {
    let server = MockServer::start();
    server.mock(|when, then| {
        when.method(GET).path("/openapi/v1/tp/download/webview_file");
        then.status(200).body("verify-token-8f2c");
    });

    let mut sink = Vec::new();
    let meta = api_for(&server)
        .third_party()
        .download_webview_file(&CallContext::new(), "tt-component", "cat-1", &mut sink)
        .await
        .unwrap();

    assert_eq!(meta.status.as_u16(), 200);
    assert_eq!(sink, b"verify-token-8f2c");
}

#[tokio::test]
async fn cancelled_context_sends_nothing() {
    let server = MockServer::start();
    let mock = server.mock(|when, then| {
        when.path("/openapi/v1/tp/template/get_tpl_list");
        then.status(200);
    });

    let ctx = CallContext::new();
    ctx.cancel();
    let err = api_for(&server)
        .third_party()
        .get_templates(&ctx, "tt-component", "cat-1")
        .await
        .unwrap_err();

    assert!(matches!(err, HttpError::Cancelled));
    mock.assert_calls(0);
}
