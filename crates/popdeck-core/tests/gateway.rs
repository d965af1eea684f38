mod common;

use common::{Harness, PROFILE_URL};
use popdeck_core::gateway::{ContentRequest, ContentResponse};
use popdeck_core::site::SiteRule;
use popdeck_core::{GatewayError, HostError, TabContext};
use serde_json::json;

const LINKEDIN: SiteRule = SiteRule::Domain("linkedin.com");

#[tokio::test]
async fn test_no_tab_yields_no_active_tab_without_sending() {
    let h = Harness::new();

    let result = h
        .gateway
        .invoke_content_action(None, LINKEDIN, &ContentRequest::new("pullInfo"))
        .await;

    assert_eq!(result, Err(GatewayError::NoActiveTab));
    assert!(h.tabs.sent().is_empty());
}

#[tokio::test]
async fn test_wrong_site_yields_wrong_context_without_sending() {
    let h = Harness::new();
    let tab = TabContext::new("7", "https://example.com");

    let result = h
        .gateway
        .invoke_content_action(Some(&tab), LINKEDIN, &ContentRequest::new("pullInfo"))
        .await;

    assert_eq!(result, Err(GatewayError::WrongContext));
    assert!(h.tabs.sent().is_empty());
}

#[tokio::test]
async fn test_tab_without_url_is_wrong_context() {
    let h = Harness::new();
    let tab = TabContext {
        id: "7".to_string(),
        url: None,
        title: None,
    };

    let result = h
        .gateway
        .invoke_content_action(Some(&tab), SiteRule::AnyPage, &ContentRequest::new("saveLink"))
        .await;

    assert_eq!(result, Err(GatewayError::WrongContext));
}

#[tokio::test]
async fn test_success_returns_response() {
    let h = Harness::new();
    h.tabs
        .reply(Ok(ContentResponse::success(Some("Jane Doe".to_string()))));
    let tab = TabContext::new("7", PROFILE_URL);

    let response = h
        .gateway
        .invoke_content_action(Some(&tab), LINKEDIN, &ContentRequest::new("pullInfo"))
        .await
        .unwrap();

    assert_eq!(response.data.as_deref(), Some("Jane Doe"));
    assert_eq!(h.tabs.sent(), vec![ContentRequest::new("pullInfo")]);
}

#[tokio::test]
async fn test_remote_error_status_is_remote_failure() {
    let h = Harness::new();
    let tab = TabContext::new("7", PROFILE_URL);

    h.tabs.reply(Ok(ContentResponse::error("Profile section not found")));
    let result = h
        .gateway
        .invoke_content_action(Some(&tab), LINKEDIN, &ContentRequest::new("pullInfo"))
        .await;
    assert_eq!(
        result,
        Err(GatewayError::RemoteFailure("Profile section not found".to_string()))
    );

    h.tabs.reply(Ok(ContentResponse {
        status: "pending".to_string(),
        message: None,
        data: None,
    }));
    let result = h
        .gateway
        .invoke_content_action(Some(&tab), LINKEDIN, &ContentRequest::new("pullInfo"))
        .await;
    assert_eq!(result, Err(GatewayError::RemoteFailure("Unknown error".to_string())));
}

#[tokio::test]
async fn test_channel_rejection_is_transport_error() {
    let h = Harness::new();
    let tab = TabContext::new("7", PROFILE_URL);
    h.tabs.reply(Err(HostError::new(
        "Could not establish connection. Receiving end does not exist.",
    )));

    let result = h
        .gateway
        .invoke_content_action(Some(&tab), LINKEDIN, &ContentRequest::new("pullInfo"))
        .await;

    assert_eq!(
        result,
        Err(GatewayError::TransportError(
            "Could not establish connection. Receiving end does not exist.".to_string()
        ))
    );
}

#[tokio::test]
async fn test_webhook_without_url_is_missing_config_and_never_posts() {
    let h = Harness::new();

    let result = h.gateway.invoke_webhook(None, &json!({"profileData": "x"})).await;
    assert_eq!(result, Err(GatewayError::MissingConfig));

    let result = h.gateway.invoke_webhook(Some("   "), &json!({"profileData": "x"})).await;
    assert_eq!(result, Err(GatewayError::MissingConfig));

    let result = h.gateway.send_to_webhook("profileData", "Jane Doe").await;
    assert_eq!(result, Err(GatewayError::MissingConfig));
    assert_eq!(
        result.unwrap_err().to_string(),
        "Please set the webhook URL in extension options"
    );

    assert!(h.webhook.posts().is_empty());
}

#[tokio::test]
async fn test_send_to_webhook_posts_field_body() {
    let h = Harness::new();
    h.set_webhook("https://hooks.example.com/crm").await;

    h.gateway.send_to_webhook("profileData", "Jane Doe").await.unwrap();

    assert_eq!(
        h.webhook.posts(),
        vec![(
            "https://hooks.example.com/crm".to_string(),
            json!({"profileData": "Jane Doe"})
        )]
    );
}

#[tokio::test]
async fn test_send_to_webhook_refuses_empty_text_before_reading_config() {
    let h = Harness::new();

    let result = h.gateway.send_to_webhook("profileData", "").await;

    assert_eq!(result, Err(GatewayError::EmptyData));
    assert!(h.webhook.posts().is_empty());
}

#[tokio::test]
async fn test_webhook_non_2xx_and_offline_are_network_errors() {
    let h = Harness::new();
    h.set_webhook("https://hooks.example.com/crm").await;

    h.webhook.respond_with(500);
    let result = h.gateway.send_to_webhook("profileData", "Jane").await;
    assert_eq!(
        result,
        Err(GatewayError::NetworkError("Network response was not ok".to_string()))
    );

    h.webhook.respond_with(204);
    assert!(h.gateway.send_to_webhook("profileData", "Jane").await.is_ok());

    h.webhook.go_offline();
    let result = h.gateway.send_to_webhook("profileData", "Jane").await;
    assert_eq!(
        result,
        Err(GatewayError::NetworkError("error sending request".to_string()))
    );
}

#[tokio::test]
async fn test_copy_empty_text_never_touches_clipboard() {
    let h = Harness::new();

    assert_eq!(h.gateway.copy_to_clipboard("").await, Err(GatewayError::EmptyData));
    assert!(h.clipboard.writes().is_empty());
}

#[tokio::test]
async fn test_copy_and_denied_clipboard() {
    let h = Harness::new();

    h.gateway.copy_to_clipboard("Jane Doe").await.unwrap();
    assert_eq!(h.clipboard.writes(), vec!["Jane Doe".to_string()]);

    h.clipboard.deny();
    assert_eq!(
        h.gateway.copy_to_clipboard("Jane Doe").await,
        Err(GatewayError::ClipboardError("Document is not focused.".to_string()))
    );
}

#[tokio::test]
async fn test_open_derived_url() {
    let h = Harness::new();
    let tab = TabContext::new("7", PROFILE_URL);

    let opened = h
        .gateway
        .open_derived_url(Some(&tab), LINKEDIN, "recent-activity/all/")
        .await
        .unwrap();

    assert_eq!(opened, "https://www.linkedin.com/in/jane-doe/recent-activity/all/");
    assert_eq!(h.tabs.created(), vec![opened]);
}

#[tokio::test]
async fn test_open_derived_url_requires_matching_site() {
    let h = Harness::new();
    let tab = TabContext::new("7", "https://example.com/?q=1");

    let result = h
        .gateway
        .open_derived_url(Some(&tab), LINKEDIN, "recent-activity/all/")
        .await;
    assert_eq!(result, Err(GatewayError::WrongContext));

    let result = h.gateway.open_derived_url(None, LINKEDIN, "recent-activity/all/").await;
    assert_eq!(result, Err(GatewayError::WrongContext));

    assert!(h.tabs.created().is_empty());
}
