use crate::common::{
    MockTransport, SANDBOX_API_URL, bearer, client_with_config, json_body, sample_order,
    test_client, test_config,
};
use pandago_client::prelude::*;
use serde_json::{Value, json};

const ORDER_BODY: &str = r#"{"order_id":"abc123","client_order_id":"ORDER-1","status":"NEW"}"#;

#[tokio::test]
async fn test_get_order_fetches_token_then_order() {
    let (client, transport) = test_client();
    transport.push_api_status(200, ORDER_BODY);

    let order = client.get_order("abc123").await.unwrap();
    assert_eq!(order.order_id.as_deref(), Some("abc123"));
    assert_eq!(order.status, OrderStatus::New);

    let requests = transport.requests();
    assert_eq!(requests.len(), 2);
    assert_eq!(requests[0].url, "https://sts-st.deliveryhero.io/oauth2/token");
    assert_eq!(requests[1].method, Method::GET);
    assert_eq!(requests[1].url, format!("{SANDBOX_API_URL}/orders/abc123"));
    assert_eq!(bearer(&requests[1]), "Bearer token-1");
    assert!(requests[1].body.is_none());
}

#[tokio::test]
async fn test_token_is_reused_across_calls() {
    let (client, transport) = test_client();
    transport.push_api_status(200, ORDER_BODY);
    transport.push_api_status(200, ORDER_BODY);

    client.get_order("abc123").await.unwrap();
    client.get_order("abc123").await.unwrap();

    assert_eq!(transport.token_requests().len(), 1);
    assert_eq!(transport.api_requests().len(), 2);
    assert!(client.token_expires_at().await.is_some());
}

#[tokio::test]
async fn test_single_403_refreshes_and_retries_once() {
    let (client, transport) = test_client();
    transport.push_api_status(403, r#"{"message":"token revoked"}"#);
    transport.push_api_status(200, ORDER_BODY);

    let order = client.get_order("abc123").await.unwrap();
    assert_eq!(order.order_id.as_deref(), Some("abc123"));

    let api = transport.api_requests();
    assert_eq!(transport.token_requests().len(), 2);
    assert_eq!(api.len(), 2);
    assert_eq!(bearer(&api[0]), "Bearer token-1");
    assert_eq!(bearer(&api[1]), "Bearer token-2");
    assert_eq!(api[0].url, api[1].url);
}

#[tokio::test]
async fn test_two_403_then_success() {
    let (client, transport) = test_client();
    transport.push_api_status(403, "");
    transport.push_api_status(403, "");
    transport.push_api_status(200, ORDER_BODY);

    client.get_order("abc123").await.unwrap();

    let api = transport.api_requests();
    assert_eq!(api.len(), 3);
    assert_eq!(transport.token_requests().len(), 3);
    assert_eq!(bearer(&api[2]), "Bearer token-3");
}

#[tokio::test]
async fn test_third_403_is_surfaced_without_further_retry() {
    let (client, transport) = test_client();
    for _ in 0..4 {
        transport.push_api_status(403, r#"{"message":"Forbidden"}"#);
    }

    let error = client.get_order("abc123").await.unwrap_err();

    assert!(error.is_forbidden());
    assert_eq!(error.to_string(), "Forbidden");
    assert_eq!(transport.api_requests().len(), 3);
    // Initial acquisition plus one forced refresh per retry
    assert_eq!(transport.token_requests().len(), 3);
}

#[tokio::test]
async fn test_retry_budget_is_per_call() {
    let (client, transport) = test_client();
    for _ in 0..3 {
        transport.push_api_status(403, "");
    }
    transport.push_api_status(403, "");
    transport.push_api_status(200, ORDER_BODY);

    assert!(client.get_order("abc123").await.is_err());
    assert!(client.get_order("abc123").await.is_ok());

    assert_eq!(transport.api_requests().len(), 5);
}

#[tokio::test]
async fn test_500_is_not_retried() {
    let (client, transport) = test_client();
    transport.push_api_status(500, r#"{"message":"upstream unavailable"}"#);

    let error = client.get_order("abc123").await.unwrap_err();

    assert_eq!(error.status(), Some(StatusCode::INTERNAL_SERVER_ERROR));
    assert_eq!(error.to_string(), "upstream unavailable");
    assert_eq!(transport.api_requests().len(), 1);
    assert_eq!(transport.token_requests().len(), 1);
}

#[tokio::test]
async fn test_error_without_message_uses_generic_fallback() {
    let (client, transport) = test_client();
    transport.push_api_status(404, "<html>not found</html>");

    let error = client.get_order("missing").await.unwrap_err();

    assert_eq!(error.to_string(), "request failed with status code 404");
}

#[tokio::test]
async fn test_network_error_carries_transport_message() {
    let (client, transport) = test_client();
    transport.push_api(Err(AppError::Transport(
        "error sending request: connection refused".to_string(),
    )));

    let error = client.get_order("abc123").await.unwrap_err();

    match error {
        AppError::Transport(message) => assert!(message.contains("connection refused")),
        other => panic!("expected transport error, got {other:?}"),
    }
    assert_eq!(transport.api_requests().len(), 1);
    assert_eq!(transport.token_requests().len(), 1);
}

#[tokio::test]
async fn test_refresh_failure_during_retry_is_surfaced() {
    let (client, transport) = test_client();
    transport.push_api_status(403, "");
    // First exchange succeeds with the default, the forced one fails
    transport.push_token(Ok(RawResponse::new(
        StatusCode::OK,
        r#"{"access_token":"first","expires_in":3600}"#,
    )));
    transport.push_token(Ok(RawResponse::new(
        StatusCode::BAD_REQUEST,
        r#"{"message":"invalid_grant"}"#,
    )));

    let error = client.get_order("abc123").await.unwrap_err();

    assert_eq!(error.to_string(), "invalid_grant");
    assert_eq!(transport.api_requests().len(), 1);
    assert!(client.token_expires_at().await.is_none());
}

#[tokio::test]
async fn test_initial_token_failure_skips_request() {
    let (client, transport) = test_client();
    transport.push_token(Err(AppError::Transport("timed out".to_string())));

    assert!(client.get_order("abc123").await.is_err());
    assert!(transport.api_requests().is_empty());
}

#[tokio::test]
async fn test_cancel_order_defaults_reason() {
    let (client, transport) = test_client();
    transport.push_api_status(204, "");

    let body = client.cancel_order("abc123", None).await.unwrap();
    assert_eq!(body, Value::Null);

    let request = &transport.api_requests()[0];
    assert_eq!(request.method, Method::DELETE);
    assert_eq!(request.url, format!("{SANDBOX_API_URL}/orders/abc123"));
    assert_eq!(json_body(request), json!({"reason": "REASON_UNKNOWN"}));
}

#[tokio::test]
async fn test_cancel_order_passes_explicit_reason() {
    let (client, transport) = test_client();
    transport.push_api_status(200, r#"{"status":"CANCELLED"}"#);

    let body = client
        .cancel_order("abc123", Some(CancelReason::DeliveryEtaTooLong))
        .await
        .unwrap();
    assert_eq!(body, json!({"status": "CANCELLED"}));

    let request = &transport.api_requests()[0];
    assert_eq!(json_body(request), json!({"reason": "DELIVERY_ETA_TOO_LONG"}));
}

#[tokio::test]
async fn test_order_endpoints_map_to_verbs_and_paths() {
    let (client, transport) = test_client();
    let order = sample_order();

    transport.push_api_status(200, r#"{"client_order_id":"ORDER-1","estimated_delivery_fee":85.0}"#);
    let fee = client.estimate_fee(&order).await.unwrap();
    assert_eq!(fee.estimated_delivery_fee, Some(85.0));

    transport.push_api_status(
        200,
        r#"{"client_order_id":"ORDER-1","estimated_pickup_time":"2026-10-19T09:18:45Z","estimated_delivery_time":"2026-10-19T09:38:45Z"}"#,
    );
    let time = client.estimate_time(&order).await.unwrap();
    assert!(time.estimated_delivery_time.is_some());

    transport.push_api_status(201, ORDER_BODY);
    let created = client.submit_order(&order).await.unwrap();
    assert_eq!(created.and_then(|o| o.order_id).as_deref(), Some("abc123"));

    transport.push_api_status(200, r#"{"latitude":25.04,"longitude":121.53}"#);
    let location = client.get_courier_location("abc123").await.unwrap();
    assert_eq!(location.longitude, Some(121.53));

    let event = CallbackEvent {
        order_id: "abc123".to_string(),
        status: "DELIVERED".to_string(),
        ..Default::default()
    };
    transport.push_api_status(200, "");
    client.callback(&event).await.unwrap();

    let seen: Vec<(Method, String)> = transport
        .api_requests()
        .into_iter()
        .map(|r| (r.method, r.url))
        .collect();
    assert_eq!(
        seen,
        vec![
            (Method::POST, format!("{SANDBOX_API_URL}/orders/fee")),
            (Method::POST, format!("{SANDBOX_API_URL}/orders/time")),
            (Method::POST, format!("{SANDBOX_API_URL}/orders")),
            (Method::GET, format!("{SANDBOX_API_URL}/orders/abc123/coordinates")),
            (Method::POST, format!("{SANDBOX_API_URL}/callback")),
        ]
    );

    let api = transport.api_requests();
    assert_eq!(json_body(&api[0]), serde_json::to_value(&order).unwrap());
    assert_eq!(json_body(&api[4])["status"], "DELIVERED");
}

#[tokio::test]
async fn test_outlet_endpoints() {
    let (client, transport) = test_client();
    let outlet = Outlet {
        name: Some("Pandan Kitchen".to_string()),
        city: Some("Taipei".to_string()),
        ..Default::default()
    };

    transport.push_api_status(200, r#"{"name":"Pandan Kitchen","city":"Taipei"}"#);
    let saved = client.upsert_outlet("outlet-1", &outlet).await.unwrap();
    assert_eq!(saved, Some(outlet.clone()));

    transport.push_api_status(200, r#"{"name":"Pandan Kitchen","city":"Taipei","halal":true}"#);
    let fetched = client.get_outlet("outlet-1").await.unwrap();
    assert_eq!(fetched.halal, Some(true));

    let api = transport.api_requests();
    assert_eq!(api[0].method, Method::PUT);
    assert_eq!(api[0].url, format!("{SANDBOX_API_URL}/outlets/outlet-1"));
    assert_eq!(json_body(&api[0]), json!({"name": "Pandan Kitchen", "city": "Taipei"}));
    assert_eq!(api[1].method, Method::GET);
    assert_eq!(api[1].url, format!("{SANDBOX_API_URL}/outlets/outlet-1"));
}

#[tokio::test]
async fn test_production_client_uses_country_code() {
    let config = test_config()
        .with_environment(Environment::Production)
        .with_country_code("sg")
        .with_version("v2");
    let (client, transport) = client_with_config(config);
    transport.push_api_status(200, ORDER_BODY);

    client.get_order("abc123").await.unwrap();

    assert_eq!(
        client.api_url(),
        "https://pandago-api-apse.deliveryhero.io/sg/api/v2"
    );
    assert_eq!(
        transport.api_requests()[0].url,
        "https://pandago-api-apse.deliveryhero.io/sg/api/v2/orders/abc123"
    );
    assert_eq!(
        transport.token_requests()[0].url,
        "https://sts.deliveryhero.io/oauth2/token"
    );
}

#[tokio::test]
async fn test_empty_ids_are_rejected_before_any_request() {
    let (client, transport) = test_client();

    assert!(matches!(
        client.get_order("  ").await,
        Err(AppError::InvalidInput(_))
    ));
    assert!(matches!(
        client.get_outlet("").await,
        Err(AppError::InvalidInput(_))
    ));
    assert!(transport.requests().is_empty());
}

#[tokio::test]
async fn test_generic_request_returns_raw_json() {
    let (client, transport) = test_client();
    transport.push_api_status(200, r#"{"anything":[1,2,3]}"#);

    let value: Value = client
        .request(Method::GET, "orders/abc123", None::<&()>)
        .await
        .unwrap();

    assert_eq!(value, json!({"anything": [1, 2, 3]}));
    assert_eq!(
        transport.api_requests()[0].url,
        format!("{SANDBOX_API_URL}/orders/abc123")
    );
}

#[test]
fn test_invalid_config_is_rejected() {
    let transport = MockTransport::new();
    let config = Config::with_credentials("", "kid", "pem");
    assert!(matches!(
        Client::with_transport(config, transport),
        Err(AppError::Config(_))
    ));
}

#[tokio::test]
async fn test_debug_logging_does_not_change_behaviour() {
    setup_logger();
    let (client, transport) = client_with_config(test_config().with_debug(true));
    transport.push_api_status(403, "");
    transport.push_api_status(200, ORDER_BODY);

    assert!(client.get_order("abc123").await.is_ok());
    assert_eq!(transport.api_requests().len(), 2);
}

#[tokio::test]
async fn test_submit_order_accepts_response_without_order_id() {
    let (client, transport) = test_client();
    transport.push_api_status(201, r#"{"client_order_id":"ORDER-1","status":"NEW"}"#);

    let created = client.submit_order(&sample_order()).await.unwrap().unwrap();

    assert!(created.order_id.is_none());
    assert_eq!(created.client_order_id.as_deref(), Some("ORDER-1"));
    assert_eq!(transport.api_requests().len(), 1);
}

#[tokio::test]
async fn test_mutating_endpoints_accept_empty_success_body() {
    let (client, transport) = test_client();
    transport.push_api_status(201, "");
    transport.push_api_status(200, "");

    let created = client.submit_order(&sample_order()).await.unwrap();
    let saved = client
        .upsert_outlet("outlet-1", &Outlet::default())
        .await
        .unwrap();

    assert!(created.is_none());
    assert!(saved.is_none());
    assert_eq!(transport.api_requests().len(), 2);
}

#[tokio::test]
async fn test_ids_are_encoded_as_single_path_segment() {
    let (client, transport) = test_client();
    transport.push_api_status(200, ORDER_BODY);
    transport.push_api_status(200, r#"{"latitude":1.0,"longitude":2.0}"#);
    transport.push_api_status(200, "{}");

    client.get_order("a/b?c#d").await.unwrap();
    client.get_courier_location("x y").await.unwrap();
    client.get_outlet("../admin").await.unwrap();

    let urls: Vec<String> = transport.api_requests().into_iter().map(|r| r.url).collect();
    assert_eq!(
        urls,
        vec![
            format!("{SANDBOX_API_URL}/orders/a%2Fb%3Fc%23d"),
            format!("{SANDBOX_API_URL}/orders/x%20y/coordinates"),
            format!("{SANDBOX_API_URL}/outlets/..%2Fadmin"),
        ]
    );
}
