use pandago_client::error::AppError;
use reqwest::StatusCode;

#[test]
fn test_app_error_display_http_uses_message() {
    let error = AppError::Http {
        status: StatusCode::NOT_FOUND,
        message: "order not found".to_string(),
    };
    assert_eq!(error.to_string(), "order not found");
}

#[test]
fn test_app_error_display_transport() {
    let error = AppError::Transport("connection refused".to_string());
    assert_eq!(error.to_string(), "transport error: connection refused");
}

#[test]
fn test_app_error_display_invalid_input() {
    let error = AppError::InvalidInput("order_id must not be empty".to_string());
    assert_eq!(error.to_string(), "invalid input: order_id must not be empty");
}

#[test]
fn test_app_error_display_config() {
    let error = AppError::Config("client_id is required".to_string());
    assert_eq!(error.to_string(), "configuration error: client_id is required");
}

#[test]
fn test_app_error_status() {
    let forbidden = AppError::Http {
        status: StatusCode::FORBIDDEN,
        message: "forbidden".to_string(),
    };
    assert_eq!(forbidden.status(), Some(StatusCode::FORBIDDEN));
    assert!(forbidden.is_forbidden());

    let server_error = AppError::Http {
        status: StatusCode::INTERNAL_SERVER_ERROR,
        message: "boom".to_string(),
    };
    assert!(!server_error.is_forbidden());

    let transport = AppError::Transport("timeout".to_string());
    assert_eq!(transport.status(), None);
    assert!(!transport.is_forbidden());
}

#[test]
fn test_app_error_from_serde() {
    let json = r#"{"invalid": json}"#;
    let serde_error = serde_json::from_str::<serde_json::Value>(json).unwrap_err();
    let app_error: AppError = serde_error.into();

    match app_error {
        AppError::Json(_) => (),
        _ => panic!("Expected Json error"),
    }
}

#[test]
fn test_app_error_from_io() {
    let io_error = std::io::Error::other("test");
    let app_error: AppError = io_error.into();

    match app_error {
        AppError::Io(_) => (),
        _ => panic!("Expected Io error"),
    }
}

#[test]
fn test_app_error_from_signing() {
    let signing_error = match jsonwebtoken::EncodingKey::from_rsa_pem(b"not a pem") {
        Ok(_) => panic!("garbage must not parse as an RSA key"),
        Err(e) => e,
    };
    let app_error: AppError = signing_error.into();
    assert!(matches!(app_error, AppError::Signing(_)));
    assert!(app_error.to_string().starts_with("signing error"));
}
