use newsly_core::{ApiError, ConfigError, CoreError, ErrorExt, ErrorReporter, LoadOutcome};

#[test]
fn test_error_codes() {
    let api_error = CoreError::Api(ApiError::InvalidCredentials);
    assert_eq!(api_error.error_code(), "API");

    let config_error = CoreError::Config(ConfigError::MissingField {
        field: "timezone".to_string(),
    });
    assert_eq!(config_error.error_code(), "CONFIG");

    assert_eq!(CoreError::Aborted.error_code(), "ABORTED");

    let input_error = CoreError::InvalidInput {
        message: "Passwords do not match!".to_string(),
    };
    assert_eq!(input_error.error_code(), "INVALID_INPUT");

    assert_eq!(
        ApiError::Backend {
            message: "x".to_string()
        }
        .error_code(),
        "API_BACKEND"
    );
}

#[test]
fn test_user_friendly_messages() {
    let login = CoreError::Api(ApiError::InvalidCredentials);
    assert_eq!(
        login.user_friendly_message(),
        "Invalid email or password. Please try again."
    );

    let signup = CoreError::Api(ApiError::SignupFailed {
        reason: "Email already registered".to_string(),
    });
    assert_eq!(signup.user_friendly_message(), "Signup failed!");

    let backend = CoreError::Api(ApiError::Backend {
        message: "Could not extract text from PDF".to_string(),
    });
    assert_eq!(
        backend.user_friendly_message(),
        "Could not extract text from PDF"
    );

    let config_error = CoreError::Config(ConfigError::MissingField {
        field: "timezone".to_string(),
    });
    assert!(config_error.user_friendly_message().contains("timezone"));
}

#[test]
fn test_invalid_input_message_is_shown_verbatim() {
    let error = CoreError::InvalidInput {
        message: "Passwords do not match!".to_string(),
    };
    assert_eq!(error.user_friendly_message(), "Passwords do not match!");
}

#[test]
fn test_error_reporter() {
    let reporter = ErrorReporter::new();
    let error = CoreError::Api(ApiError::Http {
        status: 502,
        message: "Bad gateway".to_string(),
    });
    assert_eq!(reporter.report_error(&error), "Bad gateway");

    let rejected = CoreError::InvalidInput {
        message: "Please fill in all fields.".to_string(),
    };
    assert_eq!(reporter.report_error(&rejected), "Please fill in all fields.");
}

#[test]
fn test_error_conversion() {
    let json_error = serde_json::from_str::<serde_json::Value>("{").unwrap_err();
    let core_error: CoreError = json_error.into();
    assert_eq!(core_error.error_code(), "SERIALIZATION");

    let io_error = std::io::Error::new(std::io::ErrorKind::Other, "disk");
    let core_error: CoreError = io_error.into();
    assert_eq!(core_error.error_code(), "IO");
}

#[test]
fn test_aborted_fetch_is_not_a_failure() {
    assert_eq!(
        LoadOutcome::from_result(Err(CoreError::Aborted)),
        LoadOutcome::Aborted
    );
    assert!(matches!(
        LoadOutcome::from_result(Err(CoreError::Internal {
            message: "boom".to_string()
        })),
        LoadOutcome::Failed(_)
    ));
}
