use super::*;

mod headers {
    use super::*;

    #[test]
    fn should_be_empty_given_denied_decision() {
        // Arrange
        let decision = CorsDecision::denied();

        // Act
        let headers = decision.headers();

        // Assert
        assert!(headers.is_empty());
    }

    #[test]
    fn should_be_empty_given_fields_set_without_allowed_flag() {
        // Arrange
        let decision = CorsDecision {
            allowed: false,
            echoed_origin: Some("https://a.test".into()),
            allowed_methods: vec!["GET".into()],
            allowed_headers: None,
            exposed_headers: vec!["Location".into()],
        };

        // Act
        let headers = decision.headers();

        // Assert
        assert!(headers.is_empty());
    }

    #[test]
    fn should_emit_origin_and_exposed_headers_given_echo() {
        // Arrange
        let decision = CorsDecision::echo("https://a.test", &["Location"]);

        // Act
        let headers = decision.headers();

        // Assert
        assert_eq!(headers.len(), 2);
        assert_eq!(
            headers.get(header::ACCESS_CONTROL_ALLOW_ORIGIN).map(String::as_str),
            Some("https://a.test")
        );
        assert_eq!(
            headers.get(header::ACCESS_CONTROL_EXPOSE_HEADERS).map(String::as_str),
            Some("Location")
        );
    }

    #[test]
    fn should_join_methods_and_headers_given_preflight_fields() {
        // Arrange
        let mut decision = CorsDecision::echo("https://a.test", &["Location"]);
        decision.allowed_methods = vec!["PUT".into(), "DELETE".into()];
        decision.allowed_headers = Some(vec!["X-A".into(), "X-B".into()]);

        // Act
        let headers = decision.headers();

        // Assert
        assert_eq!(
            headers.get(header::ACCESS_CONTROL_ALLOW_METHODS).map(String::as_str),
            Some("PUT, DELETE")
        );
        assert_eq!(
            headers.get(header::ACCESS_CONTROL_ALLOW_HEADERS).map(String::as_str),
            Some("X-A, X-B")
        );
    }
}

mod cors_error {
    use super::*;

    #[test]
    fn should_flag_protocol_violation_given_ambiguous_origin() {
        // Arrange
        let error = CorsError::AmbiguousOrigin {
            values: vec!["https://a.test".into(), "https://b.test".into()],
        };

        // Act & Assert
        assert!(error.is_protocol_violation());
        assert_eq!(
            error.to_string(),
            r#"multiple 'Origin' header values ["https://a.test", "https://b.test"] found in the request headers"#
        );
    }

    #[test]
    fn should_not_flag_protocol_violation_given_empty_method() {
        // Arrange
        let error = CorsError::EmptyAllowedMethod { index: 2 };

        // Act & Assert
        assert!(!error.is_protocol_violation());
        assert_eq!(error.to_string(), "allow methods MUST NOT be empty (entry 2)");
    }
}
