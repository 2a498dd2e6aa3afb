use super::*;

fn header_map(pairs: &[(&'static str, &'static str)]) -> HeaderMap {
    let mut map = HeaderMap::new();
    for (name, value) in pairs {
        map.append(*name, HeaderValue::from_static(value));
    }
    map
}

mod header_values {
    use super::*;

    #[test]
    fn should_keep_arrival_order_given_repeated_header() {
        // Arrange
        let headers = header_map(&[
            ("origin", "https://a.test"),
            ("origin", "https://b.test"),
        ]);

        // Act
        let values = header_values(&headers, header::ORIGIN);

        // Assert
        assert_eq!(values, vec!["https://a.test", "https://b.test"]);
    }

    #[test]
    fn should_count_opaque_value_as_empty_given_non_visible_ascii() {
        // Arrange
        let mut headers = HeaderMap::new();
        headers.append(
            "origin",
            HeaderValue::from_bytes(b"https://caf\xe9.test").unwrap(),
        );

        // Act
        let values = header_values(&headers, header::ORIGIN);

        // Assert
        assert_eq!(values, vec![""]);
    }

    #[test]
    fn should_return_nothing_given_absent_header() {
        // Arrange
        let headers = HeaderMap::new();

        // Act
        let values = header_values(&headers, header::ORIGIN);

        // Assert
        assert!(values.is_empty());
    }
}

mod owned_request_context {
    use super::*;

    #[test]
    fn should_expose_origin_and_request_headers_given_header_map() {
        // Arrange
        let headers = header_map(&[
            ("origin", "https://app.test"),
            ("access-control-request-headers", "x-one"),
            ("access-control-request-headers", "x-two"),
        ]);

        // Act
        let owned = OwnedRequestContext::from_headers(&headers);
        let context = owned.as_request_context();

        // Assert
        assert_eq!(context.origin, &["https://app.test"]);
        assert_eq!(context.access_control_request_headers, &["x-one", "x-two"]);
    }
}

mod apply_headers {
    use super::*;

    #[test]
    fn should_copy_every_entry_given_valid_patch() {
        // Arrange
        let mut map = HeaderMap::new();
        let mut patch = Headers::new();
        patch.insert(
            header::ACCESS_CONTROL_ALLOW_ORIGIN.to_string(),
            "https://app.test".to_string(),
        );
        patch.insert(
            header::ACCESS_CONTROL_EXPOSE_HEADERS.to_string(),
            "Location".to_string(),
        );

        // Act
        apply_headers(&mut map, &patch).unwrap();

        // Assert
        assert_eq!(
            map.get(header::ACCESS_CONTROL_ALLOW_ORIGIN).unwrap(),
            "https://app.test"
        );
        assert_eq!(
            map.get(header::ACCESS_CONTROL_EXPOSE_HEADERS).unwrap(),
            "Location"
        );
    }

    #[test]
    fn should_fail_request_given_illegal_header_value() {
        // Arrange
        let mut map = HeaderMap::new();
        let mut patch = Headers::new();
        patch.insert(
            header::ACCESS_CONTROL_ALLOW_HEADERS.to_string(),
            "x-one\nx-two".to_string(),
        );

        // Act
        let result = apply_headers(&mut map, &patch);

        // Assert
        assert!(matches!(result, Err(GatewayError::Request(_))));
        assert!(map.is_empty());
    }
}
