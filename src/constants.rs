pub mod header {
    pub const ACCESS_CONTROL_ALLOW_ORIGIN: &str = "Access-Control-Allow-Origin";
    pub const ACCESS_CONTROL_ALLOW_METHODS: &str = "Access-Control-Allow-Methods";
    pub const ACCESS_CONTROL_ALLOW_HEADERS: &str = "Access-Control-Allow-Headers";
    pub const ACCESS_CONTROL_EXPOSE_HEADERS: &str = "Access-Control-Expose-Headers";
    pub const ACCESS_CONTROL_REQUEST_HEADERS: &str = "Access-Control-Request-Headers";
    pub const ACCESS_CONTROL_REQUEST_METHOD: &str = "Access-Control-Request-Method";
    pub const LOCATION: &str = "Location";
    pub const ORIGIN: &str = "Origin";
}

pub mod method {
    pub const GET: &str = "GET";
    pub const OPTIONS: &str = "OPTIONS";
    pub const POST: &str = "POST";
}

pub mod cors {
    /// Origin entry that authorizes every origin.
    pub const WILDCARD: &str = "*";
    /// Methods granted on preflight when none are configured.
    pub const DEFAULT_METHODS: &[&str] = &[
        super::method::GET,
        super::method::POST,
        super::method::OPTIONS,
    ];
    /// `Access-Control-Allow-Methods` value rendered from [`DEFAULT_METHODS`].
    pub const DEFAULT_REQUEST_METHODS: &str = "GET, POST, OPTIONS";
    /// Separator used for every comma-joined CORS header value.
    pub const VALUE_SEPARATOR: &str = ", ";
    /// Always exposed so upload clients can read the creation location.
    pub const EXPOSED_HEADERS: &[&str] = &[super::header::LOCATION];
}

pub mod document {
    pub const FILE_TYPE: &str = "File";
    pub const IMPORTED_TITLE: &str = "Scenari File";
    pub const DEFAULT_MIME_TYPE: &str = "application/octet-stream";
}

pub mod route {
    /// Path of the gateway relative to the externally visible base URL.
    pub const GATEWAY_PREFIX: &str = "site/scenari";
    pub const UPLOAD: &str = "upload";
    pub const IMPORT_SCREEN: &str = "importscreen";
}
