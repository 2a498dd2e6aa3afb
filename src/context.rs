/// Inbound header values the CORS composer reads.
///
/// Each slice holds every value the request carried for that header, in
/// arrival order, so that a repeated `Origin` header can be detected.
#[derive(Debug, Clone, Copy, Default)]
pub struct RequestContext<'a> {
    pub origin: &'a [&'a str],
    pub access_control_request_headers: &'a [&'a str],
}

impl<'a> RequestContext<'a> {
    pub fn new(origin: &'a [&'a str], access_control_request_headers: &'a [&'a str]) -> Self {
        Self {
            origin,
            access_control_request_headers,
        }
    }
}
