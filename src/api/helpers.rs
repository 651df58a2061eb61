use std::net::IpAddr;

use poem::Request;

use crate::app_data::AppData;
use crate::errors::InternalError;
use crate::errors::internal::AuthorizationError;
use crate::types::internal::context::RequestContext;

use super::auth::BearerAuth;

/// Client IP from proxy headers, falling back to the socket address
pub fn extract_ip_address(req: &Request) -> Option<IpAddr> {
    // Check X-Forwarded-For header (proxy/load balancer)
    if let Some(forwarded) = req.header("X-Forwarded-For") {
        if let Some(ip) = forwarded.split(',').next() {
            if let Ok(ip) = ip.trim().parse() {
                return Some(ip);
            }
        }
    }

    // Check X-Real-IP header (nginx)
    if let Some(real_ip) = req.header("X-Real-IP") {
        if let Ok(ip) = real_ip.trim().parse() {
            return Some(ip);
        }
    }

    req.remote_addr().as_socket_addr().map(|addr| addr.ip())
}

/// Context for a public endpoint: no caller
pub fn anonymous_context(req: &Request) -> RequestContext {
    let ctx = RequestContext::new();
    match extract_ip_address(req) {
        Some(ip) => ctx.with_ip_address(ip),
        None => ctx,
    }
}

/// Context for a bearer-protected endpoint
///
/// A token that fails validation, or whose subject no longer resolves,
/// leaves the caller empty so the coordinator answers `Unauthenticated`.
pub async fn authenticated_context(
    app_data: &AppData,
    req: &Request,
    auth: &BearerAuth,
) -> Result<RequestContext, InternalError> {
    let ctx = anonymous_context(req);

    match app_data
        .providers
        .authentication_provider
        .resolve_caller(&app_data.db, &auth.0.token)
        .await
    {
        Ok(caller) => Ok(ctx.with_caller(caller)),
        Err(InternalError::Authorization(AuthorizationError::Unauthenticated)) => Ok(ctx),
        Err(e) => Err(e),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_forwarded_for_takes_first_hop() {
        let req = Request::builder()
            .header("X-Forwarded-For", "203.0.113.7, 10.0.0.1")
            .finish();
        assert_eq!(extract_ip_address(&req), "203.0.113.7".parse().ok());
    }

    #[test]
    fn test_real_ip_header() {
        let req = Request::builder().header("X-Real-IP", "198.51.100.2").finish();
        assert_eq!(extract_ip_address(&req), "198.51.100.2".parse().ok());
    }

    #[test]
    fn test_unparsable_forwarded_for_falls_through() {
        let req = Request::builder()
            .header("X-Forwarded-For", "unknown")
            .header("X-Real-IP", "198.51.100.2")
            .finish();
        assert_eq!(extract_ip_address(&req), "198.51.100.2".parse().ok());
    }

    #[test]
    fn test_anonymous_context_has_no_caller() {
        let req = Request::builder().finish();
        let ctx = anonymous_context(&req);
        assert!(ctx.caller.is_none());
    }
}
