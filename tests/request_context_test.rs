use std::net::{IpAddr, Ipv4Addr};

use progress_backend::types::internal::caller::Caller;
use progress_backend::types::internal::context::{RequestContext, RequestSource};
use progress_backend::types::internal::role::{Role, RoleSet};

#[test]
fn test_request_context_new_defaults_to_api_source() {
    let ctx = RequestContext::new();

    assert_eq!(ctx.source, RequestSource::API);
    assert_eq!(ctx.actor_id(), "anonymous");
    assert!(!ctx.is_authenticated());
    assert!(ctx.caller.is_none());
}

#[test]
fn test_request_context_for_system() {
    let ctx = RequestContext::for_system("startup");

    assert_eq!(ctx.source, RequestSource::System);
    assert_eq!(ctx.actor_id(), "system");
    assert!(ctx.ip_address.is_none());
    assert!(!ctx.is_authenticated());
}

#[test]
fn test_request_context_with_caller_and_ip_address() {
    let ip = IpAddr::V4(Ipv4Addr::new(192, 168, 1, 1));
    let ctx = RequestContext::new().with_ip_address(ip).with_caller(Caller {
        user_id: "user-1".to_string(),
        email: "ana@example.com".to_string(),
        roles: RoleSet::from([Role::Manager]),
    });

    assert_eq!(ctx.ip_address, Some(ip));
    assert!(ctx.is_authenticated());
    assert_eq!(ctx.actor_id(), "user-1");
    assert_eq!(ctx.source, RequestSource::API);
}

#[test]
fn test_request_ids_are_unique() {
    let first = RequestContext::new();
    let second = RequestContext::new();

    assert_ne!(first.request_id, second.request_id);
}
