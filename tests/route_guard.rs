use furbish_storefront::{
    error::AppError,
    middleware::auth::{Access, AuthUser, HOME_ROUTE, LOGIN_ROUTE, RouteGuard, ensure_admin},
    models::Role,
};
use uuid::Uuid;

fn user(is_admin: bool) -> AuthUser {
    AuthUser {
        user_id: Uuid::new_v4(),
        email: "someone@example.com".to_string(),
        is_admin,
    }
}

#[test]
fn anonymous_visitors_are_sent_to_sign_in() {
    assert_eq!(
        RouteGuard::SIGNED_IN.evaluate(None),
        Access::Redirect(LOGIN_ROUTE.to_string())
    );
    assert_eq!(
        RouteGuard::ADMIN.evaluate(None),
        Access::Redirect(LOGIN_ROUTE.to_string())
    );
    assert_eq!(RouteGuard::PUBLIC.evaluate(None), Access::Allow);
}

#[test]
fn buyers_are_sent_home_from_admin_pages() {
    let buyer = user(false);
    assert_eq!(
        RouteGuard::ADMIN.evaluate(Some(&buyer)),
        Access::Redirect(HOME_ROUTE.to_string())
    );
    assert_eq!(RouteGuard::SIGNED_IN.evaluate(Some(&buyer)), Access::Allow);
}

#[test]
fn admins_pass_admin_pages() {
    let admin = user(true);
    assert_eq!(RouteGuard::ADMIN.evaluate(Some(&admin)), Access::Allow);
    assert_eq!(admin.role(), Role::Admin);
}

#[test]
fn signed_in_users_leave_guest_only_pages() {
    assert_eq!(
        RouteGuard::PUBLIC.evaluate(Some(&user(false))),
        Access::Redirect(HOME_ROUTE.to_string())
    );
}

#[test]
fn api_mapping_of_redirects() {
    assert!(matches!(
        RouteGuard::ADMIN.check(None),
        Err(AppError::Unauthorized)
    ));
    assert!(matches!(ensure_admin(&user(false)), Err(AppError::Forbidden)));
    assert!(ensure_admin(&user(true)).is_ok());
}

#[test]
fn access_serializes_with_target() {
    let json = serde_json::to_value(Access::Redirect("/auth".to_string())).unwrap();
    assert_eq!(json, serde_json::json!({ "outcome": "redirect", "to": "/auth" }));
    let json = serde_json::to_value(Access::Allow).unwrap();
    assert_eq!(json, serde_json::json!({ "outcome": "allow" }));
}
