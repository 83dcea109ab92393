mod common;

use axum::http::StatusCode;
use common::{get_with_cookie, location, spawn_app};
use std::sync::atomic::Ordering;

/// Empty storage, protected dashboard mount: redirect to the account entry
/// view and zero upstream calls.
#[tokio::test]
async fn protected_account_views_redirect_without_a_session() {
    let (app, upstream) = spawn_app().await;

    for uri in ["/dashboard", "/tournaments", "/tournaments/list"] {
        let response = get_with_cookie(&app, uri, None).await;
        assert_eq!(response.status(), StatusCode::SEE_OTHER, "uri {uri}");
        assert_eq!(location(&response), Some("/login"), "uri {uri}");
    }

    assert_eq!(upstream.hits.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn participant_views_redirect_to_code_entry() {
    let (app, upstream) = spawn_app().await;

    let response = get_with_cookie(&app, "/participant/dashboard", None).await;
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&response), Some("/verify"));

    assert_eq!(upstream.hits.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn entry_and_public_routes_stay_open() {
    let (app, _upstream) = spawn_app().await;

    for uri in ["/", "/health", "/login", "/verify"] {
        let response = get_with_cookie(&app, uri, None).await;
        assert_eq!(response.status(), StatusCode::OK, "uri {uri}");
    }
}

/// The landing page links both entry routes, one per identity kind.
#[tokio::test]
async fn landing_page_links_both_entry_routes() {
    let (app, _upstream) = spawn_app().await;

    let response = get_with_cookie(&app, "/", None).await;
    assert_eq!(response.status(), StatusCode::OK);
    let body = common::body_string(response).await;
    assert!(body.contains("href=\"/login\""));
    assert!(body.contains("href=\"/verify\""));
}

#[tokio::test]
async fn logout_closes_the_account_session() {
    let (app, _upstream) = spawn_app().await;
    let cookie = common::log_in(&app).await;

    let response = get_with_cookie(&app, "/logout", Some(&cookie)).await;
    assert_eq!(response.status(), StatusCode::OK);

    // The guard fires again on the next navigation.
    let response = get_with_cookie(&app, "/dashboard", Some(&cookie)).await;
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&response), Some("/login"));
}

/// An account session opens account views but not participant views: the
/// two kinds gate independently.
#[tokio::test]
async fn account_session_does_not_satisfy_the_participant_guard() {
    let (app, _upstream) = spawn_app().await;
    let cookie = common::log_in(&app).await;

    let response = get_with_cookie(&app, "/dashboard", Some(&cookie)).await;
    assert_eq!(response.status(), StatusCode::OK);

    let response = get_with_cookie(&app, "/participant/dashboard", Some(&cookie)).await;
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&response), Some("/verify"));
}
