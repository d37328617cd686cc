mod common;

use storefront_api::{
    access::{self, Access, Area},
    dto::auth::{SignInRequest, SignUpRequest},
    error::AppError,
    models::Role,
    services::identity_service,
};

use common::memory_state;

fn sign_up_request(email: &str, role: Option<Role>) -> SignUpRequest {
    SignUpRequest {
        email: email.into(),
        password: "correct horse".into(),
        full_name: "Naledi Dlamini".into(),
        role,
    }
}

fn bearer(token: &str) -> &str {
    token.strip_prefix("Bearer ").unwrap_or(token)
}

#[tokio::test]
async fn sign_up_then_sign_in_yields_a_buyer_session() -> anyhow::Result<()> {
    let state = memory_state();
    let profile = identity_service::sign_up(&state, sign_up_request("Naledi@Example.com", None)).await?;
    assert_eq!(profile.role, Role::Buyer);
    assert_eq!(profile.email, "naledi@example.com");

    let signed_in = identity_service::sign_in(
        &state,
        SignInRequest {
            email: "naledi@example.com".into(),
            password: "correct horse".into(),
        },
    )
    .await?;
    assert!(signed_in.token.starts_with("Bearer "));

    let session = identity_service::current_session(&state, bearer(&signed_in.token))?;
    assert_eq!(session.role(), Some(Role::Buyer));
    assert_eq!(access::gate(&session, Area::Cart), Access::Allow);
    assert_eq!(access::gate(&session, Area::SellerDashboard), Access::RedirectToHome);

    let me = identity_service::current_profile(&state, &session).await?;
    assert_eq!(me.id, profile.id);
    Ok(())
}

#[tokio::test]
async fn signed_out_tokens_are_rejected() -> anyhow::Result<()> {
    let state = memory_state();
    identity_service::sign_up(&state, sign_up_request("sipho@example.com", Some(Role::Seller))).await?;
    let signed_in = identity_service::sign_in(
        &state,
        SignInRequest {
            email: "sipho@example.com".into(),
            password: "correct horse".into(),
        },
    )
    .await?;
    let token = bearer(&signed_in.token).to_string();

    let session = identity_service::current_session(&state, &token)?;
    identity_service::sign_out(&state, &session)?;

    let err = identity_service::current_session(&state, &token).unwrap_err();
    assert!(matches!(err, AppError::Unauthenticated));
    Ok(())
}

#[tokio::test]
async fn wrong_password_and_unknown_email_look_the_same() -> anyhow::Result<()> {
    let state = memory_state();
    identity_service::sign_up(&state, sign_up_request("lerato@example.com", None)).await?;

    for (email, password) in [
        ("lerato@example.com", "wrong password"),
        ("nobody@example.com", "correct horse"),
    ] {
        let err = identity_service::sign_in(
            &state,
            SignInRequest {
                email: email.into(),
                password: password.into(),
            },
        )
        .await
        .unwrap_err();
        assert!(matches!(err, AppError::ValidationFailed(msg) if msg == "Invalid email or password"));
    }
    Ok(())
}

#[tokio::test]
async fn sign_up_rejects_duplicates_admins_and_bad_fields() -> anyhow::Result<()> {
    let state = memory_state();
    identity_service::sign_up(&state, sign_up_request("thabo@example.com", None)).await?;

    let err = identity_service::sign_up(&state, sign_up_request("THABO@example.com", None))
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::ValidationFailed(msg) if msg == "Email is already taken"));

    let err = identity_service::sign_up(&state, sign_up_request("boss@example.com", Some(Role::Admin)))
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::ValidationFailed(_)));

    let mut request = sign_up_request("not-an-email", None);
    request.password = "short".into();
    let err = identity_service::sign_up(&state, request).await.unwrap_err();
    match err {
        AppError::ValidationFailed(msg) => {
            assert!(msg.contains("email"));
            assert!(msg.contains("password"));
        }
        other => panic!("expected validation failure, got {other:?}"),
    }
    Ok(())
}

#[tokio::test]
async fn garbage_tokens_are_unauthenticated() {
    let state = memory_state();
    let err = identity_service::current_session(&state, "not.a.jwt").unwrap_err();
    assert!(matches!(err, AppError::Unauthenticated));
}
