use argon2::{
    Argon2, PasswordHasher,
    password_hash::{PasswordHash, PasswordVerifier, SaltString},
};
use chrono::{Duration, Utc};
use dashmap::DashMap;
use jsonwebtoken::{DecodingKey, EncodingKey, Header, Validation, decode, encode};
use password_hash::rand_core::OsRng;
use std::str::FromStr;
use uuid::Uuid;
use validator::Validate;

use crate::{
    access::{self, Area},
    dto::auth::{Claims, SignInRequest, SignInResponse, SignUpRequest},
    error::{AppError, AppResult},
    models::{Profile, Role},
    session::{Session, SessionUser},
    state::AppState,
};

/// Issues and checks the bearer tokens that carry a [`Session`].
pub struct SessionTokens {
    secret: String,
    ttl: Duration,
    /// Signed-out session ids, kept until their token would have expired.
    revoked: DashMap<Uuid, i64>,
}

impl SessionTokens {
    pub fn new(secret: &str, ttl_hours: i64) -> Self {
        Self {
            secret: secret.to_owned(),
            ttl: Duration::hours(ttl_hours),
            revoked: DashMap::new(),
        }
    }

    fn issue(&self, profile: &Profile) -> AppResult<String> {
        let expiration = Utc::now()
            .checked_add_signed(self.ttl)
            .ok_or_else(|| AppError::Internal(anyhow::anyhow!("Failed to set expiration")))?;

        let claims = Claims {
            sub: profile.id.to_string(),
            role: profile.role.to_string(),
            sid: Uuid::new_v4().to_string(),
            exp: expiration.timestamp() as usize,
        };

        encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(self.secret.as_bytes()),
        )
        .map_err(|e| AppError::Internal(anyhow::anyhow!(e.to_string())))
    }

    /// Decodes a token into a session; expired, forged or revoked tokens are
    /// all `Unauthenticated`.
    pub fn session_for(&self, token: &str) -> AppResult<Session> {
        let decoded = decode::<Claims>(
            token,
            &DecodingKey::from_secret(self.secret.as_bytes()),
            &Validation::default(),
        )
        .map_err(|_| AppError::Unauthenticated)?;

        let claims = decoded.claims;
        let user_id = Uuid::parse_str(&claims.sub).map_err(|_| AppError::Unauthenticated)?;
        let session_id = Uuid::parse_str(&claims.sid).map_err(|_| AppError::Unauthenticated)?;
        let role = Role::from_str(&claims.role).map_err(|_| AppError::Unauthenticated)?;

        if self.revoked.contains_key(&session_id) {
            return Err(AppError::Unauthenticated);
        }

        Ok(Session::from_user(SessionUser {
            user_id,
            role,
            session_id,
        }))
    }

    fn revoke(&self, session_id: Uuid) {
        let now = Utc::now().timestamp();
        self.revoked.retain(|_, expires_at| *expires_at > now);
        self.revoked
            .insert(session_id, now + self.ttl.num_seconds());
    }
}

fn normalize_email(email: &str) -> String {
    email.trim().to_ascii_lowercase()
}

pub async fn sign_up(state: &AppState, payload: SignUpRequest) -> AppResult<Profile> {
    payload.validate()?;
    let SignUpRequest {
        email,
        password,
        full_name,
        role,
    } = payload;

    let role = role.unwrap_or(Role::Buyer);
    if role == Role::Admin {
        return Err(AppError::validation("admin accounts cannot be self-registered"));
    }

    let email = normalize_email(&email);
    if state.store.find_account_by_email(&email).await?.is_some() {
        return Err(AppError::validation("Email is already taken"));
    }

    create_account(state, &email, &password, full_name.trim(), role).await
}

/// Hashes the password and writes the profile row. Also used by the seed
/// binary to create admin accounts.
pub async fn create_account(
    state: &AppState,
    email: &str,
    password: &str,
    full_name: &str,
    role: Role,
) -> AppResult<Profile> {
    let salt = SaltString::generate(&mut OsRng);
    let argon2 = Argon2::default();
    let password_hash = argon2
        .hash_password(password.as_bytes(), &salt)
        .map_err(|e| AppError::Internal(anyhow::anyhow!(e.to_string())))?
        .to_string();

    let profile = Profile {
        id: Uuid::new_v4(),
        email: normalize_email(email),
        full_name: full_name.to_owned(),
        role,
        created_at: Utc::now(),
    };
    let profile = state.store.insert_account(profile, password_hash).await?;

    tracing::info!(user_id = %profile.id, role = %profile.role, "account created");
    Ok(profile)
}

pub async fn sign_in(state: &AppState, payload: SignInRequest) -> AppResult<SignInResponse> {
    let email = normalize_email(&payload.email);
    let account = match state.store.find_account_by_email(&email).await? {
        Some(a) => a,
        None => return Err(AppError::validation("Invalid email or password")),
    };

    let parsed_hash = PasswordHash::new(&account.password_hash)
        .map_err(|_| AppError::Internal(anyhow::anyhow!("Invalid password hash")))?;

    let argon2 = Argon2::default();
    if argon2
        .verify_password(payload.password.as_bytes(), &parsed_hash)
        .is_err()
    {
        return Err(AppError::validation("Invalid email or password"));
    }

    let token = state.tokens.issue(&account.profile)?;
    tracing::info!(user_id = %account.profile.id, "signed in");

    Ok(SignInResponse {
        token: format!("Bearer {}", token),
        profile: account.profile,
    })
}

/// Revokes the caller's session id and returns the signed-out user.
pub fn sign_out(state: &AppState, session: &Session) -> AppResult<Uuid> {
    let user = session.require_user()?;
    state.tokens.revoke(user.session_id);
    tracing::info!(user_id = %user.user_id, "signed out");
    Ok(user.user_id)
}

pub fn current_session(state: &AppState, token: &str) -> AppResult<Session> {
    state.tokens.session_for(token)
}

pub async fn current_profile(state: &AppState, session: &Session) -> AppResult<Profile> {
    let user = access::require(session, Area::Account)?;
    state
        .store
        .find_profile(user.user_id)
        .await?
        .ok_or(AppError::NotFound)
}
