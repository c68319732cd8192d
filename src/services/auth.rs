// src/services/auth.rs

use bcrypt::{hash, verify};
use chrono::Utc;
use jsonwebtoken::{DecodingKey, EncodingKey, Header, Validation, decode, encode};
use sqlx::PgPool;

use crate::{
    common::error::AppError,
    db::{OrganizationRepository, UserRepository},
    models::auth::{AuthResponse, Claims, RegisterUserPayload, TokenPairResponse, User, UserRole},
};

// Validade dos tokens: acesso curto, refresh longo.
const ACCESS_TOKEN_DAYS: i64 = 7;
const REFRESH_TOKEN_DAYS: i64 = 30;

#[derive(Clone)]
pub struct AuthService {
    user_repo: UserRepository,
    organization_repo: OrganizationRepository,
    jwt_secret: String,
    jwt_refresh_secret: String,
    pool: PgPool,
}

impl AuthService {
    pub fn new(
        user_repo: UserRepository,
        organization_repo: OrganizationRepository,
        jwt_secret: String,
        jwt_refresh_secret: String,
        pool: PgPool,
    ) -> Self {
        Self { user_repo, organization_repo, jwt_secret, jwt_refresh_secret, pool }
    }

    pub async fn register_user(&self, payload: &RegisterUserPayload) -> Result<AuthResponse, AppError> {
        // A organização precisa existir antes de pendurar gente nela
        self.organization_repo
            .find_by_id(payload.organization_id)
            .await?
            .ok_or(AppError::OrganizationNotFound)?;

        // Hashing fora do event loop (bcrypt é caro de propósito)
        let password_clone = payload.password.clone();
        let hashed_password =
            tokio::task::spawn_blocking(move || hash(&password_clone, bcrypt::DEFAULT_COST))
                .await
                .map_err(|e| anyhow::anyhow!("Falha na task de hashing: {}", e))??;

        let mut tx = self.pool.begin().await?;

        // O repositório converte violação de unicidade em EmailAlreadyExists
        let new_user = self
            .user_repo
            .create_user(
                &mut *tx,
                payload.organization_id,
                None,
                &payload.email,
                &hashed_password,
                &payload.first_name,
                &payload.last_name,
                None,
                payload.role.unwrap_or(UserRole::Staff),
            )
            .await?;

        tx.commit().await?;

        let (access_token, refresh_token) = self.create_token_pair(&new_user)?;

        Ok(AuthResponse { user: new_user, access_token, refresh_token })
    }

    pub async fn login_user(&self, email: &str, password: &str) -> Result<AuthResponse, AppError> {
        let user = self
            .user_repo
            .find_by_email(email)
            .await?
            .filter(|u| u.is_active)
            .ok_or(AppError::InvalidCredentials)?;

        let password_clone = password.to_owned();
        let password_hash_clone = user.password_hash.clone();

        // Executa a verificação em um thread separado
        let is_password_valid =
            tokio::task::spawn_blocking(move || verify(&password_clone, &password_hash_clone))
                .await
                .map_err(|e| anyhow::anyhow!("Falha na task de verificação de senha: {}", e))??;

        if !is_password_valid {
            return Err(AppError::InvalidCredentials);
        }

        self.user_repo.update_last_login(user.id).await?;

        let (access_token, refresh_token) = self.create_token_pair(&user)?;

        Ok(AuthResponse { user, access_token, refresh_token })
    }

    // Rotaciona o par de tokens a partir de um refresh token válido.
    pub async fn refresh_tokens(&self, refresh_token: &str) -> Result<TokenPairResponse, AppError> {
        let validation = Validation::default();
        let token_data = decode::<Claims>(
            refresh_token,
            &DecodingKey::from_secret(self.jwt_refresh_secret.as_ref()),
            &validation,
        )
        .map_err(|_| AppError::InvalidToken)?;

        let user = self
            .user_repo
            .find_by_id(token_data.claims.sub)
            .await?
            .filter(|u| u.is_active)
            .ok_or(AppError::InvalidToken)?;

        let (access_token, refresh_token) = self.create_token_pair(&user)?;

        Ok(TokenPairResponse { access_token, refresh_token })
    }

    // Valida o token de acesso e devolve o usuário ainda ativo por trás
    // dele. É daqui que os handlers tiram organização e papel.
    pub async fn validate_token(&self, token: &str) -> Result<User, AppError> {
        let validation = Validation::default();
        let token_data = decode::<Claims>(
            token,
            &DecodingKey::from_secret(self.jwt_secret.as_ref()),
            &validation,
        )
        .map_err(|_| AppError::InvalidToken)?;

        self.user_repo
            .find_by_id(token_data.claims.sub)
            .await?
            .filter(|u| u.is_active)
            .ok_or(AppError::UserNotFound)
    }

    fn create_token_pair(&self, user: &User) -> Result<(String, String), AppError> {
        let access = self.create_token(user, &self.jwt_secret, ACCESS_TOKEN_DAYS)?;
        let refresh = self.create_token(user, &self.jwt_refresh_secret, REFRESH_TOKEN_DAYS)?;
        Ok((access, refresh))
    }

    fn create_token(&self, user: &User, secret: &str, days: i64) -> Result<String, AppError> {
        let now = Utc::now();
        let expires_at = now + chrono::Duration::days(days);

        let claims = Claims {
            sub: user.id,
            email: user.email.clone(),
            role: user.role,
            organization_id: user.organization_id,
            exp: expires_at.timestamp() as usize,
            iat: now.timestamp() as usize,
        };

        let token = encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(secret.as_ref()),
        )?;

        Ok(token)
    }
}
