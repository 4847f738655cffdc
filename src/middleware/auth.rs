use actix_web::{
    body::EitherBody,
    dev::{forward_ready, Service, ServiceRequest, ServiceResponse, Transform},
    http::header::HeaderMap,
    Error, HttpMessage, HttpResponse,
};
use futures::future::LocalBoxFuture;
use jsonwebtoken::{decode, Algorithm, DecodingKey, Validation};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::future::{ready, Ready};
use std::sync::Arc;

use crate::utils::AppError;

pub const TOKEN_HEADER: &str = "token";
pub const UNAUTHORIZED_MESSAGE: &str = "Not Authorized Login Again";

/// Payload of the storefront's login tokens: `{ id }`, optionally timestamped
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Claims {
    pub id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub iat: Option<usize>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub exp: Option<usize>,
}

/// Token from the `token` header, falling back to `Authorization: Bearer`
pub fn extract_token(headers: &HeaderMap) -> Option<String> {
    if let Some(value) = headers.get(TOKEN_HEADER).and_then(|v| v.to_str().ok()) {
        let token = value.trim();
        if !token.is_empty() {
            return Some(token.to_string());
        }
    }

    headers
        .get(actix_web::http::header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.strip_prefix("Bearer "))
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .map(str::to_string)
}

/// HS256 only; `exp` is checked when the token carries one
pub fn verify_token(token: &str, secret: &str) -> Result<Claims, AppError> {
    let mut validation = Validation::new(Algorithm::HS256);
    validation.required_spec_claims = HashSet::new();
    validation.validate_exp = true;

    let claims = decode::<Claims>(token, &DecodingKey::from_secret(secret.as_bytes()), &validation)
        .map(|data| data.claims)
        .map_err(|e| AppError::Unauthorized(format!("Invalid token: {}", e)))?;

    if claims.id.is_empty() {
        return Err(AppError::Unauthorized("Token has no user id".to_string()));
    }

    Ok(claims)
}

/// Answers 401 as a regular response so outer middleware still decorates it
fn unauthorized<B>(req: ServiceRequest, reason: &str) -> ServiceResponse<EitherBody<B>> {
    log::warn!("🔒 Rejected cart request: {}", reason);
    req.into_response(
        HttpResponse::Unauthorized()
            .json(serde_json::json!({
                "success": false,
                "message": UNAUTHORIZED_MESSAGE
            }))
            .map_into_right_body(),
    )
}

pub struct AuthMiddleware {
    secret: Arc<String>,
}

impl AuthMiddleware {
    pub fn new(secret: impl Into<String>) -> Self {
        Self {
            secret: Arc::new(secret.into()),
        }
    }
}

impl<S, B> Transform<S, ServiceRequest> for AuthMiddleware
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error>,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type InitError = ();
    type Transform = AuthMiddlewareService<S>;
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(AuthMiddlewareService {
            service,
            secret: Arc::clone(&self.secret),
        }))
    }
}

pub struct AuthMiddlewareService<S> {
    service: S,
    secret: Arc<String>,
}

impl<S, B> Service<ServiceRequest> for AuthMiddlewareService<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error>,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type Future = LocalBoxFuture<'static, Result<Self::Response, Self::Error>>;

    forward_ready!(service);

    fn call(&self, req: ServiceRequest) -> Self::Future {
        let token = match extract_token(req.headers()) {
            Some(token) => token,
            None => {
                let res = unauthorized(req, "Missing authorization token");
                return Box::pin(async move { Ok(res) });
            }
        };

        match verify_token(&token, &self.secret) {
            Ok(claims) => {
                req.extensions_mut().insert(claims);
                let fut = self.service.call(req);
                Box::pin(async move { Ok(fut.await?.map_into_left_body()) })
            }
            Err(e) => {
                let res = unauthorized(req, &e.to_string());
                Box::pin(async move { Ok(res) })
            }
        }
    }
}
