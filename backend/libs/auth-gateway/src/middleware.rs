use crate::error::AuthError;
use crate::metrics::GatewayMetrics;
use crate::policy::{AccessLevel, RoutePolicy};
use crate::role::{extract_role, Role};
use crate::verifier::TokenVerifier;
use actix_web::{
    body::EitherBody,
    dev::{forward_ready, Service, ServiceRequest, ServiceResponse, Transform},
    http::header::{HeaderValue, AUTHORIZATION},
    Error, HttpMessage, HttpResponse,
};
use futures::future::{ready, Ready};
use std::future::Future;
use std::pin::Pin;
use std::rc::Rc;
use std::sync::Arc;
use tracing::{debug, warn};

/// Identity attached to requests that passed an authenticated route
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthContext {
    pub subject: String,
    pub role: Role,
}

/// Pull the token out of an `Authorization: Bearer <token>` header
pub fn bearer_token(header: Option<&HeaderValue>) -> Result<&str, AuthError> {
    let value = header
        .ok_or(AuthError::MissingCredential)?
        .to_str()
        .map_err(|_| AuthError::MalformedCredential)?;

    let token = value
        .strip_prefix("Bearer ")
        .ok_or(AuthError::MalformedCredential)?
        .trim();

    if token.is_empty() {
        return Err(AuthError::MalformedCredential);
    }
    Ok(token)
}

/// Authentication and authorization in front of a service's routes
#[derive(Clone)]
pub struct AuthGateway {
    policy: Arc<RoutePolicy>,
    verifier: Arc<TokenVerifier>,
    metrics: Option<GatewayMetrics>,
}

impl AuthGateway {
    pub fn new(policy: Arc<RoutePolicy>, verifier: Arc<TokenVerifier>) -> Self {
        Self {
            policy,
            verifier,
            metrics: None,
        }
    }

    pub fn with_metrics(mut self, metrics: GatewayMetrics) -> Self {
        self.metrics = Some(metrics);
        self
    }
}

impl<S, B> Transform<S, ServiceRequest> for AuthGateway
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type Transform = AuthGatewayService<S>;
    type InitError = ();
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(AuthGatewayService {
            service: Rc::new(service),
            policy: self.policy.clone(),
            verifier: self.verifier.clone(),
            metrics: self.metrics.clone(),
        }))
    }
}

pub struct AuthGatewayService<S> {
    service: Rc<S>,
    policy: Arc<RoutePolicy>,
    verifier: Arc<TokenVerifier>,
    metrics: Option<GatewayMetrics>,
}

async fn authorize(
    verifier: &TokenVerifier,
    level: AccessLevel,
    header: Option<&HeaderValue>,
) -> Result<AuthContext, AuthError> {
    let token = bearer_token(header)?;
    let identity = verifier.verify(token).await?;
    let role = extract_role(&identity.claims);

    if level == AccessLevel::AdminOnly && !role.is_admin() {
        return Err(AuthError::InsufficientRole {
            required: Role::ADMIN.to_string(),
            actual: role.to_string(),
        });
    }

    Ok(AuthContext {
        subject: identity.subject,
        role,
    })
}

impl<S, B> Service<ServiceRequest> for AuthGatewayService<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type Future = Pin<Box<dyn Future<Output = Result<Self::Response, Self::Error>>>>;

    forward_ready!(service);

    fn call(&self, req: ServiceRequest) -> Self::Future {
        let service = self.service.clone();
        let verifier = self.verifier.clone();
        let metrics = self.metrics.clone();
        let level = self.policy.classify(req.method(), req.path());

        Box::pin(async move {
            if level == AccessLevel::Public {
                if let Some(metrics) = &metrics {
                    metrics.record("public");
                }
                return service
                    .call(req)
                    .await
                    .map(ServiceResponse::map_into_left_body);
            }

            let header = req.headers().get(AUTHORIZATION).cloned();
            match authorize(&verifier, level, header.as_ref()).await {
                Ok(ctx) => {
                    debug!(
                        subject = %ctx.subject,
                        role = %ctx.role,
                        path = %req.path(),
                        "Request authorized"
                    );
                    if let Some(metrics) = &metrics {
                        metrics.record("pass");
                    }
                    req.extensions_mut().insert(ctx);
                    service
                        .call(req)
                        .await
                        .map(ServiceResponse::map_into_left_body)
                }
                Err(err) => {
                    warn!(
                        method = %req.method(),
                        path = %req.path(),
                        error = %err,
                        "Request rejected by auth gateway"
                    );
                    if let Some(metrics) = &metrics {
                        metrics.record(err.outcome());
                    }
                    let response = HttpResponse::build(err.status_code())
                        .content_type("text/plain; charset=utf-8")
                        .body(err.public_message());
                    Ok(req.into_response(response).map_into_right_body())
                }
            }
        })
    }
}

impl actix_web::FromRequest for AuthContext {
    type Error = actix_web::Error;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(
        req: &actix_web::HttpRequest,
        _payload: &mut actix_web::dev::Payload,
    ) -> Self::Future {
        match req.extensions().get::<AuthContext>() {
            Some(ctx) => ready(Ok(ctx.clone())),
            None => ready(Err(actix_web::error::ErrorUnauthorized(
                "Request not authenticated",
            ))),
        }
    }
}
