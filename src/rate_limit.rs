//! Per-client fixed-window rate limiting.
//!
//! Each client (keyed by peer IP) may make `max_requests` requests per window. The first
//! request after a window closes starts a new one. `RateLimitMiddleware` applies the limiter to
//! every request and answers `429 Too Many Requests` once a client is over budget.

use actix_web::{
    dev::{forward_ready, Service, ServiceRequest, ServiceResponse, Transform},
    Error,
};
use futures::future::{ready, LocalBoxFuture, Ready};
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};

use crate::config::RateLimitSettings;
use crate::error::AppError;

/// Number of tracked clients above which expired windows are swept, at most once per window.
const PRUNE_THRESHOLD: usize = 10_000;

#[derive(Debug, Clone, Copy)]
struct Window {
    started: Instant,
    count: u32,
}

#[derive(Debug)]
struct Clients {
    windows: HashMap<String, Window>,
    last_pruned: Instant,
}

/// Fixed-window request counter shared by all workers.
#[derive(Debug, Clone)]
pub struct RateLimiter {
    clients: Arc<Mutex<Clients>>,
    max_requests: u32,
    window: Duration,
}

impl RateLimiter {
    pub fn new(max_requests: u32, window: Duration) -> Self {
        Self {
            clients: Arc::new(Mutex::new(Clients {
                windows: HashMap::new(),
                last_pruned: Instant::now(),
            })),
            max_requests,
            window,
        }
    }

    pub fn from_settings(settings: &RateLimitSettings) -> Self {
        Self::new(settings.max_requests, settings.window)
    }

    /// Records one request from `client` and fails once it is over budget for the current
    /// window.
    pub fn check(&self, client: &str) -> Result<(), AppError> {
        self.check_at(client, Instant::now())
    }

    fn check_at(&self, client: &str, now: Instant) -> Result<(), AppError> {
        let mut clients = self
            .clients
            .lock()
            .map_err(|_| AppError::InternalServerError("Rate limiter state poisoned".into()))?;

        let window = self.window;
        if clients.windows.len() > PRUNE_THRESHOLD
            && now.saturating_duration_since(clients.last_pruned) >= window
        {
            clients
                .windows
                .retain(|_, w| now.saturating_duration_since(w.started) < window);
            clients.last_pruned = now;
        }

        let entry = clients.windows.entry(client.to_string()).or_insert(Window {
            started: now,
            count: 0,
        });
        if now.saturating_duration_since(entry.started) >= window {
            *entry = Window {
                started: now,
                count: 0,
            };
        }

        if entry.count >= self.max_requests {
            return Err(AppError::TooManyRequests(
                "Too many requests, please try again later.".into(),
            ));
        }
        entry.count += 1;
        Ok(())
    }

    /// Number of clients with a live or not-yet-pruned window.
    pub fn tracked_clients(&self) -> usize {
        self.clients.lock().map(|c| c.windows.len()).unwrap_or(0)
    }
}

/// Applies a `RateLimiter` to every request. With no limiter configured it is a no-op.
pub struct RateLimitMiddleware {
    limiter: Option<RateLimiter>,
}

impl RateLimitMiddleware {
    pub fn new(limiter: Option<RateLimiter>) -> Self {
        Self { limiter }
    }
}

impl<S, B> Transform<S, ServiceRequest> for RateLimitMiddleware
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<B>;
    type Error = Error;
    type Transform = RateLimitMiddlewareService<S>;
    type InitError = ();
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(RateLimitMiddlewareService {
            service,
            limiter: self.limiter.clone(),
        }))
    }
}

pub struct RateLimitMiddlewareService<S> {
    service: S,
    limiter: Option<RateLimiter>,
}

impl<S, B> Service<ServiceRequest> for RateLimitMiddlewareService<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<B>;
    type Error = Error;
    type Future = LocalBoxFuture<'static, Result<Self::Response, Self::Error>>;

    forward_ready!(service);

    fn call(&self, req: ServiceRequest) -> Self::Future {
        let Some(limiter) = &self.limiter else {
            return Box::pin(self.service.call(req));
        };

        let client = req
            .peer_addr()
            .map(|addr| addr.ip().to_string())
            .unwrap_or_else(|| "unknown".to_string());

        match limiter.check(&client) {
            Ok(()) => Box::pin(self.service.call(req)),
            Err(app_err) => {
                log::warn!("Rate limit exceeded for {}", client);
                Box::pin(async move { Err(app_err.into()) })
            }
        }
    }
}
