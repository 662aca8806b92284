//! Per-client request ceiling in front of the notes routes.
//!
//! The counting itself is governor's keyed limiter; this module only decides
//! the key (peer IP), the quota, and what a rejection looks like.

use std::net::{IpAddr, Ipv4Addr};
use std::num::NonZeroU32;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

use actix_web::body::{EitherBody, MessageBody};
use actix_web::dev::{ServiceRequest, ServiceResponse};
use actix_web::http::header;
use actix_web::middleware::Next;
use actix_web::{web, Error, HttpResponse};
use governor::clock::{Clock, DefaultClock};
use governor::{DefaultKeyedRateLimiter, Quota, RateLimiter};
use notes_types::ErrorResponse;

use crate::config::RateLimitConfig;

pub const TOO_MANY_REQUESTS_MESSAGE: &str = "Too many requests, please try again later.";

/// Checks between sweeps of clients whose window has fully refilled
const SWEEP_EVERY: u64 = 1024;

/// Shared limiter state; one instance for the whole server, not per worker.
pub struct RateLimitPolicy {
    limiter: DefaultKeyedRateLimiter<IpAddr>,
    clock: DefaultClock,
    config: RateLimitConfig,
    checks: AtomicU64,
}

impl RateLimitPolicy {
    /// `None` when the config disables limiting
    pub fn new(config: RateLimitConfig) -> Option<Self> {
        if !config.is_enabled() {
            return None;
        }
        let max = NonZeroU32::new(config.max_requests)?;
        // max_requests cells per window, all of them available at once
        let quota = Quota::with_period(config.window / config.max_requests)?.allow_burst(max);

        Some(Self {
            limiter: RateLimiter::keyed(quota),
            clock: DefaultClock::default(),
            config,
            checks: AtomicU64::new(0),
        })
    }

    pub fn config(&self) -> &RateLimitConfig {
        &self.config
    }

    /// `Err(wait)` when `client` is over its ceiling
    pub fn check(&self, client: IpAddr) -> Result<(), Duration> {
        if self.checks.fetch_add(1, Ordering::Relaxed) % SWEEP_EVERY == SWEEP_EVERY - 1 {
            self.retain_recent();
        }

        self.limiter
            .check_key(&client)
            .map_err(|not_until| not_until.wait_time_from(self.clock.now()))
    }

    /// Forget clients that have no requests left inside their window.
    ///
    /// Runs on its own every `SWEEP_EVERY` checks, so the per-client map only
    /// holds addresses seen within roughly one window.
    pub fn retain_recent(&self) {
        let before = self.limiter.len();
        self.limiter.retain_recent();
        self.limiter.shrink_to_fit();
        log::debug!(
            "[RATE_LIMIT] Swept idle clients, tracking {} of {}",
            self.limiter.len(),
            before
        );
    }

    /// Number of client addresses the limiter currently remembers
    pub fn tracked_clients(&self) -> usize {
        self.limiter.len()
    }
}

fn client_addr(req: &ServiceRequest) -> IpAddr {
    req.peer_addr()
        .map(|addr| addr.ip())
        .unwrap_or(IpAddr::V4(Ipv4Addr::UNSPECIFIED))
}

/// `from_fn` middleware. Passes everything through when no policy is registered.
pub async fn enforce<B: MessageBody>(
    req: ServiceRequest,
    next: Next<B>,
) -> Result<ServiceResponse<EitherBody<B>>, Error> {
    let rejection = req
        .app_data::<web::Data<RateLimitPolicy>>()
        .and_then(|policy| {
            let client = client_addr(&req);
            policy.check(client).err().map(|wait| (client, wait))
        });

    if let Some((client, wait)) = rejection {
        log::warn!(
            "[RATE_LIMIT] {} rejected for {} {}, retry in {}s",
            client,
            req.method(),
            req.path(),
            wait.as_secs()
        );
        let response = HttpResponse::TooManyRequests()
            .insert_header((header::RETRY_AFTER, wait.as_secs().max(1).to_string()))
            .json(ErrorResponse::new(TOO_MANY_REQUESTS_MESSAGE));
        return Ok(req.into_response(response).map_into_right_body());
    }

    next.call(req).await.map(ServiceResponse::map_into_left_body)
}
