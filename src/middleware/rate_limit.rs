use axum::{
    extract::{ConnectInfo, Request, State},
    middleware::Next,
    response::Response,
};
use governor::{
    clock::{Clock, DefaultClock},
    DefaultKeyedRateLimiter, Quota, RateLimiter,
};
use std::{
    net::{IpAddr, Ipv4Addr, SocketAddr},
    num::NonZeroU32,
    sync::Arc,
    time::Duration,
};
use tokio::task::JoinHandle;
use tracing::{debug, warn};

use crate::error::ApiError;

/// Per-route request quota keyed by caller IP. Counters live in memory only.
#[derive(Clone)]
pub struct RouteLimiter {
    limiter: Arc<DefaultKeyedRateLimiter<IpAddr>>,
    per_minute: u32,
    enabled: bool,
}

impl RouteLimiter {
    pub fn per_minute(per_minute: u32, enabled: bool) -> Self {
        let per_minute = per_minute.max(1);
        let quota = Quota::per_minute(NonZeroU32::new(per_minute).unwrap_or(NonZeroU32::MIN));
        Self {
            limiter: Arc::new(RateLimiter::keyed(quota)),
            per_minute,
            enabled,
        }
    }

    pub fn check(&self, ip: IpAddr) -> Result<(), ApiError> {
        if !self.enabled {
            return Ok(());
        }
        self.limiter.check_key(&ip).map_err(|not_until| {
            let wait = not_until.wait_time_from(DefaultClock::default().now());
            ApiError::TooManyRequests {
                message: format!("Rate limit exceeded: {} per 1 minute", self.per_minute),
                retry_after_secs: wait.as_secs().max(1),
            }
        })
    }

    /// Drop counters for callers whose quota has fully replenished
    pub fn prune(&self) {
        self.limiter.retain_recent();
        self.limiter.shrink_to_fit();
    }

    /// Number of callers currently holding a counter
    pub fn tracked_callers(&self) -> usize {
        self.limiter.len()
    }
}

/// Prune every limiter on a fixed interval until the runtime shuts down.
pub fn spawn_pruning(limiters: Vec<RouteLimiter>, every: Duration) -> JoinHandle<()> {
    tokio::spawn(async move {
        let mut interval = tokio::time::interval(every);
        loop {
            interval.tick().await;
            for limiter in &limiters {
                limiter.prune();
            }
            debug!(
                callers = limiters.iter().map(RouteLimiter::tracked_callers).sum::<usize>(),
                "Pruned rate limiter counters"
            );
        }
    })
}

pub async fn rate_limit(
    State(limiter): State<RouteLimiter>,
    request: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let ip = client_ip(&request);
    if let Err(e) = limiter.check(ip) {
        warn!(ip = %ip, path = %request.uri().path(), "Rate limit exceeded");
        return Err(e);
    }
    Ok(next.run(request).await)
}

/// Socket peer address, else the first `X-Forwarded-For` hop, else loopback.
fn client_ip(request: &Request) -> IpAddr {
    if let Some(ConnectInfo(addr)) = request.extensions().get::<ConnectInfo<SocketAddr>>() {
        return addr.ip();
    }
    request
        .headers()
        .get("x-forwarded-for")
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.split(',').next())
        .and_then(|v| v.trim().parse().ok())
        .unwrap_or(IpAddr::V4(Ipv4Addr::LOCALHOST))
}
