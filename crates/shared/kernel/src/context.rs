//! Per-request context.
//!
//! Resolution fans out over worker tasks that do not inherit anything from
//! the calling thread, so the tenant and request correlation id travel as an
//! explicit value: the orchestrator captures a [`RequestContext`] once and
//! clones it into every task it spawns. Cloning is an `Arc` bump.

use crate::safe_nanoid;
use std::fmt;
use std::sync::Arc;

#[derive(Debug)]
struct ContextInner {
    tenant: String,
    request_id: String,
}

/// Immutable identity of one resolution request.
#[derive(Debug, Clone)]
pub struct RequestContext {
    inner: Arc<ContextInner>,
}

impl RequestContext {
    /// Context for a named tenant; a fresh correlation id is generated.
    #[must_use]
    pub fn new(tenant: impl Into<String>) -> Self {
        Self {
            inner: Arc::new(ContextInner { tenant: tenant.into(), request_id: safe_nanoid!() }),
        }
    }

    /// Context for callers outside any tenancy (tests, tooling).
    #[must_use]
    pub fn anonymous() -> Self {
        Self::new("anonymous")
    }

    #[must_use]
    pub fn tenant(&self) -> &str {
        &self.inner.tenant
    }

    #[must_use]
    pub fn request_id(&self) -> &str {
        &self.inner.request_id
    }

    /// A tracing span carrying the context fields; worker tasks run inside it.
    #[must_use]
    pub fn span(&self, name: &'static str) -> tracing::Span {
        tracing::info_span!(
            "request",
            task = name,
            tenant = %self.inner.tenant,
            request = %self.inner.request_id,
        )
    }
}

impl fmt::Display for RequestContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.inner.tenant, self.inner.request_id)
    }
}
