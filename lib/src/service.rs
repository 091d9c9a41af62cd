use std::sync::Arc;

use futures::future::try_join_all;

use crate::cache::{CacheKey, ResultCache};
use crate::clock::{RelativeClock, SessionClock};
use crate::downsample::{
    downsample_normalized, normalize_resolutions, DownsampleOptions, Downsampled,
};
use crate::error::{Error, Result};
use crate::provider::{ProviderError, SeriesProvider};

/// Everything a downsampling call needs to know about the session.
#[derive(Debug, Clone, PartialEq)]
pub struct SessionContext {
    pub session_id: String,
    pub relative_times: Arc<[f64]>,
}

impl SessionContext {
    pub fn new(session_id: impl Into<String>, relative_times: impl Into<Arc<[f64]>>) -> Self {
        SessionContext {
            session_id: session_id.into(),
            relative_times: relative_times.into(),
        }
    }
}

/// Fetches full-resolution traces from a [`SeriesProvider`] and downsamples
/// them, optionally memoizing results in a [`ResultCache`].
pub struct Downsampler<P, C = SessionClock> {
    provider: P,
    clock: C,
    options: DownsampleOptions,
    cache: Option<Arc<dyn ResultCache>>,
    context: Option<Arc<SessionContext>>,
}

impl<P: SeriesProvider, C: RelativeClock> Downsampler<P, C> {
    pub fn new(provider: P, clock: C) -> Self {
        Downsampler {
            provider,
            clock,
            options: DownsampleOptions::default(),
            cache: None,
            context: None,
        }
    }

    pub fn with_options(mut self, options: DownsampleOptions) -> Self {
        self.options = options;
        self
    }

    pub fn with_cache(mut self, cache: Arc<dyn ResultCache>) -> Self {
        self.cache = Some(cache);
        self
    }

    pub fn clock(&self) -> &C {
        &self.clock
    }

    pub fn provider(&self) -> &P {
        &self.provider
    }

    /// Sets the session used by [`Downsampler::process`]. Replaces any
    /// previous session.
    pub fn init(
        &mut self,
        session_id: impl Into<String>,
        relative_times: impl Into<Arc<[f64]>>,
    ) -> Arc<SessionContext> {
        let ctx = Arc::new(SessionContext::new(session_id, relative_times));
        self.context = Some(ctx.clone());
        ctx
    }

    /// Downsamples `trace` of the session set by [`Downsampler::init`].
    pub async fn process(&self, trace: &str, resolutions: &[f64]) -> Result<Arc<Downsampled>> {
        let ctx = self.context.as_deref().ok_or(Error::NotInitialized)?;
        self.process_in(ctx, trace, resolutions).await
    }

    /// Downsamples `trace` of the session described by `ctx`.
    #[tracing::instrument(level = "debug", skip(self, ctx, resolutions), fields(session = %ctx.session_id))]
    pub async fn process_in(
        &self,
        ctx: &SessionContext,
        trace: &str,
        resolutions: &[f64],
    ) -> Result<Arc<Downsampled>> {
        if trace.is_empty() {
            return Err(Error::MissingTrace);
        }
        // Normalize before touching the provider so bad input never costs a fetch.
        let normalized = normalize_resolutions(resolutions)?;

        let key = CacheKey {
            session_id: ctx.session_id.clone(),
            trace: trace.to_string(),
            resolutions: normalized,
        };
        if let Some(hit) = self.cache.as_ref().and_then(|cache| cache.get(&key)) {
            tracing::debug!(trace, "cache hit");
            return Ok(hit);
        }

        let mut timeline = self.provider.timeline(&ctx.session_id, trace).await?;
        let series = timeline.take(trace).ok_or_else(|| ProviderError::NotFound {
            session_id: ctx.session_id.clone(),
            trace: trace.to_string(),
        })?;

        let result = Arc::new(downsample_normalized(
            &series,
            &ctx.relative_times,
            &key.resolutions,
            &self.clock,
            self.options,
        )?);

        if let Some(cache) = &self.cache {
            cache.put(key, result.clone());
        }
        Ok(result)
    }

    /// Downsamples several traces concurrently, in the order given. Fails on
    /// the first error.
    pub async fn process_traces<S: AsRef<str>>(
        &self,
        ctx: &SessionContext,
        traces: &[S],
        resolutions: &[f64],
    ) -> Result<Vec<(String, Arc<Downsampled>)>> {
        try_join_all(traces.iter().map(|trace| async move {
            let trace = trace.as_ref();
            let result = self.process_in(ctx, trace, resolutions).await?;
            Ok::<_, Error>((trace.to_string(), result))
        }))
        .await
    }
}
