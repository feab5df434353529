//! Tracing layer for outbound API requests.
//!
//! # Responsibilities
//! - Classify each request before it is sent
//! - Open a client span with the classification and request tags
//! - Apply the configured service-name override and analytics rate
//! - Record status code or error once the inner service completes
//!
//! # Design Decisions
//! - Request and response pass through untouched
//! - Classification is total, so tagging can never fail a request
//! - The future type is nameable (no boxing): the inner future is mapped with
//!   a plain fn pointer and instrumented with the span

use std::fmt;
use std::sync::Arc;
use std::task::{Context, Poll};

use futures_util::future::{FutureExt, Map};
use hyper::http::{header, Request, Response};
use tower::{Layer, Service};
use tracing::instrument::{Instrument, Instrumented};

use crate::classifier::Classifier;
use crate::config::TracerConfig;
use crate::endpoints::TableError;
use crate::observability::metrics;
use crate::observability::spans::{tag, SpanTags};

#[derive(Debug)]
struct TraceSettings {
    classifier: Classifier,
    service_name: Option<String>,
    analytics_rate: Option<f64>,
}

impl TraceSettings {
    fn tags_for<B>(&self, req: &Request<B>) -> SpanTags {
        let uri = req.uri();
        let host = uri
            .host()
            .or_else(|| req.headers().get(header::HOST).and_then(|v| v.to_str().ok()))
            .unwrap_or_default();
        let method = req.method().as_str();
        let path = uri.path();

        let classification = self.classifier.classify(host, method, path);
        let service_name = match &self.service_name {
            Some(name) => name.clone(),
            None => classification.service_name.into_owned(),
        };

        let url = match (uri.scheme_str(), uri.authority()) {
            (Some(scheme), Some(authority)) => format!("{scheme}://{authority}{path}"),
            _ => path.to_string(),
        };

        SpanTags {
            service_name,
            resource_name: classification.resource_name.into_owned(),
            method: method.to_string(),
            url,
            analytics_rate: self.analytics_rate,
            source: classification.source,
        }
    }
}

/// Layer that traces requests made through the wrapped service.
#[derive(Debug, Clone)]
pub struct ApiTraceLayer {
    settings: Arc<TraceSettings>,
}

impl ApiTraceLayer {
    /// Build a layer from tracer configuration.
    ///
    /// Loads the endpoint table the configuration selects.
    pub fn new(config: &TracerConfig) -> Result<Self, TableError> {
        let classifier = Classifier::from_config(config)?;
        Ok(Self::with_classifier(classifier, config))
    }

    /// Build a layer around an existing classifier.
    pub fn with_classifier(classifier: Classifier, config: &TracerConfig) -> Self {
        tracing::debug!(
            endpoint_metadata = classifier.is_enriched(),
            service_name = ?config.service_name,
            analytics_rate = ?config.analytics_rate,
            "Creating API trace layer"
        );
        metrics::describe_metrics();
        Self {
            settings: Arc::new(TraceSettings {
                classifier,
                service_name: config.service_name.clone(),
                analytics_rate: config.analytics_rate,
            }),
        }
    }

    /// The tags a request would be traced with.
    pub fn tags_for<B>(&self, req: &Request<B>) -> SpanTags {
        self.settings.tags_for(req)
    }
}

impl<S> Layer<S> for ApiTraceLayer {
    type Service = ApiTrace<S>;

    fn layer(&self, inner: S) -> Self::Service {
        ApiTrace {
            inner,
            settings: Arc::clone(&self.settings),
        }
    }
}

/// Wrap a request service so all its requests are traced.
pub fn wrap<S>(service: S, config: &TracerConfig) -> Result<ApiTrace<S>, TableError> {
    Ok(ApiTraceLayer::new(config)?.layer(service))
}

/// Service produced by [`ApiTraceLayer`].
#[derive(Debug, Clone)]
pub struct ApiTrace<S> {
    inner: S,
    settings: Arc<TraceSettings>,
}

impl<S> ApiTrace<S> {
    pub fn get_ref(&self) -> &S {
        &self.inner
    }

    pub fn into_inner(self) -> S {
        self.inner
    }
}

type Outcome<T, E> = Result<Response<T>, E>;

impl<S, B, ResBody> Service<Request<B>> for ApiTrace<S>
where
    S: Service<Request<B>, Response = Response<ResBody>>,
    S::Error: fmt::Display,
{
    type Response = Response<ResBody>;
    type Error = S::Error;
    type Future = Instrumented<Map<S::Future, fn(Outcome<ResBody, S::Error>) -> Outcome<ResBody, S::Error>>>;

    fn poll_ready(&mut self, cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        self.inner.poll_ready(cx)
    }

    fn call(&mut self, req: Request<B>) -> Self::Future {
        let tags = self.settings.tags_for(&req);
        metrics::record_request(tags.source);

        let span = tags.span();
        let future = span.in_scope(|| {
            tracing::debug!(
                service = %tags.service_name,
                resource = %tags.resource_name,
                source = tags.source.as_str(),
                "Classified outbound request"
            );
            self.inner.call(req)
        });

        let on_complete: fn(Outcome<ResBody, S::Error>) -> Outcome<ResBody, S::Error> =
            record_outcome;
        future.map(on_complete).instrument(span)
    }
}

/// Runs inside the request span; records the result fields on it.
fn record_outcome<T, E: fmt::Display>(result: Outcome<T, E>) -> Outcome<T, E> {
    let span = tracing::Span::current();
    match &result {
        Ok(response) => {
            let status = response.status();
            span.record(tag::HTTP_STATUS_CODE, status.as_u16());
            if status.is_server_error() {
                span.record(tag::ERROR, tracing::field::display(status));
            }
        }
        Err(e) => {
            span.record(tag::ERROR, tracing::field::display(e));
            tracing::debug!(error = %e, "Outbound request failed");
        }
    }
    result
}
