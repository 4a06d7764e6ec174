//! Fetching remote resources

mod data;
use backon::{ExponentialBuilder, Retryable};
pub use data::*;

use reqwest::{Client, ClientBuilder, IntoUrl, Method, Response};
use std::fmt::{Debug, Display};
use std::future::Future;
use std::marker::PhantomData;
use std::time::Duration;
use url::Url;

/// Fetch data using HTTP.
///
/// This is some functionality sitting on top an HTTP client, allowing for additional options like
/// retries. A retry always repeats the full operation: sending the request and processing the
/// response.
#[derive(Clone, Debug)]
pub struct Fetcher {
    client: Client,
    backoff: ExponentialBuilder,
}

/// Error when retrieving
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Request error: {0}")]
    Request(#[from] reqwest::Error),
}

/// Options for the [`Fetcher`]
#[non_exhaustive]
#[derive(Clone, Debug)]
pub struct FetcherOptions {
    /// Per-request timeout.
    pub timeout: Duration,
    /// Maximum number of attempts, including the first one.
    pub attempts: usize,
    /// Delay before the first retry, doubled (by `factor`) for each following one.
    pub min_delay: Duration,
    /// Upper bound of the delay between two attempts.
    pub max_delay: Duration,
    pub factor: f32,
}

impl FetcherOptions {
    /// Create a new instance.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the timeout.
    pub fn timeout(mut self, timeout: impl Into<Duration>) -> Self {
        self.timeout = timeout.into();
        self
    }

    /// Set the maximum number of attempts.
    pub fn attempts(mut self, attempts: usize) -> Self {
        self.attempts = attempts;
        self
    }

    /// Set the initial backoff delay.
    pub fn min_delay(mut self, min_delay: impl Into<Duration>) -> Self {
        self.min_delay = min_delay.into();
        self
    }

    /// Set the maximum backoff delay.
    pub fn max_delay(mut self, max_delay: impl Into<Duration>) -> Self {
        self.max_delay = max_delay.into();
        self
    }

    /// Set the backoff factor.
    pub fn factor(mut self, factor: f32) -> Self {
        self.factor = factor;
        self
    }

    fn backoff(&self) -> ExponentialBuilder {
        ExponentialBuilder::default()
            .with_min_delay(self.min_delay)
            .with_max_delay(self.max_delay)
            .with_factor(self.factor)
            // backon counts retries, not attempts
            .with_max_times(self.attempts.saturating_sub(1))
    }
}

impl Default for FetcherOptions {
    fn default() -> Self {
        Self {
            timeout: Duration::from_secs(125),
            attempts: 5,
            min_delay: Duration::from_secs(1),
            max_delay: Duration::from_secs(60),
            factor: 2.0,
        }
    }
}

impl From<Client> for Fetcher {
    fn from(client: Client) -> Self {
        Self::with_client(client, FetcherOptions::default())
    }
}

impl Fetcher {
    /// Create a new downloader from options
    pub async fn new(options: FetcherOptions) -> anyhow::Result<Self> {
        let client = ClientBuilder::new().timeout(options.timeout);

        Ok(Self::with_client(client.build()?, options))
    }

    /// Create a fetcher providing an existing client.
    fn with_client(client: Client, options: FetcherOptions) -> Self {
        Self {
            client,
            backoff: options.backoff(),
        }
    }

    async fn new_request(
        &self,
        method: Method,
        url: Url,
    ) -> Result<reqwest::RequestBuilder, reqwest::Error> {
        Ok(self.client.request(method, url))
    }

    /// fetch data, using a GET request.
    pub async fn fetch<D: Data>(&self, url: impl IntoUrl) -> Result<D, Error> {
        log::debug!("Fetching: {}", url.as_str());
        self.fetch_processed(url, TypedProcessor::<D>::new()).await
    }

    /// fetch data, using a GET request, processing the response data.
    ///
    /// The processor is invoked once per attempt. If it fails, the whole request is retried
    /// according to the backoff configuration.
    pub async fn fetch_processed<D: DataProcessor>(
        &self,
        url: impl IntoUrl,
        processor: D,
    ) -> Result<D::Type, D::Error> {
        // if the URL building fails, there is no need to re-try, abort now.
        let url = url.into_url()?;

        (|| async { self.fetch_once(url.clone(), &processor).await })
            .retry(self.backoff)
            .notify(|err, delay| {
                log::info!(
                    "Failed to retrieve {url}, retrying in {}: {err}",
                    humantime::format_duration(delay)
                );
            })
            .await
    }

    async fn fetch_once<D: DataProcessor>(
        &self,
        url: Url,
        processor: &D,
    ) -> Result<D::Type, D::Error> {
        let response = self
            .new_request(Method::GET, url.clone())
            .await?
            .send()
            .await?;

        processor.process(&url, response).await
    }
}

/// Processing data returned by a request.
pub trait DataProcessor {
    type Type: Sized;
    type Error: From<reqwest::Error> + Display + Debug;

    fn process(
        &self,
        url: &Url,
        response: reqwest::Response,
    ) -> impl Future<Output = Result<Self::Type, Self::Error>>;
}

struct TypedProcessor<D: Data> {
    _marker: PhantomData<D>,
}

impl<D: Data> TypedProcessor<D> {
    pub const fn new() -> Self {
        Self {
            _marker: PhantomData::<D>,
        }
    }
}

/// Extract response payload which implements [`Data`].
impl<D: Data> DataProcessor for TypedProcessor<D> {
    type Type = D;
    type Error = Error;

    async fn process(&self, _url: &Url, response: Response) -> Result<Self::Type, Self::Error> {
        Ok(D::from_response(response).await?)
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn attempts_are_not_retries() {
        let options = FetcherOptions::new().attempts(3);
        let delays: Vec<_> = backon::BackoffBuilder::build(options.backoff()).collect();
        assert_eq!(delays.len(), 2);
    }

    #[test]
    fn single_attempt_never_retries() {
        let options = FetcherOptions::new().attempts(1);
        assert_eq!(backon::BackoffBuilder::build(options.backoff()).count(), 0);

        let options = FetcherOptions::new().attempts(0);
        assert_eq!(backon::BackoffBuilder::build(options.backoff()).count(), 0);
    }
}
