use crate::fetcher::{Fetcher, FetcherOptions};

#[derive(Debug, clap::Parser)]
#[command(next_help_heading = "Client")]
pub struct ClientArguments {
    /// Per-request HTTP timeout, in humantime duration format.
    #[arg(short, long, default_value = "125s")]
    pub timeout: humantime::Duration,

    /// Maximum number of attempts per request, including the first one.
    #[arg(short, long, default_value = "5")]
    pub attempts: usize,

    /// Delay before the first retry, doubled for every following one.
    #[arg(long, default_value = "1s")]
    pub retry_delay: humantime::Duration,
}

impl From<ClientArguments> for FetcherOptions {
    fn from(value: ClientArguments) -> Self {
        FetcherOptions::new()
            .timeout(value.timeout)
            .attempts(value.attempts)
            .min_delay(value.retry_delay)
    }
}

impl ClientArguments {
    /// Create a new [`Fetcher`] from arguments.
    pub async fn new_fetcher(self) -> Result<Fetcher, anyhow::Error> {
        Fetcher::new(self.into()).await
    }
}
