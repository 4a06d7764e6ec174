use async_trait::async_trait;
use reqwest::{Response, StatusCode};

/// Data which can be extracted from a [`Response`].
#[async_trait(?Send)]
pub trait Data: Sized {
    async fn from_response(response: Response) -> Result<Self, reqwest::Error>;
}

/// String data
#[async_trait(?Send)]
impl Data for String {
    async fn from_response(response: Response) -> Result<Self, reqwest::Error> {
        response.error_for_status()?.text().await
    }
}

/// Optional data, mapping a `404` response to [`None`].
#[async_trait(?Send)]
impl<D: Data> Data for Option<D> {
    async fn from_response(response: Response) -> Result<Self, reqwest::Error> {
        if response.status() == StatusCode::NOT_FOUND {
            return Ok(None);
        }

        Ok(Some(D::from_response(response).await?))
    }
}
