use crate::{ApiError, ApiResponseOrError, Credentials, ErrorBody, ErrorKind, AUDIT_LOG_REASON};
use reqwest::{
    header::{HeaderValue, AUTHORIZATION},
    Client, Method, Response,
};
use serde::{de::DeserializeOwned, Serialize};

#[derive(Clone)]
pub struct DiscordClient {
    credentials: Credentials,
    client: Client,
}

impl std::fmt::Debug for DiscordClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "DiscordClient({})", self.credentials.base_url())
    }
}

impl DiscordClient {
    pub fn from_env() -> ApiResponseOrError<Self> {
        Self::new(Credentials::from_env()?)
    }

    pub fn new(credentials: Credentials) -> ApiResponseOrError<Self> {
        let client = Client::builder()
            .default_headers(
                [(
                    AUTHORIZATION,
                    HeaderValue::from_str(&format!("Bot {}", credentials.token()))?,
                )]
                .into_iter()
                .collect(),
            )
            .build()?;

        Ok(Self {
            credentials,
            client,
        })
    }

    pub fn credentials(&self) -> &Credentials {
        &self.credentials
    }

    async fn request_inner<S, R>(
        &self,
        method: Method,
        route: R,
        query: &[(&str, String)],
        body: Option<S>,
        reason: Option<&str>,
    ) -> Result<Response, ApiError>
    where
        R: Into<String>,
        S: Serialize,
    {
        let url = format!("{}{}", self.credentials.base_url(), route.into());
        log::debug!("Discord Request[{}] {} {:?}", method, url, query);

        let mut request = self.client.request(method.clone(), url.clone());

        if !query.is_empty() {
            request = request.query(query);
        }
        if let Some(body) = body {
            request = request.json(&body);
        }
        if let Some(reason) = reason {
            let encoded = urlencoding::encode(reason);
            request = request.header(AUDIT_LOG_REASON, HeaderValue::from_str(&encoded)?);
        }

        let response = request.send().await?;

        log::debug!(
            "Discord Response[{}] {} {url}",
            method,
            response.status().as_str()
        );
        Ok(response)
    }

    pub async fn request<S, R, T>(
        &self,
        method: Method,
        route: R,
        query: &[(&str, String)],
        body: Option<S>,
        reason: Option<&str>,
    ) -> ApiResponseOrError<T>
    where
        R: Into<String>,
        S: Serialize,
        T: DeserializeOwned,
    {
        let response = self
            .request_inner(method, route, query, body, reason)
            .await?;
        let status = response.status();
        if status.is_success() {
            let text = response.text().await?;
            return Ok(serde_json::from_str::<T>(&text)?);
        }

        let text = response.text().await?;
        let mut error = match serde_json::from_str::<ErrorBody>(&text) {
            Ok(body) => {
                let mut error = ApiError::new(body.message, ErrorKind::Api);
                error.code = body.code;
                error
            }
            Err(_) => ApiError::new(text, ErrorKind::Api),
        };
        error.status = Some(status.as_u16());
        Err(error)
    }

    pub async fn get<R, T>(&self, route: R, query: &[(&str, String)]) -> ApiResponseOrError<T>
    where
        R: Into<String>,
        T: DeserializeOwned,
    {
        self.request::<(), R, T>(Method::GET, route, query, None, None)
            .await
    }

    pub async fn post<S, R, T>(
        &self,
        route: R,
        body: S,
        reason: Option<&str>,
    ) -> ApiResponseOrError<T>
    where
        R: Into<String>,
        S: Serialize,
        T: DeserializeOwned,
    {
        self.request(Method::POST, route, &[], Some(body), reason)
            .await
    }
}
