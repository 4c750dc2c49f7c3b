//! HTTP API Client
//!
//! Request helpers shared by the pages and the default query function used
//! by the session query client.

use gloo_net::http::{Request, RequestBuilder, Response};
use resume_portal::{QueryError, QueryKey, QueryResult, UnauthorizedBehavior};
use serde::Serialize;
use serde_json::Value;
use std::future::Future;
use std::pin::Pin;
use web_sys::RequestCredentials;

/// Future returned by [`query_fn`]
pub type QueryFuture = Pin<Box<dyn Future<Output = QueryResult<Value>>>>;

/// HTTP methods used by the app
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Method {
    Get,
    Post,
}

fn builder(method: Method, url: &str) -> RequestBuilder {
    let builder = match method {
        Method::Get => Request::get(url),
        Method::Post => Request::post(url),
    };
    builder.credentials(RequestCredentials::Include)
}

/// Fail on non-2xx responses with `"{status}: {body}"`
async fn ensure_ok(response: Response) -> QueryResult<Response> {
    if response.ok() {
        return Ok(response);
    }
    let body = response.text().await.unwrap_or_default();
    Err(QueryError::from_status(
        response.status(),
        &response.status_text(),
        &body,
    ))
}

/// Send a request with an optional JSON body
pub async fn api_request<B: Serialize + ?Sized>(
    method: Method,
    base: &str,
    path: &str,
    body: Option<&B>,
) -> QueryResult<Response> {
    let url = format!("{}{}", base.trim_end_matches('/'), path);
    let builder = builder(method, &url);

    let request = match body {
        Some(body) => builder
            .json(body)
            .map_err(|e| QueryError::Parse(format!("Request build error: {}", e)))?,
        None => builder
            .build()
            .map_err(|e| QueryError::Network(format!("Request build error: {}", e)))?,
    };

    let response = request
        .send()
        .await
        .map_err(|e| QueryError::Network(e.to_string()))?;

    ensure_ok(response).await
}

/// Upload a resume file as multipart form data
pub async fn upload_resume(base: &str, file: &web_sys::File) -> QueryResult<Value> {
    let url = format!("{}/api/resume/upload", base.trim_end_matches('/'));

    let form = web_sys::FormData::new()
        .map_err(|e| QueryError::Network(format!("{:?}", e)))?;
    form.append_with_blob_and_filename("resume", file, &file.name())
        .map_err(|e| QueryError::Network(format!("{:?}", e)))?;

    let response = builder(Method::Post, &url)
        .body(form)
        .map_err(|e| QueryError::Network(format!("Request build error: {}", e)))?
        .send()
        .await
        .map_err(|e| QueryError::Network(e.to_string()))?;

    let response = ensure_ok(response).await?;
    response
        .json()
        .await
        .map_err(|e| QueryError::Parse(e.to_string()))
}

/// Default query function: GET the key's URL and decode JSON.
///
/// A 401 is handled per `on_unauthorized`.
pub fn query_fn(
    base: String,
    on_unauthorized: UnauthorizedBehavior,
) -> impl Fn(QueryKey) -> QueryFuture {
    move |key: QueryKey| {
        let base = base.clone();
        Box::pin(async move {
            let result = async {
                let response = api_request::<()>(Method::Get, &base, &key.url(), None).await?;
                if response.status() == 204 {
                    return Ok(Value::Null);
                }
                response
                    .json::<Value>()
                    .await
                    .map_err(|e| QueryError::Parse(e.to_string()))
            }
            .await;
            on_unauthorized.apply(result)
        }) as QueryFuture
    }
}
