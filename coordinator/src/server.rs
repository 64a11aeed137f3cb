//! HTTP request handler for the faucet.
//!
//! A thin adapter: it parses the claim request, hands the address to the
//! coordinator, and maps the outcome onto status codes and the response
//! body shape of the original faucet API.

use std::convert::Infallible;
use std::sync::Arc;

use http_body_util::{BodyExt, Full};
use hyper::body::{Bytes, Incoming};
use hyper::header::{HeaderValue, CONTENT_TYPE};
use hyper::server::conn::http1;
use hyper::service::service_fn;
use hyper::{Method, Request, Response, StatusCode};
use hyper_util::rt::TokioIo;
use serde::{Deserialize, Serialize};
use tokio::net::TcpListener;
use tracing::{debug, error, info, warn};

use spigot_common::FaucetError;

use crate::coordinator::ClaimCoordinator;

/// Claim request body.
#[derive(Debug, Deserialize)]
struct ClaimRequestBody {
    address: Option<String>,
}

/// Successful claim response.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct ClaimResponseBody {
    success: bool,
    message: &'static str,
    transaction_hash: String,
    amount: String,
}

/// Error response body.
#[derive(Debug, Serialize)]
struct ErrorBody {
    error: &'static str,
}

/// Serve the faucet API on the listener until the task is cancelled.
pub async fn run(
    listener: TcpListener,
    coordinator: Arc<ClaimCoordinator>,
) -> std::io::Result<()> {
    loop {
        let (stream, peer) = listener.accept().await?;
        let io = TokioIo::new(stream);
        let coordinator = coordinator.clone();

        tokio::spawn(async move {
            let service = service_fn(move |request| route(coordinator.clone(), request));
            if let Err(e) = http1::Builder::new().serve_connection(io, service).await {
                debug!(peer = %peer, error = %e, "Connection closed with error");
            }
        });
    }
}

async fn route(
    coordinator: Arc<ClaimCoordinator>,
    request: Request<Incoming>,
) -> Result<Response<Full<Bytes>>, Infallible> {
    let response = match (request.method(), request.uri().path()) {
        (&Method::POST, "/claim") => {
            let body = match request.into_body().collect().await {
                Ok(collected) => collected.to_bytes(),
                Err(e) => {
                    warn!(error = %e, "Failed to read request body");
                    return Ok(error_response(
                        StatusCode::BAD_REQUEST,
                        "Malformed request body",
                    ));
                }
            };
            claim(&coordinator, &body).await
        }
        (&Method::GET, "/health") => {
            json_response(StatusCode::OK, encode(&serde_json::json!({"status": "ok"})))
        }
        (&Method::GET, "/metrics") => {
            plain_response(StatusCode::OK, coordinator.metrics().to_prometheus())
        }
        _ => error_response(StatusCode::NOT_FOUND, "Not found"),
    };

    Ok(response)
}

/// Handle a `POST /claim` body that has been fully read.
async fn claim(coordinator: &ClaimCoordinator, body: &[u8]) -> Response<Full<Bytes>> {
    let address = match serde_json::from_slice::<ClaimRequestBody>(body) {
        Ok(request) => request.address.unwrap_or_default(),
        Err(e) => {
            debug!(error = %e, "Unparseable claim request");
            return error_response(
                StatusCode::BAD_REQUEST,
                "Request body must be a JSON object with an address field",
            );
        }
    };

    match coordinator.claim(&address).await {
        Ok(receipt) => json_response(
            StatusCode::OK,
            encode(&ClaimResponseBody {
                success: true,
                message: "Tokens claimed successfully",
                transaction_hash: receipt.tx_hash.to_string(),
                amount: receipt.amount.to_string(),
            }),
        ),
        Err(e) => {
            let status = status_for(&e);
            if status.is_server_error() {
                error!(error = %e, code = e.error_code(), "Claim failed");
            } else {
                info!(error = %e, code = e.error_code(), "Claim rejected");
            }
            error_response(status, e.public_message())
        }
    }
}

/// HTTP status for each failure kind: the caller's mistakes are 400,
/// everything else is 500.
fn status_for(error: &FaucetError) -> StatusCode {
    if error.is_client_error() {
        StatusCode::BAD_REQUEST
    } else {
        StatusCode::INTERNAL_SERVER_ERROR
    }
}

fn encode<T: Serialize>(body: &T) -> Vec<u8> {
    serde_json::to_vec(body).unwrap_or_default()
}

fn error_response(status: StatusCode, message: &'static str) -> Response<Full<Bytes>> {
    json_response(status, encode(&ErrorBody { error: message }))
}

fn json_response(status: StatusCode, body: Vec<u8>) -> Response<Full<Bytes>> {
    let mut response = Response::new(Full::new(Bytes::from(body)));
    *response.status_mut() = status;
    response
        .headers_mut()
        .insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
    response
}

fn plain_response(status: StatusCode, body: String) -> Response<Full<Bytes>> {
    let mut response = Response::new(Full::new(Bytes::from(body)));
    *response.status_mut() = status;
    response.headers_mut().insert(
        CONTENT_TYPE,
        HeaderValue::from_static("text/plain; charset=utf-8"),
    );
    response
}
