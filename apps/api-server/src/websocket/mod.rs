//! Realtime channel - socket.io fan-out of new posts.
//!
//! Runs on its own listener with its own event loop, independent of the
//! HTTP worker pool. The HTTP write path publishes committed posts to the
//! in-process feed channel; this module re-emits each one as a `new_post`
//! event to every connected socket. Delivery is best effort and never
//! retried - a client that was offline backfills by requesting a fresh
//! snapshot after it reconnects.

use std::sync::Arc;

use hyper::{Method, header};
use hyper_util::rt::{TokioExecutor, TokioIo};
use hyper_util::server::conn::auto::Builder;
use hyper_util::service::TowerToHyperService;
use socketioxide::{SocketIo, extract::SocketRef};
use tokio::sync::broadcast;
use tower::ServiceBuilder;
use tower_http::cors::{AllowOrigin, CorsLayer};

use ripple_core::domain::SessionIdentity;
use ripple_core::ports::TokenService;
use ripple_core::service::FeedService;
use ripple_infra::FeedChannel;
use ripple_shared::dto::{ConnectionResponse, FeedUpdate, PostPayload};

use crate::config::AppConfig;
use crate::middleware::auth::SESSION_COOKIE;
use crate::state::AppState;

/// Shared state for the realtime handlers.
#[derive(Clone)]
pub struct WsState {
    pub feed: Arc<FeedService>,
    pub tokens: Arc<dyn TokenService>,
    pub feed_page_size: u64,
}

/// Configure the socket lifecycle handlers.
///
/// Every connected socket receives `new_post` broadcasts. Only sockets that
/// prove an authenticated session at connect time get the connection
/// acknowledgment and the `request_feed` snapshot handler.
pub fn configure_socket_handlers(io: SocketIo, state: WsState) {
    io.ns("/", move |socket: SocketRef| {
        let state = state.clone();
        async move {
            match session_identity(&socket, state.tokens.as_ref()) {
                Some(identity) => {
                    tracing::info!(
                        socket_id = %socket.id,
                        username = %identity.username,
                        "Subscriber connected"
                    );
                    socket
                        .emit("connection_response", &ConnectionResponse::connected())
                        .ok();

                    let feed = state.feed.clone();
                    let limit = state.feed_page_size;
                    socket.on("request_feed", move |socket: SocketRef| {
                        let feed = feed.clone();
                        async move {
                            match feed.feed(limit).await {
                                Ok(items) => {
                                    socket.emit("feed_update", &FeedUpdate::new(items)).ok();
                                }
                                Err(err) => {
                                    tracing::warn!(
                                        socket_id = %socket.id,
                                        error = %err,
                                        "Feed snapshot failed"
                                    );
                                }
                            }
                        }
                    });
                }
                None => {
                    tracing::debug!(socket_id = %socket.id, "Client connected without a session");
                }
            }

            socket.on_disconnect(|socket: SocketRef| async move {
                tracing::info!(socket_id = %socket.id, "Client disconnected");
            });
        }
    });
}

/// Re-emit every post published on the feed channel to all connected
/// sockets.
fn bridge_feed_channel(io: SocketIo, channel: &FeedChannel) {
    let mut posts = channel.subscribe();

    tokio::spawn(async move {
        loop {
            match posts.recv().await {
                Ok(item) => {
                    if let Some(feed_ns) = io.of("/") {
                        // Sockets mid-disconnect just miss the event.
                        feed_ns.emit("new_post", &PostPayload::from(item)).ok();
                    }
                }
                Err(broadcast::error::RecvError::Lagged(count)) => {
                    tracing::warn!(dropped = count, "Realtime bridge lagged, posts dropped");
                }
                Err(broadcast::error::RecvError::Closed) => break,
            }
        }
    });
}

/// The session identity proven by the connect handshake, if any.
fn session_identity(socket: &SocketRef, tokens: &dyn TokenService) -> Option<SessionIdentity> {
    let cookies = socket
        .req_parts()
        .headers
        .get(header::COOKIE)?
        .to_str()
        .ok()?;

    let token = cookies.split(';').map(str::trim).find_map(|pair| {
        let (name, value) = pair.split_once('=')?;
        (name == SESSION_COOKIE).then_some(value)
    })?;

    tokens.validate(token).ok()
}

/// Start the realtime listener and bridge it to the feed channel.
pub async fn spawn_realtime_server(
    config: &AppConfig,
    state: &AppState,
    tokens: Arc<dyn TokenService>,
) -> std::io::Result<()> {
    let ws_state = WsState {
        feed: state.feed.clone(),
        tokens,
        feed_page_size: state.feed_page_size,
    };

    let (svc, io) = SocketIo::new_svc();
    configure_socket_handlers(io.clone(), ws_state);
    bridge_feed_channel(io, &state.feed_channel);

    // Pages are served from a different port, so the browser's socket.io
    // client connects cross-origin with credentials.
    let cors = CorsLayer::new()
        .allow_origin(AllowOrigin::mirror_request())
        .allow_credentials(true)
        .allow_methods([Method::GET, Method::POST])
        .allow_headers([header::CONTENT_TYPE]);
    let svc = ServiceBuilder::new().layer(cors).service(svc);

    let listener =
        tokio::net::TcpListener::bind((config.host.as_str(), config.realtime_port)).await?;
    tracing::info!(
        "Realtime channel listening on {}:{}",
        config.host,
        config.realtime_port
    );

    tokio::spawn(async move {
        loop {
            let (stream, _) = match listener.accept().await {
                Ok(conn) => conn,
                Err(err) => {
                    tracing::error!(error = %err, "Realtime accept failed");
                    continue;
                }
            };

            let svc = svc.clone();
            tokio::spawn(async move {
                if let Err(err) = Builder::new(TokioExecutor::new())
                    .serve_connection_with_upgrades(
                        TokioIo::new(stream),
                        TowerToHyperService::new(svc),
                    )
                    .await
                {
                    tracing::debug!(error = %err, "Realtime connection closed with error");
                }
            });
        }
    });

    Ok(())
}
