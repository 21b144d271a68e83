use std::net::SocketAddr;

use anyhow::Context;
use log::info;
use pocsag_core::decoder_interface::forward_filter_depths;
use pocsag_core::prelude::IntakeResult;
use pocsag_core::{IntakeConfig, IntakeHandle, PagerMessage};
use serde_json::json;
use tokio::task::JoinHandle;
use warp::http::StatusCode;
use warp::reply::{Json, WithStatus};
use warp::{Filter, Rejection, Reply};

use crate::generator::traffic::DepthControl;
use crate::gui_bridge::model::DisplayModel;

/// HTTP surface a display polls for the current window and drives resets through.
#[derive(Clone)]
pub struct GuiBridge {
    handle: IntakeHandle,
    decoder: DepthControl,
}

impl GuiBridge {
    pub fn new(handle: IntakeHandle, decoder: DepthControl) -> Self {
        Self { handle, decoder }
    }

    pub fn model(&self) -> DisplayModel {
        DisplayModel::from_snapshot(
            &self.handle.snapshot(),
            &self.handle.config(),
            self.handle.metrics(),
        )
    }

    pub fn routes(&self) -> impl Filter<Extract = (impl Reply,), Error = Rejection> + Clone {
        let bridge = self.clone();
        let with_bridge = warp::any().map(move || bridge.clone());

        let messages_route = warp::path("messages")
            .and(warp::path::end())
            .and(warp::get())
            .and(with_bridge.clone())
            .map(|bridge: GuiBridge| warp::reply::json(&bridge.model()));

        let metrics_route = warp::path("metrics")
            .and(warp::path::end())
            .and(warp::get())
            .and(with_bridge.clone())
            .map(|bridge: GuiBridge| warp::reply::json(&bridge.handle.metrics()));

        let ingest_route = warp::path("ingest")
            .and(warp::path::end())
            .and(warp::post())
            .and(warp::body::json())
            .and(with_bridge.clone())
            .map(|message: PagerMessage, bridge: GuiBridge| {
                command_reply(bridge.handle.submit(message), StatusCode::ACCEPTED)
            });

        let clear_route = warp::path("clear")
            .and(warp::path::end())
            .and(warp::post())
            .and(with_bridge.clone())
            .map(|bridge: GuiBridge| command_reply(bridge.handle.clear(), StatusCode::OK));

        let config_route = warp::path("config")
            .and(warp::path::end())
            .and(warp::post())
            .and(warp::body::json())
            .and(with_bridge)
            .map(|config: IntakeConfig, mut bridge: GuiBridge| {
                forward_filter_depths(&config.filter_depths, &mut bridge.decoder);
                command_reply(bridge.handle.update_config(config), StatusCode::OK)
            });

        messages_route
            .or(metrics_route)
            .or(ingest_route)
            .or(clear_route)
            .or(config_route)
    }

    /// Binds `addr` and serves on the current runtime.
    pub fn serve(&self, addr: SocketAddr) -> anyhow::Result<(SocketAddr, JoinHandle<()>)> {
        let (bound, server) = warp::serve(self.routes())
            .try_bind_ephemeral(addr)
            .with_context(|| format!("binding HTTP bridge on {}", addr))?;
        Ok((bound, tokio::spawn(server)))
    }

    pub fn publish_status(&self, message: &str) {
        info!("[GUI] {}", message);
    }
}

fn command_reply(result: IntakeResult<()>, success: StatusCode) -> WithStatus<Json> {
    match result {
        Ok(()) => warp::reply::with_status(warp::reply::json(&json!({"status": "ok"})), success),
        Err(err) => warp::reply::with_status(
            warp::reply::json(&json!({"status": "error", "error": err.to_string()})),
            StatusCode::SERVICE_UNAVAILABLE,
        ),
    }
}
