use crate::bridge::model::{ControlRequest, ControlResponse};
use anyhow::Context;
use log::warn;
use std::net::SocketAddr;
use sweepcore::processing::EngineCommand;
use sweepcore::telemetry::SnapshotReceiver;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use warp::{http::StatusCode, Filter};

#[derive(Debug)]
struct EngineUnavailable;

impl warp::reject::Reject for EngineUnavailable {}

/// HTTP endpoint that exposes the latest snapshot to display clients and
/// relays their view toggles to the engine.
pub struct DisplayBridge {
    addr: SocketAddr,
    server: JoinHandle<()>,
}

impl DisplayBridge {
    pub fn spawn(
        addr: SocketAddr,
        snapshots: SnapshotReceiver,
        commands: mpsc::Sender<EngineCommand>,
    ) -> anyhow::Result<Self> {
        let (addr, server) = warp::serve(routes(snapshots, commands))
            .try_bind_ephemeral(addr)
            .with_context(|| format!("binding display bridge on {}", addr))?;
        Ok(Self {
            addr,
            server: tokio::spawn(server),
        })
    }

    pub fn addr(&self) -> SocketAddr {
        self.addr
    }

    pub fn shutdown(self) {
        self.server.abort();
    }
}

pub fn routes(
    snapshots: SnapshotReceiver,
    commands: mpsc::Sender<EngineCommand>,
) -> impl Filter<Extract = (impl warp::Reply,), Error = warp::Rejection> + Clone {
    let snapshot_filter = warp::any().map(move || snapshots.clone());
    let command_filter = warp::any().map(move || commands.clone());

    let spectrum_route = warp::path("spectrum")
        .and(warp::path::end())
        .and(warp::get())
        .and(snapshot_filter)
        .map(|snapshots: SnapshotReceiver| {
            let latest = snapshots.borrow().clone();
            warp::reply::json(latest.as_ref())
        });

    let controls_route = warp::path("controls")
        .and(warp::path::end())
        .and(warp::post())
        .and(warp::body::json())
        .and(command_filter)
        .and_then(apply_controls);

    spectrum_route.or(controls_route)
}

async fn apply_controls(
    request: ControlRequest,
    commands: mpsc::Sender<EngineCommand>,
) -> Result<impl warp::Reply, warp::Rejection> {
    let pending = request.into_commands();
    let applied = pending.len();
    for command in pending {
        if commands.send(command).await.is_err() {
            warn!("control request dropped: engine task is gone");
            return Err(warp::reject::custom(EngineUnavailable));
        }
    }
    Ok(warp::reply::with_status(
        warp::reply::json(&ControlResponse {
            status: "ok".into(),
            applied,
        }),
        StatusCode::OK,
    ))
}
