//! Utilities for spinning up a prometheus metrics server.

use crate::PrometheusError;
use metrics_exporter_prometheus::PrometheusBuilder;
use std::net::{IpAddr, SocketAddr, TcpListener};
use tracing::info;

/// Starts a Prometheus metrics server on `addr:port` and returns the address it serves on.
///
/// Port `0` binds an OS-assigned port.
pub fn init_prometheus_server(addr: IpAddr, port: u16) -> Result<SocketAddr, PrometheusError> {
    let listen_addr = if port == 0 {
        // The exporter binds its own listener; reserve a free port and release it for that.
        let listener = TcpListener::bind((addr, 0))?;
        listener.local_addr()?
    } else {
        SocketAddr::from((addr, port))
    };

    PrometheusBuilder::new().with_http_listener(listen_addr).install()?;

    info!(target: "prometheus", "Serving metrics at: http://{}", listen_addr);
    Ok(listen_addr)
}
