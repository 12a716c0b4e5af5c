//! HTTP front end: the same dispatcher behind a JSON API plus a small
//! dashboard page.

pub mod handlers;
pub mod routes;
pub mod state;

use std::net::SocketAddr;
use std::time::Duration;

use shared::error::{Error, Result};

pub use routes::create_router;
pub use state::AppState;

pub async fn serve(state: AppState, port: u16) -> Result<()> {
    let router = create_router(state.clone());
    let addr = SocketAddr::from(([0, 0, 0, 0], port));

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .map_err(|e| Error::Network(format!("falha ao escutar em {}: {}", addr, e)))?;

    tracing::info!("ISA disponível em http://{}", addr);

    axum::serve(listener, router)
        .with_graceful_shutdown(shutdown_signal(state))
        .await
        .map_err(|e| Error::Network(format!("servidor encerrou com erro: {}", e)))
}

async fn shutdown_signal(state: AppState) {
    let quit_command = async {
        loop {
            if state.dispatcher.shutdown_requested() {
                break;
            }
            tokio::time::sleep(Duration::from_millis(500)).await;
        }
    };

    tokio::select! {
        _ = quit_command => tracing::info!("encerrando a pedido do usuário"),
        _ = tokio::signal::ctrl_c() => tracing::info!("encerrando por Ctrl-C"),
    }
}
