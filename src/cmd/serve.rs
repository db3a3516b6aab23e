use tracing::info;

use crate::context::AppContext;
use crate::error::AppResult;
use crate::server;

pub async fn run(ctx: AppContext) -> AppResult<()> {
    let addr = ctx.config.bind_addr;
    let app = server::router(ctx);
    let listener = tokio::net::TcpListener::bind(addr).await?;
    info!(%addr, path = server::WEBHOOK_PATH, "listening for webhook events");
    axum::serve(listener, app).await?;
    Ok(())
}
