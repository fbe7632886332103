use anyhow::Result;
use pcr_rank_watch::utils::logging;
use pcr_rank_watch::{App, Config};
use tokio_util::sync::CancellationToken;
use tracing::info;

#[tokio::main]
async fn main() -> Result<()> {
    // 加载配置
    let config = Config::from_env()?;

    // 初始化日志
    logging::init(config.verbose_logging);

    // 收到 Ctrl+C 或 SIGTERM 时传递停止信号
    let stop = CancellationToken::new();
    tokio::spawn(watch_stop_signal(stop.clone()));

    // 初始化并运行应用
    App::initialize(config, stop).await?.run().await?;

    Ok(())
}

async fn watch_stop_signal(stop: CancellationToken) {
    #[cfg(unix)]
    {
        use tokio::signal::unix::{signal, SignalKind};

        match signal(SignalKind::terminate()) {
            Ok(mut sigterm) => {
                tokio::select! {
                    _ = tokio::signal::ctrl_c() => {}
                    _ = sigterm.recv() => {}
                }
            }
            Err(e) => {
                tracing::warn!("无法监听 SIGTERM: {}", e);
                let _ = tokio::signal::ctrl_c().await;
            }
        }
    }
    #[cfg(not(unix))]
    {
        let _ = tokio::signal::ctrl_c().await;
    }

    info!("pcrclient: receive stop event");
    info!("pcrclient: server stopping...");
    stop.cancel();
}
