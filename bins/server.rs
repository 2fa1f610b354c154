use std::process::ExitCode;

use configs::AppConfig;
use dotenvy::dotenv;
use tracing::{error, info, warn};
use uuid::Uuid;

fn init_logging() {
    // 提前加载 .env，使得 RUST_LOG、DATABASE_URL 等环境变量生效
    dotenv().ok();
    // LOG_FORMAT=json 时输出 JSON 日志
    common::utils::logging::init_logging_from_env();
    info!(service = "server", event = "logger_init", "tracing subscriber initialized");
}

fn install_panic_hook(service_id: Uuid, pid: u32) {
    std::panic::set_hook(Box::new(move |info| {
        error!(service = "server", event = "panic", %service_id, pid, message = %info, "unhandled panic occurred");
    }));
}

fn build_runtime(cfg: &AppConfig) -> std::io::Result<tokio::runtime::Runtime> {
    let mut builder = tokio::runtime::Builder::new_multi_thread();
    builder.enable_all();
    if let Some(w) = cfg.server.worker_threads {
        builder.worker_threads(w);
    }
    builder.build()
}

/// Resolves on the first Ctrl+C. A failing signal handler never resolves,
/// so the server keeps running instead of stopping on its own.
async fn shutdown_signal(service_id: Uuid) {
    match tokio::signal::ctrl_c().await {
        Ok(()) => info!(service = "server", event = "shutdown_signal", %service_id, "received Ctrl+C, draining connections"),
        Err(e) => {
            warn!(service = "server", event = "signal_unavailable", error = %e, "cannot listen for Ctrl+C");
            std::future::pending::<()>().await;
        }
    }
}

fn main() -> ExitCode {
    init_logging();

    let service_id = Uuid::new_v4();
    let pid = std::process::id();
    install_panic_hook(service_id, pid);

    // 配置只加载一次：线程数与服务本身共用
    let cfg = match server::startup::load_config() {
        Ok(cfg) => cfg,
        Err(e) => {
            error!(service = "server", event = "config_invalid", error = %e, "configuration rejected");
            return ExitCode::FAILURE;
        }
    };

    let rt = match build_runtime(&cfg) {
        Ok(rt) => rt,
        Err(e) => {
            error!(service = "server", event = "runtime_build_failed", error = %e, "failed to build tokio runtime");
            return ExitCode::FAILURE;
        }
    };

    info!(
        service = "server",
        event = "start",
        %service_id,
        pid,
        version = env!("CARGO_PKG_VERSION"),
        threads = cfg.server.worker_threads.unwrap_or_default(),
        "startup ocean api starting"
    );

    // Ctrl+C 只负责触发优雅停机；等待 run 返回（请求处理完毕、邮件队列排空）后再退出
    rt.block_on(async move {
        match server::run(cfg, shutdown_signal(service_id)).await {
            Ok(()) => {
                info!(service = "server", event = "stop", %service_id, pid, "server stopped");
                ExitCode::SUCCESS
            }
            Err(e) => {
                error!(service = "server", event = "run_failed", error = %e, "server::run returned error");
                ExitCode::FAILURE
            }
        }
    })
}
