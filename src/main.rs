//! # Module Monitor 主程序
//!
//! 监控模块编排服务：注册外部监控模块，按需向所有模块发起目标服务测试

use std::path::PathBuf;
use std::sync::Arc;

use clap::Parser;
use module_monitor::{
    Result,
    app::AppContext,
    config, database, lerror, linfo,
    logging::{self, LogComponent, LogStage},
    management::ManagementServer,
};

/// 命令行参数
#[derive(Debug, Parser)]
#[command(name = "module-monitor", version, about = "Monitoring module orchestration service")]
struct Cli {
    /// 配置文件路径
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// 日志级别（`RUST_LOG` 优先）
    #[arg(long)]
    log_level: Option<String>,

    /// 打印日志配置指南后退出
    #[arg(long)]
    logging_help: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    if cli.logging_help {
        logging::print_logging_help();
        return Ok(());
    }

    logging::init_logging(cli.log_level.as_deref());

    if let Err(e) = run(cli).await {
        lerror!(
            "system",
            LogStage::Startup,
            LogComponent::Main,
            "service_start_failed",
            format!("服务启动失败: {e:?}")
        );
        return Err(e);
    }

    linfo!(
        "system",
        LogStage::Shutdown,
        LogComponent::Main,
        "service_shutdown",
        "服务正常关闭"
    );
    Ok(())
}

async fn run(cli: Cli) -> Result<()> {
    let config = config::load_config(cli.config.as_deref())?;

    let db = database::init_database(&config.database).await?;
    database::run_migrations(&db).await?;

    let context = Arc::new(AppContext::build(config, Arc::new(db))?);
    linfo!(
        "system",
        LogStage::Startup,
        LogComponent::Main,
        "service_starting",
        "🚀 服务启动",
        listen = %context.config.server.listen_address(),
        test_result_ttl = ?context.orchestrator.settings().test_result_ttl
    );

    ManagementServer::new(context).serve(shutdown_signal()).await
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        lerror!(
            "system",
            LogStage::Shutdown,
            LogComponent::Main,
            "signal_failed",
            format!("无法监听退出信号: {e}")
        );
    }
    linfo!(
        "system",
        LogStage::Shutdown,
        LogComponent::Main,
        "shutdown_requested",
        "收到退出信号, 正在关闭"
    );
}
