//! # 数据库模块
//!
//! 数据库连接和迁移管理

use sea_orm::{ConnectOptions, Database, DatabaseConnection};
use sea_orm_migration::MigratorTrait;

use crate::config::DatabaseConfig;
use crate::error::{Context, Result};
use crate::logging::{LogComponent, LogStage};
use crate::{lerror, linfo, lwarn};

/// 初始化数据库连接
///
/// `SQLite` 文件数据库的目录和文件不存在时自动创建。内存数据库只保留一个连接，
/// 否则连接池里的每个连接都会是一个独立的空库。
pub async fn init_database(config: &DatabaseConfig) -> Result<DatabaseConnection> {
    let url = config.get_connection_url()?;
    linfo!(
        "system",
        LogStage::Startup,
        LogComponent::Database,
        "connect",
        "正在连接数据库",
        url = %url
    );

    let max_connections = if config.is_memory_database() {
        1
    } else {
        config.max_connections
    };

    let mut options = ConnectOptions::new(url);
    options
        .max_connections(max_connections)
        .connect_timeout(config.connect_timeout())
        .sqlx_logging(false);

    let db = Database::connect(options)
        .await
        .context("数据库连接失败")?;

    linfo!(
        "system",
        LogStage::Startup,
        LogComponent::Database,
        "connected",
        "数据库连接成功"
    );
    Ok(db)
}

/// 运行数据库迁移
pub async fn run_migrations(db: &DatabaseConnection) -> Result<()> {
    linfo!(
        "system",
        LogStage::Startup,
        LogComponent::Database,
        "migrate",
        "开始运行数据库迁移"
    );

    if let Err(err) = ::migration::Migrator::up(db, None).await {
        lerror!(
            "system",
            LogStage::Startup,
            LogComponent::Database,
            "migrate_failed",
            "数据库迁移失败",
            error = %err
        );
        return Err(err.into());
    }

    linfo!(
        "system",
        LogStage::Startup,
        LogComponent::Database,
        "migrated",
        "数据库迁移完成"
    );
    Ok(())
}

/// 检查数据库状态，返回待应用的迁移数量
pub async fn check_database_status(db: &DatabaseConnection) -> Result<usize> {
    let pending = ::migration::Migrator::get_pending_migrations(db)
        .await
        .context("检查数据库迁移状态失败")?;

    if !pending.is_empty() {
        lwarn!(
            "system",
            LogStage::Db,
            LogComponent::Database,
            "pending_migrations",
            format!("有 {} 个待应用的迁移", pending.len())
        );
    }
    Ok(pending.len())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn memory_config() -> DatabaseConfig {
        DatabaseConfig {
            url: "sqlite::memory:".to_string(),
            ..Default::default()
        }
    }

    #[tokio::test]
    async fn memory_database_migrates_cleanly() {
        let db = init_database(&memory_config()).await.unwrap();
        assert_eq!(check_database_status(&db).await.unwrap(), 1);

        run_migrations(&db).await.unwrap();
        assert_eq!(check_database_status(&db).await.unwrap(), 0);
    }
}
