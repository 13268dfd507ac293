use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(MonitoringModules::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(MonitoringModules::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(MonitoringModules::Url).text().not_null())
                    .col(
                        ColumnDef::new(MonitoringModules::CreatedAt)
                            .timestamp()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_monitoring_modules_created_at")
                    .table(MonitoringModules::Table)
                    .col(MonitoringModules::CreatedAt)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(MonitoringModules::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
enum MonitoringModules {
    Table,
    Id,
    Url,
    CreatedAt,
}
