use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(MonitorMetrics::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(MonitorMetrics::Id)
                            .uuid()
                            .not_null()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(MonitorMetrics::MetricType)
                            .string_len(16)
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(MonitorMetrics::MetricName)
                            .string_len(128)
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(MonitorMetrics::Value)
                            .decimal_len(10, 2)
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(MonitorMetrics::Unit)
                            .string_len(32)
                            .not_null()
                            .default(""),
                    )
                    .col(
                        ColumnDef::new(MonitorMetrics::Tags)
                            .json_binary()
                            .not_null()
                            .default(Expr::cust("'{}'::jsonb")),
                    )
                    .col(
                        ColumnDef::new(MonitorMetrics::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .table(MonitorMetrics::Table)
                    .col(MonitorMetrics::MetricType)
                    .col(MonitorMetrics::MetricName)
                    .col(MonitorMetrics::CreatedAt)
                    .name("idx_monitor_metrics_type_name_created_at")
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(MonitorMetrics::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
enum MonitorMetrics {
    Table,
    Id,
    MetricType,
    MetricName,
    Value,
    Unit,
    Tags,
    CreatedAt,
}
