use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(AlertRules::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(AlertRules::Id).uuid().not_null().primary_key())
                    .col(ColumnDef::new(AlertRules::Name).string_len(128).not_null())
                    .col(ColumnDef::new(AlertRules::MetricType).string_len(16).not_null())
                    .col(ColumnDef::new(AlertRules::MetricName).string_len(128).not_null())
                    .col(ColumnDef::new(AlertRules::Operator).string_len(8).not_null())
                    .col(
                        ColumnDef::new(AlertRules::Threshold)
                            .decimal_len(10, 2)
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(AlertRules::Severity)
                            .string_len(16)
                            .not_null()
                            .default("warning"),
                    )
                    .col(
                        ColumnDef::new(AlertRules::Enabled)
                            .boolean()
                            .not_null()
                            .default(true),
                    )
                    .col(
                        ColumnDef::new(AlertRules::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .col(
                        ColumnDef::new(AlertRules::UpdatedAt)
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
                    .table(AlertRules::Table)
                    .col(AlertRules::MetricType)
                    .col(AlertRules::MetricName)
                    .name("idx_alert_rules_metric_type_metric_name")
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(AlertRules::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
enum AlertRules {
    Table,
    Id,
    Name,
    MetricType,
    MetricName,
    Operator,
    Threshold,
    Severity,
    Enabled,
    CreatedAt,
    UpdatedAt,
}
