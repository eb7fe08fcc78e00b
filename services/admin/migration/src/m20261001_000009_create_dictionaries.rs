use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Dictionaries::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Dictionaries::Id)
                            .uuid()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Dictionaries::DictType).string_len(64).not_null())
                    .col(ColumnDef::new(Dictionaries::DictCode).string_len(64).not_null())
                    .col(ColumnDef::new(Dictionaries::DictName).string_len(128).not_null())
                    .col(ColumnDef::new(Dictionaries::ParentCode).string_len(64))
                    .col(
                        ColumnDef::new(Dictionaries::Sort)
                            .integer()
                            .not_null()
                            .default(0),
                    )
                    .col(
                        ColumnDef::new(Dictionaries::Status)
                            .string_len(16)
                            .not_null()
                            .default("enabled"),
                    )
                    .col(ColumnDef::new(Dictionaries::Remark).string_len(255))
                    .col(
                        ColumnDef::new(Dictionaries::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .col(
                        ColumnDef::new(Dictionaries::UpdatedAt)
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
                    .table(Dictionaries::Table)
                    .col(Dictionaries::DictType)
                    .col(Dictionaries::DictCode)
                    .unique()
                    .name("uq_dictionaries_dict_type_dict_code")
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Dictionaries::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
enum Dictionaries {
    Table,
    Id,
    DictType,
    DictCode,
    DictName,
    ParentCode,
    Sort,
    Status,
    Remark,
    CreatedAt,
    UpdatedAt,
}
