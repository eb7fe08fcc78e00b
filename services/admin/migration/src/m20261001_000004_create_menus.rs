use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Menus::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(Menus::Id).uuid().not_null().primary_key())
                    .col(ColumnDef::new(Menus::ParentId).uuid())
                    .col(ColumnDef::new(Menus::Name).string_len(64).not_null())
                    .col(
                        ColumnDef::new(Menus::Path)
                            .string_len(255)
                            .not_null()
                            .default(""),
                    )
                    .col(ColumnDef::new(Menus::Component).string_len(255))
                    .col(
                        ColumnDef::new(Menus::Icon)
                            .string_len(64)
                            .not_null()
                            .default(""),
                    )
                    .col(
                        ColumnDef::new(Menus::MenuType)
                            .string_len(16)
                            .not_null()
                            .default("menu"),
                    )
                    .col(
                        ColumnDef::new(Menus::Visible)
                            .boolean()
                            .not_null()
                            .default(true),
                    )
                    .col(ColumnDef::new(Menus::Sort).integer().not_null().default(0))
                    .col(
                        ColumnDef::new(Menus::Status)
                            .string_len(16)
                            .not_null()
                            .default("enabled"),
                    )
                    .col(ColumnDef::new(Menus::PermissionCode).string_len(64))
                    .col(
                        ColumnDef::new(Menus::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .col(
                        ColumnDef::new(Menus::UpdatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    // Children must be moved or deleted before their parent.
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_menus_parent_id")
                            .from(Menus::Table, Menus::ParentId)
                            .to(Menus::Table, Menus::Id)
                            .on_delete(ForeignKeyAction::Restrict),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .table(Menus::Table)
                    .col(Menus::ParentId)
                    .name("idx_menus_parent_id")
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Menus::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
enum Menus {
    Table,
    Id,
    ParentId,
    Name,
    Path,
    Component,
    Icon,
    #[iden = "type"]
    MenuType,
    Visible,
    Sort,
    Status,
    PermissionCode,
    CreatedAt,
    UpdatedAt,
}
