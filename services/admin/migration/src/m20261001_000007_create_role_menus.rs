use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(RoleMenus::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(RoleMenus::Id).uuid().not_null().primary_key())
                    .col(ColumnDef::new(RoleMenus::RoleId).uuid().not_null())
                    .col(ColumnDef::new(RoleMenus::MenuId).uuid().not_null())
                    .col(
                        ColumnDef::new(RoleMenus::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_role_menus_role_id")
                            .from(RoleMenus::Table, RoleMenus::RoleId)
                            .to(Roles::Table, Roles::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_role_menus_menu_id")
                            .from(RoleMenus::Table, RoleMenus::MenuId)
                            .to(Menus::Table, Menus::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .table(RoleMenus::Table)
                    .col(RoleMenus::RoleId)
                    .col(RoleMenus::MenuId)
                    .unique()
                    .name("uq_role_menus_role_id_menu_id")
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .table(RoleMenus::Table)
                    .col(RoleMenus::MenuId)
                    .name("idx_role_menus_menu_id")
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(RoleMenus::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
enum RoleMenus {
    Table,
    Id,
    RoleId,
    MenuId,
    CreatedAt,
}

#[derive(Iden)]
enum Roles {
    Table,
    Id,
}

#[derive(Iden)]
enum Menus {
    Table,
    Id,
}
