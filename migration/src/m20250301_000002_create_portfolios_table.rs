use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

/// Identifiers for the `portfolios` table and its columns.
#[derive(DeriveIden)]
enum Portfolios {
    Table,
    Id,
    UserId,
    Personal,
    Skills,
    Projects,
    Socials,
    Experience,
    Theme,
    Link,
    CreatedAt,
    UpdatedAt,
}

/// Re-declare parent table identifiers for foreign-key references.
#[derive(DeriveIden)]
enum Users {
    Table,
    Id,
}

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Portfolios::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Portfolios::Id)
                            .uuid()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Portfolios::UserId).uuid().not_null())
                    .col(ColumnDef::new(Portfolios::Personal).json_binary().not_null())
                    .col(ColumnDef::new(Portfolios::Skills).json_binary().not_null())
                    .col(ColumnDef::new(Portfolios::Projects).json_binary().not_null())
                    .col(ColumnDef::new(Portfolios::Socials).json_binary().not_null())
                    .col(ColumnDef::new(Portfolios::Experience).json_binary().not_null())
                    .col(
                        ColumnDef::new(Portfolios::Theme)
                            .string()
                            .not_null()
                            .default("light"),
                    )
                    .col(ColumnDef::new(Portfolios::Link).string().not_null())
                    .col(
                        ColumnDef::new(Portfolios::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Portfolios::UpdatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_portfolios_user_id")
                            .from(Portfolios::Table, Portfolios::UserId)
                            .to(Users::Table, Users::Id)
                            .on_delete(ForeignKeyAction::Cascade)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        // One portfolio per owner.
        manager
            .create_index(
                Index::create()
                    .name("idx_portfolios_user_id_unique")
                    .table(Portfolios::Table)
                    .col(Portfolios::UserId)
                    .unique()
                    .to_owned(),
            )
            .await?;

        // Listing is ordered by most recent update.
        manager
            .create_index(
                Index::create()
                    .name("idx_portfolios_updated_at")
                    .table(Portfolios::Table)
                    .col(Portfolios::UpdatedAt)
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Portfolios::Table).to_owned())
            .await
    }
}
