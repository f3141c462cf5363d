use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // Create venues table
        manager
            .create_table(
                Table::create()
                    .table("venues")
                    .if_not_exists()
                    .col(
                        ColumnDef::new("id")
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new("name").string().not_null())
                    .col(ColumnDef::new("city").string().not_null())
                    .col(ColumnDef::new("state").string().not_null())
                    .col(ColumnDef::new("address").string())
                    .col(ColumnDef::new("phone").string())
                    .col(ColumnDef::new("genres").json().not_null())
                    .col(ColumnDef::new("image_link").string())
                    .col(ColumnDef::new("facebook_link").string())
                    .col(ColumnDef::new("website").string())
                    .col(
                        ColumnDef::new("seeking_talent")
                            .boolean()
                            .not_null()
                            .default(false),
                    )
                    .col(ColumnDef::new("seeking_description").string())
                    .to_owned(),
            )
            .await?;

        // Create artists table
        manager
            .create_table(
                Table::create()
                    .table("artists")
                    .if_not_exists()
                    .col(
                        ColumnDef::new("id")
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new("name").string().not_null())
                    .col(ColumnDef::new("city").string().not_null())
                    .col(ColumnDef::new("state").string().not_null())
                    .col(ColumnDef::new("phone").string())
                    .col(ColumnDef::new("genres").json().not_null())
                    .col(ColumnDef::new("image_link").string())
                    .col(ColumnDef::new("facebook_link").string())
                    .col(ColumnDef::new("website").string())
                    .col(
                        ColumnDef::new("seeking_venue")
                            .boolean()
                            .not_null()
                            .default(false),
                    )
                    .col(ColumnDef::new("seeking_description").string())
                    .to_owned(),
            )
            .await?;

        // Create shows table. Restrict deletes so a venue or artist with
        // booked shows cannot be removed out from under them.
        manager
            .create_table(
                Table::create()
                    .table("shows")
                    .if_not_exists()
                    .col(
                        ColumnDef::new("id")
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new("venue_id").integer().not_null())
                    .col(ColumnDef::new("artist_id").integer().not_null())
                    .col(ColumnDef::new("start_time").timestamp().not_null())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_shows_venue_id")
                            .from("shows", "venue_id")
                            .to("venues", "id")
                            .on_delete(ForeignKeyAction::Restrict),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_shows_artist_id")
                            .from("shows", "artist_id")
                            .to("artists", "id")
                            .on_delete(ForeignKeyAction::Restrict),
                    )
                    .to_owned(),
            )
            .await?;

        // Non-unique: the same artist/venue pair may have shows at different times
        manager
            .create_index(
                Index::create()
                    .name("idx_shows_venue_artist_start_time")
                    .table("shows")
                    .col("venue_id")
                    .col("artist_id")
                    .col("start_time")
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // Drop tables in reverse order
        manager
            .drop_table(Table::drop().table("shows").to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table("artists").to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table("venues").to_owned())
            .await?;

        Ok(())
    }
}
