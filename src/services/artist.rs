use std::sync::Arc;

use chrono::{DateTime, Utc};
use sea_orm::sea_query::{Expr, ExprTrait, Func};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, EntityTrait, PaginatorTrait, QueryFilter, Set, TransactionTrait,
};
use serde::Serialize;

use crate::database::Database;
use crate::entities;
use crate::entities::genres::GenreList;
use crate::error::ServiceError;
use crate::forms::ArtistForm;
use crate::services::SearchResults;

/// Entry in the flat artist listing.
#[derive(Debug, Serialize)]
pub struct ArtistRef {
    pub id: i64,
    pub name: String,
}

#[derive(Debug, Serialize)]
pub struct ArtistSummary {
    pub id: i64,
    pub name: String,
    pub num_upcoming_shows: u64,
}

/// One booked show as seen from the artist's side.
#[derive(Debug, Serialize)]
pub struct ArtistShow {
    pub venue_id: i64,
    pub venue_name: String,
    pub venue_image_link: Option<String>,
    pub start_time: DateTime<Utc>,
}

#[derive(Debug, Serialize)]
pub struct ArtistDetail {
    pub id: i64,
    pub name: String,
    pub genres: Vec<String>,
    pub city: String,
    pub state: String,
    pub phone: Option<String>,
    pub website: Option<String>,
    pub facebook_link: Option<String>,
    pub seeking_venue: bool,
    pub seeking_description: Option<String>,
    pub image_link: Option<String>,
    pub past_shows: Vec<ArtistShow>,
    pub upcoming_shows: Vec<ArtistShow>,
    pub past_shows_count: usize,
    pub upcoming_shows_count: usize,
}

pub struct ArtistService {
    db: Arc<Database>,
}

impl ArtistService {
    pub fn new(db: Arc<Database>) -> Self {
        Self { db }
    }

    /// Flat id/name listing in storage order.
    pub async fn list(&self) -> Result<Vec<ArtistRef>, ServiceError> {
        let artists = entities::artist::Entity::find().all(&self.db.conn).await?;
        Ok(artists
            .into_iter()
            .map(|artist| ArtistRef {
                id: artist.id,
                name: artist.name,
            })
            .collect())
    }

    /// Case-insensitive substring match on the artist name.
    pub async fn search(&self, term: &str) -> Result<SearchResults<ArtistSummary>, ServiceError> {
        let now = Utc::now();
        let pattern = format!("%{}%", term.to_lowercase());

        let artists = entities::artist::Entity::find()
            .filter(
                Expr::expr(Func::lower(Expr::col(entities::artist::Column::Name))).like(pattern.as_str()),
            )
            .all(&self.db.conn)
            .await?;

        let mut data = Vec::with_capacity(artists.len());
        for artist in artists {
            data.push(ArtistSummary {
                id: artist.id,
                name: artist.name,
                num_upcoming_shows: self.upcoming_show_count(artist.id, now).await?,
            });
        }

        Ok(SearchResults {
            count: data.len(),
            data,
        })
    }

    pub async fn get(&self, id: i64) -> Result<entities::artist::Model, ServiceError> {
        entities::artist::Entity::find_by_id(id)
            .one(&self.db.conn)
            .await?
            .ok_or(ServiceError::NotFound {
                entity: "artist",
                id,
            })
    }

    pub async fn detail(&self, id: i64) -> Result<ArtistDetail, ServiceError> {
        let now = Utc::now();
        let artist = self.get(id).await?;

        let shows = entities::show::Entity::find()
            .filter(entities::show::Column::ArtistId.eq(id))
            .all(&self.db.conn)
            .await?;

        let mut past_shows = Vec::new();
        let mut upcoming_shows = Vec::new();
        for show in shows {
            let venue = entities::venue::Entity::find_by_id(show.venue_id)
                .one(&self.db.conn)
                .await?;
            if let Some(venue) = venue {
                let item = ArtistShow {
                    venue_id: venue.id,
                    venue_name: venue.name,
                    venue_image_link: venue.image_link,
                    start_time: show.start_time,
                };
                if show.start_time >= now {
                    upcoming_shows.push(item);
                } else {
                    past_shows.push(item);
                }
            }
        }

        Ok(ArtistDetail {
            id: artist.id,
            name: artist.name,
            genres: artist.genres.0,
            city: artist.city,
            state: artist.state,
            phone: artist.phone,
            website: artist.website,
            facebook_link: artist.facebook_link,
            seeking_venue: artist.seeking_venue,
            seeking_description: artist.seeking_description,
            image_link: artist.image_link,
            past_shows_count: past_shows.len(),
            upcoming_shows_count: upcoming_shows.len(),
            past_shows,
            upcoming_shows,
        })
    }

    pub async fn create(&self, form: ArtistForm) -> Result<entities::artist::Model, ServiceError> {
        form.validate()?;

        let artist = entities::artist::ActiveModel {
            name: Set(form.name.clone()),
            city: Set(form.city.clone()),
            state: Set(form.state.clone()),
            phone: Set(form.phone.clone()),
            genres: Set(GenreList(form.genre_tags())),
            image_link: Set(form.image_link.clone()),
            facebook_link: Set(form.facebook_link.clone()),
            website: Set(form.website.clone()),
            seeking_venue: Set(form.is_seeking_venue()),
            seeking_description: Set(form.seeking_description.clone()),
            ..Default::default()
        };

        let created = self
            .db
            .conn
            .transaction::<_, entities::artist::Model, ServiceError>(|txn| {
                Box::pin(async move { Ok(artist.insert(txn).await?) })
            })
            .await
            .map_err(ServiceError::from)?;

        log::info!("Artist created: '{}' (ID: {})", created.name, created.id);
        Ok(created)
    }

    /// Full-row replace, same semantics as the venue edit.
    pub async fn edit(
        &self,
        id: i64,
        form: ArtistForm,
    ) -> Result<entities::artist::Model, ServiceError> {
        form.validate()?;

        let updated = self
            .db
            .conn
            .transaction::<_, entities::artist::Model, ServiceError>(move |txn| {
                Box::pin(async move {
                    let artist = entities::artist::Entity::find_by_id(id)
                        .one(txn)
                        .await?
                        .ok_or(ServiceError::NotFound {
                            entity: "artist",
                            id,
                        })?;

                    let mut active: entities::artist::ActiveModel = artist.into();
                    active.name = Set(form.name.clone());
                    active.city = Set(form.city.clone());
                    active.state = Set(form.state.clone());
                    active.phone = Set(form.phone.clone());
                    active.genres = Set(GenreList(form.genre_tags()));
                    active.image_link = Set(form.image_link.clone());
                    active.facebook_link = Set(form.facebook_link.clone());
                    active.website = Set(form.website.clone());
                    active.seeking_venue = Set(form.is_seeking_venue());
                    active.seeking_description = Set(form.seeking_description.clone());

                    Ok(active.update(txn).await?)
                })
            })
            .await
            .map_err(ServiceError::from)?;

        log::info!("Artist updated: '{}' (ID: {})", updated.name, updated.id);
        Ok(updated)
    }

    async fn upcoming_show_count(
        &self,
        artist_id: i64,
        now: DateTime<Utc>,
    ) -> Result<u64, ServiceError> {
        let count = entities::show::Entity::find()
            .filter(entities::show::Column::ArtistId.eq(artist_id))
            .filter(entities::show::Column::StartTime.gte(now))
            .count(&self.db.conn)
            .await?;
        Ok(count)
    }
}
