use std::sync::Arc;

use chrono::{DateTime, Utc};
use sea_orm::{ActiveModelTrait, EntityTrait, Set, TransactionTrait};
use serde::Serialize;

use crate::database::Database;
use crate::entities;
use crate::error::ServiceError;
use crate::forms::ShowForm;

/// A show joined to both of its endpoints, as the listing page consumes it.
#[derive(Debug, Serialize)]
pub struct ShowListing {
    pub venue_id: i64,
    pub venue_name: String,
    pub artist_id: i64,
    pub artist_name: String,
    pub artist_image_link: Option<String>,
    pub start_time: DateTime<Utc>,
}

#[derive(Debug, Serialize)]
pub struct ShowRecord {
    pub id: i64,
    pub venue_id: i64,
    pub artist_id: i64,
    pub start_time: DateTime<Utc>,
}

impl From<entities::show::Model> for ShowRecord {
    fn from(show: entities::show::Model) -> Self {
        Self {
            id: show.id,
            venue_id: show.venue_id,
            artist_id: show.artist_id,
            start_time: show.start_time,
        }
    }
}

pub struct ShowService {
    db: Arc<Database>,
}

impl ShowService {
    pub fn new(db: Arc<Database>) -> Self {
        Self { db }
    }

    /// Every show joined to its venue and artist. No ordering guarantee.
    pub async fn list(&self) -> Result<Vec<ShowListing>, ServiceError> {
        let shows = entities::show::Entity::find().all(&self.db.conn).await?;

        let mut listings = Vec::with_capacity(shows.len());
        for show in shows {
            let venue = entities::venue::Entity::find_by_id(show.venue_id)
                .one(&self.db.conn)
                .await?;
            let artist = entities::artist::Entity::find_by_id(show.artist_id)
                .one(&self.db.conn)
                .await?;
            // Inner-join semantics: a show with a missing endpoint is skipped
            if let (Some(venue), Some(artist)) = (venue, artist) {
                listings.push(ShowListing {
                    venue_id: venue.id,
                    venue_name: venue.name,
                    artist_id: artist.id,
                    artist_name: artist.name,
                    artist_image_link: artist.image_link,
                    start_time: show.start_time,
                });
            }
        }

        Ok(listings)
    }

    /// Links an artist to a venue at a start time. Existence of the
    /// referenced ids is enforced only by the storage layer's foreign keys.
    pub async fn create(&self, form: ShowForm) -> Result<ShowRecord, ServiceError> {
        let new_show = form.validate()?;

        let show = entities::show::ActiveModel {
            venue_id: Set(new_show.venue_id),
            artist_id: Set(new_show.artist_id),
            start_time: Set(new_show.start_time),
            ..Default::default()
        };

        let created = self
            .db
            .conn
            .transaction::<_, entities::show::Model, ServiceError>(|txn| {
                Box::pin(async move { Ok(show.insert(txn).await?) })
            })
            .await
            .map_err(ServiceError::from)?;

        log::info!(
            "Show created: venue {} / artist {} at {} (ID: {})",
            created.venue_id,
            created.artist_id,
            created.start_time,
            created.id
        );
        Ok(created.into())
    }
}
