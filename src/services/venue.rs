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
use crate::forms::VenueForm;
use crate::services::SearchResults;

#[derive(Debug, Serialize)]
pub struct VenueSummary {
    pub id: i64,
    pub name: String,
    pub num_upcoming_shows: u64,
}

#[derive(Debug, Serialize)]
pub struct AreaVenues {
    pub city: String,
    pub state: String,
    pub venues: Vec<VenueSummary>,
}

/// One booked show as seen from the venue's side.
#[derive(Debug, Serialize)]
pub struct VenueShow {
    pub artist_id: i64,
    pub artist_name: String,
    pub artist_image_link: Option<String>,
    pub start_time: DateTime<Utc>,
}

#[derive(Debug, Serialize)]
pub struct VenueDetail {
    pub id: i64,
    pub name: String,
    pub genres: Vec<String>,
    pub address: Option<String>,
    pub city: String,
    pub state: String,
    pub phone: Option<String>,
    pub website: Option<String>,
    pub facebook_link: Option<String>,
    pub seeking_talent: bool,
    pub seeking_description: Option<String>,
    pub image_link: Option<String>,
    pub past_shows: Vec<VenueShow>,
    pub upcoming_shows: Vec<VenueShow>,
    pub past_shows_count: usize,
    pub upcoming_shows_count: usize,
}

pub struct VenueService {
    db: Arc<Database>,
}

impl VenueService {
    pub fn new(db: Arc<Database>) -> Self {
        Self { db }
    }

    /// All venues grouped by the distinct (city, state) pairs present,
    /// groups and members in storage order.
    pub async fn list_grouped_by_area(&self) -> Result<Vec<AreaVenues>, ServiceError> {
        let now = Utc::now();
        let venues = entities::venue::Entity::find().all(&self.db.conn).await?;

        let mut areas: Vec<AreaVenues> = Vec::new();
        for venue in venues {
            let summary = VenueSummary {
                id: venue.id,
                name: venue.name,
                num_upcoming_shows: self.upcoming_show_count(venue.id, now).await?,
            };
            match areas
                .iter_mut()
                .find(|area| area.city == venue.city && area.state == venue.state)
            {
                Some(area) => area.venues.push(summary),
                None => areas.push(AreaVenues {
                    city: venue.city,
                    state: venue.state,
                    venues: vec![summary],
                }),
            }
        }

        Ok(areas)
    }

    /// Case-insensitive substring match on the venue name.
    pub async fn search(&self, term: &str) -> Result<SearchResults<VenueSummary>, ServiceError> {
        let now = Utc::now();
        let pattern = format!("%{}%", term.to_lowercase());

        let venues = entities::venue::Entity::find()
            .filter(
                Expr::expr(Func::lower(Expr::col(entities::venue::Column::Name))).like(pattern.as_str()),
            )
            .all(&self.db.conn)
            .await?;

        let mut data = Vec::with_capacity(venues.len());
        for venue in venues {
            data.push(VenueSummary {
                id: venue.id,
                name: venue.name,
                num_upcoming_shows: self.upcoming_show_count(venue.id, now).await?,
            });
        }

        Ok(SearchResults {
            count: data.len(),
            data,
        })
    }

    pub async fn get(&self, id: i64) -> Result<entities::venue::Model, ServiceError> {
        entities::venue::Entity::find_by_id(id)
            .one(&self.db.conn)
            .await?
            .ok_or(ServiceError::NotFound { entity: "venue", id })
    }

    /// Full field set plus the venue's shows partitioned into past and
    /// upcoming against a single clock reading. The split is derived per
    /// call, never persisted.
    pub async fn detail(&self, id: i64) -> Result<VenueDetail, ServiceError> {
        let now = Utc::now();
        let venue = self.get(id).await?;

        let shows = entities::show::Entity::find()
            .filter(entities::show::Column::VenueId.eq(id))
            .all(&self.db.conn)
            .await?;

        let mut past_shows = Vec::new();
        let mut upcoming_shows = Vec::new();
        for show in shows {
            let artist = entities::artist::Entity::find_by_id(show.artist_id)
                .one(&self.db.conn)
                .await?;
            if let Some(artist) = artist {
                let item = VenueShow {
                    artist_id: artist.id,
                    artist_name: artist.name,
                    artist_image_link: artist.image_link,
                    start_time: show.start_time,
                };
                if show.start_time >= now {
                    upcoming_shows.push(item);
                } else {
                    past_shows.push(item);
                }
            }
        }

        Ok(VenueDetail {
            id: venue.id,
            name: venue.name,
            genres: venue.genres.0,
            address: venue.address,
            city: venue.city,
            state: venue.state,
            phone: venue.phone,
            website: venue.website,
            facebook_link: venue.facebook_link,
            seeking_talent: venue.seeking_talent,
            seeking_description: venue.seeking_description,
            image_link: venue.image_link,
            past_shows_count: past_shows.len(),
            upcoming_shows_count: upcoming_shows.len(),
            past_shows,
            upcoming_shows,
        })
    }

    pub async fn create(&self, form: VenueForm) -> Result<entities::venue::Model, ServiceError> {
        form.validate()?;

        let venue = entities::venue::ActiveModel {
            name: Set(form.name.clone()),
            city: Set(form.city.clone()),
            state: Set(form.state.clone()),
            address: Set(form.address.clone()),
            phone: Set(form.phone.clone()),
            genres: Set(GenreList(form.genre_tags())),
            image_link: Set(form.image_link.clone()),
            facebook_link: Set(form.facebook_link.clone()),
            website: Set(form.website.clone()),
            seeking_talent: Set(form.is_seeking_talent()),
            seeking_description: Set(form.seeking_description.clone()),
            ..Default::default()
        };

        let created = self
            .db
            .conn
            .transaction::<_, entities::venue::Model, ServiceError>(|txn| {
                Box::pin(async move { Ok(venue.insert(txn).await?) })
            })
            .await
            .map_err(ServiceError::from)?;

        log::info!("Venue created: '{}' (ID: {})", created.name, created.id);
        Ok(created)
    }

    /// Full-row replace: every editable field is overwritten from the form,
    /// so omitted optional fields come back cleared, not merged.
    pub async fn edit(
        &self,
        id: i64,
        form: VenueForm,
    ) -> Result<entities::venue::Model, ServiceError> {
        form.validate()?;

        let updated = self
            .db
            .conn
            .transaction::<_, entities::venue::Model, ServiceError>(move |txn| {
                Box::pin(async move {
                    let venue = entities::venue::Entity::find_by_id(id)
                        .one(txn)
                        .await?
                        .ok_or(ServiceError::NotFound { entity: "venue", id })?;

                    let mut active: entities::venue::ActiveModel = venue.into();
                    active.name = Set(form.name.clone());
                    active.city = Set(form.city.clone());
                    active.state = Set(form.state.clone());
                    active.address = Set(form.address.clone());
                    active.phone = Set(form.phone.clone());
                    active.genres = Set(GenreList(form.genre_tags()));
                    active.image_link = Set(form.image_link.clone());
                    active.facebook_link = Set(form.facebook_link.clone());
                    active.website = Set(form.website.clone());
                    active.seeking_talent = Set(form.is_seeking_talent());
                    active.seeking_description = Set(form.seeking_description.clone());

                    Ok(active.update(txn).await?)
                })
            })
            .await
            .map_err(ServiceError::from)?;

        log::info!("Venue updated: '{}' (ID: {})", updated.name, updated.id);
        Ok(updated)
    }

    /// Reports its outcome: NotFound when nothing matched, Database when the
    /// storage layer rejects the delete (e.g. shows still reference the
    /// venue under the restrict policy).
    pub async fn delete(&self, id: i64) -> Result<(), ServiceError> {
        let rows_affected = self
            .db
            .conn
            .transaction::<_, u64, ServiceError>(move |txn| {
                Box::pin(async move {
                    let result = entities::venue::Entity::delete_by_id(id).exec(txn).await?;
                    Ok(result.rows_affected)
                })
            })
            .await
            .map_err(ServiceError::from)?;

        if rows_affected == 0 {
            return Err(ServiceError::NotFound { entity: "venue", id });
        }

        log::info!("Venue deleted (ID: {})", id);
        Ok(())
    }

    async fn upcoming_show_count(
        &self,
        venue_id: i64,
        now: DateTime<Utc>,
    ) -> Result<u64, ServiceError> {
        let count = entities::show::Entity::find()
            .filter(entities::show::Column::VenueId.eq(venue_id))
            .filter(entities::show::Column::StartTime.gte(now))
            .count(&self.db.conn)
            .await?;
        Ok(count)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::forms::ArtistForm;
    use crate::services::artist::ArtistService;
    use crate::test_utils::test_db;
    use chrono::Duration;

    fn venue_form(name: &str, city: &str, state: &str) -> VenueForm {
        VenueForm {
            name: name.into(),
            city: city.into(),
            state: state.into(),
            ..Default::default()
        }
    }

    async fn insert_artist(db: &Arc<Database>, name: &str) -> entities::artist::Model {
        let form = ArtistForm {
            name: name.into(),
            city: "San Francisco".into(),
            state: "CA".into(),
            image_link: Some("https://example.com/artist.png".into()),
            ..Default::default()
        };
        ArtistService::new(db.clone()).create(form).await.unwrap()
    }

    async fn insert_show(
        db: &Database,
        venue_id: i64,
        artist_id: i64,
        start_time: DateTime<Utc>,
    ) -> entities::show::Model {
        let show = entities::show::ActiveModel {
            venue_id: Set(venue_id),
            artist_id: Set(artist_id),
            start_time: Set(start_time),
            ..Default::default()
        };
        show.insert(&db.conn).await.unwrap()
    }

    #[tokio::test]
    async fn test_create_then_detail_round_trip() {
        let db = test_db().await;
        let service = VenueService::new(db);

        let form = VenueForm {
            name: "The Musical Hop".into(),
            city: "San Francisco".into(),
            state: "CA".into(),
            address: Some("1015 Folsom Street".into()),
            phone: Some("123-123-1234".into()),
            genres: Some("Jazz, Reggae, Swing".into()),
            image_link: Some("https://example.com/hop.png".into()),
            facebook_link: Some("https://facebook.com/themusicalhop".into()),
            website: Some("https://themusicalhop.com".into()),
            seeking_talent: Some("y".into()),
            seeking_description: Some("Looking for local artists".into()),
        };
        let created = service.create(form).await.unwrap();

        let detail = service.detail(created.id).await.unwrap();
        assert_eq!(detail.name, "The Musical Hop");
        assert_eq!(detail.city, "San Francisco");
        assert_eq!(detail.state, "CA");
        assert_eq!(detail.address.as_deref(), Some("1015 Folsom Street"));
        assert_eq!(detail.phone.as_deref(), Some("123-123-1234"));
        assert_eq!(detail.genres, vec!["Jazz", "Reggae", "Swing"]);
        assert!(detail.seeking_talent);
        assert_eq!(
            detail.seeking_description.as_deref(),
            Some("Looking for local artists")
        );
        assert_eq!(detail.past_shows_count, 0);
        assert_eq!(detail.upcoming_shows_count, 0);
        assert!(detail.past_shows.is_empty());
        assert!(detail.upcoming_shows.is_empty());
    }

    #[tokio::test]
    async fn test_list_grouped_by_area_in_storage_order() {
        let db = test_db().await;
        let service = VenueService::new(db.clone());

        service
            .create(venue_form("The Musical Hop", "San Francisco", "CA"))
            .await
            .unwrap();
        service
            .create(venue_form("The Dueling Pianos Bar", "New York", "NY"))
            .await
            .unwrap();
        service
            .create(venue_form(
                "Park Square Live Music & Coffee",
                "San Francisco",
                "CA",
            ))
            .await
            .unwrap();

        let areas = service.list_grouped_by_area().await.unwrap();
        assert_eq!(areas.len(), 2);
        assert_eq!(areas[0].city, "San Francisco");
        assert_eq!(areas[0].state, "CA");
        assert_eq!(areas[0].venues.len(), 2);
        assert_eq!(areas[0].venues[0].name, "The Musical Hop");
        assert_eq!(areas[0].venues[1].name, "Park Square Live Music & Coffee");
        assert_eq!(areas[1].city, "New York");
        assert_eq!(areas[1].venues.len(), 1);
    }

    #[tokio::test]
    async fn test_listing_counts_only_upcoming_shows() {
        let db = test_db().await;
        let service = VenueService::new(db.clone());

        let venue = service
            .create(venue_form("The Musical Hop", "San Francisco", "CA"))
            .await
            .unwrap();
        let artist = insert_artist(&db, "Guns N Petals").await;

        let now = Utc::now();
        insert_show(&db, venue.id, artist.id, now - Duration::days(30)).await;
        insert_show(&db, venue.id, artist.id, now + Duration::days(30)).await;
        insert_show(&db, venue.id, artist.id, now + Duration::days(60)).await;

        let areas = service.list_grouped_by_area().await.unwrap();
        assert_eq!(areas[0].venues[0].num_upcoming_shows, 2);
    }

    #[tokio::test]
    async fn test_search_is_case_insensitive_substring() {
        let db = test_db().await;
        let service = VenueService::new(db);

        service
            .create(venue_form("The Musical Hop", "San Francisco", "CA"))
            .await
            .unwrap();
        service
            .create(venue_form(
                "Park Square Live Music & Coffee",
                "San Francisco",
                "CA",
            ))
            .await
            .unwrap();

        let results = service.search("Hop").await.unwrap();
        assert_eq!(results.count, 1);
        assert_eq!(results.data[0].name, "The Musical Hop");

        let results = service.search("Music").await.unwrap();
        assert_eq!(results.count, 2);

        let results = service.search("music").await.unwrap();
        assert_eq!(results.count, 2);

        let results = service.search("banjo").await.unwrap();
        assert_eq!(results.count, 0);
        assert!(results.data.is_empty());
    }

    #[tokio::test]
    async fn test_detail_partitions_shows_by_start_time() {
        let db = test_db().await;
        let service = VenueService::new(db.clone());

        let venue = service
            .create(venue_form("The Musical Hop", "San Francisco", "CA"))
            .await
            .unwrap();
        let artist = insert_artist(&db, "Guns N Petals").await;

        let now = Utc::now();
        insert_show(&db, venue.id, artist.id, now - Duration::hours(2)).await;
        insert_show(&db, venue.id, artist.id, now + Duration::hours(2)).await;

        let detail = service.detail(venue.id).await.unwrap();
        assert_eq!(detail.past_shows_count, 1);
        assert_eq!(detail.upcoming_shows_count, 1);
        assert_eq!(
            detail.past_shows_count + detail.upcoming_shows_count,
            2,
            "every show is classified exactly once"
        );
        assert_eq!(detail.upcoming_shows[0].artist_name, "Guns N Petals");
        assert_eq!(
            detail.upcoming_shows[0].artist_image_link.as_deref(),
            Some("https://example.com/artist.png")
        );
    }

    #[tokio::test]
    async fn test_detail_missing_id_is_not_found() {
        let db = test_db().await;
        let service = VenueService::new(db);

        let err = service.detail(9999).await.unwrap_err();
        assert!(matches!(err, ServiceError::NotFound { id: 9999, .. }));
    }

    #[tokio::test]
    async fn test_create_missing_required_field_fails() {
        let db = test_db().await;
        let service = VenueService::new(db);

        let err = service
            .create(venue_form("", "San Francisco", "CA"))
            .await
            .unwrap_err();
        assert!(matches!(err, ServiceError::Validation(_)));
    }

    #[tokio::test]
    async fn test_edit_replaces_all_fields() {
        let db = test_db().await;
        let service = VenueService::new(db);

        let form = VenueForm {
            name: "The Musical Hop".into(),
            city: "San Francisco".into(),
            state: "CA".into(),
            phone: Some("123-123-1234".into()),
            genres: Some("Jazz, Reggae".into()),
            seeking_talent: Some("y".into()),
            seeking_description: Some("Looking".into()),
            ..Default::default()
        };
        let created = service.create(form).await.unwrap();

        // Resubmission with only the required fields clears everything else
        let updated = service
            .edit(created.id, venue_form("The Musical Hop", "Oakland", "CA"))
            .await
            .unwrap();

        assert_eq!(updated.city, "Oakland");
        assert_eq!(updated.phone, None);
        assert!(updated.genres.is_empty());
        assert!(!updated.seeking_talent);
        assert_eq!(updated.seeking_description, None);
    }

    #[tokio::test]
    async fn test_edit_missing_id_is_not_found() {
        let db = test_db().await;
        let service = VenueService::new(db);

        let err = service
            .edit(42, venue_form("Nowhere", "San Francisco", "CA"))
            .await
            .unwrap_err();
        assert!(matches!(err, ServiceError::NotFound { id: 42, .. }));
    }

    #[tokio::test]
    async fn test_delete_then_detail_is_not_found() {
        let db = test_db().await;
        let service = VenueService::new(db);

        let created = service
            .create(venue_form("The Musical Hop", "San Francisco", "CA"))
            .await
            .unwrap();

        service.delete(created.id).await.unwrap();

        let err = service.detail(created.id).await.unwrap_err();
        assert!(matches!(err, ServiceError::NotFound { .. }));
    }

    #[tokio::test]
    async fn test_delete_missing_id_is_not_found() {
        let db = test_db().await;
        let service = VenueService::new(db);

        let err = service.delete(9999).await.unwrap_err();
        assert!(matches!(err, ServiceError::NotFound { id: 9999, .. }));
    }

    #[tokio::test]
    async fn test_delete_venue_with_shows_is_rejected() {
        let db = test_db().await;
        let service = VenueService::new(db.clone());

        let venue = service
            .create(venue_form("The Musical Hop", "San Francisco", "CA"))
            .await
            .unwrap();
        let artist = insert_artist(&db, "Guns N Petals").await;
        insert_show(&db, venue.id, artist.id, Utc::now() + Duration::days(7)).await;

        let err = service.delete(venue.id).await.unwrap_err();
        assert!(matches!(err, ServiceError::Database(_)));

        // The venue and its shows survive the rejected delete
        let detail = service.detail(venue.id).await.unwrap();
        assert_eq!(detail.upcoming_shows_count, 1);
    }
}
