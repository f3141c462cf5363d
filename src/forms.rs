use chrono::{DateTime, NaiveDateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, thiserror::Error)]
pub enum ValidationError {
    #[error("missing required field: {0}")]
    MissingField(&'static str),
    #[error("field {0} must be a positive id")]
    InvalidId(&'static str),
    #[error("unparseable start_time: {0}")]
    InvalidStartTime(String),
}

/// Checkbox decoding rule: an HTML checkbox is submitted only when checked,
/// so presence of the field means true no matter what value it carries.
pub fn checkbox_checked(field: &Option<String>) -> bool {
    field.is_some()
}

/// Split the comma-separated genre wire value into trimmed, non-empty tags.
pub fn split_genres(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|tag| !tag.is_empty())
        .map(str::to_string)
        .collect()
}

/// Accepts RFC 3339 or a naive `YYYY-MM-DD HH:MM:SS` interpreted as UTC.
pub fn parse_start_time(raw: &str) -> Result<DateTime<Utc>, ValidationError> {
    if let Ok(parsed) = DateTime::parse_from_rfc3339(raw) {
        return Ok(parsed.with_timezone(&Utc));
    }
    NaiveDateTime::parse_from_str(raw, "%Y-%m-%d %H:%M:%S")
        .map(|naive| naive.and_utc())
        .map_err(|_| ValidationError::InvalidStartTime(raw.to_string()))
}

fn require(field: &str, name: &'static str) -> Result<(), ValidationError> {
    if field.trim().is_empty() {
        Err(ValidationError::MissingField(name))
    } else {
        Ok(())
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct SearchForm {
    #[serde(default)]
    pub search_term: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct VenueForm {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub city: String,
    #[serde(default)]
    pub state: String,
    pub address: Option<String>,
    pub phone: Option<String>,
    pub genres: Option<String>,
    pub image_link: Option<String>,
    pub facebook_link: Option<String>,
    pub website: Option<String>,
    pub seeking_talent: Option<String>,
    pub seeking_description: Option<String>,
}

impl VenueForm {
    pub fn validate(&self) -> Result<(), ValidationError> {
        require(&self.name, "name")?;
        require(&self.city, "city")?;
        require(&self.state, "state")?;
        Ok(())
    }

    pub fn genre_tags(&self) -> Vec<String> {
        self.genres.as_deref().map(split_genres).unwrap_or_default()
    }

    pub fn is_seeking_talent(&self) -> bool {
        checkbox_checked(&self.seeking_talent)
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ArtistForm {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub city: String,
    #[serde(default)]
    pub state: String,
    pub phone: Option<String>,
    pub genres: Option<String>,
    pub image_link: Option<String>,
    pub facebook_link: Option<String>,
    pub website: Option<String>,
    pub seeking_venue: Option<String>,
    pub seeking_description: Option<String>,
}

impl ArtistForm {
    pub fn validate(&self) -> Result<(), ValidationError> {
        require(&self.name, "name")?;
        require(&self.city, "city")?;
        require(&self.state, "state")?;
        Ok(())
    }

    pub fn genre_tags(&self) -> Vec<String> {
        self.genres.as_deref().map(split_genres).unwrap_or_default()
    }

    pub fn is_seeking_venue(&self) -> bool {
        checkbox_checked(&self.seeking_venue)
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ShowForm {
    pub venue_id: Option<i64>,
    pub artist_id: Option<i64>,
    pub start_time: Option<String>,
}

/// A show submission that passed validation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewShow {
    pub venue_id: i64,
    pub artist_id: i64,
    pub start_time: DateTime<Utc>,
}

impl ShowForm {
    /// Checks field presence and formats only. Whether the referenced ids
    /// actually exist is left to the storage layer's foreign keys.
    pub fn validate(&self) -> Result<NewShow, ValidationError> {
        let venue_id = match self.venue_id {
            None => return Err(ValidationError::MissingField("venue_id")),
            Some(id) if id <= 0 => return Err(ValidationError::InvalidId("venue_id")),
            Some(id) => id,
        };
        let artist_id = match self.artist_id {
            None => return Err(ValidationError::MissingField("artist_id")),
            Some(id) if id <= 0 => return Err(ValidationError::InvalidId("artist_id")),
            Some(id) => id,
        };
        let raw = self
            .start_time
            .as_deref()
            .ok_or(ValidationError::MissingField("start_time"))?;
        let start_time = parse_start_time(raw)?;

        Ok(NewShow {
            venue_id,
            artist_id,
            start_time,
        })
    }
}
