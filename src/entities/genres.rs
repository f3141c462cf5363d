use sea_orm::FromJsonQueryResult;
use serde::{Deserialize, Serialize};

/// Genre tags, stored as a JSON list column rather than a delimited string.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize, FromJsonQueryResult)]
pub struct GenreList(pub Vec<String>);

impl GenreList {
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}
