use sea_orm::entity::prelude::*;
use serde::Serialize;

use super::genres::GenreList;

#[sea_orm::model]
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq, Serialize)]
#[sea_orm(table_name = "venues")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub name: String,
    pub city: String,
    pub state: String,
    pub address: Option<String>,
    pub phone: Option<String>,
    pub genres: GenreList,
    pub image_link: Option<String>,
    pub facebook_link: Option<String>,
    pub website: Option<String>,
    pub seeking_talent: bool,
    pub seeking_description: Option<String>,
}

impl Related<super::show::Entity> for Entity {
    fn to() -> RelationDef {
        super::show::Relation::Venue.def().rev()
    }
}

impl ActiveModelBehavior for ActiveModel {}
