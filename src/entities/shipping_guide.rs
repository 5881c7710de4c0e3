use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Created unpopulated by the `order_equipment` procedure; dates are
/// filled in later via `edit_shipping_guide`.
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "app_shipping_guide")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub guide_id: i32,
    pub shipping_date: Option<DateTime>,
    pub delivery_date: Option<DateTime>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::order::Entity")]
    Order,
}

impl Related<super::order::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Order.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
