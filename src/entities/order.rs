use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Equipment order, created by the `order_equipment` procedure together
/// with its shipping guide. `order_date` is set by the store and immutable.
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "app_orders")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub order_id: i32,
    pub order_date: Date,
    pub equipment_id: i32,
    pub status: String,
    pub shipping_guide_id: i32,
    pub user_id: i32,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::equipment::Entity",
        from = "Column::EquipmentId",
        to = "super::equipment::Column::EquipmentId"
    )]
    Equipment,
    #[sea_orm(
        belongs_to = "super::shipping_guide::Entity",
        from = "Column::ShippingGuideId",
        to = "super::shipping_guide::Column::GuideId"
    )]
    ShippingGuide,
}

impl Related<super::equipment::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Equipment.def()
    }
}

impl Related<super::shipping_guide::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::ShippingGuide.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
