use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Production record, logically 1:1 with its equipment (modeled as a
/// foreign key here). The description is the free-text `key: value` list
/// the ordering workflow later parses.
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "app_production")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub production_id: i32,
    pub description: String,
    pub production_start: DateTime,
    pub production_end: Option<DateTime>,
    pub labor_type_id: i32,
    pub equipment_id: i32,
    pub status: Option<bool>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::labor_type::Entity",
        from = "Column::LaborTypeId",
        to = "super::labor_type::Column::LaborTypeId"
    )]
    LaborType,
    #[sea_orm(
        belongs_to = "super::equipment::Entity",
        from = "Column::EquipmentId",
        to = "super::equipment::Column::EquipmentId"
    )]
    Equipment,
}

impl Related<super::labor_type::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::LaborType.def()
    }
}

impl Related<super::equipment::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Equipment.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
