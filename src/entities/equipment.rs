use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// An assembled piece of equipment. Consumed components hang off the
/// `equipment_component` join; its production record is created atomically
/// with this row by the `insert_equipment` procedure.
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "app_equipments")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub equipment_id: i32,
    pub equipment_type_id: i32,
    pub name: String,
    #[sea_orm(unique)]
    pub serial_number: String,
    pub value: Decimal,
    pub is_available: bool,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::equipment_type::Entity",
        from = "Column::EquipmentTypeId",
        to = "super::equipment_type::Column::EquipmentTypeId"
    )]
    EquipmentType,
    #[sea_orm(has_many = "super::equipment_component::Entity")]
    EquipmentComponent,
    #[sea_orm(has_many = "super::production::Entity")]
    Production,
    #[sea_orm(has_many = "super::order::Entity")]
    Order,
}

impl Related<super::equipment_type::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::EquipmentType.def()
    }
}

impl Related<super::equipment_component::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::EquipmentComponent.def()
    }
}

impl Related<super::production::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Production.def()
    }
}

impl Related<super::order::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Order.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
