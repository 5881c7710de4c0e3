use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// A purchased component batch. `serial_number` is globally unique; only
/// rows with stock > 0 are offerable for equipment assembly.
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "app_components")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub component_id: i32,
    pub component_type_id: i32,
    pub supplier_id: i32,
    pub name: String,
    #[sea_orm(unique)]
    pub serial_number: String,
    pub purchase_date: Date,
    pub purchase_price: Decimal,
    pub stock: i32,
    pub image: Option<String>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::component_type::Entity",
        from = "Column::ComponentTypeId",
        to = "super::component_type::Column::ComponentTypeId"
    )]
    ComponentType,
    #[sea_orm(
        belongs_to = "super::supplier::Entity",
        from = "Column::SupplierId",
        to = "super::supplier::Column::SupplierId"
    )]
    Supplier,
    #[sea_orm(has_many = "super::equipment_component::Entity")]
    EquipmentComponent,
}

impl Related<super::component_type::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::ComponentType.def()
    }
}

impl Related<super::supplier::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Supplier.def()
    }
}

impl Related<super::equipment_component::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::EquipmentComponent.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
