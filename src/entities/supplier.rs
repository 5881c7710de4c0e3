use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "app_supplier")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub supplier_id: i32,
    pub name: String,
    pub phone_number: String,
    pub email: String,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::supplier_warehouse::Entity")]
    SupplierWarehouse,
    #[sea_orm(has_many = "super::component::Entity")]
    Component,
}

impl Related<super::supplier_warehouse::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::SupplierWarehouse.def()
    }
}

impl Related<super::component::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Component.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
