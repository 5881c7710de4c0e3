use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "app_warehouse")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub warehouse_id: i32,
    pub address: String,
    pub city: String,
    pub postal_code: String,
    pub country: String,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::supplier_warehouse::Entity")]
    SupplierWarehouse,
}

impl Related<super::supplier_warehouse::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::SupplierWarehouse.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
