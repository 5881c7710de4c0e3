pub mod common;
pub mod component_types;
pub mod components;
pub mod equipment;
pub mod equipment_types;
pub mod labor_types;
pub mod outbox;
pub mod shipping_guides;
pub mod suppliers;
pub mod warehouses;

use std::sync::Arc;

use crate::db::DbPool;
use crate::services::{
    component_types::ComponentTypeService, components::ComponentService,
    equipment::EquipmentService, equipment_types::EquipmentTypeService,
    labor_types::LaborTypeService, orders::OrderService, shipping_guides::ShippingGuideService,
    suppliers::SupplierService, warehouses::WarehouseService,
};

/// All application services, constructed once over a shared pool and
/// cloned into handlers through [`crate::AppState`].
#[derive(Clone)]
pub struct AppServices {
    pub warehouses: WarehouseService,
    pub suppliers: SupplierService,
    pub component_types: ComponentTypeService,
    pub components: ComponentService,
    pub equipment_types: EquipmentTypeService,
    pub labor_types: LaborTypeService,
    pub equipment: EquipmentService,
    pub orders: OrderService,
    pub shipping_guides: ShippingGuideService,
}

impl AppServices {
    pub fn new(db: Arc<DbPool>) -> Self {
        Self {
            warehouses: WarehouseService::new(db.clone()),
            suppliers: SupplierService::new(db.clone()),
            component_types: ComponentTypeService::new(db.clone()),
            components: ComponentService::new(db.clone()),
            equipment_types: EquipmentTypeService::new(db.clone()),
            labor_types: LaborTypeService::new(db.clone()),
            equipment: EquipmentService::new(db.clone()),
            orders: OrderService::new(db.clone()),
            shipping_guides: ShippingGuideService::new(db),
        }
    }
}
