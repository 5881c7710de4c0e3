pub mod component;
pub mod component_type;
pub mod equipment;
pub mod equipment_component;
pub mod equipment_type;
pub mod labor_type;
pub mod order;
pub mod production;
pub mod sales_outbox;
pub mod shipping_guide;
pub mod supplier;
pub mod supplier_warehouse;
pub mod warehouse;
