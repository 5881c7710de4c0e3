pub mod component_types;
pub mod components;
pub mod equipment;
pub mod equipment_types;
pub mod labor_types;
pub mod orders;
pub mod shipping_guides;
pub mod suppliers;
pub mod warehouses;
