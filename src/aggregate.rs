//! Pure merge transforms over already-fetched list rows.
//!
//! Each function makes a single linear pass, keyed by the view's composite
//! identity; output order is the insertion order of each key's first
//! occurrence. No database interaction happens here.

use std::collections::HashMap;

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::Serialize;

use crate::proc::{ComponentRow, EquipmentRow, SupplierRow};

/// A supplier with one list entry per stocked warehouse, in row order.
#[derive(Debug, Clone, Serialize)]
pub struct SupplierGroup {
    pub supplier_id: i32,
    pub name: String,
    pub phone_number: String,
    pub email: String,
    pub addresses: Vec<String>,
    pub cities: Vec<String>,
    pub postal_codes: Vec<String>,
    pub countries: Vec<String>,
}

/// Merges flat supplier x warehouse rows by supplier id. Scalar fields come
/// from the first row of each supplier; address attributes accumulate in
/// input order.
pub fn group_suppliers(rows: Vec<SupplierRow>) -> Vec<SupplierGroup> {
    let mut index: HashMap<i32, usize> = HashMap::new();
    let mut groups: Vec<SupplierGroup> = Vec::new();

    for row in rows {
        match index.get(&row.supplier_id) {
            Some(&i) => {
                let group = &mut groups[i];
                group.addresses.push(row.address);
                group.cities.push(row.city);
                group.postal_codes.push(row.postal_code);
                group.countries.push(row.country);
            }
            None => {
                index.insert(row.supplier_id, groups.len());
                groups.push(SupplierGroup {
                    supplier_id: row.supplier_id,
                    name: row.name,
                    phone_number: row.phone_number,
                    email: row.email,
                    addresses: vec![row.address],
                    cities: vec![row.city],
                    postal_codes: vec![row.postal_code],
                    countries: vec![row.country],
                });
            }
        }
    }
    groups
}

/// A display batch of components sharing `(name, component_type_id)`.
///
/// All contributing row ids are retained so edit and delete always address
/// a concrete row; the merge itself designates no mutable-action target.
#[derive(Debug, Clone, Serialize)]
pub struct ComponentGroup {
    pub name: String,
    pub component_type_id: i32,
    pub type_name: String,
    pub component_ids: Vec<i32>,
    pub serial_numbers: Vec<String>,
    pub purchase_dates: Vec<NaiveDate>,
    pub purchase_prices: Vec<Decimal>,
    pub suppliers: Vec<String>,
    pub stock: i32,
    pub image: Option<String>,
}

/// Merges component rows into batch groups. Rows with stock <= 0 are
/// excluded before grouping; group stock is the sum of contributing rows.
pub fn group_components(rows: Vec<ComponentRow>) -> Vec<ComponentGroup> {
    let mut index: HashMap<(String, i32), usize> = HashMap::new();
    let mut groups: Vec<ComponentGroup> = Vec::new();

    for row in rows.into_iter().filter(|r| r.stock > 0) {
        let key = (row.name.clone(), row.component_type_id);
        match index.get(&key) {
            Some(&i) => {
                let group = &mut groups[i];
                group.component_ids.push(row.component_id);
                group.serial_numbers.push(row.serial_number);
                group.purchase_dates.push(row.purchase_date);
                group.purchase_prices.push(row.purchase_price);
                group.suppliers.push(row.supplier_name);
                group.stock += row.stock;
            }
            None => {
                index.insert(key, groups.len());
                groups.push(ComponentGroup {
                    name: row.name,
                    component_type_id: row.component_type_id,
                    type_name: row.type_name,
                    component_ids: vec![row.component_id],
                    serial_numbers: vec![row.serial_number],
                    purchase_dates: vec![row.purchase_date],
                    purchase_prices: vec![row.purchase_price],
                    suppliers: vec![row.supplier_name],
                    stock: row.stock,
                    image: row.image,
                });
            }
        }
    }
    groups
}

/// An equipment instance with its consumed component names collected.
#[derive(Debug, Clone, Serialize)]
pub struct EquipmentGroup {
    pub equipment_id: i32,
    pub name: String,
    pub serial_number: String,
    pub value: Decimal,
    pub is_available: bool,
    pub type_name: String,
    pub components: Vec<String>,
}

/// Merges equipment x component rows by serial number. Equipment assembled
/// from an empty component set yields one row with a null component name
/// and an empty components list here.
pub fn group_equipment(rows: Vec<EquipmentRow>) -> Vec<EquipmentGroup> {
    let mut index: HashMap<String, usize> = HashMap::new();
    let mut groups: Vec<EquipmentGroup> = Vec::new();

    for row in rows {
        match index.get(&row.serial_number) {
            Some(&i) => {
                if let Some(component) = row.component_name {
                    groups[i].components.push(component);
                }
            }
            None => {
                index.insert(row.serial_number.clone(), groups.len());
                groups.push(EquipmentGroup {
                    equipment_id: row.equipment_id,
                    name: row.name,
                    serial_number: row.serial_number,
                    value: row.value,
                    is_available: row.is_available,
                    type_name: row.type_name,
                    components: row.component_name.into_iter().collect(),
                });
            }
        }
    }
    groups
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal::Decimal;
    use std::str::FromStr;

    fn supplier_row(id: i32, name: &str, address: &str) -> SupplierRow {
        SupplierRow {
            supplier_id: id,
            name: name.to_string(),
            phone_number: "555-0100".to_string(),
            email: format!("{}@example.com", name),
            address: address.to_string(),
            city: "Porto".to_string(),
            postal_code: "4000".to_string(),
            country: "PT".to_string(),
        }
    }

    fn component_row(id: i32, name: &str, type_id: i32, serial: &str, stock: i32) -> ComponentRow {
        ComponentRow {
            component_id: id,
            component_type_id: type_id,
            supplier_id: 1,
            name: name.to_string(),
            serial_number: serial.to_string(),
            purchase_date: NaiveDate::from_ymd_opt(2024, 3, 1).unwrap(),
            purchase_price: Decimal::from_str("19.90").unwrap(),
            stock,
            image: None,
            supplier_name: "Acme".to_string(),
            type_name: "Resistor".to_string(),
        }
    }

    fn equipment_row(id: i32, serial: &str, component: Option<&str>) -> EquipmentRow {
        EquipmentRow {
            equipment_id: id,
            name: "Press".to_string(),
            serial_number: serial.to_string(),
            value: Decimal::from_str("1200.00").unwrap(),
            is_available: true,
            type_name: "Hydraulic".to_string(),
            component_name: component.map(str::to_string),
        }
    }

    #[test]
    fn supplier_rows_sharing_id_merge_into_one_group() {
        let rows = vec![
            supplier_row(1, "Acme", "Rua A"),
            supplier_row(2, "Globex", "Rua B"),
            supplier_row(1, "Acme", "Rua C"),
            supplier_row(1, "Acme", "Rua D"),
        ];
        let groups = group_suppliers(rows);

        assert_eq!(groups.len(), 2);
        assert_eq!(groups[0].supplier_id, 1);
        assert_eq!(groups[0].addresses, vec!["Rua A", "Rua C", "Rua D"]);
        assert_eq!(groups[0].cities.len(), 3);
        assert_eq!(groups[0].postal_codes.len(), 3);
        assert_eq!(groups[0].countries.len(), 3);
        assert_eq!(groups[1].supplier_id, 2);
        assert_eq!(groups[1].addresses, vec!["Rua B"]);
    }

    #[test]
    fn supplier_output_preserves_first_occurrence_order() {
        let rows = vec![
            supplier_row(7, "C", "x"),
            supplier_row(3, "A", "y"),
            supplier_row(7, "C", "z"),
            supplier_row(5, "B", "w"),
        ];
        let ids: Vec<i32> = group_suppliers(rows).iter().map(|g| g.supplier_id).collect();
        assert_eq!(ids, vec![7, 3, 5]);
    }

    #[test]
    fn components_with_zero_stock_are_excluded() {
        let rows = vec![
            component_row(1, "bolt", 1, "S-1", 3),
            component_row(2, "bolt", 1, "S-2", 0),
            component_row(3, "washer", 1, "S-3", -1),
        ];
        let groups = group_components(rows);

        assert_eq!(groups.len(), 1);
        assert_eq!(groups[0].name, "bolt");
        assert_eq!(groups[0].serial_numbers, vec!["S-1"]);
    }

    #[test]
    fn component_group_sums_stock_and_collects_rows() {
        let rows = vec![
            component_row(1, "bolt", 1, "S-1", 3),
            component_row(2, "bolt", 1, "S-2", 4),
            component_row(3, "bolt", 2, "S-3", 9),
        ];
        let groups = group_components(rows);

        assert_eq!(groups.len(), 2);
        let bolts_t1 = &groups[0];
        assert_eq!(bolts_t1.stock, 7);
        assert_eq!(bolts_t1.component_ids, vec![1, 2]);
        assert_eq!(bolts_t1.serial_numbers, vec!["S-1", "S-2"]);
        assert_eq!(bolts_t1.purchase_prices.len(), 2);
        assert_eq!(bolts_t1.suppliers.len(), 2);
        // Same name, different type: separate group
        assert_eq!(groups[1].component_type_id, 2);
        assert_eq!(groups[1].stock, 9);
    }

    #[test]
    fn equipment_groups_by_serial_collecting_component_names() {
        let rows = vec![
            equipment_row(10, "EQ-1", Some("bolt")),
            equipment_row(10, "EQ-1", Some("panel")),
            equipment_row(11, "EQ-2", None),
        ];
        let groups = group_equipment(rows);

        assert_eq!(groups.len(), 2);
        assert_eq!(groups[0].components, vec!["bolt", "panel"]);
        assert!(groups[1].components.is_empty());
    }
}
