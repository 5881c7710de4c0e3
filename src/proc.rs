//! Data access layer over the fixed server-side procedure contract.
//!
//! Every write goes through a named procedure with positional binds; every
//! list view reads from a named set-returning function. Procedure names and
//! argument order are an external compatibility contract and must not
//! change. No business logic lives here.

use chrono::{NaiveDate, NaiveDateTime};
use rust_decimal::Decimal;
use sea_orm::{ConnectionTrait, DbBackend, DbErr, FromQueryResult, JsonValue, Statement, Value};
use serde::Serialize;

fn stmt(sql: &str, values: Vec<Value>) -> Statement {
    Statement::from_sql_and_values(DbBackend::Postgres, sql, values)
}

async fn call<C: ConnectionTrait>(db: &C, sql: &str, values: Vec<Value>) -> Result<(), DbErr> {
    db.execute(stmt(sql, values)).await?;
    Ok(())
}

async fn fetch_all<C, R>(db: &C, sql: &str) -> Result<Vec<R>, DbErr>
where
    C: ConnectionTrait,
    R: FromQueryResult,
{
    let rows = db
        .query_all(Statement::from_string(DbBackend::Postgres, sql))
        .await?;
    rows.iter().map(|row| R::from_query_result(row, "")).collect()
}

// ---------------------------------------------------------------------------
// Row shapes returned by the list functions
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, FromQueryResult)]
pub struct WarehouseRow {
    pub warehouse_id: i32,
    pub address: String,
    pub city: String,
    pub postal_code: String,
    pub country: String,
}

/// One row per supplier x stocked warehouse; the aggregation layer merges
/// rows sharing `supplier_id`.
#[derive(Debug, Clone, Serialize, FromQueryResult)]
pub struct SupplierRow {
    pub supplier_id: i32,
    pub name: String,
    pub phone_number: String,
    pub email: String,
    pub address: String,
    pub city: String,
    pub postal_code: String,
    pub country: String,
}

#[derive(Debug, Clone, Serialize, FromQueryResult)]
pub struct ComponentTypeRow {
    pub component_type_id: i32,
    pub type_name: String,
    pub description: String,
}

/// Flat component row with supplier and type names joined in by the
/// `list_components` function.
#[derive(Debug, Clone, Serialize, FromQueryResult)]
pub struct ComponentRow {
    pub component_id: i32,
    pub component_type_id: i32,
    pub supplier_id: i32,
    pub name: String,
    pub serial_number: String,
    pub purchase_date: NaiveDate,
    pub purchase_price: Decimal,
    pub stock: i32,
    pub image: Option<String>,
    pub supplier_name: String,
    pub type_name: String,
}

#[derive(Debug, Clone, Serialize, FromQueryResult)]
pub struct EquipmentTypeRow {
    pub equipment_type_id: i32,
    pub type_name: String,
    pub description: String,
}

#[derive(Debug, Clone, Serialize, FromQueryResult)]
pub struct LaborTypeRow {
    pub labor_type_id: i32,
    pub labor_name: String,
    pub value: i32,
}

/// One row per equipment x consumed component; `component_name` is null
/// for equipment assembled from an empty component set.
#[derive(Debug, Clone, Serialize, FromQueryResult)]
pub struct EquipmentRow {
    pub equipment_id: i32,
    pub name: String,
    pub serial_number: String,
    pub value: Decimal,
    pub is_available: bool,
    pub type_name: String,
    pub component_name: Option<String>,
}

#[derive(Debug, Clone, Serialize, FromQueryResult)]
pub struct ShippingGuideRow {
    pub guide_id: i32,
    pub shipping_date: Option<NaiveDateTime>,
    pub delivery_date: Option<NaiveDateTime>,
}

// ---------------------------------------------------------------------------
// Warehouses
// ---------------------------------------------------------------------------

pub async fn list_warehouses<C: ConnectionTrait>(db: &C) -> Result<Vec<WarehouseRow>, DbErr> {
    fetch_all(db, "SELECT * FROM list_warehouses()").await
}

pub async fn insert_warehouse<C: ConnectionTrait>(
    db: &C,
    address: &str,
    city: &str,
    postal_code: &str,
    country: &str,
) -> Result<(), DbErr> {
    call(
        db,
        "CALL insert_warehouse($1, $2, $3, $4)",
        vec![address.into(), city.into(), postal_code.into(), country.into()],
    )
    .await
}

pub async fn edit_warehouse<C: ConnectionTrait>(
    db: &C,
    id: i32,
    address: &str,
    city: &str,
    postal_code: &str,
    country: &str,
) -> Result<(), DbErr> {
    call(
        db,
        "CALL edit_warehouse($1, $2, $3, $4, $5)",
        vec![
            id.into(),
            address.into(),
            city.into(),
            postal_code.into(),
            country.into(),
        ],
    )
    .await
}

pub async fn delete_warehouse<C: ConnectionTrait>(db: &C, id: i32) -> Result<(), DbErr> {
    call(db, "CALL delete_warehouse($1)", vec![id.into()]).await
}

// ---------------------------------------------------------------------------
// Suppliers
// ---------------------------------------------------------------------------

pub async fn list_suppliers<C: ConnectionTrait>(db: &C) -> Result<Vec<SupplierRow>, DbErr> {
    fetch_all(db, "SELECT * FROM list_suppliers()").await
}

pub async fn insert_supplier<C: ConnectionTrait>(
    db: &C,
    name: &str,
    phone_number: &str,
    email: &str,
    warehouse_ids: Vec<i32>,
) -> Result<(), DbErr> {
    call(
        db,
        "CALL insert_supplier($1, $2, $3, $4::integer[])",
        vec![
            name.into(),
            phone_number.into(),
            email.into(),
            warehouse_ids.into(),
        ],
    )
    .await
}

pub async fn edit_supplier<C: ConnectionTrait>(
    db: &C,
    id: i32,
    name: &str,
    phone_number: &str,
    email: &str,
    warehouse_ids: Vec<i32>,
) -> Result<(), DbErr> {
    call(
        db,
        "CALL edit_supplier($1, $2, $3, $4, $5::integer[])",
        vec![
            id.into(),
            name.into(),
            phone_number.into(),
            email.into(),
            warehouse_ids.into(),
        ],
    )
    .await
}

pub async fn delete_supplier<C: ConnectionTrait>(db: &C, id: i32) -> Result<(), DbErr> {
    call(db, "CALL delete_supplier($1)", vec![id.into()]).await
}

// ---------------------------------------------------------------------------
// Component types
// ---------------------------------------------------------------------------

pub async fn list_component_types<C: ConnectionTrait>(
    db: &C,
) -> Result<Vec<ComponentTypeRow>, DbErr> {
    fetch_all(db, "SELECT * FROM list_component_types()").await
}

pub async fn insert_component_type<C: ConnectionTrait>(
    db: &C,
    type_name: &str,
    description: &str,
) -> Result<(), DbErr> {
    call(
        db,
        "CALL insert_component_type($1, $2)",
        vec![type_name.into(), description.into()],
    )
    .await
}

pub async fn edit_component_type<C: ConnectionTrait>(
    db: &C,
    id: i32,
    type_name: &str,
    description: &str,
) -> Result<(), DbErr> {
    call(
        db,
        "CALL edit_component_type($1, $2, $3)",
        vec![id.into(), type_name.into(), description.into()],
    )
    .await
}

pub async fn delete_component_type<C: ConnectionTrait>(db: &C, id: i32) -> Result<(), DbErr> {
    call(db, "CALL delete_component_type($1)", vec![id.into()]).await
}

// ---------------------------------------------------------------------------
// Components
// ---------------------------------------------------------------------------

pub async fn list_components<C: ConnectionTrait>(db: &C) -> Result<Vec<ComponentRow>, DbErr> {
    fetch_all(db, "SELECT * FROM list_components()").await
}

#[allow(clippy::too_many_arguments)]
pub async fn insert_component<C: ConnectionTrait>(
    db: &C,
    component_type_id: i32,
    supplier_id: i32,
    name: &str,
    serial_number: &str,
    purchase_date: NaiveDate,
    purchase_price: Decimal,
    image: Option<&str>,
) -> Result<(), DbErr> {
    call(
        db,
        "CALL insert_component($1, $2, $3, $4, $5, $6, $7)",
        vec![
            component_type_id.into(),
            supplier_id.into(),
            name.into(),
            serial_number.into(),
            purchase_date.into(),
            purchase_price.into(),
            image.into(),
        ],
    )
    .await
}

#[allow(clippy::too_many_arguments)]
pub async fn edit_component<C: ConnectionTrait>(
    db: &C,
    id: i32,
    component_type_id: i32,
    supplier_id: i32,
    name: &str,
    serial_number: &str,
    purchase_date: NaiveDate,
    purchase_price: Decimal,
    image: Option<&str>,
) -> Result<(), DbErr> {
    call(
        db,
        "CALL edit_component($1, $2, $3, $4, $5, $6, $7, $8)",
        vec![
            id.into(),
            component_type_id.into(),
            supplier_id.into(),
            name.into(),
            serial_number.into(),
            purchase_date.into(),
            purchase_price.into(),
            image.into(),
        ],
    )
    .await
}

pub async fn delete_component<C: ConnectionTrait>(db: &C, id: i32) -> Result<(), DbErr> {
    call(db, "CALL delete_component($1)", vec![id.into()]).await
}

// ---------------------------------------------------------------------------
// Equipment types
// ---------------------------------------------------------------------------

pub async fn list_equipment_types<C: ConnectionTrait>(
    db: &C,
) -> Result<Vec<EquipmentTypeRow>, DbErr> {
    fetch_all(db, "SELECT * FROM list_equipment_types()").await
}

pub async fn insert_equipment_type<C: ConnectionTrait>(
    db: &C,
    type_name: &str,
    description: &str,
) -> Result<(), DbErr> {
    call(
        db,
        "CALL insert_equipment_type($1, $2)",
        vec![type_name.into(), description.into()],
    )
    .await
}

pub async fn edit_equipment_type<C: ConnectionTrait>(
    db: &C,
    id: i32,
    type_name: &str,
    description: &str,
) -> Result<(), DbErr> {
    call(
        db,
        "CALL edit_equipment_type($1, $2, $3)",
        vec![id.into(), type_name.into(), description.into()],
    )
    .await
}

pub async fn delete_equipment_type<C: ConnectionTrait>(db: &C, id: i32) -> Result<(), DbErr> {
    call(db, "CALL delete_equipment_type($1)", vec![id.into()]).await
}

// ---------------------------------------------------------------------------
// Labor types
// ---------------------------------------------------------------------------

pub async fn list_labor_types<C: ConnectionTrait>(db: &C) -> Result<Vec<LaborTypeRow>, DbErr> {
    fetch_all(db, "SELECT * FROM list_labor_types()").await
}

pub async fn insert_labor_type<C: ConnectionTrait>(
    db: &C,
    labor_name: &str,
    value: i32,
) -> Result<(), DbErr> {
    call(
        db,
        "CALL insert_labor_type($1, $2)",
        vec![labor_name.into(), value.into()],
    )
    .await
}

pub async fn edit_labor_type<C: ConnectionTrait>(
    db: &C,
    id: i32,
    labor_name: &str,
    value: i32,
) -> Result<(), DbErr> {
    call(
        db,
        "CALL edit_labor_type($1, $2, $3)",
        vec![id.into(), labor_name.into(), value.into()],
    )
    .await
}

pub async fn delete_labor_type<C: ConnectionTrait>(db: &C, id: i32) -> Result<(), DbErr> {
    call(db, "CALL delete_labor_type($1)", vec![id.into()]).await
}

// ---------------------------------------------------------------------------
// Equipment, production, orders
// ---------------------------------------------------------------------------

pub async fn list_equipments<C: ConnectionTrait>(db: &C) -> Result<Vec<EquipmentRow>, DbErr> {
    fetch_all(db, "SELECT * FROM list_equipments()").await
}

/// Atomic assembly: equipment row, production row, component association
/// and stock effects are one unit inside the procedure.
#[allow(clippy::too_many_arguments)]
pub async fn insert_equipment<C: ConnectionTrait>(
    db: &C,
    equipment_type_id: i32,
    name: &str,
    serial_number: &str,
    value: Decimal,
    is_available: bool,
    component_ids: Vec<i32>,
    production_description: &str,
    production_start: NaiveDateTime,
    production_end: Option<NaiveDateTime>,
    labor_type_id: i32,
) -> Result<(), DbErr> {
    call(
        db,
        "CALL insert_equipment($1, $2, $3, $4, $5, $6::integer[], $7, $8, $9, $10)",
        vec![
            equipment_type_id.into(),
            name.into(),
            serial_number.into(),
            value.into(),
            is_available.into(),
            component_ids.into(),
            production_description.into(),
            production_start.into(),
            production_end.into(),
            labor_type_id.into(),
        ],
    )
    .await
}

pub async fn edit_equipment<C: ConnectionTrait>(
    db: &C,
    id: i32,
    name: &str,
    value: Decimal,
    component_ids: Vec<i32>,
) -> Result<(), DbErr> {
    call(
        db,
        "CALL edit_equipment($1, $2, $3, $4::integer[])",
        vec![id.into(), name.into(), value.into(), component_ids.into()],
    )
    .await
}

pub async fn edit_production<C: ConnectionTrait>(
    db: &C,
    id: i32,
    description: &str,
    production_start: NaiveDateTime,
    production_end: Option<NaiveDateTime>,
    labor_type_id: i32,
) -> Result<(), DbErr> {
    call(
        db,
        "CALL edit_production($1, $2, $3, $4, $5)",
        vec![
            id.into(),
            description.into(),
            production_start.into(),
            production_end.into(),
            labor_type_id.into(),
        ],
    )
    .await
}

pub async fn delete_equipment<C: ConnectionTrait>(db: &C, id: i32) -> Result<(), DbErr> {
    call(db, "CALL delete_equipment($1)", vec![id.into()]).await
}

/// Creates the order row, flips availability / decrements stock (opaque to
/// this layer) and creates the default shipping guide.
pub async fn order_equipment<C: ConnectionTrait>(
    db: &C,
    equipment_id: i32,
    user_id: i32,
) -> Result<(), DbErr> {
    call(
        db,
        "CALL order_equipment($1, $2)",
        vec![equipment_id.into(), user_id.into()],
    )
    .await
}

// ---------------------------------------------------------------------------
// Shipping guides
// ---------------------------------------------------------------------------

pub async fn list_shipping_guides<C: ConnectionTrait>(
    db: &C,
) -> Result<Vec<ShippingGuideRow>, DbErr> {
    fetch_all(db, "SELECT * FROM list_shipping_guides()").await
}

/// Positional order (dates first, id last) follows the existing procedure
/// signature.
pub async fn edit_shipping_guide<C: ConnectionTrait>(
    db: &C,
    shipping_date: Option<NaiveDateTime>,
    delivery_date: Option<NaiveDateTime>,
    id: i32,
) -> Result<(), DbErr> {
    call(
        db,
        "CALL edit_shipping_guide($1, $2, $3)",
        vec![shipping_date.into(), delivery_date.into(), id.into()],
    )
    .await
}

// ---------------------------------------------------------------------------
// Bulk import/export
// ---------------------------------------------------------------------------

pub async fn export_component_info<C: ConnectionTrait>(
    db: &C,
) -> Result<Option<JsonValue>, DbErr> {
    let row = db
        .query_one(Statement::from_string(
            DbBackend::Postgres,
            "SELECT export_component_info()",
        ))
        .await?;
    match row {
        Some(row) => {
            let value: Option<JsonValue> = row.try_get_by_index(0)?;
            Ok(value)
        }
        None => Ok(None),
    }
}

pub async fn import_component_info<C: ConnectionTrait>(db: &C, json: &str) -> Result<(), DbErr> {
    db.query_one(stmt(
        "SELECT import_component_info($1)",
        vec![json.into()],
    ))
    .await?;
    Ok(())
}
