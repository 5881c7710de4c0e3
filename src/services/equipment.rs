use std::sync::Arc;

use chrono::NaiveDateTime;
use rust_decimal::Decimal;
use sea_orm::{ColumnTrait, EntityTrait, QueryFilter, TransactionTrait};
use serde::Deserialize;
use tracing::{info, instrument};
use validator::Validate;

use crate::{
    aggregate::{self, EquipmentGroup},
    db::DbPool,
    entities::equipment::Entity as Equipment,
    entities::production::{self, Entity as Production},
    errors::ServiceError,
    proc::{self, ComponentRow},
};

/// Fixed form timestamp format for production start/end.
pub const PRODUCTION_TIMESTAMP_FORMAT: &str = "%Y-%m-%dT%H:%M";

pub fn parse_production_timestamp(value: &str) -> Result<NaiveDateTime, ServiceError> {
    NaiveDateTime::parse_from_str(value, PRODUCTION_TIMESTAMP_FORMAT).map_err(|_| {
        ServiceError::ValidationError(format!(
            "timestamp '{}' does not match {}",
            value, PRODUCTION_TIMESTAMP_FORMAT
        ))
    })
}

/// Assembly request. An absent component selection deserializes to the
/// explicit empty list; every other field is required.
#[derive(Debug, Deserialize, Validate)]
pub struct AssembleEquipmentRequest {
    pub equipment_type_id: i32,
    #[validate(length(min = 1, max = 50, message = "Name is required"))]
    pub name: String,
    #[validate(length(min = 1, max = 100, message = "Serial number is required"))]
    pub serial_number: String,
    pub value: Decimal,
    #[serde(default = "default_true")]
    pub is_available: bool,
    #[serde(default)]
    pub component_ids: Vec<i32>,
    #[validate(length(min = 1, message = "Production description is required"))]
    pub production_description: String,
    /// `YYYY-MM-DDTHH:MM`
    #[validate(length(min = 1, message = "Production start is required"))]
    pub production_start: String,
    /// Optional, same format
    pub production_end: Option<String>,
    pub labor_type_id: i32,
}

fn default_true() -> bool {
    true
}

#[derive(Debug, Deserialize, Validate)]
pub struct EditEquipmentRequest {
    #[validate(length(min = 1, max = 50, message = "Name is required"))]
    pub name: String,
    pub value: Decimal,
    #[serde(default)]
    pub component_ids: Vec<i32>,
}

#[derive(Debug, Deserialize, Validate)]
pub struct EditProductionRequest {
    #[validate(length(min = 1, message = "Description is required"))]
    pub description: String,
    #[validate(length(min = 1, message = "Production start is required"))]
    pub production_start: String,
    pub production_end: Option<String>,
    pub labor_type_id: i32,
}

#[derive(Clone)]
pub struct EquipmentService {
    db: Arc<DbPool>,
}

impl EquipmentService {
    pub fn new(db: Arc<DbPool>) -> Self {
        Self { db }
    }

    /// Lists equipment merged by serial number with consumed component
    /// names collected per instance.
    #[instrument(skip(self))]
    pub async fn list(&self) -> Result<Vec<EquipmentGroup>, ServiceError> {
        let rows = proc::list_equipments(&*self.db)
            .await
            .map_err(ServiceError::from_db)?;
        Ok(aggregate::group_equipment(rows))
    }

    /// The component set offerable on the assembly form: in-stock rows
    /// only. Stock races after this snapshot are resolved by the
    /// procedure's own locking.
    #[instrument(skip(self))]
    pub async fn eligible_components(&self) -> Result<Vec<ComponentRow>, ServiceError> {
        let rows = proc::list_components(&*self.db)
            .await
            .map_err(ServiceError::from_db)?;
        Ok(rows.into_iter().filter(|row| row.stock > 0).collect())
    }

    /// Assembles equipment: equipment row, production record, component
    /// association and stock decrement commit or roll back as one unit.
    #[instrument(skip(self, request), fields(serial_number = %request.serial_number))]
    pub async fn assemble(&self, request: AssembleEquipmentRequest) -> Result<(), ServiceError> {
        request.validate()?;
        let production_start = parse_production_timestamp(&request.production_start)?;
        let production_end = request
            .production_end
            .as_deref()
            .filter(|value| !value.is_empty())
            .map(parse_production_timestamp)
            .transpose()?;

        let txn = self.db.begin().await.map_err(ServiceError::from_db)?;
        proc::insert_equipment(
            &txn,
            request.equipment_type_id,
            &request.name,
            &request.serial_number,
            request.value,
            request.is_available,
            request.component_ids,
            &request.production_description,
            production_start,
            production_end,
            request.labor_type_id,
        )
        .await
        .map_err(ServiceError::from_db)?;
        txn.commit().await.map_err(ServiceError::from_db)?;

        info!("equipment assembled");
        Ok(())
    }

    #[instrument(skip(self, request))]
    pub async fn update(&self, id: i32, request: EditEquipmentRequest) -> Result<(), ServiceError> {
        request.validate()?;
        self.ensure_exists(id).await?;
        proc::edit_equipment(&*self.db, id, &request.name, request.value, request.component_ids)
            .await
            .map_err(ServiceError::from_db)?;
        info!(equipment_id = id, "equipment updated");
        Ok(())
    }

    /// Edits the production record attached to an equipment instance. The
    /// procedure is addressed by equipment id, matching its existing
    /// signature.
    #[instrument(skip(self, request))]
    pub async fn update_production(
        &self,
        equipment_id: i32,
        request: EditProductionRequest,
    ) -> Result<(), ServiceError> {
        request.validate()?;
        Production::find()
            .filter(production::Column::EquipmentId.eq(equipment_id))
            .one(&*self.db)
            .await
            .map_err(ServiceError::from_db)?
            .ok_or_else(|| {
                ServiceError::NotFound(format!("production for equipment {} not found", equipment_id))
            })?;

        let production_start = parse_production_timestamp(&request.production_start)?;
        let production_end = request
            .production_end
            .as_deref()
            .filter(|value| !value.is_empty())
            .map(parse_production_timestamp)
            .transpose()?;

        proc::edit_production(
            &*self.db,
            equipment_id,
            &request.description,
            production_start,
            production_end,
            request.labor_type_id,
        )
        .await
        .map_err(ServiceError::from_db)?;
        info!(equipment_id, "production updated");
        Ok(())
    }

    #[instrument(skip(self))]
    pub async fn delete(&self, id: i32) -> Result<(), ServiceError> {
        self.ensure_exists(id).await?;
        proc::delete_equipment(&*self.db, id)
            .await
            .map_err(ServiceError::from_db)?;
        info!(equipment_id = id, "equipment deleted");
        Ok(())
    }

    async fn ensure_exists(&self, id: i32) -> Result<(), ServiceError> {
        Equipment::find_by_id(id)
            .one(&*self.db)
            .await
            .map_err(ServiceError::from_db)?
            .ok_or_else(|| ServiceError::NotFound(format!("equipment {} not found", id)))?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{NaiveDate, Timelike};

    #[test]
    fn parses_fixed_form_timestamp() {
        let parsed = parse_production_timestamp("2024-03-01T14:30").unwrap();
        assert_eq!(parsed.date(), NaiveDate::from_ymd_opt(2024, 3, 1).unwrap());
        assert_eq!(parsed.hour(), 14);
        assert_eq!(parsed.minute(), 30);
    }

    #[test]
    fn rejects_timestamps_with_seconds_or_garbage() {
        assert!(parse_production_timestamp("2024-03-01T14:30:00").is_err());
        assert!(parse_production_timestamp("yesterday").is_err());
        assert!(parse_production_timestamp("").is_err());
    }

    #[test]
    fn missing_component_selection_defaults_to_empty() {
        let request: AssembleEquipmentRequest = serde_json::from_value(serde_json::json!({
            "equipment_type_id": 1,
            "name": "Press",
            "serial_number": "EQ-1",
            "value": "1200.00",
            "production_description": "color: red",
            "production_start": "2024-03-01T08:00",
            "labor_type_id": 2
        }))
        .unwrap();
        assert!(request.component_ids.is_empty());
        assert!(request.is_available);
        assert!(request.validate().is_ok());
    }

    #[test]
    fn blank_description_fails_validation() {
        let request = AssembleEquipmentRequest {
            equipment_type_id: 1,
            name: "Press".into(),
            serial_number: "EQ-1".into(),
            value: Decimal::new(120000, 2),
            is_available: true,
            component_ids: vec![],
            production_description: "".into(),
            production_start: "2024-03-01T08:00".into(),
            production_end: None,
            labor_type_id: 2,
        };
        assert!(request.validate().is_err());
    }
}
