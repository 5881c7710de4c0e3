use std::sync::Arc;

use sea_orm::{ColumnTrait, EntityTrait, QueryFilter, TransactionTrait};
use serde::Serialize;
use serde_json::{Map, Value as JsonValue};
use tracing::{info, instrument};
use uuid::Uuid;

use crate::{
    db::DbPool,
    entities::equipment::Entity as Equipment,
    entities::production::{self, Entity as Production},
    errors::ServiceError,
    outbox,
};

/// Reserved key carrying the equipment id inside the Sales document.
pub const EQUIPMENT_ID_KEY: &str = "_equipment_id";

/// Parses a production description of comma-separated `key: value` pairs.
///
/// Every segment must contain exactly one `:`; a malformed segment is an
/// explicit parse error rather than a skipped entry, so a bad description
/// is caught before any order is written.
pub fn parse_production_description(
    description: &str,
) -> Result<Map<String, JsonValue>, ServiceError> {
    let mut fields = Map::new();
    for segment in description.split(',') {
        let segment = segment.trim();
        if segment.matches(':').count() != 1 {
            return Err(ServiceError::ValidationError(format!(
                "malformed production description segment '{}': expected exactly one 'key: value' pair",
                segment
            )));
        }
        let (name, value) = segment.split_once(':').expect("segment contains a colon");
        fields.insert(
            name.trim().to_string(),
            JsonValue::String(value.trim().to_string()),
        );
    }
    Ok(fields)
}

/// Outcome of a successful order: the relational write committed and the
/// Sales document is staged under `outbox_id` for delivery.
#[derive(Debug, Serialize)]
pub struct PlacedOrder {
    pub equipment_id: i32,
    pub outbox_id: Uuid,
}

#[derive(Clone)]
pub struct OrderService {
    db: Arc<DbPool>,
}

impl OrderService {
    pub fn new(db: Arc<DbPool>) -> Self {
        Self { db }
    }

    /// Orders an equipment instance for a user.
    ///
    /// The `order_equipment` procedure call and the staged Sales document
    /// share one transaction; delivery to the document store is the outbox
    /// worker's job, so this workflow never blocks on (or fails with) the
    /// secondary store.
    #[instrument(skip(self))]
    pub async fn place(&self, equipment_id: i32, user_id: i32) -> Result<PlacedOrder, ServiceError> {
        Equipment::find_by_id(equipment_id)
            .one(&*self.db)
            .await
            .map_err(ServiceError::from_db)?
            .ok_or_else(|| ServiceError::NotFound(format!("equipment {} not found", equipment_id)))?;

        let production_record = Production::find()
            .filter(production::Column::EquipmentId.eq(equipment_id))
            .one(&*self.db)
            .await
            .map_err(ServiceError::from_db)?
            .ok_or_else(|| {
                ServiceError::NotFound(format!("production for equipment {} not found", equipment_id))
            })?;

        let mut sale = parse_production_description(&production_record.description)?;
        sale.insert(EQUIPMENT_ID_KEY.to_string(), JsonValue::from(equipment_id));

        let txn = self.db.begin().await.map_err(ServiceError::from_db)?;
        crate::proc::order_equipment(&txn, equipment_id, user_id)
            .await
            .map_err(ServiceError::from_db)?;
        let outbox_id = outbox::enqueue(&txn, equipment_id, JsonValue::Object(sale))
            .await
            .map_err(ServiceError::from_db)?;
        txn.commit().await.map_err(ServiceError::from_db)?;

        info!(equipment_id, user_id, %outbox_id, "equipment ordered");
        Ok(PlacedOrder {
            equipment_id,
            outbox_id,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn parses_comma_separated_pairs() {
        let fields = parse_production_description("color: red, size: large").unwrap();
        assert_eq!(fields.len(), 2);
        assert_eq!(fields["color"], json!("red"));
        assert_eq!(fields["size"], json!("large"));
    }

    #[test]
    fn trims_whitespace_around_keys_and_values() {
        let fields = parse_production_description("  finish :  matte ").unwrap();
        assert_eq!(fields["finish"], json!("matte"));
    }

    #[test]
    fn segment_without_colon_is_a_parse_error() {
        let err = parse_production_description("nocolon").unwrap_err();
        assert!(matches!(err, ServiceError::ValidationError(_)));
        assert!(err.to_string().contains("nocolon"));
    }

    #[test]
    fn segment_with_two_colons_is_a_parse_error() {
        assert!(parse_production_description("time: 10:30").is_err());
    }

    #[test]
    fn trailing_comma_is_a_parse_error() {
        assert!(parse_production_description("color: red,").is_err());
    }

    #[test]
    fn empty_description_is_a_parse_error() {
        assert!(parse_production_description("").is_err());
    }

    #[test]
    fn later_duplicate_key_wins() {
        let fields = parse_production_description("size: s, size: xl").unwrap();
        assert_eq!(fields.len(), 1);
        assert_eq!(fields["size"], json!("xl"));
    }
}
