use std::sync::Arc;

use sea_orm::EntityTrait;
use serde::Deserialize;
use tracing::{info, instrument};
use validator::Validate;

use crate::{
    db::DbPool,
    entities::warehouse::Entity as Warehouse,
    errors::ServiceError,
    proc::{self, WarehouseRow},
};

#[derive(Debug, Deserialize, Validate)]
pub struct WarehouseInput {
    #[validate(length(min = 1, max = 50, message = "Address is required"))]
    pub address: String,
    #[validate(length(min = 1, max = 20, message = "City is required"))]
    pub city: String,
    #[validate(length(min = 1, max = 10, message = "Postal code is required"))]
    pub postal_code: String,
    #[validate(length(min = 1, max = 30, message = "Country is required"))]
    pub country: String,
}

#[derive(Clone)]
pub struct WarehouseService {
    db: Arc<DbPool>,
}

impl WarehouseService {
    pub fn new(db: Arc<DbPool>) -> Self {
        Self { db }
    }

    #[instrument(skip(self))]
    pub async fn list(&self) -> Result<Vec<WarehouseRow>, ServiceError> {
        proc::list_warehouses(&*self.db)
            .await
            .map_err(ServiceError::from_db)
    }

    #[instrument(skip(self, input))]
    pub async fn create(&self, input: WarehouseInput) -> Result<(), ServiceError> {
        input.validate()?;
        proc::insert_warehouse(
            &*self.db,
            &input.address,
            &input.city,
            &input.postal_code,
            &input.country,
        )
        .await
        .map_err(ServiceError::from_db)?;
        info!(city = %input.city, "warehouse created");
        Ok(())
    }

    #[instrument(skip(self, input))]
    pub async fn update(&self, id: i32, input: WarehouseInput) -> Result<(), ServiceError> {
        input.validate()?;
        self.ensure_exists(id).await?;
        proc::edit_warehouse(
            &*self.db,
            id,
            &input.address,
            &input.city,
            &input.postal_code,
            &input.country,
        )
        .await
        .map_err(ServiceError::from_db)?;
        info!(warehouse_id = id, "warehouse updated");
        Ok(())
    }

    #[instrument(skip(self))]
    pub async fn delete(&self, id: i32) -> Result<(), ServiceError> {
        self.ensure_exists(id).await?;
        proc::delete_warehouse(&*self.db, id)
            .await
            .map_err(ServiceError::from_db)?;
        info!(warehouse_id = id, "warehouse deleted");
        Ok(())
    }

    async fn ensure_exists(&self, id: i32) -> Result<(), ServiceError> {
        Warehouse::find_by_id(id)
            .one(&*self.db)
            .await
            .map_err(ServiceError::from_db)?
            .ok_or_else(|| ServiceError::NotFound(format!("warehouse {} not found", id)))?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn blank_address_fails_validation() {
        let input = WarehouseInput {
            address: "".into(),
            city: "Porto".into(),
            postal_code: "4000".into(),
            country: "PT".into(),
        };
        assert!(input.validate().is_err());
    }
}
