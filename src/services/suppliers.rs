use std::sync::Arc;

use sea_orm::EntityTrait;
use serde::Deserialize;
use tracing::{info, instrument};
use validator::Validate;

use crate::{
    aggregate::{self, SupplierGroup},
    db::DbPool,
    entities::supplier::Entity as Supplier,
    errors::ServiceError,
    proc,
};

#[derive(Debug, Deserialize, Validate)]
pub struct SupplierInput {
    #[validate(length(min = 1, max = 100, message = "Name is required"))]
    pub name: String,
    #[validate(length(min = 1, max = 12, message = "Phone number is required"))]
    pub phone_number: String,
    #[validate(email(message = "A valid email is required"))]
    pub email: String,
    /// Warehouses this supplier stocks from (many-to-many).
    #[serde(default)]
    pub warehouse_ids: Vec<i32>,
}

#[derive(Clone)]
pub struct SupplierService {
    db: Arc<DbPool>,
}

impl SupplierService {
    pub fn new(db: Arc<DbPool>) -> Self {
        Self { db }
    }

    /// Lists suppliers merged across their warehouses: one group per
    /// supplier id, address attributes collected in row order.
    #[instrument(skip(self))]
    pub async fn list(&self) -> Result<Vec<SupplierGroup>, ServiceError> {
        let rows = proc::list_suppliers(&*self.db)
            .await
            .map_err(ServiceError::from_db)?;
        Ok(aggregate::group_suppliers(rows))
    }

    #[instrument(skip(self, input), fields(name = %input.name))]
    pub async fn create(&self, input: SupplierInput) -> Result<(), ServiceError> {
        input.validate()?;
        proc::insert_supplier(
            &*self.db,
            &input.name,
            &input.phone_number,
            &input.email,
            input.warehouse_ids,
        )
        .await
        .map_err(ServiceError::from_db)?;
        info!("supplier created");
        Ok(())
    }

    #[instrument(skip(self, input))]
    pub async fn update(&self, id: i32, input: SupplierInput) -> Result<(), ServiceError> {
        input.validate()?;
        self.ensure_exists(id).await?;
        proc::edit_supplier(
            &*self.db,
            id,
            &input.name,
            &input.phone_number,
            &input.email,
            input.warehouse_ids,
        )
        .await
        .map_err(ServiceError::from_db)?;
        info!(supplier_id = id, "supplier updated");
        Ok(())
    }

    #[instrument(skip(self))]
    pub async fn delete(&self, id: i32) -> Result<(), ServiceError> {
        self.ensure_exists(id).await?;
        proc::delete_supplier(&*self.db, id)
            .await
            .map_err(ServiceError::from_db)?;
        info!(supplier_id = id, "supplier deleted");
        Ok(())
    }

    async fn ensure_exists(&self, id: i32) -> Result<(), ServiceError> {
        Supplier::find_by_id(id)
            .one(&*self.db)
            .await
            .map_err(ServiceError::from_db)?
            .ok_or_else(|| ServiceError::NotFound(format!("supplier {} not found", id)))?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn invalid_email_fails_validation() {
        let input = SupplierInput {
            name: "Acme".into(),
            phone_number: "555-0100".into(),
            email: "not-an-email".into(),
            warehouse_ids: vec![1],
        };
        assert!(input.validate().is_err());
    }

    #[test]
    fn empty_warehouse_selection_is_allowed() {
        let input = SupplierInput {
            name: "Acme".into(),
            phone_number: "555-0100".into(),
            email: "acme@example.com".into(),
            warehouse_ids: vec![],
        };
        assert!(input.validate().is_ok());
    }
}
