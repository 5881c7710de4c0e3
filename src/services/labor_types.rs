use std::sync::Arc;

use sea_orm::EntityTrait;
use serde::Deserialize;
use tracing::{info, instrument};
use validator::Validate;

use crate::{
    db::DbPool,
    entities::labor_type::Entity as LaborType,
    errors::ServiceError,
    proc::{self, LaborTypeRow},
};

/// `labor_name` is unique in the store; a duplicate surfaces as a
/// `DuplicateKey` conflict rather than being swallowed.
#[derive(Debug, Deserialize, Validate)]
pub struct LaborTypeInput {
    #[validate(length(min = 1, max = 30, message = "Labor name is required"))]
    pub labor_name: String,
    #[validate(range(min = 0, message = "Rate must be non-negative"))]
    pub value: i32,
}

#[derive(Clone)]
pub struct LaborTypeService {
    db: Arc<DbPool>,
}

impl LaborTypeService {
    pub fn new(db: Arc<DbPool>) -> Self {
        Self { db }
    }

    #[instrument(skip(self))]
    pub async fn list(&self) -> Result<Vec<LaborTypeRow>, ServiceError> {
        proc::list_labor_types(&*self.db)
            .await
            .map_err(ServiceError::from_db)
    }

    #[instrument(skip(self, input), fields(labor_name = %input.labor_name))]
    pub async fn create(&self, input: LaborTypeInput) -> Result<(), ServiceError> {
        input.validate()?;
        proc::insert_labor_type(&*self.db, &input.labor_name, input.value)
            .await
            .map_err(ServiceError::from_db)?;
        info!("labor type created");
        Ok(())
    }

    #[instrument(skip(self, input))]
    pub async fn update(&self, id: i32, input: LaborTypeInput) -> Result<(), ServiceError> {
        input.validate()?;
        self.ensure_exists(id).await?;
        proc::edit_labor_type(&*self.db, id, &input.labor_name, input.value)
            .await
            .map_err(ServiceError::from_db)?;
        info!(labor_type_id = id, "labor type updated");
        Ok(())
    }

    #[instrument(skip(self))]
    pub async fn delete(&self, id: i32) -> Result<(), ServiceError> {
        self.ensure_exists(id).await?;
        proc::delete_labor_type(&*self.db, id)
            .await
            .map_err(ServiceError::from_db)?;
        info!(labor_type_id = id, "labor type deleted");
        Ok(())
    }

    async fn ensure_exists(&self, id: i32) -> Result<(), ServiceError> {
        LaborType::find_by_id(id)
            .one(&*self.db)
            .await
            .map_err(ServiceError::from_db)?
            .ok_or_else(|| ServiceError::NotFound(format!("labor type {} not found", id)))?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn negative_rate_fails_validation() {
        let input = LaborTypeInput {
            labor_name: "welding".into(),
            value: -5,
        };
        assert!(input.validate().is_err());
    }
}
