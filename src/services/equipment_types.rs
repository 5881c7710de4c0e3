use std::sync::Arc;

use sea_orm::EntityTrait;
use serde::Deserialize;
use tracing::{info, instrument};
use validator::Validate;

use crate::{
    db::DbPool,
    entities::equipment_type::Entity as EquipmentType,
    errors::ServiceError,
    proc::{self, EquipmentTypeRow},
};

#[derive(Debug, Deserialize, Validate)]
pub struct EquipmentTypeInput {
    #[validate(length(min = 1, max = 50, message = "Type name is required"))]
    pub type_name: String,
    #[validate(length(min = 1, message = "Description is required"))]
    pub description: String,
}

#[derive(Clone)]
pub struct EquipmentTypeService {
    db: Arc<DbPool>,
}

impl EquipmentTypeService {
    pub fn new(db: Arc<DbPool>) -> Self {
        Self { db }
    }

    #[instrument(skip(self))]
    pub async fn list(&self) -> Result<Vec<EquipmentTypeRow>, ServiceError> {
        proc::list_equipment_types(&*self.db)
            .await
            .map_err(ServiceError::from_db)
    }

    #[instrument(skip(self, input), fields(type_name = %input.type_name))]
    pub async fn create(&self, input: EquipmentTypeInput) -> Result<(), ServiceError> {
        input.validate()?;
        proc::insert_equipment_type(&*self.db, &input.type_name, &input.description)
            .await
            .map_err(ServiceError::from_db)?;
        info!("equipment type created");
        Ok(())
    }

    #[instrument(skip(self, input))]
    pub async fn update(&self, id: i32, input: EquipmentTypeInput) -> Result<(), ServiceError> {
        input.validate()?;
        self.ensure_exists(id).await?;
        proc::edit_equipment_type(&*self.db, id, &input.type_name, &input.description)
            .await
            .map_err(ServiceError::from_db)?;
        info!(equipment_type_id = id, "equipment type updated");
        Ok(())
    }

    #[instrument(skip(self))]
    pub async fn delete(&self, id: i32) -> Result<(), ServiceError> {
        self.ensure_exists(id).await?;
        proc::delete_equipment_type(&*self.db, id)
            .await
            .map_err(ServiceError::from_db)?;
        info!(equipment_type_id = id, "equipment type deleted");
        Ok(())
    }

    async fn ensure_exists(&self, id: i32) -> Result<(), ServiceError> {
        EquipmentType::find_by_id(id)
            .one(&*self.db)
            .await
            .map_err(ServiceError::from_db)?
            .ok_or_else(|| ServiceError::NotFound(format!("equipment type {} not found", id)))?;
        Ok(())
    }
}
