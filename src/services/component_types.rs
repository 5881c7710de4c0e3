use std::sync::Arc;

use sea_orm::EntityTrait;
use serde::Deserialize;
use tracing::{info, instrument};
use validator::Validate;

use crate::{
    db::DbPool,
    entities::component_type::Entity as ComponentType,
    errors::ServiceError,
    proc::{self, ComponentTypeRow},
};

#[derive(Debug, Deserialize, Validate)]
pub struct ComponentTypeInput {
    #[validate(length(min = 1, max = 50, message = "Type name is required"))]
    pub type_name: String,
    #[validate(length(min = 1, message = "Description is required"))]
    pub description: String,
}

#[derive(Clone)]
pub struct ComponentTypeService {
    db: Arc<DbPool>,
}

impl ComponentTypeService {
    pub fn new(db: Arc<DbPool>) -> Self {
        Self { db }
    }

    #[instrument(skip(self))]
    pub async fn list(&self) -> Result<Vec<ComponentTypeRow>, ServiceError> {
        proc::list_component_types(&*self.db)
            .await
            .map_err(ServiceError::from_db)
    }

    #[instrument(skip(self, input), fields(type_name = %input.type_name))]
    pub async fn create(&self, input: ComponentTypeInput) -> Result<(), ServiceError> {
        input.validate()?;
        proc::insert_component_type(&*self.db, &input.type_name, &input.description)
            .await
            .map_err(ServiceError::from_db)?;
        info!("component type created");
        Ok(())
    }

    #[instrument(skip(self, input))]
    pub async fn update(&self, id: i32, input: ComponentTypeInput) -> Result<(), ServiceError> {
        input.validate()?;
        self.ensure_exists(id).await?;
        proc::edit_component_type(&*self.db, id, &input.type_name, &input.description)
            .await
            .map_err(ServiceError::from_db)?;
        info!(component_type_id = id, "component type updated");
        Ok(())
    }

    #[instrument(skip(self))]
    pub async fn delete(&self, id: i32) -> Result<(), ServiceError> {
        self.ensure_exists(id).await?;
        proc::delete_component_type(&*self.db, id)
            .await
            .map_err(ServiceError::from_db)?;
        info!(component_type_id = id, "component type deleted");
        Ok(())
    }

    async fn ensure_exists(&self, id: i32) -> Result<(), ServiceError> {
        ComponentType::find_by_id(id)
            .one(&*self.db)
            .await
            .map_err(ServiceError::from_db)?
            .ok_or_else(|| ServiceError::NotFound(format!("component type {} not found", id)))?;
        Ok(())
    }
}
