use std::sync::Arc;

use chrono::NaiveDateTime;
use sea_orm::EntityTrait;
use serde::Deserialize;
use tracing::{info, instrument};

use crate::{
    db::DbPool,
    entities::shipping_guide::Entity as ShippingGuide,
    errors::ServiceError,
    proc::{self, ShippingGuideRow},
};

/// Both dates are nullable: guides are created unpopulated by the order
/// procedure and filled in as the shipment progresses.
#[derive(Debug, Deserialize)]
pub struct ShippingGuideInput {
    pub shipping_date: Option<NaiveDateTime>,
    pub delivery_date: Option<NaiveDateTime>,
}

#[derive(Clone)]
pub struct ShippingGuideService {
    db: Arc<DbPool>,
}

impl ShippingGuideService {
    pub fn new(db: Arc<DbPool>) -> Self {
        Self { db }
    }

    #[instrument(skip(self))]
    pub async fn list(&self) -> Result<Vec<ShippingGuideRow>, ServiceError> {
        proc::list_shipping_guides(&*self.db)
            .await
            .map_err(ServiceError::from_db)
    }

    #[instrument(skip(self, input))]
    pub async fn update(&self, id: i32, input: ShippingGuideInput) -> Result<(), ServiceError> {
        ShippingGuide::find_by_id(id)
            .one(&*self.db)
            .await
            .map_err(ServiceError::from_db)?
            .ok_or_else(|| ServiceError::NotFound(format!("shipping guide {} not found", id)))?;

        proc::edit_shipping_guide(&*self.db, input.shipping_date, input.delivery_date, id)
            .await
            .map_err(ServiceError::from_db)?;
        info!(guide_id = id, "shipping guide updated");
        Ok(())
    }
}
