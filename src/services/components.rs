use std::sync::Arc;

use chrono::NaiveDate;
use rust_decimal::Decimal;
use sea_orm::{
    ColumnTrait, ConnectionTrait, DbBackend, EntityTrait, FromQueryResult, PaginatorTrait,
    QueryFilter, Statement,
};
use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;
use tracing::{info, instrument};
use validator::Validate;

use crate::{
    aggregate::{self, ComponentGroup},
    db::DbPool,
    entities::component::{self, Entity as Component, Model as ComponentModel},
    errors::ServiceError,
    proc::{self, ComponentRow},
};

#[derive(Debug, Deserialize, Validate)]
pub struct ComponentInput {
    pub component_type_id: i32,
    pub supplier_id: i32,
    #[validate(length(min = 1, max = 50, message = "Name is required"))]
    pub name: String,
    #[validate(length(min = 1, max = 100, message = "Serial number is required"))]
    pub serial_number: String,
    pub purchase_date: NaiveDate,
    pub purchase_price: Decimal,
    #[validate(url(message = "Image must be a URL"))]
    pub image: Option<String>,
}

/// Where the client should land after a component mutation commits: the
/// merged detail view while other rows still share the name, the flat list
/// otherwise. Recomputed post-commit on every mutation, never cached.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "view", rename_all = "snake_case")]
pub enum ComponentRedirect {
    Detail {
        name: String,
        component_type_id: i32,
    },
    List,
}

pub fn post_mutation_redirect(
    remaining_with_name: u64,
    name: String,
    component_type_id: i32,
) -> ComponentRedirect {
    if remaining_with_name > 1 {
        ComponentRedirect::Detail {
            name,
            component_type_id,
        }
    } else {
        ComponentRedirect::List
    }
}

const DETAIL_SQL: &str = r#"
    SELECT
        c.component_id,
        c.component_type_id,
        c.supplier_id,
        c.name,
        c.serial_number,
        c.purchase_date,
        c.purchase_price,
        c.stock,
        c.image,
        s.name AS supplier_name,
        ct.type_name
    FROM app_components c
    JOIN app_supplier s ON c.supplier_id = s.supplier_id
    JOIN app_component_type ct ON ct.component_type_id = c.component_type_id
    WHERE c.name = $1 AND c.component_type_id = $2 AND c.stock > 0
    ORDER BY c.component_id
"#;

#[derive(Clone)]
pub struct ComponentService {
    db: Arc<DbPool>,
}

impl ComponentService {
    pub fn new(db: Arc<DbPool>) -> Self {
        Self { db }
    }

    /// Lists in-stock components merged into batch groups keyed by
    /// `(name, component_type_id)`.
    #[instrument(skip(self))]
    pub async fn list(&self) -> Result<Vec<ComponentGroup>, ServiceError> {
        let rows = proc::list_components(&*self.db)
            .await
            .map_err(ServiceError::from_db)?;
        Ok(aggregate::group_components(rows))
    }

    /// Per-row detail for one batch group, in-stock rows only.
    #[instrument(skip(self))]
    pub async fn detail(
        &self,
        name: &str,
        component_type_id: i32,
    ) -> Result<Vec<ComponentRow>, ServiceError> {
        let rows = self
            .db
            .query_all(Statement::from_sql_and_values(
                DbBackend::Postgres,
                DETAIL_SQL,
                vec![name.into(), component_type_id.into()],
            ))
            .await
            .map_err(ServiceError::from_db)?;
        rows.iter()
            .map(|row| ComponentRow::from_query_result(row, "").map_err(ServiceError::from_db))
            .collect()
    }

    #[instrument(skip(self, input), fields(serial_number = %input.serial_number))]
    pub async fn create(&self, input: ComponentInput) -> Result<(), ServiceError> {
        input.validate()?;
        proc::insert_component(
            &*self.db,
            input.component_type_id,
            input.supplier_id,
            &input.name,
            &input.serial_number,
            input.purchase_date,
            input.purchase_price,
            input.image.as_deref(),
        )
        .await
        .map_err(ServiceError::from_db)?;
        info!("component created");
        Ok(())
    }

    /// Edits a component row, then decides the post-commit view from a
    /// fresh count of rows sharing the component's name.
    #[instrument(skip(self, input))]
    pub async fn update(
        &self,
        id: i32,
        input: ComponentInput,
    ) -> Result<ComponentRedirect, ServiceError> {
        input.validate()?;
        let existing = self.find_existing(id).await?;
        proc::edit_component(
            &*self.db,
            id,
            input.component_type_id,
            input.supplier_id,
            &input.name,
            &input.serial_number,
            input.purchase_date,
            input.purchase_price,
            input.image.as_deref(),
        )
        .await
        .map_err(ServiceError::from_db)?;
        info!(component_id = id, "component updated");

        let remaining = self.count_sharing_name(&existing.name).await?;
        Ok(post_mutation_redirect(
            remaining,
            existing.name,
            existing.component_type_id,
        ))
    }

    #[instrument(skip(self))]
    pub async fn delete(&self, id: i32) -> Result<ComponentRedirect, ServiceError> {
        let existing = self.find_existing(id).await?;
        proc::delete_component(&*self.db, id)
            .await
            .map_err(ServiceError::from_db)?;
        info!(component_id = id, "component deleted");

        let remaining = self.count_sharing_name(&existing.name).await?;
        Ok(post_mutation_redirect(
            remaining,
            existing.name,
            existing.component_type_id,
        ))
    }

    /// Full component inventory as one JSON document, or `None` when the
    /// store has nothing to export.
    #[instrument(skip(self))]
    pub async fn export(&self) -> Result<Option<JsonValue>, ServiceError> {
        proc::export_component_info(&*self.db)
            .await
            .map_err(ServiceError::from_db)
    }

    /// Forwards a previously parsed JSON document to the import procedure.
    #[instrument(skip(self, document))]
    pub async fn import(&self, document: &JsonValue) -> Result<(), ServiceError> {
        let payload = serde_json::to_string(document)?;
        proc::import_component_info(&*self.db, &payload)
            .await
            .map_err(ServiceError::from_db)?;
        info!("component info imported");
        Ok(())
    }

    async fn find_existing(&self, id: i32) -> Result<ComponentModel, ServiceError> {
        Component::find_by_id(id)
            .one(&*self.db)
            .await
            .map_err(ServiceError::from_db)?
            .ok_or_else(|| ServiceError::NotFound(format!("component {} not found", id)))
    }

    async fn count_sharing_name(&self, name: &str) -> Result<u64, ServiceError> {
        Component::find()
            .filter(component::Column::Name.eq(name))
            .count(&*self.db)
            .await
            .map_err(ServiceError::from_db)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn several_remaining_rows_redirect_to_detail() {
        let redirect = post_mutation_redirect(3, "bolt".into(), 1);
        assert_eq!(
            redirect,
            ComponentRedirect::Detail {
                name: "bolt".into(),
                component_type_id: 1
            }
        );
    }

    #[test]
    fn one_or_zero_remaining_rows_redirect_to_list() {
        assert_eq!(post_mutation_redirect(1, "bolt".into(), 1), ComponentRedirect::List);
        assert_eq!(post_mutation_redirect(0, "bolt".into(), 1), ComponentRedirect::List);
    }

    #[test]
    fn malformed_image_url_fails_validation() {
        let input = ComponentInput {
            component_type_id: 1,
            supplier_id: 1,
            name: "bolt".into(),
            serial_number: "S-1".into(),
            purchase_date: NaiveDate::from_ymd_opt(2024, 3, 1).unwrap(),
            purchase_price: Decimal::new(1990, 2),
            image: Some("not a url".into()),
        };
        assert!(input.validate().is_err());
    }
}
