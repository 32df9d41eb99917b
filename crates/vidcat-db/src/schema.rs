//! Schema repository implementation.

use async_trait::async_trait;
use tracing::info;

use vidcat_core::{
    CreateDescriptorValueRequest, CreatePropertyClassRequest, CreatePropertyTypeRequest,
    DescriptorValue, PropertyClass, PropertyType, Result, Schema, SchemaRepository,
};

use crate::store::Store;

/// In-memory implementation of SchemaRepository.
#[derive(Debug, Clone)]
pub struct MemSchemaRepository {
    store: Store,
}

impl MemSchemaRepository {
    /// Create a new MemSchemaRepository over the given store.
    pub fn new(store: Store) -> Self {
        Self { store }
    }
}

#[async_trait]
impl SchemaRepository for MemSchemaRepository {
    async fn load(&self) -> Result<Schema> {
        Ok(self.store.read().await.schema.clone())
    }

    async fn replace(&self, schema: Schema) -> Result<()> {
        let mut state = self.store.write().await;
        info!(
            subsystem = "db",
            op = "replace_schema",
            types = schema.types().len(),
            "schema: replaced"
        );
        state.schema = schema;
        Ok(())
    }

    async fn create_class(&self, req: CreatePropertyClassRequest) -> Result<PropertyClass> {
        let mut state = self.store.write().await;
        let class = state.schema.create_class(req)?;
        info!(subsystem = "db", op = "create_class", property_class = %class.name, range = %class.range, "schema: class created");
        Ok(class)
    }

    async fn create_type(&self, req: CreatePropertyTypeRequest) -> Result<PropertyType> {
        let mut state = self.store.write().await;
        let pt = state.schema.create_type(req)?;
        info!(subsystem = "db", op = "create_type", property_type = %pt.name, "schema: property type created");
        Ok(pt)
    }

    async fn create_descriptor_value(
        &self,
        req: CreateDescriptorValueRequest,
    ) -> Result<DescriptorValue> {
        let mut state = self.store.write().await;
        let dv = state.schema.create_descriptor_value(req)?;
        info!(
            subsystem = "db",
            op = "create_descriptor_value",
            descriptor_value_id = %dv.id,
            value = %dv.value,
            "schema: descriptor value created"
        );
        Ok(dv)
    }
}
