use crate::{
    row::Row,
    schema::{ColumnTypeError, EntitySchema},
    types::{EntitySlug, Id},
    value::Value,
};
use std::fmt;
use thiserror::Error as ThisError;

///
/// ModelError
///

#[derive(Debug, ThisError)]
pub enum ModelError {
    #[error("unknown column '{column}' on {slug}")]
    UnknownColumn { slug: EntitySlug, column: String },

    #[error("{slug}: {source}")]
    Type {
        slug: EntitySlug,
        #[source]
        source: ColumnTypeError,
    },
}

///
/// Model
///
/// One hydrated entity: declared columns only, always fully populated from
/// typed defaults. Undeclared attributes are not a second tier here — they
/// live in the meta store and are addressed explicitly through the manager
/// (`Manager::meta` / `Manager::update_meta`).
///

#[derive(Clone)]
pub struct Model {
    schema: &'static dyn EntitySchema,
    fields: Row,
}

impl Model {
    pub(crate) fn new(schema: &'static dyn EntitySchema) -> Self {
        let mut fields = Row::new();
        for column in schema.columns() {
            fields.set(column.name, column.default_value());
        }

        Self { schema, fields }
    }

    /// Hydrate from a store row. Declared columns are pulled and
    /// type-checked; anything undeclared in the row is ignored, and
    /// anything missing keeps its default.
    pub(crate) fn from_row(
        schema: &'static dyn EntitySchema,
        row: &Row,
    ) -> Result<Self, ModelError> {
        let mut model = Self::new(schema);
        for column in schema.columns() {
            if let Some(value) = row.get(column.name) {
                let admitted = column.admit(value.clone()).map_err(|source| ModelError::Type {
                    slug: schema.slug(),
                    source,
                })?;
                model.fields.set(column.name, admitted);
            }
        }

        Ok(model)
    }

    #[must_use]
    pub fn schema(&self) -> &'static dyn EntitySchema {
        self.schema
    }

    #[must_use]
    pub fn slug(&self) -> EntitySlug {
        self.schema.slug()
    }

    /// Primary key; `Id::UNSET` while transient.
    #[must_use]
    pub fn id(&self) -> Id {
        self.fields
            .get(self.schema.primary_key())
            .and_then(Value::as_id)
            .unwrap_or(Id::UNSET)
    }

    pub(crate) fn set_id(&mut self, id: Id) {
        self.fields.set(self.schema.primary_key(), id);
    }

    #[must_use]
    pub fn is_persisted(&self) -> bool {
        !self.id().is_unset()
    }

    /// Declared column read. Undeclared names return `None`; those are
    /// meta attributes and are read through the manager instead.
    #[must_use]
    pub fn get(&self, column: &str) -> Option<&Value> {
        self.fields.get(column)
    }

    /// Declared column write. Undeclared names are rejected; the meta tier
    /// is written through `Manager::update_meta`.
    pub fn set(&mut self, column: &str, value: impl Into<Value>) -> Result<(), ModelError> {
        let Some(def) = self.schema.column(column) else {
            return Err(ModelError::UnknownColumn {
                slug: self.slug(),
                column: column.to_string(),
            });
        };

        let admitted = def.admit(value.into()).map_err(|source| ModelError::Type {
            slug: self.slug(),
            source,
        })?;
        self.fields.set(def.name, admitted);

        Ok(())
    }

    /// Apply a set of column overrides.
    pub(crate) fn apply(&mut self, fields: &Row) -> Result<(), ModelError> {
        for (column, value) in fields.iter() {
            self.set(column, value.clone())?;
        }
        Ok(())
    }

    /// Plain ordered map of every declared column, primary key included,
    /// meta excluded. Duplication and external serialization read this.
    #[must_use]
    pub fn to_representation(&self) -> Row {
        self.fields.clone()
    }
}

impl fmt::Debug for Model {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Model")
            .field("slug", &self.slug())
            .field("fields", &self.fields)
            .finish()
    }
}
