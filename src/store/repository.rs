use crate::store::document::{now_rfc3339, ConfigurationId, PersistedConfiguration};
use crate::store::{ConfigurationStore, StoreError};
use crate::wizard::rules::{validate_aggregate, ValidationResult};
use crate::wizard::state::WizardState;
use chrono::Utc;
use rusqlite::{params, Connection, OptionalExtension};
use std::fs;
use std::path::{Path, PathBuf};

/// Listing is capped to the ten most recent documents.
pub const LIST_LIMIT: usize = 10;

const AGGREGATE_SECTIONS: [&str; 4] = ["basic", "rag", "workflows", "security"];

/// SQLite-backed document store for completed wizard aggregates. Each row
/// holds the aggregate as one JSON document; identity and timestamps live in
/// their own columns.
pub struct ConfigurationRepository {
    db_path: PathBuf,
}

impl ConfigurationRepository {
    pub fn open(db_path: &Path) -> Result<Self, StoreError> {
        if let Some(parent) = db_path.parent() {
            fs::create_dir_all(parent).map_err(|source| StoreError::CreateParent {
                path: parent.display().to_string(),
                source,
            })?;
        }
        let repo = Self {
            db_path: db_path.to_path_buf(),
        };
        repo.ensure_schema()?;
        Ok(repo)
    }

    pub fn ensure_schema(&self) -> Result<(), StoreError> {
        let connection = self.connect()?;
        connection
            .execute_batch(
                "
                CREATE TABLE IF NOT EXISTS configurations (
                    configuration_id TEXT NOT NULL PRIMARY KEY,
                    document TEXT NOT NULL,
                    created_at TEXT NOT NULL,
                    updated_at TEXT NOT NULL,
                    created_at_ms INTEGER NOT NULL
                );

                CREATE INDEX IF NOT EXISTS idx_configurations_created
                    ON configurations(created_at_ms DESC);
                ",
            )
            .map_err(|source| StoreError::Sql { source })?;
        Ok(())
    }

    fn connect(&self) -> Result<Connection, StoreError> {
        Connection::open(&self.db_path).map_err(|source| StoreError::Open {
            path: self.db_path.display().to_string(),
            source,
        })
    }

    fn row_to_configuration(
        id: String,
        document: String,
        created_at: String,
        updated_at: String,
    ) -> Result<PersistedConfiguration, StoreError> {
        let id = ConfigurationId::parse(&id).map_err(StoreError::CorruptDocument)?;
        let aggregate: WizardState = serde_json::from_str(&document)
            .map_err(|err| StoreError::CorruptDocument(err.to_string()))?;
        Ok(PersistedConfiguration {
            id,
            basic: aggregate.basic,
            rag: aggregate.rag,
            workflows: aggregate.workflows,
            security: aggregate.security,
            created_at,
            updated_at,
        })
    }
}

fn reject_invalid(result: ValidationResult) -> Result<(), StoreError> {
    if let ValidationResult::Invalid(errors) = result {
        return Err(StoreError::Validation {
            message: "Validation failed".to_string(),
            issues: errors
                .into_iter()
                .map(|error| format!("{}: {}", error.field, error.message))
                .collect(),
        });
    }
    Ok(())
}

impl ConfigurationStore for ConfigurationRepository {
    fn create(&self, aggregate: &WizardState) -> Result<PersistedConfiguration, StoreError> {
        reject_invalid(validate_aggregate(aggregate))?;

        let id = ConfigurationId::generate().map_err(StoreError::IdGeneration)?;
        let document =
            serde_json::to_string(aggregate).map_err(|source| StoreError::Encode { source })?;
        let now = now_rfc3339();
        let now_ms = Utc::now().timestamp_millis();

        let connection = self.connect()?;
        connection
            .execute(
                "INSERT INTO configurations
                    (configuration_id, document, created_at, updated_at, created_at_ms)
                 VALUES (?1, ?2, ?3, ?4, ?5)",
                params![id.as_str(), document, now, now, now_ms],
            )
            .map_err(|source| StoreError::Sql { source })?;

        Self::row_to_configuration(id.as_str().to_string(), document, now.clone(), now)
    }

    fn list(&self) -> Result<Vec<PersistedConfiguration>, StoreError> {
        let connection = self.connect()?;
        let mut statement = connection
            .prepare(
                "SELECT configuration_id, document, created_at, updated_at
                 FROM configurations
                 ORDER BY created_at_ms DESC, rowid DESC
                 LIMIT ?1",
            )
            .map_err(|source| StoreError::Sql { source })?;
        let rows = statement
            .query_map(params![LIST_LIMIT as i64], |row| {
                Ok((
                    row.get::<_, String>(0)?,
                    row.get::<_, String>(1)?,
                    row.get::<_, String>(2)?,
                    row.get::<_, String>(3)?,
                ))
            })
            .map_err(|source| StoreError::Sql { source })?;

        let mut configurations = Vec::new();
        for row in rows {
            let (id, document, created_at, updated_at) =
                row.map_err(|source| StoreError::Sql { source })?;
            configurations.push(Self::row_to_configuration(
                id, document, created_at, updated_at,
            )?);
        }
        Ok(configurations)
    }

    fn get(&self, id: &str) -> Result<PersistedConfiguration, StoreError> {
        let connection = self.connect()?;
        let row = connection
            .query_row(
                "SELECT configuration_id, document, created_at, updated_at
                 FROM configurations WHERE configuration_id = ?1",
                params![id],
                |row| {
                    Ok((
                        row.get::<_, String>(0)?,
                        row.get::<_, String>(1)?,
                        row.get::<_, String>(2)?,
                        row.get::<_, String>(3)?,
                    ))
                },
            )
            .optional()
            .map_err(|source| StoreError::Sql { source })?;
        let (id, document, created_at, updated_at) = row.ok_or(StoreError::NotFound)?;
        Self::row_to_configuration(id, document, created_at, updated_at)
    }

    /// Section-level merge: each of `basic`/`rag`/`workflows`/`security`
    /// present in the partial replaces the stored section wholesale; the
    /// merged document must still pass whole-aggregate validation.
    fn update(
        &self,
        id: &str,
        partial: &serde_json::Value,
    ) -> Result<PersistedConfiguration, StoreError> {
        let existing = self.get(id)?;
        let mut merged =
            serde_json::to_value(existing.aggregate()).map_err(|source| StoreError::Encode {
                source,
            })?;

        let Some(patch) = partial.as_object() else {
            return Err(StoreError::Validation {
                message: "Validation failed".to_string(),
                issues: vec!["update body must be an object".to_string()],
            });
        };
        for key in AGGREGATE_SECTIONS {
            if let Some(section) = patch.get(key) {
                merged[key] = section.clone();
            }
        }

        let aggregate: WizardState =
            serde_json::from_value(merged).map_err(|err| StoreError::Validation {
                message: "Validation failed".to_string(),
                issues: vec![err.to_string()],
            })?;
        reject_invalid(validate_aggregate(&aggregate))?;

        let document =
            serde_json::to_string(&aggregate).map_err(|source| StoreError::Encode { source })?;
        let now = now_rfc3339();
        let connection = self.connect()?;
        let changed = connection
            .execute(
                "UPDATE configurations SET document = ?1, updated_at = ?2
                 WHERE configuration_id = ?3",
                params![document, now, id],
            )
            .map_err(|source| StoreError::Sql { source })?;
        if changed == 0 {
            return Err(StoreError::NotFound);
        }
        Self::row_to_configuration(id.to_string(), document, existing.created_at, now)
    }

    fn delete(&self, id: &str) -> Result<(), StoreError> {
        let connection = self.connect()?;
        let changed = connection
            .execute(
                "DELETE FROM configurations WHERE configuration_id = ?1",
                params![id],
            )
            .map_err(|source| StoreError::Sql { source })?;
        if changed == 0 {
            return Err(StoreError::NotFound);
        }
        Ok(())
    }
}
