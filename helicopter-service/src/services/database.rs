//! PostgreSQL access for helicopter-service.

use async_trait::async_trait;
use service_core::error::AppError;
use sqlx::postgres::{PgPool, PgPoolOptions};
use std::time::Duration;
use tracing::{info, instrument};

use crate::config::DatabaseConfig;
use crate::models::{
    Attribute, AttributeValue, CreateAttribute, CreateAttributeValue, CreateEngine,
    CreateHelicopter, Engine, Helicopter, HelicopterAttribute, NewUser, Page, UpdateAttribute,
    UpdateAttributeValue, UpdateEngine, UpdateHelicopter, User,
};
use crate::services::metrics::DbTimer;
use crate::services::ownership::ResourceKind;
use crate::services::{IdentityStore, ServiceError};

const USER_COLUMNS: &str = "id, email, password_hash, name, created_utc";
const HELICOPTER_COLUMNS: &str =
    "id, model, manufacturer, max_speed_kmh, engine_id, creator_id, created_utc, updated_utc";
const ENGINE_COLUMNS: &str =
    "id, name, manufacturer, power_hp, creator_id, created_utc, updated_utc";
const ATTRIBUTE_COLUMNS: &str = "id, name, unit, creator_id, created_utc, updated_utc";
const ATTRIBUTE_VALUE_COLUMNS: &str =
    "id, helicopter_id, attribute_id, value, creator_id, created_utc, updated_utc";

/// Database connection pool wrapper.
#[derive(Clone)]
pub struct Database {
    pool: PgPool,
}

impl Database {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Create a new database connection pool.
    #[instrument(skip(config), fields(service = "helicopter-service"))]
    pub async fn connect(config: &DatabaseConfig) -> Result<Self, AppError> {
        info!(
            max_connections = config.max_connections,
            min_connections = config.min_connections,
            "Connecting to PostgreSQL"
        );

        let pool = PgPoolOptions::new()
            .max_connections(config.max_connections)
            .min_connections(config.min_connections)
            .acquire_timeout(Duration::from_secs(30))
            .idle_timeout(Duration::from_secs(600))
            .connect(&config.url)
            .await
            .map_err(|e| AppError::DatabaseError(anyhow::anyhow!("Failed to connect: {}", e)))?;

        info!("PostgreSQL connection pool established");

        Ok(Self { pool })
    }

    pub fn pool(&self) -> &PgPool {
        &self.pool
    }

    #[instrument(skip(self))]
    pub async fn health_check(&self) -> Result<(), AppError> {
        let _timer = DbTimer::start("health_check");

        sqlx::query("SELECT 1")
            .execute(&self.pool)
            .await
            .map_err(|e| AppError::DatabaseError(anyhow::anyhow!("Health check failed: {}", e)))?;

        Ok(())
    }

    #[instrument(skip(self))]
    pub async fn run_migrations(&self) -> Result<(), AppError> {
        info!("Running database migrations");
        sqlx::migrate!("./migrations")
            .run(&self.pool)
            .await
            .map_err(|e| AppError::DatabaseError(anyhow::anyhow!("Migration failed: {}", e)))?;
        info!("Database migrations completed");
        Ok(())
    }

    /// Creator of a row of the given kind, `None` if the row does not exist.
    #[instrument(skip(self))]
    pub async fn find_creator_id(
        &self,
        kind: ResourceKind,
        id: i64,
    ) -> Result<Option<i64>, ServiceError> {
        let _timer = DbTimer::start("find_creator_id");

        // Table names come from the closed ResourceKind set, never from input.
        let sql = format!("SELECT creator_id FROM {} WHERE id = $1", kind.table_name());
        let creator_id = sqlx::query_scalar::<_, i64>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(creator_id)
    }

    // =========================================================================
    // Helicopters
    // =========================================================================

    #[instrument(skip(self))]
    pub async fn list_helicopters(&self, page: Page) -> Result<Vec<Helicopter>, ServiceError> {
        let _timer = DbTimer::start("list_helicopters");

        let sql = format!(
            "SELECT {} FROM helicopters ORDER BY id LIMIT $1 OFFSET $2",
            HELICOPTER_COLUMNS
        );
        let rows = sqlx::query_as::<_, Helicopter>(&sql)
            .bind(page.limit)
            .bind(page.offset)
            .fetch_all(&self.pool)
            .await?;

        Ok(rows)
    }

    #[instrument(skip(self))]
    pub async fn get_helicopter(&self, id: i64) -> Result<Option<Helicopter>, ServiceError> {
        let _timer = DbTimer::start("get_helicopter");

        let sql = format!("SELECT {} FROM helicopters WHERE id = $1", HELICOPTER_COLUMNS);
        let row = sqlx::query_as::<_, Helicopter>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(row)
    }

    #[instrument(skip(self, input), fields(creator_id = input.creator_id))]
    pub async fn create_helicopter(
        &self,
        input: &CreateHelicopter,
    ) -> Result<Helicopter, ServiceError> {
        let _timer = DbTimer::start("create_helicopter");

        let sql = format!(
            r#"
            INSERT INTO helicopters (model, manufacturer, max_speed_kmh, engine_id, creator_id)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING {}
            "#,
            HELICOPTER_COLUMNS
        );
        let helicopter = sqlx::query_as::<_, Helicopter>(&sql)
            .bind(&input.model)
            .bind(&input.manufacturer)
            .bind(input.max_speed_kmh)
            .bind(input.engine_id)
            .bind(input.creator_id)
            .fetch_one(&self.pool)
            .await
            .map_err(|e| ServiceError::from_write(e, "Helicopter already exists", "Engine not found"))?;

        Ok(helicopter)
    }

    #[instrument(skip(self, input))]
    pub async fn update_helicopter(
        &self,
        id: i64,
        input: &UpdateHelicopter,
    ) -> Result<Option<Helicopter>, ServiceError> {
        let _timer = DbTimer::start("update_helicopter");

        let sql = format!(
            r#"
            UPDATE helicopters
            SET model = COALESCE($2, model),
                manufacturer = COALESCE($3, manufacturer),
                max_speed_kmh = COALESCE($4, max_speed_kmh),
                engine_id = COALESCE($5, engine_id),
                updated_utc = NOW()
            WHERE id = $1
            RETURNING {}
            "#,
            HELICOPTER_COLUMNS
        );
        let helicopter = sqlx::query_as::<_, Helicopter>(&sql)
            .bind(id)
            .bind(&input.model)
            .bind(&input.manufacturer)
            .bind(input.max_speed_kmh)
            .bind(input.engine_id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| ServiceError::from_write(e, "Helicopter already exists", "Engine not found"))?;

        Ok(helicopter)
    }

    /// Deleting a helicopter also removes its attribute values.
    #[instrument(skip(self))]
    pub async fn delete_helicopter(&self, id: i64) -> Result<bool, ServiceError> {
        let _timer = DbTimer::start("delete_helicopter");

        let result = sqlx::query("DELETE FROM helicopters WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(|e| ServiceError::from_delete(e, "Helicopter is still referenced"))?;

        Ok(result.rows_affected() > 0)
    }

    #[instrument(skip(self))]
    pub async fn list_helicopter_attributes(
        &self,
        helicopter_id: i64,
    ) -> Result<Vec<HelicopterAttribute>, ServiceError> {
        let _timer = DbTimer::start("list_helicopter_attributes");

        let rows = sqlx::query_as::<_, HelicopterAttribute>(
            r#"
            SELECT av.id, av.attribute_id, a.name, a.unit, av.value
            FROM attribute_values av
            JOIN attributes a ON a.id = av.attribute_id
            WHERE av.helicopter_id = $1
            ORDER BY a.name
            "#,
        )
        .bind(helicopter_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows)
    }

    // =========================================================================
    // Engines
    // =========================================================================

    #[instrument(skip(self))]
    pub async fn list_engines(&self, page: Page) -> Result<Vec<Engine>, ServiceError> {
        let _timer = DbTimer::start("list_engines");

        let sql = format!(
            "SELECT {} FROM engines ORDER BY id LIMIT $1 OFFSET $2",
            ENGINE_COLUMNS
        );
        let rows = sqlx::query_as::<_, Engine>(&sql)
            .bind(page.limit)
            .bind(page.offset)
            .fetch_all(&self.pool)
            .await?;

        Ok(rows)
    }

    #[instrument(skip(self))]
    pub async fn get_engine(&self, id: i64) -> Result<Option<Engine>, ServiceError> {
        let _timer = DbTimer::start("get_engine");

        let sql = format!("SELECT {} FROM engines WHERE id = $1", ENGINE_COLUMNS);
        let row = sqlx::query_as::<_, Engine>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(row)
    }

    #[instrument(skip(self, input), fields(creator_id = input.creator_id))]
    pub async fn create_engine(&self, input: &CreateEngine) -> Result<Engine, ServiceError> {
        let _timer = DbTimer::start("create_engine");

        let sql = format!(
            r#"
            INSERT INTO engines (name, manufacturer, power_hp, creator_id)
            VALUES ($1, $2, $3, $4)
            RETURNING {}
            "#,
            ENGINE_COLUMNS
        );
        let engine = sqlx::query_as::<_, Engine>(&sql)
            .bind(&input.name)
            .bind(&input.manufacturer)
            .bind(input.power_hp)
            .bind(input.creator_id)
            .fetch_one(&self.pool)
            .await
            .map_err(|e| ServiceError::from_write(e, "Engine already exists", "Creator not found"))?;

        Ok(engine)
    }

    #[instrument(skip(self, input))]
    pub async fn update_engine(
        &self,
        id: i64,
        input: &UpdateEngine,
    ) -> Result<Option<Engine>, ServiceError> {
        let _timer = DbTimer::start("update_engine");

        let sql = format!(
            r#"
            UPDATE engines
            SET name = COALESCE($2, name),
                manufacturer = COALESCE($3, manufacturer),
                power_hp = COALESCE($4, power_hp),
                updated_utc = NOW()
            WHERE id = $1
            RETURNING {}
            "#,
            ENGINE_COLUMNS
        );
        let engine = sqlx::query_as::<_, Engine>(&sql)
            .bind(id)
            .bind(&input.name)
            .bind(&input.manufacturer)
            .bind(input.power_hp)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| ServiceError::from_write(e, "Engine already exists", "Creator not found"))?;

        Ok(engine)
    }

    /// Helicopters using the engine keep existing with no engine.
    #[instrument(skip(self))]
    pub async fn delete_engine(&self, id: i64) -> Result<bool, ServiceError> {
        let _timer = DbTimer::start("delete_engine");

        let result = sqlx::query("DELETE FROM engines WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(|e| ServiceError::from_delete(e, "Engine is still referenced"))?;

        Ok(result.rows_affected() > 0)
    }

    // =========================================================================
    // Attributes
    // =========================================================================

    #[instrument(skip(self))]
    pub async fn list_attributes(&self, page: Page) -> Result<Vec<Attribute>, ServiceError> {
        let _timer = DbTimer::start("list_attributes");

        let sql = format!(
            "SELECT {} FROM attributes ORDER BY id LIMIT $1 OFFSET $2",
            ATTRIBUTE_COLUMNS
        );
        let rows = sqlx::query_as::<_, Attribute>(&sql)
            .bind(page.limit)
            .bind(page.offset)
            .fetch_all(&self.pool)
            .await?;

        Ok(rows)
    }

    #[instrument(skip(self))]
    pub async fn get_attribute(&self, id: i64) -> Result<Option<Attribute>, ServiceError> {
        let _timer = DbTimer::start("get_attribute");

        let sql = format!("SELECT {} FROM attributes WHERE id = $1", ATTRIBUTE_COLUMNS);
        let row = sqlx::query_as::<_, Attribute>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(row)
    }

    #[instrument(skip(self, input), fields(creator_id = input.creator_id))]
    pub async fn create_attribute(&self, input: &CreateAttribute) -> Result<Attribute, ServiceError> {
        let _timer = DbTimer::start("create_attribute");

        let sql = format!(
            r#"
            INSERT INTO attributes (name, unit, creator_id)
            VALUES ($1, $2, $3)
            RETURNING {}
            "#,
            ATTRIBUTE_COLUMNS
        );
        let attribute = sqlx::query_as::<_, Attribute>(&sql)
            .bind(&input.name)
            .bind(&input.unit)
            .bind(input.creator_id)
            .fetch_one(&self.pool)
            .await
            .map_err(|e| {
                ServiceError::from_write(e, "Attribute name already exists", "Creator not found")
            })?;

        Ok(attribute)
    }

    #[instrument(skip(self, input))]
    pub async fn update_attribute(
        &self,
        id: i64,
        input: &UpdateAttribute,
    ) -> Result<Option<Attribute>, ServiceError> {
        let _timer = DbTimer::start("update_attribute");

        let sql = format!(
            r#"
            UPDATE attributes
            SET name = COALESCE($2, name),
                unit = COALESCE($3, unit),
                updated_utc = NOW()
            WHERE id = $1
            RETURNING {}
            "#,
            ATTRIBUTE_COLUMNS
        );
        let attribute = sqlx::query_as::<_, Attribute>(&sql)
            .bind(id)
            .bind(&input.name)
            .bind(&input.unit)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| {
                ServiceError::from_write(e, "Attribute name already exists", "Creator not found")
            })?;

        Ok(attribute)
    }

    /// Fails with `Conflict` while any helicopter still carries a value for it.
    #[instrument(skip(self))]
    pub async fn delete_attribute(&self, id: i64) -> Result<bool, ServiceError> {
        let _timer = DbTimer::start("delete_attribute");

        let result = sqlx::query("DELETE FROM attributes WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(|e| ServiceError::from_delete(e, "Attribute is still in use"))?;

        Ok(result.rows_affected() > 0)
    }

    // =========================================================================
    // Attribute values
    // =========================================================================

    #[instrument(skip(self))]
    pub async fn list_attribute_values(
        &self,
        page: Page,
    ) -> Result<Vec<AttributeValue>, ServiceError> {
        let _timer = DbTimer::start("list_attribute_values");

        let sql = format!(
            "SELECT {} FROM attribute_values ORDER BY id LIMIT $1 OFFSET $2",
            ATTRIBUTE_VALUE_COLUMNS
        );
        let rows = sqlx::query_as::<_, AttributeValue>(&sql)
            .bind(page.limit)
            .bind(page.offset)
            .fetch_all(&self.pool)
            .await?;

        Ok(rows)
    }

    #[instrument(skip(self))]
    pub async fn get_attribute_value(
        &self,
        id: i64,
    ) -> Result<Option<AttributeValue>, ServiceError> {
        let _timer = DbTimer::start("get_attribute_value");

        let sql = format!(
            "SELECT {} FROM attribute_values WHERE id = $1",
            ATTRIBUTE_VALUE_COLUMNS
        );
        let row = sqlx::query_as::<_, AttributeValue>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(row)
    }

    #[instrument(skip(self, input), fields(creator_id = input.creator_id))]
    pub async fn create_attribute_value(
        &self,
        input: &CreateAttributeValue,
    ) -> Result<AttributeValue, ServiceError> {
        let _timer = DbTimer::start("create_attribute_value");

        let sql = format!(
            r#"
            INSERT INTO attribute_values (helicopter_id, attribute_id, value, creator_id)
            VALUES ($1, $2, $3, $4)
            RETURNING {}
            "#,
            ATTRIBUTE_VALUE_COLUMNS
        );
        let attribute_value = sqlx::query_as::<_, AttributeValue>(&sql)
            .bind(input.helicopter_id)
            .bind(input.attribute_id)
            .bind(&input.value)
            .bind(input.creator_id)
            .fetch_one(&self.pool)
            .await
            .map_err(|e| {
                ServiceError::from_write(
                    e,
                    "Helicopter already has a value for this attribute",
                    "Helicopter or attribute not found",
                )
            })?;

        Ok(attribute_value)
    }

    #[instrument(skip(self, input))]
    pub async fn update_attribute_value(
        &self,
        id: i64,
        input: &UpdateAttributeValue,
    ) -> Result<Option<AttributeValue>, ServiceError> {
        let _timer = DbTimer::start("update_attribute_value");

        let sql = format!(
            r#"
            UPDATE attribute_values
            SET value = COALESCE($2, value),
                updated_utc = NOW()
            WHERE id = $1
            RETURNING {}
            "#,
            ATTRIBUTE_VALUE_COLUMNS
        );
        let row = sqlx::query_as::<_, AttributeValue>(&sql)
            .bind(id)
            .bind(&input.value)
            .fetch_optional(&self.pool)
            .await?;

        Ok(row)
    }

    #[instrument(skip(self))]
    pub async fn delete_attribute_value(&self, id: i64) -> Result<bool, ServiceError> {
        let _timer = DbTimer::start("delete_attribute_value");

        let result = sqlx::query("DELETE FROM attribute_values WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}

#[async_trait]
impl IdentityStore for Database {
    #[instrument(skip(self))]
    async fn find_by_id(&self, id: i64) -> Result<Option<User>, ServiceError> {
        let _timer = DbTimer::start("find_user_by_id");

        let sql = format!("SELECT {} FROM users WHERE id = $1", USER_COLUMNS);
        let user = sqlx::query_as::<_, User>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(user)
    }

    #[instrument(skip(self, email))]
    async fn find_by_email(&self, email: &str) -> Result<Option<User>, ServiceError> {
        let _timer = DbTimer::start("find_user_by_email");

        let sql = format!("SELECT {} FROM users WHERE email = $1", USER_COLUMNS);
        let user = sqlx::query_as::<_, User>(&sql)
            .bind(email)
            .fetch_optional(&self.pool)
            .await?;

        Ok(user)
    }

    #[instrument(skip(self, new_user))]
    async fn insert(&self, new_user: NewUser) -> Result<User, ServiceError> {
        let _timer = DbTimer::start("insert_user");

        let sql = format!(
            r#"
            INSERT INTO users (email, password_hash, name)
            VALUES ($1, $2, $3)
            RETURNING {}
            "#,
            USER_COLUMNS
        );
        let user = sqlx::query_as::<_, User>(&sql)
            .bind(&new_user.email)
            .bind(&new_user.password_hash)
            .bind(&new_user.name)
            .fetch_one(&self.pool)
            .await
            .map_err(|e| match ServiceError::from_write(e, "", "") {
                ServiceError::Conflict(_) => ServiceError::EmailAlreadyRegistered,
                other => other,
            })?;

        Ok(user)
    }
}
