use sea_orm::sea_query::TableCreateStatement;
use sea_orm::{
    ConnectOptions, ConnectionTrait, Database, DatabaseConnection, DbBackend, DbErr, EntityTrait,
    QueryOrder, QuerySelect, Schema, Statement,
};
use std::sync::Arc;
use std::time::{Duration, Instant};
use tracing::info;

use crate::config::DatabaseConfig;
use crate::entity::{department, person};
use crate::handlers::person::MAX_PERSONS_LIMIT;
use crate::search::SearchIndex;

/// Initialize database connection and auto-migrate tables
pub async fn init_database(config: &DatabaseConfig) -> Result<DatabaseConnection, DbErr> {
    let database_url = config.connection_url();

    info!("Opening database: {}", config.file.display());

    let mut opt = ConnectOptions::new(&database_url);
    opt.max_connections(16)
        .min_connections(1)
        .connect_timeout(Duration::from_secs(8))
        .acquire_timeout(Duration::from_secs(8))
        .sqlx_logging(true)
        .sqlx_logging_level(tracing::log::LevelFilter::Debug);

    let db = Database::connect(opt).await?;
    info!("Database connection established");

    create_schema(&db).await?;

    Ok(db)
}

/// Create the database tables, if they don't already exist
pub async fn create_schema(db: &DatabaseConnection) -> Result<(), DbErr> {
    let backend = db.get_database_backend();
    let schema = Schema::new(backend);

    create_table_if_not_exists(db, backend, schema.create_table_from_entity(department::Entity))
        .await?;
    create_table_if_not_exists(db, backend, schema.create_table_from_entity(person::Entity))
        .await?;

    Ok(())
}

/// Create a table if it doesn't exist
async fn create_table_if_not_exists(
    db: &DatabaseConnection,
    backend: DbBackend,
    mut stmt: TableCreateStatement,
) -> Result<(), DbErr> {
    stmt.if_not_exists();

    let sql = backend.build(&stmt);

    db.execute(Statement::from_string(backend, sql.to_string())).await?;

    Ok(())
}

/// Rebuild the search index from the person table.
///
/// One-time synchronous bulk load at startup: fetches a single page of up to
/// `MAX_PERSONS_LIMIT` persons and indexes each sequentially. Tables larger
/// than one page are not fully indexed; a latent scaling limit carried over
/// from the original design.
pub async fn reindex_persons(
    db: &DatabaseConnection,
    index: &Arc<SearchIndex>,
) -> Result<usize, DbErr> {
    let t0 = Instant::now();

    let persons = person::Entity::find()
        .order_by_desc(person::Column::Id)
        .limit(MAX_PERSONS_LIMIT)
        .all(db)
        .await?;

    for p in &persons {
        index.index(&p.index_text(), p.id);
    }

    info!(
        "Indexed {} persons in {:?}",
        persons.len(),
        t0.elapsed()
    );

    Ok(persons.len())
}

#[cfg(test)]
mod tests {
    use super::*;
    use sea_orm::{ActiveModelTrait, Set};

    async fn open_mem() -> DatabaseConnection {
        // a single connection keeps the in-memory database shared
        let mut opt = ConnectOptions::new("sqlite::memory:");
        opt.max_connections(1);
        let db = Database::connect(opt).await.unwrap();
        create_schema(&db).await.unwrap();
        db
    }

    #[tokio::test]
    async fn test_schema_creation_is_idempotent() {
        let db = open_mem().await;
        create_schema(&db).await.unwrap();
    }

    #[tokio::test]
    async fn test_reindex_persons() {
        let db = open_mem().await;

        let dept = department::ActiveModel {
            name: Set("mainA".to_string()),
            parent_id: Set(0),
            ..Default::default()
        }
        .insert(&db)
        .await
        .unwrap();

        person::ActiveModel {
            name: Set("Jane Doe".to_string()),
            dept_id: Set(dept.id),
            email: Set(String::new()),
            phone: Set(String::new()),
            image_path: Set(String::new()),
            role: Set("Archivist".to_string()),
            info: Set(String::new()),
            updated_at: Set(chrono::Utc::now()),
            ..Default::default()
        }
        .insert(&db)
        .await
        .unwrap();

        let index = Arc::new(SearchIndex::default());
        let n = reindex_persons(&db, &index).await.unwrap();
        assert_eq!(n, 1);
        assert_eq!(index.query("jane").len(), 1);
        assert_eq!(index.query("archivist").len(), 1);
    }
}
