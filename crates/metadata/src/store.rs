//! Metadata store trait and the SQLite implementation.

use crate::error::{MetadataError, MetadataResult};
use crate::models::{BottleRow, BrandRow, CountryRow, DistilleryNameRow, DistilleryRow, RegionRow};
use crate::repos::{BottleRepo, BrandRepo, DistilleryRepo, GeographyRepo};
use async_trait::async_trait;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use sqlx::{Pool, Sqlite};
use std::path::Path;
use std::str::FromStr;
use std::time::Duration;
use uuid::Uuid;

/// Combined metadata store trait.
#[async_trait]
pub trait MetadataStore:
    DistilleryRepo + BottleRepo + BrandRepo + GeographyRepo + Send + Sync
{
    /// Run database migrations.
    async fn migrate(&self) -> MetadataResult<()>;

    /// Check database connectivity and health.
    async fn health_check(&self) -> MetadataResult<()>;
}

/// SQLite-based metadata store.
pub struct SqliteStore {
    pool: Pool<Sqlite>,
}

impl SqliteStore {
    /// Create a new SQLite store and run migrations.
    pub async fn new(
        path: impl AsRef<Path>,
        query_timeout_secs: Option<u64>,
    ) -> MetadataResult<Self> {
        let path = path.as_ref();

        // Ensure parent directory exists
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)
                .map_err(|e| MetadataError::Config(format!("cannot create db directory: {e}")))?;
        }

        let opts = SqliteConnectOptions::from_str(&format!("sqlite:{}?mode=rwc", path.display()))
            .map_err(sqlx::Error::from)?
            .create_if_missing(true)
            .journal_mode(sqlx::sqlite::SqliteJournalMode::Wal)
            .synchronous(sqlx::sqlite::SqliteSynchronous::Normal)
            .foreign_keys(true)
            // Prevent transient "database is locked" errors under concurrent access.
            .busy_timeout(Duration::from_secs(5));

        let pool = SqlitePoolOptions::new()
            // SQLite permits limited write concurrency; a single connection avoids
            // persistent "database is locked" failures under axum concurrency.
            .max_connections(1)
            .connect_with(opts)
            .await?;

        let store = Self { pool };
        store.migrate().await?;

        if let Some(secs) = query_timeout_secs {
            tracing::warn!(
                query_timeout_secs = secs,
                "SQLite query timeout is advisory only; long queries may exceed it"
            );
        }

        Ok(store)
    }

    /// Get a reference to the connection pool.
    pub fn pool(&self) -> &Pool<Sqlite> {
        &self.pool
    }
}

/// Map a write error onto the store error taxonomy.
/// UNIQUE violations become `AlreadyExists`, FK violations `Constraint`.
fn map_write_error(e: sqlx::Error, what: &str) -> MetadataError {
    if let sqlx::Error::Database(db_err) = &e {
        let msg = db_err.message();
        if msg.contains("UNIQUE constraint") {
            return MetadataError::AlreadyExists(what.to_string());
        }
        if msg.contains("FOREIGN KEY constraint") {
            return MetadataError::Constraint(format!("{what}: still referenced"));
        }
    }
    e.into()
}

#[async_trait]
impl MetadataStore for SqliteStore {
    async fn migrate(&self) -> MetadataResult<()> {
        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS countries (
                country_id BLOB PRIMARY KEY,
                country_name TEXT NOT NULL UNIQUE COLLATE NOCASE,
                created_at TEXT NOT NULL
            )
            "#,
        )
        .execute(&self.pool)
        .await?;

        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS regions (
                region_id BLOB PRIMARY KEY,
                country_id BLOB NOT NULL REFERENCES countries(country_id) ON DELETE CASCADE,
                region_name TEXT NOT NULL COLLATE NOCASE,
                created_at TEXT NOT NULL,
                UNIQUE (country_id, region_name)
            )
            "#,
        )
        .execute(&self.pool)
        .await?;

        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS brands (
                brand_id BLOB PRIMARY KEY,
                brand_name TEXT NOT NULL UNIQUE COLLATE NOCASE,
                created_at TEXT NOT NULL,
                updated_at TEXT NOT NULL
            )
            "#,
        )
        .execute(&self.pool)
        .await?;

        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS distilleries (
                distillery_id BLOB PRIMARY KEY,
                distillery_name TEXT NOT NULL UNIQUE COLLATE NOCASE,
                country_id BLOB NOT NULL REFERENCES countries(country_id),
                region_id BLOB REFERENCES regions(region_id),
                founded_year INTEGER,
                is_active INTEGER NOT NULL DEFAULT 1,
                created_at TEXT NOT NULL,
                updated_at TEXT NOT NULL
            )
            "#,
        )
        .execute(&self.pool)
        .await?;

        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS bottles (
                bottle_id BLOB PRIMARY KEY,
                bottle_name TEXT NOT NULL,
                distillery_id BLOB NOT NULL REFERENCES distilleries(distillery_id) ON DELETE CASCADE,
                brand_id BLOB REFERENCES brands(brand_id),
                age_years INTEGER,
                abv REAL,
                volume_cl INTEGER,
                bottled_year INTEGER,
                notes TEXT,
                rating INTEGER,
                created_at TEXT NOT NULL,
                updated_at TEXT NOT NULL
            )
            "#,
        )
        .execute(&self.pool)
        .await?;

        sqlx::query("CREATE INDEX IF NOT EXISTS idx_bottles_distillery ON bottles(distillery_id)")
            .execute(&self.pool)
            .await?;
        sqlx::query("CREATE INDEX IF NOT EXISTS idx_regions_country ON regions(country_id)")
            .execute(&self.pool)
            .await?;

        Ok(())
    }

    async fn health_check(&self) -> MetadataResult<()> {
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(())
    }
}

#[async_trait]
impl DistilleryRepo for SqliteStore {
    async fn create_distillery(&self, distillery: &DistilleryRow) -> MetadataResult<()> {
        sqlx::query(
            r#"
            INSERT INTO distilleries (distillery_id, distillery_name, country_id, region_id, founded_year, is_active, created_at, updated_at)
            VALUES (?, ?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(distillery.distillery_id)
        .bind(&distillery.distillery_name)
        .bind(distillery.country_id)
        .bind(distillery.region_id)
        .bind(distillery.founded_year)
        .bind(distillery.is_active)
        .bind(distillery.created_at)
        .bind(distillery.updated_at)
        .execute(&self.pool)
        .await
        .map_err(|e| map_write_error(e, &format!("distillery '{}'", distillery.distillery_name)))?;
        Ok(())
    }

    async fn get_distillery(&self, distillery_id: Uuid) -> MetadataResult<Option<DistilleryRow>> {
        let row = sqlx::query_as::<_, DistilleryRow>(
            "SELECT * FROM distilleries WHERE distillery_id = ?",
        )
        .bind(distillery_id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(row)
    }

    async fn get_distillery_by_name(&self, name: &str) -> MetadataResult<Option<DistilleryRow>> {
        let row = sqlx::query_as::<_, DistilleryRow>(
            "SELECT * FROM distilleries WHERE distillery_name = ? COLLATE NOCASE",
        )
        .bind(name)
        .fetch_optional(&self.pool)
        .await?;
        Ok(row)
    }

    async fn list_distilleries(
        &self,
        limit: i64,
        offset: i64,
    ) -> MetadataResult<Vec<DistilleryRow>> {
        let rows = sqlx::query_as::<_, DistilleryRow>(
            "SELECT * FROM distilleries ORDER BY distillery_name COLLATE NOCASE LIMIT ? OFFSET ?",
        )
        .bind(limit)
        .bind(offset)
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }

    async fn count_distilleries(&self) -> MetadataResult<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM distilleries")
            .fetch_one(&self.pool)
            .await?;
        Ok(count)
    }

    async fn update_distillery(&self, distillery: &DistilleryRow) -> MetadataResult<()> {
        let result = sqlx::query(
            r#"
            UPDATE distilleries
            SET distillery_name = ?, country_id = ?, region_id = ?, founded_year = ?, is_active = ?, updated_at = ?
            WHERE distillery_id = ?
            "#,
        )
        .bind(&distillery.distillery_name)
        .bind(distillery.country_id)
        .bind(distillery.region_id)
        .bind(distillery.founded_year)
        .bind(distillery.is_active)
        .bind(distillery.updated_at)
        .bind(distillery.distillery_id)
        .execute(&self.pool)
        .await
        .map_err(|e| map_write_error(e, &format!("distillery '{}'", distillery.distillery_name)))?;

        if result.rows_affected() == 0 {
            return Err(MetadataError::NotFound(format!(
                "distillery {}",
                distillery.distillery_id
            )));
        }
        Ok(())
    }

    async fn delete_distillery(&self, distillery_id: Uuid) -> MetadataResult<()> {
        sqlx::query("DELETE FROM distilleries WHERE distillery_id = ?")
            .bind(distillery_id)
            .execute(&self.pool)
            .await?;
        Ok(())
    }

    async fn list_distillery_names(&self) -> MetadataResult<Vec<DistilleryNameRow>> {
        let rows = sqlx::query_as::<_, DistilleryNameRow>(
            "SELECT distillery_id, distillery_name FROM distilleries ORDER BY distillery_name COLLATE NOCASE",
        )
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }
}

#[async_trait]
impl BottleRepo for SqliteStore {
    async fn create_bottle(&self, bottle: &BottleRow) -> MetadataResult<()> {
        sqlx::query(
            r#"
            INSERT INTO bottles (bottle_id, bottle_name, distillery_id, brand_id, age_years, abv, volume_cl, bottled_year, notes, rating, created_at, updated_at)
            VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(bottle.bottle_id)
        .bind(&bottle.bottle_name)
        .bind(bottle.distillery_id)
        .bind(bottle.brand_id)
        .bind(bottle.age_years)
        .bind(bottle.abv)
        .bind(bottle.volume_cl)
        .bind(bottle.bottled_year)
        .bind(&bottle.notes)
        .bind(bottle.rating)
        .bind(bottle.created_at)
        .bind(bottle.updated_at)
        .execute(&self.pool)
        .await
        .map_err(|e| map_write_error(e, &format!("bottle '{}'", bottle.bottle_name)))?;
        Ok(())
    }

    async fn get_bottle(&self, bottle_id: Uuid) -> MetadataResult<Option<BottleRow>> {
        let row = sqlx::query_as::<_, BottleRow>("SELECT * FROM bottles WHERE bottle_id = ?")
            .bind(bottle_id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(row)
    }

    async fn list_bottles(&self, limit: i64, offset: i64) -> MetadataResult<Vec<BottleRow>> {
        let rows = sqlx::query_as::<_, BottleRow>(
            "SELECT * FROM bottles ORDER BY bottle_name COLLATE NOCASE LIMIT ? OFFSET ?",
        )
        .bind(limit)
        .bind(offset)
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }

    async fn list_bottles_for_distillery(
        &self,
        distillery_id: Uuid,
    ) -> MetadataResult<Vec<BottleRow>> {
        let rows = sqlx::query_as::<_, BottleRow>(
            "SELECT * FROM bottles WHERE distillery_id = ? ORDER BY bottle_name COLLATE NOCASE",
        )
        .bind(distillery_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }

    async fn count_bottles(&self) -> MetadataResult<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM bottles")
            .fetch_one(&self.pool)
            .await?;
        Ok(count)
    }

    async fn update_bottle(&self, bottle: &BottleRow) -> MetadataResult<()> {
        let result = sqlx::query(
            r#"
            UPDATE bottles
            SET bottle_name = ?, distillery_id = ?, brand_id = ?, age_years = ?, abv = ?, volume_cl = ?, bottled_year = ?, notes = ?, rating = ?, updated_at = ?
            WHERE bottle_id = ?
            "#,
        )
        .bind(&bottle.bottle_name)
        .bind(bottle.distillery_id)
        .bind(bottle.brand_id)
        .bind(bottle.age_years)
        .bind(bottle.abv)
        .bind(bottle.volume_cl)
        .bind(bottle.bottled_year)
        .bind(&bottle.notes)
        .bind(bottle.rating)
        .bind(bottle.updated_at)
        .bind(bottle.bottle_id)
        .execute(&self.pool)
        .await
        .map_err(|e| map_write_error(e, &format!("bottle '{}'", bottle.bottle_name)))?;

        if result.rows_affected() == 0 {
            return Err(MetadataError::NotFound(format!("bottle {}", bottle.bottle_id)));
        }
        Ok(())
    }

    async fn delete_bottle(&self, bottle_id: Uuid) -> MetadataResult<()> {
        sqlx::query("DELETE FROM bottles WHERE bottle_id = ?")
            .bind(bottle_id)
            .execute(&self.pool)
            .await?;
        Ok(())
    }
}

#[async_trait]
impl BrandRepo for SqliteStore {
    async fn create_brand(&self, brand: &BrandRow) -> MetadataResult<()> {
        sqlx::query(
            "INSERT INTO brands (brand_id, brand_name, created_at, updated_at) VALUES (?, ?, ?, ?)",
        )
        .bind(brand.brand_id)
        .bind(&brand.brand_name)
        .bind(brand.created_at)
        .bind(brand.updated_at)
        .execute(&self.pool)
        .await
        .map_err(|e| map_write_error(e, &format!("brand '{}'", brand.brand_name)))?;
        Ok(())
    }

    async fn get_brand(&self, brand_id: Uuid) -> MetadataResult<Option<BrandRow>> {
        let row = sqlx::query_as::<_, BrandRow>("SELECT * FROM brands WHERE brand_id = ?")
            .bind(brand_id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(row)
    }

    async fn get_brand_by_name(&self, name: &str) -> MetadataResult<Option<BrandRow>> {
        let row = sqlx::query_as::<_, BrandRow>(
            "SELECT * FROM brands WHERE brand_name = ? COLLATE NOCASE",
        )
        .bind(name)
        .fetch_optional(&self.pool)
        .await?;
        Ok(row)
    }

    async fn list_brands(&self) -> MetadataResult<Vec<BrandRow>> {
        let rows =
            sqlx::query_as::<_, BrandRow>("SELECT * FROM brands ORDER BY brand_name COLLATE NOCASE")
                .fetch_all(&self.pool)
                .await?;
        Ok(rows)
    }

    async fn update_brand(&self, brand: &BrandRow) -> MetadataResult<()> {
        let result = sqlx::query(
            "UPDATE brands SET brand_name = ?, updated_at = ? WHERE brand_id = ?",
        )
        .bind(&brand.brand_name)
        .bind(brand.updated_at)
        .bind(brand.brand_id)
        .execute(&self.pool)
        .await
        .map_err(|e| map_write_error(e, &format!("brand '{}'", brand.brand_name)))?;

        if result.rows_affected() == 0 {
            return Err(MetadataError::NotFound(format!("brand {}", brand.brand_id)));
        }
        Ok(())
    }

    async fn delete_brand(&self, brand_id: Uuid) -> MetadataResult<()> {
        sqlx::query("DELETE FROM brands WHERE brand_id = ?")
            .bind(brand_id)
            .execute(&self.pool)
            .await
            .map_err(|e| map_write_error(e, "brand"))?;
        Ok(())
    }
}

#[async_trait]
impl GeographyRepo for SqliteStore {
    async fn create_country(&self, country: &CountryRow) -> MetadataResult<()> {
        sqlx::query("INSERT INTO countries (country_id, country_name, created_at) VALUES (?, ?, ?)")
            .bind(country.country_id)
            .bind(&country.country_name)
            .bind(country.created_at)
            .execute(&self.pool)
            .await
            .map_err(|e| map_write_error(e, &format!("country '{}'", country.country_name)))?;
        Ok(())
    }

    async fn get_country(&self, country_id: Uuid) -> MetadataResult<Option<CountryRow>> {
        let row = sqlx::query_as::<_, CountryRow>("SELECT * FROM countries WHERE country_id = ?")
            .bind(country_id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(row)
    }

    async fn get_country_by_name(&self, name: &str) -> MetadataResult<Option<CountryRow>> {
        let row = sqlx::query_as::<_, CountryRow>(
            "SELECT * FROM countries WHERE country_name = ? COLLATE NOCASE",
        )
        .bind(name)
        .fetch_optional(&self.pool)
        .await?;
        Ok(row)
    }

    async fn list_countries(&self) -> MetadataResult<Vec<CountryRow>> {
        let rows = sqlx::query_as::<_, CountryRow>(
            "SELECT * FROM countries ORDER BY country_name COLLATE NOCASE",
        )
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }

    async fn delete_country(&self, country_id: Uuid) -> MetadataResult<()> {
        sqlx::query("DELETE FROM countries WHERE country_id = ?")
            .bind(country_id)
            .execute(&self.pool)
            .await
            .map_err(|e| map_write_error(e, "country"))?;
        Ok(())
    }

    async fn create_region(&self, region: &RegionRow) -> MetadataResult<()> {
        sqlx::query(
            "INSERT INTO regions (region_id, country_id, region_name, created_at) VALUES (?, ?, ?, ?)",
        )
        .bind(region.region_id)
        .bind(region.country_id)
        .bind(&region.region_name)
        .bind(region.created_at)
        .execute(&self.pool)
        .await
        .map_err(|e| map_write_error(e, &format!("region '{}'", region.region_name)))?;
        Ok(())
    }

    async fn get_region(&self, region_id: Uuid) -> MetadataResult<Option<RegionRow>> {
        let row = sqlx::query_as::<_, RegionRow>("SELECT * FROM regions WHERE region_id = ?")
            .bind(region_id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(row)
    }

    async fn list_regions(&self, country_id: Uuid) -> MetadataResult<Vec<RegionRow>> {
        let rows = sqlx::query_as::<_, RegionRow>(
            "SELECT * FROM regions WHERE country_id = ? ORDER BY region_name COLLATE NOCASE",
        )
        .bind(country_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }

    async fn delete_region(&self, region_id: Uuid) -> MetadataResult<()> {
        sqlx::query("DELETE FROM regions WHERE region_id = ?")
            .bind(region_id)
            .execute(&self.pool)
            .await
            .map_err(|e| map_write_error(e, "region"))?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use time::OffsetDateTime;

    async fn build_store() -> (tempfile::TempDir, SqliteStore) {
        let temp = tempfile::tempdir().unwrap();
        let store = SqliteStore::new(temp.path().join("metadata.db"), None)
            .await
            .unwrap();
        (temp, store)
    }

    fn country(name: &str) -> CountryRow {
        CountryRow {
            country_id: Uuid::new_v4(),
            country_name: name.to_string(),
            created_at: OffsetDateTime::now_utc(),
        }
    }

    fn distillery(name: &str, country_id: Uuid) -> DistilleryRow {
        let now = OffsetDateTime::now_utc();
        DistilleryRow {
            distillery_id: Uuid::new_v4(),
            distillery_name: name.to_string(),
            country_id,
            region_id: None,
            founded_year: Some(1815),
            is_active: true,
            created_at: now,
            updated_at: now,
        }
    }

    #[tokio::test]
    async fn distillery_round_trip() {
        let (_temp, store) = build_store().await;
        let scotland = country("Scotland");
        store.create_country(&scotland).await.unwrap();

        let row = distillery("Ardbeg", scotland.country_id);
        store.create_distillery(&row).await.unwrap();

        let fetched = store.get_distillery(row.distillery_id).await.unwrap().unwrap();
        assert_eq!(fetched.distillery_name, "Ardbeg");
        assert_eq!(fetched.founded_year, Some(1815));

        let by_name = store.get_distillery_by_name("ARDBEG").await.unwrap();
        assert!(by_name.is_some(), "name lookup should be case-insensitive");
    }

    #[tokio::test]
    async fn duplicate_distillery_name_is_already_exists() {
        let (_temp, store) = build_store().await;
        let scotland = country("Scotland");
        store.create_country(&scotland).await.unwrap();

        store
            .create_distillery(&distillery("Ardbeg", scotland.country_id))
            .await
            .unwrap();
        let err = store
            .create_distillery(&distillery("ardbeg", scotland.country_id))
            .await
            .unwrap_err();
        assert!(matches!(err, MetadataError::AlreadyExists(_)));
    }

    #[tokio::test]
    async fn list_distillery_names_is_ordered() {
        let (_temp, store) = build_store().await;
        let scotland = country("Scotland");
        store.create_country(&scotland).await.unwrap();

        for name in ["Talisker", "aberfeldy", "Bunnahabhain"] {
            store
                .create_distillery(&distillery(name, scotland.country_id))
                .await
                .unwrap();
        }

        let names: Vec<String> = store
            .list_distillery_names()
            .await
            .unwrap()
            .into_iter()
            .map(|r| r.distillery_name)
            .collect();
        assert_eq!(names, vec!["aberfeldy", "Bunnahabhain", "Talisker"]);
    }

    #[tokio::test]
    async fn delete_country_with_distilleries_is_constraint() {
        let (_temp, store) = build_store().await;
        let scotland = country("Scotland");
        store.create_country(&scotland).await.unwrap();
        store
            .create_distillery(&distillery("Ardbeg", scotland.country_id))
            .await
            .unwrap();

        let err = store.delete_country(scotland.country_id).await.unwrap_err();
        assert!(matches!(err, MetadataError::Constraint(_)));
    }

    #[tokio::test]
    async fn bottle_cascade_on_distillery_delete() {
        let (_temp, store) = build_store().await;
        let scotland = country("Scotland");
        store.create_country(&scotland).await.unwrap();
        let dist = distillery("Ardbeg", scotland.country_id);
        store.create_distillery(&dist).await.unwrap();

        let now = OffsetDateTime::now_utc();
        let bottle = BottleRow {
            bottle_id: Uuid::new_v4(),
            bottle_name: "Ardbeg 10".to_string(),
            distillery_id: dist.distillery_id,
            brand_id: None,
            age_years: Some(10),
            abv: Some(46.0),
            volume_cl: Some(70),
            bottled_year: None,
            notes: None,
            rating: Some(88),
            created_at: now,
            updated_at: now,
        };
        store.create_bottle(&bottle).await.unwrap();

        store.delete_distillery(dist.distillery_id).await.unwrap();
        assert!(store.get_bottle(bottle.bottle_id).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn region_names_unique_per_country() {
        let (_temp, store) = build_store().await;
        let scotland = country("Scotland");
        let japan = country("Japan");
        store.create_country(&scotland).await.unwrap();
        store.create_country(&japan).await.unwrap();

        let islay = RegionRow {
            region_id: Uuid::new_v4(),
            country_id: scotland.country_id,
            region_name: "Islay".to_string(),
            created_at: OffsetDateTime::now_utc(),
        };
        store.create_region(&islay).await.unwrap();

        let dup = RegionRow {
            region_id: Uuid::new_v4(),
            region_name: "islay".to_string(),
            ..islay.clone()
        };
        assert!(matches!(
            store.create_region(&dup).await.unwrap_err(),
            MetadataError::AlreadyExists(_)
        ));

        // Same name under a different country is fine
        let other = RegionRow {
            region_id: Uuid::new_v4(),
            country_id: japan.country_id,
            region_name: "Islay".to_string(),
            created_at: OffsetDateTime::now_utc(),
        };
        store.create_region(&other).await.unwrap();
    }

    #[tokio::test]
    async fn paging_walks_the_full_set() {
        let (_temp, store) = build_store().await;
        let scotland = country("Scotland");
        store.create_country(&scotland).await.unwrap();

        for i in 0..5 {
            store
                .create_distillery(&distillery(&format!("Distillery {i}"), scotland.country_id))
                .await
                .unwrap();
        }

        assert_eq!(store.count_distilleries().await.unwrap(), 5);
        let first = store.list_distilleries(2, 0).await.unwrap();
        let second = store.list_distilleries(2, 2).await.unwrap();
        let third = store.list_distilleries(2, 4).await.unwrap();
        assert_eq!(first.len(), 2);
        assert_eq!(second.len(), 2);
        assert_eq!(third.len(), 1);
        assert_eq!(first[0].distillery_name, "Distillery 0");
        assert_eq!(third[0].distillery_name, "Distillery 4");
    }
}
