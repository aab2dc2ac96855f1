//! # Station Repository
//!
//! Reference data: stations, their nozzles, and their employees.

use chrono::Utc;
use sqlx::SqlitePool;
use tracing::debug;

use crate::error::{DbError, DbResult};
use crate::repository::new_id;
use forecourt_core::validation::validate_name;
use forecourt_core::{Employee, FuelType, Nozzle, Station};

/// Repository for station reference data.
#[derive(Debug, Clone)]
pub struct StationRepository {
    pool: SqlitePool,
}

impl StationRepository {
    /// Creates a new StationRepository.
    pub fn new(pool: SqlitePool) -> Self {
        StationRepository { pool }
    }

    /// Creates a station.
    pub async fn create_station(&self, name: &str) -> DbResult<Station> {
        let name = validate_name("station name", name).map_err(forecourt_core::CoreError::from)?;
        let station = Station {
            id: new_id(),
            name,
            created_at: Utc::now(),
        };

        debug!(id = %station.id, name = %station.name, "creating station");

        sqlx::query("INSERT INTO stations (id, name, created_at) VALUES (?1, ?2, ?3)")
            .bind(&station.id)
            .bind(&station.name)
            .bind(station.created_at)
            .execute(&self.pool)
            .await?;

        Ok(station)
    }

    /// Gets a station by ID.
    pub async fn get_station(&self, id: &str) -> DbResult<Option<Station>> {
        let station = sqlx::query_as::<_, Station>(
            "SELECT id, name, created_at FROM stations WHERE id = ?1",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(station)
    }

    /// Gets a station by ID, erroring when absent.
    pub async fn require_station(&self, id: &str) -> DbResult<Station> {
        self.get_station(id)
            .await?
            .ok_or_else(|| DbError::not_found("Station", id))
    }

    /// Lists all stations.
    pub async fn list_stations(&self) -> DbResult<Vec<Station>> {
        let stations = sqlx::query_as::<_, Station>(
            "SELECT id, name, created_at FROM stations ORDER BY name",
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(stations)
    }

    /// Creates a nozzle under a station.
    pub async fn create_nozzle(
        &self,
        station_id: &str,
        fuel_type: FuelType,
        label: &str,
    ) -> DbResult<Nozzle> {
        self.require_station(station_id).await?;
        let label = validate_name("nozzle label", label).map_err(forecourt_core::CoreError::from)?;

        let nozzle = Nozzle {
            id: new_id(),
            station_id: station_id.to_string(),
            fuel_type,
            label,
            is_active: true,
            created_at: Utc::now(),
        };

        debug!(id = %nozzle.id, station_id, %fuel_type, "creating nozzle");

        sqlx::query(
            r#"
            INSERT INTO nozzles (id, station_id, fuel_type, label, is_active, created_at)
            VALUES (?1, ?2, ?3, ?4, ?5, ?6)
            "#,
        )
        .bind(&nozzle.id)
        .bind(&nozzle.station_id)
        .bind(nozzle.fuel_type)
        .bind(&nozzle.label)
        .bind(nozzle.is_active)
        .bind(nozzle.created_at)
        .execute(&self.pool)
        .await?;

        Ok(nozzle)
    }

    /// Gets a nozzle by ID.
    pub async fn get_nozzle(&self, id: &str) -> DbResult<Option<Nozzle>> {
        let nozzle = sqlx::query_as::<_, Nozzle>(
            r#"
            SELECT id, station_id, fuel_type, label, is_active, created_at
            FROM nozzles
            WHERE id = ?1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(nozzle)
    }

    /// Lists a station's nozzles.
    pub async fn list_nozzles(&self, station_id: &str) -> DbResult<Vec<Nozzle>> {
        let nozzles = sqlx::query_as::<_, Nozzle>(
            r#"
            SELECT id, station_id, fuel_type, label, is_active, created_at
            FROM nozzles
            WHERE station_id = ?1
            ORDER BY label
            "#,
        )
        .bind(station_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(nozzles)
    }

    /// Creates an employee under a station.
    pub async fn create_employee(&self, station_id: &str, name: &str) -> DbResult<Employee> {
        self.require_station(station_id).await?;
        let name = validate_name("employee name", name).map_err(forecourt_core::CoreError::from)?;

        let employee = Employee {
            id: new_id(),
            station_id: station_id.to_string(),
            name,
            is_active: true,
            created_at: Utc::now(),
        };

        debug!(id = %employee.id, station_id, "creating employee");

        sqlx::query(
            r#"
            INSERT INTO employees (id, station_id, name, is_active, created_at)
            VALUES (?1, ?2, ?3, ?4, ?5)
            "#,
        )
        .bind(&employee.id)
        .bind(&employee.station_id)
        .bind(&employee.name)
        .bind(employee.is_active)
        .bind(employee.created_at)
        .execute(&self.pool)
        .await?;

        Ok(employee)
    }

    /// Lists a station's employees.
    pub async fn list_employees(&self, station_id: &str) -> DbResult<Vec<Employee>> {
        let employees = sqlx::query_as::<_, Employee>(
            r#"
            SELECT id, station_id, name, is_active, created_at
            FROM employees
            WHERE station_id = ?1
            ORDER BY name
            "#,
        )
        .bind(station_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(employees)
    }
}
