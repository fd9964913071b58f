//! Firewall log record persistence.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{PgPool, Postgres, QueryBuilder};

use fw_logs::{
    Action, CanonicalLogRecord, Direction, FirewallType, LogError, LogResult, LogStore, Page,
    RecordFilter, SearchPage,
};

const SELECT_ROWS: &str = "SELECT id, file_id, timestamp, action, protocol, source_ip, source_port,
        destination_ip, destination_port, direction, firewall_type, raw_line, created_at
     FROM firewall_logs";

/// Log row returned from the database.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct FirewallLogRow {
    pub id: i64,
    pub file_id: String,
    pub timestamp: DateTime<Utc>,
    pub action: String,
    pub protocol: String,
    pub source_ip: String,
    pub source_port: Option<i32>,
    pub destination_ip: String,
    pub destination_port: Option<i32>,
    pub direction: Option<String>,
    pub firewall_type: String,
    pub raw_line: String,
    pub created_at: DateTime<Utc>,
}

impl TryFrom<FirewallLogRow> for CanonicalLogRecord {
    type Error = LogError;

    fn try_from(row: FirewallLogRow) -> Result<Self, Self::Error> {
        let firewall_type: FirewallType = row
            .firewall_type
            .parse()
            .map_err(|e| LogError::Store(format!("row {}: {e}", row.id)))?;

        Ok(Self {
            file_id: row.file_id,
            timestamp: row.timestamp,
            action: Action::from_canonical(&row.action),
            protocol: row.protocol,
            source_ip: row.source_ip,
            source_port: row.source_port.and_then(|p| u16::try_from(p).ok()),
            destination_ip: row.destination_ip,
            destination_port: row.destination_port.and_then(|p| u16::try_from(p).ok()),
            direction: row.direction.as_deref().map(Direction::from_canonical),
            firewall_type,
            raw_line: row.raw_line,
        })
    }
}

/// `LogStore` backed by the `firewall_logs` table.
#[derive(Clone)]
pub struct PgLogStore {
    pool: PgPool,
}

impl PgLogStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

fn store_err(err: sqlx::Error) -> LogError {
    LogError::Store(err.to_string())
}

/// Append the `WHERE` clause equivalent of `RecordFilter::matches`.
fn push_filter(qb: &mut QueryBuilder<'_, Postgres>, filter: &RecordFilter) {
    qb.push(" WHERE file_id = ").push_bind(filter.file_id.clone());

    if let Some(from) = filter.from {
        qb.push(" AND timestamp >= ").push_bind(from);
    }
    if let Some(to) = filter.to {
        qb.push(" AND timestamp <= ").push_bind(to);
    }
    if let Some(action) = &filter.action {
        qb.push(" AND action = ").push_bind(action.as_str().to_string());
    }
    if let Some(protocol) = &filter.protocol {
        qb.push(" AND protocol = ").push_bind(protocol.clone());
    }
    if let Some(ip) = &filter.source_ip {
        qb.push(" AND source_ip = ").push_bind(ip.clone());
    }
    if let Some(ip) = &filter.destination_ip {
        qb.push(" AND destination_ip = ").push_bind(ip.clone());
    }
    if let Some(port) = filter.source_port {
        qb.push(" AND source_port = ").push_bind(i32::from(port));
    }
    if let Some(port) = filter.destination_port {
        qb.push(" AND destination_port = ").push_bind(i32::from(port));
    }
    if let Some(firewall_type) = filter.firewall_type {
        qb.push(" AND firewall_type = ").push_bind(firewall_type.as_str());
    }
    if let Some(direction) = &filter.direction {
        qb.push(" AND direction = ").push_bind(direction.as_str().to_string());
    }
}

fn into_records(rows: Vec<FirewallLogRow>) -> LogResult<Vec<CanonicalLogRecord>> {
    rows.into_iter().map(CanonicalLogRecord::try_from).collect()
}

#[async_trait]
impl LogStore for PgLogStore {
    async fn append(&self, record: &CanonicalLogRecord) -> LogResult<()> {
        sqlx::query(
            "INSERT INTO firewall_logs (file_id, timestamp, action, protocol, source_ip, source_port,
                 destination_ip, destination_port, direction, firewall_type, raw_line)
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11)",
        )
        .bind(&record.file_id)
        .bind(record.timestamp)
        .bind(record.action.as_str())
        .bind(&record.protocol)
        .bind(&record.source_ip)
        .bind(record.source_port.map(i32::from))
        .bind(&record.destination_ip)
        .bind(record.destination_port.map(i32::from))
        .bind(record.direction.as_ref().map(|d| d.as_str()))
        .bind(record.firewall_type.as_str())
        .bind(&record.raw_line)
        .execute(&self.pool)
        .await
        .map_err(store_err)?;
        Ok(())
    }

    async fn query(&self, filter: &RecordFilter) -> LogResult<Vec<CanonicalLogRecord>> {
        let mut qb = QueryBuilder::<Postgres>::new(SELECT_ROWS);
        push_filter(&mut qb, filter);
        qb.push(" ORDER BY timestamp, id");

        let rows: Vec<FirewallLogRow> = qb
            .build_query_as()
            .fetch_all(&self.pool)
            .await
            .map_err(store_err)?;
        into_records(rows)
    }

    async fn search(&self, filter: &RecordFilter, page: Page) -> LogResult<SearchPage> {
        let mut count = QueryBuilder::<Postgres>::new("SELECT COUNT(*) FROM firewall_logs");
        push_filter(&mut count, filter);
        let total: i64 = count
            .build_query_scalar()
            .fetch_one(&self.pool)
            .await
            .map_err(store_err)?;

        let mut qb = QueryBuilder::<Postgres>::new(SELECT_ROWS);
        push_filter(&mut qb, filter);
        qb.push(" ORDER BY timestamp, id LIMIT ")
            .push_bind(i64::from(page.limit))
            .push(" OFFSET ")
            .push_bind(page.offset() as i64);

        let rows: Vec<FirewallLogRow> = qb
            .build_query_as()
            .fetch_all(&self.pool)
            .await
            .map_err(store_err)?;

        Ok(SearchPage {
            total: usize::try_from(total).unwrap_or_default(),
            records: into_records(rows)?,
        })
    }
}
