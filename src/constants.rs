//! Constants
//!
//! TigerStyle: Named limits with units in the name. No magic numbers.

use std::time::Duration;

// =============================================================================
// Store
// =============================================================================

/// Document field holding an entity's unique identifier
pub const ENTITY_ID_FIELD: &str = "id";

/// Time allowed for unique index creation at store construction
pub const CREATE_INDEX_TIMEOUT_MS_DEFAULT: u64 = 5_000;

/// [`CREATE_INDEX_TIMEOUT_MS_DEFAULT`] as a `Duration`
pub const CREATE_INDEX_TIMEOUT: Duration = Duration::from_millis(CREATE_INDEX_TIMEOUT_MS_DEFAULT);

// =============================================================================
// Document Store
// =============================================================================

/// Maximum collection or field name length in bytes (Postgres identifier limit)
pub const DOCUMENT_NAME_BYTES_MAX: usize = 63;

/// Default connection pool size for the Postgres backend
pub const DB_MAX_CONNECTIONS_DEFAULT: u32 = 10;

// =============================================================================
// Environment
// =============================================================================

/// Database URL environment variable
pub const ENV_DATABASE_URL: &str = "AUTHX_DATABASE_URL";

/// Pool size environment variable
pub const ENV_DB_MAX_CONNECTIONS: &str = "AUTHX_DB_MAX_CONNECTIONS";

/// Index creation timeout environment variable (milliseconds)
pub const ENV_CREATE_INDEX_TIMEOUT_MS: &str = "AUTHX_CREATE_INDEX_TIMEOUT_MS";
