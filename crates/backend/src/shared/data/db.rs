use once_cell::sync::OnceCell;
use sea_orm::{ConnectionTrait, Database, DatabaseBackend, DatabaseConnection, Statement};

static DB_CONN: OnceCell<DatabaseConnection> = OnceCell::new();

/// Connect to the SQLite database and bootstrap the schema.
pub async fn initialize_database(db_path: Option<&str>) -> anyhow::Result<()> {
    let db_file = db_path.unwrap_or("target/db/app.db");
    if let Some(parent) = std::path::Path::new(db_file).parent() {
        std::fs::create_dir_all(parent)?;
    }
    let absolute_path = if std::path::Path::new(db_file).is_absolute() {
        std::path::PathBuf::from(db_file)
    } else {
        std::env::current_dir()?.join(db_file)
    };
    // Normalize path separators and ensure proper URL form on Windows
    let normalized = absolute_path.to_string_lossy().replace('\\', "/");
    let needs_leading_slash = !normalized.starts_with('/') && normalized.contains(':');
    let prefix = if needs_leading_slash { "/" } else { "" };
    let db_url = format!("sqlite://{}{}?mode=rwc", prefix, normalized);
    let conn = Database::connect(&db_url).await?;

    ensure_schema(&conn).await?;

    DB_CONN
        .set(conn)
        .map_err(|_| anyhow::anyhow!("Database already initialized"))?;
    Ok(())
}

/// Minimal schema bootstrap: create missing tables, leave existing ones alone.
async fn ensure_schema(conn: &DatabaseConnection) -> anyhow::Result<()> {
    let statements = [
        r#"
        CREATE TABLE IF NOT EXISTS a001_client (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            code TEXT NOT NULL DEFAULT '',
            description TEXT NOT NULL DEFAULT '',
            comment TEXT,
            first_name TEXT NOT NULL,
            last_name TEXT NOT NULL,
            email TEXT NOT NULL UNIQUE,
            phone TEXT NOT NULL,
            date_of_birth TEXT,
            passport_number TEXT NOT NULL UNIQUE,
            nationality TEXT NOT NULL,
            country_of_residence TEXT NOT NULL,
            preferred_contact_method TEXT NOT NULL DEFAULT 'email',
            lead_source TEXT NOT NULL DEFAULT 'website',
            client_status TEXT NOT NULL DEFAULT 'new',
            visa_type TEXT,
            notes TEXT,
            is_deleted INTEGER NOT NULL DEFAULT 0,
            created_at TEXT,
            updated_at TEXT,
            version INTEGER NOT NULL DEFAULT 0
        );
        "#,
        r#"
        CREATE TABLE IF NOT EXISTS a002_visa_application (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            code TEXT NOT NULL DEFAULT '',
            description TEXT NOT NULL DEFAULT '',
            comment TEXT,
            client_id INTEGER NOT NULL,
            visa_type TEXT NOT NULL,
            stage TEXT NOT NULL DEFAULT 'initial',
            appointment_date TEXT,
            appointment_location TEXT,
            decision TEXT,
            decision_date TEXT,
            decision_notes TEXT,
            assigned_agent TEXT,
            notes TEXT,
            is_deleted INTEGER NOT NULL DEFAULT 0,
            created_at TEXT,
            updated_at TEXT,
            version INTEGER NOT NULL DEFAULT 0
        );
        "#,
        r#"
        CREATE TABLE IF NOT EXISTS a003_pricing (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            code TEXT NOT NULL DEFAULT '',
            description TEXT NOT NULL DEFAULT '',
            comment TEXT,
            visa_type TEXT NOT NULL UNIQUE,
            amount REAL NOT NULL,
            currency TEXT NOT NULL DEFAULT 'GBP',
            is_active INTEGER NOT NULL DEFAULT 1,
            is_deleted INTEGER NOT NULL DEFAULT 0,
            created_at TEXT,
            updated_at TEXT,
            version INTEGER NOT NULL DEFAULT 0
        );
        "#,
        r#"
        CREATE TABLE IF NOT EXISTS a004_invoice (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            code TEXT NOT NULL DEFAULT '',
            description TEXT NOT NULL DEFAULT '',
            comment TEXT,
            client_id INTEGER NOT NULL,
            invoice_number TEXT NOT NULL UNIQUE,
            invoice_date TEXT NOT NULL,
            due_date TEXT,
            subtotal REAL NOT NULL DEFAULT 0,
            discount REAL NOT NULL DEFAULT 0,
            tax_rate REAL NOT NULL DEFAULT 0,
            tax_amount REAL NOT NULL DEFAULT 0,
            total_amount REAL NOT NULL DEFAULT 0,
            currency TEXT NOT NULL DEFAULT 'GBP',
            status TEXT NOT NULL DEFAULT 'draft',
            notes TEXT,
            sent_date TEXT,
            paid_date TEXT,
            is_deleted INTEGER NOT NULL DEFAULT 0,
            created_at TEXT,
            updated_at TEXT,
            version INTEGER NOT NULL DEFAULT 0
        );
        "#,
        r#"
        CREATE TABLE IF NOT EXISTS a004_invoice_line (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            invoice_id INTEGER NOT NULL,
            visa_application_id INTEGER NOT NULL,
            unit_price REAL NOT NULL,
            created_at TEXT,
            UNIQUE (invoice_id, visa_application_id)
        );
        "#,
        r#"
        CREATE TABLE IF NOT EXISTS a005_payment (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            code TEXT NOT NULL DEFAULT '',
            description TEXT NOT NULL DEFAULT '',
            comment TEXT,
            client_id INTEGER NOT NULL,
            visa_application_id INTEGER,
            amount REAL NOT NULL,
            currency TEXT NOT NULL DEFAULT 'GBP',
            discount REAL NOT NULL DEFAULT 0,
            discount_type TEXT,
            payment_status TEXT NOT NULL DEFAULT 'pending',
            payment_method TEXT,
            payment_requested_date TEXT,
            payment_received_date TEXT,
            transaction_id TEXT,
            notes TEXT,
            is_deleted INTEGER NOT NULL DEFAULT 0,
            created_at TEXT,
            updated_at TEXT,
            version INTEGER NOT NULL DEFAULT 0
        );
        "#,
        r#"
        CREATE INDEX IF NOT EXISTS idx_a002_client ON a002_visa_application (client_id);
        "#,
        r#"
        CREATE INDEX IF NOT EXISTS idx_a004_client ON a004_invoice (client_id);
        "#,
        r#"
        CREATE INDEX IF NOT EXISTS idx_a004_line_invoice ON a004_invoice_line (invoice_id);
        "#,
        r#"
        CREATE INDEX IF NOT EXISTS idx_a005_client ON a005_payment (client_id);
        "#,
    ];

    for sql in statements {
        conn.execute(Statement::from_string(
            DatabaseBackend::Sqlite,
            sql.to_string(),
        ))
        .await?;
    }

    tracing::info!("Database schema verified");
    Ok(())
}

pub fn get_connection() -> &'static DatabaseConnection {
    DB_CONN
        .get()
        .expect("Database not initialized. Call initialize_database() first.")
}
