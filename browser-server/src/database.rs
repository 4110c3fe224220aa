use sqlx::sqlite::SqlitePool;
use tracing::info;

/// Demo schema covering every browsing path: rowid tables, a WITHOUT ROWID
/// table, binary cells, an empty table and views.
const SCHEMA: &[&str] = &[
    r#"
    CREATE TABLE IF NOT EXISTS users (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        name TEXT NOT NULL,
        email TEXT UNIQUE NOT NULL,
        created_at DATETIME DEFAULT CURRENT_TIMESTAMP,
        is_active BOOLEAN DEFAULT true
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS orders (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        user_id INTEGER REFERENCES users(id),
        quantity INTEGER NOT NULL,
        total REAL NOT NULL,
        status TEXT DEFAULT 'pending'
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS settings (
        key TEXT PRIMARY KEY,
        value TEXT
    ) WITHOUT ROWID
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS attachments (
        id INTEGER PRIMARY KEY,
        file_name TEXT NOT NULL,
        content BLOB
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS audit_log (
        id INTEGER PRIMARY KEY,
        message TEXT
    )
    "#,
    r#"
    CREATE VIEW IF NOT EXISTS active_users AS
        SELECT id, name, email FROM users WHERE is_active
    "#,
    r#"
    CREATE VIEW IF NOT EXISTS order_totals AS
        SELECT user_id, COUNT(*) AS order_count, SUM(total) AS revenue
        FROM orders GROUP BY user_id
    "#,
];

pub async fn setup(pool: &SqlitePool) -> Result<(), sqlx::Error> {
    for statement in SCHEMA {
        sqlx::query(*statement).execute(pool).await?;
    }

    seed_sample_data(pool).await
}

async fn seed_sample_data(pool: &SqlitePool) -> Result<(), sqlx::Error> {
    let user_count: (i64,) = sqlx::query_as("SELECT COUNT(*) FROM users")
        .fetch_one(pool)
        .await?;

    if user_count.0 > 0 {
        info!("demo data already present");
        return Ok(());
    }

    let first_names = [
        "Alice", "Bob", "Charlie", "Diana", "Evan", "Fiona", "George", "Hannah", "Isaac", "Julia",
    ];
    let last_names = [
        "Johnson", "Smith", "Brown", "Prince", "Davis", "Wilson", "Taylor", "Anderson",
    ];

    let mut transaction = pool.begin().await?;

    for index in 0..200 {
        let first = first_names[index % first_names.len()];
        let last = last_names[index % last_names.len()];
        let email = format!(
            "{}.{}{}@example.com",
            first.to_lowercase(),
            last.to_lowercase(),
            index
        );
        sqlx::query("INSERT INTO users (name, email, is_active) VALUES (?, ?, ?)")
            .bind(format!("{} {}", first, last))
            .bind(email)
            .bind(index % 5 != 0)
            .execute(&mut *transaction)
            .await?;
    }

    // Few distinct statuses, so sorting by status exercises the rowid tiebreaker.
    let statuses = ["pending", "shipped", "completed"];
    for index in 0..2000 {
        let quantity = (index % 10) + 1;
        sqlx::query("INSERT INTO orders (user_id, quantity, total, status) VALUES (?, ?, ?, ?)")
            .bind((index % 200 + 1) as i64)
            .bind(quantity as i64)
            .bind(quantity as f64 * 12.5)
            .bind(statuses[index % statuses.len()])
            .execute(&mut *transaction)
            .await?;
    }

    for (key, value) in [("theme", "dark"), ("language", "en"), ("page_size", "50")] {
        sqlx::query("INSERT INTO settings (key, value) VALUES (?, ?)")
            .bind(key)
            .bind(value)
            .execute(&mut *transaction)
            .await?;
    }

    for index in 0..20_u8 {
        let content: Vec<u8> = (0..16)
            .map(|offset| index.wrapping_mul(16).wrapping_add(offset))
            .collect();
        sqlx::query("INSERT INTO attachments (file_name, content) VALUES (?, ?)")
            .bind(format!("file_{index}.bin"))
            .bind(content)
            .execute(&mut *transaction)
            .await?;
    }

    transaction.commit().await?;

    info!("Demo data seeded: 200 users, 2000 orders, 3 settings, 20 attachments");
    Ok(())
}
