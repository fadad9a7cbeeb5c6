//! Seed script for development: populates a fresh database with sample data.
//!
//! Usage: `cargo run --bin seed`
//!
//! Requires `DATABASE_URL` (reads .env).

use chrono::{Datelike, Duration, NaiveDate, Utc};
use oficina::models::service_order::OrderStatus;
use oficina::models::user::UserRole;
use oficina::services::auth;
use rust_decimal::Decimal;
use sqlx::PgPool;
use uuid::Uuid;

const ADMIN_PASSWORD: &str = "Admin123!";
const EMPLOYEE_PASSWORD: &str = "Oficina123";

const CUSTOMERS: [(&str, &str, &str); 4] = [
    ("Ana Pereira", "(11) 98888-1010", "ana.pereira@example.com"),
    ("Bruno Costa", "(11) 97777-2020", "bruno.costa@example.com"),
    ("Carla Mendes", "(21) 96666-3030", "carla.mendes@example.com"),
    ("Diego Rocha", "(31) 95555-4040", "diego.rocha@example.com"),
];

/// (customer index, model, make, plate, year)
const VEHICLES: [(usize, &str, &str, &str, i32); 5] = [
    (0, "Gol", "Volkswagen", "ABC1234", 2015),
    (0, "Onix", "Chevrolet", "BRA2E19", 2021),
    (1, "HB20", "Hyundai", "FJK4321", 2018),
    (2, "Corolla", "Toyota", "RIO3C45", 2020),
    (3, "Uno", "Fiat", "MGS9087", 2012),
];

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let db_url = std::env::var("DATABASE_URL")?;
    let pool = oficina::db::create_pool(&db_url, 5).await?;
    oficina::db::run_migrations(&pool).await?;

    println!("=== Oficina Seed Script ===");

    seed_users(&pool).await?;
    let vehicles = seed_customers_and_vehicles(&pool).await?;
    seed_service_orders(&pool, &vehicles).await?;

    println!("\n=== Seed complete! ===");
    println!("Admin login: admin@oficina.local / {ADMIN_PASSWORD}");
    println!("Employee login: funcionario@oficina.local / {EMPLOYEE_PASSWORD}");

    Ok(())
}

async fn seed_users(pool: &PgPool) -> anyhow::Result<()> {
    for (username, email, name, password, role) in [
        ("admin", "admin@oficina.local", "Administrador", ADMIN_PASSWORD, UserRole::Admin),
        (
            "funcionario",
            "funcionario@oficina.local",
            "Funcionário",
            EMPLOYEE_PASSWORD,
            UserRole::Employee,
        ),
    ] {
        let hash = auth::hash_password(password)?;
        let updated = sqlx::query("UPDATE users SET password_hash = $1 WHERE username = $2")
            .bind(&hash)
            .bind(username)
            .execute(pool)
            .await?
            .rows_affected();
        if updated > 0 {
            println!("[skip] User '{username}' exists, password reset");
            continue;
        }
        auth::insert_user(pool, username, email, &hash, name, None, role).await?;
        println!("[done] Created user '{username}' ({})", role.as_str());
    }
    Ok(())
}

/// Returns (customer_id, vehicle_id) pairs.
async fn seed_customers_and_vehicles(pool: &PgPool) -> anyhow::Result<Vec<(Uuid, Uuid)>> {
    let existing: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM vehicles")
        .fetch_one(pool)
        .await?;
    if existing > 0 {
        println!("[skip] Vehicles already exist");
        let pairs = sqlx::query_as::<_, (Uuid, Uuid)>("SELECT customer_id, id FROM vehicles")
            .fetch_all(pool)
            .await?;
        return Ok(pairs);
    }

    let mut customer_ids = Vec::with_capacity(CUSTOMERS.len());
    for (name, phone, email) in CUSTOMERS {
        let id: Uuid = sqlx::query_scalar(
            "INSERT INTO customers (name, phone, email) VALUES ($1, $2, $3) RETURNING id",
        )
        .bind(name)
        .bind(phone)
        .bind(email)
        .fetch_one(pool)
        .await?;
        customer_ids.push(id);
    }

    let mut pairs = Vec::with_capacity(VEHICLES.len());
    for (owner, model, make, plate, year) in VEHICLES {
        let customer_id = customer_ids[owner];
        let id: Uuid = sqlx::query_scalar(
            "INSERT INTO vehicles (customer_id, model, make, plate, year, mileage) \
             VALUES ($1, $2, $3, $4, $5, $6) RETURNING id",
        )
        .bind(customer_id)
        .bind(model)
        .bind(make)
        .bind(plate)
        .bind(year)
        .bind((Utc::now().year() - year) * 12_000)
        .fetch_one(pool)
        .await?;
        pairs.push((customer_id, id));
    }

    println!(
        "[done] Created {} customers and {} vehicles",
        customer_ids.len(),
        pairs.len()
    );
    Ok(pairs)
}

/// Orders spread over the last six months with a mix of statuses, plus one
/// legacy-status row and one row without `created_at`.
async fn seed_service_orders(pool: &PgPool, vehicles: &[(Uuid, Uuid)]) -> anyhow::Result<()> {
    let existing: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM service_orders")
        .fetch_one(pool)
        .await?;
    if existing > 0 || vehicles.is_empty() {
        println!("[skip] Service orders already exist");
        return Ok(());
    }

    let today = Utc::now().date_naive();
    let statuses = [
        OrderStatus::Finished,
        OrderStatus::Finished,
        OrderStatus::InProgress,
        OrderStatus::Open,
        OrderStatus::Cancelled,
    ];
    let mut created = 0usize;

    for month_back in 0..6i64 {
        for slot in 0..(3 + month_back as usize % 3) {
            let (customer_id, vehicle_id) = vehicles[(month_back as usize + slot) % vehicles.len()];
            let entry_date = today - Duration::days(month_back * 30 + slot as i64 * 3);
            let status = statuses[(slot + month_back as usize) % statuses.len()];
            let amount = Decimal::new(15_000 + (slot as i64 * 7_550) + month_back * 2_500, 2);
            insert_order(pool, customer_id, vehicle_id, entry_date, amount, status.label(), true)
                .await?;
            created += 1;
        }
    }

    // Imported rows: one with a label from the old form, one with no creation time.
    let (customer_id, vehicle_id) = vehicles[0];
    insert_order(pool, customer_id, vehicle_id, today, Decimal::new(9_900, 2), "Concluída", true)
        .await?;
    insert_order(
        pool,
        customer_id,
        vehicle_id,
        today - Duration::days(45),
        Decimal::new(22_000, 2),
        OrderStatus::Finished.label(),
        false,
    )
    .await?;

    println!("[done] Created {} service orders", created + 2);
    Ok(())
}

async fn insert_order(
    pool: &PgPool,
    customer_id: Uuid,
    vehicle_id: Uuid,
    entry_date: NaiveDate,
    amount: Decimal,
    status: &str,
    with_created_at: bool,
) -> anyhow::Result<()> {
    let created_at = with_created_at
        .then(|| entry_date.and_hms_opt(9, 0, 0))
        .flatten()
        .map(|naive| naive.and_utc());

    sqlx::query(
        "INSERT INTO service_orders \
            (customer_id, vehicle_id, entry_date, reported_problem, services_performed, amount, status, created_at) \
         VALUES ($1, $2, $3, $4, $5, $6, $7, $8)",
    )
    .bind(customer_id)
    .bind(vehicle_id)
    .bind(entry_date)
    .bind("Revisão periódica")
    .bind("Troca de óleo e filtros")
    .bind(amount)
    .bind(status)
    .bind(created_at)
    .execute(pool)
    .await?;
    Ok(())
}
