//! Seed script for development — populates a fresh database with catalog data.
//!
//! Usage: `cargo run --bin seed`
//!
//! Requires `DATABASE_URL` (reads .env).

use sqlx::PgPool;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let db_url = std::env::var("DATABASE_URL").expect("DATABASE_URL must be set");
    let pool = sqlx::postgres::PgPoolOptions::new()
        .max_connections(5)
        .connect(&db_url)
        .await?;

    // Run migrations first
    sqlx::migrate!("./migrations").run(&pool).await?;

    println!("=== Casita Azul Seed Script ===");

    seed_catalog(&pool, "tipos_negocio", &["Venta", "Alquiler", "Venta y Alquiler"]).await?;
    seed_catalog(
        &pool,
        "tipos_propiedad",
        &[
            "Apartamento",
            "Casa",
            "Local Comercial",
            "Oficina",
            "Lote",
            "Finca",
            "Bodega",
        ],
    )
    .await?;
    seed_catalog(
        &pool,
        "estados_publicacion",
        &["Borrador", "Publicada", "Pausada", "Vendida", "Alquilada"],
    )
    .await?;
    seed_catalog(&pool, "estados_fisicos", &["Nuevo", "Usado", "Sobre Planos", "Remodelado"])
        .await?;
    seed_catalog(&pool, "monedas", &["COP", "USD", "EUR"]).await?;
    seed_catalog(&pool, "frecuencias_alquiler", &["Mensual", "Anual", "Diaria"]).await?;
    seed_geography(&pool).await?;
    seed_agents(&pool).await?;

    println!("\n=== Seed complete! ===");

    Ok(())
}

/// Insert names into a catalog table keyed by `nombre`, skipping existing rows.
async fn seed_catalog(pool: &PgPool, table: &str, names: &[&str]) -> anyhow::Result<()> {
    let mut inserted = 0u32;
    for name in names {
        let exists: bool =
            sqlx::query_scalar(&format!("SELECT EXISTS(SELECT 1 FROM {table} WHERE nombre = $1)"))
                .bind(name)
                .fetch_one(pool)
                .await?;
        if exists {
            continue;
        }
        sqlx::query(&format!("INSERT INTO {table} (nombre) VALUES ($1)"))
            .bind(name)
            .execute(pool)
            .await?;
        inserted += 1;
    }

    if inserted == 0 {
        println!("[skip] {table} already populated");
    } else {
        println!("[done] {table}: {inserted} rows");
    }
    Ok(())
}

/// States, their capital cities, and a few zones per city.
async fn seed_geography(pool: &PgPool) -> anyhow::Result<()> {
    let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM estados")
        .fetch_one(pool)
        .await?;
    if count > 0 {
        println!("[skip] Geography already exists ({count} states)");
        return Ok(());
    }

    let geography = [
        ("Cundinamarca", "Bogotá", vec!["Chapinero", "Usaquén", "Teusaquillo"]),
        ("Antioquia", "Medellín", vec!["El Poblado", "Laureles", "Envigado"]),
        ("Valle del Cauca", "Cali", vec!["Granada", "Ciudad Jardín"]),
        ("Atlántico", "Barranquilla", vec!["El Prado", "Alto Prado"]),
    ];

    for (state, city, zones) in geography {
        let estado_id: i64 = sqlx::query_scalar("INSERT INTO estados (nombre) VALUES ($1) RETURNING id")
            .bind(state)
            .fetch_one(pool)
            .await?;
        let ciudad_id: i64 = sqlx::query_scalar(
            "INSERT INTO ciudades (nombre, estado_id) VALUES ($1, $2) RETURNING id",
        )
        .bind(city)
        .bind(estado_id)
        .fetch_one(pool)
        .await?;
        for zone in zones {
            sqlx::query("INSERT INTO zonas (nombre, ciudad_id) VALUES ($1, $2)")
                .bind(zone)
                .bind(ciudad_id)
                .execute(pool)
                .await?;
        }
    }

    println!("[done] Created 4 states with cities and zones");
    Ok(())
}

async fn seed_agents(pool: &PgPool) -> anyhow::Result<()> {
    let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM agentes")
        .fetch_one(pool)
        .await?;
    if count > 0 {
        println!("[skip] Agents already exist ({count})");
        return Ok(());
    }

    let agents = [
        ("María Rodríguez", "maria.rodriguez@casitaazul.co", Some("+57 300 111 2233")),
        ("Carlos Gómez", "carlos.gomez@casitaazul.co", Some("+57 301 444 5566")),
        ("Laura Martínez", "laura.martinez@casitaazul.co", None),
    ];

    for (name, email, phone) in agents {
        sqlx::query("INSERT INTO agentes (nombre, email, telefono) VALUES ($1, $2, $3)")
            .bind(name)
            .bind(email)
            .bind(phone)
            .execute(pool)
            .await?;
    }

    sqlx::query(
        "INSERT INTO agentes_externos (nombre) VALUES ('Inmobiliaria Horizonte'), ('Referido particular')",
    )
    .execute(pool)
    .await?;

    println!("[done] Created 3 agents and 2 external agents");
    Ok(())
}
