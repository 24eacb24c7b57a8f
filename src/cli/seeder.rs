use anyhow::{Context, Result};
use fake::Fake;
use fake::faker::name::en::{FirstName, LastName};
use rand::Rng;
use rust_decimal::Decimal;
use sqlx::PgPool;

use crate::modules::rubros::model::TipoRubro;

const SEDES: &[(&str, &str)] = &[
    ("Sede Central", "4a avenida 7-50, zona 1"),
    ("Sede Norte", "Km 12 carretera al Atlántico"),
];

const NIVELES: &[&str] = &["Preprimaria", "Primaria", "Básicos"];

const GRADOS: &[(&str, usize)] = &[
    ("Kinder", 0),
    ("Preparatoria", 0),
    ("Primero primaria", 1),
    ("Segundo primaria", 1),
    ("Tercero primaria", 1),
    ("Primero básico", 2),
    ("Segundo básico", 2),
];

/// Seeds catalogs and `count` demo students with fee definitions. Safe to run
/// repeatedly against an empty database; it does not deduplicate.
pub async fn run(db: &PgPool, count: usize) -> Result<()> {
    println!("Sembrando datos de demostración...");

    let mut sede_ids = Vec::new();
    for (nombre, direccion) in SEDES {
        let id: i32 = sqlx::query_scalar(
            "INSERT INTO sedes (nombre, direccion) VALUES ($1, $2) RETURNING id",
        )
        .bind(nombre)
        .bind(direccion)
        .fetch_one(db)
        .await
        .context("Failed to seed sedes")?;
        sede_ids.push(id);
    }

    let mut nivel_ids = Vec::new();
    for nombre in NIVELES {
        let id: i32 =
            sqlx::query_scalar("INSERT INTO niveles_educativos (nombre) VALUES ($1) RETURNING id")
                .bind(nombre)
                .fetch_one(db)
                .await
                .context("Failed to seed niveles")?;
        nivel_ids.push(id);
    }

    let mut grado_ids = Vec::new();
    for (nombre, nivel_idx) in GRADOS {
        let id: i32 = sqlx::query_scalar(
            "INSERT INTO grados (nombre, nivel_educativo_id) VALUES ($1, $2) RETURNING id",
        )
        .bind(nombre)
        .bind(nivel_ids[*nivel_idx])
        .fetch_one(db)
        .await
        .context("Failed to seed grados")?;
        grado_ids.push(id);
    }

    let rubros: &[(&str, TipoRubro, Option<Decimal>, Option<i32>)] = &[
        ("Colegiatura mensual", TipoRubro::Colegiatura, Some(Decimal::from(450)), Some(5)),
        ("Inscripción anual", TipoRubro::Inscripcion, Some(Decimal::from(800)), None),
        ("Transporte ruta norte", TipoRubro::Transporte, Some(Decimal::from(150)), Some(5)),
        ("Transporte ruta sur", TipoRubro::Transporte, Some(Decimal::from(175)), Some(5)),
        ("Uniforme escolar", TipoRubro::Uniformes, None, None),
    ];

    for (descripcion, tipo, monto, dia_limite) in rubros {
        sqlx::query(
            r#"
            INSERT INTO rubros (descripcion, tipo, monto_preestablecido, dia_limite_pago)
            VALUES ($1, $2, $3, $4)
            "#,
        )
        .bind(descripcion)
        .bind(tipo)
        .bind(monto)
        .bind(dia_limite)
        .execute(db)
        .await
        .context("Failed to seed rubros")?;
    }

    let mut rng = rand::thread_rng();
    for n in 0..count {
        let primer_nombre: String = FirstName().fake();
        let segundo_nombre: String = FirstName().fake();
        let primer_apellido: String = LastName().fake();
        let segundo_apellido: String = LastName().fake();
        let sede_id = sede_ids[rng.gen_range(0..sede_ids.len())];
        let grado_id = grado_ids[rng.gen_range(0..grado_ids.len())];

        sqlx::query(
            r#"
            INSERT INTO alumnos (codigo, primer_nombre, segundo_nombre, primer_apellido,
                                 segundo_apellido, sede_id, grado_id, seccion)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            "#,
        )
        .bind(format!("AL-{:05}", n + 1))
        .bind(&primer_nombre)
        .bind(&segundo_nombre)
        .bind(&primer_apellido)
        .bind(&segundo_apellido)
        .bind(sede_id)
        .bind(grado_id)
        .bind(if rng.gen_bool(0.5) { "A" } else { "B" })
        .execute(db)
        .await
        .context("Failed to seed alumnos")?;
    }

    println!(
        "Listo: {} sedes, {} niveles, {} grados, {} rubros, {} alumnos.",
        SEDES.len(),
        NIVELES.len(),
        GRADOS.len(),
        rubros.len(),
        count
    );
    Ok(())
}
