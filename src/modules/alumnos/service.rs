use rust_decimal::Decimal;
use sqlx::PgPool;
use tracing::info;

use crate::utils::errors::AppError;

use super::model::{
    Alumno, AlumnoConPagos, AlumnoListaItem, AlumnoRequest, Contacto, ContactoDeAlumno,
    ContactoRequest, PagoHistorialItem,
};

const ALUMNO_COLUMNS: &str = r#"
    id, codigo, primer_nombre, segundo_nombre, primer_apellido, segundo_apellido,
    sede_id, grado_id, seccion, becado, beca_parcial_porcentaje, estado,
    fecha_creacion, fecha_actualizacion
"#;

fn validate_beca(payload: &AlumnoRequest) -> Result<(), AppError> {
    if let Some(pct) = payload.beca_parcial_porcentaje {
        if pct < Decimal::ZERO || pct > Decimal::from(100) {
            return Err(AppError::unprocessable(anyhow::anyhow!(
                "El porcentaje de beca debe estar entre 0 y 100"
            )));
        }
    }
    match payload.estado.as_str() {
        "activo" | "inactivo" | "retirado" => Ok(()),
        _ => Err(AppError::unprocessable(anyhow::anyhow!(
            "El estado debe ser activo, inactivo o retirado"
        ))),
    }
}

async fn validate_sede_y_grado(db: &PgPool, sede_id: i32, grado_id: i32) -> Result<(), AppError> {
    let sede_exists = sqlx::query_scalar::<_, bool>("SELECT EXISTS(SELECT 1 FROM sedes WHERE id = $1)")
        .bind(sede_id)
        .fetch_one(db)
        .await
        .map_err(AppError::database)?;
    if !sede_exists {
        return Err(AppError::not_found(anyhow::anyhow!(
            "Sede {} no encontrada",
            sede_id
        )));
    }

    let grado_exists =
        sqlx::query_scalar::<_, bool>("SELECT EXISTS(SELECT 1 FROM grados WHERE id = $1)")
            .bind(grado_id)
            .fetch_one(db)
            .await
            .map_err(AppError::database)?;
    if !grado_exists {
        return Err(AppError::not_found(anyhow::anyhow!(
            "Grado {} no encontrado",
            grado_id
        )));
    }

    Ok(())
}

pub async fn list_alumnos(db: &PgPool) -> Result<Vec<Alumno>, AppError> {
    sqlx::query_as::<_, Alumno>(&format!(
        "SELECT {ALUMNO_COLUMNS} FROM alumnos ORDER BY primer_apellido, primer_nombre"
    ))
    .fetch_all(db)
    .await
    .map_err(AppError::database)
}

pub async fn get_alumno(db: &PgPool, id: i32) -> Result<Alumno, AppError> {
    sqlx::query_as::<_, Alumno>(&format!("SELECT {ALUMNO_COLUMNS} FROM alumnos WHERE id = $1"))
        .bind(id)
        .fetch_optional(db)
        .await
        .map_err(AppError::database)?
        .ok_or_else(|| AppError::not_found(anyhow::anyhow!("Alumno {} no encontrado", id)))
}

pub async fn create_alumno(
    db: &PgPool,
    payload: AlumnoRequest,
    usuario_id: i32,
) -> Result<Alumno, AppError> {
    validate_beca(&payload)?;
    validate_sede_y_grado(db, payload.sede_id, payload.grado_id).await?;

    let id = sqlx::query_scalar::<_, i32>(
        r#"
        INSERT INTO alumnos (codigo, primer_nombre, segundo_nombre, primer_apellido,
                             segundo_apellido, sede_id, grado_id, seccion, becado,
                             beca_parcial_porcentaje, estado, usuario_creacion_id)
        VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12)
        RETURNING id
        "#,
    )
    .bind(&payload.codigo)
    .bind(&payload.primer_nombre)
    .bind(&payload.segundo_nombre)
    .bind(&payload.primer_apellido)
    .bind(&payload.segundo_apellido)
    .bind(payload.sede_id)
    .bind(payload.grado_id)
    .bind(&payload.seccion)
    .bind(payload.becado)
    .bind(payload.beca_parcial_porcentaje)
    .bind(&payload.estado)
    .bind(usuario_id)
    .fetch_one(db)
    .await
    .map_err(|e| match &e {
        sqlx::Error::Database(db_err) if db_err.is_unique_violation() => AppError::conflict(
            anyhow::anyhow!("Ya existe un alumno con el código {}", payload.codigo),
        ),
        _ => AppError::database(e),
    })?;

    info!(alumno_id = id, codigo = %payload.codigo, "Student created");
    get_alumno(db, id).await
}

pub async fn update_alumno(
    db: &PgPool,
    id: i32,
    payload: AlumnoRequest,
    usuario_id: i32,
) -> Result<Alumno, AppError> {
    validate_beca(&payload)?;
    get_alumno(db, id).await?;
    validate_sede_y_grado(db, payload.sede_id, payload.grado_id).await?;

    sqlx::query(
        r#"
        UPDATE alumnos
        SET codigo = $1, primer_nombre = $2, segundo_nombre = $3, primer_apellido = $4,
            segundo_apellido = $5, sede_id = $6, grado_id = $7, seccion = $8, becado = $9,
            beca_parcial_porcentaje = $10, estado = $11,
            fecha_actualizacion = NOW(), usuario_actualizacion_id = $12
        WHERE id = $13
        "#,
    )
    .bind(&payload.codigo)
    .bind(&payload.primer_nombre)
    .bind(&payload.segundo_nombre)
    .bind(&payload.primer_apellido)
    .bind(&payload.segundo_apellido)
    .bind(payload.sede_id)
    .bind(payload.grado_id)
    .bind(&payload.seccion)
    .bind(payload.becado)
    .bind(payload.beca_parcial_porcentaje)
    .bind(&payload.estado)
    .bind(usuario_id)
    .bind(id)
    .execute(db)
    .await
    .map_err(|e| match &e {
        sqlx::Error::Database(db_err) if db_err.is_unique_violation() => AppError::conflict(
            anyhow::anyhow!("Ya existe un alumno con el código {}", payload.codigo),
        ),
        _ => AppError::database(e),
    })?;

    get_alumno(db, id).await
}

pub async fn delete_alumno(db: &PgPool, id: i32) -> Result<(), AppError> {
    let result = sqlx::query("DELETE FROM alumnos WHERE id = $1")
        .bind(id)
        .execute(db)
        .await
        .map_err(|e| match &e {
            sqlx::Error::Database(db_err) if db_err.is_foreign_key_violation() => {
                AppError::conflict(anyhow::anyhow!(
                    "El alumno tiene pagos registrados y no puede eliminarse"
                ))
            }
            _ => AppError::database(e),
        })?;

    if result.rows_affected() == 0 {
        return Err(AppError::not_found(anyhow::anyhow!(
            "Alumno {} no encontrado",
            id
        )));
    }
    Ok(())
}

async fn historial_pagos(db: &PgPool, alumno_id: i32) -> Result<Vec<PagoHistorialItem>, AppError> {
    sqlx::query_as::<_, PagoHistorialItem>(
        r#"
        SELECT p.id, p.rubro_id, r.descripcion AS rubro_descripcion, p.ciclo_escolar,
               p.fecha, p.monto, p.medio_pago, p.mes_colegiatura, p.anio_colegiatura,
               p.es_anulado
        FROM pagos p
        JOIN rubros r ON r.id = p.rubro_id
        WHERE p.alumno_id = $1
        ORDER BY p.fecha DESC
        "#,
    )
    .bind(alumno_id)
    .fetch_all(db)
    .await
    .map_err(AppError::database)
}

pub async fn get_alumno_con_pagos(db: &PgPool, id: i32) -> Result<AlumnoConPagos, AppError> {
    let alumno = get_alumno(db, id).await?;
    let pagos = historial_pagos(db, id).await?;
    Ok(AlumnoConPagos { alumno, pagos })
}

pub async fn get_alumno_por_codigo(db: &PgPool, codigo: &str) -> Result<AlumnoConPagos, AppError> {
    let alumno = sqlx::query_as::<_, Alumno>(&format!(
        "SELECT {ALUMNO_COLUMNS} FROM alumnos WHERE codigo = $1"
    ))
    .bind(codigo)
    .fetch_optional(db)
    .await
    .map_err(AppError::database)?
    .ok_or_else(|| {
        AppError::not_found(anyhow::anyhow!("Alumno con código {} no encontrado", codigo))
    })?;

    let pagos = historial_pagos(db, alumno.id).await?;
    Ok(AlumnoConPagos { alumno, pagos })
}

pub async fn buscar_alumnos(
    db: &PgPool,
    nombre: Option<&str>,
    apellido: Option<&str>,
) -> Result<Vec<Alumno>, AppError> {
    let nombre_pattern = nombre.map(|n| format!("%{}%", n));
    let apellido_pattern = apellido.map(|a| format!("%{}%", a));

    sqlx::query_as::<_, Alumno>(&format!(
        r#"
        SELECT {ALUMNO_COLUMNS} FROM alumnos
        WHERE ($1::TEXT IS NULL OR primer_nombre ILIKE $1 OR segundo_nombre ILIKE $1)
          AND ($2::TEXT IS NULL OR primer_apellido ILIKE $2 OR segundo_apellido ILIKE $2)
        ORDER BY primer_apellido, primer_nombre
        "#
    ))
    .bind(nombre_pattern)
    .bind(apellido_pattern)
    .fetch_all(db)
    .await
    .map_err(AppError::database)
}

pub async fn lista_alumnos(db: &PgPool) -> Result<Vec<AlumnoListaItem>, AppError> {
    sqlx::query_as::<_, AlumnoListaItem>(
        r#"
        SELECT id, codigo,
               TRIM(CONCAT_WS(' ', primer_nombre, segundo_nombre,
                              primer_apellido, segundo_apellido)) AS nombre_completo
        FROM alumnos
        ORDER BY nombre_completo
        "#,
    )
    .fetch_all(db)
    .await
    .map_err(AppError::database)
}

// Contactos

pub async fn list_contactos(db: &PgPool) -> Result<Vec<Contacto>, AppError> {
    sqlx::query_as::<_, Contacto>(
        "SELECT id, nombre, telefono_trabajo, celular, email, direccion, nit FROM contactos ORDER BY nombre",
    )
    .fetch_all(db)
    .await
    .map_err(AppError::database)
}

pub async fn get_contacto(db: &PgPool, id: i32) -> Result<Contacto, AppError> {
    sqlx::query_as::<_, Contacto>(
        "SELECT id, nombre, telefono_trabajo, celular, email, direccion, nit FROM contactos WHERE id = $1",
    )
    .bind(id)
    .fetch_optional(db)
    .await
    .map_err(AppError::database)?
    .ok_or_else(|| AppError::not_found(anyhow::anyhow!("Contacto {} no encontrado", id)))
}

pub async fn create_contacto(db: &PgPool, payload: ContactoRequest) -> Result<Contacto, AppError> {
    sqlx::query_as::<_, Contacto>(
        r#"
        INSERT INTO contactos (nombre, telefono_trabajo, celular, email, direccion, nit)
        VALUES ($1, $2, $3, $4, $5, $6)
        RETURNING id, nombre, telefono_trabajo, celular, email, direccion, nit
        "#,
    )
    .bind(&payload.nombre)
    .bind(&payload.telefono_trabajo)
    .bind(&payload.celular)
    .bind(&payload.email)
    .bind(&payload.direccion)
    .bind(&payload.nit)
    .fetch_one(db)
    .await
    .map_err(AppError::database)
}

pub async fn update_contacto(
    db: &PgPool,
    id: i32,
    payload: ContactoRequest,
) -> Result<Contacto, AppError> {
    sqlx::query_as::<_, Contacto>(
        r#"
        UPDATE contactos
        SET nombre = $1, telefono_trabajo = $2, celular = $3, email = $4, direccion = $5, nit = $6
        WHERE id = $7
        RETURNING id, nombre, telefono_trabajo, celular, email, direccion, nit
        "#,
    )
    .bind(&payload.nombre)
    .bind(&payload.telefono_trabajo)
    .bind(&payload.celular)
    .bind(&payload.email)
    .bind(&payload.direccion)
    .bind(&payload.nit)
    .bind(id)
    .fetch_optional(db)
    .await
    .map_err(AppError::database)?
    .ok_or_else(|| AppError::not_found(anyhow::anyhow!("Contacto {} no encontrado", id)))
}

pub async fn delete_contacto(db: &PgPool, id: i32) -> Result<(), AppError> {
    let result = sqlx::query("DELETE FROM contactos WHERE id = $1")
        .bind(id)
        .execute(db)
        .await
        .map_err(AppError::database)?;

    if result.rows_affected() == 0 {
        return Err(AppError::not_found(anyhow::anyhow!(
            "Contacto {} no encontrado",
            id
        )));
    }
    Ok(())
}

pub async fn contactos_de_alumno(
    db: &PgPool,
    alumno_id: i32,
) -> Result<Vec<ContactoDeAlumno>, AppError> {
    get_alumno(db, alumno_id).await?;

    sqlx::query_as::<_, ContactoDeAlumno>(
        r#"
        SELECT c.id, c.nombre, c.telefono_trabajo, c.celular, c.email, c.direccion, c.nit,
               ac.parentesco
        FROM alumno_contactos ac
        JOIN contactos c ON c.id = ac.contacto_id
        WHERE ac.alumno_id = $1
        ORDER BY c.nombre
        "#,
    )
    .bind(alumno_id)
    .fetch_all(db)
    .await
    .map_err(AppError::database)
}

pub async fn vincular_contacto(
    db: &PgPool,
    alumno_id: i32,
    contacto_id: i32,
    parentesco: &str,
) -> Result<(), AppError> {
    get_alumno(db, alumno_id).await?;
    get_contacto(db, contacto_id).await?;

    sqlx::query(
        "INSERT INTO alumno_contactos (alumno_id, contacto_id, parentesco) VALUES ($1, $2, $3)",
    )
    .bind(alumno_id)
    .bind(contacto_id)
    .bind(parentesco)
    .execute(db)
    .await
    .map_err(|e| match &e {
        sqlx::Error::Database(db_err) if db_err.is_unique_violation() => AppError::conflict(
            anyhow::anyhow!("El contacto ya está vinculado a este alumno"),
        ),
        _ => AppError::database(e),
    })?;

    Ok(())
}

pub async fn desvincular_contacto(
    db: &PgPool,
    alumno_id: i32,
    contacto_id: i32,
) -> Result<(), AppError> {
    let result =
        sqlx::query("DELETE FROM alumno_contactos WHERE alumno_id = $1 AND contacto_id = $2")
            .bind(alumno_id)
            .bind(contacto_id)
            .execute(db)
            .await
            .map_err(AppError::database)?;

    if result.rows_affected() == 0 {
        return Err(AppError::not_found(anyhow::anyhow!(
            "El contacto no está vinculado a este alumno"
        )));
    }
    Ok(())
}
