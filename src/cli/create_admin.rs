use anyhow::{Context, Result, bail};
use dialoguer::{Confirm, Input, Password};
use sqlx::PgPool;

use crate::utils::password::hash_password;

/// Interactive admin bootstrap. Prompts for the account details, confirms and
/// inserts the user with the ADMIN role.
pub async fn run(db: &PgPool) -> Result<()> {
    println!("Crear usuario administrador\n");

    let codigo_usuario: String = Input::new()
        .with_prompt("Código de usuario")
        .interact_text()
        .context("Failed to read user code")?;

    let nombres: String = Input::new()
        .with_prompt("Nombres")
        .interact_text()
        .context("Failed to read first names")?;

    let apellidos: String = Input::new()
        .with_prompt("Apellidos")
        .interact_text()
        .context("Failed to read last names")?;

    let email: String = Input::new()
        .with_prompt("Correo electrónico")
        .interact_text()
        .context("Failed to read email")?;

    let password = Password::new()
        .with_prompt("Contraseña")
        .with_confirmation("Confirmar contraseña", "Las contraseñas no coinciden")
        .interact()
        .context("Failed to read password")?;

    if password.len() < 8 {
        bail!("La contraseña debe tener al menos 8 caracteres");
    }

    let confirmed = Confirm::new()
        .with_prompt(format!(
            "¿Crear el administrador '{}' ({})?",
            codigo_usuario, email
        ))
        .default(false)
        .interact()
        .context("Failed to read confirmation")?;

    if !confirmed {
        println!("Cancelado.");
        return Ok(());
    }

    let rol_id: i32 = sqlx::query_scalar("SELECT id FROM roles WHERE nombre = 'ADMIN'")
        .fetch_optional(db)
        .await
        .context("Failed to look up ADMIN role")?
        .context("ADMIN role is missing; run the migrations first")?;

    let hashed = hash_password(&password).map_err(|e| anyhow::anyhow!("{}", e.error))?;

    let id: i32 = sqlx::query_scalar(
        r#"
        INSERT INTO usuarios (codigo_usuario, nombres, apellidos, email, password, rol_id)
        VALUES ($1, $2, $3, $4, $5, $6)
        RETURNING id
        "#,
    )
    .bind(&codigo_usuario)
    .bind(&nombres)
    .bind(&apellidos)
    .bind(&email)
    .bind(&hashed)
    .bind(rol_id)
    .fetch_one(db)
    .await
    .context("Failed to insert admin user (duplicate code or email?)")?;

    println!("\nAdministrador creado con id {}.", id);
    Ok(())
}
