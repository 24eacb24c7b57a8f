use lettre::message::{MultiPart, SinglePart, header};
use lettre::transport::smtp::authentication::Credentials;
use lettre::{AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor};
use tracing::{info, instrument};

use crate::config::email::EmailConfig;
use crate::utils::errors::AppError;

pub struct EmailService {
    config: EmailConfig,
}

impl EmailService {
    pub fn new(config: EmailConfig) -> Self {
        Self { config }
    }

    /// Sends the password-reset link. When SMTP is disabled the message is only
    /// logged, so the reset flow remains testable without a mail server.
    #[instrument(skip(self, reset_token))]
    pub async fn send_password_reset_email(
        &self,
        to_email: &str,
        to_name: &str,
        reset_token: &str,
    ) -> Result<(), AppError> {
        let reset_link = format!(
            "{}/reset-password?token={}",
            self.config.frontend_url, reset_token
        );

        if !self.config.enabled {
            info!(to = %to_email, "SMTP disabled; skipping password reset email");
            return Ok(());
        }

        let text_body = format!(
            "Hola {},\n\n\
             Recibimos una solicitud para restablecer tu contraseña.\n\n\
             Usa el siguiente enlace (expira en 1 hora):\n{}\n\n\
             Si no solicitaste este cambio, ignora este mensaje.",
            to_name, reset_link
        );
        let html_body = format!(
            "<p>Hola {},</p>\
             <p>Recibimos una solicitud para restablecer tu contraseña.</p>\
             <p><a href=\"{}\">Restablecer contraseña</a> (expira en 1 hora)</p>\
             <p>Si no solicitaste este cambio, ignora este mensaje.</p>",
            to_name, reset_link
        );

        self.send_email(to_email, "Recuperación de contraseña", &text_body, &html_body)
            .await
    }

    async fn send_email(
        &self,
        to_email: &str,
        subject: &str,
        text_body: &str,
        html_body: &str,
    ) -> Result<(), AppError> {
        let from = format!("{} <{}>", self.config.from_name, self.config.from_email);

        let email = Message::builder()
            .from(
                from.parse()
                    .map_err(|e| AppError::internal(anyhow::anyhow!("Invalid from email: {}", e)))?,
            )
            .to(to_email
                .parse()
                .map_err(|e| AppError::internal(anyhow::anyhow!("Invalid to email: {}", e)))?)
            .subject(subject)
            .multipart(
                MultiPart::alternative()
                    .singlepart(
                        SinglePart::builder()
                            .header(header::ContentType::TEXT_PLAIN)
                            .body(text_body.to_string()),
                    )
                    .singlepart(
                        SinglePart::builder()
                            .header(header::ContentType::TEXT_HTML)
                            .body(html_body.to_string()),
                    ),
            )
            .map_err(|e| AppError::internal(anyhow::anyhow!("Failed to build email: {}", e)))?;

        let mailer: AsyncSmtpTransport<Tokio1Executor> = if self.config.smtp_username.is_empty() {
            AsyncSmtpTransport::<Tokio1Executor>::builder_dangerous(&self.config.smtp_host)
                .port(self.config.smtp_port)
                .build()
        } else {
            let creds = Credentials::new(
                self.config.smtp_username.clone(),
                self.config.smtp_password.clone(),
            );
            AsyncSmtpTransport::<Tokio1Executor>::relay(&self.config.smtp_host)
                .map_err(|e| {
                    AppError::internal(anyhow::anyhow!("Failed to create SMTP relay: {}", e))
                })?
                .port(self.config.smtp_port)
                .credentials(creds)
                .build()
        };

        mailer
            .send(email)
            .await
            .map_err(|e| AppError::internal(anyhow::anyhow!("Failed to send email: {}", e)))?;

        Ok(())
    }
}
