use lettre::transport::smtp::authentication::Credentials;
use lettre::{Message, SmtpTransport, Transport};
use std::env;

pub struct EmailService;

impl EmailService {
    /// Envoie le mail contenant le lien de reset password
    /// L'échec d'envoi est remonté à l'appelant qui décide quoi en faire
    /// (en pratique: loggé, le token reste émis)
    pub fn send_password_reset_email(to_email: &str, reset_link: &str) -> Result<(), String> {
        let body = format!(
            "You requested a password reset for your account.\n\
            \n\
            Click the link below to choose a new password:\n\
            \n\
            {}\n\
            \n\
            This link expires in 24 hours. If you did not request a reset,\n\
            you can safely ignore this email.",
            reset_link
        );

        Self::send_email(to_email, "Password Reset Request", &body)
    }

    /// Envoi SMTP générique, credentials depuis les variables d'environnement
    fn send_email(to_email: &str, subject: &str, body: &str) -> Result<(), String> {
        let host = env::var("SMTP_HOST").map_err(|_| "SMTP_HOST must be set".to_string())?;
        let username = env::var("SMTP_USERNAME").map_err(|_| "SMTP_USERNAME must be set".to_string())?;
        let password = env::var("SMTP_PASSWORD").map_err(|_| "SMTP_PASSWORD must be set".to_string())?;
        let port: u16 = env::var("SMTP_PORT")
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or(587);

        let email = Message::builder()
            .from(
                format!("LearnHub <{}>", username)
                    .parse()
                    .map_err(|e| format!("Invalid from address: {}", e))?,
            )
            .to(to_email
                .parse()
                .map_err(|e| format!("Invalid to address: {}", e))?)
            .subject(subject)
            .header(lettre::message::header::ContentType::TEXT_PLAIN)
            .body(body.to_string())
            .map_err(|e| format!("Failed to create email: {}", e))?;

        let mailer = SmtpTransport::starttls_relay(&host)
            .map_err(|e| format!("Failed to create SMTP transport: {}", e))?
            .credentials(Credentials::new(username, password))
            .port(port)
            .timeout(Some(std::time::Duration::from_secs(10)))
            .build();

        mailer
            .send(&email)
            .map(|_| ())
            .map_err(|e| format!("Failed to send email: {}", e))
    }
}
