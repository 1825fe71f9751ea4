/// Email templates
///
/// Composition of the two messages Taskhive sends. Bodies stay minimal HTML:
/// a greeting, the six-digit code, the link to the page that accepts it, and
/// a reminder of the expiry window.
use crate::models::token::TOKEN_TTL_MINUTES;

use super::Mail;

/// Composes the account confirmation message.
pub fn confirmation_mail(to: &str, to_name: &str, code: &str, frontend_url: &str) -> Mail {
    let html = format!(
        "<p>Hi {to_name},</p>\
         <p>Your Taskhive account is almost ready. Confirm it by visiting \
         <a href=\"{frontend_url}/auth/confirm-account\">{frontend_url}/auth/confirm-account</a> \
         and entering this code:</p>\
         <p><b>{code}</b></p>\
         <p>The code expires in {TOKEN_TTL_MINUTES} minutes.</p>"
    );

    Mail {
        to: to.to_string(),
        to_name: to_name.to_string(),
        subject: "Taskhive - Confirm your account".to_string(),
        html,
    }
}

/// Composes the password reset message.
pub fn password_reset_mail(to: &str, to_name: &str, code: &str, frontend_url: &str) -> Mail {
    let html = format!(
        "<p>Hi {to_name},</p>\
         <p>Someone asked to reset the password for this account. If that was \
         you, visit <a href=\"{frontend_url}/auth/new-password\">{frontend_url}/auth/new-password</a> \
         and enter this code:</p>\
         <p><b>{code}</b></p>\
         <p>The code expires in {TOKEN_TTL_MINUTES} minutes. If you did not \
         ask for a reset, ignore this message.</p>"
    );

    Mail {
        to: to.to_string(),
        to_name: to_name.to_string(),
        subject: "Taskhive - Reset your password".to_string(),
        html,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_confirmation_mail_carries_code_and_link() {
        let mail = confirmation_mail("ada@example.com", "Ada", "123456", "https://app.taskhive.dev");

        assert_eq!(mail.to, "ada@example.com");
        assert!(mail.subject.contains("Confirm"));
        assert!(mail.html.contains("123456"));
        assert!(mail.html.contains("https://app.taskhive.dev/auth/confirm-account"));
    }

    #[test]
    fn test_password_reset_mail_carries_code_and_link() {
        let mail = password_reset_mail("ada@example.com", "Ada", "654321", "https://app.taskhive.dev");

        assert!(mail.subject.contains("Reset"));
        assert!(mail.html.contains("654321"));
        assert!(mail.html.contains("https://app.taskhive.dev/auth/new-password"));
    }
}
