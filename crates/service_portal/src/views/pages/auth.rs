//! Login and registration forms.

use std::fmt;

use portal_core::user::RegisterRequest;
use serde::Deserialize;

use crate::views::Escaped;

fn error_banner(f: &mut fmt::Formatter<'_>, error: Option<&str>) -> fmt::Result {
    match error {
        Some(message) => write!(f, r#"<p class="form-error" role="alert">{}</p>"#, Escaped(message)),
        None => Ok(()),
    }
}

pub struct LoginPage<'a> {
    pub error: Option<&'a str>,
    /// Previously typed email or username
    pub identifier: &'a str,
}

impl fmt::Display for LoginPage<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(
            r#"<section class="auth-card"><div class="auth-top"><a href="/">← Retour à l'accueil</a><a class="button-outline" href="/register">Inscrivez-vous</a></div>
<img class="auth-logo" src="/static/logo.svg" alt="" width="64" height="64"><h1>Connexion</h1>"#,
        )?;
        error_banner(f, self.error)?;
        write!(
            f,
            r#"<form method="post" action="/login" class="auth-form">
<label for="identifier">Identifiant</label>
<input id="identifier" name="identifier" type="text" autocomplete="username" placeholder="Email ou nom d'utilisateur" value="{}" required>
<label for="password">Mot de passe</label>
<input id="password" name="password" type="password" autocomplete="current-password" placeholder="Entrez votre mot de passe" required>
<button type="submit" class="button">Connexion</button>
</form></section>
"#,
            Escaped(self.identifier)
        )
    }
}

/// Submitted registration form; missing fields are empty and caught by
/// validation.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct RegisterForm {
    pub username: String,
    pub email: String,
    pub password: String,
    pub password_confirm: String,
    pub first_name: String,
    pub last_name: String,
}

impl RegisterForm {
    pub fn to_request(&self) -> RegisterRequest {
        RegisterRequest {
            username: self.username.trim().to_string(),
            email: self.email.trim().to_string(),
            password: self.password.clone(),
            password_confirm: self.password_confirm.clone(),
            first_name: self.first_name.trim().to_string(),
            last_name: self.last_name.trim().to_string(),
            role: None,
        }
    }
}

pub struct RegisterPage<'a> {
    pub error: Option<&'a str>,
    /// Values to put back in the form; passwords are never echoed
    pub form: &'a RegisterForm,
}

impl fmt::Display for RegisterPage<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(
            r#"<section class="auth-card wide"><div class="auth-top"><a href="/">← Retour à l'accueil</a><a class="button-outline" href="/login">Connexion</a></div><h1>Créer un compte</h1>"#,
        )?;
        error_banner(f, self.error)?;
        f.write_str(r#"<form method="post" action="/register" class="auth-form">"#)?;
        let fields = [
            ("first_name", "Prénom", "text", self.form.first_name.as_str()),
            ("last_name", "Nom", "text", self.form.last_name.as_str()),
            ("username", "Nom d'utilisateur", "text", self.form.username.as_str()),
            ("email", "Email", "email", self.form.email.as_str()),
            ("password", "Mot de passe", "password", ""),
            ("password_confirm", "Confirmer le mot de passe", "password", ""),
        ];
        for (name, label, kind, value) in fields {
            write!(
                f,
                r#"<label for="{name}">{label}</label><input id="{name}" name="{name}" type="{kind}" value="{}" required>"#,
                Escaped(value)
            )?;
        }
        f.write_str(
            r#"<button type="submit" class="button">Créer mon compte</button></form><p class="auth-switch">Déjà client ? <a href="/login">Connectez-vous</a></p></section>
"#,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use validator::Validate;

    #[test]
    fn test_login_page_error_and_value() {
        let html = LoginPage {
            error: Some("Unable to log in"),
            identifier: "jean\"@x.fr",
        }
        .to_string();
        assert!(html.contains(r#"role="alert">Unable to log in<"#));
        assert!(html.contains(r#"value="jean&quot;@x.fr""#));
        assert!(html.contains(r#"action="/login""#));
    }

    #[test]
    fn test_register_page_never_echoes_passwords() {
        let form = RegisterForm {
            username: "jdupont".into(),
            email: "jean@example.com".into(),
            password: "secret-pass".into(),
            password_confirm: "secret-pass".into(),
            first_name: "Jean".into(),
            last_name: "Dupont".into(),
        };
        let html = RegisterPage {
            error: None,
            form: &form,
        }
        .to_string();
        assert!(html.contains(r#"value="jdupont""#));
        assert!(!html.contains("secret-pass"));
        assert!(!html.contains("form-error"));
    }

    #[test]
    fn test_register_form_to_request_validates() {
        let form = RegisterForm {
            username: " jdupont ".into(),
            email: "jean@example.com".into(),
            password: "longenough".into(),
            password_confirm: "longenough".into(),
            first_name: "Jean".into(),
            last_name: "Dupont".into(),
        };
        let request = form.to_request();
        assert_eq!(request.username, "jdupont");
        assert!(request.validate().is_ok());

        let empty = RegisterForm::default().to_request();
        assert!(empty.validate().is_err());
    }
}
