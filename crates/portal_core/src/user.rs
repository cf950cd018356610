//! Users, roles and the authentication payloads exchanged with the data
//! service.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use serde_json::Value;
use validator::{Validate, ValidationError};

use crate::error::CoreError;

/// Portal role. Roles are ordered: a higher role satisfies every lower one.
///
/// # Examples
/// ```
/// use portal_core::Role;
///
/// assert!(Role::Sales.satisfies(Role::Client));
/// assert!(!Role::Guest.satisfies(Role::Client));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    /// Anonymous visitor with an account
    #[default]
    Guest,
    /// Client holding products
    Client,
    /// Sales representative
    Sales,
    /// Administrator
    Admin,
}

impl Role {
    /// Position in the hierarchy (guest = 1 .. admin = 4)
    pub fn level(&self) -> u8 {
        match self {
            Role::Guest => 1,
            Role::Client => 2,
            Role::Sales => 3,
            Role::Admin => 4,
        }
    }

    /// Whether this role grants at least `required`
    pub fn satisfies(&self, required: Role) -> bool {
        self.level() >= required.level()
    }

    /// Wire value
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Guest => "guest",
            Role::Client => "client",
            Role::Sales => "sales",
            Role::Admin => "admin",
        }
    }
}

impl FromStr for Role {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "guest" => Ok(Role::Guest),
            "client" => Ok(Role::Client),
            "sales" => Ok(Role::Sales),
            "admin" => Ok(Role::Admin),
            _ => Err(CoreError::UnknownRole(s.to_string())),
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Authenticated user as returned by the data service.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[allow(missing_docs)]
pub struct User {
    pub id: i64,
    pub username: String,
    pub email: String,
    #[serde(default)]
    pub role: Role,
    #[serde(default)]
    pub first_name: String,
    #[serde(default)]
    pub last_name: String,
}

impl User {
    /// `First Last`, falling back to the username
    pub fn display_name(&self) -> String {
        let full = format!("{} {}", self.first_name.trim(), self.last_name.trim());
        let full = full.trim();
        if full.is_empty() {
            self.username.clone()
        } else {
            full.to_string()
        }
    }

    /// Uppercase initials of the display name
    pub fn initials(&self) -> String {
        self.display_name()
            .split_whitespace()
            .filter_map(|part| part.chars().next())
            .flat_map(char::to_uppercase)
            .collect()
    }

    /// Role check against the hierarchy
    pub fn has_role(&self, required: Role) -> bool {
        self.role.satisfies(required)
    }
}

/// How the user identified themselves on the login form.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoginIdentifier {
    /// Contains `@`
    Email(String),
    /// Anything else
    Username(String),
}

impl LoginIdentifier {
    /// Classify a raw identifier
    pub fn classify(raw: &str) -> Self {
        let raw = raw.trim().to_string();
        if raw.contains('@') {
            LoginIdentifier::Email(raw)
        } else {
            LoginIdentifier::Username(raw)
        }
    }
}

/// Login request body.
///
/// # Examples
/// ```
/// use portal_core::user::LoginRequest;
///
/// let body = serde_json::to_value(LoginRequest::new("jane@example.com", "s3cret")).unwrap();
/// assert_eq!(body["email"], "jane@example.com");
/// assert!(body.get("username").is_none());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LoginRequest {
    /// Set when the identifier is an email
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    /// Set when the identifier is a username
    #[serde(skip_serializing_if = "Option::is_none")]
    pub username: Option<String>,
    /// Password
    pub password: String,
}

impl LoginRequest {
    /// Build a request from a raw identifier
    pub fn new(identifier: &str, password: &str) -> Self {
        let (email, username) = match LoginIdentifier::classify(identifier) {
            LoginIdentifier::Email(e) => (Some(e), None),
            LoginIdentifier::Username(u) => (None, Some(u)),
        };
        Self {
            email,
            username,
            password: password.to_string(),
        }
    }
}

/// Access/refresh token pair.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenPair {
    /// Short-lived access token
    pub access: String,
    /// Long-lived refresh token
    pub refresh: String,
}

/// Successful login payload.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoginResponse {
    /// Short-lived access token
    pub access: String,
    /// Long-lived refresh token
    pub refresh: String,
    /// User, when the backend embeds it
    #[serde(default)]
    pub user: Option<User>,
}

impl LoginResponse {
    /// Split off the token pair
    pub fn tokens(&self) -> TokenPair {
        TokenPair {
            access: self.access.clone(),
            refresh: self.refresh.clone(),
        }
    }
}

/// Registration form, validated before it is forwarded.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Validate)]
#[validate(schema(function = "validate_password_confirmation", skip_on_field_errors = false))]
#[allow(missing_docs)]
pub struct RegisterRequest {
    #[validate(length(min = 3, max = 150, message = "Nom d'utilisateur invalide"))]
    pub username: String,
    #[validate(email(message = "Adresse email invalide"))]
    pub email: String,
    #[validate(length(min = 8, message = "Le mot de passe doit contenir au moins 8 caractères"))]
    pub password: String,
    pub password_confirm: String,
    #[validate(length(min = 1, message = "Prénom requis"))]
    pub first_name: String,
    #[validate(length(min = 1, message = "Nom requis"))]
    pub last_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub role: Option<Role>,
}

fn validate_password_confirmation(request: &RegisterRequest) -> Result<(), ValidationError> {
    if request.password != request.password_confirm {
        let mut err = ValidationError::new("password_mismatch");
        err.message = Some("Les mots de passe ne correspondent pas".into());
        return Err(err);
    }
    Ok(())
}

/// Flatten validator output into one user-facing sentence.
pub fn validation_message(errors: &validator::ValidationErrors) -> String {
    let mut messages: Vec<String> = errors
        .field_errors()
        .into_iter()
        .flat_map(|(field, errs)| {
            errs.iter().map(move |e| {
                e.message
                    .as_ref()
                    .map(|m| m.to_string())
                    .unwrap_or_else(|| format!("{} invalide", field))
            })
        })
        .collect();
    messages.sort();
    messages.join(", ")
}

/// Pick the message out of a rejected login response.
///
/// Looks at `non_field_errors[0]`, then `error`, then `details`.
///
/// # Examples
/// ```
/// use portal_core::user::login_error_message;
/// use serde_json::json;
///
/// let body = json!({"non_field_errors": ["Unable to log in"]});
/// assert_eq!(login_error_message(&body), "Unable to log in");
/// assert_eq!(login_error_message(&json!({})), "Login failed");
/// ```
pub fn login_error_message(body: &Value) -> String {
    body.get("non_field_errors")
        .and_then(|v| v.get(0))
        .and_then(Value::as_str)
        .or_else(|| body.get("error").and_then(Value::as_str))
        .or_else(|| body.get("details").and_then(Value::as_str))
        .unwrap_or("Login failed")
        .to_string()
}

/// Flatten every value of a rejected registration response.
///
/// # Examples
/// ```
/// use portal_core::user::registration_error_message;
/// use serde_json::json;
///
/// let body = json!({"email": ["Already used."], "password": ["Too short.", "Too common."]});
/// assert_eq!(
///     registration_error_message(&body),
///     "Already used., Too short., Too common."
/// );
/// ```
pub fn registration_error_message(body: &Value) -> String {
    fn collect(value: &Value, out: &mut Vec<String>) {
        match value {
            Value::String(s) => out.push(s.clone()),
            Value::Array(items) => items.iter().for_each(|v| collect(v, out)),
            Value::Object(map) => map.values().for_each(|v| collect(v, out)),
            Value::Null => {}
            other => out.push(other.to_string()),
        }
    }

    let mut parts = Vec::new();
    collect(body, &mut parts);
    if parts.is_empty() {
        "Registration failed".to_string()
    } else {
        parts.join(", ")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn user(first: &str, last: &str, role: Role) -> User {
        User {
            id: 1,
            username: "jdoe".to_string(),
            email: "jdoe@example.com".to_string(),
            role,
            first_name: first.to_string(),
            last_name: last.to_string(),
        }
    }

    fn register_request() -> RegisterRequest {
        RegisterRequest {
            username: "jdoe".to_string(),
            email: "jdoe@example.com".to_string(),
            password: "correct-horse".to_string(),
            password_confirm: "correct-horse".to_string(),
            first_name: "Jane".to_string(),
            last_name: "Doe".to_string(),
            role: None,
        }
    }

    #[test]
    fn test_role_hierarchy() {
        assert!(Role::Admin.satisfies(Role::Admin));
        assert!(Role::Admin.satisfies(Role::Guest));
        assert!(Role::Client.satisfies(Role::Guest));
        assert!(!Role::Client.satisfies(Role::Sales));
        assert!(user("Jane", "Doe", Role::Sales).has_role(Role::Client));
    }

    #[test]
    fn test_role_parse() {
        assert_eq!("ADMIN".parse::<Role>().unwrap(), Role::Admin);
        assert!("root".parse::<Role>().is_err());
    }

    #[test]
    fn test_unknown_role_deserialises_as_error() {
        let raw = json!({"id": 1, "username": "x", "email": "x@y.z", "role": "root"});
        assert!(serde_json::from_value::<User>(raw).is_err());
    }

    #[test]
    fn test_display_name_and_initials() {
        let u = user("Jane", "Doe", Role::Client);
        assert_eq!(u.display_name(), "Jane Doe");
        assert_eq!(u.initials(), "JD");

        let anonymous = user("", " ", Role::Client);
        assert_eq!(anonymous.display_name(), "jdoe");
        assert_eq!(anonymous.initials(), "J");
    }

    #[test]
    fn test_login_identifier_classification() {
        assert_eq!(
            LoginIdentifier::classify(" jane@example.com "),
            LoginIdentifier::Email("jane@example.com".to_string())
        );
        assert_eq!(
            LoginIdentifier::classify("jane"),
            LoginIdentifier::Username("jane".to_string())
        );
    }

    #[test]
    fn test_login_request_username_shape() {
        let body = serde_json::to_value(LoginRequest::new("jane", "pw")).unwrap();
        assert_eq!(body, json!({"username": "jane", "password": "pw"}));
    }

    #[test]
    fn test_login_response_without_user() {
        let resp: LoginResponse =
            serde_json::from_value(json!({"access": "a", "refresh": "r"})).unwrap();
        assert!(resp.user.is_none());
        assert_eq!(resp.tokens().refresh, "r");
    }

    #[test]
    fn test_register_request_valid() {
        assert!(register_request().validate().is_ok());
    }

    #[test]
    fn test_register_request_password_mismatch() {
        let mut req = register_request();
        req.password_confirm = "something-else".to_string();
        let errors = req.validate().unwrap_err();
        let rendered = format!("{:?}", errors);
        assert!(rendered.contains("password_mismatch"));
    }

    #[test]
    fn test_register_request_field_errors_message() {
        let mut req = register_request();
        req.email = "not-an-email".to_string();
        req.password = "short".to_string();
        req.password_confirm = "short".to_string();
        let errors = req.validate().unwrap_err();
        let message = validation_message(&errors);
        assert!(message.contains("Adresse email invalide"));
        assert!(message.contains("8 caractères"));
    }

    #[test]
    fn test_login_error_message_precedence() {
        assert_eq!(
            login_error_message(&json!({"error": "Bad creds", "details": "x"})),
            "Bad creds"
        );
        assert_eq!(login_error_message(&json!({"details": "Locked"})), "Locked");
        assert_eq!(
            login_error_message(&json!({"non_field_errors": [], "error": "E"})),
            "E"
        );
    }

    #[test]
    fn test_registration_error_message_empty() {
        assert_eq!(registration_error_message(&json!({})), "Registration failed");
    }
}
