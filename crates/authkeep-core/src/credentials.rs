//! Login credentials and form-encoded request payloads.

use std::fmt;

/// Field names whose values never show up in Debug output.
const SECRET_FIELDS: &[&str] = &["password", "client_secret"];

/// A flat list of form fields, sent as `application/x-www-form-urlencoded`.
///
/// Order is preserved, and a key may appear more than once.
#[derive(Clone, Default, PartialEq, Eq)]
pub struct FormFields(Vec<(String, String)>);

impl FormFields {
    /// Create an empty field list.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a field.
    pub fn push(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.0.push((key.into(), value.into()));
    }

    /// Returns the first value stored under `key`.
    pub fn get(&self, key: &str) -> Option<&str> {
        self.0
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    /// Iterate over the fields in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// Returns the fields as a slice of pairs, suitable for form encoders.
    pub fn as_pairs(&self) -> &[(String, String)] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for FormFields {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self(
            iter.into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        )
    }
}

// Secret values are masked so request payloads can be traced safely
impl fmt::Debug for FormFields {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut map = f.debug_map();
        for (key, value) in &self.0 {
            if SECRET_FIELDS.contains(&key.as_str()) {
                map.entry(key, &"[REDACTED]");
            } else {
                map.entry(key, value);
            }
        }
        map.finish()
    }
}

/// Login credentials for the token endpoint.
///
/// The token endpoint follows the OAuth2 password grant form: `username` and
/// `password`, optionally `scope` and any extra fields the server understands.
///
/// # Security
///
/// The password is never exposed in Debug output to prevent accidental logging.
///
/// # Example
///
/// ```
/// use authkeep_core::Credentials;
///
/// let creds = Credentials::new("alice", "hunter2").with_scope("read write");
/// assert_eq!(creds.username(), "alice");
/// assert_eq!(creds.to_form().get("scope"), Some("read write"));
/// ```
#[derive(Clone)]
pub struct Credentials {
    username: String,
    password: String,
    extra: FormFields,
}

impl Credentials {
    /// Create new credentials.
    pub fn new(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            password: password.into(),
            extra: FormFields::new(),
        }
    }

    /// Request a space-separated list of scopes.
    pub fn with_scope(self, scope: impl Into<String>) -> Self {
        self.with_field("scope", scope)
    }

    /// Attach an additional form field.
    pub fn with_field(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.extra.push(key, value);
        self
    }

    /// Returns the username.
    pub fn username(&self) -> &str {
        &self.username
    }

    /// Build the form body for the token endpoint.
    pub fn to_form(&self) -> FormFields {
        let mut form = FormFields::new();
        form.push("username", self.username.as_str());
        form.push("password", self.password.as_str());
        for (key, value) in self.extra.iter() {
            form.push(key, value);
        }
        form
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("username", &self.username)
            .field("password", &"[REDACTED]")
            .field("extra", &self.extra)
            .finish()
    }
}

/// Fields for a new-user registration.
///
/// The register endpoint takes whatever flat fields the server asks for. The
/// form always carries `username` and `password`.
#[derive(Clone)]
pub struct RegistrationForm {
    fields: FormFields,
}

impl RegistrationForm {
    /// Start a registration for `username` with `password`.
    pub fn new(username: impl Into<String>, password: impl Into<String>) -> Self {
        let mut fields = FormFields::new();
        fields.push("username", username);
        fields.push("password", password);
        Self { fields }
    }

    /// Attach an additional field, e.g. `email`.
    pub fn with_field(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.fields.push(key, value);
        self
    }

    /// Returns the username being registered.
    pub fn username(&self) -> &str {
        self.fields.get("username").unwrap_or_default()
    }

    /// Returns the form body for the register endpoint.
    pub fn to_form(&self) -> FormFields {
        self.fields.clone()
    }
}

impl fmt::Debug for RegistrationForm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RegistrationForm")
            .field("fields", &self.fields)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn credentials_hides_password_in_debug() {
        let creds = Credentials::new("alice", "secret123");
        let debug = format!("{:?}", creds);
        assert!(debug.contains("alice"));
        assert!(!debug.contains("secret123"));
        assert!(debug.contains("[REDACTED]"));
    }

    #[test]
    fn credentials_form_starts_with_username_and_password() {
        let form = Credentials::new("a", "b").with_scope("me").to_form();
        let pairs: Vec<_> = form.iter().collect();
        assert_eq!(
            pairs,
            vec![("username", "a"), ("password", "b"), ("scope", "me")]
        );
    }

    #[test]
    fn registration_form_redacts_password() {
        let form = RegistrationForm::new("bob", "pw-bob").with_field("email", "bob@example.com");
        assert_eq!(form.username(), "bob");
        let debug = format!("{:?}", form);
        assert!(debug.contains("bob@example.com"));
        assert!(!debug.contains("pw-bob"));
    }

    #[test]
    fn form_fields_collect_from_pairs() {
        let form: FormFields = [("k", "v"), ("k", "w")].into_iter().collect();
        assert_eq!(form.len(), 2);
        assert_eq!(form.get("k"), Some("v"));
    }
}
