use rand::prelude::*;
use serde::{Deserialize, Serialize};
use validator::{Validate, ValidationError};

/// A user record as the remote collection and the snapshot store see it
///
/// The demo API sends more fields than these (suite, zipcode, geo and so on);
/// serde drops whatever isn't listed here.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct User {
    pub id: u64,
    pub name: String,
    pub username: String,
    pub email: String,
    pub phone: String,
    #[serde(default)]
    pub address: Address,
    #[serde(default)]
    pub company: Company,
    #[serde(default)]
    pub website: Option<String>,
}

impl std::fmt::Display for User {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} ({})", self.name, self.id)
    }
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize, Validate)]
pub struct Address {
    #[validate(length(min = 1, message = "street is required"))]
    pub street: String,
    #[validate(length(min = 1, message = "city is required"))]
    pub city: String,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize, Validate)]
pub struct Company {
    #[validate(length(min = 3, message = "if provided, the company name must be at least 3 characters"))]
    #[serde(default)]
    pub name: Option<String>,
}

/// The form side of a user: everything but the id
///
/// A fresh draft gets a generated `USER-xxx` username which stays fixed for
/// the rest of its life. The nested address/company fields only change
/// through the typed setters.
#[derive(Clone, Debug, Serialize, Deserialize, Validate)]
pub struct Draft {
    #[validate(length(min = 3, message = "name must be at least 3 characters"))]
    pub name: String,
    #[validate(length(min = 3, message = "username must be at least 3 characters"))]
    username: String,
    #[validate(email(message = "a valid email is required"))]
    pub email: String,
    #[validate(custom(function = "ten_digits"))]
    pub phone: String,
    #[validate(nested)]
    address: Address,
    #[validate(nested)]
    company: Company,
    #[validate(custom(function = "http_url"))]
    pub website: Option<String>,
}

impl Draft {
    pub fn new() -> Self {
        Self {
            name: String::new(),
            username: generate_username(),
            email: String::new(),
            phone: String::new(),
            address: Address::default(),
            company: Company::default(),
            website: None,
        }
    }

    pub fn username(&self) -> &str {
        &self.username
    }

    pub fn set_street(&mut self, street: impl ToString) {
        self.address.street = street.to_string();
    }

    pub fn set_city(&mut self, city: impl ToString) {
        self.address.city = city.to_string();
    }

    pub fn set_company_name(&mut self, name: impl ToString) {
        self.company.name = Some(name.to_string());
    }

    /// Turn the draft into a real record once an id was picked for it
    pub(crate) fn into_user(self, id: u64) -> User {
        User {
            id,
            name: self.name,
            username: self.username,
            email: self.email,
            phone: self.phone,
            address: self.address,
            company: self.company,
            website: self.website,
        }
    }
}

impl Default for Draft {
    fn default() -> Self {
        Self::new()
    }
}

impl From<&User> for Draft {
    fn from(user: &User) -> Self {
        Self {
            name: user.name.clone(),
            username: user.username.clone(),
            email: user.email.clone(),
            phone: user.phone.clone(),
            address: user.address.clone(),
            company: user.company.clone(),
            website: user.website.clone(),
        }
    }
}

/// Generate a username in the fixed `USER-xxx` shape
fn generate_username() -> String {
    let suffix = thread_rng()
        .sample_iter(&rand::distributions::Alphanumeric)
        .map(char::from)
        .take(3)
        .collect::<String>()
        .to_lowercase();
    format!("USER-{}", suffix)
}

fn ten_digits(phone: &str) -> Result<(), ValidationError> {
    if phone.len() == 10 && phone.bytes().all(|b| b.is_ascii_digit()) {
        return Ok(());
    }
    let mut err = ValidationError::new("phone");
    err.message = Some("phone number must be exactly 10 digits".into());
    Err(err)
}

fn http_url(website: &str) -> Result<(), ValidationError> {
    let ok = url::Url::parse(website)
        .map(|url| matches!(url.scheme(), "http" | "https"))
        .unwrap_or(false);
    if ok {
        return Ok(());
    }
    let mut err = ValidationError::new("website");
    err.message = Some("website must be an http(s) url".into());
    Err(err)
}

#[cfg(test)]
pub(crate) fn sample(id: u64, name: &str) -> User {
    User {
        id,
        name: name.to_string(),
        username: format!("USER-{}", name),
        email: format!("{}@example.com", name),
        phone: "0123456789".to_string(),
        address: Address {
            street: "12 Example Way".to_string(),
            city: "Exampleton".to_string(),
        },
        company: Company::default(),
        website: None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn filled() -> Draft {
        let mut draft = Draft::new();
        draft.name = "Ada Lovelace".into();
        draft.email = "ada@example.com".into();
        draft.phone = "0123456789".into();
        draft.set_street("12 Analytical Way");
        draft.set_city("London");
        draft
    }

    #[test]
    fn generated_username_shape() {
        let draft = Draft::new();
        assert!(draft.username().starts_with("USER-"));
        assert_eq!(draft.username().len(), "USER-".len() + 3);
    }

    #[test]
    fn a_filled_form_validates() {
        filled().validate().unwrap();
    }

    #[test]
    fn short_names_are_rejected() {
        let mut draft = filled();
        draft.name = "ab".into();
        assert!(draft.validate().is_err());
    }

    #[test]
    fn email_is_loosely_checked() {
        let mut draft = filled();
        draft.email = "not-an-email".into();
        assert!(draft.validate().is_err());
    }

    #[test]
    fn phone_must_be_ten_digits() {
        let mut draft = filled();
        draft.phone = "012345678".into();
        assert!(draft.validate().is_err());

        draft.phone = "012345678a".into();
        assert!(draft.validate().is_err());

        draft.phone = "0123456789".into();
        draft.validate().unwrap();
    }

    #[test]
    fn address_fields_are_required() {
        let mut draft = filled();
        draft.set_street("");
        assert!(draft.validate().is_err());

        let mut draft = filled();
        draft.set_city("");
        assert!(draft.validate().is_err());
    }

    #[test]
    fn company_name_is_optional_but_not_tiny() {
        filled().validate().unwrap();

        let mut draft = filled();
        draft.set_company_name("ab");
        assert!(draft.validate().is_err());

        draft.set_company_name("Babbage & Co");
        draft.validate().unwrap();
    }

    #[test]
    fn website_must_be_http() {
        let mut draft = filled();
        draft.website = Some("https://example.com".into());
        draft.validate().unwrap();

        draft.website = Some("ftp://example.com".into());
        assert!(draft.validate().is_err());

        draft.website = Some("example.com".into());
        assert!(draft.validate().is_err());
    }

    #[test]
    fn drafts_keep_the_username_across_edits() {
        let user = sample(3, "grace");
        let draft = Draft::from(&user);
        assert_eq!(draft.username(), "USER-grace");
        assert_eq!(draft.into_user(3), user);
    }
}
