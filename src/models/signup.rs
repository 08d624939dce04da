//! Signup payloads for the four roles.
//!
//! Every field is optional at the deserialization layer so that a missing
//! field is reported through [`ValidationError`] with the rest of the field
//! errors instead of as an opaque JSON extraction failure.

use serde::{Deserialize, Serialize};

use crate::models::user::{NewUser, RoleProfile};
use crate::utils::error::{FieldError, ValidationError};

pub const PASSWORD_MIN_BYTES: usize = 8;
pub const PASSWORD_MAX_BYTES: usize = 72;
pub const PHONE_PREFIX: &str = "+92 ";
pub const PHONE_DIGITS: usize = 11;
const PHONE_FORMAT_HINT: &str = "Phone format: +92 12345678910 (11 digits after the space)";

#[derive(Debug, Default, Serialize, Deserialize, Clone, utoipa::ToSchema)]
#[schema(example = json!({
    "email": "admin@example.com",
    "password": "admin12345",
    "phone": "+92 12345678910",
    "name": "Admin User",
    "admin_code": "ADMIN2024SECRET"
}))]
pub struct AdminSignup {
    pub email: Option<String>,
    pub password: Option<String>,
    pub phone: Option<String>,
    pub name: Option<String>,
    pub admin_code: Option<String>,
}

#[derive(Debug, Default, Serialize, Deserialize, Clone, utoipa::ToSchema)]
#[schema(example = json!({
    "email": "student@example.com",
    "password": "student123",
    "phone": "+92 12345678910",
    "name": "Ahmed Ali",
    "institution_name": "ABC School"
}))]
pub struct StudentSignup {
    pub email: Option<String>,
    pub password: Option<String>,
    pub phone: Option<String>,
    pub name: Option<String>,
    pub institution_name: Option<String>,
}

#[derive(Debug, Default, Serialize, Deserialize, Clone, utoipa::ToSchema)]
#[schema(example = json!({
    "email": "school@example.com",
    "password": "school123",
    "phone": "+92 12345678910",
    "institute_name": "XYZ College",
    "address": "Karachi, Pakistan",
    "head_of_institute": "Dr. Principal Name"
}))]
pub struct SchoolCollegeSignup {
    pub email: Option<String>,
    pub password: Option<String>,
    pub phone: Option<String>,
    pub institute_name: Option<String>,
    pub address: Option<String>,
    pub head_of_institute: Option<String>,
}

#[derive(Debug, Default, Serialize, Deserialize, Clone, utoipa::ToSchema)]
#[schema(example = json!({
    "email": "promoter@example.com",
    "password": "promoter123",
    "phone": "+92 12345678910",
    "name": "Promoter Name"
}))]
pub struct PromoterSignup {
    pub email: Option<String>,
    pub password: Option<String>,
    pub phone: Option<String>,
    pub name: Option<String>,
}

/// A validated admin signup together with the code it presented.
/// The code is checked by the service, not here.
#[derive(Debug, Clone)]
pub struct AdminCandidate {
    pub user: NewUser,
    pub admin_code: String,
}

impl AdminSignup {
    pub fn validate(self) -> Result<AdminCandidate, ValidationError> {
        let mut v = FieldValidator::default();
        let email = v.email(self.email);
        let password = v.password(self.password);
        let phone = v.required_phone(self.phone);
        let name = v.text("name", self.name, 2, Some(100));
        let admin_code = v.required("admin_code", self.admin_code);
        v.finish()?;

        match (email, password, phone, name, admin_code) {
            (Some(email), Some(password), Some(phone), Some(name), Some(admin_code)) => {
                Ok(AdminCandidate {
                    user: NewUser {
                        email,
                        password,
                        phone: Some(phone),
                        profile: RoleProfile::Admin { name },
                    },
                    admin_code,
                })
            }
            _ => Err(ValidationError::incomplete()),
        }
    }
}

impl StudentSignup {
    pub fn validate(self) -> Result<NewUser, ValidationError> {
        let mut v = FieldValidator::default();
        let email = v.email(self.email);
        let password = v.password(self.password);
        let phone = v.optional_phone(self.phone);
        let name = v.text("name", self.name, 2, Some(100));
        let institution_name = v.text("institution_name", self.institution_name, 2, None);
        v.finish()?;

        match (email, password, name, institution_name) {
            (Some(email), Some(password), Some(name), Some(institution_name)) => Ok(NewUser {
                email,
                password,
                phone,
                profile: RoleProfile::Student {
                    name,
                    institution_name,
                },
            }),
            _ => Err(ValidationError::incomplete()),
        }
    }
}

impl SchoolCollegeSignup {
    pub fn validate(self) -> Result<NewUser, ValidationError> {
        let mut v = FieldValidator::default();
        let email = v.email(self.email);
        let password = v.password(self.password);
        let phone = v.required_phone(self.phone);
        let institute_name = v.text("institute_name", self.institute_name, 2, Some(200));
        let address = v.text("address", self.address, 5, None);
        v.finish()?;

        match (email, password, phone, institute_name, address) {
            (Some(email), Some(password), Some(phone), Some(institute_name), Some(address)) => {
                Ok(NewUser {
                    email,
                    password,
                    phone: Some(phone),
                    profile: RoleProfile::SchoolCollege {
                        institute_name,
                        address,
                        head_of_institute: self.head_of_institute,
                    },
                })
            }
            _ => Err(ValidationError::incomplete()),
        }
    }
}

impl PromoterSignup {
    pub fn validate(self) -> Result<NewUser, ValidationError> {
        let mut v = FieldValidator::default();
        let email = v.email(self.email);
        let password = v.password(self.password);
        let phone = v.required_phone(self.phone);
        let name = v.text("name", self.name, 2, Some(100));
        v.finish()?;

        match (email, password, phone, name) {
            (Some(email), Some(password), Some(phone), Some(name)) => Ok(NewUser {
                email,
                password,
                phone: Some(phone),
                profile: RoleProfile::Promoter { name },
            }),
            _ => Err(ValidationError::incomplete()),
        }
    }
}

/// Collects every field error of a payload before failing
#[derive(Default)]
struct FieldValidator {
    errors: Vec<FieldError>,
}

impl FieldValidator {
    fn fail(&mut self, field: &str, reason: impl Into<String>) {
        self.errors.push(FieldError::new(field, reason));
    }

    fn required(&mut self, field: &str, value: Option<String>) -> Option<String> {
        if value.is_none() {
            self.fail(field, "Field required");
        }
        value
    }

    /// Lengths are counted in characters
    fn text(
        &mut self,
        field: &str,
        value: Option<String>,
        min: usize,
        max: Option<usize>,
    ) -> Option<String> {
        let value = self.required(field, value)?;
        let len = value.chars().count();
        if len < min {
            self.fail(field, format!("Must be at least {} characters", min));
            return None;
        }
        if let Some(max) = max {
            if len > max {
                self.fail(field, format!("Must be at most {} characters", max));
                return None;
            }
        }
        Some(value)
    }

    /// Returns the normalized (trimmed, lowercased) address
    fn email(&mut self, value: Option<String>) -> Option<String> {
        let value = self.required("email", value)?;
        let normalized = value.trim().to_lowercase();
        if !is_valid_email(&normalized) {
            self.fail("email", "Not a valid email address");
            return None;
        }
        Some(normalized)
    }

    /// Length is counted in UTF-8 bytes, bcrypt's unit
    fn password(&mut self, value: Option<String>) -> Option<String> {
        let value = self.required("password", value)?;
        let len = value.len();
        if len < PASSWORD_MIN_BYTES {
            self.fail(
                "password",
                format!("Must be at least {} bytes", PASSWORD_MIN_BYTES),
            );
            return None;
        }
        if len > PASSWORD_MAX_BYTES {
            self.fail(
                "password",
                format!("Must be at most {} bytes", PASSWORD_MAX_BYTES),
            );
            return None;
        }
        Some(value)
    }

    fn required_phone(&mut self, value: Option<String>) -> Option<String> {
        let value = self.required("phone", value)?;
        self.phone(value)
    }

    fn optional_phone(&mut self, value: Option<String>) -> Option<String> {
        self.phone(value?)
    }

    fn phone(&mut self, value: String) -> Option<String> {
        if !is_valid_phone(&value) {
            self.fail("phone", PHONE_FORMAT_HINT);
            return None;
        }
        Some(value)
    }

    fn finish(self) -> Result<(), ValidationError> {
        if self.errors.is_empty() {
            Ok(())
        } else {
            Err(ValidationError::new(self.errors))
        }
    }
}

/// `+92 ` followed by exactly 11 ASCII digits, nothing else
pub fn is_valid_phone(phone: &str) -> bool {
    match phone.strip_prefix(PHONE_PREFIX) {
        Some(digits) => {
            digits.len() == PHONE_DIGITS && digits.bytes().all(|b| b.is_ascii_digit())
        }
        None => false,
    }
}

/// Syntactic check of a `local@domain` address
pub fn is_valid_email(email: &str) -> bool {
    if email.len() > 254 {
        return false;
    }

    let (local, domain) = match email.rsplit_once('@') {
        Some(parts) => parts,
        None => return false,
    };

    if local.is_empty() || local.len() > 64 || local.starts_with('.') || local.ends_with('.') {
        return false;
    }
    if local.contains("..") {
        return false;
    }
    let local_ok = local.chars().all(|c| {
        c.is_ascii_alphanumeric() || "!#$%&'*+/=?^_`{|}~.-".contains(c)
    });
    if !local_ok {
        return false;
    }

    let labels: Vec<&str> = domain.split('.').collect();
    if labels.len() < 2 {
        return false;
    }
    let labels_ok = labels.iter().all(|label| {
        !label.is_empty()
            && label.len() <= 63
            && !label.starts_with('-')
            && !label.ends_with('-')
            && label.chars().all(|c| c.is_ascii_alphanumeric() || c == '-')
    });
    // Punycode TLDs (`xn--p1ai`) are allowed; an all-numeric one is an IP, not a domain
    let tld_ok = labels
        .last()
        .map(|tld| tld.len() >= 2 && !tld.chars().all(|c| c.is_ascii_digit()))
        .unwrap_or(false);

    labels_ok && tld_ok
}
