use super::{trimmed, Fields, ValidationErrors};
use crate::models::{CreateUserPayload, LoginPayload, UserChanges, UserRole};
use serde_json::Value;

pub const NAME_MIN: usize = 2;
pub const NAME_MAX: usize = 100;
pub const PASSWORD_MIN: usize = 6;
pub const PASSWORD_MAX: usize = 50;

const ACTIVE_KEYS: [&str; 2] = ["is_active", "isActive"];

pub fn validate_create_user(body: &Value) -> Result<CreateUserPayload, ValidationErrors> {
    let mut fields = Fields::new(body);

    let name = read_name(&mut fields, true);
    let email = read_email(&mut fields, true);
    let password = read_password(&mut fields, true);
    let role = read_role(&mut fields);
    let active_key = fields.resolve(&ACTIVE_KEYS);
    let is_active = fields.boolean(active_key);

    fields.finish(|| {
        Some(CreateUserPayload {
            name: name?,
            email: email?,
            password: password?,
            role,
            is_active,
        })
    })
}

/// Same rules as creation, every field optional.
pub fn validate_update_user(body: &Value) -> Result<UserChanges, ValidationErrors> {
    let mut fields = Fields::new(body);

    let name = read_name(&mut fields, false);
    let email = read_email(&mut fields, false);
    let password = read_password(&mut fields, false);
    let role = read_role(&mut fields);
    let active_key = fields.resolve(&ACTIVE_KEYS);
    let is_active = fields.boolean(active_key);

    fields.finish(|| {
        Some(UserChanges {
            name,
            email,
            password,
            role,
            is_active,
        })
    })
}

pub fn validate_login(body: &Value) -> Result<LoginPayload, ValidationErrors> {
    let mut fields = Fields::new(body);

    let email = read_email(&mut fields, true);
    let password = fields
        .string("password", true)
        .and_then(|password| fields.length("password", password, 1, usize::MAX));

    fields.finish(|| {
        Some(LoginPayload {
            email: email?,
            password: password?,
        })
    })
}

fn read_name(fields: &mut Fields<'_>, required: bool) -> Option<String> {
    let name = fields.string("name", required).map(trimmed)?;
    fields.length("name", name, NAME_MIN, NAME_MAX)
}

fn read_email(fields: &mut Fields<'_>, required: bool) -> Option<String> {
    let email = fields.string("email", required)?;
    fields.email("email", email)
}

fn read_password(fields: &mut Fields<'_>, required: bool) -> Option<String> {
    let password = fields.string("password", required)?;
    fields.length("password", password, PASSWORD_MIN, PASSWORD_MAX)
}

fn read_role(fields: &mut Fields<'_>) -> Option<UserRole> {
    let raw = fields.string("role", false)?;
    let role = UserRole::parse(&raw);
    if role.is_none() {
        fields.error("role", "The selected role is invalid");
    }
    role
}
