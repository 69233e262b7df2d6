use crate::core::models::{
    answer::Query as AnswerQuery,
    claim::Claim,
    user::{Fields, Insert as UserInsert, Patch as UserPatch, Registration, Role, User},
};
use crate::core::ports::hasher::PasswordHasher;
use crate::core::ports::repository::{AnswerCommon, Store, TxStore, UserCommon};
use crate::core::ports::tokener::Tokener;
use crate::core::services::outbox::{self, Outbox};
use crate::error::Error;
use rand::distributions::Alphanumeric;
use rand::{thread_rng, Rng};

pub const PASSWORD_LEN: usize = 12;

/// A freshly created account and its one-time plaintext password.
#[derive(Debug)]
pub struct Credentials {
    pub user: User,
    pub password: String,
}

/// 12 characters drawn from `[A-Za-z0-9]`.
pub fn generate_password() -> String {
    thread_rng().sample_iter(&Alphanumeric).take(PASSWORD_LEN).map(char::from).collect()
}

fn invalid_credentials() -> Error {
    Error::Unauthorized("invalid credentials".into())
}

pub(crate) async fn create_account<S, H>(store: &mut S, hasher: &H, dni: String, name: String, lastname: String, email: String) -> Result<Credentials, Error>
where
    S: Store,
    H: PasswordHasher,
{
    let password = generate_password();
    let salt = hasher.gen_salt();
    let insert = UserInsert {
        dni,
        name,
        lastname,
        email,
        password: hasher.hash(&password, &salt),
        salt,
        role: Role::User,
    };
    let user = User {
        id: 0,
        dni: insert.dni.clone(),
        name: insert.name.clone(),
        lastname: insert.lastname.clone(),
        email: insert.email.clone(),
        role: insert.role,
    };
    let id = UserCommon::insert(store, insert).await?;
    Ok(Credentials { user: User { id, ..user }, password })
}

pub async fn register<S, H>(store: &mut S, hasher: &H, outbox: &Outbox, registration: Registration) -> Result<Credentials, Error>
where
    S: Store,
    H: PasswordHasher,
{
    let dni = registration.dni.trim().to_owned();
    let name = registration.name.trim().to_owned();
    let lastname = registration.lastname.trim().to_owned();
    let email = registration.email.trim().to_owned();
    if dni.is_empty() || name.is_empty() || email.is_empty() {
        return Err(Error::Validation("DNI, name and email are required".into()));
    }
    if UserCommon::exists(store, &dni).await? {
        return Err(Error::Conflict(format!("user already exists(dni: {})", dni)));
    }
    let credentials = create_account(store, hasher, dni, name, lastname, email).await?;
    outbox.dispatch(outbox::credentials(&credentials.user, &credentials.password));
    log::info!("registered user {}", credentials.user.dni);
    Ok(credentials)
}

pub async fn authenticate<S, H, T>(store: &mut S, hasher: &H, tokener: &T, dni: &str, password: &str, ttl: chrono::Duration) -> Result<String, Error>
where
    S: Store,
    H: PasswordHasher,
    T: Tokener<Claim>,
{
    let credential = UserCommon::credential_by_dni(store, dni).await?.ok_or_else(invalid_credentials)?;
    if !hasher.verify(password, &credential.salt, &credential.password) {
        return Err(invalid_credentials());
    }
    let claim = Claim {
        user: dni.to_owned(),
        exp: (chrono::Utc::now() + ttl).timestamp(),
    };
    tokener.gen_token(&claim)
}

/// Self-service password change; the caller must prove the current password.
pub async fn update_profile<S, H>(store: &mut S, hasher: &H, outbox: &Outbox, dni: &str, current_password: &str, new_password: &str) -> Result<(), Error>
where
    S: Store,
    H: PasswordHasher,
{
    if new_password.is_empty() {
        return Err(Error::Validation("the new password must not be empty".into()));
    }
    let user = UserCommon::get_by_dni(store, dni).await?.ok_or_else(|| Error::NotFound("user not found".into()))?;
    let credential = UserCommon::credential(store, user.id).await?.ok_or_else(|| Error::NotFound("user not found".into()))?;
    if !hasher.verify(current_password, &credential.salt, &credential.password) {
        return Err(Error::Unauthorized("wrong current password".into()));
    }
    let salt = hasher.gen_salt();
    UserCommon::patch(
        store,
        user.id,
        UserPatch {
            password: Some(hasher.hash(new_password, &salt)),
            salt: Some(salt),
            ..Default::default()
        },
    )
    .await?;
    outbox.dispatch(outbox::password_changed(&user));
    Ok(())
}

pub async fn get_user<S>(store: &mut S, id: i32) -> Result<User, Error>
where
    S: Store,
{
    UserCommon::get(store, id).await?.ok_or_else(|| Error::NotFound("user not found".into()))
}

/// Administrative overwrite of whitelisted fields. A new password is applied
/// without knowing the old one, so the acting account must be an admin.
/// Returns the names of the fields whose stored value actually changed.
pub async fn update_fields<S, H>(store: &mut S, hasher: &H, actor_dni: &str, id: i32, fields: Fields) -> Result<Vec<&'static str>, Error>
where
    S: Store,
    H: PasswordHasher,
{
    match UserCommon::get_by_dni(store, actor_dni).await? {
        Some(actor) if actor.role == Role::Admin => {}
        _ => return Err(Error::Forbidden("administrator privileges required".into())),
    }
    let user = get_user(store, id).await?;
    let mut patch = UserPatch::default();
    let mut changed = Vec::new();
    if let Some(dni) = fields.dni.map(|v| v.trim().to_owned()) {
        if dni.is_empty() {
            return Err(Error::Validation("DNI must not be empty".into()));
        }
        if dni != user.dni {
            changed.push("DNI");
            patch.dni = Some(dni);
        }
    }
    if let Some(name) = fields.name.map(|v| v.trim().to_owned()) {
        if name.is_empty() {
            return Err(Error::Validation("name must not be empty".into()));
        }
        if name != user.name {
            changed.push("name");
            patch.name = Some(name);
        }
    }
    if let Some(lastname) = fields.lastname.filter(|v| *v != user.lastname) {
        changed.push("lastname");
        patch.lastname = Some(lastname);
    }
    if let Some(email) = fields.email.map(|v| v.trim().to_owned()) {
        if email.is_empty() {
            return Err(Error::Validation("email must not be empty".into()));
        }
        if email != user.email {
            changed.push("email");
            patch.email = Some(email);
        }
    }
    if let Some(role) = fields.role.filter(|v| *v != user.role) {
        changed.push("role");
        patch.role = Some(role);
    }
    if let Some(password) = fields.password.filter(|v| !v.is_empty()) {
        let credential = UserCommon::credential(store, id).await?.ok_or_else(|| Error::NotFound("user not found".into()))?;
        if !hasher.verify(&password, &credential.salt, &credential.password) {
            let salt = hasher.gen_salt();
            changed.push("password");
            patch.password = Some(hasher.hash(&password, &salt));
            patch.salt = Some(salt);
        }
    }
    if !changed.is_empty() {
        UserCommon::patch(store, id, patch).await?;
        log::info!("{} updated user {}: {}", actor_dni, id, changed.join(", "));
    }
    Ok(changed)
}

/// Removes the account and every answer it submitted. Returns the number of answers removed.
pub async fn delete_user<T>(mut store: T, id: i32) -> Result<u64, Error>
where
    T: TxStore,
{
    if UserCommon::get(&mut store, id).await?.is_none() {
        store.rollback().await?;
        return Err(Error::NotFound("user not found".into()));
    }
    let removed = AnswerCommon::delete(&mut store, AnswerQuery { user_id_eq: Some(id) }).await?;
    UserCommon::delete(&mut store, id).await?;
    store.commit().await?;
    log::info!("deleted user {} and {} answers", id, removed);
    Ok(removed)
}
