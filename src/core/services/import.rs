use crate::core::models::report::ImportSummary;
use crate::core::ports::hasher::PasswordHasher;
use crate::core::ports::repository::{Store, UserCommon};
use crate::core::services::account::create_account;
use crate::core::services::outbox::{self, Outbox};
use crate::error::Error;
use serde::Deserialize;

const DELIMITER: u8 = b';';
const REQUIRED_COLUMNS: [&str; 3] = ["DNI", "name", "email"];

/// One line of an account sheet: `DNI;clave;lastname;name;email`. The `clave`
/// column is accepted but ignored, every imported account gets a fresh password.
#[derive(Debug, Deserialize)]
struct Row {
    #[serde(rename = "DNI", default)]
    dni: String,
    #[serde(default)]
    lastname: String,
    #[serde(default)]
    name: String,
    #[serde(default)]
    email: String,
}

/// Creates an account for every complete row whose DNI is not taken yet and mails
/// each new account its credentials. Rows with a taken DNI are counted as skipped;
/// incomplete or unreadable rows are ignored without being counted.
pub async fn bulk_import<S, H>(store: &mut S, hasher: &H, outbox: &Outbox, data: &[u8]) -> Result<ImportSummary, Error>
where
    S: Store,
    H: PasswordHasher,
{
    let mut reader = csv::ReaderBuilder::new().delimiter(DELIMITER).trim(csv::Trim::All).flexible(true).from_reader(data);
    let headers = reader.headers()?.clone();
    for column in REQUIRED_COLUMNS {
        if !headers.iter().any(|h| h == column) {
            return Err(Error::Validation(format!("missing column {}", column)));
        }
    }
    let mut summary = ImportSummary::default();
    for (line, record) in reader.deserialize::<Row>().enumerate() {
        let row = match record {
            Ok(row) => row,
            Err(e) => {
                log::warn!("skipping unreadable row {}: {}", line + 2, e);
                continue;
            }
        };
        if row.dni.is_empty() || row.name.is_empty() || row.email.is_empty() {
            continue;
        }
        if UserCommon::exists(store, &row.dni).await? {
            summary.skipped += 1;
            continue;
        }
        match create_account(store, hasher, row.dni, row.name, row.lastname, row.email).await {
            Ok(credentials) => {
                outbox.dispatch(outbox::credentials(&credentials.user, &credentials.password));
                summary.created += 1;
            }
            Err(Error::Conflict(_)) => summary.skipped += 1,
            Err(e) => return Err(e),
        }
    }
    log::info!("imported accounts (created: {}, skipped: {})", summary.created, summary.skipped);
    Ok(summary)
}

/// Account sheet without credentials: `DNI;lastname;name;email;role`.
pub async fn export<S>(store: &mut S) -> Result<Vec<u8>, Error>
where
    S: Store,
{
    let users = UserCommon::query(store).await?;
    let mut writer = csv::WriterBuilder::new().delimiter(DELIMITER).from_writer(vec![]);
    writer.write_record(["DNI", "lastname", "name", "email", "role"])?;
    for u in &users {
        writer.write_record([u.dni.as_str(), u.lastname.as_str(), u.name.as_str(), u.email.as_str(), u.role.as_str()])?;
    }
    writer.into_inner().map_err(|e| Error::ServerError(e.to_string()))
}
