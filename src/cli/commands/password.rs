use serde_json::json;

use crate::auth::hash_password_blocking;
use crate::cli::OutputFormat;

pub async fn handle(password: &str, cost: u32, output_format: OutputFormat) -> anyhow::Result<()> {
    let hash = hash_password_blocking(password.to_string(), cost).await?;
    match output_format {
        OutputFormat::Json => println!("{}", json!({ "hash": hash })),
        OutputFormat::Text => println!("{}", hash),
    }
    Ok(())
}
