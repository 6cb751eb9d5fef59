use anyhow::Result;
use std::env;
use tracing::{error, info};
use intacct_rs::{Client, ClientConfig, QueryRequest};

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize tracing for logging
    tracing_subscriber::fmt::init();

    // INTACCT_SENDER_ID, INTACCT_SENDER_PASSWORD and either INTACCT_SESSION_ID
    // or INTACCT_COMPANY_ID/INTACCT_USER_ID/INTACCT_USER_PASSWORD
    let config = ClientConfig::from_env()?;
    let object = env::args().nth(1).unwrap_or_else(|| "GLACCOUNT".to_string());

    info!("Opening session...");
    let client = match Client::connect(&config).await.into_result() {
        Ok(client) => client,
        Err(e) => {
            error!("Failed to open session: {}", e);
            return Err(anyhow::anyhow!("{:?}", e));
        }
    };

    let request = QueryRequest::new(&object)
        .with_fields(["*"])
        .with_page_size(500);

    info!("Reading every {} record...", object);
    let execution = client.read_all_by_query(&request).await;
    for attempt in execution.history().iter() {
        info!(
            attempt = attempt.attempt,
            status = ?attempt.status,
            elapsed_ms = attempt.elapsed.as_millis(),
            "gateway call"
        );
    }

    match execution.into_result() {
        Ok(result) => {
            info!(
                "Read {} of {} records in {} pages",
                result.len(),
                result.total_count,
                result.pages
            );
            for record in result.records.iter().take(10) {
                info!("RECORDNO {}", record.get("RECORDNO").unwrap_or("-"));
            }
        }
        Err(e) => {
            error!("Query failed: {}", e);
            for entry in e.errors() {
                error!("  {}", entry.summary());
            }
            return Err(anyhow::anyhow!("{:?}", e));
        }
    }

    Ok(())
}
