use anyhow::Result;
use std::env;
use tracing::{error, info};
use intacct_rs::{Client, ClientConfig, ReportRequest};

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt::init();

    let report = env::args()
        .nth(1)
        .ok_or_else(|| anyhow::anyhow!("usage: run_report <custom report name>"))?;

    let config = ClientConfig::from_env()?.with_reauthenticate(true);
    let client = Client::connect(&config)
        .await
        .into_result()
        .map_err(|e| anyhow::anyhow!("{:?}", e))?;

    // waitTime bounds how long the first call blocks before a reportId comes back
    let request = ReportRequest::new(&report)
        .with_wait_time(30)
        .with_page_size(1000)
        .with_list_separator(",");

    info!("Running report {}...", report);
    match client.read_all_report_records(&request).await.into_result() {
        Ok(result) => {
            info!("Report returned {} rows", result.len());
            if let Some(first) = result.records.first() {
                for (name, value) in first.fields() {
                    info!("{} = {:?}", name, value);
                }
            }
        }
        Err(e) => {
            error!("Report failed: {}", e);
            return Err(anyhow::anyhow!("{:?}", e));
        }
    }

    Ok(())
}
