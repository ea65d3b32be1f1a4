//! Dashboard session walkthrough
//!
//! Restores (or creates) a session against a running dashboard API, loads
//! the student list and prints the derived statistics.
//!
//! ```text
//! DASHBOARD_API_URL=http://127.0.0.1:5000/api \
//! DASHBOARD_TOKEN_PATH=/tmp/dashboard-token.json \
//! cargo run -p dashboard-client --example dashboard_session -- admin@example.com secret [file.csv]
//! ```

use dashboard_client::{ClientConfig, Dashboard, ExportFormat, SortField, SortOrder, StudentQuery};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .init();

    let args: Vec<String> = std::env::args().skip(1).collect();
    let config = ClientConfig::from_env()?;
    let dashboard = Dashboard::connect(config)?;

    if !dashboard.start().await {
        let (Some(email), Some(password)) = (args.first(), args.get(1)) else {
            anyhow::bail!("no saved session; pass <email> <password>");
        };
        let user = dashboard.session().login(email, password).await?;
        tracing::info!(user = %user.email, "Signed in");
        dashboard.records().fetch_all().await?;
    }

    if let Some(path) = args.get(2) {
        match dashboard.importer().import_file(path).await {
            Ok(report) => tracing::info!(
                rows = report.rows,
                inserted = report.inserted,
                refreshed = report.refreshed,
                "Import finished"
            ),
            Err(e) => tracing::error!(error = %e, "{}", e.user_message()),
        }
    }

    let students = dashboard.records().students().await;
    let page = StudentQuery::new()
        .sort(SortField::Name, SortOrder::Ascending)
        .page(1, 5)
        .apply(&students);
    for student in &page.rows {
        println!(
            "{:<14} {:<20} {:<12} {}",
            student.aadhar_no, student.name, student.state, student.education
        );
    }
    println!("page {}/{} of {} students", page.page, page.total_pages, page.total);

    let stats = dashboard.records().stats().await;
    println!("{}", serde_json::to_string_pretty(&stats)?);

    let saved = dashboard
        .exporter()
        .save_to(ExportFormat::Csv, std::env::temp_dir())
        .await?;
    tracing::info!(path = %saved.display(), "Export written");

    Ok(())
}
