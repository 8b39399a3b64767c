use keybox_checker::{checker::KeyboxChecker, config::Config, telemetry};

#[tokio::main(flavor = "current_thread")]
async fn main() -> color_eyre::Result<()> {
    color_eyre::install()?;
    // A missing .env file is fine
    let _ = dotenvy::dotenv();
    telemetry::init_tracing();

    let config = Config::load()?;
    tracing::debug!("Loaded configuration: {:?}", config);

    let checker = KeyboxChecker::from_config(&config)?;
    match checker.run().await {
        Ok(summary) => {
            tracing::info!(
                "Done: {} valid, {} revoked, {} failed. Report written to {}",
                summary.valid,
                summary.revoked,
                summary.failed,
                summary.output.display()
            );
            Ok(())
        }
        Err(e) => {
            tracing::error!("Keybox check aborted: {}", e);
            Err(e.into())
        }
    }
}
