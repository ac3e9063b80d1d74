use std::io::Write;

use anyhow::Result;
use chrono::Utc;
use fxrates::config::Config;
use log::error;

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    init_logging();

    let today = Utc::now().date_naive();
    let config = Config::from_env().inspect_err(|e| error!("{today} - {e}"))?;

    if let Err(e) = fxrates::run(&config, today).await {
        error!("{today} - rate update failed: {e}");
        return Err(e.into());
    }

    Ok(())
}

fn init_logging() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .target(env_logger::Target::Stdout)
        .format(|buf, record| {
            writeln!(
                buf,
                "{} | {:<5} | {}",
                buf.timestamp_millis(),
                record.level(),
                record.args()
            )
        })
        .init();
}
