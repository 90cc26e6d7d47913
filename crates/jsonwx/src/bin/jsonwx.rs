//! jsonwx driver binary

use jsonwx::runner::{run_driver, setup_logging, DriverArgs};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    setup_logging();

    let args: DriverArgs = argh::from_env();
    run_driver(args).await?;
    Ok(())
}
