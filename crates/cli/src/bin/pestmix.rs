use anyhow::Result;

#[tokio::main]
async fn main() -> Result<()> {
    pestmix_cli::main_entry().await
}
