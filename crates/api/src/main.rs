use anyhow::Result;

#[tokio::main]
async fn main() -> Result<()> {
    atelier_observability::init();
    atelier_api::app::run().await
}
