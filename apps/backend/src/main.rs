#[tokio::main]
async fn main() -> anyhow::Result<()> {
    madrasati_backend::run().await
}
