#[tokio::main]
async fn main() -> anyhow::Result<()> {
    searchfront::start_server().await
}
