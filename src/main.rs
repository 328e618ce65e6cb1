#[tokio::main]
async fn main() -> anyhow::Result<()> {
    simtr_gateway::run().await
}
