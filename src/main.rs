#[tokio::main]
async fn main() -> anyhow::Result<()> {
    alumni_lib::run().await
}
