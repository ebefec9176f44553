#[tokio::main]
async fn main() {
    mediflow::run().await;
}
