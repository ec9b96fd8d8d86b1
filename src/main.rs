#[tokio::main]
async fn main() {
    devmatch_backend::run().await;
}
