use malice_ikarus::app;

#[tokio::main]
async fn main() {
    app::startup::startup().await;
}
