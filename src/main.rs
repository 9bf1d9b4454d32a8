#[tokio::main]
async fn main() {
    let code = boundbuf::app::startup::startup().await;
    std::process::exit(code);
}
