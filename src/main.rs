#[tokio::main]
async fn main() {
    if let Err(e) = stamp_decoder::cli::run().await {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}
