#[actix_web::main]
async fn main() {
    if let Err(err) = court_app_lib::run().await {
        eprintln!("court_app: {}", err);
        std::process::exit(1);
    }
}
