#[actix_web::main]
async fn main() -> std::io::Result<()> {
    housing_site_lib::run().await
}
