#[actix_web::main]
async fn main() -> anyhow::Result<()> {
    volunteer_certificates::run().await
}
