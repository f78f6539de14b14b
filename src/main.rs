#[tokio::main]
async fn main() {
    activity_booking_backend::run().await;
}
