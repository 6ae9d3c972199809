use item_server::config::Config;
use item_server::error::ServerError;
use item_server::{logging, server};

#[tokio::main]
async fn main() -> Result<(), ServerError> {
    let config = Config::load()?;
    logging::init_logging(&config)?;
    server::serve(config).await
}
