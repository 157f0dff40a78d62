use std::env;

use devdash::app;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();

    let args: Vec<String> = env::args().collect();

    // Default port, overridable from the command line
    let mut port = 3000;
    if args.len() >= 2 {
        port = args[1].parse().unwrap_or(3000);
    }

    // Start the web application
    app::run(port).await?;

    Ok(())
}
