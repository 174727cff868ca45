use clap::Parser;
use std::process::ExitCode;

mod args;
use args::Args;

#[tokio::main]
async fn main() -> ExitCode {
    // Initialize logging
    env_logger::init();

    // Parse command-line arguments
    let args = Args::parse();

    ::log::info!("Starting archive of: {}", args.url);

    let archiver = match args.into_archiver() {
        Ok(archiver) => archiver,
        Err(e) => {
            ::log::error!("Invalid configuration: {}", e);
            eprintln!("error: {e}");
            return ExitCode::FAILURE;
        }
    };

    // Fail fast on configuration errors before any browser is started
    if let Err(e) = archiver.validate() {
        ::log::error!("Invalid configuration: {}", e);
        eprintln!("error: {e}");
        return ExitCode::FAILURE;
    }

    let start_time = std::time::Instant::now();
    match archiver.run().await {
        Ok(output) => {
            ::log::info!(
                "Archive complete - {} pages ({} skipped) in {:.2} seconds",
                output.pages,
                output.failed,
                start_time.elapsed().as_secs_f64()
            );
            if let Some(json) = &output.json_path {
                println!("{}", json.display());
            }
            println!("{}", output.pdf_path.display());
            ExitCode::SUCCESS
        }
        Err(e) => {
            ::log::error!("Archive failed: {}", e);
            eprintln!("error: {e}");
            if matches!(e, site2pdf::Error::NoWebDriver { .. }) {
                eprintln!(
                    "Note: crawling requires a WebDriver server (e.g., chromedriver). \
                     Set WEBDRIVER_URL if not using the default http://localhost:4444"
                );
            }
            ExitCode::FAILURE
        }
    }
}
