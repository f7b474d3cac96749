use recon_match::config::{LoggingSettings, Settings};
use recon_match::core::Matcher;
use recon_match::models::{fixtures, ScoringWeights};
use recon_match::report::Report;
use std::process::ExitCode;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

fn init_logging(logging: &LoggingSettings) {
    // RUST_LOG wins over the configured level
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&logging.level));

    let subscriber = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_level(true);

    if logging.format == "json" {
        subscriber.json().init();
    } else {
        subscriber.pretty().init();
    }
}

fn main() -> ExitCode {
    // Load .env file if present
    dotenv::dotenv().ok();

    let settings = match Settings::load() {
        Ok(settings) => settings,
        Err(e) => {
            eprintln!("Failed to load configuration: {}", e);
            return ExitCode::FAILURE;
        }
    };

    init_logging(&settings.logging);
    info!("Configuration loaded successfully");

    let weights = ScoringWeights {
        name: settings.scoring.weights.name,
        date: settings.scoring.weights.date,
    };
    let matcher = Matcher::new(&settings.matching, weights);
    info!("Matcher initialized with weights: {:?}", weights);

    let transactions = match fixtures::load_transactions(&settings.fixtures.transactions) {
        Ok(records) => records,
        Err(e) => {
            error!("Failed to load transactions: {}", e);
            return ExitCode::FAILURE;
        }
    };
    let attachments = match fixtures::load_attachments(&settings.fixtures.attachments) {
        Ok(records) => records,
        Err(e) => {
            error!("Failed to load attachments: {}", e);
            return ExitCode::FAILURE;
        }
    };
    let expected = match &settings.fixtures.expected {
        Some(path) => match fixtures::load_expected(path) {
            Ok(pairs) => pairs,
            Err(e) => {
                error!("Failed to load expected pairs: {}", e);
                return ExitCode::FAILURE;
            }
        },
        None => Vec::new(),
    };

    info!(
        "Loaded {} transactions, {} attachments, {} expected pairs",
        transactions.len(),
        attachments.len(),
        expected.len()
    );

    let by_transaction = matcher.match_transactions(&transactions, &attachments);
    let by_attachment = matcher.match_attachments(&attachments, &transactions);

    let tx_report = Report::for_transactions(&transactions, &by_transaction, &expected);
    let att_report = Report::for_attachments(&attachments, &by_attachment, &expected);

    println!("{}", tx_report);
    println!("{}", att_report);

    if expected.is_empty() || (tx_report.all_correct() && att_report.all_correct()) {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    }
}
