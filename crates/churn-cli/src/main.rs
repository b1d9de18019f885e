use std::io::{self, BufWriter};

use anyhow::Result;
use clap::Command;
use log::LevelFilter;

use churn_classifiers::config::PipelineConfig;
use churn_classifiers::pipeline::run_pipeline;

fn main() -> Result<()> {
    env_logger::Builder::default()
        .filter_level(LevelFilter::Error)
        .parse_env(env_logger::Env::default().filter_or("CHURN_LOG", "error,churn=info"))
        .init();

    Command::new("churn")
        .version(clap::crate_version!())
        .author("Justin Sing <justincsing@gmail.com>")
        .about("Telecom churn model comparison on synthetic customer data")
        .long_about(
            "Generates 5000 synthetic telecom customers, labels churn with a fixed risk \
             heuristic, and compares Random Forest, Gradient Boosting, SVM, Logistic \
             Regression and Neural Network classifiers on a stratified 80/20 split.",
        )
        .help_template(
            "{usage-heading} {usage}\n\n\
             {about-with-newline}\n\
             Written by {author-with-newline}Version {version}\n\n\
             {all-args}{after-help}",
        )
        .get_matches();

    let config = PipelineConfig::default();
    log::info!(
        "[Churn] Running model comparison on {} customers",
        config.n_samples
    );

    let stdout = io::stdout();
    match run_pipeline(&config, BufWriter::new(stdout.lock())) {
        Ok(outcome) => {
            log::info!(
                "[Churn] Done; best model: {}",
                outcome.best_model.as_deref().unwrap_or("none")
            );
            Ok(())
        }
        Err(e) => {
            log::error!("Model comparison failed: {:#}", e);
            std::process::exit(1)
        }
    }
}
