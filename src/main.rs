use run_until::{cli, logging, until::outcome::RunOutcome, until::supervisor::Supervisor};

#[tokio::main(flavor = "current_thread")]
async fn main() {
    let args = cli::parse();
    if let Err(e) = logging::init_logging(args.log_level) {
        eprintln!("run-until: failed to initialise logging: {e}");
    }

    let mut supervisor = Supervisor::new(args.into_request());
    let outcome = supervisor.run().await;

    if let RunOutcome::Faulted(e) = &outcome {
        eprintln!("run-until error: {e}");
    }
    std::process::exit(outcome.exit_status());
}
