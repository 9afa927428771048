//! Child runner spawned by `run-until`. Not meant to be run by hand.

use run_until::until::runner::{ChildRunner, RUNNER_FAILURE_CODE};

#[tokio::main(flavor = "current_thread")]
async fn main() {
    // Runs before logging so a missing target fails immediately and loudly
    let runner = match ChildRunner::from_env(std::env::args().skip(1)) {
        Ok(runner) => runner,
        Err(e) => {
            eprintln!("run-until-runner: {e}");
            std::process::exit(RUNNER_FAILURE_CODE);
        }
    };

    #[cfg(feature = "cli")]
    if let Some(path) = std::env::var_os(run_until::until::env::RUNNER_LOG_VAR) {
        let _ = run_until::logging::init_file_logging(path);
    }

    let code = match runner.run().await {
        Ok(code) => code,
        Err(e) => {
            eprintln!("run-until-runner: {e}");
            RUNNER_FAILURE_CODE
        }
    };
    std::process::exit(code);
}
