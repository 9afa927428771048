//! Basic example: wait for a command to report readiness, then leave it running
use run_until::until::{
    config::{RunRequest, RunUntilConfig},
    outcome::RunOutcome,
    supervisor::Supervisor,
};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let config = RunUntilConfig::new("Server listening").leave_alive(true);
    let request = RunRequest::new(
        config,
        "echo booting; sleep 1; echo Server listening on port 3000; sleep 5",
        Vec::<String>::new(),
    );

    let mut supervisor = Supervisor::new(request);
    match supervisor.run().await {
        RunOutcome::Matched { process_id, .. } => {
            println!("Ready; runner {} keeps running in the background", process_id);
        }
        RunOutcome::NotFound { exit_code } => {
            println!("Exited before becoming ready: {:?}", exit_code);
        }
        RunOutcome::Faulted(e) => return Err(e.into()),
    }
    Ok(())
}
