//! A long-running workload to try `run-until` against.
//!
//! Writes ten files into a scratch directory, one per second, announcing
//! each one on stdout:
//!
//! ```text
//! run-until --targetString "Writing file 3" -- cargo run --example long_task
//! ```
use std::{fs, time::Duration};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let dir = std::env::temp_dir().join("run-until-long-task");
    if dir.exists() {
        fs::remove_dir_all(&dir)?;
    }
    fs::create_dir_all(&dir)?;

    for i in 0..10 {
        println!("Writing file {}", i);
        fs::write(dir.join(format!("{}.txt", i)), format!("This is file {}.", i))?;
        tokio::time::sleep(Duration::from_secs(1)).await;
    }
    Ok(())
}
