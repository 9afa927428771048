use std::{
    io,
    pin::Pin,
    sync::{Arc, Mutex},
    task::{Context, Poll},
};

use tokio::{io::AsyncWrite, sync::mpsc};

use crate::until::{
    config::{RunRequest, RunUntilConfig, StreamSource},
    error::RunUntilError,
    listener::ListenerRegistry,
    matcher::ChunkMatcher,
    outcome::RunOutcome,
    state::RunState,
    supervisor::{Supervisor, handler::ChunkStatus, resolve_runner},
};

#[derive(Clone, Default)]
struct Captured(Arc<Mutex<Vec<u8>>>);

impl Captured {
    fn contents(&self) -> Vec<u8> {
        self.0.lock().unwrap().clone()
    }
}

impl AsyncWrite for Captured {
    fn poll_write(self: Pin<&mut Self>, _: &mut Context<'_>, buf: &[u8]) -> Poll<io::Result<usize>> {
        self.0.lock().unwrap().extend_from_slice(buf);
        Poll::Ready(Ok(buf.len()))
    }

    fn poll_flush(self: Pin<&mut Self>, _: &mut Context<'_>) -> Poll<io::Result<()>> {
        Poll::Ready(Ok(()))
    }

    fn poll_shutdown(self: Pin<&mut Self>, _: &mut Context<'_>) -> Poll<io::Result<()>> {
        Poll::Ready(Ok(()))
    }
}

fn supervisor(config: RunUntilConfig) -> (Supervisor, Captured, Captured) {
    let out = Captured::default();
    let err = Captured::default();
    let supervisor = Supervisor::new(RunRequest::new(config, "echo", ["ready"]))
        .with_output(out.clone(), err.clone());
    (supervisor, out, err)
}

#[tokio::test]
async fn output_is_relayed_before_match() {
    let (mut supervisor, out, err) = supervisor(RunUntilConfig::new("ready"));
    let matcher = ChunkMatcher::new("ready");

    let chunk = b"server ready\n";
    let status = supervisor
        .handle_output(Ok(chunk.len()), chunk, StreamSource::Stdout, &matcher)
        .await
        .unwrap();
    assert_eq!(status, ChunkStatus::Matched);
    assert_eq!(out.contents(), chunk);
    assert!(err.contents().is_empty());

    let chunk = b"warming up\n";
    let status = supervisor
        .handle_output(Ok(chunk.len()), chunk, StreamSource::Stderr, &matcher)
        .await
        .unwrap();
    assert_eq!(status, ChunkStatus::Pending);
    assert_eq!(err.contents(), chunk);
}

#[tokio::test]
async fn silent_suppresses_relay() {
    let (mut supervisor, out, err) = supervisor(RunUntilConfig::new("ready").silent(true));
    let matcher = ChunkMatcher::new("ready");

    let chunk = b"ready\n";
    let status = supervisor
        .handle_output(Ok(chunk.len()), chunk, StreamSource::Stdout, &matcher)
        .await
        .unwrap();
    assert_eq!(status, ChunkStatus::Matched);
    assert!(out.contents().is_empty());
    assert!(err.contents().is_empty());
}

#[tokio::test]
async fn read_results() {
    let (mut supervisor, _out, _err) = supervisor(RunUntilConfig::new("ready"));
    let matcher = ChunkMatcher::new("ready");

    let status = supervisor
        .handle_output(Ok(0), &[], StreamSource::Stdout, &matcher)
        .await
        .unwrap();
    assert_eq!(status, ChunkStatus::Eof);

    let status = supervisor
        .handle_output(
            Err(io::Error::from(io::ErrorKind::Interrupted)),
            &[],
            StreamSource::Stdout,
            &matcher,
        )
        .await
        .unwrap();
    assert_eq!(status, ChunkStatus::Pending);

    let result = supervisor
        .handle_output(
            Err(io::Error::other("pipe broke")),
            &[],
            StreamSource::Stderr,
            &matcher,
        )
        .await;
    assert!(matches!(result, Err(RunUntilError::IO(_))));
}

#[tokio::test]
async fn exit_settles_not_found() {
    let (tx, _rx) = mpsc::channel(1);
    let mut listeners = ListenerRegistry::new(tx);
    listeners.track(
        crate::until::signal::TerminationSignal::Interrupt,
        tokio::spawn(std::future::pending::<()>()).abort_handle(),
    );

    #[cfg(unix)]
    {
        use std::os::unix::process::ExitStatusExt;
        let status = std::process::ExitStatus::from_raw(1 << 8);
        let outcome = Supervisor::handle_exit(Ok(status), &mut listeners);
        assert_eq!(outcome, RunOutcome::NotFound { exit_code: Some(1) });
        assert!(listeners.is_empty());
    }

    let outcome = Supervisor::handle_exit(
        Err(RunUntilError::IO("wait failed".to_string())),
        &mut listeners,
    );
    assert!(matches!(outcome, RunOutcome::Faulted(RunUntilError::IO(_))));
}

#[tokio::test]
async fn invalid_request_faults_without_spawning() {
    let (mut supervisor, out, _err) = supervisor(RunUntilConfig::new(""));
    let outcome = supervisor.run().await;

    assert!(matches!(
        outcome,
        RunOutcome::Faulted(RunUntilError::InvalidConfiguration(_))
    ));
    assert_eq!(supervisor.state(), RunState::Faulted);
    assert!(out.contents().is_empty());
}

#[tokio::test]
async fn missing_runner_faults() {
    let config = RunUntilConfig::new("ready").runner("/nonexistent/run-until-runner");
    let (mut supervisor, _out, _err) = supervisor(config);

    let outcome = supervisor.run().await;
    assert!(matches!(outcome, RunOutcome::Faulted(RunUntilError::IO(_))));
    assert_eq!(outcome.exit_status(), 1);
}

#[tokio::test]
async fn runs_only_once() {
    let (mut supervisor, _out, _err) = supervisor(RunUntilConfig::new(""));
    let _ = supervisor.run().await;

    let outcome = supervisor.run().await;
    assert!(matches!(outcome, RunOutcome::Faulted(RunUntilError::Handle(_))));
    assert_eq!(supervisor.state(), RunState::Faulted);
}

#[test]
fn configured_runner_wins() {
    let config = RunUntilConfig::new("ready").runner("/opt/run-until-runner");
    assert_eq!(
        resolve_runner(&config).unwrap(),
        std::path::PathBuf::from("/opt/run-until-runner")
    );
}
