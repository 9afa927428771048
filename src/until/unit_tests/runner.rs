use std::{
    io,
    pin::Pin,
    task::{Context, Poll},
};

use tokio::io::AsyncWrite;

use crate::until::{
    env::RunnerEnv,
    runner::{ChildRunner, relay::ChunkRelay, shell::shell_line},
};

fn env(target: &str) -> RunnerEnv {
    RunnerEnv {
        target_string: target.to_string(),
        silent: false,
        leave_alive: false,
    }
}

/// Writer whose reader has gone away.
struct ClosedPipe;

impl AsyncWrite for ClosedPipe {
    fn poll_write(self: Pin<&mut Self>, _: &mut Context<'_>, _: &[u8]) -> Poll<io::Result<usize>> {
        Poll::Ready(Err(io::Error::from(io::ErrorKind::BrokenPipe)))
    }

    fn poll_flush(self: Pin<&mut Self>, _: &mut Context<'_>) -> Poll<io::Result<()>> {
        Poll::Ready(Ok(()))
    }

    fn poll_shutdown(self: Pin<&mut Self>, _: &mut Context<'_>) -> Poll<io::Result<()>> {
        Poll::Ready(Ok(()))
    }
}

#[test]
fn shell_line_joins_with_spaces() {
    assert_eq!(shell_line("exit 1", &[]), "exit 1");
    assert_eq!(
        shell_line("echo", &["hello".to_string(), "world".to_string()]),
        "echo hello world"
    );
}

#[cfg(unix)]
#[tokio::test]
async fn relays_output_and_exit_code() {
    let mut out = Vec::new();
    let mut err = Vec::new();
    let runner = ChildRunner::new(
        env("ready"),
        "echo",
        vec!["ready;".to_string(), "echo oops >&2;".to_string(), "exit 3".to_string()],
    );

    let code = runner.run_with_output(&mut out, &mut err).await.unwrap();
    assert_eq!(code, 3);
    assert_eq!(out, b"ready\n");
    assert_eq!(err, b"oops\n");
}

#[cfg(unix)]
#[tokio::test]
async fn exit_zero() {
    let mut out = Vec::new();
    let mut err = Vec::new();
    let runner = ChildRunner::new(env("ready"), "true", Vec::new());
    let code = runner.run_with_output(&mut out, &mut err).await.unwrap();
    assert_eq!(code, 0);
    assert!(out.is_empty());
}

#[cfg(unix)]
#[tokio::test]
async fn killed_command_maps_to_signal_code() {
    let mut out = Vec::new();
    let mut err = Vec::new();
    let runner = ChildRunner::new(env("ready"), "kill -TERM $$", Vec::new());
    let code = runner.run_with_output(&mut out, &mut err).await.unwrap();
    assert_eq!(code, 143);
}

#[cfg(unix)]
#[tokio::test]
async fn unwritable_stdout_goes_to_fallback_file() {
    let dir = tempfile::tempdir().unwrap();
    let fallback = dir.path().join("stdout.txt");
    let mut err = Vec::new();

    let runner = ChildRunner::new(env("ready"), "echo", vec!["ready".to_string()])
        .fallback_path(&fallback);
    let code = runner.run_with_output(ClosedPipe, &mut err).await.unwrap();

    assert_eq!(code, 0);
    assert_eq!(std::fs::read(&fallback).unwrap(), b"ready\n");
}

#[tokio::test]
async fn fallback_appends() {
    let dir = tempfile::tempdir().unwrap();
    let fallback = dir.path().join("stdout.txt");
    std::fs::write(&fallback, b"earlier\n").unwrap();

    let mut relay = ChunkRelay::with_fallback(ClosedPipe, &fallback);
    relay.relay(b"one\n").await;
    relay.relay(b"two\n").await;

    assert_eq!(std::fs::read(&fallback).unwrap(), b"earlier\none\ntwo\n");
}

#[tokio::test]
async fn best_effort_relay_drops_chunks() {
    let mut relay = ChunkRelay::best_effort(ClosedPipe);
    relay.relay(b"lost\n").await;

    let mut relay = ChunkRelay::best_effort(Vec::new());
    relay.relay(b"kept\n").await;
    assert_eq!(relay.into_inner(), b"kept\n");
}

#[test]
fn exit_code_of_plain_status() {
    #[cfg(unix)]
    {
        use std::os::unix::process::ExitStatusExt;
        use crate::until::runner::exit_code_of;

        assert_eq!(exit_code_of(&std::process::ExitStatus::from_raw(0)), 0);
        assert_eq!(exit_code_of(&std::process::ExitStatus::from_raw(2 << 8)), 2);
        // Killed by SIGKILL
        assert_eq!(exit_code_of(&std::process::ExitStatus::from_raw(9)), 137);
    }
}
