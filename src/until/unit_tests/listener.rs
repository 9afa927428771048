use tokio::sync::mpsc;

use crate::until::{listener::ListenerRegistry, signal::TerminationSignal};

fn pending_task() -> tokio::task::JoinHandle<()> {
    tokio::spawn(std::future::pending::<()>())
}

#[tokio::test]
async fn clear_aborts_only_own_listeners() {
    let (tx, _rx) = mpsc::channel(1);
    let mut first = ListenerRegistry::new(tx.clone());
    let mut second = ListenerRegistry::new(tx);

    let first_task = pending_task();
    let second_task = pending_task();
    first.track(TerminationSignal::Interrupt, first_task.abort_handle());
    second.track(TerminationSignal::Interrupt, second_task.abort_handle());

    first.clear();
    assert!(first.is_empty());
    assert_eq!(second.len(), 1);

    let err = first_task.await.unwrap_err();
    assert!(err.is_cancelled());
    assert!(!second_task.is_finished());

    second.clear();
    assert!(second_task.await.unwrap_err().is_cancelled());
}

#[tokio::test]
async fn clear_twice_is_noop() {
    let (tx, _rx) = mpsc::channel(1);
    let mut listeners = ListenerRegistry::new(tx);
    listeners.track(TerminationSignal::Interrupt, pending_task().abort_handle());

    listeners.clear();
    listeners.clear();
    assert!(listeners.is_empty());
}

#[tokio::test]
async fn remove_by_signal() {
    let (tx, _rx) = mpsc::channel(1);
    let mut listeners = ListenerRegistry::new(tx);
    let interrupt = pending_task();
    let other = pending_task();
    listeners.track(TerminationSignal::Interrupt, interrupt.abort_handle());
    #[cfg(unix)]
    listeners.track(TerminationSignal::Terminate, other.abort_handle());

    assert_eq!(listeners.remove(TerminationSignal::Interrupt), 1);
    assert_eq!(listeners.remove(TerminationSignal::Interrupt), 0);
    assert!(!listeners.contains(TerminationSignal::Interrupt));
    assert!(interrupt.await.unwrap_err().is_cancelled());

    #[cfg(unix)]
    {
        assert!(listeners.contains(TerminationSignal::Terminate));
        assert!(!other.is_finished());
    }
    drop(listeners);
    other.abort();
}

#[tokio::test]
async fn drop_removes_listeners() {
    let (tx, _rx) = mpsc::channel(1);
    let task = pending_task();
    {
        let mut listeners = ListenerRegistry::new(tx);
        listeners.track(TerminationSignal::Interrupt, task.abort_handle());
    }
    assert!(task.await.unwrap_err().is_cancelled());
}

#[tokio::test]
async fn register_all_records_source() {
    let (tx, _rx) = mpsc::channel(1);
    let mut listeners = ListenerRegistry::new(tx);
    listeners.register_all().unwrap();

    assert_eq!(listeners.len(), TerminationSignal::all().len());
    for registration in listeners.registrations() {
        assert_eq!(registration.source, std::process::id());
    }
    for signal in TerminationSignal::all() {
        assert!(listeners.contains(*signal));
    }
    listeners.clear();
    assert!(listeners.is_empty());
}

#[test]
fn signal_exit_codes() {
    assert_eq!(TerminationSignal::Interrupt.exit_code(), 130);
    #[cfg(unix)]
    assert_eq!(TerminationSignal::Terminate.exit_code(), 143);
}
