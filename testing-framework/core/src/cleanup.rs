use std::{future::Future, io, thread};

/// Releases external resources when a run ends without an explicit teardown.
pub trait CleanupGuard: Send {
    fn cleanup(self: Box<Self>);
}

/// Drive `future` to completion on a dedicated thread with its own
/// current-thread runtime.
///
/// Safe to call from `Drop` whether or not the caller sits inside a tokio
/// runtime, since the future never touches the caller's executor.
pub fn block_on_detached<F, T>(label: &str, future: F) -> io::Result<T>
where
    F: Future<Output = T> + Send + 'static,
    T: Send + 'static,
{
    let handle = thread::Builder::new()
        .name(label.to_owned())
        .spawn(move || {
            tokio::runtime::Builder::new_current_thread()
                .enable_all()
                .build()
                .map(|runtime| runtime.block_on(future))
        })?;

    handle
        .join()
        .map_err(|_| io::Error::other(format!("{label} thread panicked")))?
}
