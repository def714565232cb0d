use anyhow::Result;

/// Everything in habitual runs on one thread: user actions are serialized by the CLI and the
/// daemon only waits on timers.
pub fn single_thread_runtime() -> Result<tokio::runtime::Runtime> {
    Ok(tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()?)
}
