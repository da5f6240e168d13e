/// Peak resident set size of this process, in megabytes.
///
/// Reads `ru_maxrss` from `getrusage(RUSAGE_SELF)`, which Linux reports in
/// kilobytes and macOS in bytes. Returns `0.0` if the call fails.
///
/// # Example
/// ```rust, ignore
/// use gxfgenie::max_mem_usage_mb;
///
/// log::info!("peak memory: {:.2} MB", max_mem_usage_mb());
/// ```
pub fn max_mem_usage_mb() -> f64 {
    let mut rusage = std::mem::MaybeUninit::<libc::rusage>::zeroed();
    // SAFETY: getrusage only writes into the struct we hand it.
    let rc = unsafe { libc::getrusage(libc::RUSAGE_SELF, rusage.as_mut_ptr()) };
    if rc != 0 {
        return 0.0;
    }
    // SAFETY: zero-initialized and filled in by a successful call.
    let maxrss = unsafe { rusage.assume_init() }.ru_maxrss as f64;

    if cfg!(target_os = "macos") {
        maxrss / 1024.0 / 1024.0
    } else {
        maxrss / 1024.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reports_some_memory() {
        assert!(max_mem_usage_mb() > 0.0);
    }
}
