//! Telemetry helpers for hosts embedding `chart-overlays`.
//!
//! Overlay code only emits `tracing` events. Hosts that already run a
//! subscriber keep it; standalone tools can call `init_default_tracing`.

/// Installs a compact `tracing` subscriber when the `telemetry` feature is on.
///
/// The filter comes from `RUST_LOG` and falls back to `warn`, since layout and
/// hit-testing emit per-frame `trace!` events that would flood `info`.
/// Returns `false` when the feature is disabled or a global subscriber exists.
#[must_use]
pub fn init_default_tracing() -> bool {
    #[cfg(feature = "telemetry")]
    {
        let builder = tracing_subscriber::fmt()
            .with_env_filter(
                tracing_subscriber::EnvFilter::try_from_default_env()
                    .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
            )
            .with_target(true)
            .compact();

        return builder.try_init().is_ok();
    }

    #[cfg(not(feature = "telemetry"))]
    {
        false
    }
}

#[cfg(test)]
mod tests {
    use super::init_default_tracing;

    #[test]
    fn second_install_is_refused() {
        let first = init_default_tracing();
        assert!(!init_default_tracing());
        assert_eq!(first, cfg!(feature = "telemetry"));
    }
}
