//! Prometheus counters for authorization outcomes.
//!
//! Without the `prometheus` feature the functions here do nothing.

#[cfg(feature = "prometheus")]
use lazy_static::lazy_static;
#[cfg(feature = "prometheus")]
use prometheus::{IntCounterVec, register_int_counter_vec};

#[cfg(feature = "prometheus")]
lazy_static! {
    static ref AUTHORIZATIONS_TOTAL: IntCounterVec = register_int_counter_vec!(
        "ftpgate_authorizations_total",
        "Total number of authorization requests handled.",
        &["mode", "outcome"]
    )
    .unwrap();
    static ref AUTH_FAILURES_TOTAL: IntCounterVec =
        register_int_counter_vec!("ftpgate_auth_failures_total", "Total number of refused logins.", &["reason"]).unwrap();
}

/// Count a handled authorization. `mode` is `PASSWORD`, `SSH`, or `NONE` when no mode applies.
#[allow(unused_variables)]
pub fn add_authorization_metric(mode: &str, granted: bool) {
    #[cfg(feature = "prometheus")]
    AUTHORIZATIONS_TOTAL
        .with_label_values(&[mode, if granted { "granted" } else { "denied" }])
        .inc();
}

/// Count a refused login by its reason label.
#[allow(unused_variables)]
pub fn add_failure_metric(reason: &str) {
    #[cfg(feature = "prometheus")]
    AUTH_FAILURES_TOTAL.with_label_values(&[reason]).inc();
}

/// Renders all registered metrics in the prometheus text format.
#[cfg(feature = "prometheus")]
pub fn gather() -> Result<String, prometheus::Error> {
    use prometheus::{Encoder, TextEncoder};

    let mut buffer = Vec::new();
    TextEncoder::new().encode(&prometheus::gather(), &mut buffer)?;
    String::from_utf8(buffer).map_err(|e| prometheus::Error::Msg(e.to_string()))
}

#[cfg(all(test, feature = "prometheus"))]
mod tests {
    use super::*;

    #[test]
    fn counters_show_up_in_gather() {
        add_authorization_metric("SSH", true);
        add_failure_metric("bad_password");
        let text = gather().unwrap();
        assert!(text.contains("ftpgate_authorizations_total"));
        assert!(text.contains(r#"reason="bad_password""#));
    }
}
