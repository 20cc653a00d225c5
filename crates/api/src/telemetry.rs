//! Prometheus Telemetry

use crate::error::ApiError;
use frame_decoder::Status;
use metrics::{counter, describe_counter, describe_gauge, gauge};
use metrics_exporter_prometheus::{PrometheusBuilder, PrometheusHandle};

/// Install the global Prometheus recorder
pub fn install_recorder() -> Result<PrometheusHandle, ApiError> {
    let handle = PrometheusBuilder::new()
        .install_recorder()
        .map_err(|e| ApiError::Metrics(e.to_string()))?;

    describe_counter!("rnts_frames_total", "END_OF_FRAME symbols received");
    describe_counter!(
        "rnts_frames_incomplete_total",
        "Frames dropped as incomplete, short or overrun"
    );
    describe_counter!("rnts_checksum_failures_total", "Frames dropped on CRC mismatch");
    describe_counter!("rnts_buffer_overruns_total", "Receive buffer overflows");
    describe_gauge!("rnts_temperature_celsius", "Last decoded temperature");
    describe_gauge!("rnts_humidity_percent", "Last decoded relative humidity");
    describe_gauge!("rnts_pressure_hpa", "Last decoded pressure");

    Ok(handle)
}

/// Mirror a status snapshot into the recorder
pub fn record_status(status: &Status) {
    let c = &status.counters;
    counter!("rnts_frames_total").absolute(u64::from(c.frames_total));
    counter!("rnts_frames_incomplete_total").absolute(u64::from(c.frames_incomplete));
    counter!("rnts_checksum_failures_total").absolute(u64::from(c.checksum_failures));
    counter!("rnts_buffer_overruns_total").absolute(u64::from(c.buffer_overruns));

    if status.decoded_at_us.is_none() {
        return;
    }

    let r = &status.reading;
    gauge!("rnts_temperature_celsius", "source" => "boiler").set(r.boiler_temp().as_f64());
    gauge!("rnts_temperature_celsius", "source" => "solar").set(r.solar_temp().as_f64());
    gauge!("rnts_humidity_percent", "source" => "boiler").set(r.boiler_humidity().as_f64());
    gauge!("rnts_humidity_percent", "source" => "solar").set(r.solar_humidity().as_f64());
    gauge!("rnts_pressure_hpa", "source" => "boiler").set(r.boiler_pressure().as_f64());
}

#[cfg(test)]
mod tests {
    use super::*;
    use frame_decoder::Counters;
    use metrics_exporter_prometheus::PrometheusBuilder;
    use pulse_protocol::DecodedReading;

    fn render(status: &Status) -> String {
        let recorder = PrometheusBuilder::new().build_recorder();
        let handle = recorder.handle();
        metrics::with_local_recorder(&recorder, || record_status(status));
        handle.render()
    }

    fn counters() -> Counters {
        Counters {
            frames_total: 7,
            frames_incomplete: 2,
            checksum_failures: 1,
            buffer_overruns: 3,
        }
    }

    #[test]
    fn test_counters_mirror_status() {
        let output = render(&Status {
            counters: counters(),
            ..Default::default()
        });

        assert!(output.contains("rnts_frames_total 7"));
        assert!(output.contains("rnts_frames_incomplete_total 2"));
        assert!(output.contains("rnts_checksum_failures_total 1"));
        assert!(output.contains("rnts_buffer_overruns_total 3"));
    }

    #[test]
    fn test_no_gauges_before_first_decode() {
        let output = render(&Status {
            counters: counters(),
            decoded_at_us: None,
            ..Default::default()
        });

        assert!(!output.contains("rnts_temperature_celsius"));
        assert!(!output.contains("rnts_humidity_percent"));
        assert!(!output.contains("rnts_pressure_hpa"));
    }

    #[test]
    fn test_gauges_after_decode() {
        let output = render(&Status {
            reading: DecodedReading {
                boiler_temp_raw: 215,
                solar_temp_raw: -5,
                boiler_humidity_raw: 456,
                solar_humidity_raw: 612,
                boiler_pressure_raw: 10132,
            },
            counters: counters(),
            decoded_at_us: Some(1_000),
        });

        assert!(output.contains(r#"rnts_temperature_celsius{source="boiler"} 21.5"#));
        assert!(output.contains(r#"rnts_temperature_celsius{source="solar"} -0.5"#));
        assert!(output.contains(r#"rnts_humidity_percent{source="solar"}"#));
        assert!(output.contains(r#"rnts_pressure_hpa{source="boiler"}"#));
    }
}
