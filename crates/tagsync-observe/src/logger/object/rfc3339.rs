use std::fmt;

use time::{OffsetDateTime, format_description::well_known::Rfc3339};
use tracing_subscriber::fmt::{format::Writer, time::FormatTime};

/// RFC3339 timestamps in UTC.
#[derive(Debug, Clone, Copy, Default)]
pub struct UtcRfc3339;

impl FormatTime for UtcRfc3339 {
    fn format_time(&self, w: &mut Writer<'_>) -> fmt::Result {
        match OffsetDateTime::now_utc().format(&Rfc3339) {
            Ok(ts) => write!(w, "{ts} "),
            Err(_) => write!(w, "<invalid-time> "),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn writes_utc_timestamp() {
        let mut buf = String::new();
        UtcRfc3339.format_time(&mut Writer::new(&mut buf)).unwrap();

        let ts = buf.trim_end();
        assert!(ts.ends_with('Z'), "expected UTC suffix in {ts:?}");
        assert!(OffsetDateTime::parse(ts, &Rfc3339).is_ok(), "not RFC3339: {ts:?}");
    }
}
