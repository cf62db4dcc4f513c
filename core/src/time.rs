// Licensed to the Apache Software Foundation (ASF) under one
// or more contributor license agreements.  See the NOTICE file
// distributed with this work for additional information
// regarding copyright ownership.  The ASF licenses this file
// to you under the Apache License, Version 2.0 (the
// "License"); you may not use this file except in compliance
// with the License.  You may obtain a copy of the License at
//
//   http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing,
// software distributed under the License is distributed on an
// "AS IS" BASIS, WITHOUT WARRANTIES OR CONDITIONS OF ANY
// KIND, either express or implied.  See the License for the
// specific language governing permissions and limitations
// under the License.

//! Time related utils.

use std::fmt::Debug;

use chrono::Utc;

use crate::{Error, Result};

/// DateTime is the alias for `chrono::DateTime<Utc>`.
pub type DateTime = chrono::DateTime<Utc>;

/// Create datetime of now.
pub fn now() -> DateTime {
    Utc::now()
}

/// Format time into http date: `Tue, 03 Jun 2025 14:00:00 GMT`
///
/// The same string is folded into the canonical request and sent in the
/// `Date` header.
pub fn format_http_date(t: DateTime) -> String {
    t.format("%a, %d %b %Y %H:%M:%S GMT").to_string()
}

/// Parse http date like `Tue, 03 Jun 2025 14:00:00 GMT`.
pub fn parse_http_date(s: &str) -> Result<DateTime> {
    let t = chrono::DateTime::parse_from_rfc2822(s).map_err(|e| {
        Error::unexpected(format!("parse http date {s:?} failed")).with_source(e)
    })?;
    Ok(t.with_timezone(&Utc))
}

/// TimeSource provides the instant a request is signed at.
///
/// Every signed call asks the source again, the returned time is never
/// cached between calls.
pub trait TimeSource: Debug + Send + Sync + 'static {
    /// Return the current instant in UTC.
    ///
    /// Implementations that cannot tell the time must return an error built
    /// with [`Error::clock_unavailable`], never a default value.
    fn now(&self) -> Result<DateTime>;
}

/// SystemTimeSource reads the wall clock.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemTimeSource;

impl TimeSource for SystemTimeSource {
    fn now(&self) -> Result<DateTime> {
        Ok(now())
    }
}

/// FixedTimeSource always returns the same instant.
///
/// This is useful for testing or for reproducing a signature.
#[derive(Debug, Clone, Copy)]
pub struct FixedTimeSource(
    /// The instant returned on every call.
    pub DateTime,
);

impl FixedTimeSource {
    /// Create a fixed time source from an http date string.
    pub fn from_http_date(s: &str) -> Result<Self> {
        parse_http_date(s).map(Self)
    }
}

impl TimeSource for FixedTimeSource {
    fn now(&self) -> Result<DateTime> {
        Ok(self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use pretty_assertions::assert_eq;
    use test_case::test_case;

    #[test_case(2025, 6, 3, 14, 0, 0, "Tue, 03 Jun 2025 14:00:00 GMT"; "afternoon")]
    #[test_case(2022, 8, 15, 16, 50, 12, "Mon, 15 Aug 2022 16:50:12 GMT"; "padded day")]
    #[test_case(1999, 12, 31, 23, 59, 59, "Fri, 31 Dec 1999 23:59:59 GMT"; "end of year")]
    #[test_case(2024, 2, 29, 0, 0, 1, "Thu, 29 Feb 2024 00:00:01 GMT"; "leap day")]
    fn test_format_http_date(y: i32, m: u32, d: u32, h: u32, min: u32, s: u32, expected: &str) {
        let t = Utc.with_ymd_and_hms(y, m, d, h, min, s).unwrap();
        assert_eq!(format_http_date(t), expected);
    }

    #[test]
    fn test_parse_http_date() {
        let t = parse_http_date("Tue, 03 Jun 2025 14:00:00 GMT").unwrap();
        assert_eq!(t, Utc.with_ymd_and_hms(2025, 6, 3, 14, 0, 0).unwrap());
        assert_eq!(format_http_date(t), "Tue, 03 Jun 2025 14:00:00 GMT");

        assert!(parse_http_date("2025-06-03T14:00:00Z").is_err());
    }

    #[test]
    fn test_fixed_time_source() {
        let source = FixedTimeSource::from_http_date("Tue, 03 Jun 2025 14:00:00 GMT").unwrap();
        assert_eq!(source.now().unwrap(), source.now().unwrap());
    }
}
