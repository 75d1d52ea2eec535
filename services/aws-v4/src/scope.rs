use crate::constants::AWS4_REQUEST;
use sigv4_core::time::{format_date, format_iso8601, DateTime};
use sigv4_core::{Error, Result};

/// SigningContext captures region, service and signing time of one signing
/// operation, together with the credential scope derived from them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SigningContext {
    region: String,
    service: String,
    time: DateTime,
    scope: String,
}

impl SigningContext {
    /// Create a new signing context.
    ///
    /// Returns a `RequestInvalid` error if region or service is empty.
    pub fn new(region: &str, service: &str, time: DateTime) -> Result<Self> {
        if region.is_empty() {
            return Err(Error::request_invalid("region is required for signing"));
        }
        if service.is_empty() {
            return Err(Error::request_invalid("service is required for signing"));
        }

        // Scope: "20220313/<region>/<service>/aws4_request"
        let scope = format!("{}/{region}/{service}/{AWS4_REQUEST}", format_date(time));

        Ok(Self {
            region: region.to_string(),
            service: service.to_string(),
            time,
            scope,
        })
    }

    /// Region of this context.
    pub fn region(&self) -> &str {
        &self.region
    }

    /// Service of this context.
    pub fn service(&self) -> &str {
        &self.service
    }

    /// Signing time.
    pub fn time(&self) -> DateTime {
        self.time
    }

    /// Signing date like `20220313`.
    pub fn date(&self) -> String {
        format_date(self.time)
    }

    /// Signing timestamp like `20220313T072004Z`.
    pub fn timestamp(&self) -> String {
        format_iso8601(self.time)
    }

    /// Credential scope like `20220313/us-east-1/s3/aws4_request`.
    pub fn scope(&self) -> &str {
        &self.scope
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sigv4_core::time::parse_iso8601;
    use sigv4_core::ErrorKind;

    #[test]
    fn test_signing_context() -> anyhow::Result<()> {
        let time = parse_iso8601("20150830T123600Z")?;
        let ctx = SigningContext::new("us-east-1", "execute-api", time)?;

        assert_eq!(ctx.date(), "20150830");
        assert_eq!(ctx.timestamp(), "20150830T123600Z");
        assert_eq!(ctx.scope(), "20150830/us-east-1/execute-api/aws4_request");
        Ok(())
    }

    #[test]
    fn test_signing_context_requires_region_and_service() -> anyhow::Result<()> {
        let time = parse_iso8601("20150830T123600Z")?;

        for (region, service) in [("", "s3"), ("us-east-1", "")] {
            let err = SigningContext::new(region, service, time).expect_err("must fail");
            assert_eq!(err.kind(), ErrorKind::RequestInvalid);
        }
        Ok(())
    }
}
