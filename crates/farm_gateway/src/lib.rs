//! `farm_gateway`: one best-effort reading from the NASA POWER daily point API.
//!
//! The gateway only fetches and normalizes. Substituting
//! [`ExternalReading::FALLBACK`] on failure is the caller's job.

mod error;

use std::time::Duration;

use chrono::NaiveDate;
use farm_core::{ExternalReading, GatewayDef, ReadingVariant, SiteDef};
use serde_json::{Map, Value};

pub use error::GatewayError;

pub const PARAM_PRECIPITATION: &str = "PRECTOT";
pub const PARAM_VEGETATION: &str = "NDVI";
const COMMUNITY: &str = "AG";
const FORMAT: &str = "JSON";
const DATE_FORMAT: &str = "%Y%m%d";
const USER_AGENT: &str = concat!("kilimotek/", env!("CARGO_PKG_VERSION"));

/// Where and when to sample.
#[derive(Debug, Clone, PartialEq)]
pub struct ReadingQuery {
    pub latitude: f64,
    pub longitude: f64,
    pub start: NaiveDate,
    pub end: NaiveDate,
    pub variant: ReadingVariant,
}

impl ReadingQuery {
    pub fn for_site(site: &SiteDef, variant: ReadingVariant) -> Self {
        Self {
            latitude: site.latitude,
            longitude: site.longitude,
            start: site.start,
            end: site.end,
            variant,
        }
    }

    /// Comma list sent as `parameters`.
    pub fn parameters(&self) -> &'static str {
        match self.variant {
            ReadingVariant::PrecipitationOnly => PARAM_PRECIPITATION,
            ReadingVariant::WithVegetation => "NDVI,PRECTOT",
        }
    }

    pub fn query_pairs(&self) -> Vec<(&'static str, String)> {
        vec![
            ("parameters", self.parameters().to_string()),
            ("community", COMMUNITY.to_string()),
            ("longitude", self.longitude.to_string()),
            ("latitude", self.latitude.to_string()),
            ("start", self.start.format(DATE_FORMAT).to_string()),
            ("end", self.end.format(DATE_FORMAT).to_string()),
            ("format", FORMAT.to_string()),
        ]
    }
}

/// HTTP client for the climate API. One request per call, no retry.
#[derive(Debug, Clone)]
pub struct PowerClient {
    http: reqwest::Client,
    endpoint: String,
}

impl PowerClient {
    pub fn new(
        endpoint: impl Into<String>,
        timeout: Option<Duration>,
    ) -> Result<Self, GatewayError> {
        let mut builder = reqwest::Client::builder().user_agent(USER_AGENT);
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }
        Ok(Self {
            http: builder.build()?,
            endpoint: endpoint.into(),
        })
    }

    pub fn from_def(def: &GatewayDef) -> Result<Self, GatewayError> {
        Self::new(def.endpoint.clone(), def.timeout_secs.map(Duration::from_secs))
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    pub async fn fetch_reading(
        &self,
        query: &ReadingQuery,
    ) -> Result<ExternalReading, GatewayError> {
        tracing::debug!(
            endpoint = %self.endpoint,
            parameters = query.parameters(),
            start = %query.start,
            end = %query.end,
            "requesting climate reading"
        );
        let response = self
            .http
            .get(&self.endpoint)
            .query(&query.query_pairs())
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(GatewayError::Api {
                status: status.as_u16(),
            });
        }

        let body = response.bytes().await?;
        let reading = parse_reading(&body, query.variant)?;
        tracing::info!(
            precipitation = reading.precipitation,
            vegetation_index = ?reading.vegetation_index,
            "climate reading received"
        );
        Ok(reading)
    }
}

/// Extracts a reading from a POWER response body.
///
/// The value is taken from the *first key* of the date mapping in the order
/// the response lists them. Nothing sorts the dates, so this is only the
/// earliest date if the API happens to serialize it first.
pub fn parse_reading(
    body: &[u8],
    variant: ReadingVariant,
) -> Result<ExternalReading, GatewayError> {
    let json: Value =
        serde_json::from_slice(body).map_err(|err| GatewayError::Malformed(err.to_string()))?;
    let parameters = json.pointer("/properties/parameter");

    match variant {
        ReadingVariant::PrecipitationOnly => {
            let precipitation_series = series(parameters, PARAM_PRECIPITATION)?;
            let (_, precipitation) = first_entry(precipitation_series, PARAM_PRECIPITATION)?;
            Ok(ExternalReading {
                precipitation,
                vegetation_index: None,
            })
        }
        ReadingVariant::WithVegetation => {
            let vegetation_series = series(parameters, PARAM_VEGETATION)?;
            let precipitation_series = series(parameters, PARAM_PRECIPITATION)?;
            let (date, vegetation_index) = first_entry(vegetation_series, PARAM_VEGETATION)?;
            let Some(value) = precipitation_series.get(date) else {
                return Err(GatewayError::DataMissing {
                    parameter: format!("{PARAM_PRECIPITATION} on {date}"),
                });
            };
            Ok(ExternalReading {
                precipitation: number(value, PARAM_PRECIPITATION, date)?,
                vegetation_index: Some(vegetation_index),
            })
        }
    }
}

fn series<'a>(
    parameters: Option<&'a Value>,
    parameter: &str,
) -> Result<&'a Map<String, Value>, GatewayError> {
    parameters
        .and_then(|p| p.get(parameter))
        .and_then(Value::as_object)
        .ok_or_else(|| GatewayError::DataMissing {
            parameter: parameter.to_string(),
        })
}

fn first_entry<'a>(
    series: &'a Map<String, Value>,
    parameter: &str,
) -> Result<(&'a str, f64), GatewayError> {
    let Some((date, value)) = series.iter().next() else {
        return Err(GatewayError::DataMissing {
            parameter: parameter.to_string(),
        });
    };
    Ok((date.as_str(), number(value, parameter, date)?))
}

fn number(value: &Value, parameter: &str, date: &str) -> Result<f64, GatewayError> {
    value.as_f64().ok_or_else(|| {
        GatewayError::Malformed(format!("{parameter} on {date} is not a number: {value}"))
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use farm_core::test_fixtures::base_content;

    const EPS: f64 = 1e-9;

    fn query(variant: ReadingVariant) -> ReadingQuery {
        ReadingQuery::for_site(&base_content().site, variant)
    }

    #[test]
    fn query_pairs_match_power_api() {
        let pairs = query(ReadingVariant::WithVegetation).query_pairs();
        let get = |key: &str| {
            pairs
                .iter()
                .find(|(k, _)| *k == key)
                .map(|(_, v)| v.clone())
                .unwrap()
        };
        assert_eq!(get("parameters"), "NDVI,PRECTOT");
        assert_eq!(get("community"), "AG");
        assert_eq!(get("latitude"), "-0.6167");
        assert_eq!(get("longitude"), "37.3833");
        assert_eq!(get("start"), "20240101");
        assert_eq!(get("end"), "20240110");
        assert_eq!(get("format"), "JSON");
    }

    #[test]
    fn precipitation_only_asks_for_prectot() {
        assert_eq!(query(ReadingVariant::PrecipitationOnly).parameters(), "PRECTOT");
    }

    #[test]
    fn first_key_wins_even_when_not_earliest() {
        let body = br#"{"properties":{"parameter":{
            "PRECTOT":{"20240105":7.5,"20240101":1.0}
        }}}"#;
        let reading = parse_reading(body, ReadingVariant::PrecipitationOnly).unwrap();
        assert!((reading.precipitation - 7.5).abs() < EPS);
        assert_eq!(reading.vegetation_index, None);
    }

    #[test]
    fn vegetation_variant_aligns_dates_on_ndvi() {
        let body = br#"{"properties":{"parameter":{
            "PRECTOT":{"20240101":3.0,"20240102":4.0},
            "NDVI":{"20240102":0.61,"20240101":0.55}
        }}}"#;
        let reading = parse_reading(body, ReadingVariant::WithVegetation).unwrap();
        assert!((reading.precipitation - 4.0).abs() < EPS);
        assert!((reading.vegetation_index.unwrap() - 0.61).abs() < EPS);
    }

    #[test]
    fn missing_parameter_path_is_data_missing() {
        let body = br#"{"properties":{"parameter":{"PRECTOT":{"20240101":1.0}}}}"#;
        let err = parse_reading(body, ReadingVariant::WithVegetation).unwrap_err();
        assert!(
            matches!(&err, GatewayError::DataMissing { parameter } if parameter == "NDVI"),
            "{err:?}"
        );

        let err = parse_reading(br#"{"messages":[]}"#, ReadingVariant::PrecipitationOnly)
            .unwrap_err();
        assert_eq!(err.kind(), "data_missing");
    }

    #[test]
    fn precipitation_missing_for_ndvi_date_is_data_missing() {
        let body = br#"{"properties":{"parameter":{
            "PRECTOT":{"20240102":3.0},
            "NDVI":{"20240101":0.5}
        }}}"#;
        let err = parse_reading(body, ReadingVariant::WithVegetation).unwrap_err();
        assert_eq!(err.kind(), "data_missing");
    }

    #[test]
    fn empty_series_is_data_missing() {
        let body = br#"{"properties":{"parameter":{"PRECTOT":{}}}}"#;
        let err = parse_reading(body, ReadingVariant::PrecipitationOnly).unwrap_err();
        assert_eq!(err.kind(), "data_missing");
    }

    #[test]
    fn non_json_body_is_malformed() {
        let err = parse_reading(b"<html>oops</html>", ReadingVariant::PrecipitationOnly)
            .unwrap_err();
        assert_eq!(err.kind(), "malformed");
    }

    #[test]
    fn non_numeric_value_is_malformed() {
        let body = br#"{"properties":{"parameter":{"PRECTOT":{"20240101":"n/a"}}}}"#;
        let err = parse_reading(body, ReadingVariant::PrecipitationOnly).unwrap_err();
        assert_eq!(err.kind(), "malformed");
    }
}
