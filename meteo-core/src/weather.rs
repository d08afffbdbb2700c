use serde::Deserialize;

use crate::error::Error;
use crate::model::CurrentWeather;
use crate::transport::Transport;

/// Open-Meteo forecast endpoint.
pub const FORECAST_URL: &str = "https://api.open-meteo.com/v1/forecast";

/// Translates a coordinate pair into a current-conditions [`CurrentWeather`].
#[derive(Debug, Clone)]
pub struct WeatherReader {
    endpoint: String,
    transport: Transport,
}

impl WeatherReader {
    pub fn new(transport: Transport) -> Self {
        Self::with_endpoint(FORECAST_URL, transport)
    }

    pub fn with_endpoint(endpoint: impl Into<String>, transport: Transport) -> Self {
        Self { endpoint: endpoint.into(), transport }
    }

    /// Fetch the current conditions at a coordinate pair.
    ///
    /// Callers pass latitude in [-90, 90] and longitude in [-180, 180];
    /// out-of-range values are forwarded as-is and rejected upstream.
    ///
    /// The provider resolves the local timezone from the coordinates
    /// (`timezone=auto`), so the observation time comes back in that local
    /// zone and is passed through without renormalization. A payload with
    /// no `current_weather` block yields an all-absent reading rather than
    /// an error: the forecast document can be valid while a current
    /// snapshot is simply unavailable.
    pub async fn read(&self, latitude: f64, longitude: f64) -> Result<CurrentWeather, Error> {
        let params: Vec<(&str, String)> = vec![
            ("latitude", latitude.to_string()),
            ("longitude", longitude.to_string()),
            ("current_weather", "true".to_string()),
            ("timezone", "auto".to_string()),
        ];

        let url = Transport::request_url(&self.endpoint, &params)?;
        let url_str = url.to_string();
        let body = self.transport.execute(url).await?;

        let parsed: ForecastResponse =
            serde_json::from_str(&body).map_err(|err| Error::InvalidResponse {
                message: format!("forecast payload rejected: {err}"),
                url: url_str,
            })?;

        Ok(parsed
            .current_weather
            .map(|current| CurrentWeather {
                temperature_c: current.temperature,
                wind_speed_kmh: current.windspeed,
                observation_time: current.time,
                weather_code: current.weathercode,
            })
            .unwrap_or_default())
    }
}

#[derive(Debug, Deserialize)]
struct ForecastResponse {
    current_weather: Option<CurrentWeatherPayload>,
}

/// Each field is independently optional: one missing value must not blank
/// the others.
#[derive(Debug, Deserialize)]
struct CurrentWeatherPayload {
    temperature: Option<f64>,
    windspeed: Option<f64>,
    time: Option<String>,
    weathercode: Option<u32>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{fast_policy, ScriptedFetch};
    use crate::transport::{HttpFetch, RawResponse};
    use std::sync::Arc;

    const ENDPOINT: &str = "https://example.test/v1/forecast";

    fn reader(fetch: &Arc<ScriptedFetch>) -> WeatherReader {
        let transport =
            Transport::with_fetch(Arc::clone(fetch) as Arc<dyn HttpFetch>).with_policy(fast_policy());
        WeatherReader::with_endpoint(ENDPOINT, transport)
    }

    #[tokio::test]
    async fn full_current_weather_block_is_projected() {
        let fetch = Arc::new(ScriptedFetch::ok(
            r#"{"current_weather": {"temperature": 17.3, "windspeed": 11.2,
                "time": "2024-05-01T14:00", "weathercode": 3}}"#,
        ));

        let weather = reader(&fetch).read(48.85, 2.35).await.expect("should read");

        assert_eq!(weather.temperature_c, Some(17.3));
        assert_eq!(weather.wind_speed_kmh, Some(11.2));
        assert_eq!(weather.observation_time.as_deref(), Some("2024-05-01T14:00"));
        assert_eq!(weather.weather_code, Some(3));
    }

    #[tokio::test]
    async fn missing_current_weather_block_yields_empty_reading_not_error() {
        let fetch = Arc::new(ScriptedFetch::ok(r#"{"latitude": 48.85, "longitude": 2.35}"#));

        let weather = reader(&fetch).read(48.85, 2.35).await.expect("should not fail");

        assert_eq!(weather, CurrentWeather::default());
    }

    #[tokio::test]
    async fn fields_are_extracted_independently() {
        let fetch = Arc::new(ScriptedFetch::ok(r#"{"current_weather": {"temperature": -4.0}}"#));

        let weather = reader(&fetch).read(64.13, -21.9).await.expect("should read");

        assert_eq!(weather.temperature_c, Some(-4.0));
        assert_eq!(weather.wind_speed_kmh, None);
        assert_eq!(weather.observation_time, None);
        assert_eq!(weather.weather_code, None);
    }

    #[tokio::test]
    async fn unparseable_body_is_invalid_response() {
        let fetch = Arc::new(ScriptedFetch::ok("not json"));

        let err = reader(&fetch).read(48.85, 2.35).await.expect_err("must fail");

        assert!(matches!(err, Error::InvalidResponse { .. }));
    }

    #[tokio::test]
    async fn query_pins_current_weather_and_auto_timezone() {
        let fetch = Arc::new(ScriptedFetch::ok("{}"));

        let _ = reader(&fetch).read(48.85, 2.35).await;

        let url = fetch.seen_urls().pop().expect("one request");
        assert!(url.contains("latitude=48.85"));
        assert!(url.contains("longitude=2.35"));
        assert!(url.contains("current_weather=true"));
        assert!(url.contains("timezone=auto"));
    }

    #[tokio::test]
    async fn hard_404_fails_immediately_with_status() {
        let fetch = Arc::new(ScriptedFetch::replies(vec![Ok(RawResponse {
            status: 404,
            body: String::new(),
        })]));

        let err = reader(&fetch).read(48.85, 2.35).await.expect_err("must fail");

        assert_eq!(err.status_code(), Some(404));
        assert_eq!(fetch.attempts(), 1);
    }
}
