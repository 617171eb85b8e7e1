//! Visual Crossing timeline API 客户端

use async_trait::async_trait;
use reqwest::Client;
use serde_json::Value;

use super::{read_success_body, Include, RangeSelector, WeatherSource};
use crate::config::WeatherConfig;
use crate::error::RelayError;

pub struct VisualCrossingClient {
    base_url: String,
    api_key: String,
    http: Client,
}

impl VisualCrossingClient {
    pub fn new(config: &WeatherConfig, http: Client) -> Self {
        Self {
            base_url: config.base_url.trim_end_matches('/').to_string(),
            api_key: config.api_key.clone(),
            http,
        }
    }

    /// `{base_url}/{location}/{range}`，路径段经过百分号编码
    fn timeline_url(&self, location: &str, range: &RangeSelector) -> String {
        format!(
            "{}/{}/{}",
            self.base_url,
            urlencoding::encode(location),
            urlencoding::encode(range.as_path_segment()),
        )
    }
}

#[async_trait]
impl WeatherSource for VisualCrossingClient {
    async fn fetch_forecast(
        &self,
        location: &str,
        range: &RangeSelector,
        include: Include,
    ) -> Result<Value, RelayError> {
        let url = self.timeline_url(location, range);
        tracing::debug!(%url, %include, "weather request");

        let response = self
            .http
            .get(&url)
            .query(&[
                ("unitGroup", "metric"),
                ("key", self.api_key.as_str()),
                ("include", include.as_str()),
            ])
            .send()
            .await?;

        let body = read_success_body(response, "weather").await?;

        serde_json::from_str(&body).map_err(|e| RelayError::MalformedResponse(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use http::StatusCode;
    use serde_json::json;
    use wiremock::matchers::{method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn client(server: &MockServer) -> VisualCrossingClient {
        let config = WeatherConfig {
            base_url: format!("{}/timeline/", server.uri()),
            api_key: "wx-key".into(),
        };
        VisualCrossingClient::new(&config, Client::new())
    }

    #[tokio::test]
    async fn builds_timeline_request() {
        let server = MockServer::start().await;
        let upstream = json!({ "days": [{ "datetime": "2024-05-01" }] });

        Mock::given(method("GET"))
            .and(path("/timeline/Berlin/2024-05-01"))
            .and(query_param("unitGroup", "metric"))
            .and(query_param("key", "wx-key"))
            .and(query_param("include", "hours"))
            .respond_with(ResponseTemplate::new(200).set_body_json(&upstream))
            .expect(1)
            .mount(&server)
            .await;

        let value = client(&server)
            .fetch_forecast("Berlin", &RangeSelector::Date("2024-05-01".into()), Include::Hours)
            .await
            .unwrap();

        assert_eq!(value, upstream);
    }

    #[tokio::test]
    async fn location_is_percent_encoded() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/timeline/New%20York%2C%20NY%2F..%3Fkey%3Dx/next10days"))
            .and(query_param("key", "wx-key"))
            .and(query_param("include", "days"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "days": [] })))
            .expect(1)
            .mount(&server)
            .await;

        client(&server)
            .fetch_forecast("New York, NY/..?key=x", &RangeSelector::Next10Days, Include::Days)
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn upstream_error_is_propagated_verbatim() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .respond_with(
                ResponseTemplate::new(400).set_body_string("Bad API Request:Invalid location parameter value."),
            )
            .mount(&server)
            .await;

        let err = client(&server)
            .fetch_forecast("Nowhere", &RangeSelector::Next10Days, Include::Days)
            .await
            .unwrap_err();

        match err {
            RelayError::Upstream { status, body } => {
                assert_eq!(status, StatusCode::BAD_REQUEST);
                assert_eq!(body, "Bad API Request:Invalid location parameter value.");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[tokio::test]
    async fn invalid_json_is_malformed() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_body_string("<html>oops</html>"))
            .mount(&server)
            .await;

        let err = client(&server)
            .fetch_forecast("Berlin", &RangeSelector::Next10Days, Include::Days)
            .await
            .unwrap_err();

        assert!(matches!(err, RelayError::MalformedResponse(_)));
    }
}
