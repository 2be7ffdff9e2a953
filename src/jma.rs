use reqwest::blocking::{Client, Response};
use serde::de::DeserializeOwned;
use serde::Deserialize;

use crate::error::WxError;

const USER_AGENT: &str = "jma-wx";

pub mod area {
    use super::*;
    use crate::weather::RegionEntry;

    pub const AREA_LIST_URL: &str = "http://www.jma.go.jp/bosai/common/const/area.json";

    /// Office name JMA uses for regions that are not standalone forecast offices.
    const NO_OFFICE: &str = "-";

    #[derive(Deserialize, Debug, Default)]
    pub struct AreaList {
        /// Kept as a raw map so region order follows the document.
        pub offices: serde_json::Map<String, serde_json::Value>,
    }

    #[derive(Deserialize, Debug)]
    pub struct Office {
        #[serde(rename = "officeName")]
        pub office_name: String,
    }

    impl AreaList {
        pub fn from_jma(url: &str) -> Result<Self, WxError> {
            tracing::info!(url, "fetching area list");
            get_json(url)
        }

        pub fn regions(&self) -> Result<Vec<RegionEntry>, WxError> {
            let mut entries = Vec::new();
            for (code, data) in &self.offices {
                let office = Office::deserialize(data)?;
                if office.office_name != NO_OFFICE {
                    entries.push(RegionEntry {
                        region_code: code.clone(),
                        office_name: office.office_name,
                    });
                }
            }
            Ok(entries)
        }
    }

    #[cfg(test)]
    mod tests {
        use super::*;

        #[test]
        fn test_sentinel_offices_are_skipped() {
            let list: AreaList = serde_json::from_str(
                r#"{"offices":{"130000":{"officeName":"東京都"},"140000":{"officeName":"-"}}}"#,
            )
            .unwrap();
            let regions = list.regions().unwrap();
            assert_eq!(regions.len(), 1);
            assert_eq!(regions[0].region_code, "130000");
            assert_eq!(regions[0].office_name, "東京都");
        }

        #[test]
        fn test_document_order_is_kept() {
            let list: AreaList = serde_json::from_str(
                r#"{"centers":{},"offices":{
                    "474000":{"name":"石垣島地方","officeName":"石垣島地方気象台"},
                    "011000":{"name":"宗谷地方","officeName":"稚内地方気象台"},
                    "999999":{"officeName":"-"},
                    "130000":{"name":"東京都","officeName":"気象庁"}}}"#,
            )
            .unwrap();
            let codes: Vec<_> = list
                .regions()
                .unwrap()
                .into_iter()
                .map(|r| r.region_code)
                .collect();
            assert_eq!(codes, vec!["474000", "011000", "130000"]);
        }

        #[test]
        fn test_office_without_name_is_malformed() {
            let list: AreaList =
                serde_json::from_str(r#"{"offices":{"130000":{"name":"東京都"}}}"#).unwrap();
            assert!(matches!(list.regions(), Err(WxError::Malformed(_))));
        }
    }
}

pub mod forecast {
    use super::*;
    use crate::weather::RegionEntry;

    pub const FORECAST_BASE_URL: &str = "https://www.jma.go.jp/bosai/forecast/data/forecast/";

    /// One report per forecast horizon; JMA puts the short-range report first.
    pub type ForecastDocument = Vec<Report>;

    #[derive(Deserialize, Debug)]
    pub struct Report {
        #[serde(rename = "timeSeries")]
        pub time_series: Vec<TimeSeries>,
    }

    #[derive(Deserialize, Debug)]
    pub struct TimeSeries {
        #[serde(rename = "timeDefines")]
        pub time_defines: Vec<String>,

        pub areas: Vec<AreaForecast>,
    }

    #[derive(Deserialize, Debug)]
    pub struct AreaForecast {
        pub area: Area,

        // only the weather series carries descriptions; pops and temps leave it out
        #[serde(default)]
        pub weathers: Vec<String>,
    }

    #[derive(Deserialize, Debug)]
    pub struct Area {
        pub name: String,
    }

    pub fn forecast_url(base_url: &str, region_code: &str) -> String {
        format!("{base_url}{region_code}.json")
    }

    pub fn from_jma(
        base_url: &str,
        regions: &[RegionEntry],
        index: usize,
    ) -> Result<ForecastDocument, WxError> {
        let region = regions.get(index).ok_or(WxError::RegionIndex {
            index,
            len: regions.len(),
        })?;
        let url = forecast_url(base_url, &region.region_code);
        tracing::info!(region = %region.region_code, "fetching weather data");
        get_json(&url)
    }

}

pub(crate) fn get_json<T: DeserializeOwned>(url: &str) -> Result<T, WxError> {
    get_json_with_query(url, &[])
}

/// GETs `url` with `query` appended as encoded parameters. Errors name only
/// `url`, so query values like API keys stay out of logs.
pub(crate) fn get_json_with_query<T: DeserializeOwned>(
    url: &str,
    query: &[(&str, &str)],
) -> Result<T, WxError> {
    let response = get_web_json(url, query)?;
    let status = response.status();
    if !status.is_success() {
        tracing::warn!(url, %status, "request failed");
        return Err(WxError::Status {
            url: url.to_string(),
            status,
        });
    }
    let body = response.text()?;
    Ok(serde_json::from_str(&body)?)
}

fn get_web_json(url: &str, query: &[(&str, &str)]) -> Result<Response, reqwest::Error> {
    let client = Client::builder().user_agent(USER_AGENT).build()?;
    client.get(url).query(query).send()
}

#[cfg(test)]
mod tests {
    use super::area::AreaList;
    use super::forecast;
    use super::*;
    use crate::weather::RegionEntry;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    #[tokio::test(flavor = "multi_thread")]
    async fn test_area_list_over_http() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/area.json"))
            .respond_with(ResponseTemplate::new(200).set_body_raw(
                r#"{"offices":{"130000":{"officeName":"気象庁"},"140000":{"officeName":"-"}}}"#,
                "application/json",
            ))
            .mount(&server)
            .await;

        let url = format!("{}/area.json", server.uri());
        let list = tokio::task::spawn_blocking(move || AreaList::from_jma(&url))
            .await
            .unwrap()
            .unwrap();
        assert_eq!(list.regions().unwrap().len(), 1);
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn test_status_failure_is_reported() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(503))
            .mount(&server)
            .await;

        let url = format!("{}/area.json", server.uri());
        let err = tokio::task::spawn_blocking(move || AreaList::from_jma(&url))
            .await
            .unwrap()
            .unwrap_err();
        assert!(matches!(err, WxError::Status { status, .. } if status.as_u16() == 503));
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn test_forecast_fetched_by_region_code() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/forecast/130000.json"))
            .respond_with(ResponseTemplate::new(200).set_body_raw(
                r#"[{"timeSeries":[{"timeDefines":["2023-10-01T00:00:00+09:00"],
                    "areas":[{"area":{"name":"東京地方"},"weathers":["晴れ"]}]}]}]"#,
                "application/json",
            ))
            .mount(&server)
            .await;

        let base = format!("{}/forecast/", server.uri());
        let regions = vec![
            RegionEntry {
                region_code: "016000".to_string(),
                office_name: "札幌管区気象台".to_string(),
            },
            RegionEntry {
                region_code: "130000".to_string(),
                office_name: "気象庁".to_string(),
            },
        ];
        let doc = tokio::task::spawn_blocking(move || forecast::from_jma(&base, &regions, 1))
            .await
            .unwrap()
            .unwrap();
        assert_eq!(doc[0].time_series[0].areas[0].area.name, "東京地方");
    }
}
