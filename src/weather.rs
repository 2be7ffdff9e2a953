use crate::error::WxError;
use crate::jma::forecast::ForecastDocument;

/// A forecast office the browser can switch to.
#[derive(Debug, Clone, PartialEq)]
pub struct RegionEntry {
    pub region_code: String,
    pub office_name: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ForecastDisplayEntry {
    pub area_name: String,
    pub timestamp: String,
    pub weather_description: String,
}

/// What the forecast pane shows, in display order.
#[derive(Debug, Clone, PartialEq)]
pub enum DisplayItem {
    AreaHeader(String),
    Entry(ForecastDisplayEntry),
    Unavailable,
}

/// Flattens the first time series of a forecast document into display items.
///
/// Timestamps and weather descriptions are paired by position. When the two
/// sequences differ in length the extra elements are dropped silently.
pub fn render_forecast(doc: &ForecastDocument) -> Result<Vec<DisplayItem>, WxError> {
    let Some(report) = doc.first() else {
        return Ok(vec![DisplayItem::Unavailable]);
    };
    let series = report
        .time_series
        .first()
        .ok_or_else(|| WxError::Malformed("report has no timeSeries".to_string()))?;

    let mut items = Vec::new();
    for area in &series.areas {
        items.push(DisplayItem::AreaHeader(area.area.name.clone()));
        for (time, weather) in series.time_defines.iter().zip(&area.weathers) {
            items.push(DisplayItem::Entry(ForecastDisplayEntry {
                area_name: area.area.name.clone(),
                timestamp: time.clone(),
                weather_description: weather.clone(),
            }));
        }
    }
    Ok(items)
}
