use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, NaiveDateTime, Timelike, Utc};
use reqwest::{Client, StatusCode};
use serde::{Deserialize, de::DeserializeOwned};
use std::collections::HashSet;

use crate::{
    config::{Config, DEFAULT_BASE_URL, validate_credential},
    error::WeatherError,
    model::{CurrentConditions, ForecastEntry, LocationQuery, Units, WeatherCategory},
};

use super::WeatherProvider;

const DT_TXT_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

#[derive(Debug, Clone)]
pub struct OpenWeatherProvider {
    api_key: Option<String>,
    base_url: String,
    units: Units,
    http: Client,
}

impl OpenWeatherProvider {
    pub fn new(api_key: Option<String>, units: Units) -> Self {
        Self {
            api_key,
            base_url: DEFAULT_BASE_URL.to_string(),
            units,
            http: Client::new(),
        }
    }

    pub fn from_config(config: &Config) -> Self {
        Self::new(config.api_key.clone(), config.units).with_base_url(config.base_url())
    }

    /// Point the provider at another endpoint root (mock servers, proxies).
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }

    /// GET `{base_url}/{endpoint}` and decode the body into `T`.
    async fn get_json<T: DeserializeOwned>(
        &self,
        endpoint: &str,
        query: &LocationQuery,
    ) -> Result<T, WeatherError> {
        let api_key = validate_credential(self.api_key.as_deref())?;
        let url = format!("{}/{endpoint}", self.base_url);

        let mut params = query.query_params();
        params.push(("appid", api_key.to_string()));
        params.push(("units", self.units.as_str().to_string()));

        tracing::debug!(%url, %query, units = %self.units, "requesting OpenWeather");

        let res = self.http.get(&url).query(&params).send().await?;

        let status = res.status();
        let body = res.text().await?;

        if !status.is_success() {
            tracing::debug!(%url, %status, "OpenWeather request failed");
            return Err(WeatherError::from_status(status, &body));
        }

        serde_json::from_str(&body).map_err(|e| WeatherError::malformed(status, e))
    }
}

#[derive(Debug, Deserialize)]
struct OwMain {
    temp: f64,
    feels_like: f64,
    humidity: u8,
    pressure: u32,
}

#[derive(Debug, Deserialize)]
struct OwWeather {
    main: String,
    description: String,
    icon: String,
}

#[derive(Debug, Deserialize)]
struct OwWind {
    speed: f64,
}

#[derive(Debug, Deserialize)]
struct OwSys {
    country: String,
}

#[derive(Debug, Deserialize)]
struct OwCurrentResponse {
    name: String,
    sys: OwSys,
    main: OwMain,
    weather: Vec<OwWeather>,
    wind: OwWind,
    /// meters
    visibility: f64,
}

#[derive(Debug, Deserialize)]
struct OwForecastMain {
    temp: f64,
}

#[derive(Debug, Deserialize)]
struct OwForecastEntry {
    dt: i64,
    main: OwForecastMain,
    weather: Vec<OwWeather>,
    dt_txt: String,
}

#[derive(Debug, Deserialize)]
struct OwForecastResponse {
    list: Vec<OwForecastEntry>,
}

impl TryFrom<OwCurrentResponse> for CurrentConditions {
    type Error = WeatherError;

    fn try_from(parsed: OwCurrentResponse) -> Result<Self, Self::Error> {
        let weather = parsed
            .weather
            .into_iter()
            .next()
            .ok_or_else(|| WeatherError::malformed(StatusCode::OK, "empty `weather` array"))?;

        Ok(CurrentConditions {
            city: parsed.name,
            country: parsed.sys.country,
            temperature: parsed.main.temp.round() as i32,
            feels_like: parsed.main.feels_like.round() as i32,
            humidity_pct: parsed.main.humidity,
            wind_speed: parsed.wind.speed,
            pressure: parsed.main.pressure,
            visibility_km: parsed.visibility / 1000.0,
            category: WeatherCategory::from_tag(&weather.main),
            description: weather.description,
            icon: weather.icon,
        })
    }
}

impl TryFrom<OwForecastEntry> for ForecastEntry {
    type Error = WeatherError;

    fn try_from(entry: OwForecastEntry) -> Result<Self, Self::Error> {
        let label = parse_dt_txt(&entry.dt_txt)?;
        let timestamp = DateTime::<Utc>::from_timestamp(entry.dt, 0).ok_or_else(|| {
            WeatherError::malformed(StatusCode::OK, format!("timestamp out of range: {}", entry.dt))
        })?;
        let weather = entry.weather.into_iter().next().ok_or_else(|| {
            WeatherError::malformed(StatusCode::OK, "forecast sample without `weather`")
        })?;

        Ok(ForecastEntry {
            timestamp,
            label,
            temperature: entry.main.temp,
            category: WeatherCategory::from_tag(&weather.main),
            description: weather.description,
            icon: weather.icon,
        })
    }
}

fn parse_dt_txt(raw: &str) -> Result<NaiveDateTime, WeatherError> {
    NaiveDateTime::parse_from_str(raw, DT_TXT_FORMAT)
        .map_err(|e| WeatherError::malformed(StatusCode::OK, format!("bad dt_txt {raw:?}: {e}")))
}

fn is_midday(label: &NaiveDateTime) -> bool {
    label.hour() == 12 && label.minute() == 0 && label.second() == 0
}

/// Reduce 3-hourly samples to the 12:00 sample of each day, in provider order.
fn daily_midday(list: Vec<OwForecastEntry>) -> Result<Vec<ForecastEntry>, WeatherError> {
    let mut seen: HashSet<NaiveDate> = HashSet::new();
    let mut days = Vec::new();

    for sample in list {
        let label = parse_dt_txt(&sample.dt_txt)?;
        if !is_midday(&label) || !seen.insert(label.date()) {
            continue;
        }
        days.push(ForecastEntry::try_from(sample)?);
    }

    Ok(days)
}

#[async_trait]
impl WeatherProvider for OpenWeatherProvider {
    fn check_credential(&self) -> Result<(), WeatherError> {
        validate_credential(self.api_key.as_deref()).map(|_| ())
    }

    async fn current(&self, query: &LocationQuery) -> Result<CurrentConditions, WeatherError> {
        let parsed: OwCurrentResponse = self.get_json("weather", query).await?;
        CurrentConditions::try_from(parsed)
    }

    async fn forecast(&self, query: &LocationQuery) -> Result<Vec<ForecastEntry>, WeatherError> {
        let parsed: OwForecastResponse = self.get_json("forecast", query).await?;
        daily_midday(parsed.list)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn current_json() -> serde_json::Value {
        json!({
            "name": "Paris",
            "sys": { "country": "FR" },
            "main": { "temp": 21.6, "feels_like": 20.4, "humidity": 64, "pressure": 1012 },
            "weather": [{ "main": "Clouds", "description": "broken clouds", "icon": "04d" }],
            "wind": { "speed": 4.1 },
            "visibility": 8000
        })
    }

    fn forecast_sample(day: u32, hour: u32) -> serde_json::Value {
        let label = format!("2026-10-{day:02} {hour:02}:00:00");
        let dt = NaiveDateTime::parse_from_str(&label, DT_TXT_FORMAT)
            .unwrap()
            .and_utc()
            .timestamp();
        json!({
            "dt": dt,
            "main": { "temp": f64::from(day) + f64::from(hour) / 100.0 },
            "weather": [{ "main": "Rain", "description": "light rain", "icon": "10d" }],
            "dt_txt": label
        })
    }

    #[test]
    fn current_conditions_are_normalized() {
        let parsed: OwCurrentResponse = serde_json::from_value(current_json()).unwrap();
        let current = CurrentConditions::try_from(parsed).unwrap();

        assert_eq!(current.city, "Paris");
        assert_eq!(current.country, "FR");
        assert_eq!(current.temperature, 22);
        assert_eq!(current.feels_like, 20);
        assert_eq!(current.visibility_km, 8.0);
        assert_eq!(current.pressure, 1012);
        assert_eq!(current.category, WeatherCategory::Clouds);
        assert_eq!(current.description, "broken clouds");
        assert_eq!(current.icon_url(), "https://openweathermap.org/img/wn/04d@2x.png");
    }

    #[test]
    fn missing_required_field_fails_to_parse() {
        let mut value = current_json();
        value.as_object_mut().unwrap().remove("main");
        assert!(serde_json::from_value::<OwCurrentResponse>(value).is_err());
    }

    #[test]
    fn empty_weather_array_is_a_provider_error() {
        let mut value = current_json();
        value["weather"] = json!([]);
        let parsed: OwCurrentResponse = serde_json::from_value(value).unwrap();

        let err = CurrentConditions::try_from(parsed).unwrap_err();
        assert!(matches!(err, WeatherError::ProviderError { status: 200, .. }));
    }

    #[test]
    fn forecast_keeps_one_midday_sample_per_day() {
        let mut samples = Vec::new();
        for day in 18..24 {
            for hour in (0..24).step_by(3) {
                samples.push(forecast_sample(day, hour));
            }
        }
        let parsed: OwForecastResponse =
            serde_json::from_value(json!({ "list": samples })).unwrap();

        let days = daily_midday(parsed.list).unwrap();

        assert_eq!(days.len(), 6);
        for (entry, day) in days.iter().zip(18..24) {
            assert!(is_midday(&entry.label));
            assert_eq!(entry.label.format("%d").to_string(), format!("{day}"));
            assert_eq!(entry.temperature, f64::from(day) + 0.12);
            assert_eq!(entry.category, WeatherCategory::Rain);
        }
    }

    #[test]
    fn duplicate_midday_samples_collapse() {
        let samples = vec![forecast_sample(18, 12), forecast_sample(18, 12), forecast_sample(19, 9)];
        let parsed: OwForecastResponse =
            serde_json::from_value(json!({ "list": samples })).unwrap();

        let days = daily_midday(parsed.list).unwrap();
        assert_eq!(days.len(), 1);
    }

    #[test]
    fn malformed_dt_txt_is_a_provider_error() {
        let mut sample = forecast_sample(18, 12);
        sample["dt_txt"] = json!("yesterday at noon");
        let parsed: OwForecastResponse =
            serde_json::from_value(json!({ "list": [sample] })).unwrap();

        assert!(matches!(
            daily_midday(parsed.list),
            Err(WeatherError::ProviderError { .. })
        ));
    }

    #[test]
    fn base_url_trailing_slash_is_trimmed() {
        let provider = OpenWeatherProvider::new(None, Units::Metric).with_base_url("http://x/");
        assert_eq!(provider.base_url, "http://x");
    }

    #[test]
    fn placeholder_key_fails_credential_check() {
        let provider = OpenWeatherProvider::new(Some("your_api_key_here".into()), Units::Metric);
        assert!(matches!(
            provider.check_credential(),
            Err(WeatherError::MisconfiguredCredential)
        ));
    }
}
