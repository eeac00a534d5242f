//! Provides a mock data provider for generating plausible air quality readings.
//!
//! Used by `--offline` runs, where no backend is reachable, so every screen can still be
//! exercised end to end. Values are randomised around a per-city pollution factor.

use super::AirQualityApi;
use crate::error::{AppError, Result};
use crate::models::{
    category_label, AirQualityReading, AqiLevel, Components, Coordinates, CurrentAirQuality,
    Pollutant, PredictionData, PredictionPoint, PredictionResponse, TrendPoint,
};
use async_trait::async_trait;
use chrono::{DateTime, Duration, DurationRound, Utc};
use rand::{thread_rng, Rng};
use tracing::debug;

/// Longest span, in days, the provider generates history or predictions for.
const MAX_MOCK_DAYS: u32 = 366;

/// Caps a requested span to [`MAX_MOCK_DAYS`].
fn generated_days(days: u32) -> u32 {
    if days > MAX_MOCK_DAYS {
        debug!(
            "Requested {} days of mock data; generating {} instead",
            days, MAX_MOCK_DAYS
        );
    }
    days.min(MAX_MOCK_DAYS)
}

/// A city known to the mock provider: name, coordinates and relative pollution factor.
struct MockCity {
    name: &'static str,
    lat: f64,
    lon: f64,
    factor: f64,
}

static MOCK_CITIES: [MockCity; 9] = [
    MockCity { name: "New York", lat: 40.7128, lon: -74.0060, factor: 0.9 },
    MockCity { name: "London", lat: 51.5074, lon: -0.1278, factor: 0.8 },
    MockCity { name: "Tokyo", lat: 35.6762, lon: 139.6503, factor: 0.9 },
    MockCity { name: "Paris", lat: 48.8566, lon: 2.3522, factor: 0.9 },
    MockCity { name: "Berlin", lat: 52.5200, lon: 13.4050, factor: 0.8 },
    MockCity { name: "Sydney", lat: -33.8688, lon: 151.2093, factor: 0.6 },
    MockCity { name: "Colombo", lat: 6.9271, lon: 79.8612, factor: 1.2 },
    MockCity { name: "Delhi", lat: 28.7041, lon: 77.1025, factor: 2.6 },
    MockCity { name: "Beijing", lat: 39.9042, lon: 116.4074, factor: 2.0 },
];

/// Generates mock air quality data for a fixed list of cities.
#[derive(Debug, Default, Clone)]
pub struct MockDataProvider;

impl MockDataProvider {
    /// Creates a new `MockDataProvider`.
    pub fn new() -> Self {
        debug!("Creating MockDataProvider");
        Self
    }

    fn lookup(city: &str) -> Result<&'static MockCity> {
        let wanted = city.trim();
        MOCK_CITIES
            .iter()
            .find(|c| c.name.eq_ignore_ascii_case(wanted))
            .ok_or_else(|| {
                debug!("Mock data requested for unsupported city: {}", city);
                AppError::NotFound(wanted.to_string())
            })
    }

    /// Generates one reading for `city` at `timestamp`.
    fn generate_reading(
        &self,
        city: &MockCity,
        timestamp: DateTime<Utc>,
        rng: &mut impl Rng,
    ) -> AirQualityReading {
        let components: Components = Pollutant::ALL
            .iter()
            .map(|p| (*p, self.generate_mock_value(city, *p, rng)))
            .collect();
        // Index is driven by PM2.5, the dominant pollutant for most cities.
        let pm25 = components.get(Pollutant::Pm25).unwrap_or(0.0);
        let aqi = (pm25 * 2.4 + rng.gen_range(-5.0_f64..5.0)).clamp(0.0, 500.0).round();

        AirQualityReading {
            city: city.name.to_string(),
            timestamp,
            aqi,
            coordinates: Some(Coordinates {
                lat: Some(city.lat),
                lon: Some(city.lon),
            }),
            components,
        }
    }

    /// Generates a plausible concentration (µg/m³) for a pollutant in a city.
    fn generate_mock_value(&self, city: &MockCity, pollutant: Pollutant, rng: &mut impl Rng) -> f64 {
        let (min_base, max_base) = match pollutant {
            Pollutant::Pm25 => (5.0, 35.0),
            Pollutant::Pm10 => (10.0, 50.0),
            Pollutant::O3 => (30.0, 100.0),
            Pollutant::No2 => (10.0, 60.0),
            Pollutant::So2 => (2.0, 20.0),
            Pollutant::Co => (200.0, 1200.0),
        };
        let adjusted_min = (min_base * city.factor).max(0.0);
        let adjusted_max = (max_base * city.factor).max(adjusted_min + 1.0);
        let value: f64 = rng.gen_range(adjusted_min..adjusted_max);
        (value * 100.0).round() / 100.0
    }
}

/// 1–5 category matching an index value, the inverse of `category_to_index`.
fn index_to_category(aqi: f64) -> u8 {
    match AqiLevel::from_index(aqi) {
        AqiLevel::Good => 1,
        AqiLevel::Moderate => 2,
        AqiLevel::UnhealthyForSensitiveGroups => 3,
        AqiLevel::Unhealthy => 4,
        AqiLevel::VeryUnhealthy | AqiLevel::Hazardous => 5,
    }
}

#[async_trait]
impl AirQualityApi for MockDataProvider {
    async fn fetch_current(&self, city: &str) -> Result<CurrentAirQuality> {
        let known = Self::lookup(city)?;
        let mut rng = thread_rng();
        let mut reading = self.generate_reading(known, Utc::now(), &mut rng);

        // Snap the index to its category band, as the real current endpoint only reports a category.
        let category = index_to_category(reading.aqi);
        reading.aqi = crate::models::category_to_index(category);

        Ok(CurrentAirQuality {
            reading,
            category,
            meaning: Some(category_label(category).to_string()),
        })
    }

    async fn fetch_history(&self, city: &str, days: u32) -> Result<Vec<AirQualityReading>> {
        let known = Self::lookup(city)?;
        let mut rng = thread_rng();

        let now = Utc::now()
            .duration_trunc(Duration::hours(1))
            .unwrap_or_else(|_| Utc::now());
        let hours = i64::from(generated_days(days)) * 24;
        let readings: Vec<AirQualityReading> = (0..hours)
            .rev()
            .map(|ago| self.generate_reading(known, now - Duration::hours(ago), &mut rng))
            .collect();

        debug!("Generated {} mock readings for {}", readings.len(), known.name);
        Ok(readings)
    }

    async fn fetch_predictions(&self, city: &str, days: u32) -> Result<PredictionResponse> {
        let known = Self::lookup(city)?;
        let mut rng = thread_rng();
        let today = Utc::now().date_naive();
        let days = generated_days(days);

        let historical_data: Vec<TrendPoint> = (1..=i64::from(days))
            .rev()
            .map(|ago| TrendPoint {
                date: today - Duration::days(ago),
                aqi: self
                    .generate_reading(known, Utc::now() - Duration::days(ago), &mut rng)
                    .aqi,
            })
            .collect();

        let mut last = historical_data.last().map_or(50.0, |p| p.aqi);
        let predictions: Vec<PredictionPoint> = (1..=days)
            .map(|day| {
                last = (last + rng.gen_range(-15.0_f64..15.0)).clamp(0.0, 500.0).round();
                PredictionPoint {
                    day,
                    date: today + Duration::days(i64::from(day)),
                    predicted_aqi: last,
                }
            })
            .collect();

        Ok(PredictionResponse {
            success: true,
            data: Some(PredictionData {
                predictions,
                historical_data,
            }),
            message: None,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::history::{aggregate_by_day, DayZone};

    #[tokio::test]
    async fn test_mock_current_is_category_aligned() {
        let provider = MockDataProvider::new();
        let current = provider.fetch_current("delhi").await.unwrap();

        assert_eq!(current.reading.city, "Delhi");
        assert!((1..=5).contains(&current.category));
        assert_eq!(
            current.reading.aqi,
            crate::models::category_to_index(current.category)
        );
        assert!(Pollutant::ALL
            .iter()
            .all(|p| current.reading.components.get(*p).is_some()));
    }

    #[tokio::test]
    async fn test_mock_unknown_city_is_not_found() {
        let provider = MockDataProvider::new();
        let result = provider.fetch_history("Atlantis", 5).await;
        assert!(matches!(result, Err(AppError::NotFound(_))));
    }

    #[tokio::test]
    async fn test_mock_history_is_hourly_and_ordered() {
        let provider = MockDataProvider::new();
        let readings = provider.fetch_history("London", 2).await.unwrap();

        assert_eq!(readings.len(), 48);
        assert!(readings.windows(2).all(|w| w[0].timestamp < w[1].timestamp));
        assert!(readings.iter().all(|r| (0.0..=500.0).contains(&r.aqi)));

        let days = aggregate_by_day(readings, DayZone::Utc);
        assert!(days.len() == 2 || days.len() == 3);
    }

    #[tokio::test]
    async fn test_mock_predictions_cover_requested_days() {
        let provider = MockDataProvider::new();
        let data = provider
            .fetch_predictions("Tokyo", 4)
            .await
            .unwrap()
            .into_data()
            .unwrap();

        assert_eq!(data.predictions.len(), 4);
        assert_eq!(data.historical_data.len(), 4);
        let days: Vec<u32> = data.predictions.iter().map(|p| p.day).collect();
        assert_eq!(days, vec![1, 2, 3, 4]);
        assert!(data.historical_data.last().unwrap().date < data.predictions[0].date);
    }

    #[tokio::test]
    async fn test_mock_caps_very_long_spans() {
        let provider = MockDataProvider::new();

        let data = provider
            .fetch_predictions("Tokyo", 200_000_000)
            .await
            .unwrap()
            .into_data()
            .unwrap();
        assert_eq!(data.predictions.len(), MAX_MOCK_DAYS as usize);
        assert_eq!(data.historical_data.len(), MAX_MOCK_DAYS as usize);

        let readings = provider.fetch_history("Tokyo", u32::MAX).await.unwrap();
        assert_eq!(readings.len(), MAX_MOCK_DAYS as usize * 24);
    }
}
