//! State holder driving a weather view: real data, simulated overlay, loading and
//! error flags, plus day/night theme notifications.

use std::fmt;

use crate::{
    WeatherError,
    model::NormalizedWeather,
    service::WeatherService,
    simulation::{Scenario, apply_scenario},
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Theme {
    Light,
    Dark,
}

impl Theme {
    pub fn for_day(is_day: bool) -> Self {
        if is_day { Theme::Light } else { Theme::Dark }
    }
}

/// Theme to switch to when the displayed weather goes from `previous` to `next`.
///
/// Returns `None` when nothing is displayed or the day/night flag is unchanged.
pub fn theme_transition(
    previous: Option<&NormalizedWeather>,
    next: Option<&NormalizedWeather>,
) -> Option<Theme> {
    let next = next?;
    match previous {
        Some(prev) if prev.current.is_day == next.current.is_day => None,
        _ => Some(Theme::for_day(next.current.is_day)),
    }
}

type ThemeListener = Box<dyn FnMut(Theme) + Send>;

pub struct WeatherSession {
    service: WeatherService,
    real: Option<NormalizedWeather>,
    displayed: Option<NormalizedWeather>,
    scenario: Option<Scenario>,
    loading: bool,
    error: Option<String>,
    on_theme_change: Option<ThemeListener>,
}

impl fmt::Debug for WeatherSession {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("WeatherSession")
            .field("service", &self.service)
            .field("real", &self.real)
            .field("displayed", &self.displayed)
            .field("scenario", &self.scenario)
            .field("loading", &self.loading)
            .field("error", &self.error)
            .finish_non_exhaustive()
    }
}

/// Clears the loading flag when dropped, including when the awaiting future is cancelled.
pub(crate) struct LoadingGuard<'a>(&'a mut bool);

impl<'a> LoadingGuard<'a> {
    pub(crate) fn start(flag: &'a mut bool) -> Self {
        *flag = true;
        Self(flag)
    }
}

impl Drop for LoadingGuard<'_> {
    fn drop(&mut self) {
        *self.0 = false;
    }
}

impl WeatherSession {
    pub fn new(service: WeatherService) -> Self {
        Self {
            service,
            real: None,
            displayed: None,
            scenario: None,
            loading: false,
            error: None,
            on_theme_change: None,
        }
    }

    /// Register the callback invoked when the displayed weather flips between day and night.
    pub fn on_theme_change(mut self, listener: impl FnMut(Theme) + Send + 'static) -> Self {
        self.on_theme_change = Some(Box::new(listener));
        self
    }

    pub fn service(&self) -> &WeatherService {
        &self.service
    }

    /// What presentation should render: the overlay while simulating, otherwise the real data.
    pub fn weather(&self) -> Option<&NormalizedWeather> {
        self.displayed.as_ref()
    }

    pub fn real_weather(&self) -> Option<&NormalizedWeather> {
        self.real.as_ref()
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn is_simulating(&self) -> bool {
        self.scenario.is_some()
    }

    pub async fn fetch_weather(&mut self, lat: f64, lon: f64) -> Result<(), WeatherError> {
        self.error = None;

        let guard = LoadingGuard::start(&mut self.loading);
        let result = self.service.get_weather(lat, lon).await;
        drop(guard);

        match result {
            Ok(weather) => {
                self.real = Some(weather);
                let next = match &self.scenario {
                    Some(scenario) => apply_scenario(self.real.as_ref(), Some(scenario)),
                    None => self.real.clone(),
                };
                self.display(next);
                Ok(())
            }
            Err(err) => {
                tracing::error!(lat, lon, error = %err, "weather fetch failed");
                self.error = Some(err.user_message().to_string());
                Err(err)
            }
        }
    }

    /// Start, change or (with `None`) stop the simulated overlay.
    pub fn simulate(&mut self, scenario: Option<Scenario>) {
        match scenario {
            None => {
                self.scenario = None;
                if self.real.is_some() {
                    self.display(self.real.clone());
                }
            }
            Some(scenario) => {
                let next = apply_scenario(self.real.as_ref(), Some(&scenario));
                self.scenario = Some(scenario);
                self.display(next);
            }
        }
    }

    fn display(&mut self, next: Option<NormalizedWeather>) {
        let transition = theme_transition(self.displayed.as_ref(), next.as_ref());
        self.displayed = next;

        if let Some(theme) = transition {
            tracing::debug!(?theme, "theme changed");
            if let Some(listener) = self.on_theme_change.as_mut() {
                listener(theme);
            }
        }
    }
}
