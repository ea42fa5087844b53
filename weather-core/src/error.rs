use thiserror::Error;

/// Errors produced by weather providers.
#[derive(Debug, Error)]
pub enum WeatherError {
    #[error("Request timeout. Please try again.")]
    Timeout,

    #[error("Location not found")]
    NotFound,

    #[error("{endpoint} request failed with status {status}: {body}")]
    Http {
        endpoint: &'static str,
        status: u16,
        body: String,
    },

    #[error("Transport error: {0}")]
    Transport(#[source] reqwest::Error),

    #[error("Invalid provider response: {0}")]
    InvalidResponse(String),
}

impl WeatherError {
    /// Translate a reqwest failure, keeping timeouts distinct from other transport errors.
    pub fn from_reqwest(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            WeatherError::Timeout
        } else {
            WeatherError::Transport(err)
        }
    }

    pub fn is_timeout(&self) -> bool {
        matches!(self, WeatherError::Timeout)
    }

    /// Message suitable for showing to an end user.
    pub fn user_message(&self) -> &'static str {
        match self {
            WeatherError::NotFound => "Location not found. Please try again.",
            WeatherError::Timeout => "Request timeout. Please check your connection.",
            _ => "Failed to fetch weather data. Please try again.",
        }
    }
}
