//! Weather Assistant Module
//!
//! Runs one request/response cycle: validate the query, build the prompt,
//! call the text generator once, classify the reply and assemble a report.
//! Failures from the generator are returned as-is; nothing is retried.

use chrono::{DateTime, Utc};
use tracing::{debug, info, instrument};

use crate::api::{Credentials, TextGenerator};
use crate::classifier::ResponseClassifier;
use crate::models::{WeatherQuery, WeatherReport};
use crate::moon::MoonPhase;
use crate::prompt::PromptBuilder;

/// Weather assistant service
pub struct WeatherAssistant<G> {
    generator: G,
    prompt_builder: PromptBuilder,
    classifier: ResponseClassifier,
    include_moon_phase: bool,
}

impl<G: TextGenerator> WeatherAssistant<G> {
    pub fn new(generator: G) -> Self {
        Self {
            generator,
            prompt_builder: PromptBuilder::new(),
            classifier: ResponseClassifier::new(),
            include_moon_phase: false,
        }
    }

    /// Attach the moon phase for the request instant to every report
    #[must_use]
    pub fn with_moon_phase(mut self, enabled: bool) -> Self {
        self.include_moon_phase = enabled;
        self
    }

    pub fn generator(&self) -> &G {
        &self.generator
    }

    /// Answer a query.
    ///
    /// `now_utc` is the same instant as `query.requested_at` and only feeds
    /// the moon phase.
    #[instrument(skip(self, query, credentials), fields(location = %query.location, time_frame = ?query.time_frame))]
    pub async fn forecast(
        &self,
        query: WeatherQuery,
        credentials: &Credentials,
        now_utc: DateTime<Utc>,
    ) -> crate::Result<WeatherReport> {
        query.validate()?;

        let prompt = self.prompt_builder.build(&query);
        debug!("Built prompt of {} characters", prompt.as_str().len());

        info!("Requesting forecast from {}", self.generator.model());
        let generated = self.generator.generate(&prompt, credentials).await?;

        let classification = self.classifier.classify(&generated.text);
        let moon_phase = self.include_moon_phase.then(|| MoonPhase::at(now_utc));

        info!(
            "Forecast ready: condition={:?}, moon_phase={:?}",
            classification.condition, moon_phase
        );

        Ok(WeatherReport {
            location: query.location.trim().to_string(),
            time_frame: query.time_frame,
            prompt,
            text: generated.text,
            classification,
            moon_phase,
            model: self.generator.model().to_string(),
            generated_at: query.requested_at,
        })
    }
}
