//! Natural-language outbreak narratives from a generative model.
//!
//! The model is optional and untrusted: any failure (no key, timeout, HTTP
//! error, unparseable reply) resolves to [`Narrative::fallback`] so the
//! dashboard keeps working.

use std::sync::Arc;
use std::time::Duration;

use ai_client::{json_payload, preview, Message, TextGenerator};
use sentinel_common::{DiseaseData, SignalSet};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

const SYSTEM_PROMPT: &str = "You are a public health analyst for Sentinel City. \
You read ward-level surveillance numbers and answer with JSON only.";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Narrative {
    pub prediction: String,
    pub prevention: Vec<String>,
    pub risk: String,
}

impl Narrative {
    pub fn fallback() -> Self {
        Self {
            prediction: "Unable to analyze real-time data.".to_string(),
            prevention: vec![
                "Maintain general hygiene".to_string(),
                "Contact local health authorities".to_string(),
            ],
            risk: "Unknown".to_string(),
        }
    }
}

pub struct Narrator {
    generator: Option<Arc<dyn TextGenerator>>,
    timeout: Duration,
}

impl Narrator {
    pub fn new(generator: Arc<dyn TextGenerator>, timeout: Duration) -> Self {
        Self {
            generator: Some(generator),
            timeout,
        }
    }

    /// A narrator with no model behind it; always answers with the fallback.
    pub fn disabled() -> Self {
        Self {
            generator: None,
            timeout: Duration::ZERO,
        }
    }

    pub fn is_enabled(&self) -> bool {
        self.generator.is_some()
    }

    pub async fn predict(
        &self,
        ward_name: &str,
        signals: &SignalSet,
        disease_data: &DiseaseData,
    ) -> Narrative {
        let Some(generator) = &self.generator else {
            debug!(ward = %ward_name, "No AI model configured, using fallback narrative");
            return Narrative::fallback();
        };

        let messages = vec![
            Message::system(SYSTEM_PROMPT),
            Message::user(build_prompt(ward_name, signals, disease_data)),
        ];

        let reply = match tokio::time::timeout(self.timeout, generator.generate(messages)).await {
            Ok(Ok(reply)) => reply,
            Ok(Err(e)) => {
                warn!(
                    ward = %ward_name,
                    error = %e,
                    transient = e.is_transient(),
                    "AI narrative request failed"
                );
                return Narrative::fallback();
            }
            Err(_) => {
                warn!(
                    ward = %ward_name,
                    timeout_ms = self.timeout.as_millis() as u64,
                    "AI narrative timed out"
                );
                return Narrative::fallback();
            }
        };

        match parse_narrative(&reply) {
            Ok(narrative) => {
                info!(ward = %ward_name, risk = %narrative.risk, "AI narrative generated");
                narrative
            }
            Err(e) => {
                warn!(
                    ward = %ward_name,
                    error = %e,
                    reply = %preview(&reply, 200),
                    "AI narrative was not valid JSON"
                );
                Narrative::fallback()
            }
        }
    }
}

pub fn build_prompt(ward_name: &str, signals: &SignalSet, disease_data: &DiseaseData) -> String {
    let signals_json = serde_json::to_string(signals).unwrap_or_else(|_| "{}".to_string());
    let diseases_json = serde_json::to_string(disease_data).unwrap_or_else(|_| "{}".to_string());

    format!(
        "Current data for {ward_name}:\n\
         - Environmental signals: {signals_json}\n\
         - Clinical disease reports: {diseases_json}\n\
         \n\
         1. Judge whether these numbers suggest an outbreak (for example Nipah, Dengue or Flu).\n\
         2. Give a short 'prediction' of what is happening.\n\
         3. Give exactly 3 'prevention' steps for citizens.\n\
         4. Assign a 'risk' level: High, Medium or Low.\n\
         \n\
         Respond with JSON only, in this shape:\n\
         {{ \"prediction\": \"string\", \"prevention\": [\"step1\", \"step2\", \"step3\"], \"risk\": \"string\" }}"
    )
}

fn parse_narrative(reply: &str) -> Result<Narrative, serde_json::Error> {
    serde_json::from_str(json_payload(reply))
}
