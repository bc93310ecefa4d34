//! Narrative commentary from a generative language model.
//!
//! The model is an external text-in/text-out service: the pipeline hands it a
//! prompt built from the report sections and prints whatever comes back. No
//! analysis result depends on it.

pub mod gemini;

pub use gemini::GeminiClient;

use thiserror::Error;

use crate::domain::NarrativeKind;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum NarrativeError {
    #[error("quota exceeded; try again later")]
    Quota,
    #[error("service error: {0}")]
    Service(String),
    #[error("service returned no text")]
    EmptyResponse,
}

/// A text generation backend.
pub trait NarrativeService {
    fn generate(&self, prompt: &str) -> Result<String, NarrativeError>;
}

/// Report sections a prompt is built from.
#[derive(Debug, Clone, Copy)]
pub struct PromptSections<'a> {
    pub data: &'a str,
    pub correlations: &'a str,
    pub signals: &'a str,
}

/// Build the prompt for a given kind of commentary.
pub fn build_prompt(kind: NarrativeKind, sections: &PromptSections<'_>) -> String {
    let (role, data_heading, questions, include_correlations, include_signals) = match kind {
        NarrativeKind::Overview => (
            "You are a macroeconomic and quantitative investment strategist with 20 years of experience.",
            "Current market data",
            "1. Summary of the current macro environment (3-4 sentences)\n\
             2. Key risk factors (2-3)\n\
             3. Suggested positioning, asset by asset\n\
             4. Caveats (1-2)",
            true,
            true,
        ),
        NarrativeKind::Liquidity => (
            "You are an expert on Federal Reserve policy and system liquidity.",
            "Net liquidity data",
            "1. Current liquidity regime (expanding / contracting / neutral)\n\
             2. What it implies about the Fed's policy direction\n\
             3. Impact on bitcoin and the NASDAQ\n\
             4. Outlook for the next three months",
            true,
            false,
        ),
        NarrativeKind::Dollar => (
            "You are a foreign-exchange and global macro specialist.",
            "Dollar index versus risk assets",
            "1. Current dollar strength\n\
             2. State of the dollar-bitcoin inverse relationship\n\
             3. Reading of global capital flows\n\
             4. Suggested strategy",
            true,
            false,
        ),
        NarrativeKind::Credit => (
            "You are a credit market and risk management specialist.",
            "High-yield spread data",
            "1. Current credit market state (safe / caution / danger)\n\
             2. What the HY spread level signals\n\
             3. Implications for equities\n\
             4. Risk management recommendations",
            false,
            true,
        ),
    };

    let mut prompt = String::new();
    prompt.push_str(role);
    prompt.push_str("\n\n## ");
    prompt.push_str(data_heading);
    prompt.push('\n');
    prompt.push_str(sections.data);
    if include_correlations {
        prompt.push_str("\n## Key correlations\n");
        prompt.push_str(sections.correlations);
    }
    if include_signals {
        prompt.push_str("\n## Current signals\n");
        prompt.push_str(sections.signals);
    }
    prompt.push_str("\nPlease answer concisely:\n\n");
    prompt.push_str(questions);
    prompt.push_str("\n\nWrite like an expert, but so that a retail investor can follow.\n");
    prompt
}

/// Build the prompt for `kind` and ask `service` for commentary.
pub fn narrate(
    service: &dyn NarrativeService,
    kind: NarrativeKind,
    sections: &PromptSections<'_>,
) -> Result<String, NarrativeError> {
    let prompt = build_prompt(kind, sections);
    let text = service.generate(&prompt)?;
    if text.trim().is_empty() {
        return Err(NarrativeError::EmptyResponse);
    }
    Ok(text)
}
