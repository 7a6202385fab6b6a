use crate::observe::Observation;

const SCHEMA: &str = r#"{
  "hypotheses": [
    {
      "cause": "<snake_case_string>",
      "explanation": "<short string>",
      "confidence": <number between 0 and 1>
    }
  ],
  "assumptions": ["<string>"],
  "unknowns": ["<string>"],
  "confidence": <number between 0 and 1>
}"#;

/// Strict-contract prompt. Only derived stats and anomalies are shared, never raw records.
pub fn build(observation: &Observation) -> String {
    let stats = serde_json::to_string(&observation.stats).unwrap_or_else(|_| "{}".to_string());
    let anomalies =
        serde_json::to_string(&observation.anomalies).unwrap_or_else(|_| "[]".to_string());

    format!(
        "You are an automated incident analysis system.\n\
         \n\
         STRICT RULES:\n\
         - Return VALID JSON ONLY\n\
         - Do NOT add nested objects\n\
         - Do NOT add justification fields\n\
         - Follow the schema EXACTLY\n\
         \n\
         SCHEMA:\n\
         {SCHEMA}\n\
         \n\
         DATA:\n\
         Stats: {stats}\n\
         Anomalies: {anomalies}\n\
         \n\
         Return JSON ONLY."
    )
}
