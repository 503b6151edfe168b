use crate::types::FeatureRequest;

/// JSON shape the model is asked to fill in.
const OUTPUT_SCHEMA: &str = r#"{
  "userStories": [
    {
      "id": "US-1",
      "title": "Story title",
      "description": "As a [user], I want [goal], so that [benefit]",
      "acceptanceCriteria": ["criterion 1", "criterion 2"]
    }
  ],
  "engineeringTasks": [
    {
      "id": "TASK-1",
      "title": "Task title",
      "description": "Details",
      "category": "Frontend",
      "estimatedHours": 4,
      "acceptanceCriteria": ["criterion 1"]
    }
  ],
  "risks": [
    {
      "id": "RISK-1",
      "title": "Risk title",
      "description": "Details",
      "severity": "Medium",
      "mitigation": "How to handle"
    }
  ]
}"#;

/// Build the generation prompt for `request`.
///
/// Pure and deterministic: the same request always yields the same text.
pub fn build_prompt(request: &FeatureRequest) -> String {
    let mut prompt = String::with_capacity(OUTPUT_SCHEMA.len() + 512);

    prompt.push_str(
        "You are a product manager. Generate a project breakdown in JSON format.\n\n",
    );
    prompt.push_str("FEATURE:\n");
    prompt.push_str(&format!("Goal: {}\n", request.goal));
    prompt.push_str(&format!("Users: {}\n", request.users));
    prompt.push_str(&format!("Template: {}\n", request.template));
    if let Some(constraints) = &request.constraints {
        prompt.push_str(&format!("Constraints: {constraints}\n"));
    }
    prompt.push('\n');
    prompt.push_str(
        "Generate ONLY valid JSON with this structure. Output the raw JSON object only: \
         no markdown, no code fences, no explanation.\n",
    );
    prompt.push_str(OUTPUT_SCHEMA);
    prompt.push_str("\n\n");
    prompt.push_str(
        "Generate 3-5 user stories, 5-10 tasks (mix of Frontend, Backend, Testing, DevOps), \
         and 2-4 risks.",
    );
    prompt
}
