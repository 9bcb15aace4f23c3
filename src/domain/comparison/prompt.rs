//! Prompt construction for neutral comparisons.
//!
//! The prompt is the only place neutrality is enforced. The normalizer checks
//! the shape of what comes back, never its stance.

use std::fmt::Write;

/// System message sent alongside every comparison prompt.
pub const SYSTEM_PROMPT: &str = "You are an impartial analyst who compares options objectively. \
You never pick a winner and you always answer with valid JSON only.";

/// Instruction forbidding an overall winner. Appears verbatim in every prompt.
pub const NO_WINNER_INSTRUCTION: &str =
    "Do NOT declare a single best or winning option. Stay neutral.";

const OUTPUT_SCHEMA: &str = r#"{
  "options": [
    {
      "name": "<option name exactly as listed>",
      "pros": ["<advantage>"],
      "cons": ["<disadvantage>"],
      "scores": { "<constraint>": "<short rating>" }
    }
  ],
  "tradeOffs": [
    { "scenario": "If you prioritize <X>", "recommendation": "consider <Y>" }
  ]
}"#;

/// Builds the comparison prompt.
///
/// Options and constraints are enumerated with 1-based ordinals in input
/// order. Empty slices produce a degenerate prompt; callers validate first.
pub fn build_prompt<S: AsRef<str>>(options: &[S], constraints: &[S]) -> String {
    let mut prompt = String::from(
        "Compare the following options against the listed constraints.\n\nOptions:\n",
    );
    push_numbered(&mut prompt, options);

    prompt.push_str("\nConstraints:\n");
    push_numbered(&mut prompt, constraints);

    prompt.push_str("\nInstructions:\n");
    prompt.push_str("- Evaluate every option against every constraint listed above.\n");
    prompt.push_str(
        "- For each option, list its pros and cons and give a short rating for each constraint.\n",
    );
    let _ = writeln!(prompt, "- {}", NO_WINNER_INSTRUCTION);
    prompt.push_str(
        "- Describe trade-offs as scenarios in the form \"If you prioritize X, consider Y\".\n",
    );

    prompt.push_str(
        "\nRespond with ONLY a JSON object in exactly this shape. \
Do not add any prose before or after it and do not wrap it in code fences:\n",
    );
    prompt.push_str(OUTPUT_SCHEMA);
    prompt.push('\n');

    prompt
}

fn push_numbered<S: AsRef<str>>(prompt: &mut String, items: &[S]) {
    for (index, item) in items.iter().enumerate() {
        let _ = writeln!(prompt, "{}. {}", index + 1, item.as_ref());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn section<'a>(prompt: &'a str, header: &str) -> Vec<&'a str> {
        prompt
            .lines()
            .skip_while(|line| *line != header)
            .skip(1)
            .take_while(|line| !line.is_empty())
            .collect()
    }

    #[test]
    fn enumerates_options_and_constraints_in_order() {
        let prompt = build_prompt(&["Postgres", "MongoDB"], &["cost", "scalability"]);

        assert_eq!(section(&prompt, "Options:"), vec!["1. Postgres", "2. MongoDB"]);
        assert_eq!(
            section(&prompt, "Constraints:"),
            vec!["1. cost", "2. scalability"]
        );
    }

    #[test]
    fn forbids_declaring_a_winner() {
        let prompt = build_prompt(&["A", "B"], &["cost"]);
        assert!(prompt.contains(NO_WINNER_INSTRUCTION));
    }

    #[test]
    fn asks_for_every_option_against_every_constraint() {
        let prompt = build_prompt(&["A", "B"], &["cost"]);
        assert!(prompt.contains("Evaluate every option against every constraint"));
    }

    #[test]
    fn requests_scenario_trade_offs() {
        let prompt = build_prompt(&["A", "B"], &["cost"]);
        assert!(prompt.contains("If you prioritize X, consider Y"));
    }

    #[test]
    fn specifies_json_only_output_schema() {
        let prompt = build_prompt(&["A", "B"], &["cost"]);

        for key in [
            "\"options\"",
            "\"name\"",
            "\"pros\"",
            "\"cons\"",
            "\"scores\"",
            "\"tradeOffs\"",
            "\"scenario\"",
            "\"recommendation\"",
        ] {
            assert!(prompt.contains(key), "missing schema key {}", key);
        }
        assert!(prompt.contains("ONLY a JSON object"));
        assert!(prompt.contains("do not wrap it in code fences"));
    }

    #[test]
    fn is_deterministic() {
        let a = build_prompt(&["A", "B"], &["cost"]);
        let b = build_prompt(&["A", "B"], &["cost"]);
        assert_eq!(a, b);
    }

    #[test]
    fn empty_input_does_not_panic() {
        let empty: [&str; 0] = [];
        let prompt = build_prompt(&empty, &empty);
        assert!(prompt.contains(NO_WINNER_INSTRUCTION));
    }

    proptest! {
        #[test]
        fn every_entry_is_listed_exactly_once_in_order(
            options in prop::collection::vec("[A-Za-z0-9][A-Za-z0-9 ]{0,12}", 1..6),
            constraints in prop::collection::vec("[A-Za-z0-9][A-Za-z0-9 ]{0,12}", 1..6),
        ) {
            let prompt = build_prompt(&options, &constraints);

            let expected_options: Vec<String> = options
                .iter()
                .enumerate()
                .map(|(i, o)| format!("{}. {}", i + 1, o))
                .collect();
            let expected_constraints: Vec<String> = constraints
                .iter()
                .enumerate()
                .map(|(i, c)| format!("{}. {}", i + 1, c))
                .collect();

            prop_assert_eq!(section(&prompt, "Options:"), expected_options);
            prop_assert_eq!(section(&prompt, "Constraints:"), expected_constraints);
            prop_assert!(prompt.contains(NO_WINNER_INSTRUCTION));
        }
    }
}
