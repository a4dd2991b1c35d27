use once_cell::sync::Lazy;
use regex::Regex;

static ORDINAL_MARKER: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[0-9]+\.\s*").expect("Invalid ordinal marker pattern"));

/// Split instruction text into ordered cooking steps
///
/// One step per non-empty line, with a leading ordinal marker such as `"3. "`
/// removed. A paragraph without line breaks comes back as a single step.
pub fn extract_steps(instructions: &str) -> Vec<String> {
    instructions
        .lines()
        .map(|line| ORDINAL_MARKER.replace(line, "").trim().to_string())
        .filter(|step| !step.is_empty())
        .collect()
}
