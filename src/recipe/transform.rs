use super::Recipe;
use once_cell::sync::Lazy;
use regex::Regex;

static LIST_MARKER: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^-|^\*|[0-9]+\.\s").expect("Invalid list marker pattern"));

const FALLBACK_NAME: &str = "Transformed Recipe";

impl Recipe {
    /// Parse the markdown returned by the style-transfer flow
    ///
    /// The flow answers with a single document rather than structured fields,
    /// so the name, ingredient block and instruction block are recovered from
    /// headings. When nothing can be recovered the whole text becomes the
    /// instructions.
    pub fn from_transformed_text(text: &str) -> Self {
        let lines: Vec<&str> = text.split('\n').collect();

        let name = lines
            .iter()
            .find_map(|line| line.strip_prefix("Recipe Name:"))
            .or_else(|| lines.iter().find_map(|line| line.strip_prefix("# ")))
            .map(str::trim)
            .filter(|name| !name.is_empty())
            .unwrap_or(FALLBACK_NAME)
            .to_string();

        let heading = |word: &str| {
            lines
                .iter()
                .position(|line| line.to_lowercase().contains(word))
        };
        let ingredients_at = heading("ingredients");
        let instructions_at = heading("instructions");

        let ingredients: Vec<String> = match ingredients_at {
            Some(start) => {
                let end = instructions_at.unwrap_or(lines.len());
                lines
                    .get(start + 1..end)
                    .unwrap_or_default()
                    .iter()
                    .map(|line| LIST_MARKER.replace_all(line, "").trim().to_string())
                    .filter(|item| !item.is_empty())
                    .collect()
            }
            None => Vec::new(),
        };

        let body_start = match (instructions_at, ingredients_at) {
            (Some(at), _) => at + 1,
            (None, Some(at)) => at + ingredients.len() + 2,
            (None, None) => 1,
        };
        let mut instructions = lines
            .get(body_start.min(lines.len())..)
            .unwrap_or_default()
            .join("\n")
            .trim()
            .to_string();

        if ingredients.is_empty() && instructions.is_empty() {
            instructions = text.to_string();
        }

        Recipe {
            name,
            ingredients,
            instructions,
        }
    }
}
