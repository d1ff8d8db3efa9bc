use crate::model::{Difficulty, Recipe};
use crate::AnalyzerError;
use html_escape::{encode_double_quoted_attribute, encode_text};
use log::error;
use std::fmt;

/// Visual treatment of the difficulty badge
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Badge {
    Easy,
    Medium,
    Hard,
    /// Anything the service invents, including "Unknown"
    Neutral,
}

impl Badge {
    pub fn for_difficulty(difficulty: &Difficulty) -> Self {
        match difficulty {
            Difficulty::Easy => Badge::Easy,
            Difficulty::Medium => Badge::Medium,
            Difficulty::Hard => Badge::Hard,
            Difficulty::Unknown | Difficulty::Other(_) => Badge::Neutral,
        }
    }

    pub fn css_class(&self) -> &'static str {
        match self {
            Badge::Easy => "difficulty-easy",
            Badge::Medium => "difficulty-medium",
            Badge::Hard => "difficulty-hard",
            Badge::Neutral => "difficulty-default",
        }
    }

    fn marker(&self) -> &'static str {
        match self {
            Badge::Easy => "*",
            Badge::Medium => "**",
            Badge::Hard => "***",
            Badge::Neutral => "-",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct NutritionCell {
    pub label: &'static str,
    pub value: String,
}

/// Display-ready card for one recipe
#[derive(Debug, Clone, PartialEq)]
pub struct RecipeCard {
    pub title: String,
    pub cooking_time: String,
    pub servings: u32,
    pub difficulty: String,
    pub badge: Badge,
    /// Empty means the instructions section is not shown
    pub instructions: Vec<String>,
    /// Empty means the nutrition grid is not shown
    pub nutrition: Vec<NutritionCell>,
}

/// What the result list shows in place of one recipe
#[derive(Debug, Clone, PartialEq)]
pub enum Fragment {
    Card(RecipeCard),
    Error { recipe_id: String, message: String },
}

impl Fragment {
    pub fn is_error(&self) -> bool {
        matches!(self, Fragment::Error { .. })
    }

    /// HTML markup; every string that came from the service is escaped
    pub fn to_html(&self) -> String {
        match self {
            Fragment::Card(card) => card_html(card),
            Fragment::Error { recipe_id, message } => format!(
                r#"<div class="status-card error" data-recipe-id="{}">Error rendering recipe: {}</div>"#,
                encode_double_quoted_attribute(recipe_id),
                encode_text(message)
            ),
        }
    }
}

fn card_html(card: &RecipeCard) -> String {
    let mut html = String::from(r#"<div class="recipe-card">"#);
    html.push_str(&format!(
        r#"<h3 class="recipe-title">{}</h3>"#,
        encode_text(&card.title)
    ));

    html.push_str(r#"<div class="meta-info">"#);
    html.push_str(&meta_item_html("Cooking Time", &encode_text(&card.cooking_time)));
    html.push_str(&meta_item_html("Servings", &card.servings.to_string()));
    html.push_str(&meta_item_html(
        "Difficulty",
        &format!(
            r#"<span class="difficulty-badge {}">{}</span>"#,
            card.badge.css_class(),
            encode_text(&card.difficulty)
        ),
    ));
    html.push_str("</div>");

    if !card.instructions.is_empty() {
        html.push_str(r#"<h4>Instructions</h4><ol class="instructions">"#);
        for step in &card.instructions {
            html.push_str(&format!("<li>{}</li>", encode_text(step)));
        }
        html.push_str("</ol>");
    }

    if !card.nutrition.is_empty() {
        html.push_str(r#"<h4>Nutritional Information</h4><div class="nutrition-grid">"#);
        for cell in &card.nutrition {
            html.push_str(&format!(
                r#"<div class="nutrition-item"><div class="nutrition-value">{}</div><div class="nutrition-label">{}</div></div>"#,
                encode_text(&cell.value),
                cell.label
            ));
        }
        html.push_str("</div>");
    }

    html.push_str("</div>");
    html
}

fn meta_item_html(label: &str, value_html: &str) -> String {
    format!(
        r#"<div class="meta-item"><span class="meta-label">{}</span><span class="meta-value">{}</span></div>"#,
        label, value_html
    )
}

impl fmt::Display for Fragment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Fragment::Card(card) => write!(f, "{}", card),
            Fragment::Error { message, .. } => write!(f, "!! Error rendering recipe: {}", message),
        }
    }
}

impl fmt::Display for RecipeCard {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{}", self.title)?;
        write!(
            f,
            "  Cooking Time: {} | Servings: {} | Difficulty: {} {}",
            self.cooking_time,
            self.servings,
            self.badge.marker(),
            self.difficulty
        )?;

        if !self.instructions.is_empty() {
            write!(f, "\n  Instructions:")?;
            for (number, step) in self.instructions.iter().enumerate() {
                write!(f, "\n    {}. {}", number + 1, step)?;
            }
        }

        if !self.nutrition.is_empty() {
            let cells: Vec<String> = self
                .nutrition
                .iter()
                .map(|cell| format!("{}: {}", cell.label, cell.value))
                .collect();
            write!(f, "\n  Nutritional Information: {}", cells.join(" | "))?;
        }

        Ok(())
    }
}

/// Maps canonical recipes to fragments, one failure at a time
pub struct RenderPipeline;

impl RenderPipeline {
    /// Build the card for one recipe.
    ///
    /// Fails when the record breaks the canonical invariants (no title, zero servings).
    pub fn render(&self, recipe: &Recipe) -> Result<RecipeCard, AnalyzerError> {
        let fault = |message: &str| AnalyzerError::Render {
            recipe_id: recipe.id.clone(),
            message: message.to_string(),
        };

        if recipe.name.trim().is_empty() {
            return Err(fault("recipe has no title"));
        }
        if recipe.servings == 0 {
            return Err(fault("servings must be at least one"));
        }

        Ok(RecipeCard {
            title: recipe.name.clone(),
            cooking_time: recipe.cooking_time.clone(),
            servings: recipe.servings,
            difficulty: recipe.difficulty.to_string(),
            badge: Badge::for_difficulty(&recipe.difficulty),
            instructions: recipe.instructions.clone(),
            nutrition: recipe
                .nutrition
                .recognized()
                .map(|(label, value)| NutritionCell {
                    label,
                    value: value.to_string(),
                })
                .collect(),
        })
    }

    /// Render every recipe in order; a failed one becomes an error fragment
    pub fn render_all(&self, recipes: &[Recipe]) -> Vec<Fragment> {
        recipes
            .iter()
            .map(|recipe| match self.render(recipe) {
                Ok(card) => Fragment::Card(card),
                Err(e) => {
                    error!("Error rendering recipe: {}", e);
                    let message = match e {
                        AnalyzerError::Render { message, .. } => message,
                        other => other.to_string(),
                    };
                    Fragment::Error {
                        recipe_id: recipe.id.clone(),
                        message,
                    }
                }
            })
            .collect()
    }
}
