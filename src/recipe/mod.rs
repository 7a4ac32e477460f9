pub mod completion;
pub mod index;
pub mod model;

pub use completion::{summarize, RecipeSummary};
pub use index::{RecipeIndex, CRAFTABLE_CACHE_TTL_MS};
pub use model::{content_id, group_ingredients, GroupedRequirements, Ingredient, Output, Recipe};
