//! Pipeline state types threaded through the recipe graph.

mod recipe_state;

pub use recipe_state::{Document, DocumentSet, Flag, RecipeState, RecipeUpdate};
