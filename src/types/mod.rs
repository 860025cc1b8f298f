mod field;
mod models;
mod planet;

pub use field::{Field, from_object};
pub use models::{Planet, Token, User};
pub use planet::{PlanetFilter, PlanetInput, PlanetPatch};
